// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use phf::phf_map;
use unicase::UniCase;

use std::fmt;

/// The request methods this server understands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    Delete,
    Get,
    Patch,
    Post,
    Put,
}

impl Method {
    /// Get the method in string form.
    ///
    /// # References
    /// * [RFC 9110 - Section 9. Methods](https://www.rfc-editor.org/rfc/rfc9110.html#section-9)
    pub fn as_string(&self) -> &'static str {
        match self {
            Self::Delete => "DELETE",
            Self::Get => "GET",
            Self::Patch => "PATCH",
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }

    /// Parse a method, ignoring ASCII case. Returns `None` for methods that
    /// aren't supported.
    pub fn parse(value: &str) -> Option<Method> {
        METHOD_MAP.get(&UniCase::ascii(value)).copied()
    }

    /// Methods that can't be processed without a `Content-Length`.
    pub fn requires_body(&self) -> bool {
        matches!(self, Self::Patch | Self::Post | Self::Put)
    }
}

static METHOD_MAP: phf::Map<UniCase<&'static str>, Method> = phf_map!(
    UniCase::ascii("DELETE") => Method::Delete,
    UniCase::ascii("GET") => Method::Get,
    UniCase::ascii("PATCH") => Method::Patch,
    UniCase::ascii("POST") => Method::Post,
    UniCase::ascii("PUT") => Method::Put,
);

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_string())
    }
}
