// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! This module contains the syntax rules the request parser validates
//! against. They are deliberately narrower than the RFC grammar: header names
//! are letters and dashes only, and the version is a single digit pair.
//!
//! # References
//! * [RFC 9112](https://www.rfc-editor.org/rfc/rfc9112.html)

use crate::HttpParseError;

/// The line delimiter of HTTP/1.x messages.
pub const CRLF: &str = "\r\n";

/// The empty line terminating the header block, including the CRLF of the
/// last header.
pub const END_OF_HEADERS: &str = "\r\n\r\n";

/// Is the given string a version of the form `HTTP/<digit>.<digit>`?
///
/// ```text
/// HTTP-version  = HTTP-name "/" DIGIT "." DIGIT
/// HTTP-name     = %s"HTTP"
/// ```
pub fn is_valid_http_version(version: &str) -> bool {
    let Some(digits) = version.strip_prefix("HTTP/") else {
        return false;
    };

    matches!(digits.as_bytes(), [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit())
}

/// Header names may only consist of ASCII letters and dashes, and may not be
/// empty.
pub fn is_valid_header_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|byte| byte.is_ascii_alphabetic() || byte == b'-')
}

/// Normalizes a header name to title-case: the first character of every
/// dash-separated segment is upper-cased, the rest is lower-cased.
///
/// ```
/// use frammento_http::syntax::normalize_header_name;
/// assert_eq!(normalize_header_name("CONTENT-length"), "Content-Length");
/// ```
pub fn normalize_header_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut at_segment_start = true;

    for character in name.chars() {
        if at_segment_start {
            normalized.extend(character.to_uppercase());
        } else {
            normalized.extend(character.to_lowercase());
        }
        at_segment_start = character == '-';
    }

    normalized
}

/// Parses the value of a `Content-Length` field.
///
/// ```text
/// Content-Length = 1*DIGIT
/// ```
pub fn parse_content_length(value: &str) -> Result<usize, HttpParseError> {
    if value.is_empty() || !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(HttpParseError::InvalidContentLength);
    }

    value.parse().map_err(|_| HttpParseError::InvalidContentLength)
}
