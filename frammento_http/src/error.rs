// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use strum_macros::AsRefStr;

use std::fmt;

/// An error that can occur while parsing an HTTP request.
///
/// Every variant is fatal for the request being parsed: the parser resets
/// itself before handing one of these to the caller.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr)]
pub enum HttpParseError {
    /// The request-line didn't consist of exactly three fields.
    ///
    /// ## Example:
    /// ```text
    /// GET /path
    /// ```
    MalformedRequestLine,

    /// The method isn't one of `GET`, `POST`, `PUT`, `PATCH` or `DELETE`.
    ///
    /// ## Example:
    /// ```text
    /// INVALID / HTTP/1.1
    /// ```
    UnsupportedMethod,

    /// The HTTP version was invalid.
    ///
    /// ## Syntax
    /// The HTTP version must be in the format `HTTP/<digit>.<digit>`, where
    /// `<digit>` is a single digit (0 - 9).
    ///
    /// ## Examples:
    /// ```text
    /// HTTP/1.
    /// REST/1.1
    /// HTTP/1.1.1
    /// HTTP/d.d
    /// ```
    InvalidHttpVersion,

    /// The path of the request-target doesn't start with a solidus (`/`).
    ///
    /// ## Example:
    /// ```text
    /// GET invalid/path HTTP/1.1
    /// ```
    InvalidPath,

    /// The header didn't contain a colon, it's only the name.
    ///
    /// ## Example:
    /// ```text
    /// Content-Type
    /// ```
    HeaderDoesNotContainColon,

    /// The header name contained something other than ASCII letters and
    /// dashes.
    ///
    /// ## Example:
    /// ```text
    /// @#$: value
    /// ```
    InvalidHeaderName,

    /// A `GET` request carried a `Content-Length` header.
    ContentLengthOnGet,

    /// A `POST`, `PUT` or `PATCH` request didn't carry a `Content-Length`
    /// header, and chunked transfer coding isn't supported.
    MissingContentLength,

    /// The `Content-Length` field was malformed, meaning it contained non-numeric
    /// characters, was too large, was negative, or was the empty string.
    ///
    /// ## Example:
    /// ```text
    /// Content-Length: 123abc
    /// ```
    InvalidContentLength,

    /// More body was received than the `Content-Length` announced.
    BodyExceedsContentLength,

    /// The chunk wasn't valid UTF-8.
    InvalidEncoding,
}

impl HttpParseError {
    /// A human-readable reason, suitable for logging or an error page.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MalformedRequestLine => "request-line must consist of a method, a path and a version",
            Self::UnsupportedMethod => "unknown request method",
            Self::InvalidHttpVersion => "HTTP version must be formatted as HTTP/<digit>.<digit>",
            Self::InvalidPath => "request path must start with /",
            Self::HeaderDoesNotContainColon => "header line is missing the colon separator",
            Self::InvalidHeaderName => "header name may only contain letters and dashes",
            Self::ContentLengthOnGet => "Content-Length header should not be present in GET request",
            Self::MissingContentLength => "Content-Length must be present for requests which require a body",
            Self::InvalidContentLength => "Content-Length is not a valid number",
            Self::BodyExceedsContentLength => "body length exceeds the stated Content-Length",
            Self::InvalidEncoding => "request data is not valid UTF-8",
        }
    }
}

impl fmt::Display for HttpParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

impl std::error::Error for HttpParseError {}
