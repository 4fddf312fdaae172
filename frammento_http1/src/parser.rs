// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! The incremental request parser.
//!
//! Data arrives in chunks of arbitrary size. A chunk containing the blank
//! line that ends the header block is taken apart in one go (the
//! whole-message path); any other chunk is processed line by line against
//! the accumulated state (the incremental path).
//!
//! # Known edge case
//! The whole-message path always parses the first line of the chunk as the
//! request-line. When a request is sent line by line, but the last header
//! and the blank line end up in the same chunk, that header is parsed as a
//! request-line and the request is usually rejected.

use frammento_http::{
    syntax::{
        self,
        CRLF,
        END_OF_HEADERS,
    },
    HeaderMap,
    HttpParseError,
    Method,
    QueryMap,
    Request,
};

use log::{debug, trace};

const CONTENT_LENGTH: &str = "Content-Length";

/// Reconstructs a single request from the chunks fed to it.
///
/// One parser serves one connection. After [`RequestParser::extract`] or a
/// failed [`RequestParser::feed`] it is back in its initial state and can be
/// reused.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestParser {
    method: Option<Method>,
    path: String,
    http_version: String,
    queries: QueryMap,
    headers: HeaderMap,
    body: String,
    request_line_complete: bool,
    headers_complete: bool,
    /// The last body chunk ended in a `\r`, which might be the first half of
    /// a CRLF.
    pending_carriage_return: bool,
}

impl RequestParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next chunk of data received on the connection.
    ///
    /// # Preconditions
    /// Until the header block is complete, a chunk that doesn't contain the
    /// end of the headers (`\r\n\r\n`) must end on a line boundary. Fragments
    /// of a line are not buffered: a partial header line is processed as if
    /// it were the whole line. Body chunks may be split anywhere.
    ///
    /// # Errors
    /// When the data is malformed, or the request so far violates one of the
    /// validation rules. The parser is reset before the error is returned.
    pub fn feed<C>(&mut self, chunk: C) -> Result<(), HttpParseError>
            where C: AsRef<[u8]> {
        let result = std::str::from_utf8(chunk.as_ref())
            .map_err(|_| HttpParseError::InvalidEncoding)
            .and_then(|chunk| self.parse_chunk(chunk))
            .and_then(|()| self.validate_request());

        if let Err(error) = result {
            debug!("Rejecting request: {} ({})", error.as_ref(), error);
            self.reset();
            return Err(error);
        }

        Ok(())
    }

    /// Has enough data arrived to consider the request fully received?
    pub fn is_complete(&self) -> bool {
        match self.method {
            Some(Method::Get) => self.headers_complete,
            Some(Method::Patch | Method::Post | Method::Put) => self.content_limit_reached(),
            Some(Method::Delete) => {
                if self.headers.contains(CONTENT_LENGTH) {
                    self.content_limit_reached()
                } else {
                    self.headers_complete
                }
            }
            None => false,
        }
    }

    /// Take the finished request out of the parser, leaving the parser in its
    /// initial state.
    ///
    /// Returns `None` when the request isn't [complete](Self::is_complete)
    /// yet, in which case the state is left untouched.
    pub fn extract(&mut self) -> Option<Request> {
        if !self.is_complete() {
            return None;
        }

        let method = self.method?;
        let mut parser = std::mem::take(self);
        if parser.pending_carriage_return && parser.content_length().is_some_and(|length| parser.body.len() < length) {
            parser.body.push('\r');
        }
        Some(Request {
            method,
            path: parser.path,
            queries: parser.queries,
            version: parser.http_version,
            headers: parser.headers,
            body: parser.body,
        })
    }

    /// Forget everything received so far.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn method(&self) -> Option<Method> {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn http_version(&self) -> &str {
        &self.http_version
    }

    pub fn queries(&self) -> &QueryMap {
        &self.queries
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_request_line_complete(&self) -> bool {
        self.request_line_complete
    }

    pub fn is_headers_complete(&self) -> bool {
        self.headers_complete
    }

    /// The declared `Content-Length`, if present and well-formed.
    pub fn content_length(&self) -> Option<usize> {
        self.declared_content_length().ok().flatten()
    }

    fn declared_content_length(&self) -> Result<Option<usize>, HttpParseError> {
        self.headers.get(CONTENT_LENGTH)
            .map(syntax::parse_content_length)
            .transpose()
    }

    fn content_limit_reached(&self) -> bool {
        self.headers_complete
            && matches!(self.content_length(),
                Some(length) if self.body.len() + usize::from(self.pending_carriage_return) >= length)
    }

    fn parse_chunk(&mut self, chunk: &str) -> Result<(), HttpParseError> {
        if self.headers_complete {
            self.append_body(chunk);
            return Ok(());
        }

        if let Some((header_block, body)) = chunk.split_once(END_OF_HEADERS) {
            return self.parse_whole_message(header_block, body);
        }

        let mut rest = chunk;
        while !rest.is_empty() {
            if self.headers_complete {
                self.append_body(rest);
                break;
            }

            let (line, remainder) = rest.split_once(CRLF).unwrap_or((rest, ""));
            self.parse_line(line)?;
            rest = remainder;
        }

        Ok(())
    }

    /// The chunk carries the complete header block, and possibly (a part of)
    /// the body.
    fn parse_whole_message(&mut self, header_block: &str, body: &str) -> Result<(), HttpParseError> {
        trace!("Chunk contains the end of the headers, parsing it as a whole message");
        if self.request_line_complete {
            debug!("End of headers arrived together with more header lines, re-parsing the first as request-line");
        }

        let mut lines = header_block.split(CRLF);
        self.parse_request_line(lines.next().unwrap_or_default())?;
        for line in lines {
            self.parse_header(line)?;
        }
        self.headers_complete = true;

        self.append_body(body);
        Ok(())
    }

    /// Dispatches a line received before the end of the headers.
    fn parse_line(&mut self, line: &str) -> Result<(), HttpParseError> {
        if !self.request_line_complete {
            return self.parse_request_line(line);
        }

        if line.is_empty() {
            debug!("Received all {} headers", self.headers.len());
            self.headers_complete = true;
            return Ok(());
        }

        self.parse_header(line)
    }

    /// Appends body data with its CRLF delimiters removed. A trailing `\r` is
    /// held back until the next chunk shows whether a `\n` follows it.
    fn append_body(&mut self, data: &str) {
        if data.is_empty() {
            return;
        }

        let mut data = data;
        if std::mem::take(&mut self.pending_carriage_return) {
            match data.strip_prefix('\n') {
                Some(rest) => data = rest,
                None => self.body.push('\r'),
            }
        }

        if let Some(rest) = data.strip_suffix('\r') {
            self.pending_carriage_return = true;
            data = rest;
        }

        for piece in data.split(CRLF) {
            self.body.push_str(piece);
        }
    }

    /// Parses the request-line, e.g. `GET /search?q=test HTTP/1.1`.
    ///
    /// An unsupported method leaves the method unset, which is reported by
    /// the validation step.
    fn parse_request_line(&mut self, line: &str) -> Result<(), HttpParseError> {
        let mut fields = line.split_whitespace();
        let (Some(method), Some(target), Some(version), None) = (fields.next(), fields.next(), fields.next(), fields.next()) else {
            return Err(HttpParseError::MalformedRequestLine);
        };

        self.method = Method::parse(method);
        match target.split_once('?') {
            Some((path, query)) => {
                self.path = path.to_string();
                self.parse_queries(query);
            }
            None => self.path = target.to_string(),
        }
        self.http_version = version.to_string();
        self.request_line_complete = true;

        trace!("Request-line: {:?} {} {}", self.method, self.path, self.http_version);
        Ok(())
    }

    fn parse_queries(&mut self, query: &str) {
        for entry in query.split('&').filter(|entry| !entry.is_empty()) {
            let (key, value) = entry.split_once('=').unwrap_or((entry, ""));
            self.queries.set(key.to_string(), value.to_string());
        }
    }

    fn parse_header(&mut self, line: &str) -> Result<(), HttpParseError> {
        let Some((name, value)) = line.split_once(':') else {
            return Err(HttpParseError::HeaderDoesNotContainColon);
        };

        self.headers.set(syntax::normalize_header_name(name), value.trim().to_string());
        Ok(())
    }

    fn validate_request(&self) -> Result<(), HttpParseError> {
        if self.request_line_complete {
            self.validate_request_line()?;
        }

        if self.headers_complete {
            self.validate_headers()?;
            self.validate_body()?;
        }

        Ok(())
    }

    fn validate_request_line(&self) -> Result<(), HttpParseError> {
        if self.method.is_none() {
            return Err(HttpParseError::UnsupportedMethod);
        }

        if !syntax::is_valid_http_version(&self.http_version) {
            return Err(HttpParseError::InvalidHttpVersion);
        }

        if !self.path.starts_with('/') {
            return Err(HttpParseError::InvalidPath);
        }

        Ok(())
    }

    fn validate_headers(&self) -> Result<(), HttpParseError> {
        if !self.headers.keys().all(syntax::is_valid_header_name) {
            return Err(HttpParseError::InvalidHeaderName);
        }

        let has_content_length = self.headers.contains(CONTENT_LENGTH);
        match self.method {
            Some(Method::Get) if has_content_length => Err(HttpParseError::ContentLengthOnGet),
            Some(method) if method.requires_body() && !has_content_length => Err(HttpParseError::MissingContentLength),
            _ => Ok(()),
        }
    }

    fn validate_body(&self) -> Result<(), HttpParseError> {
        if self.method == Some(Method::Get) {
            return Ok(());
        }

        match self.declared_content_length()? {
            Some(length) if self.body.len() > length => Err(HttpParseError::BodyExceedsContentLength),
            _ => Ok(()),
        }
    }
}
