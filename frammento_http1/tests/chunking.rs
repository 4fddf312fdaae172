// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! The parser must reconstruct the same request however the byte stream is
//! sliced, apart from the documented whole-message edge case.

use frammento_http::{
    HttpParseError,
    Method,
    Request,
};
use frammento_http1::RequestParser;
use rstest::rstest;

const GET_REQUEST: &str = "GET /search?q=test&count=3 HTTP/1.1\r\nHost: localhost\r\nAccept: */*\r\nUser-Agent: curl\r\n\r\n";
const POST_REQUEST: &str = "POST /submit HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: 17\r\nUser-Agent: curl\r\nAccept: */*\r\n\r\n{'data': 'value'}";
const PUT_REQUEST: &str = "PUT /items/1 HTTP/1.1\r\nContent-Length: 12\r\n\r\nline one\r\nline";
const DELETE_REQUEST: &str = "DELETE /items/1 HTTP/1.1\r\nHost: localhost\r\n\r\n";

fn feed_all<'a>(chunks: impl IntoIterator<Item = &'a str>) -> Request {
    let mut parser = RequestParser::new();
    for chunk in chunks {
        parser.feed(chunk).unwrap();
    }
    assert!(parser.is_complete());
    parser.extract().unwrap()
}

/// Splits after every CRLF, keeping the delimiter with its line.
fn line_chunks(request: &str) -> Vec<&str> {
    request.split_inclusive("\r\n").collect()
}

#[rstest]
#[case(GET_REQUEST)]
#[case(POST_REQUEST)]
#[case(PUT_REQUEST)]
#[case(DELETE_REQUEST)]
fn line_by_line_equals_whole(#[case] request: &str) {
    let whole = feed_all([request]);
    let lines = feed_all(line_chunks(request));
    assert_eq!(whole, lines);
}

/// Header lines arrive one by one, the blank line arrives together with the
/// body.
#[rstest]
#[case(GET_REQUEST)]
#[case(POST_REQUEST)]
#[case(PUT_REQUEST)]
#[case(DELETE_REQUEST)]
fn headers_incremental_then_rest_as_one_chunk(#[case] request: &str) {
    let (header_block, rest) = request.split_once("\r\n\r\n").unwrap();
    let whole = feed_all([request]);

    let mut chunks: Vec<String> = header_block.split("\r\n").map(|line| format!("{line}\r\n")).collect();
    chunks.push(format!("\r\n{rest}"));
    let incremental = feed_all(chunks.iter().map(String::as_str));

    assert_eq!(whole, incremental);
}

#[test]
fn body_split_over_many_chunks() {
    let header = "POST /submit HTTP/1.1\r\nContent-Length: 17\r\n\r\n";
    let mut parser = RequestParser::new();
    parser.feed(header).unwrap();
    assert!(!parser.is_complete());

    for piece in ["{'data'", ": ", "'value'", "}"] {
        assert!(!parser.is_complete());
        parser.feed(piece).unwrap();
    }

    assert!(parser.is_complete());
    assert_eq!(parser.extract().unwrap().body, "{'data': 'value'}");
}

/// The body may be cut anywhere, also between the two bytes of a CRLF.
#[rstest]
#[case(POST_REQUEST)]
#[case(PUT_REQUEST)]
fn body_split_at_every_offset_equals_whole(#[case] request: &str) {
    let whole = feed_all([request]);
    let body_start = request.find("\r\n\r\n").unwrap() + 4;

    for offset in body_start..request.len() {
        let (head, tail) = request.split_at(offset);
        assert_eq!(feed_all([head, tail]), whole, "split at byte {offset}");
    }
}

#[test]
fn get_fed_line_by_line() {
    let mut parser = RequestParser::new();
    for line in ["GET / HTTP/1.1", "Host: localhost", "Accept: */*", "User-Agent: curl"] {
        parser.feed(format!("{line}\r\n")).unwrap();
        assert!(!parser.is_complete());
    }

    parser.feed("\r\n").unwrap();
    assert!(parser.is_complete());
    assert_eq!(parser.method(), Some(Method::Get));
    assert_eq!(parser.path(), "/");
    assert_eq!(parser.http_version(), "HTTP/1.1");
    assert_eq!(parser.headers().len(), 3);
    assert_eq!(parser.body(), "");
}

#[test]
fn post_as_one_chunk() {
    let mut parser = RequestParser::new();
    parser.feed(POST_REQUEST.as_bytes()).unwrap();

    assert!(parser.is_complete());
    assert_eq!(parser.content_length(), Some(17));

    let request = parser.extract().unwrap();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.headers.len(), 4);
    assert_eq!(request.body, "{'data': 'value'}");
    assert_eq!(request.body.len(), 17);
}

#[test]
fn multiple_lines_in_one_chunk_without_end_of_headers() {
    let chunks = [
        "GET / HTTP/1.1\r\nHost: localhost\r\n",
        "Accept: */*\r\nUser-Agent: curl\r\n",
        "\r\n",
    ];
    let request = feed_all(chunks);
    assert_eq!(request.headers.len(), 3);
    assert_eq!(request.headers.get("User-Agent"), Some("curl"));
}

#[test]
fn header_keys_are_normalized() {
    let request = feed_all(["POST / HTTP/1.1\r\ncontent-length: 2\r\nCONTENT-TYPE: text/plain\r\nx-request-id: 7\r\n\r\nhi"]);
    assert_eq!(request.headers.keys().collect::<Vec<_>>(), vec!["Content-Length", "Content-Type", "X-Request-Id"]);
}

#[test]
fn duplicate_keys_last_wins() {
    let request = feed_all(["GET /?a=1&b=2&a=3 HTTP/1.1\r\nAccept: text/html\r\naccept: */*\r\n\r\n"]);
    assert_eq!(request.queries.get("a"), Some("3"));
    assert_eq!(request.queries.len(), 2);
    assert_eq!(request.headers.get("Accept"), Some("*/*"));
    assert_eq!(request.headers.len(), 1);
}

#[test]
fn delete_with_body() {
    let request = feed_all(line_chunks("DELETE /items/1 HTTP/1.1\r\nContent-Length: 6\r\n\r\nreason"));
    assert_eq!(request.method, Method::Delete);
    assert_eq!(request.body, "reason");
}

#[test]
fn extract_resets_the_parser() {
    let mut parser = RequestParser::new();
    parser.feed(GET_REQUEST).unwrap();
    parser.extract().unwrap();
    assert_eq!(parser, RequestParser::new());

    parser.feed(DELETE_REQUEST).unwrap();
    assert_eq!(parser.extract().unwrap().method, Method::Delete);
}

/// The last header and the blank line arrive together, after the
/// request-line was already received on its own. The whole-message path
/// takes the header for a request-line.
#[test]
fn end_of_headers_in_a_later_chunk_is_parsed_as_request_line() {
    let mut parser = RequestParser::new();
    parser.feed("GET / HTTP/1.1\r\n").unwrap();

    assert_eq!(parser.feed("Host: localhost\r\n\r\n"), Err(HttpParseError::MalformedRequestLine));
    assert_eq!(parser, RequestParser::new());
}

#[rstest]
#[case(&["GET /path\r\n"], HttpParseError::MalformedRequestLine)]
#[case(&["INVALID / HTTP/1.1\r\n"], HttpParseError::UnsupportedMethod)]
#[case(&["GET / HTTP/d.d\r\n"], HttpParseError::InvalidHttpVersion)]
#[case(&["GET invalid/path HTTP/1.1\r\n"], HttpParseError::InvalidPath)]
#[case(&["GET / HTTP/1.1\r\n", "Host localhost\r\n"], HttpParseError::HeaderDoesNotContainColon)]
#[case(&["GET / HTTP/1.1\r\n", "@#$: value\r\n", "\r\n"], HttpParseError::InvalidHeaderName)]
#[case(&["GET / HTTP/1.1\r\nContent-Length: 0\r\n\r\n"], HttpParseError::ContentLengthOnGet)]
#[case(&["POST / HTTP/1.1\r\nHost: localhost\r\n\r\n"], HttpParseError::MissingContentLength)]
#[case(&["PATCH / HTTP/1.1\r\nContent-Length: ten\r\n\r\n"], HttpParseError::InvalidContentLength)]
#[case(&["POST / HTTP/1.1\r\nContent-Length: 3\r\n\r\n", "too long\r\n"], HttpParseError::BodyExceedsContentLength)]
#[case(&["PUT / HTTP/1.1\r\nContent-Length: 3\r\n\r\nabcd"], HttpParseError::BodyExceedsContentLength)]
fn rejections_reset_the_parser(#[case] chunks: &[&str], #[case] expected: HttpParseError) {
    let mut parser = RequestParser::new();
    let (last, leading) = chunks.split_last().unwrap();
    for chunk in leading {
        parser.feed(chunk).unwrap();
    }

    assert_eq!(parser.feed(last), Err(expected));
    assert_eq!(parser, RequestParser::new());
    assert!(!parser.is_complete());
}
