use crate::http::request::{Method, Request};
use crate::todo::model::ListId;
use std::collections::HashMap;

/// Path prefix shared by every list route.
pub const LIST_PATH: &str = "/api/list";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// More bytes are needed before the request can be parsed
    Incomplete,
    /// Request line has fewer than two tokens or is not UTF-8
    InvalidRequest,
    InvalidContentLength,
    /// Path does not carry a decimal list id after `/api/list/`
    InvalidListId,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            ParseError::Incomplete => "incomplete request",
            ParseError::InvalidRequest => "malformed request line",
            ParseError::InvalidContentLength => "invalid Content-Length",
            ParseError::InvalidListId => "invalid list id in path",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ParseError {}

/// Parses one request from the start of `buf`.
///
/// Returns the request and the number of bytes it occupied. Only POST waits
/// for the blank line and body; other methods are returned as soon as the
/// request line is complete. Without a Content-Length header the body is
/// everything after the blank line that has been received so far.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let line_end = find(buf, b"\r\n").ok_or(ParseError::Incomplete)?;
    let (method, path, version) = parse_request_line(&buf[..line_end])?;

    // Look for header/body separator
    let headers_end = match find_headers_end(buf) {
        Some(end) => end,
        None if method != Method::POST => {
            let request = Request {
                method,
                path,
                version,
                headers: HashMap::new(),
                body: Vec::new(),
            };
            return Ok((request, line_end + 2));
        }
        None => return Err(ParseError::Incomplete),
    };

    let header_bytes = buf.get(line_end + 2..headers_end).unwrap_or_default();
    let body_bytes = &buf[headers_end + 4..];

    let mut request = Request {
        method,
        path,
        version,
        headers: parse_headers(&String::from_utf8_lossy(header_bytes)),
        body: Vec::new(),
    };

    // Body
    let content_length = request
        .header("Content-Length")
        .map(|v| v.parse::<usize>().map_err(|_| ParseError::InvalidContentLength))
        .transpose()?;

    let body_len = match content_length {
        Some(len) if body_bytes.len() < len => return Err(ParseError::Incomplete),
        Some(len) => len,
        None => body_bytes.len(),
    };

    request.body = trim_nul_padding(&body_bytes[..body_len]).to_vec();

    let total_consumed = headers_end + 4 + body_len;
    Ok((request, total_consumed))
}

fn parse_request_line(line: &[u8]) -> Result<(Method, String, String), ParseError> {
    let line = std::str::from_utf8(line).map_err(|_| ParseError::InvalidRequest)?;
    let mut parts = line.split_whitespace();

    let method_str = parts.next().ok_or(ParseError::InvalidRequest)?;
    let path = parts.next().ok_or(ParseError::InvalidRequest)?;
    let version = parts.next().unwrap_or_default();

    Ok((Method::parse(method_str), path.to_string(), version.to_string()))
}

/// Collects `name: value` lines. Lines without a colon are ignored.
fn parse_headers(text: &str) -> HashMap<String, String> {
    text.split("\r\n")
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}

/// Extracts the list id from a path of the form `/api/list/<id>`.
///
/// The id is an optionally signed decimal integer. Anything after the
/// digits is ignored, so `/api/list/7?x=1` yields 7.
pub fn parse_list_id(path: &str) -> Result<ListId, ParseError> {
    let rest = path
        .strip_prefix(LIST_PATH)
        .and_then(|p| p.strip_prefix('/'))
        .ok_or(ParseError::InvalidListId)?;

    let sign_len = usize::from(rest.starts_with(['+', '-']));
    let digits_len = rest[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();

    if digits_len == 0 {
        return Err(ParseError::InvalidListId);
    }

    rest[..sign_len + digits_len]
        .parse()
        .map_err(|_| ParseError::InvalidListId)
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    find(buf, b"\r\n\r\n")
}

fn find(buf: &[u8], needle: &[u8]) -> Option<usize> {
    buf.windows(needle.len()).position(|w| w == needle)
}

fn trim_nul_padding(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &bytes[..end]
}
