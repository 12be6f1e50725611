//! Request line parsing: `METHOD SP TARGET SP HTTP/1.1 CRLF`.

use crate::ensure;
use crate::protocol::{Method, ParseError, RequestLine};
use crate::utils::find_crlf;

const SUPPORTED_VERSION: &str = "1.1";

/// Parses the request line at the start of `src`.
///
/// Returns `Ok(None)` while no full line is buffered, otherwise the line and
/// the number of bytes it occupied including the CRLF.
pub(crate) fn parse_request_line(src: &[u8]) -> Result<Option<(RequestLine, usize)>, ParseError> {
    let Some(end) = find_crlf(src) else {
        return Ok(None);
    };

    let line = std::str::from_utf8(&src[..end]).map_err(ParseError::malformed_request_line)?;

    let parts: Vec<&str> = line.split(' ').collect();
    let [method, target, version] = parts[..] else {
        return Err(ParseError::malformed_request_line(format!("expected 3 parts, found {}", parts.len())));
    };

    let method: Method = method.parse()?;

    let (protocol, version) = version
        .split_once('/')
        .ok_or_else(|| ParseError::malformed_request_line(format!("malformed version {version:?}")))?;
    ensure!(protocol == "HTTP", ParseError::malformed_request_line(format!("unsupported protocol {protocol:?}")));
    ensure!(
        version == SUPPORTED_VERSION,
        ParseError::malformed_request_line(format!("unsupported http version {version:?}"))
    );

    let request_line = RequestLine { method, target: target.to_owned(), version: version.to_owned() };
    Ok(Some((request_line, end + 2)))
}
