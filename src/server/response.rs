//! Helpers for writing status, headers, and bodies to the raw transport
//! response.

use may_minihttp::Response;
use serde_json::Value;

use crate::content_type;

pub(crate) fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "OK",
    }
}

/// Applies one header line to the transport response.
///
/// `may_minihttp` only accepts `&'static str` header lines, so dynamic
/// name/value pairs are leaked. The common content types are interned to keep
/// the hot path allocation-free, but every other header line leaks its
/// allocation for the life of the process. A header whose value changes per
/// request (a request id, a timestamp) therefore leaks once per response
/// that carries it; a cache would not help, since unique values never repeat.
pub(crate) fn apply_header(res: &mut Response, name: &str, value: &str) {
    if name.eq_ignore_ascii_case(content_type::HEADER_CONTENT_TYPE) {
        match value {
            content_type::APPLICATION_JSON => {
                res.header("Content-Type: application/json");
                return;
            }
            content_type::TEXT_PLAIN => {
                res.header("Content-Type: text/plain");
                return;
            }
            content_type::TEXT_HTML => {
                res.header("Content-Type: text/html");
                return;
            }
            _ => {}
        }
    }
    let line = format!("{name}: {value}").into_boxed_str();
    res.header(Box::leak(line));
}

/// Writes a JSON error body with the given status code.
///
/// Used for the built-in 404/405 responses when no custom error controller is
/// registered.
pub(crate) fn write_json_error(res: &mut Response, status: u16, body: Value) {
    res.status_code(status as usize, status_reason(status));
    res.header("Content-Type: application/json");
    res.body_vec(body.to_string().into_bytes());
}
