//! Extraction of raw `may_minihttp` requests into owned request data.

use std::collections::HashMap;
use std::io::Read;

use may_minihttp::Request;
use tracing::{debug, trace};

/// Owned HTTP request data extracted once from the raw request.
///
/// Header names are lowercased; values preserve arrival order per name.
/// The path has its query string stripped.
#[derive(Debug, Default, PartialEq)]
pub struct ParsedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, Vec<String>>,
    pub cookies: HashMap<String, String>,
    pub query_params: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
}

/// Parses cookies out of the `cookie` header, if present.
pub fn parse_cookies(headers: &HashMap<String, Vec<String>>) -> HashMap<String, String> {
    headers
        .get("cookie")
        .and_then(|values| values.first())
        .map(|c| {
            c.split(';')
                .filter_map(|pair| {
                    let mut parts = pair.trim().splitn(2, '=');
                    let name = parts.next()?.trim().to_string();
                    let value = parts.next().unwrap_or("").trim().to_string();
                    Some((name, value))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Parses and URL-decodes query string parameters from a request path.
pub fn parse_query_params(path: &str) -> HashMap<String, String> {
    if let Some(pos) = path.find('?') {
        let query_str = &path[pos + 1..];
        url::form_urlencoded::parse(query_str.as_bytes())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    } else {
        HashMap::new()
    }
}

/// Extracts method, path, headers, cookies, query params, and body bytes from
/// a raw `may_minihttp::Request`.
pub fn parse_request(req: Request) -> ParsedRequest {
    let method = req.method().to_string();
    let raw_path = req.path().to_string();
    let path = raw_path.split('?').next().unwrap_or("/").to_string();

    let mut headers: HashMap<String, Vec<String>> = HashMap::new();
    for h in req.headers() {
        headers
            .entry(h.name.to_ascii_lowercase())
            .or_default()
            .push(String::from_utf8_lossy(h.value).to_string());
    }

    let cookies = parse_cookies(&headers);
    let query_params = parse_query_params(&raw_path);

    let body = {
        let mut buf = Vec::new();
        match req.body().read_to_end(&mut buf) {
            Ok(size) if size > 0 => Some(buf),
            _ => None,
        }
    };

    debug!(
        header_count = headers.len(),
        cookie_count = cookies.len(),
        query_param_count = query_params.len(),
        body_bytes = body.as_ref().map(Vec::len),
        "request extracted"
    );
    trace!(method = %method, path = %path, "request parsed");

    ParsedRequest {
        method,
        path,
        headers,
        cookies,
        query_params,
        body,
    }
}
