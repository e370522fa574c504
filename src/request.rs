//! Request facade handed to filters and handlers.

use std::collections::HashMap;

use http::Method;
use serde::de::DeserializeOwned;

use crate::context::RequestContext;
use crate::server::request::ParsedRequest;

/// An incoming HTTP request as seen by filters and handlers.
///
/// Wraps the data extracted from the wire plus the path parameters the router
/// captured, and carries one owned [`RequestContext`] for the lifetime of the
/// request. Header lookups are case-insensitive; cookie and query-param
/// lookups are exact.
pub struct Request {
    method: Method,
    parsed: ParsedRequest,
    path_params: HashMap<String, String>,
    context: RequestContext,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        parsed: ParsedRequest,
        path_params: HashMap<String, String>,
    ) -> Self {
        Self {
            method,
            parsed,
            path_params,
            context: RequestContext::new(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request path with the query string stripped.
    pub fn path(&self) -> &str {
        &self.parsed.path
    }

    /// Scratch state shared between the filters and the handler processing
    /// this request.
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut RequestContext {
        &mut self.context
    }

    // Headers /////////////////////////////////////////////////////////////

    /// First value of the named header. Lookup is case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers(name).first().map(String::as_str)
    }

    /// All values of the named header, in arrival order.
    pub fn headers(&self, name: &str) -> &[String] {
        self.parsed
            .headers
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.parsed
            .headers
            .contains_key(&name.to_ascii_lowercase())
    }

    // Query params ////////////////////////////////////////////////////////

    pub fn has_query_param(&self, name: &str) -> bool {
        self.parsed.query_params.contains_key(name)
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.parsed.query_params.get(name).map(String::as_str)
    }

    // Cookies /////////////////////////////////////////////////////////////

    pub fn has_cookie(&self, name: &str) -> bool {
        self.parsed.cookies.contains_key(name)
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.parsed.cookies.get(name).map(String::as_str)
    }

    pub fn cookies(&self) -> &HashMap<String, String> {
        &self.parsed.cookies
    }

    // Path params /////////////////////////////////////////////////////////

    /// Value captured for a `{name}` segment of the controller's path.
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    pub fn path_params(&self) -> &HashMap<String, String> {
        &self.path_params
    }

    // Body ////////////////////////////////////////////////////////////////

    /// Raw request body bytes, if a body was sent.
    pub fn body(&self) -> Option<&[u8]> {
        self.parsed.body.as_deref()
    }

    /// Deserializes the request body as JSON into `T`.
    pub fn json_body<T: DeserializeOwned>(&self) -> anyhow::Result<T> {
        let bytes = self
            .body()
            .ok_or_else(|| anyhow::anyhow!("request has no body"))?;
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> Request {
        let mut headers = HashMap::new();
        headers.insert(
            "x-auth".to_string(),
            vec!["token-1".to_string(), "token-2".to_string()],
        );
        let mut cookies = HashMap::new();
        cookies.insert("session".to_string(), "abc".to_string());
        let mut query_params = HashMap::new();
        query_params.insert("limit".to_string(), "10".to_string());
        let parsed = ParsedRequest {
            method: "GET".to_string(),
            path: "/pets/42".to_string(),
            headers,
            cookies,
            query_params,
            body: Some(br#"{"name":"rex"}"#.to_vec()),
        };
        let mut path_params = HashMap::new();
        path_params.insert("id".to_string(), "42".to_string());
        Request::new(Method::GET, parsed, path_params)
    }

    #[test]
    fn test_header_lookup_case_insensitive() {
        let req = sample_request();
        assert_eq!(req.header("X-Auth"), Some("token-1"));
        assert_eq!(req.headers("x-AUTH").len(), 2);
        assert!(req.has_header("X-AUTH"));
        assert!(!req.has_header("X-Other"));
    }

    #[test]
    fn test_query_and_cookie_access() {
        let req = sample_request();
        assert!(req.has_query_param("limit"));
        assert_eq!(req.query_param("limit"), Some("10"));
        assert_eq!(req.query_param("offset"), None);
        assert!(req.has_cookie("session"));
        assert_eq!(req.cookie("session"), Some("abc"));
    }

    #[test]
    fn test_path_params() {
        let req = sample_request();
        assert_eq!(req.path_param("id"), Some("42"));
        assert_eq!(req.path_param("other"), None);
    }

    #[test]
    fn test_json_body() {
        #[derive(serde::Deserialize)]
        struct Pet {
            name: String,
        }
        let req = sample_request();
        let pet: Pet = req.json_body().unwrap();
        assert_eq!(pet.name, "rex");
    }

    #[test]
    fn test_context_round_trip() {
        let mut req = sample_request();
        req.context_mut().put("user", "alice".to_string());
        assert_eq!(req.context().get::<String>("user").unwrap(), "alice");
    }
}
