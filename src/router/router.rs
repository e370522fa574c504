//! Path, method, and header matching for registered controllers.

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use regex::Regex;

use crate::controller::Controller;

/// One registered endpoint: the compiled path pattern, its matching rules,
/// and the controller to run on a match.
pub struct Route {
    path: String,
    pattern: Regex,
    param_names: Vec<String>,
    methods: Vec<Method>,
    /// Lowercased header name → expected value; empty value matches presence.
    required_headers: Vec<(String, String)>,
    controller: Arc<Controller>,
}

impl Route {
    pub(crate) fn new(
        path: String,
        methods: Vec<Method>,
        required_headers: HashMap<String, String>,
        controller: Arc<Controller>,
    ) -> Self {
        let (pattern, param_names) = path_to_regex(&path);
        let required_headers = required_headers
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .collect();
        Self {
            path,
            pattern,
            param_names,
            methods,
            required_headers,
            controller,
        }
    }

    fn matches_method(&self, method: &Method) -> bool {
        self.methods.is_empty() || self.methods.contains(method)
    }

    fn matches_headers(&self, headers: &HashMap<String, Vec<String>>) -> bool {
        self.required_headers.iter().all(|(name, expected)| {
            match headers.get(name) {
                Some(values) if expected.is_empty() => !values.is_empty(),
                Some(values) => values.iter().any(|v| v == expected),
                None => false,
            }
        })
    }
}

/// Outcome of resolving an incoming request against the route table.
pub enum Resolution {
    /// A controller matched; carries the captured path parameters.
    Matched {
        controller: Arc<Controller>,
        path_params: HashMap<String, String>,
    },
    /// Some route matched the path but not the request method.
    MethodNotAllowed,
    /// Nothing matched the path (or a header requirement failed).
    NotFound,
}

/// Matches incoming requests to registered controllers by path, method set,
/// and header requirements, with override slots for the 404 and 405 cases.
pub struct Router {
    routes: Vec<Route>,
    not_found: Option<Arc<Controller>>,
    method_not_allowed: Option<Arc<Controller>>,
}

impl Router {
    /// Builds a router over the given routes.
    ///
    /// Routes are ordered longest path first so overlapping patterns resolve
    /// to the most specific one, e.g. `/pets/{id}` before `/pets`.
    pub fn new(mut routes: Vec<Route>) -> Self {
        routes.sort_by(|a, b| b.path.len().cmp(&a.path.len()));
        Self {
            routes,
            not_found: None,
            method_not_allowed: None,
        }
    }

    pub(crate) fn set_not_found(&mut self, controller: Arc<Controller>) {
        self.not_found = Some(controller);
    }

    pub(crate) fn set_method_not_allowed(&mut self, controller: Arc<Controller>) {
        self.method_not_allowed = Some(controller);
    }

    pub fn not_found(&self) -> Option<&Arc<Controller>> {
        self.not_found.as_ref()
    }

    pub fn method_not_allowed(&self) -> Option<&Arc<Controller>> {
        self.method_not_allowed.as_ref()
    }

    /// Resolves a request to a controller.
    ///
    /// Header names in `headers` are expected lowercased, as produced by
    /// request parsing.
    pub fn resolve(
        &self,
        method: &Method,
        path: &str,
        headers: &HashMap<String, Vec<String>>,
    ) -> Resolution {
        let mut method_mismatch = false;

        for route in &self.routes {
            let captures = match route.pattern.captures(path) {
                Some(captures) => captures,
                None => continue,
            };
            if !route.matches_method(method) {
                method_mismatch = true;
                continue;
            }
            if !route.matches_headers(headers) {
                continue;
            }

            let mut path_params = HashMap::with_capacity(route.param_names.len());
            for (i, name) in route.param_names.iter().enumerate() {
                if let Some(value) = captures.get(i + 1) {
                    path_params.insert(name.clone(), value.as_str().to_string());
                }
            }
            return Resolution::Matched {
                controller: Arc::clone(&route.controller),
                path_params,
            };
        }

        if method_mismatch {
            Resolution::MethodNotAllowed
        } else {
            Resolution::NotFound
        }
    }
}

/// Compiles a `{name}`-templated path into an anchored regex plus the ordered
/// parameter names.
pub(crate) fn path_to_regex(path: &str) -> (Regex, Vec<String>) {
    if path == "/" {
        return (
            Regex::new(r"^/$").expect("failed to compile path regex"),
            Vec::new(),
        );
    }

    let mut pattern = String::with_capacity(path.len() + 5);
    pattern.push('^');
    let mut param_names = Vec::with_capacity(path.matches('{').count());

    for segment in path.split('/') {
        if segment.starts_with('{') && segment.ends_with('}') {
            let param_name = segment
                .trim_start_matches('{')
                .trim_end_matches('}')
                .to_string();
            pattern.push_str("/([^/]+)");
            param_names.push(param_name);
        } else if !segment.is_empty() {
            pattern.push('/');
            pattern.push_str(&regex::escape(segment));
        }
    }

    pattern.push('$');
    let regex = Regex::new(&pattern).expect("failed to compile path regex");

    (regex, param_names)
}
