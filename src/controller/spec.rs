//! Declarative controller specifications consumed at server start.

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;

use crate::filter::{RequestFilter, RequestHandler, ResponseFilter};

/// Describes one endpoint: a path, the methods and headers it matches, its
/// handler, and its controller-scoped filter chains.
///
/// Built fluently before the server starts and consumed exactly once by
/// [`Server::start`](crate::server::Server::start), which composes it with
/// the server's global filters into a registered
/// [`Controller`](crate::controller::Controller).
///
/// ```
/// use http::Method;
/// use swerve::{ControllerSpec, HandlerFn, Request, Response};
///
/// let spec = ControllerSpec::new(
///     "/pets/{id}",
///     HandlerFn(|req: &mut Request| {
///         let id = req.path_param("id")?.to_string();
///         Some(Response::new().with_body(id))
///     }),
/// )
/// .for_methods([Method::GET])
/// .with_required_header("X-Api-Version", "2");
/// assert_eq!(spec.path(), "/pets/{id}");
/// ```
pub struct ControllerSpec {
    pub(crate) path: String,
    pub(crate) methods: Vec<Method>,
    pub(crate) required_headers: HashMap<String, String>,
    pub(crate) request_filters: Vec<Arc<dyn RequestFilter>>,
    pub(crate) response_filters: Vec<Arc<dyn ResponseFilter>>,
    pub(crate) handler: Arc<dyn RequestHandler>,
}

impl ControllerSpec {
    /// Creates a specification for the given path and handler.
    ///
    /// The path may contain `{name}` segments which are captured as path
    /// parameters. An empty path is a configuration fault detected at server
    /// start.
    pub fn new(path: impl Into<String>, handler: impl RequestHandler + 'static) -> Self {
        Self {
            path: path.into(),
            methods: Vec::new(),
            required_headers: HashMap::new(),
            request_filters: Vec::new(),
            response_filters: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    /// Restricts the controller to the given HTTP methods.
    ///
    /// Methods accumulate across calls. With no methods set, the controller
    /// matches any method.
    pub fn for_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods.extend(methods);
        self
    }

    /// Requires the named header to be present for this controller to match.
    ///
    /// An empty expected value matches any value of the header; a non-empty
    /// value requires an exact match. Setting the same header again replaces
    /// its expectation.
    pub fn with_required_header(
        mut self,
        header: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.required_headers.insert(header.into(), value.into());
        self
    }

    /// Appends one controller-specific request filter.
    pub fn with_request_filter(mut self, filter: impl RequestFilter + 'static) -> Self {
        self.request_filters.push(Arc::new(filter));
        self
    }

    /// Appends controller-specific request filters, applied after the global
    /// request filters set on the server.
    pub fn with_request_filters(
        mut self,
        filters: impl IntoIterator<Item = Arc<dyn RequestFilter>>,
    ) -> Self {
        self.request_filters.extend(filters);
        self
    }

    /// Appends one controller-specific response filter.
    pub fn with_response_filter(mut self, filter: impl ResponseFilter + 'static) -> Self {
        self.response_filters.push(Arc::new(filter));
        self
    }

    /// Appends controller-specific response filters, applied before the
    /// global response filters set on the server.
    pub fn with_response_filters(
        mut self,
        filters: impl IntoIterator<Item = Arc<dyn ResponseFilter>>,
    ) -> Self {
        self.response_filters.extend(filters);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn required_headers(&self) -> &HashMap<String, String> {
        &self.required_headers
    }
}

/// A reduced specification used for the 404 and 405 error controllers.
///
/// Error controllers have no path or matching rules of their own; the router
/// invokes them when no registered controller matches. Whether the server's
/// global filters wrap them is decided per registration via the flag on
/// [`Server::with_not_found`](crate::server::Server::with_not_found) and
/// [`Server::with_method_not_allowed`](crate::server::Server::with_method_not_allowed).
pub struct ErrorControllerSpec {
    pub(crate) request_filters: Vec<Arc<dyn RequestFilter>>,
    pub(crate) response_filters: Vec<Arc<dyn ResponseFilter>>,
    pub(crate) handler: Arc<dyn RequestHandler>,
}

impl ErrorControllerSpec {
    pub fn new(handler: impl RequestHandler + 'static) -> Self {
        Self {
            request_filters: Vec::new(),
            response_filters: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    pub fn with_request_filter(mut self, filter: impl RequestFilter + 'static) -> Self {
        self.request_filters.push(Arc::new(filter));
        self
    }

    pub fn with_request_filters(
        mut self,
        filters: impl IntoIterator<Item = Arc<dyn RequestFilter>>,
    ) -> Self {
        self.request_filters.extend(filters);
        self
    }

    pub fn with_response_filter(mut self, filter: impl ResponseFilter + 'static) -> Self {
        self.response_filters.push(Arc::new(filter));
        self
    }

    pub fn with_response_filters(
        mut self,
        filters: impl IntoIterator<Item = Arc<dyn ResponseFilter>>,
    ) -> Self {
        self.response_filters.extend(filters);
        self
    }
}
