//! Server aggregator: collects controllers, global filters, and serializers,
//! then composes and starts the routing service.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, trace, warn};

use super::http_server::{HttpServer, ServerHandle};
use super::service::AppService;
use crate::controller::{Controller, ControllerSpec, ErrorControllerSpec};
use crate::filter::{RequestFilter, ResponseFilter};
use crate::router::{Route, Router};
use crate::serializer::ObjectSerializer;

/// Aggregates controllers, global filters, and serializers, and serves them
/// over HTTP once started.
///
/// A server is a two-state machine: everything is registered while unstarted,
/// then [`start`](Self::start) composes each controller's pipeline (global
/// request filters before controller-specific ones; controller-specific
/// response filters before global ones), registers the routes, releases the
/// registration state, and binds the listener. Registration on a started
/// server is a fatal configuration error; starting twice is a logged no-op.
///
/// ```no_run
/// use swerve::{ControllerSpec, HandlerFn, Request, Response, Server};
///
/// let mut server = Server::new("127.0.0.1", 8080).with_controllers([ControllerSpec::new(
///     "/ping",
///     HandlerFn(|_req: &mut Request| Some(Response::new().with_body("pong"))),
/// )]);
/// let handle = server.start().unwrap().expect("first start");
/// handle.join().unwrap();
/// ```
pub struct Server {
    host: String,
    port: u16,
    read_timeout: Duration,
    write_timeout: Duration,
    started: bool,
    request_filters: Vec<Arc<dyn RequestFilter>>,
    response_filters: Vec<Arc<dyn ResponseFilter>>,
    serializers: Vec<Arc<dyn ObjectSerializer>>,
    controllers: Vec<ControllerSpec>,
    not_found: Option<(bool, ErrorControllerSpec)>,
    method_not_allowed: Option<(bool, ErrorControllerSpec)>,
}

impl Server {
    /// Creates an unstarted server that will bind `host:port`.
    ///
    /// Read and write timeouts default to 30 seconds.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            read_timeout: Duration::from_secs(30),
            write_timeout: Duration::from_secs(30),
            started: false,
            request_filters: Vec::new(),
            response_filters: Vec::new(),
            serializers: Vec::new(),
            controllers: Vec::new(),
            not_found: None,
            method_not_allowed: None,
        }
    }

    fn refuse_if_started(&self, what: &str) {
        if self.started {
            error!("cannot add {what} to a server after it has started");
            panic!("cannot add {what} to a server after it has started");
        }
    }

    // Timeouts ////////////////////////////////////////////////////////////

    /// Sets the connection read timeout (default 30 seconds).
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Sets the connection write timeout (default 30 seconds).
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    // Registration ////////////////////////////////////////////////////////

    /// Adds controller specifications to be built at start.
    pub fn with_controllers(
        mut self,
        controllers: impl IntoIterator<Item = ControllerSpec>,
    ) -> Self {
        self.refuse_if_started("controllers");
        self.controllers.extend(controllers);
        self
    }

    /// Appends one global request filter.
    pub fn with_request_filter(mut self, filter: impl RequestFilter + 'static) -> Self {
        self.refuse_if_started("request filters");
        self.request_filters.push(Arc::new(filter));
        self
    }

    /// Appends global request filters, applied to every controller before
    /// its controller-specific request filters.
    pub fn with_request_filters(
        mut self,
        filters: impl IntoIterator<Item = Arc<dyn RequestFilter>>,
    ) -> Self {
        self.refuse_if_started("request filters");
        self.request_filters.extend(filters);
        self
    }

    /// Appends one global response filter.
    pub fn with_response_filter(mut self, filter: impl ResponseFilter + 'static) -> Self {
        self.refuse_if_started("response filters");
        self.response_filters.push(Arc::new(filter));
        self
    }

    /// Appends global response filters, applied to every controller after
    /// its controller-specific response filters.
    pub fn with_response_filters(
        mut self,
        filters: impl IntoIterator<Item = Arc<dyn ResponseFilter>>,
    ) -> Self {
        self.refuse_if_started("response filters");
        self.response_filters.extend(filters);
        self
    }

    /// Appends one object serializer to the registry.
    pub fn with_object_serializer(mut self, serializer: impl ObjectSerializer + 'static) -> Self {
        self.refuse_if_started("object serializers");
        self.serializers.push(Arc::new(serializer));
        self
    }

    /// Appends object serializers, tested against value bodies in
    /// registration order; the first match wins.
    pub fn with_object_serializers(
        mut self,
        serializers: impl IntoIterator<Item = Arc<dyn ObjectSerializer>>,
    ) -> Self {
        self.refuse_if_started("object serializers");
        self.serializers.extend(serializers);
        self
    }

    /// Registers the controller run when no route matches a request path.
    ///
    /// With `use_global_filters` set, the server's global filter chains wrap
    /// this controller like any other.
    pub fn with_not_found(mut self, use_global_filters: bool, spec: ErrorControllerSpec) -> Self {
        self.refuse_if_started("error controllers");
        self.not_found = Some((use_global_filters, spec));
        self
    }

    /// Registers the controller run when a route matches the path but not
    /// the request method.
    pub fn with_method_not_allowed(
        mut self,
        use_global_filters: bool,
        spec: ErrorControllerSpec,
    ) -> Self {
        self.refuse_if_started("error controllers");
        self.method_not_allowed = Some((use_global_filters, spec));
        self
    }

    // Startup /////////////////////////////////////////////////////////////

    /// Composes all registered controllers and binds the listener.
    ///
    /// Returns the handle to the running server, or `None` if the server was
    /// already started (a second start is a logged no-op). Registration
    /// state is released only once the listener is up; a bind/listen failure
    /// is returned as an error and leaves the server unstarted and fully
    /// registered, so `start` may be retried.
    ///
    /// # Panics
    ///
    /// Panics on configuration faults: no controllers registered, or a
    /// controller with an empty path.
    pub fn start(&mut self) -> io::Result<Option<ServerHandle>> {
        if self.started {
            warn!("attempted to start a server instance more than once, ignoring");
            return Ok(None);
        }

        if self.controllers.is_empty() {
            error!("attempted to start a server with no controllers registered");
            panic!("attempted to start a server with no controllers registered");
        }

        debug!("building controllers");
        let mut routes = Vec::with_capacity(self.controllers.len());
        for spec in &self.controllers {
            if spec.path.is_empty() {
                error!("controller has an empty path");
                panic!("controller has an empty path");
            }
            trace!(path = %spec.path, "building controller");

            let mut request_filters = self.request_filters.clone();
            request_filters.extend(spec.request_filters.iter().cloned());
            let mut response_filters = spec.response_filters.clone();
            response_filters.extend(self.response_filters.iter().cloned());

            let controller = Arc::new(Controller::new(
                spec.path.clone(),
                request_filters,
                response_filters,
                Arc::clone(&spec.handler),
                self.serializers.clone(),
            ));
            routes.push(Route::new(
                spec.path.clone(),
                spec.methods.clone(),
                spec.required_headers.clone(),
                controller,
            ));
        }

        let mut router = Router::new(routes);
        if let Some((use_globals, spec)) = &self.not_found {
            debug!("registering custom 404 handler");
            router.set_not_found(self.build_error_controller(*use_globals, spec, 404));
        }
        if let Some((use_globals, spec)) = &self.method_not_allowed {
            debug!("registering custom 405 handler");
            router.set_method_not_allowed(self.build_error_controller(*use_globals, spec, 405));
        }

        let addr = format!("{}:{}", self.host, self.port);
        debug!(
            addr = %addr,
            read_timeout = ?self.read_timeout,
            write_timeout = ?self.write_timeout,
            "starting server"
        );

        let handle = HttpServer(AppService::new(Arc::new(router))).start(addr.as_str())?;

        self.clear();
        self.started = true;
        Ok(Some(handle))
    }

    fn build_error_controller(
        &self,
        use_globals: bool,
        spec: &ErrorControllerSpec,
        code: u16,
    ) -> Arc<Controller> {
        let (request_filters, response_filters) = if use_globals {
            let mut request_filters = self.request_filters.clone();
            request_filters.extend(spec.request_filters.iter().cloned());
            let mut response_filters = spec.response_filters.clone();
            response_filters.extend(self.response_filters.iter().cloned());
            (request_filters, response_filters)
        } else {
            (spec.request_filters.clone(), spec.response_filters.clone())
        };

        Arc::new(Controller::new(
            code.to_string(),
            request_filters,
            response_filters,
            Arc::clone(&spec.handler),
            self.serializers.clone(),
        ))
    }

    /// Releases registration-time state; the running router holds its own
    /// copies.
    fn clear(&mut self) {
        self.request_filters = Vec::new();
        self.response_filters = Vec::new();
        self.serializers = Vec::new();
        self.controllers = Vec::new();
        self.not_found = None;
        self.method_not_allowed = None;
    }

    pub fn started(&self) -> bool {
        self.started
    }
}

// Convenience for registering plain closures without naming the adapter
// types at every call site.
impl Server {
    /// Appends one global request filter given as a closure.
    pub fn with_request_filter_fn<F>(self, filter: F) -> Self
    where
        F: Fn(&mut crate::request::Request) -> Option<crate::response::Response>
            + Send
            + Sync
            + 'static,
    {
        self.with_request_filter(crate::filter::RequestFilterFn(filter))
    }

    /// Registers a `/path` controller from a bare handler closure.
    pub fn with_handler_fn<F>(self, path: &str, handler: F) -> Self
    where
        F: Fn(&mut crate::request::Request) -> Option<crate::response::Response>
            + Send
            + Sync
            + 'static,
    {
        let spec = ControllerSpec::new(path, crate::filter::HandlerFn(handler));
        self.with_controllers([spec])
    }
}
