//! Controller pipeline: filter chains, handler invocation, and body
//! resolution for one matched request.

use std::io::Read;
use std::sync::Arc;

use may_minihttp::Response as HttpResponse;
use tracing::{debug, error, trace};

use crate::content_type;
use crate::filter::{RequestFilter, RequestHandler, ResponseFilter};
use crate::request::Request;
use crate::response::{Body, Response};
use crate::serializer::{DefaultSerializer, ObjectSerializer};
use crate::server::response::{apply_header, status_reason};

/// A built controller: the composed filter chains, the handler, and the
/// serializer registry for one registered endpoint.
///
/// Controllers are assembled by [`Server::start`](crate::server::Server) and
/// shared read-only between all concurrent requests. Every request runs the
/// same fixed sequence: request filters, handler, response filters, body
/// resolution. No fault in any stage escapes to the transport; contract
/// violations become synthetic 500 responses and I/O faults are logged.
pub struct Controller {
    name: String,
    request_filters: Vec<Arc<dyn RequestFilter>>,
    response_filters: Vec<Arc<dyn ResponseFilter>>,
    handler: Arc<dyn RequestHandler>,
    serializers: Vec<Arc<dyn ObjectSerializer>>,
}

impl Controller {
    pub(crate) fn new(
        name: String,
        request_filters: Vec<Arc<dyn RequestFilter>>,
        response_filters: Vec<Arc<dyn ResponseFilter>>,
        handler: Arc<dyn RequestHandler>,
        serializers: Vec<Arc<dyn ObjectSerializer>>,
    ) -> Self {
        Self {
            name,
            request_filters,
            response_filters,
            handler,
            serializers,
        }
    }

    /// Runs the full pipeline for one matched request and writes the outcome
    /// to the transport response.
    pub fn handle(&self, request: &mut Request, out: &mut HttpResponse) {
        let response = self.invoke(request);
        self.write(response, out);
    }

    /// Runs the filter chains and the handler, producing the final response
    /// that will be resolved onto the wire.
    ///
    /// Request filters run first, in order; the first one returning a
    /// response short-circuits the chain and skips the handler. The response
    /// then passes through every response filter in order, regardless of what
    /// earlier filters returned.
    pub fn invoke(&self, request: &mut Request) -> Response {
        trace!(controller = %self.name, "accepted request");

        let mut short_circuit = None;
        for filter in &self.request_filters {
            if let Some(response) = filter.filter_request(request) {
                trace!(controller = %self.name, "request filter halted the chain");
                short_circuit = Some(response);
                break;
            }
        }

        let response = match short_circuit {
            Some(response) => response,
            None => {
                trace!(controller = %self.name, "processed request filters, moving to request handler");
                match self.handler.handle_request(request) {
                    Some(response) => response,
                    None => {
                        error!(controller = %self.name, "handler did not return a response");
                        Response::internal_error(
                            "request handler did not return a response, returning 500 error",
                        )
                    }
                }
            }
        };

        self.filter_response(request, response)
    }

    fn filter_response(&self, request: &mut Request, mut response: Response) -> Response {
        debug!(controller = %self.name, "handling response");
        for filter in &self.response_filters {
            response = match filter.filter_response(request, response) {
                Some(response) => response,
                None => {
                    error!(
                        controller = %self.name,
                        "response filter did not return a response object, returning 500 error"
                    );
                    Response::internal_error("response filter did not return a response")
                }
            };
        }
        response
    }

    /// Resolves the final response into status, headers, and body bytes on
    /// the transport.
    fn write(&self, response: Response, out: &mut HttpResponse) {
        let (code, body, headers) = response.into_parts();

        // Apply response headers, remembering whether a Content-Type was set
        // explicitly so a serializer cannot override it later.
        let mut content_type_set = false;
        headers.for_each(|name, values| {
            for value in values {
                if name.eq_ignore_ascii_case(content_type::HEADER_CONTENT_TYPE) {
                    content_type_set = true;
                }
                apply_header(out, name, value);
            }
        });

        debug!(controller = %self.name, "processing response body");

        match body {
            Body::Empty => {
                out.status_code(code as usize, status_reason(code));
                trace!(controller = %self.name, "response body was empty, returning status only");
            }
            Body::Reader(mut reader) => {
                trace!(controller = %self.name, "response body is a byte stream");
                out.status_code(code as usize, status_reason(code));
                let mut buf = Vec::new();
                if let Err(err) = reader.read_to_end(&mut buf) {
                    // The status is already committed; send whatever was read.
                    error!(
                        controller = %self.name,
                        error = %err,
                        "failed to copy body stream to response writer"
                    );
                }
                out.body_vec(buf);
                // Dropping the reader here releases the stream exactly once.
            }
            Body::Value(value) => {
                let serializer: &dyn ObjectSerializer = match self
                    .serializers
                    .iter()
                    .find(|s| s.matches(&value))
                {
                    Some(serializer) => serializer.as_ref(),
                    None => &DefaultSerializer,
                };

                if !content_type_set {
                    apply_header(
                        out,
                        content_type::HEADER_CONTENT_TYPE,
                        serializer.content_type(),
                    );
                }

                out.status_code(code as usize, status_reason(code));

                match serializer.serialize(&value) {
                    Ok(bytes) => out.body_vec(bytes),
                    Err(err) => {
                        error!(
                            controller = %self.name,
                            error = %err,
                            "response body serialization failed"
                        );
                        // The transport buffers the response until this call
                        // returns, so the downgraded status replaces the one
                        // set above. An already applied Content-Type header
                        // line cannot be withdrawn and may end up duplicated.
                        out.status_code(500, status_reason(500));
                        apply_header(
                            out,
                            content_type::HEADER_CONTENT_TYPE,
                            content_type::TEXT_PLAIN,
                        );
                        out.body_vec(b"response body serialization failed!".to_vec());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{HandlerFn, RequestFilterFn, ResponseFilterFn};
    use crate::server::request::ParsedRequest;
    use http::Method;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_request() -> Request {
        Request::new(Method::GET, ParsedRequest::default(), HashMap::new())
    }

    fn pong_handler() -> Arc<dyn RequestHandler> {
        Arc::new(HandlerFn(|_req: &mut Request| {
            Some(Response::new().with_body("pong"))
        }))
    }

    fn controller(
        request_filters: Vec<Arc<dyn RequestFilter>>,
        response_filters: Vec<Arc<dyn ResponseFilter>>,
        handler: Arc<dyn RequestHandler>,
    ) -> Controller {
        Controller::new(
            "/test".to_string(),
            request_filters,
            response_filters,
            handler,
            Vec::new(),
        )
    }

    #[test]
    fn test_handler_response_passes_through() {
        let c = controller(Vec::new(), Vec::new(), pong_handler());
        let response = c.invoke(&mut test_request());
        assert_eq!(response.code(), 200);
        match response.body() {
            Body::Value(v) => assert_eq!(v, &json!("pong")),
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn test_request_filter_short_circuit_skips_handler() {
        static HANDLER_CALLS: AtomicUsize = AtomicUsize::new(0);
        static SECOND_FILTER_CALLS: AtomicUsize = AtomicUsize::new(0);

        let halting: Arc<dyn RequestFilter> = Arc::new(RequestFilterFn(|_req: &mut Request| {
            Some(Response::new().with_code(401))
        }));
        let second: Arc<dyn RequestFilter> = Arc::new(RequestFilterFn(|_req: &mut Request| {
            SECOND_FILTER_CALLS.fetch_add(1, Ordering::SeqCst);
            None
        }));
        let handler: Arc<dyn RequestHandler> = Arc::new(HandlerFn(|_req: &mut Request| {
            HANDLER_CALLS.fetch_add(1, Ordering::SeqCst);
            Some(Response::new())
        }));

        let c = controller(vec![halting, second], Vec::new(), handler);
        let response = c.invoke(&mut test_request());
        assert_eq!(response.code(), 401);
        assert_eq!(HANDLER_CALLS.load(Ordering::SeqCst), 0);
        assert_eq!(SECOND_FILTER_CALLS.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_request_filters_run_in_order() {
        let first: Arc<dyn RequestFilter> = Arc::new(RequestFilterFn(|req: &mut Request| {
            req.context_mut().put("order", vec!["first".to_string()]);
            None
        }));
        let second: Arc<dyn RequestFilter> = Arc::new(RequestFilterFn(|req: &mut Request| {
            let mut order: Vec<String> = req.context_mut().take("order").unwrap();
            order.push("second".to_string());
            req.context_mut().put("order", order);
            None
        }));
        let handler: Arc<dyn RequestHandler> = Arc::new(HandlerFn(|req: &mut Request| {
            let order = req.context().get::<Vec<String>>("order").unwrap();
            Some(Response::new().with_body(json!(order)))
        }));

        let c = controller(vec![first, second], Vec::new(), handler);
        let response = c.invoke(&mut test_request());
        match response.body() {
            Body::Value(v) => assert_eq!(v, &json!(["first", "second"])),
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn test_missing_handler_response_becomes_500() {
        let handler: Arc<dyn RequestHandler> =
            Arc::new(HandlerFn(|_req: &mut Request| None));
        let c = controller(Vec::new(), Vec::new(), handler);
        let response = c.invoke(&mut test_request());
        assert_eq!(response.code(), 500);
        assert!(matches!(response.body(), Body::Reader(_)));
    }

    #[test]
    fn test_response_filters_all_run_after_substitution() {
        // First filter violates its contract; the second must still run and
        // observe the substituted 500 response.
        let broken: Arc<dyn ResponseFilter> =
            Arc::new(ResponseFilterFn(|_req: &mut Request, _res: Response| None));
        let tagging: Arc<dyn ResponseFilter> =
            Arc::new(ResponseFilterFn(|_req: &mut Request, res: Response| {
                Some(res.with_header("X-Tag", "ran"))
            }));

        let c = controller(Vec::new(), vec![broken, tagging], pong_handler());
        let response = c.invoke(&mut test_request());
        assert_eq!(response.code(), 500);
        assert_eq!(response.headers().get_first("X-Tag"), Some("ran"));
    }

    #[test]
    fn test_response_filters_run_even_when_filter_halted_request() {
        let halting: Arc<dyn RequestFilter> = Arc::new(RequestFilterFn(|_req: &mut Request| {
            Some(Response::new().with_code(401))
        }));
        let tagging: Arc<dyn ResponseFilter> =
            Arc::new(ResponseFilterFn(|_req: &mut Request, res: Response| {
                Some(res.with_header("X-Tag", "ran"))
            }));

        let c = controller(vec![halting], vec![tagging], pong_handler());
        let response = c.invoke(&mut test_request());
        assert_eq!(response.code(), 401);
        assert_eq!(response.headers().get_first("X-Tag"), Some("ran"));
    }

    #[test]
    fn test_response_filter_may_replace_response() {
        let replacing: Arc<dyn ResponseFilter> =
            Arc::new(ResponseFilterFn(|_req: &mut Request, _res: Response| {
                Some(Response::new().with_code(204))
            }));
        let c = controller(Vec::new(), vec![replacing], pong_handler());
        let response = c.invoke(&mut test_request());
        assert_eq!(response.code(), 204);
    }
}
