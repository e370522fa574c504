//! The `may_minihttp` service adapter: parses raw requests, resolves them
//! through the router, and runs the matched controller pipeline.

use std::collections::HashMap;
use std::io;
use std::sync::Arc;

use http::Method;
use may_minihttp::{HttpService, Request as RawRequest, Response as RawResponse};
use serde_json::json;
use tracing::debug;

use super::request::parse_request;
use super::response::write_json_error;
use crate::request::Request;
use crate::router::{Resolution, Router};

/// The service handed to the transport; one clone serves each connection.
///
/// Holds only the immutable router assembled at server start, so cloning is a
/// single `Arc` bump and no state is shared mutably between connections.
#[derive(Clone)]
pub struct AppService {
    router: Arc<Router>,
}

impl AppService {
    pub fn new(router: Arc<Router>) -> Self {
        Self { router }
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: RawRequest, res: &mut RawResponse) -> io::Result<()> {
        let parsed = parse_request(req);
        let path = parsed.path.clone();

        let method = match parsed.method.parse::<Method>() {
            Ok(method) => method,
            Err(_) => {
                write_json_error(res, 400, json!({ "error": "Bad Request" }));
                return Ok(());
            }
        };

        match self.router.resolve(&method, &path, &parsed.headers) {
            Resolution::Matched {
                controller,
                path_params,
            } => {
                let mut request = Request::new(method, parsed, path_params);
                controller.handle(&mut request, res);
            }
            Resolution::NotFound => match self.router.not_found() {
                Some(controller) => {
                    debug!(path = %path, "running custom 404 controller");
                    let mut request = Request::new(method, parsed, HashMap::new());
                    controller.handle(&mut request, res);
                }
                None => {
                    write_json_error(
                        res,
                        404,
                        json!({ "error": "Not Found", "method": method.as_str(), "path": path }),
                    );
                }
            },
            Resolution::MethodNotAllowed => match self.router.method_not_allowed() {
                Some(controller) => {
                    debug!(path = %path, "running custom 405 controller");
                    let mut request = Request::new(method, parsed, HashMap::new());
                    controller.handle(&mut request, res);
                }
                None => {
                    write_json_error(
                        res,
                        405,
                        json!({
                            "error": "Method Not Allowed",
                            "method": method.as_str(),
                            "path": path
                        }),
                    );
                }
            },
        }

        Ok(())
    }
}
