//! # swerve
//!
//! A filter-chain HTTP controller server for Rust, powered by the `may`
//! coroutine runtime and `may_minihttp`.
//!
//! Callers declare named endpoints ("controllers"), each bound to a URL path,
//! a set of allowed methods, required header matches, a handler, and ordered
//! chains of request/response filters that run around the handler. A
//! [`Server`] aggregates controllers, global filters, and body serializers,
//! then binds to a host:port and serves each request on its own coroutine.
//!
//! ## Modules
//!
//! - **[`server`]** - the [`Server`] aggregator, transport glue, and request
//!   parsing
//! - **[`controller`]** - controller specifications and the per-request
//!   pipeline
//! - **[`router`]** - path/method/header matching with 404/405 override slots
//! - **[`filter`]** - [`RequestFilter`], [`ResponseFilter`], and
//!   [`RequestHandler`] contracts plus closure adapters
//! - **[`serializer`]** - [`ObjectSerializer`] registry turning handler
//!   values into bytes
//! - **[`request`]** / **[`response`]** - the facades filters and handlers
//!   work with
//! - **[`context`]** - per-request scratch state for filter/handler
//!   communication
//! - **[`content_type`]** - well-known MIME constants
//!
//! ## Example
//!
//! ```no_run
//! use http::Method;
//! use swerve::{ControllerSpec, HandlerFn, JsonSerializer, Request, Response, Server};
//!
//! let ping = ControllerSpec::new(
//!     "/ping",
//!     HandlerFn(|_req: &mut Request| Some(Response::new().with_body("pong"))),
//! )
//! .for_methods([Method::GET]);
//!
//! let mut server = Server::new("0.0.0.0", 8080)
//!     .with_controllers([ping])
//!     .with_object_serializer(JsonSerializer::with_matcher(|v| v.is_object()));
//!
//! let handle = server.start().unwrap().expect("first start");
//! handle.join().unwrap();
//! ```
//!
//! ## Request lifecycle
//!
//! Global request filters run first, then controller-specific ones; the
//! first filter to return a response halts the chain and skips the handler.
//! The response then flows through controller-specific response filters and
//! finally the global ones, so global concerns wrap outermost on the way
//! out. Body resolution writes stream bodies verbatim and hands value bodies
//! to the first matching serializer. Faults never escape the pipeline: they
//! are logged and answered with best-effort error responses.

pub mod content_type;
pub mod context;
pub mod controller;
pub mod filter;
pub mod headers;
pub mod request;
pub mod response;
pub mod router;
pub mod serializer;
pub mod server;

pub use context::RequestContext;
pub use controller::{Controller, ControllerSpec, ErrorControllerSpec};
pub use filter::{
    HandlerFn, RequestFilter, RequestFilterFn, RequestHandler, ResponseFilter, ResponseFilterFn,
};
pub use headers::ResponseHeaders;
pub use request::Request;
pub use response::{Body, Response};
pub use serializer::{DefaultSerializer, JsonSerializer, ObjectSerializer};
pub use server::{AppService, HttpServer, Server, ServerHandle};
