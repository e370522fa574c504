//! HTTP server: aggregator, transport service, and raw request/response
//! plumbing.

mod http_server;
pub mod request;
pub(crate) mod response;
#[allow(clippy::module_inception)]
mod server;
mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use server::Server;
pub use service::AppService;
