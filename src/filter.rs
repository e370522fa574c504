//! Filter and handler contracts that make up a controller's pipeline.

use crate::request::Request;
use crate::response::Response;

/// A filter applied to incoming requests before the handler runs.
///
/// Request filters run in registration order, with the server's global
/// filters applied before controller-specific ones. A filter may mutate the
/// request's [`RequestContext`](crate::context::RequestContext), or halt
/// processing by returning `Some(response)` — in that case no further request
/// filters run, the handler is skipped, and the returned response goes
/// straight to the response-filter chain.
pub trait RequestFilter: Send + Sync {
    fn filter_request(&self, request: &mut Request) -> Option<Response>;
}

/// A filter applied to outgoing responses after the handler (or a
/// short-circuiting request filter) has produced one.
///
/// Response filters run in registration order, with controller-specific
/// filters applied before the server's global ones. Every filter in the chain
/// runs regardless of what earlier filters returned.
///
/// A response filter is expected to always return a response. Returning
/// `None` makes the server substitute a 500 error response and continue with
/// the remaining filters.
pub trait ResponseFilter: Send + Sync {
    fn filter_response(&self, request: &mut Request, response: Response) -> Option<Response>;
}

/// The core of a controller: turns a matched request into a response.
///
/// A handler is expected to always return a response. Returning `None` makes
/// the server respond with a 500 error.
pub trait RequestHandler: Send + Sync {
    fn handle_request(&self, request: &mut Request) -> Option<Response>;
}

/// Adapts a plain function or closure into a [`RequestFilter`].
pub struct RequestFilterFn<F>(pub F);

impl<F> RequestFilter for RequestFilterFn<F>
where
    F: Fn(&mut Request) -> Option<Response> + Send + Sync,
{
    fn filter_request(&self, request: &mut Request) -> Option<Response> {
        (self.0)(request)
    }
}

/// Adapts a plain function or closure into a [`ResponseFilter`].
pub struct ResponseFilterFn<F>(pub F);

impl<F> ResponseFilter for ResponseFilterFn<F>
where
    F: Fn(&mut Request, Response) -> Option<Response> + Send + Sync,
{
    fn filter_response(&self, request: &mut Request, response: Response) -> Option<Response> {
        (self.0)(request, response)
    }
}

/// Adapts a plain function or closure into a [`RequestHandler`].
pub struct HandlerFn<F>(pub F);

impl<F> RequestHandler for HandlerFn<F>
where
    F: Fn(&mut Request) -> Option<Response> + Send + Sync,
{
    fn handle_request(&self, request: &mut Request) -> Option<Response> {
        (self.0)(request)
    }
}
