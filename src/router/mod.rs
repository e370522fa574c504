//! Request-to-controller matching.

mod router;

pub use router::{Resolution, Route, Router};
