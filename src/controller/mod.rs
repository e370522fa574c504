//! Controllers: the per-endpoint request pipeline and the specifications
//! that describe them.

mod pipeline;
mod spec;

pub use pipeline::Controller;
pub use spec::{ControllerSpec, ErrorControllerSpec};
