//! Shared location types used by the pipeline and the logging layer

pub mod span;

pub use span::{Position, Span};
