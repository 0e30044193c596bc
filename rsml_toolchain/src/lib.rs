//! RSML toolchain
//!
//! Lexer, normalizer, validator and evaluator for RSML, the line-oriented
//! language that maps operating system, version and architecture to a
//! return value:
//!
//! ```text
//! # pick a runtime build
//! !> osx < 11 any "macOS 10 is not supported"
//! -> ubuntu arm64 "linux-arm64"
//! -> windows >= 10 x64 "win-x64"
//! -> "portable"
//! ```
//!
//! [`evaluation::Evaluator`] is the main entry point; [`pipeline`] adds
//! checking and formatting passes for tooling.

// Internal modules
pub mod compliance;
pub mod config;
pub mod cursor;
pub mod evaluation;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod machine;
pub mod normalizer;
pub mod pipeline;
pub mod tokens;
pub mod utils;
pub mod validation;

// Re-export key types for library consumers
pub use compliance::{LANGUAGE_VERSION, SpecificationCompliance};
pub use evaluation::{ActionResult, EvaluationResult, Evaluator, MiddlewareContext, MiddlewareResult};
pub use machine::MachineDescriptor;
pub use pipeline::{RsmlError, SyntaxError};
