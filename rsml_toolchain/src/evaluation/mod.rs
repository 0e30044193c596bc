//! Document evaluation
//!
//! [`Evaluator`] drives the whole pipeline over a document and matches
//! canonical logic paths against a [`MachineDescriptor`](crate::machine::MachineDescriptor).
//! Special actions and middlewares are registered per evaluator instance;
//! nothing here is shared between instances.

pub mod actions;
pub mod evaluator;
pub mod matcher;
pub mod middleware;
pub mod result;

pub use actions::{ActionFailure, ActionOutcome, ActionResult, RegistrationError, SpecialActionRegistry};
pub use evaluator::{Evaluator, DEFAULT_THROW_MESSAGE};
pub use matcher::{matches, LogicPath};
pub use middleware::{MiddlewareChain, MiddlewareContext, MiddlewareHandle, MiddlewareResult};
pub use result::EvaluationResult;

use crate::compliance::{SpecificationCompliance, LANGUAGE_VERSION};

pub fn specification_compliance() -> SpecificationCompliance {
    SpecificationCompliance::full(LANGUAGE_VERSION)
}
