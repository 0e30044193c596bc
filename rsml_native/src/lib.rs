//! # RSML native layer
//!
//! C ABI exports over `rsml_toolchain` (built as a `cdylib`) and host machine
//! probing for evaluating documents against the running machine.
//!
//! With the `logging` feature, failures and probe results are also reported
//! through the `log` facade in addition to the toolchain's coded logging.

macro_rules! facade_debug {
    ($($arg:tt)+) => {
        #[cfg(feature = "logging")]
        log::debug!($($arg)+);
    };
}
pub(crate) use facade_debug;

pub mod ffi;
pub mod host;

pub use ffi::{FfiError, RsmlLine, RsmlMachine, RsmlToken};
pub use host::{detect, HostError, HostProbe};

pub mod prelude {
    pub use crate::ffi::handle::{RsmlEvaluator, RsmlSpecialActionCallback};
    pub use crate::ffi::metadata::API_VERSION;
    pub use crate::host::{detect, CommandRunner, HostError, HostProbe, OsRelease};
    pub use rsml_toolchain::{EvaluationResult, Evaluator, MachineDescriptor, RsmlError};
}
