//! Special-action registry
//!
//! Callbacks are keyed by name and invoked inline with the line's argument.
//! The public callback boundary speaks [`ActionResult`]; the byte protocol
//! (0, 1, 250, 251) survives only for coded callbacks registered from the
//! native boundary.

use crate::config::compile_time::evaluation::MAX_REGISTERED_ACTIONS;
use crate::logging::{codes, Code};
use crate::tokens::vocabulary::{self, actions};
use std::collections::HashMap;
use std::fmt;

/// What a special action asks the evaluator to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionResult {
    /// Carry on with the next line
    Continue,
    /// Fail the evaluation with an action error
    Error,
    /// End the evaluation with no match
    Stop,
    /// Drop every registered special action, then carry on
    ResetRegistry,
}

impl ActionResult {
    pub const CONTINUE_CODE: u8 = 0;
    pub const ERROR_CODE: u8 = 1;
    pub const STOP_CODE: u8 = 250;
    pub const RESET_REGISTRY_CODE: u8 = 251;

    /// Decode the byte protocol; unknown codes are returned as the error
    pub fn from_code(code: u8) -> Result<Self, u8> {
        match code {
            Self::CONTINUE_CODE => Ok(ActionResult::Continue),
            Self::ERROR_CODE => Ok(ActionResult::Error),
            Self::STOP_CODE => Ok(ActionResult::Stop),
            Self::RESET_REGISTRY_CODE => Ok(ActionResult::ResetRegistry),
            other => Err(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            ActionResult::Continue => Self::CONTINUE_CODE,
            ActionResult::Error => Self::ERROR_CODE,
            ActionResult::Stop => Self::STOP_CODE,
            ActionResult::ResetRegistry => Self::RESET_REGISTRY_CODE,
        }
    }
}

/// Failure reported by a callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionFailure {
    /// The callback raised an error with a message
    Raised(String),
    /// A coded callback returned a byte outside the protocol
    UnrecognizedCode(u8),
}

pub type ActionOutcome = Result<ActionResult, ActionFailure>;

type Callback = Box<dyn FnMut(&str) -> ActionOutcome + Send>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("'{name}' is a built-in special action and cannot be registered")]
    ReservedName { name: String },

    #[error("'{name}' is not a valid special action name")]
    InvalidName { name: String },

    #[error("At most {limit} special actions can be registered")]
    RegistryFull { limit: usize },

    #[error("At most {limit} middlewares can be bound")]
    MiddlewareLimit { limit: usize },
}

impl RegistrationError {
    pub fn error_code(&self) -> Code {
        codes::evaluation::REGISTRATION_REJECTED
    }
}

#[derive(Default)]
pub struct SpecialActionRegistry {
    callbacks: HashMap<String, Callback>,
}

impl SpecialActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the callback for `name`
    pub fn register<F>(&mut self, name: &str, callback: F) -> Result<(), RegistrationError>
    where
        F: FnMut(&str) -> ActionOutcome + Send + 'static,
    {
        if actions::is_built_in(name) {
            return Err(RegistrationError::ReservedName {
                name: name.to_string(),
            });
        }
        if !vocabulary::is_well_formed_action_name(name) {
            return Err(RegistrationError::InvalidName {
                name: name.to_string(),
            });
        }
        if !self.callbacks.contains_key(name) && self.callbacks.len() >= MAX_REGISTERED_ACTIONS {
            return Err(RegistrationError::RegistryFull {
                limit: MAX_REGISTERED_ACTIONS,
            });
        }

        self.callbacks.insert(name.to_string(), Box::new(callback));
        Ok(())
    }

    pub fn unregister(&mut self, name: &str) -> bool {
        self.callbacks.remove(name).is_some()
    }

    /// Run the callback for `name`; `None` when nothing is registered
    pub fn invoke(&mut self, name: &str, argument: &str) -> Option<ActionOutcome> {
        self.callbacks
            .get_mut(name)
            .map(|callback| callback(argument))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.callbacks.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    pub fn clear(&mut self) {
        self.callbacks.clear();
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.callbacks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for SpecialActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecialActionRegistry")
            .field("names", &self.names())
            .finish()
    }
}
