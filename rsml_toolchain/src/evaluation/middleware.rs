//! Middleware hooks run after validation and before dispatch

use super::actions::RegistrationError;
use crate::config::compile_time::evaluation::MAX_BOUND_MIDDLEWARES;
use crate::tokens::Line;

/// What a middleware sees for each non-blank line
#[derive(Debug, Clone, Copy)]
pub struct MiddlewareContext<'a> {
    /// Byte offset of the line within the document
    pub offset: usize,
    /// One-based line number
    pub line_number: usize,
    /// Validated, canonical tokens without the trailing `Eol`
    pub line: &'a Line,
    /// Raw text of the line; token ranges index into it
    pub text: &'a str,
}

impl MiddlewareContext<'_> {
    pub fn token_text(&self, index: usize) -> &str {
        self.line
            .get(index)
            .map(|token| token.text(self.text))
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiddlewareResult {
    Continue,
    /// Stop the whole evaluation with no match
    End,
}

/// Identifies a bound middleware for [`MiddlewareChain::unbind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MiddlewareHandle(u64);

type Middleware = Box<dyn FnMut(&MiddlewareContext<'_>) -> MiddlewareResult + Send>;

#[derive(Default)]
pub struct MiddlewareChain {
    bound: Vec<(MiddlewareHandle, Middleware)>,
    next_handle: u64,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind<F>(&mut self, middleware: F) -> Result<MiddlewareHandle, RegistrationError>
    where
        F: FnMut(&MiddlewareContext<'_>) -> MiddlewareResult + Send + 'static,
    {
        if self.bound.len() >= MAX_BOUND_MIDDLEWARES {
            return Err(RegistrationError::MiddlewareLimit {
                limit: MAX_BOUND_MIDDLEWARES,
            });
        }
        let handle = MiddlewareHandle(self.next_handle);
        self.next_handle += 1;
        self.bound.push((handle, Box::new(middleware)));
        Ok(handle)
    }

    pub fn unbind(&mut self, handle: MiddlewareHandle) -> bool {
        let before = self.bound.len();
        self.bound.retain(|(bound, _)| *bound != handle);
        self.bound.len() != before
    }

    /// Run in binding order; stops at the first `End`
    pub fn run(&mut self, context: &MiddlewareContext<'_>) -> MiddlewareResult {
        for (_, middleware) in self.bound.iter_mut() {
            if middleware(context) == MiddlewareResult::End {
                return MiddlewareResult::End;
            }
        }
        MiddlewareResult::Continue
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

impl std::fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareChain")
            .field("bound", &self.bound.len())
            .finish()
    }
}
