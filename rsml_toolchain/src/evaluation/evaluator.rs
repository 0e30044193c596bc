//! Document evaluator
//!
//! Walks a document line by line on one [`TextCursor`]: each non-blank line
//! is staged into the cursor's secondary buffer, lexed, normalized and
//! validated, shown to the middlewares, then dispatched on its token count.
//! The first matching logic path ends the evaluation.

use super::actions::{ActionFailure, ActionOutcome, ActionResult, RegistrationError, SpecialActionRegistry};
use super::matcher::LogicPath;
use super::middleware::{MiddlewareChain, MiddlewareContext, MiddlewareHandle, MiddlewareResult};
use super::result::EvaluationResult;
use crate::config::compile_time::lexical::MAX_DOCUMENT_SIZE;
use crate::config::runtime::EvaluationPreferences;
use crate::cursor::TextCursor;
use crate::lexical::tokenize_line;
use crate::logging::codes;
use crate::machine::MachineDescriptor;
use crate::normalizer::normalize_line;
use crate::pipeline::{RsmlError, SyntaxError};
use crate::tokens::vocabulary::actions;
use crate::tokens::{Line, TokenKind};
use crate::utils::Span;
use crate::validation::validate_line;
use crate::{log_debug, log_error, log_info, log_success};

/// Message used when `@ThrowError` has no argument
pub const DEFAULT_THROW_MESSAGE: &str = "Evaluation stopped by @ThrowError";

/// Where the evaluation currently is, for error reporting
#[derive(Debug, Clone, Copy, Default)]
struct LineLocation {
    number: usize,
    offset: usize,
    length: usize,
}

#[derive(Debug)]
pub struct Evaluator {
    document: String,
    actions: SpecialActionRegistry,
    middlewares: MiddlewareChain,
    preferences: EvaluationPreferences,
    matched_line: Option<usize>,
}

impl Evaluator {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            actions: SpecialActionRegistry::new(),
            middlewares: MiddlewareChain::new(),
            preferences: EvaluationPreferences::default(),
            matched_line: None,
        }
    }

    /// Build from raw bytes, which must be UTF-8
    pub fn from_bytes(document: &[u8]) -> Result<Self, std::str::Utf8Error> {
        std::str::from_utf8(document).map(Self::new)
    }

    pub fn with_preferences(mut self, preferences: EvaluationPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    /// One-based line number of the last match, if the last evaluation matched
    pub fn matched_line(&self) -> Option<usize> {
        self.matched_line
    }

    /// Register a special action. An `Err` from the callback fails the
    /// evaluation as a user-raised error carrying its message.
    pub fn register_special_action<F>(&mut self, name: &str, mut callback: F) -> Result<(), RegistrationError>
    where
        F: FnMut(&str) -> Result<ActionResult, String> + Send + 'static,
    {
        self.actions
            .register(name, move |argument| callback(argument).map_err(ActionFailure::Raised))
    }

    /// Register a special action speaking the byte protocol:
    /// 0 continue, 1 error, 250 stop, 251 reset registry
    pub fn register_coded_special_action<F>(&mut self, name: &str, mut callback: F) -> Result<(), RegistrationError>
    where
        F: FnMut(&str) -> u8 + Send + 'static,
    {
        self.actions.register(name, move |argument| -> ActionOutcome {
            ActionResult::from_code(callback(argument)).map_err(ActionFailure::UnrecognizedCode)
        })
    }

    pub fn unregister_special_action(&mut self, name: &str) -> bool {
        self.actions.unregister(name)
    }

    pub fn special_action_count(&self) -> usize {
        self.actions.len()
    }

    pub fn bind_middleware<F>(&mut self, middleware: F) -> Result<MiddlewareHandle, RegistrationError>
    where
        F: FnMut(&MiddlewareContext<'_>) -> MiddlewareResult + Send + 'static,
    {
        self.middlewares.bind(middleware)
    }

    pub fn unbind_middleware(&mut self, handle: MiddlewareHandle) -> bool {
        self.middlewares.unbind(handle)
    }

    pub fn middleware_count(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_comment(line: &Line) -> bool {
        line.kind(0) == TokenKind::CommentSymbol
    }

    /// Evaluate against the compile target's system and architecture
    pub fn evaluate(&mut self) -> Result<EvaluationResult, RsmlError> {
        self.evaluate_with(&MachineDescriptor::from_build_target())
    }

    pub fn evaluate_with(&mut self, machine: &MachineDescriptor) -> Result<EvaluationResult, RsmlError> {
        self.matched_line = None;

        if self.document.len() > MAX_DOCUMENT_SIZE {
            let error = RsmlError::DocumentTooLarge {
                size: self.document.len(),
            };
            log_error!(error.error_code(), "Document exceeds maximum size",
                "size" => self.document.len(),
                "limit" => MAX_DOCUMENT_SIZE
            );
            return Err(error);
        }

        log_info!("Evaluating document", "bytes" => self.document.len(), "machine" => machine);

        let mut location = LineLocation::default();
        let outcome = self.run(machine, &mut location);

        match &outcome {
            Ok(EvaluationResult::Match(value)) => {
                self.matched_line = Some(location.number);
                if self.preferences.log_matches {
                    log_success!(codes::success::DOCUMENT_MATCHED, "Document matched",
                        "value" => value,
                        "line" => location.number
                    );
                }
            }
            Ok(EvaluationResult::NoMatch) => {
                if self.preferences.log_matches {
                    log_success!(codes::success::DOCUMENT_NO_MATCH, "Document produced no match",
                        "lines" => location.number
                    );
                }
            }
            Err(error) => {
                log_error!(error.error_code(), &error.to_string(),
                    span = Span::for_line(location.number as u32, location.offset, location.length),
                    "line" => location.number
                );
            }
        }

        outcome
    }

    fn run(
        &mut self,
        machine: &MachineDescriptor,
        location: &mut LineLocation,
    ) -> Result<EvaluationResult, RsmlError> {
        let Self {
            document,
            actions,
            middlewares,
            preferences,
            ..
        } = self;

        let mut cursor = TextCursor::new(document.as_str());

        while let Some(range) = cursor.read_line() {
            location.number += 1;
            location.offset = range.start;
            location.length = range.len();

            if cursor.slice(range).trim().is_empty() {
                continue;
            }

            cursor.stage_line(range);
            let line = prepare_line(&mut cursor).map_err(|source| RsmlError::InvalidSyntax {
                line: location.number,
                source,
            })?;
            let text = cursor.text();

            if preferences.trace_lines {
                log_debug!("Evaluating line",
                    "line" => location.number,
                    "leading" => line.kind(0),
                    "length" => line.len()
                );
            }

            let context = MiddlewareContext {
                offset: location.offset,
                line_number: location.number,
                line: &line,
                text,
            };
            if middlewares.run(&context) == MiddlewareResult::End {
                log_debug!("Middleware ended evaluation", "line" => location.number);
                return Ok(EvaluationResult::NoMatch);
            }

            match line.len() {
                0 | 2 => {}
                3 => {
                    let name = line.get(1).map(|t| t.text(text)).unwrap_or("");
                    let argument = line.get(2).map(|t| t.text(text)).unwrap_or("");
                    if let Some(result) = run_special_action(actions, name, argument)? {
                        return Ok(result);
                    }
                }
                5 | 6 => {
                    if let Some(path) = LogicPath::from_line(&line) {
                        if path.matches(text, machine) {
                            let value = path.value.text(text).to_string();
                            return match path.operator.kind {
                                TokenKind::ThrowErrorOperator => Err(RsmlError::UserRaised { message: value }),
                                _ => Ok(EvaluationResult::Match(value)),
                            };
                        }
                    }
                }
                _ if Self::is_comment(&line) => {}
                length => {
                    return Err(RsmlError::InvalidSyntax {
                        line: location.number,
                        source: SyntaxError::UnexpectedShape { length },
                    })
                }
            }

            cursor.swap_buffer();
        }

        Ok(EvaluationResult::NoMatch)
    }
}

/// Lex, normalize and validate the staged line, then drop its `Eol`
pub(crate) fn prepare_line(cursor: &mut TextCursor<'_>) -> Result<Line, SyntaxError> {
    let mut line = tokenize_line(cursor)?;
    normalize_line(&mut line)?;
    validate_line(&line, cursor.text())?;
    if line.ends_with_eol() {
        line.pop();
    }
    Ok(line)
}

/// `Some(result)` ends the evaluation
fn run_special_action(
    registry: &mut SpecialActionRegistry,
    name: &str,
    argument: &str,
) -> Result<Option<EvaluationResult>, RsmlError> {
    match name {
        actions::VOID => return Ok(None),
        actions::THROW_ERROR => {
            let message = if argument.is_empty() {
                DEFAULT_THROW_MESSAGE
            } else {
                argument
            };
            return Err(RsmlError::user_raised(message));
        }
        actions::END_ALL => return Ok(Some(EvaluationResult::NoMatch)),
        _ => {}
    }

    let outcome = registry
        .invoke(name, argument)
        .ok_or_else(|| RsmlError::UndefinedAction {
            name: name.to_string(),
        })?;

    match outcome {
        Ok(ActionResult::Continue) => Ok(None),
        Ok(ActionResult::Stop) => Ok(Some(EvaluationResult::NoMatch)),
        Ok(ActionResult::ResetRegistry) => {
            registry.clear();
            Ok(None)
        }
        Ok(ActionResult::Error) => Err(RsmlError::ActionError {
            name: name.to_string(),
            code: ActionResult::ERROR_CODE,
        }),
        Err(ActionFailure::UnrecognizedCode(code)) => Err(RsmlError::ActionError {
            name: name.to_string(),
            code,
        }),
        Err(ActionFailure::Raised(message)) => Err(RsmlError::UserRaised { message }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn evaluate(document: &str, machine: &MachineDescriptor) -> Result<EvaluationResult, RsmlError> {
        Evaluator::new(document).evaluate_with(machine)
    }

    fn machines() -> Vec<MachineDescriptor> {
        vec![
            MachineDescriptor::default(),
            MachineDescriptor::new("windows", "x64", Some(10)),
            MachineDescriptor::new("osx", "arm64", None),
            MachineDescriptor::linux("ubuntu", "debian", "arm32", Some(22)),
        ]
    }

    #[test]
    fn test_comments_and_blank_lines_never_match() {
        let document = "# header\n\n   \n#\n\t# indented comment\r\n";
        for machine in machines() {
            assert_eq!(evaluate(document, &machine), Ok(EvaluationResult::NoMatch));
        }
    }

    #[test]
    fn test_bare_value_matches_every_machine() {
        for machine in machines() {
            assert_eq!(
                evaluate("-> \"this will always return\"", &machine),
                Ok(EvaluationResult::Match("this will always return".to_string()))
            );
        }
    }

    #[test]
    fn test_defined_fields_must_be_present() {
        let machine = MachineDescriptor {
            system_name: Some("osx".to_string()),
            ..Default::default()
        };
        assert_eq!(
            evaluate("-> osx defined defined \"X\"", &machine),
            Ok(EvaluationResult::NoMatch)
        );
    }

    #[test]
    fn test_first_line_wins_with_family_fallback() {
        let machine = MachineDescriptor {
            system_name: Some("linux".to_string()),
            distro_name: Some("ubuntu".to_string()),
            distro_family: Some("debian".to_string()),
            ..Default::default()
        };
        assert_eq!(
            evaluate("-> debian \"A\"\n-> ubuntu \"B\"\n", &machine),
            Ok(EvaluationResult::Match("A".to_string()))
        );
    }

    #[test]
    fn test_first_match_wins() {
        let machine = MachineDescriptor::new("windows", "x64", Some(10));
        let mut evaluator =
            Evaluator::new("-> windows == 10 defined \"A\"\n-> windows == 10 defined \"B\"");
        assert_eq!(
            evaluator.evaluate_with(&machine),
            Ok(EvaluationResult::Match("A".to_string()))
        );
        assert_eq!(evaluator.matched_line(), Some(1));
    }

    #[test]
    fn test_comparator_with_placeholder_is_invalid_syntax() {
        let machine = MachineDescriptor::new("windows", "x64", Some(10));
        assert_matches!(
            evaluate("-> windows ==defined defined \"X\"", &machine),
            Err(RsmlError::InvalidSyntax { line: 1, .. })
        );
        assert_matches!(
            evaluate("# ok\n-> windows == defined x64 \"X\"", &machine),
            Err(RsmlError::InvalidSyntax {
                line: 2,
                source: SyntaxError::Validation(_)
            })
        );
    }

    #[test]
    fn test_syntax_error_after_match_is_not_reached() {
        let machine = MachineDescriptor::default();
        assert_eq!(
            evaluate("-> \"first\"\n-> mars \"never lexed\"", &machine),
            Ok(EvaluationResult::Match("first".to_string()))
        );
    }

    #[test]
    fn test_end_all_stops_before_later_actions() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();

        let mut evaluator = Evaluator::new("@EndAll\n@Probe now\n-> \"X\"");
        evaluator
            .register_special_action("Probe", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(ActionResult::Continue)
            })
            .unwrap();

        assert_eq!(
            evaluator.evaluate_with(&MachineDescriptor::default()),
            Ok(EvaluationResult::NoMatch)
        );
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_custom_action_receives_argument() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let mut evaluator = Evaluator::new("@Record first arg\n@Record\n-> \"done\"");
        evaluator
            .register_special_action("Record", move |argument| {
                sink.lock().unwrap().push(argument.to_string());
                Ok(ActionResult::Continue)
            })
            .unwrap();

        assert_eq!(
            evaluator.evaluate_with(&MachineDescriptor::default()),
            Ok(EvaluationResult::Match("done".to_string()))
        );
        assert_eq!(*seen.lock().unwrap(), vec!["first arg".to_string(), String::new()]);
    }

    #[test]
    fn test_built_in_actions() {
        let machine = MachineDescriptor::default();
        assert_eq!(
            evaluate("@Void\n-> \"v\"", &machine),
            Ok(EvaluationResult::Match("v".to_string()))
        );
        assert_eq!(
            evaluate("@ThrowError unsupported platform", &machine),
            Err(RsmlError::user_raised("unsupported platform"))
        );
        assert_eq!(
            evaluate("@ThrowError", &machine),
            Err(RsmlError::user_raised(DEFAULT_THROW_MESSAGE))
        );
        assert_eq!(
            evaluate("@Missing", &machine),
            Err(RsmlError::UndefinedAction {
                name: "Missing".to_string()
            })
        );
    }

    #[test]
    fn test_coded_actions() {
        let machine = MachineDescriptor::default();

        let mut stop = Evaluator::new("@Stop\n-> \"X\"");
        stop.register_coded_special_action("Stop", |_| 250).unwrap();
        assert_eq!(stop.evaluate_with(&machine), Ok(EvaluationResult::NoMatch));

        let mut failing = Evaluator::new("@Fail");
        failing.register_coded_special_action("Fail", |_| 1).unwrap();
        assert_eq!(
            failing.evaluate_with(&machine),
            Err(RsmlError::ActionError {
                name: "Fail".to_string(),
                code: 1
            })
        );

        let mut odd = Evaluator::new("@Odd");
        odd.register_coded_special_action("Odd", |_| 42).unwrap();
        assert_matches!(
            odd.evaluate_with(&machine),
            Err(RsmlError::ActionError { code: 42, .. })
        );
    }

    #[test]
    fn test_reset_registry_clears_later_lookups() {
        let mut evaluator = Evaluator::new("@Reset\n@Reset");
        evaluator
            .register_coded_special_action("Reset", |_| 251)
            .unwrap();
        assert_eq!(
            evaluator.evaluate_with(&MachineDescriptor::default()),
            Err(RsmlError::UndefinedAction {
                name: "Reset".to_string()
            })
        );
        assert_eq!(evaluator.special_action_count(), 0);
    }

    #[test]
    fn test_callback_error_is_user_raised() {
        let mut evaluator = Evaluator::new("@Check");
        evaluator
            .register_special_action("Check", |_| Err("requirement not met".to_string()))
            .unwrap();
        assert_eq!(
            evaluator.evaluate_with(&MachineDescriptor::default()),
            Err(RsmlError::user_raised("requirement not met"))
        );
    }

    #[test]
    fn test_throw_operator_raises_value() {
        let machine = MachineDescriptor::new("osx", "x64", Some(10));
        assert_eq!(
            evaluate("!> osx < 11 any \"macOS 10 is not supported\"\n-> \"ok\"", &machine),
            Err(RsmlError::user_raised("macOS 10 is not supported"))
        );
    }

    #[test]
    fn test_middleware_sees_lines_and_can_end() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let mut evaluator = Evaluator::new("# a\n\n@Void\n-> linux \"l\"\n-> \"x\"");
        evaluator
            .bind_middleware(move |context| {
                sink.lock()
                    .unwrap()
                    .push((context.line_number, context.line.len()));
                if context.token_text(1) == "linux" {
                    MiddlewareResult::End
                } else {
                    MiddlewareResult::Continue
                }
            })
            .unwrap();

        assert_eq!(
            evaluator.evaluate_with(&MachineDescriptor::default()),
            Ok(EvaluationResult::NoMatch)
        );
        assert_eq!(*seen.lock().unwrap(), vec![(1, 2), (3, 3), (4, 5)]);
    }

    #[test]
    fn test_unbound_middleware_no_longer_runs() {
        let mut evaluator = Evaluator::new("-> \"x\"");
        let handle = evaluator.bind_middleware(|_| MiddlewareResult::End).unwrap();
        assert_eq!(evaluator.middleware_count(), 1);
        assert!(evaluator.unbind_middleware(handle));
        assert_eq!(
            evaluator.evaluate_with(&MachineDescriptor::default()),
            Ok(EvaluationResult::Match("x".to_string()))
        );
    }

    #[test]
    fn test_from_bytes_rejects_invalid_utf8() {
        assert!(Evaluator::from_bytes(&[0xff, 0xfe]).is_err());
        let evaluator = Evaluator::from_bytes(b"-> \"x\"").unwrap();
        assert_eq!(evaluator.document(), "-> \"x\"");
    }

    #[test]
    fn test_evaluate_uses_build_target() {
        let mut evaluator = Evaluator::new("-> defined \"known\"\n-> \"unknown\"");
        let machine = MachineDescriptor::from_build_target();
        let expected = if machine.system_name.is_some() && !machine.is_linux() {
            "known"
        } else {
            "unknown"
        };
        assert_eq!(
            evaluator.evaluate(),
            Ok(EvaluationResult::Match(expected.to_string()))
        );
    }
}
