//! Subcommand implementations
//!
//! Each command prints its own output and returns the process outcome;
//! only failures that stop the whole command come back as `Err`.

use crate::discovery::{discover_documents, read_document};
use crate::error::CliError;
use crate::machine::MachineArgs;
use crate::report::{CheckReport, CheckedDocument, DocumentOutcome, EvaluationReport};
use rsml_toolchain::config::EvaluationPreferences;
use rsml_toolchain::logging::{self, codes};
use rsml_toolchain::pipeline::{self, TokenizedDocument};
use rsml_toolchain::tokens::TokenKind;
use rsml_toolchain::{log_error, log_info, EvaluationResult, Evaluator};
use std::path::Path;
use std::process::ExitCode;

/// Process outcome: 0 success or match, 1 no match, 2 error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    NoMatch,
    Failure,
}

impl Outcome {
    pub fn code(self) -> u8 {
        match self {
            Outcome::Success => 0,
            Outcome::NoMatch => 1,
            Outcome::Failure => 2,
        }
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        ExitCode::from(outcome.code())
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Evaluate one document, tagging its log events with the path
pub fn evaluate_document(
    path: &Path,
    machine: &rsml_toolchain::MachineDescriptor,
    preferences: &EvaluationPreferences,
) -> DocumentOutcome {
    let evaluate = || -> Result<(EvaluationResult, Option<usize>), CliError> {
        let text = read_document(path)?;
        let mut evaluator = Evaluator::new(text).with_preferences(preferences.clone());
        let result = evaluator
            .evaluate_with(machine)
            .map_err(|source| CliError::Document {
                path: path.to_path_buf(),
                source,
            })?;
        let line = evaluator
            .matched_line()
            .filter(|_| preferences.report_line_numbers);
        Ok((result, line))
    };

    match logging::with_document_context(path.display().to_string(), evaluate) {
        Ok((result, line)) => DocumentOutcome::evaluated(path.to_path_buf(), result, line),
        Err(error) => DocumentOutcome::failed(path.to_path_buf(), &error),
    }
}

pub fn eval(
    path: &Path,
    machine: &MachineArgs,
    json: bool,
    preferences: &EvaluationPreferences,
) -> Result<Outcome, CliError> {
    let documents = discover_documents(path)?;
    let mut report = EvaluationReport::new(machine.resolve());
    log_info!("Evaluating documents",
        "count" => documents.len(),
        "machine" => &report.machine
    );

    for document in &documents {
        let outcome = evaluate_document(document, &report.machine, preferences);
        report.documents.push(outcome);
    }

    if json {
        print_json(&report)?;
    } else {
        let single = report.documents.len() == 1;
        for outcome in &report.documents {
            print_outcome(outcome, single);
        }
    }

    Ok(if report.failed() > 0 {
        Outcome::Failure
    } else if report.matched() < report.documents.len() {
        Outcome::NoMatch
    } else {
        Outcome::Success
    })
}

fn print_outcome(outcome: &DocumentOutcome, single: bool) {
    let prefix = if single {
        String::new()
    } else {
        format!("{}: ", outcome.path.display())
    };

    if let Some(error) = &outcome.error {
        eprintln!("error: {}", error);
        return;
    }
    match (&outcome.result, outcome.line) {
        (Some(EvaluationResult::Match(value)), Some(line)) if !single => {
            println!("{}{} (line {})", prefix, value, line)
        }
        (Some(EvaluationResult::Match(value)), _) => println!("{}{}", prefix, value),
        _ if single => {}
        _ => println!("{}<no match>", prefix),
    }
}

pub fn check(path: &Path, json: bool) -> Result<Outcome, CliError> {
    let documents = discover_documents(path)?;
    let mut report = CheckReport::new();

    for document in documents {
        let checked = match read_document(&document) {
            Ok(text) => match pipeline::check_document(&text) {
                Ok(summary) => CheckedDocument {
                    path: document,
                    summary: Some(summary),
                    error: None,
                },
                Err(error) => CheckedDocument {
                    error: Some(error.to_string()),
                    path: document,
                    summary: None,
                },
            },
            Err(error) => CheckedDocument {
                path: document,
                summary: None,
                error: Some(error.to_string()),
            },
        };
        report.documents.push(checked);
    }

    if json {
        print_json(&report)?;
    } else {
        for checked in &report.documents {
            match (&checked.summary, &checked.error) {
                (Some(summary), _) => println!(
                    "{}: ok ({} logic paths, {} special actions, {} comments)",
                    checked.path.display(),
                    summary.logic_path_lines,
                    summary.special_action_lines,
                    summary.comment_lines
                ),
                (None, Some(error)) => eprintln!("{}: {}", checked.path.display(), error),
                (None, None) => {}
            }
        }
    }

    Ok(if report.failed() > 0 {
        Outcome::Failure
    } else {
        Outcome::Success
    })
}

pub fn tokens(path: &Path, json: bool) -> Result<Outcome, CliError> {
    let text = read_document(path)?;
    let document = pipeline::tokenize_document(&text).map_err(|source| CliError::Document {
        path: path.to_path_buf(),
        source,
    })?;

    if json {
        print_json(&document)?;
    } else {
        print!("{}", render_tokens(&document));
    }
    Ok(Outcome::Success)
}

/// One line per source line: number, then `kind[start..end]` per token
pub fn render_tokens(document: &TokenizedDocument) -> String {
    let mut output = String::new();
    for line in &document.lines {
        let tokens: Vec<String> = line
            .tokens
            .iter()
            .map(|token| match (token.range, token.kind) {
                (_, TokenKind::Eol) => token.kind.to_string(),
                (Some((start, end)), _) => format!("{}[{}..{}] {:?}", token.kind, start, end, token.text),
                (None, _) => format!("{}(synthetic)", token.kind),
            })
            .collect();
        output.push_str(&format!("{:>4} | {}\n", line.number, tokens.join("  ")));
    }
    output
}

pub fn format(path: &Path, write: bool) -> Result<Outcome, CliError> {
    let text = read_document(path)?;
    let formatted = pipeline::format_document(&text).map_err(|source| CliError::Document {
        path: path.to_path_buf(),
        source,
    })?;

    if write {
        std::fs::write(path, &formatted).map_err(|source| CliError::Output {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("formatted {}", path.display());
    } else {
        print!("{}", formatted);
    }
    Ok(Outcome::Success)
}

pub fn host(machine: &MachineArgs, json: bool) -> Result<Outcome, CliError> {
    let descriptor = machine.resolve();
    if json {
        print_json(&descriptor)?;
    } else {
        println!("{}", descriptor);
    }
    Ok(Outcome::Success)
}

/// Log a command-stopping failure and report it on stderr
pub fn report_failure(error: &CliError) -> Outcome {
    log_error!(error.error_code(), "Command failed", "error" => error);
    eprintln!("error: {}", error);
    if let Some(description) = codes::get_error_metadata(error.error_code().as_str()) {
        log::debug!("{}: {}", description.code, description.recommended_action);
    }
    Outcome::Failure
}
