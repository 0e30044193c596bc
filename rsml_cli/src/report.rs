//! Serializable command results

use chrono::{DateTime, Utc};
use rsml_toolchain::pipeline::DocumentSummary;
use rsml_toolchain::{EvaluationResult, MachineDescriptor};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct DocumentOutcome {
    pub path: PathBuf,
    #[serde(flatten)]
    pub result: Option<EvaluationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl DocumentOutcome {
    pub fn evaluated(path: PathBuf, result: EvaluationResult, line: Option<usize>) -> Self {
        Self {
            path,
            result: Some(result),
            line,
            error: None,
            error_code: None,
        }
    }

    pub fn failed(path: PathBuf, error: &crate::error::CliError) -> Self {
        Self {
            path,
            result: None,
            line: None,
            error: Some(error.to_string()),
            error_code: Some(error.error_code().to_string()),
        }
    }

    pub fn is_match(&self) -> bool {
        self.result.as_ref().is_some_and(EvaluationResult::is_match)
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Result of `rsml eval`
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub timestamp: DateTime<Utc>,
    pub machine: MachineDescriptor,
    pub documents: Vec<DocumentOutcome>,
}

impl EvaluationReport {
    pub fn new(machine: MachineDescriptor) -> Self {
        Self {
            timestamp: Utc::now(),
            machine,
            documents: Vec::new(),
        }
    }

    pub fn matched(&self) -> usize {
        self.documents.iter().filter(|d| d.is_match()).count()
    }

    pub fn failed(&self) -> usize {
        self.documents.iter().filter(|d| d.is_error()).count()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckedDocument {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<DocumentSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of `rsml check`
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub timestamp: DateTime<Utc>,
    pub documents: Vec<CheckedDocument>,
}

impl Default for CheckReport {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckReport {
    pub fn new() -> Self {
        Self {
            timestamp: Utc::now(),
            documents: Vec::new(),
        }
    }

    pub fn failed(&self) -> usize {
        self.documents.iter().filter(|d| d.error.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use serde_json::Value;

    #[test]
    fn test_outcome_json_flattens_result() {
        let outcome = DocumentOutcome::evaluated(
            PathBuf::from("runtime.rsml"),
            EvaluationResult::Match("linux-x64".to_string()),
            Some(4),
        );
        let json: Value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["path"], "runtime.rsml");
        assert_eq!(json["result"], "match");
        assert_eq!(json["value"], "linux-x64");
        assert_eq!(json["line"], 4);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_report_counts() {
        let mut report = EvaluationReport::new(MachineDescriptor::default());
        report.documents.push(DocumentOutcome::evaluated(
            PathBuf::from("a.rsml"),
            EvaluationResult::NoMatch,
            None,
        ));
        report.documents.push(DocumentOutcome::failed(
            PathBuf::from("b.rsml"),
            &CliError::NoDocuments {
                path: PathBuf::from("b.rsml"),
            },
        ));

        assert_eq!(report.matched(), 0);
        assert_eq!(report.failed(), 1);

        let json: Value = serde_json::to_value(&report).unwrap();
        assert!(json["timestamp"].is_string());
        assert_eq!(json["documents"][0]["result"], "no_match");
        assert_eq!(json["documents"][1]["error_code"], "E101");
    }
}
