use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a successful evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "value", rename_all = "snake_case")]
pub enum EvaluationResult {
    Match(String),
    NoMatch,
}

impl EvaluationResult {
    pub fn is_match(&self) -> bool {
        matches!(self, EvaluationResult::Match(_))
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            EvaluationResult::Match(value) => Some(value),
            EvaluationResult::NoMatch => None,
        }
    }

    pub fn into_value(self) -> Option<String> {
        match self {
            EvaluationResult::Match(value) => Some(value),
            EvaluationResult::NoMatch => None,
        }
    }
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationResult::Match(value) => f.write_str(value),
            EvaluationResult::NoMatch => f.write_str("<no match>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let matched = EvaluationResult::Match("net8.0".to_string());
        assert_eq!(
            serde_json::to_string(&matched).unwrap(),
            r#"{"result":"match","value":"net8.0"}"#
        );
        assert_eq!(
            serde_json::to_string(&EvaluationResult::NoMatch).unwrap(),
            r#"{"result":"no_match"}"#
        );
    }

    #[test]
    fn test_accessors() {
        let matched = EvaluationResult::Match("v".to_string());
        assert!(matched.is_match());
        assert_eq!(matched.value(), Some("v"));
        assert_eq!(EvaluationResult::NoMatch.into_value(), None);
    }
}
