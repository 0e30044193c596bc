//! Language-standard compliance metadata reported by each component

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Version of the RSML language standard this toolchain implements
pub const LANGUAGE_VERSION: &str = "2.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Feature {
    LogicPaths,
    SpecialActions,
    Comments,
    WhitespaceManagement,
    OverloadConversion,
}

impl Feature {
    pub const ALL: [Feature; 5] = [
        Feature::LogicPaths,
        Feature::SpecialActions,
        Feature::Comments,
        Feature::WhitespaceManagement,
        Feature::OverloadConversion,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplianceLevel {
    None,
    Partial,
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificationCompliance {
    pub specification_version: String,
    pub levels: BTreeMap<Feature, ComplianceLevel>,
}

impl SpecificationCompliance {
    /// Every feature fully supported for `version`
    pub fn full(version: &str) -> Self {
        Self::uniform(version, ComplianceLevel::Full)
    }

    pub fn none() -> Self {
        Self::uniform("", ComplianceLevel::None)
    }

    fn uniform(version: &str, level: ComplianceLevel) -> Self {
        Self {
            specification_version: version.to_string(),
            levels: Feature::ALL.into_iter().map(|f| (f, level)).collect(),
        }
    }

    pub fn with_level(mut self, feature: Feature, level: ComplianceLevel) -> Self {
        self.levels.insert(feature, level);
        self
    }

    pub fn level(&self, feature: Feature) -> ComplianceLevel {
        self.levels
            .get(&feature)
            .copied()
            .unwrap_or(ComplianceLevel::None)
    }

    pub fn is_fully_compliant(&self) -> bool {
        Feature::ALL
            .iter()
            .all(|f| self.level(*f) == ComplianceLevel::Full)
    }
}

/// Compliance of the whole toolchain
pub fn specification_compliance() -> SpecificationCompliance {
    SpecificationCompliance::full(LANGUAGE_VERSION)
}
