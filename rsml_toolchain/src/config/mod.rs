//! Configuration module for the RSML toolchain
//! Compile-time limits come from the TOML profile read by build.rs

// Include generated constants from build.rs
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

pub use runtime::{
    EvaluationPreferences, LoggingPreferences, RuntimeConfig, RuntimeConfigError,
};

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        super::BUILD_PROFILE
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("RSML_CONFIG_DIR").unwrap_or("config")
    }

    /// Returns configuration source information
    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_limits_are_consistent() {
        assert!(compile_time::lexical::MAX_LINE_LENGTH > 0);
        assert!(compile_time::lexical::MAX_LINE_LENGTH <= compile_time::lexical::MAX_DOCUMENT_SIZE);
        assert!(compile_time::logging::MAX_LOG_MESSAGE_LENGTH > 0);
    }

    #[test]
    fn test_source_info_names_profile() {
        let info = build_info::source_info();
        assert!(info.contains(build_info::profile()));
        assert!(info.ends_with(".toml"));
    }
}
