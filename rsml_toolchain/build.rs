// build.rs - TOML-driven compile-time limits for the RSML pipeline
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    lexical: LexicalLimits,
    evaluation: EvaluationLimits,
    host: HostLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_line_length: usize,
    max_document_size: usize,
}

#[derive(serde::Deserialize)]
struct EvaluationLimits {
    max_registered_actions: usize,
    max_bound_middlewares: usize,
}

#[derive(serde::Deserialize)]
struct HostLimits {
    command_timeout_ms: u64,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=RSML_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=RSML_CONFIG_DIR");

    let profile = env::var("RSML_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("RSML_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Workspace root is the parent of rsml_toolchain
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_DOCUMENT_SIZE: usize = 64 * 1024 * 1024;
    const ABSOLUTE_MAX_COMMAND_TIMEOUT_MS: u64 = 60_000;

    if config.lexical.max_line_length == 0 {
        panic!("LIMITS: max_line_length must be positive");
    }

    if config.lexical.max_line_length > config.lexical.max_document_size {
        panic!("LIMITS: max_line_length cannot exceed max_document_size");
    }

    if config.lexical.max_document_size > ABSOLUTE_MAX_DOCUMENT_SIZE {
        panic!("LIMITS: max_document_size exceeds absolute maximum");
    }

    if config.host.command_timeout_ms > ABSOLUTE_MAX_COMMAND_TIMEOUT_MS {
        panic!("LIMITS: command_timeout_ms exceeds absolute maximum");
    }

    if config.logging.max_log_message_length == 0 {
        panic!("LIMITS: max_log_message_length must be positive");
    }

    if profile == "production" {
        if config.lexical.max_document_size > 4 * 1024 * 1024 {
            panic!("PRODUCTION: max_document_size too high for production");
        }
        if config.host.command_timeout_ms > 10_000 {
            panic!("PRODUCTION: command_timeout_ms too high for production");
        }
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod lexical {{
        pub const MAX_LINE_LENGTH: usize = {};
        pub const MAX_DOCUMENT_SIZE: usize = {};
    }}

    pub mod evaluation {{
        pub const MAX_REGISTERED_ACTIONS: usize = {};
        pub const MAX_BOUND_MIDDLEWARES: usize = {};
    }}

    pub mod host {{
        pub const COMMAND_TIMEOUT_MS: u64 = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
    }}
}}

pub const BUILD_PROFILE: &str = "{}";
"#,
        profile,
        // Lexical
        config.lexical.max_line_length,
        config.lexical.max_document_size,
        // Evaluation
        config.evaluation.max_registered_actions,
        config.evaluation.max_bound_middlewares,
        // Host
        config.host.command_timeout_ms,
        // Logging
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
        profile,
    );

    fs::write(output_path, constants_code).unwrap();
}
