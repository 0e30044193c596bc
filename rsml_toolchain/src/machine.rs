//! Machine descriptor consumed read-only by evaluation

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a document is evaluated against. Every field may be absent;
/// `defined` only matches present fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineDescriptor {
    pub system_name: Option<String>,
    pub distro_name: Option<String>,
    pub distro_family: Option<String>,
    pub processor_architecture: Option<String>,
    pub system_version: Option<i32>,
}

impl MachineDescriptor {
    pub fn new(
        system_name: impl Into<String>,
        processor_architecture: impl Into<String>,
        system_version: Option<i32>,
    ) -> Self {
        Self {
            system_name: Some(system_name.into()),
            processor_architecture: Some(processor_architecture.into()),
            system_version,
            ..Self::default()
        }
    }

    /// A Linux machine; `system_name` is always `"linux"`
    pub fn linux(
        distro_name: impl Into<String>,
        distro_family: impl Into<String>,
        processor_architecture: impl Into<String>,
        system_version: Option<i32>,
    ) -> Self {
        Self {
            system_name: Some(LINUX.to_string()),
            distro_name: Some(distro_name.into()),
            distro_family: Some(distro_family.into()),
            processor_architecture: Some(processor_architecture.into()),
            system_version,
        }
    }

    /// System and architecture of the compile target, no version
    pub fn from_build_target() -> Self {
        Self {
            system_name: target_system().map(str::to_string),
            processor_architecture: target_architecture().map(str::to_string),
            ..Self::default()
        }
    }

    /// Version as text, for display
    pub fn stringified_version(&self) -> Option<String> {
        self.system_version.map(|version| version.to_string())
    }

    /// Whether `literal` is exactly the decimal text of the system version
    pub fn version_text_is(&self, literal: &str) -> bool {
        let Some(version) = self.system_version else {
            return false;
        };
        let digits = literal.strip_prefix('-').unwrap_or(literal);
        let canonical = match digits {
            "0" => literal == "0",
            _ => !digits.starts_with('0') && digits.bytes().all(|b| b.is_ascii_digit()),
        };
        canonical && literal.parse::<i32>() == Ok(version)
    }

    pub fn is_linux(&self) -> bool {
        self.system_name.as_deref() == Some(LINUX)
    }
}

impl fmt::Display for MachineDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "{} {} {}",
            field(&self.system_name),
            field(&self.stringified_version()),
            field(&self.processor_architecture)
        )?;
        if self.distro_name.is_some() || self.distro_family.is_some() {
            write!(
                f,
                " ({}/{})",
                field(&self.distro_name),
                field(&self.distro_family)
            )?;
        }
        Ok(())
    }
}

pub const LINUX: &str = "linux";

pub fn target_system() -> Option<&'static str> {
    if cfg!(target_os = "windows") {
        Some("windows")
    } else if cfg!(target_os = "macos") {
        Some("osx")
    } else if cfg!(target_os = "freebsd") {
        Some("freebsd")
    } else if cfg!(target_os = "linux") {
        Some(LINUX)
    } else {
        None
    }
}

pub fn target_architecture() -> Option<&'static str> {
    if cfg!(target_arch = "x86_64") {
        Some("x64")
    } else if cfg!(target_arch = "x86") {
        Some("x86")
    } else if cfg!(target_arch = "aarch64") {
        Some("arm64")
    } else if cfg!(target_arch = "arm") {
        Some("arm32")
    } else if cfg!(target_arch = "loongarch64") {
        Some("loongarch64")
    } else {
        None
    }
}
