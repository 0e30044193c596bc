//! Host machine probing
//!
//! Builds a [`MachineDescriptor`] for the running machine. System name and
//! architecture come from the build target; the version (and on Linux the
//! distribution) is read from the host:
//!
//! - Linux: `/etc/os-release` (`ID`, `ID_LIKE`, `VERSION_ID`)
//! - FreeBSD: `uname -r`
//! - macOS: `sw_vers -productVersion`
//!
//! Windows versions are not probed and stay absent.

pub mod command;

pub use command::{CommandError, CommandOutput, CommandRunner, PROBE_COMMANDS};

use regex::Regex;
use rsml_toolchain::logging::{codes, Code};
use rsml_toolchain::machine::{self, MachineDescriptor};
use rsml_toolchain::{log_success, log_warning};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const OS_RELEASE_PATH: &str = "/etc/os-release";

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Cannot read {path}: {source}")]
    OsReleaseUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("os-release has no ID entry")]
    MissingDistroId,

    #[error("Unparsable version '{text}'")]
    UnparsableVersion { text: String },

    #[error(transparent)]
    Command(#[from] CommandError),
}

impl HostError {
    pub fn error_code(&self) -> Code {
        match self {
            HostError::OsReleaseUnreadable { .. } => codes::host::OS_RELEASE_UNREADABLE,
            HostError::Command(error) => error.error_code(),
            _ => codes::host::PROBE_FAILED,
        }
    }
}

/// Fields of interest from an os-release file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsRelease {
    pub id: Option<String>,
    pub id_like: Option<String>,
    pub version_id: Option<String>,
}

impl OsRelease {
    pub fn parse(content: &str) -> Self {
        let mut release = Self::default();
        let entries = os_release_entry()
            .into_iter()
            .flat_map(|entry| entry.captures_iter(content));
        for captures in entries {
            let value = unquote(&captures[2]);
            if value.is_empty() {
                continue;
            }
            match &captures[1] {
                "ID" => release.id = Some(value),
                "ID_LIKE" => release.id_like = Some(value),
                "VERSION_ID" => release.version_id = Some(value),
                _ => {}
            }
        }
        release
    }

    /// Distribution name as RSML spells it
    pub fn distro_name(&self) -> Option<String> {
        self.id.as_deref().map(|id| match id {
            "arch" => "archlinux".to_string(),
            other => other.to_string(),
        })
    }

    /// Family: fedora is its own family, otherwise the first `ID_LIKE`
    /// entry, falling back to the distribution itself
    pub fn distro_family(&self) -> Option<String> {
        let name = self.distro_name()?;
        if name == "fedora" {
            return Some(name);
        }
        match self.id_like.as_deref().and_then(|like| like.split_whitespace().next()) {
            Some(family) => Some(family.to_string()),
            None => Some(name),
        }
    }

    pub fn major_version(&self) -> Option<i32> {
        self.version_id.as_deref().and_then(parse_major)
    }
}

fn os_release_entry() -> Option<&'static Regex> {
    static ENTRY: OnceLock<Option<Regex>> = OnceLock::new();
    ENTRY
        .get_or_init(|| Regex::new(r"(?m)^\s*([A-Z_]+)=(.*?)\s*$").ok())
        .as_ref()
}

fn unquote(value: &str) -> String {
    value.trim_matches(|c| c == '"' || c == '\'').to_string()
}

/// Major component of a dotted version such as `13.4.1` or `14.0-RELEASE`
pub fn parse_major(text: &str) -> Option<i32> {
    let digits: String = text
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Probe configuration; [`HostProbe::default`] reads the real host
#[derive(Debug, Clone)]
pub struct HostProbe {
    os_release_path: PathBuf,
    runner: CommandRunner,
    system_name: Option<&'static str>,
}

impl Default for HostProbe {
    fn default() -> Self {
        Self {
            os_release_path: PathBuf::from(OS_RELEASE_PATH),
            runner: CommandRunner::default(),
            system_name: machine::target_system(),
        }
    }
}

impl HostProbe {
    pub fn with_os_release(mut self, path: impl AsRef<Path>) -> Self {
        self.os_release_path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_runner(mut self, runner: CommandRunner) -> Self {
        self.runner = runner;
        self
    }

    /// Probe as if running on `system`
    pub fn with_system(mut self, system: &'static str) -> Self {
        self.system_name = Some(system);
        self
    }

    /// Probe the host, failing on the first unreadable source
    pub fn probe(&self) -> Result<MachineDescriptor, HostError> {
        let mut descriptor = MachineDescriptor {
            system_name: self.system_name.map(str::to_string),
            processor_architecture: machine::target_architecture().map(str::to_string),
            ..MachineDescriptor::default()
        };

        match self.system_name {
            Some(machine::LINUX) => {
                let release = self.read_os_release()?;
                if release.id.is_none() {
                    return Err(HostError::MissingDistroId);
                }
                descriptor.distro_name = release.distro_name();
                descriptor.distro_family = release.distro_family();
                descriptor.system_version = release.major_version();
            }
            Some("freebsd") => {
                descriptor.system_version = Some(self.command_version("uname", &["-r"])?);
            }
            Some("osx") => {
                descriptor.system_version =
                    Some(self.command_version("sw_vers", &["-productVersion"])?);
            }
            _ => {}
        }

        log_success!(codes::success::HOST_PROBED, "Host machine probed",
            "machine" => &descriptor
        );
        crate::facade_debug!("probed host machine: {}", descriptor);
        Ok(descriptor)
    }

    pub fn read_os_release(&self) -> Result<OsRelease, HostError> {
        let content = std::fs::read_to_string(&self.os_release_path).map_err(|source| {
            HostError::OsReleaseUnreadable {
                path: self.os_release_path.clone(),
                source,
            }
        })?;
        Ok(OsRelease::parse(&content))
    }

    fn command_version(&self, program: &str, args: &[&str]) -> Result<i32, HostError> {
        let text = self.runner.run_for_stdout(program, args)?;
        parse_major(&text).ok_or(HostError::UnparsableVersion { text })
    }
}

/// Best-effort probe: falls back to the build target when the host cannot
/// be read, logging why
pub fn detect() -> MachineDescriptor {
    detect_with(&HostProbe::default())
}

pub fn detect_with(probe: &HostProbe) -> MachineDescriptor {
    probe.probe().unwrap_or_else(|error| {
        log_warning!("Host probe failed; using build target only",
            "code" => error.error_code(),
            "reason" => &error
        );
        crate::facade_debug!("host probe failed: {}", error);
        MachineDescriptor {
            system_name: probe.system_name.map(str::to_string),
            ..MachineDescriptor::from_build_target()
        }
    })
}
