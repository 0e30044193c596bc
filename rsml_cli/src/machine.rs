//! Machine descriptor from the host probe plus command line overrides

use clap::Args;
use rsml_toolchain::MachineDescriptor;

#[derive(Debug, Clone, Default, Args)]
pub struct MachineArgs {
    /// System name (windows, osx, linux, freebsd, or a distro)
    #[arg(long)]
    pub system: Option<String>,

    /// Linux distribution name
    #[arg(long)]
    pub distro: Option<String>,

    /// Linux distribution family
    #[arg(long)]
    pub family: Option<String>,

    /// Processor architecture (x64, x86, arm64, arm32, loongarch64)
    #[arg(long)]
    pub arch: Option<String>,

    /// Major system version
    #[arg(long = "os-version", value_name = "MAJOR")]
    pub system_version: Option<i32>,

    /// Start from an empty descriptor instead of probing the host
    #[arg(long)]
    pub no_detect: bool,
}

impl MachineArgs {
    pub fn resolve(&self) -> MachineDescriptor {
        let base = if self.no_detect {
            MachineDescriptor::default()
        } else {
            rsml_native::detect()
        };
        self.apply(base)
    }

    /// Overlay the given flags on `machine`
    pub fn apply(&self, mut machine: MachineDescriptor) -> MachineDescriptor {
        let overrides = [
            (&self.system, &mut machine.system_name),
            (&self.distro, &mut machine.distro_name),
            (&self.family, &mut machine.distro_family),
            (&self.arch, &mut machine.processor_architecture),
        ];
        for (flag, field) in overrides {
            if let Some(value) = flag {
                *field = Some(value.clone());
            }
        }
        if self.system_version.is_some() {
            machine.system_version = self.system_version;
        }
        machine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_probe() {
        let args = MachineArgs {
            distro: Some("fedora".into()),
            family: Some("fedora".into()),
            system_version: Some(40),
            ..MachineArgs::default()
        };
        let probed = MachineDescriptor::linux("ubuntu", "debian", "x64", Some(22));

        let machine = args.apply(probed);
        assert_eq!(machine.system_name.as_deref(), Some("linux"));
        assert_eq!(machine.distro_name.as_deref(), Some("fedora"));
        assert_eq!(machine.processor_architecture.as_deref(), Some("x64"));
        assert_eq!(machine.system_version, Some(40));
    }

    #[test]
    fn test_no_detect_starts_empty() {
        let args = MachineArgs {
            arch: Some("arm64".into()),
            no_detect: true,
            ..MachineArgs::default()
        };
        let machine = args.resolve();
        assert_eq!(machine.system_name, None);
        assert_eq!(machine.processor_architecture.as_deref(), Some("arm64"));
    }
}
