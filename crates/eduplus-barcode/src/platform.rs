use eduplus_core::config::consts;
use eduplus_core::{BarcodeError, Result};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Linux,
    Darwin,
    Windows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    Amd64,
    Arm64,
}

impl Os {
    pub fn as_str(self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::Darwin => "darwin",
            Os::Windows => "windows",
        }
    }
}

impl Arch {
    pub fn as_str(self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
        }
    }
}

/// Supported (OS family, architecture class) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PlatformKey {
    pub os: Os,
    pub arch: Arch,
}

impl PlatformKey {
    /// Every pair that has a bundled artifact
    pub fn all() -> [PlatformKey; 5] {
        [
            PlatformKey { os: Os::Linux, arch: Arch::Amd64 },
            PlatformKey { os: Os::Linux, arch: Arch::Arm64 },
            PlatformKey { os: Os::Darwin, arch: Arch::Amd64 },
            PlatformKey { os: Os::Darwin, arch: Arch::Arm64 },
            PlatformKey { os: Os::Windows, arch: Arch::Amd64 },
        ]
    }

    /// Classify a host from its OS family name and `uname -m` style machine string
    ///
    /// Pure: never touches the filesystem. Windows always maps to the single
    /// amd64 artifact; on darwin only an `arm64` machine selects the arm build.
    pub fn detect(os_family: &str, machine: &str) -> Result<PlatformKey> {
        let os = match os_family.to_ascii_lowercase().as_str() {
            "linux" => Os::Linux,
            "darwin" | "macos" => Os::Darwin,
            "windows" => Os::Windows,
            _ => {
                return Err(BarcodeError::PlatformUnsupported {
                    os: os_family.to_string(),
                    arch: machine.to_string(),
                });
            }
        };

        let arch = match os {
            Os::Linux if machine.contains("aarch64") || machine.contains("arm64") => Arch::Arm64,
            Os::Darwin if machine.contains("arm64") => Arch::Arm64,
            _ => Arch::Amd64,
        };

        Ok(PlatformKey { os, arch })
    }

    pub fn artifact_name(&self) -> String {
        let suffix = if self.os == Os::Windows { ".exe" } else { "" };
        format!(
            "{}-{}-{}{}",
            consts::artifact::PREFIX,
            self.os.as_str(),
            self.arch.as_str(),
            suffix
        )
    }

    pub fn is_windows(&self) -> bool {
        self.os == Os::Windows
    }
}

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os.as_str(), self.arch.as_str())
    }
}
