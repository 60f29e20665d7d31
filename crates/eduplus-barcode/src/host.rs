//! Host environment capability interface
//!
//! Everything the resolver asks of the running machine goes through
//! [`HostEnv`]: platform identity, home directory sources, and whether a given
//! filesystem or process capability may be used at all. Hardened hosts
//! (shared hosting, locked-down containers) disable arbitrary subsets of these,
//! so each one is queried individually.

use eduplus_core::config::consts;
use eduplus_core::BarcodeError;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// A host capability that may be unavailable
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    /// Changing file modes (chmod)
    SetPermissions,
    /// Asking whether a file is marked executable
    QueryExecutable,
    /// Spawning child processes
    SpawnProcess,
    /// Copying files
    CopyFile,
    /// Creating directories
    CreateDir,
    /// Looking up the current user's account record
    AccountLookup,
}

impl Capability {
    pub const ALL: [Capability; 6] = [
        Capability::SetPermissions,
        Capability::QueryExecutable,
        Capability::SpawnProcess,
        Capability::CopyFile,
        Capability::CreateDir,
        Capability::AccountLookup,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Capability::SetPermissions => "set-permissions",
            Capability::QueryExecutable => "query-executable",
            Capability::SpawnProcess => "spawn-process",
            Capability::CopyFile => "copy-file",
            Capability::CreateDir => "create-dir",
            Capability::AccountLookup => "account-lookup",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = BarcodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Capability::ALL
            .into_iter()
            .find(|cap| cap.as_str() == normalized)
            .ok_or_else(|| {
                BarcodeError::ConfigInvalid(format!(
                    "unknown capability '{s}' (expected one of: {})",
                    Capability::ALL.map(Capability::as_str).join(", ")
                ))
            })
    }
}

/// Queries the resolver makes against the running machine
pub trait HostEnv {
    /// `linux`, `darwin`, `windows`, or whatever else the host reports
    fn os_family(&self) -> String;

    /// `uname -m` style machine string (e.g. `x86_64`, `arm64`)
    fn machine(&self) -> String;

    fn env_var(&self, name: &str) -> Option<String>;

    /// Home directory from the user account database
    fn account_home(&self) -> Option<PathBuf>;

    fn is_enabled(&self, capability: Capability) -> bool;
}

/// The real machine, optionally with some capabilities switched off
#[derive(Debug, Clone, Default)]
pub struct SystemHost {
    disabled: BTreeSet<Capability>,
}

impl SystemHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_disabled(disabled: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            disabled: disabled.into_iter().collect(),
        }
    }
}

impl HostEnv for SystemHost {
    fn os_family(&self) -> String {
        match std::env::consts::OS {
            "macos" => "darwin".to_string(),
            other => other.to_string(),
        }
    }

    fn machine(&self) -> String {
        // Apple Silicon reports arm64 from uname
        if cfg!(target_os = "macos") && std::env::consts::ARCH == "aarch64" {
            return "arm64".to_string();
        }
        std::env::consts::ARCH.to_string()
    }

    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn account_home(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn is_enabled(&self, capability: Capability) -> bool {
        !self.disabled.contains(&capability)
    }
}

/// A fully injected host for tests and dry runs
#[derive(Debug, Clone)]
pub struct FixedHost {
    pub os_family: String,
    pub machine: String,
    pub env: Vec<(String, String)>,
    pub account_home: Option<PathBuf>,
    pub disabled: BTreeSet<Capability>,
}

impl FixedHost {
    pub fn new(os_family: impl Into<String>, machine: impl Into<String>) -> Self {
        Self {
            os_family: os_family.into(),
            machine: machine.into(),
            env: Vec::new(),
            account_home: None,
            disabled: BTreeSet::new(),
        }
    }

    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((name.into(), value.into()));
        self
    }

    pub fn with_home(self, home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        self.with_env("HOME", home.to_string_lossy())
    }

    pub fn with_account_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.account_home = Some(home.into());
        self
    }

    pub fn disable(mut self, capability: Capability) -> Self {
        self.disabled.insert(capability);
        self
    }
}

impl HostEnv for FixedHost {
    fn os_family(&self) -> String {
        self.os_family.clone()
    }

    fn machine(&self) -> String {
        self.machine.clone()
    }

    fn env_var(&self, name: &str) -> Option<String> {
        self.env
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    fn account_home(&self) -> Option<PathBuf> {
        self.account_home.clone()
    }

    fn is_enabled(&self, capability: Capability) -> bool {
        !self.disabled.contains(&capability)
    }
}

fn non_empty_var(host: &impl HostEnv, name: &str) -> Option<String> {
    host.env_var(name).filter(|value| !value.is_empty())
}

/// Discover the home directory
///
/// Order: `HOME`, the account database, the Windows profile variables, and
/// finally `/tmp`. Never fails.
pub fn resolve_home_dir(host: &impl HostEnv) -> PathBuf {
    if let Some(home) = non_empty_var(host, "HOME") {
        return PathBuf::from(home);
    }

    if host.is_enabled(Capability::AccountLookup) {
        if let Some(home) = host.account_home().filter(|p| !p.as_os_str().is_empty()) {
            return home;
        }
    }

    if host.os_family().eq_ignore_ascii_case("windows") {
        if let Some(profile) = non_empty_var(host, "USERPROFILE") {
            return PathBuf::from(profile);
        }
        if let (Some(drive), Some(path)) = (
            non_empty_var(host, "HOMEDRIVE"),
            non_empty_var(host, "HOMEPATH"),
        ) {
            return PathBuf::from(format!("{drive}{path}"));
        }
    }

    PathBuf::from(consts::artifact::HOME_FALLBACK)
}
