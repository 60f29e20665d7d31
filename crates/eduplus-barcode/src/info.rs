use crate::platform::PlatformKey;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Where a resolved artifact was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinarySource {
    /// Directory shipped next to the executable
    Bundled,
    /// Existing copy in the per-user cache
    Cache,
    /// Copied into the per-user cache during this resolution
    Installed,
}

impl fmt::Display for BinarySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinarySource::Bundled => write!(f, "bundled directory"),
            BinarySource::Cache => write!(f, "user cache"),
            BinarySource::Installed => write!(f, "installed into user cache"),
        }
    }
}

/// How executability was confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyMethod {
    PermissionQuery,
    ExecutionProbe,
}

impl fmt::Display for VerifyMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyMethod::PermissionQuery => write!(f, "permission query"),
            VerifyMethod::ExecutionProbe => write!(f, "execution probe"),
        }
    }
}

/// A verified, runnable artifact
///
/// The path existed and passed verification when resolution ran. Later
/// changes by other processes are not tracked.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedBinary {
    pub path: PathBuf,
    pub source: BinarySource,
    pub platform: PlatformKey,
    pub verified_by: VerifyMethod,
}

/// One step of a resolution run, kept for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionAttempt {
    /// Path that was examined
    pub candidate: PathBuf,
    /// Candidate location ("bundled", "cache", "install")
    pub source: String,
    /// Short outcome code ("ok", "missing", "not_executable", ...)
    pub outcome: String,
    pub detail: Option<String>,
}

impl ResolutionAttempt {
    pub fn new(candidate: impl Into<PathBuf>, source: &str, outcome: &str) -> Self {
        Self {
            candidate: candidate.into(),
            source: source.to_string(),
            outcome: outcome.to_string(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl fmt::Display for ResolutionAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} -> {}",
            self.source,
            self.candidate.display(),
            self.outcome
        )?;
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}
