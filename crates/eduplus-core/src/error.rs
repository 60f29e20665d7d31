use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BarcodeError {
    // Platform errors
    #[error("PLATFORM_UNSUPPORTED: Unsupported platform: {os} ({arch})")]
    PlatformUnsupported { os: String, arch: String },

    // Binary errors
    #[error("BINARY_UNAVAILABLE: Binary not found or not executable for your platform: {os} ({arch})")]
    BinaryUnavailable { os: String, arch: String },

    #[error("BINARY_UNAVAILABLE: Binary not available")]
    BinaryNotResolved,

    #[error("BINARY_UNAVAILABLE: Binary not available: '{path}' no longer exists")]
    BinaryMissing { path: PathBuf },

    #[error("CAPABILITY_DISABLED: {0} is disabled on this host")]
    CapabilityDisabled(String),

    #[error("INSTALL_FAILED: {0}")]
    InstallFailed(String),

    // Config errors
    #[error("CONFIG_INVALID: {0}")]
    ConfigInvalid(String),

    #[error("CONFIG_PARSE_ERROR: {0}")]
    ConfigParseError(String),

    // Execution errors
    #[error("EXEC_FAILED: {output}")]
    ExecFailed { exit_code: Option<i32>, output: String },

    #[error("EXEC_FAILED: failed to start '{binary}': {reason}")]
    ExecSpawnFailed { binary: PathBuf, reason: String },

    #[error("EXEC_TIMEOUT: process did not finish within {limit:?}")]
    ExecTimeout { limit: Duration },

    #[error("OUTPUT_MISSING: Barcode generation failed: '{path}' was not created")]
    OutputMissing { path: PathBuf },

    // IO errors
    #[error("IO_ERROR: {0}")]
    IoError(#[from] std::io::Error),
}

/// Coarse failure category, used by callers that branch on the cause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    PlatformUnsupported,
    BinaryUnavailable,
    ConfigInvalid,
    ExecutionFailed,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::PlatformUnsupported => write!(f, "platform unsupported"),
            ErrorKind::BinaryUnavailable => write!(f, "binary unavailable"),
            ErrorKind::ConfigInvalid => write!(f, "config invalid"),
            ErrorKind::ExecutionFailed => write!(f, "execution failed"),
            ErrorKind::Io => write!(f, "io"),
        }
    }
}

impl BarcodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BarcodeError::PlatformUnsupported { .. } => ErrorKind::PlatformUnsupported,
            BarcodeError::BinaryUnavailable { .. }
            | BarcodeError::BinaryNotResolved
            | BarcodeError::BinaryMissing { .. }
            | BarcodeError::CapabilityDisabled(_)
            | BarcodeError::InstallFailed(_) => ErrorKind::BinaryUnavailable,
            BarcodeError::ConfigInvalid(_) | BarcodeError::ConfigParseError(_) => {
                ErrorKind::ConfigInvalid
            }
            BarcodeError::ExecFailed { .. }
            | BarcodeError::ExecSpawnFailed { .. }
            | BarcodeError::ExecTimeout { .. }
            | BarcodeError::OutputMissing { .. } => ErrorKind::ExecutionFailed,
            BarcodeError::IoError(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, BarcodeError>;
