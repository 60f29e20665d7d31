use crate::exec::{ExecOptions, ExecResult, exec_binary};
use crate::info::ResolvedBinary;
use crate::job::JobConfig;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use eduplus_core::config::consts;
use eduplus_core::{BarcodeError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Options for a single generation run
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// `None` waits for the renderer indefinitely
    pub timeout: Option<Duration>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(consts::job::TIMEOUT_SECS)),
        }
    }
}

/// A barcode image the renderer reported and wrote successfully
#[derive(Debug, Clone)]
pub struct GeneratedBarcode {
    path: PathBuf,
    exec: ExecResult,
}

impl GeneratedBarcode {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exec_result(&self) -> &ExecResult {
        &self.exec
    }

    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        Ok(std::fs::read(&self.path)?)
    }

    /// Standard, padded base64 of the image bytes
    pub fn to_base64(&self) -> Result<String> {
        Ok(STANDARD.encode(self.read_bytes()?))
    }
}

/// Run the renderer once for `job`
///
/// Fails if the resolved binary has disappeared since resolution, if the
/// renderer exits non-zero (the error carries its output verbatim), or if it
/// exits zero without creating the output file.
pub fn generate_barcode(
    binary: &ResolvedBinary,
    job: &JobConfig,
    options: &GenerateOptions,
) -> Result<GeneratedBarcode> {
    if !binary.path.exists() {
        return Err(BarcodeError::BinaryMissing {
            path: binary.path.clone(),
        });
    }

    let exec = exec_binary(&ExecOptions {
        binary: binary.path.clone(),
        args: job.args(),
        timeout: options.timeout,
    })?;

    if !exec.success() {
        log::debug!(
            "renderer exited with {:?} after {}ms",
            exec.exit_code,
            exec.duration_ms
        );
        return Err(BarcodeError::ExecFailed {
            exit_code: exec.exit_code,
            output: exec.combined_output(),
        });
    }

    if !job.output().exists() {
        return Err(BarcodeError::OutputMissing {
            path: job.output().to_path_buf(),
        });
    }

    log::debug!(
        "generated {} {} in {}ms",
        job.symbology(),
        job.output().display(),
        exec.duration_ms
    );

    Ok(GeneratedBarcode {
        path: job.output().to_path_buf(),
        exec,
    })
}
