//! Installation of the bundled artifact into the per-user cache

use crate::host::{Capability, HostEnv};
use crate::platform::PlatformKey;
use crate::verify::mark_executable;
use eduplus_core::{BarcodeError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Create `dir` and its parents with mode 0755
fn create_cache_dir(dir: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }

    builder.create(dir)
}

/// Copy `from` into `dest_dir` under `name`, atomically
///
/// The bytes go to a temporary file in the destination directory first and
/// are then renamed into place, so a concurrent resolver never observes a
/// half-written artifact.
fn atomic_copy(from: &Path, dest_dir: &Path, name: &str) -> io::Result<PathBuf> {
    let to = dest_dir.join(name);

    let mut src_file = fs::File::open(from)?;
    let mut temp_dest = tempfile::NamedTempFile::new_in(dest_dir)?;
    io::copy(&mut src_file, &mut temp_dest)?;

    // NamedTempFile starts at 0600; keep the source mode
    #[cfg(unix)]
    {
        let permissions = fs::metadata(from)?.permissions();
        fs::set_permissions(temp_dest.path(), permissions)?;
    }

    temp_dest.as_file().sync_all()?;
    drop(src_file);

    temp_dest.persist(&to).map_err(|e| e.error)?;

    Ok(to)
}

/// Copy the bundled artifact into `cache_dir`
///
/// Requires the copy capability, an existing source, and either an existing
/// cache directory or the directory-creation capability. Marking the copy
/// executable is attempted but never fatal; the caller re-verifies the
/// returned path.
pub fn install_to_cache(
    host: &impl HostEnv,
    platform: PlatformKey,
    source: &Path,
    cache_dir: &Path,
    artifact: &str,
) -> Result<PathBuf> {
    if !host.is_enabled(Capability::CopyFile) {
        return Err(BarcodeError::CapabilityDisabled(
            Capability::CopyFile.to_string(),
        ));
    }

    if !source.is_file() {
        return Err(BarcodeError::InstallFailed(format!(
            "bundled artifact '{}' does not exist",
            source.display()
        )));
    }

    if !cache_dir.is_dir() {
        if !host.is_enabled(Capability::CreateDir) {
            return Err(BarcodeError::CapabilityDisabled(
                Capability::CreateDir.to_string(),
            ));
        }
        create_cache_dir(cache_dir).map_err(|e| {
            BarcodeError::InstallFailed(format!(
                "cannot create cache directory '{}': {}",
                cache_dir.display(),
                e
            ))
        })?;
    }

    let dest = atomic_copy(source, cache_dir, artifact).map_err(|e| {
        BarcodeError::InstallFailed(format!(
            "cannot copy '{}' into '{}': {}",
            source.display(),
            cache_dir.display(),
            e
        ))
    })?;

    if let Err(e) = mark_executable(host, platform, &dest) {
        log::warn!(
            "could not mark {} executable, continuing: {}",
            dest.display(),
            e
        );
    }

    log::info!("installed {} into {}", artifact, cache_dir.display());
    Ok(dest)
}
