//! Permission repair and executability checks
//!
//! Marking a file executable is best-effort: callers log a failure and move
//! on, relying on [`verify_executable`] to decide whether the file is usable.

use crate::exec::{ExecOptions, exec_binary};
use crate::host::{Capability, HostEnv};
use crate::info::VerifyMethod;
use crate::platform::PlatformKey;
use eduplus_core::config::consts;
use eduplus_core::{BarcodeError, Result};
use std::path::Path;
use std::time::Duration;

/// Attempt to set mode 0755 on `path`
///
/// A no-op on Windows targets. Fails if the host disabled permission changes
/// or the filesystem refused them.
pub fn mark_executable(host: &impl HostEnv, platform: PlatformKey, path: &Path) -> Result<()> {
    if platform.is_windows() {
        return Ok(());
    }

    if !host.is_enabled(Capability::SetPermissions) {
        return Err(BarcodeError::CapabilityDisabled(
            Capability::SetPermissions.to_string(),
        ));
    }

    set_mode_755(path)
}

#[cfg(unix)]
fn set_mode_755(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn set_mode_755(_path: &Path) -> Result<()> {
    Ok(())
}

/// Direct filesystem answer to "is this file marked executable"
#[cfg(unix)]
pub fn is_marked_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
pub fn is_marked_executable(path: &Path) -> bool {
    let executable_ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ["exe", "bat", "cmd", "com"].contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false);
    path.is_file() && executable_ext
}

/// Run `<path> -h`; exit 0 or any output counts as runnable
fn probe_execution(path: &Path, timeout: Duration) -> bool {
    let options = ExecOptions {
        binary: path.to_path_buf(),
        args: vec![consts::probe::HELP_FLAG.into()],
        timeout: Some(timeout),
    };

    match exec_binary(&options) {
        Ok(result) => result.success() || result.has_output(),
        Err(e) => {
            log::debug!("probe of {} failed: {}", path.display(), e);
            false
        }
    }
}

/// Decide whether `path` can be run on this host
///
/// Prefers the permission query. Only when that capability is unavailable
/// does it fall back to an execution probe, and with neither available the
/// file is treated as not executable.
pub fn verify_executable(
    host: &impl HostEnv,
    path: &Path,
    probe_timeout: Duration,
) -> Option<VerifyMethod> {
    if !path.exists() {
        return None;
    }

    if host.is_enabled(Capability::QueryExecutable) {
        return is_marked_executable(path).then_some(VerifyMethod::PermissionQuery);
    }

    if host.is_enabled(Capability::SpawnProcess) {
        return probe_execution(path, probe_timeout).then_some(VerifyMethod::ExecutionProbe);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::FixedHost;
    use crate::platform::{Arch, Os};

    const LINUX: PlatformKey = PlatformKey {
        os: Os::Linux,
        arch: Arch::Amd64,
    };
    const WINDOWS: PlatformKey = PlatformKey {
        os: Os::Windows,
        arch: Arch::Amd64,
    };

    fn host() -> FixedHost {
        FixedHost::new("linux", "x86_64")
    }

    #[test]
    fn test_verify_missing_file() {
        let missing = Path::new("/nonexistent/EduplusBarcode-linux-amd64");
        assert_eq!(verify_executable(&host(), missing, Duration::from_secs(1)), None);
    }

    #[test]
    fn test_mark_executable_skipped_on_windows() {
        let disabled = host().disable(Capability::SetPermissions);
        let path = Path::new("/nonexistent/EduplusBarcode-windows-amd64.exe");
        assert!(mark_executable(&disabled, WINDOWS, path).is_ok());
    }

    #[test]
    fn test_mark_executable_reports_disabled_capability() {
        let disabled = host().disable(Capability::SetPermissions);
        let err = mark_executable(&disabled, LINUX, Path::new("/whatever")).unwrap_err();
        assert!(matches!(err, BarcodeError::CapabilityDisabled(ref cap) if cap == "set-permissions"));
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use eduplus_testkit::{
            temp_dir_in_workspace, write_plain_file, write_stub_binary, stub_failing,
        };

        #[test]
        fn test_mark_executable_sets_mode() {
            let temp = temp_dir_in_workspace();
            let path = write_plain_file(temp.path(), "artifact", "#!/bin/sh\nexit 0\n");
            assert!(!is_marked_executable(&path));

            mark_executable(&host(), LINUX, &path).unwrap();
            assert!(is_marked_executable(&path));
        }

        #[test]
        fn test_verify_by_permission_query() {
            let temp = temp_dir_in_workspace();
            let path = write_stub_binary(temp.path(), "artifact", "exit 0");
            assert_eq!(
                verify_executable(&host(), &path, Duration::from_secs(5)),
                Some(VerifyMethod::PermissionQuery)
            );
        }

        #[test]
        fn test_permission_query_no_does_not_fall_back_to_probe() {
            let temp = temp_dir_in_workspace();
            let path = write_plain_file(temp.path(), "artifact", "#!/bin/sh\necho hi\n");
            assert_eq!(verify_executable(&host(), &path, Duration::from_secs(5)), None);
        }

        #[test]
        fn test_verify_by_probe_when_query_disabled() {
            let temp = temp_dir_in_workspace();
            let path = write_stub_binary(temp.path(), "artifact", &stub_failing("usage: artifact", 2));
            let host = host().disable(Capability::QueryExecutable);

            // Non-zero exit but help text on stdout still proves it runs
            assert_eq!(
                verify_executable(&host, &path, Duration::from_secs(5)),
                Some(VerifyMethod::ExecutionProbe)
            );
        }

        #[test]
        fn test_probe_rejects_silent_failure() {
            let temp = temp_dir_in_workspace();
            let path = write_stub_binary(temp.path(), "artifact", "exit 1");
            let host = host().disable(Capability::QueryExecutable);
            assert_eq!(verify_executable(&host, &path, Duration::from_secs(5)), None);
        }

        #[test]
        fn test_probe_rejects_non_executable_file() {
            let temp = temp_dir_in_workspace();
            let path = write_plain_file(temp.path(), "artifact", "#!/bin/sh\necho hi\n");
            let host = host().disable(Capability::QueryExecutable);
            assert_eq!(verify_executable(&host, &path, Duration::from_secs(5)), None);
        }

        #[test]
        fn test_no_verification_capability_means_not_executable() {
            let temp = temp_dir_in_workspace();
            let path = write_stub_binary(temp.path(), "artifact", "exit 0");
            let host = host()
                .disable(Capability::QueryExecutable)
                .disable(Capability::SpawnProcess);
            assert_eq!(verify_executable(&host, &path, Duration::from_secs(5)), None);
        }
    }
}
