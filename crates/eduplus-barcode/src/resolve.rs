use crate::host::{HostEnv, SystemHost, resolve_home_dir};
use crate::info::{BinarySource, ResolutionAttempt, ResolvedBinary};
use crate::install::install_to_cache;
use crate::platform::PlatformKey;
use crate::verify::{mark_executable, verify_executable};
use eduplus_core::config::consts;
use eduplus_core::{BarcodeError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Options for resolving the renderer binary
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Directory holding the bundled per-platform artifacts
    pub bundled_dir: PathBuf,
    /// Name of the cache directory created under the home directory
    pub cache_dir_name: String,
    /// Upper bound on the `-h` execution probe
    pub probe_timeout: Duration,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            bundled_dir: default_bundled_dir(),
            cache_dir_name: consts::artifact::CACHE_DIR_NAME.to_string(),
            probe_timeout: Duration::from_secs(consts::probe::TIMEOUT_SECS),
        }
    }
}

/// `bin/` next to the running executable
pub fn default_bundled_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_default()
        .join(consts::artifact::BUNDLED_DIR)
}

/// Why resolution ended without a binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveFailure {
    pub os: String,
    pub arch: String,
    /// No artifact exists for this OS family at all
    pub unsupported_platform: bool,
}

impl ResolveFailure {
    pub fn to_error(&self) -> BarcodeError {
        if self.unsupported_platform {
            BarcodeError::PlatformUnsupported {
                os: self.os.clone(),
                arch: self.arch.clone(),
            }
        } else {
            BarcodeError::BinaryUnavailable {
                os: self.os.clone(),
                arch: self.arch.clone(),
            }
        }
    }

    pub fn message(&self) -> String {
        self.to_error().to_string()
    }
}

/// Lifecycle of a resolver instance
#[derive(Debug, Clone)]
pub enum ResolveState {
    Unresolved,
    Resolved(ResolvedBinary),
    Failed(ResolveFailure),
}

/// Locates, repairs, or installs the renderer for the current host
///
/// Resolution runs at most once per instance; its outcome, success or
/// failure, is kept for the lifetime of the resolver.
#[derive(Debug)]
pub struct BinaryResolver<H: HostEnv> {
    host: H,
    options: ResolveOptions,
    state: ResolveState,
    attempts: Vec<ResolutionAttempt>,
}

impl BinaryResolver<SystemHost> {
    pub fn system() -> Self {
        Self::new(SystemHost::new(), ResolveOptions::default())
    }
}

impl<H: HostEnv> BinaryResolver<H> {
    pub fn new(host: H, options: ResolveOptions) -> Self {
        Self {
            host,
            options,
            state: ResolveState::Unresolved,
            attempts: Vec::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    pub fn state(&self) -> &ResolveState {
        &self.state
    }

    pub fn attempts(&self) -> &[ResolutionAttempt] {
        &self.attempts
    }

    /// The resolved binary, if resolution has run and succeeded
    pub fn resolved(&self) -> Option<&ResolvedBinary> {
        match &self.state {
            ResolveState::Resolved(binary) => Some(binary),
            _ => None,
        }
    }

    /// Resolve the binary, or return the outcome of the earlier run
    ///
    /// Resolution order:
    /// 1. Bundled directory (after a best-effort chmod)
    /// 2. Existing copy in `<home>/<cache_dir_name>/`
    /// 3. Fresh copy of the bundled artifact into that cache
    pub fn resolve(&mut self) -> Result<&ResolvedBinary> {
        if let ResolveState::Unresolved = self.state {
            self.state = match self.run() {
                Ok(binary) => {
                    log::info!(
                        "resolved {} from {} ({})",
                        binary.path.display(),
                        binary.source,
                        binary.verified_by
                    );
                    ResolveState::Resolved(binary)
                }
                Err(failure) => {
                    log::warn!("binary resolution failed: {}", failure.message());
                    ResolveState::Failed(failure)
                }
            };
        }

        match &self.state {
            ResolveState::Resolved(binary) => Ok(binary),
            ResolveState::Failed(failure) => Err(failure.to_error()),
            ResolveState::Unresolved => Err(BarcodeError::BinaryNotResolved),
        }
    }

    fn record(&mut self, attempt: ResolutionAttempt) {
        log::debug!("resolution attempt: {}", attempt);
        self.attempts.push(attempt);
    }

    fn run(&mut self) -> std::result::Result<ResolvedBinary, ResolveFailure> {
        let os_family = self.host.os_family();
        let machine = self.host.machine();

        let Ok(platform) = PlatformKey::detect(&os_family, &machine) else {
            return Err(ResolveFailure {
                os: os_family,
                arch: machine,
                unsupported_platform: true,
            });
        };
        let artifact = platform.artifact_name();

        let bundled = self.options.bundled_dir.join(&artifact);
        if let Some(binary) = self.try_bundled(platform, &bundled) {
            return Ok(binary);
        }

        let cache_dir = resolve_home_dir(&self.host).join(&self.options.cache_dir_name);
        let cached = cache_dir.join(&artifact);
        if let Some(binary) = self.try_cached(platform, &cached) {
            return Ok(binary);
        }

        if let Some(binary) = self.try_install(platform, &bundled, &cache_dir, &artifact) {
            return Ok(binary);
        }

        Err(ResolveFailure {
            os: os_family,
            arch: machine,
            unsupported_platform: false,
        })
    }

    fn try_bundled(&mut self, platform: PlatformKey, path: &Path) -> Option<ResolvedBinary> {
        if !path.exists() {
            self.record(ResolutionAttempt::new(path, "bundled", "missing"));
            return None;
        }

        // Best-effort: a refused chmod is expected on hardened hosts
        if let Err(e) = mark_executable(&self.host, platform, path) {
            self.record(
                ResolutionAttempt::new(path, "bundled", "chmod_skipped").with_detail(e.to_string()),
            );
        }

        self.accept_if_executable(platform, path, BinarySource::Bundled)
    }

    fn try_cached(&mut self, platform: PlatformKey, path: &Path) -> Option<ResolvedBinary> {
        if !path.exists() {
            self.record(ResolutionAttempt::new(path, "cache", "missing"));
            return None;
        }

        self.accept_if_executable(platform, path, BinarySource::Cache)
    }

    fn try_install(
        &mut self,
        platform: PlatformKey,
        bundled: &Path,
        cache_dir: &Path,
        artifact: &str,
    ) -> Option<ResolvedBinary> {
        match install_to_cache(&self.host, platform, bundled, cache_dir, artifact) {
            Ok(dest) => self.accept_if_executable(platform, &dest, BinarySource::Installed),
            Err(e) => {
                self.record(
                    ResolutionAttempt::new(cache_dir.join(artifact), "install", "failed")
                        .with_detail(e.to_string()),
                );
                None
            }
        }
    }

    fn accept_if_executable(
        &mut self,
        platform: PlatformKey,
        path: &Path,
        source: BinarySource,
    ) -> Option<ResolvedBinary> {
        let label = match source {
            BinarySource::Bundled => "bundled",
            BinarySource::Cache => "cache",
            BinarySource::Installed => "install",
        };

        match verify_executable(&self.host, path, self.options.probe_timeout) {
            Some(method) => {
                self.record(ResolutionAttempt::new(path, label, "ok").with_detail(method.to_string()));
                Some(ResolvedBinary {
                    path: path.to_path_buf(),
                    source,
                    platform,
                    verified_by: method,
                })
            }
            None => {
                self.record(ResolutionAttempt::new(path, label, "not_executable"));
                None
            }
        }
    }
}
