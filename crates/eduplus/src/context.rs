//! Settings shared by all commands: config file merged with global flags

use anyhow::{Context as _, Result};
use eduplus_barcode::{BinaryResolver, Capability, ResolveOptions, SystemHost};
use eduplus_core::config::{JobSettings, Settings};
use std::path::PathBuf;
use std::time::Duration;

/// Global flags that take precedence over the settings file
#[derive(Debug, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub bin_dir: Option<PathBuf>,
    pub disable: Vec<String>,
    pub timeout: Option<u64>,
}

pub struct Context {
    pub settings: Settings,
    pub disabled: Vec<Capability>,
}

impl Context {
    /// Load the settings file (if any) and apply `overrides`
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be read or parsed, or a
    /// capability name is unknown.
    pub fn new(overrides: Overrides) -> Result<Self> {
        let mut settings = Settings::load_or_default(overrides.config.as_deref())
            .context("Failed to load settings")?;

        if let Some(bin_dir) = overrides.bin_dir {
            settings.resolver.bin_dir = Some(bin_dir);
        }
        if let Some(timeout) = overrides.timeout {
            settings.job.timeout_secs = timeout;
        }
        settings.resolver.disabled.extend(overrides.disable);

        let disabled = settings
            .resolver
            .disabled
            .iter()
            .map(|name| name.parse::<Capability>())
            .collect::<eduplus_core::Result<Vec<_>>>()?;

        Ok(Self { settings, disabled })
    }

    pub fn job(&self) -> &JobSettings {
        &self.settings.job
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        let defaults = ResolveOptions::default();
        ResolveOptions {
            bundled_dir: self
                .settings
                .resolver
                .bin_dir
                .clone()
                .unwrap_or(defaults.bundled_dir),
            cache_dir_name: self.settings.resolver.cache_dir_name.clone(),
            probe_timeout: Duration::from_secs(self.settings.resolver.probe_timeout_secs),
        }
    }

    pub fn resolver(&self) -> BinaryResolver<SystemHost> {
        BinaryResolver::new(
            SystemHost::with_disabled(self.disabled.iter().copied()),
            self.resolve_options(),
        )
    }

    /// `None` when the configured timeout is 0
    pub fn generate_timeout(&self) -> Option<Duration> {
        match self.settings.job.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
