use super::consts;
use crate::error::{BarcodeError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// eduplus-barcode.toml schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub resolver: ResolverSettings,
    #[serde(default)]
    pub job: JobSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverSettings {
    /// Overrides the bundled artifact directory
    #[serde(default)]
    pub bin_dir: Option<PathBuf>,
    #[serde(default = "default_cache_dir_name")]
    pub cache_dir_name: String,
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    /// Capability names to treat as unavailable (e.g. "set-permissions")
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            bin_dir: None,
            cache_dir_name: default_cache_dir_name(),
            probe_timeout_secs: default_probe_timeout_secs(),
            disabled: Vec::new(),
        }
    }
}

fn default_cache_dir_name() -> String {
    consts::artifact::CACHE_DIR_NAME.to_string()
}

fn default_probe_timeout_secs() -> u64 {
    consts::probe::TIMEOUT_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSettings {
    #[serde(rename = "type", default = "default_type")]
    pub barcode_type: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// 0 disables the bound
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            barcode_type: default_type(),
            width: default_width(),
            height: default_height(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_type() -> String {
    consts::job::DEFAULT_TYPE.to_string()
}

fn default_width() -> u32 {
    consts::job::DEFAULT_WIDTH
}

fn default_height() -> u32 {
    consts::job::DEFAULT_HEIGHT
}

fn default_timeout_secs() -> u64 {
    consts::job::TIMEOUT_SECS
}

impl Settings {
    /// Read settings from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| BarcodeError::ConfigParseError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| BarcodeError::ConfigParseError(e.to_string()))
    }

    /// Read settings if a path is given, otherwise fall back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eduplus_testkit::temp_dir_in_workspace;

    #[test]
    fn test_defaults_match_constants() {
        let settings = Settings::default();
        assert_eq!(settings.resolver.cache_dir_name, "eduplus_barcode_bin");
        assert_eq!(settings.resolver.probe_timeout_secs, 10);
        assert!(settings.resolver.bin_dir.is_none());
        assert_eq!(settings.job.barcode_type, "code128");
        assert_eq!(settings.job.width, 300);
        assert_eq!(settings.job.height, 100);
        assert_eq!(settings.job.timeout_secs, 60);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: Settings = toml::from_str(
            r#"
[resolver]
bin_dir = "/opt/eduplus/bin"
disabled = ["set-permissions", "query-executable"]

[job]
type = "ean13"
"#,
        )
        .unwrap();

        assert_eq!(
            settings.resolver.bin_dir,
            Some(PathBuf::from("/opt/eduplus/bin"))
        );
        assert_eq!(settings.resolver.disabled.len(), 2);
        assert_eq!(settings.resolver.cache_dir_name, "eduplus_barcode_bin");
        assert_eq!(settings.job.barcode_type, "ean13");
        assert_eq!(settings.job.width, 300);
    }

    #[test]
    fn test_from_file_roundtrip() {
        let temp = temp_dir_in_workspace();
        let path = temp.path().join("eduplus-barcode.toml");
        std::fs::write(&path, "[job]\nwidth = 420\ntimeout_secs = 0\n").unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.job.width, 420);
        assert_eq!(settings.job.timeout_secs, 0);
    }

    #[test]
    fn test_from_file_reports_parse_error() {
        let temp = temp_dir_in_workspace();
        let path = temp.path().join("broken.toml");
        std::fs::write(&path, "[job\nwidth = ").unwrap();

        let err = Settings::from_file(&path).unwrap_err();
        assert!(err.to_string().starts_with("CONFIG_PARSE_ERROR"));
    }

    #[test]
    fn test_load_or_default_without_path() {
        let settings = Settings::load_or_default(None).unwrap();
        assert_eq!(settings.job.height, 100);
    }

    #[test]
    fn test_load_or_default_missing_file_is_error() {
        let missing = PathBuf::from("/nonexistent/eduplus-barcode.toml");
        assert!(Settings::load_or_default(Some(&missing)).is_err());
    }
}
