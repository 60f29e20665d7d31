use eduplus_core::config::consts;
use eduplus_core::{BarcodeError, Result};
use serde::Serialize;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Barcode encoding scheme understood by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbology {
    #[default]
    Code128,
    Code39,
    Ean13,
}

impl Symbology {
    pub const ALL: [Symbology; 3] = [Symbology::Code128, Symbology::Code39, Symbology::Ean13];

    pub fn as_str(self) -> &'static str {
        match self {
            Symbology::Code128 => "code128",
            Symbology::Code39 => "code39",
            Symbology::Ean13 => "ean13",
        }
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symbology {
    type Err = BarcodeError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_ascii_lowercase();
        Symbology::ALL
            .into_iter()
            .find(|sym| sym.as_str() == lower)
            .ok_or_else(|| {
                BarcodeError::ConfigInvalid(format!(
                    "Invalid barcode type: {s}. Use code128, code39, or ean13."
                ))
            })
    }
}

/// A validated, immutable generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobConfig {
    text: String,
    output: PathBuf,
    symbology: Symbology,
    width: u32,
    height: u32,
}

impl JobConfig {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn symbology(&self) -> Symbology {
        self.symbology
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Arguments for the renderer, each value its own argv entry
    ///
    /// `-t <text> -o <output> -type <type> -w <width> -height <height>`
    pub fn args(&self) -> Vec<OsString> {
        vec![
            "-t".into(),
            self.text.clone().into(),
            "-o".into(),
            self.output.clone().into_os_string(),
            "-type".into(),
            self.symbology.as_str().into(),
            "-w".into(),
            self.width.to_string().into(),
            "-height".into(),
            self.height.to_string().into(),
        ]
    }
}

/// Collects job settings; rejected values never overwrite accepted ones
#[derive(Debug, Clone)]
pub struct JobBuilder {
    text: Option<String>,
    output: Option<PathBuf>,
    symbology: Symbology,
    width: u32,
    height: u32,
    rejections: Vec<String>,
}

impl Default for JobBuilder {
    fn default() -> Self {
        Self {
            text: None,
            output: None,
            symbology: Symbology::default(),
            width: consts::job::DEFAULT_WIDTH,
            height: consts::job::DEFAULT_HEIGHT,
            rejections: Vec::new(),
        }
    }
}

impl JobBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn symbology(mut self, symbology: Symbology) -> Self {
        self.symbology = symbology;
        self
    }

    /// Set the symbology by name; an unknown name is recorded and ignored
    pub fn symbology_name(mut self, name: &str) -> Self {
        match name.parse::<Symbology>() {
            Ok(symbology) => self.symbology = symbology,
            Err(e) => self.reject(e),
        }
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        if width == 0 {
            self.reject(BarcodeError::ConfigInvalid(
                "Width must be a positive integer".to_string(),
            ));
        } else {
            self.width = width;
        }
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        if height == 0 {
            self.reject(BarcodeError::ConfigInvalid(
                "Height must be a positive integer".to_string(),
            ));
        } else {
            self.height = height;
        }
        self
    }

    fn reject(&mut self, error: BarcodeError) {
        log::warn!("{}", error);
        self.rejections.push(error.to_string());
    }

    /// Values refused by setters, oldest first; none of them block `build`
    pub fn rejections(&self) -> &[String] {
        &self.rejections
    }

    pub fn current_symbology(&self) -> Symbology {
        self.symbology
    }

    /// Validate the required fields
    ///
    /// Missing text and missing output are reported as separate errors, in
    /// that order.
    pub fn build(&self) -> std::result::Result<JobConfig, Vec<BarcodeError>> {
        let mut errors = Vec::new();

        let text = self.text.clone().filter(|text| !text.is_empty());
        if text.is_none() {
            errors.push(BarcodeError::ConfigInvalid("Text is required".to_string()));
        }

        let output = self
            .output
            .clone()
            .filter(|output| !output.as_os_str().is_empty());
        if output.is_none() {
            errors.push(BarcodeError::ConfigInvalid(
                "Output path is required".to_string(),
            ));
        }

        match (text, output) {
            (Some(text), Some(output)) => Ok(JobConfig {
                text,
                output,
                symbology: self.symbology,
                width: self.width,
                height: self.height,
            }),
            _ => Err(errors),
        }
    }
}
