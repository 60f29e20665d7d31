//! Fluent, diagnostics-collecting front end over resolution and generation
//!
//! [`Barcode`] never returns errors. Every failure is kept as a
//! [`Diagnostic`] and the generating calls report success as a `bool` or an
//! `Option`. Resolution and setter diagnostics live as long as the instance;
//! each `generate*` call replaces the diagnostics of the call before it.

use crate::generate::{GenerateOptions, GeneratedBarcode, generate_barcode};
use crate::host::{HostEnv, SystemHost};
use crate::job::JobBuilder;
use crate::resolve::BinaryResolver;
use eduplus_core::{BarcodeError, ErrorKind};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// One collected failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    #[serde(serialize_with = "serialize_kind")]
    pub kind: ErrorKind,
    pub message: String,
}

fn serialize_kind<S: serde::Serializer>(kind: &ErrorKind, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(kind)
}

impl From<&BarcodeError> for Diagnostic {
    /// A renderer failure is reported as the renderer's own output, verbatim
    fn from(error: &BarcodeError) -> Self {
        let message = match error {
            BarcodeError::ExecFailed { output, .. } if !output.is_empty() => output.clone(),
            other => other.to_string(),
        };
        Self {
            kind: error.kind(),
            message,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

pub struct Barcode<H: HostEnv = SystemHost> {
    resolver: BinaryResolver<H>,
    job: JobBuilder,
    options: GenerateOptions,
    resolution: Option<Diagnostic>,
    generation: Vec<Diagnostic>,
}

impl Barcode<SystemHost> {
    /// Resolve the renderer for the running host and start an empty job
    pub fn create() -> Self {
        Self::with_resolver(BinaryResolver::system())
    }

    /// One-shot generation with the system resolver
    pub fn quick(
        text: &str,
        output: impl Into<PathBuf>,
        barcode_type: &str,
        width: u32,
        height: u32,
    ) -> bool {
        Self::create()
            .text(text)
            .output(output)
            .barcode_type(barcode_type)
            .width(width)
            .height(height)
            .generate()
    }
}

impl<H: HostEnv> Barcode<H> {
    /// Wrap `resolver`, resolving it now if it has not run yet
    pub fn with_resolver(mut resolver: BinaryResolver<H>) -> Self {
        let resolution = resolver.resolve().err().map(|e| Diagnostic::from(&e));

        Self {
            resolver,
            job: JobBuilder::new(),
            options: GenerateOptions::default(),
            resolution,
            generation: Vec::new(),
        }
    }

    pub fn resolver(&self) -> &BinaryResolver<H> {
        &self.resolver
    }

    pub fn job(&self) -> &JobBuilder {
        &self.job
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.job = self.job.text(text);
        self
    }

    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.job = self.job.output(output);
        self
    }

    /// Set the symbology by name
    ///
    /// An unknown name is recorded as a diagnostic and the previous type stays
    /// in effect.
    pub fn barcode_type(mut self, name: &str) -> Self {
        self.job = self.job.symbology_name(name);
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.job = self.job.width(width);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.job = self.job.height(height);
        self
    }

    /// Bound on the renderer run; `None` waits indefinitely
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Generate the image; `true` only if the output file was written
    pub fn generate(&mut self) -> bool {
        self.run().is_some()
    }

    /// Generate and return the image bytes
    pub fn generate_bytes(&mut self) -> Option<Vec<u8>> {
        let generated = self.run()?;
        self.collect(generated.read_bytes())
    }

    /// Generate and return the image as standard base64
    pub fn generate_base64(&mut self) -> Option<String> {
        let generated = self.run()?;
        self.collect(generated.to_base64())
    }

    /// All diagnostics: resolution, then rejected settings, then the last
    /// generation
    pub fn errors(&self) -> Vec<Diagnostic> {
        let rejected = self.job.rejections().iter().map(|message| Diagnostic {
            kind: ErrorKind::ConfigInvalid,
            message: message.clone(),
        });

        self.resolution
            .iter()
            .cloned()
            .chain(rejected)
            .chain(self.generation.iter().cloned())
            .collect()
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors().into_iter().map(|d| d.message).collect()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors().is_empty()
    }

    fn record(&mut self, error: BarcodeError) {
        log::debug!("{}", error);
        self.generation.push(Diagnostic::from(&error));
    }

    fn collect<T>(&mut self, result: eduplus_core::Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.record(e);
                None
            }
        }
    }

    fn run(&mut self) -> Option<GeneratedBarcode> {
        self.generation.clear();

        let job = match self.job.build() {
            Ok(job) => job,
            Err(errors) => {
                for error in errors {
                    self.record(error);
                }
                return None;
            }
        };

        let binary = match self.resolver.resolve() {
            Ok(binary) => binary.clone(),
            Err(_) => {
                self.record(BarcodeError::BinaryNotResolved);
                return None;
            }
        };

        let result = generate_barcode(&binary, &job, &self.options);
        self.collect(result)
    }
}
