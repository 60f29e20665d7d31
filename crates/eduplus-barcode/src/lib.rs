//! Platform-adaptive launcher for the EduplusBarcode renderer.
//!
//! The renderer ships as one prebuilt executable per platform
//! (`EduplusBarcode-<os>-<arch>[.exe]`). This crate finds a runnable copy for
//! the current host and drives it to produce barcode images.
//!
//! # Architecture
//!
//! - [`platform`]: OS/architecture detection and artifact naming
//! - [`host`]: capability interface over the running machine
//! - [`resolve`]: binary resolution with a three-tier search
//! - [`job`]: validated generation requests
//! - [`generate`]: one renderer run per job
//! - [`barcode`]: fluent front end collecting diagnostics
//!
//! # Binary Resolution Flow
//!
//! ```text
//! BinaryResolver::resolve()
//!     ↓
//! 0. Detect platform (unsupported OS fails here, no filesystem access)
//!     ↓
//! 1. Bundled: {bundled_dir}/{artifact}
//!     → chmod 0755 (best-effort)
//!     → verify executable
//!     ↓ (missing or not executable)
//! 2. Cache: {home}/eduplus_barcode_bin/{artifact}
//!     → verify executable
//!     ↓ (missing or not executable)
//! 3. Install: copy bundled artifact into the cache
//!     → verify executable
//!     ↓ (failed)
//! 4. BINARY_UNAVAILABLE, remembered for the resolver's lifetime
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use eduplus_barcode::Barcode;
//!
//! let mut barcode = Barcode::create()
//!     .text("ABC-123")
//!     .output("label.png")
//!     .barcode_type("code39")
//!     .width(400);
//!
//! if !barcode.generate() {
//!     for message in barcode.error_messages() {
//!         eprintln!("{message}");
//!     }
//! }
//! ```

pub mod barcode;
pub mod exec;
pub mod generate;
pub mod host;
pub mod info;
pub mod install;
pub mod job;
pub mod platform;
pub mod resolve;
pub mod verify;

pub use barcode::{Barcode, Diagnostic};
pub use eduplus_core::{BarcodeError, ErrorKind, Result};
pub use exec::{ExecOptions, ExecResult, exec_binary};
pub use generate::{GenerateOptions, GeneratedBarcode, generate_barcode};
pub use host::{Capability, FixedHost, HostEnv, SystemHost, resolve_home_dir};
pub use info::{BinarySource, ResolutionAttempt, ResolvedBinary, VerifyMethod};
pub use install::install_to_cache;
pub use job::{JobBuilder, JobConfig, Symbology};
pub use platform::{Arch, Os, PlatformKey};
pub use resolve::{BinaryResolver, ResolveFailure, ResolveOptions, ResolveState};
pub use verify::{mark_executable, verify_executable};
