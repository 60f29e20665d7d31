//! Fixed names and defaults shared across the workspace

/// Artifact naming and on-disk layout
pub mod artifact {
    /// Prefix of every platform artifact (e.g. `EduplusBarcode-linux-amd64`)
    pub const PREFIX: &str = "EduplusBarcode";

    /// Directory next to the running executable that holds the bundled artifacts
    pub const BUNDLED_DIR: &str = "bin";

    /// Per-user cache directory created under the home directory
    pub const CACHE_DIR_NAME: &str = "eduplus_barcode_bin";

    /// Used when no home directory can be discovered
    pub const HOME_FALLBACK: &str = "/tmp";
}

/// Executability probe
pub mod probe {
    /// Harmless flag passed when the permission query is unavailable
    pub const HELP_FLAG: &str = "-h";

    pub const TIMEOUT_SECS: u64 = 10;
}

/// Job defaults
pub mod job {
    pub const DEFAULT_TYPE: &str = "code128";

    pub const DEFAULT_WIDTH: u32 = 300;

    pub const DEFAULT_HEIGHT: u32 = 100;

    /// Upper bound on a single generation run, in seconds
    pub const TIMEOUT_SECS: u64 = 60;
}
