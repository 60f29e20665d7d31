//! Environment isolation utilities for testing
//!
//! Resolver tests that go through the real host read `HOME`. These helpers
//! serialize such tests and point `HOME` at a throwaway directory.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Static mutex to serialize tests that modify environment variables
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Run a test with `HOME` pointing at a fresh temporary directory
///
/// The closure receives the fake home. The previous value of `HOME` is
/// restored afterwards, even if it was unset.
///
/// # Examples
///
/// ```no_run
/// use eduplus_testkit::with_isolated_home;
///
/// with_isolated_home(|home| {
///     assert_eq!(std::env::var("HOME").unwrap(), home.to_string_lossy());
/// });
/// ```
pub fn with_isolated_home<F, R>(f: F) -> R
where
    F: FnOnce(&Path) -> R,
{
    let _guard = ENV_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let original_home = std::env::var("HOME").ok();

    let fake_home = TempDir::new().unwrap();
    let fake_home_path = PathBuf::from(fake_home.path());

    // SAFETY: We hold ENV_LOCK, so no other test touches the environment concurrently.
    unsafe {
        std::env::set_var("HOME", &fake_home_path);
    }

    let result = f(&fake_home_path);

    drop(fake_home);

    // SAFETY: We still hold ENV_LOCK.
    unsafe {
        if let Some(home) = original_home {
            std::env::set_var("HOME", home);
        } else {
            std::env::remove_var("HOME");
        }
    }

    result
}
