//! Test utilities for eduplus-barcode
//!
//! This crate provides shared testing utilities used across the workspace:
//! scratch directories, stub artifacts that stand in for the real renderer,
//! and HOME isolation for resolver tests.

pub mod env;
pub mod stub;

pub use env::{ENV_LOCK, with_isolated_home};
pub use stub::{
    stub_failing, stub_recording_args, stub_writing_output, write_plain_file, write_stub_binary,
};

use tempfile::TempDir;

/// Creates a temporary directory within `.tmp/` at the crate root
///
/// All test scratch files land in one gitignored location that is easy to
/// clean up by hand.
///
/// # Panics
///
/// Panics if the current directory is unavailable or `.tmp/` cannot be created.
///
/// # Examples
///
/// ```rust
/// use eduplus_testkit::temp_dir_in_workspace;
///
/// let temp = temp_dir_in_workspace();
/// let file_path = temp.path().join("test.txt");
/// std::fs::write(&file_path, "test data").unwrap();
/// ```
pub fn temp_dir_in_workspace() -> TempDir {
    try_temp_dir_in_workspace().expect("Failed to create temporary directory in .tmp/")
}

/// Alternative with Result for non-test code
pub fn try_temp_dir_in_workspace() -> std::io::Result<TempDir> {
    let workspace_root = std::env::current_dir()?;
    let tmp_base = workspace_root.join(".tmp");
    std::fs::create_dir_all(&tmp_base)?;
    TempDir::new_in(&tmp_base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_in_workspace_is_under_dot_tmp() {
        let temp = temp_dir_in_workspace();
        assert!(temp.path().exists());
        assert!(
            temp.path()
                .parent()
                .is_some_and(|parent| parent.ends_with(".tmp"))
        );
    }

    #[test]
    fn test_temp_dir_is_removed_on_drop() {
        let temp = temp_dir_in_workspace();
        let path = temp.path().to_path_buf();
        drop(temp);
        assert!(!path.exists());
    }
}
