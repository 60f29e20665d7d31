//! Stub artifacts for process-level tests
//!
//! The real renderer is an opaque external binary. Tests replace it with
//! small POSIX shell scripts that honour the same `-o <output>` contract.

use std::path::{Path, PathBuf};

/// Write an executable shell script named `name` into `dir`
///
/// `body` is appended after a `#!/bin/sh` line. On Unix the file is made
/// executable (0755).
///
/// # Panics
///
/// Panics if the file cannot be written or its mode cannot be set.
pub fn write_stub_binary(dir: &Path, name: &str, body: &str) -> PathBuf {
    std::fs::create_dir_all(dir).expect("Failed to create stub directory");
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write stub binary");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
    }

    path
}

/// Write a file without touching its permissions (0644 on Unix)
pub fn write_plain_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    std::fs::create_dir_all(dir).expect("Failed to create directory");
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write file");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o644);
        std::fs::set_permissions(&path, perms).unwrap();
    }

    path
}

/// Single-quote a value for inclusion in a shell script
fn sh_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Shell fragment that stores the value following `-o` in `$out`
const PARSE_OUTPUT_FLAG: &str = r#"out=""
while [ $# -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift 2 ;;
    *) shift ;;
  esac
done"#;

/// Body of a stub that writes `content` to the `-o` path and exits 0
///
/// Invoked without `-o` (e.g. the `-h` probe) it prints a usage line.
pub fn stub_writing_output(content: &str) -> String {
    format!(
        "{PARSE_OUTPUT_FLAG}\nif [ -z \"$out\" ]; then echo 'usage: stub -t TEXT -o OUTPUT'; exit 0; fi\nprintf '%s' {} > \"$out\"",
        sh_quote(content)
    )
}

/// Body of a stub that prints `message` and exits with `code`, writing nothing
pub fn stub_failing(message: &str, code: i32) -> String {
    format!("echo {}\nexit {code}", sh_quote(message))
}

/// Body of a stub that records every argument (one per line) to `record`,
/// then behaves like [`stub_writing_output`]
pub fn stub_recording_args(record: &Path, content: &str) -> String {
    let record = sh_quote(&record.to_string_lossy());
    format!(
        "for arg in \"$@\"; do printf '%s\\n' \"$arg\" >> {record}; done\n{}",
        stub_writing_output(content)
    )
}
