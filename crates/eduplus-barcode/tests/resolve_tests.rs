//! Resolution order and capability handling against real files
#![cfg(unix)]

use eduplus_barcode::{
    BinaryResolver, BinarySource, Capability, FixedHost, HostEnv, PlatformKey, ResolveOptions,
    ResolveState, SystemHost, VerifyMethod,
};
use eduplus_testkit::{
    stub_writing_output, temp_dir_in_workspace, with_isolated_home, write_plain_file,
    write_stub_binary,
};
use std::path::Path;
use std::time::Duration;

const ARTIFACT: &str = "EduplusBarcode-linux-amd64";

fn options(bundled_dir: &Path) -> ResolveOptions {
    ResolveOptions {
        bundled_dir: bundled_dir.to_path_buf(),
        cache_dir_name: "eduplus_barcode_bin".to_string(),
        probe_timeout: Duration::from_secs(5),
    }
}

fn linux_host(home: &Path) -> FixedHost {
    FixedHost::new("linux", "x86_64").with_home(home)
}

fn outcomes<H: HostEnv>(resolver: &BinaryResolver<H>) -> Vec<(String, String)> {
    resolver
        .attempts()
        .iter()
        .map(|a| (a.source.clone(), a.outcome.clone()))
        .collect()
}

#[test]
fn test_bundled_executable_wins() {
    let temp = temp_dir_in_workspace();
    let bin = temp.path().join("bin");
    let home = temp.path().join("home");
    let stub = write_stub_binary(&bin, ARTIFACT, &stub_writing_output("x"));

    let mut resolver = BinaryResolver::new(linux_host(&home), options(&bin));
    let resolved = resolver.resolve().unwrap().clone();

    assert_eq!(resolved.path, stub);
    assert_eq!(resolved.source, BinarySource::Bundled);
    assert_eq!(resolved.verified_by, VerifyMethod::PermissionQuery);
    assert!(
        !home.join("eduplus_barcode_bin").exists(),
        "cache must not be touched when the bundled copy works"
    );
}

#[test]
fn test_bundled_permissions_repaired() {
    let temp = temp_dir_in_workspace();
    let bin = temp.path().join("bin");
    write_plain_file(&bin, ARTIFACT, "#!/bin/sh\nexit 0\n");

    let mut resolver = BinaryResolver::new(linux_host(&temp.path().join("home")), options(&bin));
    let resolved = resolver.resolve().unwrap();

    assert_eq!(resolved.source, BinarySource::Bundled);
}

#[test]
fn test_arm64_linux_picks_arm64_artifact() {
    let temp = temp_dir_in_workspace();
    let bin = temp.path().join("bin");
    write_stub_binary(&bin, "EduplusBarcode-linux-amd64", "exit 0");
    let arm = write_stub_binary(&bin, "EduplusBarcode-linux-arm64", "exit 0");

    let host = FixedHost::new("Linux", "aarch64").with_home(temp.path().join("home"));
    let mut resolver = BinaryResolver::new(host, options(&bin));

    assert_eq!(resolver.resolve().unwrap().path, arm);
}

#[test]
fn test_cache_hit_when_bundled_missing() {
    let temp = temp_dir_in_workspace();
    let home = temp.path().join("home");
    let cached = write_stub_binary(&home.join("eduplus_barcode_bin"), ARTIFACT, "exit 0");

    let mut resolver = BinaryResolver::new(linux_host(&home), options(&temp.path().join("bin")));
    let resolved = resolver.resolve().unwrap().clone();

    assert_eq!(resolved.path, cached);
    assert_eq!(resolved.source, BinarySource::Cache);
    assert_eq!(
        outcomes(&resolver),
        vec![
            ("bundled".to_string(), "missing".to_string()),
            ("cache".to_string(), "ok".to_string()),
        ]
    );
}

#[test]
fn test_install_when_bundled_cannot_run_in_place() {
    let temp = temp_dir_in_workspace();
    let bin = temp.path().join("bin");
    let home = temp.path().join("home");

    // Fails silently when run from the bundled directory, works anywhere else
    let body = format!(
        "case \"$0\" in \"{}\"/*) exit 1 ;; esac\n{}",
        bin.display(),
        stub_writing_output("x")
    );
    write_stub_binary(&bin, ARTIFACT, &body);

    let host = linux_host(&home).disable(Capability::QueryExecutable);
    let mut resolver = BinaryResolver::new(host, options(&bin));
    let resolved = resolver.resolve().unwrap().clone();

    let expected = home.join("eduplus_barcode_bin").join(ARTIFACT);
    assert_eq!(resolved.path, expected);
    assert_eq!(resolved.source, BinarySource::Installed);
    assert_eq!(resolved.verified_by, VerifyMethod::ExecutionProbe);
    assert_eq!(
        std::fs::read_to_string(&expected).unwrap(),
        std::fs::read_to_string(bin.join(ARTIFACT)).unwrap()
    );
    assert_eq!(
        outcomes(&resolver),
        vec![
            ("bundled".to_string(), "not_executable".to_string()),
            ("cache".to_string(), "missing".to_string()),
            ("install".to_string(), "ok".to_string()),
        ]
    );
}

#[test]
fn test_hardened_host_degrades_without_panicking() {
    let temp = temp_dir_in_workspace();
    let bin = temp.path().join("bin");
    let home = temp.path().join("home");
    write_stub_binary(&bin, ARTIFACT, "exit 0");

    let host = linux_host(&home)
        .disable(Capability::SetPermissions)
        .disable(Capability::QueryExecutable)
        .disable(Capability::SpawnProcess)
        .disable(Capability::CopyFile);
    let mut resolver = BinaryResolver::new(host, options(&bin));

    let err = resolver.resolve().unwrap_err();
    assert!(
        err.to_string()
            .contains("Binary not found or not executable for your platform: linux (x86_64)")
    );
    assert!(matches!(resolver.state(), ResolveState::Failed(_)));
    assert!(!home.join("eduplus_barcode_bin").exists());
    assert_eq!(
        outcomes(&resolver),
        vec![
            ("bundled".to_string(), "chmod_skipped".to_string()),
            ("bundled".to_string(), "not_executable".to_string()),
            ("cache".to_string(), "missing".to_string()),
            ("install".to_string(), "failed".to_string()),
        ]
    );
}

#[test]
fn test_resolve_is_memoized() {
    let temp = temp_dir_in_workspace();
    let bin = temp.path().join("bin");
    let stub = write_stub_binary(&bin, ARTIFACT, "exit 0");

    let mut resolver = BinaryResolver::new(linux_host(&temp.path().join("home")), options(&bin));
    resolver.resolve().unwrap();
    let attempts = resolver.attempts().len();

    // The path stays cached even if the file changes underneath
    std::fs::remove_file(&stub).unwrap();
    assert_eq!(resolver.resolve().unwrap().path, stub);
    assert_eq!(resolver.attempts().len(), attempts);
}

#[test]
fn test_system_host_uses_home_cache() {
    with_isolated_home(|home| {
        let host = SystemHost::new();
        let Ok(platform) = PlatformKey::detect(&host.os_family(), &host.machine()) else {
            return;
        };
        let cached = write_stub_binary(
            &home.join("eduplus_barcode_bin"),
            &platform.artifact_name(),
            "exit 0",
        );

        let temp = temp_dir_in_workspace();
        let mut resolver = BinaryResolver::new(host, options(&temp.path().join("bin")));
        let resolved = resolver.resolve().unwrap();

        assert_eq!(resolved.path, cached);
        assert_eq!(resolved.source, BinarySource::Cache);
    });
}
