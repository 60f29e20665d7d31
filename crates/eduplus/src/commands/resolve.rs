//! Resolve command - report which renderer binary is used and why

use crate::context::Context;
use crate::output::{print_json, print_text};
use anyhow::{Result, bail};
use eduplus_barcode::{HostEnv, PlatformKey, ResolutionAttempt, ResolvedBinary};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ResolveReport {
    os_family: String,
    machine: String,
    platform: Option<PlatformKey>,
    artifact: Option<String>,
    resolved: Option<ResolvedBinary>,
    error: Option<String>,
    attempts: Vec<ResolutionAttempt>,
}

/// Execute `eduplus-barcode resolve`
pub fn run(ctx: &Context, json: bool) -> Result<()> {
    let mut resolver = ctx.resolver();
    let os_family = resolver.host().os_family();
    let machine = resolver.host().machine();
    let platform = PlatformKey::detect(&os_family, &machine).ok();

    let (resolved, error) = match resolver.resolve() {
        Ok(binary) => (Some(binary.clone()), None),
        Err(e) => (None, Some(e.to_string())),
    };

    let report = ResolveReport {
        os_family,
        machine,
        platform,
        artifact: platform.map(|p| p.artifact_name()),
        resolved,
        error,
        attempts: resolver.attempts().to_vec(),
    };

    if json {
        print_json(&serde_json::to_string_pretty(&report)?)?;
    } else {
        print_human(&report)?;
    }

    if let Some(error) = report.error {
        bail!(error);
    }
    Ok(())
}

fn print_human(report: &ResolveReport) -> std::io::Result<()> {
    print_text("Renderer Resolution")?;
    print_text("===================")?;
    print_text("")?;
    print_text(&format!("Host:     {} ({})", report.os_family, report.machine))?;

    if let Some(artifact) = &report.artifact {
        print_text(&format!("Artifact: {}", artifact))?;
    }

    if let Some(binary) = &report.resolved {
        print_text(&format!("Path:     {}", binary.path.display()))?;
        print_text(&format!("Source:   {}", binary.source))?;
        print_text(&format!("Verified: {}", binary.verified_by))?;
    }

    if !report.attempts.is_empty() {
        print_text("")?;
        print_text("Attempts:")?;
        for attempt in &report.attempts {
            print_text(&format!("  {}", attempt))?;
        }
    }

    Ok(())
}
