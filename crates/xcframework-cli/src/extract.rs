//! Extract command implementation

use anyhow::{Context, Result};
use tracing::debug;
use xcframework_bundle::{Environment, ExtractRequest, Platform, StdFileSystem, XcFramework};

/// Turn raw command-line values into an extraction request.
pub fn build_request(
    source: &str,
    platform: &str,
    environment: Option<&str>,
    target_path: &str,
) -> Result<ExtractRequest> {
    let platform = Platform::parse(platform).with_context(|| {
        format!("Unknown platform: {platform} (expected one of: {})", platform_names())
    })?;

    let environment = environment
        .map(|env| {
            Environment::parse(env).with_context(|| {
                format!("Unknown environment: {env} (expected simulator or maccatalyst)")
            })
        })
        .transpose()?;

    Ok(ExtractRequest::new(source, platform, environment, target_path))
}

fn platform_names() -> String {
    Platform::all()
        .iter()
        .map(Platform::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Run the extract command
pub fn run(
    source: &str,
    platform: &str,
    environment: Option<&str>,
    target_path: &str,
    dry_run: bool,
) -> Result<()> {
    let request = build_request(source, platform, environment, target_path)?;
    debug!("Extract request: {request:?}");

    if dry_run {
        return print_plan(&request);
    }

    let report = xcframework_bundle::extract(&StdFileSystem, &request).with_context(|| {
        format!(
            "Failed to extract {} from {}",
            request.query(),
            request.source.display()
        )
    })?;

    println!(
        "✓ Extracted {} into {}",
        report.library_identifier,
        request.target.display()
    );
    for path in &report.copied {
        println!("  {}", path.display());
    }

    Ok(())
}

fn print_plan(request: &ExtractRequest) -> Result<()> {
    let bundle = XcFramework::open(&StdFileSystem, &request.source)
        .with_context(|| format!("Failed to open: {}", request.source.display()))?;

    let plan = bundle
        .plan(&request.query(), &request.target)
        .with_context(|| format!("Failed to resolve {}", request.query()))?;

    println!("Variant: {}", plan.library_identifier);
    for step in &plan.steps {
        println!(
            "  {}: {} -> {}",
            step.kind,
            step.source.display(),
            step.destination.display()
        );
    }

    Ok(())
}
