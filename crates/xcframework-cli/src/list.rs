//! List command implementation

use anyhow::{Context, Result};
use xcframework_bundle::{StdFileSystem, XcFramework};

/// Run the list command
pub fn run(source: &str, json: bool) -> Result<()> {
    let bundle = XcFramework::open(&StdFileSystem, source)
        .with_context(|| format!("Failed to open: {source}"))?;
    let manifest = bundle.manifest();

    if json {
        println!("{}", serde_json::to_string_pretty(manifest)?);
        return Ok(());
    }

    println!("XCFramework: {source}");
    println!("Format: v{}", manifest.format_version);

    println!("\nVariants:");
    for variant in &manifest.variants {
        println!("  {} ({}):", variant.library_identifier, variant.display_name());
        println!("    Library: {}", variant.library_path);
        println!("    Architectures: {}", variant.architectures.join(", "));
        if let Some(headers) = &variant.headers_path {
            println!("    Headers: {headers}");
        }
        if let Some(dsyms) = &variant.debug_symbols_path {
            println!("    Debug symbols: {dsyms}");
        }
    }

    Ok(())
}
