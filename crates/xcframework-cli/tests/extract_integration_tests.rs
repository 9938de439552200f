//! Integration tests for XCFramework extraction on a real filesystem.
//!
//! Builds small bundles under a temp directory and runs both the library
//! pipeline and the `process-xcframework` binary against them.

#![allow(non_snake_case)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use xcframework_bundle::{
    BundleError, Environment, ExtractRequest, Manifest, Platform, StdFileSystem, Variant, extract,
};

/// Helper to write a file, creating its parent directories.
fn write_file(path: &Path, contents: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Helper to lay out a bundle directory with the given descriptor.
fn create_bundle(temp_dir: &TempDir, name: &str, manifest: &Manifest) -> PathBuf {
    let root = temp_dir.path().join(format!("{name}.xcframework"));
    write_file(&root.join("Info.plist"), &manifest.encode().unwrap());
    root
}

/// Bundle with one iOS device framework that ships headers.
fn create_framework_bundle(temp_dir: &TempDir) -> PathBuf {
    let manifest = Manifest::new().with_variant(
        Variant::new("ios-arm64", "ios", "MyLib.framework")
            .with_architectures(&["arm64"])
            .with_headers("Headers"),
    );
    let root = create_bundle(temp_dir, "MyLib", &manifest);
    write_file(&root.join("ios-arm64/MyLib.framework/MyLib"), b"device binary");
    write_file(&root.join("ios-arm64/Headers/MyLib.h"), b"#pragma once");
    write_file(&root.join("ios-arm64/Headers/MyLibVersion.h"), b"#define V 1");
    root
}

/// Bundle with static archives plus Swift sidecars for three variants.
fn create_static_bundle(temp_dir: &TempDir) -> PathBuf {
    let manifest = Manifest::new()
        .with_variant(Variant::new("ios-arm64", "ios", "libMyLib.a").with_headers("Headers"))
        .with_variant(
            Variant::new("ios-arm64_x86_64-simulator", "ios", "libMyLib.a")
                .with_environment(Environment::Simulator),
        )
        .with_variant(
            Variant::new("ios-arm64_x86_64-maccatalyst", "ios", "libMyLib.a")
                .with_environment(Environment::MacCatalyst)
                .with_debug_symbols("dSYMs/libMyLib.a.dSYM"),
        );
    let root = create_bundle(temp_dir, "MyStatic", &manifest);

    write_file(&root.join("ios-arm64/libMyLib.a"), b"device");
    write_file(&root.join("ios-arm64/Headers/MyLib.h"), b"#pragma once");
    write_file(&root.join("ios-arm64/MyLib.swiftmodule/arm64.swiftinterface"), b"");
    write_file(&root.join("ios-arm64/MyLib.swiftdoc"), b"doc");

    write_file(&root.join("ios-arm64_x86_64-simulator/libMyLib.a"), b"simulator");

    let catalyst = root.join("ios-arm64_x86_64-maccatalyst");
    write_file(&catalyst.join("libMyLib.a"), b"catalyst");
    write_file(
        &catalyst.join("dSYMs/libMyLib.a.dSYM/Contents/Resources/DWARF/libMyLib.a"),
        b"dwarf",
    );
    root
}

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_process-xcframework"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

// =============================================================================
// Library pipeline
// =============================================================================

mod pipeline {
    use super::*;

    #[test]
    fn extract___framework_with_headers___copies_framework_and_include() {
        let temp_dir = TempDir::new().unwrap();
        let bundle = create_framework_bundle(&temp_dir);
        let out = temp_dir.path().join("out");

        let request = ExtractRequest::new(&bundle, Platform::Ios, None, &out);
        let report = extract(&StdFileSystem, &request).unwrap();

        assert_eq!(report.library_identifier, "ios-arm64");
        assert_eq!(
            fs::read(out.join("MyLib.framework/MyLib")).unwrap(),
            b"device binary"
        );
        assert_eq!(fs::read(out.join("include/MyLib.h")).unwrap(), b"#pragma once");
        assert!(out.join("include/MyLibVersion.h").exists());
    }

    #[test]
    fn extract___creates_nested_target_directory() {
        let temp_dir = TempDir::new().unwrap();
        let bundle = create_framework_bundle(&temp_dir);
        let out = temp_dir.path().join("deep").join("nested").join("out");

        extract(
            &StdFileSystem,
            &ExtractRequest::new(&bundle, Platform::Ios, None, &out),
        )
        .unwrap();

        assert!(out.join("MyLib.framework").is_dir());
    }

    #[test]
    fn extract___static_archive___copies_sidecars() {
        let temp_dir = TempDir::new().unwrap();
        let bundle = create_static_bundle(&temp_dir);
        let out = temp_dir.path().join("out");

        extract(
            &StdFileSystem,
            &ExtractRequest::new(&bundle, Platform::Ios, None, &out),
        )
        .unwrap();

        assert_eq!(fs::read(out.join("libMyLib.a")).unwrap(), b"device");
        assert!(out.join("MyLib.swiftmodule/arm64.swiftinterface").exists());
        assert_eq!(fs::read(out.join("MyLib.swiftdoc")).unwrap(), b"doc");
        assert!(out.join("include/MyLib.h").exists());
    }

    #[test]
    fn extract___simulator___selects_simulator_variant() {
        let temp_dir = TempDir::new().unwrap();
        let bundle = create_static_bundle(&temp_dir);
        let out = temp_dir.path().join("out");

        let report = extract(
            &StdFileSystem,
            &ExtractRequest::new(&bundle, Platform::Ios, Some(Environment::Simulator), &out),
        )
        .unwrap();

        assert_eq!(report.library_identifier, "ios-arm64_x86_64-simulator");
        assert_eq!(fs::read(out.join("libMyLib.a")).unwrap(), b"simulator");
        assert!(!out.join("include").exists());
    }

    #[test]
    fn extract___maccatalyst___copies_debug_symbols_by_base_name() {
        let temp_dir = TempDir::new().unwrap();
        let bundle = create_static_bundle(&temp_dir);
        let out = temp_dir.path().join("out");

        extract(
            &StdFileSystem,
            &ExtractRequest::new(
                &bundle,
                Platform::Ios,
                Some(Environment::MacCatalyst),
                &out,
            ),
        )
        .unwrap();

        assert_eq!(fs::read(out.join("libMyLib.a")).unwrap(), b"catalyst");
        assert!(
            out.join("libMyLib.a.dSYM/Contents/Resources/DWARF/libMyLib.a")
                .exists()
        );
    }

    #[test]
    fn extract___rerun___overwrites_previous_output() {
        let temp_dir = TempDir::new().unwrap();
        let bundle = create_framework_bundle(&temp_dir);
        let out = temp_dir.path().join("out");
        let request = ExtractRequest::new(&bundle, Platform::Ios, None, &out);

        extract(&StdFileSystem, &request).unwrap();
        write_file(&out.join("include/Stale.h"), b"stale");
        write_file(&bundle.join("ios-arm64/MyLib.framework/MyLib"), b"rebuilt");
        extract(&StdFileSystem, &request).unwrap();

        assert_eq!(fs::read(out.join("MyLib.framework/MyLib")).unwrap(), b"rebuilt");
        assert!(!out.join("include/Stale.h").exists());
    }

    #[test]
    fn extract___unrelated_target_files___left_alone() {
        let temp_dir = TempDir::new().unwrap();
        let bundle = create_framework_bundle(&temp_dir);
        let out = temp_dir.path().join("out");
        write_file(&out.join("keep.txt"), b"keep");

        extract(
            &StdFileSystem,
            &ExtractRequest::new(&bundle, Platform::Ios, None, &out),
        )
        .unwrap();

        assert_eq!(fs::read(out.join("keep.txt")).unwrap(), b"keep");
    }

    #[test]
    fn extract___missing_platform___returns_no_matching_variant() {
        let temp_dir = TempDir::new().unwrap();
        let bundle = create_framework_bundle(&temp_dir);
        let out = temp_dir.path().join("out");

        let err = extract(
            &StdFileSystem,
            &ExtractRequest::new(&bundle, Platform::Tvos, None, &out),
        )
        .unwrap_err();

        assert!(matches!(err, BundleError::NoMatchingVariant { .. }));
        assert!(err.to_string().contains("tvos"));
        assert!(!out.exists());
    }

    #[test]
    fn extract___source_without_suffix___returns_invalid_input() {
        let temp_dir = TempDir::new().unwrap();
        let not_a_bundle = temp_dir.path().join("MyLib");
        fs::create_dir_all(&not_a_bundle).unwrap();

        let err = extract(
            &StdFileSystem,
            &ExtractRequest::new(&not_a_bundle, Platform::Ios, None, temp_dir.path()),
        )
        .unwrap_err();

        assert!(matches!(err, BundleError::InvalidInput(_)));
    }
}

// =============================================================================
// Binary
// =============================================================================

mod cli {
    use super::*;

    #[test]
    fn extract___succeeds_and_reports_copied_paths() {
        let temp_dir = TempDir::new().unwrap();
        let bundle = create_framework_bundle(&temp_dir);
        let out = temp_dir.path().join("out");

        let output = run_cli(&[
            "extract",
            "--xcframework",
            bundle.to_str().unwrap(),
            "--platform",
            "ios",
            "--target-path",
            out.to_str().unwrap(),
        ]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("ios-arm64"));
        assert!(out.join("MyLib.framework/MyLib").exists());
    }

    #[test]
    fn extract___dry_run___writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let bundle = create_framework_bundle(&temp_dir);
        let out = temp_dir.path().join("out");

        let output = run_cli(&[
            "extract",
            "--xcframework",
            bundle.to_str().unwrap(),
            "--platform",
            "ios",
            "--target-path",
            out.to_str().unwrap(),
            "--dry-run",
        ]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("library"));
        assert!(stdout.contains("headers"));
        assert!(!out.exists());
    }

    #[test]
    fn extract___unknown_environment___fails() {
        let temp_dir = TempDir::new().unwrap();
        let bundle = create_framework_bundle(&temp_dir);

        let output = run_cli(&[
            "extract",
            "--xcframework",
            bundle.to_str().unwrap(),
            "--platform",
            "ios",
            "--environment",
            "device",
            "--target-path",
            temp_dir.path().join("out").to_str().unwrap(),
        ]);

        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown environment"));
    }

    #[test]
    fn extract___no_matching_variant___fails_with_query_in_message() {
        let temp_dir = TempDir::new().unwrap();
        let bundle = create_framework_bundle(&temp_dir);

        let output = run_cli(&[
            "extract",
            "--xcframework",
            bundle.to_str().unwrap(),
            "--platform",
            "ios",
            "--environment",
            "maccatalyst",
            "--target-path",
            temp_dir.path().join("out").to_str().unwrap(),
        ]);

        assert!(!output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("ios"));
        assert!(stderr.contains("maccatalyst"));
    }

    #[test]
    fn list___json___prints_public_spelling() {
        let temp_dir = TempDir::new().unwrap();
        let bundle = create_static_bundle(&temp_dir);

        let output = run_cli(&["list", "--xcframework", bundle.to_str().unwrap(), "--json"]);

        assert!(output.status.success());
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let variants = json["AvailableLibraries"].as_array().unwrap();
        assert_eq!(variants.len(), 3);
        assert_eq!(variants[2]["SupportedPlatformVariant"], "maccatalyst");
    }

    #[test]
    fn list___text___shows_display_names() {
        let temp_dir = TempDir::new().unwrap();
        let bundle = create_static_bundle(&temp_dir);

        let output = run_cli(&["list", "--xcframework", bundle.to_str().unwrap()]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("ios-simulator"));
        assert!(stdout.contains("ios-maccatalyst"));
    }
}
