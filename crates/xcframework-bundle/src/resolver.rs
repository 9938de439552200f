//! Artifact resolution.
//!
//! Turns a selected [`Variant`] into a [`CopyPlan`]: the ordered list of
//! entries to copy from the bundle into the target directory. All existence
//! checks happen while the plan is built, so a plan that resolves cleanly
//! can be executed without touching the bundle's layout again.

use crate::fs::{FileSystem, copy_with_overwrite};
use crate::{BundleError, BundleResult, HEADERS_DIR, Variant};
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Payload extensions that carry Swift sidecar files next to them.
pub const SIDECAR_TRIGGER_EXTENSIONS: &[&str] = &["dylib", "a"];

/// Extensions of the interface/module/doc files copied alongside a binary payload.
pub const SIDECAR_EXTENSIONS: &[&str] = &["swiftinterface", "swiftmodule", "swiftdoc"];

/// Kind of payload a copy step carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Library,
    DebugSymbols,
    BitcodeSymbolMaps,
    Headers,
    Sidecar,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Library => "library",
            Self::DebugSymbols => "debug symbols",
            Self::BitcodeSymbolMaps => "bitcode symbol maps",
            Self::Headers => "headers",
            Self::Sidecar => "sidecar file",
        };
        f.write_str(name)
    }
}

/// One entry to copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyStep {
    pub kind: ArtifactKind,
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Only the primary payload is required; the other steps exist because
    /// the descriptor or the variant directory asked for them.
    pub required: bool,
}

/// Ordered copy steps for one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyPlan {
    pub library_identifier: String,
    pub steps: Vec<CopyStep>,
}

impl CopyPlan {
    /// Get the steps of a given kind.
    pub fn steps_of(&self, kind: ArtifactKind) -> impl Iterator<Item = &CopyStep> {
        self.steps.iter().filter(move |s| s.kind == kind)
    }

    /// Run every step in order through [`copy_with_overwrite`].
    ///
    /// Stops at the first failure; steps already copied stay in place.
    /// Returns the destination of each copied step.
    pub fn execute(&self, fs: &dyn FileSystem) -> BundleResult<Vec<PathBuf>> {
        let mut copied = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            copy_with_overwrite(fs, &step.source, &step.destination)?;
            copied.push(step.destination.clone());
        }
        Ok(copied)
    }
}

/// Build the copy plan for `variant` of the bundle at `bundle_root`.
///
/// Steps, in order:
/// 1. the primary payload, to `target_root/<LibraryPath>` (must exist);
/// 2. debug symbols, to `target_root/<base name>` (must exist if listed);
/// 3. bitcode symbol maps, likewise;
/// 4. headers, to `target_root/include` (skipped if listed but absent);
/// 5. Swift sidecar files next to a `.dylib` or `.a` payload.
///
/// Descriptor paths that are empty, absolute or climb out with `..` are
/// rejected as [`BundleError::MalformedManifest`] before any step is planned.
pub fn resolve(
    fs: &dyn FileSystem,
    bundle_root: &Path,
    target_root: &Path,
    variant: &Variant,
) -> BundleResult<CopyPlan> {
    variant.validate()?;

    let variant_dir = bundle_root.join(&variant.library_identifier);
    let mut steps = Vec::new();

    let library_source = variant_dir.join(&variant.library_path);
    if !fs.exists(&library_source) {
        return Err(BundleError::MissingArtifact {
            kind: ArtifactKind::Library,
            path: library_source,
        });
    }
    steps.push(CopyStep {
        kind: ArtifactKind::Library,
        source: library_source,
        destination: target_root.join(&variant.library_path),
        required: true,
    });

    let strict_optional = [
        (ArtifactKind::DebugSymbols, &variant.debug_symbols_path),
        (
            ArtifactKind::BitcodeSymbolMaps,
            &variant.bitcode_symbol_maps_path,
        ),
    ];
    for (kind, relative) in strict_optional {
        let Some(relative) = relative else {
            continue;
        };
        let source = variant_dir.join(relative);
        if !fs.exists(&source) {
            return Err(BundleError::MissingArtifact { kind, path: source });
        }
        let destination = target_root.join(base_name(relative)?);
        steps.push(CopyStep {
            kind,
            source,
            destination,
            required: false,
        });
    }

    if let Some(headers) = &variant.headers_path {
        let source = variant_dir.join(headers);
        if fs.exists(&source) {
            steps.push(CopyStep {
                kind: ArtifactKind::Headers,
                source,
                destination: target_root.join(HEADERS_DIR),
                required: false,
            });
        } else {
            debug!("Headers not found, skipping: {}", source.display());
        }
    }

    if has_extension(Path::new(&variant.library_path), SIDECAR_TRIGGER_EXTENSIONS) {
        let entries = fs
            .read_dir(&variant_dir)
            .map_err(|source| BundleError::CopyFailure {
                operation: "list directory",
                path: variant_dir.clone(),
                source,
            })?;
        for entry in entries {
            if !has_extension(&entry, SIDECAR_EXTENSIONS) {
                continue;
            }
            let Some(name) = entry.file_name() else {
                continue;
            };
            let destination = target_root.join(name);
            steps.push(CopyStep {
                kind: ArtifactKind::Sidecar,
                source: entry,
                destination,
                required: false,
            });
        }
    }

    for step in &steps {
        debug!(
            "Planned {}: {} -> {}",
            step.kind,
            step.source.display(),
            step.destination.display()
        );
    }

    Ok(CopyPlan {
        library_identifier: variant.library_identifier.clone(),
        steps,
    })
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| extensions.contains(&ext))
}

fn base_name(relative: &str) -> BundleResult<&OsStr> {
    Path::new(relative).file_name().ok_or_else(|| {
        BundleError::MalformedManifest(format!("path has no file name: {relative}"))
    })
}
