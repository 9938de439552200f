//! Bundle extraction.
//!
//! [`XcFramework`] opens a bundle directory and decodes its descriptor;
//! [`extract`] runs the whole pipeline for an [`ExtractRequest`]:
//! validate, decode, select, resolve, copy.

use crate::fs::FileSystem;
use crate::resolver::{CopyPlan, resolve};
use crate::selector::VariantQuery;
use crate::{
    BUNDLE_EXTENSION, BundleError, BundleResult, Environment, INFO_PLIST_FILE, Manifest, Platform,
    Variant,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything needed to copy one variant out of a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractRequest {
    /// Path to the `.xcframework` directory.
    pub source: PathBuf,
    pub platform: Platform,
    pub environment: Option<Environment>,
    /// Destination directory; created if absent.
    pub target: PathBuf,
}

impl ExtractRequest {
    pub fn new(
        source: impl Into<PathBuf>,
        platform: Platform,
        environment: Option<Environment>,
        target: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source: source.into(),
            platform,
            environment,
            target: target.into(),
        }
    }

    #[must_use]
    pub fn query(&self) -> VariantQuery {
        VariantQuery::new(self.platform, self.environment)
    }
}

/// Outcome of a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractReport {
    pub library_identifier: String,
    /// Destination paths, in copy order.
    pub copied: Vec<PathBuf>,
}

/// Check that `path` is an existing directory named `*.xcframework`.
pub fn validate_source(fs: &dyn FileSystem, path: &Path) -> BundleResult<()> {
    if !fs.exists(path) {
        return Err(BundleError::InvalidInput(format!(
            "the xcframework path does not exist: {}",
            path.display()
        )));
    }

    if !fs.is_dir(path) {
        return Err(BundleError::InvalidInput(format!(
            "the xcframework path is not a directory: {}",
            path.display()
        )));
    }

    if path.extension().and_then(|e| e.to_str()) != Some(BUNDLE_EXTENSION) {
        return Err(BundleError::InvalidInput(format!(
            "the path must end with '.{BUNDLE_EXTENSION}': {}",
            path.display()
        )));
    }

    Ok(())
}

/// An opened bundle.
pub struct XcFramework<'fs> {
    fs: &'fs dyn FileSystem,
    root: PathBuf,
    manifest: Manifest,
}

impl<'fs> XcFramework<'fs> {
    /// Validate the bundle directory and decode its `Info.plist`.
    pub fn open(fs: &'fs dyn FileSystem, root: impl Into<PathBuf>) -> BundleResult<Self> {
        let root = root.into();
        validate_source(fs, &root)?;

        let plist_path = root.join(INFO_PLIST_FILE);
        if !fs.exists(&plist_path) {
            return Err(BundleError::InvalidInput(format!(
                "there is no {INFO_PLIST_FILE} found at {}",
                root.display()
            )));
        }

        let bytes = fs.read(&plist_path).map_err(|e| {
            BundleError::MalformedManifest(format!("cannot read {}: {e}", plist_path.display()))
        })?;
        let manifest = Manifest::decode(&bytes)?;

        Ok(Self { fs, root, manifest })
    }

    /// Get the decoded descriptor.
    #[must_use]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find the variant matching `query`.
    pub fn select(&self, query: &VariantQuery) -> BundleResult<&Variant> {
        self.manifest.select(query)
    }

    /// Select a variant and resolve its copy plan into `target`.
    ///
    /// Nothing is written; every existence check is done here.
    pub fn plan(&self, query: &VariantQuery, target: &Path) -> BundleResult<CopyPlan> {
        let variant = self.select(query)?;
        info!(
            "Selected {} ({}) for {query}",
            variant.library_identifier,
            variant.display_name()
        );
        resolve(self.fs, &self.root, target, variant)
    }

    /// Copy the variant matching `query` into `target`.
    pub fn extract(&self, query: &VariantQuery, target: &Path) -> BundleResult<ExtractReport> {
        let plan = self.plan(query, target)?;

        prepare_target(self.fs, target)?;
        let copied = plan.execute(self.fs)?;

        info!(
            "Extracted {} ({} entries) into {}",
            plan.library_identifier,
            copied.len(),
            target.display()
        );

        Ok(ExtractReport {
            library_identifier: plan.library_identifier,
            copied,
        })
    }
}

fn prepare_target(fs: &dyn FileSystem, target: &Path) -> BundleResult<()> {
    if fs.exists(target) {
        if !fs.is_dir(target) {
            return Err(BundleError::InvalidInput(format!(
                "the target path is not a directory: {}",
                target.display()
            )));
        }
        return Ok(());
    }

    fs.create_dir_all(target)
        .map_err(|source| BundleError::CopyFailure {
            operation: "create directory",
            path: target.to_path_buf(),
            source,
        })
}

/// Run a full extraction.
pub fn extract(fs: &dyn FileSystem, request: &ExtractRequest) -> BundleResult<ExtractReport> {
    info!("xcframework: {}", request.source.display());
    info!("platform: {}", request.query());

    XcFramework::open(fs, &request.source)?.extract(&request.query(), &request.target)
}
