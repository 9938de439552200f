//! XCFramework bundle handling
//!
//! This crate provides types and utilities for reading `.xcframework` bundles -
//! directories aggregating several platform-specific builds of one library -
//! and for copying a single build out of them.
//!
//! # Bundle Structure
//!
//! ```text
//! MyLib.xcframework
//! ├── Info.plist
//! ├── ios-arm64/
//! │   ├── MyLib.framework
//! │   └── dSYMs/
//! │       └── MyLib.framework.dSYM
//! ├── ios-arm64_x86_64-simulator/
//! │   └── MyLib.framework
//! └── macos-arm64_x86_64/
//!     ├── libMyLib.a
//!     ├── MyLib.swiftmodule
//!     └── Headers/
//! ```
//!
//! # Example
//!
//! ```no_run
//! use xcframework_bundle::{Environment, ExtractRequest, Platform, StdFileSystem, extract};
//!
//! let request = ExtractRequest::new(
//!     "MyLib.xcframework",
//!     Platform::Ios,
//!     Some(Environment::Simulator),
//!     "build/out",
//! );
//! let report = extract(&StdFileSystem, &request)?;
//! println!("copied {} entries", report.copied.len());
//! # Ok::<(), xcframework_bundle::BundleError>(())
//! ```

mod error;
mod manifest;
mod platform;

pub mod extractor;
pub mod fs;
pub mod resolver;
pub mod selector;

pub use error::BundleError;
pub use extractor::{ExtractReport, ExtractRequest, XcFramework, extract, validate_source};
pub use fs::{FileSystem, MemoryFileSystem, StdFileSystem, copy_with_overwrite};
pub use manifest::{Manifest, Variant};
pub use platform::{Environment, Platform, canonical_platform_variant, public_platform_variant};
pub use resolver::{ArtifactKind, CopyPlan, CopyStep, resolve};
pub use selector::{VariantQuery, select};

/// Result type for bundle operations.
pub type BundleResult<T> = Result<T, BundleError>;

/// Bundle directory extension.
pub const BUNDLE_EXTENSION: &str = "xcframework";

/// Descriptor file name within the bundle root.
pub const INFO_PLIST_FILE: &str = "Info.plist";

/// `CFBundlePackageType` value identifying an XCFramework.
pub const PACKAGE_TYPE: &str = "XFWK";

/// Descriptor format version written by [`Manifest::new`].
pub const FORMAT_VERSION: &str = "1.0";

/// Directory under the target that receives a variant's headers.
pub const HEADERS_DIR: &str = "include";
