//! Descriptor schema for XCFramework bundles.
//!
//! The descriptor is the `Info.plist` property list at the bundle root. It
//! lists every platform variant the bundle carries, along with the relative
//! paths of each variant's payload.

use crate::platform::{Environment, canonical_platform_variant, public_platform_variant};
use crate::{BundleError, BundleResult, FORMAT_VERSION, PACKAGE_TYPE};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

/// Bundle descriptor - the decoded `Info.plist`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Descriptor schema version (e.g., "1.0").
    #[serde(rename = "XCFrameworkFormatVersion")]
    pub format_version: String,

    /// Bundle kind tag, always "XFWK" in practice. Not interpreted.
    #[serde(rename = "CFBundlePackageType")]
    pub package_type: String,

    /// Available variants, in descriptor order.
    #[serde(rename = "AvailableLibraries")]
    pub variants: Vec<Variant>,
}

/// One platform/environment-specific build within the bundle.
///
/// Equality compares the canonical environment, so `Some("")` equals `None`
/// and `"maccatalyst"` equals `"macabi"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    /// Subdirectory of the bundle root holding this variant (e.g., "ios-arm64").
    #[serde(rename = "LibraryIdentifier")]
    pub library_identifier: String,

    /// Platform string (e.g., "ios").
    #[serde(rename = "SupportedPlatform")]
    pub platform: String,

    /// Environment qualifier, stored in its internal spelling.
    /// `None` means the base platform.
    #[serde(
        rename = "SupportedPlatformVariant",
        default,
        skip_serializing_if = "platform_variant_serde::is_absent",
        with = "platform_variant_serde"
    )]
    pub platform_variant: Option<String>,

    /// Architectures in the payload. Informational only.
    #[serde(rename = "SupportedArchitectures")]
    pub architectures: Vec<String>,

    /// Primary payload, relative to the variant directory.
    #[serde(rename = "LibraryPath")]
    pub library_path: String,

    #[serde(rename = "BinaryPath", default, skip_serializing_if = "Option::is_none")]
    pub binary_path: Option<String>,

    #[serde(rename = "HeadersPath", default, skip_serializing_if = "Option::is_none")]
    pub headers_path: Option<String>,

    #[serde(
        rename = "DebugSymbolsPath",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub debug_symbols_path: Option<String>,

    #[serde(
        rename = "BitcodeSymbolMapsPath",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub bitcode_symbol_maps_path: Option<String>,

    #[serde(
        rename = "MergeableMetadata",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub mergeable_metadata: Option<bool>,
}

/// Applies the environment alias rule at the wire boundary: public spelling
/// on the wire, internal spelling in memory.
mod platform_variant_serde {
    use crate::platform::{canonical_platform_variant, public_platform_variant};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn is_absent(value: &Option<String>) -> bool {
        value.as_deref().and_then(canonical_platform_variant).is_none()
    }

    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value.as_deref().and_then(canonical_platform_variant) {
            Some(v) => serializer.serialize_some(public_platform_variant(v)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .and_then(canonical_platform_variant)
            .map(str::to_string))
    }
}

impl Manifest {
    /// Create an empty manifest with the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            package_type: PACKAGE_TYPE.to_string(),
            variants: Vec::new(),
        }
    }

    /// Append a variant.
    #[must_use]
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variants.push(variant);
        self
    }

    /// Decode a descriptor from property-list bytes (XML or binary).
    pub fn decode(bytes: &[u8]) -> BundleResult<Self> {
        plist::from_bytes(bytes).map_err(|e| BundleError::MalformedManifest(e.to_string()))
    }

    /// Encode as an XML property list.
    pub fn encode(&self) -> BundleResult<Vec<u8>> {
        let mut buf = Vec::new();
        plist::to_writer_xml(&mut buf, self)
            .map_err(|e| BundleError::MalformedManifest(e.to_string()))?;
        Ok(buf)
    }

    /// Get the variant stored under a library identifier.
    #[must_use]
    pub fn get_variant(&self, library_identifier: &str) -> Option<&Variant> {
        self.variants
            .iter()
            .find(|v| v.library_identifier == library_identifier)
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Variant {
    fn eq(&self, other: &Self) -> bool {
        self.library_identifier == other.library_identifier
            && self.platform == other.platform
            && self.canonical_environment() == other.canonical_environment()
            && self.architectures == other.architectures
            && self.library_path == other.library_path
            && self.binary_path == other.binary_path
            && self.headers_path == other.headers_path
            && self.debug_symbols_path == other.debug_symbols_path
            && self.bitcode_symbol_maps_path == other.bitcode_symbol_maps_path
            && self.mergeable_metadata == other.mergeable_metadata
    }
}

impl Eq for Variant {}

impl Variant {
    /// Create a variant with its required fields; optional paths start unset.
    pub fn new(
        library_identifier: impl Into<String>,
        platform: impl Into<String>,
        library_path: impl Into<String>,
    ) -> Self {
        Self {
            library_identifier: library_identifier.into(),
            platform: platform.into(),
            platform_variant: None,
            architectures: Vec::new(),
            library_path: library_path.into(),
            binary_path: None,
            headers_path: None,
            debug_symbols_path: None,
            bitcode_symbol_maps_path: None,
            mergeable_metadata: None,
        }
    }

    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.platform_variant = Some(environment.platform_variant().to_string());
        self
    }

    #[must_use]
    pub fn with_architectures(mut self, architectures: &[&str]) -> Self {
        self.architectures = architectures.iter().map(|a| a.to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_headers(mut self, headers_path: impl Into<String>) -> Self {
        self.headers_path = Some(headers_path.into());
        self
    }

    #[must_use]
    pub fn with_debug_symbols(mut self, debug_symbols_path: impl Into<String>) -> Self {
        self.debug_symbols_path = Some(debug_symbols_path.into());
        self
    }

    #[must_use]
    pub fn with_bitcode_symbol_maps(mut self, bitcode_symbol_maps_path: impl Into<String>) -> Self {
        self.bitcode_symbol_maps_path = Some(bitcode_symbol_maps_path.into());
        self
    }

    /// Check that every path in the variant stays inside its base directory.
    ///
    /// The library identifier and each payload path must be relative, non-empty
    /// and free of `..`; anything else could name files outside the bundle or
    /// the target.
    pub fn validate(&self) -> BundleResult<()> {
        check_relative_path("LibraryIdentifier", &self.library_identifier)?;
        check_relative_path("LibraryPath", &self.library_path)?;

        let optional = [
            ("HeadersPath", &self.headers_path),
            ("DebugSymbolsPath", &self.debug_symbols_path),
            ("BitcodeSymbolMapsPath", &self.bitcode_symbol_maps_path),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                check_relative_path(key, value)?;
            }
        }

        Ok(())
    }

    /// Canonical environment qualifier, treating an empty value as absent.
    #[must_use]
    pub fn canonical_environment(&self) -> Option<&str> {
        self.platform_variant
            .as_deref()
            .and_then(canonical_platform_variant)
    }

    /// Known environment of this variant, if any.
    #[must_use]
    pub fn environment(&self) -> Option<Environment> {
        self.canonical_environment().and_then(Environment::parse)
    }

    /// Human-readable `platform[-environment]` name (e.g., "ios-maccatalyst").
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.canonical_environment() {
            Some(env) => format!("{}-{}", self.platform, public_platform_variant(env)),
            None => self.platform.clone(),
        }
    }
}

fn check_relative_path(key: &str, value: &str) -> BundleResult<()> {
    let mut named = false;
    for component in Path::new(value).components() {
        match component {
            Component::Normal(_) => named = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(BundleError::MalformedManifest(format!(
                    "{key} must be a relative path inside the bundle: {value:?}"
                )));
            }
        }
    }

    if !named {
        return Err(BundleError::MalformedManifest(format!(
            "{key} must name a file or directory: {value:?}"
        )));
    }

    Ok(())
}
