//! Error types for bundle operations.

use crate::resolver::ArtifactKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a bundle or copying a variant out of it.
#[derive(Debug, Error)]
pub enum BundleError {
    /// Source or target path failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Descriptor is missing required keys or is not a property list.
    #[error("Malformed manifest: {0}")]
    MalformedManifest(String),

    /// No variant satisfies the requested platform and environment.
    #[error(
        "No matching variant for platform '{platform}' (environment: {})",
        .environment.as_deref().unwrap_or("none")
    )]
    NoMatchingVariant {
        platform: String,
        environment: Option<String>,
    },

    /// A path referenced by the selected variant does not exist.
    #[error("Missing {kind}: {}", .path.display())]
    MissingArtifact { kind: ArtifactKind, path: PathBuf },

    /// Removing, creating, copying or listing an entry failed.
    #[error("Failed to {operation} {}: {source}", .path.display())]
    CopyFailure {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error outside of a copy step.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn BundleError___invalid_input___displays_message() {
        let err = BundleError::InvalidInput("path does not exist: /tmp/x".to_string());

        assert_eq!(err.to_string(), "Invalid input: path does not exist: /tmp/x");
    }

    #[test]
    fn BundleError___no_matching_variant___displays_platform_and_environment() {
        let err = BundleError::NoMatchingVariant {
            platform: "ios".to_string(),
            environment: Some("maccatalyst".to_string()),
        };

        let msg = err.to_string();
        assert!(msg.contains("ios"));
        assert!(msg.contains("maccatalyst"));
    }

    #[test]
    fn BundleError___no_matching_variant_without_environment___displays_none() {
        let err = BundleError::NoMatchingVariant {
            platform: "tvos".to_string(),
            environment: None,
        };

        assert_eq!(
            err.to_string(),
            "No matching variant for platform 'tvos' (environment: none)"
        );
    }

    #[test]
    fn BundleError___missing_artifact___displays_kind_and_path() {
        let err = BundleError::MissingArtifact {
            kind: ArtifactKind::DebugSymbols,
            path: PathBuf::from("/b/ios-arm64/dSYMs"),
        };

        assert_eq!(
            err.to_string(),
            "Missing debug symbols: /b/ios-arm64/dSYMs"
        );
    }

    #[test]
    fn BundleError___copy_failure___displays_operation_and_path() {
        let err = BundleError::CopyFailure {
            operation: "remove",
            path: PathBuf::from("/out/MyLib.framework"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };

        let msg = err.to_string();
        assert!(msg.contains("remove"));
        assert!(msg.contains("/out/MyLib.framework"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn BundleError___from_io_error___converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: BundleError = io_err.into();

        assert!(matches!(err, BundleError::Io(_)));
    }
}
