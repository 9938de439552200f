//! Variant selection.
//!
//! Matches a `(platform, environment)` query against the variants listed in a
//! [`Manifest`]. The first matching variant in descriptor order wins.
//!
//! A variant matches when its platform equals the requested one and its
//! canonical environment equals the requested environment (or both are
//! absent). Older tooling matched on the environment alone when one was
//! requested; that looser rule is not supported.

use crate::{BundleError, BundleResult, Environment, Manifest, Platform, Variant};
use std::fmt;

/// A platform/environment pair to resolve against a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariantQuery {
    pub platform: Platform,
    pub environment: Option<Environment>,
}

impl VariantQuery {
    #[must_use]
    pub fn new(platform: Platform, environment: Option<Environment>) -> Self {
        Self {
            platform,
            environment,
        }
    }

    /// Check whether a variant satisfies this query.
    #[must_use]
    pub fn matches(&self, variant: &Variant) -> bool {
        if variant.platform != self.platform.as_str() {
            return false;
        }

        match self.environment {
            Some(env) => variant.canonical_environment() == Some(env.platform_variant()),
            None => variant.canonical_environment().is_none(),
        }
    }
}

impl fmt::Display for VariantQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.environment {
            Some(env) => write!(f, "{}-{}", self.platform, env),
            None => write!(f, "{}", self.platform),
        }
    }
}

/// Find the variant matching `query`.
pub fn select<'a>(manifest: &'a Manifest, query: &VariantQuery) -> BundleResult<&'a Variant> {
    manifest
        .variants
        .iter()
        .find(|v| query.matches(v))
        .ok_or_else(|| BundleError::NoMatchingVariant {
            platform: query.platform.as_str().to_string(),
            environment: query.environment.map(|e| e.as_str().to_string()),
        })
}

impl Manifest {
    /// Find the variant matching `query`. See [`select`].
    pub fn select(&self, query: &VariantQuery) -> BundleResult<&Variant> {
        select(self, query)
    }
}
