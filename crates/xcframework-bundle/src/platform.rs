//! Platform and environment vocabulary.

use std::fmt;

/// Public spelling of the Mac Catalyst environment.
const MACCATALYST_PUBLIC: &str = "maccatalyst";

/// Spelling used by Mach-O build metadata and stored in memory.
const MACCATALYST_INTERNAL: &str = "macabi";

/// Operating system families an XCFramework variant can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Ios,
    Macos,
    Watchos,
    Tvos,
    Xros,
    Driverkit,
}

impl Platform {
    /// Get the `SupportedPlatform` string (e.g., "ios").
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Macos => "macos",
            Self::Watchos => "watchos",
            Self::Tvos => "tvos",
            Self::Xros => "xros",
            Self::Driverkit => "driverkit",
        }
    }

    /// Parse a platform from its string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ios" => Some(Self::Ios),
            "macos" => Some(Self::Macos),
            "watchos" => Some(Self::Watchos),
            "tvos" => Some(Self::Tvos),
            "xros" => Some(Self::Xros),
            "driverkit" => Some(Self::Driverkit),
            _ => None,
        }
    }

    /// Get all supported platforms.
    #[must_use]
    pub fn all() -> &'static [Platform] {
        &[
            Self::Ios,
            Self::Macos,
            Self::Watchos,
            Self::Tvos,
            Self::Xros,
            Self::Driverkit,
        ]
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Build flavours within a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    Simulator,
    MacCatalyst,
}

impl Environment {
    /// Get the public spelling (e.g., "maccatalyst").
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simulator => "simulator",
            Self::MacCatalyst => MACCATALYST_PUBLIC,
        }
    }

    /// Get the canonical `SupportedPlatformVariant` value used for comparisons.
    #[must_use]
    pub fn platform_variant(&self) -> &'static str {
        match self {
            Self::Simulator => "simulator",
            Self::MacCatalyst => MACCATALYST_INTERNAL,
        }
    }

    /// Parse an environment from either of its spellings.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "simulator" => Some(Self::Simulator),
            MACCATALYST_PUBLIC | MACCATALYST_INTERNAL => Some(Self::MacCatalyst),
            _ => None,
        }
    }

    /// Get all supported environments.
    #[must_use]
    pub fn all() -> &'static [Environment] {
        &[Self::Simulator, Self::MacCatalyst]
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalize a `SupportedPlatformVariant` value to its internal form.
///
/// An empty string means "no environment" and yields `None`. Values outside
/// the known vocabulary are kept as-is so newer descriptors still decode.
///
/// ```
/// use xcframework_bundle::canonical_platform_variant;
///
/// assert_eq!(canonical_platform_variant("maccatalyst"), Some("macabi"));
/// assert_eq!(canonical_platform_variant("simulator"), Some("simulator"));
/// assert_eq!(canonical_platform_variant(""), None);
/// ```
#[must_use]
pub fn canonical_platform_variant(value: &str) -> Option<&str> {
    match value {
        "" => None,
        MACCATALYST_PUBLIC => Some(MACCATALYST_INTERNAL),
        other => Some(other),
    }
}

/// Render an internal `SupportedPlatformVariant` value in its public spelling.
#[must_use]
pub fn public_platform_variant(value: &str) -> &str {
    match value {
        MACCATALYST_INTERNAL => MACCATALYST_PUBLIC,
        other => other,
    }
}
