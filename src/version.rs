//! .NET SDK version parsing and comparison

use std::fmt;

/// Numeric `major.minor.patch` version reported by `dotnet --version`.
///
/// Prerelease (`-preview8`) and build (`+abc`) suffixes are dropped, so
/// `3.0.100-preview8-013656` compares as `3.0.100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SdkVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SdkVersion {
    /// First SDK whose `user-secrets` tool supports `init`
    pub const USER_SECRETS_INIT: Self = Self::new(3, 0, 0);

    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse the trimmed output of `dotnet --version`
    ///
    /// Missing components count as zero. Returns `None` when the leading
    /// component is not numeric.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let core = raw
            .trim()
            .trim_start_matches(['v', 'V'])
            .split(['-', '+'])
            .next()?;

        let mut parts = core.split('.');
        let major = parts.next()?.parse().ok()?;
        let mut component = || -> Option<u64> {
            match parts.next() {
                Some(p) => p.parse().ok(),
                None => Some(0),
            }
        };
        let minor = component()?;
        let patch = component()?;

        Some(Self::new(major, minor, patch))
    }

    #[must_use]
    pub fn supports_user_secrets_init(&self) -> bool {
        *self >= Self::USER_SECRETS_INIT
    }
}

impl fmt::Display for SdkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_release_and_preview_versions() {
        assert_eq!(SdkVersion::parse("8.0.204\n"), Some(SdkVersion::new(8, 0, 204)));
        assert_eq!(
            SdkVersion::parse("3.0.100-preview8-013656"),
            Some(SdkVersion::new(3, 0, 100))
        );
        assert_eq!(SdkVersion::parse("3"), Some(SdkVersion::new(3, 0, 0)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(SdkVersion::parse(""), None);
        assert_eq!(SdkVersion::parse("dotnet: command not found"), None);
        assert_eq!(SdkVersion::parse("3.x.1"), None);
    }

    #[test]
    fn user_secrets_init_boundary() {
        assert!(!SdkVersion::new(2, 2, 402).supports_user_secrets_init());
        assert!(SdkVersion::new(3, 0, 0).supports_user_secrets_init());
        assert!(SdkVersion::new(3, 0, 100).supports_user_secrets_init());
    }
}
