//! Semantic versions attached to namespaces.
//!
//! Only the syntax matters to the registry: versions are compared for exact
//! equality through the canonical namespace string, never ordered.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NameError;

/// A semantic version: `major.minor.patch[-pre][+build]`.
///
/// Parsing is strict (no leading zeros on numeric parts) so that
/// [`Display`](fmt::Display) reproduces the original text exactly. Canonical
/// namespace keys depend on that.
///
/// # Examples
///
/// ```
/// use bom_core::Version;
///
/// let version: Version = "1.0.0-beta.2+build.7".parse()?;
/// assert_eq!(version.major, 1);
/// assert_eq!(version.pre.as_deref(), Some("beta.2"));
/// assert_eq!(version.to_string(), "1.0.0-beta.2+build.7");
/// # Ok::<(), bom_core::NameError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    /// Major version.
    pub major: u64,
    /// Minor version.
    pub minor: u64,
    /// Patch version.
    pub patch: u64,
    /// Pre-release identifiers, without the leading `-`.
    pub pre: Option<String>,
    /// Build metadata, without the leading `+`.
    pub build: Option<String>,
}

impl Version {
    /// Creates a release version with no pre-release or build metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// use bom_core::Version;
    ///
    /// assert_eq!(Version::new(2, 1, 0).to_string(), "2.1.0");
    /// ```
    #[inline]
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: None,
            build: None,
        }
    }
}

fn parse_numeric(input: &str, part: &str, reason: &'static str) -> Result<u64, NameError> {
    let well_formed = !part.is_empty()
        && part.bytes().all(|b| b.is_ascii_digit())
        && (part == "0" || !part.starts_with('0'));
    if !well_formed {
        return Err(NameError::version(input, reason));
    }
    part.parse().map_err(|_| NameError::version(input, reason))
}

fn check_identifiers(input: &str, idents: &str, reason: &'static str) -> Result<(), NameError> {
    let valid = idents.split('.').all(|id| {
        !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    });
    if valid {
        Ok(())
    } else {
        Err(NameError::version(input, reason))
    }
}

impl FromStr for Version {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rest, build) = match s.split_once('+') {
            Some((rest, build)) => {
                check_identifiers(s, build, "malformed build metadata")?;
                (rest, Some(build.to_owned()))
            }
            None => (s, None),
        };
        let (core, pre) = match rest.split_once('-') {
            Some((core, pre)) => {
                check_identifiers(s, pre, "malformed pre-release")?;
                (core, Some(pre.to_owned()))
            }
            None => (rest, None),
        };

        let mut parts = core.split('.');
        let (Some(major), Some(minor), Some(patch), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(NameError::version(s, "expected major.minor.patch"));
        };

        Ok(Self {
            major: parse_numeric(s, major, "major is not a number")?,
            minor: parse_numeric(s, minor, "minor is not a number")?,
            patch: parse_numeric(s, patch, "patch is not a number")?,
            pre,
            build,
        })
    }
}

impl TryFrom<String> for Version {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Version> for String {
    fn from(value: Version) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{pre}")?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{build}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_release() {
        let version: Version = "1.2.3".parse().unwrap();
        assert_eq!(version, Version::new(1, 2, 3));
    }

    #[test]
    fn test_display_reproduces_input() {
        for text in ["0.0.0", "10.20.30", "1.0.0-alpha", "1.0.0-rc.1+sha.5114f85", "2.0.0+20240101"] {
            let version: Version = text.parse().unwrap();
            assert_eq!(version.to_string(), text);
        }
    }

    #[test]
    fn test_rejects_malformed() {
        for text in ["", "1", "1.0", "1.0.0.0", "01.0.0", "1.a.0", "1.0.0-", "1.0.0+", "1.0.0-a..b", "v1.0.0"] {
            assert!(text.parse::<Version>().is_err(), "accepted {text:?}");
        }
    }

    #[test]
    fn test_serde_as_string() {
        let version: Version = "3.1.4".parse().unwrap();
        assert_eq!(serde_json::to_string(&version).unwrap(), r#""3.1.4""#);
        let parsed: Version = serde_json::from_str(r#""3.1.4""#).unwrap();
        assert_eq!(parsed, version);
        assert!(serde_json::from_str::<Version>(r#""3.1""#).is_err());
    }
}
