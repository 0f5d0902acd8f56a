use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("version string is empty")]
    Empty,
}

/// Opaque build stamp, forwarded verbatim to the update worker. Nothing
/// inspects its contents; it only has to be non-empty and stable for the
/// life of the loaded page.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    pub fn new(raw: impl Into<String>) -> Result<Version, VersionError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(VersionError::Empty);
        }
        Ok(Version(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_version_keeps_raw_string() {
        let version = Version::new("660731-1515").unwrap();
        assert_eq!(version.as_str(), "660731-1515");
        assert_eq!(version.to_string(), "660731-1515");
    }

    #[test]
    fn test_empty_version_is_rejected() {
        assert_eq!(Version::new(""), Err(VersionError::Empty));
        assert_eq!(Version::new("   "), Err(VersionError::Empty));
    }
}
