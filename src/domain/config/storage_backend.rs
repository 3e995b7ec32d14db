//! Storage backend selector

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidStorageBackend;

/// Where saved media goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StorageBackend {
    /// Content-addressed directory on this machine
    #[default]
    Local,
    /// HTTP object storage bucket
    Remote,
}

impl StorageBackend {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = InvalidStorageBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            _ => Err(InvalidStorageBackend { input: s.to_string() }),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_case_insensitive_with_whitespace() {
        assert_eq!(" LOCAL ".parse::<StorageBackend>().unwrap(), StorageBackend::Local);
        assert_eq!("Remote".parse::<StorageBackend>().unwrap(), StorageBackend::Remote);
    }

    #[test]
    fn parse_invalid() {
        let err = "s3".parse::<StorageBackend>().unwrap_err();
        assert!(err.to_string().contains("local, remote"));
    }

    #[test]
    fn default_is_local() {
        assert_eq!(StorageBackend::default(), StorageBackend::Local);
        assert_eq!(StorageBackend::default().to_string(), "local");
    }
}
