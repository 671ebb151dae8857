use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZoneNameError {
    #[error("zone name is empty")]
    Empty,
}

/// Validated lookup key for a zone, taken from `properties.name`.
/// Surrounding whitespace is stripped; the text is otherwise kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ZoneName(Arc<str>);

impl ZoneName {
    pub fn new(name: &str) -> Result<Self, ZoneNameError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ZoneNameError::Empty);
        }
        Ok(Self(Arc::from(name)))
    }

    #[inline] pub fn as_str(&self) -> &str { &self.0 }

    /// Parse a list of names, failing on the first invalid one.
    pub fn parse_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<Self>, ZoneNameError> {
        names.iter().map(|name| Self::new(name.as_ref())).collect()
    }
}

impl fmt::Display for ZoneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ZoneName {
    type Err = ZoneNameError;
    fn from_str(s: &str) -> Result<Self, Self::Err> { Self::new(s) }
}

impl TryFrom<String> for ZoneName {
    type Error = ZoneNameError;
    fn try_from(s: String) -> Result<Self, Self::Error> { Self::new(&s) }
}

impl From<ZoneName> for String {
    fn from(name: ZoneName) -> Self { name.0.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_rejects_empty() {
        assert_eq!(ZoneName::new("  Headingley North ").unwrap().as_str(), "Headingley North");
        assert_eq!(ZoneName::new("   "), Err(ZoneNameError::Empty));
        assert_eq!("".parse::<ZoneName>(), Err(ZoneNameError::Empty));
    }

    #[test]
    fn serde_validates() {
        let name: ZoneName = serde_json::from_str("\"Westwood\"").unwrap();
        assert_eq!(name.to_string(), "Westwood");
        assert!(serde_json::from_str::<ZoneName>("\"\"").is_err());
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"Westwood\"");
    }

    #[test]
    fn parse_all_stops_on_invalid() {
        assert_eq!(ZoneName::parse_all(&["A", "B"]).unwrap().len(), 2);
        assert!(ZoneName::parse_all(&["A", ""]).is_err());
    }
}
