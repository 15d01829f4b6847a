//! Domain identifier types with validation
//!
//! Newtype wrappers for case identifiers, so a cluster id can never be passed
//! where an item GUID is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cluster identifier
///
/// Unique only within its cluster run. Two negative ids are pseudo-clusters
/// produced by the clustering engine: `-1` holds items that could not be
/// clustered and `-2` holds items the engine chose to ignore. Wherever a
/// cluster id becomes a path segment or a report field it renders through
/// [`ClusterId::display_name`].
///
/// # Examples
///
/// ```
/// use cluster_export::domain::ids::ClusterId;
///
/// assert_eq!(ClusterId::new(-1).display_name(), "unclusterable");
/// assert_eq!(ClusterId::new(-2).display_name(), "ignorable");
/// assert_eq!(ClusterId::new(17).display_name(), "17");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(i64);

impl ClusterId {
    /// Pseudo-cluster for items that could not be clustered
    pub const UNCLUSTERABLE: ClusterId = ClusterId(-1);

    /// Pseudo-cluster for items the clustering run ignored
    pub const IGNORABLE: ClusterId = ClusterId(-2);

    /// Creates a cluster id from its raw value
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw id
    pub fn value(&self) -> i64 {
        self.0
    }

    /// True for the `unclusterable` and `ignorable` pseudo-clusters
    pub fn is_pseudo(&self) -> bool {
        *self == Self::UNCLUSTERABLE || *self == Self::IGNORABLE
    }

    /// Name used for directories and report fields
    pub fn display_name(&self) -> String {
        match *self {
            Self::UNCLUSTERABLE => "unclusterable".to_string(),
            Self::IGNORABLE => "ignorable".to_string(),
            ClusterId(id) => id.to_string(),
        }
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for ClusterId {
    type Err = String;

    /// Accepts either the decimal id or a pseudo-cluster name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "unclusterable" => Ok(Self::UNCLUSTERABLE),
            "ignorable" => Ok(Self::IGNORABLE),
            other => other
                .parse::<i64>()
                .map(Self)
                .map_err(|_| format!("Invalid cluster id '{s}'")),
        }
    }
}

/// Item GUID newtype wrapper
///
/// Globally unique within a case.
///
/// # Examples
///
/// ```
/// use cluster_export::domain::ids::ItemGuid;
/// use std::str::FromStr;
///
/// let guid = ItemGuid::from_str("0c5b1a3e-92f4-4c55-a6f2-0d8e7b1c9a10").unwrap();
/// assert_eq!(guid.as_str(), "0c5b1a3e-92f4-4c55-a6f2-0d8e7b1c9a10");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemGuid(String);

impl ItemGuid {
    /// Creates a new ItemGuid
    ///
    /// # Returns
    ///
    /// Returns `Ok(ItemGuid)` if the GUID is non-blank, `Err` otherwise
    pub fn new(guid: impl Into<String>) -> Result<Self, String> {
        let guid = guid.into();
        if guid.trim().is_empty() {
            return Err("Item GUID cannot be empty".to_string());
        }
        Ok(Self(guid))
    }

    /// Returns the GUID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemGuid {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ItemGuid {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ItemGuid> for String {
    fn from(guid: ItemGuid) -> Self {
        guid.0
    }
}

impl AsRef<str> for ItemGuid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
