use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// The resource hierarchy level an IAM policy applies to.
///
/// Holds the bare identifier; the canonical `projects/<id>` form is produced
/// by [`fmt::Display`] and parsed back by [`FromStr`]. The constructors accept
/// either form, so a caller can hand over identifiers exactly as it received
/// them (`my-project` and `projects/my-project` name the same scope).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Scope {
    Project(String),
    Folder(String),
    Organization(String),
}

impl Scope {
    pub fn project(id: impl Into<String>) -> Self {
        Scope::Project(strip_prefix("projects/", id.into()))
    }

    pub fn folder(id: impl Into<String>) -> Self {
        Scope::Folder(strip_prefix("folders/", id.into()))
    }

    pub fn organization(id: impl Into<String>) -> Self {
        Scope::Organization(strip_prefix("organizations/", id.into()))
    }

    /// The bare identifier without the type prefix, as the per-scope APIs expect it.
    pub fn id(&self) -> &str {
        match self {
            Scope::Project(id) | Scope::Folder(id) | Scope::Organization(id) => id.as_str(),
        }
    }
}

fn strip_prefix(prefix: &str, id: String) -> String {
    match id.strip_prefix(prefix) {
        Some(bare) => bare.to_string(),
        None => id,
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Scope::Project(id) => write!(f, "projects/{id}"),
            Scope::Folder(id) => write!(f, "folders/{id}"),
            Scope::Organization(id) => write!(f, "organizations/{id}"),
        }
    }
}

impl FromStr for Scope {
    type Err = Error;

    /// Parses the canonical form only, e.g. `folders/1234567`.
    fn from_str(s: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidId(s.to_string());
        let (kind, id) = s.split_once('/').ok_or_else(invalid)?;
        if id.is_empty() || id.contains('/') {
            return Err(invalid());
        }
        match kind {
            "projects" => Ok(Scope::Project(id.to_string())),
            "folders" => Ok(Scope::Folder(id.to_string())),
            "organizations" => Ok(Scope::Organization(id.to_string())),
            _ => Err(invalid()),
        }
    }
}

impl Serialize for Scope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Scope::from_str(&s).map_err(de::Error::custom)
    }
}
