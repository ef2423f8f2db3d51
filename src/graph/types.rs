//! Core type definitions for the relationship graph

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Opaque identifier for an entity (person, organization, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        EntityId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId(s.to_string())
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Relationship category (e.g. "owner", "portfolio_connection")
///
/// Open set: any string is a valid kind. The constants name the kinds the
/// importers produce today.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EdgeKind(String);

impl EdgeKind {
    pub const OWNER: &'static str = "owner";
    pub const PORTFOLIO_CONNECTION: &'static str = "portfolio_connection";
    pub const LINKEDIN_INDUSTRY_CONNECTION: &'static str = "linkedin_industry_connection";
    pub const WORKS_AT: &'static str = "works_at";
    pub const KNOWS: &'static str = "knows";

    pub fn new(kind: impl Into<String>) -> Self {
        EdgeKind(kind.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EdgeKind {
    fn from(s: String) -> Self {
        EdgeKind(s)
    }
}

impl From<&str> for EdgeKind {
    fn from(s: &str) -> Self {
        EdgeKind(s.to_string())
    }
}

/// Entity classification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum EntityType {
    #[default]
    Person,
    Organization,
    Other(String),
}

impl EntityType {
    pub fn as_str(&self) -> &str {
        match self {
            EntityType::Person => "person",
            EntityType::Organization => "organization",
            EntityType::Other(s) => s,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for EntityType {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "person" => EntityType::Person,
            // Older exports spell it "company"
            "organization" | "company" => EntityType::Organization,
            _ => EntityType::Other(s),
        }
    }
}

impl From<&str> for EntityType {
    fn from(s: &str) -> Self {
        EntityType::from(s.to_string())
    }
}

impl From<EntityType> for String {
    fn from(t: EntityType) -> Self {
        t.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id() {
        let id = EntityId::new("ent-1");
        assert_eq!(id.as_str(), "ent-1");
        assert_eq!(id.to_string(), "ent-1");
        assert_eq!(EntityId::from("ent-1"), id);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"ent-1\"");
    }

    #[test]
    fn test_entity_type_round_trip() {
        assert_eq!(EntityType::from("Person"), EntityType::Person);
        assert_eq!(EntityType::from("company"), EntityType::Organization);
        assert_eq!(EntityType::from("fund"), EntityType::Other("fund".to_string()));

        let json = serde_json::to_string(&EntityType::Organization).unwrap();
        assert_eq!(json, "\"organization\"");
        let parsed: EntityType = serde_json::from_str("\"fund\"").unwrap();
        assert_eq!(parsed.as_str(), "fund");
    }

    #[test]
    fn test_edge_kind_constants() {
        assert_eq!(EdgeKind::new(EdgeKind::OWNER).as_str(), "owner");
        assert_eq!(EdgeKind::from("portfolio_connection").to_string(), EdgeKind::PORTFOLIO_CONNECTION);
    }
}
