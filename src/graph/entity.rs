//! Entity records
//!
//! Entities are read-only inputs: the pathfinder only needs their ids, the
//! service layer uses the rest for display and for picking internal owners.

use super::types::{EntityId, EntityType};
use serde::{Deserialize, Serialize};

/// A person or organization in the relationship graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier
    pub id: EntityId,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Classification (person, organization, ...)
    #[serde(rename = "type", default)]
    pub entity_type: EntityType,

    /// Member of the firm whose network seeds warm introductions
    #[serde(default)]
    pub is_internal_owner: bool,

    /// Portfolio company
    #[serde(default)]
    pub is_portfolio: bool,

    /// Company in the deal pipeline
    #[serde(default)]
    pub is_pipeline: bool,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>, entity_type: EntityType) -> Self {
        Entity {
            id: id.into(),
            name: name.into(),
            entity_type,
            is_internal_owner: false,
            is_portfolio: false,
            is_pipeline: false,
        }
    }

    pub fn person(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self::new(id, name, EntityType::Person)
    }

    pub fn organization(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self::new(id, name, EntityType::Organization)
    }

    pub fn internal_owner(mut self) -> Self {
        self.is_internal_owner = true;
        self
    }

    pub fn portfolio(mut self) -> Self {
        self.is_portfolio = true;
        self
    }

    pub fn pipeline(mut self) -> Self {
        self.is_pipeline = true;
        self
    }
}
