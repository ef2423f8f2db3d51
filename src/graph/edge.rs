//! Edge implementation for the relationship graph
//!
//! Edges are directed. Producers that mean "A and B know each other" either
//! insert both directions or rely on the adapter layer to symmetrize.

use super::store::{GraphError, GraphResult};
use super::types::{EdgeKind, EntityId};
use serde::{Deserialize, Serialize};

/// A directed, weighted relationship between two entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Source entity (edge goes FROM this entity)
    pub source: EntityId,

    /// Target entity (edge goes TO this entity)
    pub target: EntityId,

    /// Relationship category
    pub kind: EdgeKind,

    /// Confidence/intensity of the relationship in [0, 1]
    #[serde(alias = "strength_score")]
    pub strength: f64,
}

impl Edge {
    pub fn new(
        source: impl Into<EntityId>,
        target: impl Into<EntityId>,
        kind: impl Into<EdgeKind>,
        strength: f64,
    ) -> Self {
        Edge {
            source: source.into(),
            target: target.into(),
            kind: kind.into(),
            strength,
        }
    }

    /// Reject strengths outside [0, 1] (NaN included)
    pub fn validate(&self) -> GraphResult<()> {
        if (0.0..=1.0).contains(&self.strength) {
            Ok(())
        } else {
            Err(GraphError::InvalidStrength {
                from: self.source.clone(),
                to: self.target.clone(),
                strength: self.strength,
            })
        }
    }

    /// Same relationship in the opposite direction
    pub fn reversed(&self) -> Self {
        Edge {
            source: self.target.clone(),
            target: self.source.clone(),
            kind: self.kind.clone(),
            strength: self.strength,
        }
    }

    /// Check if this edge connects two specific entities (in either direction)
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source.as_str() == a && self.target.as_str() == b)
            || (self.source.as_str() == b && self.target.as_str() == a)
    }

    /// Check if this edge goes FROM a specific entity
    pub fn starts_from(&self, id: &str) -> bool {
        self.source.as_str() == id
    }

    /// Check if this edge goes TO a specific entity
    pub fn ends_at(&self, id: &str) -> bool {
        self.target.as_str() == id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_direction_helpers() {
        let edge = Edge::new("a", "b", EdgeKind::KNOWS, 0.7);
        assert!(edge.starts_from("a"));
        assert!(edge.ends_at("b"));
        assert!(edge.connects("b", "a"));
        assert!(!edge.connects("a", "c"));

        let back = edge.reversed();
        assert!(back.starts_from("b") && back.ends_at("a"));
        assert_eq!(back.kind, edge.kind);
        assert_eq!(back.strength, 0.7);
    }

    #[test]
    fn test_validate() {
        assert!(Edge::new("a", "b", "owner", 0.0).validate().is_ok());
        assert!(Edge::new("a", "b", "owner", 1.0).validate().is_ok());
        assert!(matches!(
            Edge::new("a", "b", "owner", 1.2).validate(),
            Err(GraphError::InvalidStrength { .. })
        ));
        assert!(Edge::new("a", "b", "owner", f64::NAN).validate().is_err());
    }

    #[test]
    fn test_legacy_strength_field() {
        let edge: Edge = serde_json::from_str(
            r#"{"source": "a", "target": "b", "kind": "portfolio_connection", "strength_score": 0.6}"#,
        )
        .unwrap();
        assert_eq!(edge.strength, 0.6);
        assert_eq!(edge.kind.as_str(), EdgeKind::PORTFOLIO_CONNECTION);
    }
}
