//! Warmpath
//!
//! Warm-introduction path discovery over a weighted relationship graph:
//! given a source entity (or every internal owner) and a target entity, find
//! the strongest bounded-length routes through typed, weighted edges.
//!
//! # Layout
//!
//! - `warmpath-graph-algorithms`: the pure path discovery core (`find_paths`)
//! - [`graph`]: entities, edges, and the store seams the core is fed from
//! - [`algo`]: adapter layer (edge scoping, symmetrization, view building)
//! - [`intro`]: warm-introduction service, batch runs and job progress
//! - [`config`]: YAML configuration
//! - [`http`]: JSON API
//!
//! ## Example Usage
//!
//! ```rust
//! use warmpath::graph::{Edge, EdgeKind, Entity, EntityId, InMemoryGraph};
//! use warmpath::intro::IntroFinder;
//! use warmpath::config::PathfindingConfig;
//!
//! let graph = InMemoryGraph::from_parts(
//!     vec![
//!         Entity::person("alice", "Alice").internal_owner(),
//!         Entity::organization("acme", "Acme"),
//!     ],
//!     vec![
//!         Edge::new("alice", "bob", EdgeKind::KNOWS, 0.8),
//!         Edge::new("bob", "acme", EdgeKind::WORKS_AT, 0.5),
//!     ],
//! )
//! .unwrap();
//!
//! let finder = IntroFinder::new(graph, PathfindingConfig::default());
//! let found = finder.warm_introductions(&EntityId::new("acme")).unwrap();
//!
//! assert_eq!(found.paths.len(), 1);
//! assert_eq!(found.paths[0].ids(), vec!["alice", "bob", "acme"]);
//! assert!((found.paths[0].strength - 0.4).abs() < 1e-9);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod config;
pub mod graph;
pub mod http;
pub mod intro;

// Re-export main types for convenience
pub use graph::{
    Edge, EdgeKind, EdgeStore, Entity, EntityId, EntityStore, EntityType, GraphError, GraphResult,
    GraphSnapshot, GraphStatistics, InMemoryGraph,
};

pub use algo::{
    build_view, find_paths, scope_edges, search_paths, strongest_path, symmetrize, EdgeFilter,
    GraphView, Path, PathConfig, PathError, PathSearch,
};

pub use config::{Config, ConfigError, PathfindingConfig, ServerConfig};

pub use intro::{
    IntroError, IntroFinder, IntroPath, IntroPaths, IntroResult, JobProgress, JobState, JobStatus,
    PathNode, TargetIntros,
};

pub use http::{AppState, HttpServer};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.3.0");
    }
}
