//! Graph algorithms module
//!
//! Path discovery is implemented in the `warmpath-graph-algorithms` crate.
//! This module provides the integration/adapter layer: fetching a scoped
//! subgraph from an [`EdgeStore`], optionally symmetrizing it, and projecting
//! it into a [`GraphView`].

use crate::graph::{Edge, EdgeKind, EdgeStore, EntityId, GraphResult};
use rustc_hash::FxHashSet;
use tracing::debug;

// Re-export algorithms
pub use warmpath_graph_algorithms::{
    find_paths, search_paths, strongest_path, GraphView, GraphViewBuilder, Path, PathConfig,
    PathError, PathSearch,
};

/// Which edges take part in a search
#[derive(Debug, Clone, Default)]
pub struct EdgeFilter {
    /// Only keep these kinds (None = all kinds)
    pub kinds: Option<Vec<EdgeKind>>,
    /// Treat every edge as traversable in both directions
    pub bidirectional: bool,
}

impl EdgeFilter {
    pub fn allows(&self, edge: &Edge) -> bool {
        self.kinds
            .as_ref()
            .map_or(true, |kinds| kinds.contains(&edge.kind))
    }
}

/// Add the reverse of every edge whose reverse (same kind) is missing.
///
/// Originals keep their order; generated reverses follow them.
pub fn symmetrize(edges: &[Edge]) -> Vec<Edge> {
    let mut present: FxHashSet<(&str, &str, &str)> = edges
        .iter()
        .map(|e| (e.source.as_str(), e.target.as_str(), e.kind.as_str()))
        .collect();

    let mut result = edges.to_vec();
    for edge in edges {
        let reverse = (edge.target.as_str(), edge.source.as_str(), edge.kind.as_str());
        if present.insert(reverse) {
            result.push(edge.reversed());
        }
    }
    result
}

/// Build a GraphView from an edge list for algorithm execution
pub fn build_view(edges: &[Edge], filter: &EdgeFilter) -> GraphView {
    let kept: Vec<Edge> = edges.iter().filter(|e| filter.allows(e)).cloned().collect();
    let kept = if filter.bidirectional {
        symmetrize(&kept)
    } else {
        kept
    };

    let mut builder = GraphViewBuilder::new();
    for edge in &kept {
        builder.add_edge(
            edge.source.as_str(),
            edge.target.as_str(),
            edge.kind.as_str(),
            edge.strength,
        );
    }
    builder.build()
}

/// Fetch every edge a path of at most `max_hops` starting at `sources` could use.
///
/// Expands hop by hop through [`EdgeStore::edges_touching`], so only the
/// neighbourhood of the sources is ever loaded. Edges come back in the order
/// they were first fetched. Identical edge records are returned once.
pub fn scope_edges<S: EdgeStore + ?Sized>(
    store: &S,
    sources: &[EntityId],
    max_hops: usize,
    bidirectional: bool,
) -> GraphResult<Vec<Edge>> {
    let mut reached: FxHashSet<EntityId> = FxHashSet::default();
    let mut frontier: Vec<EntityId> = Vec::new();
    for source in sources {
        if reached.insert(source.clone()) {
            frontier.push(source.clone());
        }
    }

    let mut seen: FxHashSet<(EntityId, EntityId, EdgeKind, u64)> = FxHashSet::default();
    let mut scoped = Vec::new();

    for hop in 0..max_hops {
        if frontier.is_empty() {
            break;
        }
        let in_frontier: FxHashSet<&EntityId> = frontier.iter().collect();
        let fetched = store.edges_touching(&frontier)?;
        let mut next = Vec::new();

        for edge in fetched {
            let forward = in_frontier.contains(&edge.source);
            let backward = bidirectional && in_frontier.contains(&edge.target);
            if !forward && !backward {
                continue;
            }

            for (from_frontier, other) in [(forward, &edge.target), (backward, &edge.source)] {
                if from_frontier && !reached.contains(other) {
                    reached.insert(other.clone());
                    next.push(other.clone());
                }
            }

            let key = (
                edge.source.clone(),
                edge.target.clone(),
                edge.kind.clone(),
                edge.strength.to_bits(),
            );
            if seen.insert(key) {
                scoped.push(edge);
            }
        }

        debug!(
            "Scoping hop {}: frontier {}, {} edges so far",
            hop + 1,
            frontier.len(),
            scoped.len()
        );
        frontier = next;
    }

    Ok(scoped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::InMemoryGraph;

    fn chain() -> InMemoryGraph {
        // a -> b -> c -> d, plus x -> a and an unrelated e -> f
        InMemoryGraph::from_parts(
            vec![],
            vec![
                Edge::new("a", "b", EdgeKind::KNOWS, 0.9),
                Edge::new("b", "c", EdgeKind::OWNER, 0.8),
                Edge::new("c", "d", EdgeKind::KNOWS, 0.7),
                Edge::new("x", "a", EdgeKind::KNOWS, 0.6),
                Edge::new("e", "f", EdgeKind::KNOWS, 0.5),
            ],
        )
        .unwrap()
    }

    fn ids(list: &[&str]) -> Vec<EntityId> {
        list.iter().map(|s| EntityId::new(*s)).collect()
    }

    #[test]
    fn test_symmetrize_adds_missing_reverses() {
        let edges = vec![
            Edge::new("a", "b", EdgeKind::KNOWS, 0.9),
            Edge::new("b", "a", EdgeKind::KNOWS, 0.4),
            Edge::new("b", "c", EdgeKind::OWNER, 0.8),
        ];
        let sym = symmetrize(&edges);
        assert_eq!(sym.len(), 4);
        assert_eq!(&sym[..3], &edges[..]);
        assert!(sym[3].starts_from("c") && sym[3].ends_at("b"));
        assert_eq!(sym[3].strength, 0.8);
    }

    #[test]
    fn test_build_view_filters_kinds() {
        let graph = chain();
        let filter = EdgeFilter {
            kinds: Some(vec![EdgeKind::new(EdgeKind::KNOWS)]),
            bidirectional: false,
        };
        let view = build_view(graph.edges(), &filter);
        assert_eq!(view.edge_count(), 4);
        assert!(find_paths(&view, &["a"], "c", &PathConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn test_build_view_bidirectional() {
        let graph = chain();
        let directed = build_view(graph.edges(), &EdgeFilter::default());
        assert!(find_paths(&directed, &["d"], "a", &PathConfig::default()).unwrap().is_empty());

        let filter = EdgeFilter { kinds: None, bidirectional: true };
        let view = build_view(graph.edges(), &filter);
        assert_eq!(view.edge_count(), 10);
        let paths = find_paths(&view, &["d"], "a", &PathConfig::default()).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].nodes, vec!["d", "c", "b", "a"]);
    }

    #[test]
    fn test_scope_edges_directed() {
        let graph = chain();

        let scoped = scope_edges(&graph, &ids(&["a"]), 2, false).unwrap();
        assert_eq!(scoped.len(), 2);
        assert!(scoped[0].connects("a", "b"));
        assert!(scoped[1].connects("b", "c"));

        let scoped = scope_edges(&graph, &ids(&["a"]), 3, false).unwrap();
        assert_eq!(scoped.len(), 3);
        assert!(scoped.iter().all(|e| !e.starts_from("x") && !e.starts_from("e")));
    }

    #[test]
    fn test_scope_edges_bidirectional() {
        let graph = chain();
        let scoped = scope_edges(&graph, &ids(&["a"]), 1, true).unwrap();
        assert_eq!(scoped.len(), 2);
        assert!(scoped.iter().any(|e| e.starts_from("x")));
    }

    #[test]
    fn test_scoped_view_matches_full_view() {
        let graph = chain();
        let config = PathConfig { min_strength: 0.0, ..PathConfig::default() };

        let full = build_view(graph.edges(), &EdgeFilter::default());
        let scoped_edges = scope_edges(&graph, &ids(&["a"]), config.max_hops, false).unwrap();
        let scoped = build_view(&scoped_edges, &EdgeFilter::default());

        assert_eq!(
            find_paths(&full, &["a"], "d", &config).unwrap(),
            find_paths(&scoped, &["a"], "d", &config).unwrap()
        );
    }
}
