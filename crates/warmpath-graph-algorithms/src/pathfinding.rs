//! Pathfinding algorithms
//!
//! Bounded multi-hop path discovery ranked by strength product, plus a single
//! strongest-path search (Dijkstra over the max-product semiring).
//!
//! A path's strength is the product of its edge strengths, seeded at 1.0 for a
//! zero-hop path. With strengths in [0, 1] the product can only shrink as a
//! path grows.

use super::common::{GraphView, NodeId};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet, VecDeque};
use std::time::Instant;
use thiserror::Error;

/// How many edge relaxations happen between two deadline checks
const DEADLINE_CHECK_INTERVAL: usize = 64;

/// Rejected search parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("max_hops must be at least 1, got {0}")]
    InvalidMaxHops(usize),

    #[error("min_strength must be within [0, 1], got {0}")]
    InvalidMinStrength(f64),

    #[error("at least one source entity is required")]
    NoSources,
}

/// A ranked path from a source to the target
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    /// Entity ids from source to target, pairwise distinct
    #[cfg_attr(feature = "serde", serde(rename = "path"))]
    pub nodes: Vec<NodeId>,
    /// Kind of each traversed edge; `kinds[i]` links `nodes[i]` to `nodes[i + 1]`
    pub kinds: Vec<String>,
    /// Product of the traversed edge strengths
    pub strength: f64,
    /// Hop count
    pub length: usize,
}

impl Path {
    /// Zero-hop path used when a source is the target itself.
    pub fn trivial(node: &str) -> Self {
        Path {
            nodes: vec![node.to_string()],
            kinds: Vec::new(),
            strength: 1.0,
            length: 0,
        }
    }

    pub fn source(&self) -> &str {
        &self.nodes[0]
    }

    pub fn target(&self) -> &str {
        &self.nodes[self.nodes.len() - 1]
    }
}

/// Path search configuration
#[derive(Debug, Clone)]
pub struct PathConfig {
    /// Maximum number of edges in a path (>= 1)
    pub max_hops: usize,
    /// Paths scoring below this are discarded
    pub min_strength: f64,
    /// Cap on returned paths
    pub max_results: usize,
    /// Stop exploring after this many edge relaxations
    pub max_expansions: Option<usize>,
    /// Stop exploring once this instant has passed
    pub deadline: Option<Instant>,
    /// Drop branches whose strength already fell below `min_strength`
    pub prune_weak_branches: bool,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            max_hops: 3,
            min_strength: 0.3,
            max_results: 10,
            max_expansions: None,
            deadline: None,
            prune_weak_branches: true,
        }
    }
}

impl PathConfig {
    /// Check the parameters before any traversal happens
    pub fn validate(&self) -> Result<(), PathError> {
        if self.max_hops < 1 {
            return Err(PathError::InvalidMaxHops(self.max_hops));
        }
        if !(0.0..=1.0).contains(&self.min_strength) {
            return Err(PathError::InvalidMinStrength(self.min_strength));
        }
        Ok(())
    }
}

/// Ranked paths plus exploration statistics
#[derive(Debug, Clone, Default)]
pub struct PathSearch {
    pub paths: Vec<Path>,
    /// Number of edges relaxed during exploration
    pub expansions: usize,
    /// True when a budget (expansions or deadline) cut exploration short
    pub truncated: bool,
}

/// Find the strongest paths from any of `sources` to `target`.
///
/// Results are sorted by strength descending, then by hop count ascending,
/// then by discovery order, and capped at `config.max_results`.
pub fn find_paths<S: AsRef<str>>(
    view: &GraphView,
    sources: &[S],
    target: &str,
    config: &PathConfig,
) -> Result<Vec<Path>, PathError> {
    search_paths(view, sources, target, config).map(|search| search.paths)
}

/// Same as [`find_paths`] but also reports how much of the graph was explored.
pub fn search_paths<S: AsRef<str>>(
    view: &GraphView,
    sources: &[S],
    target: &str,
    config: &PathConfig,
) -> Result<PathSearch, PathError> {
    config.validate()?;
    if sources.is_empty() {
        return Err(PathError::NoSources);
    }

    let target_idx = view.index_of(target);
    let mut budget = Budget::new(config);
    let mut candidates = Vec::new();
    let mut seen = HashSet::new();

    for source in sources {
        let source = source.as_ref();
        if !seen.insert(source) {
            continue;
        }

        if source == target {
            candidates.push(Path::trivial(target));
            continue;
        }

        // Budget spent: only zero-hop paths can still be added
        if budget.exhausted {
            continue;
        }

        let (Some(source_idx), Some(target_idx)) = (view.index_of(source), target_idx) else {
            continue;
        };

        explore(view, source_idx, target_idx, config, &mut budget, &mut candidates);
    }

    rank(&mut candidates);
    candidates.truncate(config.max_results);

    Ok(PathSearch {
        paths: candidates,
        expansions: budget.expansions,
        truncated: budget.exhausted,
    })
}

/// Partial path on the BFS frontier
struct Branch {
    head: usize,
    nodes: Vec<usize>,
    /// Global edge indices (into the CSR arrays) in traversal order
    edges: Vec<usize>,
    strength: f64,
}

struct Budget {
    expansions: usize,
    max_expansions: Option<usize>,
    deadline: Option<Instant>,
    exhausted: bool,
}

impl Budget {
    fn new(config: &PathConfig) -> Self {
        Self {
            expansions: 0,
            max_expansions: config.max_expansions,
            deadline: config.deadline,
            exhausted: false,
        }
    }

    /// Account for one edge relaxation; false once a limit is hit
    fn tick(&mut self) -> bool {
        if let Some(max) = self.max_expansions {
            if self.expansions >= max {
                self.exhausted = true;
                return false;
            }
        }
        if let Some(deadline) = self.deadline {
            if self.expansions % DEADLINE_CHECK_INTERVAL == 0 && Instant::now() >= deadline {
                self.exhausted = true;
                return false;
            }
        }
        self.expansions += 1;
        true
    }
}

/// Breadth-first enumeration of simple paths from one source
fn explore(
    view: &GraphView,
    source_idx: usize,
    target_idx: usize,
    config: &PathConfig,
    budget: &mut Budget,
    out: &mut Vec<Path>,
) {
    let mut queue = VecDeque::new();
    queue.push_back(Branch {
        head: source_idx,
        nodes: vec![source_idx],
        edges: Vec::new(),
        strength: 1.0,
    });

    while let Some(branch) = queue.pop_front() {
        for e in view.out_offsets[branch.head]..view.out_offsets[branch.head + 1] {
            if !budget.tick() {
                return;
            }

            let next = view.out_targets[e];
            if branch.nodes.contains(&next) {
                continue;
            }

            let strength = branch.strength * view.strengths[e];
            if config.prune_weak_branches && strength < config.min_strength {
                continue;
            }

            if next == target_idx {
                if strength >= config.min_strength {
                    out.push(materialize(view, &branch, e, strength));
                }
                continue;
            }

            // A branch with `max_hops - 1` edges can only end at the target.
            if branch.edges.len() + 1 < config.max_hops {
                let mut nodes = branch.nodes.clone();
                nodes.push(next);
                let mut edges = branch.edges.clone();
                edges.push(e);
                queue.push_back(Branch {
                    head: next,
                    nodes,
                    edges,
                    strength,
                });
            }
        }
    }
}

fn materialize(view: &GraphView, branch: &Branch, last_edge: usize, strength: f64) -> Path {
    let mut nodes: Vec<NodeId> = branch
        .nodes
        .iter()
        .map(|&idx| view.index_to_node[idx].clone())
        .collect();
    nodes.push(view.index_to_node[view.out_targets[last_edge]].clone());

    let kinds = branch
        .edges
        .iter()
        .chain(std::iter::once(&last_edge))
        .map(|&e| view.kinds[view.out_kinds[e]].clone())
        .collect::<Vec<_>>();

    Path {
        length: kinds.len(),
        nodes,
        kinds,
        strength,
    }
}

/// Strength descending, then fewer hops. Stable, so discovery order breaks
/// the remaining ties.
fn rank(paths: &mut [Path]) {
    paths.sort_by(|a, b| {
        b.strength
            .total_cmp(&a.strength)
            .then_with(|| a.length.cmp(&b.length))
    });
}

/// State for the strongest-path priority queue
#[derive(Copy, Clone, PartialEq)]
struct State {
    strength: f64,
    node_idx: usize,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: strongest partial path first
        self.strength.total_cmp(&other.strength)
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Single strongest path from `source` to `target` regardless of hop count.
///
/// Dijkstra with multiplication in place of addition and max in place of min.
/// Correct because no edge strength exceeds 1.0.
pub fn strongest_path(view: &GraphView, source: &str, target: &str) -> Option<Path> {
    if source == target {
        return Some(Path::trivial(target));
    }

    let source_idx = view.index_of(source)?;
    let target_idx = view.index_of(target)?;

    let mut best: Vec<Option<f64>> = vec![None; view.node_count];
    // node index -> (parent index, edge index)
    let mut parent: Vec<Option<(usize, usize)>> = vec![None; view.node_count];
    let mut heap = BinaryHeap::new();

    best[source_idx] = Some(1.0);
    heap.push(State { strength: 1.0, node_idx: source_idx });

    while let Some(State { strength, node_idx }) = heap.pop() {
        if node_idx == target_idx {
            let mut nodes = Vec::new();
            let mut kinds = Vec::new();
            let mut curr = target_idx;
            nodes.push(view.index_to_node[curr].clone());
            while let Some((prev, e)) = parent[curr] {
                kinds.push(view.kinds[view.out_kinds[e]].clone());
                nodes.push(view.index_to_node[prev].clone());
                curr = prev;
            }
            nodes.reverse();
            kinds.reverse();
            return Some(Path {
                length: kinds.len(),
                nodes,
                kinds,
                strength,
            });
        }

        if best[node_idx].map_or(false, |b| strength < b) {
            continue;
        }

        for e in view.out_offsets[node_idx]..view.out_offsets[node_idx + 1] {
            let next = view.out_targets[e];
            let next_strength = strength * view.strengths[e];

            if best[next].map_or(true, |b| next_strength > b) {
                best[next] = Some(next_strength);
                parent[next] = Some((node_idx, e));
                heap.push(State { strength: next_strength, node_idx: next });
            }
        }
    }

    None
}
