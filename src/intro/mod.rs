//! Warm-introduction service
//!
//! Thin orchestration around the path discovery core: fetch the relevant
//! subgraph from the stores, run the search, and attach display attributes to
//! every entity on the returned paths.

pub mod job;

pub use job::{JobProgress, JobState, JobStatus};

use crate::algo::{build_view, scope_edges, search_paths, GraphView, Path, PathError};
use crate::config::PathfindingConfig;
use crate::graph::{EdgeKind, EdgeStore, EntityId, EntityStore, EntityType, GraphError};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum IntroError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] PathError),

    #[error("Store error: {0}")]
    Store(#[from] GraphError),
}

pub type IntroResult<T> = Result<T, IntroError>;

/// An entity on a path, with display attributes when the store knows it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathNode {
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,
}

/// A ranked introduction route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntroPath {
    pub path: Vec<PathNode>,
    pub kinds: Vec<EdgeKind>,
    pub strength: f64,
    pub length: usize,
}

impl IntroPath {
    pub fn ids(&self) -> Vec<&str> {
        self.path.iter().map(|n| n.id.as_str()).collect()
    }
}

/// Result of one search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntroPaths {
    pub target: EntityId,
    pub paths: Vec<IntroPath>,
    pub expansions: usize,
    pub truncated: bool,
}

/// Per-target outcome of a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetIntros {
    pub target: EntityId,
    pub paths: Vec<IntroPath>,
    #[serde(default)]
    pub truncated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub skipped: bool,
}

/// Finds warm-introduction paths over any edge/entity store
#[derive(Debug)]
pub struct IntroFinder<S> {
    store: S,
    config: PathfindingConfig,
}

impl<S: EdgeStore + EntityStore> IntroFinder<S> {
    pub fn new(store: S, config: PathfindingConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &PathfindingConfig {
        &self.config
    }

    /// Paths from any of `sources` to `target` using the default parameters
    pub fn find_intro_paths(&self, sources: &[EntityId], target: &EntityId) -> IntroResult<IntroPaths> {
        self.find_intro_paths_with(sources, target, &self.config)
    }

    /// Paths from any of `sources` to `target` with explicit parameters
    pub fn find_intro_paths_with(
        &self,
        sources: &[EntityId],
        target: &EntityId,
        config: &PathfindingConfig,
    ) -> IntroResult<IntroPaths> {
        let view = self.prepare(sources, config)?;
        self.run(&view, sources, target, config)
    }

    /// Paths from every internal owner to `target`
    pub fn warm_introductions(&self, target: &EntityId) -> IntroResult<IntroPaths> {
        let owners = self.owner_ids()?;
        self.find_intro_paths(&owners, target)
    }

    /// Warm introductions for many targets, searched in parallel.
    ///
    /// Owners are resolved and the subgraph is fetched once for the whole
    /// batch. A failing target is reported in its own entry; a failure to
    /// resolve owners or fetch edges fails the batch and marks the job
    /// [`JobStatus::Failed`].
    pub fn batch_warm_introductions(
        &self,
        targets: &[EntityId],
        job: &JobState,
    ) -> IntroResult<Vec<TargetIntros>>
    where
        S: Sync,
    {
        job.start(targets.len());
        let owners = match self.owner_ids() {
            Ok(owners) => owners,
            Err(e) => {
                job.fail();
                return Err(e);
            }
        };
        let view = match self.prepare(&owners, &self.config) {
            Ok(view) => view,
            Err(e) => {
                job.fail();
                return Err(e);
            }
        };

        info!(
            "Batch {}: {} targets, {} owners, {} edges in scope",
            job.id(),
            targets.len(),
            owners.len(),
            view.edge_count()
        );

        let results: Vec<TargetIntros> = targets
            .par_iter()
            .map(|target| {
                if job.is_cancelled() {
                    job.record_skipped();
                    return TargetIntros {
                        target: target.clone(),
                        paths: Vec::new(),
                        truncated: false,
                        error: None,
                        skipped: true,
                    };
                }

                match self.run(&view, &owners, target, &self.config) {
                    Ok(found) => {
                        job.record_success(found.paths.len());
                        TargetIntros {
                            target: found.target,
                            paths: found.paths,
                            truncated: found.truncated,
                            error: None,
                            skipped: false,
                        }
                    }
                    Err(e) => {
                        warn!("Warm introductions for {} failed: {}", target, e);
                        job.record_failure();
                        TargetIntros {
                            target: target.clone(),
                            paths: Vec::new(),
                            truncated: false,
                            error: Some(e.to_string()),
                            skipped: false,
                        }
                    }
                }
            })
            .collect();

        job.finish();
        Ok(results)
    }

    /// Internal owner ids, sorted
    fn owner_ids(&self) -> IntroResult<Vec<EntityId>> {
        let mut owners: Vec<EntityId> = self
            .store
            .internal_owners()?
            .into_iter()
            .map(|e| e.id)
            .collect();
        owners.sort();
        owners.dedup();
        Ok(owners)
    }

    /// Validate, then fetch and project the subgraph reachable from `sources`
    fn prepare(&self, sources: &[EntityId], config: &PathfindingConfig) -> IntroResult<GraphView> {
        config.validate()?;
        if sources.is_empty() {
            return Err(PathError::NoSources.into());
        }
        let edges = scope_edges(&self.store, sources, config.max_hops, config.bidirectional)?;
        Ok(build_view(&edges, &config.edge_filter()))
    }

    fn run(
        &self,
        view: &GraphView,
        sources: &[EntityId],
        target: &EntityId,
        config: &PathfindingConfig,
    ) -> IntroResult<IntroPaths> {
        let search = search_paths(view, sources, target.as_str(), &config.to_path_config())?;

        if search.truncated {
            warn!(
                "Search for {} stopped early after {} expansions",
                target, search.expansions
            );
        }
        debug!(
            "Search for {}: {} paths, {} expansions over {} edges",
            target,
            search.paths.len(),
            search.expansions,
            view.edge_count()
        );

        let mut cache = FxHashMap::default();
        let paths = search
            .paths
            .into_iter()
            .map(|path| self.enrich(path, &mut cache))
            .collect::<IntroResult<Vec<_>>>()?;

        Ok(IntroPaths {
            target: target.clone(),
            paths,
            expansions: search.expansions,
            truncated: search.truncated,
        })
    }

    fn enrich(&self, path: Path, cache: &mut FxHashMap<String, PathNode>) -> IntroResult<IntroPath> {
        let mut nodes = Vec::with_capacity(path.nodes.len());
        for id in path.nodes {
            let node = match cache.get(&id) {
                Some(node) => node.clone(),
                None => {
                    let entity = self.store.entity(&id)?;
                    let node = PathNode {
                        id: EntityId::new(id.clone()),
                        name: entity.as_ref().map(|e| e.name.clone()),
                        entity_type: entity.map(|e| e.entity_type),
                    };
                    cache.insert(id, node.clone());
                    node
                }
            };
            nodes.push(node);
        }

        Ok(IntroPath {
            path: nodes,
            kinds: path.kinds.into_iter().map(EdgeKind::from).collect(),
            strength: path.strength,
            length: path.length,
        })
    }
}
