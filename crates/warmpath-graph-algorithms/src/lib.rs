pub mod common;
pub mod pathfinding;

pub use common::{GraphView, GraphViewBuilder, NodeId, OutEdge};
pub use pathfinding::{
    find_paths, search_paths, strongest_path, Path, PathConfig, PathError, PathSearch,
};
