//! # sightline_pathfinding
//!
//! Pathfinding over two substrates that share one A* engine:
//!
//! - a **waypoint graph**, where author-placed waypoints are connected whenever the
//!   straight segment between them is clear of blocking geometry. Visibility is decided
//!   by an [Occluder]; [SweptOccluder] sweeps a capsule along the segment, fans out
//!   parallel probes and finally checks the bounds of every selected obstacle.
//!   [WaypointNavigator] snaps arbitrary world positions to the graph and swaps rebuilt
//!   graphs in atomically.
//! - a **uniform grid** of walkable cells searched with 4-neighbour moves and a
//!   Manhattan heuristic.
//!
//! Both pre-compute [connected components](https://en.wikipedia.org/wiki/Component_(graph_theory))
//! so that requests without a path fail before searching. A failed search is an empty
//! [Vec], never an error.
//!
//! ```
//! use sightline_pathfinding::*;
//!
//! let waypoints = vec![
//!     Waypoint::new(0, "door", Vec2::new(0.0, 0.0)),
//!     Waypoint::new(1, "hall", Vec2::new(0.0, 8.0)),
//!     Waypoint::new(2, "stairs", Vec2::new(8.0, 8.0)),
//! ];
//! let field: ObstacleField = [Obstacle::wall(Shape::rect(
//!     Vec2::new(3.0, -1.0),
//!     Vec2::new(4.0, 5.0),
//! ))]
//! .into_iter()
//! .collect();
//! let navigator = WaypointNavigator::new(waypoints, SweptOccluder::new(field), ObstacleFilter::default());
//! navigator.rebuild().unwrap();
//! let path = navigator.compute_path(Vec2::new(0.5, 0.5), Vec2::new(8.0, 7.5));
//! assert_eq!(path.len(), 5);
//! ```
pub mod astar;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod navigator;
pub mod obstacle;
pub mod occlusion;
pub mod pathing_grid;
pub mod solver;
pub mod waypoint;

pub use crate::astar::SearchContext;
pub use crate::error::{BuildError, GridError};
pub use crate::geometry::{Aabb, Shape, Vec2};
pub use crate::graph::{BuildStats, GraphBuilder, WaypointGraph};
pub use crate::navigator::WaypointNavigator;
pub use crate::obstacle::{Obstacle, ObstacleCategory, ObstacleField, ObstacleFilter};
pub use crate::occlusion::{Occluder, OcclusionConfig, OcclusionLayer, SweptOccluder, Visibility};
pub use crate::pathing_grid::{Cell, WalkableGrid};
pub use crate::solver::grid::GridSolver;
pub use crate::solver::waypoint::WaypointSolver;
pub use crate::solver::PathSolver;
pub use crate::waypoint::{Waypoint, WaypointId};
pub use grid_util::grid::Grid;
pub use grid_util::point::Point;
