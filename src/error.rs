use crate::waypoint::WaypointId;
use thiserror::Error;

/// Configuration problems that abort a graph build. The previously built graph stays in use.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("no waypoints to build a graph from")]
    EmptyWaypointSet,
    #[error("obstacle filter selects no categories")]
    EmptyFilter,
    #[error("waypoint {0} appears more than once")]
    DuplicateWaypoint(WaypointId),
    #[error("waypoint {id} has a non-finite position")]
    NonFinitePosition { id: WaypointId },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("grid of {width}x{height} cells has no cells")]
    Empty { width: usize, height: usize },
    #[error("expected {expected} walkability flags, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("cell size must be positive and finite, got {0}")]
    InvalidCellSize(f32),
}
