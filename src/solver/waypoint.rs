use log::{debug, info};
use smallvec::SmallVec;

use crate::graph::WaypointGraph;
use crate::solver::PathSolver;
use crate::waypoint::WaypointId;

/// A* over a [WaypointGraph] with straight-line edge costs and a Euclidean heuristic.
#[derive(Clone, Debug)]
pub struct WaypointSolver {
    pub heuristic_factor: f32,
}

impl WaypointSolver {
    pub fn new() -> WaypointSolver {
        WaypointSolver {
            heuristic_factor: 1.0,
        }
    }
}

impl Default for WaypointSolver {
    fn default() -> WaypointSolver {
        WaypointSolver::new()
    }
}

impl PathSolver for WaypointSolver {
    type Space = WaypointGraph;
    type Node = WaypointId;
    type Cost = f32;
    type Successors = SmallVec<[(WaypointId, f32); 8]>;

    fn endpoints_valid(&self, graph: &WaypointGraph, start: &WaypointId, goal: &WaypointId) -> bool {
        if !graph.contains(*start) || !graph.contains(*goal) {
            debug!("{} or {} is not part of the graph", start, goal);
            return false;
        }
        if !graph.reachable(*start, *goal) {
            info!("{} is not reachable from {}", goal, start);
            return false;
        }
        true
    }

    /// Euclidean distance between the waypoints.
    fn cost(&self, graph: &WaypointGraph, p1: &WaypointId, p2: &WaypointId) -> f32 {
        match (graph.position(*p1), graph.position(*p2)) {
            (Some(a), Some(b)) => a.distance(&b),
            _ => f32::INFINITY,
        }
    }

    /// Just the cost times a heuristic factor.
    fn heuristic(&self, graph: &WaypointGraph, p1: &WaypointId, p2: &WaypointId) -> f32 {
        self.cost(graph, p1, p2) * self.heuristic_factor
    }

    fn successors(&self, graph: &WaypointGraph, node: &WaypointId) -> Self::Successors {
        graph
            .neighbours(*node)
            .iter()
            .map(|n| (*n, self.cost(graph, node, n)))
            .collect()
    }
}
