//! Path requests between arbitrary world positions over a [WaypointGraph].
//!
//! The navigator owns the waypoint set, the occluder and the filter. A rebuild
//! produces a complete new graph off to the side and then swaps it in, so a request
//! always searches one consistent snapshot.
use crate::error::BuildError;
use crate::geometry::Vec2;
use crate::graph::{BuildStats, GraphBuilder, WaypointGraph};
use crate::obstacle::ObstacleFilter;
use crate::occlusion::{Occluder, SweptOccluder};
use crate::solver::waypoint::WaypointSolver;
use crate::solver::PathSolver;
use crate::waypoint::{Waypoint, WaypointId};
use log::{error, info, warn};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

pub struct WaypointNavigator<O = SweptOccluder> {
    waypoints: Vec<Waypoint>,
    occluder: O,
    filter: ObstacleFilter,
    pub solver: WaypointSolver,
    current: RwLock<Arc<WaypointGraph>>,
    // Serializes rebuilds and holds the last published generation.
    rebuild_lock: Mutex<u64>,
}

impl<O: Occluder> WaypointNavigator<O> {
    /// Creates a navigator with an empty graph. Nothing is built until [rebuild](Self::rebuild).
    pub fn new(waypoints: Vec<Waypoint>, occluder: O, filter: ObstacleFilter) -> WaypointNavigator<O> {
        WaypointNavigator {
            waypoints,
            occluder,
            filter,
            solver: WaypointSolver::new(),
            current: RwLock::new(Arc::new(WaypointGraph::default())),
            rebuild_lock: Mutex::new(0),
        }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }
    /// Replaces the waypoint set. Takes effect on the next rebuild.
    pub fn set_waypoints(&mut self, waypoints: Vec<Waypoint>) {
        self.waypoints = waypoints;
    }
    pub fn filter(&self) -> ObstacleFilter {
        self.filter
    }
    /// Replaces the obstacle filter. Takes effect on the next rebuild.
    pub fn set_filter(&mut self, filter: ObstacleFilter) {
        self.filter = filter;
    }
    pub fn occluder(&self) -> &O {
        &self.occluder
    }
    /// Mutable access to the occluder, e.g. to move obstacles. Takes effect on the next rebuild.
    pub fn occluder_mut(&mut self) -> &mut O {
        &mut self.occluder
    }

    /// The currently published graph.
    pub fn graph(&self) -> Arc<WaypointGraph> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recomputes the adjacency and publishes it. Concurrent rebuilds run one after
    /// the other. On a configuration error the previously published graph stays in use.
    pub fn rebuild(&self) -> Result<BuildStats, BuildError> {
        let mut generation = self
            .rebuild_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let (mut graph, stats) = GraphBuilder::new(&self.occluder, self.filter)
            .build(&self.waypoints)
            .map_err(|e| {
                error!("Graph rebuild failed, keeping the previous graph: {}", e);
                e
            })?;
        *generation += 1;
        graph.generation = *generation;
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(graph);
        Ok(stats)
    }

    /// Whether `raw` can be reached in a straight line from the waypoint at `anchor`.
    /// An endpoint sitting on its waypoint is a degenerate query and does not connect.
    fn connects(&self, graph: &WaypointGraph, anchor: Vec2, raw: Vec2) -> bool {
        self.occluder.is_clear(anchor, raw, graph.filter())
    }

    /// Snaps both endpoints, checks that the raw start can be reached from its waypoint
    /// and searches between the snapped waypoints.
    fn route(&self, graph: &WaypointGraph, raw_start: Vec2, raw_goal: Vec2) -> Vec<WaypointId> {
        let (Some(start), Some(goal)) = (graph.nearest(raw_start), graph.nearest(raw_goal)) else {
            warn!("No waypoints available, did the graph get built?");
            return Vec::new();
        };
        let Some(start_position) = graph.position(start) else {
            return Vec::new();
        };
        if !self.connects(graph, start_position, raw_start) {
            warn!(
                "Start {:?} is not reachable from its nearest waypoint {}",
                raw_start, start
            );
            return Vec::new();
        }
        let route = self.solver.find_path(graph, start, goal);
        if route.is_empty() {
            warn!("No route between waypoints {} and {}", start, goal);
        }
        route
    }

    /// Snaps the endpoints to their nearest waypoints and searches between them.
    /// Returns the raw start, the waypoint positions along the route and, if it can
    /// be reached from the last waypoint, the raw goal. Empty if there is no path.
    pub fn compute_path(&self, raw_start: Vec2, raw_goal: Vec2) -> Vec<Vec2> {
        let graph = self.graph();
        let route = self.route(&graph, raw_start, raw_goal);
        let Some(last) = route.last().and_then(|id| graph.position(*id)) else {
            return Vec::new();
        };
        let mut path = Vec::with_capacity(route.len() + 2);
        path.push(raw_start);
        path.extend(route.iter().filter_map(|id| graph.position(*id)));
        if self.connects(&graph, last, raw_goal) {
            path.push(raw_goal);
        } else {
            info!("Goal {:?} is not reachable from {:?}", raw_goal, last);
        }
        info!(
            "Found path with {} points over {} waypoints",
            path.len(),
            route.len()
        );
        path
    }

    /// The waypoint ids [compute_path](Self::compute_path) walks through, under the same
    /// start check. Empty if there is no path.
    pub fn compute_route(&self, raw_start: Vec2, raw_goal: Vec2) -> Vec<WaypointId> {
        let graph = self.graph();
        self.route(&graph, raw_start, raw_goal)
    }
}
