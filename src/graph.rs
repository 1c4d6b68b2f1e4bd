//! Waypoint graph construction. Every ordered pair of distinct waypoints is tested with an
//! [Occluder]; the destination joins the source's adjacency entry iff the segment is clear.
//! Connected components are computed alongside so unreachable requests fail before search.
use crate::error::BuildError;
use crate::geometry::Vec2;
use crate::obstacle::ObstacleFilter;
use crate::occlusion::Occluder;
use crate::waypoint::{Waypoint, WaypointId};
use core::fmt;
use fxhash::{FxBuildHasher, FxHashSet};
use indexmap::IndexMap;
use itertools::Itertools;
use log::{info, warn};
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Adjacency entry of a single waypoint, in waypoint order.
pub type Neighbours = SmallVec<[WaypointId; 8]>;

#[derive(Clone, Debug)]
struct Node {
    name: String,
    position: Vec2,
    neighbours: Neighbours,
}

/// Immutable snapshot of the waypoint adjacency produced by one build.
#[derive(Clone, Debug)]
pub struct WaypointGraph {
    pub(crate) generation: u64,
    filter: ObstacleFilter,
    nodes: FxIndexMap<WaypointId, Node>,
    components: UnionFind<usize>,
}

impl Default for WaypointGraph {
    fn default() -> WaypointGraph {
        WaypointGraph {
            generation: 0,
            filter: ObstacleFilter::default(),
            nodes: FxIndexMap::default(),
            components: UnionFind::new(0),
        }
    }
}

impl WaypointGraph {
    /// Build counter of the navigator that published this graph; `0` for the initial empty graph.
    pub fn generation(&self) -> u64 {
        self.generation
    }
    /// The filter the adjacency was computed with.
    pub fn filter(&self) -> ObstacleFilter {
        self.filter
    }
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
    pub fn contains(&self, id: WaypointId) -> bool {
        self.nodes.contains_key(&id)
    }
    pub fn position(&self, id: WaypointId) -> Option<Vec2> {
        self.nodes.get(&id).map(|n| n.position)
    }
    pub fn name(&self, id: WaypointId) -> Option<&str> {
        self.nodes.get(&id).map(|n| n.name.as_str())
    }
    /// Waypoints reachable from `id` by a clear straight segment. Empty for unknown ids.
    pub fn neighbours(&self, id: WaypointId) -> &[WaypointId] {
        self.nodes
            .get(&id)
            .map(|n| n.neighbours.as_slice())
            .unwrap_or(&[])
    }
    /// Every adjacency entry, in waypoint order.
    pub fn adjacency(&self) -> impl Iterator<Item = (WaypointId, &[WaypointId])> + '_ {
        self.nodes
            .iter()
            .map(|(id, n)| (*id, n.neighbours.as_slice()))
    }
    /// Directed edges as `(from, to)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (WaypointId, WaypointId)> + '_ {
        self.adjacency()
            .flat_map(|(from, to)| to.iter().map(move |t| (from, *t)))
    }
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.neighbours.len()).sum()
    }
    /// Waypoints with an empty adjacency entry.
    pub fn isolated(&self) -> Vec<WaypointId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.neighbours.is_empty())
            .map(|(id, _)| *id)
            .collect()
    }
    /// The waypoint closest to `position`; the earliest one wins ties.
    pub fn nearest(&self, position: Vec2) -> Option<WaypointId> {
        self.nodes
            .iter()
            .map(|(id, n)| (*id, n.position.distance(&position)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }
    /// Retrieves the component id a given waypoint belongs to.
    pub fn component(&self, id: WaypointId) -> Option<usize> {
        self.nodes
            .get_index_of(&id)
            .map(|ix| self.components.find(ix))
    }
    pub fn component_count(&self) -> usize {
        (0..self.nodes.len())
            .map(|ix| self.components.find(ix))
            .unique()
            .count()
    }
    /// Checks if start and goal are on the same component.
    pub fn reachable(&self, start: WaypointId, goal: WaypointId) -> bool {
        match (self.nodes.get_index_of(&start), self.nodes.get_index_of(&goal)) {
            (Some(s), Some(g)) => self.components.equiv(s, g),
            _ => false,
        }
    }
}

/// Counters reported by a graph build.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub nodes: usize,
    pub valid_edges: usize,
    pub blocked_pairs: usize,
    pub components: usize,
    pub isolated: Vec<WaypointId>,
}

impl fmt::Display for BuildStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} nodes, {} valid edges, {} blocked pairs, {} components, {} isolated",
            self.nodes,
            self.valid_edges,
            self.blocked_pairs,
            self.components,
            self.isolated.len()
        )
    }
}

/// Builds a [WaypointGraph] from waypoints and an [Occluder].
pub struct GraphBuilder<'a, O: ?Sized> {
    occluder: &'a O,
    filter: ObstacleFilter,
}

impl<'a, O: Occluder + ?Sized> GraphBuilder<'a, O> {
    pub fn new(occluder: &'a O, filter: ObstacleFilter) -> GraphBuilder<'a, O> {
        GraphBuilder { occluder, filter }
    }

    fn validate(&self, waypoints: &[Waypoint]) -> Result<(), BuildError> {
        if self.filter.is_empty() {
            return Err(BuildError::EmptyFilter);
        }
        if waypoints.is_empty() {
            return Err(BuildError::EmptyWaypointSet);
        }
        let mut seen = FxHashSet::default();
        for w in waypoints {
            if !w.position.is_finite() {
                return Err(BuildError::NonFinitePosition { id: w.id });
            }
            if !seen.insert(w.id) {
                return Err(BuildError::DuplicateWaypoint(w.id));
            }
        }
        Ok(())
    }

    /// Tests all ordered pairs of distinct waypoints. O(n²) occlusion queries.
    pub fn build(&self, waypoints: &[Waypoint]) -> Result<(WaypointGraph, BuildStats), BuildError> {
        self.validate(waypoints)?;
        if self.occluder.blocking_count(self.filter) == Some(0) {
            warn!(
                "No obstacles match filter {}, the graph may be inaccurate",
                self.filter
            );
        }

        let n = waypoints.len();
        let mut adjacency = vec![Neighbours::new(); n];
        let mut components = UnionFind::new(n);
        let mut valid_edges = 0;
        let mut blocked_pairs = 0;
        for ((i, source), (j, target)) in waypoints
            .iter()
            .enumerate()
            .cartesian_product(waypoints.iter().enumerate())
        {
            if i == j {
                continue;
            }
            if self
                .occluder
                .is_clear(source.position, target.position, self.filter)
            {
                adjacency[i].push(target.id);
                components.union(i, j);
                valid_edges += 1;
            } else {
                blocked_pairs += 1;
            }
        }

        let nodes = waypoints
            .iter()
            .zip(adjacency)
            .map(|(w, neighbours)| {
                (
                    w.id,
                    Node {
                        name: w.name.clone(),
                        position: w.position,
                        neighbours,
                    },
                )
            })
            .collect::<FxIndexMap<_, _>>();
        let graph = WaypointGraph {
            generation: 0,
            filter: self.filter,
            nodes,
            components,
        };

        let isolated = graph.isolated();
        for id in &isolated {
            if let Some(name) = graph.name(*id) {
                warn!("Waypoint '{}' {} is isolated (no connections)", name, id);
            }
        }
        if !isolated.is_empty() {
            warn!(
                "{} isolated waypoints, check their placement or reduce the probe radius",
                isolated.len()
            );
        }
        let stats = BuildStats {
            nodes: n,
            valid_edges,
            blocked_pairs,
            components: graph.component_count(),
            isolated,
        };
        info!("Graph build complete: {}", stats);
        Ok((graph, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Shape;
    use crate::obstacle::{Obstacle, ObstacleField};
    use crate::occlusion::SweptOccluder;

    fn layout() -> (Vec<Waypoint>, SweptOccluder) {
        let waypoints = vec![
            Waypoint::new(0, "a", Vec2::new(0.0, 0.0)),
            Waypoint::new(1, "b", Vec2::new(5.0, 5.0)),
            Waypoint::new(2, "c", Vec2::new(10.0, 0.0)),
            // Walled in on every side.
            Waypoint::new(3, "d", Vec2::new(20.0, 0.0)),
        ];
        let field: ObstacleField = [
            Obstacle::wall(Shape::rect(Vec2::new(4.5, -3.0), Vec2::new(5.5, 2.0))),
            Obstacle::wall(Shape::rect(Vec2::new(19.0, -1.0), Vec2::new(21.0, 1.0))),
        ]
        .into_iter()
        .collect();
        (waypoints, SweptOccluder::new(field))
    }

    #[test]
    fn wall_removes_edge() {
        let (waypoints, occluder) = layout();
        let (graph, stats) = GraphBuilder::new(&occluder, ObstacleFilter::default())
            .build(&waypoints)
            .unwrap();
        assert_eq!(graph.neighbours(WaypointId(0)), &[WaypointId(1)]);
        assert_eq!(graph.neighbours(WaypointId(1)), &[WaypointId(0), WaypointId(2)]);
        assert_eq!(graph.neighbours(WaypointId(2)), &[WaypointId(1)]);
        assert_eq!(stats.valid_edges, 4);
        assert_eq!(stats.blocked_pairs, 12 - 4);
        assert_eq!(stats.nodes, 4);
    }

    #[test]
    fn isolated_waypoint_is_reported() {
        let (waypoints, occluder) = layout();
        let (graph, stats) = GraphBuilder::new(&occluder, ObstacleFilter::default())
            .build(&waypoints)
            .unwrap();
        assert_eq!(stats.isolated, vec![WaypointId(3)]);
        assert_eq!(graph.isolated(), vec![WaypointId(3)]);
        assert_eq!(stats.components, 2);
        assert!(graph.reachable(WaypointId(0), WaypointId(2)));
        assert!(!graph.reachable(WaypointId(0), WaypointId(3)));
    }

    #[test]
    fn rebuild_is_idempotent() {
        let (waypoints, occluder) = layout();
        let builder = GraphBuilder::new(&occluder, ObstacleFilter::default());
        let (g1, s1) = builder.build(&waypoints).unwrap();
        let (g2, s2) = builder.build(&waypoints).unwrap();
        assert_eq!(s1, s2);
        assert_eq!(g1.edges().collect::<Vec<_>>(), g2.edges().collect::<Vec<_>>());
    }

    #[test]
    fn configuration_errors() {
        let (waypoints, occluder) = layout();
        assert_eq!(
            GraphBuilder::new(&occluder, ObstacleFilter::NONE)
                .build(&waypoints)
                .unwrap_err(),
            BuildError::EmptyFilter
        );
        assert_eq!(
            GraphBuilder::new(&occluder, ObstacleFilter::default())
                .build(&[])
                .unwrap_err(),
            BuildError::EmptyWaypointSet
        );
        let mut duplicated = waypoints.clone();
        duplicated.push(Waypoint::new(1, "b again", Vec2::new(1.0, 1.0)));
        assert_eq!(
            GraphBuilder::new(&occluder, ObstacleFilter::default())
                .build(&duplicated)
                .unwrap_err(),
            BuildError::DuplicateWaypoint(WaypointId(1))
        );
        let nan = [Waypoint::new(7, "nan", Vec2::new(f32::NAN, 0.0))];
        assert_eq!(
            GraphBuilder::new(&occluder, ObstacleFilter::default())
                .build(&nan)
                .unwrap_err(),
            BuildError::NonFinitePosition { id: WaypointId(7) }
        );
    }

    #[test]
    fn directed_occluder_gives_directed_edges() {
        // Only segments pointing in +x are clear.
        let occluder = |a: Vec2, b: Vec2, _: ObstacleFilter| b.x > a.x;
        let waypoints = vec![
            Waypoint::new(0, "west", Vec2::new(0.0, 0.0)),
            Waypoint::new(1, "east", Vec2::new(1.0, 0.0)),
        ];
        let (graph, stats) = GraphBuilder::new(&occluder, ObstacleFilter::default())
            .build(&waypoints)
            .unwrap();
        assert_eq!(graph.neighbours(WaypointId(0)), &[WaypointId(1)]);
        assert!(graph.neighbours(WaypointId(1)).is_empty());
        assert_eq!(stats.isolated, vec![WaypointId(1)]);
        assert_eq!(stats.components, 1);
    }

    #[test]
    fn nearest_prefers_first_on_ties() {
        let occluder = |_: Vec2, _: Vec2, _: ObstacleFilter| true;
        let waypoints = vec![
            Waypoint::new(4, "left", Vec2::new(-1.0, 0.0)),
            Waypoint::new(2, "right", Vec2::new(1.0, 0.0)),
        ];
        let (graph, _) = GraphBuilder::new(&occluder, ObstacleFilter::default())
            .build(&waypoints)
            .unwrap();
        assert_eq!(graph.nearest(Vec2::ZERO), Some(WaypointId(4)));
        assert_eq!(graph.nearest(Vec2::new(0.9, 3.0)), Some(WaypointId(2)));
        assert_eq!(WaypointGraph::default().nearest(Vec2::ZERO), None);
    }
}
