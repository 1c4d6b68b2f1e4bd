use crate::astar::SearchContext;
use itertools::Itertools;
use num_traits::Zero;
use std::hash::Hash;

pub mod grid;
pub mod waypoint;

/// A* parameterised over a search space. Implementors describe the space (which
/// endpoints are admissible, edge costs, heuristic and successors); the search itself is
/// shared.
pub trait PathSolver {
    type Space: ?Sized;
    type Node: Eq + Hash + Clone;
    type Cost: Zero + PartialOrd + Copy;
    type Successors: IntoIterator<Item = (Self::Node, Self::Cost)>;

    /// Whether a search between the endpoints can succeed at all. Returning `false`
    /// yields an empty path without searching.
    fn endpoints_valid(&self, space: &Self::Space, start: &Self::Node, goal: &Self::Node)
        -> bool;

    /// Cost of moving directly between two nodes.
    fn cost(&self, space: &Self::Space, p1: &Self::Node, p2: &Self::Node) -> Self::Cost;

    fn heuristic(&self, space: &Self::Space, p1: &Self::Node, p2: &Self::Node) -> Self::Cost;

    fn successors(&self, space: &Self::Space, node: &Self::Node) -> Self::Successors;

    /// Computes a path from start to goal including both ends. Empty if there is none.
    fn find_path(&self, space: &Self::Space, start: Self::Node, goal: Self::Node) -> Vec<Self::Node> {
        let mut context = SearchContext::new();
        self.find_path_in(&mut context, space, start, goal)
    }

    /// Same as [find_path](Self::find_path) but reuses the allocations of `context`.
    fn find_path_in(
        &self,
        context: &mut SearchContext<Self::Node, Self::Cost>,
        space: &Self::Space,
        start: Self::Node,
        goal: Self::Node,
    ) -> Vec<Self::Node> {
        if !self.endpoints_valid(space, &start, &goal) {
            return Vec::new();
        }
        context
            .astar(
                &start,
                |node| self.successors(space, node),
                |node| self.heuristic(space, node, &goal),
                |node| *node == goal,
            )
            .map(|(path, _cost)| path)
            .unwrap_or_default()
    }

    /// Sum of the edge costs along a path.
    fn path_cost(&self, space: &Self::Space, path: &[Self::Node]) -> Self::Cost {
        path.iter()
            .tuple_windows()
            .fold(Zero::zero(), |total, (a, b)| total + self.cost(space, a, b))
    }
}
