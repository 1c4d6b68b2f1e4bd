use grid_util::point::Point;
use log::info;
use smallvec::SmallVec;

use crate::geometry::Vec2;
use crate::pathing_grid::WalkableGrid;
use crate::solver::PathSolver;

/// A* over a [WalkableGrid] with unit steps between 4-neighbours and a Manhattan heuristic.
#[derive(Clone, Debug)]
pub struct GridSolver {
    pub heuristic_factor: f32,
}

impl GridSolver {
    pub fn new() -> GridSolver {
        GridSolver {
            heuristic_factor: 1.0,
        }
    }

    /// Snaps both world positions to their cells and searches between them. There is
    /// no reachability check between a raw position and its cell.
    pub fn find_path_world(
        &self,
        grid: &WalkableGrid,
        raw_start: Vec2,
        raw_goal: Vec2,
    ) -> Vec<Point> {
        self.find_path(
            grid,
            grid.world_to_cell(raw_start),
            grid.world_to_cell(raw_goal),
        )
    }
}

impl Default for GridSolver {
    fn default() -> GridSolver {
        GridSolver::new()
    }
}

impl PathSolver for GridSolver {
    type Space = WalkableGrid;
    type Node = Point;
    type Cost = i32;
    type Successors = SmallVec<[(Point, i32); 4]>;

    /// The start has to be on the grid, the goal has to be walkable. Components are only
    /// consulted while they are up to date.
    fn endpoints_valid(&self, grid: &WalkableGrid, start: &Point, goal: &Point) -> bool {
        if grid.cell(*start).is_none() || !grid.is_walkable(*goal) {
            return false;
        }
        if !grid.components_dirty && grid.is_walkable(*start) && grid.unreachable(start, goal) {
            info!("{:?} is not reachable from {:?}", goal, start);
            return false;
        }
        true
    }

    /// Manhattan distance, which is the number of unit steps between the cells.
    fn cost(&self, _grid: &WalkableGrid, p1: &Point, p2: &Point) -> i32 {
        p1.manhattan_distance(p2)
    }

    /// Just the cost times a heuristic factor.
    fn heuristic(&self, grid: &WalkableGrid, p1: &Point, p2: &Point) -> i32 {
        (self.cost(grid, p1, p2) as f32 * self.heuristic_factor) as i32
    }

    fn successors(&self, grid: &WalkableGrid, node: &Point) -> Self::Successors {
        grid.walkable_neighbors(*node)
            .into_iter()
            .map(|c| (c.coord, 1))
            .collect()
    }
}
