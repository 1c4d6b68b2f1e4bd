use crate::error::GridError;
use crate::geometry::Vec2;
use core::fmt;
use grid_util::grid::{BoolGrid, Grid};
use grid_util::point::Point;
use log::{debug, info, warn};
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

/// A grid coordinate together with its walkability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub coord: Point,
    pub walkable: bool,
}

/// [WalkableGrid] maintains information about components using a [UnionFind] structure in
/// addition to the raw [bool] grid values in the [BoolGrid] that determine whether a cell is
/// walkable ([true]) or blocked ([false]). Closing a cell may split a component, which only
/// marks the components as dirty; [update](Self::update) regenerates them.
/// Implements [Grid] by building on [BoolGrid].
#[derive(Clone, Debug)]
pub struct WalkableGrid {
    pub grid: BoolGrid,
    cell_size: f32,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl Default for WalkableGrid {
    fn default() -> WalkableGrid {
        WalkableGrid {
            grid: BoolGrid::default(),
            cell_size: 1.0,
            components: UnionFind::new(0),
            components_dirty: false,
        }
    }
}

impl WalkableGrid {
    /// Creates a fully walkable grid with unit cells. A zero-size grid is allowed but has
    /// no cells, so every search on it comes back empty.
    pub fn new(width: usize, height: usize) -> WalkableGrid {
        if width * height == 0 {
            warn!("Creating an empty {}x{} grid", width, height);
        }
        <WalkableGrid as Grid<bool>>::new(width, height, true)
    }

    /// Creates a grid from row-major walkability flags (`flags[x + y * width]`).
    pub fn from_flags(width: usize, height: usize, flags: Vec<bool>) -> Result<WalkableGrid, GridError> {
        if width * height == 0 {
            return Err(GridError::Empty { width, height });
        }
        let expected = width * height;
        if flags.len() != expected {
            return Err(GridError::SizeMismatch {
                expected,
                actual: flags.len(),
            });
        }
        let mut grid = BoolGrid::new(width, height, false);
        for (ix, walkable) in flags.into_iter().enumerate() {
            grid.set(ix % width, ix / width, walkable);
        }
        let mut walkable_grid = WalkableGrid {
            grid,
            ..WalkableGrid::default()
        };
        walkable_grid.generate_components();
        Ok(walkable_grid)
    }

    /// Sets the world-space edge length of a cell.
    pub fn with_cell_size(mut self, cell_size: f32) -> Result<WalkableGrid, GridError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(GridError::InvalidCellSize(cell_size));
        }
        self.cell_size = cell_size;
        Ok(self)
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// The cell at `coord`, or [None] outside `[0, width) x [0, height)`.
    pub fn cell(&self, coord: Point) -> Option<Cell> {
        self.point_in_bounds(coord).then(|| Cell {
            coord,
            walkable: self.grid.get_point(coord),
        })
    }
    pub fn is_walkable(&self, coord: Point) -> bool {
        self.cell(coord).map_or(false, |c| c.walkable)
    }

    /// Walkable cells sharing an edge with `coord`. Empty for coordinates off the grid.
    pub fn walkable_neighbors(&self, coord: Point) -> SmallVec<[Cell; 4]> {
        if !self.point_in_bounds(coord) {
            return SmallVec::new();
        }
        coord
            .neumann_neighborhood()
            .into_iter()
            .filter_map(|p| self.cell(p))
            .filter(|c| c.walkable)
            .collect()
    }

    /// Updates a cell's walkability. Joins newly connected components and flags the
    /// components as dirty if they are (potentially) broken apart. Out of range
    /// coordinates are ignored.
    pub fn set_walkable(&mut self, coord: Point, walkable: bool) {
        if !self.point_in_bounds(coord) {
            debug!("Ignoring walkability update outside the grid at {:?}", coord);
            return;
        }
        let ix = self.get_ix_point(&coord);
        if self.grid.get_point(coord) && !walkable {
            self.components_dirty = true;
        } else if walkable {
            for n in self.walkable_neighbors(coord) {
                let n_ix = self.get_ix_point(&n.coord);
                self.components.union(ix, n_ix);
            }
        }
        self.grid.set_point(coord, walkable);
    }

    /// Snaps a world position to the cell whose centre is nearest.
    pub fn world_to_cell(&self, position: Vec2) -> Point {
        Point::new(
            (position.x / self.cell_size).round() as i32,
            (position.y / self.cell_size).round() as i32,
        )
    }
    /// World position of a cell's centre.
    pub fn cell_to_world(&self, coord: Point) -> Vec2 {
        Vec2::new(
            coord.x as f32 * self.cell_size,
            coord.y as f32 * self.cell_size,
        )
    }

    /// Retrieves the component id a given [Point] belongs to.
    pub fn get_component(&self, point: &Point) -> Option<usize> {
        self.point_in_bounds(*point)
            .then(|| self.components.find(self.get_ix_point(point)))
    }
    /// Checks if start and goal are on the same component.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        !self.unreachable(start, goal)
    }
    /// Checks if start and goal are not on the same component.
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        if self.point_in_bounds(*start) && self.point_in_bounds(*goal) {
            let start_ix = self.get_ix_point(start);
            let goal_ix = self.get_ix_point(goal);
            !self.components.equiv(start_ix, goal_ix)
        } else {
            true
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up walkable neighbours.
    pub fn generate_components(&mut self) {
        let w = self.grid.width;
        let h = self.grid.height;
        self.components = UnionFind::new(w * h);
        self.components_dirty = false;
        for x in 0..w as i32 {
            for y in 0..h as i32 {
                let point = Point::new(x, y);
                if !self.is_walkable(point) {
                    continue;
                }
                let parent_ix = self.get_ix_point(&point);
                for p in [Point::new(x + 1, y), Point::new(x, y + 1)] {
                    if self.is_walkable(p) {
                        let ix = self.get_ix_point(&p);
                        self.components.union(parent_ix, ix);
                    }
                }
            }
        }
    }
}

impl Grid<bool> for WalkableGrid {
    fn new(width: usize, height: usize, default_value: bool) -> Self {
        let mut grid = WalkableGrid {
            grid: BoolGrid::new(width, height, default_value),
            ..WalkableGrid::default()
        };
        grid.generate_components();
        grid
    }
    fn get(&self, x: usize, y: usize) -> bool {
        self.grid.get(x, y)
    }
    /// Same as [set_walkable](WalkableGrid::set_walkable).
    fn set(&mut self, x: usize, y: usize, walkable: bool) {
        self.set_walkable(Point::new(x as i32, y as i32), walkable);
    }
    fn width(&self) -> usize {
        self.grid.width
    }
    fn height(&self) -> usize {
        self.grid.height
    }
}

impl fmt::Display for WalkableGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in (0..self.height() as i32).rev() {
            let row = (0..self.width() as i32)
                .map(|x| if self.is_walkable(Point::new(x, y)) { '.' } else { '#' })
                .collect::<String>();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}
