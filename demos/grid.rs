use sightline_pathfinding::{GridSolver, PathSolver, Point, Vec2, WalkableGrid};

// In this example a path is found on a 5x4 grid with shape
//  ____
// |...G|
// |.##.|
// |.#..|
// |S#..|
//  ____
// S marks the start
// G marks the goal
fn main() {
    env_logger::init();
    let mut grid = WalkableGrid::new(5, 4);
    for (x, y) in [(1, 0), (1, 1), (1, 2), (2, 2)] {
        grid.set_walkable(Point::new(x, y), false);
    }
    grid.update();
    println!("{}", grid);

    let solver = GridSolver::new();
    let start = Point::new(0, 0);
    let goal = Point::new(3, 3);
    let path = solver.find_path(&grid, start, goal);
    if path.is_empty() {
        println!("No path from {:?} to {:?}", start, goal);
    } else {
        println!("A path of cost {} has been found:", solver.path_cost(&grid, &path));
        for p in &path {
            println!("{:?}", p);
        }
    }

    // World positions snap to the nearest cell centre.
    let grid = grid.with_cell_size(0.5).unwrap();
    let path = solver.find_path_world(&grid, Vec2::new(0.1, 0.2), Vec2::new(2.1, 0.4));
    println!("World path: {:?}", path);
}
