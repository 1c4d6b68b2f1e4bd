use sightline_pathfinding::{
    Obstacle, ObstacleCategory, ObstacleField, ObstacleFilter, Shape, SweptOccluder, Vec2,
    Waypoint, WaypointNavigator,
};

// A hall split by a wall with a doorway at the top and a pond in the lower half.
//
//   w2 ----- w3 ----- w4
//   |        door     |
//   w1       #        w5
//   |  ~~    #        |
//   w0       #        w6
fn main() {
    env_logger::init();
    let waypoints = vec![
        Waypoint::new(0, "west low", Vec2::new(0.0, 0.0)),
        Waypoint::new(1, "west mid", Vec2::new(0.0, 5.0)),
        Waypoint::new(2, "west high", Vec2::new(0.0, 10.0)),
        Waypoint::new(3, "door", Vec2::new(6.0, 10.0)),
        Waypoint::new(4, "east high", Vec2::new(12.0, 10.0)),
        Waypoint::new(5, "east mid", Vec2::new(12.0, 5.0)),
        Waypoint::new(6, "east low", Vec2::new(12.0, 0.0)),
    ];
    let field: ObstacleField = [
        Obstacle::wall(Shape::rect(Vec2::new(5.5, -2.0), Vec2::new(6.5, 8.0))),
        Obstacle::new(ObstacleCategory::Water, Shape::circle(Vec2::new(3.0, 2.5), 1.0)),
    ]
    .into_iter()
    .collect();

    let mut navigator = WaypointNavigator::new(
        waypoints,
        SweptOccluder::new(field),
        ObstacleFilter::default(),
    );
    match navigator.rebuild() {
        Ok(stats) => println!("Built graph: {}", stats),
        Err(e) => println!("Build failed: {}", e),
    }
    let graph = navigator.graph();
    for (id, neighbours) in graph.adjacency() {
        let names = neighbours
            .iter()
            .filter_map(|n| graph.name(*n))
            .collect::<Vec<_>>();
        println!("{} {:?} -> {:?}", id, graph.name(id), names);
    }

    let start = Vec2::new(0.5, 0.5);
    let goal = Vec2::new(11.5, 0.5);
    println!("Path: {:?}", navigator.compute_path(start, goal));

    // Water only blocks once the filter selects it.
    navigator.set_filter(ObstacleFilter::default().with(ObstacleCategory::Water));
    if let Ok(stats) = navigator.rebuild() {
        println!("Rebuilt with water: {}", stats);
    }
    println!("Path: {:?}", navigator.compute_path(start, goal));
}
