use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use sightline_pathfinding::{
    GraphBuilder, GridSolver, Obstacle, ObstacleField, ObstacleFilter, PathSolver, Point,
    SearchContext, Shape, SweptOccluder, Vec2, WalkableGrid, Waypoint, WaypointId,
    WaypointNavigator, WaypointSolver,
};
use std::hint::black_box;

/// A square room with `n` pillars and waypoints on a regular lattice between them.
fn pillar_room(n: usize, rng: &mut StdRng) -> (Vec<Waypoint>, ObstacleField) {
    let side = 40.0;
    let field = (0..n)
        .map(|_| {
            let center = Vec2::new(rng.gen_range(2.0..side - 2.0), rng.gen_range(2.0..side - 2.0));
            Obstacle::wall(Shape::circle(center, rng.gen_range(0.5..1.5)))
        })
        .collect();
    let waypoints = (0..8)
        .flat_map(|x| (0..8).map(move |y| (x, y)))
        .enumerate()
        .map(|(i, (x, y))| {
            Waypoint::new(
                i as u32,
                format!("w{}", i),
                Vec2::new(2.5 + x as f32 * 5.0, 2.5 + y as f32 * 5.0),
            )
        })
        .collect();
    (waypoints, field)
}

fn graph_bench(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let (waypoints, field) = pillar_room(30, &mut rng);
    let occluder = SweptOccluder::new(field);

    c.bench_function("build 64 waypoints, 30 pillars", |b| {
        b.iter(|| {
            black_box(
                GraphBuilder::new(&occluder, ObstacleFilter::default())
                    .build(&waypoints)
                    .map(|(graph, _)| graph.edge_count()),
            )
        })
    });

    let (graph, _) = GraphBuilder::new(&occluder, ObstacleFilter::default())
        .build(&waypoints)
        .unwrap();
    let solver = WaypointSolver::new();
    let mut context = SearchContext::new();
    let queries = (0..100)
        .map(|_| (WaypointId(rng.gen_range(0..64)), WaypointId(rng.gen_range(0..64))))
        .collect::<Vec<_>>();
    c.bench_function("waypoint search, 100 queries", |b| {
        b.iter(|| {
            for (start, goal) in &queries {
                black_box(solver.find_path_in(&mut context, &graph, *start, *goal));
            }
        })
    });

    let navigator =
        WaypointNavigator::new(waypoints.clone(), occluder.clone(), ObstacleFilter::default());
    navigator.rebuild().unwrap();
    c.bench_function("navigator request", |b| {
        b.iter(|| black_box(navigator.compute_path(Vec2::new(1.0, 1.0), Vec2::new(39.0, 39.0))))
    });
}

fn grid_bench(c: &mut Criterion) {
    const N: usize = 64;
    let mut rng = StdRng::seed_from_u64(0);
    let flags = (0..N * N).map(|_| !rng.gen_bool(0.25)).collect();
    let mut grid = WalkableGrid::from_flags(N, N, flags).unwrap();
    let start = Point::new(0, 0);
    let end = Point::new(N as i32 - 1, N as i32 - 1);
    grid.set_walkable(start, true);
    grid.set_walkable(end, true);
    grid.update();
    let solver = GridSolver::new();
    let mut context = SearchContext::new();

    for heuristic_factor in [1.0, 1.5] {
        let solver = GridSolver { heuristic_factor };
        c.bench_function(
            format!("{N}x{N} 4-grid, heuristic factor {heuristic_factor}").as_str(),
            |b| b.iter(|| black_box(solver.find_path_in(&mut context, &grid, start, end))),
        );
    }
    c.bench_function(format!("{N}x{N} 4-grid, fresh context").as_str(), |b| {
        b.iter(|| black_box(solver.find_path(&grid, start, end)))
    });
}

criterion_group!(benches, graph_bench, grid_bench);
criterion_main!(benches);
