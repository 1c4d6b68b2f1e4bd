/// Fuzzes occlusion and graph building over random obstacle fields: visibility must not depend
/// on the direction of the query, rebuilding must not change the graph and every returned path
/// must only use clear segments.
use sightline_pathfinding::*;
use rand::prelude::*;

fn random_field(rng: &mut StdRng, n: usize) -> ObstacleField {
    (0..n)
        .map(|_| {
            let center = Vec2::new(rng.gen_range(0.0..20.0), rng.gen_range(0.0..20.0));
            let shape = match rng.gen_range(0..3) {
                0 => Shape::circle(center, rng.gen_range(0.2..2.0)),
                1 => {
                    let extents = Vec2::new(rng.gen_range(0.1..2.0), rng.gen_range(0.1..2.0));
                    Shape::rect(center - extents, center + extents)
                }
                _ => Shape::segment(
                    center,
                    center + Vec2::new(rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0)),
                ),
            };
            let category = ObstacleCategory::ALL[rng.gen_range(0..ObstacleCategory::ALL.len())];
            Obstacle::new(category, shape)
        })
        .collect()
}

fn random_waypoints(rng: &mut StdRng, n: usize) -> Vec<Waypoint> {
    (0..n)
        .map(|i| {
            Waypoint::new(
                i as u32,
                format!("w{}", i),
                Vec2::new(rng.gen_range(0.0..20.0), rng.gen_range(0.0..20.0)),
            )
        })
        .collect()
}

#[test]
fn fuzz_symmetry() {
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..200 {
        let occluder = SweptOccluder::new(random_field(&mut rng, 8));
        let filter = if rng.gen_bool(0.5) {
            ObstacleFilter::default()
        } else {
            ObstacleFilter::ALL
        };
        for _ in 0..50 {
            let a = Vec2::new(rng.gen_range(0.0..20.0), rng.gen_range(0.0..20.0));
            let b = Vec2::new(rng.gen_range(0.0..20.0), rng.gen_range(0.0..20.0));
            assert_eq!(
                occluder.is_clear(a, b, filter),
                occluder.is_clear(b, a, filter),
                "{:?} <-> {:?}",
                a,
                b
            );
            // Everything blocking under the default filter also blocks when all are selected.
            if !occluder.is_clear(a, b, ObstacleFilter::default()) {
                assert!(!occluder.is_clear(a, b, ObstacleFilter::ALL));
            }
        }
    }
}

#[test]
fn fuzz_rebuild() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..50 {
        let waypoints = random_waypoints(&mut rng, 12);
        let occluder = SweptOccluder::new(random_field(&mut rng, 6));
        let builder = GraphBuilder::new(&occluder, ObstacleFilter::ALL);
        let (first, first_stats) = builder.build(&waypoints).unwrap();
        let (second, second_stats) = builder.build(&waypoints).unwrap();
        assert_eq!(first_stats, second_stats);
        assert_eq!(
            first.edges().collect::<Vec<_>>(),
            second.edges().collect::<Vec<_>>()
        );
        assert_eq!(first_stats.valid_edges + first_stats.blocked_pairs, 12 * 11);
        assert_eq!(first_stats.valid_edges, first.edge_count());
        for (from, to) in first.edges() {
            assert!(first.neighbours(to).contains(&from));
        }
    }
}

#[test]
fn fuzz_paths_use_clear_segments() {
    let mut rng = StdRng::seed_from_u64(2);
    let solver = WaypointSolver::new();
    for _ in 0..50 {
        let waypoints = random_waypoints(&mut rng, 15);
        let occluder = SweptOccluder::new(random_field(&mut rng, 5));
        let (graph, _) = GraphBuilder::new(&occluder, ObstacleFilter::ALL)
            .build(&waypoints)
            .unwrap();
        for _ in 0..20 {
            let start = WaypointId(rng.gen_range(0..15));
            let goal = WaypointId(rng.gen_range(0..15));
            let path = solver.find_path(&graph, start, goal);
            assert_eq!(!path.is_empty(), graph.reachable(start, goal));
            for pair in path.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                let (Some(pa), Some(pb)) = (graph.position(a), graph.position(b)) else {
                    panic!("path leaves the graph");
                };
                assert!(occluder.is_clear(pa, pb, ObstacleFilter::ALL));
            }
        }
    }
}
