//! Performance benchmarks for lane-route
//!
//! Run with: cargo bench --package lane-route

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use lane_route::{Point3, Route, Vector3, Waypoint};

/// Generate a gently curving route with a lane change every `lane_run` waypoints.
fn generate_waypoints(num_points: usize, lane_run: usize) -> Vec<Waypoint> {
    (0..num_points)
        .map(|i| {
            let t = i as f64;
            let lane = (i / lane_run) as u32;
            let x = t * 10.0;
            let y = (t * 0.05).sin() * 25.0 + lane as f64 * 3.5;
            Waypoint::new(Point3::new(x, y, 0.0), lane)
        })
        .collect()
}

// ============================================================================
// Core Benchmarks - Key performance indicators
// ============================================================================

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    for num_points in [1_000, 10_000] {
        let waypoints = generate_waypoints(num_points, 50);
        group.throughput(Throughput::Elements(num_points as u64));
        group.bench_with_input(
            BenchmarkId::new("new", num_points),
            &waypoints,
            |b, waypoints| {
                b.iter(|| Route::new(waypoints.clone(), None, "bench").unwrap());
            },
        );
    }

    group.finish();
}

fn bench_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("insertion");
    group.sample_size(20);

    let route = Route::new(generate_waypoints(10_000, 10_000), None, "bench").unwrap();
    group.bench_function("interior_10k", |b| {
        b.iter(|| {
            let mut route = route.clone();
            let waypoint = Waypoint::new(Point3::new(50_005.0, 0.0, 0.0), 0);
            route.insert_waypoint(waypoint, 5_001).unwrap();
        });
    });

    group.finish();
}

fn bench_localization(c: &mut Criterion) {
    let mut group = c.benchmark_group("localization");

    let route = Route::new(generate_waypoints(10_000, 50), None, "bench").unwrap();
    // Slightly off the waypoint, both along and across the route
    let point = route.waypoints()[5_000].location() + Vector3::new(4.0, 0.5, 0.0);

    group.bench_function("subsection_around_5k", |b| {
        b.iter(|| route.find_route_subsection(4_990, 2.0, 50.0, 100.0));
    });

    group.bench_function("locate_5k", |b| {
        b.iter(|| route.locate(&point, 4_990, 2.0));
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(benches, bench_construction, bench_insertion, bench_localization);

criterion_main!(benches);
