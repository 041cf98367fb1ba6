use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use pitchheat_terminal::density::{DensityGrid, SHADE_LEVELS};
use pitchheat_terminal::events::{expand_events, filter_events};
use pitchheat_terminal::pitch::PitchMask;
use pitchheat_terminal::statsbomb::parse_events_json;

// A typical match has ~3500 events; the render grid below matches a
// full-screen terminal.
const GRID_W: usize = 180;
const GRID_H: usize = 120;

fn synthetic_points(n: usize) -> Vec<(f32, f32)> {
    (0..n)
        .map(|i| {
            let t = i as f32 * 0.37;
            let x = 60.0 + 45.0 * (t.sin() * 0.9);
            let y = 40.0 + 30.0 * ((t * 1.7).cos() * 0.8);
            (x, y)
        })
        .collect()
}

fn bench_events_parse(c: &mut Criterion) {
    c.bench_function("events_parse", |b| {
        b.iter(|| {
            let events = parse_events_json(black_box(EVENTS_JSON)).unwrap();
            black_box(events.len());
        })
    });
}

fn bench_expand_and_filter(c: &mut Criterion) {
    let events = parse_events_json(EVENTS_JSON).unwrap();
    c.bench_function("expand_and_filter", |b| {
        b.iter(|| {
            let records = expand_events(black_box(events.clone()));
            let filtered = filter_events(&records, "Lionel Messi", "Pass");
            black_box(filtered.len());
        })
    });
}

fn bench_density_estimate(c: &mut Criterion) {
    let points = synthetic_points(400);
    c.bench_function("density_estimate", |b| {
        b.iter(|| {
            let grid = DensityGrid::estimate(black_box(&points), GRID_W, GRID_H);
            black_box(grid.shade_band(GRID_W / 2, GRID_H / 2, SHADE_LEVELS));
        })
    });
}

fn bench_density_sparse(c: &mut Criterion) {
    let points = synthetic_points(5);
    c.bench_function("density_sparse", |b| {
        b.iter(|| {
            let grid = DensityGrid::estimate(black_box(&points), GRID_W, GRID_H);
            black_box(grid.normalized(0, 0));
        })
    });
}

fn bench_pitch_rasterize(c: &mut Criterion) {
    c.bench_function("pitch_rasterize", |b| {
        b.iter(|| {
            let mask = PitchMask::rasterize(black_box(GRID_W), black_box(GRID_H));
            black_box(mask.is_line(0, 0));
        })
    });
}

criterion_group!(
    perf,
    bench_events_parse,
    bench_expand_and_filter,
    bench_density_estimate,
    bench_density_sparse,
    bench_pitch_rasterize
);
criterion_main!(perf);

static EVENTS_JSON: &str = include_str!("../tests/fixtures/events.json");
