use RustedSurfaceViz::numerical::contour::{contour_levels, contour_lines};
use RustedSurfaceViz::numerical::grid::Grid;
use RustedSurfaceViz::numerical::statistics::SurfaceStatistics;
use RustedSurfaceViz::numerical::surface_function::evaluate_grid;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_evaluate_grid(c: &mut Criterion) {
    let grid = Grid::new(-2.0, 2.0, 150).unwrap();
    c.bench_function("evaluate 150x150 grid", |b| {
        b.iter(|| evaluate_grid(black_box(&grid)))
    });
}

fn bench_statistics(c: &mut Criterion) {
    let grid = Grid::new(-2.0, 2.0, 150).unwrap();
    let surface = evaluate_grid(&grid);
    c.bench_function("surface statistics", |b| {
        b.iter(|| SurfaceStatistics::from_surface(black_box(&surface)))
    });
}

fn bench_contours(c: &mut Criterion) {
    let grid = Grid::new(-2.0, 2.0, 150).unwrap();
    let surface = evaluate_grid(&grid);
    let stats = SurfaceStatistics::from_surface(&surface).unwrap();
    let levels = contour_levels(stats.min, stats.max, 20);
    c.bench_function("20 iso-lines", |b| {
        b.iter(|| contour_lines(black_box(&grid), black_box(&surface), &levels))
    });
}

criterion_group!(benches, bench_evaluate_grid, bench_statistics, bench_contours);
criterion_main!(benches);
