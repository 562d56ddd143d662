#[macro_use]
extern crate criterion;
extern crate mandelbrot;
extern crate num;

use criterion::Criterion;
use mandelbrot::{render, Color, Grid, LinearPalette};
use num::Complex;

/// The classic full-set framing at preview depth, small enough to
/// sample quickly but big enough that the thread fan-out matters.
fn preview_grid() -> Grid {
    Grid::with_limit(Complex::new(-0.5, 0.0), 160, 120, 0.018, 1000).unwrap()
}

fn bench_iterate_all(c: &mut Criterion) {
    c.bench_function("iterate 160x120 at depth 1000", |b| {
        b.iter(|| {
            let mut grid = preview_grid();
            grid.iterate_all();
            grid
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let mut grid = preview_grid();
    grid.iterate_all();
    let palette = LinearPalette::new(
        &grid,
        Color::rgb(0, 0xff, 0),
        Color::rgb(0xff, 0, 0),
        Color::rgb(0, 0, 0),
    );

    c.bench_function("render 160x120", move |b| b.iter(|| render(&grid, &palette)));
}

criterion_group!(benches, bench_iterate_all, bench_render);
criterion_main!(benches);
