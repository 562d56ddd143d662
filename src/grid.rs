// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A rectangular lattice of samples over the complex plane.
//!
//! The grid is described by its center coordinate, its pixel
//! dimensions, and a pitch giving the complex-plane distance between
//! neighboring samples.  All samples are materialized up front and
//! stored in a flat, column-major arena: the point at `(col, row)`
//! lives at index `col * height + row`, index 0 is the bottom-left
//! sample, increasing column moves right and increasing row moves up.
//!
//! Iteration is the only concurrent operation.  Points have no
//! cross-dependencies, so the arena is split into disjoint mutable
//! chunks and handed to a pool of scoped worker threads; the call
//! joins them all before returning.  The final state is the same no
//! matter how many workers ran or in what order they finished.

extern crate crossbeam;
extern crate num_cpus;

use itertools::iproduct;
use num::Complex;

use point::{Point, MAX_ITERATIONS};

/// The ways grid construction and point access can fail.  These are
/// caller errors; nothing in the grid retries or masks them.
#[derive(Debug, Fail, PartialEq)]
pub enum GridError {
    /// Construction was asked for an empty or inverted region.
    #[fail(
        display = "invalid grid dimension: {}x{} with pixel pitch {}",
        width, height, pixel_pitch
    )]
    InvalidDimension {
        /// Requested width in samples.
        width: usize,
        /// Requested height in samples.
        height: usize,
        /// Requested complex-plane distance between samples.
        pixel_pitch: f64,
    },

    /// A point was requested outside the grid.
    #[fail(
        display = "point ({}, {}) is outside the {}x{} grid",
        col, row, width, height
    )]
    IndexOutOfRange {
        /// Requested column.
        col: usize,
        /// Requested row.
        row: usize,
        /// Grid width in samples.
        width: usize,
        /// Grid height in samples.
        height: usize,
    },
}

/// A width×height lattice of [`Point`]s centered on a complex
/// coordinate, with one sample every `pixel_pitch` units of the
/// plane.
#[derive(Debug)]
pub struct Grid {
    center: Complex<f64>,
    width: usize,
    height: usize,
    pixel_pitch: f64,
    limit: u32,
    points: Vec<Point>,
}

impl Grid {
    /// A grid using the default iteration budget of
    /// [`MAX_ITERATIONS`](../point/constant.MAX_ITERATIONS.html).
    ///
    /// The sample at `(col, row)` is placed at `bottom_left +
    /// (col·pitch, row·pitch)`, where `bottom_left` is the center
    /// minus half the region extent in each direction.  Fails with
    /// [`GridError::InvalidDimension`](enum.GridError.html) when
    /// either dimension is zero or the pitch is not a positive,
    /// finite number.
    pub fn new(
        center: Complex<f64>,
        width: usize,
        height: usize,
        pixel_pitch: f64,
    ) -> Result<Grid, GridError> {
        Grid::with_limit(center, width, height, pixel_pitch, MAX_ITERATIONS)
    }

    /// Same as [`new`](#method.new) but with an explicit per-point
    /// iteration budget, for callers that want faster previews or
    /// deeper boundaries than the default.
    pub fn with_limit(
        center: Complex<f64>,
        width: usize,
        height: usize,
        pixel_pitch: f64,
        limit: u32,
    ) -> Result<Grid, GridError> {
        if width == 0 || height == 0 || pixel_pitch <= 0.0 || pixel_pitch.is_nan() {
            return Err(GridError::InvalidDimension {
                width,
                height,
                pixel_pitch,
            });
        }

        let half_width = 0.5 * pixel_pitch * (width as f64);
        let half_height = 0.5 * pixel_pitch * (height as f64);
        let bottom_left = center - Complex::new(half_width, half_height);

        let points = iproduct!(0..width, 0..height)
            .map(|(col, row)| {
                Point::new(
                    bottom_left
                        + Complex::new((col as f64) * pixel_pitch, (row as f64) * pixel_pitch),
                )
            })
            .collect();

        Ok(Grid {
            center,
            width,
            height,
            pixel_pitch,
            limit,
            points,
        })
    }

    /// Decides membership for every point in the grid, spreading the
    /// work over one worker per available CPU.  Returns once every
    /// point has been processed.
    pub fn iterate_all(&mut self) {
        self.iterate_all_with_threads(num_cpus::get());
    }

    /// Decides membership for every point using a fixed-size pool of
    /// `threads` workers.  The arena is split into disjoint chunks,
    /// one per worker, so no locking is needed: each worker only ever
    /// touches points it owns.  A worker count of zero is treated as
    /// one.
    pub fn iterate_all_with_threads(&mut self, threads: usize) {
        let threads = threads.max(1);
        let limit = self.limit;
        let chunk_size = (self.points.len() + threads - 1) / threads;
        debug!(
            "iterating {} points across {} workers",
            self.points.len(),
            threads
        );

        crossbeam::scope(|spawner| {
            for chunk in self.points.chunks_mut(chunk_size) {
                spawner.spawn(move |_| {
                    for point in chunk {
                        point.determine_membership(limit);
                    }
                });
            }
        })
        .unwrap();
    }

    /// Bounds-checked access to the point at `(col, row)`.  Column 0
    /// is the left edge and row 0 the bottom edge.
    pub fn point_at(&self, col: usize, row: usize) -> Result<&Point, GridError> {
        if col >= self.width || row >= self.height {
            return Err(GridError::IndexOutOfRange {
                col,
                row,
                width: self.width,
                height: self.height,
            });
        }
        Ok(&self.points[col * self.height + row])
    }

    /// The backing arena in column-major order: the point at `(col,
    /// row)` lives at index `col * height + row`, and index 0 is the
    /// bottom-left sample.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The geometric center of the sampled region.
    pub fn center(&self) -> Complex<f64> {
        self.center
    }

    /// Width of the grid in samples.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the grid in samples.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Complex-plane distance between neighboring samples.
    pub fn pixel_pitch(&self) -> f64 {
        self.pixel_pitch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_by_two_grid_materializes_four_points() {
        let grid = Grid::new(Complex::new(0.0, 0.0), 2, 2, 1.0).unwrap();
        assert_eq!(grid.points().len(), 4);
        assert!(grid.points().iter().all(|p| !p.processed()));
    }

    #[test]
    fn locations_step_up_and_right_from_the_bottom_left() {
        let grid = Grid::new(Complex::new(0.0, 0.0), 2, 2, 1.0).unwrap();

        assert_eq!(
            grid.point_at(0, 0).unwrap().location(),
            Complex::new(-1.0, -1.0)
        );
        assert_eq!(
            grid.point_at(1, 0).unwrap().location(),
            Complex::new(0.0, -1.0)
        );
        assert_eq!(
            grid.point_at(0, 1).unwrap().location(),
            Complex::new(-1.0, 0.0)
        );
        assert_eq!(
            grid.point_at(1, 1).unwrap().location(),
            Complex::new(0.0, 0.0)
        );
    }

    #[test]
    fn rejects_empty_dimensions() {
        assert_eq!(
            Grid::new(Complex::new(0.0, 0.0), 0, 2, 1.0).unwrap_err(),
            GridError::InvalidDimension {
                width: 0,
                height: 2,
                pixel_pitch: 1.0
            }
        );
        assert_eq!(
            Grid::new(Complex::new(0.0, 0.0), 2, 0, 1.0).unwrap_err(),
            GridError::InvalidDimension {
                width: 2,
                height: 0,
                pixel_pitch: 1.0
            }
        );
    }

    #[test]
    fn rejects_nonpositive_pitch() {
        assert!(Grid::new(Complex::new(0.0, 0.0), 2, 2, 0.0).is_err());
        assert!(Grid::new(Complex::new(0.0, 0.0), 2, 2, -0.5).is_err());
        assert!(Grid::new(Complex::new(0.0, 0.0), 2, 2, ::std::f64::NAN).is_err());
    }

    #[test]
    fn point_access_is_bounds_checked() {
        let grid = Grid::new(Complex::new(0.0, 0.0), 2, 3, 1.0).unwrap();
        assert!(grid.point_at(1, 2).is_ok());
        assert_eq!(
            grid.point_at(2, 0).unwrap_err(),
            GridError::IndexOutOfRange {
                col: 2,
                row: 0,
                width: 2,
                height: 3
            }
        );
        assert!(grid.point_at(0, 3).is_err());
    }

    #[test]
    fn iterate_all_processes_every_point() {
        let mut grid = Grid::new(Complex::new(0.0, 0.0), 4, 3, 0.5).unwrap();
        grid.iterate_all();
        assert!(grid.points().iter().all(|p| p.processed()));
    }

    #[test]
    fn iterate_all_finds_the_cardioid() {
        // A 3x3 grid around the origin puts the (1, 1) sample at
        // (-0.25, -0.25), well inside the main cardioid.
        let mut grid = Grid::new(Complex::new(0.0, 0.0), 3, 3, 0.5).unwrap();
        grid.iterate_all();
        assert!(grid.point_at(1, 1).unwrap().in_set());
    }

    #[test]
    fn worker_count_does_not_change_the_verdict() {
        let mut serial = Grid::with_limit(Complex::new(-0.5, 0.0), 8, 6, 0.4, 300).unwrap();
        let mut pooled = Grid::with_limit(Complex::new(-0.5, 0.0), 8, 6, 0.4, 300).unwrap();

        serial.iterate_all_with_threads(1);
        pooled.iterate_all_with_threads(4);

        for (a, b) in serial.points().iter().zip(pooled.points().iter()) {
            assert_eq!(a.in_set(), b.in_set());
            assert_eq!(a.iterations(), b.iterations());
        }
    }

    #[test]
    fn iteration_budget_is_applied_per_point() {
        // A 1x1 grid centered at (0.5, 0.5) samples exactly the
        // origin, which never escapes.
        let mut grid = Grid::with_limit(Complex::new(0.5, 0.5), 1, 1, 1.0, 5).unwrap();
        grid.iterate_all();

        let point = grid.point_at(0, 0).unwrap();
        assert_eq!(point.location(), Complex::new(0.0, 0.0));
        assert!(point.in_set());
        assert_eq!(point.iterations(), 5);
    }

    #[test]
    fn zero_workers_are_rounded_up_to_one() {
        let mut grid = Grid::with_limit(Complex::new(0.0, 0.0), 2, 2, 1.0, 50).unwrap();
        grid.iterate_all_with_threads(0);
        assert!(grid.points().iter().all(|p| p.processed()));
    }
}
