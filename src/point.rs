// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A single sample of the complex plane, tracked through the
//! Mandelbrot recurrence.
//!
//! Every point carries its own fixed coordinate C and the running
//! value Z of the map Z ← Z² + C.  A point that leaves the circle of
//! radius two around the origin is provably divergent and therefore
//! not a member of the set; a point that survives the full iteration
//! budget is declared a member.  The number of steps a divergent
//! point survived is what the palettes later turn into color.

use num::Complex;

/// The iteration budget after which a point that has not escaped is
/// declared a member of the set.
pub const MAX_ITERATIONS: u32 = 10_000;

/// Squared modulus beyond which a point is provably divergent.  This
/// is the classic bailout radius of 2.0, squared so the hot loop can
/// compare against `re² + im²` without taking a square root.
pub const BAILOUT_SQUARED: f64 = 4.0;

/// One sample of the complex plane.  The coordinate is fixed at
/// construction; the running value, the step count, and the
/// membership verdict evolve as the point is iterated.
#[derive(Clone, Copy, Debug)]
pub struct Point {
    location: Complex<f64>,
    current: Complex<f64>,
    iterations: u32,
    in_set: bool,
    processed: bool,
}

impl Point {
    /// A fresh, never-iterated point at `location`.  The running
    /// value starts at the origin, so the first iteration lands on
    /// `location` itself.
    pub fn new(location: Complex<f64>) -> Point {
        Point {
            location,
            current: Complex::new(0.0, 0.0),
            iterations: 0,
            in_set: false,
            processed: false,
        }
    }

    /// Takes the point through one step of Z ← Z² + C and counts it.
    pub fn iterate(&mut self) {
        self.current = self.current * self.current + self.location;
        self.iterations += 1;
    }

    /// Decides whether the point belongs to the set, iterating at
    /// most `limit` steps before giving up and declaring membership.
    ///
    /// The decision is cached: once a point has been processed,
    /// calling this again returns the stored verdict without touching
    /// the running value or the step count.
    pub fn determine_membership(&mut self, limit: u32) -> bool {
        if self.processed {
            return self.in_set;
        }

        while self.iterations < limit && self.current.norm_sqr() < BAILOUT_SQUARED {
            self.iterate();
        }

        self.in_set = self.current.norm_sqr() < BAILOUT_SQUARED;
        self.processed = true;
        self.in_set
    }

    /// The fixed coordinate C of this sample.
    pub fn location(&self) -> Complex<f64> {
        self.location
    }

    /// The running value Z after the steps taken so far.
    pub fn current(&self) -> Complex<f64> {
        self.current
    }

    /// Number of recurrence steps taken so far.  For an escaped point
    /// this is the escape-iteration count; for a member it equals the
    /// iteration budget it was decided under.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// True if the point survived its full iteration budget.
    pub fn in_set(&self) -> bool {
        self.in_set
    }

    /// True once membership has been decided.
    pub fn processed(&self) -> bool {
        self.processed
    }
}
