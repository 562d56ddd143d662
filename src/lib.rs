#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot set renderer
//!
//! The Mandelbrot set lives on the complex plane: a point C belongs
//! to it when the sequence Z = Z² + C, started from zero, stays
//! bounded forever.  Points outside the set blow past a known escape
//! radius after a measurable number of steps, and that count is the
//! raw material for an image.  Paint every sample by how long it took
//! to escape and the familiar glowing boundary appears around the
//! black interior.
//!
//! The work is split across three modules.  A `Grid` materializes a
//! rectangle of sample `Point`s and iterates the recurrence across
//! worker threads.  The palettes normalize each escape count against
//! the deepest escape the grid actually produced and map it to a
//! color.  The renderer lays the colored samples out as an RGBA
//! buffer ready for a PNG encoder.

extern crate crossbeam;
extern crate itertools;
extern crate num;
extern crate num_cpus;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

pub mod grid;
pub mod palette;
pub mod point;
pub mod render;

pub use grid::{Grid, GridError};
pub use palette::{Color, ColorPalette, GradientStop, LinearPalette, MultiColorGradient};
pub use point::{Point, BAILOUT_SQUARED, MAX_ITERATIONS};
pub use render::{render, PixelBuffer};
