//! Palettes that turn iterated points into display colors.
//!
//! A palette is calibrated against a grid that has already been
//! iterated: it scans the grid once for the largest escape-iteration
//! count among points that left the set, and later normalizes every
//! escaped point's count against that ceiling to a ratio in [0, 1].
//! Members of the set always get a single dedicated color.
//!
//! Two variants are provided behind the [`ColorPalette`] trait: a
//! two-color linear ramp, and a multi-stop gradient bracketed by
//! sentinel stops just outside the [0, 1] ratio domain.
//!
//! The channel mixer carries a convention inherited from the renderer
//! this one is matched against: the blend parameter is square-root
//! eased, and a parameter of 0 yields the second color while 1 yields
//! the first.  See DESIGN.md in the repository root before "fixing"
//! either property; images are only comparable if both are kept.

use std::cmp::Ordering;

use num::clamp;

use grid::Grid;
use point::Point;

/// Sentinel stop position just below the ratio domain.
const MIN_STOP_PERCENT: f64 = -0.01;

/// Sentinel stop position just above the ratio domain.
const MAX_STOP_PERCENT: f64 = 1.01;

/// An 8-bit RGBA color, channel order matching what PNG encoders
/// consume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, 0xff being fully opaque.
    pub a: u8,
}

impl Color {
    /// A color from all four channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color { r, g, b, a }
    }

    /// A fully opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 0xff }
    }

    /// The channels in encoder order.
    pub fn channels(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Assigns a display color to an iterated point.
pub trait ColorPalette {
    /// The color this palette gives to `point`.
    fn color(&self, point: &Point) -> Color;
}

/// One calibration point of a multi-color gradient: at `percent` of
/// the normalized escape range, the gradient passes through `color`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position in the normalized escape range, usually in [0, 1].
    pub percent: f64,
    /// The color anchored at that position.
    pub color: Color,
}

impl GradientStop {
    /// A stop anchoring `color` at `percent`.
    pub fn new(percent: f64, color: Color) -> GradientStop {
        GradientStop { percent, color }
    }
}

/// The largest escape-iteration count among points that left the set,
/// or zero when nothing escaped.
fn max_escape_iterations(grid: &Grid) -> u32 {
    grid.points()
        .iter()
        .filter(|point| !point.in_set())
        .map(Point::iterations)
        .max()
        .unwrap_or(0)
}

/// Escape count normalized against the calibrated ceiling.  A ceiling
/// of zero means nothing in the grid escaped; every ratio is then 0
/// rather than a division by zero.
fn escape_ratio(iterations: u32, max_iterations: u32) -> f64 {
    if max_iterations == 0 {
        return 0.0;
    }
    clamp(f64::from(iterations) / f64::from(max_iterations), 0.0, 1.0)
}

/// Mixes one channel of two colors.  The parameter is square-root
/// eased so that the low end of the escape range, where counts bunch
/// together near the set boundary, spreads over more of the ramp.
///
/// The convention is deliberately reversed from the usual lerp: `p =
/// 0` returns exactly `b`, `p = 1` returns exactly `a`.
fn interpolate_channel(a: u8, b: u8, p: f64) -> u8 {
    let eased = p.sqrt();
    (eased * f64::from(a) + (1.0 - eased) * f64::from(b)).round() as u8
}

/// Mixes two colors channel-wise with [`interpolate_channel`],
/// keeping its reversed parameter convention.
fn interpolate(a: Color, b: Color, p: f64) -> Color {
    Color::rgba(
        interpolate_channel(a.r, b.r, p),
        interpolate_channel(a.g, b.g, p),
        interpolate_channel(a.b, b.b, p),
        interpolate_channel(a.a, b.a, p),
    )
}

/// A two-color ramp between a low and a high color, with a dedicated
/// color for members of the set.
#[derive(Clone, Debug)]
pub struct LinearPalette {
    low: Color,
    high: Color,
    in_set: Color,
    max_iterations: u32,
}

impl LinearPalette {
    /// Calibrates a linear palette against an iterated grid.  The
    /// grid is scanned once for the largest escape-iteration count;
    /// escaped points are later colored by their count's position
    /// between zero and that ceiling.
    pub fn new(grid: &Grid, low: Color, high: Color, in_set: Color) -> LinearPalette {
        LinearPalette {
            low,
            high,
            in_set,
            max_iterations: max_escape_iterations(grid),
        }
    }

    /// The calibrated escape-iteration ceiling, zero when the grid
    /// had no escaped points.
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }
}

impl ColorPalette for LinearPalette {
    fn color(&self, point: &Point) -> Color {
        if point.in_set() {
            return self.in_set;
        }
        let ratio = escape_ratio(point.iterations(), self.max_iterations);
        interpolate(self.low, self.high, ratio)
    }
}

/// A gradient through an arbitrary sequence of color stops, bracketed
/// by sentinel stops bound to a minimum and maximum color just
/// outside the ratio domain, with a dedicated color for members of
/// the set.
#[derive(Clone, Debug)]
pub struct MultiColorGradient {
    stops: Vec<GradientStop>,
    in_set: Color,
    max_iterations: u32,
}

impl MultiColorGradient {
    /// Calibrates a gradient against an iterated grid.  The sentinel
    /// stops for `min_color` and `max_color` are appended after the
    /// caller's stops and the whole sequence is stably sorted by
    /// position, so stops sharing a position keep their insertion
    /// order.  An empty stop sequence is fine; the sentinels alone
    /// form a two-color gradient.
    pub fn new(
        grid: &Grid,
        mut stops: Vec<GradientStop>,
        min_color: Color,
        max_color: Color,
        in_set: Color,
    ) -> MultiColorGradient {
        stops.push(GradientStop::new(MIN_STOP_PERCENT, min_color));
        stops.push(GradientStop::new(MAX_STOP_PERCENT, max_color));
        stops.sort_by(|a, b| a.percent.partial_cmp(&b.percent).unwrap_or(Ordering::Equal));

        MultiColorGradient {
            stops,
            in_set,
            max_iterations: max_escape_iterations(grid),
        }
    }

    /// The calibrated escape-iteration ceiling, zero when the grid
    /// had no escaped points.
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// The pair of adjacent stops whose positions bracket `ratio`,
    /// taking the last stop at or below it as the low end.  The
    /// sentinels sit outside [0, 1], so a bracket always exists.
    fn bracket(&self, ratio: f64) -> (GradientStop, GradientStop) {
        let low_index = self
            .stops
            .iter()
            .rposition(|stop| stop.percent <= ratio)
            .unwrap_or(0);
        (self.stops[low_index], self.stops[low_index + 1])
    }
}

impl ColorPalette for MultiColorGradient {
    fn color(&self, point: &Point) -> Color {
        if point.in_set() {
            return self.in_set;
        }
        let ratio = escape_ratio(point.iterations(), self.max_iterations);
        let (low, high) = self.bracket(ratio);
        let t = (ratio - low.percent) / (high.percent - low.percent);
        interpolate(low.color, high.color, t)
    }
}
