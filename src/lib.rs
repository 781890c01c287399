//! Colormaps from sparse control points.
//!
//! - [`ColormapBuilder`] (or [`build_cmap`]) turns a list of
//!   [`ControlPoint`]s into a [`Colormap`], the list of breakpoints
//!   and a matching normalization ([`Norm`]).
//! - [`PiecewiseNorm`] maps data values to \[0, 1\] so that every
//!   interval between breakpoints gets the same share of \[0, 1\].
//! - [`NamedColors`] resolves color names with optional lightness,
//!   saturation or value modifiers such as `"orange_l40"`.
//!
//! ```
//! use cmap_builder::{ColormapBuilder, ControlPoint, ColorRange, Normalize};
//! use rgb::RGB8;
//!
//! let def: Vec<ControlPoint> = vec![
//!     (0., "blue_dark").into(),
//!     (5., "blue_light", "orange_light").into(),
//!     (6., "orange_dark").into(),
//! ];
//! let built = ColormapBuilder::new("sea-land").uniform(true).build(&def)?;
//! let t = built.norm.normalize(5.5, None)?;
//! let color: RGB8 = built.cmap.rgb(t);
//! # Ok::<(), cmap_builder::Error>(())
//! ```

use std::marker::PhantomData;
use rgb::{RGB, RGBA, RGB8, RGB16, RGBA8, RGBA16};

mod builder;
mod colormap;
mod colors;
mod error;
mod norm;

pub use builder::{build_cmap, parse_definition, BuiltColormap, ColormapBuilder,
                  ControlPoint, Field, DEFAULT_LEVELS};
pub use colormap::{Colormap, Segment, SegmentData};
pub use colors::{resolve, ColorResolver, Modifier, NamedColors};
pub use error::{ColorError, Error, Result};
pub use norm::{LinearNorm, Norm, Normalize, PiecewiseNorm};

/// A “continuous” range of colors parametrized by reals in \[0, 1\].
pub trait ColorRange<Color> {
    /// Returns the color corresponding to `t` ∈ \[0., 1.\].
    fn rgb(&self, t: f64) -> Color;

    /// Return an iterator yielding `n` evenly spaced positions of
    /// \[0, 1\] (0 and 1 included) together with their colors.
    fn samples(&self, n: usize) -> Samples<'_, Self, Color>
    where Self: Sized {
        Samples { range: self, color: PhantomData,
                  last: n.saturating_sub(1), i: 0, j: n }
    }
}

/// An iterator yielding positions of \[0, 1\] together with colors.
///
/// Created by [`ColorRange::samples`].
pub struct Samples<'a, R, Color> {
    range: &'a R,
    color: PhantomData<Color>,
    last: usize,
    i: usize, // first position to be consumed (i ≤ j)
    j: usize, // position after the last one to be consumed
}

impl<R, Color> Samples<'_, R, Color> where R: ColorRange<Color> {
    fn sample(&self, k: usize) -> (f64, Color) {
        let t = if k == self.last { if k == 0 { 0. } else { 1. } }
                else { k as f64 / self.last as f64 };
        (t, self.range.rgb(t))
    }
}

impl<R, Color> Iterator for Samples<'_, R, Color>
where R: ColorRange<Color> {
    type Item = (f64, Color);

    fn next(&mut self) -> Option<Self::Item> {
        if self.i >= self.j { return None }
        let item = self.sample(self.i);
        self.i += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.j - self.i;
        (len, Some(len))
    }
}

impl<R, Color> ExactSizeIterator for Samples<'_, R, Color>
where R: ColorRange<Color> {}

impl<R, Color> DoubleEndedIterator for Samples<'_, R, Color>
where R: ColorRange<Color> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.i >= self.j { return None }
        self.j -= 1;
        Some(self.sample(self.j))
    }
}

/// Conversion between a color encoding and RGBA components in \[0, 1\].
///
/// Integer encodings truncate, after clamping to \[0, 1\].
pub trait RGBColor: Sized {
    /// Return the red, green, blue and alpha components of the color.
    fn to_rgba(&self) -> RGBA<f64>;

    /// Create a color from its RGBA components.
    fn from_rgba(rgba: RGBA<f64>) -> Self;
}

impl RGBColor for RGBA<f64> {
    #[inline]
    fn to_rgba(&self) -> RGBA<f64> { *self }

    #[inline]
    fn from_rgba(c: RGBA<f64>) -> Self { c }
}

impl RGBColor for RGB<f64> {
    #[inline]
    fn to_rgba(&self) -> RGBA<f64> {
        RGBA { r: self.r, g: self.g, b: self.b, a: 1. }
    }

    #[inline]
    fn from_rgba(c: RGBA<f64>) -> Self { RGB { r: c.r, g: c.g, b: c.b } }
}

const MAX8: f64 = u8::MAX as f64;
const MAX16: f64 = u16::MAX as f64;

#[inline]
fn to8(x: f64) -> u8 { (x.clamp(0., 1.) * MAX8) as u8 }

#[inline]
fn to16(x: f64) -> u16 { (x.clamp(0., 1.) * MAX16) as u16 }

impl RGBColor for RGB8 {
    #[inline]
    fn to_rgba(&self) -> RGBA<f64> {
        RGBA { r: self.r as f64 / MAX8, g: self.g as f64 / MAX8,
               b: self.b as f64 / MAX8, a: 1. }
    }

    #[inline]
    fn from_rgba(c: RGBA<f64>) -> Self {
        RGB8 { r: to8(c.r), g: to8(c.g), b: to8(c.b) }
    }
}

impl RGBColor for RGB16 {
    #[inline]
    fn to_rgba(&self) -> RGBA<f64> {
        RGBA { r: self.r as f64 / MAX16, g: self.g as f64 / MAX16,
               b: self.b as f64 / MAX16, a: 1. }
    }

    #[inline]
    fn from_rgba(c: RGBA<f64>) -> Self {
        RGB16 { r: to16(c.r), g: to16(c.g), b: to16(c.b) }
    }
}

impl RGBColor for RGBA8 {
    #[inline]
    fn to_rgba(&self) -> RGBA<f64> {
        RGBA { r: self.r as f64 / MAX8, g: self.g as f64 / MAX8,
               b: self.b as f64 / MAX8, a: self.a as f64 / MAX8 }
    }

    #[inline]
    fn from_rgba(c: RGBA<f64>) -> Self {
        RGBA8 { r: to8(c.r), g: to8(c.g), b: to8(c.b), a: to8(c.a) }
    }
}

impl RGBColor for RGBA16 {
    #[inline]
    fn to_rgba(&self) -> RGBA<f64> {
        RGBA { r: self.r as f64 / MAX16, g: self.g as f64 / MAX16,
               b: self.b as f64 / MAX16, a: self.a as f64 / MAX16 }
    }

    #[inline]
    fn from_rgba(c: RGBA<f64>) -> Self {
        RGBA16 { r: to16(c.r), g: to16(c.g), b: to16(c.b), a: to16(c.a) }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    /// Gray ramp.
    struct Gray;

    impl ColorRange<RGB<f64>> for Gray {
        fn rgb(&self, t: f64) -> RGB<f64> { RGB { r: t, g: t, b: t } }
    }

    #[test]
    fn samples_cover_unit_interval() {
        for (i, (t, c)) in Gray.samples(11).enumerate() {
            assert!((t - 0.1 * i as f64).abs() <= 1e-15,
                    "{} ≉ {}", t, 0.1 * i as f64);
            assert_eq!(c.r, t);
        }
        assert_eq!(Gray.samples(11).len(), 11);
        assert_eq!(Gray.samples(4).last().map(|s| s.0), Some(1.));
    }

    #[test]
    fn samples_edge_cases() {
        assert_eq!(Gray.samples(0).count(), 0);
        let one: Vec<f64> = Gray.samples(1).map(|s| s.0).collect();
        assert_eq!(one, vec![0.]);
        let back: Vec<f64> = Gray.samples(3).rev().map(|s| s.0).collect();
        assert_eq!(back, vec![1., 0.5, 0.]);
    }

    #[test]
    fn integer_encodings() {
        let c = RGBA { r: 1., g: 0.502, b: -0.1, a: 1.2 };
        assert_eq!(RGB8::from_rgba(c), RGB8 { r: 255, g: 128, b: 0 });
        assert_eq!(RGBA8::from_rgba(c).a, 255);
        assert_eq!(RGB16::from_rgba(c).r, u16::MAX);
        let white = RGBA16 { r: u16::MAX, g: u16::MAX, b: u16::MAX, a: 0 };
        assert_eq!(white.to_rgba(), RGBA { r: 1., g: 1., b: 1., a: 0. });
        assert_eq!(RGB8 { r: 255, g: 0, b: 0 }.to_rgba().r, 1.);
    }
}
