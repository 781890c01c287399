//! Colormaps from control points.
//!
//! A colormap definition is a list of control points
//!
//! ```text
//! (x0, color_0)
//! (x1, color_1, next_color_1)
//! ...
//! (xn, color_n)
//! ```
//!
//! where `color_i` is the color immediately before the data value
//! `xi` and the optional `next_color_i` the color immediately after
//! it (by default `color_i`).  Different colors on both sides of a
//! point produce a sharp transition.  The `after` color of the first
//! point and the `before` color of the last one are the ends of the
//! colormap; the other two are unused.
//!
//! The `xi` can be in any unit (e.g. the one of the data to plot) but
//! must be in non-decreasing order.

use rgb::{RGB, RGBA};
use tracing::debug;

use crate::colormap::{Colormap, Segment, SegmentData};
use crate::colors::{ColorResolver, NamedColors};
use crate::error::{Error, Result};
use crate::norm::{linspace, LinearNorm, Norm, Normalize, PiecewiseNorm};

/// Default number of quantization levels.
pub const DEFAULT_LEVELS: usize = 512;

/// A field of an untyped definition entry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(untagged))]
pub enum Field {
    Value(f64),
    Color(String),
}

impl From<f64> for Field {
    fn from(x: f64) -> Self { Field::Value(x) }
}

impl From<&str> for Field {
    fn from(c: &str) -> Self { Field::Color(c.to_string()) }
}

impl From<String> for Field {
    fn from(c: String) -> Self { Field::Color(c) }
}

/// A data value with the colors on its left and on its right.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize),
           serde(try_from = "Vec<Field>"))]
pub struct ControlPoint {
    pub x: f64,
    pub before: String,
    pub after: String,
}

impl ControlPoint {
    /// Point with the same color on both sides.
    pub fn new(x: f64, color: impl Into<String>) -> Self {
        let color = color.into();
        ControlPoint { x, after: color.clone(), before: color }
    }

    /// Point with a color jump.
    pub fn split(x: f64, before: impl Into<String>, after: impl Into<String>)
                 -> Self {
        ControlPoint { x, before: before.into(), after: after.into() }
    }
}

impl<S: Into<String>> From<(f64, S)> for ControlPoint {
    fn from((x, color): (f64, S)) -> Self { ControlPoint::new(x, color) }
}

impl<S: Into<String>> From<(f64, S, S)> for ControlPoint {
    fn from((x, before, after): (f64, S, S)) -> Self {
        ControlPoint::split(x, before, after)
    }
}

impl TryFrom<Vec<Field>> for ControlPoint {
    type Error = Error;

    /// Accept `[x, color]` and `[x, before, after]`.
    fn try_from(fields: Vec<Field>) -> Result<Self> {
        let n = fields.len();
        let mut it = fields.into_iter();
        match (it.next(), it.next(), it.next(), it.next()) {
            (Some(Field::Value(x)), Some(Field::Color(c)), None, None) =>
                Ok(ControlPoint::new(x, c)),
            (Some(Field::Value(x)), Some(Field::Color(b)),
             Some(Field::Color(a)), None) =>
                Ok(ControlPoint::split(x, b, a)),
            _ if !(2 ..= 3).contains(&n) => Err(Error::MalformedDefinition(
                format!("expected 2 or 3 fields, got {n}"))),
            _ => Err(Error::MalformedDefinition(
                "expected a value followed by one or two colors".to_string())),
        }
    }
}

/// Convert untyped entries into control points.
///
/// # Example
///
/// ```
/// use cmap_builder::{parse_definition, Field, Error};
/// let def = parse_definition(vec![
///     vec![Field::from(0.), "red".into()],
///     vec![Field::from(1.), "red".into(), "blue".into()],
/// ]).unwrap();
/// assert_eq!(def[1].after, "blue");
///
/// let bad = parse_definition(vec![
///     vec![Field::from(0.), "red".into(), "blue".into(), "green".into()],
/// ]);
/// assert!(matches!(bad, Err(Error::MalformedDefinition(_))));
/// ```
pub fn parse_definition<I>(entries: I) -> Result<Vec<ControlPoint>>
where I: IntoIterator<Item = Vec<Field>> {
    entries.into_iter().enumerate().map(|(i, fields)| {
        ControlPoint::try_from(fields).map_err(|e| match e {
            Error::MalformedDefinition(m) =>
                Error::MalformedDefinition(format!("entry {i}: {m}")),
            e => e,
        })
    }).collect()
}

/// Result of a build.
#[derive(Clone, Debug, PartialEq)]
pub struct BuiltColormap {
    /// The colormap, mapping \[0, 1\] to colors.
    pub cmap: Colormap,
    /// The `x` of the definition, in its order.  Handy to place
    /// colorbar ticks at the boundaries of the color segments.
    pub ticks: Vec<f64>,
    /// Normalization of the data values into \[0, 1\] consistent
    /// with `cmap`.
    pub norm: Norm,
}

impl BuiltColormap {
    pub fn into_parts(self) -> (Colormap, Vec<f64>, Norm) {
        (self.cmap, self.ticks, self.norm)
    }

    /// Color of the data value `x`.
    pub fn color_at(&self, x: f64) -> Result<RGBA<f64>> {
        Ok(self.cmap.rgba(self.norm.normalize(x, None)?))
    }
}

/// Builder of colormaps from control points.
///
/// # Example
///
/// ```
/// use cmap_builder::{ColormapBuilder, ControlPoint, Normalize};
/// let def: Vec<ControlPoint> = vec![
///     (0., "white").into(),
///     (1., "yellow", "orange").into(),
///     (10., "red").into(),
/// ];
/// let built = ColormapBuilder::new("heat").uniform(true).build(&def).unwrap();
/// assert_eq!(built.ticks, vec![0., 1., 10.]);
/// assert_eq!(built.norm.normalize(1., None).unwrap(), 0.5);
/// ```
#[derive(Clone, Debug)]
pub struct ColormapBuilder<R = NamedColors> {
    name: String,
    discrete: bool,
    uniform: bool,
    levels: usize,
    resolver: R,
}

impl ColormapBuilder {
    /// Builder of a continuous, non-uniform colormap named `name`
    /// with [`DEFAULT_LEVELS`] levels and the default color table.
    pub fn new(name: impl Into<String>) -> Self {
        ColormapBuilder {
            name: name.into(),
            discrete: false,
            uniform: false,
            levels: DEFAULT_LEVELS,
            resolver: NamedColors::default(),
        }
    }
}

impl<R: ColorResolver> ColormapBuilder<R> {
    /// Hard color steps: each segment takes the `after` color of its
    /// left point instead of blending.
    pub fn discrete(mut self, discrete: bool) -> Self {
        self.discrete = discrete;
        self
    }

    /// Give every segment the same width in \[0, 1\], whatever its
    /// width in data units.  The returned normalization is then a
    /// [`PiecewiseNorm`] over the definition's `x`.
    pub fn uniform(mut self, uniform: bool) -> Self {
        self.uniform = uniform;
        self
    }

    /// Number of quantization levels of the colormap.
    pub fn levels(mut self, levels: usize) -> Self {
        self.levels = levels;
        self
    }

    /// Use `resolver` to turn color tokens into RGB.
    pub fn resolver<S: ColorResolver>(self, resolver: S) -> ColormapBuilder<S> {
        ColormapBuilder {
            name: self.name,
            discrete: self.discrete,
            uniform: self.uniform,
            levels: self.levels,
            resolver,
        }
    }

    /// Build the colormap of `definition`.
    pub fn build(&self, definition: &[ControlPoint]) -> Result<BuiltColormap> {
        let n = definition.len();
        if n == 0 {
            return Err(Error::MalformedDefinition(
                "empty colormap definition".to_string()))
        }
        let ticks: Vec<f64> = definition.iter().map(|p| p.x).collect();
        let (xmin, xmax) = ticks.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), &x| (lo.min(x), hi.max(x)));
        if xmin == xmax { return Err(Error::DegenerateRange(xmin)) }

        let mut before = Vec::with_capacity(n);
        let mut after = Vec::with_capacity(n);
        for p in definition {
            before.push(self.resolver.resolve(&p.before)?);
            after.push(self.resolver.resolve(&p.after)?);
        }
        if self.discrete {
            // Rotate by one: the segment left of point i takes the
            // color right of point i-1.
            before = (0 .. n).map(|i| after[(i + n - 1) % n]).collect();
        }

        let (t, norm): (Vec<f64>, Norm) = if self.uniform {
            (linspace(n), PiecewiseNorm::new(&ticks)?.into())
        } else {
            (ticks.iter().map(|x| (x - xmin) / (xmax - xmin)).collect(),
             LinearNorm::new(xmin, xmax).into())
        };

        let channel = |f: fn(&RGB<f64>) -> f64| -> Vec<Segment> {
            (0 .. n).map(|i| Segment::new(t[i], f(&before[i]), f(&after[i])))
                .collect()
        };
        let segments = SegmentData {
            red: channel(|c| c.r),
            green: channel(|c| c.g),
            blue: channel(|c| c.b),
        };
        let cmap = Colormap::new(self.name.clone(), segments, self.levels)?;
        debug!(name = %self.name, points = n, discrete = self.discrete,
               uniform = self.uniform, levels = self.levels, "built colormap");
        Ok(BuiltColormap { cmap, ticks, norm })
    }
}

/// Build a colormap with the default color table.
///
/// See [`ColormapBuilder`] for the meaning of the arguments.
pub fn build_cmap(name: &str, definition: &[ControlPoint], discrete: bool,
                  uniform: bool, levels: usize) -> Result<BuiltColormap> {
    ColormapBuilder::new(name)
        .discrete(discrete)
        .uniform(uniform)
        .levels(levels)
        .build(definition)
}
