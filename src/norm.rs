//! Normalizations: maps from data space to \[0, 1\] and back.
//!
//! - [`LinearNorm`] maps `[vmin, vmax]` linearly onto \[0, 1\].
//! - [`PiecewiseNorm`] maps each interval between consecutive
//!   breakpoints onto an equal-width slice of \[0, 1\], whatever its
//!   width in data units.
//!
//! A normalizer is *scaled* when both bounds are set.  Normalizing or
//! inverting an unscaled normalizer is an error.

use crate::error::{Error, Result};

/// `n` evenly spaced numbers from 0 to 1 (both included).
pub(crate) fn linspace(n: usize) -> Vec<f64> {
    if n == 1 { return vec![0.] }
    let step = 1. / (n - 1) as f64;
    (0 .. n).map(|k| if k == n - 1 { 1. } else { k as f64 * step })
        .collect()
}

/// One-dimensional piecewise-linear interpolation of the points
/// `(xp[i], fp[i])` at `x`.  `xp` must be non-empty and sorted.
/// Outside `[xp[0], xp[n-1]]` the end values are returned; at a
/// repeated abscissa, the value of its last occurrence.
pub(crate) fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let n = xp.len();
    if x.is_nan() { return f64::NAN }
    if x < xp[0] { return fp[0] }
    if x > xp[n - 1] { return fp[n - 1] }
    // xp[j] <= x < xp[j+1]
    let j = xp.partition_point(|&p| p <= x) - 1;
    if j == n - 1 || xp[j] == x { return fp[j] }
    let slope = (fp[j + 1] - fp[j]) / (xp[j + 1] - xp[j]);
    slope * (x - xp[j]) + fp[j]
}

/// Outcome of the bounds check shared by all normalizers.
enum Bounds {
    /// `vmin == vmax`: everything maps to 0.
    Degenerate,
    Range(f64, f64),
}

fn check_bounds(vmin: Option<f64>, vmax: Option<f64>) -> Result<Bounds> {
    let (vmin, vmax) = match (vmin, vmax) {
        (Some(a), Some(b)) => (a, b),
        _ => return Err(Error::Unscaled),
    };
    if vmin == vmax {
        Ok(Bounds::Degenerate)
    } else if vmin < vmax {
        Ok(Bounds::Range(vmin, vmax))
    } else {
        // Also covers NaN bounds.
        Err(Error::InvalidRange { vmin, vmax })
    }
}

/// A map from data values to \[0, 1\] with an (approximate) inverse.
pub trait Normalize {
    /// Lower bound of the data range, if set.
    fn vmin(&self) -> Option<f64>;

    /// Upper bound of the data range, if set.
    fn vmax(&self) -> Option<f64>;

    /// Default clipping behavior.
    fn clip(&self) -> bool;

    /// Whether both bounds are set.
    fn scaled(&self) -> bool { self.vmin().is_some() && self.vmax().is_some() }

    /// Normalize `value`.  If `clip` (or [`Normalize::clip`] when
    /// `clip` is `None`) is true, `value` is first clamped to
    /// `[vmin, vmax]`.
    fn normalize(&self, value: f64, clip: Option<bool>) -> Result<f64>;

    /// Map a value of \[0, 1\] back to data space.
    fn inverse(&self, value: f64) -> Result<f64>;

    /// Normalize every element of `values`.
    fn normalize_all(&self, values: &[f64], clip: Option<bool>)
                     -> Result<Vec<f64>> {
        values.iter().map(|&v| self.normalize(v, clip)).collect()
    }

    /// Invert every element of `values`.
    fn inverse_all(&self, values: &[f64]) -> Result<Vec<f64>> {
        values.iter().map(|&v| self.inverse(v)).collect()
    }
}


/// Linear map of `[vmin, vmax]` onto \[0, 1\].
///
/// Values outside `[vmin, vmax]` are mapped outside \[0, 1\] unless
/// clipping is requested.
///
/// # Example
///
/// ```
/// use cmap_builder::{LinearNorm, Normalize};
/// let norm = LinearNorm::new(0., 10.);
/// assert_eq!(norm.normalize(2.5, None).unwrap(), 0.25);
/// assert_eq!(norm.normalize(20., Some(true)).unwrap(), 1.);
/// assert_eq!(norm.inverse(0.5).unwrap(), 5.);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearNorm {
    vmin: Option<f64>,
    vmax: Option<f64>,
    clip: bool,
}

impl LinearNorm {
    /// Normalization of `[vmin, vmax]`, without clipping.
    pub fn new(vmin: f64, vmax: f64) -> Self {
        Self { vmin: Some(vmin), vmax: Some(vmax), clip: false }
    }

    /// Normalization with no bounds yet.  Use
    /// [`LinearNorm::autoscale`] or the setters before using it.
    pub fn unscaled() -> Self {
        Self { vmin: None, vmax: None, clip: false }
    }

    /// Set the default clipping behavior.
    pub fn with_clip(mut self, clip: bool) -> Self {
        self.clip = clip;
        self
    }

    /// Set (or unset) the lower bound.
    pub fn set_vmin(&mut self, vmin: Option<f64>) { self.vmin = vmin }

    /// Set (or unset) the upper bound.
    pub fn set_vmax(&mut self, vmax: Option<f64>) { self.vmax = vmax }

    /// Set both bounds to the extrema of `data` (NaN are ignored).
    /// Leaves the bounds untouched if `data` has no number.
    pub fn autoscale(&mut self, data: &[f64]) {
        if let Some((lo, hi)) = extrema(data) {
            self.vmin = Some(lo);
            self.vmax = Some(hi);
        }
    }

    /// Set the bounds that are not set yet from the extrema of `data`.
    pub fn autoscale_none(&mut self, data: &[f64]) {
        if let Some((lo, hi)) = extrema(data) {
            self.vmin.get_or_insert(lo);
            self.vmax.get_or_insert(hi);
        }
    }
}

fn extrema(data: &[f64]) -> Option<(f64, f64)> {
    data.iter().filter(|v| !v.is_nan()).fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

impl Normalize for LinearNorm {
    fn vmin(&self) -> Option<f64> { self.vmin }
    fn vmax(&self) -> Option<f64> { self.vmax }
    fn clip(&self) -> bool { self.clip }

    fn normalize(&self, value: f64, clip: Option<bool>) -> Result<f64> {
        match check_bounds(self.vmin, self.vmax)? {
            Bounds::Degenerate => Ok(0.),
            Bounds::Range(vmin, vmax) => {
                let value = if clip.unwrap_or(self.clip) {
                    value.clamp(vmin, vmax)
                } else { value };
                Ok((value - vmin) / (vmax - vmin))
            }
        }
    }

    fn inverse(&self, value: f64) -> Result<f64> {
        match (self.vmin, self.vmax) {
            (Some(vmin), Some(vmax)) => Ok(vmin + value * (vmax - vmin)),
            _ => Err(Error::NotInvertible),
        }
    }
}


/// Piecewise-linear normalization over a sequence of breakpoints.
///
/// The `n` sorted breakpoints are sent to `n` evenly spaced points of
/// \[0, 1\] and values in between are linearly interpolated.  Values
/// outside the breakpoints are sent to 0 or 1.
///
/// # Example
///
/// ```
/// use cmap_builder::{PiecewiseNorm, Normalize};
/// let norm = PiecewiseNorm::new(&[0., 1., 3.]).unwrap();
/// assert_eq!(norm.normalize(1., None).unwrap(), 0.5);
/// assert_eq!(norm.normalize(2., None).unwrap(), 0.75);
/// assert_eq!(norm.inverse(0.25).unwrap(), 0.5);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PiecewiseNorm {
    points: Vec<f64>, // sorted, non-empty
    anchors: Vec<f64>, // linspace(points.len())
    vmin: Option<f64>,
    vmax: Option<f64>,
    clip: bool,
}

impl PiecewiseNorm {
    /// Normalization over the breakpoints `points` (in any order).
    /// Fails if `points` is empty.
    pub fn new(points: &[f64]) -> Result<Self> {
        if points.is_empty() { return Err(Error::NoBreakpoints) }
        let mut points = points.to_vec();
        points.sort_by(|a, b| a.total_cmp(b));
        let anchors = linspace(points.len());
        let vmin = points.first().copied();
        let vmax = points.last().copied();
        Ok(Self { points, anchors, vmin, vmax, clip: false })
    }

    /// Set the default clipping behavior.
    pub fn with_clip(mut self, clip: bool) -> Self {
        self.clip = clip;
        self
    }

    /// The breakpoints, sorted in increasing order.
    pub fn points(&self) -> &[f64] { &self.points }

    /// Set (or unset) the lower bound.
    pub fn set_vmin(&mut self, vmin: Option<f64>) { self.vmin = vmin }

    /// Set (or unset) the upper bound.
    pub fn set_vmax(&mut self, vmax: Option<f64>) { self.vmax = vmax }
}

impl Normalize for PiecewiseNorm {
    fn vmin(&self) -> Option<f64> { self.vmin }
    fn vmax(&self) -> Option<f64> { self.vmax }
    fn clip(&self) -> bool { self.clip }

    fn normalize(&self, value: f64, clip: Option<bool>) -> Result<f64> {
        match check_bounds(self.vmin, self.vmax)? {
            Bounds::Degenerate => Ok(0.),
            Bounds::Range(vmin, vmax) => {
                let value = if clip.unwrap_or(self.clip) {
                    value.clamp(vmin, vmax)
                } else { value };
                Ok(interp(value, &self.points, &self.anchors))
            }
        }
    }

    fn inverse(&self, value: f64) -> Result<f64> {
        if !self.scaled() { return Err(Error::NotInvertible) }
        Ok(interp(value, &self.anchors, &self.points))
    }
}


/// The normalization returned along with a built colormap.
#[derive(Clone, Debug, PartialEq)]
pub enum Norm {
    Linear(LinearNorm),
    Piecewise(PiecewiseNorm),
}

impl Normalize for Norm {
    fn vmin(&self) -> Option<f64> {
        match self { Norm::Linear(n) => n.vmin(), Norm::Piecewise(n) => n.vmin() }
    }

    fn vmax(&self) -> Option<f64> {
        match self { Norm::Linear(n) => n.vmax(), Norm::Piecewise(n) => n.vmax() }
    }

    fn clip(&self) -> bool {
        match self { Norm::Linear(n) => n.clip(), Norm::Piecewise(n) => n.clip() }
    }

    fn normalize(&self, value: f64, clip: Option<bool>) -> Result<f64> {
        match self {
            Norm::Linear(n) => n.normalize(value, clip),
            Norm::Piecewise(n) => n.normalize(value, clip),
        }
    }

    fn inverse(&self, value: f64) -> Result<f64> {
        match self {
            Norm::Linear(n) => n.inverse(value),
            Norm::Piecewise(n) => n.inverse(value),
        }
    }
}

impl From<LinearNorm> for Norm {
    fn from(n: LinearNorm) -> Self { Norm::Linear(n) }
}

impl From<PiecewiseNorm> for Norm {
    fn from(n: PiecewiseNorm) -> Self { Norm::Piecewise(n) }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_ends() {
        assert_eq!(linspace(1), vec![0.]);
        assert_eq!(linspace(2), vec![0., 1.]);
        let l = linspace(6);
        assert_eq!(l[0], 0.);
        assert_eq!(l[1], 0.2);
        assert_eq!(l[5], 1.);
    }

    #[test]
    fn interp_clamps_outside() {
        let xp = [0., 2., 4.];
        let fp = [0., 0.5, 1.];
        assert_eq!(interp(-3., &xp, &fp), 0.);
        assert_eq!(interp(9., &xp, &fp), 1.);
        assert_eq!(interp(1., &xp, &fp), 0.25);
        assert!(interp(f64::NAN, &xp, &fp).is_nan());
    }

    #[test]
    fn interp_repeated_abscissa() {
        let xp = [0., 1., 1., 2.];
        let fp = [0., 1., 2., 3.];
        assert_eq!(interp(1., &xp, &fp), 2.);
        assert_eq!(interp(0.5, &xp, &fp), 0.5);
        assert_eq!(interp(1.5, &xp, &fp), 2.5);
    }

    #[test]
    fn linear_basics() {
        let norm = LinearNorm::new(-2., 2.);
        assert_eq!(norm.normalize(-2., None), Ok(0.));
        assert_eq!(norm.normalize(2., None), Ok(1.));
        assert_eq!(norm.normalize(4., None), Ok(1.5));
        assert_eq!(norm.normalize(4., Some(true)), Ok(1.));
        assert_eq!(norm.with_clip(true).normalize(-9., None), Ok(0.));
        assert_eq!(norm.with_clip(true).normalize(-9., Some(false)), Ok(-1.75));
        assert_eq!(norm.inverse_all(&[0., 0.25, 1.]), Ok(vec![-2., -1., 2.]));
    }

    #[test]
    fn linear_unscaled() {
        let mut norm = LinearNorm::unscaled();
        assert!(!norm.scaled());
        assert_eq!(norm.normalize(1., None), Err(Error::Unscaled));
        assert_eq!(norm.inverse(0.5), Err(Error::NotInvertible));
        norm.set_vmin(Some(1.));
        norm.autoscale_none(&[f64::NAN, 3., 5.]);
        assert_eq!((norm.vmin(), norm.vmax()), (Some(1.), Some(5.)));
        norm.autoscale(&[2., 4.]);
        assert_eq!((norm.vmin(), norm.vmax()), (Some(2.), Some(4.)));
        assert_eq!(norm.normalize(3., None), Ok(0.5));
    }

    #[test]
    fn degenerate_and_invalid_ranges() {
        let norm = LinearNorm::new(3., 3.);
        assert_eq!(norm.normalize_all(&[1., 3., 7.], None), Ok(vec![0.; 3]));
        let norm = LinearNorm::new(3., 1.);
        assert_eq!(norm.normalize(2., None),
                   Err(Error::InvalidRange { vmin: 3., vmax: 1. }));

        let mut norm = PiecewiseNorm::new(&[0., 1., 2.]).unwrap();
        norm.set_vmin(Some(5.));
        assert!(matches!(norm.normalize(1., None),
                         Err(Error::InvalidRange { .. })));
        norm.set_vmin(None);
        assert_eq!(norm.inverse(0.5), Err(Error::NotInvertible));
    }

    #[test]
    fn piecewise_sorts_points() {
        let norm = PiecewiseNorm::new(&[10., 0., 9., 2.]).unwrap();
        assert_eq!(norm.points(), &[0., 2., 9., 10.]);
        assert_eq!(norm.vmin(), Some(0.));
        assert_eq!(norm.vmax(), Some(10.));
    }

    #[test]
    fn piecewise_uniform_slices() {
        let points = [0., 2., 4., 8., 9., 10.];
        let norm = PiecewiseNorm::new(&points).unwrap();
        let t = norm.normalize_all(&points, None).unwrap();
        for (k, t) in t.iter().enumerate() {
            assert!((t - 0.2 * k as f64).abs() < 1e-12, "{t}");
        }
        // Half way in the widest and narrowest intervals.
        assert!((norm.normalize(6., None).unwrap() - 0.5).abs() < 1e-12);
        assert!((norm.normalize(9.5, None).unwrap() - 0.9).abs() < 1e-12);
        // Outside the breakpoints.
        assert_eq!(norm.normalize(-5., None), Ok(0.));
        assert_eq!(norm.normalize(50., Some(true)), Ok(1.));
        let x = norm.inverse_all(&[0., 0.5, 1.]).unwrap();
        assert_eq!(x[0], 0.);
        assert!((x[1] - 6.).abs() < 1e-12);
        assert_eq!(x[2], 10.);
    }

    #[test]
    fn piecewise_single_point() {
        let norm = PiecewiseNorm::new(&[4.]).unwrap();
        assert_eq!(norm.normalize(10., None), Ok(0.));
        assert_eq!(norm.inverse(0.7), Ok(4.));
        assert_eq!(PiecewiseNorm::new(&[]), Err(Error::NoBreakpoints));
    }

    #[test]
    fn norm_dispatch() {
        let norm: Norm = LinearNorm::new(0., 4.).into();
        assert_eq!(norm.normalize(1., None), Ok(0.25));
        let norm: Norm = PiecewiseNorm::new(&[0., 1., 4.]).unwrap().into();
        assert_eq!(norm.normalize(1., None), Ok(0.5));
        assert!(norm.scaled());
        assert!(!norm.clip());
    }
}
