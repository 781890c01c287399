//! Colormaps defined by per-channel piecewise-linear segments.

use rgb::RGBA;

use crate::error::{Error, Result};
use crate::norm::linspace;
use crate::{ColorRange, RGBColor};

/// One node of a channel: the channel value just before and just
/// after position `t`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub t: f64,
    pub before: f64,
    pub after: f64,
}

impl Segment {
    pub fn new(t: f64, before: f64, after: f64) -> Self {
        Segment { t, before, after }
    }
}

impl From<(f64, f64, f64)> for Segment {
    fn from((t, before, after): (f64, f64, f64)) -> Self {
        Segment { t, before, after }
    }
}

/// Nodes of the red, green and blue channels.
///
/// Between nodes `k-1` and `k` a channel goes linearly from
/// `after` of node `k-1` to `before` of node `k`, so that
/// `before != after` produces a discontinuity at `t`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SegmentData {
    pub red: Vec<Segment>,
    pub green: Vec<Segment>,
    pub blue: Vec<Segment>,
}

impl SegmentData {
    fn channels(&self) -> [(&'static str, &[Segment]); 3] {
        [("red", self.red.as_slice()), ("green", self.green.as_slice()),
         ("blue", self.blue.as_slice())]
    }

    /// Mirror the data: `t` becomes `1 - t` and the sides swap.
    fn reversed(&self) -> SegmentData {
        let rev = |c: &[Segment]| -> Vec<Segment> {
            c.iter().rev()
                .map(|s| Segment { t: 1. - s.t, before: s.after, after: s.before })
                .collect()
        };
        SegmentData { red: rev(&self.red), green: rev(&self.green),
                      blue: rev(&self.blue) }
    }
}

fn validate(channel: &'static str, nodes: &[Segment]) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidSegments {
        channel, reason: reason.to_string() };
    match (nodes.first(), nodes.last()) {
        (Some(first), Some(last)) => {
            if first.t != 0. || last.t != 1. {
                return Err(invalid("nodes must start at t = 0 and end at t = 1"))
            }
        }
        _ => return Err(invalid("no node")),
    }
    if nodes.iter().any(|s| s.t.is_nan())
        || nodes.windows(2).any(|w| w[1].t < w[0].t) {
        return Err(invalid("nodes must have t in increasing order"))
    }
    Ok(())
}

/// Sample a (valid) channel at `n` evenly spaced positions.
fn lookup_table(nodes: &[Segment], n: usize) -> Vec<f64> {
    let last = nodes.len() - 1;
    if n == 1 { return vec![nodes[last].before.clamp(0., 1.)] }
    let scale = (n - 1) as f64;
    let x: Vec<f64> = nodes.iter().map(|s| s.t * scale).collect();
    let mut lut = Vec::with_capacity(n);
    lut.push(nodes[0].after);
    for t in &linspace(n)[1 .. n - 1] {
        let xi = scale * t;
        // First node with x >= xi; interior positions have 0 < k <= last.
        let k = x.partition_point(|&p| p < xi);
        let distance = (xi - x[k - 1]) / (x[k] - x[k - 1]);
        let (a, b) = (nodes[k - 1].after, nodes[k].before);
        lut.push(distance * (b - a) + a);
    }
    lut.push(nodes[last].before);
    for v in &mut lut { *v = v.clamp(0., 1.) }
    lut
}

/// A colormap: a map from \[0, 1\] to colors, tabulated at a fixed
/// number of quantization levels.
///
/// Positions below 0 give the *under* color, above 1 the *over* color
/// (by default the first and last colors of the table) and NaN the
/// *bad* color (by default transparent black).
#[derive(Clone, Debug, PartialEq)]
pub struct Colormap {
    name: String,
    segments: SegmentData,
    lut: Vec<RGBA<f64>>,
    under: Option<RGBA<f64>>,
    over: Option<RGBA<f64>>,
    bad: RGBA<f64>,
}

impl Colormap {
    /// Create a colormap from its channel segments, sampled at
    /// `levels` positions.
    ///
    /// # Example
    ///
    /// ```
    /// use cmap_builder::{Colormap, Segment, SegmentData};
    /// let ramp = vec![Segment::new(0., 0., 0.), Segment::new(1., 1., 1.)];
    /// let flat = vec![Segment::new(0., 0., 0.), Segment::new(1., 0., 0.)];
    /// let data = SegmentData { red: ramp, green: flat.clone(), blue: flat };
    /// let cmap = Colormap::new("reds", data, 3).unwrap();
    /// assert_eq!(cmap.rgba(0.5).r, 0.5);
    /// ```
    pub fn new(name: impl Into<String>, segments: SegmentData, levels: usize)
               -> Result<Self> {
        if levels == 0 { return Err(Error::InvalidLevels(levels)) }
        for (channel, nodes) in segments.channels() {
            validate(channel, nodes)?;
        }
        Ok(Self::tabulate(name.into(), segments, levels))
    }

    /// Build the table of already validated segments.
    fn tabulate(name: String, segments: SegmentData, levels: usize) -> Self {
        let r = lookup_table(&segments.red, levels);
        let g = lookup_table(&segments.green, levels);
        let b = lookup_table(&segments.blue, levels);
        let lut = r.into_iter().zip(g).zip(b)
            .map(|((r, g), b)| RGBA { r, g, b, a: 1. })
            .collect();
        Colormap { name, segments, lut,
                   under: None, over: None,
                   bad: RGBA { r: 0., g: 0., b: 0., a: 0. } }
    }

    pub fn name(&self) -> &str { &self.name }

    /// Number of quantization levels.
    pub fn levels(&self) -> usize { self.lut.len() }

    /// The segments the colormap was built from.
    pub fn segments(&self) -> &SegmentData { &self.segments }

    /// The tabulated colors.
    pub fn lut(&self) -> &[RGBA<f64>] { &self.lut }

    /// Color for positions below 0.
    pub fn under(&self) -> RGBA<f64> {
        self.under.unwrap_or(self.lut[0])
    }

    /// Color for positions above 1.
    pub fn over(&self) -> RGBA<f64> {
        self.over.unwrap_or(self.lut[self.lut.len() - 1])
    }

    /// Color for NaN.
    pub fn bad(&self) -> RGBA<f64> { self.bad }

    pub fn with_under(mut self, c: impl RGBColor) -> Self {
        self.under = Some(c.to_rgba());
        self
    }

    pub fn with_over(mut self, c: impl RGBColor) -> Self {
        self.over = Some(c.to_rgba());
        self
    }

    pub fn with_bad(mut self, c: impl RGBColor) -> Self {
        self.bad = c.to_rgba();
        self
    }

    /// Color of position `t`.
    pub fn rgba(&self, t: f64) -> RGBA<f64> {
        if t.is_nan() { return self.bad }
        let n = self.lut.len() as f64;
        let x = t * n;
        if x < 0. { return self.under() }
        // t == 1 belongs to the last level.
        let x = if x == n { n - 1. } else { x };
        if x >= n { return self.over() }
        self.lut[x as usize]
    }

    /// Colors of all the positions `ts`.
    pub fn map<Color: RGBColor>(&self, ts: &[f64]) -> Vec<Color> {
        ts.iter().map(|&t| Color::from_rgba(self.rgba(t))).collect()
    }

    /// The colormap with \[0, 1\] traversed backwards, named after
    /// this one with a `_r` suffix.  Under and over colors are swapped.
    pub fn reversed(&self) -> Colormap {
        let mut cmap = Self::tabulate(format!("{}_r", self.name),
                                      self.segments.reversed(), self.levels());
        cmap.under = self.over;
        cmap.over = self.under;
        cmap.bad = self.bad;
        cmap
    }

    /// The same colormap with `levels` quantization levels.
    pub fn resampled(&self, levels: usize) -> Result<Colormap> {
        if levels == 0 { return Err(Error::InvalidLevels(levels)) }
        let mut cmap = Self::tabulate(self.name.clone(), self.segments.clone(),
                                      levels);
        cmap.under = self.under;
        cmap.over = self.over;
        cmap.bad = self.bad;
        Ok(cmap)
    }
}

impl<Color: RGBColor> ColorRange<Color> for Colormap {
    fn rgb(&self, t: f64) -> Color { Color::from_rgba(self.rgba(t)) }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rgb::{RGB, RGB8};

    fn channel(nodes: &[(f64, f64, f64)]) -> Vec<Segment> {
        nodes.iter().map(|&n| n.into()).collect()
    }

    /// Red ramps up to 0.5, jumps to 1 and stays there.
    fn step() -> SegmentData {
        SegmentData {
            red: channel(&[(0., 0., 0.), (0.5, 0.5, 1.), (1., 1., 1.)]),
            green: channel(&[(0., 0., 0.), (1., 0., 0.)]),
            blue: channel(&[(0., 1., 1.), (1., 1., 1.)]),
        }
    }

    #[test]
    fn table_values() {
        let cmap = Colormap::new("step", step(), 5).unwrap();
        let reds: Vec<f64> = cmap.lut().iter().map(|c| c.r).collect();
        assert_eq!(reds, vec![0., 0.25, 0.5, 1., 1.]);
        assert!(cmap.lut().iter().all(|c| c.b == 1. && c.a == 1.));
        assert_eq!(cmap.levels(), 5);
        assert_eq!(cmap.name(), "step");
    }

    #[test]
    fn single_level() {
        let cmap = Colormap::new("step", step(), 1).unwrap();
        assert_eq!(cmap.lut().len(), 1);
        assert_eq!(cmap.rgba(0.3).r, 1.);
        assert_eq!(Colormap::new("step", step(), 0), Err(Error::InvalidLevels(0)));
    }

    #[test]
    fn lookup() {
        let cmap = Colormap::new("step", step(), 5).unwrap();
        assert_eq!(cmap.rgba(0.).r, 0.);
        assert_eq!(cmap.rgba(0.39).r, 0.25);
        assert_eq!(cmap.rgba(1.).r, 1.);
        assert_eq!(cmap.rgba(-0.01), cmap.lut()[0]);
        assert_eq!(cmap.rgba(1.5), cmap.lut()[4]);
        assert_eq!(cmap.rgba(f64::NAN).a, 0.);
    }

    #[test]
    fn extremes() {
        let red = RGB { r: 1., g: 0., b: 0. };
        let cmap = Colormap::new("step", step(), 5).unwrap()
            .with_under(red)
            .with_over(RGB8 { r: 0, g: 255, b: 0 })
            .with_bad(RGBA { r: 0.5, g: 0.5, b: 0.5, a: 1. });
        assert_eq!(cmap.rgba(-1.), red.to_rgba());
        assert_eq!(cmap.rgba(2.).g, 1.);
        assert_eq!(cmap.rgba(f64::NAN).r, 0.5);
        let rev = cmap.reversed();
        assert_eq!(rev.rgba(-1.).g, 1.);
        assert_eq!(rev.rgba(2.), red.to_rgba());
    }

    #[test]
    fn reversed_mirrors() {
        let cmap = Colormap::new("step", step(), 64).unwrap();
        let rev = cmap.reversed();
        assert_eq!(rev.name(), "step_r");
        assert_eq!(rev.segments().red[0], Segment::new(0., 1., 1.));
        assert_eq!(rev.segments().red[1], Segment::new(0.5, 1., 0.5));
        let n = cmap.levels();
        for k in 0 .. n {
            let (a, b) = (cmap.lut()[k], rev.lut()[n - 1 - k]);
            assert!((a.r - b.r).abs() < 1e-12, "{k}: {} vs {}", a.r, b.r);
            assert_eq!((a.g, a.b), (b.g, b.b));
        }
    }

    #[test]
    fn resampled_keeps_segments() {
        let cmap = Colormap::new("step", step(), 5).unwrap();
        let fine = cmap.resampled(9).unwrap();
        assert_eq!(fine.levels(), 9);
        assert_eq!(fine.segments(), cmap.segments());
        assert_eq!(fine.lut()[2].r, 0.25);
        assert!(cmap.resampled(0).is_err());
    }

    #[test]
    fn invalid_segments() {
        let mut data = step();
        data.green = channel(&[(0.1, 0., 0.), (1., 0., 0.)]);
        assert!(matches!(Colormap::new("bad", data, 8),
                         Err(Error::InvalidSegments { channel: "green", .. })));
        let mut data = step();
        data.red = channel(&[(0., 0., 0.), (0.7, 0., 0.), (0.3, 0., 0.),
                             (1., 1., 1.)]);
        assert!(matches!(Colormap::new("bad", data, 8),
                         Err(Error::InvalidSegments { channel: "red", .. })));
        let mut data = step();
        data.blue.clear();
        assert!(Colormap::new("bad", data, 8).is_err());
    }

    #[test]
    fn zero_width_segment() {
        let data = SegmentData {
            red: channel(&[(0., 0., 0.), (0.5, 0.2, 0.4), (0.5, 0.6, 0.8),
                           (1., 1., 1.)]),
            green: channel(&[(0., 0., 0.), (1., 0., 0.)]),
            blue: channel(&[(0., 0., 0.), (1., 0., 0.)]),
        };
        let cmap = Colormap::new("jump", data, 5).unwrap();
        let expected = [0., 0.1, 0.2, 0.9, 1.];
        for (c, e) in cmap.lut().iter().zip(expected) {
            assert!((c.r - e).abs() < 1e-12, "{} vs {e}", c.r);
        }
    }

    #[test]
    fn generic_colors() {
        let cmap = Colormap::new("step", step(), 5).unwrap();
        let c: RGB8 = cmap.rgb(1.);
        assert_eq!(c, RGB8 { r: 255, g: 0, b: 255 });
        let cs: Vec<RGB<f64>> = cmap.map(&[0., 1.]);
        assert_eq!(cs[0], RGB { r: 0., g: 0., b: 1. });
    }
}
