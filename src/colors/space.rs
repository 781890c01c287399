//! Conversions between RGB and the HLS / HSV cylindrical models.
//!
//! All components, including the hue, are in \[0, 1\].

const ONE_THIRD: f64 = 1. / 3.;
const ONE_SIXTH: f64 = 1. / 6.;
const TWO_THIRD: f64 = 2. / 3.;

/// Hue of an RGB color whose channels are not all equal.  `range`
/// is `max - min` (non-zero).
fn hue(r: f64, g: f64, b: f64, maxc: f64, range: f64) -> f64 {
    let rc = (maxc - r) / range;
    let gc = (maxc - g) / range;
    let bc = (maxc - b) / range;
    let h = if r == maxc { bc - gc }
            else if g == maxc { 2. + rc - bc }
            else { 4. + gc - rc };
    (h / 6.).rem_euclid(1.)
}

/// Return `(h, l, s)`.
pub(crate) fn rgb_to_hls(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let maxc = r.max(g).max(b);
    let minc = r.min(g).min(b);
    let sum = maxc + minc;
    let range = maxc - minc;
    let l = sum / 2.;
    if minc == maxc { return (0., l, 0.) }
    let s = if l <= 0.5 { range / sum } else { range / (2. - maxc - minc) };
    (hue(r, g, b, maxc, range), l, s)
}

fn hls_channel(m1: f64, m2: f64, h: f64) -> f64 {
    let h = h.rem_euclid(1.);
    if h < ONE_SIXTH { m1 + (m2 - m1) * h * 6. }
    else if h < 0.5 { m2 }
    else if h < TWO_THIRD { m1 + (m2 - m1) * (TWO_THIRD - h) * 6. }
    else { m1 }
}

/// Return `(r, g, b)`.
pub(crate) fn hls_to_rgb(h: f64, l: f64, s: f64) -> (f64, f64, f64) {
    if s == 0. { return (l, l, l) }
    let m2 = if l <= 0.5 { l * (1. + s) } else { l + s - l * s };
    let m1 = 2. * l - m2;
    (hls_channel(m1, m2, h + ONE_THIRD),
     hls_channel(m1, m2, h),
     hls_channel(m1, m2, h - ONE_THIRD))
}

/// Return `(h, s, v)`.
pub(crate) fn rgb_to_hsv(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let maxc = r.max(g).max(b);
    let minc = r.min(g).min(b);
    let range = maxc - minc;
    if minc == maxc { return (0., 0., maxc) }
    (hue(r, g, b, maxc, range), range / maxc, maxc)
}

/// Return `(r, g, b)`.
pub(crate) fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s == 0. { return (v, v, v) }
    let h6 = h * 6.;
    let i = h6.trunc();
    let f = h6 - i;
    let p = v * (1. - s);
    let q = v * (1. - s * f);
    let t = v * (1. - s * (1. - f));
    match (i as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}
