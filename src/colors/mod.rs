//! Color tokens.
//!
//! A token is a color name optionally followed by one modifier:
//! `<name>(_<modifier>)?`.  The modifiers are
//!
//! - `l#`: set the HLS lightness to `#`/100 (e.g. `"yellow_l75"`),
//! - `s#`: set the HSV saturation to `#`/100,
//! - `v#`: set the HSV value (brightness) to `#`/100,
//! - `light`: same as `l80`,
//! - `dark`: same as `l10`,
//!
//! where `#` is an integer in 0–100.  Resolved components are rounded
//! to 3 decimals.

use std::collections::HashMap;
use rgb::RGB;
use tracing::trace;

use crate::error::ColorError;

mod space;
mod table;

use table::NAMED_COLORS;

/// Something able to turn a color token into an RGB color with
/// components in \[0, 1\].
///
/// Implemented by [`NamedColors`] and by any closure with the same
/// signature as [`ColorResolver::resolve`].
pub trait ColorResolver {
    /// Resolve `token` or say why it cannot be.
    fn resolve(&self, token: &str) -> Result<RGB<f64>, ColorError>;
}

impl<F> ColorResolver for F
where F: Fn(&str) -> Result<RGB<f64>, ColorError> {
    fn resolve(&self, token: &str) -> Result<RGB<f64>, ColorError> {
        self(token)
    }
}

/// A modification of a base color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Modifier {
    /// Replace the HLS lightness.
    Lightness(f64),
    /// Replace the HSV saturation.
    Saturation(f64),
    /// Replace the HSV value.
    Value(f64),
}

impl Modifier {
    /// Parse the part of `token` after the `_`.
    pub fn parse(token: &str, modifier: &str) -> Result<Self, ColorError> {
        let syntax = || ColorError::InvalidModifierSyntax {
            token: token.to_string(),
            modifier: modifier.to_string(),
        };
        match modifier {
            "light" => return Ok(Modifier::Lightness(0.8)),
            "dark" => return Ok(Modifier::Lightness(0.1)),
            _ => (),
        }
        let mut chars = modifier.chars();
        let make: fn(f64) -> Modifier = match chars.next() {
            Some('l') => Modifier::Lightness,
            Some('s') => Modifier::Saturation,
            Some('v') => Modifier::Value,
            _ => return Err(syntax()),
        };
        let digits = chars.as_str();
        let unsigned = digits.strip_prefix(['+', '-']).unwrap_or(digits);
        if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
            return Err(syntax());
        }
        // Well-formed but too long for `i64`: saturate.
        let value: i64 = digits.parse().unwrap_or(
            if digits.starts_with('-') { i64::MIN } else { i64::MAX });
        if !(0 ..= 100).contains(&value) {
            return Err(ColorError::ModifierValueOutOfRange {
                token: token.to_string(),
                value,
            });
        }
        Ok(make(value as f64 / 100.))
    }

    /// Apply the modification to `c`.
    pub fn apply(self, c: RGB<f64>) -> RGB<f64> {
        let (r, g, b) = match self {
            Modifier::Lightness(l) => {
                let (h, _, s) = space::rgb_to_hls(c.r, c.g, c.b);
                space::hls_to_rgb(h, l, s)
            }
            Modifier::Saturation(s) => {
                let (h, _, v) = space::rgb_to_hsv(c.r, c.g, c.b);
                space::hsv_to_rgb(h, s, v)
            }
            Modifier::Value(v) => {
                let (h, s, _) = space::rgb_to_hsv(c.r, c.g, c.b);
                space::hsv_to_rgb(h, s, v)
            }
        };
        RGB { r, g, b }
    }
}

#[inline]
fn round3(x: f64) -> f64 {
    // Correctly rounded (ties to even on the exact binary value).
    format!("{x:.3}").parse().unwrap_or(x)
}

/// Table-backed [`ColorResolver`].
///
/// The default table holds matplotlib's base colors (`"b"`, `"g"`,
/// `"r"`, `"c"`, `"m"`, `"y"`, `"k"`, `"w"`) and the CSS4 colors.
/// Colors added with [`NamedColors::with_color`] shadow built-in ones.
#[derive(Clone, Debug)]
pub struct NamedColors {
    builtin: bool,
    custom: HashMap<String, RGB<f64>>,
}

impl Default for NamedColors {
    fn default() -> Self {
        Self { builtin: true, custom: HashMap::new() }
    }
}

impl NamedColors {
    /// A resolver without any color.
    pub fn empty() -> Self {
        Self { builtin: false, custom: HashMap::new() }
    }

    /// A resolver knowing only the colors of `table`.
    pub fn from_table<I, S>(table: I) -> Self
    where I: IntoIterator<Item = (S, RGB<f64>)>,
          S: Into<String> {
        Self {
            builtin: false,
            custom: table.into_iter().map(|(n, c)| (n.into(), c)).collect(),
        }
    }

    /// Add (or replace) the color `name`.  Names containing `_` can
    /// never be looked up since `_` introduces a modifier.
    pub fn with_color(mut self, name: impl Into<String>, c: RGB<f64>) -> Self {
        self.custom.insert(name.into(), c);
        self
    }

    /// Return the unmodified color `name`, if known.
    pub fn get(&self, name: &str) -> Option<RGB<f64>> {
        self.custom.get(name).copied().or_else(|| {
            if self.builtin { NAMED_COLORS.get(name).copied() } else { None }
        })
    }

    /// Sorted list of the known names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.custom.keys().map(|n| n.as_str())
            .collect();
        if self.builtin {
            names.extend(NAMED_COLORS.keys().copied());
        }
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Number of known names.
    pub fn len(&self) -> usize { self.names().len() }

    /// Whether no name is known.
    pub fn is_empty(&self) -> bool {
        self.custom.is_empty() && !self.builtin
    }
}

impl ColorResolver for NamedColors {
    fn resolve(&self, token: &str) -> Result<RGB<f64>, ColorError> {
        let (name, modifier) = match token.split_once('_') {
            None => (token, None),
            Some((name, m)) => (name, Some(m)),
        };
        if let Some(m) = modifier {
            if m.contains('_') {
                return Err(ColorError::InvalidModifierSyntax {
                    token: token.to_string(),
                    modifier: m.to_string(),
                });
            }
        }
        let mut c = self.get(name).ok_or_else(|| ColorError::UnknownColorName {
            token: token.to_string(),
            name: name.to_string(),
        })?;
        if let Some(m) = modifier {
            c = Modifier::parse(token, m)?.apply(c);
        }
        let c = RGB { r: round3(c.r), g: round3(c.g), b: round3(c.b) };
        trace!(token, r = c.r, g = c.g, b = c.b, "resolved color");
        Ok(c)
    }
}

/// Resolve `token` with the default color table.
///
/// # Example
///
/// ```
/// use rgb::RGB;
/// let c = cmap_builder::resolve("red_v50").unwrap();
/// assert_eq!(c, RGB { r: 0.5, g: 0., b: 0. });
/// ```
pub fn resolve(token: &str) -> Result<RGB<f64>, ColorError> {
    NamedColors::default().resolve(token)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(r: f64, g: f64, b: f64) -> RGB<f64> { RGB { r, g, b } }

    #[test]
    fn plain_names() {
        assert_eq!(resolve("red"), Ok(rgb(1., 0., 0.)));
        assert_eq!(resolve("g"), Ok(rgb(0., 0.5, 0.)));
        assert_eq!(resolve("green"), Ok(rgb(0., 0.502, 0.)));
    }

    #[test]
    fn modifiers() {
        let cases = [
            ("red_light", rgb(1., 0.6, 0.6)),
            ("red_dark", rgb(0.2, 0., 0.)),
            ("red_l10", rgb(0.2, 0., 0.)),
            ("red_l80", rgb(1., 0.6, 0.6)),
            ("red_s50", rgb(1., 0.5, 0.5)),
            ("red_v50", rgb(0.5, 0., 0.)),
            ("yellow_v60", rgb(0.6, 0.6, 0.)),
            ("firebrick_s60", rgb(0.698, 0.279, 0.279)),
            ("orange_light", rgb(1., 0.859, 0.6)),
            ("c_s9", rgb(0.682, 0.75, 0.75)),
            ("aquamarine_s32", rgb(0.68, 1., 0.892)),
        ];
        for (token, expected) in cases {
            assert_eq!(resolve(token), Ok(expected), "{token}");
        }
        assert_eq!(resolve("red_l10"), resolve("red_dark"));
    }

    #[test]
    fn unknown_name() {
        assert_eq!(resolve("nocolor_l10"), Err(ColorError::UnknownColorName {
            token: "nocolor_l10".to_string(),
            name: "nocolor".to_string(),
        }));
    }

    #[test]
    fn bad_modifiers() {
        for token in ["red_x50", "red_l", "red_lx", "red_l10_s5", "red_"] {
            assert!(matches!(resolve(token),
                             Err(ColorError::InvalidModifierSyntax { .. })),
                    "{token}");
        }
        assert_eq!(resolve("red_l150"),
                   Err(ColorError::ModifierValueOutOfRange {
                       token: "red_l150".to_string(), value: 150 }));
        assert!(matches!(resolve("red_s-5"),
                         Err(ColorError::ModifierValueOutOfRange { value: -5, .. })));
        assert!(matches!(resolve("red_l99999999999999999999"),
                         Err(ColorError::ModifierValueOutOfRange { value: i64::MAX, .. })));
        assert!(matches!(resolve("red_v-99999999999999999999"),
                         Err(ColorError::ModifierValueOutOfRange { value: i64::MIN, .. })));
        assert!(matches!(resolve("red_l-"),
                         Err(ColorError::InvalidModifierSyntax { .. })));
    }

    #[test]
    fn custom_table() {
        let colors = NamedColors::from_table([("ink", rgb(0.1, 0.2, 0.3))]);
        assert_eq!(colors.resolve("ink"), Ok(rgb(0.1, 0.2, 0.3)));
        assert!(colors.resolve("red").is_err());
        assert_eq!(colors.names(), vec!["ink"]);
        assert!(NamedColors::empty().is_empty());
    }

    #[test]
    fn shadowing() {
        let colors = NamedColors::default().with_color("red", rgb(0.5, 0., 0.));
        assert_eq!(colors.resolve("red"), Ok(rgb(0.5, 0., 0.)));
        assert_eq!(colors.len(), NamedColors::default().len());
    }

    #[test]
    fn closure_resolver() {
        let gray = |token: &str| -> Result<RGB<f64>, ColorError> {
            let v: f64 = token.parse().map_err(|_| ColorError::UnknownColorName {
                token: token.to_string(), name: token.to_string() })?;
            Ok(rgb(v, v, v))
        };
        assert_eq!(gray.resolve("0.25"), Ok(rgb(0.25, 0.25, 0.25)));
    }
}
