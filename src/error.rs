//! Error types.
//!
//! Every failure is a deterministic input-validation failure: nothing
//! is retried and no partial result is returned.

use thiserror::Error;

/// Failure to turn a color token such as `"orange_l40"` into RGB.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColorError {
    /// The base name is not in the color table.
    #[error("unknown color name '{name}' in '{token}'")]
    UnknownColorName { token: String, name: String },

    /// The suffix after `_` is not one of `l#`, `s#`, `v#`, `light`,
    /// `dark` (or there is more than one suffix).
    #[error("invalid color modifier '{modifier}' in '{token}'")]
    InvalidModifierSyntax { token: String, modifier: String },

    /// The modifier amount is outside 0–100.
    #[error("color modifier value {value} out of range 0-100 in '{token}'")]
    ModifierValueOutOfRange { token: String, value: i64 },
}

/// Main error type of the crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The smallest and largest breakpoints coincide (or there are none).
    #[error("degenerate range: minimum and maximum x values are both {0}")]
    DegenerateRange(f64),

    /// A definition entry does not have the shape `x, color [, color]`.
    #[error("malformed colormap definition entry: {0}")]
    MalformedDefinition(String),

    /// A color token could not be resolved.
    #[error("unresolved color: {0}")]
    UnresolvedColor(#[from] ColorError),

    /// `vmin > vmax` in a normalizer.
    #[error("invalid range: vmin ({vmin}) must be less than or equal to vmax ({vmax})")]
    InvalidRange { vmin: f64, vmax: f64 },

    /// Inverse requested before both bounds were set.
    #[error("not invertible until both vmin and vmax are set")]
    NotInvertible,

    /// Normalization requested before both bounds were set.
    #[error("normalizer is not scaled: vmin and vmax must be set")]
    Unscaled,

    /// A piecewise normalizer needs at least one breakpoint.
    #[error("a piecewise normalizer needs at least one breakpoint")]
    NoBreakpoints,

    /// A colormap needs at least one quantization level.
    #[error("invalid number of quantization levels: {0}")]
    InvalidLevels(usize),

    /// A per-channel segment table is not usable.
    #[error("invalid {channel} segment data: {reason}")]
    InvalidSegments { channel: &'static str, reason: String },
}

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;
