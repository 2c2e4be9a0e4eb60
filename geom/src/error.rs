//! Error types for strip drawing.
//!
//! Only configuration can fail. Degenerate geometry resolves to the
//! fallback normal and a sheet too small to hold a quad draws nothing.

use thiserror::Error;

/// Result type of fallible drawing operations.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// A coordinate axis, for naming the offending side of an extent.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// An invalid drawing setting.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A coordinate or range bound is NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },

    /// The cell width to height ratio is zero, negative, or NaN.
    #[error("xy draw ratio must be positive, got {0}")]
    NonPositiveRatio(f32),

    /// The low side of the draw box lies above its high side.
    #[error("inverted {axis:?} extent: lo {lo} > hi {hi}")]
    InvertedExtent { axis: Axis, lo: f32, hi: f32 },
}

/// Drawing errors.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
#[non_exhaustive]
pub enum Error {
    /// The settings failed validation.
    #[error("invalid settings: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn messages() {
        let e = ConfigError::NonFinite { field: "x_lo", value: f32::NAN };
        assert_eq!(e.to_string(), "x_lo must be finite, got NaN");

        let e = Error::from(ConfigError::InvertedExtent {
            axis: Axis::Y,
            lo: 1.0,
            hi: -1.0,
        });
        assert_eq!(e.to_string(), "invalid settings: inverted Y extent: lo 1 > hi -1");
    }
}
