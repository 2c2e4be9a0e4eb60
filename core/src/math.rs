//! Points, normals, colors, and approximate equality.
//!
//! The strip engine works in a single space: drawing coordinates, with
//! heights along z. Points are therefore plain `f32` triples without the
//! space tagging a general-purpose math library would need.

pub use {
    approx::ApproxEq,
    color::{Color, Color3, Color3f, Color4, Color4f, gray, rgb, rgba},
    normal::{
        FALLBACK, Normal3, average_unit_length, calc_normal_any_length,
        calc_vector_unit_length, sum_any_length,
    },
    point::{Pt3, pt3},
};

pub mod approx;
pub mod color;
pub mod float;
pub mod normal;
pub mod point;

/// Linearly interpolates between two values.
///
/// Returns `from` when `t` = 0 and `to` when `t` = 1.
///
/// # Examples
/// ```
/// use heightsheet_core::math::lerp;
///
/// assert_eq!(lerp(0.25, 1.0, 5.0), 2.0);
/// ```
#[inline]
pub fn lerp(t: f32, from: f32, to: f32) -> f32 {
    from + t * (to - from)
}

/// Returns the relative position of `t` between `min` and `max`.
///
/// That is, returns 0 when `t` = `min`, 1 when `t` = `max`, and linearly
/// interpolates in between.
///
/// The result is unspecified if any of the parameters is non-finite, or if
/// `min` = `max`.
///
/// # Examples
/// ```
/// use heightsheet_core::math::inv_lerp;
///
/// // Two is one fourth of the way from one to five
/// assert_eq!(inv_lerp(2.0, 1.0, 5.0), 0.25);
///
/// // Zero is halfway between -2 and 2
/// assert_eq!(inv_lerp(0.0, -2.0, 2.0), 0.5);
/// ```
#[inline]
pub fn inv_lerp(t: f32, min: f32, max: f32) -> f32 {
    (t - min) / (max - min)
}
