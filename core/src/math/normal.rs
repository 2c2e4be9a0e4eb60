//! Surface normals that are never zero.
//!
//! Everything downstream of these functions (shading, renormalisation in a
//! vertex shader, averaging) divides by a normal's length sooner or later.
//! Degenerate input therefore never yields the zero vector here: whenever
//! there is no direction to return, the result is [`FALLBACK`], the +z axis.

use super::float::RecipSqrt;
use super::point::Pt3;

/// A surface normal. Any length unless documented otherwise.
pub type Normal3 = Pt3;

/// The direction returned in place of an undefined one.
///
/// +z is "up" for a height field drawn with heights along z, so a
/// degenerate cell shades like a flat one.
pub const FALLBACK: Normal3 = Pt3::Z;

/// Returns the face normal of the triangle `abc`, `(b - a) × (c - a)`.
///
/// The triangle is assumed to be wound counter-clockwise when seen from
/// the side the normal points to. The length of the result is twice the
/// area of the triangle, which makes plain sums of these normals
/// area-weighted averages.
///
/// If the triangle is degenerate (collinear or coincident vertices) or its
/// normal too small to normalize, returns [`FALLBACK`].
///
/// # Examples
/// ```
/// # use heightsheet_core::math::{pt3, Pt3, normal::*};
/// let n = calc_normal_any_length(
///     pt3(0.0, 0.0, 0.0),
///     pt3(2.0, 0.0, 0.0),
///     pt3(0.0, 2.0, 0.0),
/// );
/// assert_eq!(n, pt3(0.0, 0.0, 4.0));
///
/// let p = pt3(1.0, 1.0, 1.0);
/// assert_eq!(calc_normal_any_length(p, p, p), FALLBACK);
/// ```
#[inline]
pub fn calc_normal_any_length(a: Pt3, b: Pt3, c: Pt3) -> Normal3 {
    nonzero_or_fallback((b - a).cross(&(c - a)))
}

/// Returns `v` scaled to unit length.
///
/// If `v` is zero, has a subnormal length, or has non-finite components,
/// returns [`FALLBACK`]. Never divides by zero. Finite vectors too long
/// to square without overflow are scaled down first, so they keep their
/// direction.
///
/// # Examples
/// ```
/// # use heightsheet_core::assert_approx_eq;
/// # use heightsheet_core::math::{pt3, Pt3, normal::*};
/// assert_approx_eq!(calc_vector_unit_length(pt3(0.0, 0.0, -5.0)), -Pt3::Z);
/// assert_approx_eq!(calc_vector_unit_length(pt3(1e20, 0.0, 0.0)), Pt3::X);
/// assert_eq!(calc_vector_unit_length(Pt3::ZERO), FALLBACK);
/// ```
#[inline]
pub fn calc_vector_unit_length(v: Pt3) -> Normal3 {
    if !has_direction(v) {
        return FALLBACK;
    }
    let sqr = v.magnitude_sqr();
    if sqr.is_finite() {
        return v * RecipSqrt::recip_sqrt(sqr);
    }
    // Largest component becomes ±1, so the square is within 1..=3
    let a = v.abs();
    let v = v / a.x.max(a.y).max(a.z);
    v * RecipSqrt::recip_sqrt(v.magnitude_sqr())
}

/// Returns the sum of `normals`, or [`FALLBACK`] if they cancel out.
///
/// Summing [any-length][calc_normal_any_length] face normals weighs each
/// face by its area.
pub fn sum_any_length<I>(normals: I) -> Normal3
where
    I: IntoIterator<Item = Normal3>,
{
    nonzero_or_fallback(normals.into_iter().sum())
}

/// Returns the unweighted mean of the unit-length versions of `normals`,
/// or [`FALLBACK`] if there are none or they cancel out.
///
/// The result is not unit length in general.
pub fn average_unit_length<I>(normals: I) -> Normal3
where
    I: IntoIterator<Item = Normal3>,
{
    let (sum, n) = normals
        .into_iter()
        .fold((Pt3::ZERO, 0u32), |(sum, n), v| {
            (sum + calc_vector_unit_length(v), n + 1)
        });
    if n == 0 {
        return FALLBACK;
    }
    nonzero_or_fallback(sum / n as f32)
}

#[inline]
fn nonzero_or_fallback(v: Pt3) -> Normal3 {
    if has_direction(v) { v } else { FALLBACK }
}

/// Whether `v` is finite and long enough to be normalized.
///
/// A squared length that overflows to infinity still counts.
#[inline]
fn has_direction(v: Pt3) -> bool {
    v.is_finite() && v.magnitude_sqr() >= f32::MIN_POSITIVE
}
