//! Testing and asserting approximate equality.

use core::iter::zip;

/// Trait for testing approximate equality.
///
/// Height-field normals are sums of cross products of differences, so even
/// a perfectly flat sheet rarely yields a normal that compares *exactly*
/// equal to the expected axis. Two values are considered approximately
/// equal if their absolute difference is at most some small epsilon,
/// scaled by the magnitude of the values compared (but never by less
/// than one, so that values near zero compare absolutely).
pub trait ApproxEq<Other: ?Sized = Self, Epsilon = Self> {
    /// Returns whether `self` and `other` are approximately equal.
    /// Uses the epsilon returned by [`Self::relative_epsilon`].
    fn approx_eq(&self, other: &Other) -> bool {
        self.approx_eq_eps(other, &Self::relative_epsilon())
    }

    /// Returns whether `self` and `other` are approximately equal,
    /// using the relative epsilon `rel_eps`.
    fn approx_eq_eps(&self, other: &Other, rel_eps: &Epsilon) -> bool;

    /// Returns the default relative epsilon.
    fn relative_epsilon() -> Epsilon;
}

/// Default relative epsilon of `f32` comparisons.
///
/// Looser without an exact square root, as the fallback `sqrt` is only
/// accurate to a few ulps.
const F32_EPS: f32 = if cfg!(feature = "fp") { 1e-6 } else { 1e-5 };

impl ApproxEq for f32 {
    fn approx_eq_eps(&self, other: &Self, rel_eps: &Self) -> bool {
        use super::float::f32;
        let scale = f32::abs(*self).max(1.0);
        f32::abs(self - other) <= rel_eps * scale
    }
    fn relative_epsilon() -> Self {
        F32_EPS
    }
}

impl<E, T: ApproxEq<T, E>> ApproxEq<Self, E> for [T] {
    fn approx_eq_eps(&self, other: &Self, rel_eps: &E) -> bool {
        self.len() == other.len()
            && zip(self, other).all(|(a, b)| a.approx_eq_eps(b, rel_eps))
    }
    fn relative_epsilon() -> E {
        T::relative_epsilon()
    }
}

impl<E, T: ApproxEq<T, E>, const N: usize> ApproxEq<Self, E> for [T; N] {
    fn approx_eq_eps(&self, other: &Self, rel_eps: &E) -> bool {
        self[..].approx_eq_eps(&other[..], rel_eps)
    }
    fn relative_epsilon() -> E {
        T::relative_epsilon()
    }
}

/// Two options are approximately equal if both are `None`, or both are
/// `Some` with approximately equal values. Used for the neighbour points
/// of a window, which are absent at the sheet edges.
impl<E, T: ApproxEq<T, E>> ApproxEq<Self, E> for Option<T> {
    fn approx_eq_eps(&self, other: &Self, rel_eps: &E) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.approx_eq_eps(b, rel_eps),
            (a, b) => a.is_none() && b.is_none(),
        }
    }
    fn relative_epsilon() -> E {
        T::relative_epsilon()
    }
}

/// Asserts that two values are approximately equal.
/// Requires that the left operand has an applicable [`ApproxEq`] impl
/// and that both operands impl `Debug` unless a custom message is given.
///
/// # Panics
///
/// If the given values are not approximately equal.
///
/// # Examples
/// ```
/// # use heightsheet_core::assert_approx_eq;
/// # use heightsheet_core::math::pt3;
/// assert_ne!(0.1 + 0.2, 0.3);
/// assert_approx_eq!(0.1 + 0.2, 0.3);
///
/// let n = pt3(0.0, 0.0, 2.0) / 3.0 * 1.5;
/// assert_approx_eq!(n, pt3(0.0, 0.0, 1.0));
/// ```
/// A custom epsilon can be given before an optional format string:
/// ```
/// # use heightsheet_core::assert_approx_eq;
/// assert_approx_eq!(100.0, 101.0, eps = 0.01, "off by {}", 1.0);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($a:expr, $b:expr) => {
        match (&$a, &$b) {
            (a, b) => $crate::assert_approx_eq!(
                *a, *b,
                "assertion failed: `{a:?} ≅ {b:?}`"
            )
        }
    };
    ($a:expr, $b:expr, eps = $eps:literal) => {
        match (&$a, &$b) {
            (a, b) => $crate::assert_approx_eq!(
                *a, *b, eps = $eps,
                "assertion failed: `{a:?} ≅ {b:?}`"
            )
        }
    };
    ($a:expr, $b:expr, $fmt:literal $(, $args:expr)*) => {{
        use $crate::math::approx::ApproxEq;
        match (&$a, &$b) {
            (a, b) => assert!(ApproxEq::approx_eq(a, b), $fmt $(, $args)*)
        }
    }};
    ($a:expr, $b:expr, eps = $eps:literal, $fmt:literal $(, $args:expr)*) => {{
        use $crate::math::approx::ApproxEq;
        match (&$a, &$b) {
            (a, b) => assert!(
                ApproxEq::approx_eq_eps(a, b, &$eps),
                $fmt $(, $args)*
            )
        }
    }};
}
