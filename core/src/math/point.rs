//! Three-component points and vectors.

use core::cmp::Ordering;
use core::fmt::{self, Debug, Display, Formatter};
use core::ops::{
    Add, AddAssign, Div, DivAssign, Index, Mul, MulAssign, Neg, Sub,
    SubAssign,
};

use super::{ApproxEq, float, float::RecipSqrt};

/// A point or vector in 3D space with `f32` components.
///
/// The same type is used for positions and for directions (normals):
/// a height-field engine constantly takes differences of positions and
/// crosses them, so a point/vector split would only add conversions.
///
/// Comparison with `<`, `>` etc. is lexicographic by `x`, `y`, `z`.
#[derive(Copy, Clone, Default, PartialEq)]
pub struct Pt3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Returns a point with `x`, `y`, and `z` components.
#[inline]
pub const fn pt3(x: f32, y: f32, z: f32) -> Pt3 {
    Pt3 { x, y, z }
}

impl Pt3 {
    /// The origin, or the zero vector.
    pub const ZERO: Self = pt3(0.0, 0.0, 0.0);
    /// Unit vector in the +x direction.
    pub const X: Self = pt3(1.0, 0.0, 0.0);
    /// Unit vector in the +y direction.
    pub const Y: Self = pt3(0.0, 1.0, 0.0);
    /// Unit vector in the +z direction.
    pub const Z: Self = pt3(0.0, 0.0, 1.0);

    /// Returns a point with all components equal to `v`.
    #[inline]
    pub const fn splat(v: f32) -> Self {
        pt3(v, v, v)
    }

    /// Returns the components of `self` as an array.
    #[inline]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Returns the dot product of `self` and `other`.
    #[inline]
    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Returns the cross product of `self` and `other`.
    ///
    /// The result is perpendicular to both operands, right-handed,
    /// and its length equals the area of the parallelogram they span.
    #[inline]
    pub fn cross(&self, other: &Self) -> Self {
        pt3(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Returns the squared length of `self`.
    #[inline]
    pub fn magnitude_sqr(&self) -> f32 {
        self.dot(self)
    }

    /// Returns the length of `self`.
    #[inline]
    pub fn magnitude(&self) -> f32 {
        float::f32::sqrt(self.magnitude_sqr())
    }

    /// Scales `self` in place so that its length is `len`.
    ///
    /// Returns `false`, leaving `self` untouched, if the current length is
    /// zero or not a normal float (there is no direction to preserve).
    /// Callers must check the result.
    #[must_use]
    pub fn set_magnitude(&mut self, len: f32) -> bool {
        let sqr = self.magnitude_sqr();
        if !sqr.is_normal() {
            return false;
        }
        *self *= len * RecipSqrt::recip_sqrt(sqr);
        true
    }

    /// Returns `(1 - factor) * v0 + factor * v1`.
    ///
    /// `factor` is not clamped; values outside `0.0..=1.0` extrapolate.
    #[inline]
    pub fn interpolate(factor: f32, v0: Self, v1: Self) -> Self {
        v0 * (1.0 - factor) + v1 * factor
    }

    /// Returns the component-wise minimum of `self` and `other`.
    #[inline]
    pub fn min(&self, other: &Self) -> Self {
        pt3(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Returns the component-wise maximum of `self` and `other`.
    #[inline]
    pub fn max(&self, other: &Self) -> Self {
        pt3(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    /// Returns `self` with the absolute value of each component.
    #[inline]
    pub fn abs(&self) -> Self {
        use float::f32 as fp;
        pt3(fp::abs(self.x), fp::abs(self.y), fp::abs(self.z))
    }

    /// Returns whether every component is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Compares `self` and `other` lexicographically by `x`, `y`, `z`.
    ///
    /// Returns `None` if a NaN component decides the comparison.
    pub fn lex_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.x.partial_cmp(&other.x)? {
            Ordering::Equal => {}
            ord => return Some(ord),
        }
        match self.y.partial_cmp(&other.y)? {
            Ordering::Equal => {}
            ord => return Some(ord),
        }
        self.z.partial_cmp(&other.z)
    }
}

//
// Foreign trait impls
//

impl PartialOrd for Pt3 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.lex_cmp(other)
    }
}

impl Debug for Pt3 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Pt3")?;
        Debug::fmt(&self.to_array(), f)
    }
}

impl Display for Pt3 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<[f32; 3]> for Pt3 {
    #[inline]
    fn from([x, y, z]: [f32; 3]) -> Self {
        pt3(x, y, z)
    }
}

impl From<Pt3> for [f32; 3] {
    #[inline]
    fn from(p: Pt3) -> Self {
        p.to_array()
    }
}

impl Index<usize> for Pt3 {
    type Output = f32;

    /// Returns the `i`th component.
    ///
    /// # Panics
    /// If `i` > 2.
    fn index(&self, i: usize) -> &f32 {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Pt3 index out of bounds: {i}"),
        }
    }
}

impl ApproxEq<Self, f32> for Pt3 {
    fn approx_eq_eps(&self, other: &Self, eps: &f32) -> bool {
        self.to_array().approx_eq_eps(&other.to_array(), eps)
    }
    fn relative_epsilon() -> f32 {
        <f32 as ApproxEq>::relative_epsilon()
    }
}

/// Implements a binary operator and its op-assign counterpart.
macro_rules! impl_op {
    ($trait:ident :: $method:ident, $assign:ident :: $assign_method:ident,
     $rhs:ty, $op:tt, |$r:ident| $each:expr) => {
        impl $assign<$rhs> for Pt3 {
            #[inline]
            fn $assign_method(&mut self, $r: $rhs) {
                self.x $op $each.0;
                self.y $op $each.1;
                self.z $op $each.2;
            }
        }
        impl $trait<$rhs> for Pt3 {
            type Output = Self;
            #[inline]
            fn $method(mut self, rhs: $rhs) -> Self {
                $assign::$assign_method(&mut self, rhs);
                self
            }
        }
    };
}

impl_op!(Add::add, AddAssign::add_assign, Pt3, +=, |r| (r.x, r.y, r.z));
impl_op!(Sub::sub, SubAssign::sub_assign, Pt3, -=, |r| (r.x, r.y, r.z));
impl_op!(Mul::mul, MulAssign::mul_assign, f32, *=, |r| (r, r, r));
impl_op!(Div::div, DivAssign::div_assign, f32, /=, |r| (r, r, r));

impl Mul<Pt3> for f32 {
    type Output = Pt3;
    #[inline]
    fn mul(self, rhs: Pt3) -> Pt3 {
        rhs * self
    }
}

impl Neg for Pt3 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        pt3(-self.x, -self.y, -self.z)
    }
}

impl core::iter::Sum for Pt3 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
