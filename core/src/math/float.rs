//! Floating-point compatibility API.
//!
//! `core` lacks `sqrt` and friends. This module provides the handful of
//! functions the vector math needs using either the `libm` or `micromath`
//! crate, depending on which feature is enabled, or `std` if available.
//! If none of the features is enabled, a software fallback is used.

#[cfg(feature = "libm")]
pub mod libm {
    pub use libm::fabsf as abs;
    pub use libm::sqrtf as sqrt;

    #[inline]
    pub fn recip_sqrt(x: f32) -> f32 {
        1.0 / sqrt(x)
    }
}

#[cfg(feature = "mm")]
pub mod mm {
    use micromath::F32Ext as mm;

    #[inline]
    pub fn abs(x: f32) -> f32 {
        mm::abs(x)
    }
    /// Returns the approximate square root of `x`.
    #[inline]
    pub fn sqrt(x: f32) -> f32 {
        let y = mm::sqrt(x);
        // Two rounds of Newton's method
        let y = 0.5 * (y + (x / y));
        0.5 * (y + (x / y))
    }
    /// Returns the approximate reciprocal of the square root of `x`.
    #[inline]
    pub fn recip_sqrt(x: f32) -> f32 {
        let y = mm::invsqrt(x);
        y * (1.5 - 0.5 * x * y * y)
    }
}

pub mod fallback {
    use super::fast_recip_sqrt;

    /// Returns the absolute value of `x`.
    #[inline]
    pub fn abs(x: f32) -> f32 {
        core::primitive::f32::from_bits(x.to_bits() & !(1 << 31))
    }
    /// Returns the approximate reciprocal of the square root of `x`.
    #[inline]
    pub fn recip_sqrt(x: f32) -> f32 {
        let y = fast_recip_sqrt(x);
        // One more round on top of the one in fast_recip_sqrt
        y * (1.5 - 0.5 * x * y * y)
    }
    /// Returns the approximate square root of `x`.
    #[inline]
    pub fn sqrt(x: f32) -> f32 {
        if x == 0.0 { 0.0 } else { x * recip_sqrt(x) }
    }
}

/// Returns a fast approximation of the reciprocal square root of a number.
#[inline]
pub fn fast_recip_sqrt(x: f32) -> f32 {
    // https://en.wikipedia.org/wiki/Fast_inverse_square_root
    const MAGIC: u32 = 0x5f37_5a86;
    let y = core::primitive::f32::from_bits(MAGIC.saturating_sub(x.to_bits() >> 1));
    y * (1.5 - 0.5 * x * y * y)
}

#[cfg(feature = "std")]
#[allow(non_camel_case_types)]
pub type f32 = core::primitive::f32;

#[cfg(all(feature = "libm", not(feature = "std")))]
pub use libm as f32;

#[cfg(all(feature = "mm", not(feature = "std"), not(feature = "libm")))]
pub use mm as f32;

#[cfg(not(feature = "fp"))]
pub use fallback as f32;

/// Reciprocal square root for whichever back-end is active.
pub(crate) trait RecipSqrt {
    fn recip_sqrt(x: Self) -> Self;
}

impl RecipSqrt for core::primitive::f32 {
    #[inline]
    fn recip_sqrt(x: Self) -> Self {
        #[cfg(feature = "std")]
        {
            x.sqrt().recip()
        }
        #[cfg(not(feature = "std"))]
        {
            f32::recip_sqrt(x)
        }
    }
}
