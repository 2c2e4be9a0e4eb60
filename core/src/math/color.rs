//! RGB and RGBA colors.
//!
//! Colors are carried through the strip engine untouched and handed to
//! whatever consumes the geometry, so this module only offers
//! construction, channel access, and conversion to packed formats.

use core::fmt::{self, Debug, Formatter};
use core::marker::PhantomData;
use core::ops::Index;

use super::ApproxEq;

//
// Types
//

/// A generic color type.
///
/// # Type parameters
/// * `Repr`: the representation of the channels of `Self`.
/// * `Space`: the color space that `Self` is an element of.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq)]
pub struct Color<Repr, Space>(pub Repr, PhantomData<Space>);

/// The RGB color space.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Rgb;

/// The RGBA color space (RGB plus alpha, or opacity).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Rgba;

/// An RGB color with `u8` channels.
pub type Color3<Space = Rgb> = Color<[u8; 3], Space>;
/// An RGBA color with `u8` channels.
pub type Color4<Space = Rgba> = Color<[u8; 4], Space>;
/// An RGB color with `f32` channels.
pub type Color3f<Space = Rgb> = Color<[f32; 3], Space>;
/// An RGBA color with `f32` channels.
pub type Color4f<Space = Rgba> = Color<[f32; 4], Space>;

/// Returns a new RGB color with `r`, `g`, and `b` channels.
pub const fn rgb<Ch>(r: Ch, g: Ch, b: Ch) -> Color<[Ch; 3], Rgb> {
    Color([r, g, b], PhantomData)
}
/// Returns a new RGBA color with `r`, `g`, `b`, and `a` channels.
pub const fn rgba<Ch>(r: Ch, g: Ch, b: Ch, a: Ch) -> Color<[Ch; 4], Rgba> {
    Color([r, g, b, a], PhantomData)
}
/// Returns an opaque gray with all color channels equal to `lum`.
pub const fn gray(lum: f32) -> Color4f {
    rgba(lum, lum, lum, 1.0)
}

/// Opaque white.
pub const WHITE: Color4f = gray(1.0);
/// Opaque black.
pub const BLACK: Color4f = gray(0.0);

//
// Inherent impls
//

impl Color3 {
    /// Returns a `u32` containing the channel bytes of `self`
    /// in format `0x00_RR_GG_BB`.
    #[inline]
    pub const fn to_rgb_u32(self) -> u32 {
        let [r, g, b] = self.0;
        u32::from_be_bytes([0x00, r, g, b])
    }
}

impl Color4 {
    /// Returns a `u32` containing the channel bytes of `self`
    /// in format `0xRR_GG_BB_AA`.
    #[inline]
    pub const fn to_rgba_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }
    /// Returns a `u32` containing the channel bytes of `self`
    /// in format `0xAA_RR_GG_BB`.
    #[inline]
    pub const fn to_argb_u32(self) -> u32 {
        self.to_rgba_u32().rotate_right(8)
    }
}

impl Color3f {
    /// Returns `self` with alpha 1.0.
    #[inline]
    pub fn to_rgba(self) -> Color4f {
        let [r, g, b] = self.0;
        rgba(r, g, b, 1.0)
    }
    /// Returns `self` with channels mapped to `u8` by
    /// `(c.clamp(0.0, 1.0) * 255.0) as u8`.
    #[inline]
    pub fn to_color3(self) -> Color3 {
        self.0.map(to_u8).into()
    }
}

impl Color4f {
    /// Returns `self` without alpha.
    #[inline]
    pub fn to_rgb(self) -> Color3f {
        let [r, g, b, _] = self.0;
        rgb(r, g, b)
    }
    /// Returns `self` with channels mapped to `u8` by
    /// `(c.clamp(0.0, 1.0) * 255.0) as u8`.
    #[inline]
    pub fn to_color4(self) -> Color4 {
        self.0.map(to_u8).into()
    }
    /// Returns `self` with every color channel multiplied by `lum`,
    /// leaving alpha alone.
    #[inline]
    pub fn shade(self, lum: f32) -> Self {
        let [r, g, b, a] = self.0;
        rgba(r * lum, g * lum, b * lum, a)
    }
}

#[inline]
fn to_u8(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0) as u8
}

impl<R, Sc> Color<R, Rgb>
where
    R: Index<usize, Output = Sc>,
    Sc: Copy,
{
    /// Returns the red channel of `self`.
    pub fn r(&self) -> Sc {
        self.0[0]
    }
    /// Returns the green channel of `self`.
    pub fn g(&self) -> Sc {
        self.0[1]
    }
    /// Returns the blue channel of `self`.
    pub fn b(&self) -> Sc {
        self.0[2]
    }
}

impl<R, Sc> Color<R, Rgba>
where
    R: Index<usize, Output = Sc>,
    Sc: Copy,
{
    /// Returns the red channel of `self`.
    pub fn r(&self) -> Sc {
        self.0[0]
    }
    /// Returns the green channel of `self`.
    pub fn g(&self) -> Sc {
        self.0[1]
    }
    /// Returns the blue channel of `self`.
    pub fn b(&self) -> Sc {
        self.0[2]
    }
    /// Returns the alpha channel of `self`.
    pub fn a(&self) -> Sc {
        self.0[3]
    }
}

//
// Foreign trait impls
//

impl<R: Debug, Space: Debug + Default> Debug for Color<R, Space> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Color<{:?}>{:?}", Space::default(), self.0)
    }
}

impl<R, Sp> From<R> for Color<R, Sp> {
    #[inline]
    fn from(chs: R) -> Self {
        Self(chs, PhantomData)
    }
}

impl<Sp, const N: usize> ApproxEq<Self, f32> for Color<[f32; N], Sp> {
    fn approx_eq_eps(&self, other: &Self, eps: &f32) -> bool {
        self.0.approx_eq_eps(&other.0, eps)
    }
    fn relative_epsilon() -> f32 {
        <f32 as ApproxEq>::relative_epsilon()
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;

    use super::*;

    #[test]
    fn color_channels() {
        assert_eq!(rgb(0xFF, 0, 0).r(), 0xFF);
        assert_eq!(rgb(0, 0xFF, 0).g(), 0xFF);
        assert_eq!(rgb(0, 0, 0xFF).b(), 0xFF);
        assert_eq!(rgba(0.0, 0.0, 0.0, 0.5).a(), 0.5);
    }

    #[test]
    fn packed_formats() {
        assert_eq!(rgb(0x11, 0x22, 0x33).to_rgb_u32(), 0x00_11_22_33);
        assert_eq!(rgba(0x11, 0x22, 0x33, 0x44).to_rgba_u32(), 0x11_22_33_44);
        assert_eq!(rgba(0x11, 0x22, 0x33, 0x44).to_argb_u32(), 0x44_11_22_33);
    }

    #[test]
    fn float_to_u8_clamps() {
        assert_eq!(rgb(-1.0, 0.5, 2.0).to_color3(), rgb(0, 127, 255));
        assert_eq!(WHITE.to_color4(), rgba(255, 255, 255, 255));
    }

    #[test]
    fn alpha_conversions() {
        assert_eq!(rgb(0.1, 0.2, 0.3).to_rgba(), rgba(0.1, 0.2, 0.3, 1.0));
        assert_eq!(rgba(0.1, 0.2, 0.3, 0.4).to_rgb(), rgb(0.1, 0.2, 0.3));
    }

    #[test]
    fn shade_keeps_alpha() {
        assert_eq!(rgba(1.0, 0.5, 0.0, 0.25).shade(0.5), rgba(0.5, 0.25, 0.0, 0.25));
    }

    #[test]
    fn debug() {
        assert_eq!(format!("{:?}", rgb(1u8, 2, 3)), "Color<Rgb>[1, 2, 3]");
    }
}
