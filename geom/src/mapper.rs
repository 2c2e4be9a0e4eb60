//! Mapping from sheet coordinates to drawing coordinates.
//!
//! A sample at row `r`, column `c` with height `h` lands at
//! ```text
//! (x_lo + c * x_delta, y_lo + r * y_delta, z_map(h))
//! ```
//! where the cell origin and step come from [`CellLayout`] and the height
//! conversion from [`ZMap`]. Both are computed once per draw pass from
//! [`Settings`].

use hs::math::{Color4f, Pt3, color::WHITE, pt3};

use crate::error::{Axis, ConfigError};

/// How the consumer of a strip should group the vertices it emits.
///
/// The strip engine never looks at this; it is handed to
/// [`Surface::begin_strip`][crate::strip::Surface::begin_strip] and
/// [`Surface::end_strip`][crate::strip::Surface::end_strip] as is.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum VertexEntryMode {
    Points,
    Lines,
    Triangles,
    TriangleStrip,
    Quads,
    #[default]
    QuadStrip,
}

/// Drawing settings for a sheet.
///
/// Fields can only be changed through the validating setters, and a draw
/// pass borrows the settings immutably, so they stay fixed for its whole
/// duration.
///
/// # Examples
/// ```
/// use heightsheet_geom::mapper::Settings;
///
/// let mut s = Settings::default();
/// s.set_x_lo(0.0)?.set_x_hi(4.0)?.set_xy_draw_ratio(2.0)?;
/// assert_eq!(s.extent_lo().x, 0.0);
/// assert!(s.set_xy_draw_ratio(0.0).is_err());
/// # Ok::<(), heightsheet_geom::error::ConfigError>(())
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Settings {
    extent_lo: Pt3,
    extent_hi: Pt3,
    xy_draw_ratio: f32,
    z_lo_sheet: f32,
    z_hi_sheet: f32,
    color: Color4f,
    mode: VertexEntryMode,
}

/// Origin and step of the sheet's grid in drawing coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CellLayout {
    pub x_lo: f32,
    pub y_lo: f32,
    pub x_delta: f32,
    pub y_delta: f32,
}

/// Affine conversion of sample heights to drawing z coordinates.
///
/// If the sheet height range is empty the conversion is *inactive*: its
/// ratio is exactly zero and every height maps to the low draw z.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ZMap {
    z_lo_sheet: f32,
    z_lo_draw: f32,
    ratio: f32,
}

//
// Inherent impls
//

impl Settings {
    /// Returns the low corner of the drawing box.
    pub fn extent_lo(&self) -> Pt3 {
        self.extent_lo
    }
    /// Returns the high corner of the drawing box.
    pub fn extent_hi(&self) -> Pt3 {
        self.extent_hi
    }
    /// Returns the width to height ratio of a single cell.
    pub fn xy_draw_ratio(&self) -> f32 {
        self.xy_draw_ratio
    }
    /// Returns the sample height mapped to the low draw z.
    pub fn z_lo_sheet(&self) -> f32 {
        self.z_lo_sheet
    }
    /// Returns the sample height mapped to the high draw z.
    pub fn z_hi_sheet(&self) -> f32 {
        self.z_hi_sheet
    }
    /// Returns the surface color.
    pub fn color(&self) -> Color4f {
        self.color
    }
    /// Returns the vertex entry mode.
    pub fn mode(&self) -> VertexEntryMode {
        self.mode
    }

    /// Sets the x coordinate of the first column.
    pub fn set_x_lo(&mut self, x: f32) -> Result<&mut Self, ConfigError> {
        self.extent_lo.x = finite("x_lo", x)?;
        Ok(self)
    }
    /// Sets the largest x coordinate the grid may reach.
    pub fn set_x_hi(&mut self, x: f32) -> Result<&mut Self, ConfigError> {
        self.extent_hi.x = finite("x_hi", x)?;
        Ok(self)
    }
    /// Sets the y coordinate of the first row.
    pub fn set_y_lo(&mut self, y: f32) -> Result<&mut Self, ConfigError> {
        self.extent_lo.y = finite("y_lo", y)?;
        Ok(self)
    }
    /// Sets the largest y coordinate the grid may reach.
    pub fn set_y_hi(&mut self, y: f32) -> Result<&mut Self, ConfigError> {
        self.extent_hi.y = finite("y_hi", y)?;
        Ok(self)
    }
    /// Sets the width to height ratio of a single cell.
    ///
    /// Returns an error unless `ratio` is finite and positive.
    pub fn set_xy_draw_ratio(
        &mut self,
        ratio: f32,
    ) -> Result<&mut Self, ConfigError> {
        // Also catches NaN
        if !(ratio > 0.0 && ratio.is_finite()) {
            return Err(ConfigError::NonPositiveRatio(ratio));
        }
        self.xy_draw_ratio = ratio;
        Ok(self)
    }
    /// Sets the draw z that the low sheet height maps to.
    pub fn set_z_lo_draw(&mut self, z: f32) -> Result<&mut Self, ConfigError> {
        self.extent_lo.z = finite("z_lo_draw", z)?;
        Ok(self)
    }
    /// Sets the draw z that the high sheet height maps to.
    pub fn set_z_hi_draw(&mut self, z: f32) -> Result<&mut Self, ConfigError> {
        self.extent_hi.z = finite("z_hi_draw", z)?;
        Ok(self)
    }
    /// Sets the sample height that maps to the low draw z.
    pub fn set_z_lo_sheet(&mut self, z: f32) -> Result<&mut Self, ConfigError> {
        self.z_lo_sheet = finite("z_lo_sheet", z)?;
        Ok(self)
    }
    /// Sets the sample height that maps to the high draw z.
    pub fn set_z_hi_sheet(&mut self, z: f32) -> Result<&mut Self, ConfigError> {
        self.z_hi_sheet = finite("z_hi_sheet", z)?;
        Ok(self)
    }
    /// Sets the surface color.
    pub fn set_color(&mut self, color: Color4f) -> &mut Self {
        self.color = color;
        self
    }
    /// Sets the vertex entry mode.
    pub fn set_mode(&mut self, mode: VertexEntryMode) -> &mut Self {
        self.mode = mode;
        self
    }

    /// Checks that the drawing box is not inverted.
    ///
    /// The box must have positive width and height. Its depth may be zero
    /// but not negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (lo, hi) = (self.extent_lo, self.extent_hi);
        for (axis, lo, hi) in [(Axis::X, lo.x, hi.x), (Axis::Y, lo.y, hi.y)] {
            if lo >= hi {
                return Err(ConfigError::InvertedExtent { axis, lo, hi });
            }
        }
        if lo.z > hi.z {
            let (lo, hi) = (lo.z, hi.z);
            return Err(ConfigError::InvertedExtent { axis: Axis::Z, lo, hi });
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

impl CellLayout {
    /// Computes the grid layout of a sheet with `rows` rows and `cols`
    /// columns inside the drawing box of `settings`.
    ///
    /// The grid is anchored at the low corner: column 0 lies at
    /// `extent_lo.x` and row 0 at `extent_lo.y`. The grid spans the full
    /// box width with cells of the configured aspect ratio; if that makes
    /// it taller than the box, it spans the full box height instead and
    /// gets narrower. Either way it fits the box.
    ///
    /// Sizes below 2 are treated as 2.
    pub fn new(settings: &Settings, rows: usize, cols: usize) -> Self {
        let (lo, hi) = (settings.extent_lo, settings.extent_hi);
        let ratio = settings.xy_draw_ratio;
        let x_steps = (cols.max(2) - 1) as f32;
        let y_steps = (rows.max(2) - 1) as f32;

        let mut x_delta = (hi.x - lo.x) / x_steps;
        let mut y_delta = x_delta / ratio;
        if y_steps * y_delta > hi.y - lo.y {
            y_delta = (hi.y - lo.y) / y_steps;
            x_delta = y_delta * ratio;
        }
        Self { x_lo: lo.x, y_lo: lo.y, x_delta, y_delta }
    }

    /// Returns the drawing coordinates of the sample at row `r`,
    /// column `c`, with draw height `z`.
    #[inline]
    pub fn point(&self, r: usize, c: usize, z: f32) -> Pt3 {
        pt3(
            self.x_lo + c as f32 * self.x_delta,
            self.y_lo + r as f32 * self.y_delta,
            z,
        )
    }
}

impl ZMap {
    /// Computes the height conversion of `settings`.
    ///
    /// # Examples
    /// ```
    /// use heightsheet_geom::mapper::{Settings, ZMap};
    ///
    /// // Default sheet range 0..1 maps onto draw range -1..1
    /// let z = ZMap::new(&Settings::default());
    /// assert_eq!(z.convert(0.0), -1.0);
    /// assert_eq!(z.convert(0.5), 0.0);
    /// assert_eq!(z.convert(1.0), 1.0);
    /// ```
    pub fn new(settings: &Settings) -> Self {
        let sheet_span = settings.z_hi_sheet - settings.z_lo_sheet;
        let draw_span = settings.extent_hi.z - settings.extent_lo.z;
        let ratio = if sheet_span == 0.0 {
            0.0
        } else {
            draw_span / sheet_span
        };
        Self {
            z_lo_sheet: settings.z_lo_sheet,
            z_lo_draw: settings.extent_lo.z,
            // Overflowing spans would poison every point
            ratio: if ratio.is_finite() { ratio } else { 0.0 },
        }
    }

    /// Returns whether heights are actually scaled.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.ratio != 0.0
    }

    /// Returns the draw units per sheet unit, zero if inactive.
    #[inline]
    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    /// Returns the drawing z coordinate of sample height `z`.
    ///
    /// If inactive, returns the low draw z regardless of `z`.
    #[inline]
    pub fn convert(&self, z: f32) -> f32 {
        if self.is_active() {
            self.z_lo_draw + (z - self.z_lo_sheet) * self.ratio
        } else {
            self.z_lo_draw
        }
    }
}

//
// Foreign trait impls
//

impl Default for Settings {
    /// Returns settings for the box (-1, -1, -1)..(1, 1, 1), square cells,
    /// sheet heights 0..1, opaque white, and [`VertexEntryMode::QuadStrip`].
    fn default() -> Self {
        Self {
            extent_lo: Pt3::splat(-1.0),
            extent_hi: Pt3::splat(1.0),
            xy_draw_ratio: 1.0,
            z_lo_sheet: 0.0,
            z_hi_sheet: 1.0,
            color: WHITE,
            mode: VertexEntryMode::default(),
        }
    }
}
