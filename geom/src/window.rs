//! Sliding window over a sheet, one quad at a time.
//!
//! A [`Window`] walks a sheet strip by strip, where strip `s` is the band
//! of quads between rows `s` and `s + 1`, and within each strip quad by
//! quad along the columns. At every step it holds the four corners of the
//! current quad and the neighbouring points needed to average normals
//! over the quads around each corner:
//!
//! ```text
//!  row
//!  hi_hi      trail_hi_hi --- lead_hi_hi ---- lead_lead_hi_hi
//!                  |              |                 |
//!  hi         trail_hi ------- lead_hi ------- lead_lead_hi
//!                  |   upper  /   |                 |
//!                  |        /     |                 |
//!                  |      /       |                 |
//!                  |    /  lower  |                 |
//!  lo         trail_lo ------- lead_lo ------- lead_lead_lo
//!                  |              |                 |
//!  lo_lo      trail_lo_lo --- lead_lo_lo ---- lead_lead_lo_lo
//!
//!  column       trail           lead            lead_lead
//! ```
//!
//! Rows grow along y and columns along x, so a quad is wound
//! counter-clockwise seen from +z. Neighbours that would fall outside the
//! sheet are absent; nothing wraps around or is extrapolated.
//!
//! The walk is driven by two nested loops:
//! ```
//! # use heightsheet_geom::{mapper::Settings, window::Window};
//! # let sheet: Vec<Vec<f32>> = vec![vec![0.0; 3]; 3];
//! # let settings = Settings::default();
//! # let mut quads = 0;
//! if let Some(mut win) = Window::init_yx(&settings, &sheet) {
//!     loop {
//!         if win.init_x() {
//!             loop {
//!                 // The current quad is available here
//!                 quads += 1;
//!                 if !win.next_x() {
//!                     break;
//!                 }
//!             }
//!         }
//!         if !win.next_yx() {
//!             break;
//!         }
//!     }
//! }
//! assert_eq!(quads, 4);
//! ```
//! [`draw_surface`][crate::strip::draw_surface] runs these loops and
//! hands every quad to a [`Surface`][crate::strip::Surface].

use core::fmt::{self, Debug, Formatter};

use hs::math::normal::{
    Normal3, average_unit_length, calc_normal_any_length as face,
    calc_vector_unit_length, sum_any_length,
};
use hs::math::{Color4f, Pt3};

use crate::mapper::{CellLayout, Settings, VertexEntryMode, ZMap};
use crate::sheet::Sheet;

/// Position of a strip among the strips, or of a quad within its strip.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Pos {
    /// Both the first and the last.
    Only,
    /// The first of several.
    #[default]
    First,
    /// Neither the first nor the last.
    Interior,
    /// The last of several.
    Last,
}

/// Indices of the sheet rows the current strip reads.
///
/// `lo_lo` repeats `lo` on the first strip and `hi_hi` repeats `hi` on
/// the last one. `end` is the number of rows.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RowIndices {
    pub lo_lo: usize,
    pub lo: usize,
    pub hi: usize,
    pub hi_hi: usize,
    pub end: usize,
}

/// Indices of the sheet columns the current quad reads.
///
/// `lead_lead` repeats `lead` on the last quad. `end` is the number of
/// columns.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ColIndices {
    pub trail: usize,
    pub lead: usize,
    pub lead_lead: usize,
    pub end: usize,
}

/// The state of a walk over a sheet, positioned at one quad.
pub struct Window<'a, S: ?Sized> {
    sheet: &'a S,
    settings: &'a Settings,
    layout: CellLayout,
    z_map: ZMap,

    rows: RowIndices,
    cols: ColIndices,
    row_pos: Pos,
    col_pos: Pos,

    row_lo_lo: &'a [f32],
    row_lo: &'a [f32],
    row_hi: &'a [f32],
    row_hi_hi: &'a [f32],

    trail_lo: Pt3,
    trail_hi: Pt3,
    lead_lo: Pt3,
    lead_hi: Pt3,

    trail_lo_lo: Option<Pt3>,
    trail_hi_hi: Option<Pt3>,
    lead_lo_lo: Option<Pt3>,
    lead_hi_hi: Option<Pt3>,
    lead_lead_lo: Option<Pt3>,
    lead_lead_hi: Option<Pt3>,
    lead_lead_lo_lo: Option<Pt3>,
    lead_lead_hi_hi: Option<Pt3>,
}

impl Pos {
    /// Returns the position of item `i` among `n` items.
    #[inline]
    pub fn new(i: usize, n: usize) -> Self {
        debug_assert!(i < n, "{i} >= {n}");
        match (i == 0, i + 1 >= n) {
            (true, true) => Self::Only,
            (true, false) => Self::First,
            (false, true) => Self::Last,
            (false, false) => Self::Interior,
        }
    }
    /// Returns whether there is nothing before this position.
    #[inline]
    pub fn is_first(self) -> bool {
        matches!(self, Self::Only | Self::First)
    }
    /// Returns whether there is nothing after this position.
    #[inline]
    pub fn is_last(self) -> bool {
        matches!(self, Self::Only | Self::Last)
    }
}

impl<'a, S: Sheet + ?Sized> Window<'a, S> {
    //
    // Row loop
    //

    /// Starts a walk over `sheet`, positioned at the first strip.
    ///
    /// Computes the cell layout and height conversion for the whole walk.
    /// Returns `None` if the sheet has fewer than two rows or columns and
    /// thus no quads. Call [`init_x`][Self::init_x] before reading points.
    pub fn init_yx(settings: &'a Settings, sheet: &'a S) -> Option<Self> {
        let (rows, cols) = sheet.size();
        if rows < 2 || cols < 2 {
            return None;
        }
        let row_lo = row_of(sheet, 0, cols);
        let row_hi = row_of(sheet, 1, cols);
        let hi_hi = 2.min(rows - 1);
        Some(Self {
            sheet,
            settings,
            layout: CellLayout::new(settings, rows, cols),
            z_map: ZMap::new(settings),

            rows: RowIndices { lo_lo: 0, lo: 0, hi: 1, hi_hi, end: rows },
            cols: ColIndices { trail: 0, lead: 1, lead_lead: 2.min(cols - 1), end: cols },
            row_pos: Pos::new(0, rows - 1),
            col_pos: Pos::new(0, cols - 1),

            row_lo_lo: row_lo,
            row_lo,
            row_hi,
            row_hi_hi: row_of(sheet, hi_hi, cols),

            trail_lo: Pt3::ZERO,
            trail_hi: Pt3::ZERO,
            lead_lo: Pt3::ZERO,
            lead_hi: Pt3::ZERO,
            trail_lo_lo: None,
            trail_hi_hi: None,
            lead_lo_lo: None,
            lead_hi_hi: None,
            lead_lead_lo: None,
            lead_lead_hi: None,
            lead_lead_lo_lo: None,
            lead_lead_hi_hi: None,
        })
    }

    /// Advances to the next strip.
    ///
    /// Returns `false`, leaving `self` unchanged, if the current strip
    /// is the last one. Call [`init_x`][Self::init_x] before reading
    /// points of the new strip.
    pub fn next_yx(&mut self) -> bool {
        let r = &mut self.rows;
        if r.hi + 1 >= r.end {
            return false;
        }
        r.lo_lo = r.lo;
        r.lo = r.hi;
        r.hi += 1;
        r.hi_hi = (r.hi + 1).min(r.end - 1);
        self.row_pos = Pos::new(r.lo, r.end - 1);

        self.row_lo_lo = self.row_lo;
        self.row_lo = self.row_hi;
        self.row_hi = self.row_hi_hi;
        self.row_hi_hi = row_of(self.sheet, r.hi_hi, self.cols.end);
        true
    }

    //
    // Column loop
    //

    /// Positions `self` at the first quad of the current strip and
    /// fetches its points.
    ///
    /// Returns `false` if the strip has fewer than two columns.
    pub fn init_x(&mut self) -> bool {
        let end = self.cols.end;
        if end < 2 {
            return false;
        }
        self.cols = ColIndices { trail: 0, lead: 1, lead_lead: 2.min(end - 1), end };
        self.col_pos = Pos::new(0, end - 1);

        self.trail_lo = self.fetch_lo(0);
        self.trail_hi = self.fetch_hi(0);
        self.trail_lo_lo = self.fetch_lo_lo(0);
        self.trail_hi_hi = self.fetch_hi_hi(0);
        self.fetch_lead(1);
        if self.col_pos.is_last() {
            self.setup_lead_edge();
        } else {
            self.fetch_lead_lead(2);
        }
        true
    }

    /// Advances to the next quad of the current strip.
    ///
    /// Returns `false`, leaving `self` unchanged, if the current quad is
    /// the last one of the strip.
    pub fn next_x(&mut self) -> bool {
        let c = &mut self.cols;
        if c.lead + 1 >= c.end {
            return false;
        }
        c.trail = c.lead;
        c.lead += 1;
        let (lead, end) = (c.lead, c.end);
        self.col_pos = Pos::new(c.trail, end - 1);

        self.trail_lo = self.lead_lo;
        self.trail_hi = self.lead_hi;
        self.trail_lo_lo = self.lead_lo_lo;
        self.trail_hi_hi = self.lead_hi_hi;

        match (self.lead_lead_lo, self.lead_lead_hi) {
            (Some(lo), Some(hi)) => {
                self.lead_lo = lo;
                self.lead_hi = hi;
                self.lead_lo_lo = self.lead_lead_lo_lo;
                self.lead_hi_hi = self.lead_lead_hi_hi;
            }
            _ => self.fetch_lead(lead),
        }
        if self.col_pos.is_last() {
            self.setup_lead_edge();
        } else {
            self.fetch_lead_lead(lead + 1);
        }
        true
    }

    /// Clamps the lead-lead column at the last quad of a strip,
    /// where no column lies beyond the lead.
    fn setup_lead_edge(&mut self) {
        debug_assert!(self.col_pos.is_last());
        self.cols.lead_lead = self.cols.lead;
        self.lead_lead_lo = None;
        self.lead_lead_hi = None;
        self.lead_lead_lo_lo = None;
        self.lead_lead_hi_hi = None;
    }

    fn fetch_lead(&mut self, c: usize) {
        self.lead_lo = self.fetch_lo(c);
        self.lead_hi = self.fetch_hi(c);
        self.lead_lo_lo = self.fetch_lo_lo(c);
        self.lead_hi_hi = self.fetch_hi_hi(c);
    }

    fn fetch_lead_lead(&mut self, c: usize) {
        self.cols.lead_lead = c;
        self.lead_lead_lo = Some(self.fetch_lo(c));
        self.lead_lead_hi = Some(self.fetch_hi(c));
        self.lead_lead_lo_lo = self.fetch_lo_lo(c);
        self.lead_lead_hi_hi = self.fetch_hi_hi(c);
    }

    #[inline]
    fn point(&self, r: usize, row: &[f32], c: usize) -> Pt3 {
        self.layout.point(r, c, self.z_map.convert(row[c]))
    }
    fn fetch_lo(&self, c: usize) -> Pt3 {
        self.point(self.rows.lo, self.row_lo, c)
    }
    fn fetch_hi(&self, c: usize) -> Pt3 {
        self.point(self.rows.hi, self.row_hi, c)
    }
    fn fetch_lo_lo(&self, c: usize) -> Option<Pt3> {
        (!self.is_lo_edge())
            .then(|| self.point(self.rows.lo_lo, self.row_lo_lo, c))
    }
    fn fetch_hi_hi(&self, c: usize) -> Option<Pt3> {
        (!self.is_hi_edge())
            .then(|| self.point(self.rows.hi_hi, self.row_hi_hi, c))
    }
}

impl<'a, S: ?Sized> Window<'a, S> {
    //
    // Position
    //

    /// Returns the sheet being walked.
    pub fn sheet(&self) -> &'a S {
        self.sheet
    }
    /// Returns the settings of the walk.
    pub fn settings(&self) -> &'a Settings {
        self.settings
    }
    /// Returns the cell layout of the walk.
    pub fn layout(&self) -> &CellLayout {
        &self.layout
    }
    /// Returns the height conversion of the walk.
    pub fn z_map(&self) -> &ZMap {
        &self.z_map
    }
    /// Returns the surface color.
    pub fn color(&self) -> Color4f {
        self.settings.color()
    }
    /// Returns the vertex entry mode.
    pub fn mode(&self) -> VertexEntryMode {
        self.settings.mode()
    }

    /// Returns the index of the current strip, equal to its lo row.
    pub fn row(&self) -> usize {
        self.rows.lo
    }
    /// Returns the index of the current quad, equal to its trail column.
    pub fn col(&self) -> usize {
        self.cols.trail
    }
    /// Returns the row indices of the current strip.
    pub fn row_indices(&self) -> RowIndices {
        self.rows
    }
    /// Returns the column indices of the current quad.
    pub fn col_indices(&self) -> ColIndices {
        self.cols
    }
    /// Returns the position of the current strip.
    pub fn row_pos(&self) -> Pos {
        self.row_pos
    }
    /// Returns the position of the current quad within its strip.
    pub fn col_pos(&self) -> Pos {
        self.col_pos
    }

    /// Returns whether there is no row below the current strip.
    #[inline]
    pub fn is_lo_edge(&self) -> bool {
        self.row_pos.is_first()
    }
    /// Returns whether there is no row above the current strip.
    #[inline]
    pub fn is_hi_edge(&self) -> bool {
        self.row_pos.is_last()
    }
    /// Returns whether the current quad is the first of its strip.
    #[inline]
    pub fn is_trail_edge(&self) -> bool {
        self.col_pos.is_first()
    }
    /// Returns whether the current quad is the last of its strip.
    #[inline]
    pub fn is_lead_edge(&self) -> bool {
        self.col_pos.is_last()
    }

    //
    // Points
    //

    pub fn pt_trail_lo(&self) -> Pt3 {
        self.trail_lo
    }
    pub fn pt_trail_hi(&self) -> Pt3 {
        self.trail_hi
    }
    pub fn pt_lead_lo(&self) -> Pt3 {
        self.lead_lo
    }
    pub fn pt_lead_hi(&self) -> Pt3 {
        self.lead_hi
    }
    /// Returns the point below the trail-lo corner, if any.
    pub fn pt_trail_lo_lo(&self) -> Option<Pt3> {
        self.trail_lo_lo
    }
    /// Returns the point above the trail-hi corner, if any.
    pub fn pt_trail_hi_hi(&self) -> Option<Pt3> {
        self.trail_hi_hi
    }
    /// Returns the point below the lead-lo corner, if any.
    pub fn pt_lead_lo_lo(&self) -> Option<Pt3> {
        self.lead_lo_lo
    }
    /// Returns the point above the lead-hi corner, if any.
    pub fn pt_lead_hi_hi(&self) -> Option<Pt3> {
        self.lead_hi_hi
    }
    /// Returns the point beyond the lead-lo corner, if any.
    pub fn pt_lead_lead_lo(&self) -> Option<Pt3> {
        self.lead_lead_lo
    }
    /// Returns the point beyond the lead-hi corner, if any.
    pub fn pt_lead_lead_hi(&self) -> Option<Pt3> {
        self.lead_lead_hi
    }
    /// Returns the point below the lead-lead-lo point, if any.
    pub fn pt_lead_lead_lo_lo(&self) -> Option<Pt3> {
        self.lead_lead_lo_lo
    }
    /// Returns the point above the lead-lead-hi point, if any.
    pub fn pt_lead_lead_hi_hi(&self) -> Option<Pt3> {
        self.lead_lead_hi_hi
    }

    /// Returns the lower triangle of the current quad.
    ///
    /// The quad is split along the trail-hi to lead-lo diagonal. Both
    /// halves are wound counter-clockwise seen from +z.
    pub fn tri_lower(&self) -> [Pt3; 3] {
        [self.trail_lo, self.lead_lo, self.trail_hi]
    }
    /// Returns the upper triangle of the current quad.
    pub fn tri_upper(&self) -> [Pt3; 3] {
        [self.lead_hi, self.trail_hi, self.lead_lo]
    }

    //
    // Corner normals
    //
    // The normal of a corner is that of the triangle made of the corner
    // and its two neighbours along the quad edges, counter-clockwise.
    //

    /// Returns the face normal at the trail-lo corner, of any length.
    pub fn normal_trail_lo(&self) -> Normal3 {
        face(self.trail_lo, self.lead_lo, self.trail_hi)
    }
    /// Returns the face normal at the trail-hi corner, of any length.
    pub fn normal_trail_hi(&self) -> Normal3 {
        face(self.trail_hi, self.trail_lo, self.lead_hi)
    }
    /// Returns the face normal at the lead-lo corner, of any length.
    pub fn normal_lead_lo(&self) -> Normal3 {
        face(self.lead_lo, self.lead_hi, self.trail_lo)
    }
    /// Returns the face normal at the lead-hi corner, of any length.
    pub fn normal_lead_hi(&self) -> Normal3 {
        face(self.lead_hi, self.trail_hi, self.lead_lo)
    }

    pub fn normal_trail_lo_unit(&self) -> Normal3 {
        calc_vector_unit_length(self.normal_trail_lo())
    }
    pub fn normal_trail_hi_unit(&self) -> Normal3 {
        calc_vector_unit_length(self.normal_trail_hi())
    }
    pub fn normal_lead_lo_unit(&self) -> Normal3 {
        calc_vector_unit_length(self.normal_lead_lo())
    }
    pub fn normal_lead_hi_unit(&self) -> Normal3 {
        calc_vector_unit_length(self.normal_lead_hi())
    }

    //
    // Averages along the strip
    //

    /// Returns the mean of the unit face normals at the lead-lo corner
    /// of the current quad and the trail-lo corner of the next one.
    ///
    /// Not unit length in general.
    pub fn normal_lead_lo_strip_average(&self) -> Normal3 {
        average_unit_length(self.lead_lo_strip().into_iter().flatten())
    }
    /// Returns the mean of the unit face normals at the lead-hi corner
    /// of the current quad and the trail-hi corner of the next one.
    pub fn normal_lead_hi_strip_average(&self) -> Normal3 {
        average_unit_length(self.lead_hi_strip().into_iter().flatten())
    }
    /// Returns the unit face normal at the trail-lo corner.
    ///
    /// Only meaningful on the first quad of a strip; elsewhere the
    /// previous quad, which also shares the corner, is ignored.
    pub fn normal_trail_lo_strip_average(&self) -> Normal3 {
        debug_assert!(self.is_trail_edge(), "trail average off trail edge");
        average_unit_length([self.normal_trail_lo()])
    }
    /// Returns the unit face normal at the trail-hi corner.
    ///
    /// Only meaningful on the first quad of a strip.
    pub fn normal_trail_hi_strip_average(&self) -> Normal3 {
        debug_assert!(self.is_trail_edge(), "trail average off trail edge");
        average_unit_length([self.normal_trail_hi()])
    }

    /// Returns the sum of the face normals at the lead-lo corner of the
    /// current quad and the trail-lo corner of the next one.
    ///
    /// The normals are summed as is, so each face is weighed by its area.
    pub fn normal_lead_lo_half_area_average(&self) -> Normal3 {
        sum_any_length(self.lead_lo_strip().into_iter().flatten())
    }
    /// Returns the sum of the face normals at the lead-hi corner of the
    /// current quad and the trail-hi corner of the next one.
    pub fn normal_lead_hi_half_area_average(&self) -> Normal3 {
        sum_any_length(self.lead_hi_strip().into_iter().flatten())
    }
    /// Returns the face normal at the trail-lo corner.
    ///
    /// Only meaningful on the first quad of a strip.
    pub fn normal_trail_lo_half_area_average(&self) -> Normal3 {
        debug_assert!(self.is_trail_edge(), "trail average off trail edge");
        self.normal_trail_lo()
    }
    /// Returns the face normal at the trail-hi corner.
    ///
    /// Only meaningful on the first quad of a strip.
    pub fn normal_trail_hi_half_area_average(&self) -> Normal3 {
        debug_assert!(self.is_trail_edge(), "trail average off trail edge");
        self.normal_trail_hi()
    }

    //
    // Averages over every triangle sharing a corner
    //
    // These sum the faces actually drawn, split along the trail-hi to
    // lead-lo diagonal. An interior vertex is shared by six of them.
    //

    /// Returns the area-weighted sum of the normals of every drawn
    /// triangle sharing the lead-lo corner.
    ///
    /// Both strips sharing a sheet vertex sum the same triangles from the
    /// same points, so the vertex gets the same normal from either one.
    pub fn normal_lead_lo_area_average(&self) -> Normal3 {
        fan(
            self.lead_lo,
            [
                self.lead_lead_lo,
                Some(self.lead_hi),
                Some(self.trail_hi),
                Some(self.trail_lo),
                self.lead_lo_lo,
                self.lead_lead_lo_lo,
            ],
        )
    }
    /// Returns the area-weighted sum of the normals of every drawn
    /// triangle sharing the lead-hi corner.
    pub fn normal_lead_hi_area_average(&self) -> Normal3 {
        fan(
            self.lead_hi,
            [
                self.lead_lead_hi,
                self.lead_hi_hi,
                self.trail_hi_hi,
                Some(self.trail_hi),
                Some(self.lead_lo),
                self.lead_lead_lo,
            ],
        )
    }
    /// Returns the area-weighted sum of the normals of every drawn
    /// triangle sharing the trail-lo corner.
    ///
    /// Only meaningful on the first quad of a strip, where no column
    /// lies behind the trail.
    pub fn normal_trail_lo_area_average(&self) -> Normal3 {
        debug_assert!(self.is_trail_edge(), "trail average off trail edge");
        fan(
            self.trail_lo,
            [
                Some(self.lead_lo),
                Some(self.trail_hi),
                None,
                None,
                self.trail_lo_lo,
                self.lead_lo_lo,
            ],
        )
    }
    /// Returns the area-weighted sum of the normals of every drawn
    /// triangle sharing the trail-hi corner.
    ///
    /// Only meaningful on the first quad of a strip.
    pub fn normal_trail_hi_area_average(&self) -> Normal3 {
        debug_assert!(self.is_trail_edge(), "trail average off trail edge");
        fan(
            self.trail_hi,
            [
                Some(self.lead_hi),
                self.trail_hi_hi,
                None,
                None,
                Some(self.trail_lo),
                Some(self.lead_lo),
            ],
        )
    }

    fn lead_lo_strip(&self) -> [Option<Normal3>; 2] {
        let v = self.lead_lo;
        [
            Some(self.normal_lead_lo()),
            self.lead_lead_lo.map(|next| face(v, next, self.lead_hi)),
        ]
    }
    fn lead_hi_strip(&self) -> [Option<Normal3>; 2] {
        let v = self.lead_hi;
        [
            Some(self.normal_lead_hi()),
            self.lead_lead_hi.map(|next| face(v, self.lead_lo, next)),
        ]
    }
}

/// Returns row `i` of `sheet`, cut to `cols` samples.
#[inline]
fn row_of<S: Sheet + ?Sized>(sheet: &S, i: usize, cols: usize) -> &[f32] {
    &sheet.row(i)[..cols]
}

/// Sums the normals of the triangles fanning out from `v`.
///
/// `ring` lists the six neighbours of a sheet vertex counter-clockwise,
/// starting from the one along +x: +x, +y, +y-x, -x, -y, -y+x. Every
/// triangle with both of its other vertices present contributes.
fn fan(v: Pt3, ring: [Option<Pt3>; 6]) -> Normal3 {
    let tris = (0..6).filter_map(|i| {
        let (a, b) = (ring[i]?, ring[(i + 1) % 6]?);
        Some(face(v, a, b))
    });
    sum_any_length(tris)
}

impl<S: ?Sized> Debug for Window<'_, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("row_pos", &self.row_pos)
            .field("col_pos", &self.col_pos)
            .field("quad", &[self.trail_lo, self.lead_lo, self.lead_hi, self.trail_hi])
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use hs::assert_approx_eq;
    use hs::math::{normal::FALLBACK, pt3};
    use hs::util::buf::Buf2;

    use super::*;

    /// Settings that map sample (r, c, h) to point (c, r, h).
    fn identity(rows: usize, cols: usize) -> Settings {
        let mut s = Settings::default();
        s.set_x_lo(0.0)
            .and_then(|s| s.set_y_lo(0.0))
            .and_then(|s| s.set_x_hi((cols - 1) as f32))
            .and_then(|s| s.set_y_hi((rows - 1) as f32))
            .and_then(|s| s.set_z_lo_draw(0.0))
            .and_then(|s| s.set_z_hi_draw(1.0))
            .unwrap();
        s
    }

    /// Calls `f` at every quad of `sheet`.
    fn walk<S: Sheet>(s: &Settings, sheet: &S, mut f: impl FnMut(&Window<S>)) {
        let Some(mut win) = Window::init_yx(s, sheet) else {
            return;
        };
        loop {
            if win.init_x() {
                loop {
                    f(&win);
                    if !win.next_x() {
                        break;
                    }
                }
            }
            if !win.next_yx() {
                break;
            }
        }
    }

    fn plane(rows: usize, cols: usize, a: f32, b: f32) -> Buf2<f32> {
        Buf2::new_with(cols, rows, |c, r| a * c as f32 + b * r as f32)
    }

    #[test]
    fn pos_new() {
        assert_eq!(Pos::new(0, 1), Pos::Only);
        assert_eq!(Pos::new(0, 3), Pos::First);
        assert_eq!(Pos::new(1, 3), Pos::Interior);
        assert_eq!(Pos::new(2, 3), Pos::Last);
        assert!(Pos::Only.is_first() && Pos::Only.is_last());
        assert!(!Pos::Interior.is_first() && !Pos::Interior.is_last());
    }

    #[test]
    fn too_small_sheets_have_no_window() {
        let s = Settings::default();
        for (rows, cols) in [(0, 0), (0, 5), (5, 0), (1, 1), (1, 5), (5, 1)] {
            let sheet = Buf2::<f32>::new_default(cols, rows);
            assert!(Window::init_yx(&s, &sheet).is_none(), "{rows}×{cols}");
        }
    }

    #[test]
    fn row_indices_slide_and_clamp() {
        let sheet = Buf2::<f32>::new_default(2, 4);
        let s = Settings::default();
        let mut win = Window::init_yx(&s, &sheet).unwrap();

        let idx = |lo_lo, lo, hi, hi_hi| RowIndices { lo_lo, lo, hi, hi_hi, end: 4 };
        assert_eq!(win.row_indices(), idx(0, 0, 1, 2));
        assert_eq!(win.row_pos(), Pos::First);
        assert!(win.next_yx());
        assert_eq!(win.row_indices(), idx(0, 1, 2, 3));
        assert_eq!(win.row_pos(), Pos::Interior);
        assert!(win.next_yx());
        assert_eq!(win.row_indices(), idx(1, 2, 3, 3));
        assert_eq!(win.row_pos(), Pos::Last);
        assert!(!win.next_yx());
        assert_eq!(win.row_indices(), idx(1, 2, 3, 3));
    }

    #[test]
    fn col_indices_slide_and_clamp() {
        let sheet = Buf2::<f32>::new_default(4, 2);
        let s = Settings::default();
        let mut win = Window::init_yx(&s, &sheet).unwrap();
        assert!(win.init_x());

        let idx = |trail, lead, lead_lead| ColIndices { trail, lead, lead_lead, end: 4 };
        assert_eq!(win.col_indices(), idx(0, 1, 2));
        assert!(win.next_x());
        assert_eq!(win.col_indices(), idx(1, 2, 3));
        assert!(win.next_x());
        assert_eq!(win.col_indices(), idx(2, 3, 3));
        assert!(win.is_lead_edge());
        assert!(!win.next_x());
        assert_eq!(win.col(), 2);
    }

    #[test]
    fn single_quad_is_every_edge() {
        let sheet = Buf2::<f32>::new_default(2, 2);
        let s = Settings::default();
        let mut n = 0;
        walk(&s, &sheet, |w| {
            n += 1;
            assert_eq!((w.row_pos(), w.col_pos()), (Pos::Only, Pos::Only));
            assert!(w.is_lo_edge() && w.is_hi_edge());
            assert!(w.is_trail_edge() && w.is_lead_edge());
            assert_eq!(w.pt_trail_lo_lo(), None);
            assert_eq!(w.pt_lead_hi_hi(), None);
            assert_eq!(w.pt_lead_lead_lo(), None);
        });
        assert_eq!(n, 1);
    }

    #[test]
    fn points_follow_sheet() {
        // Height 10 * row + col
        let sheet = Buf2::new_with(4, 4, |c, r| (10 * r + c) as f32);
        let s = identity(4, 4);

        let mut seen = Vec::new();
        walk(&s, &sheet, |w| {
            let (r, c) = (w.row(), w.col());
            let p = |r: usize, c: usize| pt3(c as f32, r as f32, (10 * r + c) as f32);
            assert_eq!(w.pt_trail_lo(), p(r, c));
            assert_eq!(w.pt_lead_lo(), p(r, c + 1));
            assert_eq!(w.pt_trail_hi(), p(r + 1, c));
            assert_eq!(w.pt_lead_hi(), p(r + 1, c + 1));

            let below = r.checked_sub(1);
            let above = (r + 2 < 4).then_some(r + 2);
            let beyond = (c + 2 < 4).then_some(c + 2);
            assert_eq!(w.pt_trail_lo_lo(), below.map(|rr| p(rr, c)));
            assert_eq!(w.pt_lead_lo_lo(), below.map(|rr| p(rr, c + 1)));
            assert_eq!(w.pt_trail_hi_hi(), above.map(|rr| p(rr, c)));
            assert_eq!(w.pt_lead_hi_hi(), above.map(|rr| p(rr, c + 1)));
            assert_eq!(w.pt_lead_lead_lo(), beyond.map(|cc| p(r, cc)));
            assert_eq!(w.pt_lead_lead_hi(), beyond.map(|cc| p(r + 1, cc)));
            seen.push((r, c));
        });
        assert_eq!(seen.len(), 9);
        assert_eq!(seen[0], (0, 0));
        assert_eq!(seen[3], (1, 0));
        assert_eq!(seen[8], (2, 2));
    }

    #[test]
    fn triangles_are_ccw() {
        let sheet = Buf2::<f32>::new_default(2, 2);
        let s = identity(2, 2);
        walk(&s, &sheet, |w| {
            let [a, b, c] = w.tri_lower();
            assert!(face(a, b, c).z > 0.0);
            let [a, b, c] = w.tri_upper();
            assert!(face(a, b, c).z > 0.0);
        });
    }

    #[test]
    fn flat_sheet_normals_point_up() {
        let sheet = Buf2::new_with(5, 4, |_, _| 0.25f32);
        let s = Settings::default();
        walk(&s, &sheet, |w| {
            let mut ns = Vec::from([
                w.normal_lead_lo_unit(),
                w.normal_lead_hi_unit(),
                w.normal_trail_lo_unit(),
                w.normal_trail_hi_unit(),
                calc_vector_unit_length(w.normal_lead_lo_strip_average()),
                calc_vector_unit_length(w.normal_lead_hi_strip_average()),
                calc_vector_unit_length(w.normal_lead_lo_half_area_average()),
                calc_vector_unit_length(w.normal_lead_hi_half_area_average()),
                calc_vector_unit_length(w.normal_lead_lo_area_average()),
                calc_vector_unit_length(w.normal_lead_hi_area_average()),
            ]);
            if w.is_trail_edge() {
                ns.extend([
                    calc_vector_unit_length(w.normal_trail_lo_strip_average()),
                    calc_vector_unit_length(w.normal_trail_hi_strip_average()),
                    calc_vector_unit_length(w.normal_trail_lo_half_area_average()),
                    calc_vector_unit_length(w.normal_trail_hi_half_area_average()),
                    calc_vector_unit_length(w.normal_trail_lo_area_average()),
                    calc_vector_unit_length(w.normal_trail_hi_area_average()),
                ]);
            }
            for n in ns {
                assert_approx_eq!(n, Pt3::Z);
            }
        });
    }

    #[test]
    fn tilted_plane_normals() {
        // z = 0.5x - 0.25y has normal (-0.5, 0.25, 1)
        let sheet = plane(4, 5, 0.5, -0.25);
        let s = identity(4, 5);
        let expected = calc_vector_unit_length(pt3(-0.5, 0.25, 1.0));
        walk(&s, &sheet, |w| {
            for n in [
                w.normal_lead_lo(),
                w.normal_lead_hi(),
                w.normal_trail_lo(),
                w.normal_trail_hi(),
                w.normal_lead_lo_strip_average(),
                w.normal_lead_hi_half_area_average(),
                w.normal_lead_lo_area_average(),
                w.normal_lead_hi_area_average(),
            ] {
                assert_approx_eq!(calc_vector_unit_length(n), expected);
            }
        });
    }

    #[test]
    fn any_length_normals_scale_with_area() {
        let sheet = Buf2::<f32>::new_default(3, 3);
        let s = identity(3, 3);
        walk(&s, &sheet, |w| {
            // Unit cells: each corner triangle has area 0.5
            assert_approx_eq!(w.normal_lead_lo(), pt3(0.0, 0.0, 1.0));
            // Drawn triangles around the vertex: 2 in a corner of the
            // sheet, 3 on a side, 6 inside
            let expected_sum = match (w.is_lo_edge(), w.is_lead_edge()) {
                (true, true) => 2.0,
                (true, false) | (false, true) => 3.0,
                (false, false) => 6.0,
            };
            assert_approx_eq!(w.normal_lead_lo_area_average().z, expected_sum);
            assert_approx_eq!(w.normal_lead_lo_strip_average(), Pt3::Z);
        });
    }

    #[test]
    fn strip_average_ignores_area() {
        // Flat first quad, second quad rising by 1 along x
        let sheet = Buf2::new_with(3, 2, |c, _| if c == 2 { 1.0f32 } else { 0.0 });
        let s = identity(2, 3);
        let mut win = Window::init_yx(&s, &sheet).unwrap();
        assert!(win.init_x());

        // Unit normals (0, 0, 1) and (-1, 0, 1) / √2, averaged
        let h = 0.5 / 2.0f32.sqrt();
        assert_approx_eq!(win.normal_lead_lo_strip_average(), pt3(-h, 0.0, 0.5 + h));
        // Raw normals (0, 0, 1) and (-1, 0, 1), summed
        assert_approx_eq!(win.normal_lead_lo_half_area_average(), pt3(-1.0, 0.0, 2.0));
    }

    #[test]
    fn degenerate_cells_fall_back() {
        // A zero-height box collapses every triangle to a segment
        let sheet = Buf2::<f32>::new_default(3, 3);
        let mut s = Settings::default();
        s.set_xy_draw_ratio(1e-30).unwrap();
        walk(&s, &sheet, |w| {
            assert_eq!(w.normal_lead_lo(), FALLBACK);
            assert_eq!(w.normal_lead_lo_strip_average(), FALLBACK);
            // Sums of fallbacks still point along the fallback
            let n = w.normal_lead_hi_area_average();
            assert_approx_eq!(calc_vector_unit_length(n), FALLBACK);
        });
    }

    #[test]
    fn area_average_matches_across_strips() {
        let sheet = Buf2::new_with(5, 4, |c, r| {
            let (x, y) = (c as f32, r as f32);
            0.3 * x * x - 0.2 * x * y + 0.1 * y * y * y
        });
        let s = identity(4, 5);

        // Normal of vertex (r, c) as lead-hi of strip r - 1
        // and as lead-lo of strip r
        let mut from_below = Buf2::<Pt3>::new_default(5, 4);
        let mut from_above = Buf2::<Pt3>::new_default(5, 4);
        walk(&s, &sheet, |w| {
            let (r, c) = (w.row(), w.col());
            from_above[r][c + 1] = w.normal_lead_lo_area_average();
            from_below[r + 1][c + 1] = w.normal_lead_hi_area_average();
            if w.is_trail_edge() {
                from_above[r][c] = w.normal_trail_lo_area_average();
                from_below[r + 1][c] = w.normal_trail_hi_area_average();
            }
        });
        for r in 1..3 {
            for c in 0..5 {
                assert_approx_eq!(
                    from_below[r][c],
                    from_above[r][c],
                    eps = 1e-4,
                    "vertex ({r}, {c})"
                );
            }
        }
    }

    #[test]
    fn area_average_sums_drawn_triangles() {
        let sheet = Buf2::new_with(4, 4, |c, r| ((c * 7 + r * 3) % 5) as f32 * 0.3);
        let s = identity(4, 4);

        // Add the normal of every drawn triangle to each of its vertices
        let mut sums = Buf2::<Pt3>::new_default(4, 4);
        walk(&s, &sheet, |w| {
            let (r, c) = (w.row(), w.col());
            let [a, b, d] = w.tri_lower();
            for (i, j) in [(r, c), (r, c + 1), (r + 1, c)] {
                sums[i][j] += face(a, b, d);
            }
            let [a, b, d] = w.tri_upper();
            for (i, j) in [(r + 1, c + 1), (r + 1, c), (r, c + 1)] {
                sums[i][j] += face(a, b, d);
            }
        });

        walk(&s, &sheet, |w| {
            let (r, c) = (w.row(), w.col());
            let at = |i: usize, j: usize| sums[i][j];
            assert_approx_eq!(w.normal_lead_lo_area_average(), at(r, c + 1), eps = 1e-4);
            assert_approx_eq!(w.normal_lead_hi_area_average(), at(r + 1, c + 1), eps = 1e-4);
            if w.is_trail_edge() {
                assert_approx_eq!(w.normal_trail_lo_area_average(), at(r, c), eps = 1e-4);
                assert_approx_eq!(w.normal_trail_hi_area_average(), at(r + 1, c), eps = 1e-4);
            }
        });
    }

    #[test]
    fn lead_lead_neighbours_follow_the_walk() {
        let sheet = Buf2::new_with(4, 3, |c, r| (10 * r + c) as f32);
        let mut s = identity(3, 4);
        s.set_z_hi_sheet(100.0).unwrap().set_z_hi_draw(100.0).unwrap();
        walk(&s, &sheet, |w| {
            let (r, c) = (w.row(), w.col());
            let p = |i: usize, j: usize| pt3(j as f32, i as f32, (10 * i + j) as f32);
            let next = !w.is_lead_edge();
            assert_eq!(w.pt_lead_lead_lo_lo(), (next && r > 0).then(|| p(r - 1, c + 2)));
            assert_eq!(w.pt_lead_lead_hi_hi(), (next && r < 1).then(|| p(r + 2, c + 2)));
            assert_eq!(w.pt_lead_lo_lo(), (r > 0).then(|| p(r - 1, c + 1)));
        });
    }

    #[test]
    fn large_box_keeps_normal_direction() {
        let sheet = Buf2::new_with(2, 2, |c, _| c as f32);
        let mut s = Settings::default();
        s.set_x_lo(0.0)
            .and_then(|s| s.set_y_lo(0.0))
            .and_then(|s| s.set_z_lo_draw(0.0))
            .and_then(|s| s.set_x_hi(1e10))
            .and_then(|s| s.set_y_hi(1e10))
            .and_then(|s| s.set_z_hi_draw(1e10))
            .unwrap();
        let win = {
            let mut win = Window::init_yx(&s, &sheet).unwrap();
            assert!(win.init_x());
            win
        };
        let expected = pt3(-1.0, 0.0, 1.0) / 2.0f32.sqrt();
        assert_approx_eq!(win.normal_lead_lo_unit(), expected);
        assert_approx_eq!(calc_vector_unit_length(win.normal_lead_lo_area_average()), expected);
    }

    #[test]
    fn ragged_rows_are_cut_to_shortest() {
        let sheet: Vec<Vec<f32>> = Vec::from([
            Vec::from([0.0, 1.0, 2.0, 3.0]),
            Vec::from([0.0, 1.0, 2.0]),
            Vec::from([0.0, 1.0, 2.0, 3.0, 4.0]),
        ]);
        let s = identity(3, 3);
        let mut quads = 0;
        walk(&s, &sheet, |w| {
            assert!(w.col() < 2);
            assert_eq!(w.col_indices().end, 3);
            quads += 1;
        });
        assert_eq!(quads, 4);
    }

    #[test]
    fn debug_shows_position() {
        let sheet = Buf2::<f32>::new_default(2, 2);
        let s = Settings::default();
        let win = Window::init_yx(&s, &sheet).unwrap();
        let dbg = alloc::format!("{win:?}");
        assert!(dbg.starts_with("Window { rows: RowIndices"), "{dbg}");
    }
}
