//! Drawing a sheet as a sequence of quad strips.
//!
//! [`draw_surface`] walks a sheet with a [`Window`] and hands every quad
//! to a [`Surface`], which turns it into whatever geometry its consumer
//! needs. The engine itself produces no output.

use core::fmt::{self, Display, Formatter};
use core::ops::{AddAssign, ControlFlow};
use core::time::Duration;
#[cfg(feature = "std")]
use std::time::Instant;

use log::{debug, trace, warn};

use crate::error::Result;
use crate::mapper::{Settings, VertexEntryMode};
use crate::sheet::Sheet;
use crate::window::Window;

/// Trait for consumers of the quads of a sheet.
///
/// Closures taking `&Window` and returning `ControlFlow<()>` implement
/// this trait, with the strip brackets left as no-ops.
///
/// # Type parameters
/// * `S`: The type of the sheet being drawn.
pub trait Surface<S: ?Sized> {
    /// Called before the first quad of each strip.
    fn begin_strip(&mut self, mode: VertexEntryMode, win: &Window<'_, S>) {
        let _ = (mode, win);
    }

    /// Called once for every quad, with `win` positioned at the quad.
    ///
    /// Returning [`ControlFlow::Break`] stops the draw pass once the
    /// current strip has been closed with [`end_strip`][Self::end_strip].
    fn continue_strip(&mut self, win: &Window<'_, S>) -> ControlFlow<()>;

    /// Called after the last quad of each strip.
    fn end_strip(&mut self, mode: VertexEntryMode, win: &Window<'_, S>) {
        let _ = (mode, win);
    }
}

/// Counts of what a draw pass did.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Stats {
    /// Number of strips begun.
    pub strips: usize,
    /// Number of quads handed to the surface.
    pub quads: usize,
    /// Whether the surface stopped the pass early.
    pub cancelled: bool,
    /// Time spent drawing. Always zero without the `std` feature.
    pub time: Duration,

    #[cfg(feature = "std")]
    start: Option<Instant>,
}

impl<S: ?Sized, F> Surface<S> for F
where
    F: FnMut(&Window<'_, S>) -> ControlFlow<()>,
{
    fn continue_strip(&mut self, win: &Window<'_, S>) -> ControlFlow<()> {
        self(win)
    }
}

/// Draws `sheet` with `settings`, calling `surface` once per quad.
///
/// The quads are visited strip by strip from the lo row up, and within a
/// strip from the first column on. Each strip is bracketed by calls to
/// [`Surface::begin_strip`] and [`Surface::end_strip`], passing the
/// vertex entry mode of `settings`.
///
/// A sheet with fewer than two rows or columns is drawn by doing nothing.
///
/// # Errors
/// If `settings` fail [validation][Settings::validate]. The surface is
/// not called in that case.
///
/// # Examples
/// ```
/// use core::ops::ControlFlow::Continue;
/// use hs::util::buf::Buf2;
/// use heightsheet_geom::{mapper::Settings, strip::draw_surface, window::Window};
///
/// let sheet = Buf2::<f32>::new_default(3, 3);
/// let mut corners = vec![];
/// let stats = draw_surface(
///     &Settings::default(),
///     &sheet,
///     &mut |w: &Window<Buf2<f32>>| {
///         corners.push(w.pt_trail_lo());
///         Continue(())
///     },
/// )?;
/// assert_eq!((stats.strips, stats.quads), (2, 4));
/// assert_eq!(corners.len(), 4);
/// # Ok::<(), heightsheet_geom::error::Error>(())
/// ```
pub fn draw_surface<S, F>(
    settings: &Settings,
    sheet: &S,
    surface: &mut F,
) -> Result<Stats>
where
    S: Sheet + ?Sized,
    F: Surface<S> + ?Sized,
{
    settings.validate()?;

    let (rows, cols) = sheet.size();
    let mut stats = Stats::start();
    let Some(mut win) = Window::init_yx(settings, sheet) else {
        debug!("{rows}×{cols} sheet has no quads");
        return Ok(stats.finish());
    };
    debug!("drawing {rows}×{cols} sheet, {:?}", win.layout());
    if !win.z_map().is_active() {
        warn!(
            "height conversion inactive, all samples map to z = {}",
            settings.extent_lo().z
        );
    }

    loop {
        stats += draw_surface_row(&mut win, surface);
        if stats.cancelled {
            debug!("cancelled at strip {}", win.row());
            break;
        }
        if !win.next_yx() {
            break;
        }
    }
    let stats = stats.finish();
    debug!("drew {stats}");
    Ok(stats)
}

/// Draws the strip `win` is positioned at.
///
/// Calls [`Surface::continue_strip`] for each quad of the strip, between
/// calls to [`Surface::begin_strip`] and [`Surface::end_strip`]. Leaves
/// `win` at the last quad visited.
pub fn draw_surface_row<S, F>(win: &mut Window<'_, S>, surface: &mut F) -> Stats
where
    S: Sheet + ?Sized,
    F: Surface<S> + ?Sized,
{
    let mut stats = Stats::new();
    if !win.init_x() {
        return stats;
    }
    let mode = win.mode();
    trace!("strip {} of {:?}", win.row(), win.row_pos());

    surface.begin_strip(mode, win);
    stats.strips = 1;
    loop {
        stats.quads += 1;
        if surface.continue_strip(win).is_break() {
            stats.cancelled = true;
            break;
        }
        if !win.next_x() {
            break;
        }
    }
    surface.end_strip(mode, win);
    stats
}

//
// Inherent impls
//

impl Stats {
    /// Creates a new zeroed `Stats` instance.
    pub fn new() -> Self {
        Self::default()
    }
    /// Creates a `Stats` instance that records the time of its creation.
    ///
    /// Call [`finish`][Self::finish] to write the elapsed time to
    /// `self.time`. Equivalent to [`Stats::new`] unless the `std` feature
    /// is enabled.
    pub fn start() -> Self {
        Self {
            #[cfg(feature = "std")]
            start: Some(Instant::now()),
            ..Self::default()
        }
    }
    /// Stops the timer and records the elapsed time to `self.time`.
    ///
    /// No-op if the timer was not running.
    pub fn finish(self) -> Self {
        Self {
            #[cfg(feature = "std")]
            time: self.start.map(|st| st.elapsed()).unwrap_or(self.time),
            #[cfg(feature = "std")]
            start: None,
            ..self
        }
    }
}

//
// Foreign trait impls
//

impl AddAssign for Stats {
    /// Adds the counts of `other` to `self`.
    ///
    /// The sum is cancelled if either operand is.
    fn add_assign(&mut self, other: Self) {
        self.strips += other.strips;
        self.quads += other.quads;
        self.cancelled |= other.cancelled;
        self.time += other.time;
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} strips, {} quads", self.strips, self.quads)?;
        if self.cancelled {
            f.write_str(" (cancelled)")?;
        }
        if !self.time.is_zero() {
            write!(f, " in {:.2?}", self.time)?;
        }
        Ok(())
    }
}
