//! Strip iteration and normal averaging for height-field sheets.
//!
//! A *sheet* is a grid of height samples. This crate maps the samples to
//! drawing coordinates ([`mapper`]), walks the grid one quad at a time
//! with the neighbourhood needed for smooth normals ([`window`]), and
//! feeds the quads strip by strip to a pluggable consumer ([`strip`]).
//! [`mesh`] has a consumer that builds an indexed triangle mesh.
//!
//! # Examples
//! ```
//! use hs::util::buf::Buf2;
//! use heightsheet_geom::prelude::*;
//!
//! let sheet = Buf2::new_with(8, 8, |x, y| ((x ^ y) & 1) as f32);
//! let mut settings = Settings::default();
//! settings.set_z_hi_draw(0.0)?;
//!
//! let mut surf = MeshSurface::new(NormalMode::AreaAverage);
//! let stats = draw_surface(&settings, &sheet, &mut surf)?;
//! assert_eq!(stats.quads, 49);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Crate features
//!
//! * `std`:
//!   Uses the standard library's floating-point functions and records
//!   draw pass timings in [`Stats`][strip::Stats]. If disabled, the crate
//!   only depends on `core` and `alloc`.

#![no_std]

extern crate alloc;
extern crate core;
#[cfg(any(feature = "std", test))]
extern crate std;

pub mod error;
pub mod mapper;
pub mod mesh;
pub mod sheet;
pub mod strip;
pub mod window;

pub mod prelude {
    pub use crate::error::{ConfigError, Error};
    pub use crate::mapper::{CellLayout, Settings, VertexEntryMode, ZMap};
    pub use crate::mesh::{Mesh, MeshSurface, NormalMode};
    pub use crate::sheet::Sheet;
    pub use crate::strip::{Stats, Surface, draw_surface};
    pub use crate::window::{Pos, Window};
}
