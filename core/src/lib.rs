//! ```text
//!     __         _       __    __       __              __
//!    / /_  ___  (_)___ _/ /_  / /______/ /_  ___  ___  / /_
//!   / __ \/ _ \/ / __ `/ __ \/ __/ ___/ __ \/ _ \/ _ \/ __/
//!  / / / /  __/ / /_/ / / / / /_(__  ) / / /  __/  __/ /_
//! /_/ /_/\___/_/\__, /_/ /_/\__/____/_/ /_/\___/\___/\__/
//!              /____/
//! ```
//!
//! Core functionality of the `heightsheet` project.
//!
//! Includes the small math library the strip engine is built on (points,
//! never-zero normals, colors, approximate equality) and two-dimensional
//! buffers for holding height samples.
//!
//! # Crate features
//!
//! * `std`:
//!   Uses the floating-point functions of the standard library, which are
//!   exact to within an ulp. If this feature is disabled, the crate only
//!   depends on `core` and `alloc`.
//!
//! * `libm`:
//!   Provides software implementations of floating-point functions via the
//!   [libm](https://crates.io/crates/libm) crate.
//!
//! * `mm`:
//!   Provides fast approximate implementations of floating-point functions
//!   via the [micromath](https://crates.io/crates/micromath) crate.
//!
//! All features are disabled by default, in which case a fast but less
//! accurate fallback square root is used.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;
extern crate core;

pub mod math;
pub mod util;

pub mod prelude {
    pub use crate::math::{
        ApproxEq, Color3, Color3f, Color4, Color4f, Normal3, Pt3, gray, pt3,
        rgb, rgba,
    };

    pub use crate::util::buf::{AsSlice2, Buf2, Slice2};
}
