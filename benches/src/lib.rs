//! Shared inputs for the heightsheet benchmarks.

use hs::util::buf::Buf2;

/// Returns a `rows`×`cols` sheet of smooth waves with heights in -1..1.
pub fn wavy_sheet(rows: usize, cols: usize) -> Buf2<f32> {
    Buf2::new_with(cols, rows, |x, y| {
        let (x, y) = (x as f32 * 0.21, y as f32 * 0.13);
        0.5 * (x.sin() + (x + y).cos())
    })
}

/// Returns settings mapping the -1..1 heights of [`wavy_sheet`] to the
/// default box.
pub fn settings() -> hs_geom::mapper::Settings {
    let mut s = hs_geom::mapper::Settings::default();
    s.set_z_lo_sheet(-1.0)
        .and_then(|s| s.set_z_hi_sheet(1.0))
        .expect("heights should be finite");
    s
}
