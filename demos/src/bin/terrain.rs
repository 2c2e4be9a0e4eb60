//! Builds a noise terrain, strips it into a mesh and writes it as OBJ.
//!
//! Usage: `terrain [ROWS [COLS [OUT]]]`, by default a 64×64 sheet written
//! to `terrain.obj`. Set `HEIGHTSHEET_LOG` to a level such as `debug` to
//! see what the draw pass does.

use std::{env, fs, process::exit, str::FromStr};

use log::{LevelFilter, Log, Metadata, Record, info};

use hs::math::{lerp, rgba};
use hs::prelude::*;
use hs_geom::prelude::*;

fn main() {
    init_log();

    let mut args = env::args().skip(1);
    let rows = arg(args.next(), 64);
    let cols = arg(args.next(), 64);
    let out = args.next().unwrap_or_else(|| "terrain.obj".into());

    let sheet = Buf2::new_with(cols, rows, |x, y| {
        fbm(x as f32 / 16.0, y as f32 / 16.0, 4)
    });

    let mut settings = Settings::default();
    settings
        .set_x_lo(-2.0)
        .and_then(|s| s.set_x_hi(2.0))
        .and_then(|s| s.set_y_lo(-2.0))
        .and_then(|s| s.set_y_hi(2.0))
        .and_then(|s| s.set_z_lo_draw(0.0))
        .and_then(|s| s.set_z_hi_draw(0.6))
        .and_then(|s| s.set_z_lo_sheet(-1.0))
        .and_then(|s| s.set_z_hi_sheet(1.0))
        .expect("terrain settings should be valid")
        .set_color(rgba(0.4, 0.6, 0.3, 1.0));

    let mut surf = MeshSurface::new(NormalMode::AreaAverage);
    let stats = draw_surface(&settings, &sheet, &mut surf)
        .expect("terrain settings should be valid");
    info!("{stats}");

    let mesh = surf.into_mesh();
    let mut obj = String::new();
    mesh.write_obj(&mut obj)
        .expect("writing to a string should not fail");
    fs::write(&out, obj).expect("should write output file");

    eprintln!(
        "wrote {} vertices, {} faces to {out}",
        mesh.verts.len(),
        mesh.faces.len()
    );
}

fn arg(s: Option<String>, default: usize) -> usize {
    let Some(s) = s else { return default };
    s.parse().unwrap_or_else(|_| {
        eprintln!("usage: terrain [ROWS [COLS [OUT]]]");
        eprintln!("not a size: {s}");
        exit(2)
    })
}

//
// Noise
//

/// Sums `octaves` layers of gradient noise, each of double frequency and
/// half amplitude. The result is roughly within -1..1.
fn fbm(x: f32, y: f32, octaves: u32) -> f32 {
    let (mut sum, mut amp, mut freq) = (0.0, 0.5, 1.0);
    for _ in 0..octaves {
        sum += amp * noise(x * freq, y * freq);
        amp *= 0.5;
        freq *= 2.0;
    }
    sum * 2.0
}

/// Returns the two-dimensional gradient noise value at (x, y).
fn noise(x: f32, y: f32) -> f32 {
    let (x0, y0) = (x.floor(), y.floor());
    let (u, v) = (x - x0, y - y0);
    let (i, j) = (x0 as i32, y0 as i32);

    let dot = |di: i32, dj: i32| {
        let (gx, gy) = grad(i + di, j + dj);
        gx * (u - di as f32) + gy * (v - dj as f32)
    };
    let (su, sv) = (smoothstep(u), smoothstep(v));
    lerp(sv, lerp(su, dot(0, 0), dot(1, 0)), lerp(su, dot(0, 1), dot(1, 1)))
}

fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

fn grad(i: i32, j: i32) -> (f32, f32) {
    const A: f32 = 1.237;
    const B: f32 = 0.513;
    const GRADS: [(f32, f32); 8] = [
        (A, B),
        (B, A),
        (-B, A),
        (-A, B),
        (-A, -B),
        (-B, -A),
        (B, -A),
        (A, -B),
    ];
    let mut h = (i as u32).wrapping_mul(0x27d4_eb2d)
        ^ (j as u32).wrapping_mul(0x1656_67b1);
    h ^= h >> 15;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    GRADS[h as usize & 0x7]
}

//
// Logging
//

/// Writes log records to stderr.
struct StderrLog(LevelFilter);

impl Log for StderrLog {
    fn enabled(&self, meta: &Metadata) -> bool {
        meta.level() <= self.0
    }
    fn log(&self, rec: &Record) {
        if self.enabled(rec.metadata()) {
            eprintln!("[{:5} {}] {}", rec.level(), rec.target(), rec.args());
        }
    }
    fn flush(&self) {}
}

/// Installs a [`StderrLog`] at the level named by `HEIGHTSHEET_LOG`.
///
/// Logs at `info` level if the variable is unset or unparseable.
fn init_log() {
    let level = env::var("HEIGHTSHEET_LOG")
        .ok()
        .and_then(|s| LevelFilter::from_str(&s).ok())
        .unwrap_or(LevelFilter::Info);
    if log::set_boxed_logger(Box::new(StderrLog(level))).is_ok() {
        log::set_max_level(level);
    }
}
