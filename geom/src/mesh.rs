//! Collecting the quads of a sheet into a triangle mesh.

use alloc::vec::Vec;
use core::fmt::{self, Write};
use core::ops::ControlFlow;

use hs::math::normal::{Normal3, calc_vector_unit_length};
use hs::math::{Color4f, Pt3};

use crate::mapper::VertexEntryMode;
use crate::strip::Surface;
use crate::window::Window;

/// A mesh vertex with a position, a normal, and a color.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    pub pos: Pt3,
    pub normal: Normal3,
    pub color: Color4f,
}

/// Triangle, defined by three vertex indices.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub struct Tri(pub [usize; 3]);

/// A triangle mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    /// The faces of the mesh, with each face a triplet of indices
    /// to the `verts` vector, wound counter-clockwise.
    pub faces: Vec<Tri>,
    /// The vertices of the mesh.
    pub verts: Vec<Vertex>,
}

/// Which of the window's normals a [`MeshSurface`] assigns to vertices.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum NormalMode {
    /// Corner face normals, kept at their area-scaled length.
    Face,
    /// Corner face normals scaled to unit length.
    Unit,
    /// Unweighted averages of the normals along each strip.
    StripAverage,
    /// Area-weighted averages of the normals along each strip.
    HalfAreaAverage,
    /// Area-weighted averages of the normals of every quad around
    /// a vertex. Gives the smoothest shading.
    #[default]
    AreaAverage,
}

/// A [`Surface`] that builds a [`Mesh`] out of the quads it is given.
///
/// Each strip adds two vertices per sheet column, one on the lo row and
/// one on the hi row, and two triangles per quad. Rows shared by two
/// strips are thus stored twice, once per strip, so that a strip can
/// be drawn on its own.
///
/// # Examples
/// ```
/// use hs::util::buf::Buf2;
/// use heightsheet_geom::mapper::Settings;
/// use heightsheet_geom::mesh::{MeshSurface, NormalMode};
/// use heightsheet_geom::strip::draw_surface;
///
/// let sheet = Buf2::new_with(4, 3, |x, y| (x * y) as f32 * 0.1);
/// let mut surf = MeshSurface::new(NormalMode::AreaAverage);
/// draw_surface(&Settings::default(), &sheet, &mut surf)?;
///
/// let mesh = surf.into_mesh();
/// assert_eq!(mesh.verts.len(), 2 * 4 * 2);
/// assert_eq!(mesh.faces.len(), 2 * 3 * 2);
/// # Ok::<(), heightsheet_geom::error::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct MeshSurface {
    mesh: Mesh,
    normals: NormalMode,
}

//
// Inherent impls
//

impl Mesh {
    /// Creates a new triangle mesh with the given faces and vertices.
    ///
    /// # Panics
    /// If any of the vertex indices in `faces` ≥ `verts.len()`.
    pub fn new<F, V>(faces: F, verts: V) -> Self
    where
        F: IntoIterator<Item = Tri>,
        V: IntoIterator<Item = Vertex>,
    {
        let faces: Vec<_> = faces.into_iter().collect();
        let verts: Vec<_> = verts.into_iter().collect();

        for (i, Tri(vs)) in faces.iter().enumerate() {
            assert!(
                vs.iter().all(|&j| j < verts.len()),
                "vertex index out of bounds at faces[{i}]: {vs:?}"
            )
        }
        Self { faces, verts }
    }

    /// Writes `self` to `out` in the Wavefront OBJ format.
    ///
    /// Emits a `v` and a `vn` line per vertex and an `f v//vn` line per
    /// face. OBJ indices are one-based.
    pub fn write_obj<W: Write + ?Sized>(&self, out: &mut W) -> fmt::Result {
        writeln!(
            out,
            "# {} vertices, {} faces",
            self.verts.len(),
            self.faces.len()
        )?;
        for Vertex { pos: p, .. } in &self.verts {
            writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
        }
        for Vertex { normal: n, .. } in &self.verts {
            writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
        }
        for Tri([a, b, c]) in &self.faces {
            let (a, b, c) = (a + 1, b + 1, c + 1);
            writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}")?;
        }
        Ok(())
    }
}

impl MeshSurface {
    /// Returns an empty surface whose vertices get `normals`.
    pub fn new(normals: NormalMode) -> Self {
        Self { mesh: Mesh::default(), normals }
    }
    /// Returns the mesh built so far.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }
    /// Returns the mesh built.
    pub fn into_mesh(self) -> Mesh {
        self.mesh
    }

    fn push(&mut self, pos: Pt3, normal: Normal3, color: Color4f) -> usize {
        let normal = match self.normals {
            NormalMode::Face => normal,
            _ => calc_vector_unit_length(normal),
        };
        self.mesh.verts.push(Vertex { pos, normal, color });
        self.mesh.verts.len() - 1
    }
}

fn trail_normals<S: ?Sized>(mode: NormalMode, w: &Window<'_, S>) -> [Normal3; 2] {
    use NormalMode::*;
    match mode {
        Face => [w.normal_trail_lo(), w.normal_trail_hi()],
        Unit => [w.normal_trail_lo_unit(), w.normal_trail_hi_unit()],
        StripAverage => [
            w.normal_trail_lo_strip_average(),
            w.normal_trail_hi_strip_average(),
        ],
        HalfAreaAverage => [
            w.normal_trail_lo_half_area_average(),
            w.normal_trail_hi_half_area_average(),
        ],
        AreaAverage => [
            w.normal_trail_lo_area_average(),
            w.normal_trail_hi_area_average(),
        ],
    }
}

fn lead_normals<S: ?Sized>(mode: NormalMode, w: &Window<'_, S>) -> [Normal3; 2] {
    use NormalMode::*;
    match mode {
        Face => [w.normal_lead_lo(), w.normal_lead_hi()],
        Unit => [w.normal_lead_lo_unit(), w.normal_lead_hi_unit()],
        StripAverage => [
            w.normal_lead_lo_strip_average(),
            w.normal_lead_hi_strip_average(),
        ],
        HalfAreaAverage => [
            w.normal_lead_lo_half_area_average(),
            w.normal_lead_hi_half_area_average(),
        ],
        AreaAverage => [
            w.normal_lead_lo_area_average(),
            w.normal_lead_hi_area_average(),
        ],
    }
}

//
// Local trait impls
//

impl<S: ?Sized> Surface<S> for MeshSurface {
    fn begin_strip(&mut self, _: VertexEntryMode, win: &Window<'_, S>) {
        let quads = win.col_indices().end - 1;
        self.mesh.verts.reserve(2 * (quads + 1));
        self.mesh.faces.reserve(2 * quads);
    }

    fn continue_strip(&mut self, win: &Window<'_, S>) -> ControlFlow<()> {
        let color = win.color();
        if win.is_trail_edge() {
            let [lo, hi] = trail_normals(self.normals, win);
            self.push(win.pt_trail_lo(), lo, color);
            self.push(win.pt_trail_hi(), hi, color);
        }
        let [lo, hi] = lead_normals(self.normals, win);
        let ll = self.push(win.pt_lead_lo(), lo, color);
        let lh = self.push(win.pt_lead_hi(), hi, color);
        let (tl, th) = (ll - 2, ll - 1);

        self.mesh.faces.push(Tri([tl, ll, th]));
        self.mesh.faces.push(Tri([lh, th, ll]));
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use hs::assert_approx_eq;
    use hs::math::{color::WHITE, normal::calc_normal_any_length, pt3, rgba};
    use hs::util::buf::Buf2;

    use crate::mapper::Settings;
    use crate::strip::draw_surface;

    use super::*;

    fn build(sheet: &Buf2<f32>, s: &Settings, normals: NormalMode) -> Mesh {
        let mut surf = MeshSurface::new(normals);
        draw_surface(s, sheet, &mut surf).unwrap();
        surf.into_mesh()
    }

    #[test]
    #[should_panic]
    fn mesh_new_panics_if_vertex_index_oob() {
        let v = Vertex { pos: Pt3::ZERO, normal: Pt3::Z, color: WHITE };
        _ = Mesh::new([Tri([0, 1, 3])], [v, v, v]);
    }

    #[test]
    fn counts_per_strip() {
        let sheet = Buf2::<f32>::new_default(4, 3);
        let mesh = build(&sheet, &Settings::default(), NormalMode::Unit);
        assert_eq!(mesh.verts.len(), 2 * 4 * 2);
        assert_eq!(mesh.faces.len(), 2 * 3 * 2);
        assert!(mesh.faces.iter().all(|Tri(vs)| vs.iter().all(|&i| i < 16)));
    }

    #[test]
    fn empty_sheet_empty_mesh() {
        let sheet = Buf2::<f32>::new_default(1, 5);
        assert_eq!(
            build(&sheet, &Settings::default(), NormalMode::Unit),
            Mesh::default()
        );
    }

    #[test]
    fn vertex_layout_of_single_quad() {
        let sheet = Buf2::<f32>::new_default(2, 2);
        let mut s = Settings::default();
        s.set_color(rgba(1.0, 0.0, 0.0, 1.0));
        let mesh = build(&sheet, &s, NormalMode::Unit);

        let pos: Vec<_> = mesh.verts.iter().map(|v| v.pos).collect();
        assert_eq!(
            pos,
            [
                pt3(-1.0, -1.0, -1.0), // trail lo
                pt3(-1.0, 1.0, -1.0),  // trail hi
                pt3(1.0, -1.0, -1.0),  // lead lo
                pt3(1.0, 1.0, -1.0),   // lead hi
            ]
        );
        assert_eq!(mesh.faces, [Tri([0, 2, 1]), Tri([3, 1, 2])]);
        assert!(mesh.verts.iter().all(|v| v.color == rgba(1.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn faces_face_up_on_flat_sheet() {
        let sheet = Buf2::new_with(5, 4, |_, _| 0.5f32);
        let mesh = build(&sheet, &Settings::default(), NormalMode::AreaAverage);
        for Tri([a, b, c]) in &mesh.faces {
            let [a, b, c] = [a, b, c].map(|&i| mesh.verts[i].pos);
            assert!(calc_normal_any_length(a, b, c).z > 0.0);
        }
        for v in &mesh.verts {
            assert_approx_eq!(v.normal, Pt3::Z);
        }
    }

    #[test]
    fn normals_are_unit_except_face() {
        let sheet = Buf2::new_with(4, 4, |x, y| (x as f32 * 0.7).sin() + y as f32 * 0.3);
        let s = Settings::default();
        for mode in [
            NormalMode::Unit,
            NormalMode::StripAverage,
            NormalMode::HalfAreaAverage,
            NormalMode::AreaAverage,
        ] {
            for v in build(&sheet, &s, mode).verts {
                assert_approx_eq!(v.normal.magnitude(), 1.0, "{mode:?}");
            }
        }
        // Cells are 2/3 × 2/3, so corner triangles have area 2/9
        let flat = Buf2::<f32>::new_default(4, 4);
        for v in build(&flat, &s, NormalMode::Face).verts {
            assert_approx_eq!(v.normal, pt3(0.0, 0.0, 4.0 / 9.0));
        }
    }

    #[test]
    fn shared_rows_get_equal_smooth_normals() {
        let sheet = Buf2::new_with(5, 3, |x, y| {
            let (x, y) = (x as f32, y as f32);
            0.2 * x * x - 0.1 * x * y + 0.05 * y * y
        });
        let mesh = build(&sheet, &Settings::default(), NormalMode::AreaAverage);

        // Hi row of strip 0 and lo row of strip 1 are both sheet row 1
        let (strip0, strip1) = mesh.verts.split_at(10);
        for c in 0..5 {
            let (a, b) = (strip0[2 * c + 1], strip1[2 * c]);
            assert_eq!(a.pos, b.pos);
            assert_approx_eq!(a.normal, b.normal, eps = 1e-4);
        }
    }

    #[test]
    fn obj_output() {
        let sheet = Buf2::<f32>::new_default(2, 2);
        let mesh = build(&sheet, &Settings::default(), NormalMode::Unit);
        let mut out = String::new();
        mesh.write_obj(&mut out).unwrap();

        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 1 + 4 + 4 + 2);
        assert_eq!(lines[0], "# 4 vertices, 2 faces");
        assert_eq!(lines[1], "v -1 -1 -1");
        assert_eq!(lines[5], "vn 0 0 1");
        assert_eq!(lines[9], "f 1//1 3//3 2//2");
        assert_eq!(lines[10], "f 4//4 2//2 3//3");
    }
}
