//! Read-only access to height samples.

use alloc::vec::Vec;

use hs::util::buf::{Buf2, Slice2};

/// A rectangular grid of height samples, indexed by (row, column).
///
/// Rows run along y and columns along x once the sheet is mapped to
/// drawing coordinates. A sheet with fewer than two rows or two columns
/// holds no quads and draws nothing.
pub trait Sheet {
    /// Returns the number of rows and columns, in that order.
    fn size(&self) -> (usize, usize);

    /// Returns row `i`, a slice of at least [`cols`][Self::cols] samples.
    ///
    /// Samples past `cols` are ignored. Called once per row and pass, so
    /// it should not need to look at other rows.
    ///
    /// # Panics
    /// If `i >= self.rows()`.
    fn row(&self, i: usize) -> &[f32];

    /// Returns the number of rows.
    fn rows(&self) -> usize {
        self.size().0
    }
    /// Returns the number of columns.
    fn cols(&self) -> usize {
        self.size().1
    }
    /// Returns the sample at row `i`, column `j`.
    ///
    /// # Panics
    /// If either index is out of bounds.
    fn get(&self, i: usize, j: usize) -> f32 {
        self.row(i)[j]
    }
}

impl Sheet for Buf2<f32> {
    fn size(&self) -> (usize, usize) {
        (self.height(), self.width())
    }
    fn row(&self, i: usize) -> &[f32] {
        &self[i]
    }
}

impl Sheet for Slice2<'_, f32> {
    fn size(&self) -> (usize, usize) {
        (self.height(), self.width())
    }
    fn row(&self, i: usize) -> &[f32] {
        Slice2::row(self, i)
    }
}

/// Rows of unequal length are cut to the length of the shortest row.
impl Sheet for [Vec<f32>] {
    fn size(&self) -> (usize, usize) {
        let cols = self.iter().map(Vec::len).min().unwrap_or(0);
        (self.len(), cols)
    }
    fn row(&self, i: usize) -> &[f32] {
        &self[i]
    }
}

impl Sheet for Vec<Vec<f32>> {
    fn size(&self) -> (usize, usize) {
        self.as_slice().size()
    }
    fn row(&self, i: usize) -> &[f32] {
        self.as_slice().row(i)
    }
}

impl<S: Sheet + ?Sized> Sheet for &S {
    fn size(&self) -> (usize, usize) {
        (**self).size()
    }
    fn row(&self, i: usize) -> &[f32] {
        (**self).row(i)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use hs::util::buf::AsSlice2;

    use super::*;

    #[test]
    fn buf2_rows_are_y() {
        let buf = Buf2::new_with(3, 2, |x, y| (10 * y + x) as f32);
        assert_eq!(buf.size(), (2, 3));
        assert_eq!(Sheet::row(&buf, 1), &[10.0, 11.0, 12.0]);
        assert_eq!(buf.get(1, 2), 12.0);
    }

    #[test]
    fn slice2_sub_rectangle() {
        let buf = Buf2::new_with(4, 4, |x, y| (10 * y + x) as f32);
        let s = buf.as_slice2().slice(1, 1, 2, 3);
        assert_eq!(Sheet::size(&s), (3, 2));
        assert_eq!(Sheet::row(&s, 2), &[31.0, 32.0]);
    }

    #[test]
    fn nested_vecs() {
        let v: Vec<Vec<f32>> = vec![vec![0.0, 1.0], vec![2.0, 3.0], vec![4.0, 5.0]];
        assert_eq!(v.size(), (3, 2));
        assert_eq!(v.get(2, 1), 5.0);
    }

    #[test]
    fn ragged_rows_use_shortest() {
        let v: Vec<Vec<f32>> = vec![vec![0.0, 1.0, 2.0], vec![3.0], vec![4.0, 5.0]];
        assert_eq!(v.size(), (3, 1));
        assert_eq!(v.get(2, 0), 4.0);
        assert!(v.row(2).len() >= v.cols());
    }

    #[test]
    fn empty() {
        let v: Vec<Vec<f32>> = vec![];
        assert_eq!(v.size(), (0, 0));
        assert_eq!((&v).size(), (0, 0));
    }
}
