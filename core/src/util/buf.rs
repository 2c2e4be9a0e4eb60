//! Two-dimensional buffers and views to them.
//!
//! Height samples are stored row by row. Element `(x, y)` is column `x` of
//! row `y`, so the width of a buffer is its column count and the height
//! its row count.

use alloc::vec::Vec;
use core::fmt::{self, Debug, Formatter};
use core::iter::repeat;
use core::ops::{Index, IndexMut};

//
// Traits
//

/// A trait for types that can provide a view of their data as a `Slice2`.
pub trait AsSlice2<T> {
    /// Returns a borrowed `Slice2` view of `Self`.
    fn as_slice2(&self) -> Slice2<'_, T>;
}

//
// Types
//

/// A rectangular 2D buffer that owns its elements, backed by a `Vec`.
///
/// Elements are stored contiguously in row-major order, such that element
/// (x, y) is at index `buf.width() * y + x` of the backing vector.
///
/// # Examples
/// ```
/// # use heightsheet_core::util::buf::*;
/// let mut buf = Buf2::new_default(4, 3);
/// buf[1][2] = 123;
/// // Indexing with a usize yields a row as a slice
/// assert_eq!(&buf[1], &[0, 0, 123, 0]);
/// assert_eq!(buf.height(), 3);
/// ```
#[derive(Clone, Eq, PartialEq)]
pub struct Buf2<T> {
    w: usize,
    h: usize,
    data: Vec<T>,
}

/// An immutable rectangular view to a region of a [`Buf2`] or of any
/// `&[T]` slice. A two-dimensional analog to `&[T]`.
///
/// A `Slice2` may be discontiguous:
/// ```text
/// +------stride-----+
/// |    ____w____    |
/// |   |r0_______|   |
/// |   |r1_______| h |
/// |   |r2_______|   |
/// +-----------------+
/// ```
pub struct Slice2<'a, T> {
    w: usize,
    h: usize,
    stride: usize,
    data: &'a [T],
}

//
// Inherent impls
//

impl<T> Buf2<T> {
    /// Returns a buffer with size `w` × `h`, with elements initialized
    /// with values from `init` in row-major order.
    ///
    /// # Panics
    /// If there are fewer than `w * h` elements in `init`.
    pub fn new<I>(w: usize, h: usize, init: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let data: Vec<_> = init.into_iter().take(w * h).collect();
        assert_eq!(data.len(), w * h, "not enough elements for {w}×{h}");
        Self { w, h, data }
    }
    /// Returns a buffer with size `w` × `h`, with every element
    /// initialized by calling `T::default()`.
    pub fn new_default(w: usize, h: usize) -> Self
    where
        T: Clone + Default,
    {
        Self::new(w, h, repeat(T::default()))
    }
    /// Returns a buffer with size `w` × `h`, with every element
    /// initialized by calling `init_fn(x, y)` where x is the column index
    /// and y the row index of the element being initialized.
    pub fn new_with<F>(w: usize, h: usize, mut init_fn: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let mut data = Vec::with_capacity(w * h);
        for y in 0..h {
            data.extend((0..w).map(|x| init_fn(x, y)));
        }
        Self { w, h, data }
    }

    /// Returns the width of `self`, the number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }
    /// Returns the height of `self`, the number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }
    /// Returns whether `self` has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    /// Returns the backing data of `self`.
    pub fn data(&self) -> &[T] {
        &self.data
    }
    /// Returns the backing data of `self` mutably.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
    /// Returns an iterator over the rows of `self`.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks_exact panics on zero
        self.data.chunks_exact(self.w.max(1)).take(self.h)
    }
}

impl<'a, T> Slice2<'a, T> {
    /// Returns a new `Slice2` view to `data` with dimensions `w` and `h`
    /// and stride `stride`.
    ///
    /// # Examples
    /// ```
    /// # use heightsheet_core::util::buf::Slice2;
    /// let data = &[0, 1, 2, 3, 4, 5, 6];
    /// let slice = Slice2::new(2, 2, 3, data);
    /// assert_eq!(&slice[0], &[0, 1]);
    /// assert_eq!(&slice[1], &[3, 4]);
    /// ```
    ///
    /// # Panics
    /// If `stride < w` or if the view would overflow `data`.
    pub fn new(w: usize, h: usize, stride: usize, data: &'a [T]) -> Self {
        assert!(w <= stride, "width ({w}) > stride ({stride})");
        let len = if h == 0 { 0 } else { (h - 1) * stride + w };
        assert!(
            len <= data.len(),
            "{w}×{h} view with stride {stride} exceeds data ({} elements)",
            data.len()
        );
        Self { w, h, stride, data: &data[..len] }
    }

    /// Returns the width of `self`, the number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }
    /// Returns the height of `self`, the number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }
    /// Returns the stride of `self`, the distance between
    /// the starts of consecutive rows.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }
    /// Returns row `y` of `self`, borrowed for the full lifetime `'a`.
    ///
    /// # Panics
    /// If `y >= self.height()`.
    #[inline]
    pub fn row(&self, y: usize) -> &'a [T] {
        assert!(y < self.h, "row index {y} out of bounds ({})", self.h);
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
    /// Returns a view to the sub-rectangle of `self` with top-left corner
    /// `(x, y)` and size `w` × `h`.
    ///
    /// # Panics
    /// If the sub-rectangle is not contained in `self`.
    pub fn slice(&self, x: usize, y: usize, w: usize, h: usize) -> Self {
        assert!(x + w <= self.w && y + h <= self.h, "slice out of bounds");
        if h == 0 {
            return Self { w, h, stride: self.stride, data: &[] };
        }
        let start = y * self.stride + x;
        Slice2::new(w, h, self.stride, &self.data[start..])
    }
}

//
// Local trait impls
//

impl<T> AsSlice2<T> for Buf2<T> {
    #[inline]
    fn as_slice2(&self) -> Slice2<'_, T> {
        Slice2::new(self.w, self.h, self.w, &self.data)
    }
}
impl<T> AsSlice2<T> for Slice2<'_, T> {
    #[inline]
    fn as_slice2(&self) -> Slice2<'_, T> {
        *self
    }
}

//
// Foreign trait impls
//

// Not derived, as that would require `T: Copy`
impl<T> Clone for Slice2<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Slice2<'_, T> {}

impl<T> Index<usize> for Buf2<T> {
    type Output = [T];

    /// Returns row `y` of `self`.
    #[inline]
    fn index(&self, y: usize) -> &[T] {
        assert!(y < self.h, "row index {y} out of bounds ({})", self.h);
        &self.data[y * self.w..(y + 1) * self.w]
    }
}
impl<T> IndexMut<usize> for Buf2<T> {
    #[inline]
    fn index_mut(&mut self, y: usize) -> &mut [T] {
        assert!(y < self.h, "row index {y} out of bounds ({})", self.h);
        &mut self.data[y * self.w..(y + 1) * self.w]
    }
}
impl<T> Index<usize> for Slice2<'_, T> {
    type Output = [T];

    /// Returns row `y` of `self`.
    #[inline]
    fn index(&self, y: usize) -> &[T] {
        self.row(y)
    }
}

impl<T: Debug> Debug for Buf2<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.as_slice2().fmt(f)
    }
}
impl<T: Debug> Debug for Slice2<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{} ", self.w, self.h)?;
        f.debug_list()
            .entries((0..self.h).map(|y| self.row(y)))
            .finish()
    }
}
