//! Geometry primitives: [`GridPoint`], [`GridRange`], [`Vec2`], [`Rect`] and
//! [`Diamond`].
//!
//! Grid coordinates are integers (`column`, `row`). Screen and world
//! coordinates are `f64`, with x growing right and y growing down.

use std::fmt;
use std::ops::{Add, Sub};

// ---------------------------------------------------------------------------
// GridPoint
// ---------------------------------------------------------------------------

/// A discrete grid coordinate. Out-of-grid values (including negative ones)
/// are valid and routinely produced by the screen transforms.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPoint {
    pub column: i32,
    pub row: i32,
}

impl GridPoint {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { column: 0, row: 0 };

    /// Create a new grid point.
    #[inline]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Return a point shifted by (dc, dr).
    #[inline]
    pub const fn shift(self, dc: i32, dr: i32) -> Self {
        Self {
            column: self.column + dc,
            row: self.row + dr,
        }
    }

    /// Whether `self` lies at or after `other` on both axes.
    #[inline]
    pub const fn at_or_after(self, other: Self) -> bool {
        self.column >= other.column && self.row >= other.row
    }
}

impl PartialOrd for GridPoint {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GridPoint {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.row.cmp(&other.row).then(self.column.cmp(&other.column))
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

impl Add for GridPoint {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.column + rhs.column, self.row + rhs.row)
    }
}

impl Sub for GridPoint {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.column - rhs.column, self.row - rhs.row)
    }
}

// ---------------------------------------------------------------------------
// GridRange
// ---------------------------------------------------------------------------

/// A half-open rectangle of grid points \[min, max).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridRange {
    pub min: GridPoint,
    pub max: GridPoint,
}

impl GridRange {
    /// Range covering `columns × rows` cells starting at (0, 0).
    #[inline]
    pub fn with_size(columns: i32, rows: i32) -> Self {
        Self {
            min: GridPoint::ZERO,
            max: GridPoint::new(columns.max(0), rows.max(0)),
        }
    }

    /// Number of columns.
    #[inline]
    pub fn columns(self) -> i32 {
        self.max.column - self.min.column
    }

    /// Number of rows.
    #[inline]
    pub fn rows(self) -> i32 {
        self.max.row - self.min.row
    }

    /// Total number of cells in the range.
    #[inline]
    pub fn len(self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.columns() as usize) * (self.rows() as usize)
    }

    /// Whether the range has zero or negative area.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.min.column >= self.max.column || self.min.row >= self.max.row
    }

    /// Whether `p` is inside the half-open range.
    #[inline]
    pub fn contains(self, p: GridPoint) -> bool {
        p.column >= self.min.column
            && p.column < self.max.column
            && p.row >= self.min.row
            && p.row < self.max.row
    }

    /// Iterator visiting every row of a column before moving to the next
    /// column.
    #[inline]
    pub fn iter_column_major(self) -> RangeIter {
        RangeIter {
            range: self,
            cur: self.min,
            column_major: true,
        }
    }

    /// Iterator visiting every column of a row before moving to the next
    /// row (storage order).
    #[inline]
    pub fn iter_row_major(self) -> RangeIter {
        RangeIter {
            range: self,
            cur: self.min,
            column_major: false,
        }
    }
}

impl fmt::Display for GridRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{})", self.min, self.max)
    }
}

/// Iterator over the points of a [`GridRange`].
#[derive(Clone, Debug)]
pub struct RangeIter {
    range: GridRange,
    cur: GridPoint,
    column_major: bool,
}

impl RangeIter {
    fn remaining(&self) -> usize {
        let r = self.range;
        if r.is_empty() {
            return 0;
        }
        if self.column_major {
            if self.cur.column >= r.max.column {
                return 0;
            }
            let in_column = (r.max.row - self.cur.row) as usize;
            let columns_left = (r.max.column - self.cur.column - 1) as usize;
            in_column + columns_left * r.rows() as usize
        } else {
            if self.cur.row >= r.max.row {
                return 0;
            }
            let in_row = (r.max.column - self.cur.column) as usize;
            let rows_left = (r.max.row - self.cur.row - 1) as usize;
            in_row + rows_left * r.columns() as usize
        }
    }
}

impl Iterator for RangeIter {
    type Item = GridPoint;

    fn next(&mut self) -> Option<GridPoint> {
        if self.remaining() == 0 {
            return None;
        }
        let p = self.cur;
        if self.column_major {
            self.cur.row += 1;
            if self.cur.row >= self.range.max.row {
                self.cur.row = self.range.min.row;
                self.cur.column += 1;
            }
        } else {
            self.cur.column += 1;
            if self.cur.column >= self.range.max.column {
                self.cur.column = self.range.min.column;
                self.cur.row += 1;
            }
        }
        Some(p)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for RangeIter {}

// ---------------------------------------------------------------------------
// Vec2 / Rect / Diamond
// ---------------------------------------------------------------------------

/// A point in screen or world space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An axis-aligned screen rectangle (top-left corner plus size).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether `p` lies inside the half-open rectangle.
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    /// Smallest rectangle containing both.
    pub fn union(self, other: Rect) -> Rect {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = (self.x + self.width).max(other.x + other.width);
        let y1 = (self.y + self.height).max(other.y + other.height);
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }
}

/// The four vertices of a tile outline on screen.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diamond {
    pub top: Vec2,
    pub right: Vec2,
    pub bottom: Vec2,
    pub left: Vec2,
}

impl Diamond {
    /// Vertices in drawing order: top, right, bottom, left.
    #[inline]
    pub fn vertices(&self) -> [Vec2; 4] {
        [self.top, self.right, self.bottom, self.left]
    }

    /// Bounding box of the outline.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.left.x,
            self.top.y,
            self.right.x - self.left.x,
            self.bottom.y - self.top.y,
        )
    }

    /// Whether `p` lies inside the outline. The top two edges are inclusive
    /// and the bottom two exclusive, matching the `floor` cell convention.
    pub fn contains(&self, p: Vec2) -> bool {
        let half_w = (self.right.x - self.left.x) * 0.5;
        let half_h = (self.bottom.y - self.top.y) * 0.5;
        if half_w <= 0.0 || half_h <= 0.0 {
            return false;
        }
        let u = (p.x - self.top.x) / half_w;
        let v = (p.y - self.top.y) / half_h;
        // Diagonal coordinates; the outline is [0, 2) on both.
        let a = v + u;
        let b = v - u;
        (0.0..2.0).contains(&a) && (0.0..2.0).contains(&b)
    }
}
