//! Identifiers and simplices of the grid complex.

use std::fmt;

/// Grid cell `(row, col)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Checkerboard parity; diagonals are generated on odd cells only.
    #[inline]
    pub fn is_odd(self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    #[inline]
    pub fn chebyshev(self, other: Cell) -> usize {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }

    /// Neighbour at `(row + dr, col + dc)`, if it does not underflow.
    #[inline]
    pub fn offset(self, dr: isize, dc: isize) -> Option<Cell> {
        Some(Cell {
            row: self.row.checked_add_signed(dr)?,
            col: self.col.checked_add_signed(dc)?,
        })
    }

    /// The eight cells around `self` that exist (no underflow).
    pub fn neighbours8(self) -> impl Iterator<Item = Cell> {
        const OFFSETS: [(isize, isize); 8] = [
            (-1, -1),
            (-1, 0),
            (-1, 1),
            (0, -1),
            (0, 1),
            (1, -1),
            (1, 0),
            (1, 1),
        ];
        OFFSETS
            .into_iter()
            .filter_map(move |(dr, dc)| self.offset(dr, dc))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// Vertex identifier `row * cols + col`. Not dense when holes are present.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Edge in canonical orientation `from → to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    pub from: VertexId,
    pub to: VertexId,
}

impl Edge {
    #[inline]
    pub fn new(from: VertexId, to: VertexId) -> Self {
        Self { from, to }
    }
    #[inline]
    pub fn reversed(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }
    #[inline]
    pub fn key(self) -> (VertexId, VertexId) {
        (self.from, self.to)
    }
}

/// Triangle `(a, b, c)` listed counter-clockwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Triangle {
    pub a: VertexId,
    pub b: VertexId,
    pub c: VertexId,
}

impl Triangle {
    /// Oriented boundary cycle `(a,b), (b,c), (c,a)`.
    #[inline]
    pub fn boundary(&self) -> [(VertexId, VertexId); 3] {
        [(self.a, self.b), (self.b, self.c), (self.c, self.a)]
    }

    /// Vertex ids sorted ascending; identifies the triangle regardless of orientation.
    pub fn sorted(&self) -> [VertexId; 3] {
        let mut v = [self.a, self.b, self.c];
        v.sort_unstable();
        v
    }
}
