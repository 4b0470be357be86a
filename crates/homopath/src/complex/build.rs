//! Grid complex construction (vertices, filtered edges, triangles).

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::debug;

use crate::error::{ConfigError, Result, TopologyError};

use super::types::{Cell, Edge, Triangle, VertexId};

/// Vertices, edges and triangles of a punctured `rows × cols` grid.
///
/// Immutable once built; safe to share across solves.
#[derive(Clone, Debug)]
pub struct GridComplex {
    rows: usize,
    cols: usize,
    holes: BTreeSet<Cell>,
    vertices: Vec<VertexId>,
    position: HashMap<VertexId, usize>,
    edges: Vec<Edge>,
    edge_index: HashMap<(VertexId, VertexId), usize>,
    triangles: Vec<Triangle>,
}

impl GridComplex {
    /// Build the complex for the given grid and hole set.
    ///
    /// Holes are validated eagerly: listed once, inside the grid, at least two
    /// cells away from the border, and pairwise at Chebyshev distance ≥
    /// [`MIN_HOLE_SEPARATION`].
    pub fn new(rows: usize, cols: usize, holes: impl IntoIterator<Item = Cell>) -> Result<Self> {
        let mut set = BTreeSet::new();
        for cell in holes {
            if !set.insert(cell) {
                return Err(ConfigError::DuplicateHole { cell }.into());
            }
        }
        let holes = set;
        validate_layout(rows, cols, &holes)?;

        let (vertices, position) = enumerate_vertices(rows, cols, &holes);
        let cell_edges = filtered_cell_edges(rows, cols, &holes)?;
        let edges: Vec<Edge> = cell_edges
            .iter()
            .map(|&(a, b)| Edge::new(id_of(a, cols), id_of(b, cols)))
            .collect();
        let edge_index = edges
            .iter()
            .enumerate()
            .map(|(k, e)| (e.key(), k))
            .collect();

        let mut complex = Self {
            rows,
            cols,
            holes,
            vertices,
            position,
            edges,
            edge_index,
            triangles: Vec::new(),
        };
        complex.triangles = complex.generate_triangles();
        debug!(
            rows,
            cols,
            holes = complex.holes.len(),
            vertices = complex.vertices.len(),
            edges = complex.edges.len(),
            triangles = complex.triangles.len(),
            "grid complex built"
        );
        Ok(complex)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }
    #[inline]
    pub fn holes(&self) -> &BTreeSet<Cell> {
        &self.holes
    }
    /// Surviving vertex ids in row-major order.
    #[inline]
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }
    /// Edges in canonical order and orientation.
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// First surviving vertex (bottom-left corner).
    pub fn source(&self) -> Option<VertexId> {
        self.vertices.first().copied()
    }
    /// Last surviving vertex (top-right corner).
    pub fn sink(&self) -> Option<VertexId> {
        self.vertices.last().copied()
    }

    /// Cell of a vertex id, or `None` for holes and out-of-range ids.
    pub fn cell_of(&self, v: VertexId) -> Option<Cell> {
        self.position
            .contains_key(&v)
            .then(|| Cell::new(v.0 / self.cols, v.0 % self.cols))
    }

    /// Vertex id at a cell, or `None` for holes and cells outside the grid.
    pub fn vertex_at(&self, cell: Cell) -> Option<VertexId> {
        if cell.row >= self.rows || cell.col >= self.cols {
            return None;
        }
        let id = id_of(cell, self.cols);
        self.position.contains_key(&id).then_some(id)
    }

    /// Dense row index of a vertex in `d1`.
    #[inline]
    pub fn position(&self, v: VertexId) -> Option<usize> {
        self.position.get(&v).copied()
    }

    /// Index of the canonical edge `u → v` (orientation-sensitive).
    #[inline]
    pub fn edge_index(&self, u: VertexId, v: VertexId) -> Option<usize> {
        self.edge_index.get(&(u, v)).copied()
    }

    /// Index and sign (`+1` canonical, `-1` reversed) of the edge joining `u` and `v`.
    pub fn oriented_edge(&self, u: VertexId, v: VertexId) -> Option<(usize, f64)> {
        self.edge_index(u, v)
            .map(|k| (k, 1.0))
            .or_else(|| self.edge_index(v, u).map(|k| (k, -1.0)))
    }

    /// True for edges whose endpoints differ in both row and column.
    pub fn is_diagonal(&self, e: Edge) -> bool {
        match (self.cell_of(e.from), self.cell_of(e.to)) {
            (Some(a), Some(b)) => a.row != b.row && a.col != b.col,
            _ => false,
        }
    }

    /// Chain two canonical edges `(u,v)`, `(v,w)` and close with `(w,u)` or
    /// `(u,w)`; orient each triangle counter-clockwise.
    fn generate_triangles(&self) -> Vec<Triangle> {
        let mut out_adj: HashMap<VertexId, Vec<VertexId>> = HashMap::new();
        for e in &self.edges {
            out_adj.entry(e.from).or_default().push(e.to);
        }
        let mut seen: HashSet<[VertexId; 3]> = HashSet::new();
        let mut triangles = Vec::new();
        for e in &self.edges {
            let (u, v) = e.key();
            let Some(next) = out_adj.get(&v) else {
                continue;
            };
            for &w in next {
                let closes =
                    self.edge_index.contains_key(&(w, u)) || self.edge_index.contains_key(&(u, w));
                if !closes {
                    continue;
                }
                let tri = self.ccw(u, v, w);
                if seen.insert(tri.sorted()) {
                    triangles.push(tri);
                }
            }
        }
        triangles
    }

    fn ccw(&self, u: VertexId, v: VertexId, w: VertexId) -> Triangle {
        let p = |id: VertexId| ((id.0 % self.cols) as i64, (id.0 / self.cols) as i64);
        let (p1, p2, p3) = (p(u), p(v), p(w));
        let cross = (p2.0 - p1.0) * (p3.1 - p1.1) - (p2.1 - p1.1) * (p3.0 - p1.0);
        if cross > 0 {
            Triangle { a: u, b: v, c: w }
        } else {
            Triangle { a: u, b: w, c: v }
        }
    }
}

/// Closest allowed Chebyshev distance between two holes. Below it the 3×3
/// cut-outs touch and two holes can collapse into one loop.
pub const MIN_HOLE_SEPARATION: usize = 4;

#[inline]
fn id_of(cell: Cell, cols: usize) -> VertexId {
    VertexId(cell.row * cols + cell.col)
}

fn validate_layout(rows: usize, cols: usize, holes: &BTreeSet<Cell>) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(ConfigError::EmptyGrid { rows, cols }.into());
    }
    for &cell in holes {
        if cell.row >= rows || cell.col >= cols {
            return Err(ConfigError::HoleOutOfBounds { cell, rows, cols }.into());
        }
        // The 3×3 cut-out must leave a ring of edges inside the grid.
        if cell.row < 2 || cell.col < 2 || cell.row + 2 >= rows || cell.col + 2 >= cols {
            return Err(ConfigError::HoleNearBorder { cell }.into());
        }
    }
    for (k, &a) in holes.iter().enumerate() {
        let too_close = holes
            .iter()
            .skip(k + 1)
            .find(|&&b| a.chebyshev(b) < MIN_HOLE_SEPARATION);
        if let Some(&b) = too_close {
            return Err(ConfigError::HolesTooClose { a, b }.into());
        }
    }
    Ok(())
}

fn enumerate_vertices(
    rows: usize,
    cols: usize,
    holes: &BTreeSet<Cell>,
) -> (Vec<VertexId>, HashMap<VertexId, usize>) {
    let vertices: Vec<VertexId> = (0..rows)
        .flat_map(|row| (0..cols).map(move |col| Cell::new(row, col)))
        .filter(|cell| !holes.contains(cell))
        .map(|cell| id_of(cell, cols))
        .collect();
    let position = vertices.iter().enumerate().map(|(k, &v)| (v, k)).collect();
    (vertices, position)
}

/// Per-cell edge templates: up, right, and on odd cells up-left and up-right.
fn template_edges(rows: usize, cols: usize, holes: &BTreeSet<Cell>) -> Vec<(Cell, Cell)> {
    let mut edges = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            let cell = Cell::new(row, col);
            if holes.contains(&cell) {
                continue;
            }
            let mut targets = vec![(1, 0), (0, 1)];
            if cell.is_odd() {
                targets.extend([(1, -1), (1, 1)]);
            }
            for (dr, dc) in targets {
                if let Some(t) = cell.offset(dr, dc) {
                    if t.row < rows && t.col < cols {
                        edges.push((cell, t));
                    }
                }
            }
        }
    }
    edges
}

/// The four diagonals spanning an even hole through its axis neighbours.
fn bridging_diagonals(hole: Cell) -> Option<[(Cell, Cell); 4]> {
    let left = hole.offset(0, -1)?;
    let right = hole.offset(0, 1)?;
    let below = hole.offset(-1, 0)?;
    let above = hole.offset(1, 0)?;
    Some([
        (left, above),
        (right, above),
        (below, left),
        (below, right),
    ])
}

fn filtered_cell_edges(
    rows: usize,
    cols: usize,
    holes: &BTreeSet<Cell>,
) -> Result<Vec<(Cell, Cell)>> {
    let mut edges = template_edges(rows, cols, holes);
    edges.retain(|(a, b)| !holes.contains(a) && !holes.contains(b));

    let present: HashSet<(Cell, Cell)> = edges.iter().copied().collect();
    let mut bridged: HashSet<(Cell, Cell)> = HashSet::new();
    for &hole in holes.iter().filter(|h| !h.is_odd()) {
        let diagonals = bridging_diagonals(hole).ok_or(ConfigError::HoleNearBorder { cell: hole })?;
        for (from, to) in diagonals {
            if !present.contains(&(from, to)) || !bridged.insert((from, to)) {
                return Err(TopologyError::MissingRemovalEdge { from, to }.into());
            }
        }
    }
    edges.retain(|e| !bridged.contains(e));

    let ring: HashSet<Cell> = holes.iter().flat_map(|h| h.neighbours8()).collect();
    edges.retain(|(a, b)| !ring.contains(a) && !ring.contains(b));
    Ok(edges)
}
