use super::*;
use crate::error::{ConfigError, HomopathError};
use proptest::prelude::*;

fn grid(rows: usize, cols: usize, holes: &[(usize, usize)]) -> GridComplex {
    GridComplex::new(rows, cols, holes.iter().map(|&h| Cell::from(h))).unwrap()
}

fn euler(c: &GridComplex) -> i64 {
    c.vertices().len() as i64 - c.edges().len() as i64 + c.triangles().len() as i64
}

#[test]
fn small_grid_counts() {
    let c = grid(4, 4, &[]);
    assert_eq!(c.vertices().len(), 16);
    assert_eq!(c.edges().len(), 33);
    assert_eq!(c.triangles().len(), 18);
    assert_eq!(c.source(), Some(VertexId(0)));
    assert_eq!(c.sink(), Some(VertexId(15)));

    let c = grid(5, 5, &[]);
    assert_eq!(
        (c.vertices().len(), c.edges().len(), c.triangles().len()),
        (25, 56, 32)
    );
    assert_eq!(euler(&c), 1);
}

#[test]
fn punctured_grid_counts() {
    // Even hole: 3×3 block cut out, the eight ring cells stay as isolated vertices.
    let c = grid(7, 7, &[(3, 3)]);
    assert_eq!(
        (c.vertices().len(), c.edges().len(), c.triangles().len()),
        (48, 84, 44)
    );
    assert_eq!(euler(&c), 8);

    let c = grid(7, 7, &[(3, 2)]);
    assert_eq!(
        (c.vertices().len(), c.edges().len(), c.triangles().len()),
        (48, 80, 40)
    );

    let c = grid(12, 12, &[(3, 3), (8, 8)]);
    assert_eq!(
        (c.vertices().len(), c.edges().len(), c.triangles().len()),
        (142, 313, 186)
    );
}

#[test]
fn ids_skip_holes_and_round_trip() {
    let c = grid(7, 7, &[(3, 3)]);
    assert_eq!(c.vertex_at(Cell::new(3, 3)), None);
    assert_eq!(c.cell_of(VertexId(24)), None);
    assert_eq!(c.vertex_at(Cell::new(7, 0)), None);
    assert_eq!(c.position(VertexId(25)), Some(24));
    for &v in c.vertices() {
        let cell = c.cell_of(v).unwrap();
        assert_eq!(c.vertex_at(cell), Some(v));
    }
    assert_eq!(c.sink(), Some(VertexId(48)));
}

#[test]
fn edges_are_local_and_avoid_the_cut_out() {
    let c = grid(9, 9, &[(4, 4)]);
    let hole = Cell::new(4, 4);
    for e in c.edges() {
        let a = c.cell_of(e.from).unwrap();
        let b = c.cell_of(e.to).unwrap();
        assert_eq!(a.chebyshev(b), 1, "{a} -> {b}");
        assert!(a.chebyshev(hole) >= 2 && b.chebyshev(hole) >= 2);
        // Canonical orientation: towards larger row, or larger column on a row.
        assert!(b.row > a.row || (b.row == a.row && b.col > a.col));
        if c.is_diagonal(*e) {
            assert!(a.is_odd());
        }
        let k = c.edge_index(e.from, e.to).unwrap();
        assert_eq!(c.oriented_edge(e.to, e.from), Some((k, -1.0)));
    }
}

#[test]
fn triangles_are_counter_clockwise() {
    let c = grid(9, 9, &[(4, 4)]);
    let xy = |v: VertexId| {
        let cell = c.cell_of(v).unwrap();
        (cell.col as i64, cell.row as i64)
    };
    for t in c.triangles() {
        let (a, b, d) = (xy(t.a), xy(t.b), xy(t.c));
        let cross = (b.0 - a.0) * (d.1 - a.1) - (b.1 - a.1) * (d.0 - a.0);
        assert!(cross > 0, "{t:?}");
        for (u, v) in t.boundary() {
            assert!(c.oriented_edge(u, v).is_some());
        }
    }
}

#[test]
fn boundary_of_boundary_vanishes() {
    for c in [grid(4, 4, &[]), grid(7, 7, &[(3, 2)]), grid(12, 12, &[(3, 3), (8, 8)])] {
        let ops = BoundaryOperators::new(&c, 1e-9).unwrap();
        assert_eq!(ops.d1.shape(), (c.vertices().len(), c.edges().len()));
        assert_eq!(ops.d2.shape(), (c.edges().len(), c.triangles().len()));
        assert_eq!(ops.boundary_defect(), 0.0);
        // Every edge column has exactly one -1 and one +1.
        for col in ops.d1.column_iter() {
            assert_eq!(col.sum(), 0.0);
            assert_eq!(col.iter().filter(|x| **x != 0.0).count(), 2);
        }
        let lap = ops.edge_laplacian();
        assert_eq!(lap.nrows(), c.edges().len());
        assert!((&lap - lap.transpose()).amax() < 1e-12);
    }
}

#[test]
fn invalid_layouts_are_rejected() {
    fn err(rows: usize, cols: usize, holes: &[(usize, usize)]) -> ConfigError {
        match GridComplex::new(rows, cols, holes.iter().map(|&h| Cell::from(h))) {
            Err(HomopathError::Config(e)) => e,
            other => panic!("expected config error, got {other:?}"),
        }
    }
    assert_eq!(err(0, 5, &[]), ConfigError::EmptyGrid { rows: 0, cols: 5 });
    assert!(matches!(err(7, 7, &[(7, 3)]), ConfigError::HoleOutOfBounds { .. }));
    assert_eq!(
        err(7, 7, &[(1, 3)]),
        ConfigError::HoleNearBorder {
            cell: Cell::new(1, 3)
        }
    );
    assert!(matches!(err(7, 7, &[(3, 5)]), ConfigError::HoleNearBorder { .. }));
    assert_eq!(
        err(9, 9, &[(3, 3), (4, 4)]),
        ConfigError::HolesTooClose {
            a: Cell::new(3, 3),
            b: Cell::new(4, 4)
        }
    );
    assert_eq!(
        err(9, 9, &[(4, 4), (4, 4)]),
        ConfigError::DuplicateHole {
            cell: Cell::new(4, 4)
        }
    );
    // Cut-outs at distance two or three touch and would merge.
    for b in [(3, 5), (5, 5), (3, 6), (6, 5), (6, 6)] {
        assert_eq!(
            err(12, 12, &[(3, 3), b]),
            ConfigError::HolesTooClose {
                a: Cell::new(3, 3),
                b: Cell::from(b)
            }
        );
    }
    assert!(GridComplex::new(12, 12, [Cell::new(3, 3), Cell::new(3, 7)]).is_ok());
}

fn layout() -> impl Strategy<Value = (usize, usize, Vec<Cell>)> {
    (6usize..12, 6usize..12).prop_flat_map(|(rows, cols)| {
        let cell = (2..rows - 2, 2..cols - 2).prop_map(|(r, c)| Cell::new(r, c));
        (Just(rows), Just(cols), prop::collection::vec(cell, 0..4))
    })
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 48, .. ProptestConfig::default() })]

    #[test]
    fn prop_boundary_closed_on_valid_layouts((rows, cols, holes) in layout()) {
        let built = GridComplex::new(rows, cols, holes);
        prop_assume!(built.is_ok());
        let c = built.unwrap();
        let ops = BoundaryOperators::new(&c, 1e-9).unwrap();
        prop_assert_eq!(ops.boundary_defect(), 0.0);
        for t in c.triangles() {
            let mut ids = t.sorted().to_vec();
            ids.dedup();
            prop_assert_eq!(ids.len(), 3);
        }
    }
}
