//! Hop-count shortest paths on the grid graph and cycle stitching.
//!
//! Distances count edges, not Euclidean length: this is for coarse routing
//! between fixed points and a detected cycle, not for cost-accurate paths.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::complex::{Edge, GridComplex, VertexId};
use crate::decompose::Chain;

/// Distances and shortest-path tree from one start vertex.
#[derive(Clone, Debug, Default)]
pub struct ShortestPaths {
    pub start: VertexId,
    /// Hop counts of reachable vertices.
    pub dist: HashMap<VertexId, usize>,
    /// Predecessor of every reachable vertex except `start`.
    pub parent: HashMap<VertexId, VertexId>,
}

impl ShortestPaths {
    #[inline]
    pub fn distance(&self, v: VertexId) -> Option<usize> {
        self.dist.get(&v).copied()
    }
}

/// Uniform-weight Dijkstra over the undirected graph `(vertices, edges)`.
pub fn dijkstra(vertices: &[VertexId], edges: &[Edge], start: VertexId) -> ShortestPaths {
    let mut graph: HashMap<VertexId, Vec<VertexId>> =
        vertices.iter().map(|&v| (v, Vec::new())).collect();
    for e in edges {
        graph.entry(e.from).or_default().push(e.to);
        graph.entry(e.to).or_default().push(e.from);
    }
    let mut out = ShortestPaths {
        start,
        ..ShortestPaths::default()
    };
    if !graph.contains_key(&start) {
        return out;
    }
    out.dist.insert(start, 0);
    let mut queue = BinaryHeap::new();
    queue.push(Reverse((0usize, start)));
    while let Some(Reverse((d, v))) = queue.pop() {
        if out.dist.get(&v).is_some_and(|&best| d > best) {
            continue;
        }
        for &w in graph.get(&v).map(Vec::as_slice).unwrap_or_default() {
            let nd = d + 1;
            if out.dist.get(&w).is_none_or(|&best| nd < best) {
                out.dist.insert(w, nd);
                out.parent.insert(w, v);
                queue.push(Reverse((nd, w)));
            }
        }
    }
    out
}

/// Edges `start → … → goal` along predecessor links.
///
/// `None` if `goal` is not in the tree or the tree is rooted elsewhere.
pub fn reconstruct(
    parent: &HashMap<VertexId, VertexId>,
    start: VertexId,
    goal: VertexId,
) -> Option<Vec<Edge>> {
    let mut path = Vec::new();
    let mut cur = goal;
    while cur != start {
        let &p = parent.get(&cur)?;
        path.push(Edge::new(p, cur));
        cur = p;
        if path.len() > parent.len() {
            return None;
        }
    }
    path.reverse();
    Some(path)
}

/// Detour `from → entry`, along a closed cycle `entry → exit`, then `exit → to`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stitch {
    pub entry: VertexId,
    pub exit: VertexId,
    pub lead_in: Vec<Edge>,
    pub around: Vec<Edge>,
    pub lead_out: Vec<Edge>,
    pub hops: usize,
}

impl Stitch {
    /// All edges in travel order.
    pub fn edges(&self) -> Vec<Edge> {
        self.lead_in
            .iter()
            .chain(&self.around)
            .chain(&self.lead_out)
            .copied()
            .collect()
    }
}

/// Cheapest (in hops) way to route `from → cycle → to`, entering and leaving
/// the cycle at distinct vertices and following the cycle's direction between.
///
/// `None` if the chain is not closed or an anchor cannot reach it.
pub fn stitch_through_cycle(
    complex: &GridComplex,
    from: VertexId,
    to: VertexId,
    cycle: &Chain,
) -> Option<Stitch> {
    if !cycle.is_closed() {
        return None;
    }
    let ring = cycle.vertices();
    let k = ring.len();
    let tree_from = dijkstra(complex.vertices(), complex.edges(), from);
    let tree_to = dijkstra(complex.vertices(), complex.edges(), to);

    let mut best: Option<(usize, usize, usize)> = None;
    for i in 0..k {
        let Some(d_in) = tree_from.distance(ring[i]) else {
            continue;
        };
        for j in (0..k).filter(|&j| j != i) {
            let Some(d_out) = tree_to.distance(ring[j]) else {
                continue;
            };
            let hops = d_in + (j + k - i) % k + d_out;
            if best.is_none_or(|(h, _, _)| hops < h) {
                best = Some((hops, i, j));
            }
        }
    }
    let (hops, i, j) = best?;
    let steps = (j + k - i) % k;
    let around = (0..steps).map(|s| cycle.edges[(i + s) % k]).collect();
    let lead_in = reconstruct(&tree_from.parent, from, ring[i])?;
    let lead_out = reconstruct(&tree_to.parent, to, ring[j])?
        .into_iter()
        .rev()
        .map(Edge::reversed)
        .collect();
    Some(Stitch {
        entry: ring[i],
        exit: ring[j],
        lead_in,
        around,
        lead_out,
        hops,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complex::Cell;

    fn line(n: usize) -> (Vec<VertexId>, Vec<Edge>) {
        let v: Vec<VertexId> = (0..n).map(VertexId).collect();
        let e = (0..n - 1).map(|i| Edge::new(VertexId(i), VertexId(i + 1))).collect();
        (v, e)
    }

    #[test]
    fn hop_distances_ignore_geometry() {
        let c = GridComplex::new(5, 5, []).unwrap();
        let src = c.vertex_at(Cell::new(0, 1)).unwrap();
        let sp = dijkstra(c.vertices(), c.edges(), src);
        // (0,1) is odd: three diagonal hops reach (3,4).
        assert_eq!(sp.distance(c.vertex_at(Cell::new(3, 4)).unwrap()), Some(3));
        assert_eq!(sp.distance(src), Some(0));
        assert_eq!(sp.dist.len(), 25);
    }

    #[test]
    fn reconstruct_walks_back_to_start() {
        let (v, e) = line(5);
        let sp = dijkstra(&v, &e, VertexId(0));
        let path = reconstruct(&sp.parent, VertexId(0), VertexId(3)).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], Edge::new(VertexId(0), VertexId(1)));
        assert_eq!(path[2].to, VertexId(3));
        assert_eq!(reconstruct(&sp.parent, VertexId(0), VertexId(0)), Some(vec![]));
        // Tree rooted at 0, asked for a path from 2.
        assert_eq!(reconstruct(&sp.parent, VertexId(2), VertexId(1)), None);
    }

    #[test]
    fn unreachable_goal_has_no_path() {
        let v = vec![VertexId(0), VertexId(1), VertexId(2)];
        let e = vec![Edge::new(VertexId(0), VertexId(1))];
        let sp = dijkstra(&v, &e, VertexId(0));
        assert_eq!(sp.distance(VertexId(2)), None);
        assert_eq!(reconstruct(&sp.parent, VertexId(0), VertexId(2)), None);
        let missing = dijkstra(&v, &e, VertexId(9));
        assert!(missing.dist.is_empty());
    }

    #[test]
    fn stitch_enters_and_leaves_a_cycle() {
        let c = GridComplex::new(7, 7, [Cell::new(3, 3)]).unwrap();
        let id = |r, col| c.vertex_at(Cell::new(r, col)).unwrap();
        // Counter-clockwise loop on the ring around the cut-out.
        let ring = [
            (1, 1), (1, 2), (1, 3), (1, 4), (1, 5),
            (2, 5), (3, 5), (4, 5), (5, 5),
            (5, 4), (5, 3), (5, 2), (5, 1),
            (4, 1), (3, 1), (2, 1), (1, 1),
        ];
        let cycle = Chain {
            edges: ring
                .windows(2)
                .map(|w| Edge::new(id(w[0].0, w[0].1), id(w[1].0, w[1].1)))
                .collect(),
        };
        let s = stitch_through_cycle(&c, id(0, 0), id(6, 6), &cycle).unwrap();
        assert_ne!(s.entry, s.exit);
        assert_eq!(s.hops, s.lead_in.len() + s.around.len() + s.lead_out.len());
        let edges = s.edges();
        assert_eq!(edges.first().map(|e| e.from), Some(id(0, 0)));
        assert_eq!(edges.last().map(|e| e.to), Some(id(6, 6)));
        assert!(edges.windows(2).all(|w| w[0].to == w[1].from));
        assert!(edges.iter().all(|e| c.oriented_edge(e.from, e.to).is_some()));

        let open = Chain {
            edges: cycle.edges[..3].to_vec(),
        };
        assert!(stitch_through_cycle(&c, id(0, 0), id(6, 6), &open).is_none());
    }
}
