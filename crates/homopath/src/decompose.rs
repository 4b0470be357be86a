//! Splitting a signed edge flow into a primary chain and residual cycles.
//!
//! Used edges are oriented by sign and walked greedily: start at the first
//! unvisited edge, repeatedly continue with the first unvisited edge leaving
//! the current head, stop when none is left. Each walk is one chain.
//!
//! Which chain is "the path" is not determined by the topology: a relaxation
//! may return the source→sink path together with detached cycles in any
//! order. The choice is delegated to a [`TieBreak`]; [`FirstFound`] keeps the
//! first chain discovered, in edge order.

use std::collections::HashMap;

use crate::complex::{Edge, VertexId};

/// Directed edges in walk order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Chain {
    pub edges: Vec<Edge>,
}

impl Chain {
    pub fn start(&self) -> Option<VertexId> {
        self.edges.first().map(|e| e.from)
    }
    pub fn end(&self) -> Option<VertexId> {
        self.edges.last().map(|e| e.to)
    }
    /// True when the walk returns to its first vertex.
    pub fn is_closed(&self) -> bool {
        !self.edges.is_empty() && self.start() == self.end()
    }
    /// Visited vertices in order; a closed chain does not repeat its start.
    pub fn vertices(&self) -> Vec<VertexId> {
        let mut out: Vec<VertexId> = self.edges.iter().map(|e| e.from).collect();
        if let Some(end) = self.end() {
            if !self.is_closed() {
                out.push(end);
            }
        }
        out
    }
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Primary chain plus everything else.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decomposition {
    pub path: Option<Chain>,
    pub cycles: Vec<Chain>,
}

/// Picks the primary chain among the discovered ones (by index).
pub trait TieBreak {
    fn primary(&self, chains: &[Chain]) -> Option<usize>;
}

/// First chain discovered.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstFound;

impl TieBreak for FirstFound {
    fn primary(&self, chains: &[Chain]) -> Option<usize> {
        (!chains.is_empty()).then_some(0)
    }
}

impl<F> TieBreak for F
where
    F: Fn(&[Chain]) -> Option<usize>,
{
    fn primary(&self, chains: &[Chain]) -> Option<usize> {
        self(chains)
    }
}

/// Decompose `values` (aligned with `edges`) into chains.
///
/// Entries with `|value| <= tol` are ignored; negative entries traverse their
/// edge backwards.
pub fn decompose<T: TieBreak + ?Sized>(
    values: &[f64],
    edges: &[Edge],
    tol: f64,
    tie_break: &T,
) -> Decomposition {
    let selected: Vec<Edge> = edges
        .iter()
        .zip(values)
        .filter(|(_, v)| v.abs() > tol)
        .map(|(e, v)| if *v > 0.0 { *e } else { e.reversed() })
        .collect();

    let mut outgoing: HashMap<VertexId, Vec<usize>> = HashMap::new();
    for (k, e) in selected.iter().enumerate() {
        outgoing.entry(e.from).or_default().push(k);
    }
    let mut cursor: HashMap<VertexId, usize> = HashMap::new();
    let mut visited = vec![false; selected.len()];

    let mut chains = Vec::new();
    for first in 0..selected.len() {
        if visited[first] {
            continue;
        }
        let mut chain = Vec::new();
        let mut current = first;
        loop {
            visited[current] = true;
            chain.push(selected[current]);
            let head = selected[current].to;
            let Some(out) = outgoing.get(&head) else {
                break;
            };
            let at = cursor.entry(head).or_insert(0);
            while *at < out.len() && visited[out[*at]] {
                *at += 1;
            }
            match out.get(*at) {
                Some(&next) => current = next,
                None => break,
            }
        }
        chains.push(Chain { edges: chain });
    }

    match tie_break.primary(&chains) {
        Some(k) if k < chains.len() => {
            let path = chains.remove(k);
            Decomposition {
                path: Some(path),
                cycles: chains,
            }
        }
        _ => Decomposition {
            path: None,
            cycles: chains,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(a: usize, b: usize) -> Edge {
        Edge::new(VertexId(a), VertexId(b))
    }

    #[test]
    fn single_path_has_no_residual_cycles() {
        let edges = [e(0, 1), e(1, 2), e(3, 2), e(5, 6)];
        let values = [1.0, 1.0, -1.0, 0.0];
        let d = decompose(&values, &edges, 1e-6, &FirstFound);
        let path = d.path.unwrap();
        assert_eq!(path.edges, vec![e(0, 1), e(1, 2), e(2, 3)]);
        assert!(!path.is_closed());
        assert_eq!(path.vertices(), vec![VertexId(0), VertexId(1), VertexId(2), VertexId(3)]);
        assert!(d.cycles.is_empty());
    }

    #[test]
    fn path_and_detached_cycle_are_separated() {
        // Path 0→1→2 listed first; triangle 7→8→9→7 afterwards.
        let edges = [e(0, 1), e(1, 2), e(7, 8), e(8, 9), e(7, 9)];
        let values = [1.0, 1.0, 1.0, 1.0, -1.0];
        let d = decompose(&values, &edges, 1e-6, &FirstFound);
        assert_eq!(d.path.unwrap().edges, vec![e(0, 1), e(1, 2)]);
        assert_eq!(d.cycles.len(), 1);
        let cycle = &d.cycles[0];
        assert!(cycle.is_closed());
        assert_eq!(cycle.edges, vec![e(7, 8), e(8, 9), e(9, 7)]);
        assert_eq!(cycle.vertices().len(), 3);
    }

    #[test]
    fn two_closed_loops_are_both_found() {
        let edges = [e(0, 1), e(1, 2), e(2, 0), e(4, 5), e(5, 6), e(6, 4)];
        let values = [1.0; 6];
        let d = decompose(&values, &edges, 1e-6, &FirstFound);
        assert_eq!(d.path.as_ref().map(Chain::len), Some(3));
        assert_eq!(d.cycles.len(), 1);
        assert!(d.path.unwrap().is_closed() && d.cycles[0].is_closed());
    }

    #[test]
    fn tie_break_is_pluggable() {
        let edges = [e(7, 8), e(8, 9), e(9, 7), e(0, 1), e(1, 2)];
        let values = [1.0; 5];
        let first = decompose(&values, &edges, 1e-6, &FirstFound);
        assert!(first.path.unwrap().is_closed());
        let open_first = |chains: &[Chain]| chains.iter().position(|c| !c.is_closed());
        let d = decompose(&values, &edges, 1e-6, &open_first);
        assert_eq!(d.path.unwrap().start(), Some(VertexId(0)));
        assert_eq!(d.cycles.len(), 1);
    }

    #[test]
    fn tolerance_drops_small_values_and_empty_input_has_no_path() {
        let edges = [e(0, 1), e(1, 2)];
        let d = decompose(&[1e-9, -1e-9], &edges, 1e-6, &FirstFound);
        assert_eq!(d, Decomposition::default());
    }
}
