//! Breadth-first traversal over a directed graph whose edges live elsewhere.
//!
//! The traversal never owns the edge set. Callers ask for the current
//! [`Traversal::frontier`], fetch the outgoing edges of those nodes in one
//! batch, and feed them back through [`Traversal::advance`]. This keeps the
//! search usable against a database without loading the whole graph.

use std::collections::HashSet;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct Traversal<T> {
    origin: T,
    visited: HashSet<T>,
    frontier: Vec<T>,
}

impl<T: Copy + Eq + Hash> Traversal<T> {
    pub fn new(origin: T) -> Self {
        Self {
            origin,
            visited: HashSet::from([origin]),
            frontier: vec![origin],
        }
    }

    /// Nodes discovered in the last step whose outgoing edges are still unknown
    pub fn frontier(&self) -> &[T] {
        &self.frontier
    }

    pub fn is_exhausted(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Whether `node` has been reached so far. The origin counts as reached.
    pub fn has_reached(&self, node: &T) -> bool {
        self.visited.contains(node)
    }

    /// Consumes one batch of `(source, target)` edges.
    ///
    /// Edges whose source is not on the current frontier are ignored, so a
    /// caller may pass an over-approximating batch.
    pub fn advance<I>(&mut self, edges: I)
    where
        I: IntoIterator<Item = (T, T)>,
    {
        let sources: HashSet<T> = self.frontier.drain(..).collect();

        for (source, target) in edges {
            if sources.contains(&source) && self.visited.insert(target) {
                self.frontier.push(target);
            }
        }
    }

    /// Every node reached except the origin
    pub fn discovered(&self) -> impl Iterator<Item = &T> {
        self.visited.iter().filter(move |node| **node != self.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drives a traversal to completion against an in-memory edge list
    fn explore(edges: &[(char, char)], origin: char, stop_at: Option<char>) -> Traversal<char> {
        let mut traversal = Traversal::new(origin);
        while !traversal.is_exhausted() {
            if stop_at.is_some_and(|target| traversal.has_reached(&target)) {
                break;
            }
            let frontier = traversal.frontier().to_vec();
            let batch: Vec<_> = edges
                .iter()
                .copied()
                .filter(|(source, _)| frontier.contains(source))
                .collect();
            traversal.advance(batch);
        }
        traversal
    }

    #[test]
    fn test_reaches_through_long_chains() {
        // A -> B -> C -> D
        let edges = [('A', 'B'), ('B', 'C'), ('C', 'D')];

        assert!(explore(&edges, 'A', Some('D')).has_reached(&'D'));
        assert!(explore(&edges, 'B', Some('D')).has_reached(&'D'));
        assert!(!explore(&edges, 'D', Some('A')).has_reached(&'A'));
    }

    #[test]
    fn test_origin_is_reached() {
        let traversal = Traversal::new('A');
        assert!(traversal.has_reached(&'A'));
        assert_eq!(traversal.discovered().count(), 0);
    }

    #[test]
    fn test_terminates_on_cycles_and_diamonds() {
        let edges = [
            ('A', 'B'),
            ('A', 'C'),
            ('B', 'D'),
            ('C', 'D'),
            ('D', 'A'),
        ];

        let traversal = explore(&edges, 'A', None);
        let mut discovered: Vec<char> = traversal.discovered().copied().collect();
        discovered.sort();

        assert_eq!(discovered, vec!['B', 'C', 'D']);
        assert!(traversal.is_exhausted());
    }

    #[test]
    fn test_ignores_edges_off_the_frontier() {
        let mut traversal = Traversal::new('A');
        traversal.advance([('X', 'Y'), ('A', 'B')]);

        assert!(traversal.has_reached(&'B'));
        assert!(!traversal.has_reached(&'Y'));
        assert_eq!(traversal.frontier(), &['B']);
    }
}
