//! Damped random-walk authority over the link graph.
//!
//! With probability `1 - damping` the walk teleports to any page uniformly,
//! otherwise it follows one of the current page's resolved outlinks. Every
//! row of the transition model sums to one, so the power iteration keeps the
//! rank vector a probability distribution.

use crate::error::{IndexError, Result};
use crate::graph::LinkGraph;
use tracing::debug;

pub const DAMPING: f64 = 0.85;
pub const TOLERANCE: f64 = 0.001;
pub const MAX_ITERATIONS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRankParams {
    pub damping: f64,
    /// Stop once the Euclidean distance between successive vectors drops below this.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for PageRankParams {
    fn default() -> Self {
        Self { damping: DAMPING, tolerance: TOLERANCE, max_iterations: MAX_ITERATIONS }
    }
}

/// Transition weights between every ordered pair of pages.
///
/// The full matrix is never materialized: a weight is the teleport share
/// plus, when `from` links to `to`, an equal split of the damping mass.
pub struct TransitionModel<'g> {
    graph: &'g LinkGraph,
    teleport: f64,
    damping: f64,
}

impl<'g> TransitionModel<'g> {
    pub fn new(graph: &'g LinkGraph, damping: f64) -> Self {
        let n = graph.len().max(1) as f64;
        Self { graph, teleport: (1.0 - damping) / n, damping }
    }

    pub fn len(&self) -> usize { self.graph.len() }

    pub fn is_empty(&self) -> bool { self.graph.is_empty() }

    pub fn weight(&self, from: usize, to: usize) -> f64 {
        if self.graph.links_to(from, to) {
            self.teleport + self.damping / self.graph.outlinks(from).len() as f64
        } else {
            self.teleport
        }
    }

    pub fn row(&self, from: usize) -> Vec<f64> {
        (0..self.len()).map(|to| self.weight(from, to)).collect()
    }

    /// One power-iteration step: `next[j] = sum_k weight(k, j) * ranks[k]`.
    pub fn step(&self, ranks: &[f64]) -> Vec<f64> {
        let total: f64 = ranks.iter().sum();
        let mut next = vec![self.teleport * total; self.len()];
        for (from, &rank) in ranks.iter().enumerate() {
            let targets = self.graph.outlinks(from);
            if targets.is_empty() {
                continue;
            }
            let share = self.damping / targets.len() as f64 * rank;
            for &to in targets {
                next[to] += share;
            }
        }
        next
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageRank {
    /// Authority per graph node.
    pub ranks: Vec<f64>,
    pub iterations: usize,
    /// Distance between the last two vectors.
    pub residual: f64,
}

/// Power-iterate to the stationary distribution.
///
/// Starts from `current = 0`, `next = 1/n` and steps until the distance
/// between the two falls below the tolerance. A single page gets authority
/// one and an empty graph an empty vector, without iterating.
pub fn solve(graph: &LinkGraph, params: &PageRankParams) -> Result<PageRank> {
    let n = graph.len();
    match n {
        0 => return Ok(PageRank { ranks: Vec::new(), iterations: 0, residual: 0.0 }),
        1 => return Ok(PageRank { ranks: vec![1.0], iterations: 0, residual: 0.0 }),
        _ => {}
    }

    let model = TransitionModel::new(graph, params.damping);
    let mut current = vec![0.0; n];
    let mut next = vec![1.0 / n as f64; n];
    let mut iterations = 0;
    loop {
        let residual = distance(&current, &next);
        if residual < params.tolerance {
            debug!(iterations, residual, "pagerank converged");
            return Ok(PageRank { ranks: next, iterations, residual });
        }
        if iterations >= params.max_iterations {
            return Err(IndexError::NotConverged { iterations, residual });
        }
        current = next;
        next = model.step(&current);
        iterations += 1;
    }
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (y - x) * (y - x)).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(titles: &[&str], links: &[&[&str]]) -> LinkGraph {
        LinkGraph::build(
            titles.iter().map(|s| s.to_string()).collect(),
            &links.iter().map(|l| l.iter().map(|s| s.to_string()).collect()).collect::<Vec<_>>(),
        )
    }

    #[test]
    fn rows_are_stochastic() {
        let g = graph(&["a", "b", "c", "d"], &[&["b", "c"], &[], &["a", "zzz"], &["d"]]);
        let model = TransitionModel::new(&g, DAMPING);
        for k in 0..model.len() {
            let sum: f64 = model.row(k).iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "row {k} sums to {sum}");
        }
    }

    #[test]
    fn linked_weight_adds_damped_share() {
        let g = graph(&["a", "b", "c"], &[&["b", "c"], &["a"], &["a"]]);
        let model = TransitionModel::new(&g, DAMPING);
        assert!((model.weight(0, 1) - (0.05 + 0.425)).abs() < 1e-12);
        assert!((model.weight(1, 2) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn mutual_links_split_evenly() {
        let g = graph(&["a", "b"], &[&["b"], &["a"]]);
        let pr = solve(&g, &PageRankParams::default()).unwrap();
        assert!(pr.ranks.iter().all(|r| (r - 0.5).abs() < 1e-12), "{:?}", pr.ranks);
    }

    #[test]
    fn single_and_empty_graphs_short_circuit() {
        let one = solve(&graph(&["solo"], &[&[]]), &PageRankParams::default()).unwrap();
        assert_eq!(one.ranks, vec![1.0]);
        let none = solve(&graph(&[], &[]), &PageRankParams::default()).unwrap();
        assert!(none.ranks.is_empty());
    }

    #[test]
    fn iteration_cap_is_an_error() {
        let g = graph(&["a", "b", "c"], &[&["b", "c"], &["a", "c"], &["a"]]);
        let params = PageRankParams { max_iterations: 1, ..Default::default() };
        assert!(matches!(solve(&g, &params), Err(IndexError::NotConverged { iterations: 1, .. })));
    }
}
