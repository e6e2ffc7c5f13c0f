//! Edge index construction helpers
//!
//! Small canonical graphs for demos and tests:
//! - Path and cycle graphs
//! - Fully connected graphs
//! - Random locality-biased graphs

use rand::Rng;

use super::EdgeIndex;
use crate::gat::init::make_rng;

/// Builder for common edge index shapes
pub struct EdgeIndexBuilder;

impl EdgeIndexBuilder {
    /// Directed path `0 -> 1 -> ... -> n-1`
    pub fn path(n: usize) -> EdgeIndex {
        let edges: Vec<(usize, usize)> = (1..n).map(|i| (i - 1, i)).collect();
        EdgeIndex::from_pairs(&edges)
    }

    /// Directed cycle `0 -> 1 -> ... -> n-1 -> 0`
    pub fn cycle(n: usize) -> EdgeIndex {
        let edges: Vec<(usize, usize)> = (0..n).map(|i| (i, (i + 1) % n)).collect();
        EdgeIndex::from_pairs(&edges)
    }

    /// Every ordered pair of distinct nodes
    ///
    /// Let attention learn sparsity.
    pub fn complete(n: usize) -> EdgeIndex {
        let mut edges = Vec::with_capacity(n * n.saturating_sub(1));
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    edges.push((i, j));
                }
            }
        }
        EdgeIndex::from_pairs(&edges)
    }

    /// Random graph without self-loops.
    ///
    /// Nodes closer in index are more likely to be connected.
    pub fn random(n: usize, seed: Option<u64>) -> EdgeIndex {
        let mut rng = make_rng(seed);
        let mut edges = Vec::new();

        for i in 0..n {
            for j in 0..n {
                if i != j {
                    let distance = (i as i64 - j as i64).abs() as f64;
                    let prob = 0.8 / (1.0 + distance);
                    if rng.gen::<f64>() < prob {
                        edges.push((i, j));
                    }
                }
            }
        }

        EdgeIndex::from_pairs(&edges)
    }
}
