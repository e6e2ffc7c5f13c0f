//! Edge index graph representation
//!
//! A `[2, E]` pair array: row 0 holds source node ids, row 1 target node
//! ids, one column per directed edge.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{GatError, Result};

/// Directed edge list in coordinate (COO) form.
///
/// Duplicate targets are expected: all edges sharing a target form the group
/// a segmented softmax normalises over. Self-loops are never added
/// implicitly; use [`EdgeIndex::with_self_loops`] when a node should attend
/// to itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EdgeLists")]
pub struct EdgeIndex {
    sources: Vec<usize>,
    targets: Vec<usize>,
}

/// Unchecked serialized form of [`EdgeIndex`]
#[derive(Deserialize)]
struct EdgeLists {
    sources: Vec<usize>,
    targets: Vec<usize>,
}

impl TryFrom<EdgeLists> for EdgeIndex {
    type Error = GatError;

    fn try_from(lists: EdgeLists) -> Result<Self> {
        EdgeIndex::from_vecs(lists.sources, lists.targets)
    }
}

impl EdgeIndex {
    /// Create from a `[2, E]` array
    pub fn new(index: Array2<usize>) -> Result<Self> {
        if index.nrows() != 2 {
            return Err(GatError::InvalidEdgeIndex(format!(
                "expected 2 rows (sources, targets), got {}",
                index.nrows()
            )));
        }

        Ok(Self {
            sources: index.row(0).to_vec(),
            targets: index.row(1).to_vec(),
        })
    }

    /// Create from separate source and target vectors
    pub fn from_vecs(sources: Vec<usize>, targets: Vec<usize>) -> Result<Self> {
        if sources.len() != targets.len() {
            return Err(GatError::InvalidEdgeIndex(format!(
                "{} sources but {} targets",
                sources.len(),
                targets.len()
            )));
        }
        Ok(Self { sources, targets })
    }

    /// Create from `(source, target)` pairs
    pub fn from_pairs(edges: &[(usize, usize)]) -> Self {
        Self {
            sources: edges.iter().map(|e| e.0).collect(),
            targets: edges.iter().map(|e| e.1).collect(),
        }
    }

    /// Create from a dense adjacency matrix.
    ///
    /// Every nonzero `adjacency[[i, j]]` becomes the edge `i -> j`.
    pub fn from_dense(adjacency: &Array2<f64>) -> Self {
        let mut sources = Vec::new();
        let mut targets = Vec::new();

        for ((i, j), &w) in adjacency.indexed_iter() {
            if w != 0.0 {
                sources.push(i);
                targets.push(j);
            }
        }

        Self { sources, targets }
    }

    /// Get number of edges
    pub fn num_edges(&self) -> usize {
        self.sources.len()
    }

    /// Whether there are no edges
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Source node id of every edge
    pub fn sources(&self) -> &[usize] {
        &self.sources
    }

    /// Target node id of every edge
    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    /// Iterate `(source, target)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.sources.iter().copied().zip(self.targets.iter().copied())
    }

    /// The `[2, E]` array form
    pub fn to_array(&self) -> Array2<usize> {
        let e = self.num_edges();
        Array2::from_shape_fn((2, e), |(row, col)| {
            if row == 0 {
                self.sources[col]
            } else {
                self.targets[col]
            }
        })
    }

    /// Largest node id referenced by any edge
    pub fn max_node_id(&self) -> Option<usize> {
        self.sources.iter().chain(self.targets.iter()).copied().max()
    }

    /// Check that every id lies in `[0, num_nodes)`.
    ///
    /// Forward passes do not call this; it is for callers that cannot
    /// otherwise guarantee a well-formed edge index.
    pub fn check_bounds(&self, num_nodes: usize) -> Result<()> {
        for (edge, (src, tgt)) in self.iter().enumerate() {
            let node = src.max(tgt);
            if node >= num_nodes {
                return Err(GatError::NodeOutOfRange {
                    edge,
                    node,
                    num_nodes,
                });
            }
        }
        Ok(())
    }

    /// Number of incoming edges per node.
    ///
    /// Targets outside `[0, num_nodes)` are ignored.
    pub fn in_degrees(&self, num_nodes: usize) -> Vec<usize> {
        let mut degrees = vec![0usize; num_nodes];
        for &tgt in &self.targets {
            if tgt < num_nodes {
                degrees[tgt] += 1;
            }
        }
        degrees
    }

    /// Whether the edge `src -> tgt` exists
    pub fn has_edge(&self, src: usize, tgt: usize) -> bool {
        self.iter().any(|e| e == (src, tgt))
    }

    /// Add self-loops for every node in `[0, num_nodes)` that lacks one
    pub fn with_self_loops(&self, num_nodes: usize) -> Self {
        let mut has_loop = vec![false; num_nodes];
        for (src, tgt) in self.iter() {
            if src == tgt && src < num_nodes {
                has_loop[src] = true;
            }
        }

        let mut out = self.clone();
        for (node, looped) in has_loop.into_iter().enumerate() {
            if !looped {
                out.sources.push(node);
                out.targets.push(node);
            }
        }
        out
    }

    /// Reorder the edge columns; edge `k` of the result is edge `order[k]` of `self`.
    ///
    /// # Panics
    ///
    /// Panics if an entry of `order` is `>= num_edges()`.
    pub fn permuted(&self, order: &[usize]) -> Self {
        Self {
            sources: order.iter().map(|&k| self.sources[k]).collect(),
            targets: order.iter().map(|&k| self.targets[k]).collect(),
        }
    }

    /// Convert to dense adjacency matrix (`adj[[src, tgt]]` counts edges)
    pub fn to_dense(&self, num_nodes: usize) -> Array2<f64> {
        let mut adj = Array2::zeros((num_nodes, num_nodes));
        for (src, tgt) in self.iter() {
            if src < num_nodes && tgt < num_nodes {
                adj[[src, tgt]] += 1.0;
            }
        }
        adj
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_edge_index_creation() {
        let edges = EdgeIndex::new(array![[0, 1, 2], [1, 2, 0]]).unwrap();

        assert_eq!(edges.num_edges(), 3);
        assert_eq!(edges.sources(), &[0, 1, 2]);
        assert_eq!(edges.targets(), &[1, 2, 0]);
        assert!(edges.has_edge(0, 1));
        assert!(!edges.has_edge(1, 0));
        assert_eq!(edges.to_array(), array![[0, 1, 2], [1, 2, 0]]);
    }

    #[test]
    fn test_rejects_wrong_row_count() {
        let err = EdgeIndex::new(array![[0, 1], [1, 2], [2, 0]]).unwrap_err();
        assert!(matches!(err, GatError::InvalidEdgeIndex(_)));

        let err = EdgeIndex::from_vecs(vec![0, 1], vec![1]).unwrap_err();
        assert!(matches!(err, GatError::InvalidEdgeIndex(_)));
    }

    #[test]
    fn test_from_dense() {
        let mut adj = Array2::zeros((3, 3));
        adj[[0, 1]] = 1.0;
        adj[[1, 2]] = 0.5;
        adj[[2, 0]] = 1.0;

        let edges = EdgeIndex::from_dense(&adj);
        assert_eq!(edges.num_edges(), 3);
        assert!(edges.has_edge(1, 2));
        assert_eq!(edges.to_dense(3).sum(), 3.0);
    }

    #[test]
    fn test_check_bounds() {
        let edges = EdgeIndex::from_pairs(&[(0, 1), (1, 5)]);

        assert_eq!(edges.max_node_id(), Some(5));
        assert!(edges.check_bounds(6).is_ok());
        match edges.check_bounds(3) {
            Err(GatError::NodeOutOfRange { edge, node, num_nodes }) => {
                assert_eq!((edge, node, num_nodes), (1, 5, 3));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_self_loops() {
        let edges = EdgeIndex::from_pairs(&[(0, 1), (1, 2), (1, 1)]);
        let looped = edges.with_self_loops(3);

        assert_eq!(looped.num_edges(), 5);
        for node in 0..3 {
            assert!(looped.has_edge(node, node));
        }
        // Adding again is a no-op
        assert_eq!(looped.with_self_loops(3), looped);
    }

    #[test]
    fn test_in_degrees_and_permutation() {
        let edges = EdgeIndex::from_pairs(&[(0, 2), (1, 2), (2, 0)]);
        assert_eq!(edges.in_degrees(4), vec![1, 0, 2, 0]);

        let permuted = edges.permuted(&[2, 0, 1]);
        assert_eq!(permuted.sources(), &[2, 0, 1]);
        assert_eq!(permuted.targets(), &[0, 2, 2]);
        assert_eq!(permuted.in_degrees(4), edges.in_degrees(4));
    }

    #[test]
    fn test_deserialize_checks_lengths() {
        let edges: EdgeIndex = serde_json::from_str(r#"{"sources":[0,1],"targets":[1,0]}"#).unwrap();
        assert_eq!(edges, EdgeIndex::from_pairs(&[(0, 1), (1, 0)]));

        let err = serde_json::from_str::<EdgeIndex>(r#"{"sources":[0,1,2],"targets":[1]}"#).unwrap_err();
        assert!(err.to_string().contains("3 sources but 1 targets"));
    }
}
