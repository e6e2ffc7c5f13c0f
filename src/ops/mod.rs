//! Gather and scatter primitives over the leading (node / edge) axis
//!
//! These are the index-based operations the edge-index attention layer is
//! built from: lifting per-node values onto edges and reducing per-edge
//! values back into node slots.

mod gather;
mod scatter;

pub use gather::index_select;
pub use scatter::{scatter_add, scatter_max, scatter_softmax, SOFTMAX_EPSILON};
