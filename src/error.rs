//! Error types for the graph attention library

use thiserror::Error;

use crate::gat::LayerKind;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, GatError>;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum GatError {
    /// Invalid layer or model configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A layer variant was selected that has no implementation
    #[error("Layer type {0} not yet supported")]
    UnsupportedLayer(LayerKind),

    /// Input features do not match the layer's declared input dimension
    #[error("Shape mismatch: expected {expected} input features, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    /// Input features do not match the dimension expected by a layer inside a model
    #[error("Shape mismatch at layer {layer}: expected {expected} input features, got {got}")]
    LayerShapeMismatch {
        layer: usize,
        expected: usize,
        got: usize,
    },

    /// Malformed edge index (wrong number of rows, mismatched lengths)
    #[error("Invalid edge index: {0}")]
    InvalidEdgeIndex(String),

    /// Edge references a node outside `[0, num_nodes)`
    #[error("Edge {edge} references node {node} but the graph has only {num_nodes} nodes")]
    NodeOutOfRange {
        edge: usize,
        node: usize,
        num_nodes: usize,
    },

    /// Array reshape failure
    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error
    #[error("Failed to parse config: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("Failed to write config: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl GatError {
    /// Whether the error stems from construction-time configuration
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            GatError::InvalidConfig(_) | GatError::UnsupportedLayer(_) | GatError::TomlDe(_)
        )
    }
}
