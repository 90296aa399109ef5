//! Domain-level error taxonomy for FlowSight.

/// Errors produced by event and graph validation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("event of kind {kind} has an empty id")]
    EmptyId { kind: String },

    #[error("event {id} has an empty event kind")]
    EmptyKind { id: String },

    #[error("edge {from} -> {to} references a node missing from the graph")]
    DanglingEdge { from: String, to: String },

    #[error("edge on {node_id} points back at itself")]
    SelfLoop { node_id: String },

    #[error("duplicate node id: {node_id}")]
    DuplicateNodeId { node_id: String },
}

/// FlowSight domain errors.
#[derive(Debug, thiserror::Error)]
pub enum FlowsightError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for FlowSight domain operations.
pub type Result<T> = std::result::Result<T, FlowsightError>;
