//! Domain models for FlowSight.
//!
//! Canonical definitions for the core entities:
//! - `RawEvent`: an observation from one source system
//! - `WorkflowGraph`: typed nodes and edges inferred from a batch of events

pub mod error;
pub mod event;
pub mod graph;
pub mod validation;

// Re-export main types and errors
pub use error::{FlowsightError, Result, ValidationError};
pub use event::{
    RawEvent, RawEventsPayload, Source, COMMIT_KIND, DEPLOYMENT_KIND, ISSUE_KIND,
    PULL_REQUEST_KIND, WORKFLOW_RUN_KIND,
};
pub use graph::{
    Edge, EdgeType, GraphEnvelope, MetadataShape, Node, NodeMetadata, NodeType, WorkflowGraph,
};
pub use validation::{parse_payload, validate_event, validate_graph, validate_payload};
