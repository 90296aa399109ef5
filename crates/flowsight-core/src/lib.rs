//! FlowSight Core Library
//!
//! Turns raw delivery events from disconnected source systems (git, GitHub,
//! Jira, CI) into a typed workflow graph, and computes metrics over it.
//!
//! ```rust,ignore
//! use flowsight_core::{normalize, parse_payload};
//!
//! let payload = parse_payload(&json)?;
//! let graph = normalize(&payload.raw_events);
//! ```

pub mod analysis;
pub mod config;
pub mod demo;
pub mod domain;
pub mod metrics;
pub mod normalizer;
pub mod obs;
pub mod telemetry;

pub use analysis::{analyze, AnalysisEnvelope, AnalysisResult, GraphMetrics, NodeMetrics};
pub use config::{FlowsightConfig, LoggingConfig};
pub use demo::{mock_raw_events, mock_workflow_graph};
pub use domain::{
    parse_payload, validate_event, validate_graph, validate_payload, Edge, EdgeType,
    FlowsightError, GraphEnvelope, MetadataShape, Node, NodeMetadata, NodeType, RawEvent,
    RawEventsPayload, Result, Source, ValidationError, WorkflowGraph, COMMIT_KIND,
    DEPLOYMENT_KIND, ISSUE_KIND, PULL_REQUEST_KIND, WORKFLOW_RUN_KIND,
};
pub use metrics::METRICS;
pub use normalizer::{
    map_status, node_id, node_type_for, normalize, normalize_with, LinkStrategy,
    NormalizeOptions,
};
pub use obs::{
    emit_edge_inferred, emit_normalize_finished, emit_normalize_started, emit_validation_failed,
    NormalizeSpan,
};
pub use telemetry::init_tracing;

/// FlowSight core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
