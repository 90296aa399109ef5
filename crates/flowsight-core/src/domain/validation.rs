//! Boundary validation for raw events and structural checks for graphs.
//!
//! Deserialization already rejects events missing `id` or `timestamp` and
//! events from unknown sources. The checks here cover what serde cannot:
//! empty identifiers and kinds, and graph-level invariants.
//!
//! The normalizer never calls into this module; callers validate first.

use std::collections::HashSet;

use super::error::{FlowsightError, Result, ValidationError};
use super::event::{RawEvent, RawEventsPayload};
use super::graph::WorkflowGraph;

/// Validate a single `RawEvent`.
///
/// # Errors
///
/// - `ValidationError::EmptyId`: `event.id` is empty.
/// - `ValidationError::EmptyKind`: `event.event_kind` is empty.
pub fn validate_event(event: &RawEvent) -> std::result::Result<(), ValidationError> {
    if event.event_kind.is_empty() {
        return Err(ValidationError::EmptyKind {
            id: event.id.clone(),
        });
    }

    if event.id.is_empty() {
        return Err(ValidationError::EmptyId {
            kind: event.event_kind.clone(),
        });
    }

    Ok(())
}

/// Validate every event in a payload. The first failing event wins.
pub fn validate_payload(payload: &RawEventsPayload) -> std::result::Result<(), ValidationError> {
    payload.raw_events.iter().try_for_each(validate_event)
}

/// Check the structural invariants of a graph.
///
/// Node ids must be unique, every edge endpoint must reference a node in
/// the same graph, and no edge may start and end at the same node.
pub fn validate_graph(graph: &WorkflowGraph) -> std::result::Result<(), ValidationError> {
    let mut ids = HashSet::with_capacity(graph.nodes.len());
    for node in &graph.nodes {
        if !ids.insert(node.id.as_str()) {
            return Err(ValidationError::DuplicateNodeId {
                node_id: node.id.clone(),
            });
        }
    }

    for edge in &graph.edges {
        if edge.from_node == edge.to_node {
            return Err(ValidationError::SelfLoop {
                node_id: edge.from_node.clone(),
            });
        }
        if !ids.contains(edge.from_node.as_str()) || !ids.contains(edge.to_node.as_str()) {
            return Err(ValidationError::DanglingEdge {
                from: edge.from_node.clone(),
                to: edge.to_node.clone(),
            });
        }
    }

    Ok(())
}

/// Decode a JSON raw-events payload and validate it.
pub fn parse_payload(json: &str) -> Result<RawEventsPayload> {
    let payload: RawEventsPayload = serde_json::from_str(json)?;
    if let Err(e) = validate_payload(&payload) {
        crate::obs::emit_validation_failed(&e);
        return Err(FlowsightError::Validation(e));
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::{Source, COMMIT_KIND};
    use crate::domain::graph::{Edge, EdgeType, Node, NodeType};
    use chrono::Utc;

    fn node(id: &str) -> Node {
        Node {
            id: id.to_string(),
            node_type: NodeType::PullRequest,
            status: "open".to_string(),
            created_at: Utc::now(),
            metadata: None,
        }
    }

    #[test]
    fn test_valid_event_passes() {
        let event = RawEvent::new(Source::Git, COMMIT_KIND, "a1b2c3", Utc::now());
        assert!(validate_event(&event).is_ok());
    }

    #[test]
    fn test_empty_id_fails() {
        let event = RawEvent::new(Source::Git, COMMIT_KIND, "", Utc::now());
        match validate_event(&event).unwrap_err() {
            ValidationError::EmptyId { kind } => assert_eq!(kind, "commit"),
            other => panic!("Expected EmptyId, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_kind_fails() {
        let event = RawEvent::new(Source::Jira, "", "101", Utc::now());
        match validate_event(&event).unwrap_err() {
            ValidationError::EmptyKind { id } => assert_eq!(id, "101"),
            other => panic!("Expected EmptyKind, got {:?}", other),
        }
    }

    #[test]
    fn test_payload_reports_first_bad_event() {
        let ts = Utc::now();
        let payload = RawEventsPayload::new(vec![
            RawEvent::new(Source::Git, COMMIT_KIND, "ok", ts),
            RawEvent::new(Source::Github, "", "42", ts),
            RawEvent::new(Source::Git, COMMIT_KIND, "", ts),
        ]);
        assert_eq!(
            validate_payload(&payload),
            Err(ValidationError::EmptyKind {
                id: "42".to_string()
            })
        );
    }

    #[test]
    fn test_graph_with_dangling_edge_fails() {
        let graph = WorkflowGraph::new(
            vec![node("PR_42")],
            vec![Edge::new("PR_42", "CI_77", EdgeType::Triggers)],
        );
        assert!(matches!(
            validate_graph(&graph),
            Err(ValidationError::DanglingEdge { .. })
        ));
    }

    #[test]
    fn test_graph_with_self_loop_fails() {
        let graph = WorkflowGraph::new(
            vec![node("PR_42")],
            vec![Edge::new("PR_42", "PR_42", EdgeType::Blocks)],
        );
        assert_eq!(
            validate_graph(&graph),
            Err(ValidationError::SelfLoop {
                node_id: "PR_42".to_string()
            })
        );
    }

    #[test]
    fn test_graph_with_duplicate_ids_fails() {
        let graph = WorkflowGraph::new(vec![node("PR_42"), node("PR_42")], vec![]);
        assert!(matches!(
            validate_graph(&graph),
            Err(ValidationError::DuplicateNodeId { .. })
        ));
    }

    #[test]
    fn test_parse_payload_rejects_malformed_json() {
        let err = parse_payload("{\"raw_events\": [").unwrap_err();
        assert!(matches!(err, FlowsightError::Serialization(_)));
    }

    #[test]
    fn test_parse_payload_rejects_empty_id() {
        let json = r#"{"raw_events": [
            {"source": "git", "event_kind": "commit", "id": "", "timestamp": "2026-01-30T14:00:00Z"}
        ]}"#;
        let err = parse_payload(json).unwrap_err();
        assert!(matches!(
            err,
            FlowsightError::Validation(ValidationError::EmptyId { .. })
        ));
    }

    #[test]
    fn test_parse_payload_accepts_valid_batch() {
        let json = r#"{"raw_events": [
            {"source": "git", "type": "commit", "id": "a1b2c3", "timestamp": "2026-01-30T14:00:00Z", "branch": "main"},
            {"source": "github", "type": "pull_request", "id": "42", "timestamp": "2026-01-30T14:30:00Z", "status": "open", "author": "dev1"}
        ]}"#;
        let payload = parse_payload(json).unwrap();
        assert_eq!(payload.raw_events.len(), 2);
    }
}
