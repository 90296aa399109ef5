//! Canned events and a prebuilt graph for demos and downstream testing.
//!
//! All timestamps are offsets from a caller-supplied `base` so the fixtures
//! stay deterministic.

use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use crate::domain::{
    Edge, EdgeType, Node, NodeMetadata, NodeType, RawEvent, Source, WorkflowGraph, COMMIT_KIND,
    ISSUE_KIND, PULL_REQUEST_KIND, WORKFLOW_RUN_KIND,
};

/// A mixed batch of commits, pull requests, CI runs and issues.
pub fn mock_raw_events(base: DateTime<Utc>) -> Vec<RawEvent> {
    let at = |hours: i64| base + Duration::hours(hours);

    vec![
        RawEvent::new(Source::Git, COMMIT_KIND, "a1b2c3d", at(0))
            .with_branch("feature/auth-flow")
            .with_author("dev1"),
        RawEvent::new(Source::Git, COMMIT_KIND, "e4f5g6h", at(1))
            .with_branch("feature/auth-flow")
            .with_author("dev1"),
        RawEvent::new(Source::Github, PULL_REQUEST_KIND, "42", at(2))
            .with_status("open")
            .with_author("dev1")
            .with_branch("feature/auth-flow"),
        RawEvent::new(Source::Ci, WORKFLOW_RUN_KIND, "77", at(3)).with_conclusion("failure"),
        RawEvent::new(Source::Ci, WORKFLOW_RUN_KIND, "78", at(5)).with_conclusion("success"),
        RawEvent::new(Source::Jira, ISSUE_KIND, "101", at(-12))
            .with_key("PROJ-101")
            .with_status("In Review")
            .with_assignee("dev1"),
        RawEvent::new(Source::Jira, ISSUE_KIND, "102", at(6))
            .with_key("PROJ-102")
            .with_status("Blocked")
            .with_assignee("dev2"),
        RawEvent::new(Source::Github, PULL_REQUEST_KIND, "43", at(18))
            .with_status("draft")
            .with_author("dev2")
            .with_branch("feature/dashboard"),
    ]
}

/// A ready-made graph that skips normalization.
///
/// Unlike normalizer output it carries a `blocks` edge and free-form
/// metadata, which is what downstream bottleneck analysis expects to see.
pub fn mock_workflow_graph(base: DateTime<Utc>) -> WorkflowGraph {
    let at = |hours: i64| base + Duration::hours(hours);
    let node = |id: &str, node_type: NodeType, status: &str, hours: i64, metadata| Node {
        id: id.to_string(),
        node_type,
        status: status.to_string(),
        created_at: at(hours),
        metadata,
    };

    let nodes = vec![
        node(
            "COMMIT_a1b2c3d",
            NodeType::Commit,
            "committed",
            0,
            Some(NodeMetadata {
                author: Some("dev1".into()),
                branch: Some("feature/auth-flow".into()),
                ..NodeMetadata::sparse()
            }),
        ),
        node(
            "PR_42",
            NodeType::PullRequest,
            "open",
            2,
            Some(
                NodeMetadata {
                    author: Some("dev1".into()),
                    ..NodeMetadata::sparse()
                }
                .with_extra("reviewers_pending", json!(2)),
            ),
        ),
        node(
            "CI_77",
            NodeType::CiRun,
            "failure",
            3,
            Some(NodeMetadata::sparse().with_extra("error", json!("Test suite failed: 3 tests"))),
        ),
        node("CI_78", NodeType::CiRun, "success", 5, None),
        node(
            "ISSUE_PROJ-101",
            NodeType::Issue,
            "In Review",
            -12,
            Some(
                NodeMetadata {
                    assignee: Some("dev1".into()),
                    ..NodeMetadata::sparse()
                }
                .with_extra("priority", json!("high")),
            ),
        ),
        node(
            "ISSUE_PROJ-102",
            NodeType::Issue,
            "Blocked",
            6,
            Some(
                NodeMetadata {
                    assignee: Some("dev2".into()),
                    ..NodeMetadata::sparse()
                }
                .with_extra("blocker", json!("PR_42")),
            ),
        ),
        node(
            "PR_43",
            NodeType::PullRequest,
            "draft",
            18,
            Some(NodeMetadata {
                author: Some("dev2".into()),
                ..NodeMetadata::sparse()
            }),
        ),
    ];

    let edges = vec![
        Edge::new("COMMIT_a1b2c3d", "PR_42", EdgeType::Triggers),
        Edge::new("PR_42", "CI_77", EdgeType::Triggers),
        Edge::new("PR_42", "CI_78", EdgeType::Triggers),
        Edge::new("ISSUE_PROJ-101", "PR_42", EdgeType::DependsOn),
        Edge::new("PR_42", "ISSUE_PROJ-102", EdgeType::Blocks),
    ];

    WorkflowGraph::new(nodes, edges)
}
