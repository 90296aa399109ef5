//! Normalization of raw events into a workflow graph.
//!
//! Every event becomes exactly one node. Edges are inferred heuristically
//! from event kinds and timestamps, since source systems carry no foreign
//! keys to each other:
//!
//! 1. commit → pull request (`triggers`), only for commits on a branch
//! 2. pull request → workflow run (`triggers`)
//! 3. issue → pull request (`depends_on`)
//!
//! Each pass links a source event to at most one strictly-later target.
//! `blocks` edges are never inferred here.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::domain::{
    Edge, EdgeType, MetadataShape, Node, NodeMetadata, NodeType, RawEvent, WorkflowGraph,
    COMMIT_KIND, DEPLOYMENT_KIND, ISSUE_KIND, PULL_REQUEST_KIND, WORKFLOW_RUN_KIND,
};
use crate::metrics::METRICS;
use crate::obs;

/// How a source event picks its target among strictly-later candidates.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LinkStrategy {
    /// The first candidate in input order. Not necessarily the closest in time.
    #[default]
    FirstInInputOrder,

    /// The candidate with the smallest positive time delta; ties go to the
    /// earlier candidate in input order.
    NearestInTime,
}

impl LinkStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStrategy::FirstInInputOrder => "first_in_input_order",
            LinkStrategy::NearestInTime => "nearest_in_time",
        }
    }

    fn pick<'a>(&self, source: &RawEvent, candidates: &[&'a RawEvent]) -> Option<&'a RawEvent> {
        let mut later = candidates
            .iter()
            .copied()
            .filter(|c| c.timestamp > source.timestamp);

        match self {
            LinkStrategy::FirstInInputOrder => later.next(),
            LinkStrategy::NearestInTime => later.min_by_key(|c| c.timestamp - source.timestamp),
        }
    }
}

impl std::str::FromStr for LinkStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first_in_input_order" => Ok(LinkStrategy::FirstInInputOrder),
            "nearest_in_time" => Ok(LinkStrategy::NearestInTime),
            other => Err(format!("unknown link strategy: {other}")),
        }
    }
}

/// Tunables for [`normalize_with`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizeOptions {
    #[serde(default)]
    pub link_strategy: LinkStrategy,
}

/// Canonical node id for an event: `{PREFIX}_{key or id}`.
///
/// Issue-tracker events carry a `key` (e.g. `PROJ-101`) that is stable across
/// sources, so it wins over the source-local `id` when non-empty.
pub fn node_id(event: &RawEvent) -> String {
    let prefix: Cow<'_, str> = match event.event_kind.as_str() {
        COMMIT_KIND => "COMMIT".into(),
        PULL_REQUEST_KIND => "PR".into(),
        WORKFLOW_RUN_KIND => "CI".into(),
        ISSUE_KIND => "ISSUE".into(),
        DEPLOYMENT_KIND => "DEPLOY".into(),
        other => other.to_uppercase().into(),
    };
    let identifier = event
        .key
        .as_deref()
        .filter(|k| !k.is_empty())
        .unwrap_or(event.id.as_str());
    format!("{prefix}_{identifier}")
}

/// Normalized status for an event.
pub fn map_status(event: &RawEvent) -> String {
    match event.event_kind.as_str() {
        COMMIT_KIND => "committed".to_string(),
        WORKFLOW_RUN_KIND => event
            .conclusion
            .clone()
            .unwrap_or_else(|| "pending".to_string()),
        _ => event
            .status
            .clone()
            .unwrap_or_else(|| "unknown".to_string()),
    }
}

/// Graph node type for an event kind.
pub fn node_type_for(event_kind: &str) -> NodeType {
    match event_kind {
        COMMIT_KIND => NodeType::Commit,
        PULL_REQUEST_KIND => NodeType::PullRequest,
        WORKFLOW_RUN_KIND => NodeType::CiRun,
        ISSUE_KIND => NodeType::Issue,
        DEPLOYMENT_KIND => NodeType::Deployment,
        other => NodeType::Other(other.to_string()),
    }
}

fn build_node(event: &RawEvent) -> Node {
    Node {
        id: node_id(event),
        node_type: node_type_for(&event.event_kind),
        status: map_status(event),
        created_at: event.timestamp,
        metadata: Some(NodeMetadata {
            source: Some(event.source),
            author: event.author.clone(),
            assignee: event.assignee.clone(),
            branch: event.branch.clone(),
            extra: Default::default(),
            shape: MetadataShape::Full,
        }),
    }
}

/// Events grouped by the kinds that take part in edge inference.
/// Each bucket keeps input order.
#[derive(Default)]
struct Buckets<'a> {
    commits: Vec<&'a RawEvent>,
    pull_requests: Vec<&'a RawEvent>,
    workflow_runs: Vec<&'a RawEvent>,
    issues: Vec<&'a RawEvent>,
}

impl<'a> Buckets<'a> {
    fn from_events(events: &'a [RawEvent]) -> Self {
        let mut buckets = Self::default();
        for event in events {
            match event.event_kind.as_str() {
                COMMIT_KIND => buckets.commits.push(event),
                PULL_REQUEST_KIND => buckets.pull_requests.push(event),
                WORKFLOW_RUN_KIND => buckets.workflow_runs.push(event),
                ISSUE_KIND => buckets.issues.push(event),
                _ => {}
            }
        }
        buckets
    }
}

fn link_pass(
    sources: &[&RawEvent],
    targets: &[&RawEvent],
    edge_type: EdgeType,
    strategy: LinkStrategy,
    edges: &mut Vec<Edge>,
) {
    for source in sources {
        if let Some(target) = strategy.pick(source, targets) {
            let edge = Edge::new(node_id(source), node_id(target), edge_type);
            obs::emit_edge_inferred(&edge.from_node, &edge.to_node, edge_type);
            edges.push(edge);
        }
    }
}

/// Normalize a batch of events into a workflow graph using default options.
///
/// Deterministic for a given input order. Nodes follow input order; edges
/// are commit→PR links, then PR→CI links, then issue→PR links.
pub fn normalize(events: &[RawEvent]) -> WorkflowGraph {
    normalize_with(events, &NormalizeOptions::default())
}

/// Normalize a batch of events into a workflow graph.
pub fn normalize_with(events: &[RawEvent], options: &NormalizeOptions) -> WorkflowGraph {
    let _span = obs::NormalizeSpan::enter(events.len());
    let strategy = options.link_strategy;
    obs::emit_normalize_started(events.len(), strategy.as_str());

    let nodes: Vec<Node> = events.iter().map(build_node).collect();
    let buckets = Buckets::from_events(events);

    let branched_commits: Vec<&RawEvent> = buckets
        .commits
        .iter()
        .copied()
        .filter(|c| c.has_branch())
        .collect();

    let mut edges = Vec::new();
    link_pass(
        &branched_commits,
        &buckets.pull_requests,
        EdgeType::Triggers,
        strategy,
        &mut edges,
    );
    link_pass(
        &buckets.pull_requests,
        &buckets.workflow_runs,
        EdgeType::Triggers,
        strategy,
        &mut edges,
    );
    link_pass(
        &buckets.issues,
        &buckets.pull_requests,
        EdgeType::DependsOn,
        strategy,
        &mut edges,
    );

    obs::emit_normalize_finished(nodes.len(), edges.len());
    METRICS.record_normalization(events.len(), nodes.len(), edges.len());

    WorkflowGraph::new(nodes, edges)
}
