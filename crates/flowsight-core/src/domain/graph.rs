//! Workflow graph: nodes are delivery artifacts, edges are typed
//! relationships between them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::event::Source;

/// Kind of delivery artifact a node represents.
///
/// Event kinds without a dedicated variant are carried verbatim in
/// [`NodeType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    Commit,
    PullRequest,
    CiRun,
    Issue,
    Deployment,
    Other(String),
}

impl NodeType {
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::Commit => "commit",
            NodeType::PullRequest => "pull_request",
            NodeType::CiRun => "ci_run",
            NodeType::Issue => "issue",
            NodeType::Deployment => "deployment",
            NodeType::Other(kind) => kind,
        }
    }
}

impl From<String> for NodeType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "commit" => NodeType::Commit,
            "pull_request" => NodeType::PullRequest,
            "ci_run" => NodeType::CiRun,
            "issue" => NodeType::Issue,
            "deployment" => NodeType::Deployment,
            _ => NodeType::Other(value),
        }
    }
}

impl From<NodeType> for String {
    fn from(value: NodeType) -> Self {
        match value {
            NodeType::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship carried by an edge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    Triggers,
    DependsOn,
    Blocks,
}

impl EdgeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::Triggers => "triggers",
            EdgeType::DependsOn => "depends_on",
            EdgeType::Blocks => "blocks",
        }
    }
}

impl std::fmt::Display for EdgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether absent well-known metadata fields are written as `null` or left out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MetadataShape {
    /// All four well-known keys are always written. Normalizer output.
    #[default]
    Full,
    /// Only populated keys are written. Prebuilt graphs.
    Sparse,
}

/// Auxiliary attributes attached to a node.
///
/// `extra` holds anything else a prebuilt graph chooses to attach. On input,
/// metadata carrying all four well-known keys (null or not) decodes as
/// [`MetadataShape::Full`], anything less as [`MetadataShape::Sparse`], so
/// normalizer output and prebuilt graphs keep their key sets across a
/// round trip.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(from = "MetadataWire")]
pub struct NodeMetadata {
    pub source: Option<Source>,
    pub author: Option<String>,
    pub assignee: Option<String>,
    pub branch: Option<String>,
    pub extra: BTreeMap<String, serde_json::Value>,
    pub shape: MetadataShape,
}

impl NodeMetadata {
    /// Empty metadata that only serializes the keys later set on it.
    pub fn sparse() -> Self {
        Self {
            shape: MetadataShape::Sparse,
            ..Default::default()
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

impl Serialize for NodeMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let full = self.shape == MetadataShape::Full;
        let mut map = serializer.serialize_map(None)?;
        if full || self.source.is_some() {
            map.serialize_entry("source", &self.source)?;
        }
        for (key, value) in [
            ("author", &self.author),
            ("assignee", &self.assignee),
            ("branch", &self.branch),
        ] {
            if full || value.is_some() {
                map.serialize_entry(key, value)?;
            }
        }
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// The outer `Option` records whether the key was present at all.
#[derive(Deserialize)]
struct MetadataWire {
    #[serde(default, deserialize_with = "present")]
    source: Option<Option<Source>>,
    #[serde(default, deserialize_with = "present")]
    author: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    assignee: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    branch: Option<Option<String>>,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_json::Value>,
}

fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl From<MetadataWire> for NodeMetadata {
    fn from(wire: MetadataWire) -> Self {
        let full = wire.source.is_some()
            && wire.author.is_some()
            && wire.assignee.is_some()
            && wire.branch.is_some();
        Self {
            source: wire.source.flatten(),
            author: wire.author.flatten(),
            assignee: wire.assignee.flatten(),
            branch: wire.branch.flatten(),
            extra: wire.extra,
            shape: if full {
                MetadataShape::Full
            } else {
                MetadataShape::Sparse
            },
        }
    }
}

/// A vertex in the workflow graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Type-prefixed identifier, e.g. `COMMIT_a1b2c3` or `PR_42`.
    pub id: String,

    #[serde(alias = "type")]
    pub node_type: NodeType,

    /// Normalized status.
    pub status: String,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub metadata: Option<NodeMetadata>,
}

/// A directed relationship between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Edge {
    #[serde(rename = "from", alias = "from_node")]
    pub from_node: String,

    #[serde(rename = "to", alias = "to_node")]
    pub to_node: String,

    #[serde(alias = "type")]
    pub edge_type: EdgeType,
}

impl Edge {
    pub fn new(from_node: impl Into<String>, to_node: impl Into<String>, edge_type: EdgeType) -> Self {
        Self {
            from_node: from_node.into(),
            to_node: to_node.into(),
            edge_type,
        }
    }
}

/// Nodes plus edges, built wholesale from one event batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkflowGraph {
    #[serde(default)]
    pub nodes: Vec<Node>,

    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl WorkflowGraph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edges_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.from_node == id)
    }

    pub fn edges_to<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.to_node == id)
    }

    pub fn edges_of_type(&self, edge_type: EdgeType) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |e| e.edge_type == edge_type)
    }
}

/// Response envelope wrapping a workflow graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GraphEnvelope {
    pub workflow_graph: WorkflowGraph,
}

impl From<WorkflowGraph> for GraphEnvelope {
    fn from(workflow_graph: WorkflowGraph) -> Self {
        Self { workflow_graph }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_type_known_and_other() {
        assert_eq!(NodeType::from("ci_run".to_string()), NodeType::CiRun);
        assert_eq!(
            NodeType::from("incident".to_string()),
            NodeType::Other("incident".to_string())
        );
        assert_eq!(String::from(NodeType::PullRequest), "pull_request");
        assert_eq!(String::from(NodeType::Other("incident".into())), "incident");
    }

    #[test]
    fn test_edge_wire_names() {
        let edge = Edge::new("ISSUE_PROJ-101", "PR_42", EdgeType::DependsOn);
        let value = serde_json::to_value(&edge).unwrap();
        assert_eq!(
            value,
            json!({ "from": "ISSUE_PROJ-101", "to": "PR_42", "edge_type": "depends_on" })
        );
    }

    #[test]
    fn test_edge_accepts_internal_names() {
        let edge: Edge = serde_json::from_value(json!({
            "from_node": "PR_42",
            "to_node": "CI_77",
            "type": "triggers"
        }))
        .unwrap();
        assert_eq!(edge, Edge::new("PR_42", "CI_77", EdgeType::Triggers));
    }

    #[test]
    fn test_metadata_keeps_null_fields() {
        let metadata = NodeMetadata {
            source: Some(Source::Git),
            ..Default::default()
        };
        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(
            value,
            json!({ "source": "git", "author": null, "assignee": null, "branch": null })
        );
    }

    #[test]
    fn test_metadata_extra_flattened() {
        let metadata = NodeMetadata::default().with_extra("priority", json!("high"));
        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(value["priority"], "high");

        let back: NodeMetadata = serde_json::from_value(value).unwrap();
        assert_eq!(back.extra.get("priority"), Some(&json!("high")));
        assert!(back.author.is_none());
        assert_eq!(back, metadata);
    }

    #[test]
    fn test_sparse_metadata_omits_unset_keys() {
        let metadata = NodeMetadata::sparse().with_extra("error", json!("Test suite failed"));
        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(value, json!({ "error": "Test suite failed" }));

        let back: NodeMetadata = serde_json::from_value(value).unwrap();
        assert_eq!(back.shape, MetadataShape::Sparse);
        assert_eq!(back, metadata);
    }

    #[test]
    fn test_partial_known_keys_decode_sparse() {
        let back: NodeMetadata =
            serde_json::from_value(json!({ "author": "dev1", "branch": null })).unwrap();
        assert_eq!(back.shape, MetadataShape::Sparse);
        assert_eq!(back.author.as_deref(), Some("dev1"));
        assert_eq!(serde_json::to_value(&back).unwrap(), json!({ "author": "dev1" }));
    }

    #[test]
    fn test_graph_lookups() {
        let ts = Utc::now();
        let node = |id: &str, node_type: NodeType| Node {
            id: id.to_string(),
            node_type,
            status: "open".to_string(),
            created_at: ts,
            metadata: None,
        };
        let graph = WorkflowGraph::new(
            vec![node("PR_1", NodeType::PullRequest), node("CI_1", NodeType::CiRun)],
            vec![Edge::new("PR_1", "CI_1", EdgeType::Triggers)],
        );

        assert!(graph.node("PR_1").is_some());
        assert!(graph.node("PR_2").is_none());
        assert_eq!(graph.edges_from("PR_1").count(), 1);
        assert_eq!(graph.edges_to("PR_1").count(), 0);
        assert_eq!(graph.edges_of_type(EdgeType::Blocks).count(), 0);
    }

    #[test]
    fn test_empty_graph_deserializes_from_empty_object() {
        let graph: WorkflowGraph = serde_json::from_str("{}").unwrap();
        assert!(graph.is_empty());
    }
}
