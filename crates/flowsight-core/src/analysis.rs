//! Per-node and graph-wide metrics over a workflow graph.
//!
//! Downstream consumers (bottleneck detection, recommendations) read these
//! rather than walking the graph themselves.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{EdgeType, WorkflowGraph};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Metrics computed for a single node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeMetrics {
    pub node_id: String,

    /// Hours between the node's creation and the analysis instant.
    pub age_hours: f64,

    /// Length of the longest chain of incoming edges ending at this node.
    #[serde(default)]
    pub dep_depth: usize,
}

/// Aggregate metrics for the entire graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GraphMetrics {
    /// Largest gap between consecutive node creation times.
    #[serde(default)]
    pub longest_idle_gap_hours: f64,

    #[serde(default)]
    pub total_nodes: usize,

    /// Nodes targeted by a `blocks` edge or carrying a "blocked" status.
    #[serde(default)]
    pub blocked_nodes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub node_metrics: Vec<NodeMetrics>,
    pub graph_metrics: GraphMetrics,
}

/// Response envelope wrapping analysis results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisEnvelope {
    pub analysis: AnalysisResult,
}

impl From<AnalysisResult> for AnalysisEnvelope {
    fn from(analysis: AnalysisResult) -> Self {
        Self { analysis }
    }
}

fn hours_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

const UNSEEN: usize = usize::MAX;

/// Strongly connected components of the successor graph (Tarjan, with an
/// explicit work stack in place of recursion).
///
/// Returns the component id of every node and the component count. Ids are
/// assigned sinks first: every edge between two components points from a
/// higher id to a lower one.
fn components(succs: &[Vec<usize>]) -> (Vec<usize>, usize) {
    let n = succs.len();
    let mut index = vec![UNSEEN; n];
    let mut low = vec![0; n];
    let mut on_stack = vec![false; n];
    let mut stack = Vec::new();
    let mut comp = vec![UNSEEN; n];
    let mut count = 0;
    let mut next = 0;
    // (node, position of the next successor to look at)
    let mut work: Vec<(usize, usize)> = Vec::new();

    for root in 0..n {
        if index[root] != UNSEEN {
            continue;
        }
        index[root] = next;
        low[root] = next;
        next += 1;
        stack.push(root);
        on_stack[root] = true;
        work.push((root, 0));

        while let Some(frame) = work.last_mut() {
            let v = frame.0;
            if let Some(&w) = succs[v].get(frame.1) {
                frame.1 += 1;
                if index[w] == UNSEEN {
                    index[w] = next;
                    low[w] = next;
                    next += 1;
                    stack.push(w);
                    on_stack[w] = true;
                    work.push((w, 0));
                } else if on_stack[w] {
                    low[v] = low[v].min(index[w]);
                }
                continue;
            }

            work.pop();
            if let Some(&(parent, _)) = work.last() {
                low[parent] = low[parent].min(low[v]);
            }
            if low[v] == index[v] {
                while let Some(w) = stack.pop() {
                    on_stack[w] = false;
                    comp[w] = count;
                    if w == v {
                        break;
                    }
                }
                count += 1;
            }
        }
    }

    (comp, count)
}

/// Longest incoming chain per node, counted over edges between distinct
/// components. Nodes sharing a cycle share a depth.
fn dep_depths(succs: &[Vec<usize>]) -> Vec<usize> {
    let (comp, count) = components(succs);

    let mut members = vec![Vec::new(); count];
    for (node, &c) in comp.iter().enumerate() {
        members[c].push(node);
    }

    let mut depth = vec![0usize; count];
    for c in (0..count).rev() {
        let here = depth[c];
        for &v in &members[c] {
            for &w in &succs[v] {
                let target = comp[w];
                if target != c {
                    depth[target] = depth[target].max(here + 1);
                }
            }
        }
    }

    comp.into_iter().map(|c| depth[c]).collect()
}

/// Compute node and graph metrics as of `now`.
///
/// Edges whose endpoints are missing from the graph are ignored.
pub fn analyze(graph: &WorkflowGraph, now: DateTime<Utc>) -> AnalysisResult {
    let index: HashMap<&str, usize> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    let mut succs = vec![Vec::new(); graph.nodes.len()];
    for edge in &graph.edges {
        if let (Some(&from), Some(&to)) = (
            index.get(edge.from_node.as_str()),
            index.get(edge.to_node.as_str()),
        ) {
            succs[from].push(to);
        }
    }

    let node_metrics = graph
        .nodes
        .iter()
        .zip(dep_depths(&succs))
        .map(|(node, dep_depth)| NodeMetrics {
            node_id: node.id.clone(),
            age_hours: hours_between(node.created_at, now),
            dep_depth,
        })
        .collect();

    let mut created: Vec<DateTime<Utc>> = graph.nodes.iter().map(|n| n.created_at).collect();
    created.sort();
    let longest_idle_gap_hours = created
        .windows(2)
        .map(|w| hours_between(w[0], w[1]))
        .fold(0.0, f64::max);

    let mut blocked: HashSet<&str> = graph
        .edges_of_type(EdgeType::Blocks)
        .map(|e| e.to_node.as_str())
        .filter(|id| index.contains_key(id))
        .collect();
    blocked.extend(
        graph
            .nodes
            .iter()
            .filter(|n| n.status.eq_ignore_ascii_case("blocked"))
            .map(|n| n.id.as_str()),
    );

    tracing::debug!(
        event = "analysis.finished",
        nodes = graph.nodes.len(),
        blocked = blocked.len(),
    );

    AnalysisResult {
        node_metrics,
        graph_metrics: GraphMetrics {
            longest_idle_gap_hours,
            total_nodes: graph.nodes.len(),
            blocked_nodes: blocked.len(),
        },
    }
}
