//! Metrics over the prebuilt demo graph and over normalizer output.

use chrono::{DateTime, Duration, TimeZone, Utc};
use flowsight_core::{
    analyze, mock_raw_events, mock_workflow_graph, normalize, AnalysisEnvelope, NodeMetrics,
};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 29, 14, 0, 0).unwrap()
}

fn metrics_for<'a>(metrics: &'a [NodeMetrics], id: &str) -> &'a NodeMetrics {
    metrics
        .iter()
        .find(|m| m.node_id == id)
        .unwrap_or_else(|| panic!("no metrics for {id}"))
}

#[test]
fn prebuilt_graph_metrics() {
    let graph = mock_workflow_graph(base());
    let result = analyze(&graph, base() + Duration::hours(24));

    assert_eq!(result.graph_metrics.total_nodes, 7);
    assert_eq!(result.graph_metrics.blocked_nodes, 1);
    // Creation times in hours: -12, 0, 2, 3, 5, 6, 18.
    assert_eq!(result.graph_metrics.longest_idle_gap_hours, 12.0);

    let m = &result.node_metrics;
    assert_eq!(m.len(), 7);
    assert_eq!(metrics_for(m, "COMMIT_a1b2c3d").dep_depth, 0);
    assert_eq!(metrics_for(m, "ISSUE_PROJ-101").dep_depth, 0);
    assert_eq!(metrics_for(m, "PR_42").dep_depth, 1);
    assert_eq!(metrics_for(m, "CI_77").dep_depth, 2);
    assert_eq!(metrics_for(m, "ISSUE_PROJ-102").dep_depth, 2);
    assert_eq!(metrics_for(m, "PR_43").dep_depth, 0);

    assert_eq!(metrics_for(m, "COMMIT_a1b2c3d").age_hours, 24.0);
    assert_eq!(metrics_for(m, "ISSUE_PROJ-101").age_hours, 36.0);
}

#[test]
fn node_metrics_follow_graph_order() {
    let graph = normalize(&mock_raw_events(base()));
    let result = analyze(&graph, base());
    let ids: Vec<&str> = result.node_metrics.iter().map(|m| m.node_id.as_str()).collect();
    let expected: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, expected);
}

#[test]
fn normalized_demo_counts_blocked_status() {
    // No blocks edges come out of the normalizer, but PROJ-102 is "Blocked".
    let graph = normalize(&mock_raw_events(base()));
    let result = analyze(&graph, base());
    assert_eq!(result.graph_metrics.blocked_nodes, 1);
    assert_eq!(result.graph_metrics.total_nodes, 8);
}

#[test]
fn envelope_serializes_analysis_key() {
    let result = analyze(&mock_workflow_graph(base()), base());
    let value = serde_json::to_value(AnalysisEnvelope::from(result)).unwrap();
    assert!(value["analysis"]["node_metrics"].is_array());
    assert_eq!(value["analysis"]["graph_metrics"]["total_nodes"], 7);
}
