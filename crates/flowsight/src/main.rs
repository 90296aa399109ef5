//! FlowSight normalizer
//!
//! Reads a `{"raw_events": [...]}` payload on stdin and writes the
//! `{"workflow_graph": {...}}` envelope to stdout. Logging goes to stderr.
//! Behaviour is configured through `FLOWSIGHT_*` environment variables.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use flowsight_core::{
    normalize_with, parse_payload, telemetry, FlowsightConfig, GraphEnvelope, METRICS,
};
use tracing::info;

fn main() -> Result<()> {
    let config = FlowsightConfig::from_env().context("Failed to load FlowSight config")?;
    telemetry::init_from_config(&config.logging).context("Failed to initialise logging")?;

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read raw events from stdin")?;

    let payload = parse_payload(&input).context("Invalid raw events payload")?;
    info!(events = payload.raw_events.len(), "payload accepted");

    let graph = normalize_with(&payload.raw_events, &config.normalizer);
    let envelope = GraphEnvelope::from(graph);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &envelope).context("Failed to write workflow graph")?;
    writeln!(out)?;

    METRICS.flush();
    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn envelope_serializes_for_stdout() {
        let graph = flowsight_core::normalize(&[]);
        let envelope = flowsight_core::GraphEnvelope::from(graph);
        let json = serde_json::to_string(&envelope).unwrap();
        assert_eq!(json, r#"{"workflow_graph":{"nodes":[],"edges":[]}}"#);
    }
}
