//! Structured observability hooks for normalization runs.
//!
//! This module provides:
//! - A batch-scoped tracing span via the `NormalizeSpan` RAII guard
//! - Emission functions for normalization start/finish, inferred edges and
//!   validation failures
//!
//! Events are emitted at `info!` level except per-edge events (`debug!`) and
//! validation failures (`warn!`).

use tracing::{debug, info, warn};

use crate::domain::{EdgeType, ValidationError};

/// RAII guard that enters a batch-scoped tracing span for one normalization.
///
/// # Example
///
/// ```ignore
/// let _span = NormalizeSpan::enter(events.len());
/// // every tracing call until the guard drops carries batch_size
/// ```
pub struct NormalizeSpan {
    _span: tracing::span::EnteredSpan,
}

impl NormalizeSpan {
    /// Create and enter a span tagged with the batch size.
    pub fn enter(batch_size: usize) -> Self {
        let span = tracing::info_span!("flowsight.normalize", batch_size = batch_size);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: normalization of a batch started.
pub fn emit_normalize_started(batch_size: usize, link_strategy: &str) {
    info!(
        event = "normalize.started",
        batch_size = batch_size,
        link_strategy = %link_strategy,
    );
}

/// Emit event: normalization finished with the resulting graph size.
pub fn emit_normalize_finished(nodes: usize, edges: usize) {
    info!(event = "normalize.finished", nodes = nodes, edges = edges);
}

/// Emit event: an edge was inferred between two nodes.
pub fn emit_edge_inferred(from: &str, to: &str, edge_type: EdgeType) {
    debug!(
        event = "normalize.edge_inferred",
        from = %from,
        to = %to,
        edge_type = %edge_type,
    );
}

/// Emit event: an incoming payload failed validation (warning level).
pub fn emit_validation_failed(error: &ValidationError) {
    warn!(event = "payload.validation_failed", error = %error);
}
