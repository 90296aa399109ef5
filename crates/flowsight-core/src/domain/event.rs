//! Raw events observed in source systems.
//!
//! A [`RawEvent`] is built once by an ingestion step from a source-specific
//! payload and is never mutated afterwards. The normalizer only reads it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event kind emitted for a git commit.
pub const COMMIT_KIND: &str = "commit";
/// Event kind emitted for a pull request.
pub const PULL_REQUEST_KIND: &str = "pull_request";
/// Event kind emitted for a CI workflow run.
pub const WORKFLOW_RUN_KIND: &str = "workflow_run";
/// Event kind emitted for an issue-tracker ticket.
pub const ISSUE_KIND: &str = "issue";
/// Event kind emitted for a deployment.
pub const DEPLOYMENT_KIND: &str = "deployment";

/// Source system an event was ingested from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Git,
    Github,
    Jira,
    Ci,
    Slack,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Git => "git",
            Source::Github => "github",
            Source::Jira => "jira",
            Source::Ci => "ci",
            Source::Slack => "slack",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An observation ingested from exactly one source system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawEvent {
    /// System the event came from.
    pub source: Source,

    /// Event subtype, e.g. `commit` or `workflow_run`.
    #[serde(alias = "type")]
    pub event_kind: String,

    /// Source-local identifier, unique within (source, event_kind).
    pub id: String,

    /// When the event occurred.
    pub timestamp: DateTime<Utc>,

    #[serde(default)]
    pub branch: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub author: Option<String>,

    #[serde(default)]
    pub assignee: Option<String>,

    /// CI outcome; only meaningful for workflow runs.
    #[serde(default)]
    pub conclusion: Option<String>,

    /// Issue-tracker key such as `PROJ-101`.
    #[serde(default)]
    pub key: Option<String>,
}

impl RawEvent {
    /// Create an event with only the mandatory fields set.
    pub fn new(
        source: Source,
        event_kind: impl Into<String>,
        id: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            source,
            event_kind: event_kind.into(),
            id: id.into(),
            timestamp,
            branch: None,
            status: None,
            author: None,
            assignee: None,
            conclusion: None,
            key: None,
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    pub fn with_conclusion(mut self, conclusion: impl Into<String>) -> Self {
        self.conclusion = Some(conclusion.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Whether the event carries a non-empty branch name.
    pub fn has_branch(&self) -> bool {
        self.branch.as_deref().is_some_and(|b| !b.is_empty())
    }
}

/// Batch of raw events as accepted at the ingestion boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawEventsPayload {
    pub raw_events: Vec<RawEvent>,
}

impl RawEventsPayload {
    pub fn new(raw_events: Vec<RawEvent>) -> Self {
        Self { raw_events }
    }
}
