//! Run progress tracking — phase machine, snapshots, and the file sink.
//!
//! Progress is observability only. Classification never reads it, and a
//! sink that cannot write must not take the run down with it; callers
//! log publish failures and move on.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ProgressError;
use crate::model::{EmailStats, Prospect, VerdictCounts};

/// File name the default sink writes under its directory.
pub const PROGRESS_FILE: &str = "workflow_progress.json";

/// The phases of a triage run.
///
/// Discovery and classification cycle once per prospect:
/// NotStarted → EmailDiscovery → CrmClassification → (EmailDiscovery for
/// the next prospect | GeneratingOutputs) → Completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    NotStarted,
    EmailDiscovery,
    CrmClassification,
    GeneratingOutputs,
    Completed,
}

impl RunPhase {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: RunPhase) -> bool {
        use RunPhase::*;
        matches!(
            (self, target),
            (NotStarted, EmailDiscovery)
                | (EmailDiscovery, CrmClassification)
                | (CrmClassification, EmailDiscovery)
                | (CrmClassification, GeneratingOutputs)
                | (GeneratingOutputs, Completed)
        )
    }

    /// Whether this phase is terminal (the run is done).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl Default for RunPhase {
    fn default() -> Self {
        Self::NotStarted
    }
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotStarted => "not_started",
            Self::EmailDiscovery => "email_discovery",
            Self::CrmClassification => "crm_classification",
            Self::GeneratingOutputs => "generating_outputs",
            Self::Completed => "completed",
        };
        write!(f, "{s}")
    }
}

/// Point-in-time view of a run, persisted after every phase flip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub run_id: Uuid,
    pub phase: RunPhase,
    /// Prospects fully handled so far.
    pub processed: usize,
    pub total: usize,
    pub email_stats: EmailStats,
    pub verdict_stats: VerdictCounts,
    /// The prospect currently in flight, if any.
    pub current: Option<Prospect>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl ProgressSnapshot {
    pub fn new(run_id: Uuid, total: usize) -> Self {
        let now = Utc::now();
        Self {
            run_id,
            phase: RunPhase::default(),
            processed: 0,
            total,
            email_stats: EmailStats::default(),
            verdict_stats: VerdictCounts::default(),
            current: None,
            started_at: now,
            updated_at: now,
            finished_at: None,
        }
    }

    /// Move to `phase` and refresh the update timestamp. An irregular
    /// step is logged but still applied; progress must never wedge a
    /// run over its own bookkeeping.
    pub fn advance(&mut self, phase: RunPhase) {
        if phase != self.phase && !self.phase.can_transition_to(phase) {
            tracing::warn!(from = %self.phase, to = %phase, "irregular phase transition");
        }
        self.phase = phase;
        self.updated_at = Utc::now();
        if phase.is_terminal() {
            self.finished_at = Some(self.updated_at);
        }
    }
}

/// Where progress snapshots go.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn publish(&self, snapshot: &ProgressSnapshot) -> Result<(), ProgressError>;
}

/// Persists snapshots as pretty JSON under a directory.
///
/// Writes go to a temp file first and are renamed into place, so a
/// concurrent reader never sees a torn snapshot.
pub struct FileProgressSink {
    path: PathBuf,
}

impl FileProgressSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(PROGRESS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ProgressSink for FileProgressSink {
    async fn publish(&self, snapshot: &ProgressSnapshot) -> Result<(), ProgressError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
