//! Run orchestration: roster in, classified results out.
//!
//! One `Runner` per run. Prospects are processed strictly in input
//! order, one at a time:
//! 1. `EmailWaterfall::discover` — find an address for the prospect
//! 2. `ClassificationEngine::classify` — CRM relationship verdict
//! 3. Accumulate into the verdict bucket
//!
//! A progress snapshot is published before each phase and around the
//! output stage. Snapshots are observability only: a sink failure is
//! logged and the run continues.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::classify::ClassificationEngine;
use crate::email::EmailWaterfall;
use crate::error::Error;
use crate::model::{ClassifiedProspect, ClassifiedRoster, EmailStats, Prospect, RunReport};
use crate::output::OutputSink;
use crate::progress::{ProgressSink, ProgressSnapshot, RunPhase};

/// Owns the engines and the run-scoped state for one triage run.
pub struct Runner {
    waterfall: EmailWaterfall,
    engine: ClassificationEngine,
    output: Arc<dyn OutputSink>,
    progress: Arc<dyn ProgressSink>,
}

impl Runner {
    pub fn new(
        waterfall: EmailWaterfall,
        engine: ClassificationEngine,
        output: Arc<dyn OutputSink>,
        progress: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            waterfall,
            engine,
            output,
            progress,
        }
    }

    /// Process every prospect, write the outputs, and report the run.
    pub async fn run(&mut self, prospects: Vec<Prospect>) -> Result<RunReport, Error> {
        let run_id = Uuid::new_v4();
        let total = prospects.len();
        let started_at = Utc::now();
        info!(%run_id, total, "starting triage run");

        let mut snapshot = ProgressSnapshot::new(run_id, total);
        snapshot.advance(RunPhase::EmailDiscovery);
        self.publish(&snapshot).await;

        let mut roster = ClassifiedRoster::default();
        let mut email_stats = EmailStats::default();

        for (index, prospect) in prospects.into_iter().enumerate() {
            info!(
                position = index + 1,
                total,
                name = %prospect.full_name(),
                company = %prospect.company,
                "processing prospect"
            );

            snapshot.processed = index;
            snapshot.current = Some(prospect.clone());
            snapshot.advance(RunPhase::EmailDiscovery);
            self.publish(&snapshot).await;

            let discovery = self.waterfall.discover(&prospect).await;
            match &discovery.email {
                Some(email) => {
                    email_stats.found += 1;
                    info!(%email, "email discovered");
                }
                None => {
                    email_stats.not_found += 1;
                    info!("no email discovered");
                }
            }
            debug!(trace = %discovery.trace.join("; "), "discovery trace");

            snapshot.email_stats = email_stats;
            snapshot.advance(RunPhase::CrmClassification);
            self.publish(&snapshot).await;

            let classification = self
                .engine
                .classify(&prospect, discovery.email.as_deref())
                .await;
            snapshot.verdict_stats.record(classification.verdict);

            roster.push(ClassifiedProspect {
                prospect,
                email: discovery.email,
                discovery_trace: discovery.trace,
                classification,
            });
        }

        snapshot.processed = total;
        snapshot.current = None;
        snapshot.advance(RunPhase::GeneratingOutputs);
        self.publish(&snapshot).await;

        self.output.write(&roster).await?;

        snapshot.advance(RunPhase::Completed);
        self.publish(&snapshot).await;

        let counts = roster.counts();
        info!(
            found = email_stats.found,
            not_found = email_stats.not_found,
            current_customers = counts.current_customer,
            open_opportunities = counts.open_opportunity,
            qualified = counts.qualified,
            no_match = counts.no_relationship,
            disqualified = counts.disqualified,
            "triage run finished"
        );

        Ok(RunReport {
            run_id,
            total,
            email_stats,
            classified: roster,
            started_at,
            finished_at: Utc::now(),
        })
    }

    async fn publish(&self, snapshot: &ProgressSnapshot) {
        if let Err(e) = self.progress.publish(snapshot).await {
            warn!(error = %e, "progress snapshot not written");
        }
    }
}
