//! Shared types for the prospect triage pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Prospect ────────────────────────────────────────────────────────

/// One person from the input roster.
///
/// The roster loader trims every field; `first_name`, `last_name` and
/// `company` are guaranteed non-empty, `title` may be blank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prospect {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub title: String,
}

impl Prospect {
    /// Display name for logs and progress output.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// ── Verdict ─────────────────────────────────────────────────────────

/// Final relationship classification for a prospect's company.
///
/// Exactly one verdict per prospect; the output workbook has one sheet
/// per verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The company is an existing customer in the CRM.
    CurrentCustomer,
    /// The company has at least one open opportunity.
    OpenOpportunity,
    /// CRM relationship exists but is stale enough to engage.
    Qualified,
    /// No CRM record matched the person or the company.
    NoRelationship,
    /// Recent CRM activity puts the company off limits.
    Disqualified,
}

impl Verdict {
    /// Short label for logging and file names.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CurrentCustomer => "current_customer",
            Self::OpenOpportunity => "open_opportunity",
            Self::Qualified => "qualified",
            Self::NoRelationship => "no_relationship",
            Self::Disqualified => "disqualified",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ── Classification ──────────────────────────────────────────────────

/// A verdict with its explanation and any CRM record references.
///
/// Only the fields relevant to the verdict are populated: customers get
/// the account trio, open opportunities the opportunity trio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub verdict: Verdict,
    /// Human-readable reason, including which CRM record matched.
    pub rationale: String,
    /// True when this verdict was replayed from the company-level cache.
    pub from_cache: bool,
    pub account_owner: Option<String>,
    pub account_id: Option<String>,
    pub account_url: Option<String>,
    pub opportunity_owner: Option<String>,
    pub opportunity_id: Option<String>,
    pub opportunity_url: Option<String>,
}

impl Classification {
    /// A classification carrying only a verdict and a reason.
    pub fn bare(verdict: Verdict, rationale: impl Into<String>) -> Self {
        Self {
            verdict,
            rationale: rationale.into(),
            from_cache: false,
            account_owner: None,
            account_id: None,
            account_url: None,
            opportunity_owner: None,
            opportunity_id: None,
            opportunity_url: None,
        }
    }
}

// ── Classified prospect ─────────────────────────────────────────────

/// A roster prospect after email discovery and CRM classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedProspect {
    pub prospect: Prospect,
    /// Discovered email, if any strategy produced one.
    pub email: Option<String>,
    /// One note per discovery strategy attempted, in order.
    pub discovery_trace: Vec<String>,
    pub classification: Classification,
}

/// All classified prospects, bucketed by verdict.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifiedRoster {
    pub current_customers: Vec<ClassifiedProspect>,
    pub open_opportunities: Vec<ClassifiedProspect>,
    pub qualified: Vec<ClassifiedProspect>,
    pub no_relationship: Vec<ClassifiedProspect>,
    pub disqualified: Vec<ClassifiedProspect>,
}

impl ClassifiedRoster {
    /// Route a classified prospect into its verdict bucket.
    pub fn push(&mut self, classified: ClassifiedProspect) {
        self.bucket_mut(classified.classification.verdict)
            .push(classified);
    }

    pub fn bucket(&self, verdict: Verdict) -> &[ClassifiedProspect] {
        match verdict {
            Verdict::CurrentCustomer => &self.current_customers,
            Verdict::OpenOpportunity => &self.open_opportunities,
            Verdict::Qualified => &self.qualified,
            Verdict::NoRelationship => &self.no_relationship,
            Verdict::Disqualified => &self.disqualified,
        }
    }

    fn bucket_mut(&mut self, verdict: Verdict) -> &mut Vec<ClassifiedProspect> {
        match verdict {
            Verdict::CurrentCustomer => &mut self.current_customers,
            Verdict::OpenOpportunity => &mut self.open_opportunities,
            Verdict::Qualified => &mut self.qualified,
            Verdict::NoRelationship => &mut self.no_relationship,
            Verdict::Disqualified => &mut self.disqualified,
        }
    }

    pub fn counts(&self) -> VerdictCounts {
        VerdictCounts {
            current_customer: self.current_customers.len(),
            open_opportunity: self.open_opportunities.len(),
            qualified: self.qualified.len(),
            no_relationship: self.no_relationship.len(),
            disqualified: self.disqualified.len(),
        }
    }

    pub fn total(&self) -> usize {
        self.current_customers.len()
            + self.open_opportunities.len()
            + self.qualified.len()
            + self.no_relationship.len()
            + self.disqualified.len()
    }
}

// ── Run statistics ──────────────────────────────────────────────────

/// Email discovery tallies for a run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EmailStats {
    pub found: usize,
    pub not_found: usize,
}

/// Per-verdict tallies for a run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct VerdictCounts {
    pub current_customer: usize,
    pub open_opportunity: usize,
    pub qualified: usize,
    pub no_relationship: usize,
    pub disqualified: usize,
}

impl VerdictCounts {
    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::CurrentCustomer => self.current_customer += 1,
            Verdict::OpenOpportunity => self.open_opportunity += 1,
            Verdict::Qualified => self.qualified += 1,
            Verdict::NoRelationship => self.no_relationship += 1,
            Verdict::Disqualified => self.disqualified += 1,
        }
    }
}

// ── Run report ──────────────────────────────────────────────────────

/// Everything a completed run produced, returned by the pipeline runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    /// Number of prospects read from the roster.
    pub total: usize,
    pub email_stats: EmailStats,
    pub classified: ClassifiedRoster,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classified(verdict: Verdict) -> ClassifiedProspect {
        ClassifiedProspect {
            prospect: Prospect {
                first_name: "Ann".into(),
                last_name: "Lee".into(),
                company: "Acme".into(),
                title: "VP".into(),
            },
            email: Some("ann.lee@acme.com".into()),
            discovery_trace: vec![],
            classification: Classification::bare(verdict, "test"),
        }
    }

    #[test]
    fn verdict_labels() {
        assert_eq!(Verdict::CurrentCustomer.label(), "current_customer");
        assert_eq!(Verdict::OpenOpportunity.label(), "open_opportunity");
        assert_eq!(Verdict::Qualified.label(), "qualified");
        assert_eq!(Verdict::NoRelationship.label(), "no_relationship");
        assert_eq!(Verdict::Disqualified.label(), "disqualified");
    }

    #[test]
    fn verdict_serializes_snake_case() {
        let json = serde_json::to_value(Verdict::OpenOpportunity).unwrap();
        assert_eq!(json, "open_opportunity");
    }

    #[test]
    fn roster_routes_by_verdict() {
        let mut roster = ClassifiedRoster::default();
        roster.push(classified(Verdict::Qualified));
        roster.push(classified(Verdict::Qualified));
        roster.push(classified(Verdict::Disqualified));

        assert_eq!(roster.qualified.len(), 2);
        assert_eq!(roster.disqualified.len(), 1);
        assert_eq!(roster.current_customers.len(), 0);
        assert_eq!(roster.total(), 3);

        let counts = roster.counts();
        assert_eq!(counts.qualified, 2);
        assert_eq!(counts.disqualified, 1);
        assert_eq!(counts.no_relationship, 0);
    }

    #[test]
    fn verdict_counts_record() {
        let mut counts = VerdictCounts::default();
        counts.record(Verdict::CurrentCustomer);
        counts.record(Verdict::CurrentCustomer);
        counts.record(Verdict::NoRelationship);
        assert_eq!(counts.current_customer, 2);
        assert_eq!(counts.no_relationship, 1);
        assert_eq!(counts.open_opportunity, 0);
    }
}
