//! Rendering a classified roster to files.
//!
//! The sheet layout is shared between the workbook and the CSV backups:
//! every category carries the five base columns, and three categories
//! append columns of their own (reason for disqualification, account
//! references for customers, opportunity references for open deals).

pub mod workbook;

use async_trait::async_trait;

use crate::error::OutputError;
use crate::model::{ClassifiedProspect, ClassifiedRoster, Verdict};

pub use workbook::WorkbookSink;

/// Written in the Email column when no strategy produced an address.
pub const EMAIL_PLACEHOLDER: &str = "EMAIL_NOT_FOUND";

/// Verdict order used for workbook tabs and CSV backups.
pub const REPORT_ORDER: [Verdict; 5] = [
    Verdict::CurrentCustomer,
    Verdict::OpenOpportunity,
    Verdict::Qualified,
    Verdict::NoRelationship,
    Verdict::Disqualified,
];

/// Columns every category carries, in order.
pub const BASE_HEADERS: [&str; 5] = ["First Name", "Last Name", "Company", "Title", "Email"];

/// Consumes the grouped roster at the end of a run and writes it out.
#[async_trait]
pub trait OutputSink: Send + Sync {
    async fn write(&self, roster: &ClassifiedRoster) -> Result<(), OutputError>;
}

/// Worksheet tab name for a verdict.
pub fn sheet_name(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::CurrentCustomer => "Current Customers",
        Verdict::OpenOpportunity => "Open Opportunities",
        Verdict::Qualified => "Qualified Prospects",
        Verdict::NoRelationship => "No CRM Match",
        Verdict::Disqualified => "Disqualified - ROE",
    }
}

fn extra_headers(verdict: Verdict) -> &'static [&'static str] {
    match verdict {
        Verdict::CurrentCustomer => &["Relationship Owner", "Account ID", "Account URL"],
        Verdict::OpenOpportunity => &["Opportunity Owner", "Opportunity ID", "Opportunity URL"],
        Verdict::Disqualified => &["Reason"],
        Verdict::Qualified | Verdict::NoRelationship => &[],
    }
}

/// Full header row for a verdict's sheet.
pub fn headers(verdict: Verdict) -> Vec<&'static str> {
    let mut headers = BASE_HEADERS.to_vec();
    headers.extend_from_slice(extra_headers(verdict));
    headers
}

/// Cell values for one prospect, aligned with [`headers`].
///
/// The first five values are always the base columns; CSV backups slice
/// those off and drop the rest.
pub fn row_values(verdict: Verdict, classified: &ClassifiedProspect) -> Vec<String> {
    let prospect = &classified.prospect;
    let classification = &classified.classification;
    let mut values = vec![
        prospect.first_name.clone(),
        prospect.last_name.clone(),
        prospect.company.clone(),
        prospect.title.clone(),
        classified
            .email
            .clone()
            .unwrap_or_else(|| EMAIL_PLACEHOLDER.to_string()),
    ];
    match verdict {
        Verdict::CurrentCustomer => {
            values.push(classification.account_owner.clone().unwrap_or_default());
            values.push(classification.account_id.clone().unwrap_or_default());
            values.push(classification.account_url.clone().unwrap_or_default());
        }
        Verdict::OpenOpportunity => {
            values.push(classification.opportunity_owner.clone().unwrap_or_default());
            values.push(classification.opportunity_id.clone().unwrap_or_default());
            values.push(classification.opportunity_url.clone().unwrap_or_default());
        }
        Verdict::Disqualified => values.push(classification.rationale.clone()),
        Verdict::Qualified | Verdict::NoRelationship => {}
    }
    values
}
