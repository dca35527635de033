//! CRM client, record types, and company relationship resolution.

pub mod http;
pub mod resolver;
pub mod variations;

pub use http::HttpCrmClient;
pub use resolver::{CompanyRelationshipResolver, MatchSource, RelationshipMatch, RelationshipRecord};
pub use variations::CompanyVariationGenerator;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CrmError;

// ── Record types ────────────────────────────────────────────────────
//
// One struct per CRM record kind. Dates stay as raw strings; the ROE
// qualifier owns parsing so malformed values surface there, not here.

/// A CRM contact with its account fields flattened in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrmContact {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub account_id: Option<String>,
    pub account_name: Option<String>,
    pub customer_designation: Option<String>,
    pub account_owner: Option<String>,
    pub last_activity_date: Option<String>,
    pub system_modstamp: Option<String>,
}

/// A CRM lead, possibly linked to an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrmLead {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub status: Option<String>,
    pub associated_account_id: Option<String>,
    pub last_activity_date: Option<String>,
    pub system_modstamp: Option<String>,
}

/// A CRM account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrmAccount {
    pub id: String,
    pub name: Option<String>,
    pub website: Option<String>,
    pub customer_designation: Option<String>,
    pub owner: Option<String>,
    pub last_activity_date: Option<String>,
    pub system_modstamp: Option<String>,
}

/// An open CRM opportunity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrmOpportunity {
    pub id: String,
    pub name: Option<String>,
    pub owner: Option<String>,
}

// ── Client trait ────────────────────────────────────────────────────

/// Trait for CRM lookups — pure I/O, no matching logic.
///
/// Search priority, lead enrichment, and domain guarding live in
/// [`CompanyRelationshipResolver`]; implementations only fetch.
#[async_trait]
pub trait CrmClient: Send + Sync {
    /// Contact with this exact email address, if any.
    async fn contact_by_email(&self, email: &str) -> Result<Option<CrmContact>, CrmError>;

    /// Lead with this exact email address, if any.
    async fn lead_by_email(&self, email: &str) -> Result<Option<CrmLead>, CrmError>;

    /// Account by record ID.
    async fn account_by_id(&self, id: &str) -> Result<Option<CrmAccount>, CrmError>;

    /// First account whose website contains the fragment (a bare domain).
    async fn account_by_website_fragment(
        &self,
        fragment: &str,
    ) -> Result<Option<CrmAccount>, CrmError>;

    /// Accounts whose name fields match the search term.
    async fn search_accounts_by_name(&self, name: &str) -> Result<Vec<CrmAccount>, CrmError>;

    /// Number of open opportunities on an account.
    async fn count_open_opportunities(&self, account_id: &str) -> Result<u32, CrmError>;

    /// One open opportunity on an account, if any.
    async fn first_open_opportunity(
        &self,
        account_id: &str,
    ) -> Result<Option<CrmOpportunity>, CrmError>;
}
