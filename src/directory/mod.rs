//! Person-finder directory client.

pub mod http;

pub use http::HttpDirectoryClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DirectoryError;

/// A person returned by the directory's match endpoint.
///
/// The match endpoint often withholds the address on the first hit; the
/// `id` can then be used for a follow-up lookup that reveals it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonMatch {
    pub id: Option<String>,
    pub email: Option<String>,
}

/// A person returned by the company people search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonSummary {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Trait for person-finder directory lookups — pure I/O, no inference.
///
/// Pattern analysis and address generation live in the email waterfall;
/// implementations only fetch.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Match one person by name and company.
    async fn match_person(
        &self,
        first_name: &str,
        last_name: &str,
        company: &str,
    ) -> Result<Option<PersonMatch>, DirectoryError>;

    /// Fetch a person's record by directory ID.
    async fn person_by_id(&self, id: &str) -> Result<Option<PersonMatch>, DirectoryError>;

    /// List people working at a company.
    async fn search_people(
        &self,
        company: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PersonSummary>, DirectoryError>;
}
