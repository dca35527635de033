//! HTTP CRM client for a Salesforce-style REST API.
//!
//! Exact-field lookups go through SOQL (`/query`); fuzzy name search goes
//! through SOSL (`/search`) restricted to name fields so street addresses
//! in the CRM can't produce false matches.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::CrmConfig;
use crate::crm::{CrmAccount, CrmClient, CrmContact, CrmLead, CrmOpportunity};
use crate::error::CrmError;

/// Per-request timeout.
const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Error bodies are clipped to this many characters before reporting.
const ERROR_BODY_LIMIT: usize = 100;
/// REST API version in every endpoint path.
const API_VERSION: &str = "v59.0";

/// CRM client backed by a Salesforce-style REST API.
pub struct HttpCrmClient {
    base_url: String,
    access_token: SecretString,
    client: reqwest::Client,
}

impl HttpCrmClient {
    pub fn new(config: CrmConfig) -> Self {
        Self {
            base_url: config.base_url,
            access_token: config.access_token,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/services/data/{API_VERSION}/{endpoint}", self.base_url)
    }

    async fn get<T>(&self, endpoint: &str, statement: &str) -> Result<T, CrmError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .get(self.api_url(endpoint))
            .query(&[("q", statement)])
            .bearer_auth(self.access_token.expose_secret())
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .send()
            .await
            .map_err(map_transport)?;

        let status = response.status();
        match status {
            reqwest::StatusCode::TOO_MANY_REQUESTS => Err(CrmError::RateLimited),
            reqwest::StatusCode::UNAUTHORIZED => Err(CrmError::AuthFailed),
            _ if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                Err(CrmError::Http {
                    status: status.as_u16(),
                    body: clip(&body),
                })
            }
            _ => response
                .json()
                .await
                .map_err(|e| CrmError::InvalidResponse(e.to_string())),
        }
    }

    async fn query<T>(&self, soql: &str) -> Result<QueryResponse<T>, CrmError>
    where
        T: serde::de::DeserializeOwned,
    {
        self.get("query", soql).await
    }

    async fn search(&self, sosl: &str) -> Result<SearchResponse, CrmError> {
        self.get("search", sosl).await
    }
}

#[async_trait]
impl CrmClient for HttpCrmClient {
    async fn contact_by_email(&self, email: &str) -> Result<Option<CrmContact>, CrmError> {
        let response: QueryResponse<ContactRecord> = self.query(&contact_soql(email)).await?;
        Ok(response.records.into_iter().next().map(ContactRecord::into_contact))
    }

    async fn lead_by_email(&self, email: &str) -> Result<Option<CrmLead>, CrmError> {
        let response: QueryResponse<LeadRecord> = self.query(&lead_soql(email)).await?;
        Ok(response.records.into_iter().next().map(LeadRecord::into_lead))
    }

    async fn account_by_id(&self, id: &str) -> Result<Option<CrmAccount>, CrmError> {
        let response: QueryResponse<AccountRecord> = self.query(&account_by_id_soql(id)).await?;
        Ok(response.records.into_iter().next().map(AccountRecord::into_account))
    }

    async fn account_by_website_fragment(
        &self,
        fragment: &str,
    ) -> Result<Option<CrmAccount>, CrmError> {
        let response: QueryResponse<AccountRecord> =
            self.query(&account_by_website_soql(fragment)).await?;
        Ok(response.records.into_iter().next().map(AccountRecord::into_account))
    }

    async fn search_accounts_by_name(&self, name: &str) -> Result<Vec<CrmAccount>, CrmError> {
        let response = self.search(&account_name_sosl(name)).await?;
        Ok(response
            .search_records
            .into_iter()
            .filter(|record| record.is_account())
            .map(AccountRecord::into_account)
            .collect())
    }

    async fn count_open_opportunities(&self, account_id: &str) -> Result<u32, CrmError> {
        let response: QueryResponse<IgnoredRecord> =
            self.query(&open_opportunity_count_soql(account_id)).await?;
        Ok(response.total_size)
    }

    async fn first_open_opportunity(
        &self,
        account_id: &str,
    ) -> Result<Option<CrmOpportunity>, CrmError> {
        let response: QueryResponse<OpportunityRecord> =
            self.query(&open_opportunity_soql(account_id)).await?;
        Ok(response
            .records
            .into_iter()
            .next()
            .map(OpportunityRecord::into_opportunity))
    }
}

// ── Statement builders ──────────────────────────────────────────────

fn contact_soql(email: &str) -> String {
    format!(
        "SELECT Id, Name, Email, AccountId, Account.Name, Account.Customer_Designation__c, \
         Account.Owner.Name, LastActivityDate, SystemModstamp \
         FROM Contact WHERE Email = '{}' LIMIT 1",
        escape_soql(email)
    )
}

fn lead_soql(email: &str) -> String {
    format!(
        "SELECT Id, Name, Email, Company, Status, Associated_Account__c, \
         LastActivityDate, SystemModstamp \
         FROM Lead WHERE Email = '{}' LIMIT 1",
        escape_soql(email)
    )
}

fn account_by_id_soql(id: &str) -> String {
    format!(
        "SELECT Id, Name, Customer_Designation__c, Website, Owner.Name, \
         LastActivityDate, SystemModstamp \
         FROM Account WHERE Id = '{}'",
        escape_soql(id)
    )
}

fn account_by_website_soql(fragment: &str) -> String {
    format!(
        "SELECT Id, Name, Website, Customer_Designation__c, Owner.Name, \
         LastActivityDate, SystemModstamp \
         FROM Account WHERE Website LIKE '%{}%'",
        escape_soql(fragment)
    )
}

fn account_name_sosl(name: &str) -> String {
    format!(
        "FIND {{{}}} IN NAME FIELDS RETURNING Account(Id, Name, Website, \
         Customer_Designation__c, Owner.Name, LastActivityDate, SystemModstamp)",
        sanitize_sosl(name)
    )
}

fn open_opportunity_soql(account_id: &str) -> String {
    format!(
        "SELECT Id, Name, Owner.Name FROM Opportunity \
         WHERE AccountId = '{}' AND IsClosed = false LIMIT 1",
        escape_soql(account_id)
    )
}

fn open_opportunity_count_soql(account_id: &str) -> String {
    format!(
        "SELECT COUNT() FROM Opportunity WHERE AccountId = '{}' AND IsClosed = false",
        escape_soql(account_id)
    )
}

/// Escape a value for use inside a SOQL single-quoted literal.
fn escape_soql(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Sanitize a SOSL search term. `&` and `,` are reserved by the FIND
/// syntax, so they become the keyword AND and a space respectively.
fn sanitize_sosl(term: &str) -> String {
    term.replace('&', "AND").replace(',', " ")
}

fn map_transport(e: reqwest::Error) -> CrmError {
    if e.is_timeout() {
        CrmError::Timeout(REQUEST_TIMEOUT_SECS)
    } else {
        CrmError::Transport(e.to_string())
    }
}

fn clip(body: &str) -> String {
    body.chars().take(ERROR_BODY_LIMIT).collect()
}

// ── Wire format ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse<T> {
    #[serde(default)]
    total_size: u32,
    #[serde(default = "Vec::new")]
    records: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    search_records: Vec<AccountRecord>,
}

/// Record shape for COUNT() queries, which return no fields.
#[derive(Debug, Deserialize)]
struct IgnoredRecord {}

#[derive(Debug, Deserialize)]
struct RecordAttributes {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct OwnerStub {
    #[serde(rename = "Name", default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AccountStub {
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "Customer_Designation__c", default)]
    customer_designation: Option<String>,
    #[serde(rename = "Owner", default)]
    owner: Option<OwnerStub>,
}

#[derive(Debug, Deserialize)]
struct ContactRecord {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "Email", default)]
    email: Option<String>,
    #[serde(rename = "AccountId", default)]
    account_id: Option<String>,
    #[serde(rename = "Account", default)]
    account: Option<AccountStub>,
    #[serde(rename = "LastActivityDate", default)]
    last_activity_date: Option<String>,
    #[serde(rename = "SystemModstamp", default)]
    system_modstamp: Option<String>,
}

impl ContactRecord {
    fn into_contact(self) -> CrmContact {
        let (account_name, customer_designation, account_owner) = match self.account {
            Some(account) => (
                account.name,
                account.customer_designation,
                account.owner.and_then(|o| o.name),
            ),
            None => (None, None, None),
        };
        CrmContact {
            id: self.id,
            name: self.name,
            email: self.email,
            account_id: self.account_id,
            account_name,
            customer_designation,
            account_owner,
            last_activity_date: self.last_activity_date,
            system_modstamp: self.system_modstamp,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LeadRecord {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "Email", default)]
    email: Option<String>,
    #[serde(rename = "Company", default)]
    company: Option<String>,
    #[serde(rename = "Status", default)]
    status: Option<String>,
    #[serde(rename = "Associated_Account__c", default)]
    associated_account_id: Option<String>,
    #[serde(rename = "LastActivityDate", default)]
    last_activity_date: Option<String>,
    #[serde(rename = "SystemModstamp", default)]
    system_modstamp: Option<String>,
}

impl LeadRecord {
    fn into_lead(self) -> CrmLead {
        CrmLead {
            id: self.id,
            name: self.name,
            email: self.email,
            company: self.company,
            status: self.status,
            associated_account_id: self.associated_account_id,
            last_activity_date: self.last_activity_date,
            system_modstamp: self.system_modstamp,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AccountRecord {
    #[serde(rename = "attributes", default)]
    attributes: Option<RecordAttributes>,
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "Website", default)]
    website: Option<String>,
    #[serde(rename = "Customer_Designation__c", default)]
    customer_designation: Option<String>,
    #[serde(rename = "Owner", default)]
    owner: Option<OwnerStub>,
    #[serde(rename = "LastActivityDate", default)]
    last_activity_date: Option<String>,
    #[serde(rename = "SystemModstamp", default)]
    system_modstamp: Option<String>,
}

impl AccountRecord {
    fn is_account(&self) -> bool {
        self.attributes
            .as_ref()
            .is_none_or(|attrs| attrs.kind == "Account")
    }

    fn into_account(self) -> CrmAccount {
        CrmAccount {
            id: self.id,
            name: self.name,
            website: self.website,
            customer_designation: self.customer_designation,
            owner: self.owner.and_then(|o| o.name),
            last_activity_date: self.last_activity_date,
            system_modstamp: self.system_modstamp,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpportunityRecord {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "Owner", default)]
    owner: Option<OwnerStub>,
}

impl OpportunityRecord {
    fn into_opportunity(self) -> CrmOpportunity {
        CrmOpportunity {
            id: self.id,
            name: self.name,
            owner: self.owner.and_then(|o| o.name),
        }
    }
}
