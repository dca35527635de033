//! Company-level CRM relationship resolution.
//!
//! A prospect's company is tied to at most one CRM record through a
//! three-step search: the prospect's email (Contact, then Lead), fuzzy
//! name search over company variations, and finally the email domain
//! against account websites. Domain matches are the loosest, so they
//! alone must pass a compatibility check before they count.

use std::fmt;
use std::sync::Arc;

use crate::crm::{CompanyVariationGenerator, CrmAccount, CrmClient, CrmContact, CrmLead};

/// Which search step produced a relationship match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    Person,
    Company,
    Domain,
}

impl fmt::Display for MatchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchSource::Person => "person",
            MatchSource::Company => "company",
            MatchSource::Domain => "domain",
        };
        f.write_str(label)
    }
}

/// The CRM record a company resolved to, tagged by record kind.
///
/// A `Lead` carries account fields only when enrichment attached an
/// account to it, either through its associated account or through a
/// website search on its own email domain.
#[derive(Debug, Clone)]
pub enum RelationshipRecord {
    Contact {
        id: String,
        name: Option<String>,
        email: Option<String>,
        account_id: Option<String>,
        account_name: Option<String>,
        customer_designation: Option<String>,
        account_owner: Option<String>,
        last_activity_date: Option<String>,
        system_modstamp: Option<String>,
    },
    Lead {
        id: String,
        name: Option<String>,
        email: Option<String>,
        company: Option<String>,
        status: Option<String>,
        account_id: Option<String>,
        account_name: Option<String>,
        customer_designation: Option<String>,
        last_activity_date: Option<String>,
        system_modstamp: Option<String>,
    },
    Account {
        id: String,
        name: Option<String>,
        website: Option<String>,
        customer_designation: Option<String>,
        owner: Option<String>,
        last_activity_date: Option<String>,
        system_modstamp: Option<String>,
    },
}

impl RelationshipRecord {
    pub fn kind(&self) -> &'static str {
        match self {
            RelationshipRecord::Contact { .. } => "Contact",
            RelationshipRecord::Lead { .. } => "Lead",
            RelationshipRecord::Account { .. } => "Account",
        }
    }

    pub fn customer_designation(&self) -> Option<&str> {
        match self {
            RelationshipRecord::Contact {
                customer_designation,
                ..
            }
            | RelationshipRecord::Lead {
                customer_designation,
                ..
            }
            | RelationshipRecord::Account {
                customer_designation,
                ..
            } => customer_designation.as_deref(),
        }
    }

    /// Account the record hangs off. For an `Account` record that is
    /// the record itself.
    pub fn account_id(&self) -> Option<&str> {
        match self {
            RelationshipRecord::Contact { account_id, .. }
            | RelationshipRecord::Lead { account_id, .. } => account_id.as_deref(),
            RelationshipRecord::Account { id, .. } => Some(id),
        }
    }

    /// Owner of the underlying account. Leads never carry one, even
    /// after enrichment.
    pub fn account_owner(&self) -> Option<&str> {
        match self {
            RelationshipRecord::Contact { account_owner, .. } => account_owner.as_deref(),
            RelationshipRecord::Lead { .. } => None,
            RelationshipRecord::Account { owner, .. } => owner.as_deref(),
        }
    }

    pub fn last_activity_date(&self) -> Option<&str> {
        match self {
            RelationshipRecord::Contact {
                last_activity_date, ..
            }
            | RelationshipRecord::Lead {
                last_activity_date, ..
            }
            | RelationshipRecord::Account {
                last_activity_date, ..
            } => last_activity_date.as_deref(),
        }
    }

    pub fn system_modstamp(&self) -> Option<&str> {
        match self {
            RelationshipRecord::Contact {
                system_modstamp, ..
            }
            | RelationshipRecord::Lead {
                system_modstamp, ..
            }
            | RelationshipRecord::Account {
                system_modstamp, ..
            } => system_modstamp.as_deref(),
        }
    }

    pub fn website(&self) -> Option<&str> {
        match self {
            RelationshipRecord::Account { website, .. } => website.as_deref(),
            _ => None,
        }
    }

    /// One-line description of the matched record for rationales.
    pub fn summary(&self) -> String {
        let mut info = format!("CRM {} ID: {}", self.kind(), self.id());
        let (name, email, account_name) = match self {
            RelationshipRecord::Contact {
                name,
                email,
                account_name,
                ..
            }
            | RelationshipRecord::Lead {
                name,
                email,
                account_name,
                ..
            } => (name.as_deref(), email.as_deref(), account_name.as_deref()),
            RelationshipRecord::Account { name, .. } => (name.as_deref(), None, None),
        };
        if let Some(name) = name {
            info.push_str(&format!(", Name: '{name}'"));
        }
        if let Some(email) = email {
            info.push_str(&format!(", Email: {email}"));
        }
        if let Some(account_name) = account_name {
            info.push_str(&format!(", Account: '{account_name}'"));
        }
        info
    }

    fn id(&self) -> &str {
        match self {
            RelationshipRecord::Contact { id, .. }
            | RelationshipRecord::Lead { id, .. }
            | RelationshipRecord::Account { id, .. } => id,
        }
    }

    fn from_contact(contact: CrmContact) -> Self {
        RelationshipRecord::Contact {
            id: contact.id,
            name: contact.name,
            email: contact.email,
            account_id: contact.account_id,
            account_name: contact.account_name,
            customer_designation: contact.customer_designation,
            account_owner: contact.account_owner,
            last_activity_date: contact.last_activity_date,
            system_modstamp: contact.system_modstamp,
        }
    }

    fn from_lead(lead: CrmLead, enrichment: Option<CrmAccount>) -> Self {
        let (account_id, account_name, customer_designation) = match enrichment {
            Some(account) => (
                Some(account.id),
                account.name,
                account.customer_designation,
            ),
            None => (None, None, None),
        };
        RelationshipRecord::Lead {
            id: lead.id,
            name: lead.name,
            email: lead.email,
            company: lead.company,
            status: lead.status,
            account_id,
            account_name,
            customer_designation,
            last_activity_date: lead.last_activity_date,
            system_modstamp: lead.system_modstamp,
        }
    }

    fn from_account(account: CrmAccount) -> Self {
        RelationshipRecord::Account {
            id: account.id,
            name: account.name,
            website: account.website,
            customer_designation: account.customer_designation,
            owner: account.owner,
            last_activity_date: account.last_activity_date,
            system_modstamp: account.system_modstamp,
        }
    }
}

/// A resolved relationship and the search step that found it.
#[derive(Debug, Clone)]
pub struct RelationshipMatch {
    pub record: RelationshipRecord,
    pub source: MatchSource,
}

pub struct CompanyRelationshipResolver {
    crm: Arc<dyn CrmClient>,
    variations: CompanyVariationGenerator,
}

impl CompanyRelationshipResolver {
    pub fn new(crm: Arc<dyn CrmClient>) -> Self {
        Self {
            crm,
            variations: CompanyVariationGenerator::new(),
        }
    }

    /// Resolve a company to its CRM relationship, if any.
    ///
    /// Lookup failures at any step are logged and treated as no match
    /// for that step, so one flaky query cannot sink the whole chain.
    pub async fn resolve(&self, company: &str, email: Option<&str>) -> Option<RelationshipMatch> {
        if let Some(email) = email {
            if let Some(record) = self.person_record(email).await {
                return Some(RelationshipMatch {
                    record,
                    source: MatchSource::Person,
                });
            }
        }

        if let Some(record) = self.company_record(company).await {
            return Some(RelationshipMatch {
                record,
                source: MatchSource::Company,
            });
        }

        if let Some(email) = email {
            if let Some(record) = self.domain_record(email).await {
                return Some(RelationshipMatch {
                    record,
                    source: MatchSource::Domain,
                });
            }
        }

        tracing::debug!(company, "no CRM relationship found");
        None
    }

    async fn person_record(&self, email: &str) -> Option<RelationshipRecord> {
        match self.crm.contact_by_email(email).await {
            Ok(Some(contact)) => return Some(RelationshipRecord::from_contact(contact)),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "contact lookup failed"),
        }

        match self.crm.lead_by_email(email).await {
            Ok(Some(lead)) => {
                let enrichment = self.lead_account(&lead).await;
                Some(RelationshipRecord::from_lead(lead, enrichment))
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "lead lookup failed");
                None
            }
        }
    }

    /// Attach account details to a lead: its associated account if it
    /// has one, otherwise whatever account's website matches the
    /// lead's own email domain.
    async fn lead_account(&self, lead: &CrmLead) -> Option<CrmAccount> {
        if let Some(account_id) = lead.associated_account_id.as_deref() {
            return match self.crm.account_by_id(account_id).await {
                Ok(account) => account,
                Err(e) => {
                    tracing::warn!(error = %e, account_id, "lead account lookup failed");
                    None
                }
            };
        }

        let domain = lead
            .email
            .as_deref()
            .and_then(|email| email.split('@').nth(1))?
            .to_lowercase();
        match self.crm.account_by_website_fragment(&domain).await {
            Ok(account) => account,
            Err(e) => {
                tracing::warn!(error = %e, domain, "lead domain lookup failed");
                None
            }
        }
    }

    async fn company_record(&self, company: &str) -> Option<RelationshipRecord> {
        for variation in self.variations.variations(company) {
            let accounts = match self.crm.search_accounts_by_name(&variation).await {
                Ok(accounts) => accounts,
                Err(e) => {
                    tracing::warn!(error = %e, variation, "company search failed");
                    continue;
                }
            };
            if let Some(account) = accounts.into_iter().next() {
                tracing::debug!(variation, account = ?account.name, "company search matched");
                return Some(RelationshipRecord::from_account(account));
            }
        }
        None
    }

    /// Last-resort search by the prospect's email domain. A hit only
    /// counts when the account's website is absent or compatible with
    /// that domain, since `LIKE '%domain%'` matches far too loosely.
    async fn domain_record(&self, email: &str) -> Option<RelationshipRecord> {
        let domain = email.split('@').nth(1)?.to_lowercase();
        let account = match self.crm.account_by_website_fragment(&domain).await {
            Ok(account) => account?,
            Err(e) => {
                tracing::warn!(error = %e, domain, "domain search failed");
                return None;
            }
        };

        let website = account
            .website
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        if !website.is_empty() && !domains_are_compatible(&domain, &website) {
            tracing::debug!(domain, website, "domain match rejected");
            return None;
        }
        Some(RelationshipRecord::from_account(account))
    }
}

/// Whether an email domain plausibly belongs to an account website.
fn domains_are_compatible(email_domain: &str, website: &str) -> bool {
    let stripped = website
        .replace("http://", "")
        .replace("https://", "")
        .replace("www.", "");
    let site = stripped.split('/').next().unwrap_or_default();

    let email_base = base_domain(email_domain);
    let site_base = base_domain(site);

    email_domain == site
        || email_base == site_base
        || site_base.contains(email_base)
        || email_base.contains(site_base)
        || email_domain.replace('-', "") == site.replace('-', "")
        || email_base.replace('-', "") == site_base.replace('-', "")
}

/// The label before the TLD, or the whole input when it has no dot.
fn base_domain(domain: &str) -> &str {
    let parts: Vec<&str> = domain.split('.').collect();
    if parts.len() >= 2 {
        parts[parts.len() - 2]
    } else {
        domain
    }
}
