//! Verdict assignment for resolved prospects.
//!
//! Classification is company-level: the first prospect from a company
//! decides the verdict for everyone else at that company in the run.
//! Later prospects replay the cached verdict with a marker, so a
//! roster with forty people from one account produces one CRM search,
//! not forty.

use std::collections::HashMap;
use std::sync::Arc;

use crate::classify::roe::{RoeOutcome, RoeQualifier};
use crate::crm::{CompanyRelationshipResolver, CrmClient, CrmOpportunity};
use crate::model::{Classification, Prospect, Verdict};

pub struct ClassificationEngine {
    crm: Arc<dyn CrmClient>,
    resolver: CompanyRelationshipResolver,
    roe: RoeQualifier,
    console_url: String,
    cache: HashMap<String, Classification>,
}

impl ClassificationEngine {
    pub fn new(crm: Arc<dyn CrmClient>, roe: RoeQualifier, console_url: String) -> Self {
        Self {
            resolver: CompanyRelationshipResolver::new(crm.clone()),
            crm,
            roe,
            console_url,
            cache: HashMap::new(),
        }
    }

    /// Classify one prospect. Verdict priority: current customer, open
    /// opportunity, ROE check, assumed qualified. No relationship at
    /// all means `NoRelationship`. Every outcome, including that one,
    /// is cached per company.
    pub async fn classify(&mut self, prospect: &Prospect, email: Option<&str>) -> Classification {
        let key = prospect.company.trim().to_lowercase();
        if let Some(cached) = self.cache.get(&key) {
            let mut hit = cached.clone();
            hit.from_cache = true;
            hit.rationale = format!("Company-level cached: {}", cached.rationale);
            tracing::debug!(
                company = %prospect.company,
                verdict = %hit.verdict,
                "replaying cached company verdict"
            );
            return hit;
        }

        let classification = self.classify_fresh(prospect, email).await;
        tracing::info!(
            company = %prospect.company,
            verdict = %classification.verdict,
            "company classified"
        );
        self.cache.insert(key, classification.clone());
        classification
    }

    async fn classify_fresh(&self, prospect: &Prospect, email: Option<&str>) -> Classification {
        let company = prospect.company.as_str();
        let Some(matched) = self.resolver.resolve(company, email).await else {
            return Classification::bare(
                Verdict::NoRelationship,
                "No CRM relationship found for company",
            );
        };

        let record = matched.record;
        let match_info = record.summary();
        tracing::debug!(
            company,
            source = %matched.source,
            record = record.kind(),
            "company resolved to CRM record"
        );

        if record.customer_designation() == Some("Current Customer") {
            let mut classification = Classification::bare(
                Verdict::CurrentCustomer,
                format!("Company '{company}' is a current customer - Matched: {match_info}"),
            );
            classification.account_owner = record.account_owner().map(str::to_string);
            if let Some(account_id) = record.account_id() {
                classification.account_url = Some(format!(
                    "{}/lightning/r/Account/{account_id}/view",
                    self.console_url
                ));
                classification.account_id = Some(account_id.to_string());
            }
            return classification;
        }

        if let Some(account_id) = record.account_id() {
            let (count, first) = self.open_opportunities(account_id).await;
            if count > 0 {
                let mut classification = Classification::bare(
                    Verdict::OpenOpportunity,
                    format!("Company has {count} open opportunities - Matched: {match_info}"),
                );
                if let Some(opportunity) = first {
                    classification.opportunity_owner = opportunity.owner;
                    classification.opportunity_url = Some(format!(
                        "{}/lightning/r/Opportunity/{}/view",
                        self.console_url, opportunity.id
                    ));
                    classification.opportunity_id = Some(opportunity.id);
                }
                return classification;
            }
        }

        let last_activity = record.last_activity_date();
        let system_modstamp = record.system_modstamp();
        if last_activity.is_some() || system_modstamp.is_some() {
            return match self.roe.qualify(last_activity, system_modstamp) {
                RoeOutcome::Qualified { rationale } => Classification::bare(
                    Verdict::Qualified,
                    format!("ROE qualified: {rationale} - Matched: {match_info}"),
                ),
                RoeOutcome::Disqualified { rationale } => Classification::bare(
                    Verdict::Disqualified,
                    format!("ROE disqualified: {rationale} - Matched: {match_info}"),
                ),
            };
        }

        Classification::bare(
            Verdict::Qualified,
            format!(
                "CRM match found with no recent activity data - assuming qualified - Matched: {match_info}"
            ),
        )
    }

    async fn open_opportunities(&self, account_id: &str) -> (u32, Option<CrmOpportunity>) {
        let count = match self.crm.count_open_opportunities(account_id).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, account_id, "opportunity count failed");
                0
            }
        };
        if count == 0 {
            return (0, None);
        }
        let first = match self.crm.first_open_opportunity(account_id).await {
            Ok(first) => first,
            Err(e) => {
                tracing::warn!(error = %e, account_id, "opportunity lookup failed");
                None
            }
        };
        (count, first)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;
    use crate::crm::{CrmAccount, CrmContact, CrmLead};
    use crate::error::CrmError;

    #[derive(Default)]
    struct MockCrm {
        contact: Option<CrmContact>,
        account: Option<CrmAccount>,
        open_count: u32,
        opportunity: Option<CrmOpportunity>,
        search_calls: AtomicUsize,
    }

    #[async_trait]
    impl CrmClient for MockCrm {
        async fn contact_by_email(&self, _email: &str) -> Result<Option<CrmContact>, CrmError> {
            Ok(self.contact.clone())
        }

        async fn lead_by_email(&self, _email: &str) -> Result<Option<CrmLead>, CrmError> {
            Ok(None)
        }

        async fn account_by_id(&self, _id: &str) -> Result<Option<CrmAccount>, CrmError> {
            Ok(None)
        }

        async fn account_by_website_fragment(
            &self,
            _fragment: &str,
        ) -> Result<Option<CrmAccount>, CrmError> {
            Ok(None)
        }

        async fn search_accounts_by_name(&self, _name: &str) -> Result<Vec<CrmAccount>, CrmError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.account.clone().into_iter().collect())
        }

        async fn count_open_opportunities(&self, _account_id: &str) -> Result<u32, CrmError> {
            Ok(self.open_count)
        }

        async fn first_open_opportunity(
            &self,
            _account_id: &str,
        ) -> Result<Option<CrmOpportunity>, CrmError> {
            Ok(self.opportunity.clone())
        }
    }

    fn engine(crm: MockCrm) -> ClassificationEngine {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        ClassificationEngine::new(
            Arc::new(crm),
            RoeQualifier::for_date(today),
            "https://console.test".to_string(),
        )
    }

    fn prospect(company: &str) -> Prospect {
        Prospect {
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            company: company.to_string(),
            title: "Engineer".to_string(),
        }
    }

    fn account(id: &str, name: &str) -> CrmAccount {
        CrmAccount {
            id: id.to_string(),
            name: Some(name.to_string()),
            website: None,
            customer_designation: None,
            owner: None,
            last_activity_date: None,
            system_modstamp: None,
        }
    }

    #[tokio::test]
    async fn current_customer_carries_account_details() {
        let contact = CrmContact {
            id: "003A".to_string(),
            name: Some("Ann Lee".to_string()),
            email: Some("ann.lee@acme.com".to_string()),
            account_id: Some("001X".to_string()),
            account_name: Some("Acme".to_string()),
            customer_designation: Some("Current Customer".to_string()),
            account_owner: Some("Pat Owner".to_string()),
            last_activity_date: None,
            system_modstamp: None,
        };
        let mut engine = engine(MockCrm {
            contact: Some(contact),
            ..MockCrm::default()
        });

        let classification = engine
            .classify(&prospect("Acme"), Some("ann.lee@acme.com"))
            .await;
        assert_eq!(classification.verdict, Verdict::CurrentCustomer);
        assert!(classification
            .rationale
            .starts_with("Company 'Acme' is a current customer - Matched: CRM Contact ID: 003A"));
        assert_eq!(classification.account_owner.as_deref(), Some("Pat Owner"));
        assert_eq!(classification.account_id.as_deref(), Some("001X"));
        assert_eq!(
            classification.account_url.as_deref(),
            Some("https://console.test/lightning/r/Account/001X/view")
        );
        assert!(!classification.from_cache);
    }

    #[tokio::test]
    async fn open_opportunities_beat_roe() {
        let mut hit = account("001A", "Acme");
        hit.last_activity_date = Some("2025-06-10".to_string());
        let mut engine = engine(MockCrm {
            account: Some(hit),
            open_count: 2,
            opportunity: Some(CrmOpportunity {
                id: "006B".to_string(),
                name: Some("Acme Expansion".to_string()),
                owner: Some("Dana Seller".to_string()),
            }),
            ..MockCrm::default()
        });

        let classification = engine.classify(&prospect("Acme"), None).await;
        assert_eq!(classification.verdict, Verdict::OpenOpportunity);
        assert!(classification
            .rationale
            .starts_with("Company has 2 open opportunities - Matched: CRM Account ID: 001A"));
        assert_eq!(classification.opportunity_owner.as_deref(), Some("Dana Seller"));
        assert_eq!(classification.opportunity_id.as_deref(), Some("006B"));
        assert_eq!(
            classification.opportunity_url.as_deref(),
            Some("https://console.test/lightning/r/Opportunity/006B/view")
        );
    }

    #[tokio::test]
    async fn stale_activity_is_roe_qualified() {
        let mut hit = account("001A", "Acme");
        hit.last_activity_date = Some("2024-01-10".to_string());
        hit.system_modstamp = Some("2025-01-10T08:00:00.000+0000".to_string());
        let mut engine = engine(MockCrm {
            account: Some(hit),
            ..MockCrm::default()
        });

        let classification = engine.classify(&prospect("Acme"), None).await;
        assert_eq!(classification.verdict, Verdict::Qualified);
        assert!(classification.rationale.starts_with("ROE qualified: QUALIFIED"));
        assert!(classification.rationale.contains("- Matched: CRM Account ID: 001A"));
    }

    #[tokio::test]
    async fn recent_activity_is_roe_disqualified() {
        let mut hit = account("001A", "Acme");
        hit.last_activity_date = Some("2025-06-01".to_string());
        hit.system_modstamp = Some("2025-01-10T08:00:00.000+0000".to_string());
        let mut engine = engine(MockCrm {
            account: Some(hit),
            ..MockCrm::default()
        });

        let classification = engine.classify(&prospect("Acme"), None).await;
        assert_eq!(classification.verdict, Verdict::Disqualified);
        assert!(classification
            .rationale
            .starts_with("ROE disqualified: DISQUALIFIED - Recent activity"));
    }

    #[tokio::test]
    async fn match_without_dates_is_assumed_qualified() {
        let mut engine = engine(MockCrm {
            account: Some(account("001A", "Acme")),
            ..MockCrm::default()
        });

        let classification = engine.classify(&prospect("Acme"), None).await;
        assert_eq!(classification.verdict, Verdict::Qualified);
        assert!(classification
            .rationale
            .starts_with("CRM match found with no recent activity data - assuming qualified"));
    }

    #[tokio::test]
    async fn verdicts_are_cached_per_company() {
        let crm = Arc::new(MockCrm::default());
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let mut engine = ClassificationEngine::new(
            crm.clone(),
            RoeQualifier::for_date(today),
            "https://console.test".to_string(),
        );

        let first = engine.classify(&prospect("Acme"), None).await;
        assert_eq!(first.verdict, Verdict::NoRelationship);
        assert_eq!(first.rationale, "No CRM relationship found for company");
        assert!(!first.from_cache);
        let searches_after_first = crm.search_calls.load(Ordering::SeqCst);
        assert!(searches_after_first > 0);

        let second = engine.classify(&prospect("  ACME "), None).await;
        assert_eq!(second.verdict, Verdict::NoRelationship);
        assert!(second.from_cache);
        assert_eq!(
            second.rationale,
            "Company-level cached: No CRM relationship found for company"
        );
        assert_eq!(crm.search_calls.load(Ordering::SeqCst), searches_after_first);

        let third = engine.classify(&prospect("acme"), None).await;
        assert_eq!(
            third.rationale,
            "Company-level cached: No CRM relationship found for company"
        );
    }
}
