//! Ordered email discovery strategies.
//!
//! Each prospect runs through the strategies in order until one yields
//! an address. Every attempt leaves a note in the trace, so a prospect
//! with no email still carries an auditable record of what was tried.
//! Successful discoveries feed the peer registry, which later prospects
//! from the same company draw on for pattern inference.

use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;

use crate::directory::DirectoryClient;
use crate::email::pattern::{PatternAnalyzer, PatternShape};
use crate::email::registry::PeerRegistry;
use crate::email::PeerObservation;
use crate::model::Prospect;

/// Peer-reuse inference requires this much pattern confidence.
const PEER_CONFIDENCE_THRESHOLD: f64 = 0.8;
/// People-search inference requires this many absolute pattern matches.
const MIN_MATCHING_PEERS: usize = 2;
/// How many people to pull per company from the directory.
const PEOPLE_SEARCH_PAGE_SIZE: u32 = 10;
/// Addresses starting with these are mailbox aliases, not people.
const GENERIC_PREFIXES: [&str; 8] = [
    "info", "contact", "support", "admin", "sales", "hello", "mail", "office",
];

/// Result of one strategy attempt. Both arms carry a trace note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome {
    Found { email: String, note: String },
    Missed { note: String },
}

/// Read-only run state shared with strategies.
pub struct DiscoveryContext<'a> {
    pub registry: &'a PeerRegistry,
}

/// One rung of the discovery waterfall.
#[async_trait]
pub trait DiscoveryStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Gated strategies are skipped for organization names that look
    /// like street addresses instead of companies.
    fn requires_clean_organization(&self) -> bool {
        false
    }

    async fn discover(&self, prospect: &Prospect, ctx: &DiscoveryContext<'_>) -> StrategyOutcome;
}

/// What the waterfall produced for one prospect.
#[derive(Debug, Clone)]
pub struct EmailDiscovery {
    pub email: Option<String>,
    pub trace: Vec<String>,
}

/// Runs the strategy chain and maintains the run-scoped peer registry.
pub struct EmailWaterfall {
    strategies: Vec<Box<dyn DiscoveryStrategy>>,
    filter: OrganizationFilter,
    registry: PeerRegistry,
}

impl EmailWaterfall {
    /// Default five-strategy chain against the given directory.
    pub fn new(directory: Arc<dyn DirectoryClient>) -> Self {
        let strategies: Vec<Box<dyn DiscoveryStrategy>> = vec![
            Box::new(DirectoryPersonMatch::new(directory.clone())),
            Box::new(SecondaryDirectory),
            Box::new(PeerPatternReuse::new()),
            Box::new(OrganizationPeopleSearch::new(directory)),
            Box::new(CuratedLookup::new()),
        ];
        Self::with_strategies(strategies)
    }

    pub fn with_strategies(strategies: Vec<Box<dyn DiscoveryStrategy>>) -> Self {
        Self {
            strategies,
            filter: OrganizationFilter::new(),
            registry: PeerRegistry::new(),
        }
    }

    pub fn registry(&self) -> &PeerRegistry {
        &self.registry
    }

    pub async fn discover(&mut self, prospect: &Prospect) -> EmailDiscovery {
        let mut trace = Vec::new();
        let mut found: Option<String> = None;
        let suspicious = self.filter.looks_like_address(&prospect.company);

        let ctx = DiscoveryContext {
            registry: &self.registry,
        };
        for strategy in &self.strategies {
            if strategy.requires_clean_organization() && suspicious {
                trace.push(format!(
                    "Skipped {} for '{}' - appears to be address/building rather than company",
                    strategy.name(),
                    prospect.company
                ));
                continue;
            }
            match strategy.discover(prospect, &ctx).await {
                StrategyOutcome::Found { email, note } => {
                    tracing::debug!(strategy = strategy.name(), email, "email discovered");
                    trace.push(note);
                    found = Some(email);
                    break;
                }
                StrategyOutcome::Missed { note } => trace.push(note),
            }
        }

        if let Some(email) = &found {
            self.registry.record(PeerObservation {
                first_name: prospect.first_name.clone(),
                last_name: prospect.last_name.clone(),
                email: email.clone(),
                company: prospect.company.clone(),
            });
        }

        EmailDiscovery {
            email: found,
            trace,
        }
    }
}

/// Flags organization names that are street addresses or bare numeric
/// entities, which would poison name-based searches.
pub struct OrganizationFilter {
    address_patterns: Vec<Regex>,
}

impl OrganizationFilter {
    pub fn new() -> Self {
        let address_patterns = vec![
            // Street addresses
            Regex::new(r"\d+\s+w\s+adams").unwrap(),
            Regex::new(r"\d+\s+[news]\s+\w+").unwrap(),
            Regex::new(r"\d+\s+\w+\s+st").unwrap(),
            Regex::new(r"\d+\s+\w+\s+ave").unwrap(),
            Regex::new(r"\d+\s+\w+\s+blvd").unwrap(),
            Regex::new(r"\d+\s+\w+\s+rd").unwrap(),
            // Numeric shell names
            Regex::new(r"^\d+\s*,?\s*llc\.?$").unwrap(),
            Regex::new(r"^\d+\s+group$").unwrap(),
        ];
        Self { address_patterns }
    }

    pub fn looks_like_address(&self, company: &str) -> bool {
        let lower = company.to_lowercase();
        self.address_patterns
            .iter()
            .any(|pattern| pattern.is_match(&lower))
    }
}

// ── Strategies ──────────────────────────────────────────────────────

/// Direct person match against the directory, with a follow-up
/// lookup by ID when the match has an identifier but no address.
pub struct DirectoryPersonMatch {
    directory: Arc<dyn DirectoryClient>,
}

impl DirectoryPersonMatch {
    pub fn new(directory: Arc<dyn DirectoryClient>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl DiscoveryStrategy for DirectoryPersonMatch {
    fn name(&self) -> &'static str {
        "directory match"
    }

    async fn discover(&self, prospect: &Prospect, _ctx: &DiscoveryContext<'_>) -> StrategyOutcome {
        let matched = match self
            .directory
            .match_person(&prospect.first_name, &prospect.last_name, &prospect.company)
            .await
        {
            Ok(matched) => matched,
            Err(e) => {
                return StrategyOutcome::Missed {
                    note: format!("Directory: {e}"),
                };
            }
        };
        let Some(person) = matched else {
            return StrategyOutcome::Missed {
                note: "Directory: No person found".to_string(),
            };
        };
        if let Some(email) = person.email {
            return StrategyOutcome::Found {
                note: format!("Directory: Found verified email {email}"),
                email,
            };
        }
        let Some(id) = person.id else {
            return StrategyOutcome::Missed {
                note: "Directory: Found person but no ID or email".to_string(),
            };
        };

        match self.directory.person_by_id(&id).await {
            Ok(Some(person)) => match person.email {
                Some(email) => StrategyOutcome::Found {
                    note: format!("Directory: Retrieved email {email}"),
                    email,
                },
                None => StrategyOutcome::Missed {
                    note: "Directory: Person found but email not available".to_string(),
                },
            },
            Ok(None) => StrategyOutcome::Missed {
                note: "Directory: Person details not found".to_string(),
            },
            Err(e) => StrategyOutcome::Missed {
                note: format!("Directory: {e}"),
            },
        }
    }
}

/// Reserved slot for a second lookup service.
pub struct SecondaryDirectory;

#[async_trait]
impl DiscoveryStrategy for SecondaryDirectory {
    fn name(&self) -> &'static str {
        "secondary directory"
    }

    async fn discover(&self, _prospect: &Prospect, _ctx: &DiscoveryContext<'_>) -> StrategyOutcome {
        StrategyOutcome::Missed {
            note: "Secondary directory: Not configured".to_string(),
        }
    }
}

/// Infers an address from emails already discovered for peers at the
/// same company during this run.
pub struct PeerPatternReuse {
    analyzer: PatternAnalyzer,
}

impl PeerPatternReuse {
    pub fn new() -> Self {
        Self {
            analyzer: PatternAnalyzer::new(),
        }
    }
}

#[async_trait]
impl DiscoveryStrategy for PeerPatternReuse {
    fn name(&self) -> &'static str {
        "peer patterns"
    }

    async fn discover(&self, prospect: &Prospect, ctx: &DiscoveryContext<'_>) -> StrategyOutcome {
        let peers = ctx.registry.for_company(&prospect.company);
        if peers.is_empty() {
            return StrategyOutcome::Missed {
                note: "No other company prospects with emails found".to_string(),
            };
        }

        let ranked = self.analyzer.analyze(&peers);
        if let Some(best) = ranked.first() {
            if best.confidence >= PEER_CONFIDENCE_THRESHOLD {
                if let Some(email) =
                    best.shape
                        .format(&prospect.first_name, &prospect.last_name, &best.domain)
                {
                    return StrategyOutcome::Found {
                        note: format!(
                            "Generated {email} using pattern {} (confidence: {:.0}%)",
                            best.shape,
                            best.confidence * 100.0
                        ),
                        email,
                    };
                }
            }
        }
        StrategyOutcome::Missed {
            note: format!(
                "Found {} company emails but couldn't determine reliable pattern",
                peers.len()
            ),
        }
    }
}

/// Pulls other people at the company from the directory and infers the
/// address from whatever pattern their emails share. Acceptance is by
/// absolute match count, not confidence.
pub struct OrganizationPeopleSearch {
    directory: Arc<dyn DirectoryClient>,
    analyzer: PatternAnalyzer,
}

impl OrganizationPeopleSearch {
    pub fn new(directory: Arc<dyn DirectoryClient>) -> Self {
        Self {
            directory,
            analyzer: PatternAnalyzer::new(),
        }
    }
}

#[async_trait]
impl DiscoveryStrategy for OrganizationPeopleSearch {
    fn name(&self) -> &'static str {
        "people search"
    }

    fn requires_clean_organization(&self) -> bool {
        true
    }

    async fn discover(&self, prospect: &Prospect, _ctx: &DiscoveryContext<'_>) -> StrategyOutcome {
        let people = match self
            .directory
            .search_people(&prospect.company, 1, PEOPLE_SEARCH_PAGE_SIZE)
            .await
        {
            Ok(people) => people,
            Err(e) => {
                return StrategyOutcome::Missed {
                    note: format!("People search: {e}"),
                };
            }
        };
        if people.is_empty() {
            return StrategyOutcome::Missed {
                note: format!("People search: No employees found at '{}'", prospect.company),
            };
        }

        let total_people = people.len();
        let observations: Vec<PeerObservation> = people
            .into_iter()
            .filter_map(|person| {
                let email = person.email?;
                if !email.contains('@') {
                    return None;
                }
                let lower = email.to_lowercase();
                if GENERIC_PREFIXES.iter().any(|prefix| lower.starts_with(prefix)) {
                    return None;
                }
                Some(PeerObservation {
                    first_name: person.first_name,
                    last_name: person.last_name,
                    email,
                    company: prospect.company.clone(),
                })
            })
            .collect();

        match observations.len() {
            0 => StrategyOutcome::Missed {
                note: format!(
                    "People search: Found {total_people} employees but no usable emails"
                ),
            },
            1 => StrategyOutcome::Missed {
                note: "People search: Found only 1 employee email - need at least 2 to establish pattern"
                    .to_string(),
            },
            n => {
                if let Some(best) = self.analyzer.analyze(&observations).first() {
                    if best.matches >= MIN_MATCHING_PEERS {
                        if let Some(email) = best.shape.format(
                            &prospect.first_name,
                            &prospect.last_name,
                            &best.domain,
                        ) {
                            return StrategyOutcome::Found {
                                note: format!(
                                    "People search: Generated {email} using pattern {} from {} \
                                     matching employees out of {n} total (confidence: {:.0}%)",
                                    best.shape,
                                    best.matches,
                                    best.confidence * 100.0
                                ),
                                email,
                            };
                        }
                    }
                }
                StrategyOutcome::Missed {
                    note: format!(
                        "People search: Found {n} employees with emails but no pattern had \
                         2+ matching emails"
                    ),
                }
            }
        }
    }
}

/// Hand-maintained organization to pattern mappings, matched by exact
/// uppercase name first and then by substring in either direction.
pub struct CuratedLookup {
    entries: Vec<CuratedPattern>,
}

struct CuratedPattern {
    organization: &'static str,
    shape: PatternShape,
    domain: &'static str,
    confidence: f64,
}

impl CuratedLookup {
    pub fn new() -> Self {
        Self {
            entries: vec![
                CuratedPattern {
                    organization: "ABB",
                    shape: PatternShape::FirstDotLast,
                    domain: "abb.com",
                    confidence: 0.94,
                },
                CuratedPattern {
                    organization: "ABDULRAZZAQ ALSANE & SONS CO",
                    shape: PatternShape::First,
                    domain: "aralsane.com",
                    confidence: 0.67,
                },
                CuratedPattern {
                    organization: "ABDUL RAZZAQ ABDUL HAMEED AL-SANE & SONS GROUP CO",
                    shape: PatternShape::First,
                    domain: "aralsane.com",
                    confidence: 0.67,
                },
            ],
        }
    }

    fn lookup(&self, company: &str) -> Option<&CuratedPattern> {
        let upper = company.to_uppercase();
        self.entries
            .iter()
            .find(|entry| entry.organization == upper)
            .or_else(|| {
                self.entries.iter().find(|entry| {
                    upper.contains(entry.organization) || entry.organization.contains(upper.as_str())
                })
            })
    }
}

#[async_trait]
impl DiscoveryStrategy for CuratedLookup {
    fn name(&self) -> &'static str {
        "curated lookup"
    }

    fn requires_clean_organization(&self) -> bool {
        true
    }

    async fn discover(&self, prospect: &Prospect, _ctx: &DiscoveryContext<'_>) -> StrategyOutcome {
        let Some(entry) = self.lookup(&prospect.company) else {
            return StrategyOutcome::Missed {
                note: format!(
                    "Curated lookup: No reliable email patterns found for '{}'",
                    prospect.company
                ),
            };
        };
        match entry
            .shape
            .format(&prospect.first_name, &prospect.last_name, entry.domain)
        {
            Some(email) => StrategyOutcome::Found {
                note: format!(
                    "Curated lookup: Generated {email} using pattern {} (confidence: {:.0}%)",
                    entry.shape,
                    entry.confidence * 100.0
                ),
                email,
            },
            None => StrategyOutcome::Missed {
                note: format!(
                    "Curated lookup: No reliable email patterns found for '{}'",
                    prospect.company
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::directory::{PersonMatch, PersonSummary};
    use crate::error::DirectoryError;

    fn prospect(first: &str, last: &str, company: &str) -> Prospect {
        Prospect {
            first_name: first.to_string(),
            last_name: last.to_string(),
            company: company.to_string(),
            title: "Engineer".to_string(),
        }
    }

    #[derive(Default)]
    struct MockDirectory {
        matched: Option<PersonMatch>,
        by_id: Option<PersonMatch>,
        people: Vec<PersonSummary>,
        search_calls: AtomicUsize,
    }

    #[async_trait]
    impl DirectoryClient for MockDirectory {
        async fn match_person(
            &self,
            _first_name: &str,
            _last_name: &str,
            _company: &str,
        ) -> Result<Option<PersonMatch>, DirectoryError> {
            Ok(self.matched.clone())
        }

        async fn person_by_id(&self, _id: &str) -> Result<Option<PersonMatch>, DirectoryError> {
            Ok(self.by_id.clone())
        }

        async fn search_people(
            &self,
            _company: &str,
            _page: u32,
            _per_page: u32,
        ) -> Result<Vec<PersonSummary>, DirectoryError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.people.clone())
        }
    }

    fn summary(first: &str, last: &str, email: &str) -> PersonSummary {
        PersonSummary {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: Some(email.to_string()),
        }
    }

    struct ScriptedStrategy {
        outcome: StrategyOutcome,
        gated: bool,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl DiscoveryStrategy for ScriptedStrategy {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn requires_clean_organization(&self) -> bool {
            self.gated
        }

        async fn discover(
            &self,
            _prospect: &Prospect,
            _ctx: &DiscoveryContext<'_>,
        ) -> StrategyOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn scripted(outcome: StrategyOutcome, gated: bool) -> (Box<dyn DiscoveryStrategy>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let strategy = ScriptedStrategy {
            outcome,
            gated,
            calls: calls.clone(),
        };
        (Box::new(strategy), calls)
    }

    #[tokio::test]
    async fn first_hit_short_circuits_and_feeds_the_registry() {
        let (hit, hit_calls) = scripted(
            StrategyOutcome::Found {
                email: "ann.lee@acme.com".to_string(),
                note: "first".to_string(),
            },
            false,
        );
        let (unreached, unreached_calls) = scripted(
            StrategyOutcome::Missed {
                note: "second".to_string(),
            },
            false,
        );
        let mut waterfall = EmailWaterfall::with_strategies(vec![hit, unreached]);

        let discovery = waterfall.discover(&prospect("Ann", "Lee", "Acme Corp")).await;
        assert_eq!(discovery.email.as_deref(), Some("ann.lee@acme.com"));
        assert_eq!(discovery.trace, vec!["first".to_string()]);
        assert_eq!(hit_calls.load(Ordering::SeqCst), 1);
        assert_eq!(unreached_calls.load(Ordering::SeqCst), 0);
        assert_eq!(waterfall.registry().len(), 1);
    }

    #[tokio::test]
    async fn every_miss_leaves_a_note() {
        let (first, _) = scripted(
            StrategyOutcome::Missed {
                note: "one".to_string(),
            },
            false,
        );
        let (second, _) = scripted(
            StrategyOutcome::Missed {
                note: "two".to_string(),
            },
            false,
        );
        let mut waterfall = EmailWaterfall::with_strategies(vec![first, second]);

        let discovery = waterfall.discover(&prospect("Ann", "Lee", "Acme Corp")).await;
        assert!(discovery.email.is_none());
        assert_eq!(discovery.trace, vec!["one".to_string(), "two".to_string()]);
        assert!(waterfall.registry().is_empty());
    }

    #[tokio::test]
    async fn address_like_companies_skip_gated_strategies() {
        let (gated, gated_calls) = scripted(
            StrategyOutcome::Found {
                email: "never@used.com".to_string(),
                note: "gated".to_string(),
            },
            true,
        );
        let mut waterfall = EmailWaterfall::with_strategies(vec![gated]);

        let discovery = waterfall.discover(&prospect("Ann", "Lee", "300 W Adams")).await;
        assert!(discovery.email.is_none());
        assert_eq!(gated_calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            discovery.trace,
            vec![
                "Skipped scripted for '300 W Adams' - appears to be address/building rather than company"
                    .to_string()
            ]
        );
    }

    #[tokio::test]
    async fn clean_companies_run_gated_strategies() {
        let (gated, gated_calls) = scripted(
            StrategyOutcome::Missed {
                note: "ran".to_string(),
            },
            true,
        );
        let mut waterfall = EmailWaterfall::with_strategies(vec![gated]);

        let discovery = waterfall.discover(&prospect("Ann", "Lee", "Acme Corp")).await;
        assert_eq!(discovery.trace, vec!["ran".to_string()]);
        assert_eq!(gated_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn filter_flags_addresses_and_numeric_shells() {
        let filter = OrganizationFilter::new();
        assert!(filter.looks_like_address("300 W Adams"));
        assert!(filter.looks_like_address("123 Oak St"));
        assert!(filter.looks_like_address("5282, LLC."));
        assert!(filter.looks_like_address("1192 Group"));
        assert!(!filter.looks_like_address("Acme Corp"));
        assert!(!filter.looks_like_address("Advanced Cooling Technologies"));
    }

    #[tokio::test]
    async fn directory_match_returns_verified_email() {
        let directory = Arc::new(MockDirectory {
            matched: Some(PersonMatch {
                id: Some("p1".to_string()),
                email: Some("ann.lee@acme.com".to_string()),
            }),
            ..MockDirectory::default()
        });
        let strategy = DirectoryPersonMatch::new(directory);
        let registry = PeerRegistry::new();
        let ctx = DiscoveryContext {
            registry: &registry,
        };

        let outcome = strategy.discover(&prospect("Ann", "Lee", "Acme"), &ctx).await;
        assert_eq!(
            outcome,
            StrategyOutcome::Found {
                email: "ann.lee@acme.com".to_string(),
                note: "Directory: Found verified email ann.lee@acme.com".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn directory_match_follows_up_by_id() {
        let directory = Arc::new(MockDirectory {
            matched: Some(PersonMatch {
                id: Some("p1".to_string()),
                email: None,
            }),
            by_id: Some(PersonMatch {
                id: Some("p1".to_string()),
                email: Some("ann.lee@acme.com".to_string()),
            }),
            ..MockDirectory::default()
        });
        let strategy = DirectoryPersonMatch::new(directory);
        let registry = PeerRegistry::new();
        let ctx = DiscoveryContext {
            registry: &registry,
        };

        let outcome = strategy.discover(&prospect("Ann", "Lee", "Acme"), &ctx).await;
        assert_eq!(
            outcome,
            StrategyOutcome::Found {
                email: "ann.lee@acme.com".to_string(),
                note: "Directory: Retrieved email ann.lee@acme.com".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn directory_match_reports_missing_person() {
        let strategy = DirectoryPersonMatch::new(Arc::new(MockDirectory::default()));
        let registry = PeerRegistry::new();
        let ctx = DiscoveryContext {
            registry: &registry,
        };

        let outcome = strategy.discover(&prospect("Ann", "Lee", "Acme"), &ctx).await;
        assert_eq!(
            outcome,
            StrategyOutcome::Missed {
                note: "Directory: No person found".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn peer_reuse_generates_from_confident_pattern() {
        let mut registry = PeerRegistry::new();
        registry.record(PeerObservation {
            first_name: "Bob".to_string(),
            last_name: "Kim".to_string(),
            email: "bob.kim@acme.com".to_string(),
            company: "Acme".to_string(),
        });
        registry.record(PeerObservation {
            first_name: "Cid".to_string(),
            last_name: "Roe".to_string(),
            email: "cid.roe@acme.com".to_string(),
            company: "Acme".to_string(),
        });
        let ctx = DiscoveryContext {
            registry: &registry,
        };
        let strategy = PeerPatternReuse::new();

        let outcome = strategy.discover(&prospect("Ann", "Lee", "Acme"), &ctx).await;
        assert_eq!(
            outcome,
            StrategyOutcome::Found {
                email: "ann.lee@acme.com".to_string(),
                note: "Generated ann.lee@acme.com using pattern first.last (confidence: 100%)"
                    .to_string(),
            }
        );
    }

    #[tokio::test]
    async fn peer_reuse_rejects_weak_patterns() {
        let mut registry = PeerRegistry::new();
        registry.record(PeerObservation {
            first_name: "Bob".to_string(),
            last_name: "Kim".to_string(),
            email: "bob.kim@acme.com".to_string(),
            company: "Acme".to_string(),
        });
        registry.record(PeerObservation {
            first_name: "Cid".to_string(),
            last_name: "Roe".to_string(),
            email: "cidroe@acme.com".to_string(),
            company: "Acme".to_string(),
        });
        let ctx = DiscoveryContext {
            registry: &registry,
        };
        let strategy = PeerPatternReuse::new();

        let outcome = strategy.discover(&prospect("Ann", "Lee", "Acme"), &ctx).await;
        assert_eq!(
            outcome,
            StrategyOutcome::Missed {
                note: "Found 2 company emails but couldn't determine reliable pattern".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn people_search_needs_two_matching_emails() {
        let directory = Arc::new(MockDirectory {
            people: vec![
                summary("Bob", "Kim", "bob.kim@acme.com"),
                summary("Cid", "Roe", "cid.roe@acme.com"),
                summary("", "", "info@acme.com"),
            ],
            ..MockDirectory::default()
        });
        let strategy = OrganizationPeopleSearch::new(directory);
        let registry = PeerRegistry::new();
        let ctx = DiscoveryContext {
            registry: &registry,
        };

        let outcome = strategy.discover(&prospect("Ann", "Lee", "Acme"), &ctx).await;
        assert_eq!(
            outcome,
            StrategyOutcome::Found {
                email: "ann.lee@acme.com".to_string(),
                note: "People search: Generated ann.lee@acme.com using pattern first.last from 2 \
                       matching employees out of 2 total (confidence: 100%)"
                    .to_string(),
            }
        );
    }

    #[tokio::test]
    async fn people_search_reports_single_usable_email() {
        let directory = Arc::new(MockDirectory {
            people: vec![
                summary("Bob", "Kim", "bob.kim@acme.com"),
                summary("", "", "sales@acme.com"),
            ],
            ..MockDirectory::default()
        });
        let strategy = OrganizationPeopleSearch::new(directory);
        let registry = PeerRegistry::new();
        let ctx = DiscoveryContext {
            registry: &registry,
        };

        let outcome = strategy.discover(&prospect("Ann", "Lee", "Acme"), &ctx).await;
        assert_eq!(
            outcome,
            StrategyOutcome::Missed {
                note: "People search: Found only 1 employee email - need at least 2 to establish pattern"
                    .to_string(),
            }
        );
    }

    #[tokio::test]
    async fn curated_lookup_matches_exactly_and_by_substring() {
        let strategy = CuratedLookup::new();
        let registry = PeerRegistry::new();
        let ctx = DiscoveryContext {
            registry: &registry,
        };

        let exact = strategy.discover(&prospect("Ann", "Lee", "ABB"), &ctx).await;
        assert_eq!(
            exact,
            StrategyOutcome::Found {
                email: "ann.lee@abb.com".to_string(),
                note: "Curated lookup: Generated ann.lee@abb.com using pattern first.last \
                       (confidence: 94%)"
                    .to_string(),
            }
        );

        let partial = strategy
            .discover(&prospect("Omar", "Sane", "Abdulrazzaq Alsane & Sons Co, Kuwait"), &ctx)
            .await;
        assert_eq!(
            partial,
            StrategyOutcome::Found {
                email: "omar@aralsane.com".to_string(),
                note: "Curated lookup: Generated omar@aralsane.com using pattern first \
                       (confidence: 67%)"
                    .to_string(),
            }
        );

        let miss = strategy.discover(&prospect("Ann", "Lee", "Zenith"), &ctx).await;
        assert_eq!(
            miss,
            StrategyOutcome::Missed {
                note: "Curated lookup: No reliable email patterns found for 'Zenith'".to_string(),
            }
        );
    }
}
