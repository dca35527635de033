//! Rules-of-engagement qualification.
//!
//! A company with recent CRM activity belongs to whoever is working it;
//! prospecting into it would step on an active deal. Two windows apply:
//! 90 days since the last logged activity and 30 days since the record
//! was last modified. Both must have lapsed.

use chrono::{Duration, NaiveDate, Utc};

/// Days since the last logged activity before a company is fair game.
pub const ACTIVITY_WINDOW_DAYS: i64 = 90;
/// Days since the record was last modified before a company is fair game.
pub const MODIFIED_WINDOW_DAYS: i64 = 30;

/// Stand-in when the CRM has no activity date at all.
const DISTANT_PAST: NaiveDate = match NaiveDate::from_ymd_opt(1900, 1, 1) {
    Some(date) => date,
    None => unreachable!(),
};

/// Outcome of a rules-of-engagement check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoeOutcome {
    Qualified { rationale: String },
    Disqualified { rationale: String },
}

impl RoeOutcome {
    pub fn is_qualified(&self) -> bool {
        matches!(self, Self::Qualified { .. })
    }

    pub fn rationale(&self) -> &str {
        match self {
            Self::Qualified { rationale } | Self::Disqualified { rationale } => rationale,
        }
    }
}

/// Applies the engagement windows against a fixed "today".
///
/// Pinning the date at construction keeps every decision in a run
/// consistent, even across midnight.
#[derive(Debug, Clone, Copy)]
pub struct RoeQualifier {
    today: NaiveDate,
}

impl Default for RoeQualifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RoeQualifier {
    pub fn new() -> Self {
        Self {
            today: Utc::now().date_naive(),
        }
    }

    /// Qualifier with an explicit reference date.
    pub fn for_date(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Check the engagement windows for a CRM record's dates.
    ///
    /// `last_activity` may be absent (no activity ever logged); that
    /// counts as distant past and passes. `system_modified` is stamped
    /// by the CRM on every record, so a missing or unparseable value is
    /// a data problem and disqualifies rather than passing silently.
    /// Dates arrive as `YYYY-MM-DD`, optionally with a `T...` time part
    /// that is ignored.
    pub fn qualify(&self, last_activity: Option<&str>, system_modified: Option<&str>) -> RoeOutcome {
        let activity_cutoff = self.today - Duration::days(ACTIVITY_WINDOW_DAYS);
        let modified_cutoff = self.today - Duration::days(MODIFIED_WINDOW_DAYS);

        let last_activity = match last_activity.filter(|s| !s.trim().is_empty()) {
            Some(raw) => match parse_crm_date(raw) {
                Ok(date) => date,
                Err(e) => {
                    return RoeOutcome::Disqualified {
                        rationale: format!("DATE_PARSE_ERROR: {e}"),
                    };
                }
            },
            None => DISTANT_PAST,
        };

        let system_modified = match system_modified.filter(|s| !s.trim().is_empty()) {
            Some(raw) => match parse_crm_date(raw) {
                Ok(date) => date,
                Err(e) => {
                    return RoeOutcome::Disqualified {
                        rationale: format!("DATE_PARSE_ERROR: {e}"),
                    };
                }
            },
            None => {
                return RoeOutcome::Disqualified {
                    rationale: "DATE_PARSE_ERROR: missing system modified date".to_string(),
                };
            }
        };

        let activity_days = (self.today - last_activity).num_days();
        let system_days = (self.today - system_modified).num_days();
        let activity_pass = last_activity <= activity_cutoff;
        let system_pass = system_modified <= modified_cutoff;

        if activity_pass && system_pass {
            RoeOutcome::Qualified {
                rationale: format!(
                    "QUALIFIED - Activity: {activity_days}d ago (>{ACTIVITY_WINDOW_DAYS}d), \
                     System: {system_days}d ago (>{MODIFIED_WINDOW_DAYS}d)"
                ),
            }
        } else if !activity_pass {
            RoeOutcome::Disqualified {
                rationale: format!(
                    "DISQUALIFIED - Recent activity: {activity_days}d ago \
                     (<{ACTIVITY_WINDOW_DAYS}d threshold)"
                ),
            }
        } else {
            RoeOutcome::Disqualified {
                rationale: format!(
                    "DISQUALIFIED - Recent system update: {system_days}d ago \
                     (<{MODIFIED_WINDOW_DAYS}d threshold)"
                ),
            }
        }
    }
}

/// Parse the date part of a CRM timestamp, ignoring any `T...` tail.
fn parse_crm_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    let date_part = raw.split('T').next().unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
}
