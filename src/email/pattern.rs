//! Email address pattern analysis.
//!
//! Given peers at a company whose addresses are known, work out which
//! local-part template the company uses so new addresses can be predicted.

use super::PeerObservation;

// ── Pattern shapes ──────────────────────────────────────────────────

/// The six local-part templates we recognize, in priority order.
///
/// Priority breaks confidence ties: when two shapes explain the same
/// number of observations, the more conventional one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternShape {
    /// `jane.doe@`
    FirstDotLast,
    /// `janedoe@`
    FirstLast,
    /// `jdoe@`
    FLast,
    /// `jane_doe@`
    FirstUnderscoreLast,
    /// `doejane@`
    LastFirst,
    /// `jane@`
    First,
}

impl PatternShape {
    /// All shapes, highest priority first.
    pub const ALL: [PatternShape; 6] = [
        PatternShape::FirstDotLast,
        PatternShape::FirstLast,
        PatternShape::FLast,
        PatternShape::FirstUnderscoreLast,
        PatternShape::LastFirst,
        PatternShape::First,
    ];

    /// Template name used in discovery notes.
    pub fn template(&self) -> &'static str {
        match self {
            Self::FirstDotLast => "first.last",
            Self::FirstLast => "firstlast",
            Self::FLast => "flast",
            Self::FirstUnderscoreLast => "first_last",
            Self::LastFirst => "lastfirst",
            Self::First => "first",
        }
    }

    fn priority(&self) -> u8 {
        match self {
            Self::FirstDotLast => 0,
            Self::FirstLast => 1,
            Self::FLast => 2,
            Self::FirstUnderscoreLast => 3,
            Self::LastFirst => 4,
            Self::First => 5,
        }
    }

    /// The local part this shape predicts for a name, lowercased.
    ///
    /// Returns `None` when the shape cannot be formed, e.g. `flast`
    /// with an empty first name.
    fn local_part(&self, first: &str, last: &str) -> Option<String> {
        let first = first.to_lowercase();
        let last = last.to_lowercase();
        let local = match self {
            Self::FirstDotLast => format!("{first}.{last}"),
            Self::FirstLast => format!("{first}{last}"),
            Self::FLast => {
                let initial = first.chars().next()?;
                format!("{initial}{last}")
            }
            Self::FirstUnderscoreLast => format!("{first}_{last}"),
            Self::LastFirst => format!("{last}{first}"),
            Self::First => first,
        };
        Some(local)
    }

    /// Whether `local` is what this shape would predict for the name.
    pub fn matches(&self, first: &str, last: &str, local: &str) -> bool {
        self.local_part(first, last)
            .is_some_and(|expected| expected == local)
    }

    /// Predict a full address for a name at a domain.
    pub fn format(&self, first: &str, last: &str, domain: &str) -> Option<String> {
        let local = self.local_part(first, last)?;
        if local.is_empty() {
            return None;
        }
        Some(format!("{local}@{domain}"))
    }
}

impl std::fmt::Display for PatternShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.template())
    }
}

// ── Ranked results ──────────────────────────────────────────────────

/// One shape's score against a set of observations.
#[derive(Debug, Clone)]
pub struct RankedPattern {
    pub shape: PatternShape,
    /// Fraction of usable observations this shape explained, in (0, 1].
    pub confidence: f64,
    /// Number of observations this shape explained.
    pub matches: usize,
    /// Email domain shared by the observations.
    pub domain: String,
}

// ── Analyzer ────────────────────────────────────────────────────────

/// Scores each [`PatternShape`] against peer observations.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternAnalyzer;

impl PatternAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Rank the shapes that explain at least one observation.
    ///
    /// Observations without a usable address (no `@`) are skipped and do
    /// not count toward the denominator. Each observation is attributed
    /// to at most one shape, the highest-priority one that matches. The
    /// result is sorted by confidence, then match count, then shape
    /// priority; shapes with zero matches are omitted, so an empty input
    /// yields an empty ranking.
    pub fn analyze(&self, observations: &[PeerObservation]) -> Vec<RankedPattern> {
        let mut counts = [0usize; PatternShape::ALL.len()];
        let mut total = 0usize;
        let mut domain: Option<String> = None;

        for obs in observations {
            let email = obs.email.to_lowercase();
            let Some((local, email_domain)) = email.split_once('@') else {
                continue;
            };
            if domain.is_none() {
                domain = Some(email_domain.to_string());
            }
            total += 1;

            let first = obs.first_name.to_lowercase();
            let last = obs.last_name.to_lowercase();
            for (i, shape) in PatternShape::ALL.iter().enumerate() {
                if shape.matches(&first, &last, local) {
                    counts[i] += 1;
                    break;
                }
            }
        }

        let Some(domain) = domain else {
            return Vec::new();
        };

        let mut ranked: Vec<RankedPattern> = PatternShape::ALL
            .iter()
            .zip(counts)
            .filter(|(_, count)| *count > 0)
            .map(|(shape, count)| RankedPattern {
                shape: *shape,
                confidence: count as f64 / total as f64,
                matches: count,
                domain: domain.clone(),
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.confidence
                .total_cmp(&a.confidence)
                .then_with(|| b.matches.cmp(&a.matches))
                .then_with(|| a.shape.priority().cmp(&b.shape.priority()))
        });
        ranked
    }
}
