//! Run-scoped registry of peers with known emails.

use super::PeerObservation;

/// Append-only collection of [`PeerObservation`]s for one run.
///
/// Every address that discovery resolves is recorded here, so later
/// prospects from the same company can reuse the established pattern
/// without another directory lookup.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    observations: Vec<PeerObservation>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observation.
    ///
    /// Only addresses with exactly one `@` are accepted; anything else is
    /// dropped and `false` is returned.
    pub fn record(&mut self, observation: PeerObservation) -> bool {
        if observation.email.matches('@').count() != 1 {
            return false;
        }
        self.observations.push(observation);
        true
    }

    /// All observations for a company, matched case-insensitively with
    /// surrounding whitespace ignored.
    pub fn for_company(&self, company: &str) -> Vec<PeerObservation> {
        let wanted = company.trim().to_lowercase();
        self.observations
            .iter()
            .filter(|obs| obs.company.trim().to_lowercase() == wanted)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
