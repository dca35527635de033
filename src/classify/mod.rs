//! Prospect classification against the CRM.

pub mod engine;
pub mod roe;

pub use engine::ClassificationEngine;
pub use roe::{RoeOutcome, RoeQualifier};
