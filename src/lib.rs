//! Prospect triage — roster in, relationship verdicts out.

pub mod classify;
pub mod config;
pub mod crm;
pub mod directory;
pub mod email;
pub mod error;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod roster;
