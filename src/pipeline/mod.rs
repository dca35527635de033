//! Run orchestration.
//!
//! Every prospect flows through:
//! 1. `EmailWaterfall` — strategy chain for address discovery
//! 2. `ClassificationEngine` — CRM relationship verdict
//! 3. `OutputSink` — workbook and CSV backups at the end of the run
//!
//! with a `ProgressSink` snapshot published at each phase flip.

pub mod runner;

pub use runner::Runner;
