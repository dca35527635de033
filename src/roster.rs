//! Roster CSV ingestion.
//!
//! The roster is the one piece of caller-supplied input, so unlike
//! collaborator lookups its problems are surfaced as errors instead of
//! being absorbed: a missing column or a row without a name points at
//! an upstream export bug the operator needs to know about.

use std::path::Path;

use crate::error::RosterError;
use crate::model::Prospect;

const REQUIRED_COLUMNS: [&str; 3] = ["First Name", "Last Name", "Company"];
const TITLE_COLUMN: &str = "Job Title";

/// Read prospects from a roster CSV.
///
/// Expects `First Name`, `Last Name` and `Company` columns; `Job Title`
/// is optional and defaults to blank. Values are whitespace-trimmed and
/// a leading UTF-8 BOM is tolerated.
pub fn read_roster(path: &Path) -> Result<Vec<Prospect>, RosterError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|header| header == name);

    let mut required = [0usize; 3];
    for (slot, name) in required.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = column(name).ok_or_else(|| RosterError::MissingColumn(name.to_string()))?;
    }
    let [first_idx, last_idx, company_idx] = required;
    let title_idx = column(TITLE_COLUMN);

    let mut prospects = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // 1-based file row, counting the header line.
        let row = i + 2;
        let field = |idx: usize| record.get(idx).unwrap_or("").to_string();

        let prospect = Prospect {
            first_name: field(first_idx),
            last_name: field(last_idx),
            company: field(company_idx),
            title: title_idx.map(field).unwrap_or_default(),
        };
        for (value, name) in [
            (&prospect.first_name, "First Name"),
            (&prospect.last_name, "Last Name"),
            (&prospect.company, "Company"),
        ] {
            if value.is_empty() {
                return Err(RosterError::MissingField {
                    row,
                    field: name.to_string(),
                });
            }
        }
        prospects.push(prospect);
    }

    if prospects.is_empty() {
        return Err(RosterError::Empty);
    }
    Ok(prospects)
}
