//! Workbook sink: one xlsx with a sheet per verdict, plus CSV backups.

use std::path::PathBuf;

use async_trait::async_trait;
use rust_xlsxwriter::Workbook;
use tracing::info;

use crate::error::OutputError;
use crate::model::ClassifiedRoster;

use super::{headers, row_values, sheet_name, OutputSink, BASE_HEADERS, REPORT_ORDER};

/// File name of the workbook inside the output directory.
pub const RESULTS_FILE: &str = "prospect_triage_results.xlsx";

/// Subdirectory holding one CSV per verdict.
pub const CSV_BACKUP_DIR: &str = "csv_backup";

/// Final column width cap, in characters.
const MAX_COLUMN_WIDTH: usize = 50;

/// Writes the classified roster as an auto-sized workbook and a set of
/// plain CSV files that survive a spreadsheet-less environment.
pub struct WorkbookSink {
    output_dir: PathBuf,
}

impl WorkbookSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Where the workbook lands.
    pub fn workbook_path(&self) -> PathBuf {
        self.output_dir.join(RESULTS_FILE)
    }

    fn write_workbook(&self, roster: &ClassifiedRoster) -> Result<(), OutputError> {
        let mut workbook = Workbook::new();
        for verdict in REPORT_ORDER {
            let sheet = workbook.add_worksheet();
            sheet.set_name(sheet_name(verdict))?;

            let headers = headers(verdict);
            let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
            for (col, header) in headers.iter().enumerate() {
                sheet.write_string(0, col as u16, *header)?;
            }
            for (row, classified) in roster.bucket(verdict).iter().enumerate() {
                for (col, value) in row_values(verdict, classified).iter().enumerate() {
                    widths[col] = widths[col].max(value.chars().count());
                    sheet.write_string((row + 1) as u32, col as u16, value)?;
                }
            }
            for (col, width) in widths.into_iter().enumerate() {
                sheet.set_column_width(col as u16, (width + 2).min(MAX_COLUMN_WIDTH) as f64)?;
            }
        }
        workbook.save(self.workbook_path())?;
        Ok(())
    }

    fn write_csv_backups(&self, roster: &ClassifiedRoster) -> Result<(), OutputError> {
        let backup_dir = self.output_dir.join(CSV_BACKUP_DIR);
        std::fs::create_dir_all(&backup_dir)?;
        for verdict in REPORT_ORDER {
            let path = backup_dir.join(format!("{}.csv", verdict.label()));
            let mut writer = csv::Writer::from_path(&path)?;
            writer.write_record(&BASE_HEADERS)?;
            for classified in roster.bucket(verdict) {
                writer.write_record(&row_values(verdict, classified)[..BASE_HEADERS.len()])?;
            }
            writer.flush()?;
        }
        Ok(())
    }
}

#[async_trait]
impl OutputSink for WorkbookSink {
    async fn write(&self, roster: &ClassifiedRoster) -> Result<(), OutputError> {
        std::fs::create_dir_all(&self.output_dir)?;
        self.write_workbook(roster)?;
        self.write_csv_backups(roster)?;
        info!(
            workbook = %self.workbook_path().display(),
            rows = roster.total(),
            "results written"
        );
        Ok(())
    }
}
