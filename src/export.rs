use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::Path;

use anyhow::Context as _;
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;

use crate::formats::{BookRecord, COLUMNS, CrawlReport};

/// Persists a finished report to a single file.
pub trait ReportWriter: Send + Sync {
    /// File extension without the dot.
    fn extension(&self) -> &'static str;
    fn write(&self, report: &CrawlReport, path: &Path) -> anyhow::Result<()>;
}

/// `{prefix}_{YYYY-MM-DD}.{extension}`
pub fn report_file_name(prefix: &str, date: NaiveDate, extension: &str) -> String {
    format!("{prefix}_{}.{extension}", date.format("%Y-%m-%d"))
}

/// One worksheet per ranking table with a bold header row.
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxWriter;

impl ReportWriter for XlsxWriter {
    fn extension(&self) -> &'static str {
        "xlsx"
    }

    fn write(&self, report: &CrawlReport, path: &Path) -> anyhow::Result<()> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();

        for table in report.tables() {
            let sheet = workbook.add_worksheet();
            sheet
                .set_name(&table.sheet_name)
                .with_context(|| format!("name worksheet {}", table.sheet_name))?;

            for (col, title) in COLUMNS.iter().enumerate() {
                sheet
                    .write_string_with_format(0, col as u16, *title, &header)
                    .context("write header row")?;
            }
            for (index, record) in table.records.iter().enumerate() {
                let row = u32::try_from(index + 1).context("row index overflow")?;
                for (col, value) in record.cells().iter().enumerate() {
                    sheet
                        .write_string(row, col as u16, *value)
                        .with_context(|| format!("write {} row {row}", table.sheet_name))?;
                }
            }
        }

        workbook
            .save(path)
            .with_context(|| format!("save workbook: {}", path.display()))?;
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonlLine<'a> {
    sheet: &'a str,
    #[serde(flatten)]
    record: &'a BookRecord,
}

/// One JSON object per record, tagged with its sheet name.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonlWriter;

impl ReportWriter for JsonlWriter {
    fn extension(&self) -> &'static str {
        "jsonl"
    }

    fn write(&self, report: &CrawlReport, path: &Path) -> anyhow::Result<()> {
        let file =
            File::create(path).with_context(|| format!("create report: {}", path.display()))?;
        let mut out = BufWriter::new(file);
        for table in report.tables() {
            for record in &table.records {
                let line = JsonlLine {
                    sheet: &table.sheet_name,
                    record,
                };
                serde_json::to_writer(&mut out, &line).context("serialize report record")?;
                out.write_all(b"\n").context("write report newline")?;
            }
        }
        out.flush().context("flush report")?;
        Ok(())
    }
}
