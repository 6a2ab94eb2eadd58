use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr, VariantNames};
use tracing::info;

use crate::{error::Result, traits::ReportSink, types::DetectionRecord};

/// Column titles, in output order
pub const REPORT_HEADERS: [&str; 5] = [
    "Image",
    "Detected Matches",
    "Ground Truth Matches",
    "Detection Percentage",
    "False Positives",
];

#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, VariantNames, IntoStaticStr,
    PartialEq, Eq
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReportFormat {
    /// Comma-separated table with a header row
    #[default]
    Csv,
    /// Pretty-printed JSON array of row objects
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        self.into()
    }
}

/// One report row as it appears in the output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "Image")]
    pub label: String,
    #[serde(rename = "Detected Matches")]
    pub detected_matches: usize,
    #[serde(rename = "Ground Truth Matches")]
    pub ground_truth_matches: usize,
    #[serde(rename = "Detection Percentage")]
    pub detection_percentage: f64,
    #[serde(rename = "False Positives")]
    pub false_positives: i64,
}

impl ReportRow {
    pub fn new(index: usize, record: &DetectionRecord) -> Self {
        Self {
            label: format!("Image_{index}"),
            detected_matches: record.detected_matches,
            ground_truth_matches: record.ground_truth_matches,
            detection_percentage: record.detection_percentage,
            false_positives: record.false_positives,
        }
    }
}

pub fn report_rows(records: &[DetectionRecord]) -> Vec<ReportRow> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| ReportRow::new(i, record))
        .collect()
}

/// CSV table writer
pub struct CsvReportSink<W: Write> {
    writer: W,
}

impl<W: Write> CsvReportSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for CsvReportSink<W> {
    fn write_records(&mut self, records: &[DetectionRecord]) -> Result<()> {
        writeln!(self.writer, "{}", REPORT_HEADERS.join(","))?;
        for row in report_rows(records) {
            writeln!(
                self.writer,
                "{},{},{},{},{}",
                row.label,
                row.detected_matches,
                row.ground_truth_matches,
                row.detection_percentage,
                row.false_positives
            )?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// JSON writer, one object per row keyed by column title
pub struct JsonReportSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonReportSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for JsonReportSink<W> {
    fn write_records(&mut self, records: &[DetectionRecord]) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, &report_rows(records))?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Create `path` and write the records in the requested format
pub fn write_report<P: AsRef<Path>>(
    path: P,
    format: ReportFormat,
    records: &[DetectionRecord],
) -> Result<()> {
    let path = path.as_ref();
    let writer = BufWriter::new(File::create(path)?);

    let mut sink: Box<dyn ReportSink> = match format {
        ReportFormat::Csv => Box::new(CsvReportSink::new(writer)),
        ReportFormat::Json => Box::new(JsonReportSink::new(writer)),
    };
    sink.write_records(records)?;

    info!(path = %path.display(), %format, rows = records.len(), "wrote report");
    Ok(())
}
