//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `decisions.csv`
//! - `events.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::TraceWriter;
use crate::{DecisionRow, EventRow, OutputResult};

/// Writes decision traces to two CSV files.
pub struct CsvWriter {
    decisions: Writer<File>,
    events:    Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut decisions = Writer::from_path(dir.join("decisions.csv"))?;
        decisions.write_record([
            "time",
            "agent_id",
            "behavior",
            "target_id",
            "data_id",
            "score",
            "scored",
            "skipped",
            "best",
            "is_same_decision",
        ])?;

        let mut events = Writer::from_path(dir.join("events.csv"))?;
        events.write_record(["time", "agent_id", "kind", "behavior", "target_id"])?;

        Ok(Self { decisions, events, finished: false })
    }
}

impl TraceWriter for CsvWriter {
    fn write_decisions(&mut self, rows: &[DecisionRow]) -> OutputResult<()> {
        for row in rows {
            self.decisions.write_record(&[
                row.time.to_string(),
                row.agent_id.to_string(),
                row.behavior.clone(),
                row.target_id.to_string(),
                row.data_id.to_string(),
                row.score.to_string(),
                (row.scored as u8).to_string(),
                (row.skipped as u8).to_string(),
                (row.best as u8).to_string(),
                (row.is_same_decision as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_event(&mut self, row: &EventRow) -> OutputResult<()> {
        self.events.write_record(&[
            row.time.to_string(),
            row.agent_id.to_string(),
            row.kind.as_str().to_string(),
            row.behavior.clone(),
            row.target_id.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.decisions.flush()?;
        self.events.flush()?;
        Ok(())
    }
}
