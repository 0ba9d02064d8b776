//! Load plan state, scenario cards and override batches; write year rows
//!
//! Plan state and cards are JSON. Override batches are CSV with the header
//! `target,kind,from_age,to_age,value` where an empty `to_age` means
//! open-ended.

use super::PlanState;
use crate::error::{Result, RuleSpecError};
use crate::materialize::YearInputs;
use crate::scenario::ScenarioCard;
use crate::spec::{OverrideKind, TargetKey, TargetedOverride};
use csv::{Reader, Writer};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

/// Raw CSV row for one targeted override
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    target: String,
    kind: String,
    from_age: u32,
    #[serde(default)]
    to_age: Option<u32>,
    value: f64,
}

impl CsvRow {
    fn into_override(self) -> Result<TargetedOverride> {
        let target: TargetKey = self.target.parse()?;
        let kind = OverrideKind::parse(&self.kind)
            .ok_or_else(|| RuleSpecError::UnknownKind(self.kind.clone()))?;
        Ok(TargetedOverride::new(
            target,
            kind,
            self.from_age,
            self.to_age,
            self.value,
        ))
    }
}

/// Load plan state from a JSON file
pub fn load_plan_state<P: AsRef<Path>>(path: P) -> Result<PlanState> {
    load_plan_state_from_reader(BufReader::new(File::open(path)?))
}

/// Load plan state from any reader
pub fn load_plan_state_from_reader<R: Read>(reader: R) -> Result<PlanState> {
    Ok(serde_json::from_reader(reader)?)
}

/// Load scenario cards from a JSON array file
pub fn load_cards<P: AsRef<Path>>(path: P) -> Result<Vec<ScenarioCard>> {
    load_cards_from_reader(BufReader::new(File::open(path)?))
}

/// Load scenario cards from any reader
pub fn load_cards_from_reader<R: Read>(reader: R) -> Result<Vec<ScenarioCard>> {
    Ok(serde_json::from_reader(reader)?)
}

/// Load a batch of targeted overrides from a CSV file
pub fn load_overrides<P: AsRef<Path>>(path: P) -> Result<Vec<TargetedOverride>> {
    let mut reader = Reader::from_path(path)?;
    read_overrides(&mut reader)
}

/// Load a batch of targeted overrides from any reader
pub fn load_overrides_from_reader<R: Read>(reader: R) -> Result<Vec<TargetedOverride>> {
    let mut csv_reader = Reader::from_reader(reader);
    read_overrides(&mut csv_reader)
}

fn read_overrides<R: Read>(reader: &mut Reader<R>) -> Result<Vec<TargetedOverride>> {
    let mut overrides = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        overrides.push(row.into_override()?);
    }
    Ok(overrides)
}

/// Write materialized year rows as CSV
pub fn write_year_inputs<W: Write>(writer: W, years: &[YearInputs]) -> Result<()> {
    let mut csv_writer = Writer::from_writer(writer);
    for year in years {
        csv_writer.serialize(year)?;
    }
    csv_writer.flush()?;
    Ok(())
}
