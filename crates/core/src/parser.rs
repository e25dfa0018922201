//! Bundle parser: one patient bundle in, one [`PatientRecord`] out

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde_json::Value as JsonValue;

use crate::bundle::{Bundle, ResourceView};
use crate::error::{CoreError, Result};
use crate::model::PatientRecord;

/// Parse a bundle from JSON text.
///
/// Only fails when the text is not JSON at all.
pub fn parse_bundle(source: &str) -> Result<PatientRecord> {
    let value: JsonValue = serde_json::from_str(source)?;
    Ok(parse_bundle_value(value))
}

pub fn parse_bundle_reader<R: Read>(reader: R) -> Result<PatientRecord> {
    let value: JsonValue = serde_json::from_reader(reader)?;
    Ok(parse_bundle_value(value))
}

pub fn parse_bundle_file(path: impl AsRef<Path>) -> Result<PatientRecord> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    // Read failures surface through serde_json; keep them as I/O errors
    serde_json::from_reader(BufReader::new(file))
        .map(parse_bundle_value)
        .map_err(|err| {
            if err.is_io() {
                CoreError::Io {
                    path: path.to_path_buf(),
                    source: err.into(),
                }
            } else {
                CoreError::MalformedInput(err)
            }
        })
}

/// Extract a record from an already-decoded document
pub fn parse_bundle_value(value: JsonValue) -> PatientRecord {
    let bundle = Bundle::from_value(value);
    let mut record = PatientRecord::default();

    for resource in bundle.resources() {
        match resource.view() {
            // Last Patient resource wins
            ResourceView::Patient(demographics) => {
                record.patient_id = demographics.id;
                record.birth_date = demographics.birth_date;
                record.gender = demographics.gender;
            }
            ResourceView::Encounter(Some(encounter)) => record.encounters.push(encounter),
            ResourceView::Condition(Some(condition)) => record.conditions.push(condition),
            ResourceView::Encounter(None) | ResourceView::Condition(None) | ResourceView::Other => {}
        }
    }

    record
}
