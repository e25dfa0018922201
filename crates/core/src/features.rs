//! Per-patient feature row

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{DischargeEvent, PatientRecord};
use crate::readmission::label_readmissions;
use crate::timestamp::Timestamp;

/// Age in whole years on the calendar date of `reference`
pub fn age_at(birth_date: &str, reference: &str) -> Result<i32> {
    age_on(birth_date, &Timestamp::parse(reference)?)
}

/// Age in whole years on the calendar date of an already parsed timestamp
pub fn age_on(birth_date: &str, reference: &Timestamp) -> Result<i32> {
    let birth = Timestamp::parse(birth_date)?.date();
    let on = reference.date();

    let mut age = on.year() - birth.year();
    if (on.month(), on.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    Ok(age)
}

/// Derived features for one patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientFeatures {
    pub patient_id: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<String>,
    pub encounter_count: usize,
    pub condition_count: usize,
    pub discharges: Vec<DischargeEvent>,
    pub readmission_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_at_last_discharge: Option<i32>,
}

impl PatientFeatures {
    /// Label the record's encounters and summarise the patient.
    ///
    /// Fails on the same timestamps the labeler does, and on an
    /// unparsable birth date once there is a discharge to measure it against.
    pub fn derive(record: &PatientRecord) -> Result<Self> {
        let discharges = label_readmissions(&record.encounters)?;

        let age_at_last_discharge = match (&record.birth_date, discharges.last()) {
            (Some(birth), Some(last)) => Some(age_on(birth, &last.discharge_date)?),
            _ => None,
        };

        Ok(Self {
            patient_id: record.patient_id.clone(),
            gender: record.gender.clone(),
            birth_date: record.birth_date.clone(),
            encounter_count: record.encounters.len(),
            condition_count: record.conditions.len(),
            readmission_count: discharges
                .iter()
                .filter(|d| d.is_readmitted_within_30_days)
                .count(),
            discharges,
            age_at_last_discharge,
        })
    }
}
