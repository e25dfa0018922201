//! Per-patient records produced by the parser and the labeler

use serde::{Deserialize, Serialize};

use crate::timestamp::Timestamp;

/// Encounter classes that count as an admission for readmission labeling.
///
/// Matching is exact and case-sensitive; upstream feeds use both the
/// HL7 v3 ActCode (`IMP`, `EMER`) and the lowercase display names.
pub const INPATIENT_CLASS_CODES: [&str; 4] = ["IMP", "EMER", "inpatient", "emergency"];

/// Class code assigned when an Encounter carries no classification
pub const UNKNOWN_CLASS_CODE: &str = "unknown";

/// Name assigned when a Condition carries no code text
pub const UNKNOWN_CONDITION: &str = "Unknown";

/// Everything extracted from one patient's bundle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub patient_id: Option<String>,
    pub birth_date: Option<String>,
    pub gender: Option<String>,
    /// In bundle order, not necessarily chronological
    pub encounters: Vec<Encounter>,
    pub conditions: Vec<Condition>,
}

/// One care episode. Timestamps are kept as the source wrote them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default = "default_class_code")]
    pub class_code: String,
}

fn default_class_code() -> String {
    UNKNOWN_CLASS_CODE.to_string()
}

impl Encounter {
    pub fn new(start: impl Into<String>, end: Option<&str>, class_code: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.map(str::to_string),
            class_code: class_code.into(),
        }
    }

    /// True for admission-worthy classes (see [`INPATIENT_CLASS_CODES`])
    pub fn is_inpatient(&self) -> bool {
        INPATIENT_CLASS_CODES.contains(&self.class_code.as_str())
    }
}

/// One diagnosis record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub name: String,
    pub onset: String,
}

/// A discharge from an inpatient-class encounter and its 30-day label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DischargeEvent {
    pub discharge_date: Timestamp,
    pub encounter_type: String,
    pub is_readmitted_within_30_days: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inpatient_vocabulary_is_exact() {
        for code in ["IMP", "EMER", "inpatient", "emergency"] {
            assert!(Encounter::new("2024-01-01", None, code).is_inpatient());
        }
        for code in ["imp", "Inpatient", "EMERGENCY", "AMB", "outpatient", "unknown", ""] {
            assert!(!Encounter::new("2024-01-01", None, code).is_inpatient());
        }
    }

    #[test]
    fn test_encounter_json_defaults_class() {
        let enc: Encounter = serde_json::from_str(r#"{"start": "2024-01-01"}"#).unwrap();
        assert_eq!(enc.class_code, "unknown");
        assert_eq!(enc.end, None);
    }

    #[test]
    fn test_discharge_event_json_names() {
        let event = DischargeEvent {
            discharge_date: Timestamp::parse("2024-01-05").unwrap(),
            encounter_type: "IMP".to_string(),
            is_readmitted_within_30_days: true,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["dischargeDate"], "2024-01-05");
        assert_eq!(json["encounterType"], "IMP");
        assert_eq!(json["isReadmittedWithin30Days"], true);
    }
}
