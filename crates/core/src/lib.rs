//! readmit-core: patient features and 30-day readmission labels from FHIR bundles
//!
//! The parser turns one patient's Bundle into a [`PatientRecord`]; the
//! labeler turns its encounters into [`DischargeEvent`]s. Both are pure
//! functions of their input and hold no shared state, so callers may run
//! them for many patients in parallel.

pub mod bundle;
pub mod error;
pub mod features;
pub mod model;
pub mod outcome;
pub mod parser;
pub mod readmission;
pub mod timestamp;

// Re-export our types
pub use bundle::{Bundle, BundleEntry, Resource};
pub use error::{CoreError, Result};
pub use features::{PatientFeatures, age_at, age_on};
pub use model::{
    Condition, DischargeEvent, Encounter, INPATIENT_CLASS_CODES, PatientRecord,
};
pub use outcome::{IssueSeverity, IssueType, OperationOutcome, OperationOutcomeIssue};
pub use parser::{parse_bundle, parse_bundle_file, parse_bundle_reader, parse_bundle_value};
pub use readmission::{READMISSION_WINDOW_DAYS, label_readmissions};
pub use timestamp::Timestamp;
