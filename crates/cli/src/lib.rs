//! readmit-cli: batch front end for `readmit-core`
//!
//! Finds bundle files on disk, runs each patient through the core in
//! parallel, and reports features or encounter year distributions.

pub mod batch;
pub mod discovery;
pub mod report;

pub use batch::{BatchReport, PatientOutcome, process};
pub use discovery::{DiscoveryConfig, discover};
pub use report::{YearDistribution, encounter_span};
