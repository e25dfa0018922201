//! Per-patient batch processing
//!
//! Every bundle is handled independently on the rayon pool. A failing
//! patient is recorded and logged; it never stops the rest of the batch.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use readmit_core::{CoreError, PatientRecord, parse_bundle_file};

/// Result of running one bundle through the core
#[derive(Debug)]
pub struct PatientOutcome<T> {
    pub path: PathBuf,
    /// Known whenever the bundle itself parsed
    pub patient_id: Option<String>,
    pub result: Result<T, CoreError>,
}

/// Outcomes in the same order as the input paths
#[derive(Debug)]
pub struct BatchReport<T> {
    pub outcomes: Vec<PatientOutcome<T>>,
}

impl<T> BatchReport<T> {
    pub fn succeeded(&self) -> impl Iterator<Item = &T> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &PatientOutcome<T>> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// One warning per failed patient, then a summary line
    pub fn log_summary(&self) {
        for failure in self.failures() {
            if let Err(err) = &failure.result {
                tracing::warn!(
                    path = %failure.path.display(),
                    patient_id = failure.patient_id.as_deref().unwrap_or("unknown"),
                    error = %err,
                    "Patient skipped"
                );
            }
        }
        tracing::info!(
            total = self.outcomes.len(),
            failed = self.failure_count(),
            "Batch complete"
        );
    }
}

/// Parse each bundle and apply `work` to the record
pub fn process<T, F>(paths: &[PathBuf], work: F) -> BatchReport<T>
where
    F: Fn(&PatientRecord) -> Result<T, CoreError> + Sync,
    T: Send,
{
    let outcomes = paths
        .par_iter()
        .map(|path| process_one(path, &work))
        .collect();

    BatchReport { outcomes }
}

fn process_one<T, F>(path: &Path, work: &F) -> PatientOutcome<T>
where
    F: Fn(&PatientRecord) -> Result<T, CoreError>,
{
    match parse_bundle_file(path) {
        Ok(record) => PatientOutcome {
            path: path.to_path_buf(),
            patient_id: record.patient_id.clone(),
            result: work(&record),
        },
        Err(err) => PatientOutcome {
            path: path.to_path_buf(),
            patient_id: None,
            result: Err(err),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use readmit_core::PatientFeatures;
    use std::fs;

    #[test]
    fn test_failures_do_not_halt_batch() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("a.json");
        let broken = dir.path().join("b.json");
        let bad_date = dir.path().join("c.json");

        fs::write(
            &good,
            r#"{"entry": [
                {"resource": {"resourceType": "Patient", "id": "good"}},
                {"resource": {"resourceType": "Encounter", "class": {"code": "IMP"}, "period": {"start": "2024-01-01"}}}
            ]}"#,
        )
        .unwrap();
        fs::write(&broken, "{ not json").unwrap();
        fs::write(
            &bad_date,
            r#"{"entry": [
                {"resource": {"resourceType": "Patient", "id": "dated"}},
                {"resource": {"resourceType": "Encounter", "class": {"code": "IMP"}, "period": {"start": "01/01/2024"}}}
            ]}"#,
        )
        .unwrap();

        let paths = vec![good.clone(), broken.clone(), bad_date.clone()];
        let report = process(&paths, PatientFeatures::derive);

        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.failure_count(), 2);
        assert_eq!(report.outcomes[0].path, good);
        assert_eq!(report.succeeded().next().unwrap().discharges.len(), 1);

        assert!(matches!(report.outcomes[1].result, Err(CoreError::MalformedInput(_))));
        assert_eq!(report.outcomes[1].patient_id, None);

        assert!(matches!(
            report.outcomes[2].result,
            Err(CoreError::InvalidTimestamp { .. })
        ));
        assert_eq!(report.outcomes[2].patient_id.as_deref(), Some("dated"));
    }
}
