//! Feature extraction and readmission labeling operations
//! (`Bundle/$extract-features`, `Encounter/$label-readmissions`)

use axum::{Json, body::Bytes, response::IntoResponse};
use readmit_core::{
    CoreError, DischargeEvent, Encounter, PatientFeatures, PatientRecord, parse_bundle_reader,
};
use serde::Serialize;

use crate::error::AppError;

/// Response body for feature extraction
#[derive(Serialize)]
pub struct ExtractFeaturesResponse {
    patient: PatientRecord,
    features: PatientFeatures,
}

/// Run CPU-bound core work off the async workers
async fn blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, CoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(format!("Worker task failed: {}", e)))?
        .map_err(AppError::from)
}

/// POST /fhir/Bundle/$extract-features - Parse one patient bundle
///
/// The body is taken as raw bytes so that unparsable JSON is reported as a
/// FHIR OperationOutcome instead of axum's plain-text rejection.
pub async fn extract_features(body: Bytes) -> Result<impl IntoResponse, AppError> {
    let size = body.len();

    let (patient, features) = blocking(move || {
        let patient = parse_bundle_reader(&body[..])?;
        let features = PatientFeatures::derive(&patient)?;
        Ok((patient, features))
    })
    .await
    .inspect_err(|e| tracing::warn!(error = ?e, bytes = size, "Bundle rejected"))?;

    metrics::counter!("bundles_parsed_total").increment(1);
    tracing::info!(
        patient_id = patient.patient_id.as_deref().unwrap_or("unknown"),
        encounters = features.encounter_count,
        discharges = features.discharges.len(),
        readmissions = features.readmission_count,
        "Bundle processed"
    );

    Ok(Json(ExtractFeaturesResponse { patient, features }))
}

/// POST /fhir/Encounter/$label-readmissions - Label a list of encounters
pub async fn label_readmissions(body: Bytes) -> Result<impl IntoResponse, AppError> {
    let events: Vec<DischargeEvent> = blocking(move || {
        let encounters: Vec<Encounter> = serde_json::from_slice(&body)?;
        readmit_core::label_readmissions(&encounters)
    })
    .await?;

    tracing::debug!(discharges = events.len(), "Encounters labeled");

    Ok(Json(events))
}
