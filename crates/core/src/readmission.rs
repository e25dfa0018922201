//! 30-day readmission labeling
//!
//! Only inpatient-class encounters take part. They are ordered by start
//! (stable, so equal starts keep bundle order), each is discharged at its
//! end (or its start when it has no end), and a discharge is labeled as
//! readmitted when any later admission starts 1 to 30 whole days after it.
//! Later admissions that overlap the stay (0 days or less) or fall outside
//! the window are skipped, not treated as the end of the search.

use crate::error::Result;
use crate::model::{DischargeEvent, Encounter};
use crate::timestamp::Timestamp;

/// Upper bound (inclusive) of the readmission window, in days
pub const READMISSION_WINDOW_DAYS: i64 = 30;

/// An inpatient encounter with its timestamps resolved
#[derive(Debug)]
struct Admission<'a> {
    start: Timestamp,
    discharge: Timestamp,
    class_code: &'a str,
}

impl<'a> Admission<'a> {
    fn resolve(encounter: &'a Encounter) -> Result<Self> {
        let start = Timestamp::parse(&encounter.start)?;
        let discharge = match encounter.end.as_deref() {
            Some(end) => Timestamp::parse(end)?,
            None => start,
        };
        Ok(Self {
            start,
            discharge,
            class_code: &encounter.class_code,
        })
    }
}

/// True when a gap of `days` after a discharge counts as a readmission
pub fn is_within_window(days: i64) -> bool {
    days > 0 && days <= READMISSION_WINDOW_DAYS
}

/// Label every inpatient-class discharge in `encounters`.
///
/// Events come back in admission order. Any unparsable timestamp on an
/// inpatient-class encounter fails the whole pass.
pub fn label_readmissions(encounters: &[Encounter]) -> Result<Vec<DischargeEvent>> {
    let mut admissions = encounters
        .iter()
        .filter(|e| e.is_inpatient())
        .map(Admission::resolve)
        .collect::<Result<Vec<_>>>()?;

    admissions.sort_by(|a, b| a.start.cmp(&b.start));

    let events = admissions
        .iter()
        .enumerate()
        .map(|(i, admission)| {
            let readmitted = admissions[i + 1..]
                .iter()
                .any(|next| is_within_window(admission.discharge.days_until(&next.start)));

            DischargeEvent {
                discharge_date: admission.discharge,
                encounter_type: admission.class_code.to_string(),
                is_readmitted_within_30_days: readmitted,
            }
        })
        .collect();

    Ok(events)
}
