//! Year distribution of encounter starts across many patients

use std::collections::BTreeMap;
use std::fmt;

use readmit_core::{PatientRecord, Timestamp};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearDistribution {
    counts: BTreeMap<i32, usize>,
    /// Encounter starts that are not valid timestamps
    unparsed: usize,
}

impl YearDistribution {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a PatientRecord>) -> Self {
        let mut dist = Self::default();
        for record in records {
            dist.add(record);
        }
        dist
    }

    pub fn add(&mut self, record: &PatientRecord) {
        for encounter in &record.encounters {
            match Timestamp::parse(&encounter.start) {
                Ok(start) => *self.counts.entry(start.year()).or_default() += 1,
                Err(_) => self.unparsed += 1,
            }
        }
    }

    pub fn count(&self, year: i32) -> usize {
        self.counts.get(&year).copied().unwrap_or(0)
    }

    pub fn unparsed(&self) -> usize {
        self.unparsed
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum::<usize>() + self.unparsed
    }
}

impl fmt::Display for YearDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (year, count) in &self.counts {
            writeln!(f, "{year}: {count} encounters")?;
        }
        if self.unparsed > 0 {
            writeln!(f, "unparsed: {} encounters", self.unparsed)?;
        }
        Ok(())
    }
}

/// First and last encounter start of one patient, for the report header
pub fn encounter_span(record: &PatientRecord) -> Option<(Timestamp, Timestamp)> {
    let mut starts = record
        .encounters
        .iter()
        .filter_map(|e| Timestamp::parse(&e.start).ok());
    let first = starts.next()?;
    Some(starts.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))))
}
