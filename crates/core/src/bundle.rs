//! Permissive view over a FHIR Bundle document
//!
//! Nothing in here fails: a missing `entry` list, an entry without a
//! `resource`, or a nested field of the wrong JSON type all read as
//! "absent". The field paths and defaults for each recognised resource
//! type live in the `*Fields` tables below.

use serde_json::{Map, Value as JsonValue};

use crate::model::{Condition, Encounter, UNKNOWN_CLASS_CODE, UNKNOWN_CONDITION};

/// JSON object keys walked from the resource root
pub type FieldPath = &'static [&'static str];

/// FHIR Bundle, reduced to its entries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bundle {
    pub entry: Vec<BundleEntry>,
}

/// Bundle entry; the resource is absent when missing or not an object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BundleEntry {
    pub resource: Option<Resource>,
}

/// A single resource as an untyped JSON object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resource(Map<String, JsonValue>);

impl Bundle {
    /// Build from any JSON value; non-objects yield an empty bundle
    pub fn from_value(value: JsonValue) -> Self {
        let entries = match value {
            JsonValue::Object(mut map) => match map.remove("entry") {
                Some(JsonValue::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };

        Self {
            entry: entries.into_iter().map(BundleEntry::from_value).collect(),
        }
    }

    /// Resources in source order, skipping entries without one
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.entry.iter().filter_map(|e| e.resource.as_ref())
    }
}

impl BundleEntry {
    fn from_value(value: JsonValue) -> Self {
        let resource = match value {
            JsonValue::Object(mut map) => match map.remove("resource") {
                Some(JsonValue::Object(resource)) => Some(Resource(resource)),
                _ => None,
            },
            _ => None,
        };
        Self { resource }
    }
}

impl Resource {
    pub fn new(fields: Map<String, JsonValue>) -> Self {
        Self(fields)
    }

    pub fn resource_type(&self) -> Option<&str> {
        self.0.get("resourceType").and_then(JsonValue::as_str)
    }

    /// String at `path`, or `None` if any step is missing or mistyped
    pub fn str_at(&self, path: FieldPath) -> Option<&str> {
        let (last, parents) = path.split_last()?;
        let mut current = &self.0;
        for key in parents {
            current = current.get(*key)?.as_object()?;
        }
        current.get(*last)?.as_str()
    }

    /// Like [`str_at`](Self::str_at) but treats `""` as absent
    pub fn non_empty_str_at(&self, path: FieldPath) -> Option<&str> {
        self.str_at(path).filter(|s| !s.is_empty())
    }

    /// Classify by `resourceType` and extract the recognised fields
    pub fn view(&self) -> ResourceView {
        match self.resource_type() {
            Some("Patient") => ResourceView::Patient(PatientFields::extract(self)),
            Some("Encounter") => ResourceView::Encounter(EncounterFields::extract(self)),
            Some("Condition") => ResourceView::Condition(ConditionFields::extract(self)),
            _ => ResourceView::Other,
        }
    }
}

/// What the parser needs to know about one resource
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceView {
    Patient(Demographics),
    /// `None` when the encounter has no start
    Encounter(Option<Encounter>),
    /// `None` when the condition has no onset
    Condition(Option<Condition>),
    Other,
}

/// Demographic fields of a Patient resource
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Demographics {
    pub id: Option<String>,
    pub birth_date: Option<String>,
    pub gender: Option<String>,
}

pub struct PatientFields;

impl PatientFields {
    pub const ID: FieldPath = &["id"];
    pub const BIRTH_DATE: FieldPath = &["birthDate"];
    pub const GENDER: FieldPath = &["gender"];

    pub fn extract(resource: &Resource) -> Demographics {
        Demographics {
            id: resource.str_at(Self::ID).map(str::to_string),
            birth_date: resource.str_at(Self::BIRTH_DATE).map(str::to_string),
            gender: resource.str_at(Self::GENDER).map(str::to_string),
        }
    }
}

pub struct EncounterFields;

impl EncounterFields {
    pub const START: FieldPath = &["period", "start"];
    pub const END: FieldPath = &["period", "end"];
    pub const CLASS_CODE: FieldPath = &["class", "code"];
    pub const CLASS_CODE_DEFAULT: &'static str = UNKNOWN_CLASS_CODE;

    pub fn extract(resource: &Resource) -> Option<Encounter> {
        let start = resource.non_empty_str_at(Self::START)?;
        Some(Encounter::new(
            start,
            resource.non_empty_str_at(Self::END),
            resource
                .str_at(Self::CLASS_CODE)
                .unwrap_or(Self::CLASS_CODE_DEFAULT),
        ))
    }
}

pub struct ConditionFields;

impl ConditionFields {
    pub const NAME: FieldPath = &["code", "text"];
    pub const NAME_DEFAULT: &'static str = UNKNOWN_CONDITION;
    pub const ONSET: FieldPath = &["onsetDateTime"];

    pub fn extract(resource: &Resource) -> Option<Condition> {
        let onset = resource.non_empty_str_at(Self::ONSET)?;
        Some(Condition {
            name: resource
                .str_at(Self::NAME)
                .unwrap_or(Self::NAME_DEFAULT)
                .to_string(),
            onset: onset.to_string(),
        })
    }
}
