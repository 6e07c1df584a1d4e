//! Case records, case details and the manifest, plus the normalization that turns the loosely
//! typed upstream JSON into them.
//!
//! Upstream bundles are produced by several export scripts and disagree on encodings (the
//! diagnosis list in particular). Everything here is best-effort: a malformed field degrades to
//! its default, a record is never rejected.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Bucket key used when a record carries no group information.
pub const UNKNOWN_GROUP: &str = "unknown";

/// The twelve standard leads, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LeadName {
    I,
    II,
    III,
    AVR,
    AVL,
    AVF,
    V1,
    V2,
    V3,
    V4,
    V5,
    V6,
}

impl LeadName {
    pub const ALL: [LeadName; 12] = [
        LeadName::I,
        LeadName::II,
        LeadName::III,
        LeadName::AVR,
        LeadName::AVL,
        LeadName::AVF,
        LeadName::V1,
        LeadName::V2,
        LeadName::V3,
        LeadName::V4,
        LeadName::V5,
        LeadName::V6,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LeadName::I => "I",
            LeadName::II => "II",
            LeadName::III => "III",
            LeadName::AVR => "aVR",
            LeadName::AVL => "aVL",
            LeadName::AVF => "aVF",
            LeadName::V1 => "V1",
            LeadName::V2 => "V2",
            LeadName::V3 => "V3",
            LeadName::V4 => "V4",
            LeadName::V5 => "V5",
            LeadName::V6 => "V6",
        }
    }

    /// Position in [`LeadName::ALL`]; doubles as the synthetic phase seed.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for LeadName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `{id, retrievalFile}` entry of the patient manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub id: String,
    pub retrieval_file: String,
}

/// A case record exactly as it appears in a retrieval bundle.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCaseRecord {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub diagnosis: Option<Value>,
    #[serde(default)]
    pub similarity: Option<Value>,
    #[serde(default)]
    pub medical_group: Option<Value>,
    #[serde(default)]
    pub group_rank: Option<Value>,
    #[serde(default)]
    pub clean_name: Option<String>,
    #[serde(default)]
    pub medical_priority: Option<Value>,
    #[serde(default)]
    pub demographics: Option<String>,
    #[serde(default)]
    pub report: Option<String>,
    #[serde(default)]
    pub is_query_case: Option<bool>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub preview_signal: Option<Vec<Value>>,
}

/// A normalized retrieved case.
///
/// Serializes back into the upstream wire shape, so feeding a normalized record through
/// [`CaseRecord::from_raw`] again is a no-op.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    pub id: String,
    pub diagnosis: Vec<String>,
    pub similarity: f64,
    pub group_rank: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean_name: Option<String>,
    pub medical_priority: i64,
    pub demographics: String,
    pub report: String,
    pub is_query_case: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_signal: Option<Vec<f64>>,
}

impl CaseRecord {
    /// Normalize one raw record. `position` is only used to invent an id for records without one.
    pub fn from_raw(raw: RawCaseRecord, position: usize) -> Self {
        let id = raw
            .id
            .as_ref()
            .and_then(lenient_string)
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("case-{position}"));

        let diagnosis = raw
            .diagnosis
            .as_ref()
            .map(normalize_diagnosis)
            .unwrap_or_default();

        let similarity = raw.similarity.as_ref().and_then(lenient_f64).unwrap_or(0.0);

        let group_rank = raw
            .medical_group
            .as_ref()
            .or(raw.group_rank.as_ref())
            .and_then(lenient_string)
            .filter(|rank| !rank.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_GROUP.to_string());

        let medical_priority = raw
            .medical_priority
            .as_ref()
            .and_then(lenient_f64)
            .map(|p| p as i64)
            .unwrap_or(0);

        let demographics = raw
            .demographics
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| placeholder_demographics(&id));
        let report = raw
            .report
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| placeholder_report(&id));

        let preview_signal = raw.preview_signal.map(|samples| {
            samples
                .iter()
                .map(|value| lenient_f64(value).unwrap_or(0.0))
                .collect()
        });

        Self {
            id,
            diagnosis,
            similarity,
            group_rank,
            clean_name: raw.clean_name.filter(|name| !name.trim().is_empty()),
            medical_priority,
            demographics,
            report,
            is_query_case: raw.is_query_case.unwrap_or(false),
            file_name: raw.file_name.filter(|name| !name.trim().is_empty()),
            preview_signal,
        }
    }

    pub fn from_value(value: Value, position: usize) -> Self {
        let raw = serde_json::from_value(value).unwrap_or_else(|err| {
            tracing::debug!(position, %err, "case record is not an object; using defaults");
            RawCaseRecord::default()
        });
        Self::from_raw(raw, position)
    }

    pub fn primary_diagnosis(&self) -> Option<&str> {
        self.diagnosis.first().map(String::as_str)
    }
}

/// Normalize a whole bundle, keeping at most one query case (the first one seen).
pub fn normalize_bundle(values: Vec<Value>) -> Vec<CaseRecord> {
    let mut seen_query = false;
    values
        .into_iter()
        .enumerate()
        .map(|(position, value)| {
            let mut record = CaseRecord::from_value(value, position);
            if record.is_query_case {
                if seen_query {
                    tracing::warn!(
                        case = %record.id,
                        "bundle has more than one query case; demoting"
                    );
                    record.is_query_case = false;
                }
                seen_query = true;
            }
            record
        })
        .collect()
}

/// Materialize a diagnosis field as plain labels.
///
/// Accepts `"a|b"`, `["a|b"]` and `["a", "b"]` alike; each element is split on `|`, trimmed and
/// emptied segments are dropped. Anything else yields an empty list.
pub fn normalize_diagnosis(value: &Value) -> Vec<String> {
    match value {
        Value::String(text) => split_labels(text),
        Value::Array(items) => items
            .iter()
            .filter_map(lenient_string)
            .flat_map(|item| split_labels(&item))
            .collect(),
        Value::Null => Vec::new(),
        other => {
            tracing::debug!(%other, "unexpected diagnosis encoding");
            Vec::new()
        }
    }
}

fn split_labels(text: &str) -> Vec<String> {
    text.split('|')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

fn placeholder_demographics(id: &str) -> String {
    format!("Unknown, age n/a · {id}")
}

fn placeholder_report(id: &str) -> String {
    format!("No narrative report archived for case {id}.")
}

fn lenient_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn lenient_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn de_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(lenient_string))
}

fn de_lenient_leads<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Vec<Value>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(lead, samples)| {
            let samples = samples
                .iter()
                .map(|value| lenient_f64(value).unwrap_or(0.0))
                .collect();
            (lead, samples)
        })
        .collect())
}

/// Full per-lead recording of one case, loaded lazily.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct CaseDetail {
    #[serde(default, deserialize_with = "de_lenient_leads")]
    pub leads: BTreeMap<String, Vec<f64>>,
    #[serde(default)]
    pub meta: Option<DetailMeta>,
}

impl CaseDetail {
    pub fn lead(&self, lead: LeadName) -> Option<&[f64]> {
        self.leads
            .get(lead.as_str())
            .map(Vec::as_slice)
            .filter(|samples| !samples.is_empty())
    }

    pub fn lead_count(&self) -> usize {
        LeadName::ALL
            .iter()
            .filter(|lead| self.lead(**lead).is_some())
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct DetailMeta {
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub age: Option<String>,
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub time: Option<String>,
}

/// What the patient header shows as the presenting problem.
#[derive(Debug, Clone, PartialEq)]
pub enum Symptom {
    /// Query cases are new input: their diagnosis is withheld from the header.
    AssessmentRequired,
    Label(String),
}

/// Header facts for the monitor subject.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientSummary {
    pub id: String,
    pub gender: String,
    pub age: String,
    pub acquired_at: Option<String>,
    pub symptom: Symptom,
}

impl PatientSummary {
    pub fn from_case(case: &CaseRecord, detail: Option<&CaseDetail>) -> Self {
        let mut gender = "Unknown".to_string();
        let mut age = "??".to_string();
        let mut acquired_at = None;

        match detail.and_then(|d| d.meta.as_ref()) {
            Some(meta) => {
                if let Some(g) = meta.gender.as_ref().filter(|g| !g.is_empty()) {
                    gender = g.clone();
                }
                if let Some(a) = meta.age.as_ref().filter(|a| !a.is_empty()) {
                    age = a.clone();
                }
                acquired_at = meta.time.clone().filter(|t| !t.is_empty());
            }
            None => {
                // "Male, 67yr" / "Unknown, 80 yr"
                let mut parts = case.demographics.split(',').map(str::trim);
                if let Some(g) = parts.next().filter(|g| !g.is_empty()) {
                    gender = g.to_string();
                }
                if let Some(a) = parts.next() {
                    let digits: String = a.chars().take_while(char::is_ascii_digit).collect();
                    if !digits.is_empty() {
                        age = digits;
                    }
                }
            }
        }

        if acquired_at.is_none() {
            acquired_at = timestamp_from_id(&case.id);
        }

        let symptom = if case.is_query_case {
            Symptom::AssessmentRequired
        } else if let Some(name) = case.clean_name.as_ref() {
            Symptom::Label(name.clone())
        } else if let Some(primary) = case.primary_diagnosis() {
            Symptom::Label(primary.to_string())
        } else {
            Symptom::AssessmentRequired
        };

        Self {
            id: case.id.clone(),
            gender,
            age,
            acquired_at,
            symptom,
        }
    }
}

/// Record ids exported from the hospital archive embed the acquisition time as a 14-digit
/// `_YYYYMMDDhhmmss` segment, e.g. `de_115848437_20110314222032_...`. Segments that are not a
/// real calendar time are skipped.
fn timestamp_from_id(id: &str) -> Option<String> {
    use time::macros::format_description;
    use time::PrimitiveDateTime;

    let compact = format_description!("[year][month][day][hour][minute][second]");
    let display = format_description!("[year]-[month]-[day] [hour]:[minute]");

    id.split('_').skip(1).find_map(|segment| {
        let digits = segment.get(..14)?;
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let parsed = PrimitiveDateTime::parse(digits, &compact)
            .map_err(|err| tracing::debug!(segment, %err, "id segment is not a timestamp"))
            .ok()?;
        parsed.format(&display).ok()
    })
}
