//! Diagnosis-group aggregation over retrieved cases.
//!
//! Cases are bucketed by `group_rank`; each bucket becomes a [`DiagnosisGroup`] carrying the mean
//! similarity (scaled to 0–100), a confidence tier and a waveform hint. Query cases must be
//! filtered out by the caller: the group list reflects retrieved evidence only.

use std::collections::HashMap;

use serde::Serialize;

use super::config::ConfidenceThresholds;
use super::records::CaseRecord;

/// Groups scoring above this are flagged as verified.
const VERIFIED_SCORE: f64 = 85.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
    VeryLow,
}

impl Confidence {
    pub fn from_score(score: f64, thresholds: &ConfidenceThresholds) -> Self {
        if score > thresholds.high {
            Confidence::High
        } else if score > thresholds.medium {
            Confidence::Medium
        } else if thresholds.very_low.is_some_and(|floor| score <= floor) {
            Confidence::VeryLow
        } else {
            Confidence::Low
        }
    }

    /// Suggested CSS modifier, e.g. `confidence-badge--high`.
    pub fn css_class(self) -> &'static str {
        match self {
            Confidence::High => "confidence-badge--high",
            Confidence::Medium => "confidence-badge--medium",
            Confidence::Low => "confidence-badge--low",
            Confidence::VeryLow => "confidence-badge--very-low",
        }
    }
}

/// Which synthetic waveform stands in for a group when no recording is loaded. Display hint only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WavePattern {
    Stemi,
    Flutter,
    #[default]
    Normal,
}

impl WavePattern {
    pub fn from_group_name(name: &str) -> Self {
        let lowered = name.to_lowercase();
        let mut pattern = WavePattern::Normal;
        if lowered.contains("infarct") {
            pattern = WavePattern::Stemi;
        }
        if lowered.contains("flutter") {
            pattern = WavePattern::Flutter;
        }
        pattern
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisGroup {
    pub rank: String,
    pub name: String,
    pub score: f64,
    pub support_count: usize,
    pub confidence: Confidence,
    pub pattern: WavePattern,
    pub verified: bool,
    pub priority: i64,
}

pub fn aggregate(cases: &[CaseRecord]) -> Vec<DiagnosisGroup> {
    aggregate_with(cases, &ConfidenceThresholds::default())
}

pub fn aggregate_with(
    cases: &[CaseRecord],
    thresholds: &ConfidenceThresholds,
) -> Vec<DiagnosisGroup> {
    let mut buckets: Vec<Bucket> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for case in cases {
        let slot = *index.entry(case.group_rank.as_str()).or_insert_with(|| {
            buckets.push(Bucket::open(case));
            buckets.len() - 1
        });
        let bucket = &mut buckets[slot];
        bucket.count += 1;
        bucket.total_similarity += case.similarity;
    }

    let mut groups: Vec<DiagnosisGroup> = buckets
        .into_iter()
        .map(|bucket| bucket.finish(thresholds))
        .collect();

    // `sort_by` is stable, so equal scores keep first-seen order.
    groups.sort_by(|a, b| b.score.total_cmp(&a.score));
    groups
}

struct Bucket {
    rank: String,
    name: String,
    priority: i64,
    count: usize,
    total_similarity: f64,
}

impl Bucket {
    fn open(first: &CaseRecord) -> Self {
        let name = match first.clean_name.as_deref() {
            Some(clean) => title_case(clean.split(' ')),
            None => title_case(first.group_rank.split('_')),
        };
        Self {
            rank: first.group_rank.clone(),
            name,
            priority: first.medical_priority,
            count: 0,
            total_similarity: 0.0,
        }
    }

    fn finish(self, thresholds: &ConfidenceThresholds) -> DiagnosisGroup {
        let score = if self.count > 0 {
            (self.total_similarity / self.count as f64) * 100.0
        } else {
            0.0
        };
        let pattern = WavePattern::from_group_name(&self.name);
        DiagnosisGroup {
            confidence: Confidence::from_score(score, thresholds),
            pattern,
            verified: score > VERIFIED_SCORE,
            rank: self.rank,
            name: self.name,
            score,
            support_count: self.count,
            priority: self.priority,
        }
    }
}

fn title_case<'a>(words: impl Iterator<Item = &'a str>) -> String {
    words
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
