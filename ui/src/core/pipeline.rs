//! Loading and decoding of the three resource families: the patient manifest, per-patient
//! retrieval bundles and per-case detail blobs.
//!
//! The pipeline is stateless apart from its resolver and key patterns. Sequencing, staleness and
//! failure recovery belong to [`super::session::Session`].

use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::Value;

use super::config::ResourcePatterns;
use super::error::{PipelineError, PipelineResult};
use super::records::{normalize_bundle, CaseDetail, CaseRecord, ManifestEntry};
use super::resolver::{Loader, Resolver};
use super::session::{LoadOutcome, LoadRequest};

pub struct CasePipeline {
    resolver: Rc<dyn Resolver>,
    patterns: ResourcePatterns,
}

impl CasePipeline {
    pub fn new(resolver: Rc<dyn Resolver>, patterns: ResourcePatterns) -> Self {
        Self { resolver, patterns }
    }

    pub fn patterns(&self) -> &ResourcePatterns {
        &self.patterns
    }

    /// Run one load request to completion, carrying its ticket through to the outcome.
    pub async fn execute(&self, request: LoadRequest) -> LoadOutcome {
        match request {
            LoadRequest::Manifest { ticket } => LoadOutcome::Manifest {
                ticket,
                result: self.load_manifest().await,
            },
            LoadRequest::Bundle {
                ticket,
                patient_index,
                entry,
            } => LoadOutcome::Bundle {
                ticket,
                patient_index,
                result: self.load_bundle(&entry).await,
            },
            LoadRequest::Detail {
                ticket,
                case_id,
                file_name,
            } => LoadOutcome::Detail {
                ticket,
                case_id,
                result: self.load_detail(&file_name).await,
            },
        }
    }

    pub async fn load_manifest(&self) -> PipelineResult<Vec<ManifestEntry>> {
        let pattern = &self.patterns.manifest;
        let (key, loader) = self
            .resolver
            .resolve(pattern)
            .into_iter()
            .next()
            .ok_or_else(|| PipelineError::MissingResource(pattern.clone()))?;
        let bytes = loader().await?;
        let entries: Vec<ManifestEntry> = decode(&key, &bytes)?;
        tracing::info!(key = %key, patients = entries.len(), "manifest loaded");
        Ok(entries)
    }

    pub async fn load_bundle(&self, entry: &ManifestEntry) -> PipelineResult<Vec<CaseRecord>> {
        let candidates = self.resolver.resolve(&self.patterns.retrieval);
        let (key, loader) = find_bundle(&candidates, entry).ok_or_else(|| {
            PipelineError::MissingResource(format!("retrieval bundle for {}", entry.id))
        })?;
        let bytes = loader().await?;
        let values: Vec<Value> = decode(key, &bytes)?;
        let cases = normalize_bundle(values);
        tracing::info!(
            patient = %entry.id,
            key = %key,
            cases = cases.len(),
            "retrieval bundle loaded"
        );
        Ok(cases)
    }

    pub async fn load_detail(&self, file_name: &str) -> PipelineResult<CaseDetail> {
        let candidates = self.resolver.resolve(&self.patterns.details);
        let (key, loader) = find_detail(&candidates, file_name)
            .ok_or_else(|| PipelineError::MissingResource(file_name.to_string()))?;
        let bytes = loader().await?;
        let detail: CaseDetail = decode(key, &bytes)?;
        tracing::debug!(key = %key, leads = detail.lead_count(), "case detail loaded");
        Ok(detail)
    }
}

/// Exact key first (ignoring a leading `./` or `/`), then the first key, in sorted order, that
/// contains the patient id.
fn find_bundle<'a>(
    candidates: &'a BTreeMap<String, Loader>,
    entry: &ManifestEntry,
) -> Option<(&'a String, &'a Loader)> {
    let expected = entry.retrieval_file.trim_start_matches("./").trim_start_matches('/');
    if let Some(found) = candidates.get_key_value(expected) {
        return Some(found);
    }
    if entry.id.is_empty() {
        return None;
    }
    let fallback = candidates.iter().find(|(key, _)| key.contains(&entry.id));
    if let Some((key, _)) = fallback {
        tracing::debug!(patient = %entry.id, expected, key = %key, "bundle resolved by id match");
    }
    fallback
}

/// Suffix match on the record's file name, preferring a whole path segment.
fn find_detail<'a>(
    candidates: &'a BTreeMap<String, Loader>,
    file_name: &str,
) -> Option<(&'a String, &'a Loader)> {
    let name = file_name.trim_start_matches("./");
    if name.is_empty() {
        return None;
    }
    let segment = format!("/{name}");
    candidates
        .iter()
        .find(|(key, _)| key.as_str() == name || key.ends_with(&segment))
        .or_else(|| candidates.iter().find(|(key, _)| key.ends_with(name)))
}

fn decode<T: serde::de::DeserializeOwned>(key: &str, bytes: &[u8]) -> PipelineResult<T> {
    serde_json::from_slice(bytes).map_err(|source| PipelineError::Decode {
        key: key.to_string(),
        source,
    })
}
