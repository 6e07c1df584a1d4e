//! The review session: which patient is active, what was retrieved for them, which group and
//! cases are selected, and which detail blobs are loaded.
//!
//! [`Session`] is a synchronous state machine. Presentation events go in through
//! [`Session::handle`], finished loads through [`Session::complete`]; both return the loads to
//! start next. Every request carries a [`Ticket`] for its slot, and a completion whose ticket is
//! no longer the newest for that slot is dropped, so late answers can never overwrite newer state.

use std::rc::Rc;

use super::aggregate::{aggregate_with, DiagnosisGroup, WavePattern};
use super::config::ConfidenceThresholds;
use super::error::{PipelineError, PipelineResult};
use super::records::{CaseDetail, CaseRecord, ManifestEntry, PatientSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Empty,
    ManifestLoading,
    ManifestReady,
    RetrievalLoading,
    RetrievalReady,
}

/// Independent load channels. Each has its own generation counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Manifest,
    Bundle,
    MonitorDetail,
    InspectedDetail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub slot: Slot,
    pub generation: u64,
}

#[derive(Debug, Clone, Default)]
struct Generations {
    manifest: u64,
    bundle: u64,
    monitor: u64,
    inspected: u64,
}

impl Generations {
    fn counter(&mut self, slot: Slot) -> &mut u64 {
        match slot {
            Slot::Manifest => &mut self.manifest,
            Slot::Bundle => &mut self.bundle,
            Slot::MonitorDetail => &mut self.monitor,
            Slot::InspectedDetail => &mut self.inspected,
        }
    }

    /// Invalidate whatever is in flight for `slot` and hand out the new current ticket.
    fn bump(&mut self, slot: Slot) -> Ticket {
        let counter = self.counter(slot);
        *counter += 1;
        Ticket {
            slot,
            generation: *counter,
        }
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        let current = match ticket.slot {
            Slot::Manifest => self.manifest,
            Slot::Bundle => self.bundle,
            Slot::MonitorDetail => self.monitor,
            Slot::InspectedDetail => self.inspected,
        };
        current == ticket.generation
    }
}

/// User intents coming from the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Start,
    SelectGroup(String),
    SelectCase(CaseRecord),
    /// Step through the manifest; the target index is clamped to its bounds.
    ChangePatient(isize),
    DismissInspection,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadRequest {
    Manifest {
        ticket: Ticket,
    },
    Bundle {
        ticket: Ticket,
        patient_index: usize,
        entry: ManifestEntry,
    },
    Detail {
        ticket: Ticket,
        case_id: String,
        file_name: String,
    },
}

impl LoadRequest {
    pub fn ticket(&self) -> Ticket {
        match self {
            LoadRequest::Manifest { ticket }
            | LoadRequest::Bundle { ticket, .. }
            | LoadRequest::Detail { ticket, .. } => *ticket,
        }
    }
}

#[derive(Debug)]
pub enum LoadOutcome {
    Manifest {
        ticket: Ticket,
        result: PipelineResult<Vec<ManifestEntry>>,
    },
    Bundle {
        ticket: Ticket,
        patient_index: usize,
        result: PipelineResult<Vec<CaseRecord>>,
    },
    Detail {
        ticket: Ticket,
        case_id: String,
        result: PipelineResult<CaseDetail>,
    },
}

impl LoadOutcome {
    pub fn ticket(&self) -> Ticket {
        match self {
            LoadOutcome::Manifest { ticket, .. }
            | LoadOutcome::Bundle { ticket, .. }
            | LoadOutcome::Detail { ticket, .. } => *ticket,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailState {
    #[default]
    Idle,
    Loading {
        case_id: String,
    },
    Ready {
        case_id: String,
        detail: Rc<CaseDetail>,
    },
}

impl DetailState {
    pub fn detail(&self) -> Option<&CaseDetail> {
        match self {
            DetailState::Ready { detail, .. } => Some(detail),
            _ => None,
        }
    }

    /// Shared handle for views that keep the detail past this snapshot.
    pub fn shared(&self) -> Option<Rc<CaseDetail>> {
        match self {
            DetailState::Ready { detail, .. } => Some(Rc::clone(detail)),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DetailState::Loading { .. })
    }
}

/// A non-fatal problem worth telling the reviewer about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    ManifestUnavailable,
    EmptyManifest,
    BundleUnavailable { patient: String },
    DetailUnavailable { case_id: String },
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    state: SessionState,
    manifest: Vec<ManifestEntry>,
    active_patient_index: usize,
    loaded_patient: Option<usize>,
    cases: Vec<CaseRecord>,
    groups: Vec<DiagnosisGroup>,
    active_group: Option<String>,
    monitor_subject: Option<CaseRecord>,
    monitor_detail: DetailState,
    inspected_case: Option<CaseRecord>,
    inspected_detail: DetailState,
    notice: Option<Notice>,
    generations: Generations,
    thresholds: ConfidenceThresholds,
}

impl Session {
    pub fn new(thresholds: ConfidenceThresholds) -> Self {
        Self {
            thresholds,
            ..Self::default()
        }
    }

    pub fn handle(&mut self, event: SessionEvent) -> Vec<LoadRequest> {
        match event {
            SessionEvent::Start => {
                self.state = SessionState::ManifestLoading;
                self.notice = None;
                let ticket = self.generations.bump(Slot::Manifest);
                vec![LoadRequest::Manifest { ticket }]
            }
            SessionEvent::ChangePatient(delta) => self.change_patient(delta),
            SessionEvent::SelectGroup(rank) => {
                if self.groups.iter().any(|group| group.rank == rank) {
                    self.active_group = Some(rank);
                } else {
                    tracing::debug!(rank = %rank, "ignoring selection of unknown group");
                }
                Vec::new()
            }
            SessionEvent::SelectCase(case) => {
                let request = self.request_detail(Slot::InspectedDetail, &case);
                self.inspected_case = Some(case);
                request.into_iter().collect()
            }
            SessionEvent::DismissInspection => {
                self.inspected_case = None;
                self.inspected_detail = DetailState::Idle;
                self.generations.bump(Slot::InspectedDetail);
                Vec::new()
            }
        }
    }

    pub fn complete(&mut self, outcome: LoadOutcome) -> Vec<LoadRequest> {
        let ticket = outcome.ticket();
        if !self.generations.is_current(ticket) {
            tracing::debug!(
                slot = ?ticket.slot,
                generation = ticket.generation,
                "dropping stale load"
            );
            return Vec::new();
        }

        match outcome {
            LoadOutcome::Manifest { result, .. } => self.manifest_loaded(result),
            LoadOutcome::Bundle {
                patient_index,
                result,
                ..
            } => self.bundle_loaded(patient_index, result),
            LoadOutcome::Detail {
                ticket,
                case_id,
                result,
            } => {
                self.detail_loaded(ticket.slot, case_id, result);
                Vec::new()
            }
        }
    }

    fn change_patient(&mut self, delta: isize) -> Vec<LoadRequest> {
        if self.manifest.is_empty() {
            return Vec::new();
        }
        let last = self.manifest.len() - 1;
        let target = self
            .active_patient_index
            .saturating_add_signed(delta)
            .min(last);
        self.active_patient_index = target;

        if self.loaded_patient == Some(target) {
            // Back on the patient already on screen: whatever bundle is in flight is now unwanted.
            self.generations.bump(Slot::Bundle);
            self.state = SessionState::RetrievalReady;
            return Vec::new();
        }
        vec![self.request_bundle(target)]
    }

    fn request_bundle(&mut self, patient_index: usize) -> LoadRequest {
        self.state = SessionState::RetrievalLoading;
        let ticket = self.generations.bump(Slot::Bundle);
        LoadRequest::Bundle {
            ticket,
            patient_index,
            entry: self.manifest[patient_index].clone(),
        }
    }

    fn request_detail(&mut self, slot: Slot, case: &CaseRecord) -> Option<LoadRequest> {
        let ticket = self.generations.bump(slot);
        let file_name = case.file_name.clone();
        let state = match file_name {
            Some(_) => DetailState::Loading {
                case_id: case.id.clone(),
            },
            None => DetailState::Idle,
        };
        *self.detail_slot(slot) = state;
        file_name.map(|file_name| LoadRequest::Detail {
            ticket,
            case_id: case.id.clone(),
            file_name,
        })
    }

    fn detail_slot(&mut self, slot: Slot) -> &mut DetailState {
        match slot {
            Slot::InspectedDetail => &mut self.inspected_detail,
            _ => &mut self.monitor_detail,
        }
    }

    fn manifest_loaded(&mut self, result: PipelineResult<Vec<ManifestEntry>>) -> Vec<LoadRequest> {
        match result {
            Ok(entries) if !entries.is_empty() => {
                self.manifest = entries;
                self.active_patient_index = 0;
                self.loaded_patient = None;
                self.state = SessionState::ManifestReady;
                vec![self.request_bundle(0)]
            }
            Ok(_) => {
                tracing::warn!("patient manifest is empty");
                self.state = SessionState::Empty;
                self.notice = Some(Notice::EmptyManifest);
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(%err, "patient manifest unavailable");
                self.state = SessionState::Empty;
                self.notice = Some(Notice::ManifestUnavailable);
                Vec::new()
            }
        }
    }

    fn bundle_loaded(
        &mut self,
        patient_index: usize,
        result: PipelineResult<Vec<CaseRecord>>,
    ) -> Vec<LoadRequest> {
        let cases = match result {
            Ok(cases) => cases,
            Err(err) => {
                let patient = self
                    .manifest
                    .get(patient_index)
                    .map(|entry| entry.id.clone())
                    .unwrap_or_default();
                tracing::warn!(
                    patient = %patient,
                    %err,
                    "retrieval bundle unavailable; keeping previous cases"
                );
                self.notice = Some(Notice::BundleUnavailable { patient });
                match self.loaded_patient {
                    Some(loaded) => {
                        self.active_patient_index = loaded;
                        self.state = SessionState::RetrievalReady;
                    }
                    None => self.state = SessionState::ManifestReady,
                }
                return Vec::new();
            }
        };

        let retrieved: Vec<CaseRecord> = cases
            .iter()
            .filter(|c| !c.is_query_case)
            .cloned()
            .collect();
        self.groups = aggregate_with(&retrieved, &self.thresholds);
        self.active_group = self.groups.first().map(|group| group.rank.clone());
        self.monitor_subject = cases
            .iter()
            .find(|c| c.is_query_case)
            .or_else(|| retrieved.first())
            .cloned();
        self.cases = cases;
        self.loaded_patient = Some(patient_index);
        self.active_patient_index = patient_index;
        self.state = SessionState::RetrievalReady;
        self.notice = None;

        self.inspected_case = None;
        self.inspected_detail = DetailState::Idle;
        self.generations.bump(Slot::InspectedDetail);

        match self.monitor_subject.clone() {
            Some(subject) => self
                .request_detail(Slot::MonitorDetail, &subject)
                .into_iter()
                .collect(),
            None => {
                self.generations.bump(Slot::MonitorDetail);
                self.monitor_detail = DetailState::Idle;
                Vec::new()
            }
        }
    }

    fn detail_loaded(&mut self, slot: Slot, case_id: String, result: PipelineResult<CaseDetail>) {
        let next = match result {
            Ok(detail) => DetailState::Ready {
                case_id,
                detail: Rc::new(detail),
            },
            Err(err) => {
                match &err {
                    PipelineError::MissingResource(_) => {
                        tracing::warn!(
                            case = %case_id,
                            %err,
                            "no detail recording; using synthetic leads"
                        );
                    }
                    _ => {
                        tracing::warn!(case = %case_id, %err, "case detail failed to load");
                        self.notice = Some(Notice::DetailUnavailable {
                            case_id: case_id.clone(),
                        });
                    }
                }
                DetailState::Idle
            }
        };
        *self.detail_slot(slot) = next;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn manifest(&self) -> &[ManifestEntry] {
        &self.manifest
    }

    pub fn active_patient_index(&self) -> usize {
        self.active_patient_index
    }

    pub fn active_patient(&self) -> Option<&ManifestEntry> {
        self.manifest.get(self.active_patient_index)
    }

    /// `(index + 1, total)` for the header, once a manifest is loaded.
    pub fn patient_position(&self) -> Option<(usize, usize)> {
        (!self.manifest.is_empty()).then(|| (self.active_patient_index + 1, self.manifest.len()))
    }

    pub fn can_go_previous(&self) -> bool {
        !self.manifest.is_empty() && self.active_patient_index > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.active_patient_index + 1 < self.manifest.len()
    }

    pub fn cases(&self) -> &[CaseRecord] {
        &self.cases
    }

    pub fn groups(&self) -> &[DiagnosisGroup] {
        &self.groups
    }

    pub fn active_group(&self) -> Option<&DiagnosisGroup> {
        let rank = self.active_group.as_deref()?;
        self.groups.iter().find(|group| group.rank == rank)
    }

    /// Retrieved cases in the active group, in bundle order. Never contains the query case.
    pub fn filtered_cases(&self) -> Vec<&CaseRecord> {
        let Some(rank) = self.active_group.as_deref() else {
            return Vec::new();
        };
        self.cases
            .iter()
            .filter(|case| !case.is_query_case && case.group_rank == rank)
            .collect()
    }

    pub fn active_pattern(&self) -> WavePattern {
        self.active_group()
            .map(|group| group.pattern)
            .unwrap_or_default()
    }

    pub fn pattern_for(&self, rank: &str) -> WavePattern {
        self.groups
            .iter()
            .find(|group| group.rank == rank)
            .map(|group| group.pattern)
            .unwrap_or_default()
    }

    pub fn monitor_subject(&self) -> Option<&CaseRecord> {
        self.monitor_subject.as_ref()
    }

    pub fn monitor_detail(&self) -> &DetailState {
        &self.monitor_detail
    }

    pub fn monitor_summary(&self) -> Option<PatientSummary> {
        self.monitor_subject
            .as_ref()
            .map(|case| PatientSummary::from_case(case, self.monitor_detail.detail()))
    }

    pub fn inspected_case(&self) -> Option<&CaseRecord> {
        self.inspected_case.as_ref()
    }

    pub fn inspected_detail(&self) -> &DetailState {
        &self.inspected_detail
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ResourcePatterns;
    use crate::core::pipeline::CasePipeline;
    use crate::core::resolver::MemoryResolver;
    use futures::executor::block_on;
    use serde_json::json;

    fn database() -> MemoryResolver {
        MemoryResolver::new()
            .with(
                "manifest.json",
                json!([
                    { "id": "PT-001", "retrievalFile": "retrieval/PT-001.json" },
                    { "id": "PT-002", "retrievalFile": "retrieval/PT-002.json" },
                    { "id": "PT-003", "retrievalFile": "retrieval/PT-003.json" }
                ])
                .to_string(),
            )
            .with(
                "retrieval/PT-001.json",
                json!([
                    { "id": "PT-001", "isQueryCase": true, "fileName": "PT-001.json", "medicalGroup": "anterior_infarct" },
                    { "id": "A", "similarity": 0.95, "medicalGroup": "anterior_infarct", "fileName": "A.json" },
                    { "id": "B", "similarity": 0.93, "medicalGroup": "anterior_infarct" },
                    { "id": "C", "similarity": 0.80, "medicalGroup": "atrial_flutter", "fileName": "gone.json" }
                ])
                .to_string(),
            )
            .with(
                "retrieval/PT-002.json",
                json!([
                    { "id": "D", "similarity": 0.70, "medicalGroup": "pericarditis", "fileName": "D.json" }
                ])
                .to_string(),
            )
            .with(
                "details/PT-001.json",
                json!({ "leads": { "I": [0.1, 0.2] }, "meta": { "age": 67 } }).to_string(),
            )
            .with("details/A.json", json!({ "leads": { "V1": [0.3] } }).to_string())
            .with("details/D.json", json!({ "leads": {} }).to_string())
    }

    fn pipeline() -> CasePipeline {
        CasePipeline::new(Rc::new(database()), ResourcePatterns::default())
    }

    /// Run every request to completion, in issue order, until nothing is pending.
    fn settle(session: &mut Session, pipeline: &CasePipeline, mut pending: Vec<LoadRequest>) {
        while !pending.is_empty() {
            let request = pending.remove(0);
            let outcome = block_on(pipeline.execute(request));
            pending.extend(session.complete(outcome));
        }
    }

    fn started() -> (Session, CasePipeline) {
        let pipeline = pipeline();
        let mut session = Session::default();
        let requests = session.handle(SessionEvent::Start);
        settle(&mut session, &pipeline, requests);
        (session, pipeline)
    }

    #[test]
    fn start_loads_first_patient_and_monitor_detail() {
        let (session, _) = started();
        assert_eq!(session.state(), SessionState::RetrievalReady);
        assert_eq!(session.patient_position(), Some((1, 3)));
        assert_eq!(session.groups().len(), 2);
        assert_eq!(session.active_group().unwrap().rank, "anterior_infarct");
        assert_eq!(session.active_pattern(), WavePattern::Stemi);
        assert_eq!(session.groups()[0].support_count, 2);

        let filtered: Vec<_> = session.filtered_cases().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(filtered, vec!["A", "B"]);

        assert_eq!(session.monitor_subject().unwrap().id, "PT-001");
        assert!(session.monitor_detail().detail().is_some());
        assert_eq!(session.monitor_summary().unwrap().age, "67");
        assert!(session.inspected_case().is_none());
    }

    #[test]
    fn select_group_switches_filter_and_ignores_unknown() {
        let (mut session, _) = started();
        assert!(session.handle(SessionEvent::SelectGroup("atrial_flutter".into())).is_empty());
        let filtered: Vec<_> = session.filtered_cases().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(filtered, vec!["C"]);

        session.handle(SessionEvent::SelectGroup("nope".into()));
        assert_eq!(session.active_group().unwrap().rank, "atrial_flutter");
    }

    #[test]
    fn inspected_case_is_independent_of_monitor() {
        let (mut session, pipeline) = started();
        let case = session.filtered_cases()[0].clone();
        let requests = session.handle(SessionEvent::SelectCase(case));
        assert!(session.inspected_detail().is_loading());
        settle(&mut session, &pipeline, requests);

        assert_eq!(session.inspected_case().unwrap().id, "A");
        assert_eq!(session.inspected_detail().detail().unwrap().lead_count(), 1);
        assert_eq!(session.monitor_subject().unwrap().id, "PT-001");

        session.handle(SessionEvent::DismissInspection);
        assert!(session.inspected_case().is_none());
        assert_eq!(session.monitor_subject().unwrap().id, "PT-001");
        assert!(session.monitor_detail().detail().is_some());
    }

    #[test]
    fn dismiss_discards_in_flight_inspection() {
        let (mut session, pipeline) = started();
        let case = session.filtered_cases()[0].clone();
        let requests = session.handle(SessionEvent::SelectCase(case));
        session.handle(SessionEvent::DismissInspection);

        for request in requests {
            let outcome = block_on(pipeline.execute(request));
            assert!(session.complete(outcome).is_empty());
        }
        assert!(session.inspected_case().is_none());
        assert_eq!(session.inspected_detail(), &DetailState::Idle);
    }

    #[test]
    fn missing_detail_falls_back_to_idle() {
        let (mut session, pipeline) = started();
        session.handle(SessionEvent::SelectGroup("atrial_flutter".into()));
        let case = session.filtered_cases()[0].clone();
        let requests = session.handle(SessionEvent::SelectCase(case));
        settle(&mut session, &pipeline, requests);
        assert_eq!(session.inspected_case().unwrap().id, "C");
        assert_eq!(session.inspected_detail(), &DetailState::Idle);
        assert!(session.notice().is_none());
    }

    #[test]
    fn case_without_file_name_never_loads() {
        let (mut session, _) = started();
        let case = session.filtered_cases()[1].clone();
        assert_eq!(case.id, "B");
        assert!(session.handle(SessionEvent::SelectCase(case)).is_empty());
        assert_eq!(session.inspected_detail(), &DetailState::Idle);
    }

    #[test]
    fn out_of_order_bundles_keep_latest_patient() {
        let (mut session, pipeline) = started();
        let to_second = session.handle(SessionEvent::ChangePatient(1));
        let to_first = session.handle(SessionEvent::ChangePatient(-1));
        assert!(to_first.is_empty());
        assert_eq!(session.active_patient_index(), 0);

        // The bundle for patient 2 arrives after the user already went back.
        for request in to_second {
            let outcome = block_on(pipeline.execute(request));
            assert!(session.complete(outcome).is_empty());
        }
        assert_eq!(session.monitor_subject().unwrap().id, "PT-001");
        assert_eq!(session.state(), SessionState::RetrievalReady);
    }

    #[test]
    fn only_the_newest_of_two_bundle_requests_applies() {
        let (mut session, pipeline) = started();
        let first = session.handle(SessionEvent::ChangePatient(1));
        let second = session.handle(SessionEvent::ChangePatient(1));
        assert_eq!(session.active_patient_index(), 2);

        // The later request (patient 3, which has no bundle) resolves first and fails.
        settle(&mut session, &pipeline, second);
        settle(&mut session, &pipeline, first);
        assert_eq!(session.monitor_subject().unwrap().id, "PT-001");
        assert_eq!(session.active_patient_index(), 0);
    }

    #[test]
    fn patient_change_resets_selection_and_clamps() {
        let (mut session, pipeline) = started();
        session.handle(SessionEvent::SelectGroup("atrial_flutter".into()));
        let case = session.filtered_cases()[0].clone();
        session.handle(SessionEvent::SelectCase(case));

        let requests = session.handle(SessionEvent::ChangePatient(1));
        settle(&mut session, &pipeline, requests);
        assert_eq!(session.patient_position(), Some((2, 3)));
        assert_eq!(session.active_group().unwrap().rank, "pericarditis");
        assert!(session.inspected_case().is_none());
        // No query case in this bundle: the top retrieval result is monitored instead.
        assert_eq!(session.monitor_subject().unwrap().id, "D");

        assert!(session.handle(SessionEvent::ChangePatient(-10)).len() == 1);
        assert_eq!(session.active_patient_index(), 0);
    }

    #[test]
    fn failed_bundle_keeps_previous_and_allows_retry() {
        let (mut session, pipeline) = started();
        let requests = session.handle(SessionEvent::ChangePatient(2));
        settle(&mut session, &pipeline, requests);

        assert_eq!(
            session.notice(),
            Some(&Notice::BundleUnavailable {
                patient: "PT-003".into()
            })
        );
        assert_eq!(session.monitor_subject().unwrap().id, "PT-001");
        assert_eq!(session.groups().len(), 2);
        assert_eq!(session.active_patient_index(), 0);
        assert!(session.can_go_next());

        // Asking for the same patient again issues a fresh load.
        assert_eq!(session.handle(SessionEvent::ChangePatient(2)).len(), 1);
    }

    #[test]
    fn manifest_failures_leave_session_empty() {
        let pipeline =
            CasePipeline::new(Rc::new(MemoryResolver::new()), ResourcePatterns::default());
        let mut session = Session::default();
        let requests = session.handle(SessionEvent::Start);
        settle(&mut session, &pipeline, requests);
        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(session.notice(), Some(&Notice::ManifestUnavailable));
        assert!(session.handle(SessionEvent::ChangePatient(1)).is_empty());

        let empty = CasePipeline::new(
            Rc::new(MemoryResolver::new().with("manifest.json", b"[]".to_vec())),
            ResourcePatterns::default(),
        );
        let requests = session.handle(SessionEvent::Start);
        settle(&mut session, &empty, requests);
        assert_eq!(session.notice(), Some(&Notice::EmptyManifest));
        assert_eq!(session.patient_position(), None);
    }

    #[test]
    fn renamed_bundle_is_found_by_patient_id() {
        let database = MemoryResolver::new()
            .with(
                "manifest.json",
                json!([
                    { "id": "PT-001", "retrievalFile": "retrieval/PT-001.json" },
                    { "id": "PT-002", "retrievalFile": "retrieval/PT-002.json" }
                ])
                .to_string(),
            )
            .with(
                "retrieval/PT-001.json",
                json!([{ "id": "A", "similarity": 0.9, "medicalGroup": "anterior_infarct" }])
                    .to_string(),
            )
            .with(
                "retrieval/archive_PT-002_v2.json",
                json!([
                    { "id": "PT-002", "isQueryCase": true, "medicalGroup": "pericarditis" },
                    { "id": "E", "similarity": 0.88, "medicalGroup": "pericarditis" },
                    { "id": "F", "similarity": 0.61, "medicalGroup": "atrial_flutter" }
                ])
                .to_string(),
            );
        let pipeline = CasePipeline::new(Rc::new(database), ResourcePatterns::default());
        let mut session = Session::default();
        let requests = session.handle(SessionEvent::Start);
        settle(&mut session, &pipeline, requests);
        assert_eq!(session.patient_position(), Some((1, 2)));

        let requests = session.handle(SessionEvent::ChangePatient(1));
        settle(&mut session, &pipeline, requests);

        assert_eq!(session.state(), SessionState::RetrievalReady);
        assert_eq!(session.active_patient_index(), 1);
        assert_eq!(session.notice(), None);
        assert_eq!(session.monitor_subject().unwrap().id, "PT-002");
        let ids: Vec<&str> = session.cases().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["PT-002", "E", "F"]);
        let ranks: Vec<&str> = session.groups().iter().map(|g| g.rank.as_str()).collect();
        assert_eq!(ranks, vec!["pericarditis", "atrial_flutter"]);
    }

    #[test]
    fn navigation_bounds() {
        let (session, _) = started();
        assert!(!session.can_go_previous());
        assert!(session.can_go_next());
        assert!(!Session::default().can_go_next());
    }
}
