//! Reference table of typical ECG features per diagnostic label.

pub struct KnowledgeEntry {
    pub label: &'static str,
    pub features: &'static [&'static str],
}

const ANTERIOR_MI: &[&str] = &[
    "ST elevation in V1-V4",
    "Loss of R-wave progression",
    "Reciprocal depression in II, III, aVF",
];
const STEMI: &[&str] = &[
    "J-point elevation > 2mm",
    "Hyperacute T waves",
    "Q waves (late stage)",
];
const SINUS_TACHYCARDIA: &[&str] = &[
    "Rate > 100 bpm",
    "Normal P wave morphology",
    "Regular rhythm",
];
const LAD_OCCLUSION: &[&str] = &[
    "ST elevation in precordial leads",
    "Wide QRS complex potential",
    "De Winter T-waves",
];
const ATRIAL_FLUTTER: &[&str] = &["Sawtooth F-waves", "Rate ~300 bpm", "2:1 or 4:1 AV block"];
const PERICARDITIS: &[&str] = &["Diffuse ST elevation", "PR depression", "Spodick's sign"];
const BRUGADA_TYPE_1: &[&str] = &[
    "Coved ST elevation >2mm V1-V3",
    "Inverted T waves",
    "RBBB morphology",
];

static ENTRIES: &[KnowledgeEntry] = &[
    KnowledgeEntry { label: "Acute Anterior MI", features: ANTERIOR_MI },
    KnowledgeEntry { label: "Anterior Infarct", features: ANTERIOR_MI },
    KnowledgeEntry { label: "STEMI", features: STEMI },
    KnowledgeEntry { label: "Acute MI / STEMI", features: STEMI },
    KnowledgeEntry { label: "Sinus Tachycardia", features: SINUS_TACHYCARDIA },
    KnowledgeEntry { label: "LAD Occlusion", features: LAD_OCCLUSION },
    KnowledgeEntry { label: "Atrial Flutter", features: ATRIAL_FLUTTER },
    KnowledgeEntry { label: "Pericarditis", features: PERICARDITIS },
    KnowledgeEntry { label: "Acute Pericarditis", features: PERICARDITIS },
    KnowledgeEntry { label: "Brugada Type 1", features: BRUGADA_TYPE_1 },
];

pub fn entries() -> &'static [KnowledgeEntry] {
    ENTRIES
}

/// Features for a diagnosis label: exact label first, then a case-insensitive match.
pub fn features_for(label: &str) -> Option<&'static [&'static str]> {
    let label = label.trim();
    ENTRIES
        .iter()
        .find(|entry| entry.label == label)
        .or_else(|| ENTRIES.iter().find(|entry| entry.label.eq_ignore_ascii_case(label)))
        .map(|entry| entry.features)
}
