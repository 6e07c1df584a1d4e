//! Lead-sheet and group-summary export for the monitor panel.
//!
//! Desktop writes files under the platform data directory (`.../exports`) and rasterizes the lead
//! sheet to PNG; the browser gets an SVG download. Helpers return `Result<String, String>` so the
//! panel can show the message directly.

use dioxus::prelude::*;
use serde::Serialize;

use crate::core::aggregate::{DiagnosisGroup, WavePattern};
use crate::core::config::RenderConfig;
use crate::core::records::{CaseDetail, CaseRecord, LeadName};
use crate::core::session::Session;
use crate::core::waveform::lead_trace;
use crate::t;

/// Width of one lead row in the exported sheet, in SVG user units.
const SHEET_WIDTH: f64 = 1000.0;
const SHEET_MARGIN: f64 = 40.0;
const SHEET_TITLE_HEIGHT: f64 = 60.0;

#[derive(Clone, Debug, PartialEq)]
enum ExportStatus {
    Idle,
    Working(String),
    Done(String),
    Error(String),
}

#[component]
pub fn ExportPanel(session: Signal<Session>, render: RenderConfig) -> Element {
    let status = use_signal(|| ExportStatus::Idle);
    let busy = use_signal(|| false);
    let has_subject = session.read().monitor_subject().is_some();

    let feedback = match status() {
        ExportStatus::Idle => None,
        ExportStatus::Working(label) => {
            Some(("export-panel__status".to_string(), format!("{label}…")))
        }
        ExportStatus::Done(message) => Some((
            "export-panel__status export-panel__status--success".to_string(),
            format!("✅ {message}"),
        )),
        ExportStatus::Error(err) => Some((
            "export-panel__status export-panel__status--error".to_string(),
            format!("⚠️ {err}"),
        )),
    };

    let sheet_handler = {
        let mut status_signal = status;
        let mut busy_signal = busy;
        move |_| {
            if busy_signal() {
                return;
            }
            let snapshot = session.read();
            let Some(subject) = snapshot.monitor_subject().cloned() else {
                return;
            };
            let sheet = lead_sheet_svg(
                &subject,
                snapshot.monitor_detail().detail(),
                snapshot.active_pattern(),
                &render,
            );
            drop(snapshot);

            busy_signal.set(true);
            status_signal.set(ExportStatus::Working(t!("export-working-sheet")));
            spawn(async move {
                match perform_sheet_export(&subject.id, sheet).await {
                    Ok(message) => status_signal.set(ExportStatus::Done(message)),
                    Err(err) => {
                        tracing::warn!(%err, "lead sheet export failed");
                        status_signal.set(ExportStatus::Error(err));
                    }
                }
                busy_signal.set(false);
            });
        }
    };

    let summary_handler = {
        let mut status_signal = status;
        let mut busy_signal = busy;
        move |_| {
            if busy_signal() {
                return;
            }
            let snapshot = session.read();
            let payload = group_summary_json(
                snapshot.active_patient().map(|entry| entry.id.as_str()),
                snapshot.groups(),
            );
            drop(snapshot);

            busy_signal.set(true);
            status_signal.set(ExportStatus::Working(t!("export-working-summary")));
            spawn(async move {
                let outcome = match payload {
                    Ok(json) => copy_to_clipboard(json).await.map(|_| t!("export-summary-copied")),
                    Err(err) => Err(err),
                };
                match outcome {
                    Ok(message) => status_signal.set(ExportStatus::Done(message)),
                    Err(err) => status_signal.set(ExportStatus::Error(err)),
                }
                busy_signal.set(false);
            });
        }
    };

    rsx! {
        div { class: "export-panel",
            button {
                r#type: "button",
                class: "button button--primary",
                disabled: busy() || !has_subject,
                onclick: sheet_handler,
                {t!("export-sheet")}
            }
            button {
                r#type: "button",
                class: "button",
                disabled: busy() || !has_subject,
                onclick: summary_handler,
                {t!("export-summary")}
            }
            if let Some((class_name, message)) = feedback {
                span { class: "{class_name}", "{message}" }
            }
        }
    }
}

/// Standalone SVG document with the twelve leads of `subject`, stacked, on a white page.
pub fn lead_sheet_svg(
    subject: &CaseRecord,
    detail: Option<&CaseDetail>,
    pattern: WavePattern,
    render: &RenderConfig,
) -> String {
    let row = render.lead_height;
    let width = SHEET_WIDTH + SHEET_MARGIN * 2.0;
    let height = SHEET_TITLE_HEIGHT + row * LeadName::ALL.len() as f64 + SHEET_MARGIN;
    let preview = subject.preview_signal.as_deref();

    let mut svg = format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='{width}' height='{height}' viewBox='0 0 {width} {height}'>\n\
         <rect width='{width}' height='{height}' fill='#ffffff'/>\n\
         <text x='{SHEET_MARGIN}' y='36' font-family='sans-serif' font-size='20' font-weight='700' fill='#0f172a'>{}</text>\n",
        escape_xml(&subject.id)
    );

    for (index, lead) in LeadName::ALL.iter().enumerate() {
        let top = SHEET_TITLE_HEIGHT + row * index as f64;
        let path = lead_trace(*lead, detail, preview, pattern, render, SHEET_WIDTH).to_svg_path();
        svg.push_str(&format!(
            "<g transform='translate({SHEET_MARGIN} {top})'>\
             <rect width='{SHEET_WIDTH}' height='{row}' fill='none' stroke='#fecaca'/>\
             <text x='4' y='14' font-family='sans-serif' font-size='11' fill='#334155'>{lead}</text>\
             <path d='{path}' fill='none' stroke='#0f172a' stroke-width='1.2'/></g>\n"
        ));
    }
    svg.push_str("</svg>");
    svg
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GroupSummary<'a> {
    patient: Option<&'a str>,
    groups: &'a [DiagnosisGroup],
}

pub fn group_summary_json(
    patient: Option<&str>,
    groups: &[DiagnosisGroup],
) -> Result<String, String> {
    serde_json::to_string_pretty(&GroupSummary { patient, groups }).map_err(|err| err.to_string())
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&apos;")
}

/// One file produced by an export, named and typed for whichever sink receives it.
struct Artifact {
    file_name: String,
    mime: &'static str,
    bytes: Vec<u8>,
}

impl Artifact {
    fn new(case_id: &str, extension: &str, mime: &'static str, bytes: Vec<u8>) -> Self {
        let base = artifact_base(case_id, time::OffsetDateTime::now_utc());
        Self {
            file_name: format!("{base}.{extension}"),
            mime,
            bytes,
        }
    }
}

/// Where a batch of artifacts ended up.
enum Delivery {
    Folder(String),
    Browser,
}

async fn perform_sheet_export(case_id: &str, svg: String) -> Result<String, String> {
    let mut artifacts = Vec::with_capacity(2);
    #[cfg(not(target_arch = "wasm32"))]
    artifacts.push(Artifact::new(case_id, "png", "image/png", rasterize_svg(&svg)?));
    artifacts.push(Artifact::new(case_id, "svg", "image/svg+xml", svg.into_bytes()));

    Ok(match deliver(artifacts).await? {
        Delivery::Folder(path) => t!("export-sheet-saved", path = path),
        Delivery::Browser => t!("export-sheet-downloaded"),
    })
}

/// `ecg-<id>-<utc date>T<utc time>`, with every character outside `[A-Za-z0-9-]` replaced by `_`.
fn artifact_base(case_id: &str, at: time::OffsetDateTime) -> String {
    use time::macros::format_description;

    let safe: String = case_id
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    let stamp = at
        .format(&format_description!("[year][month][day]T[hour][minute][second]"))
        .map_err(|err| tracing::debug!(%err, "export timestamp unavailable"))
        .unwrap_or_default();
    format!("ecg-{safe}-{stamp}")
}

#[cfg(not(target_arch = "wasm32"))]
fn rasterize_svg(svg: &str) -> Result<Vec<u8>, String> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(svg, &options).map_err(|err| err.to_string())?;
    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| "lead sheet has no area".to_string())?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    pixmap.encode_png().map_err(|err| err.to_string())
}

/// Native builds write every artifact into `<data dir>/exports`.
#[cfg(not(target_arch = "wasm32"))]
async fn deliver(artifacts: Vec<Artifact>) -> Result<Delivery, String> {
    let folder = directories::ProjectDirs::from("org", "ECG-RAG", "ECG-RAG")
        .map(|dirs| dirs.data_dir().join("exports"))
        .ok_or("no platform data directory for exports")?;
    tokio::fs::create_dir_all(&folder)
        .await
        .map_err(|err| format!("{}: {err}", folder.display()))?;

    for artifact in &artifacts {
        let path = folder.join(&artifact.file_name);
        tokio::fs::write(&path, &artifact.bytes)
            .await
            .map_err(|err| format!("{}: {err}", path.display()))?;
        tracing::info!(path = %path.display(), mime = artifact.mime, "export written");
    }
    Ok(Delivery::Folder(folder.display().to_string()))
}

/// Browser builds hand each artifact to the download manager through a throwaway anchor.
#[cfg(target_arch = "wasm32")]
async fn deliver(artifacts: Vec<Artifact>) -> Result<Delivery, String> {
    use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

    for artifact in artifacts {
        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(artifact.bytes.as_slice()));
        let options = BlobPropertyBag::new();
        options.set_type(artifact.mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|_| "browser refused to build the export blob")?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|_| "browser refused an object URL")?;

        let clicked = with_hidden_element::<HtmlAnchorElement, _>("a", |anchor| {
            anchor.set_href(&url);
            anchor.set_download(&artifact.file_name);
            anchor.click();
            Ok(())
        });
        Url::revoke_object_url(&url).ok();
        clicked?;
    }
    Ok(Delivery::Browser)
}

/// Mount an invisible `tag` element on the page body for the duration of `use_element`.
#[cfg(target_arch = "wasm32")]
fn with_hidden_element<E, F>(tag: &str, use_element: F) -> Result<(), String>
where
    E: wasm_bindgen::JsCast + AsRef<web_sys::HtmlElement>,
    F: FnOnce(&E) -> Result<(), String>,
{
    use wasm_bindgen::JsCast;

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or("no document to export into")?;
    let body = document.body().ok_or("document has no body")?;
    let element: E = document
        .create_element(tag)
        .ok()
        .and_then(|element| element.dyn_into().ok())
        .ok_or_else(|| format!("cannot create <{tag}>"))?;
    let html: &web_sys::HtmlElement = element.as_ref();
    html.style()
        .set_css_text("position:fixed;top:0;left:0;opacity:0;pointer-events:none");

    body.append_child(html).map_err(|_| "cannot attach export element")?;
    let outcome = use_element(&element);
    html.remove();
    outcome
}

#[cfg(target_arch = "wasm32")]
async fn copy_to_clipboard(payload: String) -> Result<(), String> {
    use wasm_bindgen::JsCast;
    use web_sys::{HtmlDocument, HtmlTextAreaElement};

    with_hidden_element::<HtmlTextAreaElement, _>("textarea", |area| {
        area.set_value(&payload);
        area.select();
        let copied = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.dyn_into::<HtmlDocument>().ok())
            .and_then(|document| document.exec_command("copy").ok())
            .unwrap_or(false);
        copied.then_some(()).ok_or_else(|| "browser blocked the clipboard".to_string())
    })
}

#[cfg(not(target_arch = "wasm32"))]
async fn copy_to_clipboard(payload: String) -> Result<(), String> {
    arboard::Clipboard::new()
        .and_then(|mut clipboard| clipboard.set_text(payload))
        .map_err(|err| format!("clipboard unavailable: {err}"))
}
