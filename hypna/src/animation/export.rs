//! Text artifacts over an already-built [`FrameSeries`].
//!
//! Nothing here re-interpolates or re-compiles; output depends only on the series.

use crate::animation::timeline::{Frame, FrameSeries, SeriesStatus};
use crate::foundation::error::{HypnaError, HypnaResult};
use crate::schema::model::{CurveValue, ExportMode, Keyframe, Schema};
use crate::schema::module::ModuleKey;
use serde::Serialize;
use std::collections::BTreeMap;

/// Prompt-sheet options.
#[derive(Clone, Copy, Debug, Default)]
pub struct SheetOpts {
    /// Add a `disabled: ...` line under frames that have disabled modules.
    pub annotate_disabled: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TimelineDoc<'a> {
    schema_version: u32,
    status: SeriesStatus,
    fps: f64,
    duration: f64,
    export_mode: ExportMode,
    every_n: f64,
    keyframes: &'a [Keyframe],
    frames: Vec<FrameDoc<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FrameDoc<'a> {
    frame_index: usize,
    t: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'a str>,
    fingerprint: String,
    curves: &'a BTreeMap<String, CurveValue>,
    disabled_modules: &'a [ModuleKey],
    compiled_text: &'a str,
    derived_schema: &'a Schema,
}

impl<'a> From<&'a Frame> for FrameDoc<'a> {
    fn from(f: &'a Frame) -> Self {
        Self {
            frame_index: f.frame_index,
            t: f.t,
            state: f.state.as_deref(),
            fingerprint: f.fingerprint.to_hex(),
            curves: &f.curves,
            disabled_modules: &f.disabled_modules,
            compiled_text: &f.compiled_text,
            derived_schema: &f.derived_schema,
        }
    }
}

/// Pretty-printed timeline document. Byte-stable for a given series.
pub fn export_timeline_json(series: &FrameSeries) -> HypnaResult<String> {
    let doc = TimelineDoc {
        schema_version: series.schema_version,
        status: series.status,
        fps: series.fps,
        duration: series.duration,
        export_mode: series.export_mode,
        every_n: series.every_n,
        keyframes: &series.keyframes,
        frames: series.frames.iter().map(FrameDoc::from).collect(),
    };
    serde_json::to_string_pretty(&doc)
        .map_err(|e| HypnaError::serde(format!("encode timeline: {e}")))
}

/// One `# Frame i (t=...)` block per frame, separated by blank lines.
///
/// A disabled series yields an empty string.
pub fn export_frame_prompt_sheet(series: &FrameSeries, opts: &SheetOpts) -> String {
    let blocks: Vec<String> = series
        .frames
        .iter()
        .map(|f| {
            let mut out = String::new();
            out.push_str(&format!("# Frame {} (t={:.3})\n", f.frame_index, f.t));
            if opts.annotate_disabled && !f.disabled_modules.is_empty() {
                let names: Vec<&str> = f.disabled_modules.iter().map(|m| m.as_str()).collect();
                out.push_str(&format!("disabled: {}\n", names.join(", ")));
            }
            out.push_str(&f.compiled_text);
            out
        })
        .collect();
    blocks.join("\n\n")
}
