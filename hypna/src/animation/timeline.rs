use crate::animation::interpolate::{interpolate, state_at};
use crate::compile::PromptCompiler;
use crate::foundation::error::HypnaResult;
use crate::foundation::fingerprint::{FrameFingerprint, fingerprint_text};
use crate::schema::model::{AnimationBlock, CurveValue, ExportMode, Keyframe, Schema};
use crate::schema::module::ModuleKey;
use crate::schema::version::SCHEMA_VERSION;
use serde::Serialize;
use std::collections::BTreeMap;

/// Frame-series options.
#[derive(Clone, Copy, Debug)]
pub struct TimelineOpts {
    /// Upper bound on the sampling grid. Larger `fps * duration` products are clamped to it.
    pub max_frames: usize,
}

impl Default for TimelineOpts {
    fn default() -> Self {
        Self { max_frames: 3600 }
    }
}

/// Whether a series was built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesStatus {
    /// Frames were materialized.
    Ok,
    /// The animation module is off; `frames` is empty.
    Disabled,
}

/// One materialized frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Zero-based position in the series.
    pub frame_index: usize,
    /// Normalized time.
    pub t: f64,
    /// Label of the nearest keyframe.
    pub state: Option<String>,
    /// Snapshot at `t`.
    pub derived_schema: Schema,
    /// Curve values written into `derived_schema`, by path.
    pub curves: BTreeMap<String, CurveValue>,
    /// Modules disabled in the snapshot.
    pub disabled_modules: Vec<ModuleKey>,
    /// Compiler output for `derived_schema`.
    pub compiled_text: String,
    /// Fingerprint of `compiled_text`.
    pub fingerprint: FrameFingerprint,
}

/// Ordered frames plus the timeline header they were sampled from.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSeries {
    #[allow(missing_docs)]
    pub status: SeriesStatus,
    /// Version tag of the source schema.
    pub schema_version: u32,
    #[allow(missing_docs)]
    pub fps: f64,
    /// Seconds.
    pub duration: f64,
    #[allow(missing_docs)]
    pub export_mode: ExportMode,
    #[allow(missing_docs)]
    pub every_n: f64,
    /// Keyframes as declared.
    pub keyframes: Vec<Keyframe>,
    #[allow(missing_docs)]
    pub frames: Vec<Frame>,
}

impl FrameSeries {
    /// `true` for the disabled sentinel.
    pub fn is_disabled(&self) -> bool {
        self.status == SeriesStatus::Disabled
    }
}

/// Evenly spaced grid `i / (count - 1)` with `count = max(1, round(fps * duration))`.
///
/// A single-frame grid is `[0.0]`.
pub fn timeline_times(animation: &AnimationBlock, opts: &TimelineOpts) -> Vec<f64> {
    let raw = (animation.fps * animation.duration).round();
    let mut count = if raw.is_finite() && raw >= 1.0 {
        raw as usize
    } else {
        1
    };
    let cap = opts.max_frames.max(1);
    if count > cap {
        tracing::warn!(count, cap, "frame grid exceeds cap; clamping");
        count = cap;
    }
    let denom = count.saturating_sub(1).max(1) as f64;
    (0..count).map(|i| i as f64 / denom).collect()
}

/// Materialize the frames selected by `ANIMATION.export_mode`.
///
/// Returns the disabled sentinel, without sampling anything, when the animation module is off.
#[tracing::instrument(skip(schema, compiler))]
pub fn build_frame_series(
    schema: &Schema,
    compiler: &impl PromptCompiler,
    opts: &TimelineOpts,
) -> HypnaResult<FrameSeries> {
    let anim = &schema.animation;
    let mut series = FrameSeries {
        status: SeriesStatus::Disabled,
        schema_version: SCHEMA_VERSION,
        fps: anim.fps,
        duration: anim.duration,
        export_mode: anim.export_mode,
        every_n: anim.every_n,
        keyframes: anim.keyframes.clone(),
        frames: Vec::new(),
    };
    if !schema.module_enabled(ModuleKey::Animation) {
        tracing::debug!("animation module disabled");
        return Ok(series);
    }

    let times = selected_times(anim, opts);
    tracing::debug!(frames = times.len(), mode = %anim.export_mode, "building frame series");

    series.frames = times
        .into_iter()
        .enumerate()
        .map(|(frame_index, t)| {
            let snap = interpolate(schema, t)?;
            let compiled_text = compiler.compile(&snap.schema);
            Ok(Frame {
                frame_index,
                t,
                state: state_at(&anim.keyframes, t).map(str::to_owned),
                disabled_modules: snap.schema.modules.disabled(),
                fingerprint: fingerprint_text(&compiled_text),
                curves: snap.curves,
                derived_schema: snap.schema,
                compiled_text,
            })
        })
        .collect::<HypnaResult<Vec<_>>>()?;
    series.status = SeriesStatus::Ok;
    Ok(series)
}

fn selected_times(anim: &AnimationBlock, opts: &TimelineOpts) -> Vec<f64> {
    match anim.export_mode {
        ExportMode::KeyframesOnly => {
            let mut ts: Vec<f64> = anim
                .keyframes
                .iter()
                .map(|k| k.t)
                .filter(|t| t.is_finite())
                .map(|t| t.clamp(0.0, 1.0))
                .collect();
            ts.sort_by(f64::total_cmp);
            ts.truncate(opts.max_frames.max(1));
            ts
        }
        ExportMode::AllFrames => timeline_times(anim, opts),
        ExportMode::EveryN => {
            let n = anim.every_n.round().max(1.0) as usize;
            timeline_times(anim, opts)
                .into_iter()
                .step_by(n)
                .collect()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
