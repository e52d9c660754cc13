//! Keyframe timeline: per-time snapshots, frame series and their exports.
//!
//! Everything here is pure. The base schema is never modified; each call returns fresh values.
//! Curves on paths outside [`crate::ALLOWED_CURVE_PATHS`], or owned by a disabled module while
//! `IGNORE_RULES.hard_disable` is set, are skipped silently.

pub(crate) mod export;
pub(crate) mod interpolate;
pub(crate) mod timeline;

pub use export::{SheetOpts, export_frame_prompt_sheet, export_timeline_json};
pub use interpolate::{interpolate_at_time, interpolated_value, state_at};
pub use timeline::{
    Frame, FrameSeries, SeriesStatus, TimelineOpts, build_frame_series, timeline_times,
};
