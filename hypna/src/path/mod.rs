//! Dotted-path addressing over JSON trees.
//!
//! Keys such as `"PALETTE.riso_plates.0.opacity"` are parsed once into a [`DottedPath`] of typed
//! segments and then walked with explicit container checks. Reads are total and fall back on
//! missing data; writes clone the tree and fail only when a primitive sits where a container is
//! required.

pub(crate) mod access;
pub(crate) mod segment;

pub use access::{get, get_at, get_or, set, set_at};
pub use segment::{DottedPath, PathError, Segment};
