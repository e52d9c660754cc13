//! Migration of untyped input into a current-version [`crate::Schema`].
//!
//! The pipeline never fails on bad data. It resolves every input to one of four outcomes:
//!
//! - already valid: decoded as-is,
//! - a recognized older version: chained through the per-version steps, overlaid onto the
//!   defaults, then repaired until valid,
//! - an unrecognized object: defaults plus a few best-effort legacy aliases,
//! - anything else: defaults.
//!
//! Migration is pure and idempotent.

pub(crate) mod legacy;
pub(crate) mod pipeline;
pub(crate) mod repair;
pub(crate) mod steps;

pub use pipeline::{MigrationOutcome, detect_version, migrate, migrate_with_outcome};
