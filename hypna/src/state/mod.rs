//! Application-facing shell around the pure core.
//!
//! [`Store`] owns the current schema and its derived outputs. The persistence and export helpers
//! are pure text/JSON transforms; file I/O is left to callers.

pub(crate) mod exports;
pub(crate) mod persistence;
pub(crate) mod store;

pub use exports::build_enabled_only_schema;
pub use persistence::{
    StoredState, decode_stored_payload, encode_stored_state, load_schema,
    load_schema_with_outcome,
};
pub use store::{Derived, Store, StoreOpts};
