//! Current-version schema model and its contract.
//!
//! The typed model in [`model`] is what the rest of the crate works with. The validator operates on
//! untyped JSON so that it can judge arbitrary candidates before any decoding happens.

pub(crate) mod curves;
pub(crate) mod defaults;
pub(crate) mod model;
pub(crate) mod module;
pub(crate) mod validate;
pub(crate) mod version;
