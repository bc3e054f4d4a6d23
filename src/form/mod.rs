//! Form submission module.
//!
//! Projects a completed usage interval into the flat field-keyed record the
//! external form endpoint expects, and POSTs it. The record is never stored;
//! ownership ends at the HTTP call.

mod client;
mod fields;

pub use client::FormClient;
pub use fields::{TimestampParts, build_form, usage_hours};
