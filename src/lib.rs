//! Purpose: Query already-decoded JSON trees by path with typed coercions.
//! Exports: `api` (query context and accessors), `core` (resolver, coercer, errors),
//!          `json` (decode boundary).
//! Role: Library backing the `jsonq` binary and external callers.
//! Invariants: Trees are read-only inputs; no module mutates a decoded value.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod api;
pub mod core;
pub mod json;

pub use api::{Error, ErrorKind, JsonQuery, QueryOptions};
