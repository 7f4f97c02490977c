//! Purpose: Define the stable public Rust API boundary for jsonq.
//! Exports: Query context, path types, shape trait, errors and resolver entry points.
//! Role: Public, additive-only surface over the `core` modules.
//! Invariants: Everything a caller needs to query a tree is reachable from here.

mod query;

pub use crate::core::coerce::FromValue;
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::path::{IntoPath, Path, Segment};
pub use crate::core::resolve::{resolve, resolve_segments, resolve_str};
pub use query::{ApiResult, JsonQuery, QueryOptions};
pub use serde_json::{Map, Value};
