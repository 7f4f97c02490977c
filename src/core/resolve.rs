//! Purpose: Walk a decoded JSON tree segment by segment (the path resolver).
//! Exports: `resolve`, `resolve_str`, `resolve_segments`, `step`.
//! Role: Pure lookup; unaware of target shapes and error policy.
//! Invariants: The tree is only borrowed; nothing is mutated or cloned.
//! Invariants: The first failing segment aborts the walk with its error.
//! Invariants: A fully resolved `null` is reported as `NilValue` (absence).

use serde_json::Value;

use crate::core::describe::describe;
use crate::core::error::{Error, ErrorKind};
use crate::core::path::{Path, Segment};

pub fn resolve<'v>(root: &'v Value, path: &Path) -> Result<&'v Value, Error> {
    let segments = path.segments();
    let mut current = root;
    for (position, raw) in segments.iter().enumerate() {
        current = step(current, raw).map_err(|err| {
            let walked = Path::from_segments(&segments[..position]);
            tracing::trace!(path = %path, at = %walked, kind = ?err.kind(), "path resolution failed");
            if walked.is_empty() {
                err
            } else {
                err.with_hint(format!("resolved up to `{walked}`"))
            }
        })?;
    }

    if current.is_null() {
        let at = path.last().unwrap_or("<root>");
        return Err(Error::new(ErrorKind::NilValue)
            .with_message(format!("null value found at {at}"))
            .with_segment(at));
    }
    Ok(current)
}

/// String entry point: `a.b[2]` style.
pub fn resolve_str<'v>(root: &'v Value, path: &str) -> Result<&'v Value, Error> {
    resolve(root, &Path::parse(path))
}

/// Pre-split entry point: every segment is used verbatim.
pub fn resolve_segments<'v, I, S>(root: &'v Value, segments: I) -> Result<&'v Value, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    resolve(root, &Path::from_segments(segments))
}

/// Apply one segment to `current`.
pub fn step<'v>(current: &'v Value, raw: &str) -> Result<&'v Value, Error> {
    match Segment::classify(raw) {
        Segment::Index(index) => {
            let Value::Array(items) = current else {
                return Err(Error::new(ErrorKind::NotAnArray)
                    .with_message(format!("array index {index} on non-array value"))
                    .with_segment(raw)
                    .with_index(index)
                    .with_actual(describe(current)));
            };
            items.get(index).ok_or_else(|| {
                Error::new(ErrorKind::IndexOutOfBounds)
                    .with_message(format!(
                        "array index {index} out of bounds for array of length {}",
                        items.len()
                    ))
                    .with_segment(raw)
                    .with_index(index)
                    .with_actual(describe(current))
            })
        }
        Segment::Key(key) => {
            let Value::Object(map) = current else {
                return Err(Error::new(ErrorKind::NotAnObject)
                    .with_message(format!("object lookup \"{key}\" on non-object value"))
                    .with_segment(raw)
                    .with_actual(describe(current)));
            };
            map.get(key).ok_or_else(|| {
                Error::new(ErrorKind::KeyNotFound)
                    .with_message(format!("object does not contain field \"{key}\""))
                    .with_segment(raw)
                    .with_actual(describe(current))
            })
        }
    }
}
