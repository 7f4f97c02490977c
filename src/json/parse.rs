//! Purpose: Decode JSON bytes into a tree and classify decode failures.
//! Exports: `from_reader`, `from_str`, `from_slice`, `ParseFailureCategory`,
//!          `categorize_error`, `hint_for_error`.
//! Role: The only place that calls into `serde_json`'s deserializers.
//! Invariants: Readers yield the first JSON value; trailing data after it is not read.
//! Invariants: String and slice inputs must hold exactly one JSON value.
//! Notes: Hints name the category, position and caller context, never payload bytes.

use std::io::{BufReader, Read};

use serde::de::DeserializeOwned;
use serde_json::error::Category;

use crate::core::error::{Error, ErrorKind};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseFailureCategory {
    Syntax,
    Eof,
    Data,
    Io,
}

impl ParseFailureCategory {
    pub fn label(self) -> &'static str {
        match self {
            ParseFailureCategory::Syntax => "syntax",
            ParseFailureCategory::Eof => "eof",
            ParseFailureCategory::Data => "data",
            ParseFailureCategory::Io => "io",
        }
    }
}

pub fn categorize_error(err: &serde_json::Error) -> ParseFailureCategory {
    match err.classify() {
        Category::Syntax => ParseFailureCategory::Syntax,
        Category::Eof => ParseFailureCategory::Eof,
        Category::Data => ParseFailureCategory::Data,
        Category::Io => ParseFailureCategory::Io,
    }
}

pub fn hint_for_error(err: &serde_json::Error, context: &str) -> String {
    let category = categorize_error(err);
    let mut hint = format!("parse category: {}", category.label());
    if err.line() > 0 {
        hint.push_str(&format!("; line {}, column {}", err.line(), err.column()));
    }
    if category == ParseFailureCategory::Data {
        hint.push_str("; the top-level value must be a JSON object");
    }
    hint.push_str(&format!("; context: {context}"));
    hint
}

fn decode_error(err: serde_json::Error, context: &str) -> Error {
    let category = categorize_error(&err);
    tracing::debug!(category = category.label(), context, "json decode failed");
    let (kind, message) = match category {
        ParseFailureCategory::Io => (ErrorKind::Io, "failed to read json input"),
        ParseFailureCategory::Eof => (ErrorKind::Decode, "unexpected end of json input"),
        ParseFailureCategory::Syntax => (ErrorKind::Decode, "malformed json input"),
        ParseFailureCategory::Data => (ErrorKind::Decode, "json input has the wrong shape"),
    };
    let hint = hint_for_error(&err, context);
    Error::new(kind)
        .with_message(message)
        .with_hint(hint)
        .with_source(err)
}

pub fn from_reader<T, R>(reader: R, context: &str) -> Result<T, Error>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut stream =
        serde_json::Deserializer::from_reader(BufReader::new(reader)).into_iter::<T>();
    match stream.next() {
        Some(Ok(value)) => {
            tracing::debug!(context, bytes = stream.byte_offset(), "decoded json input");
            Ok(value)
        }
        Some(Err(err)) => Err(decode_error(err, context)),
        None => Err(Error::new(ErrorKind::Decode)
            .with_message("empty json input")
            .with_hint(format!("parse category: eof; context: {context}"))),
    }
}

pub fn from_str<T: DeserializeOwned>(input: &str, context: &str) -> Result<T, Error> {
    serde_json::from_str(input).map_err(|err| decode_error(err, context))
}

pub fn from_slice<T: DeserializeOwned>(input: &[u8], context: &str) -> Result<T, Error> {
    serde_json::from_slice(input).map_err(|err| decode_error(err, context))
}
