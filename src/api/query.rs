//! Purpose: Define the query context and its typed accessor families.
//! Exports: `JsonQuery`, `QueryOptions`, `ApiResult`.
//! Role: Public surface tying the resolver and the coercer together.
//! Invariants: A context is an immutable (tree view, error policy) pair; sub-queries borrow.
//! Invariants: Fallible accessors always return `Result`; the `as_*` tier applies the
//!             context's policy (panic, or the shape's zero value) chosen at construction.
//! Invariants: Silent typed-array accessors return the elements coerced before a failing one.
#![allow(clippy::result_large_err)]

use std::borrow::Cow;
use std::io::Read;
use std::sync::LazyLock;

use serde_json::{Map, Value};

use crate::core::coerce::{self, FromValue};
use crate::core::error::Error;
use crate::core::path::{IntoPath, Path};
use crate::core::resolve::resolve;
use crate::json::parse;

pub type ApiResult<T> = Result<T, Error>;

static EMPTY_OBJECT_VALUE: LazyLock<Value> = LazyLock::new(|| Value::Object(Map::new()));

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct QueryOptions {
    pub panic_on_error: bool,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_panic_on_error(mut self, panic_on_error: bool) -> Self {
        self.panic_on_error = panic_on_error;
        self
    }
}

#[derive(Clone, Debug)]
pub struct JsonQuery<'a> {
    value: Cow<'a, Value>,
    options: QueryOptions,
}

impl JsonQuery<'static> {
    /// Decode one JSON object from `reader`.
    pub fn parse<R: Read>(reader: R) -> ApiResult<Self> {
        let map: Map<String, Value> = parse::from_reader(reader, "reader")?;
        Ok(Self::from_value(Value::Object(map)))
    }

    /// Decode a JSON object held in a string.
    pub fn from_json_str(input: &str) -> ApiResult<Self> {
        let map: Map<String, Value> = parse::from_str(input, "str")?;
        Ok(Self::from_value(Value::Object(map)))
    }

    /// Decode a JSON object held in a byte slice.
    pub fn from_json_slice(input: &[u8]) -> ApiResult<Self> {
        let map: Map<String, Value> = parse::from_slice(input, "slice")?;
        Ok(Self::from_value(Value::Object(map)))
    }

    /// Take ownership of an already decoded tree of any shape.
    pub fn from_value(value: Value) -> Self {
        Self {
            value: Cow::Owned(value),
            options: QueryOptions::default(),
        }
    }
}

impl<'a> JsonQuery<'a> {
    /// Borrow an already decoded tree of any shape.
    pub fn new(value: &'a Value) -> Self {
        Self {
            value: Cow::Borrowed(value),
            options: QueryOptions::default(),
        }
    }

    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn panic_on_error(mut self, panic_on_error: bool) -> Self {
        self.options.panic_on_error = panic_on_error;
        self
    }

    pub fn options(&self) -> QueryOptions {
        self.options
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value.into_owned()
    }

    fn child<'q>(&'q self, value: &'q Value) -> JsonQuery<'q> {
        JsonQuery {
            value: Cow::Borrowed(value),
            options: self.options,
        }
    }

    fn locate(&self, path: &Path) -> ApiResult<&Value> {
        resolve(&self.value, path)
    }

    /// Resolve `path` and coerce the result to `T`.
    pub fn extract<'q, T: FromValue<'q>>(&'q self, path: impl IntoPath) -> ApiResult<T> {
        let path = path.into_path();
        let value = self.locate(&path)?;
        T::from_value(value).map_err(|err| with_last_segment(err, &path))
    }

    /// Like [`extract`](Self::extract), with the context's error policy applied.
    pub fn extract_or_zero<'q, T: FromValue<'q>>(&'q self, path: impl IntoPath) -> T {
        self.apply_policy(self.extract(path), T::zero)
    }

    fn apply_policy<T>(&self, result: ApiResult<T>, zero: impl FnOnce() -> T) -> T {
        match result {
            Ok(value) => value,
            Err(err) => {
                if self.options.panic_on_error {
                    panic!("jsonq: {err}");
                }
                tracing::trace!(kind = ?err.kind(), "query failed; substituting zero value");
                zero()
            }
        }
    }

    /// Silent typed arrays keep the elements coerced before the first failing one.
    fn extract_elements_or_prefix<'q, T: FromValue<'q>>(
        &'q self,
        path: impl IntoPath,
    ) -> Vec<T> {
        let path = path.into_path();
        let items = match self.locate(&path).and_then(coerce::to_array) {
            Ok(items) => items,
            Err(err) => return self.apply_policy(Err(with_last_segment(err, &path)), Vec::new),
        };
        match coerce::coerce_elements(items) {
            (out, None) => out,
            (prefix, Some(err)) => {
                self.apply_policy(Err(with_last_segment(err, &path)), || prefix)
            }
        }
    }

    pub fn exists(&self, path: impl IntoPath) -> bool {
        self.locate(&path.into_path()).is_ok()
    }

    pub fn get(&self, path: impl IntoPath) -> ApiResult<&Value> {
        self.extract(path)
    }

    pub fn as_value(&self, path: impl IntoPath) -> &Value {
        self.extract_or_zero(path)
    }

    pub fn bool(&self, path: impl IntoPath) -> ApiResult<bool> {
        self.extract(path)
    }

    pub fn as_bool(&self, path: impl IntoPath) -> bool {
        self.extract_or_zero(path)
    }

    pub fn float(&self, path: impl IntoPath) -> ApiResult<f64> {
        self.extract(path)
    }

    pub fn as_float(&self, path: impl IntoPath) -> f64 {
        self.extract_or_zero(path)
    }

    pub fn int(&self, path: impl IntoPath) -> ApiResult<i32> {
        self.extract(path)
    }

    pub fn as_int(&self, path: impl IntoPath) -> i32 {
        self.extract_or_zero(path)
    }

    pub fn int64(&self, path: impl IntoPath) -> ApiResult<i64> {
        self.extract(path)
    }

    pub fn as_int64(&self, path: impl IntoPath) -> i64 {
        self.extract_or_zero(path)
    }

    pub fn string(&self, path: impl IntoPath) -> ApiResult<&str> {
        self.extract(path)
    }

    pub fn as_string(&self, path: impl IntoPath) -> &str {
        self.extract_or_zero(path)
    }

    pub fn object(&self, path: impl IntoPath) -> ApiResult<&Map<String, Value>> {
        self.extract(path)
    }

    pub fn as_object(&self, path: impl IntoPath) -> &Map<String, Value> {
        self.extract_or_zero(path)
    }

    pub fn array(&self, path: impl IntoPath) -> ApiResult<&[Value]> {
        self.extract(path)
    }

    pub fn as_array(&self, path: impl IntoPath) -> &[Value] {
        self.extract_or_zero(path)
    }

    pub fn array_of_strings(&self, path: impl IntoPath) -> ApiResult<Vec<&str>> {
        self.extract(path)
    }

    pub fn as_array_of_strings(&self, path: impl IntoPath) -> Vec<&str> {
        self.extract_elements_or_prefix(path)
    }

    pub fn array_of_ints(&self, path: impl IntoPath) -> ApiResult<Vec<i64>> {
        self.extract(path)
    }

    pub fn as_array_of_ints(&self, path: impl IntoPath) -> Vec<i64> {
        self.extract_elements_or_prefix(path)
    }

    pub fn array_of_floats(&self, path: impl IntoPath) -> ApiResult<Vec<f64>> {
        self.extract(path)
    }

    pub fn as_array_of_floats(&self, path: impl IntoPath) -> Vec<f64> {
        self.extract_elements_or_prefix(path)
    }

    pub fn array_of_bools(&self, path: impl IntoPath) -> ApiResult<Vec<bool>> {
        self.extract(path)
    }

    pub fn as_array_of_bools(&self, path: impl IntoPath) -> Vec<bool> {
        self.extract_elements_or_prefix(path)
    }

    pub fn array_of_objects(&self, path: impl IntoPath) -> ApiResult<Vec<&Map<String, Value>>> {
        self.extract(path)
    }

    pub fn as_array_of_objects(&self, path: impl IntoPath) -> Vec<&Map<String, Value>> {
        self.extract_elements_or_prefix(path)
    }

    pub fn array_of_arrays(&self, path: impl IntoPath) -> ApiResult<Vec<&[Value]>> {
        self.extract(path)
    }

    pub fn as_array_of_arrays(&self, path: impl IntoPath) -> Vec<&[Value]> {
        self.extract_elements_or_prefix(path)
    }

    /// Alias for [`array_of_arrays`](Self::array_of_arrays).
    pub fn matrix_2d(&self, path: impl IntoPath) -> ApiResult<Vec<&[Value]>> {
        self.array_of_arrays(path)
    }

    pub fn as_matrix_2d(&self, path: impl IntoPath) -> Vec<&[Value]> {
        self.as_array_of_arrays(path)
    }

    /// Sub-query over the object at `path`, sharing this context's policy.
    pub fn query(&self, path: impl IntoPath) -> ApiResult<JsonQuery<'_>> {
        let path = path.into_path();
        let value = self.locate(&path)?;
        coerce::to_object(value).map_err(|err| with_last_segment(err, &path))?;
        Ok(self.child(value))
    }

    /// On silent failure the sub-query views an empty object.
    pub fn as_query(&self, path: impl IntoPath) -> JsonQuery<'_> {
        let result = self.query(path);
        self.apply_policy(result, || self.child(&EMPTY_OBJECT_VALUE))
    }

    /// One sub-query per array element; elements are not coerced.
    pub fn array_of_query(&self, path: impl IntoPath) -> ApiResult<Vec<JsonQuery<'_>>> {
        let items = self.array(path)?;
        Ok(items.iter().map(|item| self.child(item)).collect())
    }

    pub fn as_array_of_query(&self, path: impl IntoPath) -> Vec<JsonQuery<'_>> {
        let result = self.array_of_query(path);
        self.apply_policy(result, Vec::new)
    }
}

fn with_last_segment(err: Error, path: &Path) -> Error {
    match path.last() {
        Some(last) if err.segment().is_none() => err.with_segment(last),
        _ => err,
    }
}

impl From<Value> for JsonQuery<'static> {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

impl<'a> From<&'a Value> for JsonQuery<'a> {
    fn from(value: &'a Value) -> Self {
        Self::new(value)
    }
}
