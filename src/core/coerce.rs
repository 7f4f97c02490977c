//! Purpose: Convert a resolved dynamic value into a requested shape (the type coercer).
//! Exports: `FromValue`, `to_bool`, `to_f64`, `to_i64`, `to_i32`, `to_str`, `to_object`,
//!          `to_array`, `to_array_of`, `coerce_elements`.
//! Role: Pure conversion; unaware of paths and of the panic/zero policy.
//! Invariants: Each shape tries its accepted representations in a fixed order; first match wins.
//! Invariants: Unparseable numeric strings fall through to a `TypeMismatch`, never a parse error.
//! Invariants: Typed arrays stop at the first failing element and report its index.

use std::sync::LazyLock;

use serde_json::{Map, Number, Value};

use crate::core::describe::describe;
use crate::core::error::{Error, ErrorKind};

static EMPTY_OBJECT: LazyLock<Map<String, Value>> = LazyLock::new(Map::new);
static NULL: Value = Value::Null;

/// A shape a dynamic value can be coerced into.
///
/// `zero` is what the silent convenience accessors return on failure.
pub trait FromValue<'v>: Sized {
    const SHAPE: &'static str;

    fn from_value(value: &'v Value) -> Result<Self, Error>;

    fn zero() -> Self;
}

fn mismatch(shape: &'static str, expected: &str, value: &Value) -> Error {
    let actual = describe(value);
    Error::new(ErrorKind::TypeMismatch)
        .with_message(format!("expected {expected} for {shape}, got {actual}"))
        .with_shape(shape)
        .with_actual(actual)
}

pub fn to_bool(value: &Value) -> Result<bool, Error> {
    match value {
        Value::Bool(flag) => Ok(*flag),
        _ => Err(mismatch("bool", "boolean value", value)),
    }
}

pub fn to_f64(value: &Value) -> Result<f64, Error> {
    match value {
        Value::Number(num) => {
            if let Some(float) = num.as_f64() {
                return Ok(float);
            }
        }
        Value::String(text) => {
            if let Ok(float) = text.parse::<f64>() {
                return Ok(float);
            }
        }
        _ => {}
    }
    Err(mismatch("float", "numeric value", value))
}

pub fn to_i64(value: &Value) -> Result<i64, Error> {
    match value {
        Value::Number(num) => return number_to_i64(num, value),
        Value::String(text) => {
            if let Ok(int) = text.parse::<i64>() {
                return Ok(int);
            }
        }
        _ => {}
    }
    Err(mismatch("int64", "numeric value", value))
}

// Floats truncate toward zero; unsigned values above i64::MAX do not fit.
fn number_to_i64(num: &Number, value: &Value) -> Result<i64, Error> {
    if let Some(int) = num.as_i64() {
        return Ok(int);
    }
    if num.is_u64() {
        return Err(mismatch("int64", "numeric value in range", value));
    }
    match num.as_f64() {
        Some(float) => Ok(float.trunc() as i64),
        None => Err(mismatch("int64", "numeric value", value)),
    }
}

pub fn to_i32(value: &Value) -> Result<i32, Error> {
    let Ok(wide) = to_i64(value) else {
        return Err(mismatch("int", "numeric value", value));
    };
    i32::try_from(wide).map_err(|source| {
        mismatch("int", "numeric value in 32-bit range", value).with_source(source)
    })
}

pub fn to_str(value: &Value) -> Result<&str, Error> {
    match value {
        Value::String(text) => Ok(text.as_str()),
        _ => Err(mismatch("string", "string value", value)),
    }
}

pub fn to_object(value: &Value) -> Result<&Map<String, Value>, Error> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(mismatch("object", "json object", value)),
    }
}

pub fn to_array(value: &Value) -> Result<&[Value], Error> {
    match value {
        Value::Array(items) => Ok(items.as_slice()),
        _ => Err(mismatch("array", "json array", value)),
    }
}

/// Coerce to an array, then every element to `T`.
pub fn to_array_of<'v, T: FromValue<'v>>(value: &'v Value) -> Result<Vec<T>, Error> {
    let items = to_array(value)?;
    match coerce_elements(items) {
        (out, None) => Ok(out),
        (_, Some(err)) => Err(err),
    }
}

/// Coerce elements in order until one fails.
///
/// Returns the elements coerced before the failure alongside the failure itself.
pub fn coerce_elements<'v, T: FromValue<'v>>(items: &'v [Value]) -> (Vec<T>, Option<Error>) {
    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match T::from_value(item) {
            Ok(element) => out.push(element),
            Err(err) => {
                let message = format!("element {index}: {}", err.message_text());
                return (out, Some(err.with_message(message).with_index(index)));
            }
        }
    }
    (out, None)
}

impl<'v> FromValue<'v> for bool {
    const SHAPE: &'static str = "bool";

    fn from_value(value: &'v Value) -> Result<Self, Error> {
        to_bool(value)
    }

    fn zero() -> Self {
        false
    }
}

impl<'v> FromValue<'v> for f64 {
    const SHAPE: &'static str = "float";

    fn from_value(value: &'v Value) -> Result<Self, Error> {
        to_f64(value)
    }

    fn zero() -> Self {
        0.0
    }
}

impl<'v> FromValue<'v> for i64 {
    const SHAPE: &'static str = "int64";

    fn from_value(value: &'v Value) -> Result<Self, Error> {
        to_i64(value)
    }

    fn zero() -> Self {
        0
    }
}

impl<'v> FromValue<'v> for i32 {
    const SHAPE: &'static str = "int";

    fn from_value(value: &'v Value) -> Result<Self, Error> {
        to_i32(value)
    }

    fn zero() -> Self {
        0
    }
}

impl<'v> FromValue<'v> for &'v str {
    const SHAPE: &'static str = "string";

    fn from_value(value: &'v Value) -> Result<Self, Error> {
        to_str(value)
    }

    fn zero() -> Self {
        ""
    }
}

impl<'v> FromValue<'v> for String {
    const SHAPE: &'static str = "string";

    fn from_value(value: &'v Value) -> Result<Self, Error> {
        to_str(value).map(str::to_string)
    }

    fn zero() -> Self {
        String::new()
    }
}

impl<'v> FromValue<'v> for &'v Map<String, Value> {
    const SHAPE: &'static str = "object";

    fn from_value(value: &'v Value) -> Result<Self, Error> {
        to_object(value)
    }

    fn zero() -> Self {
        &*EMPTY_OBJECT
    }
}

impl<'v> FromValue<'v> for &'v [Value] {
    const SHAPE: &'static str = "array";

    fn from_value(value: &'v Value) -> Result<Self, Error> {
        to_array(value)
    }

    fn zero() -> Self {
        &[]
    }
}

/// Any non-null value, uncoerced.
impl<'v> FromValue<'v> for &'v Value {
    const SHAPE: &'static str = "any";

    fn from_value(value: &'v Value) -> Result<Self, Error> {
        Ok(value)
    }

    fn zero() -> Self {
        &NULL
    }
}

impl<'v> FromValue<'v> for Value {
    const SHAPE: &'static str = "any";

    fn from_value(value: &'v Value) -> Result<Self, Error> {
        Ok(value.clone())
    }

    fn zero() -> Self {
        Value::Null
    }
}

impl<'v, T: FromValue<'v>> FromValue<'v> for Vec<T> {
    const SHAPE: &'static str = "array";

    fn from_value(value: &'v Value) -> Result<Self, Error> {
        to_array_of(value)
    }

    fn zero() -> Self {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        FromValue, coerce_elements, to_array, to_array_of, to_bool, to_f64, to_i32, to_i64,
        to_object, to_str,
    };
    use crate::core::error::ErrorKind;
    use serde_json::{Map, Value, json};

    #[test]
    fn bool_accepts_only_booleans() {
        assert!(to_bool(&json!(true)).unwrap());
        assert!(!to_bool(&json!(false)).unwrap());

        let err = to_bool(&json!("42")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.shape(), Some("bool"));
        assert_eq!(err.actual(), Some("string \"42\""));
        assert!(err.message_text().contains("expected boolean value for bool"));

        assert_eq!(to_bool(&json!(1)).unwrap_err().kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn float_accepts_numbers_and_numeric_strings() {
        assert_eq!(to_f64(&json!(3.5)).unwrap(), 3.5);
        assert_eq!(to_f64(&json!(7)).unwrap(), 7.0);
        assert_eq!(to_f64(&json!(-7)).unwrap(), -7.0);
        assert_eq!(to_f64(&json!(u64::MAX)).unwrap(), u64::MAX as f64);
        assert_eq!(to_f64(&json!("2.25")).unwrap(), 2.25);
        assert_eq!(to_f64(&json!("1e3")).unwrap(), 1000.0);
    }

    #[test]
    fn float_rejects_non_numeric_strings_and_other_types() {
        for value in [json!("abc"), json!(""), json!(true), json!([1]), json!({})] {
            let err = to_f64(&value).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::TypeMismatch);
            assert_eq!(err.shape(), Some("float"));
            assert!(err.message_text().contains("expected numeric value for float"));
        }
    }

    #[test]
    fn int_accepts_integers_strings_and_truncates_floats() {
        assert_eq!(to_i64(&json!(42)).unwrap(), 42);
        assert_eq!(to_i64(&json!("42")).unwrap(), 42);
        assert_eq!(to_i64(&json!("-42")).unwrap(), -42);
        assert_eq!(to_i64(&json!(3.9)).unwrap(), 3);
        assert_eq!(to_i64(&json!(-3.9)).unwrap(), -3);
        assert_eq!(to_i64(&json!(i64::MIN)).unwrap(), i64::MIN);
    }

    #[test]
    fn int_rejects_fractional_strings_and_unsigned_overflow() {
        let err = to_i64(&json!("3.5")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.shape(), Some("int64"));

        let err = to_i64(&json!(u64::MAX)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert!(err.message_text().contains("in range"));

        assert!(to_i64(&json!(null)).is_err());
    }

    #[test]
    fn int32_narrowing_checks_range() {
        assert_eq!(to_i32(&json!(123)).unwrap(), 123);
        assert_eq!(to_i32(&json!("-5")).unwrap(), -5);

        let err = to_i32(&json!(i64::from(i32::MAX) + 1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.shape(), Some("int"));
        assert!(std::error::Error::source(&err).is_some());

        let err = to_i32(&json!("x")).unwrap_err();
        assert_eq!(err.shape(), Some("int"));
    }

    #[test]
    fn string_object_array_accept_only_their_own_type() {
        assert_eq!(to_str(&json!("hi")).unwrap(), "hi");
        assert_eq!(to_str(&json!(5)).unwrap_err().shape(), Some("string"));

        let obj = json!({"k": 1});
        assert_eq!(to_object(&obj).unwrap().len(), 1);
        assert_eq!(to_object(&json!([])).unwrap_err().shape(), Some("object"));

        let arr = json!([1, 2]);
        assert_eq!(to_array(&arr).unwrap().len(), 2);
        assert_eq!(to_array(&json!({})).unwrap_err().shape(), Some("array"));
    }

    #[test]
    fn typed_arrays_coerce_each_element() {
        let value = json!([1, "2", 3.5]);
        assert_eq!(to_array_of::<f64>(&value).unwrap(), vec![1.0, 2.0, 3.5]);
        assert_eq!(to_array_of::<i64>(&value).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn typed_arrays_stop_at_first_bad_element() {
        let value = json!([1, "x", 3]);
        let err = to_array_of::<i64>(&value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.index(), Some(1));
        assert!(err.message_text().starts_with("element 1: "));
        assert_eq!(err.actual(), Some("string \"x\""));
    }

    #[test]
    fn element_coercion_keeps_the_prefix_before_a_failure() {
        let items = [json!(1), json!("x"), json!(3)];
        let (prefix, failure) = coerce_elements::<i64>(&items);
        assert_eq!(prefix, vec![1]);
        assert_eq!(failure.unwrap().index(), Some(1));

        let (all, failure) = coerce_elements::<i64>(&items[..1]);
        assert_eq!(all, vec![1]);
        assert!(failure.is_none());
    }

    #[test]
    fn typed_arrays_reject_null_elements() {
        let err = to_array_of::<&str>(&json!(["a", null])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.index(), Some(1));
    }

    #[test]
    fn typed_array_of_non_array_fails_with_array_shape() {
        let err = to_array_of::<bool>(&json!("nope")).unwrap_err();
        assert_eq!(err.shape(), Some("array"));
        assert!(err.index().is_none());
    }

    #[test]
    fn empty_arrays_coerce_to_empty() {
        let value = json!([]);
        assert!(to_array_of::<bool>(&value).unwrap().is_empty());
    }

    #[test]
    fn nested_arrays_are_matrices() {
        let value = json!([[1, 2], [3]]);
        let matrix = Vec::<&[Value]>::from_value(&value).unwrap();
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix[0], [json!(1), json!(2)]);

        let ints = Vec::<Vec<i64>>::from_value(&value).unwrap();
        assert_eq!(ints, vec![vec![1, 2], vec![3]]);
    }

    #[test]
    fn zero_values_per_shape() {
        assert!(!bool::zero());
        assert_eq!(f64::zero(), 0.0);
        assert_eq!(i64::zero(), 0);
        assert_eq!(i32::zero(), 0);
        assert_eq!(<&str>::zero(), "");
        assert_eq!(<&Map<String, Value>>::zero(), &Map::new());
        assert!(<&[Value]>::zero().is_empty());
        assert!(Vec::<i64>::zero().is_empty());
        assert_eq!(<&Value>::zero(), &Value::Null);
    }
}
