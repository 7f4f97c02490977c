//! Purpose: Hold top-level CLI command dispatch for `jsonq`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: `get` prints exactly one JSON document on success.
//! Invariants: `--or-zero` never fails after input decoding succeeds.

use serde::Serialize;

use jsonq::api::FromValue;

use super::*;

pub(super) fn dispatch_command(command: Command, color_mode: ColorMode) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "jsonq", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Get {
            input,
            path,
            shape,
            or_zero,
            compact,
        } => {
            let query = load_query(&input)?;
            let path = path.to_path();
            tracing::debug!(%path, ?shape, or_zero, "running get");
            let value = shaped_value(&query, path, shape, or_zero)?;
            emit_json(&value, compact, color_mode);
            Ok(RunOutcome::ok())
        }
        Command::Exists { input, path } => {
            let query = load_query(&input)?;
            match query.get(path.to_path()) {
                Ok(_) => {
                    emit_json(&Value::Bool(true), true, color_mode);
                    Ok(RunOutcome::ok())
                }
                Err(err) if err.kind().is_resolution() => {
                    tracing::debug!(kind = ?err.kind(), "path does not exist");
                    emit_json(&Value::Bool(false), true, color_mode);
                    Ok(RunOutcome::with_code(to_exit_code(err.kind())))
                }
                Err(err) => Err(err),
            }
        }
    }
}

fn shaped_value(
    query: &JsonQuery<'_>,
    path: Path,
    shape: ShapeCli,
    or_zero: bool,
) -> Result<Value, Error> {
    match shape {
        ShapeCli::Any => extract_json::<&Value>(query, path, or_zero),
        ShapeCli::Bool => extract_json::<bool>(query, path, or_zero),
        ShapeCli::Float => extract_json::<f64>(query, path, or_zero),
        ShapeCli::Int => extract_json::<i32>(query, path, or_zero),
        ShapeCli::Int64 => extract_json::<i64>(query, path, or_zero),
        ShapeCli::String => extract_json::<&str>(query, path, or_zero),
        ShapeCli::Object => extract_json::<&Map<String, Value>>(query, path, or_zero),
        ShapeCli::Array => extract_json::<&[Value]>(query, path, or_zero),
        // Silent typed arrays keep the prefix coerced before a bad element.
        ShapeCli::Strings if or_zero => encode_json(query.as_array_of_strings(path)),
        ShapeCli::Ints if or_zero => encode_json(query.as_array_of_ints(path)),
        ShapeCli::Floats if or_zero => encode_json(query.as_array_of_floats(path)),
        ShapeCli::Bools if or_zero => encode_json(query.as_array_of_bools(path)),
        ShapeCli::Objects if or_zero => encode_json(query.as_array_of_objects(path)),
        ShapeCli::Arrays | ShapeCli::Matrix if or_zero => {
            encode_json(query.as_array_of_arrays(path))
        }
        ShapeCli::Strings => encode_json(query.array_of_strings(path)?),
        ShapeCli::Ints => encode_json(query.array_of_ints(path)?),
        ShapeCli::Floats => encode_json(query.array_of_floats(path)?),
        ShapeCli::Bools => encode_json(query.array_of_bools(path)?),
        ShapeCli::Objects => encode_json(query.array_of_objects(path)?),
        ShapeCli::Arrays | ShapeCli::Matrix => encode_json(query.array_of_arrays(path)?),
    }
}

fn extract_json<'q, T>(query: &'q JsonQuery<'_>, path: Path, or_zero: bool) -> Result<Value, Error>
where
    T: FromValue<'q> + Serialize,
{
    let value: T = if or_zero {
        query.extract_or_zero(path)
    } else {
        query.extract(path)?
    };
    encode_json(value)
}

fn encode_json(value: impl Serialize) -> Result<Value, Error> {
    serde_json::to_value(value).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to encode result as json")
            .with_source(err)
    })
}
