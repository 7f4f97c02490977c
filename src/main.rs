//! Purpose: `jsonq` CLI entry point and command dispatch.
//! Role: Binary crate root; parses args, decodes input, runs queries, emits JSON on stdout.
//! Invariants: Results are emitted as JSON on stdout (pretty or compact by flag).
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
#![allow(clippy::result_large_err)]
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{
    Args, CommandFactory, Parser, Subcommand, ValueEnum, ValueHint,
    error::ErrorKind as ClapErrorKind,
};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use std::error::Error as StdError;
use tracing_subscriber::EnvFilter;

mod color_json;
mod command_dispatch;

use color_json::{Layout, render_json};
use jsonq::api::{Error, ErrorKind, JsonQuery, Path, to_exit_code};
use jsonq::json::parse;

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse_from(std::env::args_os().collect::<Vec<OsString>>()) {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(clap_error_summary(&err))
                        .with_hint("Try `jsonq --help`."),
                    ColorMode::Auto,
                ));
            }
        },
    };

    let color_mode = cli.color;
    command_dispatch::dispatch_command(cli.command, color_mode).map_err(|err| (err, color_mode))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

#[derive(Parser)]
#[command(
    name = "jsonq",
    version,
    about = "Query JSON documents by path with typed results",
    long_about = None,
    after_help = r#"EXAMPLES
  $ echo '{"a":{"b":[1,2,3]}}' | jsonq get a.b[1]
  2
  $ jsonq --file doc.json get --as ints a.b
  $ jsonq --file doc.json get --segments 'key.with.dots' 0
  $ jsonq --file doc.json exists a.c

PATHS
  A single PATH uses dotted/bracketed syntax: `items[0].name`.
  Several PATH values (or --segments) are taken verbatim, one segment each.
  Segments that are non-negative integers index arrays; anything else is an object key."#,
    arg_required_else_help = true
)]
struct Cli {
    #[arg(
        long,
        default_value = "auto",
        help = "Colorize JSON output",
        global = true
    )]
    color: ColorMode,
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ShapeCli {
    Any,
    Bool,
    Float,
    Int,
    Int64,
    String,
    Object,
    Array,
    Strings,
    Ints,
    Floats,
    Bools,
    Objects,
    Arrays,
    Matrix,
}

#[derive(Args, Debug)]
struct InputArgs {
    #[arg(
        long,
        short = 'f',
        help = "Read JSON from a file instead of stdin",
        value_hint = ValueHint::FilePath
    )]
    file: Option<PathBuf>,
    #[arg(long, help = "Accept any top-level JSON value (default: object only)")]
    any_root: bool,
}

#[derive(Args, Debug)]
struct PathArgs {
    #[arg(help = "Path (`a.b[2]`) or, with several values, pre-split segments")]
    path: Vec<String>,
    #[arg(long, help = "Treat PATH values as verbatim segments even when there is one")]
    segments: bool,
}

impl PathArgs {
    fn to_path(&self) -> Path {
        match self.path.as_slice() {
            [] => Path::root(),
            [single] if !self.segments => Path::parse(single),
            many => Path::from_segments(many),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    #[command(
        about = "Resolve a path and print the value as JSON",
        after_help = r#"EXAMPLES
  $ jsonq get name
  $ jsonq get --as int count
  $ jsonq get --as strings --or-zero tags"#
    )]
    Get {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        path: PathArgs,
        #[arg(long = "as", value_name = "SHAPE", default_value = "any", help = "Coerce the result to this shape")]
        shape: ShapeCli,
        #[arg(long, help = "Print the shape's zero value (or a typed array's coerced prefix) instead of failing")]
        or_zero: bool,
        #[arg(long, help = "Emit single-line JSON")]
        compact: bool,
    },
    #[command(
        about = "Check whether a path resolves to a non-null value",
        long_about = r#"Print `true` or `false`.

Exits 0 when the path resolves, 3 when it does not."#
    )]
    Exists {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        path: PathArgs,
    },
    #[command(
        arg_required_else_help = true,
        about = "Generate shell completions",
        after_help = r#"EXAMPLES
  $ jsonq completion bash > ~/.local/share/bash-completion/completions/jsonq
  $ jsonq completion zsh > ~/.zfunc/_jsonq
  $ jsonq completion fish > ~/.config/fish/completions/jsonq.fish"#
    )]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

fn load_query(input: &InputArgs) -> Result<JsonQuery<'static>, Error> {
    match &input.file {
        Some(path) => {
            let file = File::open(path).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message(format!("failed to open {}", path.display()))
                    .with_hint("Check the --file path.")
                    .with_source(err)
            })?;
            decode_query(file, input.any_root, &path.display().to_string())
        }
        None => decode_query(io::stdin().lock(), input.any_root, "stdin"),
    }
}

fn decode_query<R: io::Read>(
    reader: R,
    any_root: bool,
    context: &str,
) -> Result<JsonQuery<'static>, Error> {
    if any_root {
        let value: Value = parse::from_reader(reader, context)?;
        return Ok(JsonQuery::from_value(value));
    }
    let map: Map<String, Value> = parse::from_reader(reader, context)?;
    Ok(JsonQuery::from_value(Value::Object(map)))
}

fn emit_json(value: &Value, compact: bool, color_mode: ColorMode) {
    let use_color = color_mode.use_color(io::stdout().is_terminal());
    let layout = if compact { Layout::Compact } else { Layout::Pretty };
    println!("{}", render_json(value, layout, use_color));
}

#[derive(Clone, Copy)]
enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, color_mode.use_color(is_tty)));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(err.message_text()));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(segment) = err.segment() {
        inner.insert("segment".to_string(), json!(segment));
    }
    if let Some(index) = err.index() {
        inner.insert("index".to_string(), json!(index));
    }
    if let Some(shape) = err.shape() {
        inner.insert("shape".to_string(), json!(shape));
    }
    if let Some(actual) = err.actual() {
        inner.insert("actual".to_string(), json!(actual));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        err.message_text()
    ));

    if let Some(hint) = err.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(segment) = err.segment() {
        lines.push(format!(
            "{} {segment}",
            colorize_label("segment:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(actual) = err.actual() {
        lines.push(format!(
            "{} {actual}",
            colorize_label("got:", use_color, AnsiColor::Yellow)
        ));
    }

    let causes = error_causes(err);
    if let Some(cause) = causes.first() {
        lines.push(format!(
            "{} {cause}",
            colorize_label("caused by:", use_color, AnsiColor::Yellow)
        ));
    }

    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}
