use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod check;
pub mod resolve;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a contract and print a summary.
    Resolve(ResolveArgs),
    /// Validate a body against one operation of a contract.
    Check(CheckArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Resolve(args) => resolve::run(args, format),
        Command::Check(args) => check::run(args, format),
    }
}

/// Parses an `--additional key=path` argument.
fn parse_additional(raw: &str) -> Result<(String, PathBuf), String> {
    match raw.split_once('=') {
        Some((key, path)) if !key.is_empty() && !path.is_empty() => {
            Ok((key.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected key=path, got '{raw}'")),
    }
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Path to the primary contract document (JSON or YAML).
    pub contract: PathBuf,
    /// Additional referenced document as key=path. Repeatable.
    #[arg(long, value_name = "KEY=PATH", value_parser = parse_additional)]
    pub additional: Vec<(String, PathBuf)>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the primary contract document (JSON or YAML).
    pub contract: PathBuf,
    /// Additional referenced document as key=path. Repeatable.
    #[arg(long, value_name = "KEY=PATH", value_parser = parse_additional)]
    pub additional: Vec<(String, PathBuf)>,
    /// Path template of the operation, e.g. /pets.
    #[arg(long)]
    pub path: String,
    /// HTTP method of the operation.
    #[arg(long, default_value = "post")]
    pub method: String,
    /// Raw content type of the body.
    #[arg(long)]
    pub content_type: String,
    /// Read the body from a file.
    #[arg(long, conflicts_with = "data")]
    pub body_file: Option<PathBuf>,
    /// Body passed inline.
    #[arg(long, conflicts_with = "body_file")]
    pub data: Option<String>,
    /// Validate against a response content map instead of the request's.
    #[arg(long)]
    pub response: bool,
    /// Response status to validate against when --response is set.
    #[arg(long, default_value = "200")]
    pub status: String,
}
