use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use oasguard_contract::ResolvedContract;
use oasguard_validation::Parameter;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ContractSummary<'a> {
    version: &'a str,
    paths: usize,
    operations: usize,
    additional_documents: Vec<&'a str>,
}

pub fn print_contract_summary(contract: &ResolvedContract, format: OutputFormat) {
    let summary = ContractSummary {
        version: contract.version().as_str(),
        paths: contract.path_count(),
        operations: contract.operation_count(),
        additional_documents: contract.repository().keys().collect(),
    };

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&summary).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["VERSION", "PATHS", "OPERATIONS", "ADDITIONAL"])
                .add_row(vec![
                    summary.version.to_string(),
                    summary.paths.to_string(),
                    summary.operations.to_string(),
                    if summary.additional_documents.is_empty() {
                        "-".to_string()
                    } else {
                        summary.additional_documents.join(", ")
                    },
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "openapi={} paths={} operations={} additional=[{}]",
                summary.version,
                summary.paths,
                summary.operations,
                summary.additional_documents.join(", ")
            );
        }
    }
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    valid: bool,
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    passthrough_bytes: Option<usize>,
}

pub fn print_parameter(parameter: &Parameter, format: OutputFormat) {
    let output = match parameter {
        Parameter::Value(value) => CheckOutput {
            valid: true,
            kind: "value",
            value: Some(value),
            passthrough_bytes: None,
        },
        Parameter::Binary(bytes) => CheckOutput {
            valid: true,
            kind: "binary",
            value: None,
            passthrough_bytes: Some(bytes.len()),
        },
    };

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&output).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["VALID", "KIND", "RESULT"])
                .add_row(vec![
                    "yes".to_string(),
                    output.kind.to_string(),
                    match parameter {
                        Parameter::Value(value) => value.to_string(),
                        Parameter::Binary(bytes) => {
                            format!("<binary passthrough, {} bytes>", bytes.len())
                        }
                    },
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => match parameter {
            Parameter::Value(value) => println!("valid: {value}"),
            Parameter::Binary(bytes) => {
                println!("valid: <binary passthrough, {} bytes>", bytes.len())
            }
        },
    }
}
