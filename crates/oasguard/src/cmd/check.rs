use std::fs;

use bytes::Bytes;
use oasguard_mediatype::ValidationContext;
use oasguard_validation::BodyValidatorConfig;

use crate::cmd::CheckArgs;
use crate::exit::{io_error, validator_error, CliResult, SUCCESS};
use crate::output::{print_parameter, OutputFormat};

pub fn run(args: CheckArgs, format: OutputFormat) -> CliResult<i32> {
    let contract = super::resolve::resolve_contract(&args.contract, &args.additional)?;
    let body = read_body(&args)?;

    let context = if args.response {
        ValidationContext::Response
    } else {
        ValidationContext::Request
    };
    let content = if args.response {
        contract.response_content(&args.path, &args.method, &args.status)
    } else {
        contract.request_content(&args.path, &args.method)
    };

    let validator = BodyValidatorConfig::new(context);
    let parameter = validator
        .validate(&contract, content, &args.content_type, body)
        .map_err(|err| validator_error("body validation failed", err))?;

    print_parameter(&parameter, format);
    Ok(SUCCESS)
}

fn read_body(args: &CheckArgs) -> CliResult<Bytes> {
    if let Some(path) = &args.body_file {
        return fs::read(path)
            .map(Bytes::from)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    if let Some(data) = &args.data {
        return Ok(Bytes::copy_from_slice(data.as_bytes()));
    }
    Ok(Bytes::new())
}
