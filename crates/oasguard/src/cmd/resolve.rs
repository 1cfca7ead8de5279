use oasguard_contract::{ContractConfig, ResolvedContract};

use crate::cmd::ResolveArgs;
use crate::exit::{contract_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_contract_summary, OutputFormat};

pub fn run(args: ResolveArgs, format: OutputFormat) -> CliResult<i32> {
    let contract = resolve_contract(&args.contract, &args.additional)?;
    print_contract_summary(&contract, format);
    Ok(SUCCESS)
}

/// Builds the configuration and runs the async resolution to completion.
pub(crate) fn resolve_contract(
    contract: &std::path::Path,
    additional: &[(String, std::path::PathBuf)],
) -> CliResult<ResolvedContract> {
    let mut config = ContractConfig::new()
        .primary_path(contract)
        .map_err(|err| contract_error("invalid configuration", err))?;
    for (key, path) in additional {
        config = config
            .additional_path(key.clone(), path.clone())
            .map_err(|err| contract_error("invalid configuration", err))?;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| CliError::new(INTERNAL, format!("failed to start runtime: {err}")))?;
    runtime
        .block_on(oasguard_contract::resolve(config))
        .map_err(|err| contract_error("contract resolution failed", err))
}
