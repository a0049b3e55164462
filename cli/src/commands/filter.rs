use crate::argparse::{DecodeArgs, InputArgs, UrlArgs, ValidateArgs};
use anyhow::Context;
use filterkit::input::load_config;
use filterkit::CliError;
use filterkit_common::serializer::try_decode;
use filterkit_common::{
    convert_filters_to_query_params, create_filter_description, decode, encode,
    has_valid_conditions, to_url_query, validate, validate_against, FieldCatalog, FilterConfig,
    OperatorRegistry,
};

fn load(args: &InputArgs, operators: &OperatorRegistry) -> Result<FilterConfig, CliError> {
    load_config(args.filters.as_deref(), args.file.as_deref(), operators)
}

pub fn handle_encode_command(args: InputArgs, operators: &OperatorRegistry) -> anyhow::Result<()> {
    let config = load(&args, operators)?;
    match shareable(&config) {
        Some(encoded) => println!("{}", encoded),
        None => {
            tracing::warn!("Nothing to encode: the filter has no complete conditions");
            println!();
        }
    }
    Ok(())
}

fn shareable(config: &FilterConfig) -> Option<String> {
    has_valid_conditions(config).then(|| encode(config))
}

pub fn handle_decode_command(args: DecodeArgs, operators: &OperatorRegistry) -> anyhow::Result<()> {
    let encoded = args.encoded.trim();
    let config = if args.lenient {
        decode(encoded, operators)
    } else {
        try_decode(encoded, operators).map_err(CliError::InvalidFilters)?
    };

    let output = if args.yaml {
        serde_yaml_ng::to_string(&config).context("Failed to render YAML")?
    } else {
        serde_json::to_string_pretty(&config).context("Failed to render JSON")?
    };
    println!("{}", output.trim_end());
    Ok(())
}

pub fn handle_validate_command(
    args: ValidateArgs,
    catalog: &FieldCatalog,
    operators: &OperatorRegistry,
) -> anyhow::Result<()> {
    let config = load(&args.input, operators)?;
    let result = if args.strict {
        validate_against(&config, catalog, operators)
    } else {
        validate(&config)
    };

    if result.is_valid {
        println!("Filter is valid");
        return Ok(());
    }
    for error in &result.errors {
        println!("{}", error);
    }
    Err(CliError::ValidationFailed(result.errors.len()).into())
}

pub fn handle_describe_command(
    args: InputArgs,
    catalog: &FieldCatalog,
    operators: &OperatorRegistry,
) -> anyhow::Result<()> {
    let config = load(&args, operators)?;
    println!("{}", create_filter_description(&config, catalog));
    Ok(())
}

pub fn handle_params_command(args: InputArgs, operators: &OperatorRegistry) -> anyhow::Result<()> {
    let config = load(&args, operators)?;
    let params = convert_filters_to_query_params(&config);
    println!(
        "{}",
        serde_json::to_string_pretty(&params).context("Failed to render query params")?
    );
    Ok(())
}

pub fn handle_url_command(args: UrlArgs, operators: &OperatorRegistry) -> anyhow::Result<()> {
    let config = load(&args.input, operators)?;
    println!("{}", append_query(&args.base, &to_url_query(&config)));
    Ok(())
}

fn append_query(base: &str, query: &str) -> String {
    if query.is_empty() {
        return base.to_string();
    }
    let separator = if !base.contains('?') {
        "?"
    } else if base.ends_with('?') || base.ends_with('&') {
        ""
    } else {
        "&"
    };
    format!("{}{}{}", base, separator, query)
}
