use crate::CliError;
use filterkit_common::serializer::try_decode;
use filterkit_common::{FieldCatalog, FilterConfig, FilterError, OperatorRegistry};
use std::path::Path;

const DEFAULT_CATALOG_YAML: &str = include_str!("../default_fields.yaml");

pub fn default_catalog() -> Result<FieldCatalog, CliError> {
    FieldCatalog::from_yaml_str(DEFAULT_CATALOG_YAML).map_err(CliError::CatalogLoad)
}

pub fn load_catalog(path: Option<&Path>) -> Result<FieldCatalog, CliError> {
    match path {
        Some(path) => FieldCatalog::load(path).map_err(CliError::CatalogLoad),
        None => default_catalog(),
    }
}

/// Parse a filter config document; `.json` as JSON, anything else as YAML
pub fn parse_config_file(
    path: &Path,
    content: &str,
    operators: &OperatorRegistry,
) -> Result<FilterConfig, FilterError> {
    let config: FilterConfig = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(content)?,
        _ => serde_yaml_ng::from_str(content)?,
    };
    let config = config.resolve_values(operators);
    config.check_unique_ids()?;
    Ok(config)
}

/// Load the config to work on from an encoded string or a file.
/// Unlike the URL boundary, problems are reported instead of swallowed.
pub fn load_config(
    filters: Option<&str>,
    file: Option<&Path>,
    operators: &OperatorRegistry,
) -> Result<FilterConfig, CliError> {
    match (filters, file) {
        (Some(encoded), _) => try_decode(encoded.trim(), operators).map_err(CliError::InvalidFilters),
        (None, Some(path)) => {
            let content = fs_err::read_to_string(path)
                .map_err(|e| CliError::ConfigLoad(path.display().to_string(), e.into()))?;
            parse_config_file(path, &content, operators)
                .map_err(|e| CliError::ConfigLoad(path.display().to_string(), e))
        }
        (None, None) => Err(CliError::MissingInput),
    }
}
