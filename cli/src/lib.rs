pub mod input;

use filterkit_common::FilterError;

/// Error type for CLI input failures
#[derive(Debug)]
pub enum CliError {
    MissingInput,
    InvalidFilters(FilterError),
    ConfigLoad(String, FilterError),
    CatalogLoad(FilterError),
    ValidationFailed(usize),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::MissingInput => {
                write!(
                    f,
                    "No filter given. Use --filters <encoded> for a shared filter string or --file <path> for a JSON/YAML filter document."
                )
            }
            CliError::InvalidFilters(e) => {
                write!(
                    f,
                    "Could not decode filter string: {e}\n\nShared links may be truncated when copied. Check that the whole filters= value was pasted."
                )
            }
            CliError::ConfigLoad(path, e) => {
                write!(f, "Failed to load filter document {path}: {e}")
            }
            CliError::CatalogLoad(e) => {
                write!(
                    f,
                    "Failed to load field catalog: {e}\n\nThe catalog must have a top-level `fields` list. Omit --catalog to use the built-in fields."
                )
            }
            CliError::ValidationFailed(count) => {
                write!(f, "Filter is invalid: {count} error(s)")
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::InvalidFilters(e) | CliError::ConfigLoad(_, e) | CliError::CatalogLoad(e) => {
                Some(e)
            }
            CliError::MissingInput | CliError::ValidationFailed(_) => None,
        }
    }
}
