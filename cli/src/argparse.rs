use clap::{Args, Parser, Subcommand};
use filterkit_common::FieldType;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "fk",
    about = "Inspect, validate and share filter configurations",
    version,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Field catalog (YAML or JSON) used for labels and validation
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Pick which subcommand to use
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encode a filter document into a shareable string
    Encode(InputArgs),
    /// Decode a shared filter string and print it as JSON
    Decode(DecodeArgs),
    /// Check a filter for structural errors
    Validate(ValidateArgs),
    /// Print a human-readable description of a filter
    Describe(InputArgs),
    /// Print the transport parameters for the search endpoint
    Params(InputArgs),
    /// Build a shareable URL carrying the filter
    Url(UrlArgs),
    /// List the operators available for a field type
    Operators(OperatorsArgs),
    /// List the fields in the catalog
    Fields,
}

#[derive(Args)]
pub struct InputArgs {
    /// Encoded filter string, as found in the `filters` URL parameter
    #[arg(long, conflicts_with = "file")]
    pub filters: Option<String>,

    /// Filter document (JSON or YAML)
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args)]
pub struct DecodeArgs {
    /// Encoded filter string
    pub encoded: String,

    /// Fall back to the empty filter on bad input, like a browser would
    #[arg(long)]
    pub lenient: bool,

    /// Print YAML instead of JSON
    #[arg(long)]
    pub yaml: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Also check fields, operators and values against the catalog
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args)]
pub struct UrlArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Page URL to append the filters parameter to
    #[arg(long)]
    pub base: String,
}

#[derive(Args)]
pub struct OperatorsArgs {
    /// Field type: text, number, date, boolean, select or relationship
    pub field_type: FieldType,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_validate_strict() {
        let cli = Cli::try_parse_from(["fk", "validate", "--filters", "abc", "--strict"]).unwrap();
        match cli.command {
            Commands::Validate(args) => {
                assert!(args.strict);
                assert_eq!(args.input.filters.as_deref(), Some("abc"));
            }
            _ => panic!("expected validate"),
        }
    }

    #[test]
    fn test_filters_and_file_conflict() {
        let result = Cli::try_parse_from([
            "fk", "describe", "--filters", "abc", "--file", "f.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_operators_parses_field_type() {
        let cli = Cli::try_parse_from(["fk", "operators", "number"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Operators(OperatorsArgs {
                field_type: FieldType::Number
            })
        ));
        assert!(Cli::try_parse_from(["fk", "operators", "currency"]).is_err());
    }
}
