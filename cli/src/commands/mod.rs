mod catalog;
mod filter;

use crate::argparse::{Cli, Commands};
pub use catalog::{handle_fields_command, handle_operators_command};
pub use filter::{
    handle_decode_command, handle_describe_command, handle_encode_command,
    handle_params_command, handle_url_command, handle_validate_command,
};
use filterkit::input::load_catalog;
use filterkit_common::OperatorRegistry;

pub fn handle_command(cli: Cli) -> anyhow::Result<()> {
    let operators = OperatorRegistry::standard();
    // Only commands that read labels or field types touch the catalog
    let catalog = || load_catalog(cli.catalog.as_deref());

    match cli.command {
        Commands::Encode(args) => handle_encode_command(args, &operators),
        Commands::Decode(args) => handle_decode_command(args, &operators),
        Commands::Validate(args) => handle_validate_command(args, &catalog()?, &operators),
        Commands::Describe(args) => handle_describe_command(args, &catalog()?, &operators),
        Commands::Params(args) => handle_params_command(args, &operators),
        Commands::Url(args) => handle_url_command(args, &operators),
        Commands::Operators(args) => handle_operators_command(args, &operators),
        Commands::Fields => handle_fields_command(&catalog()?),
    }
}
