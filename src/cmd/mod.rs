//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`], [`validate`], or [`health`]. Each handler
//! lives in its own submodule.

pub mod health;
pub mod run;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::SpecgateError;

pub async fn dispatch(cli: Cli) -> Result<(), SpecgateError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(args).await,
        Some(Commands::Validate(ref args)) => validate::execute(args).await,
        Some(Commands::Health(args)) => health::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    let commit = env!("SPECGATE_GIT_SHORT");
    println!(
        "\n  specgate v{version} ({commit}) \u{2014} OpenAPI spec server and API gateway\n\n  \
         No command provided. To get started:\n\n    \
         specgate run                      Serve ./data/specs on port 8080\n    \
         specgate run -s ./specs           Serve a specific specs directory\n    \
         specgate validate ./specs         Check spec documents without starting\n    \
         specgate --help                   See all commands and options\n"
    );
}
