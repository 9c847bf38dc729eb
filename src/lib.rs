//! Inspect and interact with Stratus clusters from a Command Line Interface.
use anyhow::Result;
use clap::Parser;

mod accounts;
mod apiclient;
mod cmd;
mod context;
mod formatter;
mod globals;
mod identifier;
mod logging;
mod session;
mod utils;

use self::cmd::Cli;
use self::context::Invocation;
use self::globals::Globals;

// Re-export errors so main can provide more accurate messages.
pub use self::apiclient::ApiNotFound;
pub use self::context::OptionConflict;
pub use self::identifier::InvalidIdentifier;
pub use self::session::InvalidCredentials;
pub use self::session::NotConnected;

/// Initialise the stratctl process and invoke a command implementation.
pub async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let globals = Globals::initialise(cli).await?;
    let mut invocation = Invocation::from_opts(&globals.cli.login);

    match &globals.cli.command {
        cmd::Command::Account(cmd) => cmd::account::run(&globals, cmd).await,
        cmd::Command::Login(cmd) => cmd::login::run(&globals, &mut invocation, cmd).await,
        cmd::Command::Project(cmd) => cmd::project::run(&globals, &mut invocation, cmd).await,
        cmd::Command::Session(cmd) => cmd::session::run(&globals, &mut invocation, cmd).await,
    }
}
