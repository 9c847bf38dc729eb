//! CLI interface for the Stratus cluster client.
use clap::Parser;
use clap::Subcommand;

pub mod account;
pub mod login;
pub mod project;
pub mod session;

use crate::context::LoginOpt;
use crate::formatter::FormatOpts;
use crate::logging::LogOpt;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI definition for the stratctl binary.
#[derive(Debug, Parser)]
#[command(about)]
#[command(propagate_version = true)]
#[command(version = VERSION)]
pub struct Cli {
    /// Stratus cluster selection and credential arguments.
    #[command(flatten)]
    pub login: LoginOpt,

    /// Select the `stratctl` command to run.
    #[command(subcommand)]
    pub command: Command,

    /// Configure how `stratctl` output is formatted.
    #[command(flatten)]
    pub format: FormatOpts,

    /// Configure `stratctl` logging.
    #[command(flatten)]
    pub log: LogOpt,
}

/// Select the `stratctl` command to run.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect or trim the history of accounts used to reach clusters.
    Account(account::AccountCli),

    /// Authenticate to a cluster and remember the account on success.
    Login(login::LoginCli),

    /// Inspect projects hosted on a cluster.
    Project(project::ProjectCli),

    /// Inspect interactive sessions running on a cluster.
    Session(session::SessionCli),
}
