//! Authenticate to a Stratus cluster.
use anyhow::Result;
use clap::Parser;

use crate::context::Invocation;
use crate::globals::Globals;
use crate::session::cluster;

/// Authenticate to a cluster and remember the account on success.
#[derive(Debug, Parser)]
pub struct LoginCli {
    /// Authenticate against the administrative API instead of the user API.
    #[arg(long)]
    pub admin: bool,
}

/// Execute the `stratctl login` command.
///
/// A fresh session is always established, even when an invocation already
/// carries one for the requested API.
pub async fn run(globals: &Globals, invocation: &mut Invocation, cmd: &LoginCli) -> Result<i32> {
    let session = cluster(globals, invocation, true, cmd.admin, true).await?;
    match session {
        Some(_) => Ok(0),
        None => Ok(1),
    }
}
