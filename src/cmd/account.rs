//! Inspect or trim the history of accounts used to reach clusters.
use anyhow::Result;
use clap::Args;
use clap::Parser;
use clap::Subcommand;

use crate::formatter::ops::AccountListOp;
use crate::globals::Globals;

/// Inspect or trim the history of accounts used to reach clusters.
#[derive(Debug, Parser)]
pub struct AccountCli {
    /// Select the `stratctl account` command to run.
    #[command(subcommand)]
    pub command: AccountCmd,
}

/// Select the `stratctl account` command to run.
#[derive(Debug, Subcommand)]
pub enum AccountCmd {
    /// Drop remembered accounts for a hostname.
    Forget(ForgetOpts),

    /// List remembered accounts, most recently used first.
    List,
}

/// Drop remembered accounts for a hostname.
#[derive(Args, Debug)]
pub struct ForgetOpts {
    /// Hostname to drop remembered accounts for.
    pub hostname: String,

    /// Only drop the remembered account for this username.
    #[arg(long)]
    pub username: Option<String>,
}

/// Execute the selected `stratctl account` command.
pub async fn run(globals: &Globals, cmd: &AccountCli) -> Result<i32> {
    match &cmd.command {
        AccountCmd::Forget(opts) => forget(globals, opts).await,
        AccountCmd::List => list(globals).await,
    }
}

/// Drop remembered accounts for a hostname.
async fn forget(globals: &Globals, opts: &ForgetOpts) -> Result<i32> {
    let dropped = globals
        .accounts
        .forget(&opts.hostname, opts.username.as_deref())
        .await?;
    if dropped == 0 {
        println!("No remembered accounts match {}.", opts.hostname);
        return Ok(1);
    }
    println!("Dropped {} remembered account(s) for {}.", dropped, opts.hostname);
    Ok(0)
}

/// List remembered accounts.
async fn list(globals: &Globals) -> Result<i32> {
    let entries = globals.accounts.entries().await?;
    let mut accounts = globals.formatter.format(globals, AccountListOp);

    // The first entry for each API is the default for invocations without hints.
    let mut seen_admin = false;
    let mut seen_user = false;
    for entry in &entries {
        let seen = match entry.admin {
            true => &mut seen_admin,
            false => &mut seen_user,
        };
        let default = !*seen;
        *seen = true;
        accounts.append(entry, default)?;
    }

    accounts.finish()?;
    Ok(0)
}
