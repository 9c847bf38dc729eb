//! Inspect interactive sessions running on a cluster.
use anyhow::Result;
use clap::Args;
use clap::Parser;
use clap::Subcommand;

use crate::context::Invocation;
use crate::formatter::ops::SessionListOp;
use crate::globals::Globals;
use crate::identifier::Identifier;
use crate::session::cluster_call;
use crate::utils::merge_filters;

/// Inspect interactive sessions running on a cluster.
#[derive(Debug, Parser)]
pub struct SessionCli {
    /// Select the `stratctl session` command to run.
    #[command(subcommand)]
    pub command: SessionCmd,
}

/// Select the `stratctl session` command to run.
#[derive(Debug, Subcommand)]
pub enum SessionCmd {
    /// List sessions matching an optional reference.
    List(ListOpts),
}

/// List sessions matching an optional reference.
#[derive(Args, Debug)]
pub struct ListOpts {
    /// Reference selecting the sessions to list, `[owner/][name/][id]`.
    ///
    /// A project-shaped ID selects the sessions of that project.
    pub ident: Option<Identifier>,

    /// Additional `key=value` conditions to filter sessions with.
    #[arg(long = "filter")]
    pub filter: Vec<String>,
}

/// Execute the selected `stratctl session` command.
pub async fn run(globals: &Globals, invocation: &mut Invocation, cmd: &SessionCli) -> Result<i32> {
    match &cmd.command {
        SessionCmd::List(opts) => list(globals, invocation, opts).await,
    }
}

/// List sessions matching the request.
async fn list(globals: &Globals, invocation: &mut Invocation, opts: &ListOpts) -> Result<i32> {
    let reference = opts.ident.clone().unwrap_or_default();
    let filter = merge_filters(reference.project_filter(true), &opts.filter);
    let records = cluster_call(globals, invocation, false, move |session| async move {
        session.session_list(filter.as_deref()).await
    })
    .await?;

    let mut sessions = globals.formatter.format(globals, SessionListOp);
    for record in &records {
        sessions.append(record)?;
    }
    sessions.finish()?;
    Ok(0)
}
