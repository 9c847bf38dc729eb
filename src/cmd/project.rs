//! Inspect projects hosted on a cluster.
use anyhow::Result;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use serde_json::Value as Json;

use crate::context::Invocation;
use crate::formatter::ops::ProjectListOp;
use crate::formatter::ops::RevisionListOp;
use crate::globals::Globals;
use crate::identifier::Identifier;
use crate::session::cluster_call;
use crate::utils::merge_filters;

/// Inspect projects hosted on a cluster.
#[derive(Debug, Parser)]
pub struct ProjectCli {
    /// Select the `stratctl project` command to run.
    #[command(subcommand)]
    pub command: ProjectCmd,
}

/// Select the `stratctl project` command to run.
#[derive(Debug, Subcommand)]
pub enum ProjectCmd {
    /// List projects matching an optional reference.
    List(ListOpts),

    /// List revisions of the project matching a reference.
    Revisions(RevisionsOpts),
}

/// List projects matching an optional reference.
#[derive(Args, Debug)]
pub struct ListOpts {
    /// Reference selecting the projects to list, `[owner/][name/][id]`.
    pub ident: Option<Identifier>,

    /// Additional `key=value` conditions to filter projects with.
    #[arg(long = "filter")]
    pub filter: Vec<String>,
}

/// List revisions of the project matching a reference.
#[derive(Args, Debug)]
pub struct RevisionsOpts {
    /// Reference selecting the project, with an optional `:revision` suffix.
    pub ident: Identifier,
}

/// Execute the selected `stratctl project` command.
pub async fn run(globals: &Globals, invocation: &mut Invocation, cmd: &ProjectCli) -> Result<i32> {
    match &cmd.command {
        ProjectCmd::List(opts) => list(globals, invocation, opts).await,
        ProjectCmd::Revisions(opts) => revisions(globals, invocation, opts).await,
    }
}

/// List projects matching the request.
async fn list(globals: &Globals, invocation: &mut Invocation, opts: &ListOpts) -> Result<i32> {
    let reference = opts.ident.clone().unwrap_or_default();
    let filter = merge_filters(reference.project_filter(false), &opts.filter);
    let records = cluster_call(globals, invocation, false, move |session| async move {
        session.project_list(filter.as_deref()).await
    })
    .await?;

    let mut projects = globals.formatter.format(globals, ProjectListOp);
    for record in &records {
        projects.append(record)?;
    }
    projects.finish()?;
    Ok(0)
}

/// List revisions of the single project matching the reference.
async fn revisions(
    globals: &Globals,
    invocation: &mut Invocation,
    opts: &RevisionsOpts,
) -> Result<i32> {
    let record = resolve_project(globals, invocation, &opts.ident).await?;
    let project = Identifier::from_record(&record, true)?;
    let filter = opts.ident.revision_filter();
    let records = cluster_call(globals, invocation, false, move |session| async move {
        session.revision_list(&project.id, filter.as_deref()).await
    })
    .await?;

    let mut revisions = globals.formatter.format(globals, RevisionListOp);
    for record in &records {
        revisions.append(record)?;
    }
    revisions.finish()?;
    Ok(0)
}

/// Find the one project a reference points at.
async fn resolve_project(
    globals: &Globals,
    invocation: &mut Invocation,
    ident: &Identifier,
) -> Result<Json> {
    let filter = ident.project_filter(false);
    let mut records = cluster_call(globals, invocation, false, move |session| async move {
        session.project_list(filter.as_deref()).await
    })
    .await?;
    match records.len() {
        0 => anyhow::bail!("no project matches {}", ident.display(true)),
        1 => Ok(records.remove(0)),
        _ => anyhow::bail!("multiple projects match {}", ident.display(true)),
    }
}
