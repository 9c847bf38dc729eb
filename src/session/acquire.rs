//! Resolve accounts and acquire authenticated sessions for commands.
use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use slog::debug;

use crate::accounts::Account;
use crate::context::Invocation;
use crate::context::Role;
use crate::globals::Globals;

use super::NotConnected;
use super::SessionHandle;

/// Resolve the account to authenticate against a role's API.
///
/// Values already known to the invocation win, then the most recently used
/// matching account from history, then interactive prompts. The resolved
/// values are recorded on the invocation so the same account is returned
/// without prompting for the rest of the command.
pub async fn get_account(
    globals: &Globals,
    invocation: &mut Invocation,
    role: Role,
) -> Result<Account> {
    if let (Some(hostname), Some(username)) = (invocation.hostname(), invocation.username(role)) {
        return Ok(Account {
            hostname: hostname.to_string(),
            username: username.to_string(),
        });
    }

    let admin = role == Role::Admin;
    let candidate = resolve_first(
        globals,
        invocation.hostname(),
        invocation.username(role),
        admin,
    )
    .await?;
    let account = match candidate {
        Some(account) => account,
        None => prompt_account(globals, invocation, role).await?,
    };
    invocation.set_hostname(account.hostname.clone())?;
    invocation.set_username(role, account.username.clone())?;
    Ok(account)
}

/// Acquire a session for the requested API, reusing the invocation cache.
///
/// Returns `None` when the attempt did not yield a connected session.
/// Failed attempts are cached like successful ones so a command never
/// retries a connection on its own; pass `reconnect` to force a new attempt.
pub async fn cluster(
    globals: &Globals,
    invocation: &mut Invocation,
    reconnect: bool,
    admin: bool,
    retry: bool,
) -> Result<Option<SessionHandle>> {
    match admin {
        true => admin_cluster(globals, invocation, reconnect, retry).await,
        false => user_cluster(globals, invocation, reconnect, retry).await,
    }
}

/// Acquire a session and dispatch a single API call on it.
///
/// Errors raised by the call itself propagate to the caller unchanged.
pub async fn cluster_call<T, F, Fut>(
    globals: &Globals,
    invocation: &mut Invocation,
    admin: bool,
    call: F,
) -> Result<T>
where
    F: FnOnce(SessionHandle) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let session = cluster(globals, invocation, false, admin, true).await?;
    let session = match session {
        Some(session) => session,
        None => {
            let role = match admin {
                true => Role::Admin,
                false => Role::User,
            };
            // Acquisition recorded the resolved values on the invocation
            // so this lookup cannot prompt again.
            let account = get_account(globals, invocation, role).await?;
            anyhow::bail!(NotConnected::for_account(&account));
        }
    };
    call(session).await
}

/// Acquire a user API session, falling back to impersonation when enabled.
async fn user_cluster(
    globals: &Globals,
    invocation: &mut Invocation,
    reconnect: bool,
    retry: bool,
) -> Result<Option<SessionHandle>> {
    if !reconnect {
        if let Some(cached) = invocation.session(Role::User) {
            debug!(globals.logger, "reusing cached session outcome"; "role" => Role::User.label());
            return Ok(cached);
        }
    }
    let account = get_account(globals, invocation, Role::User).await?;
    let impersonate = invocation.impersonate();
    let password = invocation.password(Role::User).map(ToString::to_string);

    // A failed direct login must not prompt for a password the user may not
    // have when impersonation is the intended path to a session.
    let direct_retry = retry && !impersonate;
    let mut session = globals
        .factory
        .user_session(&account, password.as_deref(), direct_retry, &globals.prompter)
        .await?;
    if !session.connected() && retry && impersonate {
        eprintln!("Impersonating {}@{}...", account.username, account.hostname);
        let admin_session = admin_cluster(globals, invocation, reconnect, true).await?;
        if let Some(admin_session) = admin_session {
            session = admin_session.impersonate(&account.username).await?;
        }
    }
    finish(globals, invocation, Role::User, &account, session).await
}

/// Acquire an administrative API session.
async fn admin_cluster(
    globals: &Globals,
    invocation: &mut Invocation,
    reconnect: bool,
    retry: bool,
) -> Result<Option<SessionHandle>> {
    if !reconnect {
        if let Some(cached) = invocation.session(Role::Admin) {
            debug!(globals.logger, "reusing cached session outcome"; "role" => Role::Admin.label());
            return Ok(cached);
        }
    }
    let account = get_account(globals, invocation, Role::Admin).await?;
    let password = invocation.password(Role::Admin).map(ToString::to_string);
    let session = globals
        .factory
        .admin_session(&account, password.as_deref(), retry, &globals.prompter)
        .await?;
    finish(globals, invocation, Role::Admin, &account, session).await
}

/// Cache and report the outcome of a session attempt.
async fn finish(
    globals: &Globals,
    invocation: &mut Invocation,
    role: Role,
    account: &Account,
    session: SessionHandle,
) -> Result<Option<SessionHandle>> {
    let outcome = match session.connected() {
        true => Some(session),
        false => None,
    };
    invocation.cache_session(role, outcome.clone());
    match &outcome {
        Some(_) => {
            eprintln!("Connected as {}@{}.", account.username, account.hostname);
            debug!(
                globals.logger, "session connected";
                "role" => role.label(),
                "hostname" => account.hostname.as_str(),
                "username" => account.username.as_str(),
            );
            globals.accounts.remember(account, role == Role::Admin).await?;
        }
        None => {
            eprintln!(
                "No active connection for {}@{}.",
                account.username, account.hostname,
            );
        }
    }
    Ok(outcome)
}

/// First remembered account matching the hints, most recently used wins.
async fn resolve_first(
    globals: &Globals,
    hostname: Option<&str>,
    username: Option<&str>,
    admin: bool,
) -> Result<Option<Account>> {
    let candidates = globals.accounts.resolve(hostname, username, admin).await?;
    Ok(candidates.into_iter().next())
}

/// Complete an account interactively, hostname before username.
async fn prompt_account(
    globals: &Globals,
    invocation: &Invocation,
    role: Role,
) -> Result<Account> {
    let admin = role == Role::Admin;
    let (hostname, candidate) = match invocation.hostname() {
        Some(hostname) => (hostname.to_string(), None),
        None => {
            let hostname = prompt_hostname(globals).await?;
            // History may know the username once the hostname is given.
            let candidate =
                resolve_first(globals, Some(&hostname), invocation.username(role), admin).await?;
            (hostname, candidate)
        }
    };
    if let Some(account) = candidate {
        return Ok(account);
    }
    let username = match invocation.username(role) {
        Some(username) => username.to_string(),
        None => prompt_username(globals, admin).await?,
    };
    Ok(Account { hostname, username })
}

async fn prompt_hostname(globals: &Globals) -> Result<String> {
    let prompter = Arc::clone(&globals.prompter);
    let hostname = tokio::task::spawn_blocking(move || prompter.hostname()).await??;
    Ok(hostname)
}

async fn prompt_username(globals: &Globals, admin: bool) -> Result<String> {
    let prompter = Arc::clone(&globals.prompter);
    let username = tokio::task::spawn_blocking(move || prompter.username(admin)).await??;
    Ok(username)
}
