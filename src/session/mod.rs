//! Authenticated sessions against a Stratus cluster.
//!
//! Sessions are acquired once per invocation and role, completing missing
//! credentials from account history and interactive prompts along the way.
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value as Json;

use crate::accounts::Account;

mod acquire;
mod prompt;

#[cfg(test)]
pub mod fixture;

pub use self::acquire::cluster;
pub use self::acquire::cluster_call;
pub use self::acquire::get_account;
pub use self::prompt::TerminalPrompter;

/// Shared handle to an acquired session.
pub type SessionHandle = Arc<dyn Session>;

/// An authentication attempt against a cluster, connected or not.
///
/// Unconnected sessions exist so a failed attempt can be cached and
/// reported without retrying; they answer no API calls.
#[async_trait]
pub trait Session: Send + Sync + std::fmt::Debug {
    /// True when the session holds valid credentials.
    fn connected(&self) -> bool;

    /// Account the session authenticated (or failed to authenticate) as.
    fn account(&self) -> &Account;

    /// Derive a user session for another username over the administrative API.
    async fn impersonate(&self, username: &str) -> Result<SessionHandle>;

    /// Project records matching an optional filter expression.
    async fn project_list(&self, filter: Option<&str>) -> Result<Vec<Json>>;

    /// Revision records of a project matching an optional filter expression.
    async fn revision_list(&self, project_id: &str, filter: Option<&str>) -> Result<Vec<Json>>;

    /// Session records matching an optional filter expression.
    async fn session_list(&self, filter: Option<&str>) -> Result<Vec<Json>>;
}

/// Strategy to authenticate sessions against a cluster.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Attempt a user API session.
    ///
    /// Without a password and with `retry` unset the attempt soft-fails
    /// into an unconnected session; with `retry` set the password is
    /// prompted for. Rejected credentials are a hard error either way.
    async fn user_session(
        &self,
        account: &Account,
        password: Option<&str>,
        retry: bool,
        prompter: &Arc<dyn Prompter>,
    ) -> Result<SessionHandle>;

    /// Attempt an administrative API session, same contract as user sessions.
    async fn admin_session(
        &self,
        account: &Account,
        password: Option<&str>,
        retry: bool,
        prompter: &Arc<dyn Prompter>,
    ) -> Result<SessionHandle>;
}

/// Interactive source for credentials missing from options and history.
///
/// Methods block on user input and run from `spawn_blocking`.
pub trait Prompter: Send + Sync {
    /// Ask for the hostname of the cluster to connect to.
    fn hostname(&self) -> Result<String>;

    /// Ask for the username to authenticate with.
    fn username(&self, admin: bool) -> Result<String>;

    /// Ask for the password of `label`, rendered as `user@host`.
    fn password(&self, label: &str) -> Result<String>;
}

/// Error raised when the cluster rejects the provided credentials.
#[derive(thiserror::Error, Debug)]
#[error("invalid credentials for {username}@{hostname}")]
pub struct InvalidCredentials {
    hostname: String,
    username: String,
}

impl InvalidCredentials {
    /// Create an error for the account the cluster rejected.
    pub fn for_account(account: &Account) -> InvalidCredentials {
        InvalidCredentials {
            hostname: account.hostname.clone(),
            username: account.username.clone(),
        }
    }
}

/// Error raised when an operation needs a session but none could connect.
#[derive(thiserror::Error, Debug)]
#[error("no active connection for {username}@{hostname}")]
pub struct NotConnected {
    hostname: String,
    username: String,
}

impl NotConnected {
    /// Create an error for the account that could not connect.
    pub fn for_account(account: &Account) -> NotConnected {
        NotConnected {
            hostname: account.hostname.clone(),
            username: account.username.clone(),
        }
    }

    /// Hostname of the cluster that could not be reached.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }
}
