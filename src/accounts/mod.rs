//! Account history for credential resolution.
//!
//! Successful connections are remembered so later invocations can default
//! to the most recently used account instead of prompting again.
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

mod store;

pub use self::store::AccountStore;

/// A user on a specific cluster.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct Account {
    /// Hostname of the cluster.
    pub hostname: String,

    /// Username on that cluster.
    pub username: String,
}

/// A remembered account along with the API it authenticated against.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct RememberedAccount {
    /// The remembered account.
    pub account: Account,

    /// True when the account authenticated against the administrative API.
    pub admin: bool,
}

/// Interface to the history of accounts used in past invocations.
#[async_trait]
pub trait AccountResolver: Send + Sync {
    /// Remembered accounts matching the given hints, most recently used first.
    ///
    /// A `None` hint matches any value; `admin` always constrains.
    async fn resolve(
        &self,
        hostname: Option<&str>,
        username: Option<&str>,
        admin: bool,
    ) -> Result<Vec<Account>>;

    /// Move an account to the front of the history.
    async fn remember(&self, account: &Account, admin: bool) -> Result<()>;

    /// All remembered accounts, most recently used first.
    async fn entries(&self) -> Result<Vec<RememberedAccount>>;

    /// Drop accounts for a hostname, optionally only for one username.
    ///
    /// Returns the number of accounts dropped.
    async fn forget(&self, hostname: &str, username: Option<&str>) -> Result<usize>;
}
