//! YAML file backed account history.
use anyhow::Context;
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use slog::debug;
use slog::Logger;
use tokio::fs::File;
use tokio::fs::OpenOptions;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;

use super::Account;
use super::AccountResolver;
use super::RememberedAccount;

/// Default location of the accounts history file.
const DEFAULT_STORE_PATH: &str = "~/.config/stratctl/accounts";

/// Account history persisted to a YAML file.
///
/// The file lists accounts most recently used first.
/// A missing file is an empty history.
pub struct AccountStore {
    logger: Logger,
    path: String,
}

impl AccountStore {
    /// Account history at the default location.
    pub fn new(logger: Logger) -> AccountStore {
        AccountStore::with_path(logger, DEFAULT_STORE_PATH)
    }

    /// Account history at a custom location.
    pub fn with_path<P>(logger: Logger, path: P) -> AccountStore
    where
        P: Into<String>,
    {
        let path = path.into();
        AccountStore { logger, path }
    }

    async fn load(&self) -> Result<AccountsFile> {
        let path = crate::utils::resolve_home(&self.path)?;
        debug!(self.logger, "loading accounts history"; "path" => &path);
        let mut file = match File::open(&path).await {
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(AccountsFile::default());
            }
            result => result.with_context(|| format!("unable to open accounts file {}", path))?,
        };
        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .await
            .with_context(|| format!("unable to read accounts file {}", path))?;
        let accounts = serde_yaml::from_slice(&data)
            .with_context(|| format!("unable to decode accounts file {}", path))?;
        Ok(accounts)
    }

    async fn save(&self, accounts: &AccountsFile) -> Result<()> {
        let path = crate::utils::resolve_home(&self.path)?;
        debug!(self.logger, "saving accounts history"; "path" => &path);
        if let Some(parent) = std::path::Path::new(&path).parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("unable to create accounts directory {}", parent.display()))?;
        }
        let data = serde_yaml::to_string(accounts)
            .context("unable to encode accounts history")?;
        let mut file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&path)
            .await
            .with_context(|| format!("unable to open accounts file {}", path))?;
        file.write_all(data.as_bytes())
            .await
            .with_context(|| format!("unable to write accounts file {}", path))?;
        Ok(())
    }
}

#[async_trait]
impl AccountResolver for AccountStore {
    async fn resolve(
        &self,
        hostname: Option<&str>,
        username: Option<&str>,
        admin: bool,
    ) -> Result<Vec<Account>> {
        let accounts = self.load().await?;
        let accounts = accounts
            .accounts
            .into_iter()
            .filter(|entry| entry.admin == admin)
            .filter(|entry| hostname.map(|value| entry.hostname == value).unwrap_or(true))
            .filter(|entry| username.map(|value| entry.username == value).unwrap_or(true))
            .map(AccountEntry::into_account)
            .collect();
        Ok(accounts)
    }

    async fn remember(&self, account: &Account, admin: bool) -> Result<()> {
        let mut accounts = self.load().await?;
        accounts.accounts.retain(|entry| {
            entry.admin != admin
                || entry.hostname != account.hostname
                || entry.username != account.username
        });
        let entry = AccountEntry {
            hostname: account.hostname.clone(),
            username: account.username.clone(),
            admin,
        };
        accounts.accounts.insert(0, entry);
        self.save(&accounts).await
    }

    async fn entries(&self) -> Result<Vec<RememberedAccount>> {
        let accounts = self.load().await?;
        let entries = accounts
            .accounts
            .into_iter()
            .map(|entry| RememberedAccount {
                admin: entry.admin,
                account: entry.into_account(),
            })
            .collect();
        Ok(entries)
    }

    async fn forget(&self, hostname: &str, username: Option<&str>) -> Result<usize> {
        let mut accounts = self.load().await?;
        let before = accounts.accounts.len();
        accounts.accounts.retain(|entry| {
            entry.hostname != hostname
                || username.map(|value| entry.username != value).unwrap_or(false)
        });
        let dropped = before - accounts.accounts.len();
        if dropped > 0 {
            self.save(&accounts).await?;
        }
        Ok(dropped)
    }
}

/// Schema of the accounts history file.
#[derive(Default, Serialize, Deserialize)]
struct AccountsFile {
    accounts: Vec<AccountEntry>,
}

#[derive(Serialize, Deserialize)]
struct AccountEntry {
    hostname: String,
    username: String,

    #[serde(default)]
    admin: bool,
}

impl AccountEntry {
    fn into_account(self) -> Account {
        Account {
            hostname: self.hostname,
            username: self.username,
        }
    }
}
