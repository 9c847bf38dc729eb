//! Instrumented doubles of the session traits for use in unit tests.
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value as Json;

use crate::accounts::Account;
use crate::accounts::AccountResolver;
use crate::accounts::RememberedAccount;

use super::InvalidCredentials;
use super::Prompter;
use super::Session;
use super::SessionFactory;
use super::SessionHandle;

/// Marker error returned by fixtures scripted to fail.
#[derive(thiserror::Error, Debug)]
#[error("scripted fixture failure")]
pub struct FixtureError;

/// In-memory account history recording interactions.
pub struct AccountsFixture {
    state: Arc<Mutex<AccountsState>>,
}

struct AccountsState {
    candidates: Vec<(Account, bool)>,
    remembered: Vec<(Account, bool)>,
    require_hostname: bool,
    resolve_calls: usize,
}

impl AccountsFixture {
    /// Fixture with no remembered accounts.
    pub fn empty() -> AccountsFixture {
        AccountsFixture::with(Vec::new())
    }

    /// Fixture remembering the given accounts, most recently used first.
    pub fn with(candidates: Vec<(Account, bool)>) -> AccountsFixture {
        let state = AccountsState {
            candidates,
            remembered: Vec::new(),
            require_hostname: false,
            resolve_calls: 0,
        };
        let state = Arc::new(Mutex::new(state));
        AccountsFixture { state }
    }

    /// Answer lookups only when a hostname hint is given.
    pub fn require_hostname(self) -> AccountsFixture {
        self.access().require_hostname = true;
        self
    }

    /// Accounts remembered through the fixture, in call order.
    pub fn remembered(&self) -> Vec<(Account, bool)> {
        self.access().remembered.clone()
    }

    /// Number of lookups the fixture served.
    pub fn resolve_calls(&self) -> usize {
        self.access().resolve_calls
    }

    fn access(&self) -> MutexGuard<AccountsState> {
        self.state
            .lock()
            .expect("AccountsFixture state lock poisoned")
    }
}

#[async_trait]
impl AccountResolver for AccountsFixture {
    async fn resolve(
        &self,
        hostname: Option<&str>,
        username: Option<&str>,
        admin: bool,
    ) -> Result<Vec<Account>> {
        let mut state = self.access();
        state.resolve_calls += 1;
        if state.require_hostname && hostname.is_none() {
            return Ok(Vec::new());
        }
        let candidates = state
            .candidates
            .iter()
            .filter(|(_, is_admin)| *is_admin == admin)
            .filter(|(account, _)| {
                hostname.map(|value| account.hostname == value).unwrap_or(true)
            })
            .filter(|(account, _)| {
                username.map(|value| account.username == value).unwrap_or(true)
            })
            .map(|(account, _)| account.clone())
            .collect();
        Ok(candidates)
    }

    async fn remember(&self, account: &Account, admin: bool) -> Result<()> {
        self.access().remembered.push((account.clone(), admin));
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<RememberedAccount>> {
        let entries = self
            .access()
            .candidates
            .iter()
            .map(|(account, admin)| RememberedAccount {
                account: account.clone(),
                admin: *admin,
            })
            .collect();
        Ok(entries)
    }

    async fn forget(&self, hostname: &str, username: Option<&str>) -> Result<usize> {
        let mut state = self.access();
        let before = state.candidates.len();
        state.candidates.retain(|(account, _)| {
            account.hostname != hostname
                || username.map(|value| account.username != value).unwrap_or(false)
        });
        Ok(before - state.candidates.len())
    }
}

/// Prompter answering from a fixed script and recording prompts.
pub struct PrompterFixture {
    state: Arc<Mutex<PrompterState>>,
}

struct PrompterState {
    hostname: String,
    username: String,
    password: String,
    prompts: Vec<String>,
}

impl PrompterFixture {
    /// Fixture answering every prompt with the given values.
    pub fn scripted(hostname: &str, username: &str, password: &str) -> PrompterFixture {
        let state = PrompterState {
            hostname: hostname.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            prompts: Vec::new(),
        };
        let state = Arc::new(Mutex::new(state));
        PrompterFixture { state }
    }

    /// Prompts served so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.access().prompts.clone()
    }

    fn access(&self) -> MutexGuard<PrompterState> {
        self.state
            .lock()
            .expect("PrompterFixture state lock poisoned")
    }
}

impl Prompter for PrompterFixture {
    fn hostname(&self) -> Result<String> {
        let mut state = self.access();
        state.prompts.push("hostname".to_string());
        Ok(state.hostname.clone())
    }

    fn username(&self, admin: bool) -> Result<String> {
        let mut state = self.access();
        let prompt = match admin {
            true => "admin username",
            false => "username",
        };
        state.prompts.push(prompt.to_string());
        Ok(state.username.clone())
    }

    fn password(&self, label: &str) -> Result<String> {
        let mut state = self.access();
        state.prompts.push(format!("password {}", label));
        Ok(state.password.clone())
    }
}

/// Session answering API calls from scripted records.
#[derive(Debug)]
pub struct SessionFixture {
    account: Account,
    connected: bool,
    state: Arc<Mutex<SessionState>>,
}

#[derive(Debug)]
struct SessionState {
    calls: Vec<String>,
    failing: bool,
    impersonated: Vec<String>,
    projects: Vec<Json>,
    revisions: Vec<Json>,
    sessions: Vec<Json>,
}

impl SessionFixture {
    /// Session holding valid credentials for the account.
    pub fn connected(account: &Account) -> SessionFixture {
        SessionFixture::build(account, true)
    }

    /// Session for an attempt that failed to authenticate.
    pub fn unconnected(account: &Account) -> SessionFixture {
        SessionFixture::build(account, false)
    }

    /// Script the records returned by project listing.
    pub fn with_projects(self, projects: Vec<Json>) -> SessionFixture {
        self.access().projects = projects;
        self
    }

    /// Script the records returned by revision listing.
    pub fn with_revisions(self, revisions: Vec<Json>) -> SessionFixture {
        self.access().revisions = revisions;
        self
    }

    /// Script the records returned by session listing.
    pub fn with_sessions(self, sessions: Vec<Json>) -> SessionFixture {
        self.access().sessions = sessions;
        self
    }

    /// Make every API call fail with a [`FixtureError`].
    pub fn failing(self) -> SessionFixture {
        self.access().failing = true;
        self
    }

    /// API calls served so far, in order.
    pub fn api_calls(&self) -> Vec<String> {
        self.access().calls.clone()
    }

    /// Usernames this session was asked to impersonate.
    pub fn impersonated(&self) -> Vec<String> {
        self.access().impersonated.clone()
    }

    fn build(account: &Account, connected: bool) -> SessionFixture {
        let state = SessionState {
            calls: Vec::new(),
            failing: false,
            impersonated: Vec::new(),
            projects: Vec::new(),
            revisions: Vec::new(),
            sessions: Vec::new(),
        };
        SessionFixture {
            account: account.clone(),
            connected,
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn record(&self, call: String) -> Result<()> {
        let mut state = self.access();
        state.calls.push(call);
        if state.failing {
            anyhow::bail!(FixtureError);
        }
        Ok(())
    }

    fn access(&self) -> MutexGuard<SessionState> {
        self.state
            .lock()
            .expect("SessionFixture state lock poisoned")
    }
}

#[async_trait]
impl Session for SessionFixture {
    fn connected(&self) -> bool {
        self.connected
    }

    fn account(&self) -> &Account {
        &self.account
    }

    async fn impersonate(&self, username: &str) -> Result<SessionHandle> {
        self.access().impersonated.push(username.to_string());
        let account = Account {
            hostname: self.account.hostname.clone(),
            username: username.to_string(),
        };
        let session = SessionFixture::connected(&account);
        Ok(Arc::new(session))
    }

    async fn project_list(&self, filter: Option<&str>) -> Result<Vec<Json>> {
        self.record(format!("projects filter={}", filter.unwrap_or("<all>")))?;
        Ok(self.access().projects.clone())
    }

    async fn revision_list(&self, project_id: &str, filter: Option<&str>) -> Result<Vec<Json>> {
        self.record(format!(
            "revisions of {} filter={}",
            project_id,
            filter.unwrap_or("<all>"),
        ))?;
        Ok(self.access().revisions.clone())
    }

    async fn session_list(&self, filter: Option<&str>) -> Result<Vec<Json>> {
        self.record(format!("sessions filter={}", filter.unwrap_or("<all>")))?;
        Ok(self.access().sessions.clone())
    }
}

/// Arguments captured from a [`SessionFactory`] call.
#[derive(Clone, Debug)]
pub struct FactoryCall {
    pub account: Account,
    pub password: Option<String>,
    pub retry: bool,
}

/// Session factory handing out [`SessionFixture`]s per a script.
pub struct FactoryFixture {
    state: Arc<Mutex<FactoryState>>,
}

struct FactoryState {
    user_connects: bool,
    admin_connects: bool,
    reject_credentials: bool,
    failing_sessions: bool,
    projects: Vec<Json>,
    revisions: Vec<Json>,
    sessions: Vec<Json>,
    user_calls: Vec<FactoryCall>,
    admin_calls: Vec<FactoryCall>,
    user_sessions: Vec<Arc<SessionFixture>>,
    admin_sessions: Vec<Arc<SessionFixture>>,
}

impl FactoryFixture {
    /// Factory connecting every attempt.
    pub fn connects() -> FactoryFixture {
        FactoryFixture::build(true, true, false)
    }

    /// Factory soft-failing every attempt into unconnected sessions.
    pub fn refuses() -> FactoryFixture {
        FactoryFixture::build(false, false, false)
    }

    /// Factory soft-failing user attempts but connecting admin attempts.
    pub fn admin_only() -> FactoryFixture {
        FactoryFixture::build(false, true, false)
    }

    /// Factory aborting every attempt with [`InvalidCredentials`].
    pub fn rejects_credentials() -> FactoryFixture {
        FactoryFixture::build(false, false, true)
    }

    /// Script the project records of sessions handed out by the factory.
    pub fn with_projects(self, projects: Vec<Json>) -> FactoryFixture {
        self.access().projects = projects;
        self
    }

    /// Script the revision records of sessions handed out by the factory.
    pub fn with_revisions(self, revisions: Vec<Json>) -> FactoryFixture {
        self.access().revisions = revisions;
        self
    }

    /// Script the session records of sessions handed out by the factory.
    pub fn with_sessions(self, sessions: Vec<Json>) -> FactoryFixture {
        self.access().sessions = sessions;
        self
    }

    /// Make every handed out session fail its API calls.
    pub fn failing_sessions(self) -> FactoryFixture {
        self.access().failing_sessions = true;
        self
    }

    /// Arguments of user session attempts, in order.
    pub fn user_calls(&self) -> Vec<FactoryCall> {
        self.access().user_calls.clone()
    }

    /// Arguments of admin session attempts, in order.
    pub fn admin_calls(&self) -> Vec<FactoryCall> {
        self.access().admin_calls.clone()
    }

    /// Sessions handed out for user attempts, in order.
    pub fn user_sessions(&self) -> Vec<Arc<SessionFixture>> {
        self.access().user_sessions.clone()
    }

    /// Sessions handed out for admin attempts, in order.
    pub fn admin_sessions(&self) -> Vec<Arc<SessionFixture>> {
        self.access().admin_sessions.clone()
    }

    fn build(user_connects: bool, admin_connects: bool, reject: bool) -> FactoryFixture {
        let state = FactoryState {
            user_connects,
            admin_connects,
            reject_credentials: reject,
            failing_sessions: false,
            projects: Vec::new(),
            revisions: Vec::new(),
            sessions: Vec::new(),
            user_calls: Vec::new(),
            admin_calls: Vec::new(),
            user_sessions: Vec::new(),
            admin_sessions: Vec::new(),
        };
        FactoryFixture {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn session(state: &FactoryState, account: &Account, connects: bool) -> Arc<SessionFixture> {
        let session = match connects {
            true => SessionFixture::connected(account),
            false => SessionFixture::unconnected(account),
        };
        let session = session
            .with_projects(state.projects.clone())
            .with_revisions(state.revisions.clone())
            .with_sessions(state.sessions.clone());
        let session = match state.failing_sessions {
            true => session.failing(),
            false => session,
        };
        Arc::new(session)
    }

    fn access(&self) -> MutexGuard<FactoryState> {
        self.state
            .lock()
            .expect("FactoryFixture state lock poisoned")
    }
}

#[async_trait]
impl SessionFactory for FactoryFixture {
    async fn user_session(
        &self,
        account: &Account,
        password: Option<&str>,
        retry: bool,
        _prompter: &Arc<dyn Prompter>,
    ) -> Result<SessionHandle> {
        let mut state = self.access();
        state.user_calls.push(FactoryCall {
            account: account.clone(),
            password: password.map(ToString::to_string),
            retry,
        });
        if state.reject_credentials {
            anyhow::bail!(InvalidCredentials::for_account(account));
        }
        let session = FactoryFixture::session(&state, account, state.user_connects);
        state.user_sessions.push(Arc::clone(&session));
        Ok(session)
    }

    async fn admin_session(
        &self,
        account: &Account,
        password: Option<&str>,
        retry: bool,
        _prompter: &Arc<dyn Prompter>,
    ) -> Result<SessionHandle> {
        let mut state = self.access();
        state.admin_calls.push(FactoryCall {
            account: account.clone(),
            password: password.map(ToString::to_string),
            retry,
        });
        if state.reject_credentials {
            anyhow::bail!(InvalidCredentials::for_account(account));
        }
        let session = FactoryFixture::session(&state, account, state.admin_connects);
        state.admin_sessions.push(Arc::clone(&session));
        Ok(session)
    }
}
