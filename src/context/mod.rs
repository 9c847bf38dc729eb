//! Per-invocation state shared across commands.
//!
//! Command line options seed an [`Invocation`] once at startup.
//! Prompts and session acquisition fill in the blanks as the command runs
//! so the user is never asked for the same value twice.
use std::collections::BTreeMap;

use clap::Args;

use crate::session::SessionHandle;

/// Credential and connection options accepted by every command.
#[derive(Args, Debug, Clone)]
pub struct LoginOpt {
    /// Hostname of the Stratus cluster to connect to.
    #[arg(long, global = true, env = "SCTL_HOSTNAME")]
    pub hostname: Option<String>,

    /// Username to authenticate with.
    #[arg(long, global = true, env = "SCTL_USERNAME")]
    pub username: Option<String>,

    /// Password to authenticate with.
    #[arg(long, global = true, env = "SCTL_PASSWORD")]
    pub password: Option<String>,

    /// Username to authenticate to the administrative API with.
    #[arg(long, global = true, env = "SCTL_ADMIN_USERNAME")]
    pub admin_username: Option<String>,

    /// Password to authenticate to the administrative API with.
    #[arg(long, global = true, env = "SCTL_ADMIN_PASSWORD")]
    pub admin_password: Option<String>,

    /// Obtain user sessions by impersonation over the administrative API.
    #[arg(long, global = true, env = "SCTL_IMPERSONATE")]
    pub impersonate: bool,
}

/// API a session authenticates against.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum Role {
    /// Regular user API.
    User,

    /// Administrative API.
    Admin,
}

impl Role {
    /// Short label for connection messages and prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "cluster",
            Role::Admin => "acluster",
        }
    }
}

/// Error raised when an option is given two different values in one invocation.
#[derive(thiserror::Error, Debug)]
#[error("conflicting values for --{option}: {first}, {second}")]
pub struct OptionConflict {
    option: &'static str,
    first: String,
    second: String,
}

impl OptionConflict {
    /// The option that received conflicting values.
    pub fn option(&self) -> &str {
        self.option
    }
}

/// Mutable state accumulated while a single command runs.
///
/// Credentials start out as whatever the command line provided and
/// are completed from account history and interactive prompts.
/// Sessions are cached per role, remembering failed attempts as well
/// so a command never retries a connection behind the user's back.
pub struct Invocation {
    hostname: Option<String>,
    username: Option<String>,
    password: Option<String>,
    admin_username: Option<String>,
    admin_password: Option<String>,
    impersonate: bool,
    sessions: BTreeMap<Role, Option<SessionHandle>>,
}

impl Invocation {
    /// Seed an invocation from command line options.
    pub fn from_opts(opts: &LoginOpt) -> Invocation {
        Invocation {
            hostname: opts.hostname.clone(),
            username: opts.username.clone(),
            password: opts.password.clone(),
            admin_username: opts.admin_username.clone(),
            admin_password: opts.admin_password.clone(),
            impersonate: opts.impersonate,
            sessions: BTreeMap::new(),
        }
    }

    /// Hostname the invocation targets, if known yet.
    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    /// Username for the given role, if known yet.
    pub fn username(&self, role: Role) -> Option<&str> {
        match role {
            Role::User => self.username.as_deref(),
            Role::Admin => self.admin_username.as_deref(),
        }
    }

    /// Password for the given role, if known yet.
    pub fn password(&self, role: Role) -> Option<&str> {
        match role {
            Role::User => self.password.as_deref(),
            Role::Admin => self.admin_password.as_deref(),
        }
    }

    /// Whether user sessions should be obtained by impersonation.
    pub fn impersonate(&self) -> bool {
        self.impersonate
    }

    /// Record the hostname, rejecting a second different value.
    pub fn set_hostname(&mut self, value: String) -> Result<(), OptionConflict> {
        set_checked(&mut self.hostname, "hostname", value)
    }

    /// Record the username for a role, rejecting a second different value.
    pub fn set_username(&mut self, role: Role, value: String) -> Result<(), OptionConflict> {
        match role {
            Role::User => set_checked(&mut self.username, "username", value),
            Role::Admin => set_checked(&mut self.admin_username, "admin-username", value),
        }
    }

    /// Cached session outcome for a role.
    ///
    /// The outer `Option` distinguishes "never attempted" from a cached
    /// attempt; the inner `Option` is `None` for attempts that failed to
    /// connect.
    pub fn session(&self, role: Role) -> Option<Option<SessionHandle>> {
        self.sessions.get(&role).cloned()
    }

    /// Cache the outcome of a session acquisition attempt.
    pub fn cache_session(&mut self, role: Role, session: Option<SessionHandle>) {
        self.sessions.insert(role, session);
    }
}

/// Fill a slot, treating a repeat of the same value as a no-op.
fn set_checked(
    slot: &mut Option<String>,
    option: &'static str,
    value: String,
) -> Result<(), OptionConflict> {
    match slot {
        Some(current) if *current == value => Ok(()),
        Some(current) => Err(OptionConflict {
            option,
            first: current.clone(),
            second: value,
        }),
        None => {
            *slot = Some(value);
            Ok(())
        }
    }
}
