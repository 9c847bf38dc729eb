//! Operations offered by a `stratctl` formatter interface.
use self::sealed::SealFormatOp;

/// Internal trait to support ergonomic formatting operations.
pub trait FormatOp: Into<Ops> + SealFormatOp {
    /// Type returned by the matching format operation.
    type Response: From<Responses>;
}

/// All known operations that must be implemented by formatters.
pub enum Ops {
    /// Request a formatter to emit account history lists.
    AccountList,

    /// Request a formatter to emit project record lists.
    ProjectList,

    /// Request a formatter to emit revision record lists.
    RevisionList,

    /// Request a formatter to emit session record lists.
    SessionList,
}

/// All known responses from format operations.
pub enum Responses {
    /// Return an object to format a list of accounts.
    AccountList(Box<dyn super::AccountList>),

    /// Return an object to format a list of API records.
    RecordList(Box<dyn super::RecordList>),
}

impl Responses {
    /// Wrap an account list formatter.
    pub fn accounts<L>(list: L) -> Responses
    where
        L: super::AccountList + 'static,
    {
        Responses::AccountList(Box::new(list))
    }

    /// Wrap a record list formatter.
    pub fn records<L>(list: L) -> Responses
    where
        L: super::RecordList + 'static,
    {
        Responses::RecordList(Box::new(list))
    }
}

// --- Operation & return types -- //
/// Request a formatter to emit account history lists.
pub struct AccountListOp;

/// Request a formatter to emit project record lists.
pub struct ProjectListOp;

/// Request a formatter to emit revision record lists.
pub struct RevisionListOp;

/// Request a formatter to emit session record lists.
pub struct SessionListOp;

/// Private module to seal implementation details.
mod sealed {
    /// Super-trait to seal the [`FormatOp`](super::FormatOp) trait.
    pub trait SealFormatOp {}
}

// --- Implement FormatOp and other traits on types for transparent operations --- //
impl SealFormatOp for AccountListOp {}
impl From<AccountListOp> for Ops {
    fn from(_: AccountListOp) -> Self {
        Self::AccountList
    }
}
impl FormatOp for AccountListOp {
    type Response = Box<dyn super::AccountList>;
}

impl SealFormatOp for ProjectListOp {}
impl From<ProjectListOp> for Ops {
    fn from(_: ProjectListOp) -> Self {
        Self::ProjectList
    }
}
impl FormatOp for ProjectListOp {
    type Response = Box<dyn super::RecordList>;
}

impl SealFormatOp for RevisionListOp {}
impl From<RevisionListOp> for Ops {
    fn from(_: RevisionListOp) -> Self {
        Self::RevisionList
    }
}
impl FormatOp for RevisionListOp {
    type Response = Box<dyn super::RecordList>;
}

impl SealFormatOp for SessionListOp {}
impl From<SessionListOp> for Ops {
    fn from(_: SessionListOp) -> Self {
        Self::SessionList
    }
}
impl FormatOp for SessionListOp {
    type Response = Box<dyn super::RecordList>;
}

// --- Implement Responses conversions on return types for transparent operations --- //
impl From<Responses> for Box<dyn super::AccountList> {
    fn from(value: Responses) -> Self {
        match value {
            Responses::AccountList(value) => value,
            _ => panic!("unexpected response type for formatter operation"),
        }
    }
}
impl From<Responses> for Box<dyn super::RecordList> {
    fn from(value: Responses) -> Self {
        match value {
            Responses::RecordList(value) => value,
            _ => panic!("unexpected response type for formatter operation"),
        }
    }
}
