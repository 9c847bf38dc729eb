//! Abstract how information is presented to users to enable different interaction styles.
//!
//! For example:
//!
//! - The default `Human` formatter aims to provide output suitable for an interactive session
//!   where people issue commands and review results.
//! - The `JSON` formatter aims to provide output suitable for an automated script.
use anyhow::Result;
use clap::Args;
use clap::ValueEnum;
use serde_json::Value as Json;

use crate::accounts::RememberedAccount;
use crate::globals::Globals;

mod human;
mod json;

pub mod ops;

/// Present a list of remembered accounts to the user.
pub trait AccountList {
    /// Append an account entry into the list being formatted.
    fn append(&mut self, entry: &RememberedAccount, default: bool) -> Result<()>;

    /// Handle the now complete list of accounts and emit it to standard output.
    fn finish(&mut self) -> Result<()>;
}

/// Present a list of API records to the user.
pub trait RecordList {
    /// Append a record into the list being formatted.
    fn append(&mut self, record: &Json) -> Result<()>;

    /// Handle the now complete list of records and emit it to standard output.
    fn finish(&mut self) -> Result<()>;
}

/// List of available output formats.
#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub enum FormatId {
    /// Optimise output for viewing by humans.
    #[default]
    Human,

    /// Output information as JSON documents.
    Json,
}

/// Configure output formatting for `stratctl`.
#[derive(Args, Debug)]
pub struct FormatOpts {
    /// Select the format to use for output.
    #[arg(
        long = "format",
        global = true,
        env = "SCTL_FORMAT",
        default_value_t,
        value_enum
    )]
    pub format: FormatId,
}

/// Present information to users in their preferred format.
pub struct Formatter {
    /// Runtime strategy to execute formatting operations with.
    strategy: Box<dyn FormatterStrategy>,
}

impl Formatter {
    /// Execute the specified formatting operation.
    pub fn format<O>(&self, globals: &Globals, op: O) -> O::Response
    where
        O: self::ops::FormatOp,
    {
        let op = op.into();
        let result = self.strategy.format(globals, op);
        O::Response::from(result)
    }
}

/// Interface to implement user output formatting.
pub trait FormatterStrategy {
    /// Execute the requested formatting operation.
    fn format(&self, globals: &Globals, op: self::ops::Ops) -> self::ops::Responses;
}

/// Instantiate a formatter based on CLI configuration.
pub fn select(format: &FormatOpts) -> Formatter {
    let strategy: Box<dyn FormatterStrategy> = match format.format {
        FormatId::Human => Box::new(self::human::HumanFormatter),
        FormatId::Json => Box::new(self::json::JsonFormatter),
    };
    Formatter { strategy }
}
