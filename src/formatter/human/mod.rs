//! Format output for easy consumption by people interacting with `stratctl`.
use super::ops::Ops;
use super::ops::Responses;
use super::FormatterStrategy;
use crate::globals::Globals;

mod account;
mod records;

/// Format output for easy consumption by people interacting with `stratctl`.
pub struct HumanFormatter;

impl FormatterStrategy for HumanFormatter {
    fn format(&self, _: &Globals, op: Ops) -> Responses {
        match op {
            Ops::AccountList => Responses::accounts(self::account::AccountList::new()),
            Ops::ProjectList => Responses::records(self::records::RecordList::projects()),
            Ops::RevisionList => Responses::records(self::records::RecordList::revisions()),
            Ops::SessionList => Responses::records(self::records::RecordList::sessions()),
        }
    }
}
