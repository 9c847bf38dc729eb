//! Format output as JSON documents for automated consumers.
use anyhow::Result;
use serde_json::Value as Json;

use super::ops::Ops;
use super::ops::Responses;
use super::FormatterStrategy;
use crate::accounts::RememberedAccount;
use crate::globals::Globals;

/// Format output as JSON documents for automated consumers.
pub struct JsonFormatter;

impl FormatterStrategy for JsonFormatter {
    fn format(&self, _: &Globals, op: Ops) -> Responses {
        match op {
            Ops::AccountList => Responses::accounts(AccountList::default()),
            Ops::ProjectList | Ops::RevisionList | Ops::SessionList => {
                Responses::records(RecordList::default())
            }
        }
    }
}

/// Collect remembered accounts and emit them as a JSON array.
#[derive(Default)]
struct AccountList {
    entries: Vec<Json>,
}

impl super::AccountList for AccountList {
    fn append(&mut self, entry: &RememberedAccount, default: bool) -> Result<()> {
        let entry = serde_json::json!({
            "hostname": entry.account.hostname,
            "username": entry.account.username,
            "admin": entry.admin,
            "default": default,
        });
        self.entries.push(entry);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let document = serde_json::to_string_pretty(&self.entries)?;
        println!("{}", document);
        Ok(())
    }
}

/// Collect API records and emit them as a JSON array.
#[derive(Default)]
struct RecordList {
    records: Vec<Json>,
}

impl super::RecordList for RecordList {
    fn append(&mut self, record: &Json) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let document = serde_json::to_string_pretty(&self.records)?;
        println!("{}", document);
        Ok(())
    }
}
