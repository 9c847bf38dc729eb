//! Format `stratctl` account history entries.
use anyhow::Result;

use crate::accounts::RememberedAccount;

/// Format a list of remembered accounts into a table.
#[derive(Default)]
pub struct AccountList {
    table: comfy_table::Table,
}

impl AccountList {
    pub fn new() -> AccountList {
        let mut table = comfy_table::Table::new();
        table.set_header(vec!["DEFAULT", "HOSTNAME", "USERNAME", "API"]);
        AccountList { table }
    }
}

impl crate::formatter::AccountList for AccountList {
    fn append(&mut self, entry: &RememberedAccount, default: bool) -> Result<()> {
        let api = match entry.admin {
            true => "admin",
            false => "user",
        };
        self.table.add_row(vec![
            if default { "*" } else { "" },
            &entry.account.hostname,
            &entry.account.username,
            api,
        ]);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        println!("{}", self.table);
        Ok(())
    }
}
