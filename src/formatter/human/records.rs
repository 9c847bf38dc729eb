//! Format API records returned by list operations.
use anyhow::Result;
use serde_json::Value as Json;

use crate::utils::field_or_dash;

/// Format a list of API records into a table.
pub struct RecordList {
    fields: &'static [&'static str],
    table: comfy_table::Table,
}

impl RecordList {
    /// Table of project records.
    pub fn projects() -> RecordList {
        RecordList::with_columns(
            vec!["NAME", "OWNER", "ID", "UPDATED"],
            &["name", "owner", "id", "updated"],
        )
    }

    /// Table of revision records.
    pub fn revisions() -> RecordList {
        RecordList::with_columns(vec!["NAME", "ID", "UPDATED"], &["name", "id", "updated"])
    }

    /// Table of session records.
    pub fn sessions() -> RecordList {
        RecordList::with_columns(
            vec!["NAME", "OWNER", "ID", "PROJECT"],
            &["name", "owner", "id", "project_id"],
        )
    }

    fn with_columns(header: Vec<&'static str>, fields: &'static [&'static str]) -> RecordList {
        let mut table = comfy_table::Table::new();
        table.set_header(header);
        RecordList { fields, table }
    }
}

impl crate::formatter::RecordList for RecordList {
    fn append(&mut self, record: &Json) -> Result<()> {
        let row: Vec<&str> = self
            .fields
            .iter()
            .map(|field| field_or_dash(record, field))
            .collect();
        self.table.add_row(row);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        println!("{}", self.table);
        Ok(())
    }
}
