use sqlx::sqlite::SqliteRow;

use domohub_domain::automation::Automation;

use super::{bind_fields, decode_fields, decode_id};
use crate::table::{SqliteQuery, Table};

impl Table for Automation {
    const TABLE: &'static str = "automations";

    const COLUMNS: &'static [&'static str] =
        &["environment_id", "gateway_id", "name", "location", "favourite"];

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        bind_fields(query, &self.fields)
    }

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: decode_id(row)?,
            fields: decode_fields(row)?,
        })
    }
}
