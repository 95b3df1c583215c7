use sqlx::sqlite::SqliteRow;

use domohub_domain::scenario::Scenario;

use super::{bind_fields, decode_fields, decode_id};
use crate::table::{SqliteQuery, Table};

// `status` and `enabled` come from the gateway; only the shared fields are stored.
impl Table for Scenario {
    const TABLE: &'static str = "scenarios";

    const COLUMNS: &'static [&'static str] =
        &["environment_id", "gateway_id", "name", "location", "favourite"];

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        bind_fields(query, &self.fields)
    }

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: decode_id(row)?,
            fields: decode_fields(row)?,
            status: None,
            enabled: false,
        })
    }
}
