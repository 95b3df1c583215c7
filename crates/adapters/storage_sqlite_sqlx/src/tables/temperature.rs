use sqlx::sqlite::SqliteRow;

use domohub_domain::temperature::Temperature;

use super::{bind_fields, decode_fields, decode_id};
use crate::table::{SqliteQuery, Table};

impl Table for Temperature {
    const TABLE: &'static str = "temperatures";

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
