use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use domohub_domain::light::Light;

use super::{bind_fields, decode_fields, decode_id};
use crate::table::{SqliteQuery, Table};

impl Table for Light {
    const TABLE: &'static str = "lights";

    const COLUMNS: &'static [&'static str] = &[
        "environment_id",
        "gateway_id",
        "name",
        "location",
        "favourite",
        "dimmer",
    ];

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        bind_fields(query, &self.fields).bind(self.dimmer)
    }

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: decode_id(row)?,
            fields: decode_fields(row)?,
            dimmer: row.try_get("dimmer")?,
        })
    }
}
