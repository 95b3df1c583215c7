use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use domohub_domain::device::Device;

use super::{bind_fields, decode_fields, decode_id};
use crate::table::{SqliteQuery, Table};

impl Table for Device {
    const TABLE: &'static str = "devices";

    const COLUMNS: &'static [&'static str] = &[
        "environment_id",
        "gateway_id",
        "name",
        "location",
        "favourite",
        "request",
        "response",
        "run_on_load",
        "show_confirmation",
    ];

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        bind_fields(query, &self.fields)
            .bind(self.request.clone())
            .bind(self.response.clone())
            .bind(self.run_on_load)
            .bind(self.show_confirmation)
    }

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: decode_id(row)?,
            fields: decode_fields(row)?,
            request: row.try_get("request")?,
            response: row.try_get("response")?,
            run_on_load: row.try_get("run_on_load")?,
            show_confirmation: row.try_get("show_confirmation")?,
        })
    }
}
