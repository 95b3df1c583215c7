use std::str::FromStr;

use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use domohub_domain::ipcam::{Ipcam, StreamType};

use super::{bind_fields, decode_fields, decode_id};
use crate::error::decode_error;
use crate::table::{SqliteQuery, Table};

impl Table for Ipcam {
    const TABLE: &'static str = "ipcams";

    const COLUMNS: &'static [&'static str] = &[
        "environment_id",
        "gateway_id",
        "name",
        "location",
        "favourite",
        "url",
        "stream_type",
        "username",
        "password",
    ];

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        bind_fields(query, &self.fields)
            .bind(self.url.clone())
            .bind(self.stream_type.as_str())
            .bind(self.username.clone())
            .bind(self.password.clone())
    }

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let stream_type: String = row.try_get("stream_type")?;

        Ok(Self {
            id: decode_id(row)?,
            fields: decode_fields(row)?,
            url: row.try_get("url")?,
            stream_type: StreamType::from_str(&stream_type).map_err(decode_error)?,
            username: row.try_get("username")?,
            password: row.try_get("password")?,
        })
    }
}
