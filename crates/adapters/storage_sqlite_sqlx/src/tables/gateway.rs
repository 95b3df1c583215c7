use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use domohub_domain::gateway::Gateway;

use super::decode_id;
use crate::error::decode_error;
use crate::table::{SqliteQuery, Table};

impl Table for Gateway {
    const TABLE: &'static str = "gateways";

    const COLUMNS: &'static [&'static str] = &["host", "port", "password"];

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.host.clone())
            .bind(i64::from(self.port))
            .bind(self.password.clone())
    }

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let port: i64 = row.try_get("port")?;

        Ok(Self {
            id: decode_id(row)?,
            host: row.try_get("host")?,
            port: u16::try_from(port).map_err(decode_error)?,
            password: row.try_get("password")?,
        })
    }
}
