//! [`Table`](crate::table::Table) implementations, one per record type.

mod automation;
mod device;
mod gateway;
mod ipcam;
mod light;
mod scenario;
mod temperature;

use std::str::FromStr;

use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use domohub_domain::automation::Automation;
use domohub_domain::device::Device;
use domohub_domain::id::{EnvironmentId, GatewayId};
use domohub_domain::ipcam::Ipcam;
use domohub_domain::light::Light;
use domohub_domain::record::DomoticFields;
use domohub_domain::scenario::Scenario;
use domohub_domain::temperature::Temperature;

use crate::error::decode_error;
use crate::table::{SqliteQuery, Table};

/// Tables whose rows belong to an environment, in cascade order.
pub const ENVIRONMENT_OWNED: [&str; 6] = [
    Light::TABLE,
    Automation::TABLE,
    Device::TABLE,
    Ipcam::TABLE,
    Temperature::TABLE,
    Scenario::TABLE,
];

pub(crate) fn bind_fields<'q>(query: SqliteQuery<'q>, fields: &DomoticFields) -> SqliteQuery<'q> {
    query
        .bind(i64::from(fields.environment_id.value()))
        .bind(fields.gateway_id.to_string())
        .bind(fields.name.clone())
        .bind(fields.location.clone())
        .bind(fields.favourite)
}

pub(crate) fn decode_fields(row: &SqliteRow) -> Result<DomoticFields, sqlx::Error> {
    let environment_id: i64 = row.try_get("environment_id")?;
    let gateway_id: String = row.try_get("gateway_id")?;

    Ok(DomoticFields {
        environment_id: decode_environment_id(environment_id)?,
        gateway_id: GatewayId::from_str(&gateway_id).map_err(decode_error)?,
        name: row.try_get("name")?,
        location: row.try_get("location")?,
        favourite: row.try_get("favourite")?,
    })
}

pub(crate) fn decode_id<I>(row: &SqliteRow) -> Result<I, sqlx::Error>
where
    I: FromStr,
    I::Err: std::error::Error + Send + Sync + 'static,
{
    let id: String = row.try_get("id")?;
    I::from_str(&id).map_err(decode_error)
}

pub(crate) fn decode_environment_id(value: i64) -> Result<EnvironmentId, sqlx::Error> {
    u32::try_from(value)
        .map(EnvironmentId::new)
        .map_err(decode_error)
}
