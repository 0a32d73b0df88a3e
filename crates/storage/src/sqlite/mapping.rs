use relic_core::model::{Points, UsedPool};

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn points_from_i64(field: &'static str, v: i64) -> Result<Points, StorageError> {
    Ok(Points::from_halves(u32_from_i64(field, v)?))
}

pub(crate) fn points_to_i64(points: Points) -> i64 {
    i64::from(points.halves())
}

pub(crate) fn used_pool_to_json(used: &UsedPool) -> Result<String, StorageError> {
    serde_json::to_string(used).map_err(ser)
}

pub(crate) fn used_pool_from_json(raw: &str) -> Result<UsedPool, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}
