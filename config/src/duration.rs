//! (De)serializes [`Duration`] as a human readable string such as `"5m"` or `"1h 30m"`.

use serde::{
    Deserialize,
    Deserializer,
    Serializer,
};
use std::time::Duration;

pub(crate) fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&humantime::format_duration(*duration).to_string())
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    humantime::parse_duration(value.trim()).map_err(serde::de::Error::custom)
}
