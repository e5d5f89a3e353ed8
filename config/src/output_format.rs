use serde::{
    Deserialize,
    Serialize,
};
use strum::{
    Display,
    EnumIter,
    EnumString,
};

/// How emitted metric records are written to stdout.
#[derive(Debug, Default, Clone, Copy, Display, EnumIter, EnumString, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// Influx line protocol, one line per record.
    #[default]
    Line,
    /// One JSON object per line.
    Json,
    /// A table rendered after each collection run.
    Table,
}
