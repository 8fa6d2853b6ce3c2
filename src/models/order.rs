use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use super::lenient;
use crate::repositories::Record;

/// Status assigned to every new order.
pub const DEFAULT_ORDER_STATUS: &str = "in_preparazione";

/// Table reference as the client sent it: a table number or a free-form label.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TableRef {
    Number(serde_json::Number),
    Label(String),
}

impl TableRef {
    /// Numbers and strings keep their shape; any other value is kept as its JSON text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(n) => TableRef::Number(n.clone()),
            Value::String(s) => TableRef::Label(s.clone()),
            other => TableRef::Label(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for TableRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|value| TableRef::from_json(&value))
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableRef::Number(n) => write!(f, "{}", n),
            TableRef::Label(s) => f.write_str(s),
        }
    }
}

/// A table's order as tracked by kitchen and cash desk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: u64,
    pub table: TableRef,
    #[serde(
        serialize_with = "super::serialize_quantity",
        deserialize_with = "lenient::number"
    )]
    pub covers: f64,
    /// Serving zone ("sala", "pizzeria", "bar"); not validated.
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub area: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub waiter: String,
    /// Free-form; cleared by a status update that carries none.
    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<String>,
    #[serde(with = "super::iso_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub paid: bool,
}

impl Order {
    pub fn new(
        id: u64,
        table: TableRef,
        covers: f64,
        area: Option<String>,
        waiter: String,
    ) -> Self {
        Self {
            id,
            table,
            covers,
            area,
            waiter,
            status: Some(DEFAULT_ORDER_STATUS.to_string()),
            created_at: Utc::now(),
            paid: false,
        }
    }
}

impl Record for Order {
    fn id(&self) -> u64 {
        self.id
    }
}
