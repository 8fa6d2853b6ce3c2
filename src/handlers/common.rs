//! Lenient request-body helpers shared by the order and inventory handlers.
//!
//! Bodies arrive as free-form JSON; fields are checked for presence and coerced rather than
//! strictly typed.

use axum::{
    extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse,
    response::Response, Json,
};
use serde::Serialize;
use serde_json::Value;

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

/// A value counts as present unless it is absent, `null`, `false`, zero, NaN or `""`.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Looks up `field` and returns it only when it is present in the [`is_truthy`] sense.
pub fn present<'a>(payload: &'a Value, field: &str) -> Option<&'a Value> {
    payload.get(field).filter(|value| is_truthy(Some(value)))
}

/// Request body of an update. A request sent without a JSON content type reads as `{}`;
/// a JSON body that does not parse is still rejected.
pub fn body_or_empty(body: Result<Json<Value>, JsonRejection>) -> Result<Value, Response> {
    match body {
        Ok(Json(payload)) => Ok(payload),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(Value::Object(Default::default())),
        Err(rejection) => Err(rejection.into_response()),
    }
}

/// Best-effort number: numbers pass through, numeric strings are parsed (including
/// `0x`/`0o`/`0b` literals), `true` is 1, a one-element array reads as its element,
/// everything else (including unparseable text and non-finite results) is 0.
pub fn number_or_zero(value: Option<&Value>) -> f64 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_numeric_text(s),
        Some(Value::Bool(true)) => 1.0,
        Some(Value::Array(items)) => match items.as_slice() {
            [] => 0.0,
            [item @ (Value::Number(_) | Value::String(_) | Value::Array(_))] => {
                number_or_zero(Some(item))
            }
            _ => 0.0,
        },
        _ => 0.0,
    };
    if number.is_finite() {
        number
    } else {
        0.0
    }
}

fn parse_numeric_text(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let radix = match trimmed.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    match radix {
        Some(radix) => u64::from_str_radix(&trimmed[2..], radix).map_or(0.0, |n| n as f64),
        None => trimmed.parse::<f64>().unwrap_or(0.0),
    }
}

/// Strings are taken as-is; any other value is kept as its JSON text.
pub fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Reads the leading decimal digits of a path segment ("12", " 12", "+12", "12abc" all
/// give 12). Segments without leading digits match no record.
pub fn parse_record_id(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..digits_end].parse().ok()
}
