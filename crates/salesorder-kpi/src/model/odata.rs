//! # OData v2 wire helpers
//!
//! The sales-order and business-partner services answer in the OData v2 JSON verbose
//! format: every payload is wrapped in `{"d": ...}`, collections carry their rows under
//! `results` and, with `$inlinecount=allpages`, the server-side total under `__count`.
//!
//! Scalar fields are not reliably typed on the wire. Decimals arrive as strings
//! (`"1250.50"`), counts as strings (`"42"`), and timestamps as `/Date(1704412800000)/`.
//! The deserializers here accept every shape seen in practice and fall back to `None`
//! instead of failing the whole page.
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Outer `{"d": ...}` wrapper of every OData v2 response.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub d: T,
}

/// An entity-set response body.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Collection<T> {
    #[serde(default)]
    pub results: Vec<T>,
    #[serde(rename = "__count", default, deserialize_with = "lenient_count")]
    pub count: Option<u64>,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Nested<T> {
    #[serde(default)]
    results: Vec<T>,
}

/// Deserializes an expanded navigation property (`{"results": [...]}`).
///
/// A deferred (non-expanded) property or `null` yields an empty list.
pub fn nested_results<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        Some(value @ Value::Object(_)) if value.get("results").is_some() => {
            Nested::<T>::deserialize(value)
                .map(|nested| nested.results)
                .map_err(serde::de::Error::custom)
        }
        _ => Ok(Vec::new()),
    }
}

/// Deserializes a decimal that may be a JSON number or a numeric string.
pub fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_amount))
}

/// Deserializes `__count`, which OData v2 sends as a string.
pub fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Deserializes an OData timestamp (`/Date(ms)/` or ISO-8601).
pub fn odata_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) => parse_odata_datetime(&raw),
        _ => None,
    })
}

/// Deserializes an optional string, treating `""` as absent.
pub fn non_empty<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()).map(T::from))
}

pub fn parse_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    amount.filter(|a| a.is_finite())
}

/// Parses `/Date(1704412800000)/`, `/Date(1704412800000+0060)/`, an ISO date-time or a
/// plain ISO date. The offset suffix of the `/Date(...)/` form is ignored; the
/// millisecond value is already UTC.
pub fn parse_odata_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Some(inner) = raw.strip_prefix("/Date(").and_then(|r| r.strip_suffix(")/")) {
        let millis_end = inner
            .char_indices()
            .skip(1)
            .find(|(_, c)| *c == '+' || *c == '-')
            .map(|(i, _)| i)
            .unwrap_or(inner.len());
        let millis: i64 = inner[..millis_end].parse().ok()?;
        return DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
