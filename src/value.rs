/// LiveGrid Cell Values and Records
///
/// A `CellValue` is the scalar (or nested) value stored under one field of a
/// row. Rows themselves are opaque to the engine: anything implementing
/// [`Record`] can be filtered, searched and sorted.
///
/// Every value has a *string form* (its `Display` output) used by substring
/// matching and by the fallback sort comparison.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A single cell value.
///
/// Deserialization is untagged: JSON strings always become `Text`, so dates
/// arriving as JSON must be converted by the caller if date-aware sorting is
/// wanted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    /// Nested arrays or objects
    Json(JsonValue),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// True for `Null` and for empty text. Filters with an empty value are
    /// treated as "no filter".
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// True if the value is natively numeric (not parsed from text).
    pub fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Int(_) | CellValue::Float(_))
    }

    /// True if the value natively carries an instant.
    pub fn is_temporal(&self) -> bool {
        matches!(self, CellValue::Date(_) | CellValue::Timestamp(_))
    }

    /// Numeric view of the value.
    ///
    /// Integers and floats convert directly; text converts when it parses as
    /// a finite number. Everything else is `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Int(v) => Some(*v as f64),
            CellValue::Float(v) if !v.is_nan() => Some(*v),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// The instant a date or timestamp refers to. Dates map to midnight UTC.
    pub fn as_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            CellValue::Date(d) => d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()),
            CellValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Like [`as_instant`](Self::as_instant), but also parses ISO-8601 text
    /// (`YYYY-MM-DD` or RFC 3339). Used when a date filter meets a text cell.
    pub fn coerce_instant(&self) -> Option<DateTime<Utc>> {
        if let Some(instant) = self.as_instant() {
            return Some(instant);
        }
        let text = self.as_text()?.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    /// The string form used for matching and fallback ordering.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Text(s) => Cow::Borrowed(s.as_str()),
            other => Cow::Owned(other.to_string()),
        }
    }

    /// Lowercased string form.
    pub fn to_folded(&self) -> String {
        self.to_text().to_lowercase()
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            CellValue::Null => JsonValue::Null,
            CellValue::Bool(b) => JsonValue::Bool(*b),
            CellValue::Int(v) => JsonValue::from(*v),
            CellValue::Float(v) => serde_json::Number::from_f64(*v)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            CellValue::Text(s) => JsonValue::String(s.clone()),
            CellValue::Date(_) | CellValue::Timestamp(_) => JsonValue::String(self.to_string()),
            CellValue::Json(v) => v.clone(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.pad(""),
            CellValue::Bool(b) => f.pad(if *b { "true" } else { "false" }),
            CellValue::Int(v) => f.pad(&v.to_string()),
            CellValue::Float(v) => f.pad(&v.to_string()),
            CellValue::Text(s) => f.pad(s),
            CellValue::Date(d) => f.pad(&d.format("%Y-%m-%d").to_string()),
            CellValue::Timestamp(ts) => f.pad(&ts.to_rfc3339()),
            CellValue::Json(v) => f.pad(&v.to_string()),
        }
    }
}

impl From<&JsonValue> for CellValue {
    fn from(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => CellValue::Null,
            JsonValue::Bool(b) => CellValue::Bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => CellValue::Int(i),
                None => n.as_f64().map(CellValue::Float).unwrap_or(CellValue::Null),
            },
            JsonValue::String(s) => CellValue::Text(s.clone()),
            nested => CellValue::Json(nested.clone()),
        }
    }
}

impl From<JsonValue> for CellValue {
    fn from(value: JsonValue) -> Self {
        CellValue::from(&value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Int(value as i64)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Int(value as i64)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(value: DateTime<Utc>) -> Self {
        CellValue::Timestamp(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Null)
    }
}

/// The default row shape: field name to value.
pub type Row = HashMap<String, CellValue>;

/// Field access for anything the grid can display.
///
/// A missing field behaves exactly like `CellValue::Null`.
pub trait Record {
    fn field(&self, key: &str) -> Option<Cow<'_, CellValue>>;

    fn value(&self, key: &str) -> Cow<'_, CellValue> {
        self.field(key).unwrap_or(Cow::Owned(CellValue::Null))
    }
}

impl<T: Record + ?Sized> Record for &T {
    fn field(&self, key: &str) -> Option<Cow<'_, CellValue>> {
        (**self).field(key)
    }
}

impl Record for HashMap<String, CellValue> {
    fn field(&self, key: &str) -> Option<Cow<'_, CellValue>> {
        self.get(key).map(Cow::Borrowed)
    }
}

impl Record for BTreeMap<String, CellValue> {
    fn field(&self, key: &str) -> Option<Cow<'_, CellValue>> {
        self.get(key).map(Cow::Borrowed)
    }
}

impl Record for serde_json::Map<String, JsonValue> {
    fn field(&self, key: &str) -> Option<Cow<'_, CellValue>> {
        self.get(key).map(|v| Cow::Owned(CellValue::from(v)))
    }
}

impl Record for JsonValue {
    fn field(&self, key: &str) -> Option<Cow<'_, CellValue>> {
        self.get(key).map(|v| Cow::Owned(CellValue::from(v)))
    }
}

/// Builds a [`Row`] from `(field, value)` pairs.
///
/// ```
/// use livegrid::{row, CellValue, Record};
///
/// let r = row([("name", CellValue::from("Ada")), ("age", CellValue::from(36))]);
/// assert_eq!(r.value("age").as_i64(), Some(36));
/// assert!(r.value("missing").is_null());
/// ```
pub fn row<K, I>(fields: I) -> Row
where
    K: Into<String>,
    I: IntoIterator<Item = (K, CellValue)>,
{
    fields.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
