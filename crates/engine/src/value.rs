//! Cell values and coercion utilities.
//!
//! Every cell holds a [`Value`]. Coercions are total: unparseable input
//! degrades to `None` (the not-a-number sentinel, distinct from `Null`),
//! never to a panic or an in-band error string.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single cell value.
///
/// Serialized untagged so JSON scalars map naturally: `null`, number,
/// `"YYYY-MM-DD"` string (date), any other string (text).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl Value {
    /// Parse raw loader input: empty → `Null`, numeric → `Number`, else `Text`.
    ///
    /// No date sniffing here — dates enter the model through an explicit
    /// `ChangeType` coercion, never implicitly at load time.
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Value::Null;
        }

        if let Ok(num) = trimmed.parse::<f64>() {
            if num.is_finite() {
                return Value::Number(num);
            }
        }

        Value::Text(trimmed.to_string())
    }

    /// String form of the cell. `Null` renders as the empty string.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Text(s) => s.clone(),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    /// Numeric interpretation, or `None` when the cell does not hold a
    /// finite number. Text goes through [`parse_number`].
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.is_finite().then_some(*n),
            Value::Text(s) => parse_number(s),
            Value::Null | Value::Date(_) => None,
        }
    }

    /// Calendar-date interpretation, or `None` when unparseable.
    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::Text(s) => parse_date(s),
            Value::Null | Value::Number(_) => None,
        }
    }

    /// A cell counts as blank when it is `Null` or the empty string.
    /// Fill and dedup logic share this predicate.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

/// Lenient numeric parse: strips thousands separators and common currency
/// symbols, then requires the whole remaining string to parse as a finite
/// float. No prefix salvage — `"2024-01-03"` is not the number 2024.
pub fn parse_number(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | '€' | '£'))
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Calendar-date parse over the formats the engine accepts.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    const FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    for fmt in FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(d);
        }
    }

    // Timestamp forms ("2024-01-03T10:00:00Z"): take the calendar prefix.
    if let Some(prefix) = trimmed.get(..10) {
        if let Ok(d) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Some(d);
        }
    }

    None
}
