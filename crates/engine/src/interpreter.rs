//! The action interpreter: `apply(table, action) -> table'`.
//!
//! Pure and deterministic. Never mutates its input; always returns a fresh
//! column list and row list. Malformed parameters (absent columns, empty
//! input, invalid regex) degrade to a no-op or a null-producing cell per
//! action — the interpreter is a total function and never fails.

use chrono::NaiveDate;
use ordered_float::OrderedFloat;
use regex::Regex;
use rustc_hash::FxHashSet;

use crate::action::{Action, CaseMode, FilterCondition, MathOp, SortDirection, TypeTarget};
use crate::table::{cell, row_signature, Row, Table};
use crate::value::{parse_number, Value};

/// Apply one action to a table, producing a new table.
pub fn apply(table: &Table, action: &Action) -> Table {
    match action {
        Action::DropColumn { col } => drop_column(table, col),
        Action::Rename { col, new_name } => rename(table, col, new_name),
        Action::ReorderColumns { new_order } => {
            Table::new(new_order.clone(), table.rows.clone())
        }
        Action::AddIndex => add_index(table),
        Action::DropTopRows { count } => Table::new(
            table.columns.clone(),
            table.rows.iter().skip(*count).cloned().collect(),
        ),
        Action::SmartClean => smart_clean(table),
        Action::DropDuplicates => drop_duplicates(table),
        Action::FillDown { col } => fill_down(table, col),
        Action::FillNulls { col, value } => fill_nulls(table, col, value),
        Action::Trim { col } => map_column(table, col, |v| Value::Text(v.to_text().trim().to_string())),
        Action::CleanSymbols { col } => map_column(table, col, |v| {
            Value::Text(
                v.to_text()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, '.' | '-'))
                    .collect(),
            )
        }),
        Action::CaseChange { col, mode } => map_column(table, col, |v| {
            let text = v.to_text();
            Value::Text(match mode {
                CaseMode::Upper => text.to_uppercase(),
                CaseMode::Lower => text.to_lowercase(),
                CaseMode::Title => title_case(&text),
            })
        }),
        Action::Split { col, delimiter } => split(table, col, delimiter),
        Action::MergeColumns { col1, col2, separator } => merge(table, col1, col2, separator),
        Action::CalcMath { col1, col2, op, target } => calc_math(table, col1, col2, *op, target),
        Action::Sort { col, direction } => sort(table, col, *direction),
        Action::ChangeType { col, target } => change_type(table, col, *target),
        Action::Filter { col, condition, value } => filter(table, col, *condition, value),
        Action::Replace { col, find, replace } => map_column(table, col, |v| {
            if v.to_text() == *find {
                Value::Text(replace.clone())
            } else {
                v.clone()
            }
        }),
        Action::RegexExtract { col, pattern } => regex_extract(table, col, pattern),
        Action::Duplicate { col } => duplicate(table, col),
        Action::PromoteHeaders => promote_headers(table),
    }
}

// ---------------------------------------------------------------------------
// Column structure
// ---------------------------------------------------------------------------

fn drop_column(table: &Table, col: &str) -> Table {
    let columns = table
        .columns
        .iter()
        .filter(|c| c.as_str() != col)
        .cloned()
        .collect();
    let rows = table
        .rows
        .iter()
        .map(|r| {
            let mut r = r.clone();
            r.remove(col);
            r
        })
        .collect();
    Table::new(columns, rows)
}

/// Rename a column. If the new name collides with an existing column, that
/// column is overwritten (removed), keeping the renamed column's position.
fn rename(table: &Table, col: &str, new_name: &str) -> Table {
    if !table.has_column(col) || col == new_name {
        return table.clone();
    }

    let columns = table
        .columns
        .iter()
        .filter(|c| !(c.as_str() == new_name && c.as_str() != col))
        .map(|c| {
            if c.as_str() == col {
                new_name.to_string()
            } else {
                c.clone()
            }
        })
        .collect();
    let rows = table
        .rows
        .iter()
        .map(|r| {
            let mut r = r.clone();
            if let Some(v) = r.remove(col) {
                r.insert(new_name.to_string(), v);
            }
            r
        })
        .collect();
    Table::new(columns, rows)
}

fn add_index(table: &Table) -> Table {
    // No-op when an ID column is already present: existing numbering wins.
    if table.has_column("ID") {
        return table.clone();
    }

    let mut columns = Vec::with_capacity(table.columns.len() + 1);
    columns.push("ID".to_string());
    columns.extend(table.columns.iter().cloned());

    let rows = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let mut r = r.clone();
            r.insert("ID".to_string(), Value::Number((i + 1) as f64));
            r
        })
        .collect();
    Table::new(columns, rows)
}

fn duplicate(table: &Table, col: &str) -> Table {
    let copy = format!("{col}_copy");
    let rows = table
        .rows
        .iter()
        .map(|r| {
            let mut r = r.clone();
            let v = cell(&r, col).clone();
            r.insert(copy.clone(), v);
            r
        })
        .collect();
    let mut columns = table.columns.clone();
    if !table.has_column(&copy) {
        columns.push(copy);
    }
    Table::new(columns, rows)
}

fn promote_headers(table: &Table) -> Table {
    let Some(header) = table.rows.first() else {
        return table.clone();
    };

    // Blank header cells fall back to the existing column name.
    let new_columns: Vec<String> = table
        .columns
        .iter()
        .map(|c| {
            let text = cell(header, c).to_text();
            let text = text.trim();
            if text.is_empty() {
                c.clone()
            } else {
                text.to_string()
            }
        })
        .collect();

    // Positional remap of every remaining row, then drop the consumed row.
    let rows = table.rows[1..]
        .iter()
        .map(|r| {
            table
                .columns
                .iter()
                .zip(&new_columns)
                .map(|(old, new)| (new.clone(), cell(r, old).clone()))
                .collect()
        })
        .collect();
    Table::new(new_columns, rows)
}

// ---------------------------------------------------------------------------
// Cleaning
// ---------------------------------------------------------------------------

fn smart_clean(table: &Table) -> Table {
    // Trim text cells; normalize "null"/"nan"/"" (case-insensitive) to Null.
    let normalized: Vec<Row> = table
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|(k, v)| {
                    let v = match v {
                        Value::Text(s) => {
                            let t = s.trim();
                            if t.is_empty() || t.eq_ignore_ascii_case("null") || t.eq_ignore_ascii_case("nan") {
                                Value::Null
                            } else {
                                Value::Text(t.to_string())
                            }
                        }
                        other => other.clone(),
                    };
                    (k.clone(), v)
                })
                .collect()
        })
        .collect();

    // Drop rows that are entirely null, then duplicates.
    let mut rows: Vec<Row> = normalized
        .into_iter()
        .filter(|row| row.values().any(|v| !matches!(v, Value::Null)))
        .collect();
    let mut seen = FxHashSet::default();
    rows.retain(|r| seen.insert(row_signature(&table.columns, r)));

    Table::new(table.columns.clone(), rows)
}

fn drop_duplicates(table: &Table) -> Table {
    let mut seen = FxHashSet::default();
    let rows = table
        .rows
        .iter()
        .filter(|r| seen.insert(row_signature(&table.columns, r)))
        .cloned()
        .collect();
    Table::new(table.columns.clone(), rows)
}

// ---------------------------------------------------------------------------
// Cell fills and rewrites
// ---------------------------------------------------------------------------

fn fill_down(table: &Table, col: &str) -> Table {
    let mut last: Option<Value> = None;
    let rows = table
        .rows
        .iter()
        .map(|r| {
            let mut r = r.clone();
            let v = cell(&r, col);
            if !v.is_blank() {
                last = Some(v.clone());
            }
            if let Some(ref carried) = last {
                r.insert(col.to_string(), carried.clone());
            }
            r
        })
        .collect();
    Table::new(table.columns.clone(), rows)
}

fn fill_nulls(table: &Table, col: &str, value: &str) -> Table {
    map_column(table, col, |v| {
        if v.is_blank() {
            Value::Text(value.to_string())
        } else {
            v.clone()
        }
    })
}

/// Rewrite one column cell-by-cell, leaving structure untouched.
fn map_column(table: &Table, col: &str, mut f: impl FnMut(&Value) -> Value) -> Table {
    let rows = table
        .rows
        .iter()
        .map(|r| {
            let mut r = r.clone();
            let next = f(cell(&r, col));
            r.insert(col.to_string(), next);
            r
        })
        .collect();
    Table::new(table.columns.clone(), rows)
}

/// Capitalize first letter of each whitespace-delimited word, lowercase the rest.
fn title_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_whitespace = true;

    for ch in s.chars() {
        if ch.is_whitespace() {
            result.push(ch);
            prev_whitespace = true;
        } else if prev_whitespace {
            result.extend(ch.to_uppercase());
            prev_whitespace = false;
        } else {
            result.extend(ch.to_lowercase());
        }
    }

    result
}

// ---------------------------------------------------------------------------
// Derived columns
// ---------------------------------------------------------------------------

fn split(table: &Table, col: &str, delimiter: &str) -> Table {
    let c1 = format!("{col}_1");
    let c2 = format!("{col}_2");

    let rows = table
        .rows
        .iter()
        .map(|r| {
            let mut r = r.clone();
            let text = cell(&r, col).to_text();
            let (first, rest) = if delimiter.is_empty() {
                (text.clone(), String::new())
            } else {
                match text.split_once(delimiter) {
                    Some((head, tail)) => (head.to_string(), tail.to_string()),
                    None => (text.clone(), String::new()),
                }
            };
            r.insert(c1.clone(), Value::Text(first));
            r.insert(c2.clone(), Value::Text(rest));
            r
        })
        .collect();

    let mut columns = table.columns.clone();
    if !table.has_column(&c1) {
        columns.push(c1);
        columns.push(c2);
    }
    Table::new(columns, rows)
}

fn merge(table: &Table, col1: &str, col2: &str, separator: &str) -> Table {
    let merged = format!("{col1}_{col2}");
    let rows = table
        .rows
        .iter()
        .map(|r| {
            let mut r = r.clone();
            let text = format!(
                "{}{}{}",
                cell(&r, col1).to_text(),
                separator,
                cell(&r, col2).to_text()
            );
            r.insert(merged.clone(), Value::Text(text));
            r
        })
        .collect();
    let mut columns = table.columns.clone();
    if !table.has_column(&merged) {
        columns.push(merged);
    }
    Table::new(columns, rows)
}

fn calc_math(table: &Table, col1: &str, col2: &str, op: MathOp, target: &str) -> Table {
    let rows = table
        .rows
        .iter()
        .map(|r| {
            let mut r = r.clone();
            let result = match (cell(&r, col1).to_number(), cell(&r, col2).to_number()) {
                (Some(a), Some(b)) => Value::Number(match op {
                    MathOp::Add => a + b,
                    MathOp::Sub => a - b,
                    MathOp::Mul => a * b,
                    // Division by zero yields 0, not an error and not null.
                    MathOp::Div => {
                        if b != 0.0 {
                            a / b
                        } else {
                            0.0
                        }
                    }
                }),
                _ => Value::Null,
            };
            r.insert(target.to_string(), result);
            r
        })
        .collect();
    let mut columns = table.columns.clone();
    if !table.has_column(target) {
        columns.push(target.to_string());
    }
    Table::new(columns, rows)
}

// ---------------------------------------------------------------------------
// Ordering and selection
// ---------------------------------------------------------------------------

/// Total order over mixed-type cells: numbers, then dates, then text
/// (lexical), then nulls last. Derived enum `Ord` gives exactly that.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Number(OrderedFloat<f64>),
    Date(NaiveDate),
    Text(String),
    Null,
}

impl SortKey {
    fn from_value(v: &Value) -> Self {
        match v {
            Value::Number(n) if n.is_finite() => SortKey::Number(OrderedFloat(*n)),
            Value::Number(_) | Value::Null => SortKey::Null,
            Value::Date(d) => SortKey::Date(*d),
            Value::Text(s) => SortKey::Text(s.clone()),
        }
    }
}

fn sort(table: &Table, col: &str, direction: SortDirection) -> Table {
    use std::cmp::Ordering;

    let mut rows = table.rows.clone();
    // Stable sort: equal keys preserve source order in both directions.
    // Nulls sink to the bottom regardless of direction.
    rows.sort_by(|a, b| {
        let ka = SortKey::from_value(cell(a, col));
        let kb = SortKey::from_value(cell(b, col));
        match (ka == SortKey::Null, kb == SortKey::Null) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => match direction {
                SortDirection::Ascending => ka.cmp(&kb),
                SortDirection::Descending => kb.cmp(&ka),
            },
        }
    });
    Table::new(table.columns.clone(), rows)
}

fn filter(table: &Table, col: &str, condition: FilterCondition, value: &str) -> Table {
    let needle = value.to_lowercase();
    let numeric_rhs = parse_number(value);

    let rows = table
        .rows
        .iter()
        .filter(|r| {
            let v = cell(r, col);
            match condition {
                FilterCondition::Contains => v.to_text().to_lowercase().contains(&needle),
                FilterCondition::Equals => v.to_text().to_lowercase() == needle,
                FilterCondition::StartsWith => v.to_text().to_lowercase().starts_with(&needle),
                // Rows failing numeric coercion never satisfy greater/less.
                FilterCondition::Greater => match (v.to_number(), numeric_rhs) {
                    (Some(a), Some(b)) => a > b,
                    _ => false,
                },
                FilterCondition::Less => match (v.to_number(), numeric_rhs) {
                    (Some(a), Some(b)) => a < b,
                    _ => false,
                },
            }
        })
        .cloned()
        .collect();
    Table::new(table.columns.clone(), rows)
}

// ---------------------------------------------------------------------------
// Type coercion and extraction
// ---------------------------------------------------------------------------

fn change_type(table: &Table, col: &str, target: TypeTarget) -> Table {
    map_column(table, col, |v| match target {
        // Unparseable input normalizes to Null, never a sentinel string.
        TypeTarget::Numeric => v.to_number().map(Value::Number).unwrap_or(Value::Null),
        TypeTarget::Text => Value::Text(v.to_text()),
        TypeTarget::Date => v.to_date().map(Value::Date).unwrap_or(Value::Null),
    })
}

fn regex_extract(table: &Table, col: &str, pattern: &str) -> Table {
    // Invalid pattern: the action has no effect. Callers wanting diagnostics
    // validate the pattern before applying.
    let Ok(re) = Regex::new(pattern) else {
        return table.clone();
    };

    map_column(table, col, |v| {
        let text = v.to_text();
        match re.find(&text) {
            Some(m) => Value::Text(m.as_str().to_string()),
            None => Value::Null,
        }
    })
}
