//! Declarative transformation actions.
//!
//! An [`Action`] is an immutable, replayable instruction: pure parameters,
//! no embedded row data. The closed enum forces every consumer — the
//! interpreter, serializers, the description generator — to handle each
//! kind exhaustively, so a new kind cannot silently fall through.

use serde::{Deserialize, Serialize};

/// Case transform mode for `CaseChange`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseMode {
    Upper,
    Lower,
    Title,
}

/// Arithmetic operator for `CalcMath`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MathOp {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
}

impl MathOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Target type for `ChangeType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTarget {
    Numeric,
    #[serde(rename = "string")]
    Text,
    Date,
}

/// Predicate for `Filter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCondition {
    Contains,
    Equals,
    StartsWith,
    Greater,
    Less,
}

/// One table transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    DropColumn { col: String },
    Rename { col: String, new_name: String },
    ReorderColumns { new_order: Vec<String> },
    AddIndex,
    DropTopRows { count: usize },
    SmartClean,
    DropDuplicates,
    FillDown { col: String },
    FillNulls { col: String, value: String },
    Trim { col: String },
    CleanSymbols { col: String },
    CaseChange { col: String, mode: CaseMode },
    Split { col: String, delimiter: String },
    MergeColumns { col1: String, col2: String, separator: String },
    CalcMath { col1: String, col2: String, op: MathOp, target: String },
    Sort { col: String, direction: SortDirection },
    ChangeType { col: String, target: TypeTarget },
    Filter { col: String, condition: FilterCondition, value: String },
    Replace { col: String, find: String, replace: String },
    RegexExtract { col: String, pattern: String },
    Duplicate { col: String },
    PromoteHeaders,
}

impl Action {
    /// Human-readable description for history panels and notifications.
    pub fn describe(&self) -> String {
        match self {
            Self::DropColumn { col } => format!("Drop column '{col}'"),
            Self::Rename { col, new_name } => format!("Rename '{col}' to '{new_name}'"),
            Self::ReorderColumns { .. } => "Reorder columns".to_string(),
            Self::AddIndex => "Add index column".to_string(),
            Self::DropTopRows { count } => format!("Drop top {count} row(s)"),
            Self::SmartClean => "Smart clean".to_string(),
            Self::DropDuplicates => "Remove duplicate rows".to_string(),
            Self::FillDown { col } => format!("Fill down '{col}'"),
            Self::FillNulls { col, value } => format!("Fill nulls in '{col}' with \"{value}\""),
            Self::Trim { col } => format!("Trim '{col}'"),
            Self::CleanSymbols { col } => format!("Clean symbols in '{col}'"),
            Self::CaseChange { col, mode } => {
                let label = match mode {
                    CaseMode::Upper => "UPPERCASE",
                    CaseMode::Lower => "lowercase",
                    CaseMode::Title => "Title Case",
                };
                format!("{label} '{col}'")
            }
            Self::Split { col, delimiter } => format!("Split '{col}' on \"{delimiter}\""),
            Self::MergeColumns { col1, col2, .. } => format!("Merge '{col1}' + '{col2}'"),
            Self::CalcMath { col1, col2, op, target } => {
                format!("Compute '{target}' = '{col1}' {} '{col2}'", op.symbol())
            }
            Self::Sort { col, direction } => {
                let dir = match direction {
                    SortDirection::Ascending => "ascending",
                    SortDirection::Descending => "descending",
                };
                format!("Sort by '{col}' {dir}")
            }
            Self::ChangeType { col, target } => {
                let ty = match target {
                    TypeTarget::Numeric => "numeric",
                    TypeTarget::Text => "string",
                    TypeTarget::Date => "date",
                };
                format!("Change type of '{col}' to {ty}")
            }
            Self::Filter { col, condition, value } => {
                let cond = match condition {
                    FilterCondition::Contains => "contains",
                    FilterCondition::Equals => "equals",
                    FilterCondition::StartsWith => "starts with",
                    FilterCondition::Greater => "greater than",
                    FilterCondition::Less => "less than",
                };
                format!("Filter '{col}' {cond} \"{value}\"")
            }
            Self::Replace { col, find, replace } => {
                format!("Replace \"{find}\" with \"{replace}\" in '{col}'")
            }
            Self::RegexExtract { col, .. } => format!("Regex extract in '{col}'"),
            Self::Duplicate { col } => format!("Duplicate column '{col}'"),
            Self::PromoteHeaders => "Promote first row to headers".to_string(),
        }
    }
}
