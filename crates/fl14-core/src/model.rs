use serde::{Deserialize, Serialize};
use std::fmt;

/// The code part of a token, tagged by how the tokenizer read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeToken {
    /// A single digit run, e.g. `"9"`.
    Single(String),
    /// Two digit runs around a hyphen, e.g. `"6-8"`.
    Range(String),
    /// Leading text that is not a code at all.
    Noise(String),
}

/// One unit produced by the tokenizer: a code token and the text that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub code: CodeToken,
    pub description: String,
}

/// A recovered table entry, before range expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CodeRecord {
    Single {
        code: u32,
        description: String,
    },
    Range {
        start: u32,
        end: u32,
        description: String,
    },
}

impl fmt::Display for CodeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeRecord::Single { code, description } => write!(f, "{code} {description}"),
            CodeRecord::Range {
                start,
                end,
                description,
            } => write!(f, "{start}-{end} {description}"),
        }
    }
}

/// One row of the published format table.
///
/// Field names are the short names used by the format store; the spreadsheet
/// sink relabels `start` and `label` with human-readable headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    /// Decimal form of the code.
    pub start: String,
    pub label: String,
    pub fmtname: String,
    #[serde(rename = "type")]
    pub format_type: String,
}
