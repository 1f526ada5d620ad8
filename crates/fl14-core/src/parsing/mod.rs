pub mod normalize;
pub mod span;
pub mod tokens;

use crate::error::Fl14Error;
use crate::extraction::PageContent;
use crate::model::{CodeRecord, CodeToken, Token};
use normalize::normalize_span;
use span::locate_span;
use tokens::Tokens;

/// Recover the code table from the pages that hold it.
///
/// The text between the markers is flattened, tokenized into code and
/// description pairs, and every token that is not a code is dropped.
pub fn recover_table(
    pages: &[PageContent],
    start_marker: &str,
    end_marker: &str,
) -> Result<Vec<CodeRecord>, Fl14Error> {
    let span = locate_span(pages, start_marker, end_marker)?;
    let text = normalize_span(&span);
    tracing::debug!(text = %text, "normalized table span");

    let records: Vec<CodeRecord> = Tokens::new(&text).filter_map(classify).collect();
    for record in &records {
        tracing::debug!(record = %record, "recovered");
    }
    tracing::info!(records = records.len(), "recovered table records");
    Ok(records)
}

/// Turn a token into a record, or `None` for non-table noise.
pub fn classify(token: Token) -> Option<CodeRecord> {
    let Token { code, description } = token;
    match code {
        CodeToken::Range(text) => {
            let parsed = text
                .split_once('-')
                .and_then(|(a, b)| Some((a.parse::<u32>().ok()?, b.parse::<u32>().ok()?)));
            match parsed {
                Some((start, end)) => Some(CodeRecord::Range {
                    start,
                    end,
                    description,
                }),
                None => {
                    tracing::warn!(token = %text, "range endpoints out of range, dropping");
                    None
                }
            }
        }
        CodeToken::Single(text) => match text.parse::<u32>() {
            Ok(code) => Some(CodeRecord::Single { code, description }),
            Err(_) => {
                tracing::warn!(token = %text, "code out of range, dropping");
                None
            }
        },
        CodeToken::Noise(text) => {
            tracing::debug!(token = %text, description = %description, "dropping non-table text");
            None
        }
    }
}
