use crate::model::{CodeRecord, OutputRow};

/// Widest range expanded into rows. Anything wider is misread page text.
pub const MAX_RANGE_ROWS: u32 = 10_000;

/// Build the output table from recovered records.
///
/// Ranges are expanded to one row per code, every row gets the format name
/// and type, and rows are sorted by numeric code. The sort is stable and
/// duplicate codes are kept.
pub fn assemble(records: &[CodeRecord], format_name: &str, format_type: &str) -> Vec<OutputRow> {
    let mut coded: Vec<(u32, &str)> = Vec::new();

    for record in records {
        match record {
            CodeRecord::Single { code, description } => coded.push((*code, description.as_str())),
            CodeRecord::Range {
                start,
                end,
                description,
            } => {
                if start > end {
                    tracing::warn!(start, end, "reversed code range produces no rows");
                } else if end - start >= MAX_RANGE_ROWS {
                    tracing::warn!(
                        start,
                        end,
                        max = MAX_RANGE_ROWS,
                        "code range too wide, dropping"
                    );
                } else {
                    coded.extend((*start..=*end).map(|code| (code, description.as_str())));
                }
            }
        }
    }

    coded.sort_by_key(|(code, _)| *code);

    coded
        .into_iter()
        .map(|(code, description)| OutputRow {
            start: code.to_string(),
            label: description.to_string(),
            fmtname: format_name.to_string(),
            format_type: format_type.to_string(),
        })
        .collect()
}
