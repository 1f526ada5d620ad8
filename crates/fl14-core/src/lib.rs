pub mod config;
pub mod error;
pub mod export;
pub mod extraction;
pub mod fetch;
pub mod frame;
pub mod model;
pub mod parsing;

use config::Fl14Config;
use error::Fl14Error;
use export::store::{DirectoryStore, StoreSink};
use export::xlsx::SpreadsheetSink;
use export::TableSink;
use extraction::PdfExtractor;
use fetch::Fetcher;
use model::{CodeRecord, OutputRow};
use serde::Serialize;

/// The recovered records and the rows assembled from them.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedTable {
    pub records: Vec<CodeRecord>,
    pub rows: Vec<OutputRow>,
}

/// What a completed run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub records: usize,
    pub rows: usize,
    pub sinks: Vec<String>,
}

/// Recover and assemble the code table from PDF bytes.
pub fn extract_table(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    config: &Fl14Config,
) -> Result<ExtractedTable, Fl14Error> {
    let pages = extraction::extract_page_text(extractor, pdf_bytes, &config.page_indices())?;
    let records = parsing::recover_table(&pages, &config.start_marker, &config.end_marker)?;

    if records.is_empty() {
        return Err(Fl14Error::ParseError(
            "no codes found between the table markers".into(),
        ));
    }

    let rows = frame::assemble(&records, &config.format_name, &config.format_type);
    tracing::info!(records = records.len(), rows = rows.len(), "assembled table");
    Ok(ExtractedTable { records, rows })
}

/// Extract the table from PDF bytes and write it to every sink.
pub fn publish(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    config: &Fl14Config,
    sinks: &[Box<dyn TableSink>],
) -> Result<RunSummary, Fl14Error> {
    let table = extract_table(pdf_bytes, extractor, config)?;
    export::export_all(sinks, &table.rows)?;

    Ok(RunSummary {
        records: table.records.len(),
        rows: table.rows.len(),
        sinks: sinks.iter().map(|s| s.name().to_string()).collect(),
    })
}

/// Main entry point: fetch the source document, then [`publish`] it.
pub fn run(
    config: &Fl14Config,
    fetcher: &dyn Fetcher,
    extractor: &dyn PdfExtractor,
    sinks: &[Box<dyn TableSink>],
) -> Result<RunSummary, Fl14Error> {
    let pdf_bytes = fetcher.fetch(&config.source_url)?;
    publish(&pdf_bytes, extractor, config, sinks)
}

/// The spreadsheet and format-store sinks described by `config`.
pub fn default_sinks(config: &Fl14Config) -> Vec<Box<dyn TableSink>> {
    vec![
        Box::new(SpreadsheetSink::new(
            config.xlsx_path.clone(),
            config.format_name.clone(),
        )),
        Box::new(StoreSink::new(
            Box::new(DirectoryStore::new(config.store_root.clone())),
            config.library.clone(),
            config.table.clone(),
            config.confirm_marker.clone(),
            config.poll_interval(),
            config.max_poll_attempts,
        )),
    ]
}
