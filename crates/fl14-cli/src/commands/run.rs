use fl14_core::config::validate_config;
use fl14_core::error::Fl14Error;
use fl14_core::extraction::pdftotext::PdftotextExtractor;
use fl14_core::fetch::HttpFetcher;
use std::path::PathBuf;

use crate::commands::config::resolve;

pub fn run(
    config_file: Option<PathBuf>,
    pdf_file: Option<PathBuf>,
    xlsx: Option<PathBuf>,
    store_root: Option<PathBuf>,
) -> Result<(), Fl14Error> {
    let mut config = resolve(config_file.as_deref())?;
    if let Some(path) = xlsx {
        config.xlsx_path = path;
    }
    if let Some(root) = store_root {
        config.store_root = root;
    }
    validate_config(&config)?;

    let extractor = PdftotextExtractor::new();
    let sinks = fl14_core::default_sinks(&config);

    let summary = match pdf_file {
        Some(path) => {
            tracing::info!(path = %path.display(), "reading local PDF");
            let pdf_bytes = std::fs::read(&path)?;
            fl14_core::publish(&pdf_bytes, &extractor, &config, &sinks)?
        }
        None => {
            let fetcher = HttpFetcher::new(config.http_timeout())?;
            fl14_core::run(&config, &fetcher, &extractor, &sinks)?
        }
    };

    println!(
        "Recovered {} record(s), {} row(s) for format {}",
        summary.records, summary.rows, config.format_name
    );
    println!("  spreadsheet: {}", config.xlsx_path.display());
    println!(
        "  format store: {}.{} under {}",
        config.library,
        config.table,
        config.store_root.display()
    );

    Ok(())
}
