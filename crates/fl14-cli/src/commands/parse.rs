use fl14_core::error::Fl14Error;
use fl14_core::extraction::pdftotext::PdftotextExtractor;
use std::path::PathBuf;

use crate::commands::config::resolve;
use crate::output;

pub fn run(
    pdf_file: PathBuf,
    config_file: Option<PathBuf>,
    output_format: &str,
) -> Result<(), Fl14Error> {
    let config = resolve(config_file.as_deref())?;
    let pdf_bytes = std::fs::read(&pdf_file)?;
    let extractor = PdftotextExtractor::new();
    let table = fl14_core::extract_table(&pdf_bytes, &extractor, &config)?;

    match output_format {
        "json" => output::json::print(&table)?,
        _ => output::table::print_rows(&table.rows),
    }

    Ok(())
}
