pub mod store;
pub mod xlsx;

use crate::error::Fl14Error;
use crate::model::OutputRow;

/// A destination for the assembled table.
pub trait TableSink {
    /// Short name for logs and summaries.
    fn name(&self) -> &str;

    fn write(&self, rows: &[OutputRow]) -> Result<(), Fl14Error>;
}

/// Write the same rows to every sink in order, stopping at the first failure.
pub fn export_all(sinks: &[Box<dyn TableSink>], rows: &[OutputRow]) -> Result<(), Fl14Error> {
    for sink in sinks {
        tracing::info!(sink = sink.name(), rows = rows.len(), "exporting");
        sink.write(rows)?;
    }
    Ok(())
}
