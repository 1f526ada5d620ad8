use fl14_core::error::Fl14Error;
use fl14_core::export::xlsx::read_sheet;
use std::path::Path;

use crate::output;

pub fn run(xlsx_file: &Path, sheet: Option<&str>) -> Result<(), Fl14Error> {
    let cells = read_sheet(xlsx_file, sheet)?;
    if cells.is_empty() {
        println!("(empty sheet)");
        return Ok(());
    }
    output::table::print_cells(&cells);
    Ok(())
}
