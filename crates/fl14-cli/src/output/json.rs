use fl14_core::error::Fl14Error;
use fl14_core::ExtractedTable;

pub fn print(table: &ExtractedTable) -> Result<(), Fl14Error> {
    let json = serde_json::to_string_pretty(table)?;
    println!("{json}");
    Ok(())
}
