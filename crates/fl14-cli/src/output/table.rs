use fl14_core::export::xlsx::{CODE_HEADER, DESCRIPTION_HEADER};
use fl14_core::model::OutputRow;

pub fn print_rows(rows: &[OutputRow]) {
    let mut cells = vec![vec![CODE_HEADER.to_string(), DESCRIPTION_HEADER.to_string()]];
    cells.extend(rows.iter().map(|r| vec![r.start.clone(), r.label.clone()]));
    print_cells(&cells);

    if let Some(first) = rows.first() {
        println!("\n{} row(s), format {} (type {})", rows.len(), first.fmtname, first.format_type);
    }
}

/// Print rows of cells as left-aligned columns; the first row is the header.
pub fn print_cells(cells: &[Vec<String>]) {
    print!("{}", format_cells(cells));
}

fn format_cells(cells: &[Vec<String>]) -> String {
    let columns = cells.iter().map(|r| r.len()).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            cells
                .iter()
                .filter_map(|r| r.get(c))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for (i, row) in cells.iter().enumerate() {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(c, cell)| format!("{:<width$}", cell, width = widths[c]))
            .collect();
        out.push_str("  ");
        out.push_str(line.join("  ").trim_end());
        out.push('\n');

        if i == 0 {
            let rule = widths.iter().sum::<usize>() + 2 * columns.saturating_sub(1);
            out.push_str(&format!("  {}\n", "-".repeat(rule)));
        }
    }
    out
}
