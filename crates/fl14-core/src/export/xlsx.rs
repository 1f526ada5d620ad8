use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use calamine::{Reader, Xlsx};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

use crate::error::Fl14Error;
use crate::export::TableSink;
use crate::model::OutputRow;

pub const CODE_HEADER: &str = "Type of Admission Code";
pub const DESCRIPTION_HEADER: &str = "Type of Admission Description";

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_DOC_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

/// Writes the table to a single-sheet `.xlsx` workbook with human-readable headers.
pub struct SpreadsheetSink {
    path: PathBuf,
    sheet: String,
}

impl SpreadsheetSink {
    pub fn new(path: impl Into<PathBuf>, sheet: impl Into<String>) -> Self {
        SpreadsheetSink {
            path: path.into(),
            sheet: sheet.into(),
        }
    }
}

impl TableSink for SpreadsheetSink {
    fn name(&self) -> &str {
        "spreadsheet"
    }

    fn write(&self, rows: &[OutputRow]) -> Result<(), Fl14Error> {
        write_workbook(&self.path, &self.sheet, rows)?;
        tracing::info!(path = %self.path.display(), sheet = %self.sheet, "wrote spreadsheet");
        Ok(())
    }
}

/// Write `rows` to a new workbook at `path`, replacing any existing file.
pub fn write_workbook(path: &Path, sheet: &str, rows: &[OutputRow]) -> Result<(), Fl14Error> {
    validate_sheet_name(sheet)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let parts: [(&str, Vec<u8>); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.as_bytes().to_vec()),
        ("_rels/.rels", ROOT_RELS_XML.as_bytes().to_vec()),
        ("xl/workbook.xml", workbook_xml(sheet)?),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML.as_bytes().to_vec()),
        ("xl/worksheets/sheet1.xml", worksheet_xml(rows)?),
    ];

    let file = File::create(path)?;
    let mut zip = zip::ZipWriter::new(file);
    for (name, body) in parts {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file(name, options).map_err(zip_err)?;
        zip.write_all(&body)?;
    }
    zip.finish().map_err(zip_err)?;

    Ok(())
}

/// Read a sheet back as rows of display strings. Defaults to the first sheet.
pub fn read_sheet(path: &Path, sheet: Option<&str>) -> Result<Vec<Vec<String>>, Fl14Error> {
    let mut workbook: Xlsx<_> = calamine::open_workbook(path)
        .map_err(|e| Fl14Error::ParseError(format!("failed to open xlsx: {e}")))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| Fl14Error::ParseError("workbook has no sheets".into()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| Fl14Error::ParseError(format!("sheet '{sheet_name}' not readable: {e}")))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_as_string).collect())
        .collect())
}

fn cell_as_string(cell: &calamine::Data) -> String {
    match cell {
        calamine::Data::String(s) => s.trim().to_string(),
        calamine::Data::Float(f) => f.to_string(),
        calamine::Data::Int(i) => i.to_string(),
        calamine::Data::Empty => String::new(),
        _ => format!("{cell}"),
    }
}

/// Excel's rules: 1 to 31 characters, none of `[]:*?/\`.
fn validate_sheet_name(sheet: &str) -> Result<(), Fl14Error> {
    let len = sheet.chars().count();
    if len == 0 || len > 31 {
        return Err(Fl14Error::Export(format!(
            "sheet name '{sheet}' must be 1 to 31 characters"
        )));
    }
    if let Some(c) = sheet.chars().find(|c| "[]:*?/\\".contains(*c)) {
        return Err(Fl14Error::Export(format!(
            "sheet name '{sheet}' contains invalid character '{c}'"
        )));
    }
    Ok(())
}

fn workbook_xml(sheet: &str) -> Result<Vec<u8>, Fl14Error> {
    let mut w = Writer::new(Vec::new());
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(xml_err)?;
    w.write_event(Event::Start(
        BytesStart::new("workbook").with_attributes([("xmlns", NS_MAIN), ("xmlns:r", NS_DOC_REL)]),
    ))
    .map_err(xml_err)?;
    w.write_event(Event::Start(BytesStart::new("sheets")))
        .map_err(xml_err)?;
    w.write_event(Event::Empty(BytesStart::new("sheet").with_attributes([
        ("name", sheet),
        ("sheetId", "1"),
        ("r:id", "rId1"),
    ])))
    .map_err(xml_err)?;
    w.write_event(Event::End(BytesEnd::new("sheets")))
        .map_err(xml_err)?;
    w.write_event(Event::End(BytesEnd::new("workbook")))
        .map_err(xml_err)?;
    Ok(w.into_inner())
}

fn worksheet_xml(rows: &[OutputRow]) -> Result<Vec<u8>, Fl14Error> {
    let mut w = Writer::new(Vec::new());
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(xml_err)?;
    w.write_event(Event::Start(
        BytesStart::new("worksheet").with_attributes([("xmlns", NS_MAIN)]),
    ))
    .map_err(xml_err)?;
    w.write_event(Event::Start(BytesStart::new("sheetData")))
        .map_err(xml_err)?;

    write_row(&mut w, 1, [CODE_HEADER, DESCRIPTION_HEADER])?;
    for (i, row) in rows.iter().enumerate() {
        write_row(&mut w, i + 2, [row.start.as_str(), row.label.as_str()])?;
    }

    w.write_event(Event::End(BytesEnd::new("sheetData")))
        .map_err(xml_err)?;
    w.write_event(Event::End(BytesEnd::new("worksheet")))
        .map_err(xml_err)?;
    Ok(w.into_inner())
}

/// One `<row>` of inline-string cells in columns A, B, ...
fn write_row(w: &mut Writer<Vec<u8>>, row_num: usize, cells: [&str; 2]) -> Result<(), Fl14Error> {
    let r = row_num.to_string();
    w.write_event(Event::Start(
        BytesStart::new("row").with_attributes([("r", r.as_str())]),
    ))
    .map_err(xml_err)?;

    for (col, value) in ["A", "B"].iter().zip(cells) {
        let cell_ref = format!("{col}{row_num}");
        w.write_event(Event::Start(BytesStart::new("c").with_attributes([
            ("r", cell_ref.as_str()),
            ("t", "inlineStr"),
        ])))
        .map_err(xml_err)?;
        w.write_event(Event::Start(BytesStart::new("is")))
            .map_err(xml_err)?;
        w.write_event(Event::Start(BytesStart::new("t")))
            .map_err(xml_err)?;
        w.write_event(Event::Text(BytesText::new(value)))
            .map_err(xml_err)?;
        w.write_event(Event::End(BytesEnd::new("t")))
            .map_err(xml_err)?;
        w.write_event(Event::End(BytesEnd::new("is")))
            .map_err(xml_err)?;
        w.write_event(Event::End(BytesEnd::new("c")))
            .map_err(xml_err)?;
    }

    w.write_event(Event::End(BytesEnd::new("row")))
        .map_err(xml_err)?;
    Ok(())
}

fn xml_err(e: impl std::fmt::Display) -> Fl14Error {
    Fl14Error::Export(format!("writing sheet XML: {e}"))
}

fn zip_err(e: zip::result::ZipError) -> Fl14Error {
    Fl14Error::Export(format!("writing xlsx container: {e}"))
}
