use crate::error::Fl14Error;
use crate::extraction::{PageContent, PdfExtractor};
use std::io::Write;
use std::process::Command;

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -layout`, which keeps each table line on one text line.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdftotextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, Fl14Error> {
        if !looks_like_pdf(pdf_bytes) {
            return Err(Fl14Error::ParseError(
                "input is not a PDF document (missing %PDF- header)".into(),
            ));
        }

        // Write PDF bytes to a temp file
        let mut tmpfile = tempfile::NamedTempFile::new()?;
        tmpfile.write_all(pdf_bytes)?;
        tmpfile.flush()?;

        let output = Command::new("pdftotext")
            .arg("-layout")
            .arg(tmpfile.path())
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Fl14Error::PdftotextNotFound
                } else {
                    Fl14Error::ParseError(format!("pdftotext failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(exit_error(code, stderr));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(split_pages(&text))
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// pdftotext exits 1 when it cannot open the document and 3 when the
/// document is encrypted. Both mean the input is unusable.
fn exit_error(code: i32, stderr: String) -> Fl14Error {
    match code {
        1 | 3 => Fl14Error::ParseError(format!("not a readable PDF document: {}", stderr.trim())),
        _ => Fl14Error::PdftotextFailed { code, stderr },
    }
}

fn looks_like_pdf(bytes: &[u8]) -> bool {
    // The header may be preceded by junk bytes; readers accept it within the first KiB.
    let head = &bytes[..bytes.len().min(1024)];
    head.windows(5).any(|w| w == b"%PDF-")
}

/// Split pdftotext output into pages (form feed `\x0c` ends every page).
fn split_pages(text: &str) -> Vec<PageContent> {
    let mut pages: Vec<PageContent> = text
        .split('\x0c')
        .enumerate()
        .map(|(i, page_text)| PageContent {
            page_index: i,
            text: page_text.to_string(),
        })
        .collect();

    // Trailing form feed leaves an empty tail that is not a page.
    if pages.len() > 1 && pages.last().is_some_and(|p| p.text.trim().is_empty()) {
        pages.pop();
    }

    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_pages_drops_trailing_form_feed() {
        let pages = split_pages("first page\n\x0csecond page\n\x0c");
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page_index, 0);
        assert_eq!(pages[1].text, "second page\n");
    }

    #[test]
    fn test_split_pages_keeps_blank_middle_page() {
        let pages = split_pages("a\x0c\x0cc\x0c");
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[1].text, "");
        assert_eq!(pages[2].page_index, 2);
    }

    #[test]
    fn test_non_pdf_bytes_rejected() {
        let err = PdftotextExtractor::new()
            .extract_pages(b"<html>not found</html>")
            .unwrap_err();
        assert!(matches!(err, Fl14Error::ParseError(_)));
    }

    #[test]
    fn test_unreadable_document_is_parse_error() {
        let err = exit_error(1, "Syntax Error: Couldn't find trailer dictionary\n".into());
        assert!(matches!(err, Fl14Error::ParseError(ref msg) if msg.contains("trailer")));
        assert!(matches!(exit_error(3, String::new()), Fl14Error::ParseError(_)));
    }

    #[test]
    fn test_other_exit_codes_are_tool_failures() {
        let err = exit_error(99, "boom".into());
        assert!(matches!(
            err,
            Fl14Error::PdftotextFailed { code: 99, ref stderr } if stderr == "boom"
        ));
    }

    #[test]
    fn test_looks_like_pdf() {
        assert!(looks_like_pdf(b"%PDF-1.7\n..."));
        assert!(looks_like_pdf(b"\xef\xbb\xbf%PDF-1.4"));
        assert!(!looks_like_pdf(b""));
    }
}
