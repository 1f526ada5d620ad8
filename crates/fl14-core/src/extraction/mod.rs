pub mod pdftotext;

use crate::error::Fl14Error;

/// Raw text extracted from a single page of a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    /// Zero-based page index.
    pub page_index: usize,
    pub text: String,
}

/// Trait for PDF text extraction backends.
pub trait PdfExtractor {
    /// Extract text content from PDF bytes, returning one PageContent per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, Fl14Error>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Pick the requested pages out of a full extraction, in the order requested.
pub fn select_pages(
    pages: &[PageContent],
    indices: &[usize],
) -> Result<Vec<PageContent>, Fl14Error> {
    indices
        .iter()
        .map(|&idx| {
            pages
                .iter()
                .find(|p| p.page_index == idx)
                .cloned()
                .ok_or_else(|| {
                    Fl14Error::ParseError(format!(
                        "page index {idx} out of range (document has {} page(s))",
                        pages.len()
                    ))
                })
        })
        .collect()
}

/// Run `extractor` and keep only the pages at `indices`.
pub fn extract_page_text(
    extractor: &dyn PdfExtractor,
    pdf_bytes: &[u8],
    indices: &[usize],
) -> Result<Vec<PageContent>, Fl14Error> {
    let pages = extractor.extract_pages(pdf_bytes)?;
    tracing::debug!(
        backend = extractor.backend_name(),
        pages = pages.len(),
        "extracted page text"
    );
    select_pages(&pages, indices)
}
