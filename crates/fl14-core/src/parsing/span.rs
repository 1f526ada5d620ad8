use crate::error::Fl14Error;
use crate::extraction::PageContent;

/// Cut the table text out of the pages that hold it.
///
/// Each marker must occur exactly once across the span: the start marker on
/// the first page and the end marker on the last page. A start marker on a
/// later page, or an end marker before the last page, is ambiguous. Pages in
/// between are taken whole. When a single page is given, the end marker is
/// searched after the start marker only.
pub fn locate_span(
    pages: &[PageContent],
    start_marker: &str,
    end_marker: &str,
) -> Result<String, Fl14Error> {
    let (first, rest) = pages
        .split_first()
        .ok_or_else(|| Fl14Error::ParseError("no pages given for the table span".into()))?;

    let start_at = find_once(&first.text, start_marker, first.page_index)? + start_marker.len();
    let head = &first.text[start_at..];

    let Some((last, middle)) = rest.split_last() else {
        let end_at = find_once(head, end_marker, first.page_index)?;
        return Ok(head[..end_at].to_string());
    };

    let end_at = find_once(&last.text, end_marker, last.page_index)?;

    let later: Vec<(&str, usize)> = rest
        .iter()
        .map(|p| (p.text.as_str(), p.page_index))
        .collect();
    reject_repeats(start_marker, &later)?;

    let earlier: Vec<(&str, usize)> = std::iter::once((head, first.page_index))
        .chain(middle.iter().map(|p| (p.text.as_str(), p.page_index)))
        .collect();
    reject_repeats(end_marker, &earlier)?;

    let mut span = String::from(head);
    for page in middle {
        span.push('\n');
        span.push_str(&page.text);
    }
    span.push('\n');
    span.push_str(&last.text[..end_at]);

    tracing::debug!(
        first_page = first.page_index,
        last_page = last.page_index,
        len = span.len(),
        "located table span"
    );
    Ok(span)
}

/// Byte offset of the only occurrence of `marker` in `haystack`.
fn find_once(haystack: &str, marker: &str, page_index: usize) -> Result<usize, Fl14Error> {
    match haystack.matches(marker).count() {
        0 => Err(Fl14Error::MarkerNotFound {
            marker: marker.to_string(),
            page: page_index + 1,
        }),
        1 => Ok(haystack.find(marker).unwrap_or_default()),
        count => Err(Fl14Error::MarkerAmbiguous {
            marker: marker.to_string(),
            page: page_index + 1,
            count,
        }),
    }
}

/// Fail if `marker`, already found once elsewhere, shows up again in `regions`.
///
/// The reported page is the first region holding a repeat; the count covers
/// the whole span.
fn reject_repeats(marker: &str, regions: &[(&str, usize)]) -> Result<(), Fl14Error> {
    let mut repeats = 0;
    let mut page = None;
    for (text, page_index) in regions {
        let n = text.matches(marker).count();
        if n > 0 && page.is_none() {
            page = Some(page_index + 1);
        }
        repeats += n;
    }
    match page {
        Some(page) => Err(Fl14Error::MarkerAmbiguous {
            marker: marker.to_string(),
            page,
            count: repeats + 1,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page_index: usize, text: &str) -> PageContent {
        PageContent {
            page_index,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_two_page_span_excludes_outside_text() {
        let pages = vec![
            page(4, "preamble START 1 Emergency\n2 Urgent"),
            page(5, "3 Elective\nEND trailer 99 text"),
        ];
        let span = locate_span(&pages, "START", "END").unwrap();
        assert_eq!(span, " 1 Emergency\n2 Urgent\n3 Elective\n");
        assert!(!span.contains("preamble"));
        assert!(!span.contains("trailer"));
    }

    #[test]
    fn test_middle_pages_taken_whole() {
        let pages = vec![page(0, "x START a"), page(1, "b"), page(2, "c END y")];
        assert_eq!(locate_span(&pages, "START", "END").unwrap(), " a\nb\nc ");
    }

    #[test]
    fn test_single_page_span() {
        let pages = vec![page(0, "head START 6-8 Reserved END tail")];
        assert_eq!(
            locate_span(&pages, "START", "END").unwrap(),
            " 6-8 Reserved "
        );
    }

    #[test]
    fn test_single_page_end_before_start_is_not_found() {
        let pages = vec![page(0, "END then START 1 A")];
        let err = locate_span(&pages, "START", "END").unwrap_err();
        assert!(matches!(
            err,
            Fl14Error::MarkerNotFound { ref marker, page: 1 } if marker == "END"
        ));
    }

    #[test]
    fn test_missing_start_marker() {
        let pages = vec![page(2, "1 A 2 B"), page(3, "END")];
        let err = locate_span(&pages, "START", "END").unwrap_err();
        assert!(matches!(err, Fl14Error::MarkerNotFound { page: 3, .. }));
    }

    #[test]
    fn test_missing_end_marker() {
        let pages = vec![page(0, "START 1 A"), page(1, "2 B")];
        assert!(matches!(
            locate_span(&pages, "START", "END"),
            Err(Fl14Error::MarkerNotFound { page: 2, .. })
        ));
    }

    #[test]
    fn test_repeated_marker_is_ambiguous() {
        let pages = vec![page(0, "START 1 A START"), page(1, "END")];
        assert!(matches!(
            locate_span(&pages, "START", "END"),
            Err(Fl14Error::MarkerAmbiguous { count: 2, .. })
        ));
    }

    #[test]
    fn test_end_marker_on_first_page_is_ambiguous() {
        let pages = vec![page(0, "START 1 A END junk 2 B"), page(1, "3 C END tail")];
        let err = locate_span(&pages, "START", "END").unwrap_err();
        assert!(matches!(
            err,
            Fl14Error::MarkerAmbiguous { ref marker, page: 1, count: 2 } if marker == "END"
        ));
    }

    #[test]
    fn test_start_marker_on_later_page_is_ambiguous() {
        let pages = vec![page(0, "START 1 A"), page(1, "START 2 B END")];
        let err = locate_span(&pages, "START", "END").unwrap_err();
        assert!(matches!(
            err,
            Fl14Error::MarkerAmbiguous { ref marker, page: 2, count: 2 } if marker == "START"
        ));
    }

    #[test]
    fn test_end_marker_on_middle_page_is_ambiguous() {
        let pages = vec![
            page(3, "START 1 A"),
            page(4, "2 B END 3 C"),
            page(5, "4 D END"),
        ];
        assert!(matches!(
            locate_span(&pages, "START", "END"),
            Err(Fl14Error::MarkerAmbiguous { page: 5, count: 2, .. })
        ));
    }

    #[test]
    fn test_no_pages() {
        assert!(matches!(
            locate_span(&[], "START", "END"),
            Err(Fl14Error::ParseError(_))
        ));
    }
}
