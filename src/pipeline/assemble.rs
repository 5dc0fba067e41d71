//! Markdown assembly: flatten a page-structured OCR response into one string.
//!
//! ## Why so strict about the trailing blank line
//!
//! Every page — the last one included — is followed by exactly one blank
//! line. The terminator doubles as a page separator, so concatenating two
//! assembled documents (or appending a footer) never glues text together,
//! and assembling the same response twice always yields identical bytes.

use crate::pipeline::ocr::OcrResponse;

/// Separator appended after every page's markdown.
const PAGE_SEPARATOR: &str = "\n\n";

/// Concatenate every page of `response` in reading order.
///
/// Total and side-effect-free: empty pages contribute only their separator,
/// and an empty page list yields an empty string.
pub fn assemble_markdown(response: &OcrResponse) -> String {
    let mut out = String::with_capacity(
        response
            .pages
            .iter()
            .map(|p| p.markdown.len() + PAGE_SEPARATOR.len())
            .sum(),
    );
    for page in &response.pages {
        out.push_str(&page.markdown);
        out.push_str(PAGE_SEPARATOR);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ocr::OcrPage;

    fn response_of(markdowns: &[&str]) -> OcrResponse {
        OcrResponse {
            model: None,
            pages: markdowns
                .iter()
                .enumerate()
                .map(|(index, markdown)| OcrPage {
                    index,
                    markdown: (*markdown).to_string(),
                    images: Vec::new(),
                })
                .collect(),
            usage_info: None,
        }
    }

    #[test]
    fn two_pages_form_separated_blocks() {
        let markdown = assemble_markdown(&response_of(&["A", "B"]));
        assert_eq!(markdown, "A\n\nB\n\n");
    }

    #[test]
    fn empty_response_yields_empty_string() {
        let markdown = assemble_markdown(&response_of(&[]));
        assert_eq!(markdown, "");
    }

    #[test]
    fn single_page_still_gets_terminator() {
        let markdown = assemble_markdown(&response_of(&["# Title\n\nBody"]));
        assert_eq!(markdown, "# Title\n\nBody\n\n");
    }

    #[test]
    fn blank_pages_contribute_only_separators() {
        let markdown = assemble_markdown(&response_of(&["A", "", "C"]));
        assert_eq!(markdown, "A\n\n\n\nC\n\n");
    }

    #[test]
    fn page_order_is_preserved() {
        let pages: Vec<String> = (0..50).map(|i| format!("Page {i}")).collect();
        let refs: Vec<&str> = pages.iter().map(String::as_str).collect();
        let markdown = assemble_markdown(&response_of(&refs));

        let expected: String = pages.iter().map(|p| format!("{p}\n\n")).collect();
        assert_eq!(markdown, expected);
    }
}
