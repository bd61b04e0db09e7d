//! HTML to plain-text document conversion.
//!
//! Parses the fetched HTML into a DOM and walks it, keeping visible text
//! only. Pages that yield no text are dropped, mirroring the per-URL failure
//! contract of the fetcher.

use scraper::{ElementRef, Html, Node};

use crate::types::{Document, FetchedResource};

/// Subtrees that never contribute visible text.
const SKIP_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "head"];

/// Elements that introduce a line break around their content.
const BLOCK_ELEMENTS: [&str; 20] = [
    "p", "div", "br", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "table", "tr",
    "blockquote", "pre", "section", "article", "header", "footer",
];

/// HTML to plain-text converter.
pub struct HtmlConverter;

impl HtmlConverter {
    pub fn new() -> Self {
        Self
    }

    /// Convert one fetched resource into a plain-text document.
    ///
    /// Returns `None` when the page yields no visible text. The resulting
    /// document records the source URL under the `url` metadata key.
    pub fn convert(&self, resource: &FetchedResource) -> Option<Document> {
        let text = extract_text(&resource.content);

        if text.is_empty() {
            tracing::warn!("No text content extracted from {}", resource.url);
            return None;
        }

        tracing::debug!(
            "Converted {} ({} bytes of text)",
            resource.url,
            text.len()
        );

        Some(Document::new(text, &resource.url))
    }

    /// Convert every resource, keeping the documents that yielded text.
    pub fn convert_all(&self, resources: &[FetchedResource]) -> Vec<Document> {
        let documents: Vec<Document> = resources
            .iter()
            .filter_map(|resource| self.convert(resource))
            .collect();

        tracing::info!(
            "Converted {}/{} resources to documents",
            documents.len(),
            resources.len()
        );

        documents
    }
}

impl Default for HtmlConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract normalized visible text from an HTML string.
fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::new();
    collect_text(document.root_element(), &mut raw);
    normalize(&raw)
}

/// Walk an element's children, accumulating visible text.
fn collect_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        if let Some(el) = ElementRef::wrap(child) {
            let name = el.value().name();

            if SKIP_ELEMENTS.contains(&name) {
                continue;
            }

            let block = BLOCK_ELEMENTS.contains(&name);
            if block {
                out.push('\n');
            }
            collect_text(el, out);
            if block {
                out.push('\n');
            }
        } else if let Node::Text(text) = child.value() {
            out.push_str(&text.text);
        }
    }
}

/// Collapse intra-line whitespace and drop empty lines.
fn normalize(raw: &str) -> String {
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(url: &str, content: &str) -> FetchedResource {
        FetchedResource {
            url: url.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_convert_extracts_visible_text() {
        let converter = HtmlConverter::new();
        let html = "<html><body><p>Hello <b>world</b></p></body></html>";

        let doc = converter
            .convert(&resource("https://example.org/a", html))
            .unwrap();

        assert_eq!(doc.content, "Hello world");
        assert_eq!(doc.url(), Some("https://example.org/a"));
    }

    #[test]
    fn test_convert_skips_script_and_style() {
        let converter = HtmlConverter::new();
        let html = r#"<html>
            <head><title>Title</title><style>p { color: red; }</style></head>
            <body>
                <script>var hidden = "nope";</script>
                <p>Visible paragraph.</p>
            </body>
        </html>"#;

        let doc = converter
            .convert(&resource("https://example.org/b", html))
            .unwrap();

        assert_eq!(doc.content, "Visible paragraph.");
        assert!(!doc.content.contains("hidden"));
        assert!(!doc.content.contains("color"));
    }

    #[test]
    fn test_block_elements_break_lines() {
        let converter = HtmlConverter::new();
        let html = "<html><body><h1>Heading</h1><p>First.</p><p>Second.</p></body></html>";

        let doc = converter
            .convert(&resource("https://example.org/c", html))
            .unwrap();

        let lines: Vec<&str> = doc.content.lines().collect();
        assert_eq!(lines, vec!["Heading", "First.", "Second."]);
    }

    #[test]
    fn test_convert_textless_page_yields_none() {
        let converter = HtmlConverter::new();
        let html = "<html><head><script>init();</script></head><body></body></html>";

        assert!(converter.convert(&resource("https://example.org/d", html)).is_none());
    }

    #[test]
    fn test_convert_all_drops_textless_pages() {
        let converter = HtmlConverter::new();
        let resources = vec![
            resource("https://example.org/a", "<p>Some content</p>"),
            resource("https://example.org/b", "<script>only()</script>"),
        ];

        let documents = converter.convert_all(&resources);

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].url(), Some("https://example.org/a"));
    }
}
