use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::PageRenderer;
use crate::error::RenderError;

/// A fully rendered page held in memory.
pub struct HtmlPage {
    source: String,
    document: Html,
}

impl HtmlPage {
    /// Parse `html`; `source` is the URL or path it came from, for logs and reports.
    pub fn parse(source: impl Into<String>, html: &str) -> Self {
        let source = source.into();
        let document = Html::parse_document(html);
        if !document.errors.is_empty() {
            debug!("{}: {} HTML parse errors (recovered)", source, document.errors.len());
        }
        Self { source, document }
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

fn compile(selector: &str) -> Result<Selector, RenderError> {
    Selector::parse(selector).map_err(|e| RenderError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

impl PageRenderer for HtmlPage {
    type Node<'a> = ElementRef<'a>;

    fn root(&self) -> ElementRef<'_> {
        self.document.root_element()
    }

    fn query_all<'a>(
        &'a self,
        scope: ElementRef<'a>,
        selector: &str,
    ) -> Result<Vec<ElementRef<'a>>, RenderError> {
        let selector = compile(selector)?;
        Ok(scope.select(&selector).collect())
    }

    fn read_attribute<'a>(
        &'a self,
        node: ElementRef<'a>,
        name: &str,
    ) -> Result<Option<String>, RenderError> {
        Ok(node.value().attr(name).map(str::to_string))
    }

    fn read_text_content<'a>(&'a self, node: ElementRef<'a>) -> Result<String, RenderError> {
        Ok(node.text().collect())
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    const SNIPPET: &str = r#"
        <html><body>
          <div id="files-endpoints">
            <div id="get-file-endpoint"><p><span>GET</span> <span> /v1/files/:key </span></p></div>
          </div>
          <div id="users-endpoints"></div>
        </body></html>"#;

    #[test]
    fn suffix_selectors_match_in_document_order() {
        let page = HtmlPage::parse("inline", SNIPPET);
        let sections = page.query_all(page.root(), r#"div[id$="-endpoints"]"#).unwrap();
        let ids: Vec<String> = sections
            .iter()
            .map(|n| page.read_attribute(*n, "id").unwrap().unwrap())
            .collect();
        assert_eq!(ids, ["files-endpoints", "users-endpoints"]);
    }

    #[test]
    fn queries_are_scoped_to_the_given_node() {
        let page = HtmlPage::parse("inline", SNIPPET);
        let sections = page.query_all(page.root(), r#"div[id$="-endpoints"]"#).unwrap();
        let in_files = page.query_all(sections[0], r#"div[id$="-endpoint"]"#).unwrap();
        let in_users = page.query_all(sections[1], r#"div[id$="-endpoint"]"#).unwrap();
        assert_eq!(in_files.len(), 1);
        assert!(in_users.is_empty());
    }

    #[test]
    fn text_is_trimmed_only_on_request() {
        let page = HtmlPage::parse("inline", SNIPPET);
        let spans = page.query_all(page.root(), "p > span").unwrap();
        assert_eq!(page.read_text_content(spans[1]).unwrap(), " /v1/files/:key ");
        assert_eq!(page.read_text(spans[1]).unwrap(), "/v1/files/:key");
    }

    #[test]
    fn missing_attribute_is_none() {
        let page = HtmlPage::parse("inline", SNIPPET);
        let spans = page.query_all(page.root(), "span").unwrap();
        assert_eq!(page.read_attribute(spans[0], "id").unwrap(), None);
    }

    #[test]
    fn bad_selector_is_reported() {
        let page = HtmlPage::parse("inline", SNIPPET);
        let err = page.query_all(page.root(), "div[id$=").unwrap_err();
        assert!(matches!(err, RenderError::InvalidSelector { .. }));
    }
}
