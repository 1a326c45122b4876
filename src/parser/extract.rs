use crate::config::Selectors;
use crate::error::RenderError;
use crate::render::PageRenderer;

/// Everything read off one endpoint node, detached from the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEndpoint {
    /// Trimmed label texts, document order.
    pub fragments: Vec<String>,
    /// Verbatim text of the response block, if the endpoint has one.
    pub response: Option<String>,
}

impl RawEndpoint {
    pub fn new(fragments: Vec<String>, response: Option<String>) -> Self {
        Self { fragments, response }
    }

    /// Read labels and response text from `node`. Any failure spoils the whole endpoint.
    pub fn read<'a, R: PageRenderer>(
        renderer: &'a R,
        node: R::Node<'a>,
        selectors: &Selectors,
    ) -> Result<Self, RenderError> {
        Ok(Self {
            fragments: extract_fragments(renderer, node, &selectors.label)?,
            response: parse_response(renderer, node, &selectors.response)?,
        })
    }
}

/// Trimmed text of every label element under `node`. Empty labels keep their slot.
pub fn extract_fragments<'a, R: PageRenderer>(
    renderer: &'a R,
    node: R::Node<'a>,
    label_selector: &str,
) -> Result<Vec<String>, RenderError> {
    renderer
        .query_all(node, label_selector)?
        .into_iter()
        .map(|label| renderer.read_text(label))
        .collect()
}

/// Full text of the first response block under `node`, untouched.
pub fn parse_response<'a, R: PageRenderer>(
    renderer: &'a R,
    node: R::Node<'a>,
    response_selector: &str,
) -> Result<Option<String>, RenderError> {
    renderer
        .query_all(node, response_selector)?
        .into_iter()
        .next()
        .map(|block| renderer.read_text_content(block))
        .transpose()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LABEL_SELECTOR, RESPONSE_SELECTOR};
    use crate::render::fake::FakePage;
    use crate::render::HtmlPage;

    const ENDPOINT: &str = r#"
        <div id="get-file-endpoint">
          <p><span>GET</span><span></span><span>  /v1/files/:key  </span></p>
          <p>Returns the document as JSON.</p>
          <div class="endpoint-returns">  {
  "name": String
}</div>
          <pre class="returns-secondary">{}</pre>
        </div>"#;

    fn first_endpoint(page: &HtmlPage) -> scraper::ElementRef<'_> {
        page.query_all(page.root(), r#"div[id$="-endpoint"]"#).unwrap()[0]
    }

    #[test]
    fn fragments_are_trimmed_and_keep_empty_slots() {
        let page = HtmlPage::parse("inline", ENDPOINT);
        let node = first_endpoint(&page);
        let fragments = extract_fragments(&page, node, LABEL_SELECTOR).unwrap();
        assert_eq!(fragments, ["GET", "", "/v1/files/:key"]);
    }

    #[test]
    fn response_text_is_verbatim_and_first_match_wins() {
        let page = HtmlPage::parse("inline", ENDPOINT);
        let node = first_endpoint(&page);
        let response = parse_response(&page, node, RESPONSE_SELECTOR).unwrap();
        assert_eq!(response.as_deref(), Some("  {\n  \"name\": String\n}"));
    }

    #[test]
    fn no_response_block_is_none() {
        let page = HtmlPage::parse("inline", r#"<div id="x-endpoint"><p><span>GET</span></p></div>"#);
        let node = first_endpoint(&page);
        assert_eq!(parse_response(&page, node, RESPONSE_SELECTOR).unwrap(), None);
    }

    #[test]
    fn detached_label_fails_the_endpoint() {
        let mut page = FakePage::new();
        let endpoint = page.add(FakePage::ROOT, "endpoint", "");
        page.add(endpoint, LABEL_SELECTOR, "GET");
        let url = page.add(endpoint, LABEL_SELECTOR, "/v1/me");
        page.detach(url);

        let err = RawEndpoint::read(&page, endpoint, &Selectors::default()).unwrap_err();
        assert!(err.is_node_local());
    }

    #[test]
    fn read_collects_both_parts() {
        let mut page = FakePage::new();
        let endpoint = page.add(FakePage::ROOT, "endpoint", "");
        page.add(endpoint, LABEL_SELECTOR, "POST");
        page.add(endpoint, LABEL_SELECTOR, " /v1/webhooks ");
        page.add(endpoint, RESPONSE_SELECTOR, " {\"id\": String}");

        let raw = RawEndpoint::read(&page, endpoint, &Selectors::default()).unwrap();
        assert_eq!(
            raw,
            RawEndpoint::new(
                vec!["POST".into(), "/v1/webhooks".into()],
                Some(" {\"id\": String}".into())
            )
        );
    }
}
