//! Page access: the query capability the catalog builder consumes, an
//! HTML-backed implementation of it, and the fetchers that open a page.

#[cfg(test)]
pub mod fake;
pub mod fetch;
pub mod html;

pub use fetch::Fetcher;
pub use html::HtmlPage;

use crate::error::RenderError;

/// Read-only query surface over a rendered document.
///
/// Nodes are cheap copyable handles borrowed from the renderer. Every read
/// may fail with [`RenderError::Access`] if the node went stale.
pub trait PageRenderer {
    type Node<'a>: Copy
    where
        Self: 'a;

    /// The document itself, used as the scope for top-level queries.
    fn root(&self) -> Self::Node<'_>;

    /// All descendants of `scope` matching a CSS `selector`, in document order.
    fn query_all<'a>(
        &'a self,
        scope: Self::Node<'a>,
        selector: &str,
    ) -> Result<Vec<Self::Node<'a>>, RenderError>;

    fn read_attribute<'a>(
        &'a self,
        node: Self::Node<'a>,
        name: &str,
    ) -> Result<Option<String>, RenderError>;

    /// Full text content, whitespace untouched.
    fn read_text_content<'a>(&'a self, node: Self::Node<'a>) -> Result<String, RenderError>;

    /// Trimmed text content.
    fn read_text<'a>(&'a self, node: Self::Node<'a>) -> Result<String, RenderError> {
        Ok(self.read_text_content(node)?.trim().to_string())
    }
}
