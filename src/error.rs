use thiserror::Error;

/// Errors raised while opening a page or reading nodes from it.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The page could not be loaded.
    #[error("failed to open {url}: {reason}")]
    Navigation { url: String, reason: String },

    /// Loading the page took longer than the configured limit.
    #[error("timed out after {secs}s opening {url}")]
    Timeout { url: String, secs: u64 },

    /// A CSS selector did not parse.
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// A node could not be read (detached, stale, or otherwise unreadable).
    #[error("cannot read node: {0}")]
    Access(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl RenderError {
    /// Per-node failures only cost the node they happened on.
    pub fn is_node_local(&self) -> bool {
        matches!(self, Self::Access(_))
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The document has no section containers at all; the markup likely changed upstream.
    #[error("no endpoint sections found (selector `{selector}`)")]
    NoSectionsFound { selector: String },

    #[error(transparent)]
    Render(#[from] RenderError),
}
