use tracing::debug;

use super::extract::RawEndpoint;
use super::naming::derive_name;
use crate::model::{Endpoint, HttpMethod};
use crate::registry::ShapeRegistry;

/// First fragment that is exactly a recognized method token.
pub fn find_method(fragments: &[String]) -> Option<HttpMethod> {
    fragments.iter().find_map(|f| HttpMethod::from_token(f))
}

/// First fragment that looks like a path, or `""`.
pub fn find_url(fragments: &[String]) -> String {
    fragments
        .iter()
        .find(|f| f.starts_with('/'))
        .cloned()
        .unwrap_or_default()
}

/// Two independent scans over the same fragments. A missing method is not an error.
pub fn parse_method_and_url(fragments: &[String]) -> (Option<HttpMethod>, String) {
    (find_method(fragments), find_url(fragments))
}

/// Object-looking response bodies get a shape; prose does not.
pub fn has_response(response: Option<&str>) -> bool {
    response.is_some_and(|text| text.trim_start().starts_with('{'))
}

/// Turn raw endpoint text into an [`Endpoint`], registering its response shape if it has one.
pub fn parse_endpoint(raw: &RawEndpoint, registry: &ShapeRegistry) -> Endpoint {
    let (method, url) = parse_method_and_url(&raw.fragments);
    if method.is_none() {
        debug!("No HTTP method among {:?}", raw.fragments);
    }

    let response = match raw.response.as_deref() {
        Some(text) if has_response(Some(text)) => {
            let name = derive_name(method.map_or("", |m| m.as_str()), &url);
            registry.register(&name, text);
            Some(name)
        }
        _ => None,
    };

    Endpoint { method, url, response }
}

// ── Tests ──
