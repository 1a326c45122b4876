/// Segment token substituted for `:param` path components.
const PARAM_TOKEN: &str = "Param";

/// Derive the response-shape name for an endpoint.
///
/// Pure and total: the title-cased method followed by every non-empty path
/// segment, with `:param` segments replaced by `Param` and snake_case
/// segments turned into PascalCase. `("GET", "/projects/:project_id/files")`
/// gives `GetProjectsParamFiles`.
///
/// Equal `(method, url)` pairs always give the same name; nothing here
/// avoids collisions.
pub fn derive_name(method: &str, url: &str) -> String {
    let mut name = title_case(method);
    for segment in url.split('/').filter(|s| !s.is_empty()) {
        if segment.starts_with(':') {
            name.push_str(PARAM_TOKEN);
        } else {
            segment.split('_').for_each(|part| name.push_str(&title_case(part)));
        }
    }
    name
}

/// First character uppercased, the rest lowercased.
fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

// ── Tests ──
