use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::CatalogOptions;
use crate::error::{CatalogError, RenderError};
use crate::model::{Catalog, Endpoint, Section};
use crate::parser::{parse_endpoint, RawEndpoint};
use crate::registry::ShapeRegistry;
use crate::render::PageRenderer;

/// Walk every endpoint section of the page and build the catalog.
///
/// Fails only when the page has no sections at all or the renderer itself
/// breaks (bad selector, lost session). Sections without endpoints, and
/// endpoints whose nodes cannot be read, are logged and skipped.
pub fn build_catalog<R: PageRenderer>(
    renderer: &R,
    options: &CatalogOptions,
) -> Result<Catalog, CatalogError> {
    let selectors = &options.selectors;
    let section_nodes = renderer.query_all(renderer.root(), &selectors.section)?;
    if section_nodes.is_empty() {
        return Err(CatalogError::NoSectionsFound {
            selector: selectors.section.clone(),
        });
    }
    info!("Found {} endpoint sections", section_nodes.len());

    let registry = ShapeRegistry::new();
    let mut catalog = Catalog::default();
    catalog.stats.sections_found = section_nodes.len();

    for node in section_nodes {
        match build_section(renderer, node, options, &registry, &mut catalog)? {
            Some(section) => {
                debug!("Section {}: {} endpoints", section.id, section.endpoints.len());
                catalog.insert_section(section);
            }
            None => catalog.stats.sections_skipped += 1,
        }
    }

    catalog.stats.shape_collisions = registry.collisions();
    catalog.shapes = registry.into_shapes();

    info!(
        "Catalog: {} sections, {} endpoints, {} response shapes ({} skipped sections, {} skipped endpoints)",
        catalog.sections.len(),
        catalog.endpoint_count(),
        catalog.shapes.len(),
        catalog.stats.sections_skipped,
        catalog.stats.endpoints_skipped,
    );
    Ok(catalog)
}

/// `Ok(None)` means the section was skipped.
fn build_section<'a, R: PageRenderer>(
    renderer: &'a R,
    node: R::Node<'a>,
    options: &CatalogOptions,
    registry: &ShapeRegistry,
    catalog: &mut Catalog,
) -> Result<Option<Section>, RenderError> {
    let id = match renderer.read_attribute(node, "id") {
        Ok(Some(id)) if !id.is_empty() => id,
        Ok(_) => {
            warn!("Section container without an id, skipping");
            return Ok(None);
        }
        Err(e) if e.is_node_local() => {
            warn!("Cannot read section container: {}", e);
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    if !options.wants_section(&id) {
        debug!("Section {} filtered out", id);
        return Ok(None);
    }

    let endpoint_nodes = match renderer.query_all(node, &options.selectors.endpoint) {
        Ok(nodes) => nodes,
        Err(e) if e.is_node_local() => {
            warn!("Cannot query endpoints for section {}: {}", id, e);
            return Ok(None);
        }
        Err(e) => return Err(e),
    };
    if endpoint_nodes.is_empty() {
        warn!("No endpoints found for section {}", id);
        return Ok(None);
    }

    let mut raws = Vec::with_capacity(endpoint_nodes.len());
    for (i, endpoint) in endpoint_nodes.into_iter().enumerate() {
        match RawEndpoint::read(renderer, endpoint, &options.selectors) {
            Ok(raw) => raws.push(raw),
            Err(e) if e.is_node_local() => {
                warn!("Skipping endpoint #{} of section {}: {}", i + 1, id, e);
                catalog.stats.endpoints_skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    let endpoints: Vec<Endpoint> = if options.parallel {
        raws.par_iter().map(|raw| parse_endpoint(raw, registry)).collect()
    } else {
        raws.iter().map(|raw| parse_endpoint(raw, registry)).collect()
    };
    catalog.stats.endpoints_parsed += endpoints.len();

    Ok(Some(Section { id, endpoints }))
}

// ── Tests ──
