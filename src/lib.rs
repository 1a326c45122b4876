//! Scrape an API-reference page into a catalog of endpoints grouped by
//! section, with the raw text of every object-shaped response keyed by a
//! name derived from the endpoint's method and URL.
//!
//! Pipeline: [`render::Fetcher`] opens the page into an [`render::HtmlPage`],
//! [`catalog::build_catalog`] walks its sections through any
//! [`render::PageRenderer`], and [`parser`] turns each endpoint node into an
//! [`model::Endpoint`].

pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod registry;
pub mod render;

pub use catalog::build_catalog;
pub use config::{CatalogOptions, ScrapeConfig, Selectors};
pub use error::{CatalogError, RenderError};
pub use model::{Catalog, CatalogStats, Endpoint, HttpMethod, Section};
pub use parser::derive_name;
pub use registry::ShapeRegistry;
pub use render::{Fetcher, HtmlPage, PageRenderer};
