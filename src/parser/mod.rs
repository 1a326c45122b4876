pub mod endpoint;
pub mod extract;
pub mod naming;

pub use endpoint::{parse_endpoint, parse_method_and_url};
pub use extract::{extract_fragments, parse_response, RawEndpoint};
pub use naming::derive_name;
