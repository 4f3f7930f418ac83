//! Shared utilities: terminal-safe text handling and endpoint validation.

mod text;
mod url;

pub use text::{
    collation_key, display_width, format_month_year, strip_control_chars, truncate_to_width,
};
pub use url::validate_endpoint;

/// Maximum accepted search query length, shared by the input handler and the
/// search backend wrapper.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
