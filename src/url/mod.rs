//! URL handling module for doc-harvest
//!
//! This module provides result-page URL construction, document link
//! normalization, and local file name derivation.

mod filename;
mod normalize;
mod template;

// Re-export main functions
pub use filename::derive_file_name;
pub use normalize::{is_absolute_http, normalize_link};
pub use template::PageUrlTemplate;
