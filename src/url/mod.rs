//! URL handling module for Sumi-Harvest
//!
//! This module provides link resolution, domain extraction, and the scope
//! filter that keeps the crawl on a single site and away from static assets.

mod domain;
mod filter;
mod normalize;

// Re-export main functions
pub use domain::extract_domain;
pub use filter::{check_scope, is_in_scope, ScopeRejection};
pub use normalize::{normalize, normalize_absolute};
