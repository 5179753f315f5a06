//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageOutcome`: the terminal state of each processed frontier entry
//!   (scraped, denied by robots.txt, skipped as non-HTML, or failed)

mod outcome;

pub use outcome::PageOutcome;
