//! Vector search: single-query client and the concurrent multi-query searcher.

pub mod client;
pub mod multi;
pub mod types;

#[cfg(test)]
mod tests;

pub use client::VectorSearchClient;
pub use multi::{MultiQuerySearcher, MultiSearchConfig, merge_results};
pub use types::SearchResult;
