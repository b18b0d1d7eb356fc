//! Confidence assessment and corrective filtering of reranked results.

pub mod assessor;
pub mod config;
pub mod filter;
pub mod types;


pub use assessor::{DOMAIN_KEYWORDS, QualityAssessor};
pub use config::{FilterPolicy, QualityThresholds};
pub use filter::CorrectiveFilter;
pub use types::{ConfidenceLevel, QualitySignals};
