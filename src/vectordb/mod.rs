//! Vector index integration (Qdrant).

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;


pub use client::{QdrantIndex, VectorIndex};
pub use error::VectorDbError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockVectorIndex, cosine_similarity};
pub use model::{ANSWER_KEY, IndexMatch, NAMESPACE_KEY, SOURCE_KEY, payload_to_json};

pub use crate::constants::DEFAULT_COLLECTION_NAME;
