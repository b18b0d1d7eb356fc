use qdrant_client::Qdrant;
use qdrant_client::qdrant::{Condition, Filter, SearchPointsBuilder};
use tracing::{debug, instrument};

use super::error::VectorDbError;
use super::model::{IndexMatch, NAMESPACE_KEY};

/// Nearest-neighbour lookup over one knowledge-base collection.
pub trait VectorIndex: Send + Sync {
    /// Returns up to `top_k` matches in descending score order, scoped to `namespace`.
    fn query(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        namespace: &str,
    ) -> impl std::future::Future<Output = Result<Vec<IndexMatch>, VectorDbError>> + Send;

    /// Succeeds when the index is reachable and can serve queries.
    fn health_check(&self) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;
}

#[derive(Clone)]
/// Qdrant-backed [`VectorIndex`]; the namespace is matched against a payload field.
pub struct QdrantIndex {
    client: Qdrant,
    url: String,
    collection: String,
}

impl std::fmt::Debug for QdrantIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantIndex")
            .field("url", &self.url)
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

impl QdrantIndex {
    /// Creates a client for `url` bound to `collection`.
    pub fn new(url: &str, collection: &str) -> Result<Self, VectorDbError> {
        let client =
            Qdrant::from_url(url)
                .build()
                .map_err(|e| VectorDbError::ConnectionFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        Ok(Self {
            client,
            url: url.to_string(),
            collection: collection.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    async fn ping(&self) -> Result<(), VectorDbError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Returns `true` if the bound collection exists.
    pub async fn collection_exists(&self) -> Result<bool, VectorDbError> {
        self.client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| VectorDbError::QueryFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })
    }

    #[instrument(skip(self, vector), fields(collection = %self.collection, dim = vector.len()))]
    async fn search(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        namespace: &str,
    ) -> Result<Vec<IndexMatch>, VectorDbError> {
        let filter = Filter::must([Condition::matches(NAMESPACE_KEY, namespace.to_string())]);
        let request = SearchPointsBuilder::new(&self.collection, vector, top_k)
            .with_payload(true)
            .filter(filter);

        let response = self.client.search_points(request).await.map_err(|e| {
            VectorDbError::QueryFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            }
        })?;

        let matches: Vec<IndexMatch> = response
            .result
            .into_iter()
            .map(IndexMatch::from_scored_point)
            .collect();

        debug!(matches = matches.len(), "Qdrant search complete");
        Ok(matches)
    }
}

impl VectorIndex for QdrantIndex {
    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        namespace: &str,
    ) -> Result<Vec<IndexMatch>, VectorDbError> {
        self.search(vector, top_k, namespace).await
    }

    #[instrument(skip(self), fields(url = %self.url, collection = %self.collection))]
    async fn health_check(&self) -> Result<(), VectorDbError> {
        self.ping().await?;
        if !self.collection_exists().await? {
            return Err(VectorDbError::QueryFailed {
                collection: self.collection.clone(),
                message: "collection does not exist".to_string(),
            });
        }
        debug!("Qdrant health check passed");
        Ok(())
    }
}
