use super::*;
use std::time::Duration;

#[test]
fn test_config_default() {
    let config = EmbedderConfig::default();

    assert_eq!(config.base_url, DEFAULT_EMBEDDING_URL);
    assert_eq!(config.model, "text-embedding-3-small");
    assert_eq!(config.dimension, 512);
    assert!(config.api_key.is_none());
    assert_eq!(config.timeout, Duration::from_secs(30));
}

#[test]
fn test_config_endpoint_trims_slash() {
    let config = EmbedderConfig {
        base_url: "http://localhost:8000/v1/".to_string(),
        ..Default::default()
    };
    assert_eq!(config.endpoint(), "http://localhost:8000/v1/embeddings");
}

#[test]
fn test_config_validate() {
    assert!(EmbedderConfig::default().validate().is_ok());
    assert!(EmbedderConfig::default().with_dimension(0).validate().is_err());

    let empty_model = EmbedderConfig {
        model: " ".to_string(),
        ..Default::default()
    };
    assert!(empty_model.validate().is_err());
}

#[test]
fn test_config_debug_redacts_key() {
    let config = EmbedderConfig::default().with_api_key("sk-secret");
    let rendered = format!("{:?}", config);
    assert!(!rendered.contains("sk-secret"));
    assert!(rendered.contains("<redacted>"));
}

#[test]
fn test_truncate_embedding() {
    let full: Vec<f32> = (0..1536).map(|i| i as f32).collect();
    let truncated = truncate_embedding(full, 512).unwrap();
    assert_eq!(truncated.len(), 512);
    assert_eq!(truncated[511], 511.0);
}

#[test]
fn test_truncate_embedding_too_short() {
    let err = truncate_embedding(vec![0.1; 10], 512).unwrap_err();
    assert!(matches!(
        err,
        EmbeddingError::DimensionMismatch {
            expected: 512,
            actual: 10
        }
    ));
}

#[test]
fn test_openai_embedder_rejects_invalid_config() {
    let result = OpenAiEmbedder::new(EmbedderConfig::default().with_dimension(0));
    assert!(result.is_err());
}

#[tokio::test]
async fn test_stub_embedder_is_deterministic() {
    let stub = StubEmbedder::new(64);

    let a = stub.embed("tuition fees").await.unwrap();
    let b = stub.embed("tuition fees").await.unwrap();
    let c = stub.embed("halls of residence").await.unwrap();

    assert_eq!(a.len(), 64);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(stub.calls(), 3);

    let norm: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-4);
}

#[tokio::test]
async fn test_stub_embedder_failing() {
    let stub = StubEmbedder::failing(8);
    assert!(stub.embed("anything").await.is_err());

    stub.set_failing(false);
    assert!(stub.embed("anything").await.is_ok());
}
