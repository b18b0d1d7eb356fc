use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{ScoredPoint, Value as QdrantValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Metadata key holding the passage text.
pub const ANSWER_KEY: &str = "answer";
/// Metadata key holding the passage origin (URL or document id).
pub const SOURCE_KEY: &str = "source";
/// Payload key used as the partition filter.
pub const NAMESPACE_KEY: &str = "namespace";

/// One raw match returned by the vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMatch {
    pub id: Option<String>,
    pub score: f32,
    pub metadata: Map<String, Value>,
}

impl IndexMatch {
    pub fn new(score: f32, metadata: Map<String, Value>) -> Self {
        Self {
            id: None,
            score,
            metadata,
        }
    }

    /// Convenience constructor for a match carrying only `answer` (and optionally `source`).
    pub fn with_answer(score: f32, answer: impl Into<String>, source: Option<&str>) -> Self {
        let mut metadata = Map::new();
        metadata.insert(ANSWER_KEY.to_string(), Value::String(answer.into()));
        if let Some(source) = source {
            metadata.insert(SOURCE_KEY.to_string(), Value::String(source.to_string()));
        }
        Self::new(score, metadata)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The `answer` field, if it is a string.
    pub fn answer(&self) -> Option<&str> {
        self.metadata.get(ANSWER_KEY).and_then(Value::as_str)
    }

    pub fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_KEY).and_then(Value::as_str)
    }

    pub fn from_scored_point(point: ScoredPoint) -> Self {
        let id = point
            .id
            .and_then(|pid| pid.point_id_options)
            .map(|opt| match opt {
                PointIdOptions::Num(n) => n.to_string(),
                PointIdOptions::Uuid(u) => u,
            });

        let metadata = point
            .payload
            .into_iter()
            .map(|(k, v)| (k, payload_to_json(v)))
            .collect();

        Self {
            id,
            score: point.score,
            metadata,
        }
    }
}

/// Converts a Qdrant payload value into plain JSON.
pub fn payload_to_json(value: QdrantValue) -> Value {
    match value.kind {
        None | Some(Kind::NullValue(_)) => Value::Null,
        Some(Kind::BoolValue(b)) => Value::Bool(b),
        Some(Kind::IntegerValue(i)) => Value::Number(i.into()),
        Some(Kind::DoubleValue(d)) => Number::from_f64(d).map_or(Value::Null, Value::Number),
        Some(Kind::StringValue(s)) => Value::String(s),
        Some(Kind::ListValue(list)) => {
            Value::Array(list.values.into_iter().map(payload_to_json).collect())
        }
        Some(Kind::StructValue(st)) => Value::Object(
            st.fields
                .into_iter()
                .map(|(k, v)| (k, payload_to_json(v)))
                .collect(),
        ),
    }
}
