//! Embedding model seam and the HTTP inference adapter.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::{Value, json};

use crate::{FeatureError, FeatureResult};

/// A batch of preprocessed images: `len` tensors of `channels × side × side`
/// values, concatenated.
#[derive(Clone, Debug)]
pub struct Batch {
    pub data:     Vec<f32>,
    pub len:      usize,
    pub channels: usize,
    pub side:     usize,
}

impl Batch {
    pub fn tensor_len(&self) -> usize {
        self.channels * self.side * self.side
    }

    pub fn shape(&self) -> [usize; 4] {
        [self.len, self.channels, self.side, self.side]
    }
}

/// A pretrained image encoder.  Stateless between batches.
pub trait EmbeddingModel: Send + Sync {
    /// Values per embedding.
    fn dim(&self) -> usize;

    /// One embedding per image in the batch, in order.
    fn embed(&self, batch: &Batch) -> FeatureResult<Vec<Vec<f32>>>;
}

/// Posts batches as JSON `{"shape": [n, c, h, w], "data": [...]}` and reads
/// back `{"embeddings": [[...], ...]}`.
pub struct RemoteModel {
    client:   Client,
    endpoint: String,
    dim:      usize,
}

impl RemoteModel {
    pub fn new(endpoint: impl Into<String>, dim: usize, timeout: Duration) -> FeatureResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint: endpoint.into(), dim })
    }
}

impl EmbeddingModel for RemoteModel {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, batch: &Batch) -> FeatureResult<Vec<Vec<f32>>> {
        let body = json!({ "shape": batch.shape(), "data": batch.data });
        let resp = self.client.post(&self.endpoint).json(&body).send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(FeatureError::Status { status: status.as_u16(), body });
        }
        let value: Value = resp.json()?;
        parse_embeddings(&value, batch.len, self.dim)
    }
}

/// Decode an inference response, checking the batch size and dimension.
pub fn parse_embeddings(value: &Value, expected: usize, dim: usize) -> FeatureResult<Vec<Vec<f32>>> {
    let rows = value["embeddings"]
        .as_array()
        .ok_or_else(|| FeatureError::Model("missing \"embeddings\" array".to_string()))?;
    if rows.len() != expected {
        return Err(FeatureError::BatchSize { expected, got: rows.len() });
    }

    rows.iter()
        .map(|row| {
            let row = row
                .as_array()
                .ok_or_else(|| FeatureError::Model("embedding is not an array".to_string()))?;
            if row.len() != dim {
                return Err(FeatureError::Dimension { expected: dim, got: row.len() });
            }
            row.iter()
                .map(|v| {
                    v.as_f64()
                        .map(|x| x as f32)
                        .ok_or_else(|| FeatureError::Model(format!("non-numeric value {v}")))
                })
                .collect()
        })
        .collect()
}
