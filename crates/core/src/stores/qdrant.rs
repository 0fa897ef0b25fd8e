use crate::error::{PartialUpsertError, StoreError};
use crate::models::{IndexedPoint, RetrievedHit};
use crate::traits::VectorIndex;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

const UPSERT_BATCH: usize = 64;

pub struct QdrantStore {
    endpoint: String,
    collection: String,
    client: Client,
    vector_size: usize,
}

impl QdrantStore {
    pub fn new(
        endpoint: impl Into<String>,
        collection: impl Into<String>,
        vector_size: usize,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            collection: collection.into(),
            client: Client::new(),
            vector_size,
        }
    }

    fn check_dimensions(&self, actual: usize) -> Result<(), StoreError> {
        if actual != self.vector_size {
            return Err(StoreError::DimensionMismatch {
                expected: self.vector_size,
                actual,
            });
        }
        Ok(())
    }

    async fn upsert_batch(&self, points: &[&IndexedPoint]) -> Result<(), StoreError> {
        let body: Vec<Value> = points
            .iter()
            .map(|point| {
                json!({
                    "id": point.id,
                    "vector": point.vector,
                    "payload": point.payload,
                })
            })
            .collect();

        let response = self
            .client
            .put(format!(
                "{}/collections/{}/points?wait=true",
                self.endpoint, self.collection
            ))
            .json(&json!({ "points": body }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::BackendResponse {
                backend: "qdrant".to_string(),
                details: response.status().to_string(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl VectorIndex for QdrantStore {
    async fn ensure_collection(&self, dimensions: usize) -> Result<(), StoreError> {
        self.check_dimensions(dimensions)?;

        let response = self
            .client
            .put(format!("{}/collections/{}", self.endpoint, self.collection))
            .json(&json!({
                "vectors": { "size": dimensions, "distance": "Cosine" },
            }))
            .send()
            .await?;

        // 409 means the collection already exists, which is fine.
        if !response.status().is_success() && response.status().as_u16() != 409 {
            return Err(StoreError::BackendResponse {
                backend: "qdrant".to_string(),
                details: response.status().to_string(),
            });
        }

        Ok(())
    }

    async fn reset_collection(&self, dimensions: usize) -> Result<(), StoreError> {
        self.check_dimensions(dimensions)?;

        let response = self
            .client
            .delete(format!("{}/collections/{}", self.endpoint, self.collection))
            .send()
            .await?;

        if !response.status().is_success() && response.status().as_u16() != 404 {
            return Err(StoreError::BackendResponse {
                backend: "qdrant".to_string(),
                details: response.status().to_string(),
            });
        }

        self.ensure_collection(dimensions).await
    }

    async fn upsert(&self, points: &[IndexedPoint]) -> Result<(), StoreError> {
        for point in points {
            self.check_dimensions(point.vector.len())?;
        }

        let mut failed_ids = Vec::new();
        let mut first_error = None;
        let mut any_succeeded = false;

        for batch in points.chunks(UPSERT_BATCH) {
            let batch: Vec<&IndexedPoint> = batch.iter().collect();
            match self.upsert_batch(&batch).await {
                Ok(()) => any_succeeded = true,
                Err(error) => {
                    failed_ids.extend(batch.iter().map(|point| point.id));
                    first_error.get_or_insert(error);
                }
            }
        }

        match first_error {
            // Nothing was persisted, so this is a store failure, not a
            // partial one; surface the underlying cause.
            Some(error) if !any_succeeded => Err(error),
            Some(_) => Err(PartialUpsertError { failed_ids }.into()),
            None => Ok(()),
        }
    }

    async fn search(
        &self,
        query_vector: &[f32],
        top_k: usize,
        filter_filename: Option<&str>,
    ) -> Result<Vec<RetrievedHit>, StoreError> {
        self.check_dimensions(query_vector.len())?;

        let mut body = json!({
            "vector": query_vector,
            "limit": top_k,
            "with_payload": true,
        });
        if let Some(filename) = filter_filename {
            body["filter"] = json!({
                "must": [
                    { "key": "filename", "match": { "value": filename } }
                ]
            });
        }

        let response = self
            .client
            .post(format!(
                "{}/collections/{}/points/search",
                self.endpoint, self.collection
            ))
            .json(&body)
            .send()
            .await?;

        if response.status().as_u16() == 404 {
            return Err(StoreError::MissingCollection(self.collection.clone()));
        }
        if !response.status().is_success() {
            return Err(StoreError::BackendResponse {
                backend: "qdrant".to_string(),
                details: response.status().to_string(),
            });
        }

        let parsed: Value = response.json().await?;
        let raw_hits = parsed
            .pointer("/result")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut hits = Vec::with_capacity(raw_hits.len());
        for hit in raw_hits {
            let score = hit
                .pointer("/score")
                .and_then(Value::as_f64)
                .unwrap_or(0.0) as f32;
            let payload = hit
                .pointer("/payload")
                .cloned()
                .ok_or_else(|| StoreError::BackendResponse {
                    backend: "qdrant".to_string(),
                    details: "search hit without payload".to_string(),
                })?;
            hits.push(RetrievedHit {
                score,
                payload: serde_json::from_value(payload)?,
            });
        }

        Ok(hits)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let response = self
            .client
            .post(format!(
                "{}/collections/{}/points/count",
                self.endpoint, self.collection
            ))
            .json(&json!({ "exact": true }))
            .send()
            .await?;

        if response.status().as_u16() == 404 {
            return Err(StoreError::MissingCollection(self.collection.clone()));
        }
        if !response.status().is_success() {
            return Err(StoreError::BackendResponse {
                backend: "qdrant".to_string(),
                details: response.status().to_string(),
            });
        }

        let parsed: Value = response.json().await?;
        let count = parsed
            .pointer("/result/count")
            .and_then(Value::as_u64)
            .ok_or_else(|| StoreError::BackendResponse {
                backend: "qdrant".to_string(),
                details: "count response without result.count".to_string(),
            })?;

        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChunkMetadata, ChunkPayload};

    fn point(id: u64, vector: Vec<f32>) -> IndexedPoint {
        IndexedPoint {
            id,
            vector,
            payload: ChunkPayload {
                metadata: ChunkMetadata {
                    filename: "a.pdf".to_string(),
                    page: 1,
                    chunk_id: format!("1-{id}"),
                    line_range: "1-20".to_string(),
                },
                text: "text".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn upsert_rejects_wrong_dimensions_before_any_request() {
        let store = QdrantStore::new("http://localhost:6333", "doc_chunks", 4);
        let result = store.upsert(&[point(0, vec![0.1, 0.2])]).await;
        assert!(matches!(
            result,
            Err(StoreError::DimensionMismatch {
                expected: 4,
                actual: 2
            })
        ));
    }

    #[tokio::test]
    async fn unreachable_store_is_a_transport_error_not_a_partial_upsert() {
        // Nothing listens on the discard port, so every batch fails and no
        // point is persisted; the connection failure must surface as-is.
        let store = QdrantStore::new("http://127.0.0.1:9", "doc_chunks", 2);
        let result = store.upsert(&[point(0, vec![0.1, 0.2])]).await;
        assert!(matches!(result, Err(StoreError::Http(_))));
    }

    #[tokio::test]
    async fn search_rejects_wrong_query_dimensions() {
        let store = QdrantStore::new("http://localhost:6333", "doc_chunks", 4);
        let result = store.search(&[0.5; 3], 3, None).await;
        assert!(matches!(result, Err(StoreError::DimensionMismatch { .. })));
    }
}
