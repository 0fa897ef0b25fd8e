use crate::error::{PartialUpsertError, StoreError};
use crate::models::{IndexedPoint, RetrievedHit};
use crate::traits::VectorIndex;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Session-lifetime vector store: a full-scan cosine similarity index held
/// in process memory. Contents live exactly as long as the process.
pub struct InMemoryStore {
    vector_size: usize,
    points: RwLock<Vec<IndexedPoint>>,
}

impl InMemoryStore {
    pub fn new(vector_size: usize) -> Self {
        Self {
            vector_size,
            points: RwLock::new(Vec::new()),
        }
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[async_trait]
impl VectorIndex for InMemoryStore {
    async fn ensure_collection(&self, dimensions: usize) -> Result<(), StoreError> {
        if dimensions != self.vector_size {
            return Err(StoreError::DimensionMismatch {
                expected: self.vector_size,
                actual: dimensions,
            });
        }
        Ok(())
    }

    async fn reset_collection(&self, dimensions: usize) -> Result<(), StoreError> {
        self.ensure_collection(dimensions).await?;
        self.points.write().await.clear();
        Ok(())
    }

    async fn upsert(&self, points: &[IndexedPoint]) -> Result<(), StoreError> {
        let mut stored = self.points.write().await;
        let mut failed_ids = Vec::new();

        for point in points {
            if point.vector.len() != self.vector_size {
                failed_ids.push(point.id);
                continue;
            }

            match stored.iter_mut().find(|existing| existing.id == point.id) {
                Some(existing) => *existing = point.clone(),
                None => stored.push(point.clone()),
            }
        }

        if !failed_ids.is_empty() {
            return Err(PartialUpsertError { failed_ids }.into());
        }

        Ok(())
    }

    async fn search(
        &self,
        query_vector: &[f32],
        top_k: usize,
        filter_filename: Option<&str>,
    ) -> Result<Vec<RetrievedHit>, StoreError> {
        if query_vector.len() != self.vector_size {
            return Err(StoreError::DimensionMismatch {
                expected: self.vector_size,
                actual: query_vector.len(),
            });
        }

        let stored = self.points.read().await;
        let mut hits: Vec<RetrievedHit> = stored
            .iter()
            .filter(|point| {
                filter_filename
                    .map(|filename| point.payload.metadata.filename == filename)
                    .unwrap_or(true)
            })
            .map(|point| RetrievedHit {
                score: cosine_similarity(query_vector, &point.vector),
                payload: point.payload.clone(),
            })
            .collect();

        hits.sort_by(|left, right| right.score.total_cmp(&left.score));
        hits.truncate(top_k);
        Ok(hits)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.points.read().await.len())
    }
}
