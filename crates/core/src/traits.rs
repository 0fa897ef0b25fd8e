use crate::error::StoreError;
use crate::models::{IndexedPoint, RetrievedHit};
use async_trait::async_trait;

/// Nearest-neighbour index over chunk vectors, with equality filtering on
/// the `filename` payload field. Implementations own all persisted state;
/// nothing in the pipeline holds index state of its own.
#[async_trait]
pub trait VectorIndex {
    /// Makes the collection available with the given dimensionality and
    /// cosine distance. Idempotent.
    async fn ensure_collection(&self, dimensions: usize) -> Result<(), StoreError>;

    /// Drops all points and recreates the collection empty. Point ids are
    /// batch positions, so a smaller batch would otherwise leave stale
    /// points from a previous, larger one.
    async fn reset_collection(&self, dimensions: usize) -> Result<(), StoreError>;

    /// Inserts or replaces points by id. A failure on a subset of points
    /// surfaces as [`crate::PartialUpsertError`] naming the failed ids;
    /// earlier successful upserts stay in place.
    async fn upsert(&self, points: &[IndexedPoint]) -> Result<(), StoreError>;

    /// Returns up to `top_k` nearest neighbours by cosine similarity,
    /// descending. An empty index or filtered subset yields an empty list,
    /// never an error. Read-only.
    async fn search(
        &self,
        query_vector: &[f32],
        top_k: usize,
        filter_filename: Option<&str>,
    ) -> Result<Vec<RetrievedHit>, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;
}
