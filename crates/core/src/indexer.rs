use crate::embeddings::Embedder;
use crate::error::PipelineError;
use crate::models::{Chunk, IndexedPoint};
use crate::traits::VectorIndex;

/// Embeds chunk contents in one batch call and upserts the resulting points
/// into the store.
///
/// Point ids are the 0-based position of each chunk within this batch; they
/// are not stable across separate indexing calls. This function has no
/// already-indexed guard of its own and will overwrite on id collision when
/// called twice; gating re-indexing is the caller's policy.
pub async fn index_chunks<E, S>(
    chunks: &[Chunk],
    embedder: &E,
    store: &S,
) -> Result<(), PipelineError>
where
    E: Embedder + ?Sized,
    S: VectorIndex + Sync + ?Sized,
{
    let contents: Vec<String> = chunks.iter().map(|chunk| chunk.content.clone()).collect();
    let vectors = embedder.embed_batch(&contents)?;

    let points: Vec<IndexedPoint> = chunks
        .iter()
        .cloned()
        .zip(vectors)
        .enumerate()
        .map(|(position, (chunk, vector))| IndexedPoint {
            id: position as u64,
            vector,
            payload: chunk.into_payload(),
        })
        .collect();

    store.upsert(&points).await?;
    Ok(())
}
