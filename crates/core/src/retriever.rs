use crate::embeddings::Embedder;
use crate::error::PipelineError;
use crate::models::RetrievedHit;
use crate::traits::VectorIndex;

/// Embeds the query and asks the store for the `top_k` nearest chunks.
///
/// With `filter_filename` set, the search is constrained to points whose
/// `filename` payload field equals it exactly (case-sensitive). Fewer than
/// `top_k` hits come back when the (filtered) index holds fewer points; zero
/// hits is a normal empty result, not an error. The store is not mutated.
pub async fn retrieve<E, S>(
    query: &str,
    embedder: &E,
    store: &S,
    top_k: usize,
    filter_filename: Option<&str>,
) -> Result<Vec<RetrievedHit>, PipelineError>
where
    E: Embedder + ?Sized,
    S: VectorIndex + Sync + ?Sized,
{
    if top_k == 0 {
        return Err(PipelineError::InvalidArgument(
            "top_k must be at least 1".to_string(),
        ));
    }

    let query_vector = embedder.embed(query)?;
    let hits = store.search(&query_vector, top_k, filter_filename).await?;
    Ok(hits)
}
