use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pdf parse error: {0}")]
    PdfParse(String),

    #[error("docx parse error: {0}")]
    DocxParse(String),

    #[error("path has no file name: {0}")]
    MissingFileName(String),
}

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("cannot embed an empty batch")]
    EmptyBatch,

    #[error("embedding backend failure: {0}")]
    Backend(String),
}

/// A subset of points failed to persist. Earlier successful upserts are not
/// rolled back; upserts are idempotent by id, so retrying the named ids is safe.
#[derive(Debug, Error)]
#[error("partial upsert: {} point(s) failed to persist, ids {failed_ids:?}", failed_ids.len())]
pub struct PartialUpsertError {
    pub failed_ids: Vec<u64>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid response from {backend}: {details}")]
    BackendResponse { backend: String, details: String },

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("collection not available: {0}")]
    MissingCollection(String),

    #[error("vector has {actual} dimensions, collection expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    PartialUpsert(#[from] PartialUpsertError),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
