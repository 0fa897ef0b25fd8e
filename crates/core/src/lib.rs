pub mod chunking;
pub mod embeddings;
pub mod error;
pub mod extractor;
pub mod highlight;
pub mod indexer;
pub mod ingest;
pub mod models;
pub mod pipeline;
pub mod retriever;
pub mod stores;
pub mod traits;

pub use chunking::chunk_page;
pub use embeddings::{Embedder, HashedTrigramEmbedder, DEFAULT_EMBEDDING_DIMENSIONS};
pub use error::{
    EmbeddingError, ExtractionError, PartialUpsertError, PipelineError, StoreError,
};
pub use extractor::{extract_docx_chunks, extract_pdf_chunks};
pub use highlight::highlight_matching_lines;
pub use indexer::index_chunks;
pub use ingest::{
    detect_kind, discover_document_files, ingest_files_best_effort, ingest_folder_best_effort,
    DocumentKind, IngestionReport, SkippedFile,
};
pub use models::{
    BatchFingerprint, Chunk, ChunkMetadata, ChunkPayload, IndexedPoint, IndexingOptions,
    RetrievedHit, CHUNK_LINES,
};
pub use pipeline::{best_answer_json, Answer, QaPipeline};
pub use retriever::retrieve;
pub use stores::{InMemoryStore, QdrantStore};
pub use traits::VectorIndex;
