use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

/// Number of source lines per chunk window.
pub const CHUNK_LINES: usize = 20;

/// Positional provenance of a chunk within its source document.
///
/// `chunk_id` is `"{page}-{window_index}"` with a zero-based window index.
/// `line_range` is `"{start}-{end}"`, 1-based inclusive, relative to the
/// page's own line numbering. DOCX documents have no page concept and are
/// fixed at page 1, with the whole paragraph sequence as their "page".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkMetadata {
    pub filename: String,
    pub page: u32,
    pub chunk_id: String,
    pub line_range: String,
}

/// A fixed-size window of source lines plus its provenance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    pub content: String,
    pub metadata: ChunkMetadata,
}

impl Chunk {
    pub fn into_payload(self) -> ChunkPayload {
        ChunkPayload {
            metadata: self.metadata,
            text: self.content,
        }
    }
}

/// The persisted payload of an indexed point: chunk metadata plus the text.
///
/// Metadata fields are flattened so `filename` stays a top-level payload
/// field the store can filter on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkPayload {
    #[serde(flatten)]
    pub metadata: ChunkMetadata,
    pub text: String,
}

/// The persisted unit in the vector store. Ids are the 0-based position of
/// the chunk within its ingestion batch and are not stable across batches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexedPoint {
    pub id: u64,
    pub vector: Vec<f32>,
    pub payload: ChunkPayload,
}

/// One retrieval result: cosine similarity in [-1, 1] plus the stored payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievedHit {
    pub score: f32,
    pub payload: ChunkPayload,
}

#[derive(Debug, Clone, Copy)]
pub struct IndexingOptions {
    pub window_size: usize,
}

impl Default for IndexingOptions {
    fn default() -> Self {
        Self {
            window_size: CHUNK_LINES,
        }
    }
}

/// Identity of one ingestion batch: a digest over the (file name, size)
/// pairs of the batch, order-sensitive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchFingerprint {
    pub digest: String,
    pub computed_at: DateTime<Utc>,
}

impl BatchFingerprint {
    pub fn for_files(paths: &[PathBuf]) -> Result<Self, std::io::Error> {
        let mut hasher = Sha256::new();
        for path in paths {
            let size = std::fs::metadata(path)?.len();
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();
            hasher.update(name.as_bytes());
            hasher.update(size.to_le_bytes());
        }
        Ok(Self {
            digest: format!("{:x}", hasher.finalize()),
            computed_at: Utc::now(),
        })
    }

    pub fn matches(&self, other: &BatchFingerprint) -> bool {
        self.digest == other.digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn payload_flattens_metadata_fields() {
        let payload = ChunkPayload {
            metadata: ChunkMetadata {
                filename: "report.pdf".to_string(),
                page: 2,
                chunk_id: "2-0".to_string(),
                line_range: "1-20".to_string(),
            },
            text: "line one\nline two".to_string(),
        };

        let value = serde_json::to_value(&payload).expect("payload should serialize");
        assert_eq!(value["filename"], "report.pdf");
        assert_eq!(value["page"], 2);
        assert_eq!(value["chunk_id"], "2-0");
        assert_eq!(value["line_range"], "1-20");
        assert_eq!(value["text"], "line one\nline two");

        let back: ChunkPayload =
            serde_json::from_value(value).expect("payload should deserialize");
        assert_eq!(back, payload);
    }

    #[test]
    fn fingerprint_is_reproducible() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let file_path = dir.path().join("a.pdf");
        std::fs::write(&file_path, b"abc")?;

        let files = vec![file_path];
        let first = BatchFingerprint::for_files(&files)?;
        let second = BatchFingerprint::for_files(&files)?;
        assert!(first.matches(&second));
        Ok(())
    }

    #[test]
    fn fingerprint_changes_with_batch_contents() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let first_path = dir.path().join("a.pdf");
        let second_path = dir.path().join("b.docx");
        std::fs::write(&first_path, b"abc")?;
        std::fs::write(&second_path, b"abcdef")?;

        let one = BatchFingerprint::for_files(&[first_path.clone()])?;
        let both = BatchFingerprint::for_files(&[first_path, second_path])?;
        assert!(!one.matches(&both));
        Ok(())
    }
}
