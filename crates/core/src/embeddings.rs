use crate::error::EmbeddingError;

const DEFAULT: usize = 384;

pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = DEFAULT;

/// Text-to-vector collaborator with a fixed output dimensionality.
pub trait Embedder {
    fn dimensions(&self) -> usize;

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Batch embedding. Behaviorally equivalent to mapping [`Embedder::embed`]
    /// over the batch; backends may override it with a true batched call.
    /// An empty batch is invalid input.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Err(EmbeddingError::EmptyBatch);
        }
        texts.iter().map(|text| self.embed(text)).collect()
    }
}

/// Deterministic offline embedder: hashed character trigrams, L2-normalized.
#[derive(Debug, Clone, Copy)]
pub struct HashedTrigramEmbedder {
    pub dimensions: usize,
}

impl Default for HashedTrigramEmbedder {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
        }
    }
}

impl Embedder for HashedTrigramEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let dimensions = self.dimensions.max(1);
        let mut vector = vec![0f32; dimensions];

        let lowered = text.to_lowercase();
        let chars: Vec<char> = lowered.chars().collect();
        for trigram in chars.windows(3) {
            let bucket = (hash_trigram(trigram) % dimensions as u64) as usize;
            vector[bucket] += 1.0;
        }

        normalize(&mut vector);
        Ok(vector)
    }
}

// FNV-1a over the trigram's UTF-8 bytes.
fn hash_trigram(trigram: &[char]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut buf = [0u8; 4];
    trigram.iter().fold(FNV_OFFSET, |hash, ch| {
        ch.encode_utf8(&mut buf)
            .bytes()
            .fold(hash, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME))
    })
}

fn normalize(vector: &mut [f32]) {
    let magnitude = vector.iter().map(|value| value * value).sum::<f32>().sqrt();
    if magnitude > 0.0 {
        for value in vector {
            *value /= magnitude;
        }
    }
}
