use chrono::Utc;
use clap::{Parser, Subcommand};
use doc_qa_core::{
    best_answer_json, discover_document_files, Embedder, HashedTrigramEmbedder, InMemoryStore,
    IndexingOptions, QaPipeline, QdrantStore, VectorIndex,
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "doc-qa", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Qdrant base URL
    #[arg(long, default_value = "http://localhost:6333")]
    qdrant_url: String,

    /// Qdrant collection
    #[arg(long, default_value = "doc_chunks")]
    collection: String,

    /// Use a process-local in-memory index instead of Qdrant. The index
    /// lives only for this invocation, so pair it with `ask --folder`.
    #[arg(long, default_value_t = false)]
    in_memory: bool,

    /// Lines per chunk window.
    #[arg(long, default_value_t = doc_qa_core::CHUNK_LINES)]
    chunk_lines: usize,
}

#[derive(Subcommand)]
enum Command {
    /// Chunk, embed, and index every PDF/DOCX under a folder.
    Ingest {
        /// Folder scanned recursively for documents.
        #[arg(long)]
        folder: PathBuf,
    },
    /// Retrieve the top matching chunks for a question.
    Ask {
        /// The question to answer from the indexed chunks.
        #[arg(long)]
        query: String,
        /// Folder to index before asking, skipped if the same batch was
        /// already indexed by this process.
        #[arg(long)]
        folder: Option<PathBuf>,
        /// Number of chunks to return.
        #[arg(long, default_value = "3")]
        top_k: usize,
        /// Only consider chunks from this source file name (exact match).
        #[arg(long)]
        filter_filename: Option<String>,
        /// Write the best answer's metadata and text as JSON to this path.
        #[arg(long)]
        best_answer_out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    let embedder = HashedTrigramEmbedder::default();
    let options = IndexingOptions {
        window_size: cli.chunk_lines,
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        started_at = %Utc::now().to_rfc3339(),
        "doc-qa boot"
    );

    if cli.in_memory {
        let store = InMemoryStore::new(embedder.dimensions());
        run(cli.command, QaPipeline::new(embedder, store, options)).await
    } else {
        let store = QdrantStore::new(&cli.qdrant_url, &cli.collection, embedder.dimensions());
        run(cli.command, QaPipeline::new(embedder, store, options)).await
    }
}

async fn run<S>(
    command: Command,
    pipeline: QaPipeline<HashedTrigramEmbedder, S>,
) -> anyhow::Result<()>
where
    S: VectorIndex + Sync,
{
    match command {
        Command::Ingest { folder } => {
            let files = discover_document_files(&folder);
            if files.is_empty() {
                anyhow::bail!("no pdf or docx files found in {}", folder.display());
            }

            let report = pipeline.reindex(&files).await?;
            for skipped in &report.skipped {
                warn!(path = %skipped.path.display(), reason = %skipped.reason, "skipped file");
            }

            println!(
                "{} chunks indexed, {} file(s) skipped",
                report.chunks.len(),
                report.skipped.len()
            );
        }
        Command::Ask {
            query,
            folder,
            top_k,
            filter_filename,
            best_answer_out,
        } => {
            if let Some(folder) = folder {
                let files = discover_document_files(&folder);
                if files.is_empty() {
                    anyhow::bail!("no pdf or docx files found in {}", folder.display());
                }

                if let Some(report) = pipeline.ensure_indexed(&files).await? {
                    for skipped in &report.skipped {
                        warn!(path = %skipped.path.display(), reason = %skipped.reason, "skipped file");
                    }
                    info!(chunks = report.chunks.len(), "indexed batch");
                }
            }

            let answers = pipeline.ask(&query, top_k, filter_filename.as_deref()).await?;

            if answers.is_empty() {
                println!("Answer not found in the provided document context.");
                return Ok(());
            }

            for (rank, answer) in answers.iter().enumerate() {
                let meta = &answer.payload.metadata;
                println!("Match #{} — score {:.3}", rank + 1, answer.score);
                println!("{}", answer.highlighted);
                println!(
                    "  file={} page={} chunk_id={} line_range={}",
                    meta.filename, meta.page, meta.chunk_id, meta.line_range
                );
            }

            if let Some(path) = best_answer_out {
                std::fs::write(&path, best_answer_json(&answers[0])?)?;
                println!("best answer written to {}", path.display());
            }
        }
    }

    Ok(())
}
