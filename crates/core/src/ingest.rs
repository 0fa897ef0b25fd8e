use crate::error::PipelineError;
use crate::extractor::{extract_docx_chunks, extract_pdf_chunks};
use crate::models::{Chunk, IndexingOptions};
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

/// Resolves the extractor for a path by extension, case-insensitively.
/// Unsupported extensions resolve to `None` and are never an error.
pub fn detect_kind(path: &Path) -> Option<DocumentKind> {
    let extension = path.extension().and_then(|ext| ext.to_str())?;
    if extension.eq_ignore_ascii_case("pdf") {
        Some(DocumentKind::Pdf)
    } else if extension.eq_ignore_ascii_case("docx") {
        Some(DocumentKind::Docx)
    } else {
        None
    }
}

/// Recursively collects supported document files under `folder`, sorted.
pub fn discover_document_files(folder: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .into_iter()
        .filter_map(|item| item.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        if detect_kind(entry.path()).is_some() {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort_unstable();
    files
}

#[derive(Debug)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug)]
pub struct IngestionReport {
    pub chunks: Vec<Chunk>,
    pub skipped: Vec<SkippedFile>,
}

/// Extracts chunks from every file in the batch, isolating per-file
/// failures: an unreadable or unsupported file lands in `skipped` with its
/// reason and never aborts the rest of the batch.
pub fn ingest_files_best_effort(paths: &[PathBuf], options: IndexingOptions) -> IngestionReport {
    let mut chunks = Vec::new();
    let mut skipped = Vec::new();

    for path in paths {
        let extracted = match detect_kind(path) {
            Some(DocumentKind::Pdf) => extract_pdf_chunks(path, options),
            Some(DocumentKind::Docx) => extract_docx_chunks(path, options),
            None => {
                warn!(path = %path.display(), "unsupported file extension, skipping");
                skipped.push(SkippedFile {
                    path: path.clone(),
                    reason: "unsupported file extension".to_string(),
                });
                continue;
            }
        };

        match extracted {
            Ok(file_chunks) => chunks.extend(file_chunks),
            Err(error) => {
                warn!(path = %path.display(), reason = %error, "skipping unreadable file");
                skipped.push(SkippedFile {
                    path: path.clone(),
                    reason: error.to_string(),
                });
            }
        }
    }

    IngestionReport { chunks, skipped }
}

/// Folder variant of [`ingest_files_best_effort`]; errors when the folder
/// holds no supported documents at all.
pub fn ingest_folder_best_effort(
    folder: &Path,
    options: IndexingOptions,
) -> Result<IngestionReport, PipelineError> {
    let files = discover_document_files(folder);

    if files.is_empty() {
        return Err(PipelineError::InvalidArgument(format!(
            "no pdf or docx files found in {}",
            folder.display()
        )));
    }

    Ok(ingest_files_best_effort(&files, options))
}
