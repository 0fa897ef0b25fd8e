use crate::chunking::chunk_page;
use crate::error::ExtractionError;
use crate::models::{Chunk, IndexingOptions};
use lopdf::Document;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

fn base_name(path: &Path) -> Result<String, ExtractionError> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| ExtractionError::MissingFileName(path.display().to_string()))
}

/// Extracts chunks from a PDF, page by page in document order.
///
/// Each page's text is split on the extraction library's native line breaks
/// and windowed by the chunker under that page's number.
pub fn extract_pdf_chunks(
    path: &Path,
    options: IndexingOptions,
) -> Result<Vec<Chunk>, ExtractionError> {
    let filename = base_name(path)?;
    let document =
        Document::load(path).map_err(|error| ExtractionError::PdfParse(error.to_string()))?;

    let mut chunks = Vec::new();
    for (page_no, _page_id) in document.get_pages() {
        let text = document
            .extract_text(&[page_no])
            .map_err(|error| ExtractionError::PdfParse(error.to_string()))?;

        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        chunks.extend(chunk_page(&filename, page_no, &lines, options.window_size));
    }

    Ok(chunks)
}

/// Extracts chunks from a DOCX. The whole document counts as page 1, with
/// the filtered paragraph sequence standing in for page lines.
pub fn extract_docx_chunks(
    path: &Path,
    options: IndexingOptions,
) -> Result<Vec<Chunk>, ExtractionError> {
    let filename = base_name(path)?;
    let paragraphs = read_docx_paragraphs(path)?;
    Ok(chunk_page(&filename, 1, &paragraphs, options.window_size))
}

/// Reads paragraph texts from `word/document.xml` in document order,
/// dropping paragraphs that are empty or whitespace-only.
///
/// DOCX is a ZIP archive; the main content is WordprocessingML where each
/// `w:p` paragraph holds its text in `w:t` runs.
fn read_docx_paragraphs(path: &Path) -> Result<Vec<String>, ExtractionError> {
    let file = File::open(path)?;
    let mut archive =
        ZipArchive::new(file).map_err(|error| ExtractionError::DocxParse(error.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|error| ExtractionError::DocxParse(error.to_string()))?
        .read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) if element.name().as_ref() == b"w:t" => {
                in_text_run = true;
            }
            Ok(Event::Text(text)) if in_text_run => {
                let value = text
                    .unescape()
                    .map_err(|error| ExtractionError::DocxParse(error.to_string()))?;
                current.push_str(&value);
            }
            Ok(Event::End(element)) => match element.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => {
                    if !current.trim().is_empty() {
                        paragraphs.push(std::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(error) => return Err(ExtractionError::DocxParse(error.to_string())),
            Ok(_) => {}
        }
    }

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_docx(path: &Path, document_xml: &str) -> Result<(), Box<dyn std::error::Error>> {
        let file = File::create(path)?;
        let mut writer = ZipWriter::new(file);
        writer.start_file("word/document.xml", SimpleFileOptions::default())?;
        writer.write_all(document_xml.as_bytes())?;
        writer.finish()?;
        Ok(())
    }

    #[test]
    fn corrupt_pdf_is_a_parse_error() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"%PDF-1.4\n%broken")?;

        let result = extract_pdf_chunks(&path, IndexingOptions::default());
        assert!(matches!(result, Err(ExtractionError::PdfParse(_))));
        Ok(())
    }

    #[test]
    fn docx_paragraphs_are_read_in_order_and_blank_ones_dropped(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("notes.docx");
        write_docx(
            &path,
            concat!(
                r#"<?xml version="1.0"?>"#,
                r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
                "<w:body>",
                "<w:p><w:r><w:t>First paragraph</w:t></w:r></w:p>",
                r#"<w:p><w:r><w:t xml:space="preserve">   </w:t></w:r></w:p>"#,
                "<w:p></w:p>",
                r#"<w:p><w:r><w:t>Second</w:t></w:r><w:r><w:t xml:space="preserve"> paragraph</w:t></w:r></w:p>"#,
                "</w:body>",
                "</w:document>",
            ),
        )?;

        let paragraphs = read_docx_paragraphs(&path)?;
        assert_eq!(paragraphs, ["First paragraph", "Second paragraph"]);
        Ok(())
    }

    #[test]
    fn docx_extraction_is_a_single_page_one() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("long.docx");

        let body: String = (1..=25)
            .map(|n| format!("<w:p><w:r><w:t>paragraph {n}</w:t></w:r></w:p>"))
            .collect();
        write_docx(
            &path,
            &format!(
                r#"<?xml version="1.0"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
            ),
        )?;

        let chunks = extract_docx_chunks(&path, IndexingOptions::default())?;
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|chunk| chunk.metadata.page == 1));
        assert_eq!(chunks[0].metadata.chunk_id, "1-0");
        assert_eq!(chunks[0].metadata.line_range, "1-20");
        assert_eq!(chunks[1].metadata.chunk_id, "1-1");
        assert_eq!(chunks[1].metadata.line_range, "21-25");
        assert_eq!(chunks[1].metadata.filename, "long.docx");
        Ok(())
    }

    #[test]
    fn zip_without_document_xml_is_a_docx_parse_error() -> Result<(), Box<dyn std::error::Error>>
    {
        let dir = tempdir()?;
        let path = dir.path().join("hollow.docx");

        let file = File::create(&path)?;
        let mut writer = ZipWriter::new(file);
        writer.start_file("word/unrelated.xml", SimpleFileOptions::default())?;
        writer.write_all(b"<x/>")?;
        writer.finish()?;

        let result = extract_docx_chunks(&path, IndexingOptions::default());
        assert!(matches!(result, Err(ExtractionError::DocxParse(_))));
        Ok(())
    }
}
