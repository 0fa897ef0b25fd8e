use crate::models::{Chunk, ChunkMetadata};

/// Splits one page's lines into consecutive, non-overlapping windows of
/// `window_size` lines. The final window holds the remainder and may be
/// shorter; an empty line sequence produces no chunks.
///
/// Pure and deterministic: identical inputs yield identical chunk sequences.
pub fn chunk_page(filename: &str, page: u32, lines: &[String], window_size: usize) -> Vec<Chunk> {
    if window_size == 0 {
        return Vec::new();
    }

    lines
        .chunks(window_size)
        .enumerate()
        .map(|(window_index, window)| {
            let start = window_index * window_size + 1;
            let end = start + window.len() - 1;
            Chunk {
                content: window.join("\n"),
                metadata: ChunkMetadata {
                    filename: filename.to_string(),
                    page,
                    chunk_id: format!("{page}-{window_index}"),
                    line_range: format!("{start}-{end}"),
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_lines(count: usize) -> Vec<String> {
        (1..=count).map(|n| format!("line {n}")).collect()
    }

    #[test]
    fn empty_input_produces_no_chunks() {
        let chunks = chunk_page("a.pdf", 1, &[], 20);
        assert!(chunks.is_empty());
    }

    #[test]
    fn chunk_count_is_ceil_of_lines_over_window() {
        for (line_count, window, expected) in
            [(1, 20, 1), (20, 20, 1), (21, 20, 2), (45, 20, 3), (40, 20, 2)]
        {
            let chunks = chunk_page("a.pdf", 1, &numbered_lines(line_count), window);
            assert_eq!(chunks.len(), expected, "lines={line_count} window={window}");
        }
    }

    #[test]
    fn concatenated_chunks_reconstruct_the_page() {
        let lines = numbered_lines(45);
        let chunks = chunk_page("a.pdf", 1, &lines, 20);

        let reconstructed: Vec<String> = chunks
            .iter()
            .flat_map(|chunk| chunk.content.lines().map(str::to_string))
            .collect();
        assert_eq!(reconstructed, lines);
    }

    #[test]
    fn line_ranges_are_contiguous_and_non_overlapping() {
        let chunks = chunk_page("a.pdf", 1, &numbered_lines(73), 20);

        let bounds: Vec<(usize, usize)> = chunks
            .iter()
            .map(|chunk| {
                let (start, end) = chunk
                    .metadata
                    .line_range
                    .split_once('-')
                    .expect("line_range is start-end");
                (start.parse().unwrap(), end.parse().unwrap())
            })
            .collect();

        assert_eq!(bounds[0].0, 1);
        for pair in bounds.windows(2) {
            assert_eq!(pair[0].1 + 1, pair[1].0);
        }
    }

    #[test]
    fn forty_five_line_page_with_window_twenty() {
        let chunks = chunk_page("report.pdf", 1, &numbered_lines(45), 20);

        assert_eq!(chunks.len(), 3);
        let ids: Vec<&str> = chunks
            .iter()
            .map(|chunk| chunk.metadata.chunk_id.as_str())
            .collect();
        let ranges: Vec<&str> = chunks
            .iter()
            .map(|chunk| chunk.metadata.line_range.as_str())
            .collect();
        assert_eq!(ids, ["1-0", "1-1", "1-2"]);
        assert_eq!(ranges, ["1-20", "21-40", "41-45"]);
    }

    #[test]
    fn chunking_is_idempotent() {
        let lines = numbered_lines(33);
        let first = chunk_page("a.docx", 1, &lines, 20);
        let second = chunk_page("a.docx", 1, &lines, 20);
        assert_eq!(first, second);
    }

    #[test]
    fn page_number_flows_into_ids() {
        let chunks = chunk_page("a.pdf", 7, &numbered_lines(21), 20);
        assert_eq!(chunks[0].metadata.chunk_id, "7-0");
        assert_eq!(chunks[1].metadata.chunk_id, "7-1");
        assert_eq!(chunks[1].metadata.line_range, "21-21");
    }
}
