/// Marks every line of `text` that case-insensitively contains `query`.
///
/// Matching lines are wrapped in a pointer-plus-bold marker for display;
/// non-matching lines pass through unchanged. An empty query matches every
/// line, since substring search with an empty needle always succeeds.
pub fn highlight_matching_lines(text: &str, query: &str) -> String {
    let needle = query.to_lowercase();

    text.lines()
        .map(|line| {
            if line.to_lowercase().contains(&needle) {
                format!("👉 **{line}**")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
