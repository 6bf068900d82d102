// Free-form rank list parsing for the included/excluded inputs.

/// Parse a comma-separated list of ranks.
///
/// Each token is trimmed; tokens made only of ASCII digits become ranks and
/// anything else (blank, signed, non-numeric, too large) is silently dropped.
pub fn parse_ranks(text: &str) -> Vec<u32> {
    text.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|t| t.parse().ok())
        .collect()
}

/// Render ranks back into the comma-separated input form.
pub fn format_ranks(ranks: &[u32]) -> String {
    ranks
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
