//! Formatting helpers shared by the text renderers.

/// Format a word count with thousands separators (e.g., "12,345").
pub fn format_words(words: u64) -> String {
    let digits = words.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a word count compactly (e.g., "14.2K").
pub fn format_words_compact(words: u64) -> String {
    if words >= 1_000_000 {
        format!("{:.1}M", words as f64 / 1_000_000.0)
    } else if words >= 1_000 {
        format!("{:.1}K", words as f64 / 1_000.0)
    } else {
        words.to_string()
    }
}

/// Render a 0-100 percentage as a fixed-width text bar.
pub fn progress_bar(pct: u8, width: usize) -> String {
    let filled = (usize::from(pct.min(100)) * width + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Format an optional target, or a dash if missing.
pub fn format_target(target: Option<u64>) -> String {
    match target {
        Some(t) => format_words(t),
        None => "-".to_string(),
    }
}
