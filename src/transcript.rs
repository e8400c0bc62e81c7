//! Transcript post-processing.

/// Strip per-line timestamp prefixes from raw engine output.
///
/// The engine emits lines like `[00:00:01.000 --> 00:00:04.000]   text`.
/// For each line, the text after the first `]` is kept, trimmed of
/// surrounding whitespace. Lines without a `]`, or where `]` is the final
/// character, carry no content and are dropped. Surviving lines are
/// rejoined with `\n`.
pub fn strip_timestamps(raw: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();

    for line in raw.split('\n') {
        if let Some(idx) = line.find(']')
            && idx + 1 < line.len()
        {
            kept.push(line[idx + 1..].trim());
        }
    }

    kept.join("\n")
}
