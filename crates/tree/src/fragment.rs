//! Fragmenter — cut extracted document text into tree-sized pieces.
//!
//! Document readers hand over a list of texts (pages, paragraphs, whole
//! files). Each becomes one or more fragments of at most `max_chars`
//! characters, optionally merged with its neighbours and optionally
//! overlapping the previous fragment so sentences cut at a boundary keep
//! some context.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentOptions {
    /// Upper bound on fragment length, in characters.
    pub max_chars: usize,

    /// Characters repeated from the end of the previous fragment.
    #[serde(default)]
    pub overlap: usize,

    /// Join consecutive short texts into one fragment.
    #[serde(default)]
    pub merge: bool,
}

impl Default for FragmentOptions {
    fn default() -> Self {
        Self {
            max_chars: 512,
            overlap: 0,
            merge: false,
        }
    }
}

/// Split `texts` into fragments according to `options`.
///
/// Blank texts are dropped. Lengths are counted in characters, so a
/// fragment never ends inside a UTF-8 sequence.
pub fn fragment<S: AsRef<str>>(texts: &[S], options: &FragmentOptions) -> Vec<String> {
    let max = options.max_chars.max(1);
    let overlap = options.overlap.min(max - 1);

    let mut out = Vec::new();
    let mut pending = String::new();
    let mut pending_len = 0;

    for text in texts.iter().map(AsRef::as_ref) {
        if text.trim().is_empty() {
            continue;
        }

        if options.merge {
            let len = text.chars().count();
            let joined = if pending.is_empty() {
                len
            } else {
                pending_len + 1 + len
            };
            if joined <= max {
                if !pending.is_empty() {
                    pending.push('\n');
                }
                pending.push_str(text);
                pending_len = joined;
                continue;
            }
            if !pending.is_empty() {
                emit(&mut out, std::mem::take(&mut pending), max, overlap);
            }
            if len <= max {
                pending.push_str(text);
                pending_len = len;
                continue;
            }
        }

        emit(&mut out, text.to_string(), max, overlap);
    }

    if !pending.is_empty() {
        emit(&mut out, pending, max, overlap);
    }
    out
}

fn emit(out: &mut Vec<String>, text: String, max: usize, overlap: usize) {
    let text = match out.last() {
        Some(previous) if overlap > 0 => format!("{}\n{text}", tail(previous, overlap)),
        _ => text,
    };
    out.extend(windows(&text, max, overlap));
}

/// Last `n` characters of `s`.
fn tail(s: &str, n: usize) -> &str {
    let skip = s.chars().count().saturating_sub(n);
    match s.char_indices().nth(skip) {
        Some((offset, _)) => &s[offset..],
        None => "",
    }
}

/// Cover `text` with windows of `max` characters, each starting `overlap`
/// characters before the previous one ends.
fn windows(text: &str, max: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max {
        return vec![text.to_string()];
    }

    let stride = max - overlap;
    let mut pieces = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + max).min(chars.len());
        pieces.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += stride;
    }
    pieces
}
