//! Extractive summarizer: keep the lead of the text.
//!
//! Whitespace is flattened, then the text is cut at the last sentence end
//! that fits in `max_chars`. When no sentence ends far enough in, the cut
//! falls back to a word boundary and finally to a hard character cut.

use async_trait::async_trait;
use mazewalk_core::{ModelError, Summarizer};

#[derive(Debug, Clone)]
pub struct LeadSummarizer {
    max_chars: usize,
}

impl LeadSummarizer {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl Default for LeadSummarizer {
    fn default() -> Self {
        Self::new(240)
    }
}

#[async_trait]
impl Summarizer for LeadSummarizer {
    fn name(&self) -> &str {
        "lead"
    }

    async fn summarize(&self, text: &str) -> Result<String, ModelError> {
        if self.max_chars == 0 {
            return Err(ModelError::SummarizationFailed(
                "summary length must be > 0".into(),
            ));
        }
        Ok(lead(text, self.max_chars))
    }
}

fn lead(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let chars: Vec<char> = flat.chars().collect();
    if chars.len() <= max {
        return flat;
    }

    let window = &chars[..max];
    let sentence_end = window
        .iter()
        .rposition(|c| matches!(c, '.' | '!' | '?' | '。'))
        .filter(|&i| i + 1 >= max / 3);
    if let Some(end) = sentence_end {
        return window[..=end].iter().collect();
    }

    // Leave room for the ellipsis.
    let window = &chars[..max - 1];
    let cut = window
        .iter()
        .rposition(|c| *c == ' ')
        .filter(|&i| i > 0)
        .unwrap_or(window.len());
    let mut out: String = window[..cut].iter().collect();
    out.push('…');
    out
}
