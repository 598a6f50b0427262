pub const DEFAULT_WORD_LIMIT: usize = 500;
pub const EMPTY_SUMMARY_PROMPT: &str =
    "Please upload a ZIP file containing a text file to summarize.";

/// Local stand-in when the summarizer service is unreachable: the first
/// `word_limit` space-separated words followed by an ellipsis. Line breaks
/// stay inside the words they separate.
pub fn preview(text: &str, word_limit: usize) -> String {
    if text.trim().is_empty() {
        return EMPTY_SUMMARY_PROMPT.to_string();
    }
    let words: Vec<&str> = text.split(' ').take(word_limit).collect();
    format!("{}...", words.join(" "))
}
