//! Fenced code block processing.

/// Outcome of offering a fenced code block to a processor.
pub enum ProcessResult {
    /// The processor claimed the block; emit this HTML in its place.
    Inline(String),
    /// The processor declined; try the next one.
    PassThrough,
}

/// Hook for transforming fenced code blocks during rendering.
///
/// Processors are checked in order when a code block ends; the first
/// returning a non-[`PassThrough`](ProcessResult::PassThrough) result wins.
/// Blocks nobody claims render as a plain escaped `<pre><code>` element.
///
/// `index` is the zero-based position of the block within the current
/// render pass, counted across all processors.
pub trait CodeBlockProcessor {
    fn process(&mut self, language: Option<&str>, source: &str, index: usize) -> ProcessResult;
}

/// Extract the language token from a fence info string.
///
/// Info strings may carry extra words after the language
/// (```` ```rust ignore ````); only the first token matters.
/// The token is lowercased so `Mermaid` and `mermaid` match alike.
pub fn parse_fence_language(info: &str) -> Option<String> {
    info.split_whitespace().next().map(str::to_ascii_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fence_language_bare() {
        assert_eq!(parse_fence_language("rust"), Some("rust".to_owned()));
    }

    #[test]
    fn test_parse_fence_language_with_extra_words() {
        assert_eq!(
            parse_fence_language("rust ignore no_run"),
            Some("rust".to_owned())
        );
    }

    #[test]
    fn test_parse_fence_language_lowercased() {
        assert_eq!(parse_fence_language("Mermaid"), Some("mermaid".to_owned()));
    }

    #[test]
    fn test_parse_fence_language_empty() {
        assert_eq!(parse_fence_language(""), None);
        assert_eq!(parse_fence_language("   "), None);
    }
}
