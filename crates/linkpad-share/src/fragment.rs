//! URL fragment parsing and construction for share links.
//!
//! A share link carries the whole document in its fragment:
//! `https://host/path#content=<token>`. The fragment is a set of
//! `&`-separated `key=value` pairs; only the `content` key is ours.

use crate::codec::{decode, encode};

/// Fragment parameter holding the share token.
pub const CONTENT_PARAM: &str = "content";

/// Extract and decode the shared document from a URL fragment.
///
/// Accepts the fragment with or without its leading `#`. Returns `None`
/// when there is no `content` parameter, when its token is empty, or when
/// the token fails to decode; callers fall back to their default document
/// in every one of those cases.
#[must_use]
pub fn document_from_fragment(fragment: &str) -> Option<String> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    fragment
        .split('&')
        .find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == CONTENT_PARAM).then_some(value)
        })
        .and_then(decode)
}

/// Extract the shared document from a full share URL.
///
/// Everything before the first `#` is ignored, so this accepts both full
/// URLs and bare fragments.
#[must_use]
pub fn document_from_url(url: &str) -> Option<String> {
    let fragment = url.split_once('#').map_or(url, |(_, fragment)| fragment);
    document_from_fragment(fragment)
}

/// Build the fragment (without `#`) encoding the given document.
#[must_use]
pub fn fragment_for(text: &str) -> String {
    format!("{CONTENT_PARAM}={}", encode(text))
}

/// Build a complete share URL from the page address and document text.
#[must_use]
pub fn share_url(base_url: &str, text: &str) -> String {
    format!("{}#{}", base_url.trim_end_matches('#'), fragment_for(text))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_fragment_round_trip() {
        let fragment = fragment_for("# Shared\n\ncontent");
        assert_eq!(
            document_from_fragment(&fragment).as_deref(),
            Some("# Shared\n\ncontent")
        );
    }

    #[test]
    fn test_fragment_with_hash_prefix() {
        let fragment = format!("#{}", fragment_for("doc"));
        assert_eq!(document_from_fragment(&fragment).as_deref(), Some("doc"));
    }

    #[test]
    fn test_empty_content_parameter_is_absent() {
        assert_eq!(document_from_fragment("#content="), None);
    }

    #[test]
    fn test_missing_content_parameter_is_absent() {
        assert_eq!(document_from_fragment("#other=value"), None);
        assert_eq!(document_from_fragment(""), None);
        assert_eq!(document_from_fragment("#"), None);
    }

    #[test]
    fn test_content_found_among_other_parameters() {
        let fragment = format!("view=split&{}&theme=dark", fragment_for("doc"));
        assert_eq!(document_from_fragment(&fragment).as_deref(), Some("doc"));
    }

    #[test]
    fn test_garbage_token_is_absent() {
        assert_eq!(document_from_fragment("#content=!!!not-a-token!!!"), None);
    }

    #[test]
    fn test_share_url_round_trip() {
        let url = share_url("https://pad.example/note", "# Doc\n\nwith 世界");
        assert!(url.starts_with("https://pad.example/note#content="));
        assert_eq!(document_from_url(&url).as_deref(), Some("# Doc\n\nwith 世界"));
    }

    #[test]
    fn test_document_from_url_without_fragment() {
        assert_eq!(document_from_url("https://pad.example/note"), None);
    }
}
