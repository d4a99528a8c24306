//! Share links for Linkpad documents.
//!
//! A share link carries the entire document inside its URL fragment, so
//! opening the link reproduces the document with no server-side storage.
//! The token format is brotli over the UTF-8 text, base64-encoded with the
//! URL-safe alphabet and no padding.
//!
//! Decoding is deliberately forgiving: a corrupt, truncated or empty token
//! yields `None` rather than an error, and callers treat that the same as
//! "no shared content".
//!
//! # Example
//!
//! ```
//! use linkpad_share::{decode, encode, share_url, document_from_url};
//!
//! let text = "# Notes\n\nShared via URL.";
//! assert_eq!(decode(&encode(text)).as_deref(), Some(text));
//!
//! let url = share_url("https://pad.example/", text);
//! assert_eq!(document_from_url(&url).as_deref(), Some(text));
//! ```

mod codec;
mod fragment;

pub use codec::{decode, encode};
pub use fragment::{
    CONTENT_PARAM, document_from_fragment, document_from_url, fragment_for, share_url,
};
