//! Editing helpers for markdown text.
//!
//! Everything here works on an [`EditBuffer`], a plain string with a
//! char-indexed selection. [`EditorAction`] maps toolbar buttons onto
//! buffer edits, [`continue_list`] handles the Enter key inside lists,
//! and [`DEFAULT_DOCUMENT`] is the welcome text for a fresh pad.
//!
//! ```
//! use linkpad_editor::{EditBuffer, EditorAction};
//!
//! let mut buffer = EditBuffer::new("ship it");
//! buffer.select(0..4);
//! EditorAction::Bold.apply(&mut buffer);
//! assert_eq!(buffer.text(), "**ship** it");
//! ```

mod action;
mod buffer;
mod document;
mod list;

pub use action::{EditorAction, HeadingLevel, SOFT_TAB};
pub use buffer::EditBuffer;
pub use document::DEFAULT_DOCUMENT;
pub use list::continue_list;
