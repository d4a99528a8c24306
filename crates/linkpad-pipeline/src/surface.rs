//! Output seam between the pipeline and whatever displays the preview.

/// Where rendered preview HTML ends up.
///
/// The server implements this by broadcasting frames to connected
/// browsers; tests implement it with an in-memory recorder. Scroll
/// position is part of the seam because replacing content resets it: the
/// pipeline reads the offset before every replacement and writes it back
/// afterwards.
pub trait PreviewSurface: Send {
    /// Replace the entire preview content.
    fn replace_content(&mut self, html: &str);

    /// Current scroll offset of the preview pane.
    fn scroll_offset(&self) -> f64;

    /// Restore a previously captured scroll offset.
    fn set_scroll_offset(&mut self, offset: f64);
}
