//! Preview events and the surface that broadcasts them.

use std::sync::{Arc, Mutex};

use linkpad_pipeline::{PreviewSurface, Theme};
use serde::Serialize;
use tokio::sync::broadcast;

/// Event pushed to connected preview clients.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum PreviewEvent {
    /// A rendered preview frame.
    Frame {
        /// Monotonic frame counter, starts at 1.
        revision: u64,
        /// Rendered HTML for the preview pane.
        html: String,
    },
    /// The active theme switched; clients reload their stylesheet.
    Theme {
        /// The theme now in effect.
        theme: Theme,
    },
}

/// Latest frame slot shared between the surface and new connections.
pub(crate) type LatestFrame = Arc<Mutex<Option<PreviewEvent>>>;

/// Render target that fans frames out over a broadcast channel.
///
/// Each `replace_content` bumps the revision, stores the frame for
/// late-joining clients and broadcasts it. Scroll position lives in the
/// browser; the surface only echoes the saved offset back so the
/// pipeline's save/restore pass is a no-op here.
pub(crate) struct BroadcastSurface {
    events: broadcast::Sender<PreviewEvent>,
    latest: LatestFrame,
    revision: u64,
    scroll_offset: f64,
}

impl BroadcastSurface {
    pub(crate) fn new(events: broadcast::Sender<PreviewEvent>, latest: LatestFrame) -> Self {
        Self {
            events,
            latest,
            revision: 0,
            scroll_offset: 0.0,
        }
    }
}

impl PreviewSurface for BroadcastSurface {
    fn replace_content(&mut self, html: &str) {
        self.revision += 1;
        let event = PreviewEvent::Frame {
            revision: self.revision,
            html: html.to_owned(),
        };
        *self.latest.lock().unwrap() = Some(event.clone());
        // No receivers is fine; frames are only lost when nobody watches.
        let _ = self.events.send(event);
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    fn set_scroll_offset(&mut self, offset: f64) {
        self.scroll_offset = offset;
    }
}
