//! Preview driver.
//!
//! Coordinates file watching and the render loop that owns the pipeline.

use std::path::{Path, PathBuf};
use std::time::Duration;

use linkpad_pipeline::{RenderPipeline, Theme};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{broadcast, mpsc};

use super::frames::{BroadcastSurface, LatestFrame, PreviewEvent};

/// How often the render loop checks the debouncer for expired work.
const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Drives the render pipeline from filesystem events and theme commands.
///
/// Saves of the watched document are read and recorded into the
/// pipeline's debouncer; a background task ticks the pipeline and applies
/// theme switches, broadcasting every completed frame.
pub(crate) struct PreviewDriver {
    file: PathBuf,
    events: broadcast::Sender<PreviewEvent>,
    latest: LatestFrame,
    theme_tx: mpsc::Sender<Theme>,
    theme_rx: Option<mpsc::Receiver<Theme>>,
    watcher: Option<RecommendedWatcher>,
}

impl PreviewDriver {
    /// Create a new driver for the given document.
    #[must_use]
    pub(crate) fn new(
        file: PathBuf,
        events: broadcast::Sender<PreviewEvent>,
        latest: LatestFrame,
    ) -> Self {
        let (theme_tx, theme_rx) = mpsc::channel(16);
        Self {
            file,
            events,
            latest,
            theme_tx,
            theme_rx: Some(theme_rx),
            watcher: None,
        }
    }

    /// Start the file watcher and the render loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the file watcher cannot be created.
    pub(crate) fn start(
        &mut self,
        pipeline: RenderPipeline<BroadcastSurface>,
    ) -> Result<(), notify::Error> {
        let Some(mut theme_rx) = self.theme_rx.take() else {
            // Already started.
            return Ok(());
        };

        let (fs_tx, mut fs_rx) = mpsc::channel::<Event>(100);

        // Create watcher with callback that sends events to channel
        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                // Use blocking_send since callback is sync
                let _ = fs_tx.blocking_send(event);
            }
        })?;

        // Watch the parent directory: editors that save via rename replace
        // the file, which a single-file watch would lose track of.
        let file = self.file.canonicalize().unwrap_or_else(|_| self.file.clone());
        let watch_dir = file
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;
        self.watcher = Some(watcher);

        // Recorder: saves of the watched document land in the debouncer.
        let debouncer = pipeline.debouncer();
        let watched = file.clone();
        tokio::spawn(async move {
            while let Some(event) = fs_rx.recv().await {
                if !is_document_change(&event, &watched) {
                    continue;
                }
                match tokio::fs::read_to_string(&watched).await {
                    Ok(text) => {
                        debouncer.record(text);
                        tracing::debug!(path = %watched.display(), "recorded document change");
                    }
                    Err(error) => {
                        tracing::warn!(
                            path = %watched.display(),
                            %error,
                            "failed to read changed document"
                        );
                    }
                }
            }
        });

        // Render loop: owns the pipeline, ticks the debouncer, applies
        // theme switches.
        let events = self.events.clone();
        tokio::spawn(async move {
            let mut pipeline = pipeline;

            match tokio::fs::read_to_string(&file).await {
                Ok(text) => pipeline.render_now(text).await,
                Err(error) => {
                    tracing::warn!(
                        path = %file.display(),
                        %error,
                        "failed to read document for initial render"
                    );
                }
            }

            let mut interval = tokio::time::interval(TICK_INTERVAL);
            loop {
                tokio::select! {
                    _ = interval.tick() => pipeline.tick().await,
                    theme = theme_rx.recv() => match theme {
                        Some(theme) => {
                            // Tell clients first so the stylesheet swaps
                            // while diagrams re-render.
                            let _ = events.send(PreviewEvent::Theme { theme });
                            pipeline.on_theme_change(theme).await;
                        }
                        None => break,
                    },
                }
            }
        });

        Ok(())
    }

    /// Get a receiver for preview events.
    #[must_use]
    pub(crate) fn subscribe(&self) -> broadcast::Receiver<PreviewEvent> {
        self.events.subscribe()
    }

    /// The newest frame, for connections arriving between saves.
    #[must_use]
    pub(crate) fn latest_event(&self) -> Option<PreviewEvent> {
        self.latest.lock().unwrap().clone()
    }

    /// Switch the preview theme.
    pub(crate) async fn set_theme(&self, theme: Theme) {
        let _ = self.theme_tx.send(theme).await;
    }
}

/// Whether a filesystem event means the watched document changed.
fn is_document_change(event: &Event, watched: &Path) -> bool {
    if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
        return false;
    }
    event.paths.iter().any(|path| path == watched)
}

#[cfg(test)]
mod tests {
    use notify::event::{CreateKind, ModifyKind, RemoveKind};

    use super::*;

    fn event_for(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn modify_of_the_watched_file_is_a_change() {
        let event = event_for(EventKind::Modify(ModifyKind::Any), "/tmp/pad.md");
        assert!(is_document_change(&event, Path::new("/tmp/pad.md")));
    }

    #[test]
    fn create_counts_as_a_change() {
        let event = event_for(EventKind::Create(CreateKind::File), "/tmp/pad.md");
        assert!(is_document_change(&event, Path::new("/tmp/pad.md")));
    }

    #[test]
    fn sibling_files_are_ignored() {
        let event = event_for(EventKind::Modify(ModifyKind::Any), "/tmp/other.md");
        assert!(!is_document_change(&event, Path::new("/tmp/pad.md")));
    }

    #[test]
    fn removal_is_not_a_change() {
        let event = event_for(EventKind::Remove(RemoveKind::File), "/tmp/pad.md");
        assert!(!is_document_change(&event, Path::new("/tmp/pad.md")));
    }
}
