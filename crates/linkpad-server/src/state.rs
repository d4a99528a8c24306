//! Application state shared across handlers.

use std::path::PathBuf;
use std::sync::RwLock;

use linkpad_pipeline::Theme;
use linkpad_renderer::{StylesheetError, theme_stylesheet};

use crate::preview::PreviewDriver;

/// Shared application state.
pub(crate) struct AppState {
    /// Path of the watched markdown document.
    pub(crate) file: PathBuf,
    /// Render loop handle: theme commands in, frames out.
    pub(crate) driver: PreviewDriver,
    /// Theme currently served to clients.
    pub(crate) theme: RwLock<Theme>,
    /// Syntax highlight stylesheets, generated once at startup.
    pub(crate) stylesheets: Stylesheets,
    /// Base URL share links are built from.
    pub(crate) share_base: String,
    /// Application version reported by the health endpoint.
    pub(crate) version: String,
}

/// Pre-generated highlight stylesheets, one per theme.
pub(crate) struct Stylesheets {
    light: String,
    dark: String,
}

impl Stylesheets {
    /// Generate the stylesheet for each theme.
    ///
    /// # Errors
    ///
    /// Returns an error if a highlight theme is missing from the default
    /// theme set.
    pub(crate) fn generate() -> Result<Self, StylesheetError> {
        Ok(Self {
            light: theme_stylesheet(Theme::Light.highlight_theme())?,
            dark: theme_stylesheet(Theme::Dark.highlight_theme())?,
        })
    }

    pub(crate) fn for_theme(&self, theme: Theme) -> &str {
        match theme {
            Theme::Light => &self.light,
            Theme::Dark => &self.dark,
        }
    }
}
