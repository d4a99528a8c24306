//! Preview theme state and change notification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use linkpad_diagrams::DiagramTheme;

/// Preview color scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// The opposite theme.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Name of the syntect theme backing the highlight stylesheet.
    #[must_use]
    pub fn highlight_theme(self) -> &'static str {
        match self {
            Self::Light => "InspiredGitHub",
            Self::Dark => "base16-ocean.dark",
        }
    }

    /// Theme passed to the diagram renderer.
    #[must_use]
    pub fn diagram_theme(self) -> DiagramTheme {
        match self {
            Self::Light => DiagramTheme::Default,
            Self::Dark => DiagramTheme::Dark,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a theme name is not recognized.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown theme {0:?}, expected \"light\" or \"dark\"")]
pub struct ParseThemeError(String);

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("light") {
            Ok(Self::Light)
        } else if s.eq_ignore_ascii_case("dark") {
            Ok(Self::Dark)
        } else {
            Err(ParseThemeError(s.to_owned()))
        }
    }
}

/// Current theme plus its change observers.
///
/// Observers run synchronously in subscription order. Setting the theme
/// that is already active notifies nobody.
pub struct ThemeController {
    current: Theme,
    observers: Vec<Box<dyn FnMut(Theme) + Send>>,
}

impl ThemeController {
    #[must_use]
    pub fn new(initial: Theme) -> Self {
        Self {
            current: initial,
            observers: Vec::new(),
        }
    }

    #[must_use]
    pub fn current(&self) -> Theme {
        self.current
    }

    /// Register an observer for theme changes.
    pub fn subscribe(&mut self, observer: impl FnMut(Theme) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Switch to the given theme, notifying observers.
    ///
    /// Returns `false` without notifying when the theme is already active.
    pub fn set(&mut self, theme: Theme) -> bool {
        if theme == self.current {
            return false;
        }
        self.current = theme;
        for observer in &mut self.observers {
            observer(theme);
        }
        true
    }

    /// Switch to the opposite theme and return it.
    pub fn toggle(&mut self) -> Theme {
        let next = self.current.toggled();
        self.set(next);
        next
    }
}

impl fmt::Debug for ThemeController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeController")
            .field("current", &self.current)
            .field("observers", &self.observers.len())
            .finish()
    }
}
