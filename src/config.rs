//! Pane configuration.
//!
//! A [`PaneConfig`] is handed to [`crate::pipeline::RootPane::new`] and is
//! the only place a default theme can come from: nodes inherit the nearest
//! ancestor's theme override, and the pane's theme is the last fallback.

use std::fmt;
use std::sync::Arc;

use crate::pipeline::GuiThread;

/// Opaque theme handle. Resolving it to colors is the renderer's job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ThemeId(String);

impl ThemeId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PaneConfig {
    /// Fallback theme for nodes without an override up their parent chain.
    pub theme: Option<ThemeId>,
    /// Tab past the last leaf goes back to the first (and vice versa).
    pub wrap_tab_focus: bool,
    /// Mouse-down moves focus to the leaf under the cursor.
    pub mouse_focus: bool,
    /// Drop mouse events without routing them.
    pub ignore_mouse: bool,
    /// Scheduler that focus notifications raised off the GUI thread are
    /// posted to.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub gui_thread: Option<Arc<dyn GuiThread>>,
}

impl Default for PaneConfig {
    fn default() -> Self {
        Self {
            theme: None,
            wrap_tab_focus: true,
            mouse_focus: true,
            ignore_mouse: false,
            gui_thread: None,
        }
    }
}

impl fmt::Debug for PaneConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaneConfig")
            .field("theme", &self.theme)
            .field("wrap_tab_focus", &self.wrap_tab_focus)
            .field("mouse_focus", &self.mouse_focus)
            .field("ignore_mouse", &self.ignore_mouse)
            .field("gui_thread", &self.gui_thread.is_some())
            .finish()
    }
}

impl PaneConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme(mut self, theme: impl Into<Option<ThemeId>>) -> Self {
        self.theme = theme.into();
        self
    }

    pub fn with_wrap_tab_focus(mut self, wrap: bool) -> Self {
        self.wrap_tab_focus = wrap;
        self
    }

    pub fn with_mouse_focus(mut self, mouse_focus: bool) -> Self {
        self.mouse_focus = mouse_focus;
        self
    }

    pub fn with_ignore_mouse(mut self, ignore: bool) -> Self {
        self.ignore_mouse = ignore;
        self
    }

    pub fn with_gui_thread(mut self, gui_thread: Arc<dyn GuiThread>) -> Self {
        self.gui_thread = Some(gui_thread);
        self
    }
}
