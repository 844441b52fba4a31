//! Selection state machine of the instrumentation script.
//!
//! The injected script runs inside the fetched document, which the
//! dashboard cannot reach across origins. [`SelectionController`] holds the
//! same transitions against a [`DocumentHost`], so the behaviour the script
//! must exhibit is pinned down and testable without a browser. The script
//! template rendered by the proxy uses the class names and stylesheet
//! defined here.

use crate::{ElementCapture, FrameMessage, SelectionMode};

/// Class put on `<body>` while selection is enabled.
pub const SELECTION_ENABLED_CLASS: &str = "element-selection-enabled";
/// Class put on the currently selected element.
pub const SELECTED_CLASS: &str = "element-selected";
/// `id` of the injected `<style>` element.
pub const STYLESHEET_ID: &str = "element-selection-styles";

/// Hover outline plus selected-element outline.
pub const SELECTION_CSS: &str = "\
.element-selection-enabled * { cursor: pointer !important; transition: all 0.2s ease !important; }
.element-selection-enabled *:hover { outline: 2px solid #3b82f6 !important; background-color: rgba(59, 130, 246, 0.1) !important; position: relative !important; z-index: 9999 !important; }
.element-selected { outline: 3px solid #ef4444 !important; background-color: rgba(239, 68, 68, 0.2) !important; }";

/// The document surface the instrumentation script touches.
pub trait DocumentHost {
    /// Handle to an element that can be clicked.
    type Element;

    /// True while the document is still parsing (`readyState == "loading"`).
    fn is_loading(&self) -> bool;
    fn install_stylesheet(&mut self, id: &str, css: &str);
    fn install_click_listener(&mut self);
    fn add_body_class(&mut self, class: &str);
    fn remove_body_class(&mut self, class: &str);
    /// Removes `class` from every element carrying it.
    fn clear_marker(&mut self, class: &str);
    fn add_marker(&mut self, target: &Self::Element, class: &str);
    fn capture(&self, target: &Self::Element) -> ElementCapture;
    /// False for a top-level document, where posting to the parent would
    /// message ourselves.
    fn has_parent(&self) -> bool;
    /// Posts to the parent window with target origin `*`.
    fn post_to_parent(&mut self, message: FrameMessage);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    pub enabled: bool,
    pub highlight_style_installed: bool,
    pub click_listener_installed: bool,
}

/// What the click listener did with a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Default action and propagation untouched.
    PassThrough,
    /// `preventDefault` + `stopPropagation`; a capture was posted if the
    /// document has a parent.
    Captured,
}

/// Per-document instance; dropped with the document.
#[derive(Debug)]
pub struct SelectionController<D: DocumentHost> {
    document: D,
    state: SelectionState,
    awaiting_dom_ready: bool,
}

impl<D: DocumentHost> SelectionController<D> {
    /// Script evaluation. When the document has already finished parsing,
    /// enabling happens immediately since `DOMContentLoaded` will not fire
    /// again.
    pub fn evaluate(document: D, initial_mode: SelectionMode) -> Self {
        let mut controller = Self {
            document,
            state: SelectionState {
                enabled: initial_mode.is_select(),
                ..SelectionState::default()
            },
            awaiting_dom_ready: false,
        };
        if controller.document.is_loading() {
            controller.awaiting_dom_ready = true;
        } else if controller.state.enabled {
            controller.enable();
        }
        controller
    }

    /// `DOMContentLoaded`.
    pub fn dom_ready(&mut self) {
        if !std::mem::take(&mut self.awaiting_dom_ready) {
            return;
        }
        if self.state.enabled {
            self.enable();
        }
    }

    pub fn handle_message(&mut self, message: &FrameMessage) {
        if let FrameMessage::ToggleElementSelection { enabled } = message {
            self.toggle(*enabled);
        }
    }

    pub fn toggle(&mut self, enabled: bool) {
        self.state.enabled = enabled;
        if enabled {
            self.enable();
        } else {
            self.disable();
        }
    }

    pub fn handle_click(&mut self, target: &D::Element) -> ClickOutcome {
        if !self.state.click_listener_installed || !self.state.enabled {
            return ClickOutcome::PassThrough;
        }

        self.document.clear_marker(SELECTED_CLASS);
        self.document.add_marker(target, SELECTED_CLASS);
        let capture = self.document.capture(target);
        if self.document.has_parent() {
            self.document
                .post_to_parent(FrameMessage::ElementSelected { data: capture });
        }
        ClickOutcome::Captured
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    fn enable(&mut self) {
        if !self.state.highlight_style_installed {
            self.document.install_stylesheet(STYLESHEET_ID, SELECTION_CSS);
            self.state.highlight_style_installed = true;
        }
        if !self.state.click_listener_installed {
            self.document.install_click_listener();
            self.state.click_listener_installed = true;
        }
        self.document.add_body_class(SELECTION_ENABLED_CLASS);
    }

    fn disable(&mut self) {
        self.document.remove_body_class(SELECTION_ENABLED_CLASS);
        self.document.clear_marker(SELECTED_CLASS);
    }
}
