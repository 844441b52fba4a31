//! Instrumentation script rendered into every proxied page.
//!
//! One template serves both proxy routes; only the initial selection flag
//! differs between renders. Class names, the stylesheet and the message
//! types come from `inspector_core` so the script and the Rust model of its
//! state machine cannot drift apart.

use inspector_core::{
    SelectionMode, ELEMENT_SELECTED, SELECTED_CLASS, SELECTION_CSS, SELECTION_ENABLED_CLASS,
    STYLESHEET_ID, TOGGLE_ELEMENT_SELECTION,
};

/// Attribute identifying the injected `<script>` element.
pub const SCRIPT_MARKER_ATTR: &str = "data-scrape-inspector";

const TEMPLATE: &str = include_str!("../assets/instrumentation.js");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstrumentationScript {
    initial_mode: SelectionMode,
}

impl InstrumentationScript {
    pub fn new(initial_mode: SelectionMode) -> Self {
        Self { initial_mode }
    }

    /// Script source with every placeholder substituted.
    pub fn source(&self) -> String {
        let initial_enabled = if self.initial_mode.is_select() {
            "true"
        } else {
            "false"
        };
        TEMPLATE
            .replace("$ENABLED_CLASS", &js_string(SELECTION_ENABLED_CLASS))
            .replace("$SELECTED_CLASS", &js_string(SELECTED_CLASS))
            .replace("$STYLE_ID", &js_string(STYLESHEET_ID))
            .replace("$SELECTION_CSS", &js_string(SELECTION_CSS))
            .replace("$TOGGLE_TYPE", &js_string(TOGGLE_ELEMENT_SELECTION))
            .replace("$SELECTED_TYPE", &js_string(ELEMENT_SELECTED))
            .replace("$INITIAL_ENABLED", initial_enabled)
    }

    /// Complete `<script>` block, ready to splice into a document.
    pub fn render(&self) -> String {
        format!(
            "<script {SCRIPT_MARKER_ATTR}=\"instrumentation\">\n{}</script>\n",
            self.source()
        )
    }
}

/// JSON string literal, which is also a valid JS string literal. `</` is
/// escaped so the value can never close the surrounding script element.
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string())
        .to_string()
        .replace("</", "<\\/")
}
