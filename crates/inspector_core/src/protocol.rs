//! Cross-document messages exchanged between the dashboard and the
//! instrumented frame.
//!
//! The wire shape is a JSON object with a `type` discriminator:
//!
//! ```json
//! { "type": "TOGGLE_ELEMENT_SELECTION", "enabled": true }
//! { "type": "ELEMENT_SELECTED", "data": { "tagName": "A", ... } }
//! ```
//!
//! Neither side authenticates the sender; any window able to post a
//! same-shaped object is indistinguishable from the real peer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message type sent parent → frame.
pub const TOGGLE_ELEMENT_SELECTION: &str = "TOGGLE_ELEMENT_SELECTION";
/// Message type sent frame → parent.
pub const ELEMENT_SELECTED: &str = "ELEMENT_SELECTED";

const SUMMARY_TEXT_LIMIT: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FrameMessage {
    ToggleElementSelection { enabled: bool },
    ElementSelected { data: ElementCapture },
}

impl FrameMessage {
    pub fn toggle(enabled: bool) -> Self {
        FrameMessage::ToggleElementSelection { enabled }
    }

    /// Parses an arbitrary posted value. Pages post all sorts of unrelated
    /// messages, so anything that is not one of ours yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FrameMessage::ToggleElementSelection { .. } => TOGGLE_ELEMENT_SELECTION,
            FrameMessage::ElementSelected { .. } => ELEMENT_SELECTED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeEntry {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleEntry {
    pub property: String,
    pub value: String,
}

/// Structural snapshot of a clicked element.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementCapture {
    pub tag_name: String,
    #[serde(default)]
    pub text_content: String,
    #[serde(rename = "innerHTML", default)]
    pub inner_html: String,
    #[serde(rename = "outerHTML", default)]
    pub outer_html: String,
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub attributes: Vec<AttributeEntry>,
    #[serde(default)]
    pub computed_styles: Vec<StyleEntry>,
}

impl ElementCapture {
    /// Replaces the computed styles, keeping only entries whose value is
    /// non-empty. Order is preserved.
    pub fn set_computed_styles<I, P, V>(&mut self, styles: I)
    where
        I: IntoIterator<Item = (P, V)>,
        P: Into<String>,
        V: Into<String>,
    {
        self.computed_styles = styles
            .into_iter()
            .map(|(property, value)| StyleEntry {
                property: property.into(),
                value: value.into(),
            })
            .filter(|style| !style.value.is_empty())
            .collect();
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// One-line description for display, e.g. `<a#home.nav> Home`.
    pub fn summary(&self) -> String {
        let mut out = format!("<{}", self.tag_name.to_ascii_lowercase());
        if !self.id.is_empty() {
            out.push('#');
            out.push_str(&self.id);
        }
        for class in self.class_name.split_whitespace() {
            out.push('.');
            out.push_str(class);
        }
        out.push('>');

        let text = self.text_content.trim();
        if !text.is_empty() {
            out.push(' ');
            let mut end = text.len().min(SUMMARY_TEXT_LIMIT);
            while !text.is_char_boundary(end) {
                end -= 1;
            }
            out.push_str(&text[..end]);
            if end < text.len() {
                out.push('…');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn toggle_uses_wire_type_name() {
        let value = FrameMessage::toggle(true).to_value();
        assert_eq!(value, json!({ "type": "TOGGLE_ELEMENT_SELECTION", "enabled": true }));
    }

    #[test]
    fn element_selected_parses_browser_payload() {
        let value = json!({
            "type": "ELEMENT_SELECTED",
            "data": {
                "tagName": "A",
                "textContent": "Home",
                "innerHTML": "Home",
                "outerHTML": "<a id=\"home\" class=\"nav\">Home</a>",
                "className": "nav",
                "id": "home",
                "attributes": [{ "name": "id", "value": "home" }, { "name": "class", "value": "nav" }],
                "computedStyles": [{ "property": "color", "value": "rgb(0, 0, 0)" }]
            }
        });

        let Some(FrameMessage::ElementSelected { data }) = FrameMessage::from_value(&value) else {
            panic!("expected ELEMENT_SELECTED");
        };
        assert_eq!(data.tag_name, "A");
        assert_eq!(data.outer_html, "<a id=\"home\" class=\"nav\">Home</a>");
        assert_eq!(data.attribute("class"), Some("nav"));
        assert_eq!(data.computed_styles.len(), 1);
    }

    #[test]
    fn unrelated_messages_are_ignored() {
        assert_eq!(FrameMessage::from_value(&json!({ "type": "RESIZE", "height": 10 })), None);
        assert_eq!(FrameMessage::from_value(&json!("hello")), None);
        assert_eq!(FrameMessage::from_value(&json!({ "type": "TOGGLE_ELEMENT_SELECTION" })), None);
    }

    #[test]
    fn empty_computed_styles_are_dropped() {
        let mut capture = ElementCapture::default();
        capture.set_computed_styles([("color", "red"), ("content", ""), ("display", "block")]);
        let properties: Vec<_> = capture
            .computed_styles
            .iter()
            .map(|style| style.property.as_str())
            .collect();
        assert_eq!(properties, vec!["color", "display"]);
    }

    #[test]
    fn summary_includes_identity_and_truncated_text() {
        let capture = ElementCapture {
            tag_name: "DIV".into(),
            id: "x".into(),
            class_name: "a b".into(),
            text_content: "é".repeat(100),
            ..ElementCapture::default()
        };
        let summary = capture.summary();
        assert!(summary.starts_with("<div#x.a.b> "));
        assert!(summary.ends_with('…'));
    }
}
