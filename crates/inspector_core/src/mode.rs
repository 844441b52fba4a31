use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether clicks inside the instrumented page are captured or passed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    #[default]
    Normal,
    Select,
}

impl SelectionMode {
    /// Interprets the `mode` query argument. Only the exact value `select`
    /// enables selection; anything else, including absence, is `Normal`.
    pub fn from_query_value(value: Option<&str>) -> Self {
        match value {
            Some("select") => SelectionMode::Select,
            _ => SelectionMode::Normal,
        }
    }

    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            SelectionMode::Select
        } else {
            SelectionMode::Normal
        }
    }

    pub fn is_select(self) -> bool {
        self == SelectionMode::Select
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SelectionMode::Normal => "normal",
            SelectionMode::Select => "select",
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::SelectionMode;

    #[test]
    fn only_exact_select_enables_selection() {
        assert_eq!(SelectionMode::from_query_value(Some("select")), SelectionMode::Select);
        assert_eq!(SelectionMode::from_query_value(Some("SELECT")), SelectionMode::Normal);
        assert_eq!(SelectionMode::from_query_value(Some("normal")), SelectionMode::Normal);
        assert_eq!(SelectionMode::from_query_value(Some("")), SelectionMode::Normal);
        assert_eq!(SelectionMode::from_query_value(None), SelectionMode::Normal);
    }

    #[test]
    fn enabled_flag_maps_to_mode() {
        assert!(SelectionMode::from_enabled(true).is_select());
        assert!(!SelectionMode::from_enabled(false).is_select());
        assert_eq!(SelectionMode::Select.to_string(), "select");
    }
}
