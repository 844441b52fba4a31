use crate::{ElementCapture, RecentEntry, SavedEntry, SelectionMode};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub declared_mode: SelectionMode,
    pub use_proxy: bool,
    pub target_url: Option<String>,
    pub frame_src: Option<String>,
    pub frame_loaded: bool,
    pub selection: Option<SelectionView>,
    pub recents: Vec<RecentEntry>,
    pub saved: Vec<SavedEntry>,
    pub bookmarks: Vec<String>,
    pub error: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionView {
    pub summary: String,
    pub text: String,
    pub capture: ElementCapture,
}

impl From<&ElementCapture> for SelectionView {
    fn from(capture: &ElementCapture) -> Self {
        Self {
            summary: capture.summary(),
            text: capture.text_content.clone(),
            capture: capture.clone(),
        }
    }
}
