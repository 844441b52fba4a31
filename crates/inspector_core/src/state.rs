use std::time::SystemTime;

use url::Url;

use crate::view_model::{AppViewModel, SelectionView};
use crate::{proxy_url, ElementCapture, ProxyRoute, SelectionMode};

/// Identifies one document load of the preview frame.
pub type FrameId = u64;
/// Identifies a recent or saved entry.
pub type EntryId = u64;

pub const DEFAULT_PROXY_BASE: &str = "http://localhost:3001";
pub const MAX_RECENTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Origin (plus optional path prefix) of the proxy server.
    pub proxy_base: Url,
    /// Load targets through the proxy rather than directly.
    pub use_proxy: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            proxy_base: Url::parse(DEFAULT_PROXY_BASE).expect("default proxy base is a valid url"),
            use_proxy: true,
        }
    }
}

/// A site in the recents or saved list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteEntry {
    pub id: EntryId,
    pub url: String,
    pub title: String,
    pub added_at: SystemTime,
    pub last_visited: SystemTime,
    /// Captures received while this URL was the loaded target.
    pub extracted_element_count: u32,
}

impl SiteEntry {
    fn new(id: EntryId, url: &str, title: String, at: SystemTime) -> Self {
        Self {
            id,
            url: url.to_string(),
            title,
            added_at: at,
            last_visited: at,
            extracted_element_count: 0,
        }
    }
}

pub type RecentEntry = SiteEntry;
pub type SavedEntry = SiteEntry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FrameState {
    pub(crate) id: FrameId,
    pub(crate) src: String,
    pub(crate) via_proxy: bool,
    pub(crate) loaded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    config: CoordinatorConfig,
    declared_mode: SelectionMode,
    target_url: Option<String>,
    frame: Option<FrameState>,
    next_frame_id: FrameId,
    next_entry_id: EntryId,
    recents: Vec<RecentEntry>,
    saved: Vec<SavedEntry>,
    bookmarks: Vec<String>,
    selection: Option<ElementCapture>,
    error: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CoordinatorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            declared_mode: self.declared_mode,
            use_proxy: self.config.use_proxy,
            target_url: self.target_url.clone(),
            frame_src: self.frame.as_ref().map(|frame| frame.src.clone()),
            frame_loaded: self.frame.as_ref().is_some_and(|frame| frame.loaded),
            selection: self.selection.as_ref().map(SelectionView::from),
            recents: self.recents.clone(),
            saved: self.saved.clone(),
            bookmarks: self.bookmarks.clone(),
            error: self.error.clone(),
            dirty: self.dirty,
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn current_frame(&self) -> Option<FrameId> {
        self.frame.as_ref().map(|frame| frame.id)
    }

    pub fn declared_mode(&self) -> SelectionMode {
        self.declared_mode
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn frame(&self) -> Option<&FrameState> {
        self.frame.as_ref()
    }

    pub(crate) fn frame_mut(&mut self, id: FrameId) -> Option<&mut FrameState> {
        self.frame.as_mut().filter(|frame| frame.id == id)
    }

    pub(crate) fn is_current_frame(&self, id: FrameId) -> bool {
        self.current_frame() == Some(id)
    }

    pub(crate) fn use_proxy(&self) -> bool {
        self.config.use_proxy
    }

    pub(crate) fn set_use_proxy(&mut self, use_proxy: bool) {
        if self.config.use_proxy != use_proxy {
            self.config.use_proxy = use_proxy;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_declared_mode(&mut self, mode: SelectionMode) {
        if self.declared_mode != mode {
            self.declared_mode = mode;
            self.mark_dirty();
        }
    }

    pub(crate) fn target_url(&self) -> Option<&str> {
        self.target_url.as_deref()
    }

    pub(crate) fn set_target(&mut self, url: String) {
        self.target_url = Some(url);
        self.selection = None;
        self.error = None;
        self.mark_dirty();
    }

    pub(crate) fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.mark_dirty();
    }

    /// Proxy URL for `target` in the currently declared mode.
    pub(crate) fn proxy_src(&self, target: &str) -> String {
        proxy_url(
            &self.config.proxy_base,
            ProxyRoute::Direct,
            target,
            self.declared_mode,
        )
        .to_string()
    }

    /// Starts a new frame load. Any frame previously shown is superseded and
    /// its messages become stale.
    pub(crate) fn begin_frame(&mut self, src: String, via_proxy: bool) -> FrameId {
        self.next_frame_id += 1;
        let id = self.next_frame_id;
        self.frame = Some(FrameState {
            id,
            src,
            via_proxy,
            loaded: false,
        });
        self.mark_dirty();
        id
    }

    /// Moves `url` to the front of the recents. A revisit keeps the entry's
    /// id and `added_at` and only refreshes `last_visited`.
    pub(crate) fn record_recent(&mut self, url: &str, title: String, at: SystemTime) {
        let entry = match self.recents.iter().position(|entry| entry.url == url) {
            Some(index) => {
                let mut entry = self.recents.remove(index);
                entry.last_visited = at;
                entry
            }
            None => {
                let id = self.allocate_entry_id();
                SiteEntry::new(id, url, title, at)
            }
        };
        self.recents.insert(0, entry);
        self.recents.truncate(MAX_RECENTS);
        self.mark_dirty();
    }

    pub(crate) fn clear_recents(&mut self) {
        if !self.recents.is_empty() {
            self.recents.clear();
            self.mark_dirty();
        }
    }

    pub(crate) fn save(&mut self, url: &str, title: String, at: SystemTime) -> bool {
        if self.saved.iter().any(|entry| entry.url == url) {
            return false;
        }
        let id = self.allocate_entry_id();
        self.saved.insert(0, SiteEntry::new(id, url, title, at));
        self.mark_dirty();
        true
    }

    pub(crate) fn remove_saved(&mut self, id: EntryId) {
        let before = self.saved.len();
        self.saved.retain(|entry| entry.id != id);
        if self.saved.len() != before {
            self.mark_dirty();
        }
    }

    pub(crate) fn add_bookmark(&mut self, url: String) {
        if !self.bookmarks.contains(&url) {
            self.bookmarks.push(url);
            self.mark_dirty();
        }
    }

    pub(crate) fn remove_bookmark(&mut self, url: &str) {
        let before = self.bookmarks.len();
        self.bookmarks.retain(|existing| existing != url);
        if self.bookmarks.len() != before {
            self.mark_dirty();
        }
    }

    /// Shows `capture` and bumps the counter of the saved entry whose URL is
    /// exactly the current target.
    pub(crate) fn apply_capture(&mut self, capture: ElementCapture) {
        if let Some(target) = self.target_url.as_deref() {
            if let Some(entry) = self.saved.iter_mut().find(|entry| entry.url == target) {
                entry.extracted_element_count += 1;
            }
        }
        self.selection = Some(capture);
        self.mark_dirty();
    }

    fn allocate_entry_id(&mut self) -> EntryId {
        self.next_entry_id += 1;
        self.next_entry_id
    }
}

/// Trims user input and defaults to `https://` when no http(s) scheme is
/// given. Returns `None` for blank input.
pub fn normalize_target_url(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Some(trimmed.to_string())
    } else {
        Some(format!("https://{trimmed}"))
    }
}

/// Host name used as an entry title.
pub(crate) fn title_for(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(ToOwned::to_owned))
}
