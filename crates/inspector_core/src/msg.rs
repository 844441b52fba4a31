use std::time::SystemTime;

use serde_json::Value;

use crate::{EntryId, FrameId, SelectionMode};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User submitted the URL input box.
    UrlSubmitted { input: String, at: SystemTime },
    /// User switched between proxy-mediated and direct loading.
    UseProxyToggled(bool),
    /// User flipped the normal/select switch.
    ModeSwitchRequested(SelectionMode),
    /// Posting into the frame threw.
    FramePostFailed { frame: FrameId, reason: String },
    /// The frame finished loading its document.
    FrameLoaded { frame: FrameId },
    /// The frame failed to load at all.
    FrameLoadFailed { frame: FrameId, reason: String },
    /// Direct document access was blocked by the same-origin policy.
    FrameAccessDenied { frame: FrameId, reason: String },
    /// A `message` event whose source was the window of `frame`.
    FrameMessageReceived { frame: FrameId, payload: Value },
    /// User saved a URL to the sidebar.
    SaveUrl { url: String, at: SystemTime },
    RemoveSaved(EntryId),
    BookmarkAdded(String),
    BookmarkRemoved(String),
    RecentsCleared,
}
