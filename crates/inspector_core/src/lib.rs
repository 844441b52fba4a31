//! Inspector core: protocol types, the instrumentation selection state
//! machine and the pure dashboard coordinator.
mod effect;
mod mode;
mod msg;
mod protocol;
mod route;
mod selection;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use mode::SelectionMode;
pub use msg::Msg;
pub use protocol::{
    AttributeEntry, ElementCapture, FrameMessage, StyleEntry, ELEMENT_SELECTED,
    TOGGLE_ELEMENT_SELECTION,
};
pub use route::{proxy_url, ProxyQuery, ProxyRoute, HEALTH_PATH, PROXY_PATH, RELAY_PROXY_PATH};
pub use selection::{
    ClickOutcome, DocumentHost, SelectionController, SelectionState, SELECTED_CLASS,
    SELECTION_CSS, SELECTION_ENABLED_CLASS, STYLESHEET_ID,
};
pub use state::{
    normalize_target_url, AppState, CoordinatorConfig, EntryId, FrameId, RecentEntry, SavedEntry,
    SiteEntry, DEFAULT_PROXY_BASE, MAX_RECENTS,
};
pub use update::update;
pub use view_model::{AppViewModel, SelectionView};
