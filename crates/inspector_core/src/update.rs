use inspector_logging::{inspector_debug, inspector_info, inspector_warn};

use crate::state::title_for;
use crate::{normalize_target_url, AppState, Effect, FrameMessage, Msg};

const INVALID_URL_MESSAGE: &str = "Failed to load website. Please check the URL and try again.";
const FRAME_LOAD_MESSAGE: &str =
    "Failed to load website. This might be due to CORS restrictions or an invalid URL.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::UrlSubmitted { input, at } => {
            let Some(target) = normalize_target_url(&input) else {
                return (state, Vec::new());
            };
            let Some(title) = title_for(&target) else {
                state.set_error(INVALID_URL_MESSAGE);
                return (state, Vec::new());
            };
            state.set_target(target.clone());
            state.record_recent(&target, title, at);
            let via_proxy = state.use_proxy();
            vec![load_target(&mut state, &target, via_proxy)]
        }
        Msg::UseProxyToggled(use_proxy) => {
            state.set_use_proxy(use_proxy);
            Vec::new()
        }
        Msg::ModeSwitchRequested(mode) => {
            state.set_declared_mode(mode);
            if state.target_url().is_none() {
                inspector_debug!("Mode switched to {} with no page loaded", mode);
                return (state, Vec::new());
            }
            match state.current_frame() {
                Some(frame) => vec![Effect::PostToFrame {
                    frame,
                    message: FrameMessage::toggle(mode.is_select()),
                }],
                None => Vec::new(),
            }
        }
        Msg::FramePostFailed { frame, reason } => {
            if !state.is_current_frame(frame) {
                return (state, Vec::new());
            }
            inspector_warn!(
                "Cannot post to frame {}: {}; falling back to reload",
                frame,
                reason
            );
            match state.target_url().map(ToOwned::to_owned) {
                Some(target) if state.use_proxy() => vec![load_target(&mut state, &target, true)],
                _ => Vec::new(),
            }
        }
        Msg::FrameLoaded { frame } => {
            let Some(current) = state.frame_mut(frame) else {
                return (state, Vec::new());
            };
            current.loaded = true;
            let direct = !current.via_proxy;
            state.mark_dirty();
            if direct {
                vec![Effect::AttachDirectAffordances { frame }]
            } else {
                Vec::new()
            }
        }
        Msg::FrameLoadFailed { frame, reason } => {
            if state.is_current_frame(frame) {
                inspector_warn!("Frame {} failed to load: {}", frame, reason);
                state.set_error(FRAME_LOAD_MESSAGE);
            }
            Vec::new()
        }
        Msg::FrameAccessDenied { frame, reason } => {
            let direct = state
                .frame()
                .is_some_and(|current| current.id == frame && !current.via_proxy);
            match state.target_url().map(ToOwned::to_owned) {
                Some(target) if direct => {
                    inspector_warn!(
                        "Cannot access frame {} content ({}); loading through proxy",
                        frame,
                        reason
                    );
                    vec![load_target(&mut state, &target, true)]
                }
                _ => Vec::new(),
            }
        }
        Msg::FrameMessageReceived { frame, payload } => {
            let Some(message) = FrameMessage::from_value(&payload) else {
                return (state, Vec::new());
            };
            if !state.is_current_frame(frame) {
                inspector_debug!(
                    "Dropping {} from superseded frame {}",
                    message.type_name(),
                    frame
                );
                return (state, Vec::new());
            }
            if let FrameMessage::ElementSelected { data } = message {
                inspector_info!("Element selected: {}", data.summary());
                state.apply_capture(data);
            }
            Vec::new()
        }
        Msg::SaveUrl { url, at } => {
            if let Some(target) = normalize_target_url(&url) {
                match title_for(&target) {
                    Some(title) => {
                        state.save(&target, title, at);
                    }
                    None => state.set_error(INVALID_URL_MESSAGE),
                }
            }
            Vec::new()
        }
        Msg::RemoveSaved(id) => {
            state.remove_saved(id);
            Vec::new()
        }
        Msg::BookmarkAdded(url) => {
            state.add_bookmark(url);
            Vec::new()
        }
        Msg::BookmarkRemoved(url) => {
            state.remove_bookmark(&url);
            Vec::new()
        }
        Msg::RecentsCleared => {
            state.clear_recents();
            Vec::new()
        }
    };

    (state, effects)
}

fn load_target(state: &mut AppState, target: &str, via_proxy: bool) -> Effect {
    let src = if via_proxy {
        state.proxy_src(target)
    } else {
        target.to_string()
    };
    let frame = state.begin_frame(src.clone(), via_proxy);
    inspector_info!("Loading frame {} from {}", frame, src);
    Effect::LoadFrame { frame, src }
}
