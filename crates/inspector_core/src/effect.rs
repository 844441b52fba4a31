use crate::{FrameId, FrameMessage};

/// Side effects requested by [`crate::update`]; executed by the host shell,
/// which reports outcomes back as [`crate::Msg`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Point the preview frame at `src`, replacing whatever document it held.
    LoadFrame { frame: FrameId, src: String },
    /// Fire-and-forget `postMessage(message, "*")` into the frame's window.
    /// A throw is reported as `Msg::FramePostFailed`.
    PostToFrame { frame: FrameId, message: FrameMessage },
    /// Reach into a directly loaded frame's document to attach hover/click
    /// affordances. Denial is reported as `Msg::FrameAccessDenied`.
    AttachDirectAffordances { frame: FrameId },
}
