//! Process-host contract.
//!
//! A host spawns and drives one process per session on behalf of the
//! orchestration layer. Calls are fire-and-forget; everything the host has
//! to say comes back as [`HostEvent`]s on the sink it was built with.

use crate::types::{SessionId, TermSize};
use settings::Invocation;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Inbound event addressed to one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A chunk of process output. Chunks arrive in emission order with no
    /// message boundaries.
    Data { id: SessionId, data: String },
    /// The process is gone, or never started. Fired at most once per session.
    Exit { id: SessionId },
}

impl HostEvent {
    pub fn session_id(&self) -> &SessionId {
        match self {
            HostEvent::Data { id, .. } | HostEvent::Exit { id } => id,
        }
    }
}

pub type HostEventSender = UnboundedSender<HostEvent>;
pub type HostEventReceiver = UnboundedReceiver<HostEvent>;

/// Create the channel a host reports through.
pub fn host_event_channel() -> (HostEventSender, HostEventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

pub trait ProcessHost {
    /// Spawn the session's process. Spawn failures are reported as
    /// [`HostEvent::Exit`]. Creating an id that already exists is ignored.
    fn create_session(&mut self, id: &SessionId, invocation: &Invocation);

    /// Send input to the session. Unknown ids are ignored.
    fn write_session(&mut self, id: &SessionId, data: &str);

    /// Resize the session's PTY. Unknown ids are ignored.
    fn resize_session(&mut self, id: &SessionId, size: TermSize);

    /// Terminate and reap the session's process. Idempotent. No exit event
    /// is emitted for a session closed this way.
    fn close_session(&mut self, id: &SessionId);
}
