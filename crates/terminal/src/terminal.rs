//! Terminal sessions.
//!
//! The process-host contract and its PTY implementation, the rendering
//! surface contract and its alacritty_terminal implementation, and the
//! shared geometry and identity types. Nothing here knows about tabs.

mod colors;
pub mod host;
mod pty_host;
pub mod surface;
pub mod types;

pub use host::{host_event_channel, HostEvent, HostEventReceiver, HostEventSender, ProcessHost};
pub use pty_host::{platform_default_shell, PtyHost};
pub use surface::{RenderSurface, SurfaceFactory, TerminalSurface};
pub use types::*;
