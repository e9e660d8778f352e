//! Session Bridge.
//!
//! Connects one terminal tab's rendering surface to its process-host
//! session: create on mount, keystrokes out, output in, fit on resize or
//! reveal, palette updates from `theme-changed`, and an idempotent teardown
//! after which nothing crosses the bridge in either direction.

use broadcast::{Broadcast, Channel, ConfigEvent, Subscription};
use settings::Invocation;
use terminal::{ProcessHost, RenderSurface, SessionId, SurfaceArea, TermSize};

pub struct SessionBridge {
    id: SessionId,
    surface: Box<dyn RenderSurface>,
    theme_updates: Option<Subscription>,
    /// Geometry last sent to the host.
    host_size: TermSize,
    torn_down: bool,
}

impl SessionBridge {
    /// Ask the host to start the session and start listening for palette changes.
    pub fn mount(
        id: SessionId,
        invocation: &Invocation,
        surface: Box<dyn RenderSurface>,
        host: &mut dyn ProcessHost,
        broadcast: &Broadcast,
    ) -> Self {
        host.create_session(&id, invocation);
        let theme_updates = Some(broadcast.subscribe(Channel::ThemeChanged));
        // The host opens every PTY at the default geometry
        let host_size = TermSize::default();
        Self {
            id,
            surface,
            theme_updates,
            host_size,
            torn_down: false,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn surface(&self) -> &dyn RenderSurface {
        self.surface.as_ref()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Forward user input. Returns `false` once teardown has begun.
    pub fn write(&mut self, host: &mut dyn ProcessHost, data: &str) -> bool {
        if self.torn_down {
            tracing::debug!("Write to torn-down session {} suppressed", self.id);
            return false;
        }
        host.write_session(&self.id, data);
        true
    }

    /// Deliver a chunk of output to the surface.
    ///
    /// Terminal query replies the chunk provokes are written back to the host.
    pub fn on_data(&mut self, host: &mut dyn ProcessHost, data: &str) {
        if self.torn_down {
            tracing::debug!(
                "Dropping {} bytes for torn-down session {}",
                data.len(),
                self.id
            );
            return;
        }
        self.surface.write(data);
        for reply in self.surface.take_replies() {
            host.write_session(&self.id, &reply);
        }
    }

    /// Recompute the surface geometry; the host hears about it only on change.
    pub fn fit(&mut self, host: &mut dyn ProcessHost, area: SurfaceArea) -> TermSize {
        if self.torn_down {
            return self.host_size;
        }
        let size = self.surface.fit(area);
        if size != self.host_size {
            tracing::trace!("Session {} resized to {}x{}", self.id, size.cols, size.rows);
            host.resize_session(&self.id, size);
            self.host_size = size;
        }
        size
    }

    /// The tab became visible.
    pub fn on_visible(&mut self, host: &mut dyn ProcessHost, area: SurfaceArea) {
        self.fit(host, area);
    }

    /// Apply every pending `theme-changed` event in publish order.
    ///
    /// Returns whether anything was applied.
    pub fn pump_theme(&mut self) -> bool {
        let Some(updates) = self.theme_updates.as_ref() else {
            return false;
        };
        let mut applied = false;
        for event in updates.drain() {
            if let ConfigEvent::ThemeChanged(id) = event {
                self.surface.apply_theme(theme::resolve(&id));
                applied = true;
            }
        }
        applied
    }

    /// Unsubscribe, release the surface and close the host session. Idempotent.
    pub fn teardown(&mut self, host: &mut dyn ProcessHost) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.theme_updates = None;
        self.surface.dispose();
        host.close_session(&self.id);
        tracing::debug!("Session bridge {} torn down", self.id);
    }
}
