//! Configuration broadcast.
//!
//! Fans theme and profile-catalog changes out to every live subscriber.
//! Each subscriber owns a queue, so events on one channel arrive in publish
//! order; nothing orders events across channels. Dropping a [`Subscription`]
//! unsubscribes it.

use parking_lot::Mutex;
use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Weak};

/// A logical broadcast channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    ProfilesChanged,
    ThemeChanged,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::ProfilesChanged => write!(f, "profiles-changed"),
            Channel::ThemeChanged => write!(f, "theme-changed"),
        }
    }
}

/// A published change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigEvent {
    /// The profile catalog changed; re-fetch it.
    ProfilesChanged,
    /// A theme was selected. Carries the theme id.
    ThemeChanged(String),
}

impl ConfigEvent {
    pub fn channel(&self) -> Channel {
        match self {
            ConfigEvent::ProfilesChanged => Channel::ProfilesChanged,
            ConfigEvent::ThemeChanged(_) => Channel::ThemeChanged,
        }
    }
}

struct Subscriber {
    id: u64,
    channel: Channel,
    tx: Sender<ConfigEvent>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

/// Process-wide publish/subscribe hub. Clones share the same subscribers.
#[derive(Clone, Default)]
pub struct Broadcast {
    registry: Arc<Mutex<Registry>>,
}

impl fmt::Debug for Broadcast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.lock();
        f.debug_struct("Broadcast")
            .field("subscribers", &registry.subscribers.len())
            .finish()
    }
}

impl Broadcast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `event` to every subscriber of its channel.
    ///
    /// Returns how many subscribers received it. Subscribers whose receiving
    /// end is gone are pruned.
    pub fn publish(&self, event: ConfigEvent) -> usize {
        let channel = event.channel();
        let mut registry = self.registry.lock();
        let mut delivered = 0;
        registry.subscribers.retain(|subscriber| {
            if subscriber.channel != channel {
                return true;
            }
            match subscriber.tx.send(event.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => false,
            }
        });
        tracing::debug!("Published {} to {} subscriber(s)", channel, delivered);
        delivered
    }

    pub fn subscribe(&self, channel: Channel) -> Subscription {
        let (tx, rx) = mpsc::channel();
        let mut registry = self.registry.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.subscribers.push(Subscriber { id, channel, tx });
        Subscription {
            id,
            channel,
            rx,
            registry: Arc::downgrade(&self.registry),
        }
    }

    pub fn subscriber_count(&self, channel: Channel) -> usize {
        self.registry
            .lock()
            .subscribers
            .iter()
            .filter(|subscriber| subscriber.channel == channel)
            .count()
    }
}

/// The receiving end of one channel. Dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    channel: Channel,
    rx: Receiver<ConfigEvent>,
    registry: Weak<Mutex<Registry>>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("channel", &self.channel)
            .finish()
    }
}

impl Subscription {
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Next pending event, if any.
    pub fn try_recv(&self) -> Option<ConfigEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Every pending event, oldest first.
    pub fn drain(&self) -> Vec<ConfigEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }

    /// Consume pending events and keep only the newest.
    pub fn latest(&self) -> Option<ConfigEvent> {
        self.drain().pop()
    }

    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .subscribers
                .retain(|subscriber| subscriber.id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn delivers_only_to_matching_channel() {
        let broadcast = Broadcast::new();
        let themes = broadcast.subscribe(Channel::ThemeChanged);
        let profiles = broadcast.subscribe(Channel::ProfilesChanged);

        assert_eq!(broadcast.publish(ConfigEvent::ProfilesChanged), 1);

        assert_eq!(themes.try_recv(), None);
        assert_eq!(profiles.try_recv(), Some(ConfigEvent::ProfilesChanged));
    }

    #[test]
    fn preserves_publish_order_per_subscriber() {
        let broadcast = Broadcast::new();
        let sub = broadcast.subscribe(Channel::ThemeChanged);
        for id in ["dracula", "campbell", "dracula"] {
            broadcast.publish(ConfigEvent::ThemeChanged(id.into()));
        }
        assert_eq!(
            sub.drain(),
            vec![
                ConfigEvent::ThemeChanged("dracula".into()),
                ConfigEvent::ThemeChanged("campbell".into()),
                ConfigEvent::ThemeChanged("dracula".into()),
            ]
        );
    }

    #[test]
    fn every_subscriber_gets_each_event_once() {
        let broadcast = Broadcast::new();
        let a = broadcast.subscribe(Channel::ThemeChanged);
        let b = broadcast.subscribe(Channel::ThemeChanged);
        assert_eq!(
            broadcast.publish(ConfigEvent::ThemeChanged("campbell".into())),
            2
        );
        assert_eq!(a.drain().len(), 1);
        assert_eq!(b.drain().len(), 1);
    }

    #[test]
    fn latest_keeps_last_value() {
        let broadcast = Broadcast::new();
        let sub = broadcast.subscribe(Channel::ThemeChanged);
        broadcast.publish(ConfigEvent::ThemeChanged("a".into()));
        broadcast.publish(ConfigEvent::ThemeChanged("b".into()));
        assert_eq!(sub.latest(), Some(ConfigEvent::ThemeChanged("b".into())));
        assert_eq!(sub.try_recv(), None);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let broadcast = Broadcast::new();
        let sub = broadcast.subscribe(Channel::ProfilesChanged);
        assert_eq!(broadcast.subscriber_count(Channel::ProfilesChanged), 1);
        sub.unsubscribe();
        assert_eq!(broadcast.subscriber_count(Channel::ProfilesChanged), 0);
        assert_eq!(broadcast.publish(ConfigEvent::ProfilesChanged), 0);
    }

    #[test]
    fn subscription_outlives_broadcast() {
        let sub = {
            let broadcast = Broadcast::new();
            let sub = broadcast.subscribe(Channel::ThemeChanged);
            broadcast.publish(ConfigEvent::ThemeChanged("dracula".into()));
            sub
        };
        assert_eq!(
            sub.try_recv(),
            Some(ConfigEvent::ThemeChanged("dracula".into()))
        );
        assert_eq!(sub.try_recv(), None);
    }

    #[test]
    fn clones_share_subscribers() {
        let broadcast = Broadcast::new();
        let publisher = broadcast.clone();
        let sub = broadcast.subscribe(Channel::ProfilesChanged);
        publisher.publish(ConfigEvent::ProfilesChanged);
        assert_eq!(sub.drain(), vec![ConfigEvent::ProfilesChanged]);
    }
}
