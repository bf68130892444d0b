//! # Push Notifications
//!
//! Consumers register one callback per tag and are told when the cached value
//! of that tag changed, disappeared, or when the whole connection went away.
//! Callbacks run on the decoder worker, after the session lock is released.

use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Why a callback is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushKind {
    /// A new valid group was received for the tag.
    Updated,
    /// The tag was absent from the last regular frame and left the cache.
    Evicted,
    /// The connection was reset or lost; every value is gone.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushNotification {
    pub tag: String,
    /// The consumer should refresh now rather than at its next poll.
    pub force_refresh: bool,
    pub kind: PushKind,
}

impl PushNotification {
    pub fn updated(tag: &str, force_refresh: bool) -> Self {
        PushNotification {
            tag: tag.to_string(),
            force_refresh,
            kind: PushKind::Updated,
        }
    }

    pub fn evicted(tag: String, force_refresh: bool) -> Self {
        PushNotification {
            tag,
            force_refresh,
            kind: PushKind::Evicted,
        }
    }
}

pub type PushCallback = Arc<dyn Fn(PushNotification) + Send + Sync>;

/// Tag to callback map, one slot per tag.
#[derive(Clone, Default)]
pub struct PushRegistry {
    inner: Arc<Mutex<HashMap<String, PushCallback>>>,
}

impl fmt::Debug for PushRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushRegistry")
            .field("tags", &self.registered_tags())
            .finish()
    }
}

impl PushRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the callback of `tag`, returning the one it replaces.
    pub fn register(&self, tag: &str, callback: PushCallback) -> Option<PushCallback> {
        debug!("Registering a callback for {tag} tag");
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(tag.to_string(), callback)
    }

    pub fn unregister(&self, tag: &str) -> Option<PushCallback> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(tag)
    }

    pub fn get(&self, tag: &str) -> Option<PushCallback> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(tag)
            .cloned()
    }

    pub fn registered_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        tags.sort();
        tags
    }

    /// Invokes the callback of each notification's tag, skipping unregistered tags.
    ///
    /// Callbacks are cloned out of the registry first, so a callback may
    /// register or unregister without deadlocking.
    pub fn dispatch(&self, notifications: Vec<PushNotification>) {
        for notification in notifications {
            if let Some(callback) = self.get(&notification.tag) {
                debug!(
                    "We have a notification callback for {}: executing",
                    notification.tag
                );
                callback(notification);
            }
        }
    }

    /// Signals every registered tag at once.
    pub fn broadcast(&self, kind: PushKind, force_refresh: bool) {
        let callbacks: Vec<(String, PushCallback)> = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(tag, cb)| (tag.clone(), Arc::clone(cb)))
            .collect();
        for (tag, callback) in callbacks {
            callback(PushNotification {
                tag,
                force_refresh,
                kind,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, PushCallback) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        (
            count,
            Arc::new(move |_n: PushNotification| {
                c.fetch_add(1, Ordering::SeqCst);
            }),
        )
    }

    #[test]
    fn test_register_replaces_previous_callback() {
        let registry = PushRegistry::new();
        let (first, cb1) = counter();
        let (second, cb2) = counter();

        assert!(registry.register("PAPP", cb1).is_none());
        assert!(registry.register("PAPP", cb2).is_some());
        registry.dispatch(vec![PushNotification::updated("PAPP", false)]);

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispatch_skips_unregistered_tags() {
        let registry = PushRegistry::new();
        let (count, cb) = counter();
        registry.register("PAPP", cb);

        registry.dispatch(vec![
            PushNotification::updated("IINST", false),
            PushNotification::evicted("PAPP".to_string(), false),
        ]);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        registry.unregister("PAPP");
        registry.broadcast(PushKind::Unavailable, false);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_callback_may_reenter_registry() {
        let registry = PushRegistry::new();
        let inner = registry.clone();
        registry.register(
            "ADCO",
            Arc::new(move |_n: PushNotification| {
                inner.unregister("ADCO");
            }),
        );
        registry.broadcast(PushKind::Unavailable, true);
        assert!(registry.registered_tags().is_empty());
    }
}
