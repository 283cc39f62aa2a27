//! Notifier that writes operator notifications to tracing output.

use logdesk_application::{Notification, NotificationLevel, Notifier};
use tracing::{info, warn};

/// Notification adapter emitting one tracing event per notification.
#[derive(Clone, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    /// Creates a new tracing notifier.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => info!(
                title = %notification.title,
                "{}",
                notification.description
            ),
            NotificationLevel::Error => warn!(
                title = %notification.title,
                "{}",
                notification.description
            ),
        }
    }
}
