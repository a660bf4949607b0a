use crate::domain::model::{Notification, NotificationLevel};
use crate::domain::ports::Notifier;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Prints toasts to the terminal and mirrors them into the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    fn marker(level: NotificationLevel) -> &'static str {
        match level {
            NotificationLevel::Success => "✅",
            NotificationLevel::Error => "❌",
            NotificationLevel::Warning => "⚠️",
            NotificationLevel::Info => "ℹ️",
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => tracing::warn!("toast[{}]: {}", notification.level, notification.message),
            _ => tracing::debug!("toast[{}]: {}", notification.level, notification.message),
        }

        let line = format!("{} {}", Self::marker(notification.level), notification.message);
        match notification.level {
            NotificationLevel::Error | NotificationLevel::Warning => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }
}

/// Stamps every toast with the configured display time before passing it on.
#[derive(Debug)]
pub struct TtlNotifier<N: Notifier> {
    inner: Arc<N>,
    ttl: Duration,
}

impl<N: Notifier> TtlNotifier<N> {
    pub fn new(inner: Arc<N>, ttl: Duration) -> Self {
        Self { inner, ttl }
    }

    pub fn inner(&self) -> &Arc<N> {
        &self.inner
    }
}

impl<N: Notifier> Notifier for TtlNotifier<N> {
    fn notify(&self, notification: Notification) {
        self.inner.notify(notification.with_ttl(self.ttl));
    }
}

/// Keeps every toast in memory, newest last.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .map(|n| n.message)
            .collect()
    }

    pub fn last(&self) -> Option<Notification> {
        self.notifications().pop()
    }

    pub fn clear(&self) {
        if let Ok(mut n) = self.notifications.lock() {
            n.clear();
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut n) = self.notifications.lock() {
            n.push(notification);
        }
    }
}
