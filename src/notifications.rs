//! Single-slot toast notifications

use crate::constants::{NOTIFICATION_SLIDE_SECS, NOTIFICATION_VISIBLE_SECS};
use crate::types::NotificationKind;
use std::time::Instant;
use tracing::debug;

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub shown_at: Instant,
}

impl Notification {
    /// Slide-out progress: 0.0 while fully visible, 1.0 once gone
    pub fn slide_progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.shown_at).as_secs_f32();
        if elapsed <= NOTIFICATION_VISIBLE_SECS {
            0.0
        } else {
            ((elapsed - NOTIFICATION_VISIBLE_SECS) / NOTIFICATION_SLIDE_SECS).min(1.0)
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.shown_at).as_secs_f32();
        elapsed >= NOTIFICATION_VISIBLE_SECS + NOTIFICATION_SLIDE_SECS
    }
}

/// Holds at most one notification; a new one replaces whatever is showing.
#[derive(Debug, Default)]
pub struct Notifier {
    current: Option<Notification>,
}

impl Notifier {
    pub fn show(&mut self, message: impl Into<String>, kind: NotificationKind) {
        self.show_at(message, kind, Instant::now());
    }

    pub fn show_at(&mut self, message: impl Into<String>, kind: NotificationKind, now: Instant) {
        let message = message.into();
        debug!(?kind, %message, "Notification");
        self.current = Some(Notification { message, kind, shown_at: now });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(message, NotificationKind::Success);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(message, NotificationKind::Error);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.show(message, NotificationKind::Info);
    }

    /// Drop the notification once its time is up and return what is still visible
    pub fn current(&mut self, now: Instant) -> Option<&Notification> {
        if self.current.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.current = None;
        }
        self.current.as_ref()
    }

    /// Keep a hovered notification on screen by restarting its timer
    pub fn hold(&mut self, now: Instant) {
        if let Some(n) = self.current.as_mut() {
            if n.slide_progress(now) == 0.0 {
                n.shown_at = now;
            }
        }
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}
