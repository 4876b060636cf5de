//! The single transient notification.
//!
//! Showing a notice replaces the current one and schedules its dismissal. Each
//! notice carries a sequence number; a dismissal timer only clears the notice it
//! was scheduled for, so a stale timer never hides a newer message.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

pub const DISMISS_AFTER: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }
}

#[derive(Default)]
struct Slot {
    seq: u64,
    visible: Option<(u64, Notice)>,
}

/// Cheap to clone; clones share the same slot.
#[derive(Clone, Default)]
pub struct Notifier {
    slot: Arc<Mutex<Slot>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Must be called from within a tokio runtime.
    pub fn show(&self, notice: Notice) {
        let id = {
            let Ok(mut slot) = self.slot.lock() else {
                return;
            };
            slot.seq += 1;
            let id = slot.seq;
            debug!(id, kind = ?notice.kind, message = %notice.message, "Notice shown");
            slot.visible = Some((id, notice));
            id
        };

        let slot = Arc::clone(&self.slot);
        tokio::spawn(async move {
            tokio::time::sleep(DISMISS_AFTER).await;
            if let Ok(mut slot) = slot.lock() {
                if matches!(slot.visible, Some((current, _)) if current == id) {
                    slot.visible = None;
                }
            }
        });
    }

    pub fn current(&self) -> Option<Notice> {
        self.slot
            .lock()
            .ok()
            .and_then(|slot| slot.visible.as_ref().map(|(_, n)| n.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    async fn advance(secs: f32) {
        tokio::time::sleep(Duration::from_secs_f32(secs)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_notice_dismissed_after_three_seconds() {
        let notifier = Notifier::new();
        notifier.show(Notice::success("Saved"));
        advance(2.9).await;
        assert_eq!(notifier.current(), Some(Notice::success("Saved")));
        advance(0.2).await;
        assert_eq!(notifier.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_notice_replaces_and_outlives_stale_timer() {
        let notifier = Notifier::new();
        notifier.show(Notice::success("first"));
        advance(2.0).await;
        notifier.show(AppError::InvalidCredentials.to_notice());

        // The first timer fires here and must leave the second notice alone.
        advance(1.5).await;
        let current = notifier.current().unwrap();
        assert_eq!(current.kind, NoticeKind::Error);
        assert_eq!(current.message, "Invalid credentials. Please try again.");

        advance(1.6).await;
        assert_eq!(notifier.current(), None);
    }
}
