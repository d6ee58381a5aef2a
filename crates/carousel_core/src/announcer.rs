//! Live-region announcements for assistive technology.

use std::sync::{Arc, Mutex, PoisonError};

use shared::{
    domain::Item,
    protocol::{Announcement, Politeness, RotationFrame},
};
use tokio::sync::mpsc;
use tracing::trace;

use crate::engine::RotationObserver;

/// Destination of announcements, typically an `aria-live` region.
pub trait AnnouncementSink: Send + Sync {
    fn publish(&self, announcement: Announcement);
}

impl<T: AnnouncementSink + ?Sized> AnnouncementSink for Arc<T> {
    fn publish(&self, announcement: Announcement) {
        (**self).publish(announcement);
    }
}

impl AnnouncementSink for mpsc::UnboundedSender<Announcement> {
    fn publish(&self, announcement: Announcement) {
        if self.send(announcement).is_err() {
            trace!("announcement receiver dropped");
        }
    }
}

/// `"Item 3 of 9: Volunteers: 310"` for the current item of `frame`.
pub fn announcement_text(frame: &RotationFrame, items: &[Item]) -> Option<String> {
    let item = items.get(frame.current_index)?;
    Some(format!(
        "Item {} of {}: {}",
        frame.current_index + 1,
        frame.item_count,
        item.label()
    ))
}

/// Publishes the position of the current item whenever it changes, and
/// never repeats the previous message.
pub struct AccessibilityAnnouncer<S> {
    sink: S,
    last: Mutex<Option<String>>,
}

impl<S: AnnouncementSink> AccessibilityAnnouncer<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            last: Mutex::new(None),
        }
    }

    /// Derives the message for `frame` and publishes it unless it matches the
    /// last one. Returns the published announcement.
    pub fn observe(&self, frame: &RotationFrame, items: &[Item]) -> Option<Announcement> {
        let message = announcement_text(frame, items)?;
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if last.as_deref() == Some(message.as_str()) {
            trace!(cause = ?frame.cause, "announcement unchanged; suppressed");
            return None;
        }
        *last = Some(message.clone());

        let announcement = Announcement {
            message,
            politeness: Politeness::Polite,
            cause: frame.cause,
        };
        self.sink.publish(announcement.clone());
        Some(announcement)
    }

    pub fn last_message(&self) -> Option<String> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<S: AnnouncementSink> RotationObserver for AccessibilityAnnouncer<S> {
    fn attached(&self, frame: &RotationFrame, items: &[Item]) {
        let baseline = announcement_text(frame, items);
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = baseline;
    }

    fn state_changed(&self, frame: &RotationFrame, items: &[Item]) {
        if !frame.cause.moves_index() {
            trace!(cause = ?frame.cause, "no index movement; nothing to announce");
            return;
        }
        self.observe(frame, items);
    }
}

#[cfg(test)]
#[path = "tests/announcer_tests.rs"]
mod tests;
