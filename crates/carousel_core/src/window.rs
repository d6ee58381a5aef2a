//! Visible-window arithmetic and viewport classification.

use std::sync::Arc;

use shared::domain::Breakpoint;
use tokio::{sync::watch, task::JoinHandle};
use tracing::debug;

use crate::settings::BreakpointThresholds;

/// Window size actually used for `item_count` items: the preferred size
/// clamped to the item count, and never zero unless there are no items.
pub fn effective_window_size(preferred: usize, item_count: usize) -> usize {
    if item_count == 0 {
        return 0;
    }
    preferred.clamp(1, item_count)
}

/// Indices of the cards visible from `current_index`, in display order.
///
/// The window wraps around the end of the list and never contains the same
/// index twice.
pub fn visible(current_index: usize, item_count: usize, window_size: usize) -> Vec<usize> {
    if item_count == 0 {
        return Vec::new();
    }
    let window_size = window_size.min(item_count);
    (0..window_size)
        .map(|offset| (current_index + offset) % item_count)
        .collect()
}

/// Maps a viewport width to a [`Breakpoint`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BreakpointClassifier {
    thresholds: BreakpointThresholds,
}

impl BreakpointClassifier {
    pub fn new(thresholds: BreakpointThresholds) -> Self {
        Self { thresholds }
    }

    pub fn classify(&self, width_px: u32) -> Breakpoint {
        if width_px >= self.thresholds.wide_min_width {
            Breakpoint::Wide
        } else if width_px >= self.thresholds.medium_min_width {
            Breakpoint::Medium
        } else {
            Breakpoint::Narrow
        }
    }
}

/// Receives breakpoint changes from the host's viewport observer.
pub trait ViewportListener: Send + Sync {
    fn breakpoint_changed(&self, breakpoint: Breakpoint);
}

/// Forwards every value published on `breakpoints` to `listener` until the
/// sender side is dropped.
pub fn spawn_viewport_bridge(
    listener: Arc<dyn ViewportListener>,
    mut breakpoints: watch::Receiver<Breakpoint>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while breakpoints.changed().await.is_ok() {
            let breakpoint = *breakpoints.borrow_and_update();
            debug!(breakpoint = breakpoint.name(), "viewport breakpoint changed");
            listener.breakpoint_changed(breakpoint);
        }
    })
}

#[cfg(test)]
#[path = "tests/window_tests.rs"]
mod tests;
