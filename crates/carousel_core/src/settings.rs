use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared::domain::Breakpoint;

pub const DEFAULT_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_MEDIUM_MIN_WIDTH: u32 = 768;
pub const DEFAULT_WIDE_MIN_WIDTH: u32 = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationSettings {
    /// Autoplay period in milliseconds.
    pub interval_ms: u64,
    /// Start autoplay as soon as the engine is constructed.
    pub autoplay_on_mount: bool,
    pub initial_breakpoint: Breakpoint,
    pub breakpoints: BreakpointThresholds,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            autoplay_on_mount: false,
            initial_breakpoint: Breakpoint::Wide,
            breakpoints: BreakpointThresholds::default(),
        }
    }
}

impl RotationSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Minimum viewport widths, in CSS pixels, for the medium and wide classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakpointThresholds {
    pub medium_min_width: u32,
    pub wide_min_width: u32,
}

impl Default for BreakpointThresholds {
    fn default() -> Self {
        Self {
            medium_min_width: DEFAULT_MEDIUM_MIN_WIDTH,
            wide_min_width: DEFAULT_WIDE_MIN_WIDTH,
        }
    }
}
