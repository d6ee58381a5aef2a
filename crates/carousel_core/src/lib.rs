//! Rotation controller for the statistic card strip: autoplay state machine,
//! responsive visible window, input mapping and live-region announcements.

pub mod announcer;
pub mod engine;
pub mod input;
pub mod settings;
pub mod timer;
pub mod window;

pub use announcer::{AccessibilityAnnouncer, AnnouncementSink};
pub use engine::{RotationEngine, RotationObserver, RotationSnapshot, RotationState};
pub use input::{Dispatch, EngineCall, InputController};
pub use settings::{BreakpointThresholds, RotationSettings};
pub use timer::{TimerDriver, TimerError, TimerHandle, TokioTimerDriver};
pub use window::{BreakpointClassifier, ViewportListener};

#[cfg(test)]
#[path = "tests/support.rs"]
mod support;
