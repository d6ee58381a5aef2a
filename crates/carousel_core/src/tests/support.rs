use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use shared::{
    domain::Item,
    protocol::{Announcement, RotationFrame},
};

use crate::{
    announcer::AnnouncementSink,
    engine::RotationObserver,
    timer::{TickFn, TimerDriver, TimerError, TimerHandle},
};

pub fn stat_cards(count: usize) -> Vec<Item> {
    (0..count)
        .map(|i| Item::new(format!("Stat {i}"), format!("{}", (i + 1) * 10)))
        .collect()
}

struct ManualTimer {
    period: Duration,
    tick: TickFn,
    cancelled: Arc<AtomicBool>,
}

/// Timer driver whose ticks are fired by hand.
#[derive(Default)]
pub struct ManualTimerDriver {
    timers: Mutex<Vec<ManualTimer>>,
    fail_with: Option<String>,
}

impl ManualTimerDriver {
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            timers: Mutex::new(Vec::new()),
            fail_with: Some(reason.into()),
        }
    }

    pub fn scheduled(&self) -> usize {
        self.timers.lock().expect("timers").len()
    }

    pub fn active(&self) -> usize {
        self.timers
            .lock()
            .expect("timers")
            .iter()
            .filter(|timer| !timer.cancelled.load(Ordering::SeqCst))
            .count()
    }

    pub fn last_period(&self) -> Option<Duration> {
        self.timers
            .lock()
            .expect("timers")
            .last()
            .map(|timer| timer.period)
    }

    /// Fires every timer that has not been cancelled.
    pub fn fire(&self) {
        for timer in self.timers.lock().expect("timers").iter_mut() {
            if !timer.cancelled.load(Ordering::SeqCst) {
                (timer.tick)();
            }
        }
    }

    /// Fires every timer ever scheduled, as if their ticks were already in
    /// flight when they were cancelled.
    pub fn fire_in_flight(&self) {
        for timer in self.timers.lock().expect("timers").iter_mut() {
            (timer.tick)();
        }
    }
}

impl TimerDriver for ManualTimerDriver {
    fn schedule_repeating(
        &self,
        period: Duration,
        tick: TickFn,
    ) -> Result<TimerHandle, TimerError> {
        if let Some(reason) = &self.fail_with {
            return Err(TimerError::Unavailable(reason.clone()));
        }
        let cancelled = Arc::new(AtomicBool::new(false));
        self.timers.lock().expect("timers").push(ManualTimer {
            period,
            tick,
            cancelled: Arc::clone(&cancelled),
        });
        Ok(TimerHandle::from_cancel(move || {
            cancelled.store(true, Ordering::SeqCst)
        }))
    }
}

#[derive(Clone, Default)]
pub struct RecordingSink {
    announcements: Arc<Mutex<Vec<Announcement>>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.announcements
            .lock()
            .expect("announcements")
            .iter()
            .map(|announcement| announcement.message.clone())
            .collect()
    }

    pub fn announcements(&self) -> Vec<Announcement> {
        self.announcements.lock().expect("announcements").clone()
    }
}

impl AnnouncementSink for RecordingSink {
    fn publish(&self, announcement: Announcement) {
        self.announcements
            .lock()
            .expect("announcements")
            .push(announcement);
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    frames: Mutex<Vec<RotationFrame>>,
}

impl RecordingObserver {
    pub fn frames(&self) -> Vec<RotationFrame> {
        self.frames.lock().expect("frames").clone()
    }
}

impl RotationObserver for RecordingObserver {
    fn state_changed(&self, frame: &RotationFrame, _items: &[Item]) {
        self.frames.lock().expect("frames").push(frame.clone());
    }
}
