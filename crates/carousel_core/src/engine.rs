//! Rotation state machine: current index, autoplay and window size.
//!
//! Every mutation, whether it comes from the autoplay timer, the input layer
//! or a viewport change, goes through [`EngineShared::apply`], which holds the
//! state lock for the whole read-modify-notify turn. Observers therefore see
//! changes in exactly the order they were applied.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use shared::{
    domain::{Breakpoint, Item},
    protocol::{AutoplayCapability, ChangeCause, RotationEvent, RotationFrame},
};
use tokio::sync::broadcast;
use tracing::{debug, info, trace, warn};

use crate::{
    settings::RotationSettings,
    timer::{TickFn, TimerDriver, TimerHandle, TokioTimerDriver},
    window::{effective_window_size, visible, ViewportListener},
};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Synchronous subscriber to engine state changes.
///
/// Callbacks run while the engine state is locked, in mutation order, after
/// the matching event has been broadcast. They must not call back into the
/// engine.
pub trait RotationObserver: Send + Sync {
    /// Called once when the observer is registered on a non-empty engine.
    fn attached(&self, _frame: &RotationFrame, _items: &[Item]) {}

    fn state_changed(&self, frame: &RotationFrame, items: &[Item]);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationState {
    pub current_index: usize,
    pub playing: bool,
    pub window_size: usize,
}

/// Point-in-time view of the engine, including the Empty state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationSnapshot {
    pub current_index: Option<usize>,
    pub playing: bool,
    pub window_size: usize,
    pub visible: Vec<usize>,
    pub item_count: usize,
    pub autoplay: AutoplayCapability,
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Start,
    Stop,
    Toggle,
    Tick { generation: u64 },
    Next,
    Previous,
    Goto(usize),
    Resize(Breakpoint),
}

struct ArmedTimer {
    generation: u64,
    _handle: TimerHandle,
}

struct EngineState {
    /// `None` while the engine has no items.
    rotation: Option<RotationState>,
    preferred_window: usize,
    autoplay: AutoplayCapability,
    armed: Option<ArmedTimer>,
    next_generation: u64,
    observers: Vec<Arc<dyn RotationObserver>>,
}

impl EngineState {
    fn frame(&self, cause: ChangeCause, item_count: usize) -> Option<RotationFrame> {
        let rotation = self.rotation?;
        Some(RotationFrame {
            cause,
            current_index: rotation.current_index,
            item_count,
            playing: rotation.playing,
            window_size: rotation.window_size,
            visible: visible(rotation.current_index, item_count, rotation.window_size),
        })
    }

    fn is_playing(&self) -> bool {
        self.rotation.is_some_and(|rotation| rotation.playing)
    }

    /// Drops the armed timer, if any. Returns whether autoplay was running.
    fn disarm(&mut self) -> bool {
        let Some(armed) = self.armed.take() else {
            return false;
        };
        trace!(generation = armed.generation, "releasing autoplay timer");
        if let Some(rotation) = self.rotation.as_mut() {
            rotation.playing = false;
        }
        true
    }

    fn set_index(&mut self, index: usize) {
        if let Some(rotation) = self.rotation.as_mut() {
            rotation.current_index = index;
        }
    }

    fn current_index(&self) -> usize {
        self.rotation.map_or(0, |rotation| rotation.current_index)
    }
}

struct EngineShared {
    items: Arc<[Item]>,
    interval: Duration,
    timer: Arc<dyn TimerDriver>,
    events: broadcast::Sender<RotationEvent>,
    state: Mutex<EngineState>,
}

impl EngineShared {
    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(self: &Arc<Self>, op: Op) {
        let mut state = self.lock();
        if state.rotation.is_none() {
            trace!(?op, "rotation engine is empty; ignoring");
            return;
        }
        let count = self.items.len();

        let cause = match op {
            Op::Start => {
                if !self.arm(&mut state) {
                    return;
                }
                ChangeCause::Started
            }
            Op::Stop => {
                if !state.disarm() {
                    return;
                }
                info!("autoplay stopped");
                ChangeCause::Stopped
            }
            Op::Toggle => {
                if state.disarm() {
                    info!("autoplay stopped");
                    ChangeCause::Stopped
                } else if self.arm(&mut state) {
                    ChangeCause::Started
                } else {
                    return;
                }
            }
            Op::Tick { generation } => {
                let armed = state.armed.as_ref().map(|armed| armed.generation);
                if armed != Some(generation) {
                    debug!(generation, ?armed, "discarding tick from released timer");
                    return;
                }
                let next = (state.current_index() + 1) % count;
                state.set_index(next);
                ChangeCause::Tick
            }
            Op::Next => {
                if state.disarm() {
                    debug!("manual navigation cancelled autoplay");
                }
                let next = (state.current_index() + 1) % count;
                state.set_index(next);
                ChangeCause::Next
            }
            Op::Previous => {
                if state.disarm() {
                    debug!("manual navigation cancelled autoplay");
                }
                let previous = (state.current_index() + count - 1) % count;
                state.set_index(previous);
                ChangeCause::Previous
            }
            Op::Goto(requested) => {
                if state.disarm() {
                    debug!("manual navigation cancelled autoplay");
                }
                let target = requested % count;
                if target != requested {
                    debug!(requested, target, "clamped goto index");
                }
                state.set_index(target);
                ChangeCause::Goto
            }
            Op::Resize(breakpoint) => {
                state.preferred_window = breakpoint.window_size();
                let window_size = effective_window_size(state.preferred_window, count);
                let Some(rotation) = state.rotation.as_mut() else {
                    return;
                };
                if rotation.window_size == window_size {
                    return;
                }
                rotation.window_size = window_size;
                ChangeCause::Resized
            }
        };

        self.publish(&state, cause);
    }

    /// Arms the autoplay timer. Returns whether the engine moved to Running.
    fn arm(self: &Arc<Self>, state: &mut EngineState) -> bool {
        if state.is_playing() {
            trace!("autoplay already running");
            return false;
        }
        if state.autoplay == AutoplayCapability::Unavailable {
            debug!("autoplay unavailable; staying in manual mode");
            return false;
        }

        let generation = state.next_generation;
        state.next_generation += 1;
        let engine = Arc::downgrade(self);
        let tick: TickFn = Box::new(move || {
            if let Some(engine) = engine.upgrade() {
                engine.apply(Op::Tick { generation });
            }
        });

        match self.timer.schedule_repeating(self.interval, tick) {
            Ok(handle) => {
                state.armed = Some(ArmedTimer {
                    generation,
                    _handle: handle,
                });
                if let Some(rotation) = state.rotation.as_mut() {
                    rotation.playing = true;
                }
                info!(
                    interval_ms = self.interval.as_millis() as u64,
                    generation, "autoplay started"
                );
                true
            }
            Err(err) => {
                warn!(%err, "autoplay unavailable; continuing in manual mode");
                state.autoplay = AutoplayCapability::Unavailable;
                let _ = self.events.send(RotationEvent::AutoplayUnavailable {
                    reason: err.to_string(),
                });
                false
            }
        }
    }

    fn publish(&self, state: &EngineState, cause: ChangeCause) {
        let Some(frame) = state.frame(cause, self.items.len()) else {
            return;
        };
        debug!(
            ?cause,
            current_index = frame.current_index,
            playing = frame.playing,
            window_size = frame.window_size,
            "rotation state changed"
        );
        let _ = self.events.send(RotationEvent::StateChanged(frame.clone()));
        for observer in &state.observers {
            observer.state_changed(&frame, &self.items);
        }
    }

    fn teardown(&self) {
        let mut state = self.lock();
        if state.disarm() {
            debug!("autoplay timer released on teardown");
        }
    }
}

/// Owner of the rotation state for one mounted carousel.
///
/// Dropping the engine releases the autoplay timer; a tick that is already
/// pending at that point finds the engine gone and does nothing.
pub struct RotationEngine {
    shared: Arc<EngineShared>,
}

impl RotationEngine {
    pub fn new(items: Vec<Item>, settings: RotationSettings, timer: Arc<dyn TimerDriver>) -> Self {
        let count = items.len();
        let preferred_window = settings.initial_breakpoint.window_size();
        let rotation = (count > 0).then(|| RotationState {
            current_index: 0,
            playing: false,
            window_size: effective_window_size(preferred_window, count),
        });
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let engine = Self {
            shared: Arc::new(EngineShared {
                items: items.into(),
                interval: settings.interval(),
                timer,
                events,
                state: Mutex::new(EngineState {
                    rotation,
                    preferred_window,
                    autoplay: AutoplayCapability::Available,
                    armed: None,
                    next_generation: 0,
                    observers: Vec::new(),
                }),
            }),
        };

        match rotation {
            Some(rotation) => debug!(
                item_count = count,
                window_size = rotation.window_size,
                "rotation engine mounted"
            ),
            None => debug!("rotation engine mounted without items"),
        }

        if settings.autoplay_on_mount {
            engine.start();
        }
        engine
    }

    /// Engine driven by [`TokioTimerDriver`] on the current runtime.
    pub fn with_tokio_timer(items: Vec<Item>, settings: RotationSettings) -> Self {
        Self::new(items, settings, Arc::new(TokioTimerDriver::new()))
    }

    pub fn start(&self) {
        self.shared.apply(Op::Start);
    }

    pub fn stop(&self) {
        self.shared.apply(Op::Stop);
    }

    pub fn toggle(&self) {
        self.shared.apply(Op::Toggle);
    }

    pub fn next(&self) {
        self.shared.apply(Op::Next);
    }

    pub fn prev(&self) {
        self.shared.apply(Op::Previous);
    }

    /// Moves to `index mod N` and cancels autoplay.
    pub fn goto(&self, index: usize) {
        self.shared.apply(Op::Goto(index));
    }

    pub fn set_breakpoint(&self, breakpoint: Breakpoint) {
        self.shared.apply(Op::Resize(breakpoint));
    }

    /// Registers a synchronous observer. On a non-empty engine the observer
    /// is immediately given the current frame via [`RotationObserver::attached`].
    pub fn add_observer(&self, observer: Arc<dyn RotationObserver>) {
        let mut state = self.shared.lock();
        if let Some(frame) = state.frame(ChangeCause::Mounted, self.shared.items.len()) {
            observer.attached(&frame, &self.shared.items);
        }
        state.observers.push(observer);
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<RotationEvent> {
        self.shared.events.subscribe()
    }

    pub fn snapshot(&self) -> RotationSnapshot {
        let state = self.shared.lock();
        let item_count = self.shared.items.len();
        match state.rotation {
            Some(rotation) => RotationSnapshot {
                current_index: Some(rotation.current_index),
                playing: rotation.playing,
                window_size: rotation.window_size,
                visible: visible(rotation.current_index, item_count, rotation.window_size),
                item_count,
                autoplay: state.autoplay,
            },
            None => RotationSnapshot {
                current_index: None,
                playing: false,
                window_size: 0,
                visible: Vec::new(),
                item_count,
                autoplay: state.autoplay,
            },
        }
    }

    /// The current state as a render frame, for the first paint after mount.
    pub fn frame(&self) -> Option<RotationFrame> {
        self.shared
            .lock()
            .frame(ChangeCause::Mounted, self.shared.items.len())
    }

    /// Current rotation state, or `None` for an engine without items.
    pub fn state(&self) -> Option<RotationState> {
        self.shared.lock().rotation
    }

    pub fn current_index(&self) -> Option<usize> {
        self.state().map(|rotation| rotation.current_index)
    }

    pub fn is_playing(&self) -> bool {
        self.shared.lock().is_playing()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.items.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.shared.items.len()
    }

    pub fn window_size(&self) -> usize {
        self.state().map_or(0, |rotation| rotation.window_size)
    }

    pub fn autoplay_capability(&self) -> AutoplayCapability {
        self.shared.lock().autoplay
    }

    pub fn items(&self) -> &[Item] {
        &self.shared.items
    }

    pub fn current_item(&self) -> Option<&Item> {
        self.current_index()
            .and_then(|index| self.shared.items.get(index))
    }

    /// Visible items in display order.
    pub fn visible_items(&self) -> Vec<&Item> {
        self.snapshot()
            .visible
            .into_iter()
            .filter_map(|index| self.shared.items.get(index))
            .collect()
    }

    #[cfg(test)]
    fn tick_armed(&self) {
        let generation = self.shared.lock().armed.as_ref().map(|armed| armed.generation);
        if let Some(generation) = generation {
            self.shared.apply(Op::Tick { generation });
        }
    }
}

impl ViewportListener for RotationEngine {
    fn breakpoint_changed(&self, breakpoint: Breakpoint) {
        self.set_breakpoint(breakpoint);
    }
}

impl Drop for RotationEngine {
    fn drop(&mut self) {
        self.shared.teardown();
    }
}

impl std::fmt::Debug for RotationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotationEngine")
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
