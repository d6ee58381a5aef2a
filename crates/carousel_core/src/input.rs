//! Translation of UI actions into engine calls.

use std::sync::Arc;

use shared::protocol::{Activation, Control, Key, UiAction};
use tracing::{debug, trace};

use crate::engine::RotationEngine;

/// The engine operation an action resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCall {
    Next,
    Previous,
    Goto(usize),
    Toggle,
}

impl EngineCall {
    pub fn name(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Previous => "prev",
            Self::Goto(_) => "goto",
            Self::Toggle => "toggle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Forwarded(EngineCall),
    Ignored,
}

/// Forwards each UI action to exactly one engine call, synchronously and in
/// the order the actions arrive.
#[derive(Debug)]
pub struct InputController {
    engine: Arc<RotationEngine>,
}

impl InputController {
    pub fn new(engine: Arc<RotationEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Arc<RotationEngine> {
        &self.engine
    }

    pub fn handle(&self, action: UiAction) -> Dispatch {
        let call = match action {
            UiAction::Activate {
                control,
                activation,
            } => activation_call(control, activation),
            UiAction::RegionKey { key } => region_key_call(key, self.engine.item_count()),
        };

        let Some(call) = call else {
            trace!(?action, "input ignored");
            return Dispatch::Ignored;
        };
        debug!(call = call.name(), ?action, "forwarding input");
        self.forward(call);
        Dispatch::Forwarded(call)
    }

    pub fn pointer(&self, control: Control) -> Dispatch {
        self.handle(UiAction::Activate {
            control,
            activation: Activation::Pointer,
        })
    }

    pub fn key(&self, control: Control, key: Key) -> Dispatch {
        self.handle(UiAction::Activate {
            control,
            activation: Activation::Key { key },
        })
    }

    fn forward(&self, call: EngineCall) {
        match call {
            EngineCall::Next => self.engine.next(),
            EngineCall::Previous => self.engine.prev(),
            EngineCall::Goto(index) => self.engine.goto(index),
            EngineCall::Toggle => self.engine.toggle(),
        }
    }
}

fn control_call(control: Control) -> EngineCall {
    match control {
        Control::Next => EngineCall::Next,
        Control::Previous => EngineCall::Previous,
        Control::Indicator { index } => EngineCall::Goto(index),
        Control::PlayPause => EngineCall::Toggle,
    }
}

/// Enter and Space activate a control exactly like a pointer press.
fn activation_call(control: Control, activation: Activation) -> Option<EngineCall> {
    match activation {
        Activation::Pointer
        | Activation::Key {
            key: Key::Enter | Key::Space,
        } => Some(control_call(control)),
        Activation::Key { .. } => None,
    }
}

fn region_key_call(key: Key, item_count: usize) -> Option<EngineCall> {
    match key {
        Key::ArrowRight => Some(EngineCall::Next),
        Key::ArrowLeft => Some(EngineCall::Previous),
        Key::Home => Some(EngineCall::Goto(0)),
        Key::End => Some(EngineCall::Goto(item_count.saturating_sub(1))),
        Key::Enter | Key::Space | Key::Other => None,
    }
}

#[cfg(test)]
#[path = "tests/input_tests.rs"]
mod tests;
