use serde::{Deserialize, Serialize};

/// Interactive controls rendered around the card strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum Control {
    Next,
    Previous,
    Indicator { index: usize },
    PlayPause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Enter,
    Space,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Activation {
    Pointer,
    Key { key: Key },
}

/// Discrete input forwarded by the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum UiAction {
    Activate {
        control: Control,
        activation: Activation,
    },
    /// Key pressed while the carousel region itself has focus.
    RegionKey { key: Key },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeCause {
    Mounted,
    Tick,
    Next,
    Previous,
    Goto,
    Started,
    Stopped,
    Resized,
}

impl ChangeCause {
    /// Whether this kind of change can move the current index.
    pub fn moves_index(self) -> bool {
        matches!(self, Self::Tick | Self::Next | Self::Previous | Self::Goto)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoplayCapability {
    #[default]
    Available,
    Unavailable,
}

/// What the rendering layer needs after every state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationFrame {
    pub cause: ChangeCause,
    pub current_index: usize,
    pub item_count: usize,
    pub playing: bool,
    pub window_size: usize,
    pub visible: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum RotationEvent {
    StateChanged(RotationFrame),
    AutoplayUnavailable { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Politeness {
    Polite,
    Assertive,
}

impl Politeness {
    /// Value for the `aria-live` attribute of the receiving region.
    pub fn aria_live(self) -> &'static str {
        match self {
            Self::Polite => "polite",
            Self::Assertive => "assertive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub message: String,
    pub politeness: Politeness,
    pub cause: ChangeCause,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn state_changed_uses_type_and_payload_tags() {
        let event = RotationEvent::StateChanged(RotationFrame {
            cause: ChangeCause::Tick,
            current_index: 8,
            item_count: 9,
            playing: true,
            window_size: 3,
            visible: vec![8, 0, 1],
        });

        let value = serde_json::to_value(&event).expect("serialize");
        assert_eq!(value["type"], "state_changed");
        assert_eq!(value["payload"]["cause"], "tick");
        assert_eq!(value["payload"]["visible"], json!([8, 0, 1]));
    }

    #[test]
    fn region_key_action_from_wire() {
        let action: UiAction = serde_json::from_value(json!({
            "type": "region_key",
            "payload": { "key": "arrow_right" }
        }))
        .expect("deserialize");
        assert_eq!(
            action,
            UiAction::RegionKey {
                key: Key::ArrowRight
            }
        );
    }

    #[test]
    fn unknown_key_names_deserialize_as_other() {
        let key: Key = serde_json::from_value(json!("tab")).expect("deserialize");
        assert_eq!(key, Key::Other);
    }

    #[test]
    fn only_navigation_moves_the_index() {
        assert!(ChangeCause::Tick.moves_index());
        assert!(ChangeCause::Goto.moves_index());
        assert!(!ChangeCause::Resized.moves_index());
        assert!(!ChangeCause::Started.moves_index());
    }
}
