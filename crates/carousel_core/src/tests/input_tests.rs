use super::*;

use crate::{
    settings::RotationSettings,
    support::{stat_cards, ManualTimerDriver},
};

fn controller(count: usize) -> InputController {
    let timer = Arc::new(ManualTimerDriver::default());
    let engine = RotationEngine::new(stat_cards(count), RotationSettings::default(), timer);
    InputController::new(Arc::new(engine))
}

#[test]
fn pointer_controls_map_to_one_call_each() {
    let input = controller(9);

    assert_eq!(input.pointer(Control::Next), Dispatch::Forwarded(EngineCall::Next));
    assert_eq!(input.engine().current_index(), Some(1));

    assert_eq!(
        input.pointer(Control::Previous),
        Dispatch::Forwarded(EngineCall::Previous)
    );
    assert_eq!(input.engine().current_index(), Some(0));

    assert_eq!(
        input.pointer(Control::Indicator { index: 6 }),
        Dispatch::Forwarded(EngineCall::Goto(6))
    );
    assert_eq!(input.engine().current_index(), Some(6));

    assert_eq!(
        input.pointer(Control::PlayPause),
        Dispatch::Forwarded(EngineCall::Toggle)
    );
    assert!(input.engine().is_playing());
}

#[test]
fn enter_and_space_match_pointer_activation() {
    let controls = [
        Control::Next,
        Control::Previous,
        Control::Indicator { index: 4 },
        Control::PlayPause,
    ];
    for control in controls {
        let by_pointer = controller(6);
        let by_enter = controller(6);
        let by_space = controller(6);

        let expected = by_pointer.pointer(control);
        assert_eq!(by_enter.key(control, Key::Enter), expected);
        assert_eq!(by_space.key(control, Key::Space), expected);

        let state = by_pointer.engine().state();
        assert_eq!(by_enter.engine().state(), state);
        assert_eq!(by_space.engine().state(), state);
    }
}

#[test]
fn other_keys_on_controls_are_ignored() {
    let input = controller(4);

    assert_eq!(input.key(Control::Next, Key::ArrowLeft), Dispatch::Ignored);
    assert_eq!(input.key(Control::PlayPause, Key::Other), Dispatch::Ignored);
    assert_eq!(input.engine().current_index(), Some(0));
    assert!(!input.engine().is_playing());
}

#[test]
fn region_keys_navigate() {
    let input = controller(5);

    input.handle(UiAction::RegionKey {
        key: Key::ArrowRight,
    });
    assert_eq!(input.engine().current_index(), Some(1));

    input.handle(UiAction::RegionKey {
        key: Key::ArrowLeft,
    });
    input.handle(UiAction::RegionKey {
        key: Key::ArrowLeft,
    });
    assert_eq!(input.engine().current_index(), Some(4));

    input.handle(UiAction::RegionKey { key: Key::Home });
    assert_eq!(input.engine().current_index(), Some(0));

    assert_eq!(
        input.handle(UiAction::RegionKey { key: Key::End }),
        Dispatch::Forwarded(EngineCall::Goto(4))
    );
    assert_eq!(
        input.handle(UiAction::RegionKey { key: Key::Enter }),
        Dispatch::Ignored
    );
}

#[test]
fn rapid_input_is_applied_in_order() {
    let input = controller(10);
    input.pointer(Control::PlayPause);

    let actions = [
        Control::Next,
        Control::Next,
        Control::Indicator { index: 7 },
        Control::Previous,
        Control::Next,
        Control::Next,
        Control::Next,
    ];
    for control in actions {
        input.pointer(control);
    }

    assert_eq!(input.engine().current_index(), Some(9));
    assert!(!input.engine().is_playing());
}

#[test]
fn manual_input_cancels_autoplay() {
    let input = controller(3);
    input.engine().start();

    input.key(Control::Indicator { index: 2 }, Key::Enter);

    assert!(!input.engine().is_playing());
    assert_eq!(input.engine().current_index(), Some(2));
}

#[test]
fn end_key_on_empty_engine_is_harmless() {
    let input = controller(0);
    assert_eq!(
        input.handle(UiAction::RegionKey { key: Key::End }),
        Dispatch::Forwarded(EngineCall::Goto(0))
    );
    assert_eq!(input.engine().current_index(), None);
}

#[test]
fn actions_deserialize_from_wire_form() {
    let raw = r#"{"type":"activate","payload":{"control":{"control":"indicator","index":3},"activation":{"kind":"key","key":"space"}}}"#;
    let action: UiAction = serde_json::from_str(raw).expect("action");
    let input = controller(5);

    assert_eq!(input.handle(action), Dispatch::Forwarded(EngineCall::Goto(3)));
}
