use std::{
    sync::{Arc, Mutex},
    thread,
};

use carousel_core::{
    AccessibilityAnnouncer, AnnouncementSink, InputController, RotationEngine, RotationObserver,
    RotationSettings,
};
use shared::{
    domain::Item,
    protocol::{Announcement, ChangeCause, Control, RotationFrame},
};

const ITEMS: usize = 7;
const THREADS: usize = 4;
const PRESSES: usize = 250;

#[derive(Default)]
struct FrameLog {
    frames: Mutex<Vec<RotationFrame>>,
}

impl RotationObserver for FrameLog {
    fn state_changed(&self, frame: &RotationFrame, _items: &[Item]) {
        self.frames.lock().expect("frames").push(frame.clone());
    }
}

#[derive(Default)]
struct CountingSink {
    published: Mutex<Vec<Announcement>>,
}

impl AnnouncementSink for CountingSink {
    fn publish(&self, announcement: Announcement) {
        self.published.lock().expect("published").push(announcement);
    }
}

fn cards() -> Vec<Item> {
    (0..ITEMS)
        .map(|i| Item::new(format!("Card {i}"), format!("{i}%")))
        .collect()
}

#[test]
fn concurrent_input_is_serialized_through_the_engine() {
    let engine = Arc::new(RotationEngine::with_tokio_timer(
        cards(),
        RotationSettings::default(),
    ));
    let log = Arc::new(FrameLog::default());
    let sink = Arc::new(CountingSink::default());
    engine.add_observer(log.clone());
    engine.add_observer(Arc::new(AccessibilityAnnouncer::new(sink.clone())));

    thread::scope(|scope| {
        for _ in 0..THREADS {
            let input = InputController::new(Arc::clone(&engine));
            scope.spawn(move || {
                for _ in 0..PRESSES {
                    input.pointer(Control::Next);
                }
            });
        }
    });

    let frames = log.frames.lock().expect("frames").clone();
    assert_eq!(frames.len(), THREADS * PRESSES);
    let mut expected = 0;
    for frame in &frames {
        expected = (expected + 1) % ITEMS;
        assert_eq!(frame.cause, ChangeCause::Next);
        assert_eq!(frame.current_index, expected, "frames interleaved");
    }
    assert_eq!(engine.current_index(), Some((THREADS * PRESSES) % ITEMS));

    // Every press moved the index, so every press was announced.
    assert_eq!(
        sink.published.lock().expect("published").len(),
        THREADS * PRESSES
    );
}
