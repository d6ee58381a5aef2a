use super::*;

use std::sync::Mutex;

#[test]
fn window_starts_at_current_index() {
    assert_eq!(visible(0, 9, 3), vec![0, 1, 2]);
    assert_eq!(visible(3, 9, 3), vec![3, 4, 5]);
}

#[test]
fn window_wraps_past_the_end() {
    assert_eq!(visible(8, 9, 3), vec![8, 0, 1]);
    assert_eq!(visible(4, 5, 2), vec![4, 0]);
}

#[test]
fn window_larger_than_list_yields_each_index_once() {
    assert_eq!(visible(1, 2, 3), vec![1, 0]);
    assert_eq!(visible(0, 1, 3), vec![0]);
}

#[test]
fn window_indices_are_distinct_for_every_start() {
    for count in 1..=6 {
        for window_size in 1..=4 {
            for start in 0..count {
                let indices = visible(start, count, window_size);
                assert_eq!(indices.len(), window_size.min(count));
                let mut sorted = indices.clone();
                sorted.sort_unstable();
                sorted.dedup();
                assert_eq!(sorted.len(), indices.len(), "repeat in {indices:?}");
            }
        }
    }
}

#[test]
fn empty_list_has_empty_window() {
    assert!(visible(0, 0, 3).is_empty());
    assert_eq!(effective_window_size(3, 0), 0);
}

#[test]
fn effective_window_size_clamps_to_item_count() {
    assert_eq!(effective_window_size(3, 9), 3);
    assert_eq!(effective_window_size(3, 2), 2);
    assert_eq!(effective_window_size(0, 4), 1);
}

#[test]
fn classifier_uses_configured_thresholds() {
    let classifier = BreakpointClassifier::default();
    assert_eq!(classifier.classify(375), Breakpoint::Narrow);
    assert_eq!(classifier.classify(767), Breakpoint::Narrow);
    assert_eq!(classifier.classify(768), Breakpoint::Medium);
    assert_eq!(classifier.classify(1023), Breakpoint::Medium);
    assert_eq!(classifier.classify(1024), Breakpoint::Wide);

    let custom = BreakpointClassifier::new(BreakpointThresholds {
        medium_min_width: 600,
        wide_min_width: 1400,
    });
    assert_eq!(custom.classify(700), Breakpoint::Medium);
    assert_eq!(custom.classify(1300), Breakpoint::Medium);
}

#[derive(Default)]
struct RecordingListener {
    seen: Mutex<Vec<Breakpoint>>,
}

impl ViewportListener for RecordingListener {
    fn breakpoint_changed(&self, breakpoint: Breakpoint) {
        self.seen.lock().expect("seen").push(breakpoint);
    }
}

#[tokio::test]
async fn viewport_bridge_forwards_changes_until_sender_drops() {
    let listener = Arc::new(RecordingListener::default());
    let (tx, rx) = watch::channel(Breakpoint::Wide);
    let bridge = spawn_viewport_bridge(listener.clone(), rx);

    tx.send(Breakpoint::Narrow).expect("send narrow");
    tokio::task::yield_now().await;
    tx.send(Breakpoint::Medium).expect("send medium");
    drop(tx);

    bridge.await.expect("bridge task");
    let seen = listener.seen.lock().expect("seen").clone();
    assert_eq!(seen.last(), Some(&Breakpoint::Medium));
    assert!(!seen.contains(&Breakpoint::Wide));
}
