// Round logic without a browser: capture strokes, flatten them to the wire,
// and drive the clocks, phase machine, and early-win rule the way the frame
// loop does — with a synthetic performance.now() timeline.

use quickdraw_duel::api::RecognizeResponse;
use quickdraw_duel::game::{Countdown, Debounce, Phase, PhaseMachine, ROUND_SECS};
use quickdraw_duel::sketch::Sketch;
use quickdraw_duel::verdict;

#[test]
fn wire_flattening_tags_stroke_tails() {
    let mut sketch = Sketch::new();
    sketch.begin_stroke(0.0, 0.0, 0.0);
    sketch.extend(10.0, 0.0, 16.0);
    sketch.extend(20.0, 0.0, 32.0);
    sketch.end_stroke();
    sketch.begin_stroke(50.0, 50.0, 200.0);
    sketch.extend(60.0, 60.0, 216.0);
    sketch.end_stroke();

    let strokes: Vec<_> = sketch.strokes().collect();
    assert_eq!(strokes.len(), 2);
    assert_eq!(strokes[0].len(), 3);
    assert_eq!(strokes[1].len(), 2);

    let wire = sketch.to_wire();
    assert_eq!(wire.len(), sketch.point_count());
    let tails: Vec<usize> = wire
        .iter()
        .enumerate()
        .filter(|(_, p)| p.stroke_end == Some(true))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(tails, vec![2, 4]);
    assert_eq!(wire[3].timestamp, Some(200.0));
}

#[test]
fn countdown_starts_at_round_length() {
    let t0 = 5_000.0;
    let countdown = Countdown::new(t0, f64::from(ROUND_SECS) * 1000.0);
    assert_eq!(countdown.remaining_secs(t0), ROUND_SECS);
    assert!(!countdown.expired(t0));
    assert!(countdown.expired(t0 + f64::from(ROUND_SECS) * 1000.0));
}

#[test]
fn round_timeline_with_live_guesses() {
    let mut machine = PhaseMachine::new();
    let mut sketch = Sketch::new();
    let mut debounce = Debounce::new(800.0);

    assert!(machine.start_round());

    // A burst of samples at frame rate never trips the gate mid-stroke.
    sketch.begin_stroke(100.0, 100.0, 0.0);
    debounce.note_input(0.0);
    for i in 1..30 {
        let t = f64::from(i) * 16.0;
        assert!(sketch.extend(100.0 + f64::from(i), 100.0, t).is_some());
        debounce.note_input(t);
        assert!(!debounce.ready(t));
    }
    sketch.end_stroke();
    let last = 29.0 * 16.0;
    debounce.note_input(last);

    // Quiet spell elapses: one request goes out.
    assert!(debounce.ready(last + 800.0));
    debounce.begin();
    assert!(!debounce.ready(last + 900.0));

    // The model is unsure; the round keeps running.
    let miss: RecognizeResponse = serde_json::from_str(
        r#"{"prediction": "banana", "is_correct": false, "confidence": 0.58}"#,
    )
    .unwrap();
    debounce.finish();
    assert!(!verdict::ends_round_early(&verdict::interpret(&miss)));
    assert_eq!(machine.phase(), Phase::Drawing);

    // More drawing re-arms the gate, and the next guess is a confident hit.
    sketch.begin_stroke(150.0, 150.0, 2000.0);
    sketch.extend(160.0, 160.0, 2016.0);
    sketch.end_stroke();
    debounce.note_input(2016.0);
    assert!(debounce.ready(2816.0));
    debounce.begin();
    let hit: RecognizeResponse = serde_json::from_str(
        r#"{"prediction": "apple", "is_correct": true, "confidence": 0.87}"#,
    )
    .unwrap();
    debounce.finish();
    assert!(verdict::ends_round_early(&verdict::interpret(&hit)));
    assert!(machine.end_round());
    assert_eq!(machine.phase(), Phase::PostGame);
}

#[test]
fn cleared_sketch_produces_no_request_payload() {
    let mut sketch = Sketch::new();
    sketch.begin_stroke(10.0, 10.0, 0.0);
    sketch.extend(20.0, 20.0, 16.0);
    sketch.end_stroke();
    assert!(!sketch.is_empty());
    sketch.clear();
    // The controller refuses to submit an empty drawing; the backend would
    // answer 400 with an error payload.
    assert!(sketch.is_empty());
    assert!(sketch.to_wire().is_empty());
}

#[test]
fn restart_returns_to_a_startable_state() {
    let mut machine = PhaseMachine::new();
    assert!(machine.start_round());
    assert!(machine.end_round());
    assert!(machine.reset());
    assert!(machine.start_round());
}
