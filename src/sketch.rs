//! Stroke capture model.
//!
//! A stroke is a contiguous run of pointer samples between a press and a
//! release. The model is pure Rust so capture semantics stay testable off
//! the browser; the game controller feeds it from mouse / touch closures and
//! paints the `Segment` each `extend` call hands back.

use crate::api::WirePoint;

/// One captured pointer sample in canvas space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    /// Capture time in the performance.now() millisecond domain.
    pub t_ms: f64,
}

/// Increment between the two latest samples of the open stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: (f64, f64),
    pub to: (f64, f64),
}

/// Ordered stroke list for one round of drawing.
#[derive(Debug, Default)]
pub struct Sketch {
    strokes: Vec<Vec<Point>>,
    open: bool,
}

impl Sketch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new stroke seeded with the press position. A still-open stroke
    /// is closed first (mouseout can swallow the release event).
    pub fn begin_stroke(&mut self, x: f64, y: f64, t_ms: f64) {
        self.end_stroke();
        self.strokes.push(vec![Point { x, y, t_ms }]);
        self.open = true;
    }

    /// Append a sample to the open stroke and return the paintable segment
    /// from the previous sample. Moves with the pointer up are discarded.
    pub fn extend(&mut self, x: f64, y: f64, t_ms: f64) -> Option<Segment> {
        if !self.open {
            return None;
        }
        let stroke = self.strokes.last_mut()?;
        let prev = *stroke.last()?;
        stroke.push(Point { x, y, t_ms });
        Some(Segment {
            from: (prev.x, prev.y),
            to: (x, y),
        })
    }

    /// Close the open stroke. Calling with no open stroke is a no-op.
    pub fn end_stroke(&mut self) {
        self.open = false;
    }

    /// Discard everything captured so far.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.open = false;
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(Vec::len).sum()
    }

    pub fn strokes(&self) -> impl Iterator<Item = &[Point]> {
        self.strokes.iter().map(Vec::as_slice)
    }

    /// Flatten into the wire list the recognition endpoint expects: every
    /// sample carries its timestamp, the last sample of each stroke is tagged
    /// `strokeEnd`.
    pub fn to_wire(&self) -> Vec<WirePoint> {
        let mut out = Vec::with_capacity(self.point_count());
        for stroke in &self.strokes {
            for (i, p) in stroke.iter().enumerate() {
                out.push(WirePoint {
                    x: p.x,
                    y: p.y,
                    timestamp: Some(p.t_ms),
                    stroke_end: (i + 1 == stroke.len()).then_some(true),
                });
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_returns_segment_from_previous_sample() {
        let mut s = Sketch::new();
        s.begin_stroke(10.0, 20.0, 0.0);
        let seg = s.extend(15.0, 25.0, 16.0).unwrap();
        assert_eq!(seg.from, (10.0, 20.0));
        assert_eq!(seg.to, (15.0, 25.0));
        assert_eq!(s.point_count(), 2);
    }

    #[test]
    fn moves_with_pointer_up_are_discarded() {
        let mut s = Sketch::new();
        assert!(s.extend(1.0, 1.0, 0.0).is_none());
        s.begin_stroke(0.0, 0.0, 0.0);
        s.end_stroke();
        assert!(s.extend(1.0, 1.0, 10.0).is_none());
        assert_eq!(s.point_count(), 1);
    }

    #[test]
    fn press_while_open_starts_a_second_stroke() {
        let mut s = Sketch::new();
        s.begin_stroke(0.0, 0.0, 0.0);
        s.extend(1.0, 0.0, 5.0);
        // No release seen (mouseout ate it) before the next press.
        s.begin_stroke(9.0, 9.0, 20.0);
        assert_eq!(s.stroke_count(), 2);
        assert_eq!(s.point_count(), 3);
    }

    #[test]
    fn clear_resets_to_fresh_state() {
        let mut s = Sketch::new();
        s.begin_stroke(0.0, 0.0, 0.0);
        s.extend(1.0, 1.0, 5.0);
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.point_count(), 0);
        assert!(s.extend(2.0, 2.0, 10.0).is_none());
    }
}
