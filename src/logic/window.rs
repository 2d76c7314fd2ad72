//! Time windowing
//!
//! Groups the incoming frame stream into fixed-duration windows. The
//! builder keeps exactly one window open at a time; a frame past the open
//! window's end closes it, and any fully-elapsed empty intervals in between
//! are emitted as empty windows so the time axis stays contiguous.

use super::frame::{CanFrame, Label};

/// Frames whose timestamps fall in one fixed-duration interval
/// `[start, start + duration)`.
///
/// Mutable only while open; the builder hands it off by value at closure
/// and it is never touched again.
#[derive(Debug, Clone)]
pub struct Window {
    start: f64,
    duration: f64,
    frames: Vec<CanFrame>,
}

impl Window {
    pub fn new(start: f64, duration: f64) -> Self {
        Self {
            start,
            duration,
            frames: Vec::new(),
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    /// Exclusive end boundary. A frame stamped exactly here belongs to the
    /// next window.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    pub fn push(&mut self, frame: CanFrame) {
        self.frames.push(frame);
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// True when any frame in this window carries an attack label.
    pub fn has_attack(&self) -> bool {
        self.frames.iter().any(|f| f.label == Label::Attack)
    }
}

/// Accumulates frames into the currently-open window and closes windows
/// as the frame stream crosses interval boundaries.
#[derive(Debug)]
pub struct WindowBuilder {
    duration: f64,
    open: Option<Window>,
}

impl WindowBuilder {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            open: None,
        }
    }

    /// Accept one frame, returning every window closed by its arrival in
    /// time order.
    ///
    /// The first frame ever seen seeds the time axis at
    /// `floor(ts / duration) * duration`. A frame older than the open
    /// window's start is kept in the open window: closed windows never
    /// accept frames retroactively.
    pub fn accept(&mut self, frame: CanFrame) -> Vec<Window> {
        let ts = frame.timestamp;

        let duration = self.duration;
        let open = self.open.get_or_insert_with(|| {
            let aligned = (ts / duration).floor() * duration;
            Window::new(aligned, duration)
        });

        if ts < open.end() {
            open.push(frame);
            return Vec::new();
        }

        // Catch-up: close the open window, then one empty window per
        // skipped interval, until the frame fits.
        let mut closed = Vec::new();
        loop {
            let next_start = open.end();
            closed.push(std::mem::replace(open, Window::new(next_start, self.duration)));
            if ts < open.end() {
                break;
            }
        }
        open.push(frame);
        closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(ts: f64) -> CanFrame {
        CanFrame {
            timestamp: ts,
            can_id: "0100".to_string(),
            dlc: 2,
            payload: "aabb".to_string(),
            label: Label::Normal,
        }
    }

    fn closed_windows(duration: f64, timestamps: &[f64]) -> Vec<Window> {
        let mut builder = WindowBuilder::new(duration);
        timestamps
            .iter()
            .flat_map(|&ts| builder.accept(frame(ts)))
            .collect()
    }

    #[test]
    fn test_frames_within_duration_stay_in_one_window() {
        let closed = closed_windows(1.0, &[0.1, 0.5, 0.9]);
        assert!(closed.is_empty());
    }

    #[test]
    fn test_duplicate_timestamp_does_not_close_a_window() {
        let closed = closed_windows(1.0, &[0.1, 0.1]);
        assert!(closed.is_empty());
    }

    #[test]
    fn test_boundary_timestamp_belongs_to_next_window() {
        let closed = closed_windows(1.0, &[0.5, 1.0]);
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].frame_count(), 1);
        assert_eq!(closed[0].start(), 0.0);
    }

    #[test]
    fn test_gap_fills_empty_windows() {
        // 0.2 opens [0,1); 3.4 closes [0,1) and skips [1,2) and [2,3).
        let closed = closed_windows(1.0, &[0.2, 3.4]);
        assert_eq!(closed.len(), 3);
        assert_eq!(closed[0].frame_count(), 1);
        assert!(closed[1].is_empty());
        assert!(closed[2].is_empty());
        assert_eq!(closed[1].start(), 1.0);
        assert_eq!(closed[2].start(), 2.0);
    }

    #[test]
    fn test_contiguous_time_axis() {
        let closed = closed_windows(1.0, &[0.1, 0.9, 1.2, 2.3, 3.5, 4.6]);
        assert_eq!(closed.len(), 4);
        for (i, w) in closed.iter().enumerate() {
            assert_eq!(w.start(), i as f64);
            assert_eq!(w.end(), (i + 1) as f64);
            assert_eq!(w.frame_count(), if i == 0 { 2 } else { 1 });
        }
    }

    #[test]
    fn test_axis_seeded_from_first_frame() {
        // Absolute capture timestamps must not synthesize catch-up windows
        // back to zero.
        let mut builder = WindowBuilder::new(1.0);
        assert!(builder.accept(frame(1479121434.85)).is_empty());
        let closed = builder.accept(frame(1479121435.9));
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].start(), 1479121434.0);
        assert_eq!(closed[0].frame_count(), 1);
    }

    #[test]
    fn test_late_frame_lands_in_open_window() {
        let mut builder = WindowBuilder::new(1.0);
        builder.accept(frame(5.2));
        assert!(builder.accept(frame(4.7)).is_empty());
        let closed = builder.accept(frame(6.1));
        assert_eq!(closed[0].frame_count(), 2);
    }

    #[test]
    fn test_attack_frame_marks_window() {
        let mut builder = WindowBuilder::new(1.0);
        let mut attack = frame(0.3);
        attack.label = Label::Attack;
        builder.accept(frame(0.1));
        builder.accept(attack);
        let closed = builder.accept(frame(1.5));
        assert!(closed[0].has_attack());
    }
}
