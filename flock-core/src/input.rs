//! Host-side pointer helpers: dragging inside a device region and
//! recording free-hand strokes.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::region::Region;
use crate::vector::Vector2D;

/// Tracks a pointer that only engages when pressed inside a region.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    is_down: bool,
    position: Vector2D,
    last_position: Vector2D,
    velocity: Vector2D,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the press landed inside `region`.
    pub fn press(&mut self, at: Vector2D, region: &Region) -> bool {
        self.is_down = region.contains(at);
        self.is_down
    }

    pub fn release(&mut self) {
        self.is_down = false;
    }

    pub fn move_to(&mut self, at: Vector2D) {
        self.last_position = self.position;
        self.position = at;
        self.velocity = self.position - self.last_position;
    }

    pub fn is_down(&self) -> bool {
        self.is_down
    }

    pub fn position(&self) -> Vector2D {
        self.position
    }

    /// Per-move delta while dragging, zero otherwise.
    pub fn drag_velocity(&self) -> Vector2D {
        if self.is_down {
            self.velocity
        } else {
            Vector2D::zero()
        }
    }
}

/// One straight piece of a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Vector2D,
    pub end: Vector2D,
    /// Pointer speed over the segment in units per second.
    pub speed: f32,
}

/// Oldest stroke segments are dropped past this many.
pub const MAX_STROKE_SEGMENTS: usize = 5_000;

/// Records strokes drawn while the pointer is held down.
#[derive(Debug, Clone, Default)]
pub struct StrokeRecorder {
    drawing: bool,
    last_position: Vector2D,
    last_time_ms: f64,
    segments: VecDeque<Segment>,
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, at: Vector2D, time_ms: f64) {
        self.drawing = true;
        self.last_position = at;
        self.last_time_ms = time_ms;
    }

    /// Extends the current stroke; returns the new segment, if drawing.
    pub fn extend(&mut self, at: Vector2D, time_ms: f64) -> Option<Segment> {
        if !self.drawing {
            return None;
        }

        let elapsed_secs = (time_ms - self.last_time_ms) / 1000.0;
        let distance = self.last_position.distance(&at);
        let speed = if elapsed_secs > 0.0 {
            (distance as f64 / elapsed_secs) as f32
        } else {
            0.0
        };

        let segment = Segment {
            start: self.last_position,
            end: at,
            speed,
        };
        if self.segments.len() >= MAX_STROKE_SEGMENTS {
            self.segments.pop_front();
        }
        self.segments.push_back(segment);
        self.last_position = at;
        self.last_time_ms = time_ms;
        Some(segment)
    }

    pub fn end(&mut self) {
        self.drawing = false;
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    /// The drawn path as a point list, joined where segments meet.
    pub fn points(&self) -> Vec<Vector2D> {
        let mut points: Vec<Vector2D> = Vec::with_capacity(self.segments.len() + 1);
        for segment in &self.segments {
            if points.last() != Some(&segment.start) {
                points.push(segment.start);
            }
            points.push(segment.end);
        }
        points
    }
}
