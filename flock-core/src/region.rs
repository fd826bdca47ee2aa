//! Rectangular containment regions for reflective boundaries.

use serde::{Deserialize, Serialize};

use crate::vector::Vector2D;

/// Axis-aligned rectangle, edges inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    pub fn contains(&self, p: Vector2D) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Squared distance from `p` to the nearest point of the rectangle.
    fn distance_sq(&self, p: Vector2D) -> f32 {
        let dx = (self.left - p.x).max(0.0).max(p.x - self.right);
        let dy = (self.top - p.y).max(0.0).max(p.y - self.bottom);
        dx * dx + dy * dy
    }

    /// Clamps `position` into the rectangle and turns any velocity component
    /// on a crossed edge back inward.
    pub fn bounce(&self, position: &mut Vector2D, velocity: &mut Vector2D) {
        if position.x < self.left {
            position.x = self.left;
            velocity.x = velocity.x.abs();
        } else if position.x > self.right {
            position.x = self.right;
            velocity.x = -velocity.x.abs();
        }

        if position.y < self.top {
            position.y = self.top;
            velocity.y = velocity.y.abs();
        } else if position.y > self.bottom {
            position.y = self.bottom;
            velocity.y = -velocity.y.abs();
        }
    }
}

/// A union of rectangles an agent may move freely between.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    parts: Vec<Rect>,
}

impl Region {
    pub fn new(parts: Vec<Rect>) -> Self {
        Self { parts }
    }

    pub fn rect(rect: Rect) -> Self {
        Self { parts: vec![rect] }
    }

    pub fn parts(&self) -> &[Rect] {
        &self.parts
    }

    pub fn contains(&self, p: Vector2D) -> bool {
        self.parts.iter().any(|r| r.contains(p))
    }

    /// Keeps an agent that moved from `previous` to `position` inside the
    /// region. Agents that left are clamped into the part they came from
    /// (or the nearest part when they started outside) with the crossed
    /// velocity components reflected.
    pub fn contain(&self, previous: Vector2D, position: &mut Vector2D, velocity: &mut Vector2D) {
        if self.parts.is_empty() || self.contains(*position) {
            return;
        }

        let home = self
            .parts
            .iter()
            .find(|r| r.contains(previous))
            .or_else(|| {
                self.parts.iter().min_by(|a, b| {
                    a.distance_sq(*position)
                        .total_cmp(&b.distance_sq(*position))
                })
            });

        if let Some(rect) = home {
            rect.bounce(position, velocity);
        }
    }
}

/// Region layouts resolved against the current world size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegionShape {
    /// The whole world rectangle.
    Bounds,
    /// A square device centered in the world with a narrower tab on top.
    TongueTracker {
        square_size: f32,
        tab_width: f32,
        tab_height: f32,
    },
}

impl RegionShape {
    pub fn tongue_tracker() -> Self {
        RegionShape::TongueTracker {
            square_size: 450.0,
            tab_width: 230.0,
            tab_height: 80.0,
        }
    }

    pub fn resolve(&self, width: f32, height: f32) -> Region {
        match *self {
            RegionShape::Bounds => Region::rect(Rect::new(0.0, 0.0, width, height)),
            RegionShape::TongueTracker {
                square_size,
                tab_width,
                tab_height,
            } => {
                let cx = width / 2.0;
                let cy = height / 2.0;
                let square = Rect::new(
                    cx - square_size / 2.0,
                    cy - square_size / 2.0,
                    square_size,
                    square_size,
                );
                let tab = Rect::new(
                    cx - tab_width / 2.0,
                    square.top - tab_height,
                    tab_width,
                    tab_height,
                );
                Region::new(vec![square, tab])
            }
        }
    }
}
