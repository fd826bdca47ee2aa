use core::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::vector::Vector2D;

/// Stable index of an agent inside its world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub usize);

/// Display-only color tag, stored as an HSL hue in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub hue: f32,
}

impl Color {
    pub fn from_hue(hue: f32) -> Self {
        Self {
            hue: hue.rem_euclid(360.0),
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_hue(rng.gen_range(0.0..360.0))
    }

    /// Hues spread evenly over the wheel, as the bee swarm paints its bees.
    pub fn spread(index: usize, total: usize) -> Self {
        if total == 0 {
            return Self::from_hue(0.0);
        }
        Self::from_hue(index as f32 / total as f32 * 360.0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, 100%, 50%)", self.hue)
    }
}

/// What drives an agent each tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mode {
    /// Follows the flocking rules and any attraction target.
    #[default]
    Wander,
    /// Heads straight for a fixed point and stops on arrival.
    SeekTarget(Vector2D),
    /// Jitters around freely, pulled back once it strays from `center`.
    Orbit { center: Vector2D },
}

/// A single boid (or bee)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub color: Color,
    pub mode: Mode,
}

impl Agent {
    pub fn new(position: Vector2D, velocity: Vector2D, color: Color) -> Self {
        Self {
            position,
            velocity,
            color,
            mode: Mode::Wander,
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Random position inside the world, velocity components in `[-1, 1)`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, width: f32, height: f32, color: Color) -> Self {
        let position = Vector2D::new(
            rng.gen_range(0.0..width.max(f32::EPSILON)),
            rng.gen_range(0.0..height.max(f32::EPSILON)),
        );
        let velocity = Vector2D::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
        Self::new(position, velocity, color)
    }

    /// Direction the renderer points the agent's triangle.
    pub fn heading(&self) -> f32 {
        self.velocity.heading()
    }

    /// Vertices of a triangle of the given size oriented along the heading:
    /// the tip first, then the two rear corners 30 degrees off the tail.
    pub fn triangle(&self, size: f32) -> [Vector2D; 3] {
        let angle = self.heading();
        let offset = core::f32::consts::FRAC_PI_6;
        let p = self.position;
        [
            Vector2D::new(p.x + angle.cos() * size, p.y + angle.sin() * size),
            Vector2D::new(
                p.x - (angle - offset).cos() * size,
                p.y - (angle - offset).sin() * size,
            ),
            Vector2D::new(
                p.x - (angle + offset).cos() * size,
                p.y - (angle + offset).sin() * size,
            ),
        ]
    }

    pub fn is_seeking(&self) -> bool {
        matches!(self.mode, Mode::SeekTarget(_))
    }
}
