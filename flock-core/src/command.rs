use serde::{Deserialize, Serialize};

use crate::agent::{AgentId, Mode};
use crate::config::Behavior;
use crate::shape::Shape;
use crate::vector::Vector2D;

/// Which agents a mode change applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeScope {
    All,
    Agent(AgentId),
}

/// Input delivered by the host between ticks. Commands queue up and are
/// applied in order at the start of the next tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Designate (or clear) an explicit attraction target.
    SetTarget(Option<Vector2D>),
    SetMode { scope: ModeScope, mode: Mode },
    ToggleBehavior(Behavior),
    Resize { width: f32, height: f32 },
    /// Latest pointer position. Seeking agents close to it scatter.
    PointerMoved(Vector2D),
    /// Pointer left the surface.
    PointerLeft,
    /// Send every agent to its round-robin point of the shape.
    FormShape(Shape),
    /// Return every agent to the idle mode.
    Scatter,
}
