//! Flocking engine for boids and swarm sketches.
//!
//! A [`World`] owns a flat arena of [`Agent`]s. Every [`World::update`]
//! applies queued [`Command`]s, steers each agent by the rules in
//! [`behavior`], clamps its speed, integrates its position and applies the
//! boundary policy.

pub mod agent;
pub mod behavior;
pub mod command;
pub mod config;
pub mod error;
pub mod input;
pub mod region;
pub mod shape;
pub mod vector;
pub mod world;

pub use agent::{Agent, AgentId, Color, Mode};
pub use command::{Command, ModeScope};
pub use config::{
    AlignmentPolicy, Attraction, Behavior, BehaviorFlags, BoundaryPolicy, FlockConfig, IdleMode,
    SeparationWeighting, Variant,
};
pub use error::{ConfigError, WorldError};
pub use input::{PointerTracker, Segment, StrokeRecorder};
pub use region::{Rect, Region, RegionShape};
pub use shape::Shape;
pub use vector::Vector2D;
pub use world::{PaintMark, World};
