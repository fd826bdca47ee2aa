use std::collections::VecDeque;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, AgentId, Color, Mode};
use crate::behavior;
use crate::command::{Command, ModeScope};
use crate::config::{Behavior, BehaviorFlags, BoundaryPolicy, FlockConfig, IdleMode};
use crate::error::WorldError;
use crate::region::{Rect, Region, RegionShape};
use crate::shape::{assigned_point, Shape};
use crate::vector::Vector2D;

/// Oldest paint marks are dropped past this many.
pub const MAX_PAINT_MARKS: usize = 10_000;

/// A dab left by an agent crossing the paintable region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaintMark {
    pub position: Vector2D,
    pub color: Color,
}

/// The simulated world: agents, bounds, and the input waiting for the next
/// tick.
#[derive(Debug, Clone)]
pub struct World {
    agents: Vec<Agent>,
    config: FlockConfig,
    flags: BehaviorFlags,
    width: f32,
    height: f32,
    target: Option<Vector2D>,
    pointer: Option<Vector2D>,
    commands: VecDeque<Command>,
    paint_marks: VecDeque<PaintMark>,
    rng: StdRng,
    ticks: u64,
}

impl World {
    /// An empty world seeded from system entropy.
    pub fn new(width: f32, height: f32, config: FlockConfig) -> Result<Self, WorldError> {
        Self::with_rng(width, height, config, StdRng::from_entropy())
    }

    /// An empty world with a fixed random seed.
    pub fn with_seed(
        width: f32,
        height: f32,
        config: FlockConfig,
        seed: u64,
    ) -> Result<Self, WorldError> {
        Self::with_rng(width, height, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        width: f32,
        height: f32,
        config: FlockConfig,
        rng: StdRng,
    ) -> Result<Self, WorldError> {
        validate_size(width, height)?;
        config.validate()?;

        Ok(Self {
            agents: Vec::new(),
            config,
            flags: config.rules,
            width,
            height,
            target: None,
            pointer: None,
            commands: VecDeque::new(),
            paint_marks: VecDeque::new(),
            rng,
            ticks: 0,
        })
    }

    /// Spawns `count` agents at random positions in the config's idle mode.
    /// Orbiting swarms get hues spread over the wheel, flocks random ones.
    pub fn populate(&mut self, count: usize) {
        let idle = self.idle_mode();
        for i in 0..count {
            let color = match self.config.idle_mode {
                IdleMode::Flock => Color::random(&mut self.rng),
                IdleMode::Orbit => Color::spread(i, count),
            };
            let agent = Agent::random(&mut self.rng, self.width, self.height, color).with_mode(idle);
            self.agents.push(agent);
        }
        info!(
            "Spawned {} agents in {}x{} world ({} total)",
            count,
            self.width,
            self.height,
            self.agents.len()
        );
    }

    pub fn add_agent(&mut self, agent: Agent) -> AgentId {
        self.agents.push(agent);
        AgentId(self.agents.len() - 1)
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    /// Replaces the tuning parameters. Runtime behavior toggles are kept.
    pub fn set_config(&mut self, config: FlockConfig) -> Result<(), WorldError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn flags(&self) -> &BehaviorFlags {
        &self.flags
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn center(&self) -> Vector2D {
        Vector2D::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn target(&self) -> Option<Vector2D> {
        self.target
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Resolved containment region for reflective worlds.
    pub fn containment(&self) -> Option<Region> {
        match self.config.boundary {
            BoundaryPolicy::Reflect { region } => Some(region.resolve(self.width, self.height)),
            BoundaryPolicy::Wrap => None,
        }
    }

    /// The device agents are dragged and painted inside: the containment
    /// region, or the tracker laid over the world when agents wrap.
    pub fn paint_region(&self) -> Region {
        self.containment().unwrap_or_else(|| {
            RegionShape::tongue_tracker().resolve(self.width, self.height)
        })
    }

    /// Where painting agents leave marks. Only the main part of the device
    /// counts; the tracker's tab does not.
    pub fn paint_surface(&self) -> Option<Rect> {
        self.paint_region().parts().first().copied()
    }

    pub fn paint_marks(&self) -> impl Iterator<Item = &PaintMark> {
        self.paint_marks.iter()
    }

    /// Hands the recorded paint marks to the caller.
    pub fn take_paint_marks(&mut self) -> Vec<PaintMark> {
        self.paint_marks.drain(..).collect()
    }

    /// Queues a command for the start of the next tick.
    pub fn send(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    pub fn set_target(&mut self, target: Option<Vector2D>) {
        self.send(Command::SetTarget(target));
    }

    pub fn set_mode(&mut self, scope: ModeScope, mode: Mode) {
        self.send(Command::SetMode { scope, mode });
    }

    pub fn toggle_behavior(&mut self, behavior: Behavior) {
        self.send(Command::ToggleBehavior(behavior));
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.send(Command::Resize { width, height });
    }

    pub fn pointer_moved(&mut self, at: Vector2D) {
        self.send(Command::PointerMoved(at));
    }

    pub fn form_shape(&mut self, shape: Shape) {
        self.send(Command::FormShape(shape));
    }

    pub fn scatter(&mut self) {
        self.send(Command::Scatter);
    }

    fn idle_mode(&self) -> Mode {
        match self.config.idle_mode {
            IdleMode::Flock => Mode::Wander,
            IdleMode::Orbit => Mode::Orbit {
                center: self.center(),
            },
        }
    }

    fn apply(&mut self, command: Command) {
        debug!("Applying command: {:?}", command);
        match command {
            Command::SetTarget(Some(target)) if !target.is_finite() => {
                warn!("Ignoring non-finite target {:?}", target)
            }
            Command::SetTarget(target) => self.target = target,
            Command::SetMode { scope, mode } => match scope {
                ModeScope::All => self.agents.iter_mut().for_each(|a| a.mode = mode),
                ModeScope::Agent(id) => match self.agents.get_mut(id.0) {
                    Some(agent) => agent.mode = mode,
                    None => warn!("No agent {:?} to set mode on", id),
                },
            },
            Command::ToggleBehavior(behavior) => {
                let enabled = self.flags.toggle(behavior);
                info!("{:?} {}", behavior, if enabled { "enabled" } else { "disabled" });
            }
            Command::Resize { width, height } => match validate_size(width, height) {
                Ok(()) => {
                    let old_center = self.center();
                    self.width = width;
                    self.height = height;
                    let new_center = self.center();
                    for agent in self.agents.iter_mut() {
                        if let Mode::Orbit { center } = &mut agent.mode {
                            if *center == old_center {
                                *center = new_center;
                            }
                        }
                    }
                    info!("Resized to {}x{}", width, height);
                }
                Err(e) => warn!("Ignoring resize: {}", e),
            },
            Command::PointerMoved(at) if !at.is_finite() => {
                warn!("Ignoring non-finite pointer position {:?}", at)
            }
            Command::PointerMoved(at) => {
                self.pointer = Some(at);
                let idle = self.idle_mode();
                let radius = self.config.scatter_radius;
                for agent in self.agents.iter_mut() {
                    if agent.is_seeking() && agent.position.distance(&at) < radius {
                        agent.mode = idle;
                    }
                }
            }
            Command::PointerLeft => self.pointer = None,
            Command::FormShape(shape) => {
                let points = shape.points();
                if points.is_empty() {
                    warn!("Ignoring shape with no points");
                    return;
                }
                for (i, agent) in self.agents.iter_mut().enumerate() {
                    if let Some(point) = assigned_point(&points, i) {
                        agent.mode = Mode::SeekTarget(point);
                    }
                }
                info!("Forming shape of {} points", points.len());
            }
            Command::Scatter => {
                let idle = self.idle_mode();
                self.agents.iter_mut().for_each(|a| a.mode = idle);
            }
        }
    }

    /// The point agents are currently pulled toward: an explicit target, or
    /// the pointer while attraction is switched on.
    pub fn attraction_target(&self) -> Option<Vector2D> {
        self.target
            .or(if self.flags.attraction { self.pointer } else { None })
    }

    /// Advances the simulation by one tick.
    ///
    /// Steering reads a snapshot of the agents taken after the queued
    /// commands are applied, so the update order within a tick does not
    /// matter.
    pub fn update(&mut self) {
        while let Some(command) = self.commands.pop_front() {
            self.apply(command);
        }

        let config = self.config;
        let flags = self.flags;
        let attractor = self.attraction_target();
        let containment = self.containment();
        let paint_surface = if flags.painting { self.paint_surface() } else { None };
        let (width, height) = (self.width, self.height);
        let snapshot = self.agents.clone();

        for (i, agent) in self.agents.iter_mut().enumerate() {
            let me = &snapshot[i];
            let others = || {
                snapshot
                    .iter()
                    .enumerate()
                    .filter(move |(j, _)| *j != i)
                    .map(|(_, other)| other)
            };

            match agent.mode {
                Mode::Wander => {
                    let mut steering = Vector2D::zero();
                    if flags.alignment {
                        steering += behavior::alignment(me, others(), &config);
                    }
                    if flags.cohesion {
                        steering += behavior::cohesion(me, others(), &config);
                    }
                    if flags.separation {
                        steering += behavior::separation(me, others(), &config);
                    }
                    if let Some(target) = attractor {
                        steering += behavior::attraction(me, target, &config);
                    }
                    agent.velocity += steering;
                }
                Mode::SeekTarget(target) => {
                    agent.velocity = behavior::seek(me, target, &config);
                }
                Mode::Orbit { center } => {
                    let jitter = if config.wander_jitter > 0.0 {
                        Vector2D::new(
                            self.rng.gen_range(-config.wander_jitter..config.wander_jitter),
                            self.rng.gen_range(-config.wander_jitter..config.wander_jitter),
                        )
                    } else {
                        Vector2D::zero()
                    };
                    agent.velocity += behavior::orbit(me, center, jitter, &config);
                }
            }

            agent.velocity = agent.velocity.limit(config.max_speed);
            let previous = agent.position;
            agent.position += agent.velocity;

            match &containment {
                Some(region) => region.contain(previous, &mut agent.position, &mut agent.velocity),
                None => wrap(&mut agent.position, width, height),
            }

            if let Some(surface) = &paint_surface {
                if surface.contains(agent.position) {
                    if self.paint_marks.len() >= MAX_PAINT_MARKS {
                        self.paint_marks.pop_front();
                    }
                    self.paint_marks.push_back(PaintMark {
                        position: agent.position,
                        color: agent.color,
                    });
                }
            }
        }

        self.ticks += 1;
    }
}

/// Teleports a position that left `[0, width] x [0, height]` to the
/// opposite edge.
pub fn wrap(position: &mut Vector2D, width: f32, height: f32) {
    if position.x > width {
        position.x = 0.0;
    } else if position.x < 0.0 {
        position.x = width;
    }

    if position.y > height {
        position.y = 0.0;
    } else if position.y < 0.0 {
        position.y = height;
    }
}

fn validate_size(width: f32, height: f32) -> Result<(), WorldError> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(WorldError::InvalidSize { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(config: FlockConfig) -> World {
        World::with_seed(800.0, 600.0, config, 42).unwrap()
    }

    fn still(x: f32, y: f32) -> Agent {
        Agent::new(Vector2D::new(x, y), Vector2D::zero(), Color::from_hue(0.0))
    }

    #[test]
    fn test_rejects_bad_size() {
        assert!(matches!(
            World::new(0.0, 600.0, FlockConfig::default()),
            Err(WorldError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_empty_world_ticks() {
        let mut w = world(FlockConfig::default());
        w.update();
        assert_eq!(w.ticks(), 1);
        assert!(w.is_empty());
    }

    #[test]
    fn test_wrap_edges() {
        let mut p = Vector2D::new(-1.0, 601.0);
        wrap(&mut p, 800.0, 600.0);
        assert_eq!(p, Vector2D::new(800.0, 0.0));
    }

    #[test]
    fn test_commands_wait_for_next_tick() {
        let mut w = world(FlockConfig::default());
        w.add_agent(still(10.0, 10.0));
        w.toggle_behavior(Behavior::Attraction);
        assert!(!w.flags().attraction);
        assert_eq!(w.pending_commands(), 1);

        w.update();
        assert!(w.flags().attraction);
        assert_eq!(w.pending_commands(), 0);
    }

    #[test]
    fn test_invalid_resize_is_ignored() {
        let mut w = world(FlockConfig::default());
        w.resize(f32::NAN, 100.0);
        w.update();
        assert_eq!((w.width(), w.height()), (800.0, 600.0));

        w.resize(1024.0, 768.0);
        w.update();
        assert_eq!(w.center(), Vector2D::new(512.0, 384.0));
    }

    #[test]
    fn test_set_mode_single_agent() {
        let mut w = world(FlockConfig::default());
        w.add_agent(still(10.0, 10.0));
        let id = w.add_agent(still(20.0, 20.0));
        let target = Vector2D::new(20.0, 20.5);
        w.set_mode(ModeScope::Agent(id), Mode::SeekTarget(target));
        w.set_mode(ModeScope::Agent(AgentId(99)), Mode::Wander);
        w.update();

        assert_eq!(w.agents()[0].mode, Mode::Wander);
        assert_eq!(w.agent(id).unwrap().mode, Mode::SeekTarget(target));
        // already within the arrival threshold
        assert_eq!(w.agent(id).unwrap().velocity, Vector2D::zero());
    }

    #[test]
    fn test_pointer_attracts_only_when_enabled() {
        let mut w = world(FlockConfig::default());
        w.add_agent(still(100.0, 100.0));
        w.pointer_moved(Vector2D::new(200.0, 100.0));
        w.update();
        assert_eq!(w.agents()[0].velocity, Vector2D::zero());

        w.toggle_behavior(Behavior::Attraction);
        w.update();
        // 1000 / 100² = 0.1 toward the pointer
        assert!((w.agents()[0].velocity.x - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_explicit_target_overrides_pointer() {
        let mut w = world(FlockConfig::default());
        w.add_agent(still(100.0, 100.0));
        w.toggle_behavior(Behavior::Attraction);
        w.pointer_moved(Vector2D::new(200.0, 100.0));
        w.set_target(Some(Vector2D::new(0.0, 100.0)));
        w.update();
        assert!(w.agents()[0].velocity.x < 0.0);
        assert_eq!(w.attraction_target(), Some(Vector2D::new(0.0, 100.0)));

        w.set_target(None);
        w.update();
        assert_eq!(w.attraction_target(), Some(Vector2D::new(200.0, 100.0)));
    }

    #[test]
    fn test_orbit_mode_drifts_with_bounded_jitter() {
        let mut w = world(FlockConfig::preset(crate::config::Variant::BeeSwarm));
        w.add_agent(still(400.0, 300.0).with_mode(Mode::Orbit {
            center: Vector2D::new(400.0, 300.0),
        }));
        w.update();
        let v = w.agents()[0].velocity;
        assert!(v.x.abs() <= 0.1 && v.y.abs() <= 0.1);
    }

    #[test]
    fn test_painting_records_marks_inside_tracker() {
        let mut w = World::with_seed(
            1000.0,
            1000.0,
            FlockConfig::preset(crate::config::Variant::TongueTracker),
            1,
        )
        .unwrap();
        w.add_agent(still(500.0, 500.0));
        w.add_agent(still(400.0, 400.0));
        // inside the tab above the square
        w.add_agent(still(500.0, 230.0));
        w.update();
        assert_eq!(w.paint_marks().count(), 0);

        w.toggle_behavior(Behavior::Painting);
        w.update();
        assert_eq!(w.paint_marks().count(), 2);
        assert_eq!(w.take_paint_marks().len(), 2);
        assert_eq!(w.paint_marks().count(), 0);
        assert_eq!(w.agents()[2].position, Vector2D::new(500.0, 230.0));
    }

    #[test]
    fn test_paint_surface_is_the_tracker_square() {
        let w = world(FlockConfig::default());
        assert_eq!(w.paint_region().parts().len(), 2);
        assert_eq!(w.paint_surface(), Some(Rect::new(175.0, 75.0, 450.0, 450.0)));
    }

    #[test]
    fn test_non_finite_pointer_input_is_ignored() {
        let mut w = world(FlockConfig::default());
        w.add_agent(still(100.0, 100.0));
        w.add_agent(still(110.0, 100.0));
        w.toggle_behavior(Behavior::Attraction);
        w.set_target(Some(Vector2D::new(f32::NAN, 100.0)));
        w.pointer_moved(Vector2D::new(f32::INFINITY, 0.0));
        w.update();

        assert_eq!(w.target(), None);
        assert_eq!(w.attraction_target(), None);
        for _ in 0..3 {
            w.update();
        }
        assert!(w
            .agents()
            .iter()
            .all(|a| a.position.is_finite() && a.velocity.is_finite()));

        w.set_target(Some(Vector2D::new(0.0, 100.0)));
        w.update();
        assert_eq!(w.target(), Some(Vector2D::new(0.0, 100.0)));
    }

    #[test]
    fn test_resize_moves_orbit_center() {
        let mut w = world(FlockConfig::preset(crate::config::Variant::BeeSwarm));
        w.populate(3);
        let pinned = Vector2D::new(10.0, 10.0);
        w.add_agent(still(10.0, 10.0).with_mode(Mode::Orbit { center: pinned }));
        w.resize(1600.0, 1200.0);
        w.update();

        let new_center = Vector2D::new(800.0, 600.0);
        for agent in &w.agents()[..3] {
            assert_eq!(agent.mode, Mode::Orbit { center: new_center });
        }
        // orbits around other points are left alone
        assert_eq!(w.agents()[3].mode, Mode::Orbit { center: pinned });
    }
}
