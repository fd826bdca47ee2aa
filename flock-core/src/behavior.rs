//! Steering rules. Each rule is a pure function of one agent, the agents it
//! may see, and the configuration, and returns the velocity change it asks
//! for. Callers pass `others` with the agent itself already excluded.

use crate::agent::Agent;
use crate::config::{AlignmentPolicy, Attraction, FlockConfig, SeparationWeighting};
use crate::vector::{Vector2D, EPSILON};

pub fn alignment<'a, I>(agent: &Agent, others: I, config: &FlockConfig) -> Vector2D
where
    I: IntoIterator<Item = &'a Agent>,
{
    let mut sum = Vector2D::zero();
    let mut count = 0;

    for other in others {
        if agent.position.distance(&other.position) < config.perception_radius {
            sum += other.velocity;
            count += 1;
        }
    }

    if count == 0 {
        return Vector2D::zero();
    }

    let average = sum / count as f32;
    match config.alignment {
        AlignmentPolicy::Nudge { strength } => average * strength,
        AlignmentPolicy::Replace => average - agent.velocity,
    }
}

pub fn cohesion<'a, I>(agent: &Agent, others: I, config: &FlockConfig) -> Vector2D
where
    I: IntoIterator<Item = &'a Agent>,
{
    let mut sum = Vector2D::zero();
    let mut count = 0;

    for other in others {
        if agent.position.distance(&other.position) < config.perception_radius {
            sum += other.position;
            count += 1;
        }
    }

    if count == 0 {
        return Vector2D::zero();
    }

    let center_of_mass = sum / count as f32;
    (center_of_mass - agent.position) * config.cohesion_strength
}

pub fn separation<'a, I>(agent: &Agent, others: I, config: &FlockConfig) -> Vector2D
where
    I: IntoIterator<Item = &'a Agent>,
{
    let mut steering = Vector2D::zero();
    let mut count = 0;

    for other in others {
        let distance = agent.position.distance(&other.position);
        // Coincident agents have no direction to push apart in.
        if distance < EPSILON || distance >= config.separation_radius {
            continue;
        }
        let diff = agent.position - other.position;
        steering += match config.separation_weighting {
            SeparationWeighting::Linear => diff,
            SeparationWeighting::InverseDistance => diff / distance,
            SeparationWeighting::InverseSquare => diff / (distance * distance),
        };
        count += 1;
    }

    if count == 0 {
        return Vector2D::zero();
    }

    steering / count as f32 * config.separation_strength
}

/// Pull toward an attraction target such as the pointer.
pub fn attraction(agent: &Agent, target: Vector2D, config: &FlockConfig) -> Vector2D {
    match config.attraction {
        Attraction::InverseSquare { k, cap, dead_zone } => {
            let offset = target - agent.position;
            let distance = offset.magnitude();
            if distance < dead_zone.max(EPSILON) {
                return Vector2D::zero();
            }
            let strength = cap.min(k / (distance * distance));
            offset / distance * strength
        }
        Attraction::Linear { strength } => (target - agent.position) * strength,
    }
}

/// Velocity that carries the agent straight to `target`, or zero once it
/// has arrived.
pub fn seek(agent: &Agent, target: Vector2D, config: &FlockConfig) -> Vector2D {
    let offset = target - agent.position;
    let distance = offset.magnitude();
    if distance > config.arrival_threshold && distance > EPSILON {
        offset / distance * config.seek_speed
    } else {
        Vector2D::zero()
    }
}

/// Random drift plus a weak tether to `center` once the agent is farther
/// than `orbit_radius` from it. `jitter` is supplied by the caller so the
/// rule itself stays deterministic.
pub fn orbit(agent: &Agent, center: Vector2D, jitter: Vector2D, config: &FlockConfig) -> Vector2D {
    let offset = agent.position - center;
    if offset.magnitude() > config.orbit_radius {
        jitter - offset * config.orbit_pull
    } else {
        jitter
    }
}
