use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::region::RegionShape;

/// How the averaged neighbor velocity is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlignmentPolicy {
    /// Adds `average * strength` to the velocity.
    Nudge { strength: f32 },
    /// Steers fully onto the neighbor average.
    Replace,
}

/// How each close neighbor's offset is weighted before averaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeparationWeighting {
    /// Raw offset `a - o`.
    Linear,
    /// `(a - o) / d`: a unit vector per neighbor.
    InverseDistance,
    /// `(a - o) / d²`, the classic boids falloff.
    InverseSquare,
}

/// Pull toward the current attraction target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Attraction {
    /// `direction * min(cap, k / d²)`, ignored inside `dead_zone`.
    InverseSquare { k: f32, cap: f32, dead_zone: f32 },
    /// `(target - position) * strength`.
    Linear { strength: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Teleport to the opposite edge.
    Wrap,
    /// Clamp into the region and bounce.
    Reflect { region: RegionShape },
}

/// Mode newly spawned or scattered agents fall back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdleMode {
    #[default]
    Flock,
    Orbit,
}

/// Behaviors a host can switch on and off at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Behavior {
    Alignment,
    Cohesion,
    Separation,
    Attraction,
    Painting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorFlags {
    pub alignment: bool,
    pub cohesion: bool,
    pub separation: bool,
    pub attraction: bool,
    pub painting: bool,
}

impl Default for BehaviorFlags {
    fn default() -> Self {
        Self {
            alignment: true,
            cohesion: true,
            separation: true,
            attraction: false,
            painting: false,
        }
    }
}

impl BehaviorFlags {
    pub fn none() -> Self {
        Self {
            alignment: false,
            cohesion: false,
            separation: false,
            attraction: false,
            painting: false,
        }
    }

    pub fn get(&self, behavior: Behavior) -> bool {
        match behavior {
            Behavior::Alignment => self.alignment,
            Behavior::Cohesion => self.cohesion,
            Behavior::Separation => self.separation,
            Behavior::Attraction => self.attraction,
            Behavior::Painting => self.painting,
        }
    }

    pub fn set(&mut self, behavior: Behavior, enabled: bool) {
        let flag = match behavior {
            Behavior::Alignment => &mut self.alignment,
            Behavior::Cohesion => &mut self.cohesion,
            Behavior::Separation => &mut self.separation,
            Behavior::Attraction => &mut self.attraction,
            Behavior::Painting => &mut self.painting,
        };
        *flag = enabled;
    }

    /// Flips a behavior and returns its new state.
    pub fn toggle(&mut self, behavior: Behavior) -> bool {
        let enabled = !self.get(behavior);
        self.set(behavior, enabled);
        enabled
    }
}

/// The sketch variants the engine reproduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// First flocking sketch: one shared radius, linear pulls.
    Prototype,
    /// Canonical flock with wraparound and pointer attraction.
    Modular,
    /// Canonical flock contained inside the tongue-tracker device.
    TongueTracker,
    /// Independent bees that orbit the center and form shapes.
    BeeSwarm,
}

impl FromStr for Variant {
    type Err = ConfigError;

    /// Accepts the snake_case or kebab-case variant name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "prototype" => Ok(Variant::Prototype),
            "modular" => Ok(Variant::Modular),
            "tongue_tracker" => Ok(Variant::TongueTracker),
            "bee_swarm" => Ok(Variant::BeeSwarm),
            _ => Err(ConfigError::UnknownVariant(s.to_string())),
        }
    }
}

/// Configuration for the flocking simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockConfig {
    pub perception_radius: f32,
    pub separation_radius: f32,
    pub max_speed: f32,
    pub alignment: AlignmentPolicy,
    pub cohesion_strength: f32,
    pub separation_strength: f32,
    pub separation_weighting: SeparationWeighting,
    pub attraction: Attraction,
    pub seek_speed: f32,
    pub arrival_threshold: f32,
    pub scatter_radius: f32,
    pub wander_jitter: f32,
    pub orbit_radius: f32,
    pub orbit_pull: f32,
    pub boundary: BoundaryPolicy,
    pub idle_mode: IdleMode,
    pub rules: BehaviorFlags,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            perception_radius: 50.0,
            separation_radius: 25.0,
            max_speed: 2.5,
            alignment: AlignmentPolicy::Nudge { strength: 0.1 },
            cohesion_strength: 0.01,
            separation_strength: 1.0,
            separation_weighting: SeparationWeighting::InverseDistance,
            attraction: Attraction::InverseSquare {
                k: 1000.0,
                cap: 0.5,
                dead_zone: 10.0,
            },
            seek_speed: 2.0,
            arrival_threshold: 1.0,
            scatter_radius: 10.0,
            wander_jitter: 0.1,
            orbit_radius: 100.0,
            orbit_pull: 0.00001,
            boundary: BoundaryPolicy::Wrap,
            idle_mode: IdleMode::Flock,
            rules: BehaviorFlags::default(),
        }
    }
}

impl FlockConfig {
    pub fn preset(variant: Variant) -> Self {
        match variant {
            Variant::Prototype => Self {
                separation_radius: 50.0,
                max_speed: 2.0,
                separation_strength: 0.02,
                separation_weighting: SeparationWeighting::Linear,
                attraction: Attraction::Linear { strength: 0.01 },
                ..Self::default()
            },
            Variant::Modular => Self::default(),
            Variant::TongueTracker => Self {
                boundary: BoundaryPolicy::Reflect {
                    region: RegionShape::tongue_tracker(),
                },
                ..Self::default()
            },
            Variant::BeeSwarm => Self {
                max_speed: 2.0,
                idle_mode: IdleMode::Orbit,
                rules: BehaviorFlags::none(),
                ..Self::default()
            },
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut fields = vec![
            ("perception_radius", self.perception_radius),
            ("separation_radius", self.separation_radius),
            ("max_speed", self.max_speed),
            ("cohesion_strength", self.cohesion_strength),
            ("separation_strength", self.separation_strength),
            ("seek_speed", self.seek_speed),
            ("arrival_threshold", self.arrival_threshold),
            ("scatter_radius", self.scatter_radius),
            ("wander_jitter", self.wander_jitter),
            ("orbit_radius", self.orbit_radius),
            ("orbit_pull", self.orbit_pull),
        ];
        if let AlignmentPolicy::Nudge { strength } = self.alignment {
            fields.push(("alignment.strength", strength));
        }
        match self.attraction {
            Attraction::InverseSquare { k, cap, dead_zone } => {
                fields.push(("attraction.k", k));
                fields.push(("attraction.cap", cap));
                fields.push(("attraction.dead_zone", dead_zone));
            }
            Attraction::Linear { strength } => fields.push(("attraction.strength", strength)),
        }
        if let BoundaryPolicy::Reflect {
            region:
                RegionShape::TongueTracker {
                    square_size,
                    tab_width,
                    tab_height,
                },
        } = self.boundary
        {
            fields.push(("boundary.square_size", square_size));
            fields.push(("boundary.tab_width", tab_width));
            fields.push(("boundary.tab_height", tab_height));
        }

        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if self.separation_radius > self.perception_radius {
            return Err(ConfigError::SeparationExceedsPerception {
                separation: self.separation_radius,
                perception: self.perception_radius,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for variant in [
            Variant::Prototype,
            Variant::Modular,
            Variant::TongueTracker,
            Variant::BeeSwarm,
        ] {
            assert_eq!(FlockConfig::preset(variant).validate(), Ok(()), "{variant:?}");
        }
    }

    #[test]
    fn test_rejects_negative_and_nan() {
        let config = FlockConfig {
            max_speed: -1.0,
            ..FlockConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Negative {
                field: "max_speed",
                value: -1.0
            })
        );

        let config = FlockConfig {
            attraction: Attraction::Linear {
                strength: f32::INFINITY,
            },
            ..FlockConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotFinite {
                field: "attraction.strength",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_separation_wider_than_perception() {
        let config = FlockConfig {
            separation_radius: 80.0,
            ..FlockConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SeparationExceedsPerception { .. })
        ));
    }

    #[test]
    fn test_variant_names() {
        assert_eq!("bee-swarm".parse(), Ok(Variant::BeeSwarm));
        assert_eq!("Tongue_Tracker".parse(), Ok(Variant::TongueTracker));
        assert_eq!(
            "flying".parse::<Variant>(),
            Err(ConfigError::UnknownVariant("flying".to_string()))
        );
    }

    #[test]
    fn test_behavior_toggle() {
        let mut flags = BehaviorFlags::default();
        assert!(!flags.get(Behavior::Attraction));
        assert!(flags.toggle(Behavior::Attraction));
        assert!(flags.get(Behavior::Attraction));
        assert!(!flags.toggle(Behavior::Separation));
        assert!(!flags.separation);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: FlockConfig = serde_json::from_str(
            r#"{
                "max_speed": 4.0,
                "alignment": { "kind": "replace" },
                "boundary": { "kind": "reflect", "region": { "kind": "bounds" } },
                "rules": { "cohesion": false }
            }"#,
        )
        .unwrap();
        assert_eq!(config.max_speed, 4.0);
        assert_eq!(config.alignment, AlignmentPolicy::Replace);
        assert_eq!(
            config.boundary,
            BoundaryPolicy::Reflect {
                region: RegionShape::Bounds
            }
        );
        assert!(!config.rules.cohesion);
        assert!(config.rules.alignment);
        assert_eq!(config.perception_radius, 50.0);
    }
}
