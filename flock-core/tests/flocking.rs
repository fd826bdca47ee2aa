use flock_core::{
    Agent, Behavior, BoundaryPolicy, Color, FlockConfig, Mode, ModeScope, RegionShape, Shape,
    Variant, Vector2D, World,
};

fn still(x: f32, y: f32) -> Agent {
    Agent::new(Vector2D::new(x, y), Vector2D::zero(), Color::from_hue(200.0))
}

fn moving(x: f32, y: f32, vx: f32, vy: f32) -> Agent {
    Agent::new(Vector2D::new(x, y), Vector2D::new(vx, vy), Color::from_hue(200.0))
}

#[test]
fn speed_stays_bounded_for_every_variant() {
    for variant in [
        Variant::Prototype,
        Variant::Modular,
        Variant::TongueTracker,
        Variant::BeeSwarm,
    ] {
        let config = FlockConfig::preset(variant);
        let mut world = World::with_seed(800.0, 600.0, config, 11).unwrap();
        world.populate(80);
        world.toggle_behavior(Behavior::Attraction);
        world.pointer_moved(Vector2D::new(400.0, 300.0));

        for _ in 0..200 {
            world.update();
            for agent in world.agents() {
                assert!(
                    agent.velocity.magnitude() <= config.max_speed + 1e-4,
                    "{variant:?}: speed {}",
                    agent.velocity.magnitude()
                );
                assert!(agent.position.is_finite());
            }
        }
    }
}

#[test]
fn lone_agent_keeps_its_velocity() {
    let mut world = World::with_seed(800.0, 600.0, FlockConfig::default(), 1).unwrap();
    world.add_agent(moving(100.0, 100.0, 1.0, 0.5));
    world.update();

    let agent = &world.agents()[0];
    assert_eq!(agent.velocity, Vector2D::new(1.0, 0.5));
    assert_eq!(agent.position, Vector2D::new(101.0, 100.5));
}

#[test]
fn wraparound_keeps_agents_in_bounds() {
    let mut world = World::with_seed(800.0, 600.0, FlockConfig::default(), 1).unwrap();
    world.add_agent(moving(801.0, 300.0, 0.0, 0.0));
    world.update();
    assert_eq!(world.agents()[0].position, Vector2D::new(0.0, 300.0));

    let mut world = World::with_seed(800.0, 600.0, FlockConfig::default(), 2).unwrap();
    world.populate(60);
    for _ in 0..300 {
        world.update();
        for agent in world.agents() {
            assert!((0.0..=800.0).contains(&agent.position.x));
            assert!((0.0..=600.0).contains(&agent.position.y));
        }
    }
}

#[test]
fn reflective_wall_flips_normal_velocity() {
    let config = FlockConfig {
        boundary: BoundaryPolicy::Reflect {
            region: RegionShape::Bounds,
        },
        ..FlockConfig::default()
    };
    let mut world = World::with_seed(800.0, 600.0, config, 1).unwrap();
    world.add_agent(moving(799.0, 300.0, 2.0, 0.5));
    world.update();

    let agent = &world.agents()[0];
    assert_eq!(agent.position.x, 800.0);
    assert_eq!(agent.velocity, Vector2D::new(-2.0, 0.5));
}

#[test]
fn tongue_tracker_never_lets_agents_escape() {
    let mut world =
        World::with_seed(1200.0, 900.0, FlockConfig::preset(Variant::TongueTracker), 5).unwrap();
    world.populate(40);
    let region = world.containment().unwrap();

    for _ in 0..300 {
        world.update();
        for agent in world.agents() {
            assert!(region.contains(agent.position), "{:?}", agent.position);
        }
    }
}

#[test]
fn close_agents_push_apart() {
    let mut world = World::with_seed(800.0, 600.0, FlockConfig::default(), 1).unwrap();
    let a = world.add_agent(still(100.0, 100.0));
    let b = world.add_agent(still(105.0, 100.0));
    world.update();

    let a = world.agent(a).unwrap();
    let b = world.agent(b).unwrap();
    assert!(a.velocity.x < 0.0);
    assert!(b.velocity.x > 0.0);
    assert_eq!(a.velocity.x, -b.velocity.x);
    assert_eq!(a.velocity.y, 0.0);
}

#[test]
fn coincident_agents_stay_finite() {
    let mut world = World::with_seed(800.0, 600.0, FlockConfig::default(), 1).unwrap();
    world.add_agent(still(300.0, 300.0));
    world.add_agent(still(300.0, 300.0));
    world.update();
    for agent in world.agents() {
        assert!(agent.velocity.is_finite());
        assert!(agent.position.is_finite());
    }
}

#[test]
fn seeking_agent_moves_exactly_max_speed_toward_target() {
    let config = FlockConfig {
        max_speed: 2.0,
        ..FlockConfig::default()
    };
    let mut world = World::with_seed(800.0, 600.0, config, 1).unwrap();
    world.add_agent(still(0.0, 0.0));
    world.set_mode(ModeScope::All, Mode::SeekTarget(Vector2D::new(500.0, 500.0)));
    world.update();

    let position = world.agents()[0].position;
    assert!((position.magnitude() - 2.0).abs() < 1e-5);
    assert!((position.x - position.y).abs() < 1e-6);
}

#[test]
fn shapes_assign_points_round_robin_and_agents_arrive() {
    let mut world =
        World::with_seed(800.0, 600.0, FlockConfig::preset(Variant::BeeSwarm), 9).unwrap();
    world.populate(50);
    world.form_shape(Shape::letter_t(world.center()));
    world.update();

    let points = Shape::letter_t(world.center()).points();
    for (i, agent) in world.agents().iter().enumerate() {
        assert_eq!(agent.mode, Mode::SeekTarget(points[i % points.len()]));
    }

    for _ in 0..1000 {
        world.update();
    }
    for (i, agent) in world.agents().iter().enumerate() {
        let point = points[i % points.len()];
        assert!(agent.position.distance(&point) <= 1.0);
        assert_eq!(agent.velocity, Vector2D::zero());
    }
}

#[test]
fn pointer_scatters_nearby_seekers() {
    let mut world =
        World::with_seed(800.0, 600.0, FlockConfig::preset(Variant::BeeSwarm), 3).unwrap();
    world.add_agent(still(100.0, 100.0));
    world.add_agent(still(300.0, 300.0));
    world.form_shape(Shape::pathway(world.center()));
    world.update();

    let near = world.agents()[0].position + Vector2D::new(3.0, 0.0);
    world.pointer_moved(near);
    world.update();

    assert!(matches!(world.agents()[0].mode, Mode::Orbit { .. }));
    assert!(world.agents()[1].is_seeking());

    world.scatter();
    world.update();
    assert!(!world.agents()[1].is_seeking());
}

#[test]
fn empty_shape_is_ignored() {
    let mut world = World::with_seed(800.0, 600.0, FlockConfig::default(), 1).unwrap();
    world.add_agent(still(10.0, 10.0));
    world.form_shape(Shape::Custom { points: Vec::new() });
    world.update();
    assert_eq!(world.agents()[0].mode, Mode::Wander);
}
