// End-to-end checks of the public API: flock and chain behaviour driven the
// way a host would drive it.

use flocking::chain::Joint;
use flocking::render::DrawCommand;
use flocking::{
    Agent, AgentId, BoundaryMode, Bounds, Chain, Demo, DemoConfig, DemoKind, Flock, FlockParams, FrameInput,
    FrameLoop, Recorder, Vector2,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn separation_only() -> FlockParams {
    FlockParams {
        separation_range: 10.0,
        separation_factor: 0.1,
        alignment_range: 0.0,
        cohesion_range: 0.0,
        min_speed: 0.0,
        boundary: BoundaryMode::Wrap,
        avoid_pointer: false,
        ..FlockParams::default()
    }
}

#[test]
fn close_pair_pushes_apart_symmetrically() {
    let agents = vec![
        Agent::new(AgentId(0), Vector2::new(0.0, 0.0), Vector2::ZERO),
        Agent::new(AgentId(1), Vector2::new(5.0, 0.0), Vector2::ZERO),
    ];
    let mut flock = Flock::new(agents, separation_only(), Bounds::new(200.0, 200.0)).unwrap();

    let left = flock.steering(0, None).unwrap();
    let right = flock.steering(1, None).unwrap();
    assert!((left.separation - Vector2::new(-0.5, 0.0)).length() < 1e-6);
    assert!((right.separation - Vector2::new(0.5, 0.0)).length() < 1e-6);

    flock.tick(None);
    assert!((flock.agents()[0].velocity - Vector2::new(-0.5, 0.0)).length() < 1e-6);
    assert!((flock.agents()[1].velocity - Vector2::new(0.5, 0.0)).length() < 1e-6);
}

#[test]
fn pair_at_exact_separation_range_is_left_alone() {
    let agents = vec![
        Agent::new(AgentId(0), Vector2::new(0.0, 0.0), Vector2::ZERO),
        Agent::new(AgentId(1), Vector2::new(10.0, 0.0), Vector2::ZERO),
    ];
    let flock = Flock::new(agents, separation_only(), Bounds::new(200.0, 200.0)).unwrap();
    assert_eq!(flock.steering(0, None).unwrap().separation, Vector2::ZERO);
}

#[test]
fn lone_agent_keeps_its_velocity() {
    let params = FlockParams {
        boundary: BoundaryMode::Wrap,
        avoid_pointer: false,
        ..FlockParams::default()
    };
    let agents = vec![Agent::new(AgentId(0), Vector2::new(100.0, 100.0), Vector2::new(2.0, 1.0))];
    let mut flock = Flock::new(agents, params, Bounds::default()).unwrap();

    for _ in 0..10 {
        flock.tick(None);
    }
    assert_eq!(flock.agents()[0].velocity, Vector2::new(2.0, 1.0));
}

#[test]
fn wrap_brings_escaped_agent_back_inside() {
    let bounds = Bounds::new(300.0, 200.0);
    let params = FlockParams {
        boundary: BoundaryMode::Wrap,
        ..FlockParams::default()
    };
    let agents = vec![Agent::new(AgentId(0), Vector2::new(bounds.width + 1.0, 50.0), Vector2::new(1.0, 0.0))];
    let mut flock = Flock::new(agents, params, bounds).unwrap();

    flock.tick(None);
    let x = flock.agents()[0].position.x;
    assert!((0.0..bounds.width).contains(&x), "x = {x}");
}

#[test]
fn bounce_turns_agents_near_an_edge_back_inside() {
    let bounds = Bounds::new(300.0, 200.0);
    let params = FlockParams {
        boundary: BoundaryMode::Bounce,
        avoid_pointer: false,
        separation_range: 0.0,
        alignment_range: 0.0,
        cohesion_range: 0.0,
        ..FlockParams::default()
    };
    let turn = params.turn_factor;
    let agents = vec![
        // Heading out through the left edge
        Agent::new(AgentId(0), Vector2::new(10.0, 100.0), Vector2::new(-2.0, 0.0)),
        // Heading out through the bottom edge
        Agent::new(AgentId(1), Vector2::new(250.0, 195.0), Vector2::new(0.0, 2.0)),
        // Far from every edge
        Agent::new(AgentId(2), Vector2::new(150.0, 100.0), Vector2::new(2.0, 0.0)),
    ];
    let mut flock = Flock::new(agents, params, bounds).unwrap();

    flock.tick(None);

    let a = flock.agents();
    assert!((a[0].velocity - Vector2::new(-2.0 + turn, 0.0)).length() < 1e-5);
    assert!((a[1].velocity - Vector2::new(0.0, 2.0 - turn)).length() < 1e-5);
    assert_eq!(a[2].velocity, Vector2::new(2.0, 0.0));
}

#[test]
fn duplicate_ids_are_rejected() {
    let agents = vec![
        Agent::new(AgentId(3), Vector2::ZERO, Vector2::X),
        Agent::new(AgentId(3), Vector2::ONE, Vector2::X),
    ];
    assert!(Flock::new(agents, FlockParams::default(), Bounds::default()).is_err());
}

#[test]
fn coincident_chain_pair_is_corrected_to_link_length() {
    let joints = vec![Joint::new(Vector2::ZERO), Joint::new(Vector2::ZERO)];
    let mut chain = Chain::from_joints(joints, 50.0);

    chain.move_to(Vector2::new(100.0, 0.0));

    assert_eq!(chain.joints()[0].position, Vector2::new(100.0, 0.0));
    assert!((chain.joints()[1].position - Vector2::new(50.0, 0.0)).length() < 1e-4);
}

#[test]
fn headless_flock_run_keeps_speeds_in_range() {
    let config = DemoConfig {
        demo: DemoKind::Flock,
        agents: 60,
        predators: 2,
        seed: Some(11),
        ..DemoConfig::default()
    };
    let mut rng = config.rng();
    let mut frames = FrameLoop::new(Demo::from_config(&config, &mut rng));
    let mut painter = Recorder::new();
    let input = FrameInput {
        pointer: Some(config.bounds().center()),
        pointer_down: false,
    };

    for _ in 0..200 {
        painter.commands.clear();
        frames.frame(&input, &mut painter);
    }

    let Demo::Flock(sim) = frames.simulation() else {
        panic!("expected the flock demo");
    };
    let p = sim.flock.params();
    for agent in sim.flock.agents() {
        let speed = agent.velocity.length();
        assert!(speed >= p.min_speed - 1e-4 && speed <= p.max_speed + 1e-4, "speed {speed}");
    }
    assert_eq!(frames.ticks(), 200);
    // 60 agents, 2 predators and the pointer overlay
    assert_eq!(painter.frame().len(), 63);
}

#[test]
fn same_seed_gives_same_flock() {
    let run = || {
        let mut rng = StdRng::seed_from_u64(5);
        let mut flock = Flock::random(40, 0, FlockParams::default(), Bounds::default(), &mut rng);
        for _ in 0..50 {
            flock.tick(None);
        }
        flock.agents().to_vec()
    };
    assert_eq!(run(), run());
}

#[test]
fn grid_and_parallel_ticks_match_brute_force() {
    let make = |spatial_grid: bool, parallel: bool| {
        let params = FlockParams {
            spatial_grid,
            parallel,
            ..FlockParams::default()
        };
        let mut rng = StdRng::seed_from_u64(21);
        Flock::random(150, 1, params, Bounds::default(), &mut rng)
    };
    let mut reference = make(false, false);
    let mut accelerated = make(true, true);

    for _ in 0..30 {
        reference.tick(None);
        accelerated.tick(None);
    }

    for (a, b) in reference.agents().iter().zip(accelerated.agents()) {
        assert!((a.position - b.position).length() < 1e-3);
    }
}

#[test]
fn chain_demo_draws_joints_every_frame() {
    let config = DemoConfig {
        demo: DemoKind::Chain,
        ..DemoConfig::default()
    };
    let mut rng = config.rng();
    let mut frames = FrameLoop::new(Demo::from_config(&config, &mut rng));
    let mut painter = Recorder::new();

    frames.frame(
        &FrameInput {
            pointer: Some(Vector2::new(200.0, 200.0)),
            pointer_down: false,
        },
        &mut painter,
    );

    let joints = painter
        .frame()
        .iter()
        .filter(|c| matches!(c, DrawCommand::FillCircle { .. }))
        .count();
    assert_eq!(joints, config.chain.joint_count);
}
