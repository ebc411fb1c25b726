/*
 * Simulation Module
 *
 * Glue between the engines and whatever drives the frames. A `Simulation`
 * advances one fixed step per tick and draws itself through a `Painter`.
 * The `FrameLoop` is the single place the host controls the animation:
 * it ticks, clears and renders once per frame, and can be paused or stopped.
 *
 * Every tick is one unit of time regardless of wall-clock time between
 * frames.
 */

use rand::Rng;
use tracing::info;

use crate::chain::Chain;
use crate::config::{DemoConfig, DemoKind};
use crate::flock::Flock;
use crate::params::Bounds;
use crate::render::{self, ChainStyle, FlockStyle, Painter};
use crate::vector::Vector2;

/// Host input sampled once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Pointer position in simulation coordinates, if the pointer is over the area.
    pub pointer: Option<Vector2>,
    pub pointer_down: bool,
}

pub trait Simulation {
    /// Advance by one fixed step.
    fn tick(&mut self, input: &FrameInput);

    /// Draw the current state. Never mutates the simulation.
    fn render(&self, painter: &mut dyn Painter, input: &FrameInput);

    fn bounds(&self) -> Bounds;

    fn name(&self) -> &'static str;
}

pub struct FlockSimulation {
    pub flock: Flock,
    pub style: FlockStyle,
}

impl FlockSimulation {
    pub fn new(flock: Flock, style: FlockStyle) -> Self {
        Self { flock, style }
    }
}

impl Simulation for FlockSimulation {
    fn tick(&mut self, input: &FrameInput) {
        self.flock.tick(input.pointer);
    }

    fn render(&self, painter: &mut dyn Painter, input: &FrameInput) {
        render::draw_flock(painter, &self.flock, &self.style, input.pointer);
    }

    fn bounds(&self) -> Bounds {
        self.flock.bounds()
    }

    fn name(&self) -> &'static str {
        "flock"
    }
}

pub struct ChainSimulation {
    pub chain: Chain,
    pub style: ChainStyle,
    pub bounds: Bounds,
}

impl ChainSimulation {
    pub fn new(chain: Chain, style: ChainStyle, bounds: Bounds) -> Self {
        Self { chain, style, bounds }
    }
}

impl Simulation for ChainSimulation {
    fn tick(&mut self, input: &FrameInput) {
        // The chain rests where it is while the pointer is away
        if let Some(target) = input.pointer {
            self.chain.move_to(target);
        }
    }

    fn render(&self, painter: &mut dyn Painter, input: &FrameInput) {
        render::draw_chain(painter, &self.chain, &self.style, input.pointer_down);
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn name(&self) -> &'static str {
        "chain"
    }
}

/// The demos the app can show, kept concrete so the UI can edit them.
pub enum Demo {
    Flock(FlockSimulation),
    Chain(ChainSimulation),
}

impl Demo {
    pub fn from_config<R: Rng + ?Sized>(config: &DemoConfig, rng: &mut R) -> Self {
        let bounds = config.bounds();
        let demo = match config.demo {
            DemoKind::Flock => {
                let flock = Flock::random(config.agents, config.predators, config.flock.clone(), bounds, rng);
                let style = FlockStyle {
                    shape: config.shape,
                    ..FlockStyle::default()
                };
                Demo::Flock(FlockSimulation::new(flock, style))
            }
            DemoKind::Chain | DemoKind::Fish => {
                let chain = Chain::from_params(bounds.center(), &config.chain);
                let style = match config.demo {
                    DemoKind::Fish => ChainStyle {
                        body_widths: render::FISH_BODY_WIDTHS.iter().map(|w| w * config.fish_scale).collect(),
                        ..ChainStyle::default()
                    },
                    _ => ChainStyle::default(),
                };
                Demo::Chain(ChainSimulation::new(chain, style, bounds))
            }
        };
        info!(demo = demo.name(), width = bounds.width, height = bounds.height, "Built demo");
        demo
    }

    fn inner(&self) -> &dyn Simulation {
        match self {
            Demo::Flock(sim) => sim,
            Demo::Chain(sim) => sim,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Simulation {
        match self {
            Demo::Flock(sim) => sim,
            Demo::Chain(sim) => sim,
        }
    }

    /// Follow a resized viewport.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        match self {
            Demo::Flock(sim) => sim.flock.set_bounds(bounds),
            Demo::Chain(sim) => sim.bounds = bounds,
        }
    }
}

impl Simulation for Demo {
    fn tick(&mut self, input: &FrameInput) {
        self.inner_mut().tick(input);
    }

    fn render(&self, painter: &mut dyn Painter, input: &FrameInput) {
        self.inner().render(painter, input);
    }

    fn bounds(&self) -> Bounds {
        self.inner().bounds()
    }

    fn name(&self) -> &'static str {
        self.inner().name()
    }
}

/// Drives a simulation once per host frame.
pub struct FrameLoop<S> {
    simulation: S,
    paused: bool,
    running: bool,
    frames: u64,
    ticks: u64,
}

impl<S: Simulation> FrameLoop<S> {
    pub fn new(simulation: S) -> Self {
        Self {
            simulation,
            paused: false,
            running: true,
            frames: 0,
            ticks: 0,
        }
    }

    pub fn simulation(&self) -> &S {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut S {
        &mut self.simulation
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop scheduling further frames. Frames requested afterwards do nothing.
    pub fn stop(&mut self) {
        if self.running {
            info!(frames = self.frames, ticks = self.ticks, "Frame loop stopped");
        }
        self.running = false;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance the simulation unless paused or stopped.
    pub fn update(&mut self, input: &FrameInput) -> bool {
        if !self.running || self.paused {
            return false;
        }
        self.simulation.tick(input);
        self.ticks += 1;
        true
    }

    /// Clear and redraw. Rendering continues while paused.
    pub fn render(&self, painter: &mut dyn Painter, input: &FrameInput) {
        if !self.running {
            return;
        }
        let bounds = self.simulation.bounds();
        painter.clear(bounds.width, bounds.height);
        self.simulation.render(painter, input);
    }

    /// One complete frame: tick, then render.
    pub fn frame(&mut self, input: &FrameInput, painter: &mut dyn Painter) -> bool {
        let ticked = self.update(input);
        if self.running {
            self.render(painter, input);
            self.frames += 1;
        }
        ticked
    }
}
