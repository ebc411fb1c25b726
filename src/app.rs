/*
 * Application Module
 *
 * The nannou front-end. The model owns a `FrameLoop` over the configured
 * demo plus the egui panel, and each nannou update is exactly one frame:
 * panel first, then one simulation tick. Drawing happens in `view`, which
 * never touches simulation state.
 */

use std::sync::OnceLock;

use nannou::prelude::*;
use nannou_egui::Egui;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::chain::Chain;
use crate::config::DemoConfig;
use crate::debug::DebugInfo;
use crate::input;
use crate::renderer;
use crate::simulation::{Demo, FrameInput, FrameLoop, Simulation};
use crate::ui;

// nannou builds the model from a plain fn pointer, so the start-up config is
// handed over through here
static CONFIG: OnceLock<DemoConfig> = OnceLock::new();

// Main model for the application
pub struct Model {
    pub frame_loop: FrameLoop<Demo>,
    pub config: DemoConfig,
    pub egui: Egui,
    pub debug_info: DebugInfo,
    pub input: FrameInput,
    pub rng: StdRng,
    pub agent_count: usize,
}

/// Open the window and run until it is closed.
pub fn run(config: DemoConfig) {
    if CONFIG.set(config).is_err() {
        tracing::warn!("App already configured; keeping the first config");
    }
    nannou::app(model).update(update).run();
}

// Initialize the model
pub fn model(app: &App) -> Model {
    let config = CONFIG.get().cloned().unwrap_or_default();

    let window_id = app
        .new_window()
        .title("Flocking")
        .size(config.width.max(1.0) as u32, config.height.max(1.0) as u32)
        .view(renderer::view)
        .mouse_moved(input::mouse_moved)
        .mouse_pressed(input::mouse_pressed)
        .mouse_released(input::mouse_released)
        .mouse_exited(input::mouse_exited)
        .resized(input::resized)
        .raw_event(input::raw_window_event)
        .build()
        .expect("failed to open the main window");

    let window = app.window(window_id).expect("window was just created");
    let egui = Egui::from_window(&window);

    let mut rng = config.rng();
    let demo = Demo::from_config(&config, &mut rng);
    info!(demo = demo.name(), seed = ?config.seed, "Starting app");

    Model {
        frame_loop: FrameLoop::new(demo),
        agent_count: config.agents,
        config,
        egui,
        debug_info: DebugInfo::default(),
        input: FrameInput::default(),
        rng,
    }
}

// Update the model
pub fn update(_app: &App, model: &mut Model, update: Update) {
    model.debug_info.record_frame(update.since_last);

    let actions = ui::update_ui(
        &mut model.egui,
        &mut model.frame_loop,
        &mut model.agent_count,
        &mut model.config.chain,
        &model.debug_info,
    );
    apply_actions(model, &actions);

    model.frame_loop.update(&model.input);
    model.debug_info.ticks = model.frame_loop.ticks();

    if let Demo::Flock(sim) = model.frame_loop.simulation() {
        let stats = sim.flock.stats();
        if model.debug_info.frames % 600 == 0 {
            debug!(fps = model.debug_info.fps, mean_speed = stats.mean_speed, "Frame stats");
        }
        model.debug_info.flock = Some(stats);
    }
}

fn apply_actions(model: &mut Model, actions: &ui::UiActions) {
    match model.frame_loop.simulation_mut() {
        Demo::Flock(sim) => {
            if let Some(count) = actions.resize_flock {
                sim.flock.resize(count, &mut model.rng);
            }
            if actions.reset_flock {
                sim.flock.reset(&mut model.rng);
            }
        }
        Demo::Chain(sim) => {
            if actions.rebuild_chain {
                // Keep the head where it is so the chain does not jump
                let origin = sim.chain.head().map_or(sim.bounds.center(), |j| j.position);
                sim.chain = Chain::from_params(origin, &model.config.chain);
            }
        }
    }
}
