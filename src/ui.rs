/*
 * UI Module
 *
 * The egui control panel. Flock tunables are edited in place on the running
 * flock and take effect on the next tick. Changes that need fresh agents or
 * a fresh chain are returned as `UiActions` for the app to carry out.
 */

use nannou_egui::{egui, Egui};

use crate::debug::DebugInfo;
use crate::params::{self, BoundaryMode, ChainParams, FlockParams};
use crate::render::Shape;
use crate::simulation::{ChainSimulation, Demo, FlockSimulation, FrameLoop};

// Bend limit offered when the limit is first switched on
const DEFAULT_MAX_BEND: f32 = std::f32::consts::FRAC_PI_8;

/// Work the panel asks the app to do after this frame.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UiActions {
    pub reset_flock: bool,
    pub resize_flock: Option<usize>,
    pub rebuild_chain: bool,
}

pub fn update_ui(
    egui: &mut Egui,
    frame_loop: &mut FrameLoop<Demo>,
    agent_count: &mut usize,
    chain_params: &mut ChainParams,
    debug_info: &DebugInfo,
) -> UiActions {
    let mut actions = UiActions::default();
    let ctx = egui.begin_frame();

    egui::Window::new("Simulation Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            match frame_loop.simulation_mut() {
                Demo::Flock(sim) => flock_controls(ui, sim, agent_count, &mut actions),
                Demo::Chain(sim) => chain_controls(ui, sim, chain_params, &mut actions),
            }

            ui.separator();
            let mut paused = frame_loop.is_paused();
            ui.checkbox(&mut paused, "Pause");
            frame_loop.set_paused(paused);

            ui.collapsing("Debug Info", |ui| {
                ui.label(format!("FPS: {:.1}", debug_info.fps));
                ui.label(format!("Frame Time: {:.2} ms", debug_info.frame_time.as_secs_f64() * 1000.0));
                ui.label(format!("Ticks: {}", debug_info.ticks));
                if let Some(stats) = &debug_info.flock {
                    ui.label(format!("Agents: {} (+{} predators)", stats.agents, stats.predators));
                    ui.label(format!(
                        "Speed: {:.2} mean, {:.2}..{:.2}",
                        stats.mean_speed, stats.min_speed, stats.max_speed
                    ));
                }
            });
        });

    actions
}

fn flock_controls(ui: &mut egui::Ui, sim: &mut FlockSimulation, agent_count: &mut usize, actions: &mut UiActions) {
    ui.collapsing("Flock", |ui| {
        ui.add(egui::Slider::new(agent_count, params::agent_count_slider()).text("Agents"));
        if *agent_count != sim.flock.len() {
            actions.resize_flock = Some(*agent_count);
        }
        if ui.button("Reset Flock").clicked() {
            actions.reset_flock = true;
        }
        ui.radio_value(&mut sim.style.shape, Shape::Circle, "Circles");
        ui.radio_value(&mut sim.style.shape, Shape::Triangle, "Triangles");
    });

    let p = sim.flock.params_mut();

    ui.collapsing("Flocking Rules", |ui| {
        ui.add(egui::Slider::new(&mut p.separation_range, FlockParams::range_slider()).text("Separation Range"));
        ui.add(
            egui::Slider::new(&mut p.separation_factor, FlockParams::factor_slider())
                .logarithmic(true)
                .text("Separation Factor"),
        );
        ui.add(egui::Slider::new(&mut p.alignment_range, FlockParams::range_slider()).text("Alignment Range"));
        ui.add(
            egui::Slider::new(&mut p.alignment_factor, FlockParams::factor_slider())
                .logarithmic(true)
                .text("Alignment Factor"),
        );
        ui.add(egui::Slider::new(&mut p.cohesion_range, FlockParams::range_slider()).text("Cohesion Range"));
        ui.add(
            egui::Slider::new(&mut p.cohesion_factor, FlockParams::factor_slider())
                .logarithmic(true)
                .text("Cohesion Factor"),
        );
    });

    ui.collapsing("Predators", |ui| {
        ui.checkbox(&mut p.avoid_pointer, "Avoid Pointer");
        ui.add(egui::Slider::new(&mut p.predator_range, FlockParams::range_slider()).text("Predator Range"));
        ui.add(
            egui::Slider::new(&mut p.predator_factor, FlockParams::factor_slider())
                .logarithmic(true)
                .text("Predator Factor"),
        );
    });

    ui.collapsing("Movement", |ui| {
        ui.add(egui::Slider::new(&mut p.min_speed, FlockParams::speed_slider()).text("Min Speed"));
        ui.add(egui::Slider::new(&mut p.max_speed, FlockParams::speed_slider()).text("Max Speed"));
        ui.add(egui::Slider::new(&mut p.padding_range, FlockParams::range_slider()).text("Edge Padding"));
        ui.add(egui::Slider::new(&mut p.turn_factor, FlockParams::turn_slider()).text("Turn Factor"));
        ui.radio_value(&mut p.boundary, BoundaryMode::Bounce, "Bounce off edges");
        ui.radio_value(&mut p.boundary, BoundaryMode::Wrap, "Wrap around edges");
    });

    ui.collapsing("Performance Tuning", |ui| {
        ui.checkbox(&mut p.parallel, "Enable Parallel Processing");
        ui.checkbox(&mut p.spatial_grid, "Enable Spatial Grid");
    });
}

fn chain_controls(ui: &mut egui::Ui, sim: &ChainSimulation, chain_params: &mut ChainParams, actions: &mut UiActions) {
    let before = chain_params.clone();

    ui.collapsing("Chain", |ui| {
        ui.add(egui::Slider::new(&mut chain_params.joint_count, ChainParams::joint_count_slider()).text("Joints"));
        ui.add(egui::Slider::new(&mut chain_params.link_length, ChainParams::link_length_slider()).text("Link Length"));

        let mut limited = chain_params.max_bend.is_some();
        ui.checkbox(&mut limited, "Limit Bend");
        chain_params.max_bend = if limited {
            let mut bend = chain_params.max_bend.unwrap_or(DEFAULT_MAX_BEND);
            ui.add(egui::Slider::new(&mut bend, ChainParams::max_bend_slider()).text("Max Bend (rad)"));
            Some(bend)
        } else {
            None
        };

        if let Some(head) = sim.chain.head() {
            ui.label(format!("Head: ({:.0}, {:.0})", head.position.x, head.position.y));
        }
        ui.label("Hold the mouse button to show link ranges");
    });

    if *chain_params != before {
        actions.rebuild_chain = true;
    }
}
