/*
 * Input Module
 *
 * Window event handlers. They only record what the pointer is doing into
 * the model's `FrameInput`; the simulations read it on the next frame.
 * Clicks that land on the egui panel are left to the panel.
 */

use nannou::prelude::*;
use nannou::winit::event::{MouseButton, WindowEvent};

use crate::app::Model;
use crate::params::Bounds;
use crate::Vector2;

// Window coordinates to simulation coordinates (top-left origin, y down)
fn to_simulation(rect: Rect, pos: Point2) -> Vector2 {
    Vector2::new(pos.x - rect.left(), rect.top() - pos.y)
}

pub fn mouse_moved(app: &App, model: &mut Model, pos: Point2) {
    model.input.pointer = Some(to_simulation(app.window_rect(), pos));
}

pub fn mouse_pressed(_app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left && !model.egui.ctx().is_pointer_over_area() {
        model.input.pointer_down = true;
    }
}

pub fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left {
        model.input.pointer_down = false;
    }
}

// The pointer stops being a threat once it leaves the window
pub fn mouse_exited(_app: &App, model: &mut Model) {
    model.input.pointer = None;
    model.input.pointer_down = false;
}

pub fn resized(_app: &App, model: &mut Model, size: Vec2) {
    let bounds = Bounds::new(size.x, size.y);
    model.frame_loop.simulation_mut().set_bounds(bounds);
    tracing::debug!(width = size.x, height = size.y, "Viewport resized");
}

// Handle raw window events for the UI
pub fn raw_window_event(_app: &App, model: &mut Model, event: &WindowEvent) {
    model.egui.handle_raw_event(event);
}
