/*
 * Renderer Module
 *
 * Painter backed by a nannou `Draw`. Nannou puts the origin at the window
 * centre with y pointing up, while the simulations use a top-left origin
 * with y pointing down, so every point is flipped through the window rect.
 */

use nannou::prelude::*;

use crate::app::Model;
use crate::render::{Color, Painter};
use crate::Vector2;

pub struct NannouPainter<'a> {
    draw: &'a Draw,
    window_rect: Rect,
}

impl<'a> NannouPainter<'a> {
    pub fn new(draw: &'a Draw, window_rect: Rect) -> Self {
        Self { draw, window_rect }
    }

    fn to_screen(&self, point: Vector2) -> Point2 {
        pt2(self.window_rect.left() + point.x, self.window_rect.top() - point.y)
    }
}

fn to_rgba(color: Color) -> Rgba {
    rgba(
        color.r as f32 / 255.0,
        color.g as f32 / 255.0,
        color.b as f32 / 255.0,
        color.a as f32 / 255.0,
    )
}

impl Painter for NannouPainter<'_> {
    fn clear(&mut self, _width: f32, _height: f32) {
        self.draw.background().color(WHITE);
    }

    fn fill_circle(&mut self, center: Vector2, radius: f32, color: Color) {
        self.draw
            .ellipse()
            .xy(self.to_screen(center))
            .radius(radius)
            .color(to_rgba(color));
    }

    fn stroke_circle(&mut self, center: Vector2, radius: f32, color: Color, width: f32) {
        self.draw
            .ellipse()
            .xy(self.to_screen(center))
            .radius(radius)
            .no_fill()
            .stroke(to_rgba(color))
            .stroke_weight(width);
    }

    fn line(&mut self, start: Vector2, end: Vector2, color: Color, width: f32) {
        self.draw
            .line()
            .start(self.to_screen(start))
            .end(self.to_screen(end))
            .weight(width)
            .color(to_rgba(color));
    }

    fn triangle(&mut self, points: [Vector2; 3], color: Color) {
        let points = points.map(|p| self.to_screen(p));
        self.draw.polygon().color(to_rgba(color)).points(points);
    }
}

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let mut painter = NannouPainter::new(&draw, app.window_rect());
    model.frame_loop.render(&mut painter, &model.input);

    if let Err(err) = draw.to_frame(app, &frame) {
        tracing::error!(?err, "Failed to draw frame");
    }
    if let Err(err) = model.egui.draw_to_frame(&frame) {
        tracing::error!(?err, "Failed to draw UI");
    }
}
