/*
 * Render Module
 *
 * The simulations never draw directly. They are drawn through the
 * `Painter` capability, which the host supplies: the nannou renderer in the
 * desktop app, or the `Recorder` for headless runs and tests.
 *
 * Coordinates passed to a painter are simulation coordinates (origin at the
 * top-left, y down); converting to screen space is the painter's job.
 */

use serde::{Deserialize, Serialize};

use crate::boid::Agent;
use crate::chain::Chain;
use crate::flock::Flock;
use crate::vector::{Vector2, VectorExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(220, 40, 40);
    pub const GRAY: Color = Color::rgb(150, 150, 150);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Drawing capability supplied by the host environment.
pub trait Painter {
    /// Wipe the viewport.
    fn clear(&mut self, width: f32, height: f32);

    fn fill_circle(&mut self, center: Vector2, radius: f32, color: Color);

    /// Circle outline, used for range overlays.
    fn stroke_circle(&mut self, center: Vector2, radius: f32, color: Color, width: f32);

    fn line(&mut self, start: Vector2, end: Vector2, color: Color, width: f32);

    fn triangle(&mut self, points: [Vector2; 3], color: Color);

    /// Closed outline through `points`. Painters with a native polygon
    /// primitive can override this.
    fn outline(&mut self, points: &[Vector2], color: Color, width: f32) {
        if points.len() < 2 {
            return;
        }
        for pair in points.windows(2) {
            self.line(pair[0], pair[1], color, width);
        }
        self.line(points[points.len() - 1], points[0], color, width);
    }
}

/// How agents are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    #[default]
    Circle,
    /// A triangle pointing along the velocity.
    Triangle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlockStyle {
    pub shape: Shape,
    pub size: f32,
    pub agent_color: Color,
    pub predator_color: Color,
    pub pointer_color: Color,
}

impl Default for FlockStyle {
    fn default() -> Self {
        Self {
            shape: Shape::Circle,
            size: 3.0,
            agent_color: Color::BLACK,
            predator_color: Color::RED,
            pointer_color: Color::rgba(220, 40, 40, 90),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChainStyle {
    pub joint_radius: f32,
    pub line_width: f32,
    pub color: Color,
    pub range_color: Color,
    /// Body half-widths per joint; an outline is drawn when non-empty.
    pub body_widths: Vec<f32>,
}

impl Default for ChainStyle {
    fn default() -> Self {
        Self {
            joint_radius: 10.0,
            line_width: 1.0,
            color: Color::BLACK,
            range_color: Color::GRAY,
            body_widths: Vec::new(),
        }
    }
}

/// Half-widths of the fish body from the procedural demo.
pub const FISH_BODY_WIDTHS: [f32; 10] = [68.0, 81.0, 84.0, 83.0, 77.0, 64.0, 51.0, 38.0, 32.0, 19.0];

pub fn draw_agent<P: Painter + ?Sized>(painter: &mut P, agent: &Agent, shape: Shape, size: f32, color: Color) {
    match shape {
        Shape::Circle => painter.fill_circle(agent.position, size, color),
        Shape::Triangle => painter.triangle(agent_triangle(agent, size), color),
    }
}

/// Triangle with its tip along the heading, twice as long as it is wide.
pub fn agent_triangle(agent: &Agent, size: f32) -> [Vector2; 3] {
    let forward = Vector2::from_heading(agent.heading());
    let side = forward.perp() * (size / 2.0);
    let back = agent.position - forward * size;
    [agent.position + forward * size, back + side, back - side]
}

pub fn draw_flock<P: Painter + ?Sized>(painter: &mut P, flock: &Flock, style: &FlockStyle, pointer: Option<Vector2>) {
    for agent in flock.agents() {
        draw_agent(painter, agent, style.shape, style.size, style.agent_color);
    }
    for predator in flock.predators() {
        draw_agent(painter, predator, style.shape, style.size * 2.0, style.predator_color);
    }
    if let Some(pointer) = pointer.filter(|_| flock.params().avoid_pointer) {
        painter.stroke_circle(pointer, flock.params().predator_range, style.pointer_color, 1.0);
    }
}

pub fn draw_chain<P: Painter + ?Sized>(painter: &mut P, chain: &Chain, style: &ChainStyle, show_ranges: bool) {
    if !style.body_widths.is_empty() {
        let outline = chain.body_outline(&style.body_widths);
        painter.outline(&outline, style.color, style.line_width * 2.0);
    }

    let joints = chain.joints();
    for (i, joint) in joints.iter().enumerate() {
        if show_ranges {
            painter.stroke_circle(joint.position, chain.link_length(), style.range_color, style.line_width);
        }
        painter.fill_circle(joint.position, style.joint_radius, style.color);
        if i > 0 {
            painter.line(joints[i - 1].position, joint.position, style.color, style.line_width);
        }
    }
}

/// One recorded painter call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { width: f32, height: f32 },
    FillCircle { center: Vector2, radius: f32, color: Color },
    StrokeCircle { center: Vector2, radius: f32, color: Color, width: f32 },
    Line { start: Vector2, end: Vector2, color: Color, width: f32 },
    Triangle { points: [Vector2; 3], color: Color },
}

/// Painter that remembers what it was asked to draw.
#[derive(Debug, Default)]
pub struct Recorder {
    pub commands: Vec<DrawCommand>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands issued since the last clear.
    pub fn frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear { .. }))
            .map_or(0, |i| i + 1);
        &self.commands[start..]
    }
}

impl Painter for Recorder {
    fn clear(&mut self, width: f32, height: f32) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn fill_circle(&mut self, center: Vector2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle { center, radius, color });
    }

    fn stroke_circle(&mut self, center: Vector2, radius: f32, color: Color, width: f32) {
        self.commands.push(DrawCommand::StrokeCircle { center, radius, color, width });
    }

    fn line(&mut self, start: Vector2, end: Vector2, color: Color, width: f32) {
        self.commands.push(DrawCommand::Line { start, end, color, width });
    }

    fn triangle(&mut self, points: [Vector2; 3], color: Color) {
        self.commands.push(DrawCommand::Triangle { points, color });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boid::AgentId;
    use crate::params::{Bounds, FlockParams};

    fn two_agent_flock() -> Flock {
        let agents = vec![
            Agent::new(AgentId(0), Vector2::new(10.0, 10.0), Vector2::new(1.0, 0.0)),
            Agent::new(AgentId(1), Vector2::new(50.0, 50.0), Vector2::new(0.0, 1.0)),
        ];
        Flock::new(agents, FlockParams::default(), Bounds::default()).unwrap()
    }

    #[test]
    fn circles_are_drawn_at_agent_positions() {
        let mut rec = Recorder::new();
        draw_flock(&mut rec, &two_agent_flock(), &FlockStyle::default(), None);
        assert_eq!(rec.commands.len(), 2);
        assert!(matches!(
            rec.commands[1],
            DrawCommand::FillCircle { center, .. } if center == Vector2::new(50.0, 50.0)
        ));
    }

    #[test]
    fn pointer_overlay_uses_predator_range() {
        let mut rec = Recorder::new();
        let flock = two_agent_flock();
        draw_flock(&mut rec, &flock, &FlockStyle::default(), Some(Vector2::new(1.0, 2.0)));
        let overlay = rec.commands.last().unwrap();
        assert!(matches!(
            overlay,
            DrawCommand::StrokeCircle { radius, .. } if *radius == flock.params().predator_range
        ));
    }

    #[test]
    fn triangle_points_along_velocity() {
        let agent = Agent::new(AgentId(0), Vector2::new(0.0, 0.0), Vector2::new(0.0, 2.0));
        let [tip, left, right] = agent_triangle(&agent, 6.0);
        assert!((tip - Vector2::new(0.0, 6.0)).length() < 1e-4);
        assert!((left.y + 6.0).abs() < 1e-4);
        assert!((left.x + right.x).abs() < 1e-4);
        assert!((left.x - right.x).abs() - 6.0 < 1e-4);
    }

    #[test]
    fn chain_draws_joints_links_and_optional_ranges() {
        let chain = Chain::new(Vector2::ZERO, 3, 20.0);

        let mut plain = Recorder::new();
        draw_chain(&mut plain, &chain, &ChainStyle::default(), false);
        let circles = plain.commands.iter().filter(|c| matches!(c, DrawCommand::FillCircle { .. })).count();
        let lines = plain.commands.iter().filter(|c| matches!(c, DrawCommand::Line { .. })).count();
        assert_eq!((circles, lines), (3, 2));

        let mut ranged = Recorder::new();
        draw_chain(&mut ranged, &chain, &ChainStyle::default(), true);
        let ranges = ranged.commands.iter().filter(|c| matches!(c, DrawCommand::StrokeCircle { .. })).count();
        assert_eq!(ranges, 3);
    }

    #[test]
    fn default_outline_closes_the_polygon() {
        let mut rec = Recorder::new();
        let square = [
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(0.0, 1.0),
        ];
        rec.outline(&square, Color::BLACK, 1.0);
        assert_eq!(rec.commands.len(), 4);
        assert!(matches!(
            rec.commands[3],
            DrawCommand::Line { start, end, .. } if start == square[3] && end == square[0]
        ));
    }

    #[test]
    fn frame_returns_commands_after_last_clear() {
        let mut rec = Recorder::new();
        rec.fill_circle(Vector2::ZERO, 1.0, Color::BLACK);
        rec.clear(10.0, 10.0);
        rec.line(Vector2::ZERO, Vector2::X, Color::BLACK, 1.0);
        assert_eq!(rec.frame().len(), 1);
    }
}
