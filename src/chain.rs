/*
 * Chain Module
 *
 * A joint chain that trails a moving target, like the spine of a snake or
 * a fish. The head jumps to the target; every following joint is pulled
 * toward its predecessor just enough to restore the link length. One
 * relaxation pass per move, no iteration to convergence.
 *
 * Each joint also records the direction to its predecessor so renderers
 * can build a body outline around the spine.
 */

use std::f32::consts::{FRAC_PI_2, PI};

use crate::params::ChainParams;
use crate::vector::{wrap_angle, Vector2, VectorExt};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joint {
    pub position: Vector2,
    /// Displacement applied by the most recent move.
    pub velocity: Vector2,
    /// Facing direction in radians, toward the previous joint.
    pub angle: f32,
}

impl Joint {
    pub fn new(position: Vector2) -> Self {
        Self {
            position,
            velocity: Vector2::ZERO,
            angle: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Chain {
    joints: Vec<Joint>,
    link_length: f32,
    max_bend: Option<f32>,
}

impl Chain {
    /// `joint_count` joints hanging from `origin`, `link_length` apart along +y.
    pub fn new(origin: Vector2, joint_count: usize, link_length: f32) -> Self {
        let joints = (0..joint_count)
            .map(|i| {
                let mut joint = Joint::new(origin + Vector2::new(0.0, link_length * i as f32));
                // Facing up, toward the joint above
                joint.angle = -FRAC_PI_2;
                joint
            })
            .collect();

        Self {
            joints,
            link_length,
            max_bend: None,
        }
    }

    pub fn from_params(origin: Vector2, params: &ChainParams) -> Self {
        let chain = Self::new(origin, params.joint_count, params.link_length);
        match params.max_bend {
            Some(max_bend) => chain.with_max_bend(max_bend),
            None => chain,
        }
    }

    pub fn from_joints(joints: Vec<Joint>, link_length: f32) -> Self {
        Self {
            joints,
            link_length,
            max_bend: None,
        }
    }

    /// Limit how sharply neighbouring links may bend, in radians.
    pub fn with_max_bend(mut self, max_bend: f32) -> Self {
        self.max_bend = Some(max_bend.abs());
        self
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn head(&self) -> Option<&Joint> {
        self.joints.first()
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn link_length(&self) -> f32 {
        self.link_length
    }

    /// Move the head to `target` and drag the rest of the chain after it.
    pub fn move_to(&mut self, target: Vector2) {
        let Some(head) = self.joints.first_mut() else {
            return;
        };

        let travel = target - head.position;
        if travel != Vector2::ZERO {
            head.angle = travel.heading();
        }
        head.position = target;
        head.velocity = travel;

        for i in 1..self.joints.len() {
            let prev = self.joints[i - 1];
            let joint = &mut self.joints[i];
            let start = joint.position;
            follow(joint, &prev, self.link_length, self.max_bend);
            joint.velocity = joint.position - start;
        }
    }

    /// Outline polygon around the spine: right side from head to tail, the
    /// tail tip, then the left side back to the head. `widths[i]` is the
    /// half-width at joint `i`; joints without a width are skipped.
    pub fn body_outline(&self, widths: &[f32]) -> Vec<Vector2> {
        let n = self.joints.len().min(widths.len());
        if n == 0 {
            return Vec::new();
        }

        let side = |i: usize, offset: f32| {
            let joint = &self.joints[i];
            joint.position + Vector2::from_heading(joint.angle + offset) * widths[i]
        };

        let mut points = Vec::with_capacity(2 * n + 1);
        points.extend((0..n).map(|i| side(i, FRAC_PI_2)));
        points.push(side(n - 1, PI));
        points.extend((0..n).rev().map(|i| side(i, -FRAC_PI_2)));
        points
    }
}

// Pull `joint` back within one link of `prev` and face it toward `prev`
fn follow(joint: &mut Joint, prev: &Joint, link_length: f32, max_bend: Option<f32>) {
    let to_prev = prev.position - joint.position;
    let distance = to_prev.length();
    if distance > link_length {
        // Coincident joints have no direction to move along
        if let Some(direction) = to_prev.try_normalize() {
            joint.position += direction * (distance - link_length);
        }
    }

    let to_prev = prev.position - joint.position;
    if to_prev == Vector2::ZERO {
        return;
    }
    joint.angle = to_prev.heading();

    if let Some(max_bend) = max_bend {
        let bend = wrap_angle(joint.angle - prev.angle);
        if bend.abs() > max_bend {
            joint.angle = prev.angle + bend.clamp(-max_bend, max_bend);
            // Re-seat the joint on the limited bearing at the same distance
            joint.position = prev.position - Vector2::from_heading(joint.angle) * to_prev.length();
        }
    }
}
