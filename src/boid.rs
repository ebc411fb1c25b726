/*
 * Boid Module
 *
 * This module defines the Agent struct and its steering rules.
 * Each agent reacts to the others within a range:
 * 1. Separation: push away from agents that are too close
 * 2. Alignment: match the average velocity of neighbors
 * 3. Cohesion: move toward the average position of neighbors
 * plus avoidance of predators and the pointer.
 *
 * Rules take the whole agent slice and a list of candidate indices. The
 * agent's own index is always skipped, so two distinct agents that happen
 * to share a coordinate still see each other.
 */

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::params::{Bounds, BoundaryMode, FlockParams};
use crate::vector::{Vector2, VectorExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub id: AgentId,
    pub position: Vector2,
    pub velocity: Vector2,
}

/// Per-rule velocity contributions for one agent during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Steering {
    pub separation: Vector2,
    pub alignment: Vector2,
    pub cohesion: Vector2,
    pub avoidance: Vector2,
}

impl Steering {
    pub fn total(&self) -> Vector2 {
        self.separation + self.alignment + self.cohesion + self.avoidance
    }
}

impl Agent {
    pub fn new(id: AgentId, position: Vector2, velocity: Vector2) -> Self {
        Self { id, position, velocity }
    }

    /// Random position inside `bounds`, random heading, speed within the limits.
    pub fn random<R: Rng + ?Sized>(
        id: AgentId,
        bounds: Bounds,
        min_speed: f32,
        max_speed: f32,
        rng: &mut R,
    ) -> Self {
        let position = Vector2::new(
            rng.gen::<f32>() * bounds.width,
            rng.gen::<f32>() * bounds.height,
        );

        // Tolerate inverted limits instead of panicking in gen_range
        let (lo, hi) = if min_speed <= max_speed {
            (min_speed, max_speed)
        } else {
            (max_speed, min_speed)
        };
        let speed = lo + rng.gen::<f32>() * (hi - lo);
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);

        Self::new(id, position, Vector2::from_heading(angle) * speed)
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Direction of travel in radians.
    #[inline]
    pub fn heading(&self) -> f32 {
        self.velocity.heading()
    }

    // Push away from every other agent inside the separation range
    pub fn separation(&self, index: usize, agents: &[Agent], candidates: &[usize], params: &FlockParams) -> Vector2 {
        let mut push = Vector2::ZERO;

        for &j in candidates {
            if j == index {
                continue;
            }
            let other = &agents[j];
            if self.position.distance(other.position) < params.separation_range {
                push += self.position - other.position;
            }
        }

        push * params.separation_factor
    }

    // Match the average velocity of neighbors
    pub fn alignment(&self, index: usize, agents: &[Agent], candidates: &[usize], params: &FlockParams) -> Vector2 {
        let mut sum = Vector2::ZERO;
        let mut count = 0usize;

        for &j in candidates {
            if j == index {
                continue;
            }
            let other = &agents[j];
            if self.position.distance(other.position) < params.alignment_range {
                sum += other.velocity;
                count += 1;
            }
        }

        match sum.divide_scalar(count as f32) {
            Ok(average) => (average - self.velocity) * params.alignment_factor,
            Err(_) => Vector2::ZERO,
        }
    }

    // Move toward the average position of neighbors
    pub fn cohesion(&self, index: usize, agents: &[Agent], candidates: &[usize], params: &FlockParams) -> Vector2 {
        let mut sum = Vector2::ZERO;
        let mut count = 0usize;

        for &j in candidates {
            if j == index {
                continue;
            }
            let other = &agents[j];
            if self.position.distance(other.position) < params.cohesion_range {
                sum += other.position;
                count += 1;
            }
        }

        match sum.divide_scalar(count as f32) {
            Ok(center) => (center - self.position) * params.cohesion_factor,
            Err(_) => Vector2::ZERO,
        }
    }

    // Flee from threats (predators and the pointer) inside the predator range
    pub fn avoidance(&self, threats: impl IntoIterator<Item = Vector2>, params: &FlockParams) -> Vector2 {
        let mut push = Vector2::ZERO;

        for threat in threats {
            if self.position.distance(threat) < params.predator_range {
                push += self.position - threat;
            }
        }

        push * params.predator_factor
    }

    /// All rule contributions for the agent at `index`.
    pub fn steer(
        &self,
        index: usize,
        agents: &[Agent],
        candidates: &[usize],
        threats: &[Vector2],
        params: &FlockParams,
    ) -> Steering {
        Steering {
            separation: self.separation(index, agents, candidates, params),
            alignment: self.alignment(index, agents, candidates, params),
            cohesion: self.cohesion(index, agents, candidates, params),
            avoidance: self.avoidance(threats.iter().copied(), params),
        }
    }

    // Add the steering to the velocity and move one step
    #[inline]
    pub fn integrate(&mut self, delta_velocity: Vector2) {
        self.velocity += delta_velocity;
        self.position += self.velocity;
    }

    /// Rescale the velocity into `[min_speed, max_speed]`. A zero velocity
    /// has no direction to rescale along and stays zero.
    pub fn clamp_speed(&mut self, min_speed: f32, max_speed: f32) {
        let speed = self.speed();
        if speed == 0.0 {
            return;
        }
        if speed > max_speed {
            self.velocity = self.velocity / speed * max_speed;
        } else if speed < min_speed {
            self.velocity = self.velocity / speed * min_speed;
        }
    }

    /// Apply the boundary policy after the agent has moved.
    pub fn apply_boundary(&mut self, bounds: Bounds, params: &FlockParams) {
        match params.boundary {
            BoundaryMode::Bounce => self.velocity += bounce_nudge(self.position, bounds, params),
            BoundaryMode::Wrap => self.position = wrap_position(self.position, bounds),
        }
    }
}

/// Steering toward the interior for a point within `padding_range` of an edge.
pub fn bounce_nudge(position: Vector2, bounds: Bounds, params: &FlockParams) -> Vector2 {
    let mut turn = Vector2::ZERO;

    if position.x < params.padding_range {
        turn.x += params.turn_factor;
    }
    if position.x > bounds.width - params.padding_range {
        turn.x -= params.turn_factor;
    }
    if position.y < params.padding_range {
        turn.y += params.turn_factor;
    }
    if position.y > bounds.height - params.padding_range {
        turn.y -= params.turn_factor;
    }

    turn
}

/// Toroidal wrap into `[0, width) x [0, height)`.
pub fn wrap_position(position: Vector2, bounds: Bounds) -> Vector2 {
    Vector2::new(wrap_axis(position.x, bounds.width), wrap_axis(position.y, bounds.height))
}

fn wrap_axis(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return value;
    }
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn agent(id: u32, x: f32, y: f32) -> Agent {
        Agent::new(AgentId(id), Vector2::new(x, y), Vector2::ZERO)
    }

    fn only_separation(range: f32, factor: f32) -> FlockParams {
        FlockParams {
            separation_range: range,
            separation_factor: factor,
            alignment_range: 0.0,
            cohesion_range: 0.0,
            ..FlockParams::default()
        }
    }

    #[test]
    fn separation_points_away_from_close_neighbor() {
        let agents = vec![agent(0, 0.0, 0.0), agent(1, 5.0, 0.0)];
        let params = only_separation(10.0, 0.1);
        let all = [0, 1];

        let left = agents[0].separation(0, &agents, &all, &params);
        let right = agents[1].separation(1, &agents, &all, &params);

        assert!((left - Vector2::new(-0.5, 0.0)).length() < 1e-6);
        assert!((right - Vector2::new(0.5, 0.0)).length() < 1e-6);
    }

    #[test]
    fn separation_ignores_neighbor_exactly_at_range() {
        let agents = vec![agent(0, 0.0, 0.0), agent(1, 10.0, 0.0)];
        let params = only_separation(10.0, 0.1);
        assert_eq!(agents[0].separation(0, &agents, &[0, 1], &params), Vector2::ZERO);
    }

    #[test]
    fn agents_sharing_one_coordinate_still_interact() {
        // Same x, different y: a coordinate-inequality check would skip this pair
        let agents = vec![agent(0, 10.0, 0.0), agent(1, 10.0, 4.0)];
        let params = only_separation(10.0, 1.0);
        let push = agents[0].separation(0, &agents, &[0, 1], &params);
        assert_eq!(push, Vector2::new(0.0, -4.0));
    }

    #[test]
    fn coincident_distinct_agents_are_neighbors_but_self_is_not() {
        let mut agents = vec![agent(0, 3.0, 3.0), agent(1, 3.0, 3.0)];
        agents[1].velocity = Vector2::new(2.0, 0.0);
        let params = FlockParams {
            alignment_range: 5.0,
            alignment_factor: 1.0,
            ..FlockParams::default()
        };
        let align = agents[0].alignment(0, &agents, &[0, 1], &params);
        assert_eq!(align, Vector2::new(2.0, 0.0));
    }

    #[test]
    fn alignment_is_difference_from_own_velocity() {
        let mut agents = vec![agent(0, 0.0, 0.0), agent(1, 1.0, 0.0), agent(2, 0.0, 1.0)];
        agents[0].velocity = Vector2::new(1.0, 1.0);
        agents[1].velocity = Vector2::new(3.0, 0.0);
        agents[2].velocity = Vector2::new(1.0, 2.0);
        let params = FlockParams {
            alignment_range: 5.0,
            alignment_factor: 0.5,
            ..FlockParams::default()
        };
        let align = agents[0].alignment(0, &agents, &[0, 1, 2], &params);
        // average (2, 1) minus own (1, 1), halved
        assert!((align - Vector2::new(0.5, 0.0)).length() < 1e-6);
    }

    #[test]
    fn cohesion_pulls_toward_neighbor_center() {
        let agents = vec![agent(0, 0.0, 0.0), agent(1, 4.0, 0.0), agent(2, 0.0, 4.0)];
        let params = FlockParams {
            cohesion_range: 10.0,
            cohesion_factor: 0.5,
            ..FlockParams::default()
        };
        let pull = agents[0].cohesion(0, &agents, &[0, 1, 2], &params);
        assert!((pull - Vector2::new(1.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn lonely_agent_gets_no_rule_contribution() {
        let agents = vec![agent(0, 50.0, 50.0)];
        let steering = agents[0].steer(0, &agents, &[0], &[], &FlockParams::default());
        assert_eq!(steering, Steering::default());
    }

    #[test]
    fn avoidance_flees_threats_in_range() {
        let a = agent(0, 100.0, 100.0);
        let params = FlockParams {
            predator_range: 50.0,
            predator_factor: 0.1,
            ..FlockParams::default()
        };
        let threats = [Vector2::new(90.0, 100.0), Vector2::new(400.0, 400.0)];
        let push = a.avoidance(threats, &params);
        assert!((push - Vector2::new(1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn clamp_speed_respects_both_limits_and_keeps_zero() {
        let mut fast = Agent::new(AgentId(0), Vector2::ZERO, Vector2::new(30.0, 40.0));
        fast.clamp_speed(1.0, 5.0);
        assert!((fast.speed() - 5.0).abs() < 1e-5);

        let mut slow = Agent::new(AgentId(1), Vector2::ZERO, Vector2::new(0.3, 0.4));
        slow.clamp_speed(2.0, 5.0);
        assert!((slow.speed() - 2.0).abs() < 1e-5);

        let mut still = Agent::new(AgentId(2), Vector2::ZERO, Vector2::ZERO);
        still.clamp_speed(2.0, 5.0);
        assert_eq!(still.velocity, Vector2::ZERO);
    }

    #[test]
    fn bounce_nudges_toward_interior_near_edges() {
        let bounds = Bounds::new(200.0, 100.0);
        let params = FlockParams {
            padding_range: 20.0,
            turn_factor: 0.5,
            ..FlockParams::default()
        };
        assert_eq!(bounce_nudge(Vector2::new(5.0, 95.0), bounds, &params), Vector2::new(0.5, -0.5));
        assert_eq!(bounce_nudge(Vector2::new(100.0, 50.0), bounds, &params), Vector2::ZERO);
    }

    #[test]
    fn wrap_reenters_from_opposite_edge() {
        let bounds = Bounds::new(800.0, 600.0);
        let p = wrap_position(Vector2::new(801.0, -1.0), bounds);
        assert!((p.x - 1.0).abs() < 1e-4);
        assert!((p.y - 599.0).abs() < 1e-4);
        assert_eq!(wrap_position(Vector2::new(800.0, 600.0), bounds), Vector2::ZERO);
    }

    #[test]
    fn random_agent_lies_inside_bounds_with_speed_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let bounds = Bounds::new(320.0, 240.0);
        for i in 0..200 {
            let a = Agent::random(AgentId(i), bounds, 1.0, 3.0, &mut rng);
            assert!(bounds.contains(a.position));
            assert!(a.speed() >= 1.0 - 1e-4 && a.speed() <= 3.0 + 1e-4);
        }
    }
}
