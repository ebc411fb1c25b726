/*
 * Flock Module
 *
 * Owns the agents, the predators and one set of parameters, and advances
 * them one tick at a time. A tick has two phases:
 * 1. Steering: every agent's rule contributions are computed against the
 *    flock as it was at the start of the tick (optionally on the rayon
 *    pool, optionally with spatial grid candidates).
 * 2. Integration: velocities are updated, agents move, the boundary policy
 *    is applied, and speeds are clamped.
 * Reading a snapshot makes the result independent of agent order.
 */

use std::collections::HashSet;

use rand::Rng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::boid::{Agent, AgentId, Steering};
use crate::error::SimError;
use crate::params::{Bounds, FlockParams};
use crate::spatial_grid::SpatialGrid;
use crate::vector::Vector2;

// How often a tick summary is logged at debug level
const LOG_EVERY_TICKS: u64 = 600;

pub struct Flock {
    agents: Vec<Agent>,
    predators: Vec<Agent>,
    params: FlockParams,
    bounds: Bounds,
    grid: Option<SpatialGrid>,
    ticks: u64,
}

/// Aggregate numbers about the flock, for debug panels and headless runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlockStats {
    pub agents: usize,
    pub predators: usize,
    pub ticks: u64,
    pub mean_speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub centroid_x: f32,
    pub centroid_y: f32,
}

impl Flock {
    /// Build a flock from explicit agents. Ids must be unique.
    pub fn new(agents: Vec<Agent>, params: FlockParams, bounds: Bounds) -> Result<Self, SimError> {
        check_unique_ids(&agents)?;

        Ok(Self {
            agents,
            predators: Vec::new(),
            params,
            bounds,
            grid: None,
            ticks: 0,
        })
    }

    /// Add predators. Their ids must differ from each other and from the agents'.
    pub fn with_predators(mut self, predators: Vec<Agent>) -> Result<Self, SimError> {
        check_unique_ids(self.agents.iter().chain(&predators))?;
        self.predators = predators;
        Ok(self)
    }

    /// A flock of `count` agents and `predator_count` predators placed at random.
    pub fn random<R: Rng + ?Sized>(
        count: usize,
        predator_count: usize,
        params: FlockParams,
        bounds: Bounds,
        rng: &mut R,
    ) -> Self {
        let agents = spawn(0, count, &params, bounds, 1.0, rng);
        let predators = spawn(count as u32, predator_count, &params, bounds, params.predator_speed_scale, rng);

        info!(agents = count, predators = predator_count, "Created flock");

        Self {
            agents,
            predators,
            params,
            bounds,
            grid: None,
            ticks: 0,
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn predators(&self) -> &[Agent] {
        &self.predators
    }

    pub fn params(&self) -> &FlockParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut FlockParams {
        &mut self.params
    }

    pub fn set_params(&mut self, params: FlockParams) {
        self.params = params;
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Re-randomize every agent and predator, keeping the counts.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let count = self.agents.len();
        let predator_count = self.predators.len();
        self.agents = spawn(0, count, &self.params, self.bounds, 1.0, rng);
        self.predators = spawn(
            count as u32,
            predator_count,
            &self.params,
            self.bounds,
            self.params.predator_speed_scale,
            rng,
        );
        self.ticks = 0;
        info!(agents = count, predators = predator_count, "Reset flock");
    }

    /// Grow or shrink the flock at the host's request. Survivors keep their
    /// state; new agents get fresh ids and random placement.
    pub fn resize<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) {
        let current = self.agents.len();
        if count <= current {
            self.agents.truncate(count);
        } else {
            let added = count - current;
            let next_id = match self.next_free_id(added) {
                Some(id) => id,
                None => self.renumber(),
            };
            let extra = spawn(next_id, added, &self.params, self.bounds, 1.0, rng);
            self.agents.extend(extra);
        }
        info!(from = current, to = count, "Resized flock");
    }

    // First id of a run of `count` unused ids above every id in the flock
    fn next_free_id(&self, count: usize) -> Option<u32> {
        let next = match self.agents.iter().chain(&self.predators).map(|a| a.id.0).max() {
            Some(max) => max.checked_add(1)?,
            None => 0,
        };
        next.checked_add(u32::try_from(count).ok()?)?;
        Some(next)
    }

    // Number agents then predators from zero. Returns the next unused id.
    fn renumber(&mut self) -> u32 {
        let mut next = 0u32;
        for agent in self.agents.iter_mut().chain(self.predators.iter_mut()) {
            agent.id = AgentId(next);
            next += 1;
        }
        debug!(next_id = next, "Renumbered flock ids");
        next
    }

    /// Positions every agent flees from this tick.
    pub fn threats(&self, pointer: Option<Vector2>) -> Vec<Vector2> {
        let mut threats: Vec<Vector2> = self.predators.iter().map(|p| p.position).collect();
        if self.params.avoid_pointer {
            threats.extend(pointer);
        }
        threats
    }

    /// Rule contributions the agent at `index` would receive right now.
    pub fn steering(&self, index: usize, pointer: Option<Vector2>) -> Option<Steering> {
        let agent = self.agents.get(index)?;
        let all: Vec<usize> = (0..self.agents.len()).collect();
        let threats = self.threats(pointer);
        Some(agent.steer(index, &self.agents, &all, &threats, &self.params))
    }

    // Advance the flock by one fixed step
    pub fn tick(&mut self, pointer: Option<Vector2>) {
        let threats = self.threats(pointer);
        let deltas = self.compute_steering(&threats);

        for (agent, delta) in self.agents.iter_mut().zip(deltas) {
            agent.integrate(delta);
            agent.apply_boundary(self.bounds, &self.params);
            agent.clamp_speed(self.params.min_speed, self.params.max_speed);
        }

        let scale = self.params.predator_speed_scale;
        for predator in &mut self.predators {
            predator.integrate(Vector2::ZERO);
            predator.apply_boundary(self.bounds, &self.params);
            predator.clamp_speed(self.params.min_speed * scale, self.params.max_speed * scale);
        }

        self.ticks += 1;
        if self.ticks % LOG_EVERY_TICKS == 0 {
            let stats = self.stats();
            debug!(
                tick = self.ticks,
                mean_speed = stats.mean_speed,
                centroid_x = stats.centroid_x,
                centroid_y = stats.centroid_y,
                "Flock tick"
            );
        }
    }

    fn compute_steering(&mut self, threats: &[Vector2]) -> Vec<Vector2> {
        let use_grid = self.params.spatial_grid && self.params.max_rule_range() > 0.0;
        if use_grid {
            self.refresh_grid();
        }

        let agents = &self.agents;
        let params = &self.params;
        let grid = if use_grid { self.grid.as_ref() } else { None };
        let all: Vec<usize> = if grid.is_some() {
            Vec::new()
        } else {
            (0..agents.len()).collect()
        };

        let steer_one = |(i, agent): (usize, &Agent)| -> Vector2 {
            let nearby;
            let candidates: &[usize] = match grid {
                Some(grid) => {
                    nearby = grid.nearby(agent.position);
                    &nearby
                }
                None => &all,
            };
            agent.steer(i, agents, candidates, threats, params).total()
        };

        if params.parallel {
            agents.par_iter().enumerate().map(steer_one).collect()
        } else {
            agents.iter().enumerate().map(steer_one).collect()
        }
    }

    // Make sure the grid matches the current ranges and bounds, then fill it
    fn refresh_grid(&mut self) {
        let range = self.params.max_rule_range();
        let fits = self
            .grid
            .as_ref()
            .map_or(false, |grid| grid.fits(range, self.bounds));

        if !fits {
            debug!(cell_size = range, "Rebuilding spatial grid");
            self.grid = Some(SpatialGrid::new(range, self.bounds));
        }

        if let Some(grid) = self.grid.as_mut() {
            grid.rebuild(self.agents.iter().map(|a| a.position));
        }
    }

    pub fn stats(&self) -> FlockStats {
        let count = self.agents.len();
        let mut stats = FlockStats {
            agents: count,
            predators: self.predators.len(),
            ticks: self.ticks,
            mean_speed: 0.0,
            min_speed: 0.0,
            max_speed: 0.0,
            centroid_x: 0.0,
            centroid_y: 0.0,
        };
        if count == 0 {
            return stats;
        }

        let mut min = f32::INFINITY;
        let mut max = 0.0_f32;
        let mut total = 0.0;
        let mut centroid = Vector2::ZERO;
        for agent in &self.agents {
            let speed = agent.speed();
            min = min.min(speed);
            max = max.max(speed);
            total += speed;
            centroid += agent.position;
        }
        centroid /= count as f32;

        stats.mean_speed = total / count as f32;
        stats.min_speed = min;
        stats.max_speed = max;
        stats.centroid_x = centroid.x;
        stats.centroid_y = centroid.y;
        stats
    }
}

fn check_unique_ids<'a>(agents: impl IntoIterator<Item = &'a Agent>) -> Result<(), SimError> {
    let mut seen = HashSet::new();
    for agent in agents {
        if !seen.insert(agent.id) {
            return Err(SimError::DuplicateAgentId(agent.id));
        }
    }
    Ok(())
}

// Callers make sure `first_id..first_id + count` fits in a u32
fn spawn<R: Rng + ?Sized>(
    first_id: u32,
    count: usize,
    params: &FlockParams,
    bounds: Bounds,
    speed_scale: f32,
    rng: &mut R,
) -> Vec<Agent> {
    (0..count)
        .map(|i| {
            Agent::random(
                AgentId(first_id + i as u32),
                bounds,
                params.min_speed * speed_scale,
                params.max_speed * speed_scale,
                rng,
            )
        })
        .collect()
}
