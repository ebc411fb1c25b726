/*
 * Simulation Parameters Module
 *
 * Tunables for the flock and the chain follower. One explicit value is
 * handed to each engine at construction and can be edited live through the
 * UI. Nothing here is validated: out-of-range values degrade the simulation
 * but never crash it. `lint` reports the suspicious ones so the config
 * loader can warn about them.
 */

use serde::{Deserialize, Serialize};

/// How agents are kept inside the simulation area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryMode {
    /// Soft steering away from the walls inside `padding_range`.
    #[default]
    Bounce,
    /// Toroidal wrap: leaving one edge re-enters from the opposite one.
    Wrap,
}

/// Size of the simulation area. The origin is the top-left corner and y
/// grows downwards, like a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> crate::Vector2 {
        crate::Vector2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn contains(&self, point: crate::Vector2) -> bool {
        (0.0..self.width).contains(&point.x) && (0.0..self.height).contains(&point.y)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(960.0, 720.0)
    }
}

// Parameters for the flock that can be adjusted via UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockParams {
    pub separation_range: f32,
    pub separation_factor: f32,
    pub alignment_range: f32,
    pub alignment_factor: f32,
    pub cohesion_range: f32,
    pub cohesion_factor: f32,
    pub predator_range: f32,
    pub predator_factor: f32,
    /// Treat the pointer as one more predator.
    pub avoid_pointer: bool,
    pub padding_range: f32,
    pub turn_factor: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    /// Predators cruise within the speed range scaled by this factor.
    pub predator_speed_scale: f32,
    pub boundary: BoundaryMode,
    // Performance settings
    pub spatial_grid: bool,
    pub parallel: bool,
}

impl Default for FlockParams {
    fn default() -> Self {
        let min_speed = 1.0;
        let max_speed = 3.0;
        Self {
            separation_range: 20.0,
            separation_factor: 0.001,
            alignment_range: 50.0,
            alignment_factor: 0.01,
            cohesion_range: 50.0,
            cohesion_factor: 0.0003,
            predator_range: 150.0,
            predator_factor: 0.0007,
            avoid_pointer: true,
            padding_range: 50.0,
            turn_factor: (max_speed - min_speed) / 20.0,
            min_speed,
            max_speed,
            predator_speed_scale: 0.75,
            boundary: BoundaryMode::Bounce,
            spatial_grid: false,
            parallel: false,
        }
    }
}

impl FlockParams {
    /// Largest neighborhood radius used by the flocking rules.
    pub fn max_rule_range(&self) -> f32 {
        self.separation_range
            .max(self.alignment_range)
            .max(self.cohesion_range)
    }

    /// Human-readable notes about values that will make the flock misbehave.
    pub fn lint(&self) -> Vec<String> {
        let mut notes = Vec::new();
        let ranges = [
            ("separation_range", self.separation_range),
            ("alignment_range", self.alignment_range),
            ("cohesion_range", self.cohesion_range),
            ("predator_range", self.predator_range),
            ("padding_range", self.padding_range),
        ];
        for (name, value) in ranges {
            if value < 0.0 {
                notes.push(format!("{name} is negative ({value}); the rule never fires"));
            }
        }
        if self.min_speed < 0.0 {
            notes.push(format!("min_speed is negative ({})", self.min_speed));
        }
        if self.min_speed > self.max_speed {
            notes.push(format!(
                "min_speed ({}) exceeds max_speed ({}); speeds will oscillate",
                self.min_speed, self.max_speed
            ));
        }
        notes
    }

    // Get parameter ranges for UI sliders
    pub fn range_slider() -> std::ops::RangeInclusive<f32> {
        0.0..=300.0
    }

    pub fn factor_slider() -> std::ops::RangeInclusive<f32> {
        0.0..=0.2
    }

    pub fn speed_slider() -> std::ops::RangeInclusive<f32> {
        0.0..=20.0
    }

    pub fn turn_slider() -> std::ops::RangeInclusive<f32> {
        0.0..=2.0
    }
}

// Parameters for the joint-chain follower
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainParams {
    pub joint_count: usize,
    pub link_length: f32,
    /// Maximum bend between neighbouring links in radians, unlimited when absent.
    pub max_bend: Option<f32>,
}

impl Default for ChainParams {
    fn default() -> Self {
        Self {
            joint_count: 12,
            link_length: 50.0,
            max_bend: None,
        }
    }
}

impl ChainParams {
    pub fn joint_count_slider() -> std::ops::RangeInclusive<usize> {
        1..=64
    }

    pub fn link_length_slider() -> std::ops::RangeInclusive<f32> {
        5.0..=150.0
    }

    pub fn max_bend_slider() -> std::ops::RangeInclusive<f32> {
        0.05..=std::f32::consts::PI
    }
}

pub fn agent_count_slider() -> std::ops::RangeInclusive<usize> {
    1..=2000
}
