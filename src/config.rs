/*
 * Configuration Module
 *
 * Everything a demo needs at start-up, loadable from a JSON file. Missing
 * fields take their defaults, so a config file only has to name what it
 * changes. Suspicious tunables are logged, never rejected.
 */

use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::SimError;
use crate::params::{Bounds, ChainParams, FlockParams};
use crate::render::Shape;
use crate::DEFAULT_AGENT_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoKind {
    #[default]
    Flock,
    Chain,
    /// Chain drawn with a fish-shaped body outline.
    Fish,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub demo: DemoKind,
    pub width: f32,
    pub height: f32,
    pub agents: usize,
    pub predators: usize,
    /// Fixed seed for reproducible runs; a random one is drawn when absent.
    pub seed: Option<u64>,
    pub shape: Shape,
    /// Scale applied to the fish body widths.
    pub fish_scale: f32,
    pub flock: FlockParams,
    pub chain: ChainParams,
}

impl Default for DemoConfig {
    fn default() -> Self {
        let bounds = Bounds::default();
        Self {
            demo: DemoKind::Flock,
            width: bounds.width,
            height: bounds.height,
            agents: DEFAULT_AGENT_COUNT,
            predators: 0,
            seed: None,
            shape: Shape::Circle,
            fish_scale: 0.3,
            flock: FlockParams::default(),
            chain: ChainParams::default(),
        }
    }
}

impl DemoConfig {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    /// Random source for the run, reproducible when `seed` is set.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)?;
        config.warn_suspicious();
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, SimError> {
        let text = fs::read_to_string(path).map_err(|source| SimError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        info!(path = %path.display(), demo = ?config.demo, "Loaded config");
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Log a warning per questionable value. Returns how many were found.
    pub fn warn_suspicious(&self) -> usize {
        let mut notes = self.flock.lint();
        if self.width <= 0.0 || self.height <= 0.0 {
            notes.push(format!("viewport {}x{} is empty", self.width, self.height));
        }
        if self.chain.link_length < 0.0 {
            notes.push(format!("chain link_length is negative ({})", self.chain.link_length));
        }
        for note in &notes {
            warn!("{note}");
        }
        notes.len()
    }
}
