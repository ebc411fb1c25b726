/*
 * Flocking Simulation - Module Definitions
 *
 * Headless engines for a boid flock and a joint-chain follower, a painter
 * abstraction to draw them with, and (behind the `gui` feature) a nannou
 * front-end with egui controls.
 */

// Re-export key components for easier access
pub use boid::{Agent, AgentId, Steering};
pub use chain::{Chain, Joint};
pub use config::{DemoConfig, DemoKind};
pub use debug::DebugInfo;
pub use error::SimError;
pub use flock::{Flock, FlockStats};
pub use params::{BoundaryMode, Bounds, ChainParams, FlockParams};
pub use render::{Color, Painter, Recorder, Shape};
pub use simulation::{Demo, FrameInput, FrameLoop, Simulation};
pub use spatial_grid::SpatialGrid;
pub use vector::{Vector2, VectorExt};

// Define modules
pub mod boid;
pub mod chain;
pub mod config;
pub mod debug;
pub mod error;
pub mod flock;
pub mod params;
pub mod render;
pub mod simulation;
pub mod spatial_grid;
pub mod vector;

#[cfg(feature = "gui")]
pub mod app;
#[cfg(feature = "gui")]
pub mod input;
#[cfg(feature = "gui")]
pub mod renderer;
#[cfg(feature = "gui")]
pub mod ui;

// Constants
pub const DEFAULT_AGENT_COUNT: usize = 100;
