/*
 * Error Module
 *
 * Errors produced by the simulation core and the configuration loader.
 * The per-frame update never fails: zero-length vectors and empty
 * neighborhoods are resolved locally. Errors surface only from explicit
 * fallible operations (scalar division, flock construction, config loading).
 */

use std::path::PathBuf;

use thiserror::Error;

use crate::boid::AgentId;

#[derive(Debug, Error)]
pub enum SimError {
    /// A vector was divided by a scalar that is exactly zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Two agents in the same flock share an id.
    #[error("duplicate agent id {0} in flock")]
    DuplicateAgentId(AgentId),

    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file was not valid JSON for `DemoConfig`.
    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
