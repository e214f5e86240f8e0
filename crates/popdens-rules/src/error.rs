//! Rules configuration errors.

use popdens_world::Dimension;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("invalid rules config: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    #[error("spawn ground list for {0:?} is empty")]
    EmptySpawnGround(Dimension),
}
