use serde::{Deserialize, Serialize};

/// Engine switches a front end may flip. Missing fields take their defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Save through the persistence collaborator whenever a checkpoint activates.
    pub autosave_checkpoints: bool,
    /// Write a demo segment whenever the player leaves a room or level.
    pub record_demos: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { autosave_checkpoints: true, record_demos: false }
    }
}
