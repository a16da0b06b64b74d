//! Merge configuration.

use serde::{Deserialize, Serialize};

/// Default fan-in capacity: the most input streams one merge accepts.
pub const MAX_INPUTS: usize = 64;

/// Configuration for a merge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Fan-in capacity. Seeding more non-empty inputs than this fails
    /// with [`MergeError::TooManyInputs`](crate::MergeError::TooManyInputs).
    #[serde(default = "default_max_inputs")]
    pub max_inputs: usize,

    /// Check every advance against the input's previous record and fail
    /// with [`MergeError::OutOfOrder`](crate::MergeError::OutOfOrder) on a
    /// decrease.
    #[serde(default)]
    pub verify_order: bool,
}

fn default_max_inputs() -> usize {
    MAX_INPUTS
}

impl MergeConfig {
    pub fn with_max_inputs(mut self, max_inputs: usize) -> Self {
        self.max_inputs = max_inputs;
        self
    }

    pub fn verifying(mut self) -> Self {
        self.verify_order = true;
        self
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        MergeConfig {
            max_inputs: MAX_INPUTS,
            verify_order: false,
        }
    }
}
