//! # Runtime
//!
//! Reports the runtime an algorithm needed for a scene rather than a disparity error.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use crate::error::*;
use crate::metrics::{Metric, MetricScore, ScoreInput};
use crate::scene::Region;

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

pub struct Runtime {
    /// Report `log10` of the runtime in seconds.
    log: bool,
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl Runtime {
    pub fn new(log: bool) -> Self {
        Runtime { log }
    }
}

impl Metric for Runtime {
    fn display_name(&self) -> String {
        if self.log {
            "Runtime\n(log10)".to_string()
        }
        else {
            "Runtime".to_string()
        }
    }

    fn short_name(&self) -> String {
        "Runtime".to_string()
    }

    fn region(&self) -> Option<Region> {
        None
    }

    fn evaluate_on_high_res(&self) -> bool {
        false
    }

    fn score(&self, input: &ScoreInput<'_>, _with_visualization: bool) -> Result<MetricScore> {
        let seconds = input.runtime.ok_or_else(|| Error::MissingRuntime {
            scene: input.scene.to_string(),
            algorithm: input.algorithm.to_string(),
        })?;

        Ok(MetricScore {
            value: if self.log { seconds.log10() } else { seconds },
            visualization: None,
        })
    }

    fn format_score(&self, score: f64) -> String {
        if self.log {
            format!("{:.2}", score)
        }
        else {
            format!("{:.2}s", score)
        }
    }
}
