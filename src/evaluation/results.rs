//! # Algorithm results
//!
//! Disparity estimates submitted by the evaluated algorithms.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use std::collections::HashMap;

use crate::disparity::DisparityMap;
use crate::error::*;
use crate::scene::Scene;

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// Output of one algorithm on one scene.
#[derive(Clone, Debug)]
pub struct AlgorithmResult {
    pub algorithm: String,
    /// Disparity estimate, usually at the scene's low resolution.
    pub disparity: DisparityMap,
    /// Runtime in seconds, if the algorithm reported one.
    pub runtime: Option<f64>,
}

/// Results keyed by scene name and algorithm name.
#[derive(Default)]
pub struct InMemoryResults {
    results: HashMap<(String, String), AlgorithmResult>,
}

// -----------------------------------------------------------------------------------------------
// TRAITS
// -----------------------------------------------------------------------------------------------

pub trait ResultProvider {
    /// Fetch the result of `algorithm` on `scene`, failing with [`Error::MissingResult`] if the
    /// algorithm was not run on the scene.
    fn result(&self, scene: &dyn Scene, algorithm: &str) -> Result<AlgorithmResult>;
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl AlgorithmResult {
    pub fn new(algorithm: &str, disparity: DisparityMap) -> Self {
        AlgorithmResult {
            algorithm: algorithm.to_string(),
            disparity,
            runtime: None,
        }
    }

    pub fn with_runtime(mut self, seconds: f64) -> Self {
        self.runtime = Some(seconds);
        self
    }
}

impl InMemoryResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a result for `scene`, replacing any earlier result of the same algorithm.
    pub fn insert(&mut self, scene: &str, result: AlgorithmResult) {
        self.results
            .insert((scene.to_string(), result.algorithm.clone()), result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl ResultProvider for InMemoryResults {
    fn result(&self, scene: &dyn Scene, algorithm: &str) -> Result<AlgorithmResult> {
        self.results
            .get(&(scene.name().to_string(), algorithm.to_string()))
            .cloned()
            .ok_or_else(|| Error::MissingResult {
                scene: scene.name().to_string(),
                algorithm: algorithm.to_string(),
            })
    }
}
