//! # Metric applicability
//!
//! Decides which metrics are evaluated on a scene, and which scenes take part in a metric's
//! aggregate score.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use crate::metrics::{general_metrics, region_metrics, Metric};
use crate::scene::{Resolution, Scene};
use crate::settings::EvaluationSettings;

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Scenes on which `metric` can be evaluated.
///
/// General metrics apply to every scene. Region-based metrics apply to scenes providing the
/// metric's mask at low or at high resolution. Scene order is preserved.
pub fn applicable_scenes<'s>(
    scenes: &'s [Box<dyn Scene>],
    metric: &dyn Metric,
) -> Vec<&'s dyn Scene> {
    scenes
        .iter()
        .map(|s| -> &'s dyn Scene { s.as_ref() })
        .filter(|&s| {
            metric.is_general()
                || metric.mask_exists(s, Resolution::Low)
                || metric.mask_exists(s, Resolution::High)
        })
        .collect()
}

/// Metrics of the low resolution pass on `scene`: all general metrics followed by the region
/// metrics whose low resolution mask exists.
pub fn applicable_metrics_low_res(
    scene: &dyn Scene,
    settings: &EvaluationSettings,
) -> Vec<Box<dyn Metric>> {
    let mut metrics = general_metrics(settings);
    metrics.extend(
        region_metrics(settings)
            .into_iter()
            .filter(|m| m.is_applicable_for_low_res_scene(scene)),
    );
    metrics
}

/// Region metrics of the high resolution pass on `scene`.
pub fn applicable_metrics_high_res(
    scene: &dyn Scene,
    settings: &EvaluationSettings,
) -> Vec<Box<dyn Metric>> {
    region_metrics(settings)
        .into_iter()
        .filter(|m| m.is_applicable_for_high_res_scene(scene))
        .collect()
}
