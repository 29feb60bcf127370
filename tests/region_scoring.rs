//! Scoring single results on masked regions.

mod common;

use approx::assert_relative_eq;
use lightfield_eval::evaluation::score_region;
use lightfield_eval::metrics::{
    BadPix, Discontinuities, FineFattening, FineThinning, Mse, ScoreInput,
};
use lightfield_eval::prelude::*;

use common::*;

const SIZE: usize = 4;
const HIGH: usize = 40;
const LINE: usize = 20;

/// High resolution scene with a one pixel wide vertical structure at column `LINE`.
fn fine_scene() -> InMemoryScene {
    let line = |x: usize| x == LINE;

    InMemoryScene::new(
        "fine",
        geometry(SIZE, SIZE),
        gradient_view(SIZE, SIZE),
        constant(SIZE, SIZE, 0.0),
    )
    .unwrap()
    .with_high_res_gt(DisparityMap::from_fn(HIGH, HIGH, |x, _| if line(x) { 1.0 } else { 0.0 }))
    .unwrap()
    .with_mask(
        Region::FineStructure,
        Resolution::High,
        Mask::from_fn(HIGH, HIGH, |x, _| line(x)),
    )
    .unwrap()
}

fn high_res_result(algorithm: &str, lo: usize, hi: usize) -> AlgorithmResult {
    AlgorithmResult::new(
        algorithm,
        DisparityMap::from_fn(HIGH, HIGH, |x, _| if x >= lo && x <= hi { 1.0 } else { 0.0 }),
    )
}

fn score(metric: &dyn Metric, scene: &dyn Scene, result: &AlgorithmResult) -> f64 {
    let gt = scene.ground_truth(metric.resolution()).unwrap();
    score_region(metric, scene, result, &gt, metric.resolution(), 0, false)
        .unwrap()
        .value
}

#[test]
fn fattened_structure_is_detected() {
    let scene = fine_scene();
    let metric = FineFattening::new(0.15, 9);

    // The band spans columns 11..=29 without the structure itself.
    let mask = metric.evaluation_mask(&scene, Resolution::High, 0).unwrap();
    assert_eq!(mask.count(), 18 * HIGH);

    assert_eq!(score(&metric, &scene, &high_res_result("exact", LINE, LINE)), 0.0);
    assert_relative_eq!(
        score(&metric, &scene, &high_res_result("fat", LINE - 1, LINE + 1)),
        100.0 * 2.0 / 18.0,
        epsilon = 1e-9
    );
}

#[test]
fn thinned_structure_is_detected() {
    let scene = fine_scene();
    let metric = FineThinning::new(0.15);

    assert_eq!(score(&metric, &scene, &high_res_result("exact", LINE, LINE)), 0.0);
    assert_eq!(score(&metric, &scene, &high_res_result("lost", 0, 0)), 100.0);
    assert_eq!(metric.format_score(100.0), "100.00%");
}

#[test]
fn region_metric_without_mask_fails() {
    let scene = fine_scene();
    let gt = scene.ground_truth(Resolution::High).unwrap();
    let result = high_res_result("exact", LINE, LINE);

    let err = score_region(
        &Discontinuities::new(0.07),
        &scene,
        &result,
        &gt,
        Resolution::High,
        0,
        false,
    )
    .unwrap_err();

    match err {
        Error::MissingMask { scene, resolution, .. } => {
            assert_eq!(scene, "fine");
            assert_eq!(resolution, Resolution::High);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn empty_mask_has_no_score() {
    let scene = flat_scene("tiny");
    let gt = scene.ground_truth(Resolution::Low).unwrap();
    let result = AlgorithmResult::new("A", constant(WIDTH, HEIGHT, 0.0));

    // A border of half the image leaves nothing to evaluate.
    let err = score_region(&Mse::new(100.0), &scene, &result, &gt, Resolution::Low, WIDTH / 2, false)
        .unwrap_err();
    assert!(matches!(err, Error::EmptyMask { .. }));
}

#[test]
fn visualization_is_hidden_outside_mask() {
    let scene = flat_scene("s1");
    let mut results = InMemoryResults::new();
    results.insert("s1", AlgorithmResult::new("A", constant(WIDTH, HEIGHT, 1.0)));

    let evaluator = Evaluator::new(settings(), &results);
    let scored = evaluator
        .score(&BadPix::new(0.07), &scene, "A", Resolution::Low, true)
        .unwrap();

    assert_eq!(scored.value, 100.0);
    let vis = scored.visualization.unwrap();
    assert_eq!(vis.shape(), (HEIGHT, WIDTH));
    assert_eq!(vis.get(0, 0), None);
    assert_eq!(vis.get(1, 1), Some(1.0));
    assert_eq!(vis.mask().count(), (WIDTH - 2) * (HEIGHT - 2));
    assert_eq!(vis.to_luma_normalised().get_pixel(0, 0)[0], 0);
}

#[test]
fn overview_lists_low_then_high_rows() {
    let f = Resolution::High.factor();
    let scene = masked_scene("s1", Region::Discontinuities, Resolution::High)
        .with_mask(Region::Planes, Resolution::Low, Mask::full(WIDTH, HEIGHT))
        .unwrap();

    let mut results = InMemoryResults::new();
    results.insert("s1", AlgorithmResult::new("A", constant(WIDTH, HEIGHT, 0.0)));
    results.insert("s1", AlgorithmResult::new("B", constant(WIDTH, HEIGHT, 0.5)));

    let evaluator = Evaluator::new(settings(), &results);
    let overview = evaluator.scene_overview(&scene, &["A", "B"]).unwrap();

    let rows: Vec<(&str, Resolution)> = overview
        .rows
        .iter()
        .map(|r| (r.metric.as_str(), r.resolution))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("MSE*100", Resolution::Low),
            ("BadPix(0.07)", Resolution::Low),
            ("Bump. Planes", Resolution::Low),
            ("Discontinuities", Resolution::High),
        ]
    );

    let disc = &overview.rows[3];
    assert_eq!(disc.mask.shape(), (HEIGHT * f, WIDTH * f));
    assert_eq!(disc.cells[0].algorithm, "A");
    assert_eq!(disc.cells[0].formatted, "0.00");
    assert_eq!(disc.cells[1].score, 100.0);
    assert!(overview.rows.iter().all(|r| r.cells.iter().all(|c| c.visualization.is_some())));
}

#[test]
fn overview_requires_every_result() {
    let scene = flat_scene("s1");
    let results = InMemoryResults::new();
    let evaluator = Evaluator::new(settings(), &results);

    let err = evaluator.scene_overview(&scene, &["A"]).err().unwrap();
    assert!(matches!(err, Error::MissingResult { .. }));
}

#[test]
fn direct_score_checks_map_shapes() {
    let gt = constant(SIZE, SIZE, 0.0);
    let algo = constant(SIZE, SIZE, 0.0);
    let mask = Mask::full(2, 2);
    let input = ScoreInput {
        scene: "direct",
        algorithm: "A",
        disparity: &algo,
        gt: &gt,
        mask: &mask,
        runtime: None,
    };

    let err = BadPix::new(0.07).score(&input, false).unwrap_err();
    assert_eq!(err.to_string(), "Expected an image of shape 4x4 but got 2x2");
    match err {
        Error::ShapeMismatch { expected, actual } => {
            assert_eq!(expected, (SIZE, SIZE));
            assert_eq!(actual, (2, 2));
        }
        other => panic!("unexpected error {:?}", other),
    }
}
