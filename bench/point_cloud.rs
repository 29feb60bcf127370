use criterion::{black_box, criterion_group, criterion_main, Criterion};

use image::{Rgb, RgbImage};
use lightfield_eval::{point_cloud, prelude::*};

const SIZE: usize = 512;

fn point_cloud_bench(c: &mut Criterion) {

    // Build scene with the benchmark's usual camera
    let geometry = CameraGeometry {
        baseline_mm: 50.0,
        focal_length_mm: 100.0,
        sensor_size_mm: 35.0,
        focus_distance_m: 3.5,
        original_height: SIZE,
        original_width: SIZE,
    };
    let view = RgbImage::from_pixel(SIZE as u32, SIZE as u32, Rgb([128, 128, 128]));
    let gt = DisparityMap::from_fn(SIZE, SIZE, |x, y| (x as f32 - y as f32) / SIZE as f32);
    let scene = InMemoryScene::new("ramp", geometry, view, gt.clone()).unwrap();

    // Benchmark conversion and serialisation
    c.bench_function("convert ramp 512", |b| {
        b.iter(|| point_cloud::convert(&scene, black_box(&gt)))
    });

    let points = point_cloud::convert(&scene, &gt).unwrap();
    c.bench_function("write_ply ramp 512", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(points.len() * 48);
            point_cloud::write_ply(black_box(&points), &mut out)
        })
    });
}

criterion_group!(benches, point_cloud_bench);
criterion_main!(benches);
