//! Criterion benchmarks for curtainfx critical paths
//!
//! Benchmarks the core performance-critical operations:
//! - Particle: cascaded integration with short and long motion chains
//! - Scene: stepping effects and rasterizing one frame
//! - Complexity: pairwise frame differences over whole sequences

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use curtainfx::complexity::sequence_complexity;
use curtainfx::effect::{Mortar, MortarOptions, ParticleSet};
use curtainfx::particle::{Color, Particle, Vec3};
use curtainfx::scene::{CurtainLayout, Scene};
use image::{Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::SeedableRng;

// =============================================================================
// Test Data Generators
// =============================================================================

/// Particle with a motion chain of `order` derivatives
fn make_particle(order: usize) -> Particle {
    let motion = (0..order).map(|i| Vec3::new(0.1 * i as f64, -0.05, 0.0)).collect();
    Particle::new(Vec3::new(0.5, 1.0, 0.0), motion, Color::WHITE, 0.5)
}

/// Scene with a grid of static particles covering every pixel
fn make_full_scene(panels: u32) -> Scene {
    let mut scene = Scene::for_layout(CurtainLayout::new(panels), 0.2).unwrap();
    let (width, height) = scene.pixel_size();
    let mut set = ParticleSet::new();
    for col in 0..width {
        for row in 0..height {
            let position = Vec3::new(0.08 * col as f64 + 0.04, 0.08 * row as f64 + 0.04, 0.0);
            set.add(Particle::new(position, vec![Vec3::ZERO], Color::WHITE, 0.0));
        }
    }
    scene.add_effect(set);
    scene
}

/// Frame sequence where one pixel moves per frame
fn make_frames(count: usize) -> Vec<RgbaImage> {
    (0..count)
        .map(|i| {
            let mut frame = RgbaImage::from_pixel(20, 26, Rgba([0, 0, 0, 255]));
            frame.put_pixel((i % 20) as u32, (i % 26) as u32, Rgba([255, 255, 255, 255]));
            frame
        })
        .collect()
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_particle(c: &mut Criterion) {
    let mut group = c.benchmark_group("particle");

    for order in [1, 2, 4, 8].iter() {
        let particle = make_particle(*order);
        group.bench_with_input(BenchmarkId::new("step", order), &particle, |b, particle| {
            b.iter(|| {
                let mut p = particle.clone();
                p.step(black_box(0.2));
                p
            })
        });
    }

    group.finish();
}

fn bench_scene(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene");

    for panels in [1, 4].iter() {
        let scene = make_full_scene(*panels);
        let (width, height) = scene.pixel_size();
        group.throughput(Throughput::Elements(width as u64 * height as u64));
        group.bench_with_input(BenchmarkId::new("render_frame", panels), &scene, |b, scene| {
            b.iter(|| scene.render_frame())
        });
    }

    group.bench_function("firework_45_ticks", |b| {
        b.iter(|| {
            let mut scene = Scene::for_layout(CurtainLayout::new(1), 0.2).unwrap();
            let extent = scene.physical_size();
            let rng = StdRng::seed_from_u64(7);
            scene.add_effect(Mortar::firework(extent, &MortarOptions::default(), rng));
            scene.advance(black_box(9.0));
            scene
        })
    });

    group.finish();
}

fn bench_complexity(c: &mut Criterion) {
    let mut group = c.benchmark_group("complexity");

    for count in [10, 45, 200].iter() {
        let frames = make_frames(*count);
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("sequence", count), &frames, |b, frames| {
            b.iter(|| sequence_complexity(black_box(frames)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_particle, bench_scene, bench_complexity);
criterion_main!(benches);
