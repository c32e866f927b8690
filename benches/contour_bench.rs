//! Benchmarks for contour evaluation and per-frame game work.
//!
//! Run with: cargo bench
//!
//! The TUI redraws at roughly 60fps, so everything a frame touches shares
//! a 16ms budget with terminal drawing. These groups cover the hot paths:
//! sampling a contour, classifying a sampled height into a note lane, and
//! rendering reference-tone audio blocks.

use std::hint::black_box;
use std::time::{Duration, Instant};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use cadenza::classify::classify;
use cadenza::contour::{Contour, ASCENT, SEGMENT_CATALOG, WAVE_CATALOG};
use cadenza::playback::ToneVoice;
use cadenza::round::Round;
use cadenza::CONTOUR_WIDTH;

/// Audio callback block sizes worth measuring.
const BLOCK_SIZES: &[usize] = &[64, 256, 1024];

fn bench_contour_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("contour/y_at");

    let contours = [
        ("staircase", Contour::Staircase(&ASCENT)),
        ("segmented", Contour::Segmented(&SEGMENT_CATALOG[0])),
        ("wave", Contour::Wave(WAVE_CATALOG[0])),
    ];
    for (name, contour) in contours {
        group.bench_function(name, |b| {
            b.iter(|| {
                // Sweep one full graph width at per-pixel resolution.
                let mut acc = 0.0f32;
                for step in 0..CONTOUR_WIDTH as u32 {
                    acc += contour.y_at(black_box(step as f32));
                }
                acc
            })
        });
    }
    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    c.bench_function("classify/full_sweep", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for tenth in 0..3000u32 {
                if classify(black_box(tenth as f32 / 10.0)).is_some() {
                    hits += 1;
                }
            }
            hits
        })
    });
}

fn bench_round_tick(c: &mut Criterion) {
    c.bench_function("round/tick", |b| {
        let mut round = Round::new(Contour::Staircase(&ASCENT), Duration::from_secs(3));
        let start = Instant::now();
        round.start(start);
        let mut elapsed = Duration::ZERO;
        b.iter(|| {
            elapsed += Duration::from_millis(16);
            let report = round.tick(black_box(start + elapsed));
            if report.is_none() {
                round.start(start + elapsed);
            }
            report
        })
    });
}

fn bench_tone_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("playback/render");
    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        let mut voice = ToneVoice::new(
            Contour::Staircase(&ASCENT),
            Duration::from_secs(3),
            48_000.0,
        );
        group.bench_with_input(BenchmarkId::new("staircase", size), &size, |b, _| {
            b.iter(|| {
                if voice.is_finished() {
                    voice.rewind();
                }
                voice.render(black_box(&mut buffer))
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_contour_sampling,
    bench_classify,
    bench_round_tick,
    bench_tone_render,
);
criterion_main!(benches);
