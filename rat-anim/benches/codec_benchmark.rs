//! Benchmarks for the RAT codec

use criterion::{Criterion, criterion_group, criterion_main};
use rat_anim::{CompressOptions, RatAnimation, Vec3, compress};
use std::hint::black_box;
use std::io::Cursor;

fn sample_frames(frame_count: usize, vertex_count: usize) -> Vec<Vec<Vec3>> {
    (0..frame_count)
        .map(|frame| {
            let t = frame as f32 * 0.05;
            (0..vertex_count)
                .map(|vertex| {
                    let phase = vertex as f32 * 0.31;
                    Vec3::new(
                        (t + phase).sin() * 3.0,
                        (t * 1.7 + phase).cos() * 3.0,
                        vertex as f32 * 0.1 + t,
                    )
                })
                .collect()
        })
        .collect()
}

fn bench_compress(c: &mut Criterion) {
    let frames = sample_frames(120, 500);

    c.bench_function("compress 120 frames x 500 vertices", |b| {
        b.iter(|| compress(black_box(&frames), &CompressOptions::default()).unwrap());
    });
}

fn bench_parse(c: &mut Criterion) {
    let frames = sample_frames(120, 500);
    let anim = compress(&frames, &CompressOptions::default()).unwrap();
    let mut data = Vec::new();
    anim.write(&mut data).unwrap();

    c.bench_function("parse 120 frames x 500 vertices", |b| {
        b.iter(|| {
            let mut cursor = Cursor::new(black_box(&data));
            RatAnimation::parse(&mut cursor).unwrap()
        });
    });
}

fn bench_sequential_decode(c: &mut Criterion) {
    let frames = sample_frames(120, 500);
    let anim = compress(&frames, &CompressOptions::default()).unwrap();

    c.bench_function("decode 120 frames sequentially", |b| {
        b.iter(|| {
            let mut cursor = anim.create_cursor();
            for frame in 0..anim.frame_count {
                cursor.decode_to(&anim, frame).unwrap();
            }
            black_box(cursor.frame())
        });
    });
}

criterion_group!(
    benches,
    bench_compress,
    bench_parse,
    bench_sequential_decode
);
criterion_main!(benches);
