// SPDX-License-Identifier: MPL-2.0
//! Benchmarks for the playback hot paths.
//!
//! Measures, against the in-memory source:
//! - One timer tick while playing (clock poll + sequential read + publish)
//! - A random-access seek (seek + read + publish)

use criterion::{criterion_group, criterion_main, Criterion};
use iced_review::events;
use iced_review::video_player::{MemoryOpener, SourceMetadata, VideoPlayer};
use std::hint::black_box;
use std::path::Path;
use std::time::Instant;

fn hd_clip() -> SourceMetadata {
    SourceMetadata {
        frame_rate: 25.0,
        frame_count: 1_000_000,
        width: 1280,
        height: 720,
    }
}

fn open_player() -> (VideoPlayer, events::EventReceiver) {
    let (tx, rx) = events::channel();
    let mut player = VideoPlayer::new(Box::new(MemoryOpener::new(hd_clip())), tx);
    player.set_video_file(Path::new("bench.mp4")).unwrap();
    (player, rx)
}

/// Benchmark one playback tick.
fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("playback");
    let (mut player, mut rx) = open_player();
    let start = Instant::now();
    player.toggle_playback(start);

    let interval = player.clock().update_interval();
    let mut now = start;
    group.bench_function("tick", |b| {
        b.iter(|| {
            now += interval;
            player.on_timer(black_box(now));
            rx.drain();
        });
    });

    group.finish();
}

/// Benchmark a seek to a far frame.
fn bench_seek(c: &mut Criterion) {
    let mut group = c.benchmark_group("playback");
    let (mut player, mut rx) = open_player();

    let mut target = 0_i64;
    group.bench_function("seek", |b| {
        b.iter(|| {
            target = (target + 7_919) % 1_000_000;
            player.seek_to_frame(black_box(target));
            rx.drain();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_tick, bench_seek);
criterion_main!(benches);
