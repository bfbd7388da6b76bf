//! Benchmarks for steady-state playback

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use imgref::ImgVec;
use rgb::Rgba;
use zenavif_anim::{
    AnimatedSource, ColorConfig, Dimensions, FrameStore, PixelBuffer, PlaybackConfig, Player,
    Result, ScaleMode, Stop,
};

/// Fills frames with a flat color; cost scales with the target size
struct FlatSource {
    frames: u32,
}

impl AnimatedSource for FlatSource {
    fn frame_count(&self) -> u32 {
        self.frames
    }

    fn natural_size(&self) -> Dimensions {
        Dimensions::new(1920, 1080)
    }

    fn frame_duration(&self, _index: u32) -> Duration {
        Duration::from_millis(40)
    }

    fn decode_frame(
        &mut self,
        index: u32,
        target: Dimensions,
        _color: ColorConfig,
        _scale: ScaleMode,
        _stop: &dyn Stop,
    ) -> Result<PixelBuffer> {
        let (w, h) = (target.width as usize, target.height as usize);
        Ok(PixelBuffer::Rgba8(ImgVec::new(
            vec![Rgba::new(index as u8, 0, 0, 255); w * h],
            w,
            h,
        )))
    }
}

fn playing(preheat: usize, target: Dimensions) -> Player {
    let store = FrameStore::new(
        Box::new(FlatSource { frames: 120 }),
        target,
        ColorConfig::Rgba8888,
        ScaleMode::Fit,
        preheat,
    )
    .unwrap();
    let mut player = Player::new(store, &PlaybackConfig::new().preheat_frames(preheat), true);
    player.current_frame();
    player
}

fn benchmark_playback(c: &mut Criterion) {
    let mut group = c.benchmark_group("playback");

    for preheat in [1usize, 6, 10] {
        group.bench_with_input(BenchmarkId::new("step_480", preheat), &preheat, |b, &p| {
            let mut player = playing(p, Dimensions::new(480, 270));
            b.iter(|| {
                player.step();
                black_box(player.snapshot())
            });
        });
    }

    group.bench_function("tick_no_advance", |b| {
        let mut player = playing(6, Dimensions::new(480, 270));
        b.iter(|| black_box(player.tick(black_box(Duration::ZERO))));
    });

    group.finish();
}

criterion_group!(benches, benchmark_playback);
criterion_main!(benches);
