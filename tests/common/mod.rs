//! Fake frame decoder shared by the integration tests

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use imgref::ImgVec;
use parking_lot::Mutex;
use rgb::Rgba;
use whereat::at;
use zenavif_anim::{
    AnimatedSource, ColorConfig, Dimensions, Error, PixelBuffer, Result, ScaleMode, Stop,
};

/// Counters observable after the source has been moved into a store
#[derive(Debug, Clone, Default)]
pub struct DecodeLog {
    calls: Arc<AtomicU64>,
    indices: Arc<Mutex<Vec<u32>>>,
}

impl DecodeLog {
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn indices(&self) -> Vec<u32> {
        self.indices.lock().clone()
    }

    pub fn calls_for(&self, index: u32) -> usize {
        self.indices.lock().iter().filter(|&&i| i == index).count()
    }
}

/// Decodes solid frames whose red channel is the frame index
pub struct FakeSource {
    pub frames: u32,
    pub size: Dimensions,
    pub duration: Duration,
    pub failing: Vec<u32>,
    /// Time a decode takes
    pub delay: Duration,
    /// Poll the stop token while "decoding"
    pub cooperative: bool,
    pub log: DecodeLog,
}

impl FakeSource {
    pub fn new(frames: u32) -> Self {
        Self {
            frames,
            size: Dimensions::new(64, 32),
            duration: Duration::from_millis(100),
            failing: Vec::new(),
            delay: Duration::ZERO,
            cooperative: true,
            log: DecodeLog::default(),
        }
    }

    pub fn failing(mut self, indices: &[u32]) -> Self {
        self.failing = indices.to_vec();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = Dimensions::new(width, height);
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn delay(mut self, delay: Duration, cooperative: bool) -> Self {
        self.delay = delay;
        self.cooperative = cooperative;
        self
    }

    pub fn log(&self) -> DecodeLog {
        self.log.clone()
    }

    pub fn boxed(self) -> Box<dyn AnimatedSource> {
        Box::new(self)
    }
}

impl AnimatedSource for FakeSource {
    fn frame_count(&self) -> u32 {
        self.frames
    }

    fn natural_size(&self) -> Dimensions {
        self.size
    }

    fn frame_duration(&self, _index: u32) -> Duration {
        self.duration
    }

    fn decode_frame(
        &mut self,
        index: u32,
        target: Dimensions,
        color: ColorConfig,
        _scale: ScaleMode,
        stop: &dyn Stop,
    ) -> Result<PixelBuffer> {
        self.log.calls.fetch_add(1, Ordering::SeqCst);
        self.log.indices.lock().push(index);

        if !self.delay.is_zero() {
            let deadline = Instant::now() + self.delay;
            while Instant::now() < deadline {
                if self.cooperative {
                    stop.check().map_err(|e| at(Error::Cancelled(e)))?;
                }
                std::thread::sleep(Duration::from_millis(1));
            }
        }

        if self.failing.contains(&index) {
            return Err(at(Error::Decode {
                index,
                msg: "corrupt tile".into(),
            }));
        }

        let (w, h) = (target.width as usize, target.height as usize);
        Ok(match color {
            ColorConfig::Rgb565 => PixelBuffer::Rgb565(ImgVec::new(vec![index as u16; w * h], w, h)),
            _ => PixelBuffer::Rgba8(ImgVec::new(
                vec![Rgba::new(index as u8, 0, 0, 255); w * h],
                w,
                h,
            )),
        })
    }
}

/// Records every failure the player reports
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub frame_errors: Mutex<Vec<u32>>,
    pub open_errors: Mutex<usize>,
}

impl zenavif_anim::FrameErrorObserver for RecordingObserver {
    fn on_frame_error(&self, index: u32, error: &Error) {
        assert!(!error.is_cancelled(), "cancellation must not be reported");
        self.frame_errors.lock().push(index);
    }

    fn on_open_error(&self, _error: &Error) {
        *self.open_errors.lock() += 1;
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
