//! # zenavif-anim
//!
//! Frame store and playback pipeline for animated AVIF.
//!
//! The AV1 bitstream decoder is pluggable: anything implementing
//! [`SourceOpener`] / [`AnimatedSource`] can decode frame `i` at a target size
//! and color configuration. This crate decides which frames to decode and
//! when, keeps a bounded read-ahead window in front of the playback cursor,
//! and recovers from per-frame failures without stopping the animation.
//!
//! ## Quick Start
//!
//! ```no_run
//! use zenavif_anim::{
//!     AnimatedSource, BoundingSize, DecodeOptions, PlaybackConfig, PlaybackWorker, Result,
//!     SourceDispatcher,
//! };
//! # fn open(_: Vec<u8>) -> Result<Box<dyn AnimatedSource>> { unimplemented!() }
//!
//! let dispatcher = SourceDispatcher::new(open, PlaybackConfig::new().preheat_frames(10));
//! let options = DecodeOptions::new().size(BoundingSize::Px { width: 480, height: 480 });
//!
//! let mut file = std::fs::File::open("animation.avif").unwrap();
//! if let Some(player) = dispatcher.create(&mut file, &options).unwrap() {
//!     let playback = PlaybackWorker::spawn(player).unwrap();
//!     // On every repaint:
//!     let snapshot = playback.snapshot();
//!     match snapshot.frame {
//!         Some(frame) => println!("frame {} {}x{}", frame.index, frame.size.width, frame.size.height),
//!         None => println!("placeholder"),
//!     }
//! }
//! ```
//!
//! ## Pieces
//!
//! - [`color::resolve`] picks the decode [`ColorConfig`] for a requested format.
//! - [`aspect::fit`] derives the target size from a bounding box.
//! - [`FrameStore`] decodes frames and keeps the [`PreheatWindow`].
//! - [`Player`] runs the clock and falls back to the last good frame.
//! - [`SourceDispatcher`] claims `ftypavif` / `ftypavis` sources.
//! - [`PlaybackWorker`] runs a player off the render thread.

pub mod aspect;
pub mod color;
mod config;
mod dispatch;
mod error;
mod image;
mod observer;
mod player;
mod source;
mod store;
mod window;
mod worker;

pub use aspect::ScaleMode;
pub use color::{ColorConfig, ColorRequest, PlatformCaps, RequestedFormat};
pub use config::{BoundingSize, DEFAULT_PREHEAT_FRAMES, DecodeOptions, PlaybackConfig};
pub use dispatch::{Brand, Capability, SIGNATURE_PREFIX_LEN, SourceDispatcher, detect};
pub use enough::{Stop, StopReason, Unstoppable};
pub use error::{Error, Result};
pub use image::{DecodedFrame, Dimensions, PixelBuffer};
pub use observer::FrameErrorObserver;
pub use player::{FrameSnapshot, MIN_FRAME_DURATION, PlaybackCursor, Player, PlayerState};
pub use source::{AnimatedSource, SourceOpener};
pub use store::FrameStore;
pub use window::PreheatWindow;
pub use worker::{PlaybackHandle, PlaybackWorker};

pub use almost_enough::Stopper;
