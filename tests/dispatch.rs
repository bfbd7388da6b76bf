//! SourceDispatcher: signature matching and player construction

mod common;

use std::io::{Cursor, Read};
use std::sync::Arc;

use common::{FakeSource, RecordingObserver};
use whereat::at;
use zenavif_anim::{
    AnimatedSource, BoundingSize, Brand, Capability, ColorConfig, DecodeOptions, Dimensions,
    Error, PlaybackConfig, PlayerState, RequestedFormat, Result, SourceDispatcher,
};

/// Test container: `ftyp` header, then one byte with the frame count.
/// A frame count of 0xFF marks a corrupt file.
fn container(brand: &[u8; 4], frames: u8) -> Vec<u8> {
    let mut data = vec![0, 0, 0, 0x18];
    data.extend_from_slice(b"ftyp");
    data.extend_from_slice(brand);
    data.push(frames);
    data.extend_from_slice(&[0; 11]);
    data
}

fn open(data: Vec<u8>) -> Result<Box<dyn AnimatedSource>> {
    match data.get(12) {
        Some(0xFF) | None => Err(at(Error::Open("bad ftyp box".into()))),
        Some(&frames) => Ok(FakeSource::new(frames as u32).size(1920, 1080).boxed()),
    }
}

#[test]
fn declines_foreign_sources_without_consuming() {
    let dispatcher = SourceDispatcher::new(open, PlaybackConfig::new());
    let mut src = Cursor::new(container(b"heic", 4));

    assert_eq!(dispatcher.inspect(&mut src).unwrap(), Capability::NotCapable);
    assert!(
        dispatcher
            .create(&mut src, &DecodeOptions::new())
            .unwrap()
            .is_none()
    );
    assert_eq!(src.position(), 0);

    // The next decoder in line still sees every byte
    let mut rest = Vec::new();
    src.read_to_end(&mut rest).unwrap();
    assert_eq!(rest, container(b"heic", 4));
}

#[test]
fn builds_animated_player_for_avis() {
    let dispatcher = SourceDispatcher::new(open, PlaybackConfig::new().preheat_frames(3));
    let mut src = Cursor::new(container(b"avis", 12));
    assert_eq!(
        dispatcher.inspect(&mut src).unwrap(),
        Capability::Capable(Brand::Avis)
    );

    let options = DecodeOptions::new()
        .format(RequestedFormat::Argb8888)
        .size(BoundingSize::Px {
            width: 480,
            height: 0,
        });
    let mut player = dispatcher.create(&mut src, &options).unwrap().unwrap();

    assert_eq!(player.state(), PlayerState::Placeholder);
    assert_eq!(player.store().capacity(), 3);
    assert_eq!(player.store().target_size(), Dimensions::new(480, 270));
    assert_eq!(player.store().color_config(), ColorConfig::Rgba8888);

    let frame = player.current_frame().unwrap();
    assert_eq!(frame.size, Dimensions::new(480, 270));
    assert!(frame.is_sampled);
    assert!(player.snapshot().is_sampled);
}

#[test]
fn original_size_is_not_sampled() {
    let dispatcher = SourceDispatcher::new(open, PlaybackConfig::new());
    let mut src = Cursor::new(container(b"avif", 1));
    let mut player = dispatcher
        .create(&mut src, &DecodeOptions::new())
        .unwrap()
        .unwrap();

    assert_eq!(player.state(), PlayerState::Uninitialized);
    let frame = player.current_frame().unwrap();
    assert_eq!(frame.size, Dimensions::new(1920, 1080));
    assert!(!frame.is_sampled);
    assert_eq!(player.state(), PlayerState::Still);
}

#[test]
fn animation_flag_forces_still_path() {
    let dispatcher = SourceDispatcher::new(open, PlaybackConfig::new());
    let mut src = Cursor::new(container(b"avis", 8));
    let mut player = dispatcher
        .create(&mut src, &DecodeOptions::new().animation(false))
        .unwrap()
        .unwrap();

    assert_eq!(player.state(), PlayerState::Uninitialized);
    player.current_frame().unwrap();
    assert_eq!(player.state(), PlayerState::Still);
}

#[test]
fn open_failure_is_reported_and_returned() {
    let observer = Arc::new(RecordingObserver::default());
    let dispatcher = SourceDispatcher::new(open, PlaybackConfig::new().observer(observer.clone()));

    let mut corrupt = Cursor::new(container(b"avis", 0xFF));
    let err = dispatcher
        .create(&mut corrupt, &DecodeOptions::new())
        .unwrap_err()
        .into_inner();
    assert!(matches!(err, Error::Open(_)));

    let mut empty = Cursor::new(container(b"avif", 0));
    let err = dispatcher
        .create(&mut empty, &DecodeOptions::new())
        .unwrap_err()
        .into_inner();
    assert!(matches!(err, Error::Open(_)), "no frames is an open error");

    assert_eq!(*observer.open_errors.lock(), 2);
    assert!(observer.frame_errors.lock().is_empty());
}

#[test]
fn truncated_source_is_declined() {
    let dispatcher = SourceDispatcher::new(open, PlaybackConfig::new());
    let mut src = Cursor::new(b"\0\0\0\x18ftypav".to_vec());
    assert!(
        dispatcher
            .create(&mut src, &DecodeOptions::new())
            .unwrap()
            .is_none()
    );
    assert_eq!(src.position(), 0);
}
