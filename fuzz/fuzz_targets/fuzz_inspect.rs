#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use zenavif_anim::{AnimatedSource, Capability, DecodeOptions, Error, PlaybackConfig, SourceDispatcher};

fn reject(_: Vec<u8>) -> zenavif_anim::Result<Box<dyn AnimatedSource>> {
    Err(whereat::at(Error::Open("fuzz".into())))
}

fuzz_target!(|data: &[u8]| {
    let dispatcher = SourceDispatcher::new(reject, PlaybackConfig::new());
    let mut src = Cursor::new(data);
    let capability = dispatcher.inspect(&mut src).unwrap();
    assert_eq!(src.position(), 0);
    assert_eq!(capability, zenavif_anim::detect(data));

    if capability == Capability::NotCapable {
        assert!(dispatcher.create(&mut src, &DecodeOptions::new()).unwrap().is_none());
        assert_eq!(src.position(), 0);
    }
});
