//! Container signature detection and pipeline construction
//!
//! AVIF files start with an ISO-BMFF `ftyp` box whose major brand sits at
//! byte offset 4: `ftypavif` for still images, `ftypavis` for image
//! sequences. Only those two brands are claimed; everything else is left for
//! other decoders, with the read position untouched.

use std::io::{Read, Seek, SeekFrom};

use whereat::at;

use crate::config::{DecodeOptions, PlaybackConfig};
use crate::error::{Error, Result};
use crate::player::Player;
use crate::source::SourceOpener;
use crate::store::FrameStore;

/// Offset of the `ftyp` box type within the file
const SIGNATURE_OFFSET: usize = 4;
/// Bytes needed to see the box type and major brand
pub const SIGNATURE_PREFIX_LEN: usize = 12;

const BRANDS: [(&[u8; 8], Brand); 2] = [(b"ftypavif", Brand::Avif), (b"ftypavis", Brand::Avis)];

/// AVIF container variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Brand {
    /// Still image (`avif`)
    Avif,
    /// Image sequence (`avis`)
    Avis,
}

/// Result of inspecting a byte source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Recognized AVIF container
    Capable(Brand),
    /// Not ours; the source is untouched
    NotCapable,
}

/// Match a byte prefix against the recognized brands
pub fn detect(prefix: &[u8]) -> Capability {
    let Some(tag) = prefix.get(SIGNATURE_OFFSET..SIGNATURE_PREFIX_LEN) else {
        return Capability::NotCapable;
    };
    BRANDS
        .iter()
        .find(|(signature, _)| tag == signature.as_slice())
        .map_or(Capability::NotCapable, |&(_, brand)| Capability::Capable(brand))
}

/// Decides whether a byte source belongs to this pipeline and builds players
/// for the ones that do
///
/// # Example
///
/// ```no_run
/// # use zenavif_anim::{AnimatedSource, DecodeOptions, PlaybackConfig, Result, SourceDispatcher};
/// # fn open(_: Vec<u8>) -> Result<Box<dyn AnimatedSource>> { unimplemented!() }
/// let dispatcher = SourceDispatcher::new(open, PlaybackConfig::new().preheat_frames(10));
/// let mut file = std::fs::File::open("animation.avif").unwrap();
/// if let Some(mut player) = dispatcher.create(&mut file, &DecodeOptions::new()).unwrap() {
///     let _first = player.current_frame();
/// }
/// ```
pub struct SourceDispatcher<O> {
    opener: O,
    playback: PlaybackConfig,
}

impl<O: SourceOpener> SourceDispatcher<O> {
    /// Create a dispatcher around a container opener
    pub fn new(opener: O, playback: PlaybackConfig) -> Self {
        Self { opener, playback }
    }

    /// Playback settings applied to every created player
    pub fn playback(&self) -> &PlaybackConfig {
        &self.playback
    }

    /// Peek at the signature without moving the read position
    pub fn inspect<R: Read + Seek>(&self, src: &mut R) -> Result<Capability> {
        let start = src.stream_position().map_err(|e| at(Error::from(e)))?;
        let mut prefix = [0u8; SIGNATURE_PREFIX_LEN];
        let mut filled = 0;
        while filled < prefix.len() {
            match src.read(&mut prefix[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    src.seek(SeekFrom::Start(start))
                        .map_err(|e| at(Error::from(e)))?;
                    return Err(at(Error::from(e)));
                }
            }
        }
        src.seek(SeekFrom::Start(start)).map_err(|e| at(Error::from(e)))?;
        Ok(detect(&prefix[..filled]))
    }

    /// Build a player for `src`.
    ///
    /// `Ok(None)` means the source is not an AVIF container and was left
    /// untouched. Open failures are reported to the observer and returned.
    pub fn create<R: Read + Seek>(
        &self,
        src: &mut R,
        options: &DecodeOptions,
    ) -> Result<Option<Player>> {
        let brand = match self.inspect(src)? {
            Capability::Capable(brand) => brand,
            Capability::NotCapable => return Ok(None),
        };
        log::debug!("claimed {brand:?} container");

        let mut data = Vec::new();
        src.read_to_end(&mut data).map_err(|e| at(Error::from(e)))?;

        match self.build(data, options) {
            Ok(player) => Ok(Some(player)),
            Err(e) => {
                let e = e.into_inner();
                log::warn!("cannot open AVIF source: {e}");
                if let Some(observer) = &self.playback.observer {
                    observer.on_open_error(&e);
                }
                Err(at(e))
            }
        }
    }

    fn build(&self, data: Vec<u8>, options: &DecodeOptions) -> Result<Player> {
        let source = self.opener.open(data)?;
        let target = options.target_size(source.natural_size());
        let store = FrameStore::new(
            source,
            target,
            options.color_config(),
            options.scale_mode(),
            self.playback.preheat_frames,
        )?;
        Ok(Player::new(store, &self.playback, options.animation_enabled()))
    }
}

impl<O> std::fmt::Debug for SourceDispatcher<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceDispatcher")
            .field("playback", &self.playback)
            .finish()
    }
}
