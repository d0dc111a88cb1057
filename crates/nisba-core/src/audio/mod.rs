//! Procedural sound cues and ambient playback.
//!
//! Cues are synthesized from small note tables into mono PCM [`Clip`]s and
//! handed to an [`AudioSink`]. Ambient loops go through an
//! [`AmbientBackend`]. Both seams default to silent stand-ins when no
//! output device exists.

mod ambient;
mod cue;
mod effects;
mod envelope;
mod filter;
#[cfg(feature = "playback")]
mod playback;
mod sink;
mod synth;

pub use ambient::{AmbientPlayer, AmbientSound};
pub use cue::{Cue, Voice};
pub use effects::{SoundEffects, DEFAULT_VOLUME};
pub use envelope::{Envelope, SILENCE_FLOOR};
pub use filter::{Biquad, LowPass};
pub use sink::{default_output, AmbientBackend, AudioSink, NullSink};
pub use synth::{render, Clip, DEFAULT_SAMPLE_RATE};
