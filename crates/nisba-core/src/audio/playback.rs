//! rodio output, enabled with the `playback` feature.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::rc::Rc;

use rodio::buffer::SamplesBuffer;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use super::sink::{AmbientBackend, AudioSink};
use super::synth::Clip;
use crate::error::AudioError;

/// Open the default output device once and split it into a cue sink and an
/// ambient loop player sharing the same stream.
pub fn open() -> Result<(RodioCueSink, RodioAmbient), AudioError> {
    let (stream, handle) =
        OutputStream::try_default().map_err(|e| AudioError::Unavailable(e.to_string()))?;
    let stream = Rc::new(stream);
    Ok((
        RodioCueSink {
            _stream: Rc::clone(&stream),
            handle: handle.clone(),
        },
        RodioAmbient {
            _stream: stream,
            handle,
            sink: None,
        },
    ))
}

pub struct RodioCueSink {
    // The stream must outlive every sink created from its handle.
    _stream: Rc<OutputStream>,
    handle: OutputStreamHandle,
}

impl AudioSink for RodioCueSink {
    fn play(&mut self, clip: Clip) -> Result<(), AudioError> {
        let sink =
            Sink::try_new(&self.handle).map_err(|e| AudioError::Unavailable(e.to_string()))?;
        sink.append(SamplesBuffer::new(1, clip.sample_rate, clip.samples));
        // Detached sinks play to the end and free themselves.
        sink.detach();
        Ok(())
    }
}

pub struct RodioAmbient {
    _stream: Rc<OutputStream>,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
}

impl AmbientBackend for RodioAmbient {
    fn play_loop(&mut self, path: &Path, volume: f32) -> Result<(), AudioError> {
        self.stop();
        let asset_err = |message: String| AudioError::Asset {
            path: path.to_path_buf(),
            message,
        };
        let file = File::open(path).map_err(|e| asset_err(e.to_string()))?;
        let source = Decoder::new(BufReader::new(file)).map_err(|e| asset_err(e.to_string()))?;
        let sink =
            Sink::try_new(&self.handle).map_err(|e| AudioError::Unavailable(e.to_string()))?;
        sink.set_volume(volume);
        sink.append(source.repeat_infinite());
        self.sink = Some(sink);
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}
