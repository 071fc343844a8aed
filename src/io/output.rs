//! Audio device output using cpal.
//!
//! Opens the default output device and lets its callback pull frames from
//! the facade's mixer. While an `AudioOutput` is alive the facade is live;
//! dropping it stops the stream and the facade goes silent again.

use std::fmt;
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{error, info, warn};

use crate::mixer::{Audio, Mixer};

#[derive(Debug)]
pub enum OutputError {
    NoDevice,
    Config(cpal::DefaultStreamConfigError),
    Build(cpal::BuildStreamError),
    Play(cpal::PlayStreamError),
    UnsupportedFormat(cpal::SampleFormat),
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDevice => write!(f, "no audio output device found"),
            Self::Config(e) => write!(f, "could not query output config: {}", e),
            Self::Build(e) => write!(f, "could not build output stream: {}", e),
            Self::Play(e) => write!(f, "could not start output stream: {}", e),
            Self::UnsupportedFormat(format) => {
                write!(f, "unsupported output sample format: {:?}", format)
            }
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Build(e) => Some(e),
            Self::Play(e) => Some(e),
            Self::NoDevice | Self::UnsupportedFormat(_) => None,
        }
    }
}

impl From<cpal::DefaultStreamConfigError> for OutputError {
    fn from(e: cpal::DefaultStreamConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<cpal::BuildStreamError> for OutputError {
    fn from(e: cpal::BuildStreamError) -> Self {
        Self::Build(e)
    }
}

impl From<cpal::PlayStreamError> for OutputError {
    fn from(e: cpal::PlayStreamError) -> Self {
        Self::Play(e)
    }
}

/// A running output stream feeding the default device from an [`Audio`].
pub struct AudioOutput {
    audio: Arc<Audio>,
    channels: u16,
    _stream: cpal::Stream,
}

impl AudioOutput {
    /// Sample rate the default device prefers, if there is a device.
    ///
    /// Build the [`Audio`] facade with this rate to avoid resampling.
    pub fn default_sample_rate() -> Result<u32, OutputError> {
        let device = cpal::default_host()
            .default_output_device()
            .ok_or(OutputError::NoDevice)?;
        Ok(device.default_output_config()?.sample_rate().0)
    }

    pub fn open(audio: Arc<Audio>) -> Result<Self, OutputError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(OutputError::NoDevice)?;
        info!(
            host = ?host.id(),
            device = %device.name().unwrap_or_else(|_| "unknown".into()),
            "audio device"
        );

        let supported = device.default_output_config()?;
        let sample_format = supported.sample_format();
        let mut config: cpal::StreamConfig = supported.into();
        // The mixer renders at the facade's rate
        config.sample_rate = cpal::SampleRate(audio.sample_rate());

        let mixer = audio.mixer().clone();
        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, mixer)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, mixer)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, mixer)?,
            other => return Err(OutputError::UnsupportedFormat(other)),
        };
        stream.play()?;

        info!(
            sample_rate = config.sample_rate.0,
            channels = config.channels,
            format = ?sample_format,
            "audio stream started"
        );
        audio.set_live(true);

        Ok(Self {
            audio,
            channels: config.channels,
            _stream: stream,
        })
    }

    /// Open the default device, or leave `audio` silent if that fails.
    pub fn open_or_silent(audio: Arc<Audio>) -> Option<Self> {
        match Self::open(audio) {
            Ok(output) => Some(output),
            Err(e) => {
                warn!(error = %e, "audio unavailable, running silent");
                None
            }
        }
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        self.audio.set_live(false);
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mixer: Mixer,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;
    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            mixer.render_block(data, channels);
        },
        |err| error!("audio stream error: {}", err),
        None,
    )
}
