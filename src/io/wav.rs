//! WAV decoding for sample-backed instruments.
//!
//! Files are decoded once into mono `f32` in [-1, 1]; playback then only
//! walks the shared buffer.

use std::io::Read;
use std::path::Path;

use hound::{SampleFormat, WavReader};
use tracing::debug;

/// A decoded, mono sample buffer and the rate it was recorded at
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSample {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Errors that can occur when loading a sample
#[derive(Debug)]
pub enum WavError {
    /// The file could not be read or is not a valid WAV
    Decode(hound::Error),
    /// The file decoded to zero frames
    Empty,
    /// The file's rate differs from the engine's output rate
    SampleRateMismatch { expected: u32, actual: u32 },
}

impl std::fmt::Display for WavError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WavError::Decode(err) => write!(f, "failed to decode wav: {}", err),
            WavError::Empty => write!(f, "wav contains no frames"),
            WavError::SampleRateMismatch { expected, actual } => {
                write!(f, "expected {}Hz wav, got {}Hz", expected, actual)
            }
        }
    }
}

impl std::error::Error for WavError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WavError::Decode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<hound::Error> for WavError {
    fn from(err: hound::Error) -> Self {
        WavError::Decode(err)
    }
}

/// Decode a WAV file from disk
pub fn decode_wav(path: impl AsRef<Path>) -> Result<DecodedSample, WavError> {
    let path = path.as_ref();
    let reader = WavReader::open(path)?;
    let decoded = decode(reader)?;
    debug!(
        path = %path.display(),
        frames = decoded.samples.len(),
        sample_rate = decoded.sample_rate,
        "decoded wav"
    );
    Ok(decoded)
}

/// Decode a WAV stream (in-memory buffers, uploads)
pub fn decode_wav_reader<R: Read>(reader: R) -> Result<DecodedSample, WavError> {
    decode(WavReader::new(reader)?)
}

fn decode<R: Read>(mut reader: WavReader<R>) -> Result<DecodedSample, WavError> {
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            // Full scale for an n-bit signed integer is 2^(n-1)
            let scale = 1.0 / (1u64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()?
        }
    };

    // Mix down to mono by averaging each frame
    let channels = spec.channels.max(1) as usize;
    let samples: Vec<f32> = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect();

    if samples.is_empty() {
        return Err(WavError::Empty);
    }

    Ok(DecodedSample {
        samples,
        sample_rate: spec.sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};
    use std::io::Cursor;

    fn write_wav(spec: WavSpec, frames: &[i16]) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut bytes, spec).unwrap();
            for &s in frames {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        bytes.into_inner()
    }

    #[test]
    fn decodes_sixteen_bit_mono() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let bytes = write_wav(spec, &[0, 16_384, -32_768]);

        let decoded = decode_wav_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(decoded.sample_rate, 44_100);
        assert_eq!(decoded.samples, vec![0.0, 0.5, -1.0]);
    }

    #[test]
    fn mixes_stereo_down_to_mono() {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 48_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let bytes = write_wav(spec, &[16_384, 0, -16_384, -16_384]);

        let decoded = decode_wav_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(decoded.samples, vec![0.25, -0.5]);
    }

    #[test]
    fn empty_wav_is_rejected() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let bytes = write_wav(spec, &[]);
        assert!(matches!(
            decode_wav_reader(Cursor::new(bytes)),
            Err(WavError::Empty)
        ));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let result = decode_wav_reader(Cursor::new(b"not a wav file".to_vec()));
        assert!(matches!(result, Err(WavError::Decode(_))));
    }
}
