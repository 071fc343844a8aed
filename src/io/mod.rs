// Purpose - external interfaces: the audio device and sample files

pub mod output;
pub mod wav;

pub use output::{AudioOutput, OutputError};
pub use wav::{decode_wav, decode_wav_reader, DecodedSample, WavError};
