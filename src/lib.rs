pub mod dsp; // Noise, filters and sweeps used by the drum voices
#[cfg(feature = "rtrb")]
pub mod engine; // Ticker thread, drum rows and transport glue
pub mod graph; // Node graph and beat-row resolver
pub mod io; // Audio device output and WAV decoding
pub mod mixer; // Realtime voice mixing
pub mod sequencing; // Step scheduling against wall-clock time
pub mod synth; // Voices, instruments and the registry
pub mod voices; // Synthesized drum kit

/// Sample rate used when no output device dictates one.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Maximum number of frames mixed per lock acquisition.
pub const MIX_CHUNK_FRAMES: usize = 256;
