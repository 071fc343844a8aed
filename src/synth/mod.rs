// Purpose: Voices, instruments and the registry that maps ids to them
// This layer sits between the mixer (which pulls samples) and the drum kit

pub mod factory;
pub mod registry;
pub mod voice;

pub use factory::{Instrument, SampleInstrument};
pub use registry::InstrumentRegistry;
pub use voice::{Gain, SampleVoice, Voice};
