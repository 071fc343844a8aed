//! Synthesized drum kit.
//!
//! Each drum is a one-shot voice whose length scales with tempo, so hits
//! stay tight at fast tempos and ring out at slow ones. `Drum` ties them to
//! the [`Instrument`] interface so the registry can build them by id.
//!
//! # Example
//!
//! ```ignore
//! use tunkul::{synth::InstrumentRegistry, voices};
//!
//! let registry = InstrumentRegistry::with_builtin_drums();
//! let voice = registry.new_voice("kick", 120, 44_100);
//!
//! // Or build a hit directly
//! let snare = voices::snare(120, 44_100);
//! ```

mod clap;
mod hihat;
mod kick;
mod snare;
mod tom;

pub use clap::{clap, ClapVoice};
pub use hihat::{hihat, HiHatVoice};
pub use kick::{kick, KickVoice};
pub use snare::{snare, SnareVoice};
pub use tom::{tom, TomVoice};

use crate::synth::{factory::Instrument, voice::Voice};

/// The built-in drums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Drum {
    Snare,
    Kick,
    HiHat,
    Clap,
    Tom,
}

impl Drum {
    /// Registration order of the built-in kit
    pub const ALL: [Drum; 5] = [Drum::Snare, Drum::Kick, Drum::HiHat, Drum::Clap, Drum::Tom];

    /// Registry id
    pub fn id(self) -> &'static str {
        match self {
            Drum::Snare => "snare",
            Drum::Kick => "kick",
            Drum::HiHat => "hihat",
            Drum::Clap => "clap",
            Drum::Tom => "tom",
        }
    }

    pub fn from_id(id: &str) -> Option<Drum> {
        Drum::ALL.into_iter().find(|d| d.id() == id)
    }
}

impl Instrument for Drum {
    fn new_voice(&self, bpm: u32, sample_rate: u32) -> Box<dyn Voice> {
        match self {
            Drum::Snare => Box::new(snare(bpm, sample_rate)),
            Drum::Kick => Box::new(kick(bpm, sample_rate)),
            Drum::HiHat => Box::new(hihat(bpm, sample_rate)),
            Drum::Clap => Box::new(clap(bpm, sample_rate)),
            Drum::Tom => Box::new(tom(bpm, sample_rate)),
        }
    }
}
