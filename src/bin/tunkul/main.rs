//! tunkul - graph-driven drum machine
//!
//! Run with: cargo run -- [bpm] [seconds]
//!
//! Plays a small demo graph through the default audio device. Without a
//! device it keeps sequencing silently, so the log still shows the beats.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use color_eyre::eyre::{eyre, Result, WrapErr};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tunkul::{
    engine::{DrumRow, DrumRows, Engine, EngineConfig, Transport},
    graph::{GridPos, PatternGraph},
    io::AudioOutput,
    mixer::Audio,
    DEFAULT_SAMPLE_RATE,
};

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let bpm = match args.next() {
        Some(arg) => arg.parse::<i32>().wrap_err_with(|| format!("invalid bpm: {arg}"))?,
        None => 120,
    };
    let seconds = match args.next() {
        Some(arg) => Some(arg.parse::<u64>().wrap_err_with(|| format!("invalid duration: {arg}"))?),
        None => None,
    };

    let sample_rate = AudioOutput::default_sample_rate().unwrap_or(DEFAULT_SAMPLE_RATE);
    let config = EngineConfig::default()
        .with_bpm(bpm)
        .with_beat_length(8)
        .with_sample_rate(sample_rate);

    let mut engine = Engine::new(config);
    engine.with_session(|session| build_demo(&mut session.graph, &mut session.rows))?;
    engine.spawn().wrap_err("failed to start ticker thread")?;

    let audio = Arc::new(Audio::new(sample_rate));
    let output = AudioOutput::open_or_silent(Arc::clone(&audio));

    println!("=== tunkul ===");
    println!("BPM: {}", bpm);
    println!("Sample rate: {} Hz", sample_rate);
    match &output {
        Some(output) => println!("Output: {} channels", output.channels()),
        None => println!("Output: none, running silent"),
    }
    println!("Instruments: {}", audio.instruments().join(", "));
    println!("Playing... Press Ctrl+C to stop");

    let mut transport = Transport::new(engine, audio);
    let tick = transport.engine().config().tick_interval();
    transport.play();

    let began = Instant::now();
    while seconds.map_or(true, |s| began.elapsed() < Duration::from_secs(s)) {
        transport.pump();
        thread::sleep(tick);
    }

    transport.stop();
    info!("done");
    Ok(())
}

/// A zig-zag walk for the snare, a four-on-the-floor loop for the kick and
/// a straight line of hats.
fn build_demo(graph: &mut PatternGraph, rows: &mut DrumRows) -> Result<()> {
    let start = graph.add_node(GridPos::new(0, 0));
    let a = graph.add_node(GridPos::new(2, 1));
    let b = graph.add_node(GridPos::new(3, 3));
    graph.connect(start, a)?;
    graph.connect(a, b)?;
    graph.set_start_node(start)?;

    let kicks: Vec<_> = (0..4)
        .map(|i| graph.add_node(GridPos::new(i * 2, 6)))
        .collect();
    for pair in kicks.windows(2) {
        graph.connect(pair[0], pair[1])?;
    }
    graph.connect(kicks[3], kicks[0])?;

    let hats: Vec<_> = (0..8)
        .map(|i| graph.add_node(GridPos::new(i, 9)))
        .collect();
    for pair in hats.windows(2) {
        graph.connect(pair[0], pair[1])?;
    }

    rows.row_mut(0)
        .ok_or_else(|| eyre!("missing first row"))?
        .volume = 0.8;
    rows.add_row(DrumRow::new("kick").with_origin(kicks[0]));
    rows.add_row(DrumRow::new("hihat").with_origin(hats[0]).with_volume(0.4));
    Ok(())
}
