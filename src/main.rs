pub(crate) mod conductor;
pub(crate) mod config;
pub(crate) mod effects;
pub(crate) mod intervaltimer;
pub(crate) mod matrix;
pub(crate) mod olaoutput;
pub(crate) mod processor;
pub(crate) mod pulseinput;
pub(crate) mod renderstate;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use clap::Parser;
use config_file::FromConfigFile;

use crate::conductor::Conductor;
use crate::config::Settings;
use crate::matrix::MatrixMap;
use crate::olaoutput::OlaOutput;
use crate::pulseinput::{PulseInput, SAMPLE_QUEUE_DEPTH};

#[derive(Parser)]
struct Cli {
    /// Path to the settings file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<std::path::PathBuf>,

    /// The PulseAudio device to listen on
    #[arg(short, long, value_name = "DEVICE")]
    pa_device: Option<String>,
}

fn main() {
    env_logger::init();
    let args = Cli::parse();

    let settings = match args.config.as_deref() {
        Some(path) => match Settings::from_config_file(path) {
            Ok(settings) => settings,
            Err(err) => panic!("Cannot read settings from {}: {}", path.display(), err),
        },
        None => Settings::default(),
    };

    let layout = settings.board.layout();
    let map = MatrixMap::serpentine(layout.width, layout.height);

    let ola_addr = match SocketAddr::from_str(&settings.ola_addr) {
        Ok(addr) => addr,
        Err(err) => panic!("Invalid OLA address {}: {}", settings.ola_addr, err),
    };
    let ola = match OlaOutput::new(ola_addr, layout, map, settings.master_brightness) {
        Ok(ola) => ola,
        Err(msg) => panic!("Cannot set up OLA output: {}", msg),
    };

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        if let Err(err) = ctrlc::set_handler(move || shutdown.store(true, Ordering::Relaxed)) {
            panic!("Cannot install signal handler: {}", err);
        }
    }

    let (sample_tx, sample_rx) = mpsc::sync_channel(SAMPLE_QUEUE_DEPTH);
    let mut input = match PulseInput::new(
        args.pa_device.as_deref(),
        sample_tx,
        Arc::clone(&shutdown),
    ) {
        Ok(input) => input,
        Err(msg) => panic!("Cannot set up audio source: {}", msg),
    };

    let res = thread::Builder::new()
        .name("PulseInput".to_string())
        .spawn(move || {
            input.run();
        });
    if let Err(error) = res {
        panic!("Failed to create thread: {}", error);
    }

    let mut conductor = Conductor::new(&settings, sample_rx, ola, shutdown);
    conductor.run();
}
