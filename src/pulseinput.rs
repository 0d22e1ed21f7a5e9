extern crate pulse_simple;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{SyncSender, TrySendError};
use std::sync::Arc;

use pulse_simple::Record;

pub const SAMPLE_QUEUE_DEPTH: usize = 32;
const SAMPLE_RATE: u32 = 44100;
const BLOCK_SIZE: usize = 256;

/// Pulls mono capture blocks from PulseAudio and forwards them through a
/// bounded channel, so the render loop drains without ever blocking on the
/// device.
pub struct PulseInput {
    pulse: Record<[f32; 1]>,
    buffer: Vec<[f32; 1]>,
    samples: SyncSender<Vec<f32>>,
    shutdown: Arc<AtomicBool>,
}

// Record holds a raw pa_simple pointer which is !Send, but it is only ever
// used from the single capture thread the PulseInput moves to.
unsafe impl Send for PulseInput {}

impl PulseInput {
    pub fn new(
        device: Option<&str>,
        samples: SyncSender<Vec<f32>>,
        shutdown: Arc<AtomicBool>,
    ) -> Result<Self, String> {
        if let Some(device) = device {
            if device.is_empty() {
                return Err("Empty PulseAudio device name".to_string());
            }
        }

        let pulse = Record::new("taktlicht", "Live audio analyzer", device, SAMPLE_RATE);

        // Pre-filling is necessary according to pulse_simple example
        let mut buffer = Vec::with_capacity(BLOCK_SIZE);
        for _ in 0..buffer.capacity() {
            buffer.push([0.0]);
        }

        Ok(PulseInput {
            pulse,
            buffer,
            samples,
            shutdown,
        })
    }

    pub fn run(&mut self) {
        loop {
            self.pulse.read(&mut self.buffer[..]);

            let block: Vec<f32> = self.buffer.iter().map(|v| v[0]).collect();
            match self.samples.try_send(block) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    log::trace!("Sample queue full, dropping a block")
                }
                Err(TrySendError::Disconnected(_)) => break,
            }

            if self.shutdown.load(Ordering::Relaxed) {
                break;
            }
        }
    }
}
