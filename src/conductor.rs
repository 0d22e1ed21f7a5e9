use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{Settings, Variant};
use crate::effects::beatpulse::BeatPulse;
use crate::effects::vocalresponse::VocalResponse;
use crate::effects::LightingEffect;
use crate::intervaltimer::IntervalTimer;
use crate::olaoutput::OlaOutput;
use crate::processor::AudioProcessor;
use crate::renderstate::RenderState;

const DIAGNOSTICS_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    BeatPulse,
    VocalResponse,
}

/// Pure selection, no hysteresis: a metric hovering around the threshold
/// flips between effects on consecutive frames.
pub fn select_effect(variant: Variant, state: &RenderState, vocal_threshold: f32) -> EffectKind {
    let vocals = match variant {
        Variant::Confidence => state.vocal_confidence > vocal_threshold,
        Variant::Rainbow => state.vocals_active,
    };

    if vocals {
        EffectKind::VocalResponse
    } else {
        EffectKind::BeatPulse
    }
}

/// The render loop: drains capture blocks into the processor, applies the
/// queued detector events, runs exactly one effect over the frame buffer and
/// flushes it to the OLA output.
pub struct Conductor {
    samples: Receiver<Vec<f32>>,
    processor: AudioProcessor,
    state: RenderState,
    frame: Vec<palette::LinSrgb>,
    beat_pulse: BeatPulse,
    vocal_response: VocalResponse,
    output: OlaOutput,
    variant: Variant,
    vocal_threshold: f32,
    timer: IntervalTimer,
    shutdown: Arc<AtomicBool>,
    last_diagnostics: Instant,
}

impl Conductor {
    pub fn new(
        settings: &Settings,
        samples: Receiver<Vec<f32>>,
        output: OlaOutput,
        shutdown: Arc<AtomicBool>,
    ) -> Conductor {
        let mut processor = AudioProcessor::new();
        processor.set_auto_gain(true);

        let led_count = settings.board.layout().led_count();

        Conductor {
            samples,
            processor,
            state: RenderState::new(),
            frame: vec![palette::LinSrgb::new(0.0, 0.0, 0.0); led_count],
            beat_pulse: BeatPulse::new(),
            vocal_response: VocalResponse::new(settings.variant),
            output,
            variant: settings.variant,
            vocal_threshold: settings.vocal_threshold,
            timer: IntervalTimer::new(settings.update_rate_hz, true),
            shutdown,
            last_diagnostics: Instant::now(),
        }
    }

    pub fn run(&mut self) {
        while !self.shutdown.load(Ordering::Relaxed) {
            self.update();
            self.timer.sleep_until_next_tick();
        }

        self.output.blackout();
    }

    fn update(&mut self) {
        self.log_diagnostics();

        // Bounded drain: stops as soon as no block is queued.
        while let Ok(block) = self.samples.try_recv() {
            self.processor.update(&block);
        }

        // Events land in the state strictly before the effect reads it.
        for event in self.processor.take_events() {
            self.state.apply(event);
        }
        self.state.vocal_confidence = self.processor.vocal_confidence();

        match select_effect(self.variant, &self.state, self.vocal_threshold) {
            EffectKind::VocalResponse => self.vocal_response.step(&mut self.state, &mut self.frame),
            EffectKind::BeatPulse => self.beat_pulse.step(&mut self.state, &mut self.frame),
        }

        self.output.set_frame(&self.frame);
        self.output.flush();
    }

    fn log_diagnostics(&mut self) {
        if self.last_diagnostics.elapsed() < DIAGNOSTICS_INTERVAL {
            return;
        }
        self.last_diagnostics = Instant::now();

        log::debug!(
            "bass: {:.3} mid: {:.3} treble: {:.3}",
            self.processor.bass_level(),
            self.processor.mid_level(),
            self.processor.treble_level()
        );
        log::debug!(
            "vocals active: {} confidence: {:.3} beats: {} onsets: {}",
            self.state.vocals_active,
            self.state.vocal_confidence,
            self.state.beat_count,
            self.state.onset_count
        );
    }
}
