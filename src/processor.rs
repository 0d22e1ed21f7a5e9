use std::collections::VecDeque;

use dft::{Operation, Plan};

const SAMPLE_RATE: f32 = 44100.0;
const WINDOW_SIZE: usize = 1024;
const HOP_SIZE: usize = 512;

const BASS_BAND_HZ: (f32, f32) = (40.0, 250.0);
const MID_BAND_HZ: (f32, f32) = (250.0, 2000.0);
const TREBLE_BAND_HZ: (f32, f32) = (2000.0, 8000.0);

const PEAK_FALLOFF: f32 = 0.9;
const BEAT_GATE: f32 = 0.5;
// ~116 ms between beats at 44.1 kHz with 512-sample hops
const BEAT_REFRACTORY_PASSES: u64 = 10;

const VOCAL_ON_THRESHOLD: f32 = 0.55;
const VOCAL_OFF_THRESHOLD: f32 = 0.35;
const SILENCE_FLOOR: f32 = 1e-6;

const GAIN_FALLOFF: f32 = 0.995;
const GAIN_FLOOR: f32 = 1e-3;
const FIXED_GAIN: f32 = 8.0;

const MAX_QUEUED_EVENTS: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioEvent {
    Beat,
    VocalStart,
    VocalEnd,
}

/// Sliding-window DFT analysis over the incoming sample stream: band levels,
/// a rising-peak beat detector on the bass band and a mid-band ratio as the
/// vocal confidence estimate.
///
/// Detector events are queued here and drained by the conductor, so they are
/// always applied on the render thread before the frame is drawn.
pub struct AudioProcessor {
    plan: Plan<f32>,
    window: VecDeque<f32>,
    pending: usize,
    passes: u64,

    auto_gain: bool,
    gain_peak: f32,

    bass: f32,
    mid: f32,
    treble: f32,
    confidence: f32,

    bass_peak: f32,
    last_beat_pass: Option<u64>,
    vocals_active: bool,

    events: VecDeque<AudioEvent>,
}

impl AudioProcessor {
    pub fn new() -> AudioProcessor {
        AudioProcessor {
            plan: Plan::<f32>::new(Operation::Forward, WINDOW_SIZE),
            window: VecDeque::with_capacity(WINDOW_SIZE),
            pending: 0,
            passes: 0,
            auto_gain: false,
            gain_peak: GAIN_FLOOR,
            bass: 0.0,
            mid: 0.0,
            treble: 0.0,
            confidence: 0.0,
            bass_peak: 0.0,
            last_beat_pass: None,
            vocals_active: false,
            events: VecDeque::new(),
        }
    }

    pub fn set_auto_gain(&mut self, enabled: bool) {
        self.auto_gain = enabled;
    }

    pub fn bass_level(&self) -> f32 {
        self.bass
    }

    pub fn mid_level(&self) -> f32 {
        self.mid
    }

    pub fn treble_level(&self) -> f32 {
        self.treble
    }

    pub fn vocal_confidence(&self) -> f32 {
        self.confidence
    }

    pub fn take_events(&mut self) -> Vec<AudioEvent> {
        self.events.drain(..).collect()
    }

    pub fn update(&mut self, block: &[f32]) {
        for &sample in block {
            if self.window.len() == WINDOW_SIZE {
                self.window.pop_front();
            }
            self.window.push_back(sample);
            self.pending += 1;

            if self.window.len() == WINDOW_SIZE && self.pending >= HOP_SIZE {
                self.pending = 0;
                self.analyze();
            }
        }
    }

    fn analyze(&mut self) {
        self.passes += 1;

        let mut dft_io_data: Vec<f32> = self.window.iter().copied().collect();
        dft::transform(&mut dft_io_data, &self.plan);

        // Normalize results
        // https://dsp.stackexchange.com/questions/11376/why-are-magnitudes-normalised-during-synthesis-idft-not-analysis-dft
        let scale_factor = 1.0 / (WINDOW_SIZE as f32);
        let magnitudes: Vec<f32> = dft::unpack(&dft_io_data)
            .iter()
            .take(WINDOW_SIZE / 2)
            .map(|c| c.norm() * scale_factor)
            .collect();

        let raw_bass = band_mean(&magnitudes, BASS_BAND_HZ);
        let raw_mid = band_mean(&magnitudes, MID_BAND_HZ);
        let raw_treble = band_mean(&magnitudes, TREBLE_BAND_HZ);

        let gain = if self.auto_gain {
            let raw_max = raw_bass.max(raw_mid).max(raw_treble);
            self.gain_peak = (self.gain_peak * GAIN_FALLOFF).max(raw_max).max(GAIN_FLOOR);
            1.0 / self.gain_peak
        } else {
            FIXED_GAIN
        };

        self.bass = (raw_bass * gain).clamp(0.0, 1.0);
        self.mid = (raw_mid * gain).clamp(0.0, 1.0);
        self.treble = (raw_treble * gain).clamp(0.0, 1.0);

        self.detect_beat();
        self.update_confidence(raw_bass, raw_mid, raw_treble);
    }

    fn detect_beat(&mut self) {
        let refractory_over = match self.last_beat_pass {
            Some(pass) => self.passes - pass >= BEAT_REFRACTORY_PASSES,
            None => true,
        };

        if self.bass > BEAT_GATE && self.bass >= self.bass_peak && refractory_over {
            self.last_beat_pass = Some(self.passes);
            self.push_event(AudioEvent::Beat);
        }

        self.bass_peak = self.bass_peak.max(self.bass) * PEAK_FALLOFF;
    }

    fn update_confidence(&mut self, raw_bass: f32, raw_mid: f32, raw_treble: f32) {
        let total = raw_bass + raw_mid + raw_treble;
        self.confidence = if total > SILENCE_FLOOR {
            raw_mid / total
        } else {
            0.0
        };

        if !self.vocals_active && self.confidence > VOCAL_ON_THRESHOLD {
            self.vocals_active = true;
            self.push_event(AudioEvent::VocalStart);
        } else if self.vocals_active && self.confidence < VOCAL_OFF_THRESHOLD {
            self.vocals_active = false;
            self.push_event(AudioEvent::VocalEnd);
        }
    }

    fn push_event(&mut self, event: AudioEvent) {
        if self.events.len() == MAX_QUEUED_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

fn band_mean(magnitudes: &[f32], band_hz: (f32, f32)) -> f32 {
    let freq_step = SAMPLE_RATE / WINDOW_SIZE as f32;
    let lo = (band_hz.0 / freq_step).ceil() as usize;
    let hi = ((band_hz.1 / freq_step).floor() as usize).min(magnitudes.len() - 1);
    if hi < lo {
        return 0.0;
    }

    let sum: f32 = magnitudes[lo..=hi].iter().sum();
    sum / (hi - lo + 1) as f32
}
