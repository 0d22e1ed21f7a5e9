use std::time::Instant;

use crate::processor::AudioEvent;

/// All mutable state shared between the audio events and the effects. Owned
/// by the conductor and handed to whichever effect renders the frame.
pub struct RenderState {
    pub hue: u8,
    pub beat_brightness: u8,
    pub vocals_active: bool,
    pub vocal_confidence: f32,
    pub beat_count: u32,
    pub onset_count: u32,
    pub last_beat: Option<Instant>,
}

impl RenderState {
    pub fn new() -> RenderState {
        RenderState {
            hue: 0,
            beat_brightness: 0,
            vocals_active: false,
            vocal_confidence: 0.0,
            beat_count: 0,
            onset_count: 0,
            last_beat: None,
        }
    }

    pub fn apply(&mut self, event: AudioEvent) {
        match event {
            AudioEvent::Beat => {
                self.beat_count += 1;
                self.onset_count += 1;
                self.last_beat = Some(Instant::now());
                self.beat_brightness = 255;
                log::debug!("beat #{}", self.beat_count);
            }
            AudioEvent::VocalStart => self.vocals_active = true,
            AudioEvent::VocalEnd => self.vocals_active = false,
        }
    }
}
