use crate::effects::{fill_solid, hsv_color, LightingEffect};
use crate::renderstate::RenderState;

const DECAY_FACTOR: f32 = 0.85;
const DECAY_FLOOR: u8 = 10;

/// Fast attack, smooth release: a beat event snaps the brightness to 255,
/// every rendered frame multiplies it back down until it hits the floor.
pub struct BeatPulse;

impl BeatPulse {
    pub fn new() -> BeatPulse {
        BeatPulse
    }
}

impl LightingEffect for BeatPulse {
    fn step(&mut self, state: &mut RenderState, frame: &mut [palette::LinSrgb]) {
        let color = hsv_color(state.hue, 1.0, state.beat_brightness);
        fill_solid(frame, color);

        if state.beat_brightness > DECAY_FLOOR {
            state.beat_brightness = (state.beat_brightness as f32 * DECAY_FACTOR) as u8;
        } else {
            state.beat_brightness = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(len: usize) -> Vec<palette::LinSrgb> {
        vec![palette::LinSrgb::new(0.3, 0.3, 0.3); len]
    }

    #[test]
    fn brightness_decays_every_step() {
        let mut effect = BeatPulse::new();
        let mut state = RenderState::new();
        let mut buffer = frame(16);

        state.beat_brightness = 255;
        effect.step(&mut state, &mut buffer);
        assert_eq!(state.beat_brightness, 216);

        let before = state.beat_brightness;
        effect.step(&mut state, &mut buffer);
        assert!(state.beat_brightness <= before - 1);
    }

    #[test]
    fn floor_snaps_to_zero() {
        let mut effect = BeatPulse::new();
        let mut state = RenderState::new();
        let mut buffer = frame(16);

        for brightness in [10u8, 7, 1, 0] {
            state.beat_brightness = brightness;
            effect.step(&mut state, &mut buffer);
            assert_eq!(state.beat_brightness, 0);
        }
    }

    #[test]
    fn full_pulse_dies_out_in_bounded_steps() {
        let mut effect = BeatPulse::new();
        let mut state = RenderState::new();
        let mut buffer = frame(16);

        state.beat_brightness = 255;
        let mut steps = 0;
        while state.beat_brightness > 0 {
            effect.step(&mut state, &mut buffer);
            steps += 1;
            assert!(steps <= 30, "pulse never died out");
        }
    }

    #[test]
    fn frame_is_fully_overwritten() {
        let mut effect = BeatPulse::new();
        let mut state = RenderState::new();
        let mut buffer = frame(16);

        state.beat_brightness = 0;
        effect.step(&mut state, &mut buffer);
        let black = palette::LinSrgb::new(0.0, 0.0, 0.0);
        assert!(buffer.iter().all(|&p| p == black));
    }
}
