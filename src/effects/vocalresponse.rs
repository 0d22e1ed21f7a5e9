use crate::config::Variant;
use crate::effects::{fill_rainbow, fill_solid, hsv_color, LightingEffect};
use crate::renderstate::RenderState;

const CONFIDENCE_CEILING: f32 = 0.7;
const RAINBOW_HUE_STEP: u8 = 7;

pub struct VocalResponse {
    variant: Variant,
}

impl VocalResponse {
    pub fn new(variant: Variant) -> VocalResponse {
        VocalResponse { variant }
    }
}

/// Confidence rarely exceeds ~0.7 in practice, so that is mapped to full
/// brightness and anything above clamps.
pub(crate) fn scale_confidence(confidence: f32) -> u8 {
    ((confidence / CONFIDENCE_CEILING).clamp(0.0, 1.0) * 255.0) as u8
}

impl LightingEffect for VocalResponse {
    fn step(&mut self, state: &mut RenderState, frame: &mut [palette::LinSrgb]) {
        match self.variant {
            Variant::Confidence => {
                let value = scale_confidence(state.vocal_confidence);
                fill_solid(frame, hsv_color(0, 1.0, value));
            }
            Variant::Rainbow => {
                let value = (state.vocal_confidence.clamp(0.0, 1.0) * 255.0) as u8;
                fill_solid(frame, hsv_color(state.hue, 1.0, value));
                fill_rainbow(frame, state.hue, RAINBOW_HUE_STEP, value);
                state.hue = state.hue.wrapping_add(1);
            }
        }
    }
}
