pub(crate) mod beatpulse;
pub(crate) mod vocalresponse;

use palette::FromColor;

use crate::renderstate::RenderState;

pub trait LightingEffect {
    /// Fully overwrites `frame`; stale pixels never survive a step.
    fn step(&mut self, state: &mut RenderState, frame: &mut [palette::LinSrgb]);
}

/// FastLED-style color wheel: the hue byte wraps around the full circle.
pub(crate) fn hsv_color(hue: u8, saturation: f32, value: u8) -> palette::LinSrgb {
    let hsv = palette::Hsv::new(
        hue as f32 / 256.0 * 360.0,
        saturation,
        value as f32 / 255.0,
    );
    palette::Srgb::from_color(hsv).into_linear()
}

pub(crate) fn fill_solid(frame: &mut [palette::LinSrgb], color: palette::LinSrgb) {
    frame.fill(color);
}

pub(crate) fn fill_rainbow(
    frame: &mut [palette::LinSrgb],
    start_hue: u8,
    hue_step: u8,
    value: u8,
) {
    for (i, pixel) in frame.iter_mut().enumerate() {
        let hue = start_hue.wrapping_add((i * hue_step as usize) as u8);
        *pixel = hsv_color(hue, 1.0, value);
    }
}
