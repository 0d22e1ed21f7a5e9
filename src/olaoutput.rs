use std::{
    net::{SocketAddr, UdpSocket},
    str::FromStr,
};

use rosc::{encoder, OscMessage, OscPacket, OscType};

use crate::config::Layout;
use crate::matrix::MatrixMap;

// TypicalLEDStrip profile: WS2812B green and blue channels run hot.
const COLOR_CORRECTION: [u8; 3] = [255, 176, 240];

/// Ships frames to an OLA gateway, one DMX universe per physical strip.
/// Frames arrive in top-down coordinate order and are reordered into strip
/// order through the matrix map.
pub struct OlaOutput {
    sock: UdpSocket,
    target_addr: SocketAddr,
    layout: Layout,
    map: MatrixMap,
    brightness: u8,
    universes: Vec<Vec<u8>>,
}

fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * scale as u16) / 255) as u8
}

impl OlaOutput {
    pub fn new(
        target_addr: SocketAddr,
        layout: Layout,
        map: MatrixMap,
        brightness: u8,
    ) -> Result<Self, String> {
        let our_addr = SocketAddr::from_str("0.0.0.0:0").unwrap();
        let sock = match UdpSocket::bind(our_addr) {
            Ok(sock) => sock,
            Err(error) => return Err(error.to_string()),
        };

        let universes = vec![vec![0u8; layout.leds_per_strip * 3]; layout.strips];

        Ok(OlaOutput {
            sock,
            target_addr,
            layout,
            map,
            brightness,
            universes,
        })
    }

    pub fn set_frame(&mut self, frame: &[palette::LinSrgb]) {
        for y in 0..self.layout.height {
            for x in 0..self.layout.width {
                let strip_index = match self.map.index_of(x, y) {
                    Some(i) => i,
                    None => continue,
                };

                let rgb = self.to_bytes(frame[y * self.layout.width + x]);
                let universe = strip_index / self.layout.leds_per_strip;
                let offset = (strip_index % self.layout.leds_per_strip) * 3;
                self.universes[universe][offset..offset + 3].copy_from_slice(&rgb);
            }
        }
    }

    fn to_bytes(&self, pixel: palette::LinSrgb) -> [u8; 3] {
        let srgb: palette::Srgb<u8> = palette::Srgb::<u8>::from_linear(pixel);
        let channels = [srgb.red, srgb.green, srgb.blue];

        let mut bytes = [0u8; 3];
        for i in 0..3 {
            bytes[i] = scale8(scale8(channels[i], COLOR_CORRECTION[i]), self.brightness);
        }
        bytes
    }

    pub fn flush(&mut self) {
        for (universe, channels) in self.universes.iter().enumerate() {
            let msg_buf = encoder::encode(&OscPacket::Message(OscMessage {
                addr: format!("/dmx/universe/{}", universe),
                args: vec![OscType::Blob(channels.clone())],
            }))
            .unwrap();

            if let Err(err) = self.sock.send_to(&msg_buf, self.target_addr) {
                log::warn!("Failed to send universe {}: {}", universe, err);
            }
        }
    }

    pub fn blackout(&mut self) {
        for channels in &mut self.universes {
            channels.fill(0);
        }
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Board;

    fn output(layout: Layout) -> OlaOutput {
        let addr = SocketAddr::from_str("127.0.0.1:7770").unwrap();
        let map = MatrixMap::serpentine(layout.width, layout.height);
        OlaOutput::new(addr, layout, map, 255).unwrap()
    }

    #[test]
    fn scale8_endpoints() {
        assert_eq!(scale8(255, 255), 255);
        assert_eq!(scale8(255, 0), 0);
        assert_eq!(scale8(0, 255), 0);
        assert_eq!(scale8(128, 255), 128);
    }

    #[test]
    fn frame_lands_in_serpentine_strip_order() {
        let layout = Layout {
            width: 4,
            height: 2,
            strips: 2,
            leds_per_strip: 4,
        };
        let mut out = output(layout);

        // Light only coordinate (0, 1); the serpentine wiring puts it at
        // strip index 7, the last pixel of the second universe.
        let mut frame = vec![palette::LinSrgb::new(0.0, 0.0, 0.0); 8];
        frame[4] = palette::LinSrgb::new(1.0, 0.0, 0.0);
        out.set_frame(&frame);

        assert!(out.universes[0].iter().all(|&c| c == 0));
        assert_eq!(out.universes[1][9], 255);
        assert!(out.universes[1][..9].iter().all(|&c| c == 0));
    }

    #[test]
    fn brightness_and_correction_scale_the_channels() {
        let layout = Board::Small.layout();
        let map = MatrixMap::serpentine(layout.width, layout.height);
        let addr = SocketAddr::from_str("127.0.0.1:7770").unwrap();
        let mut out = OlaOutput::new(addr, layout, map, 128).unwrap();

        let frame = vec![palette::LinSrgb::new(1.0, 1.0, 1.0); layout.led_count()];
        out.set_frame(&frame);

        let expected = [
            scale8(COLOR_CORRECTION[0], 128),
            scale8(COLOR_CORRECTION[1], 128),
            scale8(COLOR_CORRECTION[2], 128),
        ];
        assert_eq!(&out.universes[0][..3], &expected);
    }

    #[test]
    fn blackout_clears_every_universe() {
        let layout = Board::Big.layout();
        let mut out = output(layout);

        let frame = vec![palette::LinSrgb::new(0.5, 0.5, 0.5); layout.led_count()];
        out.set_frame(&frame);
        out.blackout();

        for channels in &out.universes {
            assert!(channels.iter().all(|&c| c == 0));
        }
    }
}
