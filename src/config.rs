use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Board {
    /// 22x22 matrix on a single data line
    Small,
    /// 32x48 matrix split over three data lines
    Big,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Flat red fill scaled by vocal confidence
    Confidence,
    /// Rotating rainbow with the live vocal level as brightness
    Rainbow,
}

#[derive(Clone, Copy, Debug)]
pub struct Layout {
    pub width: usize,
    pub height: usize,
    pub strips: usize,
    pub leds_per_strip: usize,
}

impl Board {
    pub fn layout(&self) -> Layout {
        match self {
            Board::Small => Layout {
                width: 22,
                height: 22,
                strips: 1,
                leds_per_strip: 484,
            },
            Board::Big => Layout {
                width: 48,
                height: 32,
                strips: 3,
                leds_per_strip: 512,
            },
        }
    }
}

impl Layout {
    pub fn led_count(&self) -> usize {
        self.width * self.height
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub board: Board,
    pub variant: Variant,
    pub vocal_threshold: f32,
    pub master_brightness: u8,
    pub ola_addr: String,
    pub update_rate_hz: f32,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            board: Board::Small,
            variant: Variant::Confidence,
            vocal_threshold: 0.05,
            master_brightness: 75,
            ola_addr: "127.0.0.1:7770".to_string(),
            update_rate_hz: 60.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_cover_all_pixels() {
        let small = Board::Small.layout();
        assert_eq!(small.led_count(), 484);
        assert_eq!(small.strips * small.leds_per_strip, small.led_count());

        let big = Board::Big.layout();
        assert_eq!(big.led_count(), 1536);
        assert_eq!(big.strips * big.leds_per_strip, big.led_count());
    }

    #[test]
    fn default_settings_match_hardware_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.board, Board::Small);
        assert_eq!(settings.master_brightness, 75);
        assert!(settings.vocal_threshold > 0.0);
    }
}
