use image::Rgba;

pub(crate) struct Colours {
    pub background: Rgba<u8>,
    pub header: Rgba<u8>,
    pub title: Rgba<u8>,
    pub text: Rgba<u8>,
    pub axis: Rgba<u8>,
    pub table: Rgba<u8>,
    pub checkbox: Rgba<u8>,
}

impl Default for Colours {
    fn default() -> Self {
        Self {
            background: Rgba([0, 0, 0, 255]),
            header: Rgba([114, 159, 207, 255]),   // Steel blue - dashboard header
            title: Rgba([237, 212, 0, 255]),      // Golden yellow - device headers
            text: Rgba([238, 238, 236, 255]),     // Off-white - plain readings
            axis: Rgba([0, 188, 212, 255]),       // Cyan - X/Y/Z lines
            table: Rgba([186, 189, 182, 255]),    // Silver gray - memory dump
            checkbox: Rgba([245, 121, 0, 255]),   // Burnt orange - toggles
        }
    }
}

/// Parses `#RRGGBB` or `RRGGBB` into an opaque colour.
pub fn parse_hex_colour(text: &str) -> Option<Rgba<u8>> {
    let hex = text.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(Rgba([channel(0..2)?, channel(2..4)?, channel(4..6)?, 255]))
}
