//! Colour conversions between the scene's native `[f32; 3]` and `#rrggbb` text.
//!
//! Colour widgets edit a hex string proxy; these helpers convert both ways.
//! Components are clamped to 0..1 and quantised to 8 bits.

/// Format a colour as `#rrggbb` (lowercase).
pub fn to_hex(rgb: [f32; 3]) -> String {
    let [r, g, b] = rgb.map(to_byte);
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Parse `#rrggbb`, `rrggbb`, `#rgb` or `0xrrggbb`. Returns None for anything else.
pub fn from_hex(text: &str) -> Option<[f32; 3]> {
    let s = text.trim();
    let s = s
        .strip_prefix('#')
        .or_else(|| s.strip_prefix("0x"))
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    let digits: Vec<u8> = match s.len() {
        6 => s.as_bytes().to_vec(),
        // #rgb shorthand: each digit doubled
        3 => s.bytes().flat_map(|c| [c, c]).collect(),
        _ => return None,
    };

    let mut out = [0.0f32; 3];
    for (i, pair) in digits.chunks(2).enumerate() {
        let pair = std::str::from_utf8(pair).ok()?;
        let byte = u8::from_str_radix(pair, 16).ok()?;
        out[i] = byte as f32 / 255.0;
    }
    Some(out)
}

/// Colour from a packed `0xrrggbb` integer.
pub fn from_u32(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Colour as 8-bit components, for the egui colour picker.
pub fn to_srgb_bytes(rgb: [f32; 3]) -> [u8; 3] {
    rgb.map(to_byte)
}

fn to_byte(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}
