/// An RGB color with a separate alpha channel, as used by canvas fills.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Fully transparent black.
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);

    /// Build from an RGB tuple and alpha (clamped to 0.0 - 1.0).
    pub fn from_rgb((r, g, b): (u8, u8, u8), alpha: f64) -> Self {
        Self::new(r, g, b, alpha.clamp(0.0, 1.0))
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self::from_rgb((self.r, self.g, self.b), alpha)
    }

    /// Returns a CSS `rgba(r,g,b,a)` string.
    pub fn css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

/// Parse a color string into an RGB tuple.
///
/// Supports:
/// - Named colors: black, white, red, green, blue, yellow, cyan, magenta,
///   gray/grey, orange, purple, pink, brown
/// - Hex: `#RGB` (expanded to `#RRGGBB`), `#RRGGBB`
/// - Case-insensitive, trims whitespace
pub fn parse_color(s: &str) -> Option<(u8, u8, u8)> {
    let s = s.trim();
    if s.starts_with('#') {
        parse_hex(s)
    } else {
        parse_named(s)
    }
}

fn parse_hex(s: &str) -> Option<(u8, u8, u8)> {
    let hex = s.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
            Some((r * 17, g * 17, b * 17))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some((r, g, b))
        }
        _ => None,
    }
}

fn parse_named(s: &str) -> Option<(u8, u8, u8)> {
    match s.to_lowercase().as_str() {
        "black"         => Some((0, 0, 0)),
        "white"         => Some((255, 255, 255)),
        "red"           => Some((255, 0, 0)),
        "green"         => Some((0, 128, 0)),
        "blue"          => Some((0, 0, 255)),
        "yellow"        => Some((255, 255, 0)),
        "cyan"          => Some((0, 255, 255)),
        "magenta"       => Some((255, 0, 255)),
        "gray" | "grey" => Some((128, 128, 128)),
        "orange"        => Some((255, 165, 0)),
        "purple"        => Some((128, 0, 128)),
        "pink"          => Some((255, 192, 203)),
        "brown"         => Some((139, 69, 19)),
        _ => None,
    }
}
