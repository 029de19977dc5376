//! Text color parsing.

/// Color applied to every unit of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextColor {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

const NAMED: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("red", (255, 0, 0)),
    ("green", (0, 128, 0)),
    ("blue", (0, 0, 255)),
    ("yellow", (255, 255, 0)),
    ("cyan", (0, 255, 255)),
    ("magenta", (255, 0, 255)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("orange", (255, 165, 0)),
    ("purple", (128, 0, 128)),
    ("pink", (255, 192, 203)),
    ("brown", (139, 69, 19)),
];

impl TextColor {
    /// `#000000`, used when no valid color is supplied.
    pub const BLACK: TextColor = TextColor::new(0, 0, 0);

    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a color value.
    ///
    /// Accepts `#RGB`, `#RRGGBB` and a small set of CSS color names.
    /// Case-insensitive, surrounding whitespace ignored.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        match s.strip_prefix('#') {
            Some(hex) => parse_hex(hex),
            None => {
                let lower = s.to_ascii_lowercase();
                NAMED
                    .iter()
                    .find(|(name, _)| *name == lower)
                    .map(|&(_, (r, g, b))| TextColor::new(r, g, b))
            }
        }
    }

    /// Parse a color value, falling back to black.
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    /// CSS hex notation, e.g. `#ff8800`.
    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for TextColor {
    fn default() -> Self {
        TextColor::BLACK
    }
}

fn parse_hex(hex: &str) -> Option<TextColor> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => Some(TextColor::new(
            channel(&hex[0..1])? * 17,
            channel(&hex[1..2])? * 17,
            channel(&hex[2..3])? * 17,
        )),
        6 => Some(TextColor::new(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_forms() {
        assert_eq!(TextColor::parse("#000000"), Some(TextColor::BLACK));
        assert_eq!(TextColor::parse("#FF8800"), Some(TextColor::new(255, 136, 0)));
        assert_eq!(TextColor::parse("#abc"), Some(TextColor::new(170, 187, 204)));
        assert_eq!(TextColor::parse("  #f00 "), Some(TextColor::new(255, 0, 0)));
    }

    #[test]
    fn names() {
        assert_eq!(TextColor::parse("Orange"), Some(TextColor::new(255, 165, 0)));
        assert_eq!(TextColor::parse("grey"), TextColor::parse("gray"));
    }

    #[test]
    fn invalid_values() {
        assert_eq!(TextColor::parse(""), None);
        assert_eq!(TextColor::parse("#"), None);
        assert_eq!(TextColor::parse("#12345"), None);
        assert_eq!(TextColor::parse("#gg0000"), None);
        assert_eq!(TextColor::parse("#éé"), None);
        assert_eq!(TextColor::parse("chartreuse-ish"), None);
    }

    #[test]
    fn default_is_black() {
        assert_eq!(TextColor::parse_or_default("nope"), TextColor::BLACK);
        assert_eq!(TextColor::default().to_css(), "#000000");
        assert_eq!(TextColor::new(26, 26, 46).to_css(), "#1a1a2e");
    }
}
