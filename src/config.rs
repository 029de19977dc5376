//! Animation settings and their normalized form.
//!
//! [`AnimationSettings`] mirrors what a form or preset file supplies: every
//! field optional, numbers possibly still text. [`AnimationSettings::normalize`]
//! turns it into the [`AnimationConfig`] a run captures once at start.

use crate::{AnimationStyle, TextColor};

/// Font size bounds in pixels.
pub const FONT_SIZE_RANGE: (u32, u32) = (8, 250);
/// Per-character duration bounds in milliseconds.
pub const DURATION_RANGE: (u32, u32) = (50, 4000);
/// Stagger bounds in milliseconds.
pub const STAGGER_RANGE: (u32, u32) = (0, 1000);

pub const DEFAULT_FONT_SIZE: u32 = 48;
pub const DEFAULT_DURATION_MS: u32 = 500;
pub const DEFAULT_STAGGER_MS: u32 = 60;

/// A numeric field as supplied by the caller.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum NumberInput {
    Int(i64),
    Float(f64),
    /// Raw text, read leniently like an HTML number input value
    Text(String),
}

impl NumberInput {
    /// Integer value, or `None` when the input is not numeric.
    ///
    /// Text is read from its leading integer prefix, so `" 120ms"` is 120
    /// and `"ms"` is `None`. Floats are truncated toward zero.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            NumberInput::Int(n) => Some(*n),
            NumberInput::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            NumberInput::Float(_) => None,
            NumberInput::Text(s) => parse_int_prefix(s),
        }
    }
}

impl From<i64> for NumberInput {
    fn from(n: i64) -> Self {
        NumberInput::Int(n)
    }
}

impl From<&str> for NumberInput {
    fn from(s: &str) -> Self {
        NumberInput::Text(s.to_string())
    }
}

/// Read the leading base-10 integer of `s`.
///
/// Leading whitespace and one sign are accepted; parsing stops at the first
/// non-digit. Returns `None` when no digit is found. Saturates on overflow.
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        seen = true;
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }

    seen.then(|| if negative { -value } else { value })
}

fn clamp_field(input: Option<&NumberInput>, default: u32, (min, max): (u32, u32)) -> u32 {
    match input.and_then(NumberInput::as_int) {
        Some(n) => n.clamp(i64::from(min), i64::from(max)) as u32,
        None => default,
    }
}

/// Raw animation settings.
///
/// All fields are optional; missing or non-numeric values take defaults
/// during [`normalize`](Self::normalize).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnimationSettings {
    /// Style name, e.g. `"decoder"`
    pub style: Option<String>,
    /// Font size in pixels
    pub font_size: Option<NumberInput>,
    /// Hex or named color
    pub color: Option<String>,
    /// Per-character duration in milliseconds
    pub duration: Option<NumberInput>,
    /// Delay between consecutive units in milliseconds
    pub stagger: Option<NumberInput>,
}

impl AnimationSettings {
    /// Parse a TOML preset into `AnimationSettings`.
    ///
    /// ```rust,ignore
    /// let settings = AnimationSettings::from_toml_str(r#"
    ///     style = "decoder"
    ///     duration = 300
    ///     stagger = "40"
    /// "#)?;
    /// ```
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Clamp, default and resolve every field.
    ///
    /// A literal `0` counts as a number: stagger 0 stays 0, while font size
    /// and duration 0 clamp up to their minimums. Zero is never replaced by
    /// the field's default.
    ///
    /// ```rust
    /// use kinetic_type::{AnimationSettings, AnimationStyle};
    ///
    /// let settings = AnimationSettings {
    ///     style: Some("zoomIn".into()),
    ///     duration: Some("9000".into()),
    ///     stagger: Some("abc".into()),
    ///     ..Default::default()
    /// };
    /// let config = settings.normalize();
    /// assert_eq!(config.style, AnimationStyle::ZoomIn);
    /// assert_eq!(config.duration_ms, 4000);
    /// assert_eq!(config.stagger_ms, 60);
    /// assert_eq!(config.font_size, 48);
    /// ```
    pub fn normalize(&self) -> AnimationConfig {
        AnimationConfig {
            style: self
                .style
                .as_deref()
                .map(AnimationStyle::from_name)
                .unwrap_or_default(),
            font_size: clamp_field(self.font_size.as_ref(), DEFAULT_FONT_SIZE, FONT_SIZE_RANGE),
            color: self
                .color
                .as_deref()
                .map(TextColor::parse_or_default)
                .unwrap_or_default(),
            duration_ms: clamp_field(self.duration.as_ref(), DEFAULT_DURATION_MS, DURATION_RANGE),
            stagger_ms: clamp_field(self.stagger.as_ref(), DEFAULT_STAGGER_MS, STAGGER_RANGE),
        }
    }
}

/// Normalized configuration, fixed for the lifetime of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationConfig {
    /// Entrance style
    pub style: AnimationStyle,
    /// Font size in pixels
    pub font_size: u32,
    /// Applied to the whole surface
    pub color: TextColor,
    /// Per-character duration in milliseconds
    pub duration_ms: u32,
    /// Delay between consecutive unit starts in milliseconds
    pub stagger_ms: u32,
}

impl AnimationConfig {
    /// Start delay of the unit at `index`, in milliseconds.
    #[inline]
    pub fn start_delay_ms(&self, index: usize) -> f64 {
        index as f64 * f64::from(self.stagger_ms)
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationSettings::default().normalize()
    }
}
