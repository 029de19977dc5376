//! The closed set of animation styles.

use std::fmt;

/// Animation style applied to every unit of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnimationStyle {
    /// Rise 20px while fading in
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "fadeInUp"))]
    FadeInUp,
    /// Slide in from 30px to the left while fading in
    #[cfg_attr(feature = "serde", serde(rename = "flyInLeft"))]
    FlyInLeft,
    /// Grow from 60% scale while fading in
    #[cfg_attr(feature = "serde", serde(rename = "zoomIn"))]
    ZoomIn,
    /// Reveal one character at a time with a short drop-in
    #[cfg_attr(feature = "serde", serde(rename = "typewriter"))]
    Typewriter,
    /// Cycle random glyphs before settling on the real one
    #[cfg_attr(feature = "serde", serde(rename = "decoder"))]
    Decoder,
}

impl AnimationStyle {
    /// All styles in selector order.
    pub const ALL: [AnimationStyle; 5] = [
        AnimationStyle::FadeInUp,
        AnimationStyle::FlyInLeft,
        AnimationStyle::ZoomIn,
        AnimationStyle::Typewriter,
        AnimationStyle::Decoder,
    ];

    /// Resolve a selector value. Unknown names fall back to `FadeInUp`.
    ///
    /// ```rust
    /// use kinetic_type::AnimationStyle;
    ///
    /// assert_eq!(AnimationStyle::from_name("decoder"), AnimationStyle::Decoder);
    /// assert_eq!(AnimationStyle::from_name("wobble"), AnimationStyle::FadeInUp);
    /// ```
    pub fn from_name(name: &str) -> Self {
        match name {
            "fadeInUp" => AnimationStyle::FadeInUp,
            "flyInLeft" => AnimationStyle::FlyInLeft,
            "zoomIn" => AnimationStyle::ZoomIn,
            "typewriter" => AnimationStyle::Typewriter,
            "decoder" => AnimationStyle::Decoder,
            _ => AnimationStyle::FadeInUp,
        }
    }

    /// Selector value for this style.
    pub fn name(self) -> &'static str {
        match self {
            AnimationStyle::FadeInUp => "fadeInUp",
            AnimationStyle::FlyInLeft => "flyInLeft",
            AnimationStyle::ZoomIn => "zoomIn",
            AnimationStyle::Typewriter => "typewriter",
            AnimationStyle::Decoder => "decoder",
        }
    }
}

impl fmt::Display for AnimationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
