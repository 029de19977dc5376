//! Per-style effect definitions.

use rand::Rng;

use crate::{AnimationConfig, AnimationStyle, Easing, Keyframe, KeyframeEffect, Transform};

/// Glyphs the decoder cycles through.
pub const SCRAMBLE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*";

/// Typewriter pop-in duration bounds, independent of the global clamp.
pub const TYPEWRITER_DURATION_RANGE: (u32, u32) = (120, 600);

/// Typewriter drop distance as a fraction of the font size.
pub const TYPEWRITER_DROP_EM: f64 = -0.2;

pub const SETTLE_DURATION_MS: f64 = 120.0;
pub const SETTLE_SCALE: f64 = 1.15;

const FADE_EASING: Easing = Easing::CubicBezier(0.2, 0.7, 0.2, 1.0);
const ZOOM_EASING: Easing = Easing::CubicBezier(0.2, 0.8, 0.2, 1.0);

/// Scramble frames per unit: `clamp(duration / 30, 6, 24)`.
///
/// ```rust
/// use kinetic_type::effects::scramble_steps;
///
/// assert_eq!(scramble_steps(300), 10);
/// assert_eq!(scramble_steps(50), 6);
/// assert_eq!(scramble_steps(4000), 24);
/// ```
#[inline]
pub fn scramble_steps(duration_ms: u32) -> u32 {
    (duration_ms / 30).clamp(6, 24)
}

/// Uniformly random glyph from [`SCRAMBLE_CHARSET`].
pub fn random_glyph<R: Rng + ?Sized>(rng: &mut R) -> char {
    SCRAMBLE_CHARSET[rng.gen_range(0..SCRAMBLE_CHARSET.len())] as char
}

/// Entrance effect for the fade/slide/zoom styles, delayed by the unit's
/// stagger. `None` for styles that do not play a single entrance effect.
pub fn entrance_effect(config: &AnimationConfig, index: usize) -> Option<KeyframeEffect> {
    let (from, easing) = match config.style {
        AnimationStyle::FadeInUp => (Transform::translate_y(20.0), FADE_EASING),
        AnimationStyle::FlyInLeft => (Transform::translate_x(-30.0), FADE_EASING),
        AnimationStyle::ZoomIn => (Transform::scale(0.6), ZOOM_EASING),
        AnimationStyle::Typewriter | AnimationStyle::Decoder => return None,
    };
    Some(KeyframeEffect {
        from: Keyframe::new(0.0, from),
        to: Keyframe::new(1.0, Transform::IDENTITY),
        duration_ms: f64::from(config.duration_ms),
        delay_ms: config.start_delay_ms(index),
        easing,
    })
}

/// Typewriter pop-in, played once the unit's stagger has elapsed.
pub fn typewriter_effect(config: &AnimationConfig) -> KeyframeEffect {
    let (min, max) = TYPEWRITER_DURATION_RANGE;
    KeyframeEffect {
        from: Keyframe::new(
            0.0,
            Transform::translate_y(TYPEWRITER_DROP_EM * f64::from(config.font_size)),
        ),
        to: Keyframe::new(1.0, Transform::IDENTITY),
        duration_ms: f64::from(config.duration_ms.clamp(min, max)),
        delay_ms: 0.0,
        easing: Easing::EASE_OUT,
    }
}

/// Decoder settle pop once the final glyph is in place.
pub fn settle_effect() -> KeyframeEffect {
    KeyframeEffect {
        from: Keyframe::transform_only(Transform::scale(SETTLE_SCALE)),
        to: Keyframe::transform_only(Transform::IDENTITY),
        duration_ms: SETTLE_DURATION_MS,
        delay_ms: 0.0,
        easing: Easing::EASE_OUT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AnimationSettings;
    use crate::config::NumberInput;
    use rand::{rngs::StdRng, SeedableRng};

    fn config(style: &str, duration: i64, stagger: i64) -> AnimationConfig {
        AnimationSettings {
            style: Some(style.into()),
            duration: Some(NumberInput::Int(duration)),
            stagger: Some(NumberInput::Int(stagger)),
            ..Default::default()
        }
        .normalize()
    }

    #[test]
    fn entrance_transforms() {
        let fade = entrance_effect(&config("fadeInUp", 500, 60), 0).unwrap();
        assert_eq!(fade.from.transform, Transform::translate_y(20.0));
        assert_eq!(fade.from.opacity, Some(0.0));
        assert_eq!(fade.to, Keyframe::new(1.0, Transform::IDENTITY));

        let fly = entrance_effect(&config("flyInLeft", 500, 60), 0).unwrap();
        assert_eq!(fly.from.transform, Transform::translate_x(-30.0));

        let zoom = entrance_effect(&config("zoomIn", 500, 60), 0).unwrap();
        assert_eq!(zoom.from.transform, Transform::scale(0.6));
        assert_eq!(zoom.easing, ZOOM_EASING);

        assert!(entrance_effect(&config("typewriter", 500, 60), 0).is_none());
        assert!(entrance_effect(&config("decoder", 500, 60), 0).is_none());
    }

    #[test]
    fn entrance_timing() {
        let cfg = config("fadeInUp", 700, 100);
        for i in 0..5 {
            let effect = entrance_effect(&cfg, i).unwrap();
            assert_eq!(effect.delay_ms, i as f64 * 100.0);
            assert_eq!(effect.duration_ms, 700.0);
        }
    }

    #[test]
    fn typewriter_duration_clamped() {
        assert_eq!(typewriter_effect(&config("typewriter", 50, 0)).duration_ms, 120.0);
        assert_eq!(typewriter_effect(&config("typewriter", 300, 0)).duration_ms, 300.0);
        assert_eq!(typewriter_effect(&config("typewriter", 4000, 0)).duration_ms, 600.0);
    }

    #[test]
    fn typewriter_drop_scales_with_font() {
        let effect = typewriter_effect(&AnimationConfig::default());
        assert!((effect.from.transform.translate_y - (-9.6)).abs() < 1e-9);
    }

    #[test]
    fn steps() {
        assert_eq!(scramble_steps(179), 6);
        assert_eq!(scramble_steps(210), 7);
        assert_eq!(scramble_steps(719), 23);
        assert_eq!(scramble_steps(720), 24);
    }

    #[test]
    fn random_glyphs_from_charset() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let glyph = random_glyph(&mut rng);
            assert!(SCRAMBLE_CHARSET.contains(&(glyph as u8)));
            assert!(!glyph.is_whitespace());
        }
    }

    #[test]
    fn settle_keeps_opacity() {
        let effect = settle_effect();
        assert_eq!(effect.from.opacity, None);
        assert_eq!(effect.from.transform.scale, SETTLE_SCALE);
        assert_eq!(effect.duration_ms, 120.0);
    }
}
