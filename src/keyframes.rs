//! Two-keyframe effects and their sampling.
//!
//! A [`KeyframeEffect`] is the per-element animation primitive the styles are
//! built from: a start keyframe, an end keyframe, a duration, a start delay and
//! an easing curve. Effects always fill both ways: before the delay elapses the
//! start keyframe applies, after the end the end keyframe persists.

/// Timing curve mapping linear progress to eased progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    Linear,
    /// CSS `cubic-bezier(x1, y1, x2, y2)`
    CubicBezier(f64, f64, f64, f64),
}

impl Easing {
    /// CSS `ease-out`.
    pub const EASE_OUT: Easing = Easing::CubicBezier(0.0, 0.0, 0.58, 1.0);

    /// Eased progress for linear progress `t` in `[0, 1]`.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::CubicBezier(x1, y1, x2, y2) => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let s = solve_bezier_param(t, x1, x2);
                bezier_axis(s, y1, y2)
            }
        }
    }

    /// CSS timing function text.
    pub fn to_css(&self) -> String {
        match *self {
            Easing::Linear => "linear".to_string(),
            e if e == Easing::EASE_OUT => "ease-out".to_string(),
            Easing::CubicBezier(x1, y1, x2, y2) => format!("cubic-bezier({x1}, {y1}, {x2}, {y2})"),
        }
    }
}

// One axis of a cubic bezier anchored at 0 and 1.
#[inline]
fn bezier_axis(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

#[inline]
fn bezier_axis_slope(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

// Find the curve parameter whose x equals `x`. Newton first, bisection if the
// slope flattens out.
fn solve_bezier_param(x: f64, x1: f64, x2: f64) -> f64 {
    const EPSILON: f64 = 1e-7;

    let mut s = x;
    for _ in 0..8 {
        let err = bezier_axis(s, x1, x2) - x;
        if err.abs() < EPSILON {
            return s;
        }
        let slope = bezier_axis_slope(s, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= err / slope;
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    s = x;
    for _ in 0..64 {
        let value = bezier_axis(s, x1, x2);
        if (value - x).abs() < EPSILON {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    s
}

/// 2D transform as translate-then-scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Horizontal offset in pixels
    pub translate_x: f64,
    /// Vertical offset in pixels (positive is down)
    pub translate_y: f64,
    /// Uniform scale factor, 1.0 is natural size
    pub scale: f64,
}

impl Transform {
    /// No offset, natural size.
    pub const IDENTITY: Transform = Transform {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };

    /// Horizontal offset only.
    pub fn translate_x(px: f64) -> Self {
        Self { translate_x: px, ..Self::IDENTITY }
    }

    /// Vertical offset only.
    pub fn translate_y(px: f64) -> Self {
        Self { translate_y: px, ..Self::IDENTITY }
    }

    /// Scale only.
    pub fn scale(factor: f64) -> Self {
        Self { scale: factor, ..Self::IDENTITY }
    }

    /// Componentwise interpolation from `self` (t = 0) to `to` (t = 1).
    pub fn lerp(&self, to: &Transform, t: f64) -> Transform {
        Transform {
            translate_x: lerp(self.translate_x, to.translate_x, t),
            translate_y: lerp(self.translate_y, to.translate_y, t),
            scale: lerp(self.scale, to.scale, t),
        }
    }

    /// CSS `transform` value.
    pub fn to_css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.translate_x, self.translate_y, self.scale
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// One end of an effect. `opacity: None` leaves the element's opacity alone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    /// Opacity in `[0, 1]`
    pub opacity: Option<f64>,
    pub transform: Transform,
}

impl Keyframe {
    /// Keyframe that sets both opacity and transform.
    pub fn new(opacity: f64, transform: Transform) -> Self {
        Self {
            opacity: Some(opacity),
            transform,
        }
    }

    /// Keyframe that only moves or scales.
    pub fn transform_only(transform: Transform) -> Self {
        Self {
            opacity: None,
            transform,
        }
    }
}

/// A per-element animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyframeEffect {
    /// State at and before the start
    pub from: Keyframe,
    /// State at and after the end
    pub to: Keyframe,
    pub duration_ms: f64,
    /// Wait between play and the first interpolated frame
    pub delay_ms: f64,
    pub easing: Easing,
}

impl KeyframeEffect {
    /// Time after play at which the effect reaches its end keyframe.
    #[inline]
    pub fn end_time_ms(&self) -> f64 {
        self.delay_ms + self.duration_ms
    }

    /// Whether the effect has completed `elapsed_ms` after it was played.
    #[inline]
    pub fn is_finished(&self, elapsed_ms: f64) -> bool {
        elapsed_ms >= self.end_time_ms()
    }

    /// The interpolated keyframe `elapsed_ms` after play.
    pub fn sample(&self, elapsed_ms: f64) -> Keyframe {
        let local = elapsed_ms - self.delay_ms;
        if local <= 0.0 {
            return self.from;
        }
        if self.duration_ms <= 0.0 || local >= self.duration_ms {
            return self.to;
        }

        let t = self.easing.apply(local / self.duration_ms);
        let opacity = match (self.from.opacity, self.to.opacity) {
            (Some(a), Some(b)) => Some(lerp(a, b, t)),
            (a, b) => b.or(a),
        };
        Keyframe {
            opacity,
            transform: self.from.transform.lerp(&self.to.transform, t),
        }
    }
}

/// Resolved visual state of one unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualState {
    /// Opacity in `[0, 1]`
    pub opacity: f64,
    /// Offset and scale from the unit's cell
    pub transform: Transform,
}

impl VisualState {
    /// Initial state of every freshly built unit.
    pub const HIDDEN: VisualState = VisualState {
        opacity: 0.0,
        transform: Transform::IDENTITY,
    };

    /// Final state of every settled unit.
    pub const VISIBLE: VisualState = VisualState {
        opacity: 1.0,
        transform: Transform::IDENTITY,
    };

    /// Layer an animated keyframe over this base state.
    pub fn with_keyframe(self, frame: &Keyframe) -> VisualState {
        VisualState {
            opacity: frame.opacity.unwrap_or(self.opacity),
            transform: frame.transform,
        }
    }

    /// At rest: fully visible with no offset or scaling.
    pub fn is_at_rest(&self) -> bool {
        (self.opacity - 1.0).abs() < 1e-9 && self.transform == Transform::IDENTITY
    }
}

impl Default for VisualState {
    fn default() -> Self {
        Self::HIDDEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fade(delay_ms: f64) -> KeyframeEffect {
        KeyframeEffect {
            from: Keyframe::new(0.0, Transform::translate_y(20.0)),
            to: Keyframe::new(1.0, Transform::IDENTITY),
            duration_ms: 500.0,
            delay_ms,
            easing: Easing::CubicBezier(0.2, 0.7, 0.2, 1.0),
        }
    }

    #[test]
    fn bezier_endpoints_and_monotonic() {
        let curves = [
            Easing::Linear,
            Easing::EASE_OUT,
            Easing::CubicBezier(0.2, 0.7, 0.2, 1.0),
            Easing::CubicBezier(0.2, 0.8, 0.2, 1.0),
        ];
        for easing in curves {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            let mut prev = 0.0;
            for i in 1..=100 {
                let y = easing.apply(i as f64 / 100.0);
                assert!(y + 1e-9 >= prev, "{easing:?} not monotonic at {i}");
                prev = y;
            }
        }
    }

    #[test]
    fn ease_out_leans_forward() {
        assert!(Easing::EASE_OUT.apply(0.5) > 0.5);
        assert!(Easing::CubicBezier(0.2, 0.7, 0.2, 1.0).apply(0.3) > 0.3);
    }

    #[test]
    fn fill_both() {
        let effect = fade(60.0);
        assert_eq!(effect.sample(0.0), effect.from);
        assert_eq!(effect.sample(60.0), effect.from);
        assert_eq!(effect.sample(560.0), effect.to);
        assert_eq!(effect.sample(10_000.0), effect.to);
        assert!(!effect.is_finished(559.0));
        assert!(effect.is_finished(560.0));
    }

    #[test]
    fn midway_is_between() {
        let frame = fade(0.0).sample(250.0);
        let opacity = frame.opacity.unwrap();
        assert!(opacity > 0.0 && opacity < 1.0);
        assert!(frame.transform.translate_y > 0.0 && frame.transform.translate_y < 20.0);
    }

    #[test]
    fn transform_only_keeps_base_opacity() {
        let effect = KeyframeEffect {
            from: Keyframe::transform_only(Transform::scale(1.15)),
            to: Keyframe::transform_only(Transform::IDENTITY),
            duration_ms: 120.0,
            delay_ms: 0.0,
            easing: Easing::EASE_OUT,
        };
        let state = VisualState::VISIBLE.with_keyframe(&effect.sample(60.0));
        assert_eq!(state.opacity, 1.0);
        assert!(state.transform.scale > 1.0 && state.transform.scale < 1.15);
        assert!(VisualState::VISIBLE
            .with_keyframe(&effect.sample(120.0))
            .is_at_rest());
    }

    #[test]
    fn css_text() {
        assert_eq!(Easing::EASE_OUT.to_css(), "ease-out");
        assert_eq!(
            Easing::CubicBezier(0.2, 0.7, 0.2, 1.0).to_css(),
            "cubic-bezier(0.2, 0.7, 0.2, 1)"
        );
        assert_eq!(
            Transform::translate_x(-30.0).to_css(),
            "translate(-30px, 0px) scale(1)"
        );
    }
}
