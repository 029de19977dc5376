//! The render surface seam.
//!
//! A surface holds the visual units of the current run. The run engine only
//! talks to it through [`Surface`], so the same styles drive the in-memory
//! [`MemorySurface`](crate::MemorySurface) and the DOM backend.

use crate::{AnimationConfig, KeyframeEffect, Layout, SurfaceError};

/// Handle to an animation playing on a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(pub u64);

/// Observed state of a played animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationPoll {
    Running,
    Finished,
    /// Cancelled or aborted by the surface; counts as settled
    Cancelled,
}

impl AnimationPoll {
    #[inline]
    pub fn is_settled(self) -> bool {
        !matches!(self, AnimationPoll::Running)
    }
}

/// Container that renders units and plays keyframe effects on them.
///
/// Unit indices are those of the [`Layout`] passed to the last
/// [`build`](Surface::build).
pub trait Surface {
    /// Whether [`play`](Surface::play) can be used at all.
    fn supports_animation(&self) -> bool;

    /// Cancel every running animation and remove all units.
    fn reset(&mut self) -> Result<(), SurfaceError>;

    /// Create one hidden unit per layout unit, with line breaks between lines,
    /// styled with the config's font size and color.
    fn build(&mut self, layout: &Layout, config: &AnimationConfig) -> Result<(), SurfaceError>;

    /// Start `effect` on a unit. `now_ms` is the play time; the effect's own
    /// delay counts from there.
    fn play(
        &mut self,
        unit: usize,
        effect: &KeyframeEffect,
        now_ms: f64,
    ) -> Result<AnimationId, SurfaceError>;

    fn poll(&mut self, id: AnimationId, now_ms: f64) -> AnimationPoll;

    /// Cancel one animation. Unknown or settled ids are ignored.
    fn cancel(&mut self, id: AnimationId);

    /// Replace the glyph a unit displays.
    fn set_glyph(&mut self, unit: usize, glyph: char) -> Result<(), SurfaceError>;

    /// Make a unit fully visible without animating.
    fn show(&mut self, unit: usize) -> Result<(), SurfaceError>;
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn supports_animation(&self) -> bool {
        (**self).supports_animation()
    }

    fn reset(&mut self) -> Result<(), SurfaceError> {
        (**self).reset()
    }

    fn build(&mut self, layout: &Layout, config: &AnimationConfig) -> Result<(), SurfaceError> {
        (**self).build(layout, config)
    }

    fn play(
        &mut self,
        unit: usize,
        effect: &KeyframeEffect,
        now_ms: f64,
    ) -> Result<AnimationId, SurfaceError> {
        (**self).play(unit, effect, now_ms)
    }

    fn poll(&mut self, id: AnimationId, now_ms: f64) -> AnimationPoll {
        (**self).poll(id, now_ms)
    }

    fn cancel(&mut self, id: AnimationId) {
        (**self).cancel(id)
    }

    fn set_glyph(&mut self, unit: usize, glyph: char) -> Result<(), SurfaceError> {
        (**self).set_glyph(unit, glyph)
    }

    fn show(&mut self, unit: usize) -> Result<(), SurfaceError> {
        (**self).show(unit)
    }
}
