//! In-memory render surface.
//!
//! Keeps every unit's displayed glyph, base visibility and played effects,
//! and resolves the visual state at any timestamp by sampling those effects.
//! Used by the tests and by front-ends that draw through
//! [`render_surface`](crate::render::render_surface) instead of a DOM.

use crate::{
    AnimationConfig, AnimationId, AnimationPoll, KeyframeEffect, Layout, LayoutItem, Surface,
    SurfaceError, VisualState,
};

/// Surface mutation, recorded in order.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceEvent {
    Reset,
    Build { units: usize },
    Play { unit: usize, id: AnimationId },
    Cancel { id: AnimationId },
    SetGlyph { unit: usize, glyph: char },
    Show { unit: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PlayState {
    Running,
    Finished,
    Cancelled,
}

#[derive(Clone, Debug)]
struct PlayedEffect {
    id: AnimationId,
    unit: usize,
    effect: KeyframeEffect,
    started_at: f64,
    state: PlayState,
}

impl PlayedEffect {
    fn refresh(&mut self, now_ms: f64) -> PlayState {
        if self.state == PlayState::Running && self.effect.is_finished(now_ms - self.started_at) {
            self.state = PlayState::Finished;
        }
        self.state
    }
}

#[derive(Clone, Debug)]
struct UnitView {
    glyph: char,
    base: VisualState,
    history: Vec<char>,
}

/// Snapshot of one unit at a point in time.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitSnapshot {
    pub index: usize,
    /// Glyph displayed at snapshot time
    pub glyph: char,
    pub line: usize,
    pub column: usize,
    /// Base state with the latest effect applied
    pub visual: VisualState,
}

/// A [`Surface`] that lives entirely in memory.
///
/// ## Example
///
/// ```rust
/// use kinetic_type::{decompose, AnimationConfig, MemorySurface, Surface};
///
/// let mut surface = MemorySurface::new();
/// surface.build(&decompose("ok"), &AnimationConfig::default()).unwrap();
/// assert_eq!(surface.unit_count(), 2);
/// assert_eq!(surface.visual(0, 0.0).unwrap().opacity, 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct MemorySurface {
    layout: Layout,
    config: Option<AnimationConfig>,
    units: Vec<UnitView>,
    played: Vec<PlayedEffect>,
    next_id: u64,
    animations: bool,
    rejected_units: Vec<usize>,
    fail_builds: bool,
    cancelled: usize,
    log_events: bool,
    events: Vec<SurfaceEvent>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    /// An empty surface with animation support.
    pub fn new() -> Self {
        Self {
            layout: Layout::default(),
            config: None,
            units: Vec::new(),
            played: Vec::new(),
            next_id: 1,
            animations: true,
            rejected_units: Vec::new(),
            fail_builds: false,
            cancelled: 0,
            log_events: false,
            events: Vec::new(),
        }
    }

    /// A surface that reports no animation capability.
    pub fn without_animation() -> Self {
        Self {
            animations: false,
            ..Self::new()
        }
    }

    /// Make every [`play`](Surface::play) on this unit index fail.
    pub fn reject_animations_for(mut self, unit: usize) -> Self {
        self.rejected_units.push(unit);
        self
    }

    /// Record every mutation in [`events`](Self::events). Off by default,
    /// since the log is never truncated.
    pub fn with_event_log(mut self) -> Self {
        self.log_events = true;
        self
    }

    /// Make every [`build`](Surface::build) fail.
    pub fn fail_builds(mut self, fail: bool) -> Self {
        self.fail_builds = fail;
        self
    }

    /// Units of the last build, zero after a reset.
    #[inline]
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Layout of the last build.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Config of the last build.
    pub fn config(&self) -> Option<&AnimationConfig> {
        self.config.as_ref()
    }

    /// Glyph currently displayed by a unit.
    pub fn glyph(&self, unit: usize) -> Option<char> {
        self.units.get(unit).map(|u| u.glyph)
    }

    /// Every glyph a unit has displayed since it was built, starting with its
    /// final glyph.
    pub fn glyph_history(&self, unit: usize) -> &[char] {
        self.units
            .get(unit)
            .map(|u| u.history.as_slice())
            .unwrap_or(&[])
    }

    /// Displayed text with line breaks, as currently rendered.
    pub fn text(&self) -> String {
        self.layout
            .items
            .iter()
            .filter_map(|item| match item {
                LayoutItem::Unit(i) => self.glyph(*i),
                LayoutItem::LineBreak => Some('\n'),
            })
            .collect()
    }

    /// Effects played on a unit, with their play times, oldest first.
    pub fn effects_for(&self, unit: usize) -> Vec<(f64, KeyframeEffect)> {
        self.played
            .iter()
            .filter(|p| p.unit == unit)
            .map(|p| (p.started_at, p.effect))
            .collect()
    }

    /// Animations started and not yet finished or cancelled at `now_ms`.
    pub fn running_count(&self, now_ms: f64) -> usize {
        self.played
            .iter()
            .filter(|p| p.state == PlayState::Running && !p.effect.is_finished(now_ms - p.started_at))
            .count()
    }

    /// Animations cancelled while running, over the surface's lifetime.
    pub fn cancelled_count(&self) -> usize {
        self.cancelled
    }

    /// Mutation log since the surface was created. Empty unless built
    /// [`with_event_log`](Self::with_event_log).
    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    /// Visual state of a unit at `now_ms`.
    ///
    /// The most recently played, non-cancelled effect is layered over the
    /// unit's base state; effects fill forwards and backwards.
    pub fn visual(&self, unit: usize, now_ms: f64) -> Option<VisualState> {
        let view = self.units.get(unit)?;
        let latest = self
            .played
            .iter()
            .rev()
            .find(|p| p.unit == unit && p.state != PlayState::Cancelled);
        Some(match latest {
            Some(p) => view.base.with_keyframe(&p.effect.sample(now_ms - p.started_at)),
            None => view.base,
        })
    }

    /// Every unit's state at `now_ms`, in index order.
    pub fn snapshot(&self, now_ms: f64) -> Vec<UnitSnapshot> {
        self.layout
            .units
            .iter()
            .filter_map(|unit| {
                Some(UnitSnapshot {
                    index: unit.index,
                    glyph: self.glyph(unit.index)?,
                    line: unit.line,
                    column: unit.column,
                    visual: self.visual(unit.index, now_ms)?,
                })
            })
            .collect()
    }

    fn record(&mut self, event: SurfaceEvent) {
        if self.log_events {
            self.events.push(event);
        }
    }

    fn unit_mut(&mut self, unit: usize) -> Result<&mut UnitView, SurfaceError> {
        let len = self.units.len();
        self.units
            .get_mut(unit)
            .ok_or(SurfaceError::UnitOutOfRange { index: unit, len })
    }
}

impl Surface for MemorySurface {
    fn supports_animation(&self) -> bool {
        self.animations
    }

    fn reset(&mut self) -> Result<(), SurfaceError> {
        self.cancelled += self
            .played
            .iter()
            .filter(|p| p.state == PlayState::Running)
            .count();
        self.played.clear();
        self.units.clear();
        self.layout = Layout::default();
        self.record(SurfaceEvent::Reset);
        Ok(())
    }

    fn build(&mut self, layout: &Layout, config: &AnimationConfig) -> Result<(), SurfaceError> {
        if self.fail_builds {
            return Err(SurfaceError::Backend("build refused".into()));
        }
        self.units = layout
            .units
            .iter()
            .map(|unit| UnitView {
                glyph: unit.glyph,
                base: VisualState::HIDDEN,
                history: vec![unit.glyph],
            })
            .collect();
        self.layout = layout.clone();
        self.config = Some(*config);
        // Effects of discarded units are dropped with them.
        self.played.clear();
        self.record(SurfaceEvent::Build {
            units: layout.len(),
        });
        Ok(())
    }

    fn play(
        &mut self,
        unit: usize,
        effect: &KeyframeEffect,
        now_ms: f64,
    ) -> Result<AnimationId, SurfaceError> {
        if !self.animations {
            return Err(SurfaceError::AnimationUnsupported);
        }
        self.unit_mut(unit)?;
        if self.rejected_units.contains(&unit) {
            return Err(SurfaceError::AnimationRejected {
                unit,
                reason: "rejected by test surface".into(),
            });
        }

        let id = AnimationId(self.next_id);
        self.next_id += 1;
        self.played.push(PlayedEffect {
            id,
            unit,
            effect: *effect,
            started_at: now_ms,
            state: PlayState::Running,
        });
        self.record(SurfaceEvent::Play { unit, id });
        Ok(id)
    }

    fn poll(&mut self, id: AnimationId, now_ms: f64) -> AnimationPoll {
        match self.played.iter_mut().find(|p| p.id == id) {
            Some(played) => match played.refresh(now_ms) {
                PlayState::Running => AnimationPoll::Running,
                PlayState::Finished => AnimationPoll::Finished,
                PlayState::Cancelled => AnimationPoll::Cancelled,
            },
            None => AnimationPoll::Cancelled,
        }
    }

    fn cancel(&mut self, id: AnimationId) {
        if let Some(played) = self.played.iter_mut().find(|p| p.id == id) {
            if played.state == PlayState::Running {
                played.state = PlayState::Cancelled;
                self.cancelled += 1;
                self.record(SurfaceEvent::Cancel { id });
            }
        }
    }

    fn set_glyph(&mut self, unit: usize, glyph: char) -> Result<(), SurfaceError> {
        let view = self.unit_mut(unit)?;
        view.glyph = glyph;
        view.history.push(glyph);
        self.record(SurfaceEvent::SetGlyph { unit, glyph });
        Ok(())
    }

    fn show(&mut self, unit: usize) -> Result<(), SurfaceError> {
        self.unit_mut(unit)?.base = VisualState::VISIBLE;
        self.record(SurfaceEvent::Show { unit });
        Ok(())
    }
}
