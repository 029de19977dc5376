//! Run dispatcher.

use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::status::{Notice, StatusBoard};
use crate::{
    decompose, strip_carriage_returns, AnimationConfig, AnimationSettings, Run, RunError,
    RunStatus, Surface, Trigger,
};

/// Result of a start request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartOutcome {
    /// A run is in flight; drive it with [`Animator::tick`]
    Started { run_id: u64, units: usize },
    /// Trimmed text was empty; nothing was built
    NothingToAnimate,
    /// The surface could not be prepared
    Failed(RunError),
}

/// How a run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every unit reached its final state
    Completed { run_id: u64 },
    /// A glyph or visibility update failed mid-run
    Failed { run_id: u64, error: RunError },
}

/// Typography animator bound to one render surface.
///
/// Owns the surface, the active [`Run`], the trigger state and the status
/// notice. Like a frame player it does not keep time itself: call
/// [`tick`](Self::tick) once per animation frame with the current time.
///
/// ## Example
///
/// ```rust
/// use kinetic_type::{Animator, AnimationSettings, MemorySurface, RunOutcome, StartOutcome, Trigger};
///
/// let mut animator = Animator::new(MemorySurface::new());
/// let started = animator.start("Hi", &AnimationSettings::default(), Trigger::Api, 0.0);
/// assert!(matches!(started, StartOutcome::Started { units: 2, .. }));
/// assert!(!animator.trigger_enabled());
///
/// let mut now = 0.0;
/// let outcome = loop {
///     if let Some(outcome) = animator.tick(now) {
///         break outcome;
///     }
///     now += 16.0;
/// };
/// assert!(matches!(outcome, RunOutcome::Completed { .. }));
/// assert_eq!(animator.status_message(now), Some("Done!"));
/// assert!(animator.trigger_enabled());
/// ```
#[derive(Debug)]
pub struct Animator<S: Surface> {
    surface: S,
    /// Run in flight, if any
    run: Option<Run>,
    next_run_id: u64,
    /// Cleared while a run is in flight
    trigger_enabled: bool,
    status: StatusBoard,
    /// Base seed for scramble randomness; entropy when `None`
    seed: Option<u64>,
}

impl<S: Surface> Animator<S> {
    /// Create an idle animator that owns `surface`.
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            run: None,
            next_run_id: 1,
            trigger_enabled: true,
            status: StatusBoard::default(),
            seed: None,
        }
    }

    /// Seed scramble randomness so runs are reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace the status board, e.g. to change the notice timeout.
    pub fn with_status_board(mut self, status: StatusBoard) -> Self {
        self.status = status;
        self
    }

    /// Normalize `settings` and start a run over `text`.
    pub fn start(
        &mut self,
        text: &str,
        settings: &AnimationSettings,
        trigger: Trigger,
        now_ms: f64,
    ) -> StartOutcome {
        self.start_with_config(text, settings.normalize(), trigger, now_ms)
    }

    /// Start a run with an already normalized config.
    ///
    /// A run still in flight is superseded: its animations and pending
    /// callbacks are cancelled before the surface is rebuilt. Starting is
    /// allowed even while the trigger is disabled.
    pub fn start_with_config(
        &mut self,
        text: &str,
        config: AnimationConfig,
        trigger: Trigger,
        now_ms: f64,
    ) -> StartOutcome {
        let text = strip_carriage_returns(text);
        if text.trim().is_empty() {
            info!("{} trigger ignored: nothing to animate", trigger);
            self.status.show(Notice::NothingToAnimate, now_ms);
            return StartOutcome::NothingToAnimate;
        }

        if let Some(mut previous) = self.run.take() {
            warn!("run {} superseded before completion", previous.id());
            previous.cancel(&mut self.surface);
        }

        let run_id = self.next_run_id;
        self.next_run_id += 1;
        self.trigger_enabled = false;
        self.status.show(Notice::Animating, now_ms);
        info!("run {} requested by {}: style={}", run_id, trigger, config.style);

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(run_id)),
            None => StdRng::from_entropy(),
        };

        match Run::start(run_id, &mut self.surface, &decompose(&text), config, rng, now_ms) {
            Ok(run) => {
                let units = run.unit_count();
                self.run = Some(run);
                StartOutcome::Started { run_id, units }
            }
            Err(err) => {
                error!("run {} failed to start: {}", run_id, err);
                self.status.show(Notice::Failed, now_ms);
                self.trigger_enabled = true;
                StartOutcome::Failed(err)
            }
        }
    }

    /// Startup auto-run: starts only when the text is not blank.
    pub fn start_on_load(
        &mut self,
        text: &str,
        settings: &AnimationSettings,
        now_ms: f64,
    ) -> Option<StartOutcome> {
        if text.trim().is_empty() {
            return None;
        }
        Some(self.start(text, settings, Trigger::Startup, now_ms))
    }

    /// Advance the active run. Returns its outcome on the tick it ends.
    ///
    /// Whatever the outcome, the status is updated and the trigger is
    /// re-enabled.
    pub fn tick(&mut self, now_ms: f64) -> Option<RunOutcome> {
        let run = self.run.as_mut()?;
        let run_id = run.id();
        let status = run.tick(&mut self.surface, now_ms).clone();

        let outcome = match status {
            RunStatus::Running => return None,
            RunStatus::Completed => {
                info!("run {} completed", run_id);
                self.status.show(Notice::Done, now_ms);
                Some(RunOutcome::Completed { run_id })
            }
            RunStatus::Failed(error) => {
                error!("run {} failed: {}", run_id, error);
                self.status.show(Notice::Failed, now_ms);
                Some(RunOutcome::Failed { run_id, error })
            }
            RunStatus::Cancelled => None,
        };

        self.run = None;
        self.trigger_enabled = true;
        outcome
    }

    /// Check if a run is in flight.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// The run in flight, if any.
    pub fn active_run(&self) -> Option<&Run> {
        self.run.as_ref()
    }

    /// Whether the UI should accept a new run request.
    #[inline]
    pub fn trigger_enabled(&self) -> bool {
        self.trigger_enabled
    }

    /// Notice visible at `now_ms`, if it has not timed out.
    pub fn status(&self, now_ms: f64) -> Option<Notice> {
        self.status.current(now_ms)
    }

    /// Text of the visible notice.
    pub fn status_message(&self, now_ms: f64) -> Option<&'static str> {
        self.status(now_ms).map(Notice::message)
    }

    /// Get a reference to the render surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Get a mutable reference to the render surface.
    ///
    /// Mutating units under an active run is not tracked by the run.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Consume the animator and return its surface.
    pub fn into_surface(self) -> S {
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NumberInput;
    use crate::{AnimationId, AnimationPoll, KeyframeEffect, Layout, MemorySurface, SurfaceError, SurfaceEvent};

    fn settings(style: &str, duration: i64, stagger: i64) -> AnimationSettings {
        AnimationSettings {
            style: Some(style.into()),
            duration: Some(NumberInput::Int(duration)),
            stagger: Some(NumberInput::Int(stagger)),
            ..Default::default()
        }
    }

    fn finish<S: Surface>(animator: &mut Animator<S>, mut now: f64) -> (RunOutcome, f64) {
        loop {
            if let Some(outcome) = animator.tick(now) {
                return (outcome, now);
            }
            now += 16.0;
            assert!(now < 60_000.0, "run never completed");
        }
    }

    #[test]
    fn hi_fade_in_up() {
        let mut animator = Animator::new(MemorySurface::new());
        let started = animator.start("Hi", &settings("fadeInUp", 500, 60), Trigger::Button, 0.0);
        assert_eq!(started, StartOutcome::Started { run_id: 1, units: 2 });
        assert_eq!(animator.status_message(0.0), Some("Animating..."));
        assert!(!animator.trigger_enabled());

        let surface = animator.surface();
        assert_eq!(surface.glyph(0), Some('H'));
        assert_eq!(surface.glyph(1), Some('i'));
        assert_eq!(surface.effects_for(0)[0].1.delay_ms, 0.0);
        assert_eq!(surface.effects_for(1)[0].1.delay_ms, 60.0);

        let (outcome, now) = finish(&mut animator, 0.0);
        assert_eq!(outcome, RunOutcome::Completed { run_id: 1 });
        assert!(now >= 560.0);
        assert_eq!(animator.status_message(now), Some("Done!"));
        assert!(animator.trigger_enabled());
        assert!(!animator.is_running());

        for i in 0..2 {
            let visual = animator.surface().visual(i, now).unwrap();
            assert_eq!(visual.opacity, 1.0);
            assert_eq!(visual.transform.translate_y, 0.0);
        }
    }

    #[test]
    fn blank_text_builds_nothing() {
        for text in ["", "   ", "\n\r\n", " \t "] {
            let mut animator = Animator::new(MemorySurface::new().with_event_log());
            let outcome = animator.start(text, &AnimationSettings::default(), Trigger::Button, 0.0);
            assert_eq!(outcome, StartOutcome::NothingToAnimate);
            assert_eq!(animator.status_message(0.0), Some("Please enter some text to animate."));
            assert!(animator.trigger_enabled());
            assert!(animator.surface().events().is_empty());
            assert_eq!(animator.tick(10.0), None);
        }
    }

    #[test]
    fn carriage_returns_are_stripped() {
        let mut animator = Animator::new(MemorySurface::new());
        let outcome = animator.start("a\r\nb", &AnimationSettings::default(), Trigger::Api, 0.0);
        assert!(matches!(outcome, StartOutcome::Started { units: 2, .. }));
        assert_eq!(animator.surface().text(), "a\nb");
    }

    #[test]
    fn startup_run_needs_text() {
        let mut animator = Animator::new(MemorySurface::new());
        assert_eq!(animator.start_on_load("  ", &AnimationSettings::default(), 0.0), None);
        assert!(animator.status(0.0).is_none());
        assert!(matches!(
            animator.start_on_load("Hello", &AnimationSettings::default(), 0.0),
            Some(StartOutcome::Started { units: 5, .. })
        ));
    }

    #[test]
    fn second_run_cancels_first_before_building() {
        let mut animator = Animator::new(MemorySurface::new().with_event_log()).with_seed(3);
        animator.start("abc", &settings("zoomIn", 1000, 100), Trigger::Button, 0.0);
        animator.tick(16.0);

        // Programmatic start while the trigger is disabled is allowed.
        assert!(!animator.trigger_enabled());
        let second = animator.start("xy", &settings("decoder", 200, 10), Trigger::Api, 32.0);
        assert_eq!(second, StartOutcome::Started { run_id: 2, units: 2 });

        let events = animator.surface().events();
        let last_build = events
            .iter()
            .rposition(|e| matches!(e, SurfaceEvent::Build { .. }))
            .unwrap();
        assert_eq!(events[last_build], SurfaceEvent::Build { units: 2 });
        assert_eq!(events[last_build - 1], SurfaceEvent::Reset);
        let cancels = events[..last_build]
            .iter()
            .filter(|e| matches!(e, SurfaceEvent::Cancel { .. }))
            .count();
        assert_eq!(cancels, 3);
        assert_eq!(animator.surface().running_count(32.0), 0);

        let (outcome, now) = finish(&mut animator, 48.0);
        assert_eq!(outcome, RunOutcome::Completed { run_id: 2 });

        // Nothing from the first run touched the new units.
        let surface = animator.surface();
        assert_eq!(surface.text(), "xy");
        assert_eq!(surface.glyph_history(0).first(), Some(&'x'));
        assert_eq!(surface.glyph_history(1).first(), Some(&'y'));
        assert!(surface.effects_for(2).is_empty());
        assert!(surface.visual(0, now + 200.0).unwrap().is_at_rest());
    }

    #[test]
    fn build_failure_reports_and_reenables() {
        let mut animator = Animator::new(MemorySurface::new().fail_builds(true));
        let outcome = animator.start("oops", &AnimationSettings::default(), Trigger::Button, 0.0);
        assert!(matches!(outcome, StartOutcome::Failed(RunError::Build(_))));
        assert_eq!(animator.status_message(0.0), Some("Something went wrong while animating."));
        assert!(animator.trigger_enabled());
        assert!(!animator.is_running());
    }

    // Accepts animations but refuses glyph updates.
    struct BrokenGlyphs(MemorySurface);

    impl Surface for BrokenGlyphs {
        fn supports_animation(&self) -> bool {
            self.0.supports_animation()
        }
        fn reset(&mut self) -> Result<(), SurfaceError> {
            self.0.reset()
        }
        fn build(&mut self, layout: &Layout, config: &AnimationConfig) -> Result<(), SurfaceError> {
            self.0.build(layout, config)
        }
        fn play(&mut self, unit: usize, effect: &KeyframeEffect, now_ms: f64) -> Result<AnimationId, SurfaceError> {
            self.0.play(unit, effect, now_ms)
        }
        fn poll(&mut self, id: AnimationId, now_ms: f64) -> AnimationPoll {
            self.0.poll(id, now_ms)
        }
        fn cancel(&mut self, id: AnimationId) {
            self.0.cancel(id)
        }
        fn set_glyph(&mut self, _unit: usize, _glyph: char) -> Result<(), SurfaceError> {
            Err(SurfaceError::Backend("detached node".into()))
        }
        fn show(&mut self, unit: usize) -> Result<(), SurfaceError> {
            self.0.show(unit)
        }
    }

    #[test]
    fn unit_failure_ends_run_and_reenables() {
        let mut animator = Animator::new(BrokenGlyphs(MemorySurface::new()));
        animator.start("ab", &settings("decoder", 300, 0), Trigger::Shortcut, 0.0);
        let (outcome, now) = finish(&mut animator, 0.0);
        assert!(matches!(
            outcome,
            RunOutcome::Failed { run_id: 1, error: RunError::Unit { unit: 0, .. } }
        ));
        assert_eq!(animator.status_message(now), Some("Something went wrong while animating."));
        assert!(animator.trigger_enabled());
    }

    #[test]
    fn runs_complete_without_animation_support() {
        for style in ["fadeInUp", "flyInLeft", "zoomIn", "typewriter", "decoder"] {
            let mut animator = Animator::new(MemorySurface::without_animation());
            animator.start("go go", &settings(style, 200, 20), Trigger::Button, 0.0);
            let (outcome, now) = finish(&mut animator, 0.0);
            assert!(matches!(outcome, RunOutcome::Completed { .. }), "{style}");
            assert_eq!(animator.surface().text(), "go go");
            for i in 0..5 {
                assert_eq!(animator.surface().visual(i, now).unwrap().opacity, 1.0, "{style}");
            }
        }
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let history = |seed| {
            let mut animator = Animator::new(MemorySurface::new()).with_seed(seed);
            animator.start("abc", &settings("decoder", 300, 0), Trigger::Api, 0.0);
            finish(&mut animator, 0.0);
            animator.surface().glyph_history(1).to_vec()
        };
        assert_eq!(history(9), history(9));
    }
}
