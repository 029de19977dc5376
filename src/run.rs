//! One animation run over a freshly built surface.
//!
//! A [`Run`] owns one task per unit. Tasks start in index order and proceed
//! independently; the run completes when every task has settled. A unit whose
//! animation is rejected or cancelled counts as settled, so one failure never
//! holds back its siblings. Only surface failures outside animation requests
//! end the run early.

use log::{debug, trace};
use rand::rngs::StdRng;

use crate::effects::{entrance_effect, random_glyph, scramble_steps, settle_effect, typewriter_effect};
use crate::{
    AnimationConfig, AnimationId, AnimationStyle, KeyframeEffect, Layout, RunError, Surface,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TaskKind {
    Entrance,
    Typewriter,
    Decoder { steps: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    /// Scheduled callback not yet due
    Waiting { due: f64 },
    Scrambling { steps_left: u32 },
    Animating(AnimationId),
    Settled,
}

#[derive(Clone, Debug)]
struct UnitTask {
    unit: usize,
    final_glyph: char,
    kind: TaskKind,
    phase: Phase,
}

impl UnitTask {
    // A rejected animation request settles the unit.
    fn play_or_settle<S: Surface>(&self, surface: &mut S, effect: &KeyframeEffect, now_ms: f64) -> Phase {
        match surface.play(self.unit, effect, now_ms) {
            Ok(id) => Phase::Animating(id),
            Err(err) => {
                debug!("unit {} animation not played: {}", self.unit, err);
                Phase::Settled
            }
        }
    }

    fn advance<S: Surface>(
        &mut self,
        surface: &mut S,
        config: &AnimationConfig,
        rng: &mut StdRng,
        now_ms: f64,
    ) -> Result<(), RunError> {
        let unit = self.unit;
        let wrap = |source| RunError::Unit { unit, source };

        if let Phase::Waiting { due } = self.phase {
            if now_ms < due {
                return Ok(());
            }
            self.phase = match self.kind {
                TaskKind::Entrance => Phase::Settled,
                TaskKind::Typewriter if surface.supports_animation() => {
                    self.play_or_settle(surface, &typewriter_effect(config), now_ms)
                }
                TaskKind::Decoder { .. } if self.final_glyph.is_whitespace() => {
                    surface.show(unit).map_err(wrap)?;
                    Phase::Settled
                }
                TaskKind::Typewriter => {
                    surface.show(unit).map_err(wrap)?;
                    Phase::Settled
                }
                TaskKind::Decoder { steps } => Phase::Scrambling { steps_left: steps },
            };
        }

        match self.phase {
            Phase::Scrambling { steps_left } if steps_left > 0 => {
                surface.set_glyph(unit, random_glyph(rng)).map_err(wrap)?;
                surface.show(unit).map_err(wrap)?;
                self.phase = Phase::Scrambling {
                    steps_left: steps_left - 1,
                };
            }
            Phase::Scrambling { .. } => {
                surface.set_glyph(unit, self.final_glyph).map_err(wrap)?;
                self.phase = if surface.supports_animation() {
                    self.play_or_settle(surface, &settle_effect(), now_ms)
                } else {
                    Phase::Settled
                };
                trace!("unit {} decoded", unit);
            }
            Phase::Animating(id) => {
                if surface.poll(id, now_ms).is_settled() {
                    self.phase = Phase::Settled;
                }
            }
            Phase::Waiting { .. } | Phase::Settled => {}
        }
        Ok(())
    }
}

/// Where a run stands after a tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// At least one unit is waiting or animating
    Running,
    /// Every unit settled
    Completed,
    /// A surface update failed; remaining tasks were dropped
    Failed(RunError),
    /// Superseded by a newer run
    Cancelled,
}

/// A single invocation of the animator.
#[derive(Debug)]
pub struct Run {
    id: u64,
    config: AnimationConfig,
    /// Timestamp passed to [`Run::start`]
    started_at: f64,
    /// One task per unit, in index order
    tasks: Vec<UnitTask>,
    rng: StdRng,
    status: RunStatus,
}

impl Run {
    /// Reset the surface, build `layout` on it and launch every unit task.
    ///
    /// Entrance styles play their staggered effect right away; typewriter and
    /// decoder units wait for their stagger and act on later ticks.
    pub fn start<S: Surface>(
        id: u64,
        surface: &mut S,
        layout: &Layout,
        config: AnimationConfig,
        rng: StdRng,
        now_ms: f64,
    ) -> Result<Run, RunError> {
        surface.reset().map_err(RunError::Build)?;
        surface.build(layout, &config).map_err(RunError::Build)?;

        let kind = match config.style {
            AnimationStyle::FadeInUp | AnimationStyle::FlyInLeft | AnimationStyle::ZoomIn => {
                TaskKind::Entrance
            }
            AnimationStyle::Typewriter => TaskKind::Typewriter,
            AnimationStyle::Decoder => TaskKind::Decoder {
                steps: scramble_steps(config.duration_ms),
            },
        };

        let mut tasks = Vec::with_capacity(layout.len());
        for unit in &layout.units {
            let mut task = UnitTask {
                unit: unit.index,
                final_glyph: unit.glyph,
                kind,
                phase: Phase::Waiting {
                    due: now_ms + config.start_delay_ms(unit.index),
                },
            };
            if kind == TaskKind::Entrance {
                task.phase = match entrance_effect(&config, unit.index) {
                    Some(effect) if surface.supports_animation() => {
                        task.play_or_settle(surface, &effect, now_ms)
                    }
                    _ => {
                        surface
                            .show(unit.index)
                            .map_err(|source| RunError::Unit { unit: unit.index, source })?;
                        Phase::Settled
                    }
                };
            }
            tasks.push(task);
        }

        debug!(
            "run {} started: style={} units={} duration={}ms stagger={}ms",
            id,
            config.style,
            tasks.len(),
            config.duration_ms,
            config.stagger_ms
        );

        let status = if tasks.iter().all(|t| t.phase == Phase::Settled) {
            RunStatus::Completed
        } else {
            RunStatus::Running
        };

        Ok(Run {
            id,
            config,
            started_at: now_ms,
            tasks,
            rng,
            status,
        })
    }

    /// Run number, unique per animator.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Normalized config this run was started with.
    #[inline]
    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Time the run was started, in milliseconds.
    #[inline]
    pub fn started_at(&self) -> f64 {
        self.started_at
    }

    /// Status as of the last tick.
    #[inline]
    pub fn status(&self) -> &RunStatus {
        &self.status
    }

    /// Number of units the run was built with.
    #[inline]
    pub fn unit_count(&self) -> usize {
        self.tasks.len()
    }

    /// Units still animating or waiting to start.
    pub fn pending(&self) -> usize {
        self.tasks.iter().filter(|t| t.phase != Phase::Settled).count()
    }

    /// Advance every unit task to `now_ms`. Call once per animation frame.
    pub fn tick<S: Surface>(&mut self, surface: &mut S, now_ms: f64) -> &RunStatus {
        if self.status != RunStatus::Running {
            return &self.status;
        }

        for task in &mut self.tasks {
            if let Err(err) = task.advance(surface, &self.config, &mut self.rng, now_ms) {
                self.status = RunStatus::Failed(err);
                return &self.status;
            }
        }

        if self.pending() == 0 {
            self.status = RunStatus::Completed;
        }
        &self.status
    }

    /// Cancel this run's animations and drop its pending callbacks.
    ///
    /// Must be called before the surface is reset for another run so that no
    /// update from this run reaches the new units.
    pub fn cancel<S: Surface>(&mut self, surface: &mut S) {
        let mut cancelled = 0;
        for task in &mut self.tasks {
            match task.phase {
                Phase::Animating(id) => {
                    surface.cancel(id);
                    cancelled += 1;
                }
                Phase::Waiting { .. } | Phase::Scrambling { .. } => cancelled += 1,
                Phase::Settled => {}
            }
            task.phase = Phase::Settled;
        }
        if self.status == RunStatus::Running {
            self.status = RunStatus::Cancelled;
        }
        debug!("run {} cancelled with {} units in flight", self.id, cancelled);
    }
}
