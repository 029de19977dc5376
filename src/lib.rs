//! # kinetic-type
//!
//! Per-character kinetic typography.
//!
//! This crate turns a short text into one animatable unit per character and
//! plays one of five entrance styles over them:
//! - `fadeInUp`, `flyInLeft`, `zoomIn`: staggered two-keyframe entrances
//! - `typewriter`: units pop in one at a time
//! - `decoder`: units cycle random glyphs before settling
//!
//! The core is platform-agnostic. An [`Animator`] drives a [`Surface`] and is
//! ticked by the caller once per animation frame; [`MemorySurface`] keeps
//! everything in memory and can be rendered to a draw list.
//!
//! ## Features
//!
//! - `serde` - Enable serialization/deserialization for settings
//! - `toml` - Load [`AnimationSettings`] presets from TOML
//! - `web` - DOM surface using the Web Animations API and a page controller
//!
//! ## Example
//!
//! ```rust
//! use kinetic_type::{AnimationSettings, Animator, MemorySurface, Trigger};
//!
//! let settings = AnimationSettings {
//!     style: Some("decoder".into()),
//!     ..Default::default()
//! };
//!
//! let mut animator = Animator::new(MemorySurface::new());
//! animator.start("Hello", &settings, Trigger::Api, 0.0);
//!
//! let mut now = 0.0;
//! while animator.tick(now).is_none() {
//!     now += 16.0;
//! }
//! assert_eq!(animator.surface().text(), "Hello");
//! ```

mod animator;
mod color;
pub mod config;
mod decompose;
pub mod effects;
mod error;
mod headless;
mod keyframes;
pub mod render;
mod run;
mod sizing;
pub mod status;
mod style;
mod surface;
mod trigger;

#[cfg(feature = "web")]
pub mod web;

pub use animator::{Animator, RunOutcome, StartOutcome};
pub use color::TextColor;
pub use config::{AnimationConfig, AnimationSettings};
pub use decompose::{decompose, strip_carriage_returns, CharUnit, Layout, LayoutItem};
pub use error::{RunError, SurfaceError};
pub use headless::{MemorySurface, SurfaceEvent, UnitSnapshot};
pub use keyframes::{Easing, Keyframe, KeyframeEffect, Transform, VisualState};
pub use render::{GlyphDraw, RenderResult};
pub use run::{Run, RunStatus};
pub use sizing::TextMetrics;
pub use status::Notice;
pub use style::AnimationStyle;
pub use surface::{AnimationId, AnimationPoll, Surface};
pub use trigger::{is_run_shortcut, Trigger};

#[cfg(feature = "web")]
pub use web::{start_app, DomSurface, TypographyApp};
