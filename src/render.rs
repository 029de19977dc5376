//! Draw lists for non-DOM front-ends.

use crate::{MemorySurface, TextColor, TextMetrics};

/// One glyph to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphDraw {
    /// Unit index
    pub index: usize,
    /// Glyph currently displayed, which may be a scramble glyph
    pub glyph: char,
    /// Left edge in pixels, transform applied
    pub x: f64,
    /// Top edge in pixels, transform applied
    pub y: f64,
    /// Opacity in `(0, 1]`
    pub opacity: f64,
    /// Scale around the cell center
    pub scale: f64,
}

/// Everything a canvas or terminal needs to paint one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderResult {
    /// Block width in pixels
    pub width: f64,
    /// Block height in pixels
    pub height: f64,
    /// Font size in pixels
    pub font_size: f64,
    /// Fill color for every glyph
    pub color: TextColor,
    /// Visible glyphs in index order
    pub glyphs: Vec<GlyphDraw>,
}

impl RenderResult {
    /// CSS `font` shorthand for the frame.
    pub fn font_css(&self) -> String {
        format!("{:.2}px monospace", self.font_size)
    }
}

/// Produce the draw list for `surface` at `now_ms`.
///
/// Invisible units and whitespace glyphs are skipped.
///
/// ## Example
///
/// ```rust
/// use kinetic_type::{Animator, AnimationSettings, MemorySurface, TextMetrics, Trigger};
/// use kinetic_type::render::render_surface;
///
/// let mut animator = Animator::new(MemorySurface::new());
/// animator.start("a b", &AnimationSettings::default(), Trigger::Api, 0.0);
///
/// // Before any delay elapses every unit is still transparent.
/// let frame = render_surface(animator.surface(), 0.0, &TextMetrics::default());
/// assert!(frame.glyphs.is_empty());
///
/// let frame = render_surface(animator.surface(), 10_000.0, &TextMetrics::default());
/// assert_eq!(frame.glyphs.len(), 2);
/// ```
pub fn render_surface(surface: &MemorySurface, now_ms: f64, metrics: &TextMetrics) -> RenderResult {
    let config = surface.config().copied().unwrap_or_default();
    let font_size = f64::from(config.font_size);
    let layout = surface.layout();
    let (width, height) = if layout.is_empty() {
        (0.0, 0.0)
    } else {
        metrics.block_size(layout.max_columns(), layout.line_count(), font_size)
    };

    let glyphs = surface
        .snapshot(now_ms)
        .into_iter()
        .filter(|unit| !unit.glyph.is_whitespace() && unit.visual.opacity > 0.0)
        .map(|unit| {
            let (x, y) = metrics.cell_origin(unit.column, unit.line, font_size);
            let t = unit.visual.transform;
            GlyphDraw {
                index: unit.index,
                glyph: unit.glyph,
                x: x + t.translate_x,
                y: y + t.translate_y,
                opacity: unit.visual.opacity.clamp(0.0, 1.0),
                scale: t.scale,
            }
        })
        .collect();

    RenderResult {
        width,
        height,
        font_size,
        color: config.color,
        glyphs,
    }
}
