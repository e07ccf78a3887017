use kurbo::Shape;

use crate::animation::ease::Ease;
use crate::foundation::core::{Canvas, FrameRGBA, Point, Rgba8, Vec2};
use crate::foundation::error::{DotmorphError, DotmorphResult};
use crate::foundation::math::clamp01;
use crate::render::config::RenderConfig;
use crate::scene::config::SwayStyle;
use crate::sim::dot::Dot;
use crate::sim::engine::Simulation;

const CIRCLE_TOLERANCE: f64 = 0.1;

/// Settledness of `dot` in `[0, 1]`: 1 on its home, 0 at `settle_radius` or beyond.
pub fn settledness(dot: &Dot, settle_radius: f64) -> f64 {
    if settle_radius <= 0.0 {
        return 1.0;
    }
    1.0 - Ease::OutQuad.apply(clamp01(dot.home_distance() / settle_radius))
}

/// Color for a given settledness.
pub fn dot_color(config: &RenderConfig, settledness: f64) -> Rgba8 {
    config
        .unsettled_color
        .lerp(config.settled_color, clamp01(settledness))
}

fn surface_dims(canvas: Canvas) -> DotmorphResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| DotmorphError::validation("surface width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| DotmorphError::validation("surface height exceeds u16"))?;
    Ok((w, h))
}

/// CPU dot-field renderer.
///
/// Owns one reusable render context and target pixmap sized to the canvas.
pub struct DotRenderer {
    config: RenderConfig,
    canvas: Canvas,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    last_drawn: usize,
}

impl std::fmt::Debug for DotRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DotRenderer")
            .field("config", &self.config)
            .field("canvas", &self.canvas)
            .field("last_drawn", &self.last_drawn)
            .finish_non_exhaustive()
    }
}

impl DotRenderer {
    /// Create a renderer for `canvas`.
    pub fn new(canvas: Canvas, config: RenderConfig) -> DotmorphResult<Self> {
        let (w, h) = surface_dims(canvas)?;
        Ok(Self {
            config,
            canvas,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            last_drawn: 0,
        })
    }

    /// Appearance settings.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Toggle the static reduced-motion mode.
    pub fn set_reduced_motion(&mut self, on: bool) {
        self.config.reduced_motion = on;
    }

    /// Dots drawn by the last [`DotRenderer::render`].
    pub fn last_drawn(&self) -> usize {
        self.last_drawn
    }

    /// Reallocate surfaces for a new canvas size.
    pub fn resize(&mut self, canvas: Canvas) -> DotmorphResult<()> {
        if canvas == self.canvas {
            return Ok(());
        }
        let (w, h) = surface_dims(canvas)?;
        self.ctx = vello_cpu::RenderContext::new(w, h);
        self.pixmap = vello_cpu::Pixmap::new(w, h);
        self.canvas = canvas;
        Ok(())
    }

    /// Draw the current state of `sim`.
    ///
    /// Dots are colored by settledness and drawn at their position plus the ramped sway offset
    /// (when the active scene expresses sway as an offset). Dots outside the canvas grown by the
    /// off-screen margin are skipped. In reduced-motion mode every dot is drawn at its home in the
    /// settled color.
    pub fn render(&mut self, sim: &Simulation) -> FrameRGBA {
        let (w, h) = (f64::from(self.canvas.width), f64::from(self.canvas.height));
        self.ctx.reset();
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

        let bg = self.config.background;
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));

        let tuning = sim.tuning();
        let reduced = self.config.reduced_motion;
        let offset_sway = !reduced && tuning.sway_style == SwayStyle::TargetOffset;
        let margin = self.config.offscreen_margin_px;
        let mut drawn = 0;

        for dot in sim.dots() {
            let (center, color) = if reduced {
                (dot.home, self.config.settled_color)
            } else {
                let s = settledness(dot, tuning.settle_radius_px);
                let offset = if offset_sway {
                    sim.sway_offset(dot)
                } else {
                    Vec2::ZERO
                };
                (dot.pos + offset, dot_color(&self.config, s))
            };
            let r = dot.radius * self.config.radius_scale;
            if !self.canvas.contains_with_margin(center, margin.max(r)) {
                continue;
            }
            self.fill_circle(center, r, color);
            drawn += 1;
        }

        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        self.last_drawn = drawn;

        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    fn fill_circle(&mut self, center: Point, r: f64, color: Rgba8) {
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        let circle = kurbo::Circle::new(center, r);
        let mut p = vello_cpu::kurbo::BezPath::new();
        for el in circle.path_elements(CIRCLE_TOLERANCE) {
            p.push(el);
        }
        self.ctx.fill_path(&p);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/dots.rs"]
mod tests;
