use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use crate::cache::source::SvgSource;
use crate::cache::store::{FitRequest, SampleCache};
use crate::foundation::core::{Canvas, FrameRGBA, Point, Vec2};
use crate::foundation::error::DotmorphResult;
use crate::foundation::math::lerp_point;
use crate::render::dots::DotRenderer;
use crate::scene::config::{SceneConfig, SceneId, SceneTuning, ScrollRange};
use crate::scene::provider::TargetProvider;
use crate::scene::registry::{SceneRegistry, TargetBlend};
use crate::scene::slot::TargetSlot;
use crate::session::config::EngineConfig;
use crate::session::loader::TargetLoader;
use crate::sim::burst::{RetargetMode, RetargetOptions};
use crate::sim::engine::Simulation;
use crate::viewport::throttle::Throttle;
use crate::viewport::ticker::{
    FrameScheduler, Subscription, ViewportProvider, ViewportSample, ViewportTicker,
};

const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;
const OVERRIDE_OUTLINE_RATIO: f64 = 0.6;

/// A hard shape swap requested by the host; it holds until the active scene changes.
struct Override {
    url: String,
    slot: TargetSlot,
    mode: RetargetMode,
    opts: RetargetOptions,
    // scene the override belongs to; unbound until the first frame has resolved one
    scene: Option<SceneId>,
    bound: bool,
    // slot request last applied to the simulation; 0 before the burst
    applied: u64,
}

/// The canvas root: owns every engine component and runs the per-frame control flow.
///
/// Frames flow viewport sample → scene resolution → simulation step; [`MorphSession::render`]
/// draws the current state. The session is `!Send`: the ticker and its subscriptions live on
/// the frame thread. SVG targets load on the loader's workers and are picked up on the next
/// frame after they publish.
pub struct MorphSession {
    config: EngineConfig,
    canvas: Canvas,
    // dropped before the ticker so unsubscribing cancels the pending frame
    subscription: Option<Subscription>,
    ticker: ViewportTicker,
    latest: Rc<Cell<Option<ViewportSample>>>,
    registry: SceneRegistry,
    cache: Arc<SampleCache>,
    loader: TargetLoader,
    sim: Simulation,
    renderer: DotRenderer,
    resize: Throttle<Canvas>,
    active: Option<SceneId>,
    last_blend: Option<TargetBlend>,
    retarget: Option<Override>,
    last_frame_ms: Option<f64>,
}

impl std::fmt::Debug for MorphSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MorphSession")
            .field("canvas", &self.canvas)
            .field("scenes", &self.registry.len())
            .field("active", &self.active)
            .field("last_blend", &self.last_blend)
            .finish_non_exhaustive()
    }
}

impl MorphSession {
    /// Build a session over `canvas`, reading artwork from `source` and viewport state from
    /// `provider`. Frames are requested through `scheduler`.
    pub fn new(
        canvas: Canvas,
        config: EngineConfig,
        source: Arc<dyn SvgSource>,
        provider: Box<dyn ViewportProvider>,
        scheduler: Box<dyn FrameScheduler>,
    ) -> DotmorphResult<Self> {
        config.validate()?;
        let cache = Arc::new(SampleCache::new(source, config.cache));
        let loader = if config.inline_loads {
            TargetLoader::inline(Arc::clone(&cache))
        } else {
            TargetLoader::pooled(Arc::clone(&cache), config.loader_threads)?
        };
        let sim = Simulation::new(canvas, config.sim.clone(), &[]);
        let renderer = DotRenderer::new(canvas, config.render.clone())?;

        let ticker = ViewportTicker::new(provider, scheduler);
        let latest = Rc::new(Cell::new(None));
        let sink = Rc::clone(&latest);
        let subscription = ticker.subscribe(move |s: &ViewportSample| sink.set(Some(*s)));

        tracing::debug!(
            width = canvas.width,
            height = canvas.height,
            dots = sim.len(),
            "morph session created"
        );
        Ok(Self {
            resize: Throttle::new(config.resize_throttle_ms),
            config,
            canvas,
            subscription: Some(subscription),
            ticker,
            latest,
            registry: SceneRegistry::new(),
            cache,
            loader,
            sim,
            renderer,
            active: None,
            last_blend: None,
            retarget: None,
            last_frame_ms: None,
        })
    }

    /// Engine configuration in effect.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current canvas.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// The frame ticker driving this session.
    pub fn ticker(&self) -> &ViewportTicker {
        &self.ticker
    }

    /// Mounted scenes.
    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    /// The dot field.
    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// The session's sample cache.
    pub fn cache(&self) -> &Arc<SampleCache> {
        &self.cache
    }

    /// Blend resolved on the last frame.
    pub fn last_blend(&self) -> Option<&TargetBlend> {
        self.last_blend.as_ref()
    }

    /// Scene whose tuning is currently applied.
    pub fn active_scene(&self) -> Option<&SceneId> {
        self.active.as_ref()
    }

    /// Register a scene and start loading its target. Mounting an existing id replaces it.
    pub fn mount_scene(&mut self, config: SceneConfig) -> SceneId {
        let id = config.id.clone();
        if config.range.is_empty() {
            tracing::warn!(scene = %id, "scene mounted with an empty scroll range");
        }
        let slot = self.registry.add(config);
        self.request_targets(&id, &slot);
        id
    }

    /// Remove a scene. In-flight loads for it are discarded when they finish.
    pub fn unmount_scene(&mut self, id: &SceneId) -> bool {
        let removed = self.registry.remove(id).is_some();
        if removed && self.active.as_ref() == Some(id) {
            self.activate(None);
        }
        removed
    }

    /// Update a scene's scroll range after the host re-measured its layout.
    pub fn remeasure_scene(&mut self, id: &SceneId, range: ScrollRange) -> bool {
        self.registry.remeasure(id, range)
    }

    /// Swap the shape to the artwork at `url`, fire-and-forget.
    ///
    /// The points load off-frame and are applied with a burst on the first frame after they
    /// arrive. The override holds until the active scene changes; one issued before any frame
    /// binds to the scene the first frame activates.
    pub fn retarget(&mut self, url: impl Into<String>, mode: RetargetMode, opts: RetargetOptions) {
        let url = url.into();
        let slot = TargetSlot::new();
        self.request_override(&url, &slot);
        self.retarget = Some(Override {
            url,
            slot,
            mode,
            opts,
            scene: self.active.clone(),
            bound: self.last_frame_ms.is_some(),
            applied: 0,
        });
    }

    /// Toggle the static reduced-motion mode.
    pub fn set_reduced_motion(&mut self, on: bool) {
        self.config.render.reduced_motion = on;
        self.renderer.set_reduced_motion(on);
    }

    /// Change the dot count; the field re-initializes and every target is re-requested.
    pub fn set_dot_count(&mut self, count: usize) {
        if count == 0 || count == self.sim.len() {
            return;
        }
        self.config.sim.count = count;
        self.sim.resize(self.canvas, count);
        self.request_all_targets();
    }

    /// Block until every outstanding target load has published.
    pub fn wait_idle(&self) {
        self.loader.wait_idle();
    }

    /// Drop every cached document and point set.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Run one frame at host time `now_ms`.
    ///
    /// Returns `false` when the ticker is stopped and nothing advanced.
    pub fn on_frame(&mut self, now_ms: f64) -> bool {
        if !self.ticker.on_frame(now_ms) {
            return false;
        }
        let Some(sample) = self.latest.get() else {
            return false;
        };

        let dt_ms = match self.last_frame_ms {
            Some(prev) => (now_ms - prev).max(0.0),
            None => NOMINAL_FRAME_MS,
        };
        self.last_frame_ms = Some(now_ms);

        self.track_resize(&sample, now_ms);
        self.update_targets(sample.scroll_y);

        if self.config.render.reduced_motion {
            self.sim.settle_to_homes();
        } else {
            self.sim.step(dt_ms / 1000.0);
        }
        true
    }

    /// Draw the current dot field.
    pub fn render(&mut self) -> FrameRGBA {
        self.renderer.render(&self.sim)
    }

    fn track_resize(&mut self, sample: &ViewportSample, now_ms: f64) {
        let (w, h) = (sample.width.round(), sample.height.round());
        if w >= 1.0
            && h >= 1.0
            && let Ok(c) = Canvas::new(w as u32, h as u32)
            && c != self.canvas
        {
            self.resize.schedule(c, now_ms);
        }
        if let Some(c) = self.resize.poll(now_ms) {
            self.apply_resize(c);
        }
    }

    fn apply_resize(&mut self, canvas: Canvas) {
        if canvas == self.canvas {
            return;
        }
        if let Err(e) = self.renderer.resize(canvas) {
            tracing::warn!(error = %e, "renderer resize failed; keeping previous size");
            return;
        }
        tracing::debug!(
            width = canvas.width,
            height = canvas.height,
            "applying viewport resize"
        );
        self.canvas = canvas;
        self.sim.resize(canvas, self.config.sim.count);
        self.request_all_targets();
    }

    fn update_targets(&mut self, scroll_y: f64) {
        let blend = self.registry.resolve(scroll_y);
        let active = blend.as_ref().map(|b| b.active.clone());
        if active != self.active {
            self.activate(active);
        }

        if let Some(mut o) = self.retarget.take() {
            if !o.bound {
                o.bound = true;
                if o.scene != self.active {
                    o.scene = self.active.clone();
                    self.request_override(&o.url, &o.slot);
                }
            }
            if o.scene != self.active {
                tracing::debug!(url = %o.url, "active scene changed; dropping retarget override");
            } else {
                self.apply_override(&mut o);
                self.retarget = Some(o);
                self.last_blend = blend;
                return;
            }
        }

        if let Some(b) = &blend
            && let Some(homes) = self.blend_homes(b)
        {
            if self.config.render.reduced_motion {
                self.sim.place_homes(&homes);
            } else {
                self.sim.set_homes(&homes);
            }
        }
        self.last_blend = blend;
    }

    fn apply_override(&mut self, o: &mut Override) {
        let published = o.slot.published();
        if published == o.applied {
            return;
        }
        let Some(points) = o.slot.points() else {
            return;
        };
        if o.applied == 0 {
            self.sim.retarget(&points, o.mode, o.opts);
        } else {
            // refit after a resize or count change
            self.sim.place_homes(&points);
        }
        if self.config.render.reduced_motion {
            self.sim.settle_to_homes();
        }
        o.applied = published;
    }

    fn activate(&mut self, active: Option<SceneId>) {
        let tuning = active
            .as_ref()
            .and_then(|id| self.registry.get(id))
            .map_or_else(SceneTuning::default, |e| e.config.tuning.clone());
        tracing::debug!(from = ?self.active, to = ?active, "active scene changed");
        let snap = tuning.snap_on_enter;
        self.sim.apply_tuning(tuning);
        if snap && active.is_some() {
            self.sim
                .start_burst(RetargetMode::Snap, RetargetOptions::default());
        }
        self.active = active;
    }

    fn blend_homes(&self, blend: &TargetBlend) -> Option<Vec<Point>> {
        let to = self
            .registry
            .get(&blend.to)?
            .slot
            .points()
            .filter(|p| !p.is_empty())?;
        let from = blend
            .from
            .as_ref()
            .and_then(|id| self.registry.get(id))
            .and_then(|e| e.slot.points());
        let t = blend.t;
        let homes = self
            .sim
            .dots()
            .iter()
            .enumerate()
            .map(|(i, dot)| {
                let b = to[i % to.len()];
                let a = match &from {
                    Some(f) if !f.is_empty() => f[i % f.len()],
                    _ => dot.start_pos,
                };
                lerp_point(a, b, t)
            })
            .collect();
        Some(homes)
    }

    fn request_all_targets(&mut self) {
        let scenes: Vec<(SceneId, TargetSlot)> = self
            .registry
            .iter()
            .map(|e| (e.config.id.clone(), e.slot.clone()))
            .collect();
        for (id, slot) in &scenes {
            self.request_targets(id, slot);
        }
        if let Some(o) = &self.retarget {
            let (url, slot) = (o.url.clone(), o.slot.clone());
            self.request_override(&url, &slot);
        }
    }

    fn request_targets(&self, id: &SceneId, slot: &TargetSlot) {
        let Some(entry) = self.registry.get(id) else {
            return;
        };
        let tuning = &entry.config.tuning;
        let dest = tuning.placement(self.canvas.rect());
        let offset = tuning.offset();
        let count = self.sim.len();
        let request = slot.begin_request();

        match &entry.config.provider {
            TargetProvider::Svg {
                url,
                outline_ratio,
                padding,
            } => {
                let req = FitRequest {
                    url: url.clone(),
                    count,
                    dest,
                    padding: *padding,
                    offset,
                    outline_ratio: *outline_ratio,
                };
                self.loader
                    .load(req, slot.downgrade(), request, id.as_str().to_string());
            }
            provider => {
                let points = provider
                    .procedural_points(dest, count, id.as_str())
                    .unwrap_or_default();
                slot.publish(request, shifted(points, offset), false);
            }
        }
    }

    fn request_override(&self, url: &str, slot: &TargetSlot) {
        let tuning = self
            .active
            .as_ref()
            .and_then(|id| self.registry.get(id))
            .map_or_else(SceneTuning::default, |e| e.config.tuning.clone());
        let req = FitRequest {
            url: url.to_string(),
            count: self.sim.len(),
            dest: tuning.placement(self.canvas.rect()),
            padding: 0.0,
            offset: tuning.offset(),
            outline_ratio: OVERRIDE_OUTLINE_RATIO,
        };
        let request = slot.begin_request();
        self.loader
            .load(req, slot.downgrade(), request, format!("retarget|{url}"));
    }
}

impl Drop for MorphSession {
    fn drop(&mut self) {
        drop(self.subscription.take());
        self.cache.clear();
    }
}

fn shifted(points: Vec<Point>, offset: Vec2) -> Arc<[Point]> {
    if offset == Vec2::ZERO {
        return points.into();
    }
    points.into_iter().map(|p| p + offset).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/session/morph.rs"]
mod tests;
