use smallvec::SmallVec;

use crate::foundation::math::{clamp01, inv_lerp};
use crate::scene::config::{SceneConfig, SceneId, ScrollRange};
use crate::scene::provider::ProviderKind;
use crate::scene::slot::TargetSlot;

/// Resolved scroll target for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct TargetBlend {
    /// Scene being blended away from. `None` before the first scene, where the implicit start
    /// (the dots' initial positions) stands in.
    pub from: Option<SceneId>,
    /// Scene being blended toward.
    pub to: SceneId,
    /// Blend weight toward `to`, in `[0, 1]`.
    pub t: f64,
    /// Provider kind of the active scene.
    pub mode: ProviderKind,
    /// Scene whose tuning drives the physics.
    pub active: SceneId,
}

/// A mounted scene and its target slot.
#[derive(Debug)]
pub struct SceneEntry {
    /// Mount configuration.
    pub config: SceneConfig,
    /// Loaded target points.
    pub slot: TargetSlot,
}

/// Mounted scenes kept in document order.
#[derive(Debug, Default)]
pub struct SceneRegistry {
    scenes: Vec<SceneEntry>,
}

impl SceneRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of mounted scenes.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Whether nothing is mounted.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Mount `config`, replacing any scene with the same id. Returns the new scene's slot.
    pub fn add(&mut self, config: SceneConfig) -> TargetSlot {
        if self.remove(&config.id).is_some() {
            tracing::debug!(scene = %config.id, "replacing mounted scene");
        }
        let slot = TargetSlot::new();
        self.scenes.push(SceneEntry {
            config,
            slot: slot.clone(),
        });
        self.sort();
        slot
    }

    /// Unmount a scene.
    pub fn remove(&mut self, id: &SceneId) -> Option<SceneEntry> {
        let idx = self.scenes.iter().position(|s| &s.config.id == id)?;
        Some(self.scenes.remove(idx))
    }

    /// Update a scene's measured range. Returns `false` for unknown ids.
    pub fn remeasure(&mut self, id: &SceneId, range: ScrollRange) -> bool {
        let Some(entry) = self.scenes.iter_mut().find(|s| &s.config.id == id) else {
            return false;
        };
        entry.config.range = range;
        self.sort();
        true
    }

    /// Look up a scene.
    pub fn get(&self, id: &SceneId) -> Option<&SceneEntry> {
        self.scenes.iter().find(|s| &s.config.id == id)
    }

    /// Scenes in document order.
    pub fn iter(&self) -> impl Iterator<Item = &SceneEntry> {
        self.scenes.iter()
    }

    fn sort(&mut self) {
        self.scenes.sort_by(|a, b| {
            a.config
                .range
                .start
                .total_cmp(&b.config.range.start)
                .then(a.config.order.cmp(&b.config.order))
        });
    }

    /// Map a scroll offset to a target blend. `None` when nothing is mounted.
    pub fn resolve(&self, scroll_y: f64) -> Option<TargetBlend> {
        let first = self.scenes.first()?;
        let y = if scroll_y.is_finite() { scroll_y } else { 0.0 };

        let mut containing: SmallVec<[usize; 4]> = self
            .scenes
            .iter()
            .enumerate()
            .filter(|(_, s)| s.config.range.contains(y))
            .map(|(i, _)| i)
            .collect();

        if containing.len() == 1 {
            return Some(self.blend(None, containing[0], 1.0));
        }

        if containing.len() > 1 {
            // two highest-ordered containing scenes; the higher one is `to`
            containing.sort_by(|&a, &b| {
                let (ca, cb) = (&self.scenes[a].config, &self.scenes[b].config);
                ca.order
                    .cmp(&cb.order)
                    .then(ca.range.start.total_cmp(&cb.range.start))
            });
            let to = containing[containing.len() - 1];
            let from = containing[containing.len() - 2];
            let (ra, rb) = (self.scenes[from].config.range, self.scenes[to].config.range);
            let lo = ra.start.max(rb.start);
            let hi = ra.end.min(rb.end);
            let t = if ra == rb { 1.0 } else { clamp01(inv_lerp(lo, hi, y)) };
            return Some(self.blend(Some(from), to, t));
        }

        let prev = self
            .scenes
            .iter()
            .enumerate()
            .filter(|(_, s)| s.config.range.end <= y)
            .max_by(|(_, a), (_, b)| {
                a.config
                    .range
                    .end
                    .total_cmp(&b.config.range.end)
                    .then(a.config.order.cmp(&b.config.order))
            })
            .map(|(i, _)| i);
        let next = self
            .scenes
            .iter()
            .position(|s| s.config.range.start > y);

        match (prev, next) {
            (Some(p), Some(n)) => {
                let gap_start = self.scenes[p].config.range.end;
                let gap_end = self.scenes[n].config.range.start;
                Some(self.blend(Some(p), n, clamp01(inv_lerp(gap_start, gap_end, y))))
            }
            (None, Some(n)) => {
                let start = self.scenes[n].config.range.start;
                let ramp = {
                    let len = first.config.range.len();
                    if len > 0.0 { len } else { 1.0 }
                };
                let t = clamp01(inv_lerp(start - ramp, start, y));
                Some(self.blend(None, n, t))
            }
            (Some(p), None) => Some(self.blend(None, p, 1.0)),
            // every scene is zero-length at exactly `y`
            (None, None) => Some(self.blend(None, self.scenes.len() - 1, 1.0)),
        }
    }

    fn blend(&self, from: Option<usize>, to: usize, t: f64) -> TargetBlend {
        let to_cfg = &self.scenes[to].config;
        let from_id = from.map(|i| self.scenes[i].config.id.clone());
        let active_idx = match from {
            Some(f) if t < 0.5 => f,
            _ => to,
        };
        let active = &self.scenes[active_idx].config;
        TargetBlend {
            from: from_id,
            to: to_cfg.id.clone(),
            t,
            mode: active.provider.kind(),
            active: active.id.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/registry.rs"]
mod tests;
