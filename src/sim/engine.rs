use crate::animation::ease::Ease;
use crate::foundation::core::{Canvas, Point, Vec2};
use crate::foundation::math::{clamp01, lerp, lerp_point};
use crate::foundation::rng::SeededRng;
use crate::scene::config::{SceneTuning, SwayStyle};
use crate::scene::provider::scatter_points;
use crate::sim::burst::{Burst, Multipliers, RetargetMode, RetargetOptions};
use crate::sim::config::SimConfig;
use crate::sim::dot::{Dot, group_oscillator};
use crate::sim::phase::{Phase, PhaseMachine};

const LOCK_IN_BOOST: f64 = 1.5;
const MAX_DAMPING: f64 = 0.999;

fn positive_or_one(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 1.0 }
}

/// The dot field and its physics.
///
/// Dot count is fixed at construction. Homes always hold a point: before any target arrives they
/// equal the dots' start positions.
#[derive(Clone, Debug)]
pub struct Simulation {
    config: SimConfig,
    canvas: Canvas,
    dots: Vec<Dot>,
    // eased toward by `home`
    targets: Vec<Point>,
    phase: PhaseMachine,
    burst: Option<Burst>,
    tuning: SceneTuning,
    since_activation_ms: f64,
    time_s: f64,
}

impl Simulation {
    /// Spawn `config.count` dots scattered over `canvas`, homed on `homes` when given.
    pub fn new(canvas: Canvas, config: SimConfig, homes: &[Point]) -> Self {
        let dots = spawn_dots(canvas, &config);
        let targets = dots.iter().map(|d| d.home).collect();
        let mut sim = Self {
            phase: PhaseMachine::new(config.convergence_ms, config.transition_ms),
            config,
            canvas,
            dots,
            targets,
            burst: None,
            tuning: SceneTuning::default(),
            since_activation_ms: 0.0,
            time_s: 0.0,
        };
        sim.place_homes(homes);
        sim
    }

    /// Number of dots.
    pub fn len(&self) -> usize {
        self.dots.len()
    }

    /// Whether the field is empty.
    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }

    /// Dot state.
    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase.phase()
    }

    /// Simulated seconds since construction.
    pub fn time_s(&self) -> f64 {
        self.time_s
    }

    /// Canvas the dots live on.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Physics constants.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Running retarget burst, if any.
    pub fn burst(&self) -> Option<&Burst> {
        self.burst.as_ref()
    }

    /// Tuning of the active scene.
    pub fn tuning(&self) -> &SceneTuning {
        &self.tuning
    }

    /// Ease homes toward `points` (cycled to the dot count). An empty set is ignored so dots
    /// never lose their home.
    pub fn set_homes(&mut self, points: &[Point]) {
        if points.is_empty() {
            return;
        }
        for (i, target) in self.targets.iter_mut().enumerate() {
            *target = points[i % points.len()];
        }
    }

    /// Set homes immediately, skipping the ease.
    pub fn place_homes(&mut self, points: &[Point]) {
        if points.is_empty() {
            return;
        }
        for (i, (dot, target)) in self.dots.iter_mut().zip(&mut self.targets).enumerate() {
            let p = points[i % points.len()];
            dot.home = p;
            *target = p;
        }
    }

    /// Hard shape swap: replace homes now and run a catch-up burst.
    pub fn retarget(&mut self, points: &[Point], mode: RetargetMode, opts: RetargetOptions) {
        self.place_homes(points);
        self.start_burst(mode, opts);
    }

    /// Start (or restart) a burst without touching homes.
    pub fn start_burst(&mut self, mode: RetargetMode, opts: RetargetOptions) {
        let burst = Burst::new(mode, opts);
        tracing::debug!(?mode, opts = ?burst.options(), "retarget burst");
        self.burst = Some(burst);
    }

    /// Switch to a newly active scene's tuning; restarts lock-in and sway ramps.
    pub fn apply_tuning(&mut self, tuning: SceneTuning) {
        self.tuning = tuning;
        self.since_activation_ms = 0.0;
    }

    /// Combined scene, lock-in and burst multipliers.
    pub fn multipliers(&self) -> Multipliers {
        let t = &self.tuning;
        let lock = if t.lock_in_ms > 0.0 && self.since_activation_ms < t.lock_in_ms {
            lerp(LOCK_IN_BOOST, 1.0, self.since_activation_ms / t.lock_in_ms)
        } else {
            1.0
        };
        let scene = Multipliers {
            stiffness: positive_or_one(t.stiffness_mult) * lock,
            damping: positive_or_one(t.damping_mult),
            max_speed: positive_or_one(t.max_speed_mult),
        };
        let burst = self
            .burst
            .as_ref()
            .map_or(Multipliers::IDENTITY, Burst::multipliers);
        scene.combine(burst)
    }

    /// Current speed ceiling.
    pub fn max_speed(&self) -> f64 {
        self.config.max_speed * self.multipliers().max_speed
    }

    /// Sway strength in `[0, 1]`: zero while converging, fading in through the transition and
    /// after each scene activation.
    pub fn sway_ramp(&self) -> f64 {
        let phase = match self.phase.phase() {
            Phase::InitialConvergence => 0.0,
            Phase::Transition => Ease::InOutQuad.apply(self.phase.progress()),
            Phase::Idle => 1.0,
        };
        let activation = if self.tuning.sway_ramp_ms > 0.0 {
            clamp01(self.since_activation_ms / self.tuning.sway_ramp_ms)
        } else {
            1.0
        };
        phase * activation
    }

    /// Phase shared by coordinated dots.
    pub fn global_sway_phase(&self) -> f64 {
        self.time_s * self.config.sway_speed
    }

    /// Ramped sway displacement of `dot` at the current time.
    pub fn sway_offset(&self, dot: &Dot) -> Vec2 {
        dot.sway(self.time_s, self.config.sway_speed, self.global_sway_phase()) * self.sway_ramp()
    }

    /// Put every dot on its home at rest.
    pub fn settle_to_homes(&mut self) {
        for dot in &mut self.dots {
            dot.pos = dot.home;
            dot.vel = Vec2::ZERO;
        }
    }

    /// Advance by `dt_s` seconds (clamped to `max_step_ms`).
    pub fn step(&mut self, dt_s: f64) {
        if dt_s.is_nan() || dt_s <= 0.0 {
            return;
        }
        let dt = dt_s.min(self.config.max_step_ms / 1000.0);
        let dt_ms = dt * 1000.0;
        self.time_s += dt;
        self.since_activation_ms += dt_ms;
        self.ease_homes(dt_ms);

        if self.burst.as_mut().is_some_and(|b| b.advance(dt_ms)) {
            self.burst = None;
            tracing::debug!("retarget burst finished");
        }
        if let Some(phase) = self.phase.advance(dt_ms) {
            tracing::debug!(?phase, "simulation phase changed");
        }

        match self.phase.phase() {
            Phase::InitialConvergence => {
                let e = Ease::OutCubic.apply(self.phase.progress());
                for dot in &mut self.dots {
                    dot.pos = lerp_point(dot.start_pos, dot.home, e);
                    dot.vel = Vec2::ZERO;
                }
            }
            Phase::Transition => {
                let p = Ease::InOutQuad.apply(self.phase.progress());
                let k = lerp(self.config.convergence_stiffness_mult, 1.0, p);
                self.integrate(dt, k, p);
            }
            Phase::Idle => self.integrate(dt, 1.0, 1.0),
        }
    }

    fn ease_homes(&mut self, dt_ms: f64) {
        let tau = self.tuning.home_ease_ms();
        let a = if tau <= 0.0 {
            1.0
        } else {
            1.0 - (-dt_ms / tau).exp()
        };
        for (dot, target) in self.dots.iter_mut().zip(&self.targets) {
            dot.home = lerp_point(dot.home, *target, a);
        }
    }

    fn integrate(&mut self, dt: f64, stiffness_factor: f64, noise_factor: f64) {
        let m = self.multipliers();
        let max_speed = self.config.max_speed * m.max_speed;
        let frames = dt * 60.0;
        let t = self.time_s;
        let group = group_oscillator(t, self.config.group_freq)
            * (self.config.group_force * noise_factor);
        let sway_force = self.tuning.sway_style == SwayStyle::Force;
        let ramp = self.sway_ramp();
        let global = self.global_sway_phase();
        let sway_speed = self.config.sway_speed;
        let snap_r = self.tuning.snap_radius_px.max(0.0);
        let snap_step = self.tuning.snap_speed_px_s.max(0.0) * dt;

        for dot in &mut self.dots {
            let mut anchor = dot.home;
            if sway_force {
                anchor += dot.sway(t, sway_speed, global) * ramp;
            }
            let k = dot.stiffness * m.stiffness * stiffness_factor;
            let mut force =
                (anchor - dot.pos) * k + dot.noise(t) * (dot.noise_amp * noise_factor);
            if dot.coordinated {
                force += group;
            }
            let damping = (dot.damping * m.damping).clamp(0.0, MAX_DAMPING).powf(frames);
            dot.vel = (dot.vel + force * dt) * damping;
            let speed = dot.vel.hypot();
            if speed > max_speed {
                dot.vel *= max_speed / speed;
            }
            dot.pos += dot.vel * dt;

            if snap_r > 0.0 {
                let to_home = anchor - dot.pos;
                let d = to_home.hypot();
                if d > 0.0 && d <= snap_r {
                    dot.pos += to_home * (d.min(snap_step) / d);
                }
            }
        }
    }

    /// Adapt to a new canvas. The same `count` rescales every point; a different count
    /// re-initializes the field.
    pub fn resize(&mut self, canvas: Canvas, count: usize) {
        if count != self.dots.len() {
            tracing::debug!(
                from = self.dots.len(),
                to = count,
                "dot count changed; reinitializing"
            );
            let mut config = self.config.clone();
            config.count = count;
            let tuning = self.tuning.clone();
            *self = Self::new(canvas, config, &[]);
            self.tuning = tuning;
            return;
        }

        let sx = f64::from(canvas.width) / f64::from(self.canvas.width);
        let sy = f64::from(canvas.height) / f64::from(self.canvas.height);
        let scale = |p: Point| Point::new(p.x * sx, p.y * sy);
        for (dot, target) in self.dots.iter_mut().zip(&mut self.targets) {
            dot.pos = scale(dot.pos);
            dot.home = scale(dot.home);
            dot.start_pos = scale(dot.start_pos);
            *target = scale(*target);
        }
        self.canvas = canvas;
    }
}

fn spawn_dots(canvas: Canvas, config: &SimConfig) -> Vec<Dot> {
    let starts = scatter_points(canvas.rect(), config.count, &format!("{}|start", config.seed));
    let mut rng = SeededRng::from_key(&format!("{}|dots", config.seed));
    starts
        .into_iter()
        .map(|p| Dot::spawn(p, config, &mut rng))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/sim/engine.rs"]
mod tests;
