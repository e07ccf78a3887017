use std::f64::consts::TAU;

use crate::foundation::core::{Point, Vec2};
use crate::foundation::rng::SeededRng;
use crate::sim::config::SimConfig;

/// One simulated particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Dot {
    /// Current position.
    pub pos: Point,
    /// Current velocity (px/s).
    pub vel: Vec2,
    /// Current attractor.
    pub home: Point,
    /// Origin of the convergence phase.
    pub start_pos: Point,
    /// Spring stiffness (1/s²).
    pub stiffness: f64,
    /// Velocity retention per 1/60 s.
    pub damping: f64,
    /// Noise force amplitude (px/s²).
    pub noise_amp: f64,
    /// Noise frequency (Hz).
    pub noise_freq: f64,
    /// First noise phase seed in `[0, 2π)`.
    pub seed_a: f64,
    /// Second noise phase seed in `[0, 2π)`.
    pub seed_b: f64,
    /// Drawn radius (px).
    pub radius: f64,
    /// Individual sway phase.
    pub sway_phase: f64,
    /// Sway amplitude (px).
    pub sway_amp: f64,
    /// Sways with the global oscillator instead of its own phase.
    pub coordinated: bool,
}

impl Dot {
    /// Draw per-dot parameters from `rng`. Position and home start at `start`.
    pub fn spawn(start: Point, cfg: &SimConfig, rng: &mut SeededRng) -> Self {
        let pick = |rng: &mut SeededRng, [lo, hi]: [f64; 2]| rng.range(lo, hi);
        Self {
            pos: start,
            vel: Vec2::ZERO,
            home: start,
            start_pos: start,
            stiffness: cfg.stiffness * rng.range(0.85, 1.15),
            damping: (cfg.damping * rng.range(0.985, 1.015)).min(0.999),
            noise_amp: pick(rng, cfg.noise_amp),
            noise_freq: pick(rng, cfg.noise_freq),
            seed_a: rng.range(0.0, TAU),
            seed_b: rng.range(0.0, TAU),
            radius: pick(rng, cfg.radius),
            sway_phase: rng.range(0.0, TAU),
            sway_amp: pick(rng, cfg.sway_amp),
            coordinated: rng.next_f64() < cfg.coordinated_fraction,
        }
    }

    /// Distance from home.
    pub fn home_distance(&self) -> f64 {
        (self.home - self.pos).hypot()
    }

    /// Smooth per-dot wander in roughly `[-1, 1]²`.
    pub fn noise(&self, time_s: f64) -> Vec2 {
        let w = TAU * self.noise_freq * time_s;
        let x = (w + self.seed_a).sin() + 0.5 * (2.3 * w + 1.7 * self.seed_b).sin();
        let y = (0.9 * w + self.seed_b).cos() + 0.5 * (1.9 * w + 1.3 * self.seed_a).sin();
        Vec2::new(x, y) / 1.5
    }

    /// Sway displacement before ramping. Coordinated dots share `global_phase`.
    pub fn sway(&self, time_s: f64, sway_speed: f64, global_phase: f64) -> Vec2 {
        let phi = if self.coordinated {
            global_phase
        } else {
            time_s * sway_speed + self.sway_phase
        };
        Vec2::new(phi.sin(), (0.8 * phi).cos()) * self.sway_amp
    }
}

/// Shared oscillator direction for coordinated dots at `time_s`.
pub fn group_oscillator(time_s: f64, freq_hz: f64) -> Vec2 {
    let theta = TAU * freq_hz * time_s;
    Vec2::new(theta.cos(), 0.5 * (2.0 * theta).sin())
}

#[cfg(test)]
#[path = "../../tests/unit/sim/dot.rs"]
mod tests;
