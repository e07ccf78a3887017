use crate::foundation::error::{DotmorphError, DotmorphResult};

/// Physics constants shared by every dot. All fields default.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of dots; fixed for the lifetime of a simulation.
    pub count: usize,
    /// Seed key for per-dot parameters and start positions.
    pub seed: String,
    /// Dot radius range in pixels.
    pub radius: [f64; 2],
    /// Base spring stiffness (1/s²), jittered ±15% per dot.
    pub stiffness: f64,
    /// Base velocity retention per 1/60 s, jittered slightly per dot.
    pub damping: f64,
    /// Noise force amplitude range (px/s²).
    pub noise_amp: [f64; 2],
    /// Noise frequency range (Hz).
    pub noise_freq: [f64; 2],
    /// Speed ceiling (px/s) before multipliers.
    pub max_speed: f64,
    /// Length of the scripted convergence phase.
    pub convergence_ms: f64,
    /// Length of the hand-off from convergence to free physics.
    pub transition_ms: f64,
    /// Stiffness multiplier at the start of the transition phase.
    pub convergence_stiffness_mult: f64,
    /// Fraction of dots that sway with the global oscillator.
    pub coordinated_fraction: f64,
    /// Force amplitude of the global oscillator (px/s²).
    pub group_force: f64,
    /// Global oscillator frequency (Hz).
    pub group_freq: f64,
    /// Sway amplitude range (px).
    pub sway_amp: [f64; 2],
    /// Sway angular speed (rad/s).
    pub sway_speed: f64,
    /// Largest step integrated at once (ms); longer frames are clamped.
    pub max_step_ms: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            count: 900,
            seed: "dotmorph".to_string(),
            radius: [1.2, 2.4],
            stiffness: 38.0,
            damping: 0.86,
            noise_amp: [30.0, 90.0],
            noise_freq: [0.12, 0.45],
            max_speed: 1400.0,
            convergence_ms: 1600.0,
            transition_ms: 1200.0,
            convergence_stiffness_mult: 2.5,
            coordinated_fraction: 0.35,
            group_force: 40.0,
            group_freq: 0.18,
            sway_amp: [0.6, 2.2],
            sway_speed: 0.9,
            max_step_ms: 66.0,
        }
    }
}

impl SimConfig {
    /// Reject values the integrator cannot run with.
    pub fn validate(&self) -> DotmorphResult<()> {
        let finite = [
            self.stiffness,
            self.damping,
            self.max_speed,
            self.convergence_ms,
            self.transition_ms,
            self.convergence_stiffness_mult,
            self.group_force,
            self.group_freq,
            self.sway_speed,
            self.max_step_ms,
        ];
        if self.count == 0 {
            return Err(DotmorphError::config("sim.count must be >= 1"));
        }
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(DotmorphError::config("sim values must be finite"));
        }
        if self.stiffness < 0.0 || self.max_speed <= 0.0 {
            return Err(DotmorphError::config(
                "sim.stiffness must be >= 0 and sim.max_speed > 0",
            ));
        }
        if !(0.0..1.0).contains(&self.damping) {
            return Err(DotmorphError::config("sim.damping must be in [0, 1)"));
        }
        if self.convergence_ms < 0.0 || self.transition_ms < 0.0 || self.max_step_ms <= 0.0 {
            return Err(DotmorphError::config(
                "sim phase durations must be >= 0 and sim.max_step_ms > 0",
            ));
        }
        for (name, [lo, hi]) in [
            ("radius", self.radius),
            ("noise_amp", self.noise_amp),
            ("noise_freq", self.noise_freq),
            ("sway_amp", self.sway_amp),
        ] {
            if !(lo.is_finite() && hi.is_finite() && lo >= 0.0 && lo <= hi) {
                return Err(DotmorphError::config(format!(
                    "sim.{name} must be a finite [lo, hi] range with 0 <= lo <= hi"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.coordinated_fraction) {
            return Err(DotmorphError::config(
                "sim.coordinated_fraction must be in [0, 1]",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/config.rs"]
mod tests;
