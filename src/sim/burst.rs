use crate::animation::ease::Ease;

/// Ceiling on the stiffness multiplier of a retarget burst.
pub const MAX_STIFFNESS_MULT: f64 = 1.6;
/// Ceiling on the max-speed multiplier of a retarget burst.
pub const MAX_SPEED_MULT: f64 = 1.6;
/// Floor on the damping multiplier of a retarget burst.
pub const MIN_DAMPING_MULT: f64 = 0.95;
/// Damping multipliers above 1 would add energy.
pub const MAX_DAMPING_MULT: f64 = 1.0;
/// Floor on every multiplier.
pub const MIN_MULT: f64 = 0.25;
/// Longest allowed burst.
pub const MAX_BURST_MS: f64 = 2000.0;

/// How hard a retarget catches up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetargetMode {
    /// Full multipliers.
    #[default]
    Snap,
    /// Multipliers pulled halfway back toward 1.
    Soft,
}

/// Caller-supplied burst shape. Clamped before use.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RetargetOptions {
    /// Burst length.
    pub burst_ms: f64,
    /// Peak stiffness multiplier.
    pub stiffness_mult: f64,
    /// Peak damping multiplier.
    pub damping_mult: f64,
    /// Peak speed-ceiling multiplier.
    pub max_speed_mult: f64,
}

impl Default for RetargetOptions {
    fn default() -> Self {
        Self {
            burst_ms: 650.0,
            stiffness_mult: 1.4,
            damping_mult: 0.97,
            max_speed_mult: 1.4,
        }
    }
}

fn clamp_or(v: f64, lo: f64, hi: f64, fallback: f64) -> f64 {
    if v.is_finite() { v.clamp(lo, hi) } else { fallback }
}

impl RetargetOptions {
    /// Clamp to the engine bounds and apply `mode`.
    pub fn clamped(self, mode: RetargetMode) -> Self {
        let d = Self::default();
        let mut out = Self {
            burst_ms: clamp_or(self.burst_ms, 0.0, MAX_BURST_MS, d.burst_ms),
            stiffness_mult: clamp_or(self.stiffness_mult, MIN_MULT, MAX_STIFFNESS_MULT, 1.0),
            damping_mult: clamp_or(self.damping_mult, MIN_DAMPING_MULT, MAX_DAMPING_MULT, 1.0),
            max_speed_mult: clamp_or(self.max_speed_mult, MIN_MULT, MAX_SPEED_MULT, 1.0),
        };
        if mode == RetargetMode::Soft {
            let soften = |m: f64| 1.0 + 0.5 * (m - 1.0);
            out.stiffness_mult = soften(out.stiffness_mult);
            out.damping_mult = soften(out.damping_mult);
            out.max_speed_mult = soften(out.max_speed_mult);
        }
        out
    }
}

/// Multipliers applied on top of the base physics constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Multipliers {
    /// Stiffness factor.
    pub stiffness: f64,
    /// Damping factor.
    pub damping: f64,
    /// Speed-ceiling factor.
    pub max_speed: f64,
}

impl Multipliers {
    /// No change.
    pub const IDENTITY: Self = Self {
        stiffness: 1.0,
        damping: 1.0,
        max_speed: 1.0,
    };

    /// Component-wise product.
    pub fn combine(self, other: Self) -> Self {
        Self {
            stiffness: self.stiffness * other.stiffness,
            damping: self.damping * other.damping,
            max_speed: self.max_speed * other.max_speed,
        }
    }
}

impl Default for Multipliers {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A running retarget burst. Its multipliers decay from the clamped peak back to 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Burst {
    mode: RetargetMode,
    opts: RetargetOptions,
    elapsed_ms: f64,
}

impl Burst {
    /// Start a burst; `opts` are clamped here.
    pub fn new(mode: RetargetMode, opts: RetargetOptions) -> Self {
        Self {
            mode,
            opts: opts.clamped(mode),
            elapsed_ms: 0.0,
        }
    }

    /// Burst mode.
    pub fn mode(&self) -> RetargetMode {
        self.mode
    }

    /// Clamped options in effect.
    pub fn options(&self) -> RetargetOptions {
        self.opts
    }

    /// Whether the burst has fully decayed.
    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.opts.burst_ms
    }

    /// Advance; returns `true` once finished.
    pub fn advance(&mut self, dt_ms: f64) -> bool {
        self.elapsed_ms += dt_ms.max(0.0);
        self.is_finished()
    }

    /// Current multipliers.
    pub fn multipliers(&self) -> Multipliers {
        if self.is_finished() || self.opts.burst_ms <= 0.0 {
            return Multipliers::IDENTITY;
        }
        let w = 1.0 - Ease::InOutQuad.apply(self.elapsed_ms / self.opts.burst_ms);
        let at = |peak: f64| 1.0 + (peak - 1.0) * w;
        Multipliers {
            stiffness: at(self.opts.stiffness_mult),
            damping: at(self.opts.damping_mult),
            max_speed: at(self.opts.max_speed_mult),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/burst.rs"]
mod tests;
