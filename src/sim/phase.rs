/// Coarse lifecycle of a simulation, entered in order exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Scripted ease from start positions onto homes.
    InitialConvergence,
    /// Stiffness relaxes and noise fades in.
    Transition,
    /// Free spring-damper motion.
    Idle,
}

/// Elapsed-time guarded phase machine.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseMachine {
    phase: Phase,
    in_phase_ms: f64,
    convergence_ms: f64,
    transition_ms: f64,
}

impl PhaseMachine {
    /// Machine at the start of convergence.
    pub fn new(convergence_ms: f64, transition_ms: f64) -> Self {
        Self {
            phase: Phase::InitialConvergence,
            in_phase_ms: 0.0,
            convergence_ms: convergence_ms.max(0.0),
            transition_ms: transition_ms.max(0.0),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Time spent in the current phase.
    pub fn in_phase_ms(&self) -> f64 {
        self.in_phase_ms
    }

    /// Progress through the current phase in `[0, 1]`; always 1 when idle.
    pub fn progress(&self) -> f64 {
        let dur = match self.phase {
            Phase::InitialConvergence => self.convergence_ms,
            Phase::Transition => self.transition_ms,
            Phase::Idle => return 1.0,
        };
        if dur <= 0.0 {
            1.0
        } else {
            (self.in_phase_ms / dur).clamp(0.0, 1.0)
        }
    }

    /// Advance by `dt_ms`, carrying leftover time into later phases. Returns the new phase when
    /// it changed.
    pub fn advance(&mut self, dt_ms: f64) -> Option<Phase> {
        let before = self.phase;
        self.in_phase_ms += dt_ms.max(0.0);
        loop {
            let (dur, next) = match self.phase {
                Phase::InitialConvergence => (self.convergence_ms, Phase::Transition),
                Phase::Transition => (self.transition_ms, Phase::Idle),
                Phase::Idle => break,
            };
            if self.in_phase_ms < dur {
                break;
            }
            self.in_phase_ms -= dur;
            self.phase = next;
        }
        (self.phase != before).then_some(self.phase)
    }

    /// Jump straight to idle.
    pub fn skip_to_idle(&mut self) {
        self.phase = Phase::Idle;
        self.in_phase_ms = 0.0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/phase.rs"]
mod tests;
