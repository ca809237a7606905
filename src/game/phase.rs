//! Screen state machine: one phase per visible screen.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Start,
    Drawing,
    PostGame,
}

/// Guarded phase transitions. Each returns whether the transition was taken;
/// stray events (double-clicks, a timer tick racing a finished round) are
/// absorbed by the guards.
#[derive(Debug)]
pub struct PhaseMachine {
    phase: Phase,
}

impl PhaseMachine {
    pub fn new() -> Self {
        Self {
            phase: Phase::Start,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn start_round(&mut self) -> bool {
        self.step(Phase::Start, Phase::Drawing)
    }

    pub fn end_round(&mut self) -> bool {
        self.step(Phase::Drawing, Phase::PostGame)
    }

    pub fn reset(&mut self) -> bool {
        self.step(Phase::PostGame, Phase::Start)
    }

    fn step(&mut self, from: Phase, to: Phase) -> bool {
        if self.phase == from {
            self.phase = to;
            true
        } else {
            false
        }
    }
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_cycle() {
        let mut m = PhaseMachine::new();
        assert_eq!(m.phase(), Phase::Start);
        assert!(m.start_round());
        assert!(m.end_round());
        assert!(m.reset());
        assert_eq!(m.phase(), Phase::Start);
    }

    #[test]
    fn stray_events_are_absorbed() {
        let mut m = PhaseMachine::new();
        assert!(!m.end_round());
        assert!(!m.reset());
        assert!(m.start_round());
        // Double-clicked start button.
        assert!(!m.start_round());
        assert!(m.end_round());
        // Timer tick arriving after the round already ended.
        assert!(!m.end_round());
        assert_eq!(m.phase(), Phase::PostGame);
    }
}
