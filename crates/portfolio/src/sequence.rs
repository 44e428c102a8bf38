//! Multi-stage transitions as an ordered list of gated steps, driven by the frame clock.

use std::collections::VecDeque;

use crate::transitions::OverlayKind;

/// What the director should do when a step opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Warp done: switch to the surface of the visited planet.
    Land,
    /// Launch done: start the TV shutoff.
    BeginShutoff,
    /// Screen is black: switch back to the ship.
    DockAtShip,
    /// New scene mounted: start the TV turn-on.
    BeginTurnon,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gate {
    /// Seconds after the previous step opened.
    After(f32),
    /// When the given overlay reports completion.
    On(OverlayKind),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub gate: Gate,
    pub cue: Option<Cue>,
}

#[derive(Debug, Clone, Default)]
pub struct Sequence {
    steps: VecDeque<Step>,
    /// Time spent waiting on the front step.
    waited: f32,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_after(mut self, seconds: f32, cue: Cue) -> Self {
        self.steps.push_back(Step {
            gate: Gate::After(seconds.max(0.0)),
            cue: Some(cue),
        });
        self
    }

    pub fn then_on(mut self, kind: OverlayKind, cue: Option<Cue>) -> Self {
        self.steps.push_back(Step { gate: Gate::On(kind), cue });
        self
    }

    /// Advance time. Opens every timed step whose delay has elapsed, carrying
    /// leftover time into the next one, and stops at the first overlay gate.
    pub fn tick(&mut self, dt: f32) -> Vec<Cue> {
        let mut budget = dt;
        let mut cues = Vec::new();
        while let Some(step) = self.steps.front() {
            let Gate::After(delay) = step.gate else {
                break;
            };
            let remaining = delay - self.waited;
            if budget < remaining {
                self.waited += budget;
                break;
            }
            budget -= remaining;
            self.waited = 0.0;
            if let Some(cue) = step.cue {
                cues.push(cue);
            }
            self.steps.pop_front();
        }
        cues
    }

    /// An overlay finished. Opens the front step if it was waiting on `kind`.
    /// Returns `None` when nothing opened or the step carries no cue.
    pub fn signal(&mut self, kind: OverlayKind) -> Option<Cue> {
        match self.steps.front() {
            Some(Step { gate: Gate::On(k), cue }) if *k == kind => {
                let cue = *cue;
                self.steps.pop_front();
                self.waited = 0.0;
                cue
            }
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timed_steps_fire_in_order_and_carry_leftover_time() {
        let mut seq = Sequence::new()
            .then_after(1.0, Cue::BeginShutoff)
            .then_after(0.1, Cue::DockAtShip);
        assert!(seq.tick(0.9).is_empty());
        // 0.15 covers the last 0.1 of the first delay and 0.05 of the second.
        assert_eq!(seq.tick(0.15), vec![Cue::BeginShutoff]);
        assert_eq!(seq.tick(0.06), vec![Cue::DockAtShip]);
        assert!(seq.is_finished());
    }

    #[test]
    fn one_large_step_can_open_several_gates() {
        let mut seq = Sequence::new()
            .then_after(0.1, Cue::DockAtShip)
            .then_after(0.1, Cue::BeginTurnon);
        assert_eq!(seq.tick(0.5), vec![Cue::DockAtShip, Cue::BeginTurnon]);
    }

    #[test]
    fn overlay_gate_blocks_time_until_signalled() {
        let mut seq = Sequence::new()
            .then_on(OverlayKind::Warp, Some(Cue::Land))
            .then_after(0.1, Cue::BeginTurnon);
        assert!(seq.tick(10.0).is_empty());
        assert_eq!(seq.signal(OverlayKind::TvShutoff), None);
        assert_eq!(seq.signal(OverlayKind::Warp), Some(Cue::Land));
        assert!(seq.tick(0.05).is_empty());
        assert_eq!(seq.tick(0.05), vec![Cue::BeginTurnon]);
    }

    #[test]
    fn silent_overlay_gate_just_unblocks() {
        let mut seq = Sequence::new()
            .then_on(OverlayKind::TvShutoff, None)
            .then_after(0.15, Cue::DockAtShip);
        assert_eq!(seq.signal(OverlayKind::TvShutoff), None);
        assert!(!seq.is_finished());
        assert_eq!(seq.tick(0.2), vec![Cue::DockAtShip]);
    }
}
