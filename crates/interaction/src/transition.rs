/// Each fade half of a level transition, seconds.
pub const FADE_DURATION_S: f64 = 0.2;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Phase {
    Idle,
    FadingOut,
    FadingIn,
}

/// What happened during an [`LevelTransition::advance`] call.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransitionEvent {
    None,
    /// The fade-out completed; apply the new level now, while invisible.
    Midpoint,
    Finished,
}

/// Fade-out, swap, fade-in animator for level changes.
///
/// Only one transition runs at a time: [`LevelTransition::try_begin`]
/// refuses re-entry, which is what drops double clicks during the animation.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelTransition {
    phase: Phase,
    elapsed_s: f64,
}

impl LevelTransition {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            elapsed_s: 0.0,
        }
    }

    /// Starts a transition. Returns `false` while one is already running;
    /// the caller must then discard the triggering click.
    pub fn try_begin(&mut self) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.phase = Phase::FadingOut;
        self.elapsed_s = 0.0;
        true
    }

    pub fn is_transitioning(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Group opacity for the current phase.
    pub fn opacity(&self) -> f64 {
        match self.phase {
            Phase::Idle => 1.0,
            Phase::FadingOut => 1.0 - (self.elapsed_s / FADE_DURATION_S).min(1.0),
            Phase::FadingIn => (self.elapsed_s / FADE_DURATION_S).min(1.0),
        }
    }

    pub fn advance(&mut self, dt_s: f64) -> TransitionEvent {
        let dt_s = dt_s.max(0.0);
        match self.phase {
            Phase::Idle => TransitionEvent::None,
            Phase::FadingOut => {
                self.elapsed_s += dt_s;
                if self.elapsed_s >= FADE_DURATION_S {
                    self.phase = Phase::FadingIn;
                    self.elapsed_s = 0.0;
                    TransitionEvent::Midpoint
                } else {
                    TransitionEvent::None
                }
            }
            Phase::FadingIn => {
                self.elapsed_s += dt_s;
                if self.elapsed_s >= FADE_DURATION_S {
                    self.phase = Phase::Idle;
                    self.elapsed_s = 0.0;
                    TransitionEvent::Finished
                } else {
                    TransitionEvent::None
                }
            }
        }
    }
}

impl Default for LevelTransition {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{FADE_DURATION_S, LevelTransition, TransitionEvent};

    #[test]
    fn full_cycle_fades_out_swaps_and_fades_in() {
        let mut t = LevelTransition::new();
        assert!(t.try_begin());
        assert_eq!(t.advance(FADE_DURATION_S / 2.0), TransitionEvent::None);
        assert!((t.opacity() - 0.5).abs() < 1e-9);

        assert_eq!(t.advance(FADE_DURATION_S / 2.0), TransitionEvent::Midpoint);
        assert_eq!(t.opacity(), 0.0);

        assert_eq!(t.advance(FADE_DURATION_S / 2.0), TransitionEvent::None);
        assert!((t.opacity() - 0.5).abs() < 1e-9);
        assert_eq!(t.advance(FADE_DURATION_S), TransitionEvent::Finished);
        assert_eq!(t.opacity(), 1.0);
        assert!(!t.is_transitioning());
    }

    #[test]
    fn reentry_is_refused_until_finished() {
        let mut t = LevelTransition::new();
        assert!(t.try_begin());
        assert!(!t.try_begin());
        t.advance(FADE_DURATION_S);
        // Still fading in.
        assert!(!t.try_begin());
        t.advance(FADE_DURATION_S);
        assert!(t.try_begin());
    }
}
