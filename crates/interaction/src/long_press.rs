use foundation::math::Vec2;

/// Hold time before a long press fires, seconds.
pub const LONG_PRESS_DURATION_S: f64 = 0.3;
/// Finger travel beyond this cancels the press, pixels.
pub const MOVE_THRESHOLD_PX: f64 = 10.0;
/// Touch tooltips dismiss themselves after this long, seconds.
pub const TOOLTIP_DISMISS_S: f64 = 3.0;

/// Mouse pointers keep the hover tooltip path; only touch goes through
/// long-press detection.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Press {
    start: Vec2,
    elapsed_s: f64,
}

/// Touch long-press detector. Fires at most once per press, at the press's
/// original position.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LongPress {
    press: Option<Press>,
}

impl LongPress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_down(&mut self, kind: PointerKind, position: Vec2) {
        if kind != PointerKind::Touch {
            return;
        }
        self.press = Some(Press {
            start: position,
            elapsed_s: 0.0,
        });
    }

    pub fn pointer_move(&mut self, kind: PointerKind, position: Vec2) {
        if kind != PointerKind::Touch {
            return;
        }
        if let Some(press) = self.press
            && (position - press.start).length() > MOVE_THRESHOLD_PX
        {
            self.press = None;
        }
    }

    /// Handles pointer up and cancel alike.
    pub fn pointer_up(&mut self) {
        self.press = None;
    }

    /// Returns the press position when the hold time is reached.
    pub fn advance(&mut self, dt_s: f64) -> Option<Vec2> {
        let press = self.press.as_mut()?;
        press.elapsed_s += dt_s.max(0.0);
        if press.elapsed_s >= LONG_PRESS_DURATION_S {
            let position = press.start;
            self.press = None;
            Some(position)
        } else {
            None
        }
    }
}

/// Countdown for a tooltip opened by long press.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TooltipTimer {
    remaining_s: Option<f64>,
}

impl TooltipTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self) {
        self.remaining_s = Some(TOOLTIP_DISMISS_S);
    }

    /// Hover tooltips dismiss with the pointer instead of the timer.
    pub fn cancel(&mut self) {
        self.remaining_s = None;
    }

    /// Returns `true` when the tooltip just expired.
    pub fn advance(&mut self, dt_s: f64) -> bool {
        let Some(remaining) = self.remaining_s.as_mut() else {
            return false;
        };
        *remaining -= dt_s.max(0.0);
        if *remaining <= 0.0 {
            self.remaining_s = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LONG_PRESS_DURATION_S, LongPress, PointerKind, TOOLTIP_DISMISS_S, TooltipTimer};
    use foundation::math::Vec2;

    #[test]
    fn fires_once_after_the_hold_time() {
        let mut lp = LongPress::new();
        lp.pointer_down(PointerKind::Touch, Vec2::new(100.0, 100.0));
        assert_eq!(lp.advance(LONG_PRESS_DURATION_S / 2.0), None);
        assert_eq!(
            lp.advance(LONG_PRESS_DURATION_S / 2.0),
            Some(Vec2::new(100.0, 100.0))
        );
        // Consumed; nothing fires again until the next press.
        assert_eq!(lp.advance(1.0), None);
    }

    #[test]
    fn moving_too_far_cancels_the_press() {
        let mut lp = LongPress::new();
        lp.pointer_down(PointerKind::Touch, Vec2::new(100.0, 100.0));
        lp.pointer_move(PointerKind::Touch, Vec2::new(104.0, 104.0));
        assert_eq!(lp.advance(LONG_PRESS_DURATION_S / 2.0), None);
        lp.pointer_move(PointerKind::Touch, Vec2::new(120.0, 100.0));
        assert_eq!(lp.advance(LONG_PRESS_DURATION_S), None);
    }

    #[test]
    fn mouse_pointers_are_ignored() {
        let mut lp = LongPress::new();
        lp.pointer_down(PointerKind::Mouse, Vec2::new(100.0, 100.0));
        assert_eq!(lp.advance(LONG_PRESS_DURATION_S), None);
    }

    #[test]
    fn lifting_the_finger_cancels() {
        let mut lp = LongPress::new();
        lp.pointer_down(PointerKind::Touch, Vec2::new(100.0, 100.0));
        lp.pointer_up();
        assert_eq!(lp.advance(LONG_PRESS_DURATION_S), None);
    }

    #[test]
    fn tooltip_expires_after_the_dismiss_window() {
        let mut timer = TooltipTimer::new();
        timer.show();
        assert!(!timer.advance(TOOLTIP_DISMISS_S / 2.0));
        assert!(timer.advance(TOOLTIP_DISMISS_S / 2.0));
        assert!(!timer.advance(1.0));
    }
}
