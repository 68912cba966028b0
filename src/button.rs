//! Diagnostic button gestures.
//!
//! The sign has a single maintenance button (active low). Two gestures
//! come out of it: a short press starts the number sweep, a long hold
//! lights the all-white burn-in test. Debouncing and gesture detection
//! are pure time arithmetic over sampled levels, so the detector runs
//! identically against hardware GPIO and the test mocks.

/// Recognized button gestures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    /// Released before the long-hold threshold.
    ShortPress,
    /// Held past the threshold; fires while still pressed.
    LongHold,
}

/// Debounce and gesture detection over a sampled button level.
///
/// Call [`sample`](Self::sample) once per tick with the debounced-raw
/// pressed level and the current time. At most one gesture is produced
/// per press cycle: a long hold consumes the press, so the following
/// release is not also a short press.
#[derive(Clone, Copy, Debug)]
pub struct InputController {
    debounce_ms: u64,
    long_hold_ms: u64,
    stable_pressed: bool,
    last_raw: bool,
    last_edge_ms: Option<u64>,
    press_started_ms: u64,
    long_hold_fired: bool,
}

impl InputController {
    /// Detector with the given debounce window and long-hold threshold.
    pub const fn new(debounce_ms: u64, long_hold_ms: u64) -> Self {
        Self {
            debounce_ms,
            long_hold_ms,
            stable_pressed: false,
            last_raw: false,
            last_edge_ms: None,
            press_started_ms: 0,
            long_hold_fired: false,
        }
    }

    /// Feed one raw sample; returns a gesture when one completes.
    pub fn sample(&mut self, pressed: bool, now_ms: u64) -> Option<Gesture> {
        if pressed != self.last_raw {
            self.last_raw = pressed;
            self.last_edge_ms = Some(now_ms);
        }

        // Accept the raw level once it has sat still for the debounce window.
        if let Some(edge) = self.last_edge_ms {
            if self.last_raw != self.stable_pressed
                && now_ms.saturating_sub(edge) >= self.debounce_ms
            {
                self.stable_pressed = self.last_raw;
                if self.stable_pressed {
                    self.press_started_ms = now_ms;
                    self.long_hold_fired = false;
                } else if !self.long_hold_fired {
                    return Some(Gesture::ShortPress);
                }
            }
        }

        if self.stable_pressed
            && !self.long_hold_fired
            && now_ms.saturating_sub(self.press_started_ms) >= self.long_hold_ms
        {
            self.long_hold_fired = true;
            return Some(Gesture::LongHold);
        }

        None
    }

    /// Debounced pressed level.
    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.stable_pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: u64 = 50;

    fn detector() -> InputController {
        InputController::new(50, 2000)
    }

    /// Run `pressed` samples every 50 ms starting at `start`, collecting
    /// any gestures.
    fn run(d: &mut InputController, start: u64, samples: &[bool]) -> Vec<(u64, Gesture)> {
        let mut out = Vec::new();
        for (i, &pressed) in samples.iter().enumerate() {
            let now = start + i as u64 * TICK;
            if let Some(g) = d.sample(pressed, now) {
                out.push((now, g));
            }
        }
        out
    }

    #[test]
    fn short_press_on_release() {
        let mut d = detector();
        // press 300 ms, then release
        let events = run(&mut d, 0, &[true, true, true, true, true, true, false, false]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].1, Gesture::ShortPress);
        assert!(!d.is_pressed());
    }

    #[test]
    fn long_hold_fires_once_while_held() {
        let mut d = detector();
        let samples: Vec<bool> = std::iter::repeat(true).take(60).collect();
        let events = run(&mut d, 0, &samples);
        assert_eq!(events, vec![(2050, Gesture::LongHold)]);
    }

    #[test]
    fn long_hold_consumes_the_release() {
        let mut d = detector();
        let mut samples: Vec<bool> = std::iter::repeat(true).take(50).collect();
        samples.extend([false, false, false]);
        let events = run(&mut d, 0, &samples);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].1, Gesture::LongHold);
    }

    #[test]
    fn bounce_shorter_than_window_ignored() {
        let mut d = InputController::new(50, 2000);
        // 10 ms spikes never settle
        assert_eq!(d.sample(true, 0), None);
        assert_eq!(d.sample(false, 10), None);
        assert_eq!(d.sample(true, 20), None);
        assert_eq!(d.sample(false, 30), None);
        assert_eq!(d.sample(false, 100), None);
        assert!(!d.is_pressed());
    }

    #[test]
    fn hold_just_under_threshold_is_short_press() {
        let mut d = detector();
        // 39 pressed samples = held 1900 ms, released before 2000
        let mut samples: Vec<bool> = std::iter::repeat(true).take(39).collect();
        samples.extend([false, false]);
        let events = run(&mut d, 0, &samples);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].1, Gesture::ShortPress);
    }

    #[test]
    fn each_press_cycle_is_independent() {
        let mut d = detector();
        let mut samples: Vec<bool> = std::iter::repeat(true).take(50).collect(); // long hold
        samples.extend(std::iter::repeat(false).take(5));
        samples.extend(std::iter::repeat(true).take(6)); // short press
        samples.extend(std::iter::repeat(false).take(3));
        let gestures: Vec<Gesture> = run(&mut d, 0, &samples).into_iter().map(|(_, g)| g).collect();
        assert_eq!(gestures, vec![Gesture::LongHold, Gesture::ShortPress]);
    }
}
