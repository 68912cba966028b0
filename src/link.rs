//! Link-liveness supervision.
//!
//! A pure function of time plus one stored timestamp: the link is alive
//! while frames keep arriving, dead once the configured timeout elapses
//! without one. Both transitions are edge-triggered so the controller can
//! log and react exactly once per loss or recovery.

/// Edge-triggered link transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkEvent {
    /// First valid frame after the link was dead (or after startup).
    Recovered,
    /// Timeout elapsed with the link previously alive.
    Lost,
}

/// Declares radio connectivity alive or dead from elapsed time since the
/// last valid frame.
///
/// # Example
///
/// ```rust
/// use play_sign::link::{LinkEvent, LinkSupervisor};
///
/// let mut link = LinkSupervisor::new(10_000);
/// assert_eq!(link.on_frame_received(0), Some(LinkEvent::Recovered));
/// assert_eq!(link.tick(5_000), None);
/// assert_eq!(link.tick(10_001), Some(LinkEvent::Lost));
/// assert_eq!(link.tick(20_000), None); // edge-triggered, fires once
/// ```
#[derive(Clone, Copy, Debug)]
pub struct LinkSupervisor {
    timeout_ms: u64,
    last_received_ms: u64,
    alive: bool,
}

impl LinkSupervisor {
    /// Supervisor starting in the dead state; the first frame recovers it.
    ///
    /// `timeout_ms` is deployment-specific (observed 800 ms to 10 s across
    /// controller variants), so it is taken as configuration.
    pub const fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            last_received_ms: 0,
            alive: false,
        }
    }

    /// Stamp a valid frame arrival.
    ///
    /// Returns [`LinkEvent::Recovered`] only on the dead-to-alive edge.
    pub fn on_frame_received(&mut self, now_ms: u64) -> Option<LinkEvent> {
        self.last_received_ms = now_ms;
        if self.alive {
            None
        } else {
            self.alive = true;
            Some(LinkEvent::Recovered)
        }
    }

    /// Periodic timeout check.
    ///
    /// Returns [`LinkEvent::Lost`] only on the alive-to-dead edge; repeated
    /// ticks while dead produce nothing.
    pub fn tick(&mut self, now_ms: u64) -> Option<LinkEvent> {
        if self.alive && now_ms.saturating_sub(self.last_received_ms) > self.timeout_ms {
            self.alive = false;
            return Some(LinkEvent::Lost);
        }
        None
    }

    /// Current verdict.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Arrival time of the last valid frame.
    #[inline]
    pub fn last_received_ms(&self) -> u64 {
        self.last_received_ms
    }
}
