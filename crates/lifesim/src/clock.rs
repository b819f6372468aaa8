//! Start/stop gate for the simulation timer.
//!
//! The host owns the actual timer. Each `start` hands out a [`Ticket`]; a timer
//! firing is honoured only while the clock is running and its ticket is the
//! current one. `stop` (and every restart) invalidates outstanding tickets, so a
//! firing that was already queued when the user pressed stop does nothing.

use crate::config::SpeedConfig;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Ticket(pub u32);

#[derive(Debug, Clone)]
pub struct SimClock {
    running: bool,
    epoch: u32,
    period_ms: u32,
    limits: SpeedConfig,
}

impl SimClock {
    #[must_use]
    pub fn new(limits: SpeedConfig) -> Self {
        Self {
            running: false,
            epoch: 0,
            period_ms: limits.clamp(limits.initial_period_ms),
            limits,
        }
    }

    /// Starts the clock. Starting while running keeps the current ticket.
    pub fn start(&mut self) -> Ticket {
        if !self.running {
            self.running = true;
            self.epoch = self.epoch.wrapping_add(1);
        }
        Ticket(self.epoch)
    }

    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.epoch = self.epoch.wrapping_add(1);
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether a firing carrying `ticket` may advance the simulation.
    #[must_use]
    pub fn accepts(&self, ticket: Ticket) -> bool {
        self.running && ticket.0 == self.epoch
    }

    #[must_use]
    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Sets the period, clamped to the configured range. Returns the value applied.
    pub fn set_period(&mut self, period_ms: u32) -> u32 {
        self.period_ms = self.limits.clamp(period_ms);
        self.period_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> SimClock {
        SimClock::new(SpeedConfig::default())
    }

    #[test]
    fn idle_clock_rejects_everything() {
        let c = clock();
        assert!(!c.is_running());
        assert!(!c.accepts(Ticket(0)));
        assert_eq!(c.period_ms(), 30);
    }

    #[test]
    fn stale_ticket_is_rejected_after_stop() {
        let mut c = clock();
        let t = c.start();
        assert!(c.accepts(t));
        c.stop();
        assert!(!c.accepts(t));
    }

    #[test]
    fn restart_invalidates_the_old_loop() {
        let mut c = clock();
        let first = c.start();
        c.stop();
        let second = c.start();
        assert_ne!(first, second);
        assert!(!c.accepts(first));
        assert!(c.accepts(second));
    }

    #[test]
    fn double_start_keeps_one_loop() {
        let mut c = clock();
        let a = c.start();
        let b = c.start();
        assert_eq!(a, b);
    }

    #[test]
    fn period_is_clamped() {
        let mut c = clock();
        assert_eq!(c.set_period(1), 5);
        assert_eq!(c.set_period(500), 100);
        assert_eq!(c.set_period(42), 42);
    }
}
