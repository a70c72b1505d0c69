//! Cancel-and-reschedule timers.
//!
//! A [`Debounce`] fires at most once per window: arming it again before the
//! deadline pushes the deadline out instead of queuing a second fire. The
//! [`Scheduler`] owns the three named timers the session uses and reports
//! which of them are due at a given instant.
//!
//! ```
//! use tabletop_sync::core::DebounceConfig;
//! use tabletop_sync::sync::{Scheduler, TimerKind};
//!
//! let mut timers = Scheduler::new(&DebounceConfig::default());
//! timers.arm(TimerKind::Transmit, 0);
//! timers.arm(TimerKind::Transmit, 30); // re-arms, deadline now 80
//!
//! assert!(timers.due(79).is_empty());
//! assert_eq!(timers.due(80).as_slice(), &[TimerKind::Transmit]);
//! assert!(timers.due(200).is_empty()); // fired once
//! ```

use smallvec::SmallVec;

use crate::core::clock::Millis;
use crate::core::config::DebounceConfig;

/// The session's named timers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Display refresh.
    Render,
    /// Outbound full-state publish.
    Transmit,
    /// Tap/untap consensus.
    TapToggle,
}

impl TimerKind {
    pub const ALL: [TimerKind; 3] = [TimerKind::Render, TimerKind::Transmit, TimerKind::TapToggle];

    const fn index(self) -> usize {
        match self {
            TimerKind::Render => 0,
            TimerKind::Transmit => 1,
            TimerKind::TapToggle => 2,
        }
    }
}

/// One debounced timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Debounce {
    window: Millis,
    deadline: Option<Millis>,
}

impl Debounce {
    #[must_use]
    pub const fn new(window: Millis) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Arm (or re-arm) to fire `window` after `now`.
    ///
    /// Returns `true` if a pending fire was cancelled.
    pub fn arm(&mut self, now: Millis) -> bool {
        self.deadline.replace(now + self.window).is_some()
    }

    /// Cancel any pending fire. Returns `true` if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Millis> {
        self.deadline
    }

    #[must_use]
    pub fn window(&self) -> Millis {
        self.window
    }

    /// Disarm and return `true` if the deadline has passed.
    pub fn fire(&mut self, now: Millis) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// The render, transmit and tap-toggle timers.
#[derive(Clone, Debug)]
pub struct Scheduler {
    timers: [Debounce; 3],
}

impl Scheduler {
    #[must_use]
    pub fn new(config: &DebounceConfig) -> Self {
        Self {
            timers: [
                Debounce::new(config.render_ms),
                Debounce::new(config.transmit_ms),
                Debounce::new(config.tap_toggle_ms),
            ],
        }
    }

    pub fn arm(&mut self, kind: TimerKind, now: Millis) {
        if self.timers[kind.index()].arm(now) {
            log::trace!("{:?} timer rescheduled", kind);
        }
    }

    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        self.timers[kind.index()].cancel()
    }

    #[must_use]
    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.timers[kind.index()].is_armed()
    }

    #[must_use]
    pub fn deadline(&self, kind: TimerKind) -> Option<Millis> {
        self.timers[kind.index()].deadline()
    }

    /// Earliest pending deadline across all timers.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.iter().filter_map(Debounce::deadline).min()
    }

    /// Timers due at `now`, earliest deadline first. Each is disarmed.
    pub fn due(&mut self, now: Millis) -> SmallVec<[TimerKind; 3]> {
        let mut fired: SmallVec<[(Millis, TimerKind); 3]> = TimerKind::ALL
            .into_iter()
            .filter_map(|kind| {
                let deadline = self.timers[kind.index()].deadline()?;
                (deadline <= now).then_some((deadline, kind))
            })
            .collect();
        fired.sort_by_key(|&(deadline, kind)| (deadline, kind.index()));

        for &(_, kind) in &fired {
            self.timers[kind.index()].fire(now);
        }
        fired.into_iter().map(|(_, kind)| kind).collect()
    }
}
