//! Shared run/stop state between the UI context and the simulation worker
//!
//! The running flag and a run generation share one `AtomicU64`
//! (`generation << 1 | running`), so every transition is a single
//! compare-and-swap. A worker holds the `RunToken` it was started with and is
//! only active while the word still equals `token.generation << 1 | 1`; a
//! worker left sleeping by `stop()` stays inactive even if a new run starts
//! before it wakes.
//!
//! The sent-packet counter is monotonic across runs and uses Relaxed ordering:
//! it is a display statistic, never a coordination signal.

use std::sync::atomic::{AtomicU64, Ordering};

const RUNNING_BIT: u64 = 1;

/// Proof that the holder started a particular run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunToken {
    generation: u64,
}

impl RunToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    fn running_word(&self) -> u64 {
        (self.generation << 1) | RUNNING_BIT
    }
}

/// Process-wide IDLE/RUNNING state plus the sent-packet counter
#[derive(Debug, Default)]
pub struct ControlState {
    state: AtomicU64,
    packets_sent: AtomicU64,
}

impl ControlState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state.load(Ordering::Acquire) & RUNNING_BIT == RUNNING_BIT
    }

    /// IDLE -> RUNNING. Returns `None` if a run is already active.
    pub fn try_start(&self) -> Option<RunToken> {
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            if current & RUNNING_BIT == RUNNING_BIT {
                return None;
            }
            let generation = (current >> 1).wrapping_add(1);
            let token = RunToken { generation };
            match self.state.compare_exchange_weak(
                current,
                token.running_word(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Some(token),
                Err(actual) => current = actual,
            }
        }
    }

    /// RUNNING -> IDLE on user request. Returns false if already idle.
    pub fn stop(&self) -> bool {
        let previous = self.state.fetch_and(!RUNNING_BIT, Ordering::AcqRel);
        previous & RUNNING_BIT == RUNNING_BIT
    }

    /// RUNNING -> IDLE when the worker for `token` exits.
    ///
    /// Only succeeds if that run is still the current one, so a late finish
    /// can never end a newer run. Returns true if this call made the transition.
    pub fn finish(&self, token: RunToken) -> bool {
        self.state
            .compare_exchange(
                token.running_word(),
                token.generation << 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Whether the run identified by `token` should keep going
    #[inline]
    pub fn is_active(&self, token: RunToken) -> bool {
        self.state.load(Ordering::Acquire) == token.running_word()
    }

    /// Count one more simulated packet and return the new total
    #[inline]
    pub fn record_packet(&self) -> u64 {
        self.packets_sent.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn packets_sent(&self) -> u64 {
        self.packets_sent.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_starts_idle() {
        let control = ControlState::new();
        assert!(!control.is_running());
        assert_eq!(control.packets_sent(), 0);
    }

    #[test]
    fn test_start_is_exclusive() {
        let control = ControlState::new();
        let token = control.try_start().unwrap();
        assert!(control.is_running());
        assert!(control.is_active(token));
        assert!(control.try_start().is_none());
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let control = ControlState::new();
        assert!(!control.stop());
        let _token = control.try_start().unwrap();
        assert!(control.stop());
        assert!(!control.stop());
        assert!(!control.is_running());
    }

    #[test]
    fn test_stale_token_stays_inactive_after_restart() {
        let control = ControlState::new();
        let first = control.try_start().unwrap();
        control.stop();
        let second = control.try_start().unwrap();

        assert_ne!(first, second);
        assert!(!control.is_active(first));
        assert!(control.is_active(second));

        // A late finish from the first worker must not end the second run
        assert!(!control.finish(first));
        assert!(control.is_running());
        assert!(control.finish(second));
        assert!(!control.is_running());
    }

    #[test]
    fn test_finish_after_stop_is_noop() {
        let control = ControlState::new();
        let token = control.try_start().unwrap();
        control.stop();
        assert!(!control.finish(token));
        assert!(!control.is_running());
    }

    #[test]
    fn test_packet_counter_is_monotonic_across_runs() {
        let control = ControlState::new();
        let token = control.try_start().unwrap();
        assert_eq!(control.record_packet(), 1);
        assert_eq!(control.record_packet(), 2);
        control.finish(token);
        let _token = control.try_start().unwrap();
        assert_eq!(control.record_packet(), 3);
    }

    #[test]
    fn test_concurrent_start_admits_one() {
        let control = Arc::new(ControlState::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let control = control.clone();
                std::thread::spawn(move || control.try_start().is_some())
            })
            .collect();
        let started = handles.into_iter().map(|h| h.join().unwrap()).filter(|s| *s).count();
        assert_eq!(started, 1);
    }
}
