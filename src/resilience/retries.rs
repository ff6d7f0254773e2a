//! Readiness retry bookkeeping.
//!
//! # Responsibilities
//! - Bound the number of delivery attempts per inbound request
//! - Hold the fixed delay between consecutive attempts
//! - Track attempts and cumulative wait for diagnostics
//!
//! The engine exposes no readiness signal, so real traffic is the probe.
//! Only connection failures count against the bound; the caller decides what
//! is retryable.

use std::time::Duration;

/// Fixed-delay retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts allowed, including the first one.
    pub max_attempts: u32,
    /// Sleep between consecutive attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 500;
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(10);

    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Fresh per-request state.
    pub fn start(&self) -> RetryState {
        RetryState {
            attempt_count: 0,
            max_attempts: self.max_attempts,
            delay: self.delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_DELAY)
    }
}

/// Per-request retry state. `attempt_count <= max_attempts` always holds.
#[derive(Debug, Clone)]
pub struct RetryState {
    attempt_count: u32,
    max_attempts: u32,
    delay: Duration,
}

impl RetryState {
    /// Claim the next attempt. Returns its 1-based number, or `None` once the
    /// bound is reached.
    pub fn next_attempt(&mut self) -> Option<u32> {
        if self.is_exhausted() {
            return None;
        }
        self.attempt_count += 1;
        Some(self.attempt_count)
    }

    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempt_count >= self.max_attempts
    }

    /// Attempts that failed before the current one.
    pub fn retries(&self) -> u32 {
        self.attempt_count.saturating_sub(1)
    }

    /// Total time spent sleeping between the attempts made so far.
    pub fn waited(&self) -> Duration {
        self.delay.saturating_mul(self.retries())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempts_are_bounded() {
        let policy = RetryPolicy::new(3, Duration::from_millis(10));
        let mut state = policy.start();

        assert_eq!(state.next_attempt(), Some(1));
        assert_eq!(state.next_attempt(), Some(2));
        assert_eq!(state.next_attempt(), Some(3));
        assert!(state.is_exhausted());
        assert_eq!(state.next_attempt(), None);
        assert_eq!(state.attempt_count(), 3);
    }

    #[test]
    fn test_waited_counts_gaps_between_attempts() {
        let mut state = RetryPolicy::new(500, Duration::from_millis(10)).start();
        assert_eq!(state.waited(), Duration::ZERO);

        for _ in 0..4 {
            state.next_attempt();
        }
        assert_eq!(state.retries(), 3);
        assert_eq!(state.waited(), Duration::from_millis(30));
    }

    #[test]
    fn test_zero_attempts_clamped_to_one() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(RetryPolicy::default().max_attempts, 500);
    }
}
