//! In-memory failed-login counter keyed by client address.
//!
//! Every recorded failure sweeps the whole map, dropping attempts older than
//! the window and any key left empty. Lookups prune only the key they read.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

type Attempts = HashMap<String, Vec<Instant>>;

#[derive(Clone, Default)]
pub struct LoginThrottle {
    attempts: Arc<Mutex<Attempts>>,
}

impl LoginThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// A poisoned lock still holds consistent data, so it is recovered rather
    /// than treated as "no failures".
    fn lock(&self) -> MutexGuard<'_, Attempts> {
        self.attempts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of failures recorded for `key` within `window`.
    pub fn failures(&self, key: &str, window: Duration) -> usize {
        let now = Instant::now();
        let mut map = self.lock();
        let Some(entries) = map.get_mut(key) else {
            return 0;
        };
        entries.retain(|at| now.duration_since(*at) < window);
        let remaining = entries.len();
        if remaining == 0 {
            map.remove(key);
        }
        remaining
    }

    /// Whether `key` has reached `max_attempts` failures within `window`.
    pub fn is_blocked(&self, key: &str, max_attempts: u32, window: Duration) -> bool {
        self.failures(key, window) >= max_attempts as usize
    }

    /// Records a failure for `key` and drops every expired attempt.
    pub fn record_failure(&self, key: &str, window: Duration) {
        let now = Instant::now();
        let mut map = self.lock();
        map.retain(|_, entries| {
            entries.retain(|at| now.duration_since(*at) < window);
            !entries.is_empty()
        });
        map.entry(key.to_owned()).or_default().push(now);
    }

    pub fn clear(&self, key: &str) {
        self.lock().remove(key);
    }

    /// Number of addresses currently tracked.
    pub fn tracked(&self) -> usize {
        self.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_after_max_failures() {
        let throttle = LoginThrottle::new();
        let window = Duration::from_secs(900);

        for _ in 0..4 {
            throttle.record_failure("10.0.0.1", window);
        }
        assert!(!throttle.is_blocked("10.0.0.1", 5, window));

        throttle.record_failure("10.0.0.1", window);
        assert!(throttle.is_blocked("10.0.0.1", 5, window));
        assert!(!throttle.is_blocked("10.0.0.2", 5, window));
    }

    #[test]
    fn clear_resets_the_counter() {
        let throttle = LoginThrottle::new();
        let window = Duration::from_secs(60);
        throttle.record_failure("ip", window);
        throttle.record_failure("ip", window);
        throttle.clear("ip");
        assert_eq!(throttle.failures("ip", Duration::from_secs(60)), 0);
    }

    #[test]
    fn expired_attempts_are_pruned() {
        let throttle = LoginThrottle::new();
        throttle.record_failure("ip", Duration::from_secs(60));
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(throttle.failures("ip", Duration::from_millis(5)), 0);
    }

    #[test]
    fn recording_sweeps_other_expired_keys() {
        let throttle = LoginThrottle::new();
        let short = Duration::from_millis(50);
        for i in 0..10 {
            throttle.record_failure(&format!("10.0.0.{i}"), short);
        }
        assert_eq!(throttle.tracked(), 10);

        std::thread::sleep(Duration::from_millis(100));
        throttle.record_failure("10.0.1.1", short);
        assert_eq!(throttle.tracked(), 1);
    }

    #[test]
    fn poisoned_lock_keeps_counting() {
        let throttle = LoginThrottle::new();
        let window = Duration::from_secs(60);
        for _ in 0..3 {
            throttle.record_failure("ip", window);
        }

        let shared = throttle.clone();
        let _ = std::thread::spawn(move || {
            let _guard = shared.attempts.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(throttle.attempts.is_poisoned());
        assert_eq!(throttle.failures("ip", window), 3);
        assert!(throttle.is_blocked("ip", 3, window));
    }
}
