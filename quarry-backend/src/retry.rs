//! Jittered exponential backoff for backend calls.

use std::time::Duration;

use rand::Rng;

use quarry_core::config::BackendConfig;

/// Backoff schedule: `base * factor^n` with multiplicative jitter.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    base: Duration,
    factor: f64,
    jitter: f64,
    max_attempts: u32,
}

impl RetryPolicy {
    pub fn from_config(config: &BackendConfig) -> Self {
        Self {
            base: Duration::from_millis(config.retry_base_ms),
            factor: config.retry_factor,
            jitter: config.retry_jitter,
            max_attempts: config.retry_max_attempts,
        }
    }

    /// Total attempts allowed per call, first try included.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before retry number `attempt` (1-based: the delay after the
    /// first failure is `delay(1)`).
    pub fn delay(&self, attempt: u32) -> Duration {
        let exp = self.factor.powi(attempt.saturating_sub(1) as i32);
        let nominal = self.base.as_secs_f64() * exp;
        let jitter = if self.jitter > 0.0 {
            rand::thread_rng().gen_range(1.0 - self.jitter..=1.0 + self.jitter)
        } else {
            1.0
        };
        Duration::from_secs_f64(nominal * jitter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(jitter: f64) -> RetryPolicy {
        RetryPolicy {
            base: Duration::from_millis(200),
            factor: 2.0,
            jitter,
            max_attempts: 4,
        }
    }

    #[test]
    fn delays_double_without_jitter() {
        let p = policy(0.0);
        assert_eq!(p.delay(1), Duration::from_millis(200));
        assert_eq!(p.delay(2), Duration::from_millis(400));
        assert_eq!(p.delay(3), Duration::from_millis(800));
    }

    #[test]
    fn jitter_stays_within_band() {
        let p = policy(0.2);
        for attempt in 1..=3 {
            let nominal = 200.0 * 2f64.powi(attempt as i32 - 1);
            for _ in 0..100 {
                let d = p.delay(attempt).as_secs_f64() * 1000.0;
                assert!(d >= nominal * 0.8 - 1e-6 && d <= nominal * 1.2 + 1e-6);
            }
        }
    }
}
