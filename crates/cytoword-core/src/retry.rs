use std::time::Duration;

use crate::error::{CytowordError, Result};

const MAX_BACKOFF_EXPONENT: u32 = 16;

/// Pause seam for the fetcher. Tests record instead of sleeping.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

impl<S: Sleeper + ?Sized> Sleeper for &S {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub jitter_bound: Duration,
    /// Mixed into every jitter draw; distinct runs should use distinct seeds.
    pub jitter_seed: u64,
}

impl RetryPolicy {
    /// Fresh per-run jitter seed.
    #[must_use]
    pub fn random_jitter_seed() -> u64 {
        uuid::Uuid::new_v4().as_u64_pair().0
    }

    #[must_use]
    pub fn with_jitter_seed(self, jitter_seed: u64) -> Self {
        Self {
            jitter_seed,
            ..self
        }
    }

    /// `base * 2^(attempt-1)` plus a jitter in `[0, jitter_bound)`.
    ///
    /// Jitter is drawn from `jitter_seed`, `label` and `attempt`; a fixed seed
    /// replays the same schedule.
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32, label: &str) -> Duration {
        let exp = attempt.saturating_sub(1).min(MAX_BACKOFF_EXPONENT);
        let baseline = self.base_delay.saturating_mul(1_u32 << exp);
        baseline.saturating_add(self.jitter(attempt, label))
    }

    fn jitter(&self, attempt: u32, label: &str) -> Duration {
        let bound_ms = u64::try_from(self.jitter_bound.as_millis()).unwrap_or(u64::MAX);
        if bound_ms == 0 {
            return Duration::ZERO;
        }
        let jitter_input = format!("{:016x}:{label}:{attempt}", self.jitter_seed);
        let hash = blake3::hash(jitter_input.as_bytes());
        let mut bytes = [0_u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        Duration::from_millis(u64::from_be_bytes(bytes) % bound_ms)
    }

    /// Runs `op` until it succeeds, a non-retryable error occurs, or attempts
    /// run out. Errors that are not transport failures are returned untouched.
    pub fn run<T, S, F>(&self, sleeper: &S, label: &str, mut op: F) -> Result<T>
    where
        S: Sleeper + ?Sized,
        F: FnMut(u32) -> Result<T>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            let err = match op(attempt) {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            let Some(kind) = err.fetch_kind() else {
                return Err(err);
            };
            if !kind.is_retryable() || attempt >= max_attempts {
                return Err(CytowordError::Fetch {
                    kind,
                    attempts: attempt,
                    message: failure_message(&err),
                });
            }

            let delay = self.backoff_delay(attempt, label);
            log::warn!(
                "{label}: attempt {attempt}/{max_attempts} failed ({kind}): {}; retrying in {:.2}s",
                failure_message(&err),
                delay.as_secs_f64()
            );
            sleeper.sleep(delay);
            attempt += 1;
        }
    }
}

fn failure_message(err: &CytowordError) -> String {
    match err {
        CytowordError::Fetch { message, .. } => message.clone(),
        other => other.to_string(),
    }
}
