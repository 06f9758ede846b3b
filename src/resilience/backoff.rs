//! Wait strategies between retry attempts.

use rand::Rng;
use std::time::Duration;

/// Default wait between attempts.
pub const DEFAULT_WAIT: Duration = Duration::from_millis(500);

/// How long a retry loop blocks before the next attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// The same wait before every retry.
    Fixed(Duration),
    /// Doubling wait starting at `initial`, capped at `max`, with up to 10% jitter.
    Exponential { initial: Duration, max: Duration },
}

impl Backoff {
    /// Wait before retry number `retry` (1 for the first retry).
    pub fn delay(&self, retry: u32) -> Duration {
        match *self {
            Backoff::Fixed(wait) => wait,
            Backoff::Exponential { initial, max } => jittered(retry, initial, max),
        }
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff::Fixed(DEFAULT_WAIT)
    }
}

fn jittered(retry: u32, initial: Duration, max: Duration) -> Duration {
    if retry == 0 {
        return Duration::ZERO;
    }

    let factor = 2u32.saturating_pow(retry - 1);
    let capped = initial.saturating_mul(factor).min(max);

    // 0 to 10% of the delay
    let jitter_range = capped / 10;
    let jitter = if jitter_range > Duration::ZERO {
        rand::thread_rng().gen_range(Duration::ZERO..jitter_range)
    } else {
        Duration::ZERO
    };

    capped + jitter
}
