use std::time::Duration;

use tokio::time::sleep;

/// Fixed-interval retry budget for [`wait_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    /// Pause between condition checks.
    pub interval: Duration,
    /// Number of condition checks before giving up.
    pub max_attempts: u32,
}

impl PollSchedule {
    pub const fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Schedule that spends at most `budget` checking once per `interval`.
    ///
    /// The attempt count is the truncated quotient, so a budget shorter than
    /// one interval yields a schedule that never checks.
    pub fn within(budget: Duration, interval: Duration) -> Self {
        let max_attempts = match interval.as_millis() {
            0 => 0,
            interval_ms => (budget.as_millis() / interval_ms) as u32,
        };

        Self {
            interval,
            max_attempts,
        }
    }
}

/// Repeatedly evaluate an async condition until it holds or the schedule is
/// exhausted.
///
/// Returns `Ok(true)` as soon as the condition holds and `Ok(false)` once all
/// attempts are spent; the caller decides how severe an exhausted schedule is.
/// A condition error aborts the wait immediately. Every failed check is
/// followed by one interval of sleep, including the last.
pub async fn wait_for<F, Fut, E>(schedule: PollSchedule, mut condition: F) -> Result<bool, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    for _ in 0..schedule.max_attempts {
        if condition().await? {
            return Ok(true);
        }

        sleep(schedule.interval).await;
    }

    Ok(false)
}
