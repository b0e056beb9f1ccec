use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Retry strategy for fallible background operations.
///
/// The default policy makes a single attempt. Exponential policies double the
/// delay after every failed attempt, capped at `max_backoff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
	max_attempts: u32,
	initial_backoff: Duration,
	max_backoff: Duration,
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self::none()
	}
}

impl RetryPolicy {
	/// One attempt, no retries.
	pub const fn none() -> Self {
		Self {
			max_attempts: 1,
			initial_backoff: Duration::ZERO,
			max_backoff: Duration::ZERO,
		}
	}

	/// Up to `max_attempts` attempts with doubling backoff.
	///
	/// `max_attempts` is clamped to at least one.
	pub fn exponential(max_attempts: u32, initial_backoff: Duration, max_backoff: Duration) -> Self {
		Self {
			max_attempts: max_attempts.max(1),
			initial_backoff,
			max_backoff: max_backoff.max(initial_backoff),
		}
	}

	pub const fn max_attempts(&self) -> u32 {
		self.max_attempts
	}

	/// Delay to wait after `failed` attempts have failed, or `None` once the
	/// attempt budget is spent.
	pub fn delay_for(&self, failed: u32) -> Option<Duration> {
		if failed == 0 || failed >= self.max_attempts {
			return None;
		}
		let factor = 2u32.saturating_pow(failed - 1);
		Some(self.initial_backoff.saturating_mul(factor).min(self.max_backoff))
	}

	/// Runs `op` until it succeeds or the policy gives up, returning the last error.
	pub async fn run<F, Fut, T, E>(&self, label: &str, mut op: F) -> Result<T, E>
	where
		F: FnMut() -> Fut,
		Fut: Future<Output = Result<T, E>>,
		E: Display,
	{
		let mut failed = 0u32;
		loop {
			match op().await {
				Ok(value) => return Ok(value),
				Err(error) => {
					failed = failed.saturating_add(1);
					let Some(delay) = self.delay_for(failed) else {
						return Err(error);
					};
					tracing::warn!(op = label, attempt = failed, delay_ms = delay.as_millis() as u64, %error, "retrying");
					tokio::time::sleep(delay).await;
				}
			}
		}
	}
}
