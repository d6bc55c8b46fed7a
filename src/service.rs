//! Watch mode: a long-running scheduler loop wrapped around the single
//! check.
//!
//! Where once-mode leans on an external cron cadence for retries, the loop
//! owns its own cadence: it runs the check, retries a failed post with
//! bounded backoff, and then sleeps to the next minute boundary.  The
//! minute-level guard in [`Progress`] keeps a retried or repeated check
//! from double-posting.

use crate::{
	check::{self, Outcome, Policy},
	content::ContentQueue,
	poster::Poster,
	schedule::Schedule,
	state::Progress,
	time::Clock,
	Error, Result,
};
use rand::Rng;
use std::{
	path::PathBuf,
	thread,
	time::Duration,
};
use tracing::{info, warn};

/// Bounded exponential backoff with jitter for failed posts.
///
/// Delays are kept short so retries land within (or near) the matching
/// minute; once it passes, the check itself declines to post and the item
/// waits for the next scheduled minute.
#[derive(Debug, Clone)]
pub struct Backoff {
	base: Duration,
	cap: Duration,
	max_attempts: u32,
	jitter: f64,
}

impl Default for Backoff {
	fn default() -> Self {
		Self {
			base: Duration::from_secs(2),
			cap: Duration::from_secs(30),
			max_attempts: 3,
			jitter: 0.1,
		}
	}
}

impl Backoff {
	#[must_use]
	pub fn new(base: Duration, cap: Duration, max_attempts: u32, jitter: f64) -> Self {
		Self {
			base,
			cap,
			max_attempts,
			jitter: jitter.clamp(0.0, 1.0),
		}
	}

	/// Delay before the given retry attempt (zero-based), or `None` once
	/// the attempts are spent.
	#[must_use]
	pub fn delay(&self, attempt: u32) -> Option<Duration> {
		if attempt >= self.max_attempts {
			return None;
		}
		let exp = self.base.saturating_mul(2u32.saturating_pow(attempt));
		let capped = exp.min(self.cap);
		Some(capped + self.jitter_for(capped))
	}

	#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
	fn jitter_for(&self, delay: Duration) -> Duration {
		let range_ms = (delay.as_millis() as f64 * self.jitter) as u64;
		if range_ms == 0 {
			return Duration::ZERO;
		}
		Duration::from_millis(rand::thread_rng().gen_range(0..=range_ms))
	}
}

/// The long-running service: owns the loaded queue and schedule, re-reads
/// progress from disk each tick, and sleeps between minutes.
pub struct Service {
	queue: ContentQueue,
	schedule: Schedule,
	clock: Clock,
	poster: Box<dyn Poster>,
	state_path: PathBuf,
	policy: Policy,
	backoff: Backoff,
}

impl Service {
	#[must_use]
	pub fn new(
		queue: ContentQueue,
		schedule: Schedule,
		clock: Clock,
		poster: Box<dyn Poster>,
		state_path: PathBuf,
		policy: Policy,
	) -> Self {
		Self {
			queue,
			schedule,
			clock,
			poster,
			state_path,
			policy,
			backoff: Backoff::default(),
		}
	}

	/// Override the retry policy for failed posts
	#[must_use]
	pub fn with_backoff(mut self, backoff: Backoff) -> Self {
		self.backoff = backoff;
		self
	}

	/// Run the scheduler loop until the queue is exhausted.
	///
	/// A post that still fails after its retries is logged and dropped;
	/// the cursor stays put, so the item goes out at the next scheduled
	/// minute instead.
	///
	/// # Errors
	///
	/// Returns an error if the state file cannot be read or written; a
	/// corrupt cursor is fatal, not something to spin on.
	pub fn run(&self) -> Result<()> {
		info!(
			"Watching: {} items queued across {} scheduled minutes",
			self.queue.len(),
			self.schedule.len()
		);
		loop {
			match self.tick() {
				Ok(Outcome::Exhausted) => {
					info!("Queue exhausted, stopping");
					return Ok(());
				}
				Ok(_) => {}
				// Delivery failures wait for the next scheduled minute;
				// anything else (state file trouble included) is fatal
				Err(err @ (Error::PostRejected { .. } | Error::Http(_))) => {
					warn!("Post failed after retries: {err}");
				}
				Err(err) => return Err(err),
			}
			thread::sleep(self.until_next_minute());
		}
	}

	/// One scheduled minute: run the check, retrying failed posts with
	/// backoff, and persist progress after a successful post.
	pub fn tick(&self) -> Result<Outcome> {
		let mut progress = Progress::load(&self.state_path)?;
		let mut attempt = 0;
		loop {
			let now = self.clock.now();
			match check::run(
				&self.queue,
				&self.schedule,
				&mut progress,
				self.poster.as_ref(),
				&now,
				self.policy,
			) {
				Ok(outcome) => {
					if matches!(outcome, Outcome::Posted(_)) && self.policy.advance {
						progress.save(&self.state_path)?;
					}
					return Ok(outcome);
				}
				Err(err) => match self.backoff.delay(attempt) {
					Some(delay) => {
						warn!(attempt, "Post failed ({err}), retrying in {delay:?}");
						attempt += 1;
						thread::sleep(delay);
					}
					None => return Err(err),
				},
			}
		}
	}

	/// How long to sleep to land just past the next minute boundary
	#[allow(clippy::cast_sign_loss)]
	fn until_next_minute(&self) -> Duration {
		let second = i64::from(self.clock.now().second());
		Duration::from_secs((60 - second).max(1) as u64)
	}
}
