//! The scheduler check: the one decision this crate exists to make.
//!
//! "Has this exact minute arrived, and if so, post the next item and record
//! that it was posted."

use crate::{
	content::{self, ContentQueue},
	poster::Poster,
	schedule::Schedule,
	state::Progress,
	time, Result,
};
use jiff::Zoned;
use tracing::{debug, info};

/// What a single check decided to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
	/// The item at this index was posted
	Posted(usize),
	/// The current minute is not in the schedule
	NotScheduled,
	/// Every item has already been posted
	Exhausted,
	/// A post already went out within this minute
	DuplicateMinute,
}

/// Whether a successful post advances the progress cursor.  Dry runs
/// typically do not, so the rehearsed item is still first in line for the
/// real thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
	pub advance: bool,
}

impl Default for Policy {
	fn default() -> Self {
		Self { advance: true }
	}
}

/// Run one scheduler check at `now`.
///
/// Posts the next unposted item if the current minute is in the schedule,
/// the queue is not exhausted, and nothing was already posted this minute.
/// On success the progress cursor advances (per `policy`); on failure it
/// stays put, so the same item is retried at the next matching minute.
///
/// Saving the mutated [`Progress`] back to disk is the caller's job; this
/// function only decides and posts.
///
/// # Errors
///
/// Returns an error if the post collaborator fails.
pub fn run(
	queue: &ContentQueue,
	schedule: &Schedule,
	progress: &mut Progress,
	poster: &dyn Poster,
	now: &Zoned,
	policy: Policy,
) -> Result<Outcome> {
	let Some(item) = queue.get(progress.next_index) else {
		info!("All {} items posted, nothing to do", queue.len());
		return Ok(Outcome::Exhausted);
	};

	let stamp = time::minute_stamp(now);
	if !schedule.contains(&stamp) {
		debug!("{stamp} is not a scheduled minute");
		return Ok(Outcome::NotScheduled);
	}

	if progress.posted_this_minute(now) {
		debug!("Already posted within {stamp}, skipping");
		return Ok(Outcome::DuplicateMinute);
	}

	let index = progress.next_index;
	let receipt = poster.post(content::clip(item))?;
	info!(index, id = ?receipt.id, "Posted item");
	if policy.advance {
		progress.advance(now);
	}
	Ok(Outcome::Posted(index))
}
