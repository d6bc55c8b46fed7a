//! Persisted progress: which item posts next, and when the last post went
//! out.
//!
//! Progress is an owned value with explicit load/save boundaries.  It is
//! read once at the start of a check and written back only after a
//! successful post, so a failed post leaves the cursor where it was.

use crate::{time, Result};
use jiff::Zoned;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::debug;

/// Progress through the content queue, persisted between runs as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Progress {
	/// Index of the next unposted item.  Monotonically non-decreasing.
	#[serde(default)]
	pub next_index: usize,
	/// When the last successful post went out
	#[serde(default)]
	pub last_posted: Option<Zoned>,
}

impl Progress {
	/// Load progress from disk, starting fresh if the file does not exist
	/// yet.
	///
	/// # Errors
	///
	/// Returns an error if the file exists but is unreadable or malformed.
	pub fn load(path: &Path) -> Result<Self> {
		if !path.exists() {
			debug!("No state file at {}, starting fresh", path.display());
			return Ok(Self::default());
		}
		let raw = fs::read_to_string(path)?;
		Ok(serde_json::from_str(&raw)?)
	}

	/// Persist progress, overwriting any previous state.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be written.
	pub fn save(&self, path: &Path) -> Result<()> {
		fs::write(path, serde_json::to_string_pretty(self)?)?;
		debug!("Saved state to {}", path.display());
		Ok(())
	}

	/// Record a successful post of the current item at `when`.
	pub fn advance(&mut self, when: &Zoned) {
		self.next_index += 1;
		self.last_posted = Some(when.clone());
	}

	/// Whether a post already went out within the same calendar minute.
	/// Guards against double-posting when two checks land in one minute.
	#[must_use]
	pub fn posted_this_minute(&self, now: &Zoned) -> bool {
		self.last_posted
			.as_ref()
			.is_some_and(|last| time::same_minute(last, now))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn at(stamp: &str) -> Zoned {
		stamp.parse().unwrap()
	}

	#[test]
	fn test_missing_file_defaults_to_start() -> Result<()> {
		let progress = Progress::load(Path::new("no/such/state.json"))?;
		assert_eq!(progress.next_index, 0);
		assert_eq!(progress.last_posted, None);
		Ok(())
	}

	#[test]
	fn test_round_trip() -> Result<()> {
		let dir = tempfile::tempdir()?;
		let path = dir.path().join("state.json");

		let mut progress = Progress::default();
		progress.advance(&at("2024-01-01T09:00:00[Europe/Istanbul]"));
		progress.save(&path)?;

		let reloaded = Progress::load(&path)?;
		assert_eq!(reloaded, progress);
		assert_eq!(reloaded.next_index, 1);
		Ok(())
	}

	#[test]
	fn test_bare_next_index_parses() -> Result<()> {
		// State written before last_posted existed
		let progress: Progress = serde_json::from_str(r#"{"next_index": 3}"#)?;
		assert_eq!(progress.next_index, 3);
		assert_eq!(progress.last_posted, None);
		Ok(())
	}

	#[test]
	fn test_malformed_file_is_an_error() -> Result<()> {
		let dir = tempfile::tempdir()?;
		let path = dir.path().join("state.json");
		std::fs::write(&path, "not json")?;
		assert!(Progress::load(&path).is_err());
		Ok(())
	}

	#[test]
	fn test_advance_is_monotonic() {
		let mut progress = Progress::default();
		let now = at("2024-01-01T09:00:00[Europe/Istanbul]");
		progress.advance(&now);
		progress.advance(&now);
		assert_eq!(progress.next_index, 2);
		assert_eq!(progress.last_posted, Some(now));
	}

	#[test]
	fn test_posted_this_minute_guard() {
		let mut progress = Progress::default();
		let posted_at = at("2024-01-01T09:00:05[Europe/Istanbul]");
		assert!(!progress.posted_this_minute(&posted_at));

		progress.advance(&posted_at);
		assert!(progress.posted_this_minute(&at("2024-01-01T09:00:40[Europe/Istanbul]")));
		assert!(!progress.posted_this_minute(&at("2024-01-01T09:01:00[Europe/Istanbul]")));
	}
}
