//! The posting schedule: the set of minutes of the day at which a post may
//! fire.

use crate::{error::invalid_entry_error, Error, Result};
use regex::Regex;
use std::{collections::HashSet, fs, path::Path, sync::LazyLock};
use tracing::debug;

// The regex for validating schedule entries is only computed once
static HHMM_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").unwrap());

/// A set of `HH:MM` trigger minutes, immutable during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
	minutes: HashSet<String>,
}

impl Schedule {
	/// Read the schedule from a text file, one `HH:MM` entry per line.
	///
	/// # Errors
	///
	/// Returns an error if the file is unreadable, holds no entries, or
	/// holds a malformed entry.
	pub fn from_path(path: &Path) -> Result<Self> {
		let raw = fs::read_to_string(path)
			.map_err(|_| Error::NoSchedule(path.display().to_string()))?;
		let schedule = Self::from_lines(&raw)?;
		if schedule.is_empty() {
			return Err(Error::NoSchedule(path.display().to_string()));
		}
		debug!(
			"Loaded {} scheduled minutes from {}",
			schedule.len(),
			path.display()
		);
		Ok(schedule)
	}

	/// Build the schedule from raw text.  Blank lines are skipped; every
	/// remaining line must be a valid `HH:MM` token.
	///
	/// # Errors
	///
	/// Returns an error naming the first malformed entry and its line number.
	pub fn from_lines(raw: &str) -> Result<Self> {
		let mut minutes = HashSet::new();
		for (num, line) in raw.lines().enumerate() {
			let entry = line.trim();
			if entry.is_empty() {
				continue;
			}
			if !HHMM_RE.is_match(entry) {
				return Err(invalid_entry_error(entry, num + 1));
			}
			minutes.insert(entry.to_string());
		}
		Ok(Self { minutes })
	}

	/// Whether the given `HH:MM` stamp is a scheduled minute
	#[must_use]
	pub fn contains(&self, stamp: &str) -> bool {
		self.minutes.contains(stamp)
	}

	/// Number of scheduled minutes
	#[must_use]
	pub fn len(&self) -> usize {
		self.minutes.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.minutes.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn test_valid_entries() -> Result<()> {
		let schedule = Schedule::from_lines("08:00\n18:30\n\n23:59\n00:00\n")?;
		assert_eq!(schedule.len(), 4);
		assert!(schedule.contains("08:00"));
		assert!(schedule.contains("23:59"));
		assert!(!schedule.contains("08:01"));
		Ok(())
	}

	#[test]
	fn test_duplicate_entries_collapse() -> Result<()> {
		let schedule = Schedule::from_lines("09:00\n09:00\n")?;
		assert_eq!(schedule.len(), 1);
		Ok(())
	}

	#[test]
	fn test_rejects_malformed_entries() {
		for bad in ["24:00", "9:00", "09:60", "0900", "nine", "09:00:00"] {
			assert!(
				Schedule::from_lines(bad).is_err(),
				"{bad:?} should be rejected"
			);
		}
	}

	#[test]
	fn test_error_names_the_offending_line() {
		let err = Schedule::from_lines("08:00\n\nlunchtime\n").unwrap_err();
		assert_eq!(
			err.to_string(),
			"Invalid schedule entry \"lunchtime\" on line 3 (valid format is HH:MM)"
		);
	}

	#[test]
	fn test_missing_file_is_an_error() {
		let err = Schedule::from_path(Path::new("no/such/hours.txt")).unwrap_err();
		assert_eq!(
			err.to_string(),
			"Schedule file no/such/hours.txt is missing or empty"
		);
	}

	#[test]
	fn test_empty_file_is_an_error() -> crate::Result<()> {
		let dir = tempfile::tempdir()?;
		let path = dir.path().join("hours.txt");
		std::fs::write(&path, "\n\n")?;
		assert!(Schedule::from_path(&path).is_err());
		Ok(())
	}
}
