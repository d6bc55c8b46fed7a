//! The content queue: ordered lines waiting to be posted.

use crate::{Error, Result};
use std::{fs, path::Path};
use tracing::debug;

/// Platform limit on post length, in characters.
pub const MAX_POST_CHARS: usize = 280;

/// An ordered, immutable queue of postable lines, consumed by index only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentQueue {
	items: Vec<String>,
}

impl ContentQueue {
	/// Read the queue from a text file, one item per line.
	///
	/// # Errors
	///
	/// Returns an error if the file is unreadable or holds no items.
	pub fn from_path(path: &Path) -> Result<Self> {
		let raw = fs::read_to_string(path)
			.map_err(|_| Error::NoContent(path.display().to_string()))?;
		let queue = Self::from_lines(&raw);
		if queue.is_empty() {
			return Err(Error::NoContent(path.display().to_string()));
		}
		debug!("Loaded {} content items from {}", queue.len(), path.display());
		Ok(queue)
	}

	/// Build the queue from raw text.  Blank lines are skipped and
	/// surrounding whitespace is trimmed.
	#[must_use]
	pub fn from_lines(raw: &str) -> Self {
		let items = raw
			.lines()
			.map(str::trim)
			.filter(|line| !line.is_empty())
			.map(str::to_string)
			.collect();
		Self { items }
	}

	/// The item at the given index, if there is one
	#[must_use]
	pub fn get(&self, index: usize) -> Option<&str> {
		self.items.get(index).map(String::as_str)
	}

	/// Number of items in the queue
	#[must_use]
	pub fn len(&self) -> usize {
		self.items.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}

/// Clip an item to the platform limit, respecting character boundaries.
#[must_use]
pub fn clip(text: &str) -> &str {
	match text.char_indices().nth(MAX_POST_CHARS) {
		Some((idx, _)) => &text[..idx],
		None => text,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn test_blank_lines_and_whitespace_are_dropped() {
		let queue = ContentQueue::from_lines("first\n\n  second  \n\t\nthird\n");
		assert_eq!(queue.len(), 3);
		assert_eq!(queue.get(0), Some("first"));
		assert_eq!(queue.get(1), Some("second"));
		assert_eq!(queue.get(2), Some("third"));
		assert_eq!(queue.get(3), None);
	}

	#[test]
	fn test_empty_input_yields_empty_queue() {
		assert!(ContentQueue::from_lines("\n \n").is_empty());
	}

	#[test]
	fn test_missing_file_is_an_error() {
		let err = ContentQueue::from_path(Path::new("no/such/file.txt")).unwrap_err();
		assert_eq!(
			err.to_string(),
			"Content file no/such/file.txt is missing or empty"
		);
	}

	#[test]
	fn test_file_round_trip() -> crate::Result<()> {
		let dir = tempfile::tempdir()?;
		let path = dir.path().join("content.txt");
		std::fs::write(&path, "one\ntwo\n")?;
		let queue = ContentQueue::from_path(&path)?;
		assert_eq!(queue.len(), 2);
		Ok(())
	}

	#[test]
	fn test_clip_leaves_short_items_alone() {
		assert_eq!(clip("short"), "short");
		let exact = "x".repeat(MAX_POST_CHARS);
		assert_eq!(clip(&exact), exact);
	}

	#[test]
	fn test_clip_truncates_to_the_limit() {
		let long = "y".repeat(MAX_POST_CHARS + 40);
		assert_eq!(clip(&long).chars().count(), MAX_POST_CHARS);
	}

	#[test]
	fn test_clip_respects_multibyte_boundaries() {
		let long = "é".repeat(MAX_POST_CHARS + 1);
		let clipped = clip(&long);
		assert_eq!(clipped.chars().count(), MAX_POST_CHARS);
		assert!(long.is_char_boundary(clipped.len()));
	}
}
