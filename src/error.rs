//! This module defines the error type and Result alias.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("Content file {0} is missing or empty")]
	NoContent(String),
	#[error("Schedule file {0} is missing or empty")]
	NoSchedule(String),
	#[error("Invalid schedule entry {entry:?} on line {line} (valid format is HH:MM)")]
	InvalidScheduleEntry { entry: String, line: usize },
	#[error("Missing environment variable {0}")]
	MissingEnv(&'static str),
	#[error("Unknown mode {0:?} (expected `once` or `watch`)")]
	UnknownMode(String),
	#[error("Post rejected with status {status}: {body}")]
	PostRejected { status: u16, body: String },
	#[error(transparent)]
	Http(#[from] reqwest::Error),
	#[error(transparent)]
	Io(#[from] std::io::Error),
	#[error(transparent)]
	Json(#[from] serde_json::Error),
	#[error(transparent)]
	Time(#[from] jiff::Error),
}

/// Construct a new `InvalidScheduleEntry` error
pub(crate) fn invalid_entry_error(entry: &str, line: usize) -> Error {
	Error::InvalidScheduleEntry {
		entry: entry.to_string(),
		line,
	}
}

pub type Result<T> = std::result::Result<T, Error>;
