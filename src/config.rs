//! Environment-driven configuration.
//!
//! The binary is configured the way its cron heritage expects: everything
//! comes from environment variables, with sensible defaults for the file
//! paths and time zone.  Credentials are only demanded when a real post can
//! happen, so a dry run needs none.

use crate::{poster::Credentials, Error, Result};
use std::{
	env,
	path::PathBuf,
};

/// All time decisions happen in this zone unless `DRIPFEED_TZ` says
/// otherwise.
pub const DEFAULT_TIME_ZONE: &str = "Europe/Istanbul";

/// Everything the binary needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
	/// Content queue file, one item per line
	pub content_path: PathBuf,
	/// Schedule file, one `HH:MM` entry per line
	pub schedule_path: PathBuf,
	/// Progress state file
	pub state_path: PathBuf,
	/// IANA time zone name for all schedule decisions
	pub time_zone: String,
	/// Skip the real external call
	pub dry_run: bool,
	/// Whether a dry run still advances the cursor
	pub dry_run_advance: bool,
}

impl Config {
	/// Resolve configuration from process environment variables.
	#[must_use]
	pub fn from_env() -> Self {
		Self {
			content_path: path_var("DRIPFEED_CONTENT", "data/content.txt"),
			schedule_path: path_var("DRIPFEED_SCHEDULE", "data/hours.txt"),
			state_path: path_var("DRIPFEED_STATE", "state.json"),
			time_zone: env::var("DRIPFEED_TZ")
				.unwrap_or_else(|_| DEFAULT_TIME_ZONE.to_string()),
			dry_run: bool_var("DRY_RUN"),
			dry_run_advance: bool_var("DRY_RUN_ADVANCE"),
		}
	}

	/// Load the four posting secrets from the environment.
	///
	/// # Errors
	///
	/// Returns an error naming the first missing variable.
	pub fn credentials() -> Result<Credentials> {
		Ok(Credentials {
			consumer_key: secret("TW_CONSUMER_KEY")?,
			consumer_secret: secret("TW_CONSUMER_SECRET")?,
			access_token: secret("TW_ACCESS_TOKEN")?,
			access_secret: secret("TW_ACCESS_TOKEN_SECRET")?,
		})
	}
}

fn secret(key: &'static str) -> Result<String> {
	env::var(key).map_err(|_| Error::MissingEnv(key))
}

fn path_var(key: &str, default: &str) -> PathBuf {
	env::var_os(key)
		.map(PathBuf::from)
		.unwrap_or_else(|| PathBuf::from(default))
}

fn bool_var(key: &str) -> bool {
	env::var(key)
		.map(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
		.unwrap_or(false)
}
