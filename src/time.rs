//! Access to the current time is controlled through this module, so a check
//! can be pinned to any instant in tests and rehearsals.

use crate::Result;
use jiff::{tz::TimeZone, Zoned};

/// Interface to the current wall-clock time, projected into the configured
/// time zone.
#[derive(Debug, Clone)]
pub enum Clock {
	/// The real system clock, read in a named IANA time zone
	Real(TimeZone),
	/// A frozen instant
	Fixed(Zoned),
}

impl Clock {
	/// Build a real clock in a named IANA time zone, e.g. `Europe/Istanbul`.
	///
	/// # Errors
	///
	/// Returns an error if the zone name is not in the bundled tz database.
	pub fn in_zone(name: &str) -> Result<Self> {
		Ok(Self::Real(TimeZone::get(name)?))
	}

	/// Return the current time
	#[must_use]
	pub fn now(&self) -> Zoned {
		match self {
			Self::Real(tz) => jiff::Timestamp::now().to_zoned(tz.clone()),
			Self::Fixed(instant) => instant.clone(),
		}
	}
}

/// Format a timestamp at the minute granularity the schedule speaks, `HH:MM`.
#[must_use]
pub fn minute_stamp(when: &Zoned) -> String {
	when.strftime("%H:%M").to_string()
}

/// Whether two timestamps fall within the same calendar minute.
#[must_use]
pub fn same_minute(a: &Zoned, b: &Zoned) -> bool {
	a.strftime("%Y-%m-%d %H:%M").to_string() == b.strftime("%Y-%m-%d %H:%M").to_string()
}
