//! # dripfeed
//!
//! `dripfeed` drip-feeds lines from a text file to X on a minute-granular
//! schedule, tracking which line goes next with a small persisted cursor.
//!
//! The whole crate orbits one check: has a scheduled minute arrived, and if
//! so, post the next unposted item and record that it went out.  The check
//! can run as a one-shot invoked by cron (`once`) or inside a long-running
//! loop with its own retry policy (`watch`).
//!
//! ```no_run
//! use dripfeed::{
//! 	check::{self, Policy},
//! 	content::ContentQueue,
//! 	poster::DryRun,
//! 	schedule::Schedule,
//! 	state::Progress,
//! 	time::Clock,
//! };
//! use std::path::Path;
//!
//! fn main() -> dripfeed::Result<()> {
//! 	let queue = ContentQueue::from_path(Path::new("data/content.txt"))?;
//! 	let schedule = Schedule::from_path(Path::new("data/hours.txt"))?;
//! 	let mut progress = Progress::load(Path::new("state.json"))?;
//!
//! 	let now = Clock::in_zone("Europe/Istanbul")?.now();
//! 	let outcome = check::run(
//! 		&queue,
//! 		&schedule,
//! 		&mut progress,
//! 		&DryRun,
//! 		&now,
//! 		Policy::default(),
//! 	)?;
//! 	println!("{outcome:?}");
//! 	Ok(())
//! }
//! ```

#![warn(clippy::pedantic)]

pub mod check;
pub mod config;
pub mod content;
mod error;
pub mod poster;
pub mod schedule;
pub mod service;
pub mod state;
pub mod time;

pub use error::{Error, Result};
