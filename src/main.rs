//! Binary entry point: run the scheduler check once, or watch forever.

use dripfeed::{
	check::{self, Outcome, Policy},
	config::Config,
	content::ContentQueue,
	poster::{Deferred, DryRun, Poster, XPoster},
	schedule::Schedule,
	service::Service,
	state::Progress,
	time::Clock,
	Error, Result,
};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.init();

	match run() {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			error!("{err}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<()> {
	let config = Config::from_env();
	let queue = ContentQueue::from_path(&config.content_path)?;
	let schedule = Schedule::from_path(&config.schedule_path)?;
	let clock = Clock::in_zone(&config.time_zone)?;

	// Credentials are only read once a post is actually due, so an
	// off-schedule invocation stays a clean no-op without them
	let poster: Box<dyn Poster> = if config.dry_run {
		info!("Dry run: no real posts will go out");
		Box::new(DryRun)
	} else {
		Box::new(Deferred::new(|| XPoster::new(Config::credentials()?)))
	};
	let policy = Policy {
		advance: !config.dry_run || config.dry_run_advance,
	};

	let mode = std::env::args().nth(1).unwrap_or_else(|| "once".to_string());
	match mode.as_str() {
		"once" => run_once(&queue, &schedule, &clock, poster.as_ref(), &config, policy),
		"watch" => Service::new(
			queue,
			schedule,
			clock,
			poster,
			config.state_path.clone(),
			policy,
		)
		.run(),
		other => Err(Error::UnknownMode(other.to_string())),
	}
}

fn run_once(
	queue: &ContentQueue,
	schedule: &Schedule,
	clock: &Clock,
	poster: &dyn Poster,
	config: &Config,
	policy: Policy,
) -> Result<()> {
	let mut progress = Progress::load(&config.state_path)?;
	let now = clock.now();
	info!("Now ({}): {now}", config.time_zone);

	let outcome = check::run(queue, schedule, &mut progress, poster, &now, policy)?;
	if matches!(outcome, Outcome::Posted(_)) && policy.advance {
		progress.save(&config.state_path)?;
	}
	info!("Check complete: {outcome:?}");
	Ok(())
}
