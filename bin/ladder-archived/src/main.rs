// Copyright 2025-2026 Ladder Archive Authors.
// This file is part of ladder-archive.

// ladder-archive is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// ladder-archive is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with ladder-archive.  If not, see <http://www.gnu.org/licenses/>.

//! Daemon wiring: configuration assembly, logging, signal handling and the
//! recurring three-stage pipeline.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;

use ladder_archive::{
	install_signal_handlers,
	stages::{match_data::MatchDataStage, match_ids::match_ids_stage, players::players_stage, Stage},
	AnalyticStore, ApiClient, ArchiveConfig, Database, Fetch, RecurringRunner, Telemetry,
};

#[derive(Debug, Parser)]
#[command(name = "ladder-archived", about = "Recurring ranked-ladder and match-data ingestion daemon")]
struct Cli {
	/// Path to a TOML config file; the environment overrides it.
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Directory for the file log sink.
	#[arg(long, default_value = "logs")]
	log_dir: PathBuf,

	/// Stdout log level (error, warn, info, debug, trace).
	#[arg(short, long, default_value = "info")]
	verbosity: log::LevelFilter,

	/// Run a single pipeline cycle and exit instead of recurring.
	#[arg(long)]
	once: bool,
}

fn load_config(cli: &Cli) -> Result<ArchiveConfig> {
	// missing .env is fine; explicit environment always wins
	let _ = dotenv::dotenv();

	match &cli.config {
		Some(path) => {
			let text = std::fs::read_to_string(path)
				.with_context(|| format!("reading config file {}", path.display()))?;
			let mut config: ArchiveConfig =
				toml::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))?;
			config.apply_env_overrides().context("applying environment overrides")?;
			Ok(config)
		}
		None => ArchiveConfig::from_env().context("assembling config from environment"),
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();
	ladder_archive::logger::init(cli.verbosity, log::LevelFilter::Debug, &cli.log_dir)
		.context("initializing logging")?;

	let config = load_config(&cli)?;
	log::info!(
		"starting pipeline: interval={}s rate_limit={}per{}s strict_schema={}",
		config.pipeline_interval_s,
		config.rate_limit.calls,
		config.rate_limit.period_s,
		config.strict_schema,
	);

	let telemetry = Arc::new(Telemetry::new().context("building telemetry registry")?);
	let database = Database::connect(&config.database.url).await.context("connecting to the analytic store")?;
	let store: Arc<dyn AnalyticStore> = Arc::new(database);
	let fetch: Arc<dyn Fetch> =
		Arc::new(ApiClient::new(&config, Arc::clone(&telemetry)).context("building the upstream client")?);

	let stages: Vec<Box<dyn Stage>> = vec![
		Box::new(players_stage(
			Arc::clone(&fetch),
			Arc::clone(&store),
			config.elite_bounds.clone(),
			config.sub_elite_bounds.clone(),
		)),
		Box::new(match_ids_stage(Arc::clone(&fetch), Arc::clone(&store))),
		Box::new(MatchDataStage::new(fetch, store, config.strict_schema)),
	];

	if cli.once {
		for stage in &stages {
			stage.run().await.with_context(|| format!("stage {} failed", stage.name()))?;
		}
		return Ok(());
	}

	let shutdown = install_signal_handlers();
	let runner = RecurringRunner::new(stages, config.pipeline_interval(), shutdown);
	runner.run().await.context("pipeline runner failed")?;
	Ok(())
}
