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

use std::{env, fmt, time::Duration};

use serde::Deserialize;

use crate::{
	error::{ArchiveError, Result},
	types::{full_elite_bounds, full_sub_elite_bounds, EliteBoundsConfig, SubEliteBoundsConfig},
};

const API_KEY_VAR: &str = "API_KEY";
const POSTGRES_VAR: &str = "DATABASE_URL";

/// Upstream request budget per location: `calls` permits every `period_s`.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct RateLimitConfig {
	#[serde(default = "default_rate_limit_calls")]
	pub calls: u32,
	#[serde(default = "default_rate_limit_period")]
	pub period_s: f64,
}

impl RateLimitConfig {
	pub fn period(&self) -> Duration {
		Duration::from_secs_f64(self.period_s)
	}
}

impl Default for RateLimitConfig {
	fn default() -> Self {
		Self { calls: default_rate_limit_calls(), period_s: default_rate_limit_period() }
	}
}

const fn default_rate_limit_calls() -> u32 {
	100
}

const fn default_rate_limit_period() -> f64 {
	120.0
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DatabaseConfig {
	/// PostgreSQL url.
	pub url: String,
}

impl fmt::Display for DatabaseConfig {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.url)
	}
}

/// Everything the pipeline needs, assembled once at startup and passed into
/// the stages at construction.
#[derive(Clone, Debug, Deserialize)]
pub struct ArchiveConfig {
	/// Upstream API key. Only ever read from the environment; masked in logs.
	#[serde(skip)]
	pub api_key: String,
	#[serde(default)]
	pub rate_limit: RateLimitConfig,
	pub database: DatabaseConfig,
	/// Seconds to sleep between successful pipeline cycles.
	#[serde(default = "default_pipeline_interval")]
	pub pipeline_interval_s: u64,
	/// Hard-fail parsing on schema validation errors. Off while upstream
	/// schemas are still being tuned; validation failures then log and yield
	/// empty tables.
	#[serde(default)]
	pub strict_schema: bool,
	#[serde(default = "full_elite_bounds")]
	pub elite_bounds: EliteBoundsConfig,
	#[serde(default = "full_sub_elite_bounds")]
	pub sub_elite_bounds: SubEliteBoundsConfig,
}

const fn default_pipeline_interval() -> u64 {
	21_600
}

impl ArchiveConfig {
	/// Build a config from the environment alone.
	pub fn from_env() -> Result<Self> {
		let api_key = env::var(API_KEY_VAR)?;
		let database = DatabaseConfig { url: env::var(POSTGRES_VAR)? };
		let mut config = Self {
			api_key,
			rate_limit: RateLimitConfig::default(),
			database,
			pipeline_interval_s: default_pipeline_interval(),
			strict_schema: false,
			elite_bounds: full_elite_bounds(),
			sub_elite_bounds: full_sub_elite_bounds(),
		};
		config.apply_env_overrides()?;
		Ok(config)
	}

	/// Overlay environment variables onto a deserialized config. The API key
	/// and database URL always win from the environment when present.
	pub fn apply_env_overrides(&mut self) -> Result<()> {
		if let Ok(key) = env::var(API_KEY_VAR) {
			self.api_key = key;
		}
		if let Ok(url) = env::var(POSTGRES_VAR) {
			self.database.url = url;
		}
		if let Ok(calls) = env::var("RATE_LIMIT_CALLS") {
			self.rate_limit.calls =
				calls.parse().map_err(|_| ArchiveError::Config(format!("RATE_LIMIT_CALLS={}", calls)))?;
		}
		if let Ok(period) = env::var("RATE_LIMIT_PERIOD") {
			self.rate_limit.period_s =
				period.parse().map_err(|_| ArchiveError::Config(format!("RATE_LIMIT_PERIOD={}", period)))?;
		}
		if let Ok(interval) = env::var("PIPELINE_INTERVAL_SECONDS") {
			self.pipeline_interval_s =
				interval.parse().map_err(|_| ArchiveError::Config(format!("PIPELINE_INTERVAL_SECONDS={}", interval)))?;
		}
		if self.api_key.is_empty() {
			return Err(ArchiveError::Config(format!("{} must be set", API_KEY_VAR)));
		}
		if self.rate_limit.calls == 0 || self.rate_limit.period_s <= 0.0 {
			return Err(ArchiveError::Config("rate limit calls and period must be positive".into()));
		}
		Ok(())
	}

	pub fn pipeline_interval(&self) -> Duration {
		Duration::from_secs(self.pipeline_interval_s)
	}
}
