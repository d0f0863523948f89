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

#![forbid(unsafe_code)]

pub mod config;
pub mod crawl;
pub mod database;
pub mod endpoints;
mod error;
pub mod http;
pub mod limiter;
#[cfg(feature = "logging")]
pub mod logger;
pub mod parse;
pub mod runner;
pub mod stages;
pub mod store;
pub mod telemetry;
pub mod types;
pub mod util;

#[cfg(test)]
pub(crate) mod test_util;

pub use self::config::{ArchiveConfig, DatabaseConfig, RateLimitConfig};
pub use self::database::Database;
pub use self::error::{ArchiveError, Result};
pub use self::http::{ApiClient, Fetch, FetchOutcome, FetchResult};
pub use self::limiter::LimiterRegistry;
pub use self::runner::{install_signal_handlers, RecurringRunner, Shutdown};
pub use self::store::AnalyticStore;
pub use self::telemetry::Telemetry;
pub use self::types::{Continent, Queue, Region, RunContext};
