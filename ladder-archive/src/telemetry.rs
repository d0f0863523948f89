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

//! Pipeline metrics. The registry is an explicit dependency handed to the
//! HTTP client and the limiter callbacks, not process state; whatever serves
//! `/metrics` calls [`Telemetry::exposition`].

use prometheus::{Encoder, GaugeVec, IntCounterVec, Opts, Registry, TextEncoder};

use crate::{error::Result, types::Location};

/// HTTP status codes worth retrying.
pub const RETRYABLE_STATUS: [u16; 5] = [429, 500, 502, 503, 504];

pub fn is_retryable_status(code: u16) -> bool {
	RETRYABLE_STATUS.contains(&code)
}

pub struct Telemetry {
	registry: Registry,
	limiter_rate: GaugeVec,
	http_error_codes: IntCounterVec,
}

impl Telemetry {
	pub fn new() -> Result<Self> {
		let registry = Registry::new();
		let limiter_rate = GaugeVec::new(
			Opts::new("rate_limiter_location_rate", "Observed rate limiter throughput (permits/sec) per location"),
			&["location"],
		)?;
		let http_error_codes = IntCounterVec::new(
			Opts::new("api_http_error_codes_total", "Non-2xx status codes returned by the upstream API"),
			&["http_error_code", "category"],
		)?;
		registry.register(Box::new(limiter_rate.clone()))?;
		registry.register(Box::new(http_error_codes.clone()))?;
		Ok(Self { registry, limiter_rate, http_error_codes })
	}

	pub fn export_location_rate(&self, location: Location, rate: f64) {
		let location = location.to_string();
		self.limiter_rate.with_label_values(&[location.as_str()]).set(rate);
	}

	pub fn export_http_error_code(&self, code: u16) {
		let category = if is_retryable_status(code) { "retryable" } else { "unexpected" };
		self.http_error_codes.with_label_values(&[itoa::Buffer::new().format(code), category]).inc();
	}

	pub fn http_error_count(&self, code: u16, category: &str) -> u64 {
		self.http_error_codes.with_label_values(&[itoa::Buffer::new().format(code), category]).get()
	}

	pub fn registry(&self) -> &Registry {
		&self.registry
	}

	/// Render the registry in the text exposition format.
	pub fn exposition(&self) -> Result<String> {
		let metric_families = self.registry.gather();
		let mut buffer = Vec::new();
		TextEncoder::new().encode(&metric_families, &mut buffer)?;
		String::from_utf8(buffer).map_err(|e| crate::error::ArchiveError::Config(e.to_string()))
	}
}
