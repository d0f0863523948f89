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

//! Upstream fetch layer: per-location rate limiting, bounded retry on
//! transient failures, outcome classification and secret-free logging.

use std::{sync::Arc, time::Duration};

use serde_json::Value;
use tokio::time::sleep;

use crate::{
	config::{ArchiveConfig, RateLimitConfig},
	endpoints::mask_api_key,
	error::Result,
	limiter::LimiterRegistry,
	telemetry::{is_retryable_status, Telemetry},
	types::Location,
	util::{compact_preview, retry_delay, MAX_LOG_PREVIEW},
};

const AUTH_HEADER: &str = "X-Riot-Token";
const MAX_ATTEMPTS: u32 = 5;
const BACKOFF_MIN: Duration = Duration::from_secs(1);
const BACKOFF_MAX: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Classification of one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
	/// 2xx with a JSON body.
	Ok,
	/// Non-2xx outside the retryable set; no retries were made.
	HttpNonRetryable,
	/// 2xx whose body failed to parse as JSON.
	NonJson,
	/// Every attempt hit a transient failure.
	RetryExhausted,
}

#[derive(Debug)]
pub struct FetchResult {
	pub data: Option<Value>,
	pub outcome: FetchOutcome,
	pub status: Option<u16>,
}

impl FetchResult {
	pub fn is_ok(&self) -> bool {
		self.outcome == FetchOutcome::Ok
	}
}

/// The seam every crawler fetches through.
#[async_trait::async_trait]
pub trait Fetch: Send + Sync {
	async fn fetch_json(&self, url: &str, location: Location) -> Result<FetchResult>;
}

/// Real upstream client. Lives for one stage run; the limiter registry it
/// holds is handed in at construction.
pub struct ApiClient {
	http: reqwest::Client,
	api_key: String,
	limiters: LimiterRegistry,
	telemetry: Arc<Telemetry>,
	backoff_min: Duration,
	backoff_max: Duration,
}

impl ApiClient {
	pub fn new(config: &ArchiveConfig, telemetry: Arc<Telemetry>) -> Result<Self> {
		Self::with_rate_limit(&config.api_key, config.rate_limit, telemetry)
	}

	pub fn with_rate_limit(api_key: &str, rate: RateLimitConfig, telemetry: Arc<Telemetry>) -> Result<Self> {
		let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
		let rate_sink = Arc::clone(&telemetry);
		let limiters = LimiterRegistry::new(
			rate.calls,
			rate.period(),
			Arc::new(move |location, observed| rate_sink.export_location_rate(location, observed)),
		);
		Ok(Self {
			http,
			api_key: api_key.to_string(),
			limiters,
			telemetry,
			backoff_min: BACKOFF_MIN,
			backoff_max: BACKOFF_MAX,
		})
	}

	/// Override the retry backoff window.
	pub fn backoff(mut self, min: Duration, max: Duration) -> Self {
		self.backoff_min = min;
		self.backoff_max = max;
		self
	}

	async fn attempt(&self, url: &str, location: Location) -> Result<AttemptOutcome> {
		self.limiters.get(location).acquire().await;

		let response = match self.http.get(url).header(AUTH_HEADER, self.api_key.as_str()).send().await {
			Ok(response) => response,
			Err(e) => return Ok(AttemptOutcome::Transport(e)),
		};

		let status = response.status().as_u16();
		if !response.status().is_success() {
			self.telemetry.export_http_error_code(status);
			if is_retryable_status(status) {
				return Ok(AttemptOutcome::RetryableStatus(status));
			}
			log::warn!("upstream rejected request status={} url={}", status, mask_api_key(url));
			return Ok(AttemptOutcome::NonRetryable(status));
		}

		let body = match response.text().await {
			Ok(body) => body,
			Err(e) => return Ok(AttemptOutcome::Transport(e)),
		};
		match serde_json::from_str::<Value>(&body) {
			Ok(data) => Ok(AttemptOutcome::Json(status, data)),
			Err(_) => {
				log::warn!(
					"upstream returned non-JSON body status={} url={} preview={}",
					status,
					mask_api_key(url),
					compact_preview(&body, MAX_LOG_PREVIEW),
				);
				Ok(AttemptOutcome::NonJson(status))
			}
		}
	}
}

enum AttemptOutcome {
	Json(u16, Value),
	NonJson(u16),
	NonRetryable(u16),
	RetryableStatus(u16),
	Transport(reqwest::Error),
}

#[async_trait::async_trait]
impl Fetch for ApiClient {
	async fn fetch_json(&self, url: &str, location: Location) -> Result<FetchResult> {
		let mut last_status = None;
		for attempt in 1..=MAX_ATTEMPTS {
			match self.attempt(url, location).await? {
				AttemptOutcome::Json(status, data) => {
					return Ok(FetchResult { data: Some(data), outcome: FetchOutcome::Ok, status: Some(status) })
				}
				AttemptOutcome::NonJson(status) => {
					return Ok(FetchResult { data: None, outcome: FetchOutcome::NonJson, status: Some(status) })
				}
				AttemptOutcome::NonRetryable(status) => {
					return Ok(FetchResult {
						data: None,
						outcome: FetchOutcome::HttpNonRetryable,
						status: Some(status),
					})
				}
				AttemptOutcome::RetryableStatus(status) => {
					last_status = Some(status);
					log::debug!(
						"retryable status={} attempt={}/{} url={}",
						status,
						attempt,
						MAX_ATTEMPTS,
						mask_api_key(url),
					);
				}
				AttemptOutcome::Transport(e) => {
					log::debug!(
						"transport failure attempt={}/{} url={} error={}",
						attempt,
						MAX_ATTEMPTS,
						mask_api_key(url),
						e,
					);
				}
			}
			if attempt < MAX_ATTEMPTS {
				sleep(retry_delay(attempt, self.backoff_min, self.backoff_max)).await;
			}
		}

		log::warn!("retries exhausted url={} last_status={:?}", mask_api_key(url), last_status);
		Ok(FetchResult { data: None, outcome: FetchOutcome::RetryExhausted, status: last_status })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use wiremock::matchers::{header, method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn client(telemetry: &Arc<Telemetry>) -> ApiClient {
		// generous limit and millisecond backoff so tests never sit in sleeps
		let rate = RateLimitConfig { calls: 10_000, period_s: 1.0 };
		ApiClient::with_rate_limit("RGAPI-test-key", rate, Arc::clone(telemetry))
			.unwrap()
			.backoff(Duration::from_millis(1), Duration::from_millis(5))
	}

	#[tokio::test]
	async fn retries_429_until_success_and_counts_them() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/ladder"))
			.respond_with(ResponseTemplate::new(429))
			.up_to_n_times(3)
			.mount(&server)
			.await;
		Mock::given(method("GET"))
			.and(path("/ladder"))
			.and(header(AUTH_HEADER, "RGAPI-test-key"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
			.mount(&server)
			.await;

		let telemetry = Arc::new(Telemetry::new().unwrap());
		let client = client(&telemetry);
		let result = client
			.fetch_json(&format!("{}/ladder", server.uri()), Location::Region(crate::types::Region::Na1))
			.await
			.unwrap();

		assert_eq!(result.outcome, FetchOutcome::Ok);
		assert_eq!(result.status, Some(200));
		assert_eq!(result.data, Some(json!({"ok": true})));
		assert_eq!(telemetry.http_error_count(429, "retryable"), 3);
	}

	#[tokio::test]
	async fn non_retryable_status_returns_immediately() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.respond_with(ResponseTemplate::new(403))
			.expect(1)
			.mount(&server)
			.await;

		let telemetry = Arc::new(Telemetry::new().unwrap());
		let client = client(&telemetry);
		let result = client
			.fetch_json(&server.uri(), Location::Continent(crate::types::Continent::Americas))
			.await
			.unwrap();

		assert_eq!(result.outcome, FetchOutcome::HttpNonRetryable);
		assert_eq!(result.status, Some(403));
		assert!(result.data.is_none());
		assert_eq!(telemetry.http_error_count(403, "unexpected"), 1);
	}

	#[tokio::test]
	async fn success_with_garbage_body_is_non_json() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance\npage</html>"))
			.mount(&server)
			.await;

		let telemetry = Arc::new(Telemetry::new().unwrap());
		let client = client(&telemetry);
		let result =
			client.fetch_json(&server.uri(), Location::Region(crate::types::Region::Kr)).await.unwrap();

		assert_eq!(result.outcome, FetchOutcome::NonJson);
		assert_eq!(result.status, Some(200));
		assert!(result.data.is_none());
	}

	#[tokio::test]
	async fn exhausted_retries_surface_as_null_payload() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.respond_with(ResponseTemplate::new(503))
			.expect(5)
			.mount(&server)
			.await;

		let telemetry = Arc::new(Telemetry::new().unwrap());
		let client = client(&telemetry);
		let result =
			client.fetch_json(&server.uri(), Location::Region(crate::types::Region::Euw1)).await.unwrap();

		assert_eq!(result.outcome, FetchOutcome::RetryExhausted);
		assert_eq!(result.status, Some(503));
		assert!(result.data.is_none());
		assert_eq!(telemetry.http_error_count(503, "retryable"), 5);
	}
}
