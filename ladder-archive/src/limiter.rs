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

//! Steady-stream rate limiting for upstream requests.
//!
//! One [`Limiter`] exists per (location, calls, period) and emits one permit
//! every `period / calls` on a single timeline: concurrent callers are
//! serialized into distinct scheduled slots under a short critical section,
//! then sleep outside the lock. The limiter never rejects.

use std::{collections::HashMap, collections::VecDeque, sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::time::{sleep_until, Instant};

use crate::types::Location;

/// Callback invoked with the observed permit rate after every acquire.
pub type OnRate = Arc<dyn Fn(Location, f64) + Send + Sync>;

pub struct Limiter {
	interval: Duration,
	next_at: Mutex<Option<Instant>>,
}

impl Limiter {
	pub fn new(calls: u32, period: Duration) -> Self {
		assert!(calls > 0, "limiter needs at least one call per period");
		Self { interval: period / calls, next_at: Mutex::new(None) }
	}

	pub fn interval(&self) -> Duration {
		self.interval
	}

	/// Suspend until a permit is issued. Permits on one limiter are spaced at
	/// least `interval` apart on the monotonic clock.
	pub async fn acquire(&self) {
		let scheduled = {
			let mut next_at = self.next_at.lock();
			let now = Instant::now();
			let base = match *next_at {
				Some(at) if at > now => at,
				_ => now,
			};
			*next_at = Some(base + self.interval);
			base
		};
		sleep_until(scheduled).await;
	}
}

/// Wraps a [`Limiter`] and exports the observed rate on every permit: permit
/// instants go into a deque, entries older than one period are dropped, and
/// `len / period` is handed to the callback.
pub struct TelemetryLimiter {
	inner: Limiter,
	location: Location,
	period: Duration,
	window: Mutex<VecDeque<Instant>>,
	on_rate: OnRate,
}

impl TelemetryLimiter {
	pub fn new(inner: Limiter, location: Location, period: Duration, on_rate: OnRate) -> Self {
		Self { inner, location, period, window: Mutex::new(VecDeque::new()), on_rate }
	}

	pub async fn acquire(&self) {
		self.inner.acquire().await;
		let now = Instant::now();
		let rate = {
			let mut window = self.window.lock();
			window.push_back(now);
			if let Some(cutoff) = now.checked_sub(self.period) {
				while window.front().is_some_and(|&t| t <= cutoff) {
					window.pop_front();
				}
			}
			window.len() as f64 / self.period.as_secs_f64()
		};
		(self.on_rate)(self.location, rate);
	}
}

/// Memoized limiter factory. The registry is owned by whoever constructs the
/// HTTP client; limiters are created lazily per location and never evicted.
pub struct LimiterRegistry {
	calls: u32,
	period: Duration,
	on_rate: OnRate,
	limiters: Mutex<HashMap<Location, Arc<TelemetryLimiter>>>,
}

impl LimiterRegistry {
	pub fn new(calls: u32, period: Duration, on_rate: OnRate) -> Self {
		Self { calls, period, on_rate, limiters: Mutex::new(HashMap::new()) }
	}

	pub fn get(&self, location: Location) -> Arc<TelemetryLimiter> {
		let mut limiters = self.limiters.lock();
		limiters
			.entry(location)
			.or_insert_with(|| {
				Arc::new(TelemetryLimiter::new(
					Limiter::new(self.calls, self.period),
					location,
					self.period,
					Arc::clone(&self.on_rate),
				))
			})
			.clone()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::Region;
	use parking_lot::Mutex as PlMutex;

	fn noop_rate() -> OnRate {
		Arc::new(|_, _| {})
	}

	#[tokio::test(start_paused = true)]
	async fn twenty_concurrent_acquires_finish_near_two_seconds() {
		// 10 calls per second => interval 100ms; the 20th permit lands at 1.9s
		let limiter = Arc::new(Limiter::new(10, Duration::from_secs(1)));
		let start = Instant::now();

		let mut handles = Vec::new();
		for _ in 0..20 {
			let limiter = Arc::clone(&limiter);
			handles.push(tokio::spawn(async move {
				limiter.acquire().await;
			}));
		}
		for handle in handles {
			handle.await.unwrap();
		}

		let elapsed = start.elapsed();
		assert!(elapsed >= Duration::from_millis(1890), "finished too early: {:?}", elapsed);
		assert!(elapsed <= Duration::from_millis(2100), "finished too late: {:?}", elapsed);
	}

	#[tokio::test(start_paused = true)]
	async fn successive_permits_are_spaced_by_interval() {
		let limiter = Limiter::new(4, Duration::from_secs(2));
		let mut instants = Vec::new();
		for _ in 0..5 {
			limiter.acquire().await;
			instants.push(Instant::now());
		}
		for pair in instants.windows(2) {
			let gap = pair[1] - pair[0];
			assert!(gap >= Duration::from_millis(499), "permits too close: {:?}", gap);
		}
	}

	#[tokio::test(start_paused = true)]
	async fn telemetry_window_reports_rate_and_trims() {
		let observed: Arc<PlMutex<Vec<f64>>> = Arc::new(PlMutex::new(Vec::new()));
		let sink = Arc::clone(&observed);
		let on_rate: OnRate = Arc::new(move |_, rate| sink.lock().push(rate));

		let period = Duration::from_secs(1);
		let limiter =
			TelemetryLimiter::new(Limiter::new(10, period), Location::Region(Region::Na1), period, on_rate);

		for _ in 0..5 {
			limiter.acquire().await;
		}
		{
			let rates = observed.lock();
			assert_eq!(rates.len(), 5);
			// 5 permits inside one 1s window => 5/s
			assert!((rates[4] - 5.0).abs() < f64::EPSILON);
		}

		// after more than a period of silence, the window drains back down
		tokio::time::sleep(Duration::from_secs(2)).await;
		limiter.acquire().await;
		let rates = observed.lock();
		assert!((rates[5] - 1.0).abs() < f64::EPSILON);
	}

	#[tokio::test(start_paused = true)]
	async fn registry_memoizes_per_location() {
		let registry = LimiterRegistry::new(100, Duration::from_secs(120), noop_rate());
		let a = registry.get(Location::Region(Region::Na1));
		let b = registry.get(Location::Region(Region::Na1));
		let c = registry.get(Location::Region(Region::Kr));
		assert!(Arc::ptr_eq(&a, &b));
		assert!(!Arc::ptr_eq(&a, &c));
	}
}
