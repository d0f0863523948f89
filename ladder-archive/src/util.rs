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

//! Small work-shaping helpers shared by the crawlers.

use std::{
	collections::{HashMap, VecDeque},
	hash::Hash,
	time::Duration,
};

pub const MAX_LOG_PREVIEW: usize = 200;

/// Interleave `items` round-robin across the buckets produced by `key`, so a
/// burst of work never piles onto one location. Bucket order follows first
/// appearance in the input.
pub fn spread<T, K, F>(items: Vec<T>, key: F) -> Vec<T>
where
	K: Eq + Hash + Clone,
	F: Fn(&T) -> K,
{
	let mut order: Vec<K> = Vec::new();
	let mut buckets: HashMap<K, VecDeque<T>> = HashMap::new();
	for item in items {
		let k = key(&item);
		buckets
			.entry(k.clone())
			.or_insert_with(|| {
				order.push(k.clone());
				VecDeque::new()
			})
			.push_back(item);
	}

	let mut out = Vec::with_capacity(buckets.values().map(VecDeque::len).sum());
	loop {
		let mut made_progress = false;
		for k in &order {
			if let Some(item) = buckets.get_mut(k).and_then(VecDeque::pop_front) {
				out.push(item);
				made_progress = true;
			}
		}
		if !made_progress {
			break;
		}
	}
	out
}

/// Consecutive `size`-element batches; the last batch may be smaller.
pub fn chunked<T>(items: Vec<T>, size: usize) -> Vec<Vec<T>> {
	assert!(size > 0, "chunk size must be positive");
	let mut out = Vec::with_capacity(items.len().div_ceil(size));
	let mut batch = Vec::with_capacity(size.min(items.len()));
	for item in items {
		batch.push(item);
		if batch.len() == size {
			out.push(std::mem::replace(&mut batch, Vec::with_capacity(size)));
		}
	}
	if !batch.is_empty() {
		out.push(batch);
	}
	out
}

/// One-line bounded preview of an arbitrary payload for log records.
pub fn compact_preview(payload: &str, max_len: usize) -> String {
	let flattened: String = payload.chars().map(|c| if c == '\n' || c == '\r' { ' ' } else { c }).collect();
	if flattened.chars().count() <= max_len {
		return flattened;
	}
	let mut out: String = flattened.chars().take(max_len.saturating_sub(3)).collect();
	out.push_str("...");
	out
}

/// Exponential backoff delay for the given 1-based attempt, clamped to
/// `[min, max]`.
pub fn retry_delay(attempt: u32, min: Duration, max: Duration) -> Duration {
	let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
	min.saturating_mul(factor).clamp(min, max)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn spread_interleaves_across_keys() {
		let items = vec![("a", 1), ("a", 2), ("b", 1), ("a", 3), ("b", 2), ("c", 1)];
		let out = spread(items, |(k, _)| *k);
		assert_eq!(out, vec![("a", 1), ("b", 1), ("c", 1), ("a", 2), ("b", 2), ("a", 3)]);
	}

	#[test]
	fn spread_fairness_bound_holds() {
		// top-loaded bucket items appear at most ceil(len / keys) apart,
		// except at the tail once other buckets drain
		let mut items = Vec::new();
		for i in 0..9 {
			items.push(("hot", i));
		}
		for i in 0..3 {
			items.push(("cold", i));
		}
		let out = spread(items, |(k, _)| *k);
		let hot_positions: Vec<usize> =
			out.iter().enumerate().filter(|(_, (k, _))| *k == "hot").map(|(i, _)| i).collect();
		for pair in hot_positions.windows(2).take(3) {
			assert!(pair[1] - pair[0] <= 2, "hot bucket starved: {:?}", hot_positions);
		}
		assert_eq!(out.len(), 12);
	}

	#[test]
	fn chunked_yields_fixed_batches() {
		let chunks = chunked((0..7).collect::<Vec<_>>(), 3);
		assert_eq!(chunks, vec![vec![0, 1, 2], vec![3, 4, 5], vec![6]]);
		assert!(chunked(Vec::<u8>::new(), 4).is_empty());
	}

	#[test]
	fn preview_flattens_and_truncates() {
		assert_eq!(compact_preview("a\nb\rc", 10), "a b c");
		let long = "x".repeat(300);
		let preview = compact_preview(&long, 200);
		assert_eq!(preview.chars().count(), 200);
		assert!(preview.ends_with("..."));
	}

	#[test]
	fn retry_delay_doubles_and_clamps() {
		let min = Duration::from_secs(1);
		let max = Duration::from_secs(10);
		assert_eq!(retry_delay(1, min, max), Duration::from_secs(1));
		assert_eq!(retry_delay(2, min, max), Duration::from_secs(2));
		assert_eq!(retry_delay(3, min, max), Duration::from_secs(4));
		assert_eq!(retry_delay(4, min, max), Duration::from_secs(8));
		assert_eq!(retry_delay(5, min, max), Duration::from_secs(10));
		assert_eq!(retry_delay(12, min, max), Duration::from_secs(10));
	}
}
