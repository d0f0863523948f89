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

//! Ranked-ladder crawling. The elite tiers come from list endpoints; the
//! divisioned tiers are paged, and the upstream does not report page counts,
//! so the crawler first binary-searches for the last non-empty page of every
//! bracket (an empty list is the authoritative "past end" signal), then
//! streams pages 1..=last.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;

use crate::{
	crawl::{RecordStream, StreamEvent},
	endpoints,
	error::Result,
	http::{Fetch, FetchOutcome, FetchResult},
	parse::league::{LeagueEntryDto, LeagueListDto, MinifiedLeagueEntry},
	types::{Division, EliteBoundsConfig, Queue, Region, SubEliteBoundsConfig, Tier},
	util::{chunked, compact_preview, spread, MAX_LOG_PREVIEW},
};

pub const MAX_IN_FLIGHT: usize = 128;
const LEAGUE_PAGE_UPPER_BOUND: u32 = 1024;

/// One (region, queue, tier, division) bracket and its discovered last page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageKey {
	pub region: Region,
	pub queue: Queue,
	pub tier: Tier,
	pub division: Division,
}

type UrlRegion = (String, Region);

/// Stream every elite-ladder entry inside the configured bounds, then every
/// sub-elite entry. Entries arrive tagged with their region, in network
/// completion order within a batch.
pub fn stream_players(
	fetch: Arc<dyn Fetch>,
	elite: EliteBoundsConfig,
	sub_elite: SubEliteBoundsConfig,
) -> RecordStream<MinifiedLeagueEntry> {
	let (tx, rx) = flume::bounded(MAX_IN_FLIGHT);
	let handle = tokio::spawn(async move {
		let outcome = async {
			produce_elite(&*fetch, &elite, &tx).await?;
			produce_sub_elite(&*fetch, &sub_elite, &tx).await
		}
		.await;
		let terminal = match outcome {
			Ok(()) => StreamEvent::Done,
			Err(e) => StreamEvent::Failed(e),
		};
		let _ = tx.send_async(terminal).await;
	});
	RecordStream::new(rx, vec![handle])
}

async fn fetch_region_payload(fetch: &dyn Fetch, url: &str, region: Region) -> (Region, Option<Value>) {
	match fetch.fetch_json(url, region.into()).await {
		Ok(result) if result.is_ok() => (region, result.data),
		Ok(_) => (region, None),
		Err(e) => {
			log::info!("league fetch failed region={} error={}", region, e);
			(region, None)
		}
	}
}

async fn produce_elite(
	fetch: &dyn Fetch,
	bounds: &EliteBoundsConfig,
	tx: &flume::Sender<StreamEvent<MinifiedLeagueEntry>>,
) -> Result<()> {
	let mut urls: Vec<UrlRegion> = Vec::new();
	for (queue, bounds) in bounds {
		for tier in bounds.tiers()? {
			for region in Region::ALL {
				urls.push((endpoints::elite_league_url(region, tier, *queue), region));
			}
		}
	}

	let spread_urls = spread(urls, |(_, region)| region.continent());
	for batch in chunked(spread_urls, MAX_IN_FLIGHT) {
		let fetches = batch.iter().map(|(url, region)| fetch_region_payload(fetch, url, *region));
		for (region, payload) in join_all(fetches).await {
			let Some(payload) = payload else { continue };
			let dto: LeagueListDto = match serde_json::from_value(payload.clone()) {
				Ok(dto) => dto,
				Err(e) => {
					log::info!(
						"league list failed validation region={} error={} preview={}",
						region,
						e,
						compact_preview(&payload.to_string(), MAX_LOG_PREVIEW),
					);
					continue;
				}
			};
			for entry in MinifiedLeagueEntry::from_list(&dto, region) {
				tx.send_async(StreamEvent::Item(entry)).await?;
			}
		}
	}
	Ok(())
}

/// Binary search for the last non-empty page of every bracket in the bounded
/// set. O(log N) probes per bracket instead of a linear page walk, which
/// matters with hundreds of brackets across regions.
pub async fn discover_page_bounds(
	fetch: &dyn Fetch,
	bounds: &SubEliteBoundsConfig,
) -> Result<Vec<(PageKey, u32)>> {
	let mut work: Vec<PageKey> = Vec::new();
	for region in Region::ALL {
		for (queue, bounds) in bounds {
			for (tier, division) in bounds.brackets()? {
				work.push(PageKey { region, queue: *queue, tier, division });
			}
		}
	}

	let spread_work = spread(work, |key| key.region);
	let mut results = Vec::with_capacity(spread_work.len());
	for batch in chunked(spread_work, MAX_IN_FLIGHT) {
		let probes = batch.into_iter().map(|key| probe_last_page(fetch, key));
		for probed in join_all(probes).await {
			results.push(probed?);
		}
	}
	Ok(results)
}

async fn probe_last_page(fetch: &dyn Fetch, key: PageKey) -> Result<(PageKey, u32)> {
	let mut low = 1u32;
	let mut high = LEAGUE_PAGE_UPPER_BOUND + 1;

	while low + 1 < high {
		let mid = (low + high) / 2;
		let url = endpoints::league_entries_url(key.region, key.queue, key.tier, key.division, mid);
		let result = fetch.fetch_json(&url, key.region.into()).await?;

		match probe_signal(&result) {
			ProbeSignal::NonEmpty => low = mid,
			ProbeSignal::Empty => high = mid,
			ProbeSignal::PastEnd => return Ok((key, low)),
			ProbeSignal::Failed => {
				return Err(crate::error::ArchiveError::ProbeFailed(format!(
					"{} {} {} {} page {} ({:?})",
					key.region, key.queue, key.tier, key.division, mid, result.outcome,
				)))
			}
		}
	}

	Ok((key, low))
}

enum ProbeSignal {
	NonEmpty,
	Empty,
	/// A 404 is how the upstream reports "no such page"; finalize at `low`.
	PastEnd,
	Failed,
}

fn probe_signal(result: &FetchResult) -> ProbeSignal {
	match result.outcome {
		FetchOutcome::Ok => match result.data.as_ref().and_then(Value::as_array) {
			Some(records) if !records.is_empty() => ProbeSignal::NonEmpty,
			_ => ProbeSignal::Empty,
		},
		FetchOutcome::HttpNonRetryable if result.status == Some(404) => ProbeSignal::PastEnd,
		_ => ProbeSignal::Failed,
	}
}

async fn produce_sub_elite(
	fetch: &dyn Fetch,
	bounds: &SubEliteBoundsConfig,
	tx: &flume::Sender<StreamEvent<MinifiedLeagueEntry>>,
) -> Result<()> {
	let page_bounds = discover_page_bounds(fetch, bounds).await?;

	let mut jobs: Vec<UrlRegion> = Vec::new();
	for (key, last_page) in &page_bounds {
		for page in 1..=*last_page {
			jobs.push((endpoints::league_entries_url(key.region, key.queue, key.tier, key.division, page), key.region));
		}
	}
	drop(page_bounds);

	let spread_jobs = spread(jobs, |(_, region)| *region);
	for batch in chunked(spread_jobs, MAX_IN_FLIGHT) {
		let fetches = batch.iter().map(|(url, region)| fetch_region_payload(fetch, url, *region));
		for (region, payload) in join_all(fetches).await {
			let Some(records) = payload.as_ref().and_then(Value::as_array) else { continue };
			for raw in records {
				let dto: LeagueEntryDto = match serde_json::from_value(raw.clone()) {
					Ok(dto) => dto,
					Err(e) => {
						log::info!(
							"league entry failed validation region={} error={} preview={}",
							region,
							e,
							compact_preview(&raw.to_string(), MAX_LOG_PREVIEW),
						);
						continue;
					}
				};
				tx.send_async(StreamEvent::Item(MinifiedLeagueEntry::from_entry(&dto, region))).await?;
			}
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_util::StubFetch;
	use crate::types::{full_elite_bounds, full_sub_elite_bounds, EliteBounds, SubEliteBounds};
	use serde_json::json;
	use std::collections::BTreeMap;

	fn entry_json(puuid: &str) -> Value {
		json!({
			"leagueId": "l-1",
			"puuid": puuid,
			"queueType": "RANKED_SOLO_5x5",
			"tier": "DIAMOND",
			"rank": "II",
			"leaguePoints": 54,
			"wins": 10,
			"losses": 9,
			"hotStreak": false,
			"veteran": false,
			"freshBlood": false,
			"inactive": false
		})
	}

	fn one_bracket_bounds() -> SubEliteBoundsConfig {
		let mut map = BTreeMap::new();
		map.insert(
			Queue::RankedSolo5x5,
			SubEliteBounds {
				collect: true,
				upper_tier: Some(Tier::Diamond),
				upper_division: Some(Division::II),
				lower_tier: Some(Tier::Diamond),
				lower_division: Some(Division::II),
			},
		);
		map
	}

	#[tokio::test]
	async fn binary_search_settles_on_last_non_empty_page() {
		// pages 1..=7 non-empty, everything past that empty
		let fetch = StubFetch::new(move |url, _| {
			let page: u32 = url.split("page=").nth(1).unwrap().parse().unwrap();
			if page <= 7 {
				StubFetch::ok(json!([entry_json("p")]))
			} else {
				StubFetch::ok(json!([]))
			}
		});
		let fetch = Arc::new(fetch);

		let bounds = discover_page_bounds(&*fetch, &one_bracket_bounds()).await.unwrap();
		// one bracket per region
		assert_eq!(bounds.len(), Region::ALL.len());
		for (_, last_page) in &bounds {
			assert_eq!(*last_page, 7);
		}
		// ceil(log2(1024)) probes per bracket at most
		let per_bracket = fetch.calls() / Region::ALL.len();
		assert!(per_bracket <= 10, "used {} probes per bracket", per_bracket);
	}

	#[tokio::test]
	async fn probe_treats_404_as_past_end() {
		let fetch = StubFetch::new(move |url, _| {
			let page: u32 = url.split("page=").nth(1).unwrap().parse().unwrap();
			if page <= 3 {
				StubFetch::ok(json!([entry_json("p")]))
			} else {
				StubFetch::status(404)
			}
		});

		let bounds = discover_page_bounds(&fetch, &one_bracket_bounds()).await.unwrap();
		for (_, last_page) in &bounds {
			assert_eq!(*last_page, 3);
		}
	}

	#[tokio::test]
	async fn probe_fails_on_unexpected_outcome() {
		let fetch = StubFetch::new(move |_, _| StubFetch::status(500));
		let err = discover_page_bounds(&fetch, &one_bracket_bounds()).await.unwrap_err();
		assert!(matches!(err, crate::error::ArchiveError::ProbeFailed(_)));
	}

	#[tokio::test]
	async fn elite_stream_skips_invalid_payloads_and_continues() {
		let list = json!({
			"leagueId": "l-2",
			"tier": "CHALLENGER",
			"name": "x",
			"queue": "RANKED_SOLO_5x5",
			"entries": [entry_json("elite-1")]
		});
		let fetch = Arc::new(StubFetch::new(move |url, _| {
			if url.contains("na1.") {
				StubFetch::ok(list.clone())
			} else {
				// garbage shape fails DTO validation and is skipped
				StubFetch::ok(json!({"unexpected": true}))
			}
		}));

		let mut elite = BTreeMap::new();
		elite.insert(
			Queue::RankedSolo5x5,
			EliteBounds { collect: true, upper: Some(crate::types::EliteTier::Challenger), lower: Some(crate::types::EliteTier::Challenger) },
		);
		// nothing sub-elite so the stream ends after the elite pass
		let mut sub = full_sub_elite_bounds();
		for bounds in sub.values_mut() {
			bounds.collect = false;
		}

		let mut stream = stream_players(fetch as Arc<dyn Fetch>, elite, sub);
		let mut collected = Vec::new();
		while let Some(entry) = stream.next().await {
			collected.push(entry.unwrap());
		}
		assert_eq!(collected.len(), 1);
		assert_eq!(collected[0].puuid, "elite-1");
		assert_eq!(collected[0].region, Region::Na1);
	}

	#[tokio::test]
	async fn collect_disabled_produces_nothing() {
		let fetch = Arc::new(StubFetch::new(|_, _| StubFetch::ok(json!([]))));
		let mut elite = full_elite_bounds();
		for bounds in elite.values_mut() {
			bounds.collect = false;
		}
		let mut sub = full_sub_elite_bounds();
		for bounds in sub.values_mut() {
			bounds.collect = false;
		}
		let mut stream = stream_players(Arc::clone(&fetch) as Arc<dyn Fetch>, elite, sub);
		assert!(stream.next().await.is_none());
		assert_eq!(fetch.calls(), 0);
	}
}
