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

//! Match-id stage: crawl every known player's recent match ids, persist them
//! deduplicated, and advance the durable "last collected at" watermark.

use std::{
	collections::HashSet,
	sync::Arc,
	time::Duration,
};

use async_trait::async_trait;
use tokio::time::Instant;

use crate::{
	crawl::match_ids::{stream_match_ids, MatchIdStream, MAX_IN_FLIGHT},
	database::queries::PlayerKey,
	endpoints,
	error::{ArchiveError, Result},
	http::Fetch,
	stages::{retry_insert, rollback_tables, Collector, Loader, Orchestrator, Saver},
	store::{AnalyticStore, COLLECTED_PUUIDS_TABLE, MATCH_IDS_TABLE, TIMESTAMPS_TABLE},
	types::{PlayerCrawlState, Queue, Region, RunContext},
};

pub const MATCH_IDS_PIPELINE: &str = "match_ids";

const MATCH_ID_BUFFER: usize = 200_000;
const FLUSH_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct MatchIdsState {
	pub initial_states: Vec<PlayerCrawlState>,
	/// Every known puuid, persisted alongside this run's ids so the next run
	/// can distinguish incremental from backfill players.
	pub player_puuids: Vec<String>,
}

/// A player already covered by an earlier collection crawls forward from the
/// stored watermark; an unseen player backfills from the epoch.
pub fn build_initial_states(
	players: &[PlayerKey],
	collected_puuids: &HashSet<String>,
	collected_at: i64,
	ts: i64,
) -> Result<Vec<PlayerCrawlState>> {
	let mut states = Vec::with_capacity(players.len());
	for player in players {
		let queue = match player.queue_type.as_str() {
			"RANKED_SOLO_5x5" => Queue::RankedSolo5x5,
			"RANKED_FLEX_SR" => Queue::RankedFlexSr,
			other => return Err(ArchiveError::Validation(format!("unknown queue type {:?}", other))),
		};
		let region = Region::from_str_insensitive(&player.region)
			.ok_or_else(|| ArchiveError::Validation(format!("unknown region {:?}", player.region)))?;
		let continent = region.continent();
		let start_time =
			if collected_puuids.contains(&player.puuid) && collected_at > 0 { collected_at } else { 0 };
		let base_url = endpoints::match_ids_url_template(continent, &player.puuid, start_time, ts, queue);
		states.push(PlayerCrawlState {
			puuid: player.puuid.clone(),
			queue,
			continent,
			next_page_start: 0,
			base_url,
		});
	}
	Ok(states)
}

pub struct MatchIdsLoader {
	store: Arc<dyn AnalyticStore>,
}

impl MatchIdsLoader {
	pub fn new(store: Arc<dyn AnalyticStore>) -> Self {
		Self { store }
	}
}

#[async_trait]
impl Loader for MatchIdsLoader {
	type State = MatchIdsState;

	async fn load(&self, ctx: &RunContext) -> Result<MatchIdsState> {
		let players = self.store.load_players().await?;
		let collected_puuids: HashSet<String> = self.store.load_collected_puuids().await?.into_iter().collect();
		let collected_at = self.store.load_collected_at().await?;
		log::info!(
			"match-id crawl over {} players ({} previously collected, watermark {})",
			players.len(),
			collected_puuids.len(),
			collected_at,
		);

		let initial_states = build_initial_states(&players, &collected_puuids, collected_at, ctx.ts)?;
		let player_puuids = players.into_iter().map(|p| p.puuid).collect();
		Ok(MatchIdsState { initial_states, player_puuids })
	}
}

pub struct MatchIdsCollector {
	fetch: Arc<dyn Fetch>,
}

impl MatchIdsCollector {
	pub fn new(fetch: Arc<dyn Fetch>) -> Self {
		Self { fetch }
	}
}

impl Collector for MatchIdsCollector {
	type State = MatchIdsState;
	type Stream = MatchIdStream;

	fn collect(&self, state: &MatchIdsState, _ctx: &RunContext) -> Result<MatchIdStream> {
		Ok(stream_match_ids(Arc::clone(&self.fetch), state.initial_states.clone(), MAX_IN_FLIGHT))
	}
}

pub struct MatchIdsSaver {
	store: Arc<dyn AnalyticStore>,
}

impl MatchIdsSaver {
	pub fn new(store: Arc<dyn AnalyticStore>) -> Self {
		Self { store }
	}

	async fn consume(&self, stream: &mut MatchIdStream, state: &MatchIdsState, ctx: &RunContext) -> Result<()> {
		retry_insert("collected-puuids insert", || {
			self.store.insert_collected_puuids(&state.player_puuids, ctx.run_id)
		})
		.await?;

		let mut seen: HashSet<String> = HashSet::new();
		let mut buffer: Vec<String> = Vec::new();
		let mut last_flush = Instant::now();

		while let Some(batch) = stream.next().await {
			for match_id in batch? {
				if seen.insert(match_id.clone()) {
					buffer.push(match_id);
				}
			}
			if buffer.len() >= MATCH_ID_BUFFER || last_flush.elapsed() >= FLUSH_INTERVAL {
				if !buffer.is_empty() {
					let ids = std::mem::take(&mut buffer);
					retry_insert("match-ids insert", || self.store.insert_match_ids(&ids, ctx.run_id)).await?;
				}
				last_flush = Instant::now();
			}
		}
		if !buffer.is_empty() {
			retry_insert("match-ids insert", || self.store.insert_match_ids(&buffer, ctx.run_id)).await?;
		}

		retry_insert("collection watermark insert", || self.store.insert_collected_at(ctx.ts, ctx.run_id))
			.await?;
		Ok(())
	}
}

#[async_trait]
impl Saver for MatchIdsSaver {
	type State = MatchIdsState;
	type Stream = MatchIdStream;

	async fn save(&self, mut stream: Self::Stream, state: &MatchIdsState, ctx: &RunContext) -> Result<()> {
		match self.consume(&mut stream, state, ctx).await {
			Ok(()) => {
				// keep only the newest watermark row
				self.store.delete_stale_collected_at(ctx.run_id).await?;
				Ok(())
			}
			Err(e) => {
				log::warn!("match-id stage failed, removing partial data run_id={}", ctx.run_id);
				rollback_tables(
					&*self.store,
					&[TIMESTAMPS_TABLE, COLLECTED_PUUIDS_TABLE, MATCH_IDS_TABLE],
					ctx.run_id,
				)
				.await;
				Err(e)
			}
		}
	}
}

/// Assemble the match-id stage.
pub fn match_ids_stage(
	fetch: Arc<dyn Fetch>,
	store: Arc<dyn AnalyticStore>,
) -> Orchestrator<MatchIdsLoader, MatchIdsCollector, MatchIdsSaver> {
	Orchestrator::new(
		MATCH_IDS_PIPELINE,
		MatchIdsLoader::new(Arc::clone(&store)),
		MatchIdsCollector::new(fetch),
		MatchIdsSaver::new(store),
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_util::{MemoryStore, StubFetch};
	use serde_json::json;

	fn player(puuid: &str) -> PlayerKey {
		PlayerKey { puuid: puuid.into(), queue_type: "RANKED_SOLO_5x5".into(), region: "na1".into() }
	}

	#[test]
	fn initial_states_split_backfill_and_incremental() {
		let players = vec![player("old"), player("new")];
		let collected: HashSet<String> = ["old".to_string()].into();
		let states = build_initial_states(&players, &collected, 1_700_000_000, 1_800_000_000).unwrap();

		assert_eq!(states.len(), 2);
		let old = states.iter().find(|s| s.puuid == "old").unwrap();
		let new = states.iter().find(|s| s.puuid == "new").unwrap();
		assert!(old.base_url.contains("startTime=1700000000"));
		assert!(new.base_url.contains("startTime=0"));
		assert!(old.base_url.contains("endTime=1800000000"));
		assert!(old.base_url.contains("queue=420"));
		assert_eq!(old.next_page_start, 0);
	}

	#[test]
	fn unknown_queue_type_fails_state_building() {
		let players =
			vec![PlayerKey { puuid: "p".into(), queue_type: "ARAM".into(), region: "na1".into() }];
		assert!(build_initial_states(&players, &HashSet::new(), 0, 1).is_err());
	}

	#[tokio::test(start_paused = true)]
	async fn successful_run_persists_ids_puuids_and_watermark() {
		let fetch = Arc::new(StubFetch::new(|_, _| {
			StubFetch::ok(json!(["NA1_1", "NA1_2", "NA1_2", "NA1_3"]))
		}));
		let store = Arc::new(MemoryStore::new());
		{
			let mut state = store.state.lock();
			state.players = vec![player("p1"), player("p2")];
			state.collected_at = 0;
		}

		let stage = match_ids_stage(fetch, Arc::clone(&store) as Arc<dyn AnalyticStore>);
		stage.run().await.unwrap();

		// one watermark row remains
		assert_eq!(store.state.lock().timestamps.len(), 1);
		// ids deduped across both players' identical pages
		assert_eq!(store.table_total(MATCH_IDS_TABLE), 3);
		assert_eq!(store.table_total(COLLECTED_PUUIDS_TABLE), 2);
	}

	#[tokio::test(start_paused = true)]
	async fn failed_crawl_rolls_back_everything_it_wrote() {
		struct FailingFetch;
		#[async_trait]
		impl Fetch for FailingFetch {
			async fn fetch_json(
				&self,
				_: &str,
				_: crate::types::Location,
			) -> Result<crate::http::FetchResult> {
				Err(ArchiveError::Channel)
			}
		}

		let store = Arc::new(MemoryStore::new());
		{
			let mut state = store.state.lock();
			state.players = vec![player("p1")];
		}

		let stage = match_ids_stage(Arc::new(FailingFetch), Arc::clone(&store) as Arc<dyn AnalyticStore>);
		assert!(stage.run().await.is_err());

		assert!(store.state.lock().timestamps.is_empty());
		for table in [TIMESTAMPS_TABLE, COLLECTED_PUUIDS_TABLE, MATCH_IDS_TABLE] {
			assert_eq!(store.table_total(table), 0, "rollback must remove rows from {}", table);
		}
	}
}
