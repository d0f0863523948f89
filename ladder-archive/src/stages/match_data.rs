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

//! Match-data stage: merge the non-timeline and timeline payload streams,
//! parse each payload off the async runtime and persist its table slices.
//! Any failure rolls back every table in both schedules for this run.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
	crawl::match_data::{stream_match_payloads, MergedStream, PayloadKind},
	error::Result,
	http::Fetch,
	parse::{non_timeline::NonTimelineParser, timeline::TimelineParser},
	stages::{retry_insert, rollback_tables, Stage},
	store::{AnalyticStore, NON_TIMELINE_TABLES, PROCESSED_MATCH_IDS_TABLE, TIMELINE_TABLES},
	types::RunContext,
};

pub const MATCH_DATA_PIPELINE: &str = "match_data";

/// The match-data stage drives two collectors into one saver, so it owns its
/// run loop instead of going through the generic orchestrator.
pub struct MatchDataStage {
	fetch: Arc<dyn Fetch>,
	store: Arc<dyn AnalyticStore>,
	non_timeline: Arc<NonTimelineParser>,
	timeline: Arc<TimelineParser>,
}

impl MatchDataStage {
	pub fn new(fetch: Arc<dyn Fetch>, store: Arc<dyn AnalyticStore>, strict_schema: bool) -> Self {
		Self {
			fetch,
			store,
			non_timeline: Arc::new(NonTimelineParser::new(strict_schema)),
			timeline: Arc::new(TimelineParser::new(strict_schema)),
		}
	}

	pub async fn run(&self) -> Result<()> {
		let ctx = RunContext::new(MATCH_DATA_PIPELINE);
		log::info!("stage start pipeline={} run_id={}", ctx.pipeline, ctx.run_id);

		let match_ids = self.store.load_pending_match_ids().await?;
		log::info!("collecting payloads for {} matches", match_ids.len());

		let mut stream = stream_match_payloads(Arc::clone(&self.fetch), match_ids.clone())?;
		let outcome = self.consume(&mut stream, &ctx).await;
		drop(stream);

		let result = match outcome {
			Ok(()) => Ok(()),
			Err(e) => {
				log::warn!("match-data stage failed, removing partial data run_id={}", ctx.run_id);
				let tables: Vec<&str> = NON_TIMELINE_TABLES
					.iter()
					.chain(TIMELINE_TABLES.iter())
					.copied()
					.chain([PROCESSED_MATCH_IDS_TABLE])
					.collect();
				rollback_tables(&*self.store, &tables, ctx.run_id).await;
				Err(e)
			}
		};

		// the attempted id list is recorded even for a failed run
		let bookkeeping = retry_insert("processed match-ids insert", || {
			self.store.insert_processed_match_ids(&match_ids, ctx.run_id)
		})
		.await;
		if let Err(e) = bookkeeping {
			if result.is_ok() {
				return Err(e);
			}
			log::error!("failed to record processed match ids for run_id={}: {}", ctx.run_id, e);
		}

		if result.is_ok() {
			log::info!("stage done pipeline={} run_id={}", ctx.pipeline, ctx.run_id);
		}
		result
	}

	async fn consume(&self, stream: &mut MergedStream, ctx: &RunContext) -> Result<()> {
		while let Some(item) = stream.next().await {
			let item = item?;
			match item.kind {
				PayloadKind::NonTimeline => {
					let tables = self.parse_non_timeline(item.raw).await?;
					retry_insert("non-timeline persist", || {
						self.store.persist_non_timeline(&tables, ctx.run_id)
					})
					.await?;
				}
				PayloadKind::Timeline => {
					let tables = self.parse_timeline(item.raw).await?;
					retry_insert("timeline persist", || self.store.persist_timeline(&tables, ctx.run_id))
						.await?;
				}
			}
		}
		Ok(())
	}

	async fn parse_non_timeline(&self, raw: Value) -> Result<crate::parse::non_timeline::NonTimelineTables> {
		let parser = Arc::clone(&self.non_timeline);
		tokio::task::spawn_blocking(move || parser.run(&raw)).await?
	}

	async fn parse_timeline(&self, raw: Value) -> Result<crate::parse::timeline::TimelineTables> {
		let parser = Arc::clone(&self.timeline);
		tokio::task::spawn_blocking(move || parser.run(&raw)).await?
	}
}

#[async_trait]
impl Stage for MatchDataStage {
	fn name(&self) -> &'static str {
		MATCH_DATA_PIPELINE
	}

	async fn run(&self) -> Result<()> {
		MatchDataStage::run(self).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_util::{sample_match, sample_timeline, MemoryStore, StubFetch};

	fn payload_fetch() -> Arc<StubFetch> {
		Arc::new(StubFetch::new(|url, _| {
			if url.ends_with("/timeline") {
				StubFetch::ok(sample_timeline())
			} else {
				StubFetch::ok(sample_match())
			}
		}))
	}

	fn store_with_pending(ids: &[&str]) -> Arc<MemoryStore> {
		let store = Arc::new(MemoryStore::new());
		store.state.lock().pending_match_ids = ids.iter().map(|s| s.to_string()).collect();
		store
	}

	#[tokio::test(start_paused = true)]
	async fn persists_both_schedules_for_every_match() {
		crate::test_util::initialize();
		let store = store_with_pending(&["NA1_1", "KR_2"]);
		let stage =
			MatchDataStage::new(payload_fetch(), Arc::clone(&store) as Arc<dyn AnalyticStore>, false);
		stage.run().await.unwrap();

		// two matches worth of metadata rows and frame stats
		assert_eq!(store.table_total("game_data.metadata"), 2);
		assert_eq!(store.table_total("game_data.tl_participant_stats"), 8, "4 frame rows per timeline");
		assert_eq!(store.table_total(PROCESSED_MATCH_IDS_TABLE), 2);
	}

	#[tokio::test(start_paused = true)]
	async fn persist_failure_rolls_back_every_data_table() {
		// three matches land, the fourth persist call fails permanently
		let store = store_with_pending(&["NA1_1", "NA1_2", "NA1_3", "NA1_4"]);
		store.fail_persist_on_call.store(4, std::sync::atomic::Ordering::SeqCst);

		let stage =
			MatchDataStage::new(payload_fetch(), Arc::clone(&store) as Arc<dyn AnalyticStore>, false);
		let run = stage.run().await;
		assert!(run.is_err());

		for table in NON_TIMELINE_TABLES.iter().chain(TIMELINE_TABLES.iter()) {
			assert_eq!(store.table_total(table), 0, "table {} must be empty after rollback", table);
		}
	}

	#[tokio::test(start_paused = true)]
	async fn empty_pending_list_is_a_clean_run() {
		let store = store_with_pending(&[]);
		let stage =
			MatchDataStage::new(payload_fetch(), Arc::clone(&store) as Arc<dyn AnalyticStore>, false);
		stage.run().await.unwrap();
		assert!(store.state.lock().rows.values().all(|count| *count == 0));
	}
}
