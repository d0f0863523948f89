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

//! Players stage: stream the elite then sub-elite ladders and persist the
//! minified entries in large batches.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::time::Instant;

use crate::{
	crawl::{ladder, RecordStream},
	database::models::PlayerRow,
	error::Result,
	http::Fetch,
	parse::league::MinifiedLeagueEntry,
	stages::{retry_insert, rollback_tables, Collector, Loader, Orchestrator, Saver},
	store::{AnalyticStore, PLAYERS_TABLE},
	types::{EliteBoundsConfig, RunContext, SubEliteBoundsConfig},
};

pub const PLAYERS_PIPELINE: &str = "players";

const BATCH_SIZE: usize = 20_000;
const FLUSH_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct PlayersState {
	pub elite: EliteBoundsConfig,
	pub sub_elite: SubEliteBoundsConfig,
}

/// The players stage has no durable prior state; its input is the configured
/// collection bounds.
pub struct PlayersLoader {
	elite: EliteBoundsConfig,
	sub_elite: SubEliteBoundsConfig,
}

impl PlayersLoader {
	pub fn new(elite: EliteBoundsConfig, sub_elite: SubEliteBoundsConfig) -> Self {
		Self { elite, sub_elite }
	}
}

#[async_trait]
impl Loader for PlayersLoader {
	type State = PlayersState;

	async fn load(&self, _ctx: &RunContext) -> Result<PlayersState> {
		Ok(PlayersState { elite: self.elite.clone(), sub_elite: self.sub_elite.clone() })
	}
}

pub struct PlayersCollector {
	fetch: Arc<dyn Fetch>,
}

impl PlayersCollector {
	pub fn new(fetch: Arc<dyn Fetch>) -> Self {
		Self { fetch }
	}
}

impl Collector for PlayersCollector {
	type State = PlayersState;
	type Stream = RecordStream<MinifiedLeagueEntry>;

	fn collect(&self, state: &PlayersState, _ctx: &RunContext) -> Result<Self::Stream> {
		Ok(ladder::stream_players(Arc::clone(&self.fetch), state.elite.clone(), state.sub_elite.clone()))
	}
}

pub struct PlayersSaver {
	store: Arc<dyn AnalyticStore>,
}

impl PlayersSaver {
	pub fn new(store: Arc<dyn AnalyticStore>) -> Self {
		Self { store }
	}

	async fn consume(&self, stream: &mut RecordStream<MinifiedLeagueEntry>, ctx: &RunContext) -> Result<()> {
		let mut batch: Vec<PlayerRow> = Vec::with_capacity(BATCH_SIZE);
		let mut last_flush = Instant::now();

		while let Some(entry) = stream.next().await {
			let entry = entry?;
			batch.push(player_row(entry, ctx.ts));

			if batch.len() >= BATCH_SIZE || last_flush.elapsed() >= FLUSH_INTERVAL {
				let rows = std::mem::take(&mut batch);
				retry_insert("players insert", || self.store.insert_players(&rows, ctx.run_id)).await?;
				last_flush = Instant::now();
			}
		}
		if !batch.is_empty() {
			retry_insert("players insert", || self.store.insert_players(&batch, ctx.run_id)).await?;
		}
		Ok(())
	}
}

#[async_trait]
impl Saver for PlayersSaver {
	type State = PlayersState;
	type Stream = RecordStream<MinifiedLeagueEntry>;

	async fn save(&self, mut stream: Self::Stream, _state: &PlayersState, ctx: &RunContext) -> Result<()> {
		match self.consume(&mut stream, ctx).await {
			Ok(()) => Ok(()),
			Err(e) => {
				log::warn!("players stage failed, removing partial data run_id={}", ctx.run_id);
				rollback_tables(&*self.store, &[PLAYERS_TABLE], ctx.run_id).await;
				Err(e)
			}
		}
	}
}

fn player_row(entry: MinifiedLeagueEntry, ts: i64) -> PlayerRow {
	PlayerRow {
		puuid: entry.puuid,
		queue_type: entry.queue_type,
		tier: entry.tier,
		division: entry.rank,
		wins: entry.wins as i64,
		losses: entry.losses as i64,
		region: entry.region.as_str().to_string(),
		updated_at: ts,
	}
}

/// Assemble the players stage.
pub fn players_stage(
	fetch: Arc<dyn Fetch>,
	store: Arc<dyn AnalyticStore>,
	elite: EliteBoundsConfig,
	sub_elite: SubEliteBoundsConfig,
) -> Orchestrator<PlayersLoader, PlayersCollector, PlayersSaver> {
	Orchestrator::new(
		PLAYERS_PIPELINE,
		PlayersLoader::new(elite, sub_elite),
		PlayersCollector::new(fetch),
		PlayersSaver::new(store),
	)
}
