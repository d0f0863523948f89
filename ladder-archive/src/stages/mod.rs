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

//! Stage orchestration skeleton: a Loader reads prior durable state, a
//! Collector streams records, a Saver persists them in batches keyed by a
//! fresh run id and rolls everything back on failure.

pub mod match_data;
pub mod match_ids;
pub mod players;

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use tokio::time::sleep;
use uuid::Uuid;

use crate::{error::Result, store::AnalyticStore, types::RunContext, util::retry_delay};

/// Bounded retry window for store inserts.
const INSERT_RETRY_ATTEMPTS: u32 = 5;
const INSERT_BACKOFF_MIN: Duration = Duration::from_secs(1);
const INSERT_BACKOFF_MAX: Duration = Duration::from_secs(10);

/// Rollback deletes retry until they land; a failed rollback is worse than a
/// slow one, so only the backoff is capped.
const ROLLBACK_BACKOFF_MAX: Duration = Duration::from_secs(300);

#[async_trait]
pub trait Loader: Send + Sync {
	type State: Send + Sync;

	async fn load(&self, ctx: &RunContext) -> Result<Self::State>;
}

pub trait Collector: Send + Sync {
	type State;
	type Stream: Send;

	fn collect(&self, state: &Self::State, ctx: &RunContext) -> Result<Self::Stream>;
}

#[async_trait]
pub trait Saver: Send + Sync {
	type State;
	type Stream;

	async fn save(&self, stream: Self::Stream, state: &Self::State, ctx: &RunContext) -> Result<()>;
}

/// One stage of the recurring pipeline.
#[async_trait]
pub trait Stage: Send + Sync {
	fn name(&self) -> &'static str;
	async fn run(&self) -> Result<()>;
}

/// Generic Loader → Collector → Saver driver. Assembles the run context,
/// loads prior state, wires the stream into the saver.
pub struct Orchestrator<L, C, S> {
	pipeline: &'static str,
	loader: L,
	collector: C,
	saver: S,
}

impl<L, C, S> Orchestrator<L, C, S>
where
	L: Loader,
	C: Collector<State = L::State>,
	S: Saver<State = L::State, Stream = C::Stream>,
{
	pub fn new(pipeline: &'static str, loader: L, collector: C, saver: S) -> Self {
		Self { pipeline, loader, collector, saver }
	}

	pub async fn run(&self) -> Result<()> {
		let ctx = RunContext::new(self.pipeline);
		log::info!("stage start pipeline={} run_id={}", ctx.pipeline, ctx.run_id);
		let state = self.loader.load(&ctx).await?;
		let stream = self.collector.collect(&state, &ctx)?;
		self.saver.save(stream, &state, &ctx).await?;
		log::info!("stage done pipeline={} run_id={}", ctx.pipeline, ctx.run_id);
		Ok(())
	}
}

#[async_trait]
impl<L, C, S> Stage for Orchestrator<L, C, S>
where
	L: Loader,
	C: Collector<State = L::State>,
	S: Saver<State = L::State, Stream = C::Stream>,
	L::State: Send + Sync,
{
	fn name(&self) -> &'static str {
		self.pipeline
	}

	async fn run(&self) -> Result<()> {
		Orchestrator::run(self).await
	}
}

/// Retry a store insert a bounded number of times, re-raising on exhaustion.
pub(crate) async fn retry_insert<F, Fut, T>(what: &str, mut op: F) -> Result<T>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<T>>,
{
	let mut attempt = 0;
	loop {
		attempt += 1;
		match op().await {
			Ok(value) => return Ok(value),
			Err(e) if attempt < INSERT_RETRY_ATTEMPTS => {
				let delay = retry_delay(attempt, INSERT_BACKOFF_MIN, INSERT_BACKOFF_MAX);
				log::warn!("{} failed (attempt {}/{}), retrying in {:?}: {}", what, attempt, INSERT_RETRY_ATTEMPTS, delay, e);
				sleep(delay).await;
			}
			Err(e) => {
				log::error!("{} failed after {} attempts: {}", what, attempt, e);
				return Err(e);
			}
		}
	}
}

/// Delete every row the run wrote to `tables`, sequentially, retrying each
/// delete until it succeeds.
pub(crate) async fn rollback_tables(store: &dyn AnalyticStore, tables: &[&str], run_id: Uuid) {
	for table in tables {
		let mut attempt = 0;
		loop {
			match store.delete_run(table, run_id).await {
				Ok(removed) => {
					log::info!("rolled back {} rows from {} run_id={}", removed, table, run_id);
					break;
				}
				Err(e) => {
					attempt += 1;
					let delay = retry_delay(attempt, INSERT_BACKOFF_MIN, ROLLBACK_BACKOFF_MAX);
					log::warn!("rollback of {} run_id={} failed, retrying in {:?}: {}", table, run_id, delay, e);
					sleep(delay).await;
				}
			}
		}
	}
}
