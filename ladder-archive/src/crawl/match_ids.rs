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

//! Per-player match-id crawl: a worker pool with self-feeding pagination.
//!
//! Workers consume crawl states from a shared channel, fetch one page each
//! and enqueue a successor state when the page came back full. The crawl
//! terminates because `next_page_start` grows in steps of [`MAX_PAGE_COUNT`]
//! and successors stop at [`MAX_PAGE_START`]: a player is advanced at most
//! ten times. A closer pushes one sentinel per worker once every state has
//! been processed, then marks the output terminal.

use std::sync::{
	atomic::{AtomicUsize, Ordering},
	Arc,
};

use serde_json::Value;
use tokio::task::JoinHandle;

use crate::{
	error::{ArchiveError, Result},
	http::Fetch,
	types::{Location, PlayerCrawlState},
};

pub const MAX_PAGE_START: u32 = 900;
pub const MAX_PAGE_COUNT: usize = 100;
pub const MAX_IN_FLIGHT: usize = 128;

enum OutMsg {
	Ids(Vec<String>),
	Failed(ArchiveError),
}

/// Batches of match ids, one batch per fetched page (empty pages included).
/// Worker failures are re-raised on consumption; dropping the stream cancels
/// the pool.
pub struct MatchIdStream {
	out_rx: flume::Receiver<OutMsg>,
	handles: Vec<JoinHandle<()>>,
	finished: bool,
}

impl MatchIdStream {
	pub async fn next(&mut self) -> Option<Result<Vec<String>>> {
		if self.finished {
			return None;
		}
		match self.out_rx.recv_async().await {
			Ok(OutMsg::Ids(ids)) => Some(Ok(ids)),
			Ok(OutMsg::Failed(e)) => {
				self.finished = true;
				self.cancel();
				Some(Err(e))
			}
			// every worker and the closer exited; buffered items were drained
			Err(_) => {
				self.finished = true;
				None
			}
		}
	}

	fn cancel(&mut self) {
		for handle in &self.handles {
			handle.abort();
		}
	}
}

impl Drop for MatchIdStream {
	fn drop(&mut self) {
		self.cancel();
	}
}

pub fn stream_match_ids(
	fetch: Arc<dyn Fetch>,
	initial_states: Vec<PlayerCrawlState>,
	max_in_flight: usize,
) -> MatchIdStream {
	let (work_tx, work_rx) = flume::unbounded::<Option<PlayerCrawlState>>();
	let (out_tx, out_rx) = flume::unbounded::<OutMsg>();
	let (done_tx, done_rx) = flume::bounded::<()>(1);

	// every queued state is outstanding until its page (and successor, if
	// any) has been handled; zero outstanding means the crawl is drained
	let outstanding = Arc::new(AtomicUsize::new(initial_states.len()));
	let initially_empty = initial_states.is_empty();
	for state in initial_states {
		let _ = work_tx.send(Some(state));
	}
	if initially_empty {
		let _ = done_tx.send(());
	}

	let mut handles = Vec::with_capacity(max_in_flight + 1);
	for _ in 0..max_in_flight {
		let fetch = Arc::clone(&fetch);
		let work_rx = work_rx.clone();
		let work_tx = work_tx.clone();
		let out_tx = out_tx.clone();
		let done_tx = done_tx.clone();
		let outstanding = Arc::clone(&outstanding);

		handles.push(tokio::spawn(async move {
			loop {
				let state = match work_rx.recv_async().await {
					Ok(Some(state)) => state,
					// sentinel or closed channel: this worker is done
					Ok(None) | Err(_) => break,
				};

				let fetched = fetch.fetch_json(&state.page_url(), Location::Continent(state.continent)).await;
				match fetched {
					Ok(result) => {
						let ids = match_ids_from(result.data.as_ref());
						let full_page = ids.len() == MAX_PAGE_COUNT;
						if out_tx.send_async(OutMsg::Ids(ids)).await.is_err() {
							break;
						}
						if state.next_page_start != MAX_PAGE_START && full_page {
							outstanding.fetch_add(1, Ordering::SeqCst);
							let _ = work_tx.send(Some(state.advance(MAX_PAGE_COUNT as u32)));
						}
						if outstanding.fetch_sub(1, Ordering::SeqCst) == 1 {
							let _ = done_tx.send(());
						}
					}
					Err(e) => {
						let _ = out_tx.send_async(OutMsg::Failed(e)).await;
						// keep the outstanding count honest before bailing
						if outstanding.fetch_sub(1, Ordering::SeqCst) == 1 {
							let _ = done_tx.send(());
						}
						break;
					}
				}
			}
		}));
	}

	// closer: once the pool has drained, park every worker with a sentinel.
	// The output channel closes when the last worker clone is dropped, which
	// is what marks the stream terminal; queued items drain first.
	let closer_work_tx = work_tx;
	drop(out_tx);
	handles.push(tokio::spawn(async move {
		let _ = done_rx.recv_async().await;
		for _ in 0..max_in_flight {
			let _ = closer_work_tx.send_async(None).await;
		}
	}));

	MatchIdStream { out_rx, handles, finished: false }
}

fn match_ids_from(data: Option<&Value>) -> Vec<String> {
	data.and_then(Value::as_array)
		.map(|ids| ids.iter().filter_map(Value::as_str).map(str::to_string).collect())
		.unwrap_or_default()
}
