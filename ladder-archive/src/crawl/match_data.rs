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

//! Match-payload fan-in: the non-timeline and timeline endpoints are fetched
//! by two concurrent pumps and merged through one bounded channel. Each pump
//! pushes a done-marker when its stream is exhausted; the merged stream ends
//! once both markers have been seen. No ordering is promised across the two
//! streams.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::{
	endpoints,
	error::{ArchiveError, Result},
	http::Fetch,
	types::{Continent, Location, Region},
	util::{chunked, spread},
};

/// Payloads are large; keep the fan-out narrow.
pub const MAX_IN_FLIGHT: usize = 16;
const MERGE_BUFFER: usize = 3_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
	NonTimeline,
	Timeline,
}

/// One raw payload tagged with the stream it came from.
#[derive(Debug)]
pub struct MergedItem {
	pub kind: PayloadKind,
	pub raw: Value,
}

#[derive(Debug, Clone)]
struct MatchWork {
	match_id: String,
	continent: Continent,
}

enum MergeMsg {
	Item(MergedItem),
	StreamDone(PayloadKind),
	Failed(ArchiveError),
}

/// Merged payload stream for one batch of match ids.
#[derive(Debug)]
pub struct MergedStream {
	rx: flume::Receiver<MergeMsg>,
	handles: Vec<JoinHandle<()>>,
	done_seen: usize,
	finished: bool,
}

impl MergedStream {
	pub async fn next(&mut self) -> Option<Result<MergedItem>> {
		while !self.finished {
			match self.rx.recv_async().await {
				Ok(MergeMsg::Item(item)) => return Some(Ok(item)),
				Ok(MergeMsg::StreamDone(_)) => {
					self.done_seen += 1;
					if self.done_seen == 2 {
						self.finished = true;
					}
				}
				Ok(MergeMsg::Failed(e)) => {
					self.finished = true;
					self.cancel();
					return Some(Err(e));
				}
				Err(_) => self.finished = true,
			}
		}
		None
	}

	fn cancel(&mut self) {
		for handle in &self.handles {
			handle.abort();
		}
	}
}

impl Drop for MergedStream {
	fn drop(&mut self) {
		self.cancel();
	}
}

/// Route every match id through its region prefix to a continent. An unknown
/// prefix is a hard error; it means the id universe itself is corrupt.
fn build_work(match_ids: &[String]) -> Result<Vec<MatchWork>> {
	let mut work = Vec::with_capacity(match_ids.len());
	for match_id in match_ids {
		let region = Region::from_match_id(match_id).map_err(|e| {
			log::error!("unknown region prefix match_id={}", match_id);
			e
		})?;
		work.push(MatchWork { match_id: match_id.clone(), continent: region.continent() });
	}
	Ok(work)
}

fn payload_url(kind: PayloadKind, work: &MatchWork) -> String {
	match kind {
		PayloadKind::NonTimeline => endpoints::match_url(work.continent, &work.match_id),
		PayloadKind::Timeline => endpoints::match_timeline_url(work.continent, &work.match_id),
	}
}

async fn pump(fetch: Arc<dyn Fetch>, work: Vec<MatchWork>, kind: PayloadKind, tx: flume::Sender<MergeMsg>) {
	let shuffled = spread(work, |w| w.continent);
	for batch in chunked(shuffled, MAX_IN_FLIGHT) {
		let urls: Vec<(String, Continent)> = batch.iter().map(|w| (payload_url(kind, w), w.continent)).collect();
		let fetches = urls.iter().map(|(url, continent)| fetch.fetch_json(url, Location::Continent(*continent)));
		for fetched in join_all(fetches).await {
			match fetched {
				// only object payloads are parseable match data; anything
				// else was already logged by the fetch layer
				Ok(result) => {
					if let Some(raw @ Value::Object(_)) = result.data {
						if tx.send_async(MergeMsg::Item(MergedItem { kind, raw })).await.is_err() {
							return;
						}
					}
				}
				Err(e) => {
					let _ = tx.send_async(MergeMsg::Failed(e)).await;
					let _ = tx.send_async(MergeMsg::StreamDone(kind)).await;
					return;
				}
			}
		}
	}
	let _ = tx.send_async(MergeMsg::StreamDone(kind)).await;
}

/// Fan both per-match endpoints into one bounded stream.
pub fn stream_match_payloads(fetch: Arc<dyn Fetch>, match_ids: Vec<String>) -> Result<MergedStream> {
	let work = build_work(&match_ids)?;
	let (tx, rx) = flume::bounded(MERGE_BUFFER);

	let handles = vec![
		tokio::spawn(pump(Arc::clone(&fetch), work.clone(), PayloadKind::NonTimeline, tx.clone())),
		tokio::spawn(pump(fetch, work, PayloadKind::Timeline, tx)),
	];

	Ok(MergedStream { rx, handles, done_seen: 0, finished: false })
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_util::StubFetch;
	use serde_json::json;

	#[tokio::test]
	async fn merges_both_streams_until_both_done_markers() {
		let fetch = Arc::new(StubFetch::new(|url, _| {
			if url.ends_with("/timeline") {
				StubFetch::ok(json!({"kind": "timeline", "url": url}))
			} else {
				StubFetch::ok(json!({"kind": "match", "url": url}))
			}
		}));

		let ids = vec!["NA1_1".to_string(), "KR_2".to_string(), "EUW1_3".to_string()];
		let mut stream = stream_match_payloads(Arc::clone(&fetch) as Arc<dyn Fetch>, ids).unwrap();

		let mut non_timeline = 0;
		let mut timeline = 0;
		while let Some(item) = stream.next().await {
			match item.unwrap().kind {
				PayloadKind::NonTimeline => non_timeline += 1,
				PayloadKind::Timeline => timeline += 1,
			}
		}
		assert_eq!(non_timeline, 3);
		assert_eq!(timeline, 3);
		assert_eq!(fetch.calls(), 6);
	}

	#[tokio::test]
	async fn non_object_payloads_are_skipped() {
		let fetch = Arc::new(StubFetch::new(|url, _| {
			if url.ends_with("/timeline") {
				StubFetch::exhausted()
			} else {
				StubFetch::ok(json!({"ok": true}))
			}
		}));

		let mut stream =
			stream_match_payloads(fetch as Arc<dyn Fetch>, vec!["NA1_9".to_string()]).unwrap();
		let mut items = Vec::new();
		while let Some(item) = stream.next().await {
			items.push(item.unwrap());
		}
		assert_eq!(items.len(), 1);
		assert_eq!(items[0].kind, PayloadKind::NonTimeline);
	}

	#[tokio::test]
	async fn unknown_region_prefix_fails_fast() {
		let fetch = Arc::new(StubFetch::new(|_, _| StubFetch::ok(json!({}))));
		let err = stream_match_payloads(fetch as Arc<dyn Fetch>, vec!["ZZZ_1".to_string()]).unwrap_err();
		assert!(matches!(err, ArchiveError::UnknownRegion { .. }));
	}
}
