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

//! The three producers feeding the stages: ladder entries, match ids and
//! match payloads. Producers run as spawned tasks writing into bounded
//! channels; dropping a stream cancels its producers.

pub mod ladder;
pub mod match_data;
pub mod match_ids;

use tokio::task::JoinHandle;

use crate::error::{ArchiveError, Result};

pub(crate) enum StreamEvent<T> {
	Item(T),
	Failed(ArchiveError),
	Done,
}

/// Channel-backed record stream. Yields `Some(Ok(..))` per record,
/// `Some(Err(..))` once on producer failure (cancelling the producers), and
/// `None` after the producer signalled completion.
pub struct RecordStream<T> {
	rx: flume::Receiver<StreamEvent<T>>,
	handles: Vec<JoinHandle<()>>,
	finished: bool,
}

impl<T> RecordStream<T> {
	pub(crate) fn new(rx: flume::Receiver<StreamEvent<T>>, handles: Vec<JoinHandle<()>>) -> Self {
		Self { rx, handles, finished: false }
	}

	pub async fn next(&mut self) -> Option<Result<T>> {
		if self.finished {
			return None;
		}
		match self.rx.recv_async().await {
			Ok(StreamEvent::Item(item)) => Some(Ok(item)),
			Ok(StreamEvent::Failed(e)) => {
				self.finished = true;
				self.cancel();
				Some(Err(e))
			}
			Ok(StreamEvent::Done) | Err(_) => {
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

impl<T> Drop for RecordStream<T> {
	fn drop(&mut self) {
		self.cancel();
	}
}
