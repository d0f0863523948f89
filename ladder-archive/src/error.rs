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

use std::{env, fmt, io};

use thiserror::Error;

pub type Result<T, E = ArchiveError> = std::result::Result<T, E>;

/// Ladder Archive Error Enum
#[derive(Debug, Error)]
pub enum ArchiveError {
	#[error(transparent)]
	Io(#[from] io::Error),
	#[error(transparent)]
	Env(#[from] env::VarError),
	#[error(transparent)]
	Fmt(#[from] fmt::Error),

	#[error(transparent)]
	Serialization(#[from] serde_json::Error),

	#[error("sqlx error: {0}")]
	Sql(#[from] sqlx::Error),

	#[error("http transport error: {0}")]
	Http(#[from] reqwest::Error),

	#[error("metrics error: {0}")]
	Metrics(#[from] prometheus::Error),

	#[error("blocking task failed: {0}")]
	Join(#[from] tokio::task::JoinError),

	// channel errors carry no useful payload of their own
	#[error("sending on a disconnected channel")]
	Channel,

	#[error("invalid configuration: {0}")]
	Config(String),

	#[error("invalid ladder bounds: {0}")]
	Bounds(String),

	#[error("unknown region prefix {prefix:?} in match id {match_id:?}")]
	UnknownRegion { prefix: String, match_id: String },

	#[error("page-bound probe failed for {0}")]
	ProbeFailed(String),

	#[error("payload failed validation: {0}")]
	Validation(String),
}

impl<T> From<flume::SendError<T>> for ArchiveError {
	fn from(_: flume::SendError<T>) -> Self {
		Self::Channel
	}
}

impl From<flume::RecvError> for ArchiveError {
	fn from(_: flume::RecvError) -> Self {
		Self::Channel
	}
}
