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

//! Common read queries on the analytic store abstracted into rust functions.

use sqlx::PgConnection;

use crate::error::Result;

/// Name of the match-id stage's "last collected at" timestamp entry.
pub const PUUID_TIMESTAMP_NAME: &str = "matchids_puuids_ts";

/// Key of one player universe entry: every (puuid, queue) pair is crawled
/// from the region it was last seen in.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PlayerKey {
	pub puuid: String,
	pub queue_type: String,
	pub region: String,
}

/// The universe of known players across every run.
pub async fn load_players(conn: &mut PgConnection) -> Result<Vec<PlayerKey>> {
	let rows = sqlx::query_as::<_, PlayerKey>(
		"SELECT DISTINCT puuid, queue_type, region FROM game_data.players",
	)
	.fetch_all(conn)
	.await?;
	Ok(rows)
}

/// Puuids whose match ids have been collected before.
pub async fn load_collected_puuids(conn: &mut PgConnection) -> Result<Vec<String>> {
	let rows = sqlx::query_scalar::<_, String>("SELECT puuid FROM game_data.matchid_puuids")
		.fetch_all(conn)
		.await?;
	Ok(rows)
}

/// The newest "last collected at" timestamp, or 0 when none was stored yet.
pub async fn load_collected_at(conn: &mut PgConnection) -> Result<i64> {
	let stored_at = sqlx::query_scalar::<_, i64>(
		"SELECT stored_at FROM game_data.data_timestamps WHERE name = $1 ORDER BY stored_at DESC LIMIT 1",
	)
	.bind(PUUID_TIMESTAMP_NAME)
	.fetch_optional(conn)
	.await?;
	Ok(stored_at.unwrap_or_default())
}

/// Match ids pending payload collection.
pub async fn load_match_ids(conn: &mut PgConnection) -> Result<Vec<String>> {
	let rows =
		sqlx::query_scalar::<_, String>("SELECT matchid FROM game_data.matchids").fetch_all(conn).await?;
	Ok(rows)
}
