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

//! The per-stage store operations behind one seam, so the stages can be
//! exercised against an in-memory double and the production backend stays
//! swappable.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
	database::{self, models::PlayerRow, queries, queries::PlayerKey, Database},
	error::Result,
	parse::{non_timeline::NonTimelineTables, timeline::TimelineTables},
};

pub const PLAYERS_TABLE: &str = "game_data.players";
pub const MATCH_IDS_TABLE: &str = "game_data.matchids";
pub const COLLECTED_PUUIDS_TABLE: &str = "game_data.matchid_puuids";
pub const TIMESTAMPS_TABLE: &str = "game_data.data_timestamps";
pub const PROCESSED_MATCH_IDS_TABLE: &str = "game_data.matchdata_matchids";

/// Rollback set of the match-data stage's non-timeline schedule.
pub const NON_TIMELINE_TABLES: [&str; 9] = [
	"game_data.metadata",
	"game_data.info",
	"game_data.bans",
	"game_data.feats",
	"game_data.objectives",
	"game_data.participant_stats",
	"game_data.participant_challenges",
	"game_data.participant_perk_values",
	"game_data.participant_perk_ids",
];

/// Rollback set of the match-data stage's timeline schedule.
pub const TIMELINE_TABLES: [&str; 10] = [
	"game_data.tl_participant_stats",
	"game_data.tl_building_kill",
	"game_data.tl_champion_kill",
	"game_data.tl_champion_special_kill",
	"game_data.tl_dragon_soul_given",
	"game_data.tl_elite_monster_kill",
	"game_data.tl_turret_plate_destroyed",
	"game_data.tl_rare_events",
	"game_data.tl_ck_victim_damage_dealt",
	"game_data.tl_ck_victim_damage_received",
];

/// Everything the three stages ask of the analytic store.
#[async_trait]
pub trait AnalyticStore: Send + Sync {
	// players stage
	async fn insert_players(&self, rows: &[PlayerRow], run_id: Uuid) -> Result<u64>;

	// match-id stage
	async fn load_players(&self) -> Result<Vec<PlayerKey>>;
	async fn load_collected_puuids(&self) -> Result<Vec<String>>;
	async fn load_collected_at(&self) -> Result<i64>;
	async fn insert_collected_puuids(&self, puuids: &[String], run_id: Uuid) -> Result<u64>;
	async fn insert_match_ids(&self, ids: &[String], run_id: Uuid) -> Result<u64>;
	async fn insert_collected_at(&self, ts: i64, run_id: Uuid) -> Result<()>;
	/// Success path: drop every timestamp row but this run's.
	async fn delete_stale_collected_at(&self, run_id: Uuid) -> Result<()>;

	// match-data stage
	async fn load_pending_match_ids(&self) -> Result<Vec<String>>;
	async fn insert_processed_match_ids(&self, ids: &[String], run_id: Uuid) -> Result<u64>;
	async fn persist_non_timeline(&self, tables: &NonTimelineTables, run_id: Uuid) -> Result<()>;
	async fn persist_timeline(&self, tables: &TimelineTables, run_id: Uuid) -> Result<()>;

	/// Rollback primitive: remove every row this run wrote to one table.
	async fn delete_run(&self, table: &str, run_id: Uuid) -> Result<u64>;
}

#[async_trait]
impl AnalyticStore for Database {
	async fn insert_players(&self, rows: &[PlayerRow], run_id: Uuid) -> Result<u64> {
		let mut conn = self.conn().await?;
		database::insert_rows(&mut conn, run_id, rows).await
	}

	async fn load_players(&self) -> Result<Vec<PlayerKey>> {
		let mut conn = self.conn().await?;
		queries::load_players(&mut conn).await
	}

	async fn load_collected_puuids(&self) -> Result<Vec<String>> {
		let mut conn = self.conn().await?;
		queries::load_collected_puuids(&mut conn).await
	}

	async fn load_collected_at(&self) -> Result<i64> {
		let mut conn = self.conn().await?;
		queries::load_collected_at(&mut conn).await
	}

	async fn insert_collected_puuids(&self, puuids: &[String], run_id: Uuid) -> Result<u64> {
		let mut conn = self.conn().await?;
		let done = sqlx::query(
			"INSERT INTO game_data.matchid_puuids (run_id, puuid) SELECT $1, p FROM UNNEST($2::text[]) AS p",
		)
		.bind(run_id)
		.bind(puuids.to_vec())
		.execute(&mut *conn)
		.await?;
		Ok(done.rows_affected())
	}

	async fn insert_match_ids(&self, ids: &[String], run_id: Uuid) -> Result<u64> {
		let mut conn = self.conn().await?;
		let done = sqlx::query(
			"INSERT INTO game_data.matchids (run_id, matchid) SELECT $1, m FROM UNNEST($2::text[]) AS m",
		)
		.bind(run_id)
		.bind(ids.to_vec())
		.execute(&mut *conn)
		.await?;
		Ok(done.rows_affected())
	}

	async fn insert_collected_at(&self, ts: i64, run_id: Uuid) -> Result<()> {
		let mut conn = self.conn().await?;
		sqlx::query("INSERT INTO game_data.data_timestamps (run_id, name, stored_at) VALUES ($1, $2, $3)")
			.bind(run_id)
			.bind(queries::PUUID_TIMESTAMP_NAME)
			.bind(ts)
			.execute(&mut *conn)
			.await?;
		Ok(())
	}

	async fn delete_stale_collected_at(&self, run_id: Uuid) -> Result<()> {
		let mut conn = self.conn().await?;
		sqlx::query("DELETE FROM game_data.data_timestamps WHERE name = $1 AND run_id != $2")
			.bind(queries::PUUID_TIMESTAMP_NAME)
			.bind(run_id)
			.execute(&mut *conn)
			.await?;
		Ok(())
	}

	async fn load_pending_match_ids(&self) -> Result<Vec<String>> {
		let mut conn = self.conn().await?;
		queries::load_match_ids(&mut conn).await
	}

	async fn insert_processed_match_ids(&self, ids: &[String], run_id: Uuid) -> Result<u64> {
		let mut conn = self.conn().await?;
		let done = sqlx::query(
			"INSERT INTO game_data.matchdata_matchids (run_id, match_id) SELECT $1, m FROM UNNEST($2::text[]) AS m",
		)
		.bind(run_id)
		.bind(ids.to_vec())
		.execute(&mut *conn)
		.await?;
		Ok(done.rows_affected())
	}

	async fn persist_non_timeline(&self, tables: &NonTimelineTables, run_id: Uuid) -> Result<()> {
		let mut conn = self.conn().await?;
		database::insert_rows(&mut conn, run_id, &tables.metadata).await?;
		database::insert_rows(&mut conn, run_id, &tables.game_info).await?;
		database::insert_rows(&mut conn, run_id, &tables.bans).await?;
		database::insert_rows(&mut conn, run_id, &tables.feats).await?;
		database::insert_rows(&mut conn, run_id, &tables.objectives).await?;
		database::insert_rows(&mut conn, run_id, &tables.participant_stats).await?;
		database::insert_rows(&mut conn, run_id, &tables.participant_challenges).await?;
		database::insert_rows(&mut conn, run_id, &tables.participant_perk_values).await?;
		database::insert_rows(&mut conn, run_id, &tables.participant_perk_ids).await?;
		Ok(())
	}

	async fn persist_timeline(&self, tables: &TimelineTables, run_id: Uuid) -> Result<()> {
		let mut conn = self.conn().await?;
		database::insert_rows(&mut conn, run_id, &tables.participant_stats).await?;
		database::insert_rows(&mut conn, run_id, &tables.building_kill).await?;
		database::insert_rows(&mut conn, run_id, &tables.champion_kill).await?;
		database::insert_rows(&mut conn, run_id, &tables.champion_special_kill).await?;
		database::insert_rows(&mut conn, run_id, &tables.dragon_soul_given).await?;
		database::insert_rows(&mut conn, run_id, &tables.elite_monster_kill).await?;
		database::insert_rows(&mut conn, run_id, &tables.turret_plate_destroyed).await?;
		database::insert_rows(&mut conn, run_id, &tables.rare_events).await?;
		database::insert_rows_into(
			&mut conn,
			"game_data.tl_ck_victim_damage_dealt",
			run_id,
			&tables.ck_victim_damage_dealt,
		)
		.await?;
		database::insert_rows_into(
			&mut conn,
			"game_data.tl_ck_victim_damage_received",
			run_id,
			&tables.ck_victim_damage_received,
		)
		.await?;
		Ok(())
	}

	async fn delete_run(&self, table: &str, run_id: Uuid) -> Result<u64> {
		let mut conn = self.conn().await?;
		database::delete_by_run_id(&mut conn, table, run_id).await
	}
}
