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

//! IO for the analytic store. Every persisted row is keyed by the run id of
//! the stage that produced it; deleting by run id is the rollback primitive.

pub mod batch;
pub mod models;
pub mod queries;

use std::time::Duration;

use sqlx::{
	pool::PoolConnection,
	postgres::{PgConnection, PgPool, PgPoolOptions, Postgres},
};
use uuid::Uuid;

use self::batch::Batch;
use crate::error::Result;

pub type DbConn = PoolConnection<Postgres>;

#[derive(Clone)]
pub struct Database {
	pool: PgPool,
}

impl Database {
	/// Connect to the store.
	pub async fn connect(url: &str) -> Result<Self> {
		let pool = PgPoolOptions::new()
			.min_connections(4)
			.max_connections(28)
			.idle_timeout(Duration::from_secs(600))
			.connect(url)
			.await?;
		Ok(Self { pool })
	}

	/// Start with a pre-built pool.
	pub fn with_pool(pool: PgPool) -> Self {
		Self { pool }
	}

	pub async fn conn(&self) -> Result<DbConn> {
		self.pool.acquire().await.map_err(Into::into)
	}

	pub fn pool(&self) -> &PgPool {
		&self.pool
	}
}

/// One persistable row type: its table, its column list and how one row
/// binds its values. The writer prepends `run_id` to every row, which keeps
/// the per-table persistence schedule declarative.
pub trait TableRow: Send + Sync {
	const TABLE: &'static str;
	const COLUMNS: &'static [&'static str];

	fn bind(&self, batch: &mut Batch) -> Result<()>;
}

fn quoted_columns(columns: &[&str]) -> String {
	let mut out = String::new();
	for column in columns {
		out.push_str(", \"");
		out.push_str(column);
		out.push('"');
	}
	out
}

/// Batched multi-row insert with `run_id` prepended to each row.
pub async fn insert_rows<R: TableRow>(conn: &mut PgConnection, run_id: Uuid, rows: &[R]) -> Result<u64> {
	insert_rows_into(conn, R::TABLE, run_id, rows).await
}

/// Same as [`insert_rows`] with the target table overridden; the two
/// damage-instance tables share one row type.
pub async fn insert_rows_into<R: TableRow>(
	conn: &mut PgConnection,
	table: &str,
	run_id: Uuid,
	rows: &[R],
) -> Result<u64> {
	if rows.is_empty() {
		return Ok(0);
	}
	let leading = format!("INSERT INTO {} (run_id{}) VALUES ", table, quoted_columns(R::COLUMNS));
	let mut batch = Batch::new(R::TABLE, &leading, "");
	for row in rows {
		batch.begin_row(R::COLUMNS.len() + 1)?;
		batch.push(run_id)?;
		row.bind(&mut batch)?;
		batch.end_row();
	}
	let affected = batch.execute(conn).await?;
	log::debug!("inserted {} rows into {}", affected, table);
	Ok(affected)
}

/// Remove every row a run wrote to one table.
pub async fn delete_by_run_id(conn: &mut PgConnection, table: &str, run_id: Uuid) -> Result<u64> {
	let sql = format!("DELETE FROM {} WHERE run_id = $1", table);
	let done = sqlx::query(&sql).bind(run_id).execute(conn).await?;
	Ok(done.rows_affected())
}
