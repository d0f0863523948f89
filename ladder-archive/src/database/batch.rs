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

//! A method of dynamic multi-row inserts with SQLx, assembled as text plus a
//! positional argument buffer. Statements are split whenever a chunk would
//! exceed `CHUNK_MAX` bound arguments, which keeps each statement far below
//! the wire-protocol cap on bind parameters.

use sqlx::{
	encode::Encode,
	postgres::{PgArguments, PgConnection, Postgres},
	Arguments, Type,
};

use crate::error::Result;

// Wide tables (participant stats) carry >100 arguments per row, so a chunk
// holds ~45 of those rows; narrow tables pack thousands.
const CHUNK_MAX: usize = 5_000;

pub struct Chunk {
	query: String,
	arguments: PgArguments,
	args_len: usize,
}

impl Chunk {
	fn new(sql: &str) -> Self {
		let mut query = String::with_capacity(1024 * 8);
		query.push_str(sql);
		Self { query, arguments: PgArguments::default(), args_len: 0 }
	}

	pub fn append(&mut self, sql: &str) {
		self.query.push_str(sql);
	}

	pub fn bind<'a, T: 'a>(&mut self, value: T) -> Result<()>
	where
		T: Encode<'a, Postgres> + Type<Postgres> + Send,
	{
		self.arguments.add(value);
		self.query.push('$');
		self.query.push_str(itoa::Buffer::new().format(self.args_len + 1));
		self.args_len += 1;
		Ok(())
	}

	async fn execute(mut self, trailing: &str, conn: &mut PgConnection) -> Result<u64> {
		self.query.push_str(trailing);
		let done = sqlx::query_with(&self.query, self.arguments).execute(conn).await?;
		Ok(done.rows_affected())
	}
}

/// Builder for `INSERT INTO t (...) VALUES (...), (...), ...` statements.
pub struct Batch {
	#[allow(unused)]
	name: &'static str,
	leading: String,
	trailing: String,
	chunks: Vec<Chunk>,
	index: usize,
	len: usize,
	row_args: usize,
}

impl Batch {
	pub fn new(name: &'static str, leading: &str, trailing: &str) -> Self {
		Self {
			name,
			leading: leading.to_owned(),
			trailing: trailing.to_owned(),
			chunks: vec![Chunk::new(leading)],
			index: 0,
			len: 0,
			row_args: 0,
		}
	}

	// ensure there is enough room for N more arguments
	pub fn reserve(&mut self, arguments: usize) -> Result<()> {
		self.len += 1;
		if self.chunks[self.index].args_len + arguments > CHUNK_MAX {
			self.chunks.push(Chunk::new(&self.leading));
			self.index += 1;
		}
		Ok(())
	}

	pub fn append(&mut self, sql: &str) {
		self.chunks[self.index].append(sql);
	}

	pub fn bind<'a, T: 'a>(&mut self, value: T) -> Result<()>
	where
		T: Encode<'a, Postgres> + Type<Postgres> + Send,
	{
		self.chunks[self.index].bind(value)
	}

	pub fn current_num_arguments(&self) -> usize {
		self.chunks[self.index].args_len
	}

	/// Open the next `(...)` tuple, reserving room for `arguments` binds.
	pub fn begin_row(&mut self, arguments: usize) -> Result<()> {
		self.reserve(arguments)?;
		if self.current_num_arguments() > 0 {
			self.append(",");
		}
		self.append("(");
		self.row_args = 0;
		Ok(())
	}

	/// Bind the next value of the current tuple.
	pub fn push<'a, T: 'a>(&mut self, value: T) -> Result<()>
	where
		T: Encode<'a, Postgres> + Type<Postgres> + Send,
	{
		if self.row_args > 0 {
			self.append(",");
		}
		self.bind(value)?;
		self.row_args += 1;
		Ok(())
	}

	pub fn end_row(&mut self) {
		self.append(")");
	}

	pub async fn execute(self, conn: &mut PgConnection) -> Result<u64> {
		let mut rows_affected = 0;
		if self.len > 0 {
			for chunk in self.chunks {
				rows_affected += chunk.execute(&self.trailing, &mut *conn).await?;
			}
		}
		Ok(rows_affected)
	}
}
