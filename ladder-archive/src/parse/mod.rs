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

//! Payload validation and tabulation. Each parser turns one raw JSON payload
//! into flat row slices; the schema-drift scan runs first and only ever logs.

pub mod drift;
pub mod league;
pub mod non_timeline;
pub mod timeline;

use serde_json::Value;

/// Match id as reported inside a payload's metadata, for log records on
/// payloads that fail validation.
pub(crate) fn payload_match_id(raw: &Value) -> String {
	raw.get("metadata")
		.and_then(|m| m.get("matchId"))
		.and_then(Value::as_str)
		.unwrap_or("unknown")
		.to_string()
}

/// UTC date used to bucket drift reports.
pub(crate) fn drift_date_today() -> String {
	chrono::Utc::now().date_naive().to_string()
}
