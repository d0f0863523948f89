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

//! Wire DTOs of the league endpoints and the minified projection the
//! players stage persists.

use serde::{Deserialize, Serialize};

use crate::types::Region;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniSeriesDto {
	pub losses: u32,
	pub progress: String,
	pub target: u32,
	pub wins: u32,
}

/// One entry of an elite league list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueItemDto {
	pub fresh_blood: bool,
	pub wins: u32,
	#[serde(default)]
	pub mini_series: Option<MiniSeriesDto>,
	pub inactive: bool,
	pub veteran: bool,
	pub hot_streak: bool,
	pub rank: String,
	pub league_points: u32,
	pub losses: u32,
	pub puuid: String,
}

/// Response of the elite list endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueListDto {
	pub league_id: String,
	pub entries: Vec<LeagueItemDto>,
	pub tier: String,
	pub name: String,
	pub queue: String,
}

/// One record of the divisioned entries endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntryDto {
	pub league_id: String,
	pub puuid: String,
	pub queue_type: String,
	pub tier: String,
	pub rank: String,
	pub league_points: u32,
	pub wins: u32,
	pub losses: u32,
	pub hot_streak: bool,
	pub veteran: bool,
	pub fresh_blood: bool,
	pub inactive: bool,
	#[serde(default)]
	pub mini_series: Option<MiniSeriesDto>,
}

/// The slice of a ladder record the pipeline keeps, tagged with its region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinifiedLeagueEntry {
	pub puuid: String,
	pub queue_type: String,
	pub tier: String,
	pub rank: String,
	pub wins: u32,
	pub losses: u32,
	pub region: Region,
}

impl MinifiedLeagueEntry {
	/// Flatten an elite league list; the queue and tier live on the list.
	pub fn from_list(dto: &LeagueListDto, region: Region) -> Vec<MinifiedLeagueEntry> {
		dto.entries
			.iter()
			.map(|entry| MinifiedLeagueEntry {
				puuid: entry.puuid.clone(),
				queue_type: dto.queue.clone(),
				tier: dto.tier.clone(),
				rank: entry.rank.clone(),
				wins: entry.wins,
				losses: entry.losses,
				region,
			})
			.collect()
	}

	pub fn from_entry(entry: &LeagueEntryDto, region: Region) -> MinifiedLeagueEntry {
		MinifiedLeagueEntry {
			puuid: entry.puuid.clone(),
			queue_type: entry.queue_type.clone(),
			tier: entry.tier.clone(),
			rank: entry.rank.clone(),
			wins: entry.wins,
			losses: entry.losses,
			region,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn league_list_flattens_to_minified_entries() {
		let dto: LeagueListDto = serde_json::from_value(json!({
			"leagueId": "uuid-1",
			"tier": "CHALLENGER",
			"name": "Fizz's Wizards",
			"queue": "RANKED_SOLO_5x5",
			"entries": [
				{
					"freshBlood": false, "wins": 300, "inactive": false, "veteran": true,
					"hotStreak": false, "rank": "I", "leaguePoints": 1204, "losses": 250,
					"puuid": "p-1"
				},
				{
					"freshBlood": true, "wins": 120, "inactive": false, "veteran": false,
					"hotStreak": true, "rank": "I", "leaguePoints": 804, "losses": 101,
					"puuid": "p-2",
					"miniSeries": {"losses": 0, "progress": "WWN", "target": 3, "wins": 2}
				}
			]
		}))
		.unwrap();

		let entries = MinifiedLeagueEntry::from_list(&dto, Region::Kr);
		assert_eq!(entries.len(), 2);
		assert_eq!(entries[0].tier, "CHALLENGER");
		assert_eq!(entries[0].queue_type, "RANKED_SOLO_5x5");
		assert_eq!(entries[1].puuid, "p-2");
		assert_eq!(entries[1].region, Region::Kr);
	}

	#[test]
	fn divisioned_entry_projects_directly() {
		let dto: LeagueEntryDto = serde_json::from_value(json!({
			"leagueId": "uuid-2",
			"puuid": "p-3",
			"queueType": "RANKED_FLEX_SR",
			"tier": "GOLD",
			"rank": "IV",
			"leaguePoints": 21,
			"wins": 40,
			"losses": 38,
			"hotStreak": false,
			"veteran": false,
			"freshBlood": false,
			"inactive": false
		}))
		.unwrap();

		let entry = MinifiedLeagueEntry::from_entry(&dto, Region::Euw1);
		assert_eq!(entry.tier, "GOLD");
		assert_eq!(entry.rank, "IV");
		assert_eq!(entry.region, Region::Euw1);
	}
}
