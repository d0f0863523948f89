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

//! Routing geography, ladder taxonomy and per-run context shared by every stage.

use std::{
	collections::BTreeMap,
	fmt,
	time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ArchiveError, Result};

/// Platform routing value of the upstream API ("fine-grained shard").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
	Br1,
	La1,
	La2,
	Na1,
	Euw1,
	Eun1,
	Ru,
	Tr1,
	Me1,
	Jp1,
	Kr,
	Tw2,
	Oc1,
	Vn2,
	Sg2,
}

/// Continental routing value ("super-shard"). Every region maps to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Continent {
	Americas,
	Europe,
	Asia,
	Sea,
}

impl Region {
	pub const ALL: [Region; 15] = [
		Region::Br1,
		Region::La1,
		Region::La2,
		Region::Na1,
		Region::Euw1,
		Region::Eun1,
		Region::Ru,
		Region::Tr1,
		Region::Me1,
		Region::Jp1,
		Region::Kr,
		Region::Tw2,
		Region::Oc1,
		Region::Vn2,
		Region::Sg2,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			Region::Br1 => "br1",
			Region::La1 => "la1",
			Region::La2 => "la2",
			Region::Na1 => "na1",
			Region::Euw1 => "euw1",
			Region::Eun1 => "eun1",
			Region::Ru => "ru",
			Region::Tr1 => "tr1",
			Region::Me1 => "me1",
			Region::Jp1 => "jp1",
			Region::Kr => "kr",
			Region::Tw2 => "tw2",
			Region::Oc1 => "oc1",
			Region::Vn2 => "vn2",
			Region::Sg2 => "sg2",
		}
	}

	pub fn from_str_insensitive(s: &str) -> Option<Region> {
		let lower = s.to_ascii_lowercase();
		Region::ALL.iter().copied().find(|r| r.as_str() == lower)
	}

	/// Fixed region → continent table.
	pub fn continent(&self) -> Continent {
		match self {
			Region::Br1 | Region::La1 | Region::La2 | Region::Na1 => Continent::Americas,
			Region::Euw1 | Region::Eun1 | Region::Ru | Region::Tr1 | Region::Me1 => Continent::Europe,
			Region::Jp1 | Region::Kr => Continent::Asia,
			Region::Tw2 | Region::Oc1 | Region::Vn2 | Region::Sg2 => Continent::Sea,
		}
	}

	/// Resolve a region from the match-id prefix (characters before `_`).
	pub fn from_match_id(match_id: &str) -> Result<Region> {
		let prefix = match_id.split('_').next().unwrap_or_default();
		Region::from_str_insensitive(prefix).ok_or_else(|| ArchiveError::UnknownRegion {
			prefix: prefix.to_string(),
			match_id: match_id.to_string(),
		})
	}
}

impl fmt::Display for Region {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl Continent {
	pub const ALL: [Continent; 4] = [Continent::Americas, Continent::Europe, Continent::Asia, Continent::Sea];

	pub fn as_str(&self) -> &'static str {
		match self {
			Continent::Americas => "americas",
			Continent::Europe => "europe",
			Continent::Asia => "asia",
			Continent::Sea => "sea",
		}
	}
}

impl fmt::Display for Continent {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A rate-limited location is either a region or a continent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
	Region(Region),
	Continent(Continent),
}

impl fmt::Display for Location {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Location::Region(r) => f.write_str(r.as_str()),
			Location::Continent(c) => f.write_str(c.as_str()),
		}
	}
}

impl From<Region> for Location {
	fn from(r: Region) -> Self {
		Location::Region(r)
	}
}

impl From<Continent> for Location {
	fn from(c: Continent) -> Self {
		Location::Continent(c)
	}
}

/// Ranked queues collected by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Queue {
	#[serde(rename = "RANKED_SOLO_5x5")]
	RankedSolo5x5,
	#[serde(rename = "RANKED_FLEX_SR")]
	RankedFlexSr,
}

impl Queue {
	pub fn as_str(&self) -> &'static str {
		match self {
			Queue::RankedSolo5x5 => "RANKED_SOLO_5x5",
			Queue::RankedFlexSr => "RANKED_FLEX_SR",
		}
	}

	/// Numeric queue code used by the match-id endpoint.
	pub fn code(&self) -> u16 {
		match self {
			Queue::RankedSolo5x5 => 420,
			Queue::RankedFlexSr => 440,
		}
	}
}

impl fmt::Display for Queue {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Apex-of-ladder tiers, ordered highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EliteTier {
	Challenger,
	Grandmaster,
	Master,
}

impl EliteTier {
	pub const ALL: [EliteTier; 3] = [EliteTier::Challenger, EliteTier::Grandmaster, EliteTier::Master];

	pub fn as_str(&self) -> &'static str {
		match self {
			EliteTier::Challenger => "CHALLENGER",
			EliteTier::Grandmaster => "GRANDMASTER",
			EliteTier::Master => "MASTER",
		}
	}

	/// Path segment of the per-tier list endpoint.
	pub fn path_segment(&self) -> &'static str {
		match self {
			EliteTier::Challenger => "challenger",
			EliteTier::Grandmaster => "grandmaster",
			EliteTier::Master => "master",
		}
	}

	fn index(&self) -> usize {
		EliteTier::ALL.iter().position(|t| t == self).expect("tier is a member of ALL")
	}
}

impl fmt::Display for EliteTier {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Sub-elite tiers, ordered highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
	Diamond,
	Emerald,
	Platinum,
	Gold,
	Silver,
	Bronze,
	Iron,
}

impl Tier {
	pub const ALL: [Tier; 7] =
		[Tier::Diamond, Tier::Emerald, Tier::Platinum, Tier::Gold, Tier::Silver, Tier::Bronze, Tier::Iron];

	pub fn as_str(&self) -> &'static str {
		match self {
			Tier::Diamond => "DIAMOND",
			Tier::Emerald => "EMERALD",
			Tier::Platinum => "PLATINUM",
			Tier::Gold => "GOLD",
			Tier::Silver => "SILVER",
			Tier::Bronze => "BRONZE",
			Tier::Iron => "IRON",
		}
	}
}

impl fmt::Display for Tier {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Divisions within a sub-elite tier, ordered highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Division {
	I,
	II,
	III,
	IV,
}

impl Division {
	pub const ALL: [Division; 4] = [Division::I, Division::II, Division::III, Division::IV];

	pub fn as_str(&self) -> &'static str {
		match self {
			Division::I => "I",
			Division::II => "II",
			Division::III => "III",
			Division::IV => "IV",
		}
	}
}

impl fmt::Display for Division {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A (tier, division) pair; the sub-elite ladder is the full product,
/// ordered lexicographically by (tier, division).
pub type Bracket = (Tier, Division);

pub fn all_brackets() -> Vec<Bracket> {
	let mut out = Vec::with_capacity(Tier::ALL.len() * Division::ALL.len());
	for tier in Tier::ALL {
		for division in Division::ALL {
			out.push((tier, division));
		}
	}
	out
}

/// Inclusive `[upper, lower]` tier range for the elite list endpoints.
/// `None` bounds mean "unbounded in that direction".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EliteBounds {
	pub collect: bool,
	#[serde(default)]
	pub upper: Option<EliteTier>,
	#[serde(default)]
	pub lower: Option<EliteTier>,
}

impl EliteBounds {
	/// Tiers between `upper` and `lower`, inclusive. Empty when `collect` is off.
	pub fn tiers(&self) -> Result<Vec<EliteTier>> {
		if !self.collect {
			return Ok(Vec::new());
		}
		let start = self.upper.map_or(0, |t| t.index());
		let end = self.lower.map_or(EliteTier::ALL.len() - 1, |t| t.index());
		if start > end {
			return Err(ArchiveError::Bounds("elite bounds: upper must not be below lower".into()));
		}
		Ok(EliteTier::ALL[start..=end].to_vec())
	}
}

/// Inclusive `[upper, lower]` bracket range for the divisioned endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubEliteBounds {
	pub collect: bool,
	#[serde(default)]
	pub upper_tier: Option<Tier>,
	#[serde(default)]
	pub upper_division: Option<Division>,
	#[serde(default)]
	pub lower_tier: Option<Tier>,
	#[serde(default)]
	pub lower_division: Option<Division>,
}

impl SubEliteBounds {
	/// (tier, division) pairs between the upper and lower bound, inclusive.
	pub fn brackets(&self) -> Result<Vec<Bracket>> {
		if !self.collect {
			return Ok(Vec::new());
		}
		let all = all_brackets();
		let upper = match (self.upper_tier, self.upper_division) {
			(Some(t), Some(d)) => Some((t, d)),
			_ => None,
		};
		let lower = match (self.lower_tier, self.lower_division) {
			(Some(t), Some(d)) => Some((t, d)),
			_ => None,
		};
		let start = match upper {
			Some(b) => all
				.iter()
				.position(|x| *x == b)
				.ok_or_else(|| ArchiveError::Bounds(format!("unknown upper bracket {:?}", b)))?,
			None => 0,
		};
		let end = match lower {
			Some(b) => all
				.iter()
				.position(|x| *x == b)
				.ok_or_else(|| ArchiveError::Bounds(format!("unknown lower bracket {:?}", b)))?,
			None => all.len() - 1,
		};
		if start > end {
			return Err(ArchiveError::Bounds("sub-elite bounds: upper must not be below lower".into()));
		}
		Ok(all[start..=end].to_vec())
	}
}

/// Per-queue bounds maps. BTreeMap keeps queue iteration order stable.
pub type EliteBoundsConfig = BTreeMap<Queue, EliteBounds>;
pub type SubEliteBoundsConfig = BTreeMap<Queue, SubEliteBounds>;

/// Collect the entire ladder for both queues.
pub fn full_elite_bounds() -> EliteBoundsConfig {
	let mut map = BTreeMap::new();
	for queue in [Queue::RankedSolo5x5, Queue::RankedFlexSr] {
		map.insert(queue, EliteBounds { collect: true, upper: None, lower: None });
	}
	map
}

pub fn full_sub_elite_bounds() -> SubEliteBoundsConfig {
	let mut map = BTreeMap::new();
	for queue in [Queue::RankedSolo5x5, Queue::RankedFlexSr] {
		map.insert(
			queue,
			SubEliteBounds {
				collect: true,
				upper_tier: None,
				upper_division: None,
				lower_tier: None,
				lower_division: None,
			},
		);
	}
	map
}

/// Context shared by every operation of one stage run. `run_id` keys all
/// persisted rows so a failed run can be rolled back wholesale.
#[derive(Debug, Clone, Copy)]
pub struct RunContext {
	pub ts: i64,
	pub run_id: Uuid,
	pub pipeline: &'static str,
}

impl RunContext {
	pub fn new(pipeline: &'static str) -> Self {
		let ts = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs() as i64).unwrap_or_default();
		Self { ts, run_id: Uuid::new_v4(), pipeline }
	}
}

/// State of one player's match-id crawl. Advancing produces a new state;
/// the stream only enqueues a successor when the last page came back full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCrawlState {
	pub puuid: String,
	pub queue: Queue,
	pub continent: Continent,
	pub next_page_start: u32,
	/// Fully formatted page URL except for the `{start}` placeholder.
	pub base_url: String,
}

impl PlayerCrawlState {
	pub fn page_url(&self) -> String {
		self.base_url.replace("{start}", itoa::Buffer::new().format(self.next_page_start))
	}

	pub fn advance(&self, page_count: u32) -> PlayerCrawlState {
		PlayerCrawlState { next_page_start: self.next_page_start + page_count, ..self.clone() }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_region_maps_to_a_continent() {
		for region in Region::ALL {
			// the mapping is total and round-trips through the display form
			let c = region.continent();
			assert!(Continent::ALL.contains(&c));
			assert_eq!(Region::from_str_insensitive(region.as_str()), Some(region));
		}
	}

	#[test]
	fn region_from_match_id_prefix() {
		assert_eq!(Region::from_match_id("NA1_4927635702").unwrap(), Region::Na1);
		assert_eq!(Region::from_match_id("kr_12345").unwrap(), Region::Kr);
		assert!(matches!(
			Region::from_match_id("XX9_1"),
			Err(ArchiveError::UnknownRegion { .. })
		));
	}

	#[test]
	fn elite_bounds_slice_inclusively() {
		let bounds = EliteBounds { collect: true, upper: Some(EliteTier::Grandmaster), lower: None };
		assert_eq!(bounds.tiers().unwrap(), vec![EliteTier::Grandmaster, EliteTier::Master]);

		let unbounded = EliteBounds { collect: true, upper: None, lower: None };
		assert_eq!(unbounded.tiers().unwrap().len(), 3);

		let off = EliteBounds { collect: false, upper: None, lower: None };
		assert!(off.tiers().unwrap().is_empty());
	}

	#[test]
	fn inverted_elite_bounds_are_rejected() {
		let bounds = EliteBounds { collect: true, upper: Some(EliteTier::Master), lower: Some(EliteTier::Challenger) };
		assert!(matches!(bounds.tiers(), Err(ArchiveError::Bounds(_))));
	}

	#[test]
	fn sub_elite_brackets_are_ordered_by_tier_then_division() {
		let all = all_brackets();
		assert_eq!(all.len(), 28);
		assert_eq!(all[0], (Tier::Diamond, Division::I));
		assert_eq!(all[27], (Tier::Iron, Division::IV));

		let bounds = SubEliteBounds {
			collect: true,
			upper_tier: Some(Tier::Emerald),
			upper_division: Some(Division::III),
			lower_tier: Some(Tier::Platinum),
			lower_division: Some(Division::II),
		};
		let brackets = bounds.brackets().unwrap();
		assert_eq!(
			brackets,
			vec![
				(Tier::Emerald, Division::III),
				(Tier::Emerald, Division::IV),
				(Tier::Platinum, Division::I),
				(Tier::Platinum, Division::II),
			]
		);
	}

	#[test]
	fn crawl_state_formats_page_url() {
		let state = PlayerCrawlState {
			puuid: "abc".into(),
			queue: Queue::RankedSolo5x5,
			continent: Continent::Americas,
			next_page_start: 300,
			base_url: "https://americas.example/ids?start={start}&count=100".into(),
		};
		assert_eq!(state.page_url(), "https://americas.example/ids?start=300&count=100");
		let next = state.advance(100);
		assert_eq!(next.next_page_start, 400);
		assert_eq!(next.puuid, state.puuid);
	}
}
