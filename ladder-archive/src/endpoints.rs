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

//! Upstream URL construction. The API key never appears in a URL; it rides in
//! a request header, and [`mask_api_key`] scrubs any `api_key=` query
//! parameter from operator-supplied URLs before they reach a log line.

use crate::types::{Continent, Division, EliteTier, Queue, Region, Tier};

const HOST_SUFFIX: &str = ".api.riotgames.com";

fn region_host(region: Region) -> String {
	format!("https://{}{}", region, HOST_SUFFIX)
}

fn continent_host(continent: Continent) -> String {
	format!("https://{}{}", continent, HOST_SUFFIX)
}

/// `GET /lol/league/v4/{tier}leagues/by-queue/{queue}`
pub fn elite_league_url(region: Region, tier: EliteTier, queue: Queue) -> String {
	format!("{}/lol/league/v4/{}leagues/by-queue/{}", region_host(region), tier.path_segment(), queue)
}

/// `GET /lol/league/v4/entries/{queue}/{tier}/{division}?page={n}`
pub fn league_entries_url(region: Region, queue: Queue, tier: Tier, division: Division, page: u32) -> String {
	format!("{}/lol/league/v4/entries/{}/{}/{}?page={}", region_host(region), queue, tier, division, page)
}

/// `GET /lol/match/v5/matches/by-puuid/{puuid}/ids?...&start={start}&count=100`
///
/// The `{start}` placeholder is left in place; the match-id crawler fills it
/// per page via [`crate::types::PlayerCrawlState::page_url`].
pub fn match_ids_url_template(
	continent: Continent,
	puuid: &str,
	start_time: i64,
	end_time: i64,
	queue: Queue,
) -> String {
	format!(
		"{}/lol/match/v5/matches/by-puuid/{}/ids?startTime={}&endTime={}&type=ranked&queue={}&start={{start}}&count=100",
		continent_host(continent),
		puuid,
		start_time,
		end_time,
		queue.code(),
	)
}

/// `GET /lol/match/v5/matches/{matchId}`
pub fn match_url(continent: Continent, match_id: &str) -> String {
	format!("{}/lol/match/v5/matches/{}", continent_host(continent), match_id)
}

/// `GET /lol/match/v5/matches/{matchId}/timeline`
pub fn match_timeline_url(continent: Continent, match_id: &str) -> String {
	format!("{}/lol/match/v5/matches/{}/timeline", continent_host(continent), match_id)
}

/// Replace the value of every `api_key=` query parameter with `*`.
pub fn mask_api_key(url: &str) -> String {
	const NEEDLE: &str = "api_key=";
	let mut out = String::with_capacity(url.len());
	let mut rest = url;
	while let Some(idx) = rest.find(NEEDLE) {
		let value_start = idx + NEEDLE.len();
		out.push_str(&rest[..value_start]);
		out.push('*');
		let tail = &rest[value_start..];
		rest = match tail.find('&') {
			Some(amp) => &tail[amp..],
			None => "",
		};
	}
	out.push_str(rest);
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn elite_url_uses_tier_prefixed_path() {
		let url = elite_league_url(Region::Kr, EliteTier::Challenger, Queue::RankedSolo5x5);
		assert_eq!(url, "https://kr.api.riotgames.com/lol/league/v4/challengerleagues/by-queue/RANKED_SOLO_5x5");
	}

	#[test]
	fn entries_url_carries_page() {
		let url = league_entries_url(Region::Euw1, Queue::RankedFlexSr, Tier::Gold, Division::IV, 12);
		assert_eq!(url, "https://euw1.api.riotgames.com/lol/league/v4/entries/RANKED_FLEX_SR/GOLD/IV?page=12");
	}

	#[test]
	fn match_ids_template_keeps_start_placeholder() {
		let url = match_ids_url_template(Continent::Americas, "p-1", 0, 1700000000, Queue::RankedSolo5x5);
		assert!(url.contains("start={start}"));
		assert!(url.contains("queue=420"));
		assert!(url.contains("endTime=1700000000"));
		assert!(url.starts_with("https://americas.api.riotgames.com/lol/match/v5/matches/by-puuid/p-1/ids?"));
	}

	#[test]
	fn api_key_values_are_masked() {
		assert_eq!(mask_api_key("https://x/y?api_key=RGAPI-secret"), "https://x/y?api_key=*");
		assert_eq!(mask_api_key("https://x/y?api_key=abc&page=2"), "https://x/y?api_key=*&page=2");
		assert_eq!(
			mask_api_key("https://x/y?a=1&api_key=abc&api_key=def"),
			"https://x/y?a=1&api_key=*&api_key=*"
		);
		assert_eq!(mask_api_key("https://x/y?page=2"), "https://x/y?page=2");
	}
}
