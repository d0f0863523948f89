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

//! Tabulation of one non-timeline match payload into nine row tables.

pub mod models;

use std::collections::BTreeMap;

use chrono::TimeZone;
use serde_json::Value;

use crate::{
	error::{ArchiveError, Result},
	parse::{drift, payload_match_id},
};

use self::models::{ChallengeValue, Info, Metadata, NonTimeline, Participant, PerkStyle};

/// Fields the analytic store keeps in `UInt8` columns; values are clamped to
/// 255 rather than widened.
const UINT8_CLAMP_MAX: u64 = 255;

const PERK_BIT_WIDTH: u32 = 14;

#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRow {
	pub match_id: String,
	pub data_version: String,
	pub participants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfoRow {
	pub end_of_game_result: String,
	pub game_creation: i64,
	pub game_duration: i64,
	pub game_end_timestamp: i64,
	pub match_id: i64,
	pub game_start_timestamp: i64,
	pub game_type: String,
	pub game_version: String,
	pub season: String,
	pub patch: String,
	pub sub_version: String,
	pub map_id: i64,
	pub platform_id: String,
	pub queue_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BanRow {
	pub match_id: i64,
	pub team_id: i64,
	pub pick_turn: i64,
	pub champion_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatRow {
	pub match_id: i64,
	pub team_id: i64,
	pub feat_type: &'static str,
	pub feat_state: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveRow {
	pub match_id: i64,
	pub team_id: i64,
	pub objective_type: &'static str,
	pub first: bool,
	pub kills: i64,
}

/// Per-participant scalar stats. Complex subtrees (missions, challenges,
/// perks) and arena-only fields are dropped; ping-style counters are clamped
/// to the store's `UInt8` range.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantStatsRow {
	pub match_id: i64,
	pub participant_id: i64,
	pub puuid: String,
	pub team_id: i64,

	pub summoner_id: String,
	pub summoner_level: i64,
	pub summoner_name: String,

	pub riot_id_game_name: String,
	pub riot_id_tagline: String,

	pub profile_icon: i64,

	pub champion_id: i64,
	pub champion_transform: i64,

	pub champ_level: i64,
	pub champ_experience: i64,

	pub team_position: String,

	pub win: bool,
	pub game_ended_in_early_surrender: bool,
	pub game_ended_in_surrender: bool,
	pub team_early_surrendered: bool,

	pub kills: i64,
	pub deaths: i64,
	pub assists: i64,

	pub double_kills: i64,
	pub triple_kills: i64,
	pub quadra_kills: i64,
	pub penta_kills: i64,

	pub killing_sprees: i64,
	pub largest_killing_spree: i64,
	pub largest_multi_kill: i64,
	pub largest_critical_strike: i64,

	pub first_blood_kill: bool,
	pub first_blood_assist: bool,
	pub first_tower_kill: bool,
	pub first_tower_assist: bool,

	pub gold_earned: i64,
	pub gold_spent: i64,
	pub consumables_purchased: i64,
	pub items_purchased: i64,

	pub item0: i64,
	pub item1: i64,
	pub item2: i64,
	pub item3: i64,
	pub item4: i64,
	pub item5: i64,
	pub item6: i64,

	pub total_damage_dealt: i64,
	pub total_damage_dealt_to_champions: i64,
	pub physical_damage_dealt: i64,
	pub physical_damage_dealt_to_champions: i64,
	pub magic_damage_dealt: i64,
	pub magic_damage_dealt_to_champions: i64,
	pub true_damage_dealt: i64,
	pub true_damage_dealt_to_champions: i64,

	pub damage_dealt_to_buildings: i64,
	pub damage_dealt_to_turrets: i64,
	pub damage_dealt_to_objectives: i64,
	pub damage_dealt_to_epic_monsters: Option<i64>,

	pub total_damage_taken: i64,
	pub physical_damage_taken: i64,
	pub magic_damage_taken: i64,
	pub true_damage_taken: i64,

	pub damage_self_mitigated: i64,

	pub total_heal: i64,
	pub total_heals_on_teammates: i64,
	pub total_units_healed: i64,

	pub total_damage_shielded_on_teammates: i64,

	pub time_ccing_others: i64,
	pub total_time_cc_dealt: i64,

	pub total_minions_killed: i64,
	pub neutral_minions_killed: i64,
	pub total_ally_jungle_minions_killed: i64,
	pub total_enemy_jungle_minions_killed: i64,

	pub baron_kills: i64,
	pub dragon_kills: i64,

	pub inhibitor_kills: i64,
	pub inhibitor_takedowns: i64,
	pub inhibitors_lost: i64,

	pub turret_kills: i64,
	pub turret_takedowns: i64,
	pub turrets_lost: i64,

	pub objectives_stolen: i64,
	pub objectives_stolen_assists: i64,

	pub vision_score: i16,
	pub wards_placed: i16,
	pub wards_killed: i16,
	pub detector_wards_placed: i64,
	pub sight_wards_bought_in_game: i64,
	pub vision_wards_bought_in_game: i64,
	pub vision_cleared_pings: i16,

	pub summoner1_id: i64,
	pub summoner2_id: i64,
	pub summoner1_casts: i64,
	pub summoner2_casts: i64,

	pub spell1_casts: i64,
	pub spell2_casts: i64,
	pub spell3_casts: i64,
	pub spell4_casts: i64,

	pub role_bound_item: Option<i64>,
	pub bounty_level: Option<i64>,

	pub time_played: i64,
	pub total_time_spent_dead: i64,
	pub longest_time_spent_living: i64,

	pub all_in_pings: i16,
	pub assist_me_pings: i16,
	pub basic_pings: i16,
	pub command_pings: i16,
	pub danger_pings: i16,
	pub enemy_missing_pings: i16,
	pub enemy_vision_pings: i16,
	pub get_back_pings: i16,
	pub hold_pings: i16,
	pub need_vision_pings: i16,
	pub on_my_way_pings: i16,
	pub push_pings: i16,
	pub retreat_pings: Option<i16>,

	pub unreal_kills: i16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChallengesRow {
	pub match_id: i64,
	pub team_id: i64,
	pub puuid: String,
	pub payload: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerkValuesRow {
	pub match_id: i64,
	pub team_id: i64,
	pub puuid: String,

	pub primary_var1_1: i64,
	pub primary_var2_1: i64,
	pub primary_var3_1: i64,
	pub primary_var1_2: i64,
	pub primary_var2_2: i64,
	pub primary_var3_2: i64,
	pub primary_var1_3: i64,
	pub primary_var2_3: i64,
	pub primary_var3_3: i64,
	pub primary_var1_4: i64,
	pub primary_var2_4: i64,
	pub primary_var3_4: i64,

	pub sub_var1_1: i64,
	pub sub_var2_1: i64,
	pub sub_var3_1: i64,
	pub sub_var1_2: i64,
	pub sub_var2_2: i64,
	pub sub_var3_2: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerkIdsRow {
	pub match_id: i64,
	pub team_id: i64,
	pub puuid: String,

	pub stat_defense: i64,
	pub stat_flex: i64,
	pub stat_offense: i64,

	pub primary_style: i64,
	pub sub_style: i64,

	pub primary_perk_1: i64,
	pub primary_perk_2: i64,
	pub primary_perk_3: i64,
	pub primary_perk_4: i64,

	pub sub_perk_1: i64,
	pub sub_perk_2: i64,
	/// Σ perk_id << (14·index) over the six selected perks; 84 bits wide.
	pub perk_combo_key: u128,
}

/// All nine table slices produced from one match.
#[derive(Debug, Clone, Default)]
pub struct NonTimelineTables {
	pub metadata: Vec<MetadataRow>,
	pub game_info: Vec<InfoRow>,
	pub bans: Vec<BanRow>,
	pub feats: Vec<FeatRow>,
	pub objectives: Vec<ObjectiveRow>,
	pub participant_stats: Vec<ParticipantStatsRow>,
	pub participant_challenges: Vec<ChallengesRow>,
	pub participant_perk_values: Vec<PerkValuesRow>,
	pub participant_perk_ids: Vec<PerkIdsRow>,
}

impl NonTimelineTables {
	pub fn is_empty(&self) -> bool {
		self.metadata.is_empty()
			&& self.game_info.is_empty()
			&& self.bans.is_empty()
			&& self.feats.is_empty()
			&& self.objectives.is_empty()
			&& self.participant_stats.is_empty()
			&& self.participant_challenges.is_empty()
			&& self.participant_perk_values.is_empty()
			&& self.participant_perk_ids.is_empty()
	}
}

/// Parser for non-timeline payloads. With `strict` off (the default while
/// upstream schemas are still settling), validation failures log and yield an
/// empty table set instead of raising.
// TODO: flip strict_schema on once drift reports quiet down.
#[derive(Debug, Clone)]
pub struct NonTimelineParser {
	strict: bool,
}

impl NonTimelineParser {
	pub fn new(strict: bool) -> Self {
		Self { strict }
	}

	pub fn run(&self, raw: &Value) -> Result<NonTimelineTables> {
		let match_id = payload_match_id(raw);
		let date = drift_date(raw);
		drift::scan_non_timeline(raw, &match_id, &date);

		match tabulate(raw) {
			Ok(tables) => Ok(tables),
			Err(e) if !self.strict => {
				log::warn!("schema validation failed non_timeline match_id={} date={} error={}", match_id, date, e);
				log::warn!("skipping non_timeline payload for match_id={} during initial schema tuning", match_id);
				Ok(NonTimelineTables::default())
			}
			Err(e) => Err(e),
		}
	}
}

/// Drift reports are bucketed by the match's creation date when available.
fn drift_date(raw: &Value) -> String {
	let game_creation = raw
		.get("info")
		.and_then(|info| info.get("gameCreation"))
		.and_then(Value::as_i64)
		.unwrap_or_default();
	if game_creation > 0 {
		if let chrono::LocalResult::Single(dt) = chrono::Utc.timestamp_millis_opt(game_creation) {
			return dt.date_naive().to_string();
		}
	}
	crate::parse::drift_date_today()
}

fn tabulate(raw: &Value) -> Result<NonTimelineTables> {
	let validated: NonTimeline = serde_json::from_value(raw.clone())?;
	let metadata = &validated.metadata;
	let info = &validated.info;
	let match_id = info.game_id as i64;

	Ok(NonTimelineTables {
		metadata: metadata_rows(metadata),
		game_info: info_rows(info),
		bans: ban_rows(info, match_id),
		feats: feat_rows(info, match_id),
		objectives: objective_rows(info, match_id),
		participant_stats: participant_stats_rows(&info.participants, match_id),
		participant_challenges: challenges_rows(&info.participants, match_id),
		participant_perk_values: perk_values_rows(&info.participants, match_id)?,
		participant_perk_ids: perk_ids_rows(&info.participants, match_id)?,
	})
}

fn metadata_rows(metadata: &Metadata) -> Vec<MetadataRow> {
	vec![MetadataRow {
		match_id: metadata.match_id.clone(),
		data_version: metadata.data_version.clone(),
		participants: metadata.participants.clone(),
	}]
}

fn info_rows(info: &Info) -> Vec<InfoRow> {
	let parts: Vec<&str> = info.game_version.split('.').collect();
	let (season, patch, sub_version) = if parts.len() >= 3 {
		(parts[0].to_string(), parts[1].to_string(), parts[2..].join("."))
	} else {
		log::warn!("unexpected game version format match_id={} gameVersion={:?}", info.game_id, info.game_version);
		("unknown".to_string(), "unknown".to_string(), "unknown".to_string())
	};

	vec![InfoRow {
		end_of_game_result: info.end_of_game_result.clone(),
		game_creation: info.game_creation as i64,
		game_duration: info.game_duration as i64,
		game_end_timestamp: info.game_end_timestamp as i64,
		match_id: info.game_id as i64,
		game_start_timestamp: info.game_start_timestamp as i64,
		game_type: info.game_type.clone(),
		game_version: info.game_version.clone(),
		season,
		patch,
		sub_version,
		map_id: info.map_id as i64,
		platform_id: info.platform_id.clone(),
		queue_id: info.queue_id as i64,
	}]
}

fn ban_rows(info: &Info, match_id: i64) -> Vec<BanRow> {
	let mut rows = Vec::new();
	for team in &info.teams {
		for ban in &team.bans {
			rows.push(BanRow {
				match_id,
				team_id: team.team_id as i64,
				pick_turn: ban.pick_turn as i64,
				champion_id: ban.champion_id,
			});
		}
	}
	rows
}

fn feat_rows(info: &Info, match_id: i64) -> Vec<FeatRow> {
	let mut rows = Vec::new();
	for team in &info.teams {
		let Some(feats) = &team.feats else { continue };
		for (feat_type, feat_state) in feats.entries() {
			rows.push(FeatRow { match_id, team_id: team.team_id as i64, feat_type, feat_state: feat_state as i64 });
		}
	}
	rows
}

fn objective_rows(info: &Info, match_id: i64) -> Vec<ObjectiveRow> {
	let mut rows = Vec::new();
	for team in &info.teams {
		let Some(objectives) = &team.objectives else { continue };
		for (objective_type, stat) in objectives.entries() {
			rows.push(ObjectiveRow {
				match_id,
				team_id: team.team_id as i64,
				objective_type,
				first: stat.first,
				kills: stat.kills as i64,
			});
		}
	}
	rows
}

fn clamp_u8(value: u64) -> i16 {
	value.min(UINT8_CLAMP_MAX) as i16
}

fn participant_stats_rows(participants: &[Participant], match_id: i64) -> Vec<ParticipantStatsRow> {
	participants
		.iter()
		.map(|p| ParticipantStatsRow {
			match_id,
			participant_id: p.participant_id as i64,
			puuid: p.puuid.clone(),
			team_id: p.team_id as i64,
			summoner_id: p.summoner_id.clone(),
			summoner_level: p.summoner_level as i64,
			summoner_name: p.summoner_name.clone(),
			riot_id_game_name: p.riot_id_game_name.clone(),
			riot_id_tagline: p.riot_id_tagline.clone(),
			profile_icon: p.profile_icon as i64,
			champion_id: p.champion_id as i64,
			champion_transform: p.champion_transform as i64,
			champ_level: p.champ_level as i64,
			champ_experience: p.champ_experience as i64,
			team_position: p.team_position.clone(),
			win: p.win,
			game_ended_in_early_surrender: p.game_ended_in_early_surrender,
			game_ended_in_surrender: p.game_ended_in_surrender,
			team_early_surrendered: p.team_early_surrendered,
			kills: p.kills as i64,
			deaths: p.deaths as i64,
			assists: p.assists as i64,
			double_kills: p.double_kills as i64,
			triple_kills: p.triple_kills as i64,
			quadra_kills: p.quadra_kills as i64,
			penta_kills: p.penta_kills as i64,
			killing_sprees: p.killing_sprees as i64,
			largest_killing_spree: p.largest_killing_spree as i64,
			largest_multi_kill: p.largest_multi_kill as i64,
			largest_critical_strike: p.largest_critical_strike as i64,
			first_blood_kill: p.first_blood_kill,
			first_blood_assist: p.first_blood_assist,
			first_tower_kill: p.first_tower_kill,
			first_tower_assist: p.first_tower_assist,
			gold_earned: p.gold_earned as i64,
			gold_spent: p.gold_spent as i64,
			consumables_purchased: p.consumables_purchased as i64,
			items_purchased: p.items_purchased as i64,
			item0: p.item0 as i64,
			item1: p.item1 as i64,
			item2: p.item2 as i64,
			item3: p.item3 as i64,
			item4: p.item4 as i64,
			item5: p.item5 as i64,
			item6: p.item6 as i64,
			total_damage_dealt: p.total_damage_dealt as i64,
			total_damage_dealt_to_champions: p.total_damage_dealt_to_champions as i64,
			physical_damage_dealt: p.physical_damage_dealt as i64,
			physical_damage_dealt_to_champions: p.physical_damage_dealt_to_champions as i64,
			magic_damage_dealt: p.magic_damage_dealt as i64,
			magic_damage_dealt_to_champions: p.magic_damage_dealt_to_champions as i64,
			true_damage_dealt: p.true_damage_dealt as i64,
			true_damage_dealt_to_champions: p.true_damage_dealt_to_champions as i64,
			damage_dealt_to_buildings: p.damage_dealt_to_buildings as i64,
			damage_dealt_to_turrets: p.damage_dealt_to_turrets as i64,
			damage_dealt_to_objectives: p.damage_dealt_to_objectives as i64,
			damage_dealt_to_epic_monsters: p.damage_dealt_to_epic_monsters,
			total_damage_taken: p.total_damage_taken as i64,
			physical_damage_taken: p.physical_damage_taken as i64,
			magic_damage_taken: p.magic_damage_taken as i64,
			true_damage_taken: p.true_damage_taken as i64,
			damage_self_mitigated: p.damage_self_mitigated as i64,
			total_heal: p.total_heal as i64,
			total_heals_on_teammates: p.total_heals_on_teammates as i64,
			total_units_healed: p.total_units_healed as i64,
			total_damage_shielded_on_teammates: p.total_damage_shielded_on_teammates as i64,
			time_ccing_others: p.time_c_cing_others as i64,
			total_time_cc_dealt: p.total_time_c_c_dealt as i64,
			total_minions_killed: p.total_minions_killed as i64,
			neutral_minions_killed: p.neutral_minions_killed as i64,
			total_ally_jungle_minions_killed: p.total_ally_jungle_minions_killed as i64,
			total_enemy_jungle_minions_killed: p.total_enemy_jungle_minions_killed as i64,
			baron_kills: p.baron_kills as i64,
			dragon_kills: p.dragon_kills as i64,
			inhibitor_kills: p.inhibitor_kills as i64,
			inhibitor_takedowns: p.inhibitor_takedowns as i64,
			inhibitors_lost: p.inhibitors_lost as i64,
			turret_kills: p.turret_kills as i64,
			turret_takedowns: p.turret_takedowns as i64,
			turrets_lost: p.turrets_lost as i64,
			objectives_stolen: p.objectives_stolen as i64,
			objectives_stolen_assists: p.objectives_stolen_assists as i64,
			vision_score: clamp_u8(p.vision_score),
			wards_placed: clamp_u8(p.wards_placed),
			wards_killed: clamp_u8(p.wards_killed),
			detector_wards_placed: p.detector_wards_placed as i64,
			sight_wards_bought_in_game: p.sight_wards_bought_in_game as i64,
			vision_wards_bought_in_game: p.vision_wards_bought_in_game as i64,
			vision_cleared_pings: clamp_u8(p.vision_cleared_pings),
			summoner1_id: p.summoner1_id as i64,
			summoner2_id: p.summoner2_id as i64,
			summoner1_casts: p.summoner1_casts as i64,
			summoner2_casts: p.summoner2_casts as i64,
			spell1_casts: p.spell1_casts as i64,
			spell2_casts: p.spell2_casts as i64,
			spell3_casts: p.spell3_casts as i64,
			spell4_casts: p.spell4_casts as i64,
			role_bound_item: p.role_bound_item,
			bounty_level: p.bounty_level,
			time_played: p.time_played as i64,
			total_time_spent_dead: p.total_time_spent_dead as i64,
			longest_time_spent_living: p.longest_time_spent_living as i64,
			all_in_pings: clamp_u8(p.all_in_pings),
			assist_me_pings: clamp_u8(p.assist_me_pings),
			basic_pings: clamp_u8(p.basic_pings),
			command_pings: clamp_u8(p.command_pings),
			danger_pings: clamp_u8(p.danger_pings),
			enemy_missing_pings: clamp_u8(p.enemy_missing_pings),
			enemy_vision_pings: clamp_u8(p.enemy_vision_pings),
			get_back_pings: clamp_u8(p.get_back_pings),
			hold_pings: clamp_u8(p.hold_pings),
			need_vision_pings: clamp_u8(p.need_vision_pings),
			on_my_way_pings: clamp_u8(p.on_my_way_pings),
			push_pings: clamp_u8(p.push_pings),
			retreat_pings: p.retreat_pings.map(clamp_u8),
			unreal_kills: clamp_u8(p.unreal_kills),
		})
		.collect()
}

fn challenges_rows(participants: &[Participant], match_id: i64) -> Vec<ChallengesRow> {
	participants
		.iter()
		.map(|p| {
			let payload = p
				.challenges
				.0
				.iter()
				.filter(|(key, value)| !key.starts_with("SWARM") && !matches!(value, ChallengeValue::Null))
				.map(|(key, value)| (key.clone(), value.to_json()))
				.collect();
			ChallengesRow { match_id, team_id: p.team_id as i64, puuid: p.puuid.clone(), payload }
		})
		.collect()
}

struct SelectedStyles<'a> {
	primary: &'a PerkStyle,
	sub: &'a PerkStyle,
}

fn selected_styles(p: &Participant) -> Result<SelectedStyles<'_>> {
	let find = |description: &str| {
		p.perks.styles.iter().find(|s| s.description == description).ok_or_else(|| {
			ArchiveError::Validation(format!("participant {} has no {} perk style", p.puuid, description))
		})
	};
	Ok(SelectedStyles { primary: find("primaryStyle")?, sub: find("subStyle")? })
}

fn selection_var(style: &PerkStyle, index: usize, var: u8) -> i64 {
	style
		.selections
		.get(index)
		.map(|sel| match var {
			1 => sel.var1,
			2 => sel.var2,
			_ => sel.var3,
		})
		.unwrap_or_default() as i64
}

fn perk_values_rows(participants: &[Participant], match_id: i64) -> Result<Vec<PerkValuesRow>> {
	participants
		.iter()
		.map(|p| {
			let styles = selected_styles(p)?;
			Ok(PerkValuesRow {
				match_id,
				team_id: p.team_id as i64,
				puuid: p.puuid.clone(),
				primary_var1_1: selection_var(styles.primary, 0, 1),
				primary_var2_1: selection_var(styles.primary, 0, 2),
				primary_var3_1: selection_var(styles.primary, 0, 3),
				primary_var1_2: selection_var(styles.primary, 1, 1),
				primary_var2_2: selection_var(styles.primary, 1, 2),
				primary_var3_2: selection_var(styles.primary, 1, 3),
				primary_var1_3: selection_var(styles.primary, 2, 1),
				primary_var2_3: selection_var(styles.primary, 2, 2),
				primary_var3_3: selection_var(styles.primary, 2, 3),
				primary_var1_4: selection_var(styles.primary, 3, 1),
				primary_var2_4: selection_var(styles.primary, 3, 2),
				primary_var3_4: selection_var(styles.primary, 3, 3),
				sub_var1_1: selection_var(styles.sub, 0, 1),
				sub_var2_1: selection_var(styles.sub, 0, 2),
				sub_var3_1: selection_var(styles.sub, 0, 3),
				sub_var1_2: selection_var(styles.sub, 1, 1),
				sub_var2_2: selection_var(styles.sub, 1, 2),
				sub_var3_2: selection_var(styles.sub, 1, 3),
			})
		})
		.collect()
}

fn perk_ids_rows(participants: &[Participant], match_id: i64) -> Result<Vec<PerkIdsRow>> {
	participants
		.iter()
		.map(|p| {
			let styles = selected_styles(p)?;
			let selected: Vec<u64> = styles
				.primary
				.selections
				.iter()
				.chain(styles.sub.selections.iter())
				.map(|sel| sel.perk)
				.collect();
			let perk_combo_key = selected
				.iter()
				.enumerate()
				.map(|(index, perk)| (*perk as u128) << (PERK_BIT_WIDTH * index as u32))
				.sum();

			let perk_at = |style: &PerkStyle, index: usize| {
				style.selections.get(index).map(|sel| sel.perk as i64).unwrap_or_default()
			};

			Ok(PerkIdsRow {
				match_id,
				team_id: p.team_id as i64,
				puuid: p.puuid.clone(),
				stat_defense: p.perks.stat_perks.defense as i64,
				stat_flex: p.perks.stat_perks.flex as i64,
				stat_offense: p.perks.stat_perks.offense as i64,
				primary_style: styles.primary.style as i64,
				sub_style: styles.sub.style as i64,
				primary_perk_1: perk_at(styles.primary, 0),
				primary_perk_2: perk_at(styles.primary, 1),
				primary_perk_3: perk_at(styles.primary, 2),
				primary_perk_4: perk_at(styles.primary, 3),
				sub_perk_1: perk_at(styles.sub, 0),
				sub_perk_2: perk_at(styles.sub, 1),
				perk_combo_key,
			})
		})
		.collect()
}
