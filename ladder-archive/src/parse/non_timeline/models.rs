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

//! Typed schema of the non-timeline match payload. Models that reject
//! unknown keys mirror where the upstream schema is pinned down; the drift
//! scan reports the same keys without rejecting, so a failing payload still
//! leaves a structured trace.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Open-ended challenge values: null, bool, number, string or a number list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChallengeValue {
	Bool(bool),
	UInt(u64),
	Float(f64),
	Text(String),
	UIntList(Vec<u64>),
	FloatList(Vec<f64>),
	Null,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Metadata {
	pub data_version: String,
	pub match_id: String,
	pub participants: Vec<String>,
}

/// Open key/value map; key filtering happens at tabulation time.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct Challenges(pub BTreeMap<String, ChallengeValue>);

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Missions {
	pub player_score0: u64,
	pub player_score1: u64,
	pub player_score2: u64,
	pub player_score3: u64,
	pub player_score4: u64,
	pub player_score5: u64,
	pub player_score6: u64,
	pub player_score7: u64,
	pub player_score8: u64,
	pub player_score9: u64,
	pub player_score10: u64,
	pub player_score11: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatPerks {
	pub defense: u64,
	pub flex: u64,
	pub offense: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PerkSelection {
	pub perk: u64,
	pub var1: u64,
	pub var2: u64,
	pub var3: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PerkStyle {
	pub description: String,
	pub selections: Vec<PerkSelection>,
	pub style: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Perks {
	pub stat_perks: StatPerks,
	pub styles: Vec<PerkStyle>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Participant {
	#[serde(rename = "PlayerScore0")]
	pub player_score0: u64,
	#[serde(rename = "PlayerScore1")]
	pub player_score1: u64,
	#[serde(rename = "PlayerScore2")]
	pub player_score2: u64,
	#[serde(rename = "PlayerScore3")]
	pub player_score3: u64,
	#[serde(rename = "PlayerScore4")]
	pub player_score4: u64,
	#[serde(rename = "PlayerScore5")]
	pub player_score5: u64,
	#[serde(rename = "PlayerScore6")]
	pub player_score6: u64,
	#[serde(rename = "PlayerScore7")]
	pub player_score7: u64,
	#[serde(rename = "PlayerScore8")]
	pub player_score8: u64,
	#[serde(rename = "PlayerScore9")]
	pub player_score9: u64,
	#[serde(rename = "PlayerScore10")]
	pub player_score10: u64,
	#[serde(rename = "PlayerScore11")]
	pub player_score11: u64,
	pub all_in_pings: u64,
	pub assist_me_pings: u64,
	pub assists: u64,
	pub baron_kills: u64,
	pub basic_pings: u64,
	#[serde(default)]
	pub bounty_level: Option<i64>,
	pub challenges: Challenges,
	pub champ_experience: u64,
	pub champ_level: u64,
	pub champion_id: u64,
	pub champion_name: String,
	pub champion_transform: u64,
	pub command_pings: u64,
	pub consumables_purchased: u64,
	pub damage_dealt_to_buildings: u64,
	#[serde(default)]
	pub damage_dealt_to_epic_monsters: Option<i64>,
	pub damage_dealt_to_objectives: u64,
	pub damage_dealt_to_turrets: u64,
	pub damage_self_mitigated: u64,
	pub danger_pings: u64,
	pub deaths: u64,
	pub detector_wards_placed: u64,
	pub double_kills: u64,
	pub dragon_kills: u64,
	pub eligible_for_progression: bool,
	pub enemy_missing_pings: u64,
	pub enemy_vision_pings: u64,
	pub first_blood_assist: bool,
	pub first_blood_kill: bool,
	pub first_tower_assist: bool,
	pub first_tower_kill: bool,
	pub game_ended_in_early_surrender: bool,
	pub game_ended_in_surrender: bool,
	pub get_back_pings: u64,
	pub gold_earned: u64,
	pub gold_spent: u64,
	pub hold_pings: u64,
	pub individual_position: String,
	pub inhibitor_kills: u64,
	pub inhibitor_takedowns: u64,
	pub inhibitors_lost: u64,
	pub item0: u64,
	pub item1: u64,
	pub item2: u64,
	pub item3: u64,
	pub item4: u64,
	pub item5: u64,
	pub item6: u64,
	pub items_purchased: u64,
	pub killing_sprees: u64,
	pub kills: u64,
	pub lane: String,
	pub largest_critical_strike: u64,
	pub largest_killing_spree: u64,
	pub largest_multi_kill: u64,
	pub longest_time_spent_living: u64,
	pub magic_damage_dealt: u64,
	pub magic_damage_dealt_to_champions: u64,
	pub magic_damage_taken: u64,
	pub missions: Missions,
	pub need_vision_pings: u64,
	pub neutral_minions_killed: u64,
	pub nexus_kills: u64,
	pub nexus_lost: u64,
	pub nexus_takedowns: u64,
	pub objectives_stolen: u64,
	pub objectives_stolen_assists: u64,
	pub on_my_way_pings: u64,
	pub participant_id: u64,
	pub penta_kills: u64,
	pub perks: Perks,
	pub physical_damage_dealt: u64,
	pub physical_damage_dealt_to_champions: u64,
	pub physical_damage_taken: u64,
	pub placement: u64,
	pub player_augment1: u64,
	pub player_augment2: u64,
	pub player_augment3: u64,
	pub player_augment4: u64,
	pub player_augment5: u64,
	pub player_augment6: u64,
	pub player_subteam_id: u64,
	pub profile_icon: u64,
	pub push_pings: u64,
	pub puuid: String,
	pub quadra_kills: u64,
	#[serde(default)]
	pub retreat_pings: Option<u64>,
	pub riot_id_game_name: String,
	pub riot_id_tagline: String,
	#[serde(default)]
	pub role: Option<String>,
	#[serde(default)]
	pub role_bound_item: Option<i64>,
	pub sight_wards_bought_in_game: u64,
	pub spell1_casts: u64,
	pub spell2_casts: u64,
	pub spell3_casts: u64,
	pub spell4_casts: u64,
	pub subteam_placement: u64,
	pub summoner1_casts: u64,
	pub summoner1_id: u64,
	pub summoner2_casts: u64,
	pub summoner2_id: u64,
	pub summoner_id: String,
	pub summoner_level: u64,
	pub summoner_name: String,
	pub team_early_surrendered: bool,
	pub team_id: u64,
	pub team_position: String,
	pub time_c_cing_others: u64,
	pub time_played: u64,
	pub total_ally_jungle_minions_killed: u64,
	pub total_damage_dealt: u64,
	pub total_damage_dealt_to_champions: u64,
	pub total_damage_shielded_on_teammates: u64,
	pub total_damage_taken: u64,
	pub total_enemy_jungle_minions_killed: u64,
	pub total_heal: u64,
	pub total_heals_on_teammates: u64,
	pub total_minions_killed: u64,
	pub total_time_c_c_dealt: u64,
	pub total_time_spent_dead: u64,
	pub total_units_healed: u64,
	pub triple_kills: u64,
	pub true_damage_dealt: u64,
	pub true_damage_dealt_to_champions: u64,
	pub true_damage_taken: u64,
	pub turret_kills: u64,
	pub turret_takedowns: u64,
	pub turrets_lost: u64,
	pub unreal_kills: u64,
	pub vision_cleared_pings: u64,
	pub vision_score: u64,
	pub vision_wards_bought_in_game: u64,
	pub wards_killed: u64,
	pub wards_placed: u64,
	pub win: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct FeatState {
	pub feat_state: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Feats {
	#[serde(rename = "EPIC_MONSTER_KILL")]
	pub epic_monster_kill: FeatState,
	#[serde(rename = "FIRST_BLOOD")]
	pub first_blood: FeatState,
	#[serde(rename = "FIRST_TURRET")]
	pub first_turret: FeatState,
}

impl Feats {
	/// (feat type, feat state) in declaration order.
	pub fn entries(&self) -> [(&'static str, u64); 3] {
		[
			("EPIC_MONSTER_KILL", self.epic_monster_kill.feat_state),
			("FIRST_BLOOD", self.first_blood.feat_state),
			("FIRST_TURRET", self.first_turret.feat_state),
		]
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Ban {
	pub champion_id: i64,
	pub pick_turn: u64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectiveStat {
	pub first: bool,
	pub kills: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Objectives {
	#[serde(default)]
	pub atakhan: Option<ObjectiveStat>,
	pub baron: ObjectiveStat,
	pub champion: ObjectiveStat,
	pub dragon: ObjectiveStat,
	pub horde: ObjectiveStat,
	pub inhibitor: ObjectiveStat,
	pub rift_herald: ObjectiveStat,
	pub tower: ObjectiveStat,
}

impl Objectives {
	/// The objective types that get tabulated, in a fixed order.
	pub fn entries(&self) -> [(&'static str, ObjectiveStat); 7] {
		[
			("baron", self.baron),
			("champion", self.champion),
			("dragon", self.dragon),
			("horde", self.horde),
			("inhibitor", self.inhibitor),
			("riftHerald", self.rift_herald),
			("tower", self.tower),
		]
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Team {
	pub bans: Vec<Ban>,
	#[serde(default)]
	pub feats: Option<Feats>,
	#[serde(default)]
	pub objectives: Option<Objectives>,
	pub team_id: u64,
	pub win: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Info {
	pub end_of_game_result: String,
	pub game_creation: u64,
	pub game_duration: u64,
	pub game_end_timestamp: u64,
	pub game_id: u64,
	pub game_mode: String,
	pub game_name: String,
	pub game_start_timestamp: u64,
	pub game_type: String,
	pub game_version: String,
	pub map_id: u64,
	pub participants: Vec<Participant>,
	pub platform_id: String,
	pub queue_id: u64,
	pub teams: Vec<Team>,
	pub tournament_code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NonTimeline {
	pub metadata: Metadata,
	pub info: Info,
}

impl ChallengeValue {
	pub fn to_json(&self) -> Value {
		serde_json::to_value(self).unwrap_or(Value::Null)
	}
}
