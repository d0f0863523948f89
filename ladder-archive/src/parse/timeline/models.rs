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

//! Typed schema of the timeline payload. Frames keep their events as raw
//! objects; [`TimelineEvent`] is the discriminated view over them, with one
//! typed payload per rich tag and a catch-all carrying the open map.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::Result;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Position {
	pub x: i64,
	pub y: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ChampionStats {
	pub ability_haste: u64,
	pub ability_power: u64,
	pub armor: i64,
	pub armor_pen: u64,
	pub armor_pen_percent: u64,
	pub attack_damage: i64,
	pub attack_speed: u64,
	pub bonus_armor_pen_percent: u64,
	pub bonus_magic_pen_percent: u64,
	pub cc_reduction: i64,
	pub cooldown_reduction: u64,
	pub health: u64,
	pub health_max: u64,
	pub health_regen: u64,
	pub lifesteal: u64,
	pub magic_pen: u64,
	pub magic_pen_percent: u64,
	pub magic_resist: i64,
	pub movement_speed: u64,
	pub omnivamp: u64,
	pub physical_vamp: u64,
	pub power: u64,
	pub power_max: u64,
	pub power_regen: u64,
	pub spell_vamp: u64,
}

impl ChampionStats {
	/// The penetration/vamp stats ride along as an open map instead of
	/// dedicated columns.
	pub fn payload(&self) -> BTreeMap<String, u64> {
		BTreeMap::from([
			("armorPen".to_string(), self.armor_pen),
			("armorPenPercent".to_string(), self.armor_pen_percent),
			("bonusArmorPenPercent".to_string(), self.bonus_armor_pen_percent),
			("bonusMagicPenPercent".to_string(), self.bonus_magic_pen_percent),
			("magicPen".to_string(), self.magic_pen),
			("magicPenPercent".to_string(), self.magic_pen_percent),
			("lifesteal".to_string(), self.lifesteal),
			("omnivamp".to_string(), self.omnivamp),
			("physicalVamp".to_string(), self.physical_vamp),
			("spellVamp".to_string(), self.spell_vamp),
		])
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct DamageStats {
	pub magic_damage_done: u64,
	pub magic_damage_done_to_champions: u64,
	pub magic_damage_taken: u64,
	pub physical_damage_done: u64,
	pub physical_damage_done_to_champions: u64,
	pub physical_damage_taken: u64,
	pub total_damage_done: u64,
	pub total_damage_done_to_champions: u64,
	pub total_damage_taken: u64,
	pub true_damage_done: u64,
	pub true_damage_done_to_champions: u64,
	pub true_damage_taken: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ParticipantFrame {
	pub champion_stats: ChampionStats,
	pub current_gold: i64,
	pub damage_stats: DamageStats,
	pub gold_per_second: u64,
	pub jungle_minions_killed: u64,
	pub level: u64,
	pub minions_killed: u64,
	pub participant_id: i64,
	#[serde(default)]
	pub position: Option<Position>,
	pub time_enemy_spent_controlled: u64,
	pub total_gold: u64,
	pub xp: u64,
}

/// One timeline frame. Events stay raw here; they are classified per event
/// at tabulation time so unknown types degrade to the rare-event table
/// instead of failing the frame.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Frame {
	pub events: Vec<Map<String, Value>>,
	pub participant_frames: BTreeMap<String, ParticipantFrame>,
	pub timestamp: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct TimelineParticipant {
	pub participant_id: u64,
	pub puuid: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct TimelineInfo {
	pub end_of_game_result: String,
	pub frame_interval: u64,
	pub frames: Vec<Frame>,
	pub game_id: u64,
	pub participants: Vec<TimelineParticipant>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct TimelineMetadata {
	pub data_version: String,
	pub match_id: String,
	pub participants: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Timeline {
	pub metadata: TimelineMetadata,
	pub info: TimelineInfo,
}

/// One damage instance inside a champion kill.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageInstance {
	pub basic: bool,
	pub magic_damage: u64,
	pub name: String,
	pub participant_id: i64,
	pub physical_damage: u64,
	pub spell_name: String,
	pub spell_slot: i64,
	pub true_damage: u64,
	#[serde(rename = "type")]
	pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingKillEvent {
	pub timestamp: i64,
	pub bounty: u64,
	pub building_type: String,
	pub killer_id: i64,
	pub lane_type: String,
	pub position: Position,
	pub team_id: i64,
	#[serde(default)]
	pub tower_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionKillEvent {
	pub timestamp: i64,
	pub bounty: i64,
	pub kill_streak_length: i64,
	pub killer_id: i64,
	pub victim_id: i64,
	pub shutdown_bounty: i64,
	pub position: Position,
	#[serde(default)]
	pub victim_damage_dealt: Option<Vec<DamageInstance>>,
	#[serde(default)]
	pub victim_damage_received: Option<Vec<DamageInstance>>,
	/// Alias keys some payload revisions use for the same lists.
	#[serde(default)]
	pub victim_teamfight_damage_dealt: Option<Vec<DamageInstance>>,
	#[serde(default)]
	pub victim_teamfight_damage_received: Option<Vec<DamageInstance>>,
}

impl ChampionKillEvent {
	pub fn damage_dealt(&self) -> &[DamageInstance] {
		self.victim_damage_dealt
			.as_deref()
			.or(self.victim_teamfight_damage_dealt.as_deref())
			.unwrap_or_default()
	}

	pub fn damage_received(&self) -> &[DamageInstance] {
		self.victim_damage_received
			.as_deref()
			.or(self.victim_teamfight_damage_received.as_deref())
			.unwrap_or_default()
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionSpecialKillEvent {
	pub timestamp: i64,
	pub kill_type: String,
	pub killer_id: i64,
	pub position: Position,
	#[serde(default)]
	pub multi_kill_length: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragonSoulGivenEvent {
	pub timestamp: i64,
	pub name: String,
	pub team_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EliteMonsterKillEvent {
	pub timestamp: i64,
	#[serde(default)]
	pub assisting_participant_ids: Option<Vec<i64>>,
	pub bounty: i64,
	pub killer_id: i64,
	pub killer_team_id: i64,
	#[serde(default)]
	pub monster_sub_type: Option<String>,
	pub monster_type: String,
	pub position: Position,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurretPlateDestroyedEvent {
	pub timestamp: i64,
	pub killer_id: i64,
	pub lane_type: String,
	pub position: Position,
	pub team_id: i64,
}

/// Discriminated view over one raw event. Six tags get fully typed payloads;
/// everything else keeps its residual payload as an open map under its own
/// type label.
#[derive(Debug, Clone)]
pub enum TimelineEvent {
	BuildingKill(BuildingKillEvent),
	ChampionKill(ChampionKillEvent),
	ChampionSpecialKill(ChampionSpecialKillEvent),
	DragonSoulGiven(DragonSoulGivenEvent),
	EliteMonsterKill(EliteMonsterKillEvent),
	TurretPlateDestroyed(TurretPlateDestroyedEvent),
	Rare { kind: String, timestamp: i64, payload: Map<String, Value> },
}

/// Keys never copied into a rare-event payload.
const RARE_PAYLOAD_EXCLUDED: [&str; 4] = ["type", "timestamp", "matchId", "gameId"];

impl TimelineEvent {
	pub fn from_raw(raw: &Map<String, Value>) -> Result<TimelineEvent> {
		let kind = raw.get("type").and_then(Value::as_str).unwrap_or("UNKNOWN");
		let value = Value::Object(raw.clone());
		Ok(match kind {
			"BUILDING_KILL" => TimelineEvent::BuildingKill(serde_json::from_value(value)?),
			"CHAMPION_KILL" => TimelineEvent::ChampionKill(serde_json::from_value(value)?),
			"CHAMPION_SPECIAL_KILL" => TimelineEvent::ChampionSpecialKill(serde_json::from_value(value)?),
			"DRAGON_SOUL_GIVEN" => TimelineEvent::DragonSoulGiven(serde_json::from_value(value)?),
			"ELITE_MONSTER_KILL" => TimelineEvent::EliteMonsterKill(serde_json::from_value(value)?),
			"TURRET_PLATE_DESTROYED" => TimelineEvent::TurretPlateDestroyed(serde_json::from_value(value)?),
			other => {
				let payload: Map<String, Value> = raw
					.iter()
					.filter(|(key, _)| !RARE_PAYLOAD_EXCLUDED.contains(&key.as_str()))
					.map(|(key, value)| (key.clone(), value.clone()))
					.collect();
				TimelineEvent::Rare {
					kind: other.to_string(),
					timestamp: raw.get("timestamp").and_then(Value::as_i64).unwrap_or_default(),
					payload,
				}
			}
		})
	}
}
