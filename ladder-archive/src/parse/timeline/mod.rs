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

//! Tabulation of one timeline payload: per-frame participant stats, one row
//! table per rich event type, a rare-event table for everything else and two
//! champion-kill damage-instance tables.

pub mod models;

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::{
	error::Result,
	parse::{drift, drift_date_today, payload_match_id},
};

use self::models::{Frame, Timeline, TimelineEvent};

/// Raw frame timestamps are floored to 10s buckets to keep row cardinality
/// down; per-event timestamps stay exact.
const FRAME_BUCKET: i64 = 10_000;

pub fn frame_bucket(timestamp: i64) -> i64 {
	(timestamp / FRAME_BUCKET) * FRAME_BUCKET
}

/// Deterministic id tying damage-instance rows to their parent kill.
pub fn champion_kill_event_id(match_id: i64, timestamp: i64, killer_id: i64, victim_id: i64) -> String {
	format!("{}:{}:{}:{}", match_id, timestamp, killer_id, victim_id)
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameStatsRow {
	pub match_id: i64,
	pub frame_timestamp: i64,
	pub participant_id: i64,

	pub ability_haste: i64,
	pub ability_power: i64,
	pub armor: i64,
	pub attack_damage: i64,
	pub attack_speed: i64,
	pub cc_reduction: i64,
	pub cooldown_reduction: i64,
	pub health: i64,
	pub health_max: i64,
	pub health_regen: i64,
	pub magic_resist: i64,
	pub movement_speed: i64,
	pub power: i64,
	pub power_max: i64,
	pub power_regen: i64,
	pub payload: BTreeMap<String, u64>,

	pub current_gold: i64,

	pub magic_damage_done: i64,
	pub magic_damage_done_to_champions: i64,
	pub magic_damage_taken: i64,
	pub physical_damage_done: i64,
	pub physical_damage_done_to_champions: i64,
	pub physical_damage_taken: i64,
	pub total_damage_done: i64,
	pub total_damage_done_to_champions: i64,
	pub total_damage_taken: i64,
	pub true_damage_done: i64,
	pub true_damage_done_to_champions: i64,
	pub true_damage_taken: i64,

	pub gold_per_second: i64,
	pub jungle_minions_killed: i64,
	pub level: i64,
	pub minions_killed: i64,
	pub position_x: i64,
	pub position_y: i64,
	pub time_enemy_spent_controlled: i64,
	pub total_gold: i64,
	pub xp: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildingKillRow {
	pub match_id: i64,
	pub frame_timestamp: i64,
	pub timestamp: i64,
	pub bounty: i64,
	pub building_type: String,
	pub killer_id: i64,
	pub lane_type: String,
	pub position_x: i64,
	pub position_y: i64,
	pub team_id: i64,
	pub tower_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChampionKillRow {
	pub match_id: i64,
	pub frame_timestamp: i64,
	pub timestamp: i64,
	pub champion_kill_event_id: String,
	pub killer_id: i64,
	pub victim_id: i64,
	pub bounty: i64,
	pub kill_streak_length: i64,
	pub shutdown_bounty: i64,
	pub position_x: i64,
	pub position_y: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChampionSpecialKillRow {
	pub match_id: i64,
	pub frame_timestamp: i64,
	pub timestamp: i64,
	pub kill_type: String,
	pub killer_id: i64,
	pub position_x: i64,
	pub position_y: i64,
	pub multi_kill_length: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragonSoulGivenRow {
	pub match_id: i64,
	pub frame_timestamp: i64,
	pub timestamp: i64,
	pub name: String,
	pub team_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EliteMonsterKillRow {
	pub match_id: i64,
	pub frame_timestamp: i64,
	pub timestamp: i64,
	pub assisting_participant_ids: Vec<i64>,
	pub bounty: i64,
	pub killer_id: i64,
	pub killer_team_id: i64,
	pub monster_sub_type: Option<String>,
	pub monster_type: String,
	pub position_x: i64,
	pub position_y: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurretPlateDestroyedRow {
	pub match_id: i64,
	pub frame_timestamp: i64,
	pub timestamp: i64,
	pub killer_id: i64,
	pub lane_type: String,
	pub position_x: i64,
	pub position_y: i64,
	pub team_id: i64,
}

/// Any event outside the rich set, payload preserved as an open map.
#[derive(Debug, Clone, PartialEq)]
pub struct RareEventRow {
	pub match_id: i64,
	pub frame_timestamp: i64,
	pub event_type: String,
	pub timestamp: i64,
	pub payload: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DamageInstanceRow {
	pub match_id: i64,
	pub frame_timestamp: i64,
	pub timestamp: i64,
	pub champion_kill_event_id: String,
	pub direction: &'static str,
	pub idx: i64,

	pub basic: bool,
	pub magic_damage: i64,
	pub name: String,
	pub participant_id: i64,
	pub physical_damage: i64,
	pub spell_name: String,
	pub spell_slot: i64,
	pub true_damage: i64,
	pub damage_type: String,
}

#[derive(Debug, Clone, Default)]
pub struct TimelineTables {
	pub participant_stats: Vec<FrameStatsRow>,
	pub building_kill: Vec<BuildingKillRow>,
	pub champion_kill: Vec<ChampionKillRow>,
	pub champion_special_kill: Vec<ChampionSpecialKillRow>,
	pub dragon_soul_given: Vec<DragonSoulGivenRow>,
	pub elite_monster_kill: Vec<EliteMonsterKillRow>,
	pub rare_events: Vec<RareEventRow>,
	pub turret_plate_destroyed: Vec<TurretPlateDestroyedRow>,
	pub ck_victim_damage_dealt: Vec<DamageInstanceRow>,
	pub ck_victim_damage_received: Vec<DamageInstanceRow>,
}

impl TimelineTables {
	pub fn is_empty(&self) -> bool {
		self.participant_stats.is_empty()
			&& self.building_kill.is_empty()
			&& self.champion_kill.is_empty()
			&& self.champion_special_kill.is_empty()
			&& self.dragon_soul_given.is_empty()
			&& self.elite_monster_kill.is_empty()
			&& self.rare_events.is_empty()
			&& self.turret_plate_destroyed.is_empty()
			&& self.ck_victim_damage_dealt.is_empty()
			&& self.ck_victim_damage_received.is_empty()
	}
}

/// Parser for timeline payloads, with the same soft-fail toggle as the
/// non-timeline parser.
#[derive(Debug, Clone)]
pub struct TimelineParser {
	strict: bool,
}

impl TimelineParser {
	pub fn new(strict: bool) -> Self {
		Self { strict }
	}

	pub fn run(&self, raw: &Value) -> Result<TimelineTables> {
		let match_id = payload_match_id(raw);
		let date = drift_date_today();
		drift::scan_timeline(raw, &match_id, &date);

		match tabulate(raw) {
			Ok(tables) => Ok(tables),
			Err(e) if !self.strict => {
				log::warn!("schema validation failed timeline match_id={} date={} error={}", match_id, date, e);
				log::warn!("skipping timeline payload for match_id={} during initial schema tuning", match_id);
				Ok(TimelineTables::default())
			}
			Err(e) => Err(e),
		}
	}
}

fn tabulate(raw: &Value) -> Result<TimelineTables> {
	let validated: Timeline = serde_json::from_value(raw.clone())?;
	let match_id = validated.info.game_id as i64;
	let frames = &validated.info.frames;

	let mut tables = TimelineTables { participant_stats: frame_stats_rows(frames, match_id), ..Default::default() };

	for frame in frames {
		let frame_timestamp = frame_bucket(frame.timestamp);
		for raw_event in &frame.events {
			match TimelineEvent::from_raw(raw_event)? {
				TimelineEvent::BuildingKill(e) => tables.building_kill.push(BuildingKillRow {
					match_id,
					frame_timestamp,
					timestamp: e.timestamp,
					bounty: e.bounty as i64,
					building_type: e.building_type,
					killer_id: e.killer_id,
					lane_type: e.lane_type,
					position_x: e.position.x,
					position_y: e.position.y,
					team_id: e.team_id,
					tower_type: e.tower_type,
				}),
				TimelineEvent::ChampionKill(e) => {
					let id = champion_kill_event_id(match_id, e.timestamp, e.killer_id, e.victim_id);
					for (direction, instances, sink) in [
						("DEALT", e.damage_dealt(), &mut tables.ck_victim_damage_dealt),
						("RECEIVED", e.damage_received(), &mut tables.ck_victim_damage_received),
					] {
						for (idx, d) in instances.iter().enumerate() {
							sink.push(DamageInstanceRow {
								match_id,
								frame_timestamp,
								timestamp: e.timestamp,
								champion_kill_event_id: id.clone(),
								direction,
								idx: idx as i64,
								basic: d.basic,
								magic_damage: d.magic_damage as i64,
								name: d.name.clone(),
								participant_id: d.participant_id,
								physical_damage: d.physical_damage as i64,
								spell_name: d.spell_name.clone(),
								spell_slot: d.spell_slot,
								true_damage: d.true_damage as i64,
								damage_type: d.kind.clone(),
							});
						}
					}
					tables.champion_kill.push(ChampionKillRow {
						match_id,
						frame_timestamp,
						timestamp: e.timestamp,
						champion_kill_event_id: id,
						killer_id: e.killer_id,
						victim_id: e.victim_id,
						bounty: e.bounty,
						kill_streak_length: e.kill_streak_length,
						shutdown_bounty: e.shutdown_bounty,
						position_x: e.position.x,
						position_y: e.position.y,
					});
				}
				TimelineEvent::ChampionSpecialKill(e) => {
					tables.champion_special_kill.push(ChampionSpecialKillRow {
						match_id,
						frame_timestamp,
						timestamp: e.timestamp,
						kill_type: e.kill_type,
						killer_id: e.killer_id,
						position_x: e.position.x,
						position_y: e.position.y,
						multi_kill_length: e.multi_kill_length,
					})
				}
				TimelineEvent::DragonSoulGiven(e) => tables.dragon_soul_given.push(DragonSoulGivenRow {
					match_id,
					frame_timestamp,
					timestamp: e.timestamp,
					name: e.name,
					team_id: e.team_id,
				}),
				TimelineEvent::EliteMonsterKill(e) => tables.elite_monster_kill.push(EliteMonsterKillRow {
					match_id,
					frame_timestamp,
					timestamp: e.timestamp,
					assisting_participant_ids: e.assisting_participant_ids.unwrap_or_default(),
					bounty: e.bounty,
					killer_id: e.killer_id,
					killer_team_id: e.killer_team_id,
					monster_sub_type: e.monster_sub_type,
					monster_type: e.monster_type,
					position_x: e.position.x,
					position_y: e.position.y,
				}),
				TimelineEvent::TurretPlateDestroyed(e) => {
					tables.turret_plate_destroyed.push(TurretPlateDestroyedRow {
						match_id,
						frame_timestamp,
						timestamp: e.timestamp,
						killer_id: e.killer_id,
						lane_type: e.lane_type,
						position_x: e.position.x,
						position_y: e.position.y,
						team_id: e.team_id,
					})
				}
				TimelineEvent::Rare { kind, timestamp, payload } => tables.rare_events.push(RareEventRow {
					match_id,
					frame_timestamp,
					event_type: kind,
					timestamp,
					payload,
				}),
			}
		}
	}

	Ok(tables)
}

fn frame_stats_rows(frames: &[Frame], match_id: i64) -> Vec<FrameStatsRow> {
	let mut rows = Vec::new();
	for frame in frames {
		let frame_timestamp = frame_bucket(frame.timestamp);
		for pf in frame.participant_frames.values() {
			let c = &pf.champion_stats;
			let d = &pf.damage_stats;
			rows.push(FrameStatsRow {
				match_id,
				frame_timestamp,
				participant_id: pf.participant_id,
				ability_haste: c.ability_haste as i64,
				ability_power: c.ability_power as i64,
				armor: c.armor,
				attack_damage: c.attack_damage,
				attack_speed: c.attack_speed as i64,
				cc_reduction: c.cc_reduction,
				cooldown_reduction: c.cooldown_reduction as i64,
				health: c.health as i64,
				health_max: c.health_max as i64,
				health_regen: c.health_regen as i64,
				magic_resist: c.magic_resist,
				movement_speed: c.movement_speed as i64,
				power: c.power as i64,
				power_max: c.power_max as i64,
				power_regen: c.power_regen as i64,
				payload: c.payload(),
				current_gold: pf.current_gold,
				magic_damage_done: d.magic_damage_done as i64,
				magic_damage_done_to_champions: d.magic_damage_done_to_champions as i64,
				magic_damage_taken: d.magic_damage_taken as i64,
				physical_damage_done: d.physical_damage_done as i64,
				physical_damage_done_to_champions: d.physical_damage_done_to_champions as i64,
				physical_damage_taken: d.physical_damage_taken as i64,
				total_damage_done: d.total_damage_done as i64,
				total_damage_done_to_champions: d.total_damage_done_to_champions as i64,
				total_damage_taken: d.total_damage_taken as i64,
				true_damage_done: d.true_damage_done as i64,
				true_damage_done_to_champions: d.true_damage_done_to_champions as i64,
				true_damage_taken: d.true_damage_taken as i64,
				gold_per_second: pf.gold_per_second as i64,
				jungle_minions_killed: pf.jungle_minions_killed as i64,
				level: pf.level as i64,
				minions_killed: pf.minions_killed as i64,
				position_x: pf.position.map(|p| p.x).unwrap_or_default(),
				position_y: pf.position.map(|p| p.y).unwrap_or_default(),
				time_enemy_spent_controlled: pf.time_enemy_spent_controlled as i64,
				total_gold: pf.total_gold as i64,
				xp: pf.xp as i64,
			});
		}
	}
	rows
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_util::sample_timeline;
	use serde_json::json;

	#[test]
	fn frames_bucket_to_ten_second_floors() {
		assert_eq!(frame_bucket(0), 0);
		assert_eq!(frame_bucket(9_999), 0);
		assert_eq!(frame_bucket(10_000), 10_000);
		assert_eq!(frame_bucket(64_231), 60_000);
	}

	#[test]
	fn full_timeline_tabulates_every_table() {
		let raw = sample_timeline();
		let tables = TimelineParser::new(false).run(&raw).unwrap();

		assert_eq!(tables.participant_stats.len(), 4, "two participants across two frames");
		assert_eq!(tables.building_kill.len(), 1);
		assert_eq!(tables.champion_kill.len(), 1);
		assert_eq!(tables.champion_special_kill.len(), 1);
		assert_eq!(tables.dragon_soul_given.len(), 1);
		assert_eq!(tables.elite_monster_kill.len(), 1);
		assert_eq!(tables.turret_plate_destroyed.len(), 1);
		// WARD_PLACED + LEVEL_UP + the unknown FUTURE_EVENT all land in rare
		assert_eq!(tables.rare_events.len(), 3);
	}

	#[test]
	fn champion_kill_id_is_deterministic_across_damage_tables() {
		let raw = sample_timeline();
		let tables = TimelineParser::new(false).run(&raw).unwrap();

		let kill = &tables.champion_kill[0];
		assert_eq!(kill.champion_kill_event_id, champion_kill_event_id(77_001, 64_231, 3, 8));
		assert_eq!(kill.champion_kill_event_id, "77001:64231:3:8");

		assert_eq!(tables.ck_victim_damage_dealt.len(), 2);
		assert_eq!(tables.ck_victim_damage_received.len(), 1);
		for row in tables.ck_victim_damage_dealt.iter().chain(&tables.ck_victim_damage_received) {
			assert_eq!(row.champion_kill_event_id, kill.champion_kill_event_id);
		}
		assert_eq!(tables.ck_victim_damage_dealt[0].direction, "DEALT");
		assert_eq!(tables.ck_victim_damage_dealt[1].idx, 1);
		assert_eq!(tables.ck_victim_damage_received[0].direction, "RECEIVED");
	}

	#[test]
	fn champion_kill_row_excludes_damage_lists_and_splits_position() {
		let raw = sample_timeline();
		let tables = TimelineParser::new(false).run(&raw).unwrap();
		let kill = &tables.champion_kill[0];
		assert_eq!(kill.position_x, 8_200);
		assert_eq!(kill.position_y, 1_450);
		assert_eq!(kill.frame_timestamp, 60_000);
		assert_eq!(kill.timestamp, 64_231);
	}

	#[test]
	fn rare_events_keep_residual_payload_without_reserved_keys() {
		let raw = sample_timeline();
		let tables = TimelineParser::new(false).run(&raw).unwrap();
		let ward = tables.rare_events.iter().find(|r| r.event_type == "WARD_PLACED").unwrap();
		assert_eq!(ward.payload.get("wardType"), Some(&json!("YELLOW_TRINKET")));
		assert!(!ward.payload.contains_key("type"));
		assert!(!ward.payload.contains_key("timestamp"));

		let unknown = tables.rare_events.iter().find(|r| r.event_type == "FUTURE_EVENT").unwrap();
		assert_eq!(unknown.payload.get("mystery"), Some(&json!(42)));
	}

	#[test]
	fn frame_stats_split_scalar_and_payload_columns() {
		let raw = sample_timeline();
		let tables = TimelineParser::new(false).run(&raw).unwrap();
		let row = tables.participant_stats.iter().find(|r| r.participant_id == 1).unwrap();
		assert_eq!(row.frame_timestamp, 0);
		assert!(row.payload.contains_key("armorPen"));
		assert!(row.payload.contains_key("spellVamp"));
		assert_eq!(row.payload.len(), 10);
	}

	#[test]
	fn invalid_timeline_soft_fails_to_empty_tables() {
		let raw = json!({"metadata": {"matchId": "NA1_Y"}, "info": {"frames": "nope"}});
		let tables = TimelineParser::new(false).run(&raw).unwrap();
		assert!(tables.is_empty());
		assert!(TimelineParser::new(true).run(&raw).is_err());
	}
}
