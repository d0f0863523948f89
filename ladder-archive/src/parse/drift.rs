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

//! Schema-drift detection. A declarative registry pairs wildcard paths with
//! the keys a node is expected to carry; the scan walks every matching node,
//! records the first example of each unknown or missing key, and emits one
//! structured warning per payload. It never mutates or rejects data.

use std::collections::BTreeMap;

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftIssue {
	pub schema_key: &'static str,
	pub model: &'static str,
	pub path: String,
	pub error_type: &'static str,
	pub message: String,
}

struct SchemaSpec {
	key: &'static str,
	model: &'static str,
	path: &'static [&'static str],
	expected: &'static [&'static str],
	required: &'static [&'static str],
	optional_path: bool,
}

const METADATA_KEYS: &[&str] = &["dataVersion", "matchId", "participants"];

const INFO_KEYS: &[&str] = &[
	"endOfGameResult",
	"gameCreation",
	"gameDuration",
	"gameEndTimestamp",
	"gameId",
	"gameMode",
	"gameName",
	"gameStartTimestamp",
	"gameType",
	"gameVersion",
	"mapId",
	"participants",
	"platformId",
	"queueId",
	"teams",
	"tournamentCode",
];

const BAN_KEYS: &[&str] = &["championId", "pickTurn"];

const FEATS_KEYS: &[&str] = &["EPIC_MONSTER_KILL", "FIRST_BLOOD", "FIRST_TURRET"];

const OBJECTIVES_KEYS: &[&str] =
	&["atakhan", "baron", "champion", "dragon", "horde", "inhibitor", "riftHerald", "tower"];

const PERKS_KEYS: &[&str] = &["statPerks", "styles"];

const PARTICIPANT_KEYS: &[&str] = &[
	"PlayerScore0",
	"PlayerScore1",
	"PlayerScore2",
	"PlayerScore3",
	"PlayerScore4",
	"PlayerScore5",
	"PlayerScore6",
	"PlayerScore7",
	"PlayerScore8",
	"PlayerScore9",
	"PlayerScore10",
	"PlayerScore11",
	"allInPings",
	"assistMePings",
	"assists",
	"baronKills",
	"basicPings",
	"bountyLevel",
	"challenges",
	"champExperience",
	"champLevel",
	"championId",
	"championName",
	"championTransform",
	"commandPings",
	"consumablesPurchased",
	"damageDealtToBuildings",
	"damageDealtToEpicMonsters",
	"damageDealtToObjectives",
	"damageDealtToTurrets",
	"damageSelfMitigated",
	"dangerPings",
	"deaths",
	"detectorWardsPlaced",
	"doubleKills",
	"dragonKills",
	"eligibleForProgression",
	"enemyMissingPings",
	"enemyVisionPings",
	"firstBloodAssist",
	"firstBloodKill",
	"firstTowerAssist",
	"firstTowerKill",
	"gameEndedInEarlySurrender",
	"gameEndedInSurrender",
	"getBackPings",
	"goldEarned",
	"goldSpent",
	"holdPings",
	"individualPosition",
	"inhibitorKills",
	"inhibitorTakedowns",
	"inhibitorsLost",
	"item0",
	"item1",
	"item2",
	"item3",
	"item4",
	"item5",
	"item6",
	"itemsPurchased",
	"killingSprees",
	"kills",
	"lane",
	"largestCriticalStrike",
	"largestKillingSpree",
	"largestMultiKill",
	"longestTimeSpentLiving",
	"magicDamageDealt",
	"magicDamageDealtToChampions",
	"magicDamageTaken",
	"missions",
	"needVisionPings",
	"neutralMinionsKilled",
	"nexusKills",
	"nexusLost",
	"nexusTakedowns",
	"objectivesStolen",
	"objectivesStolenAssists",
	"onMyWayPings",
	"participantId",
	"pentaKills",
	"perks",
	"physicalDamageDealt",
	"physicalDamageDealtToChampions",
	"physicalDamageTaken",
	"placement",
	"playerAugment1",
	"playerAugment2",
	"playerAugment3",
	"playerAugment4",
	"playerAugment5",
	"playerAugment6",
	"playerSubteamId",
	"profileIcon",
	"pushPings",
	"puuid",
	"quadraKills",
	"retreatPings",
	"riotIdGameName",
	"riotIdTagline",
	"role",
	"roleBoundItem",
	"sightWardsBoughtInGame",
	"spell1Casts",
	"spell2Casts",
	"spell3Casts",
	"spell4Casts",
	"subteamPlacement",
	"summoner1Casts",
	"summoner1Id",
	"summoner2Casts",
	"summoner2Id",
	"summonerId",
	"summonerLevel",
	"summonerName",
	"teamEarlySurrendered",
	"teamId",
	"teamPosition",
	"timeCCingOthers",
	"timePlayed",
	"totalAllyJungleMinionsKilled",
	"totalDamageDealt",
	"totalDamageDealtToChampions",
	"totalDamageShieldedOnTeammates",
	"totalDamageTaken",
	"totalEnemyJungleMinionsKilled",
	"totalHeal",
	"totalHealsOnTeammates",
	"totalMinionsKilled",
	"totalTimeCCDealt",
	"totalTimeSpentDead",
	"totalUnitsHealed",
	"tripleKills",
	"trueDamageDealt",
	"trueDamageDealtToChampions",
	"trueDamageTaken",
	"turretKills",
	"turretTakedowns",
	"turretsLost",
	"unrealKills",
	"visionClearedPings",
	"visionScore",
	"visionWardsBoughtInGame",
	"wardsKilled",
	"wardsPlaced",
	"win",
];

const NON_TIMELINE_SCHEMAS: &[SchemaSpec] = &[
	SchemaSpec {
		key: "metadata",
		model: "Metadata",
		path: &["metadata"],
		expected: METADATA_KEYS,
		required: METADATA_KEYS,
		optional_path: false,
	},
	SchemaSpec {
		key: "info",
		model: "Info",
		path: &["info"],
		expected: INFO_KEYS,
		required: &["gameId", "gameVersion", "participants", "teams"],
		optional_path: false,
	},
	SchemaSpec {
		key: "bans",
		model: "Ban",
		path: &["info", "teams", "*", "bans", "*"],
		expected: BAN_KEYS,
		required: BAN_KEYS,
		optional_path: false,
	},
	SchemaSpec {
		key: "feats",
		model: "Feats",
		path: &["info", "teams", "*", "feats"],
		expected: FEATS_KEYS,
		required: FEATS_KEYS,
		optional_path: true,
	},
	SchemaSpec {
		key: "objectives",
		model: "Objectives",
		path: &["info", "teams", "*", "objectives"],
		expected: OBJECTIVES_KEYS,
		required: &["baron", "champion", "dragon", "inhibitor", "riftHerald", "tower"],
		optional_path: false,
	},
	SchemaSpec {
		key: "participants",
		model: "Participant",
		path: &["info", "participants", "*"],
		expected: PARTICIPANT_KEYS,
		required: &["participantId", "puuid", "teamId", "championId", "perks", "challenges"],
		optional_path: false,
	},
	SchemaSpec {
		key: "perks",
		model: "Perks",
		path: &["info", "participants", "*", "perks"],
		expected: PERKS_KEYS,
		required: PERKS_KEYS,
		optional_path: false,
	},
];

/// Per-event-type expected and required wire keys for the timeline scan.
const EVENT_SCHEMAS: &[(&str, &[&str], &[&str])] = &[
	("ITEM_PURCHASED", &["type", "timestamp", "participantId", "itemId"], &["participantId", "itemId"]),
	(
		"ITEM_UNDO",
		&["type", "timestamp", "afterId", "beforeId", "goldGain", "participantId"],
		&["participantId"],
	),
	(
		"SKILL_LEVEL_UP",
		&["type", "timestamp", "levelUpType", "participantId", "skillSlot"],
		&["participantId", "skillSlot"],
	),
	("WARD_PLACED", &["type", "timestamp", "creatorId", "wardType"], &["creatorId"]),
	("WARD_KILL", &["type", "timestamp", "killerId", "wardType"], &["killerId"]),
	("LEVEL_UP", &["type", "timestamp", "level", "participantId"], &["participantId"]),
	("ITEM_DESTROYED", &["type", "timestamp", "itemId", "participantId"], &["participantId"]),
	("ITEM_SOLD", &["type", "timestamp", "itemId", "participantId"], &["participantId"]),
	("PAUSE_END", &["type", "timestamp", "realTimestamp"], &[]),
	("GAME_END", &["type", "timestamp", "gameId", "realTimestamp", "winningTeam"], &["winningTeam"]),
	(
		"CHAMPION_KILL",
		&[
			"type",
			"timestamp",
			"assistingParticipantIds",
			"bounty",
			"killStreakLength",
			"killerId",
			"position",
			"shutdownBounty",
			"victimDamageDealt",
			"victimDamageReceived",
			"victimTeamfightDamageDealt",
			"victimTeamfightDamageReceived",
			"victimId",
		],
		&["killerId", "victimId", "position"],
	),
	(
		"CHAMPION_SPECIAL_KILL",
		&["type", "timestamp", "killType", "killerId", "multiKillLength", "position"],
		&["killType", "killerId"],
	),
	(
		"TURRET_PLATE_DESTROYED",
		&["type", "timestamp", "killerId", "laneType", "position", "teamId"],
		&["killerId", "laneType", "teamId"],
	),
	(
		"BUILDING_KILL",
		&[
			"type",
			"timestamp",
			"assistingParticipantIds",
			"bounty",
			"buildingType",
			"killerId",
			"laneType",
			"position",
			"teamId",
			"towerType",
		],
		&["buildingType", "killerId", "teamId"],
	),
	(
		"ELITE_MONSTER_KILL",
		&[
			"type",
			"timestamp",
			"assistingParticipantIds",
			"bounty",
			"killerId",
			"killerTeamId",
			"monsterSubType",
			"monsterType",
			"position",
		],
		&["killerId", "monsterType"],
	),
	("DRAGON_SOUL_GIVEN", &["type", "timestamp", "name", "teamId"], &["name", "teamId"]),
	("OBJECTIVE_BOUNTY_PRESTART", &["type", "timestamp", "actualStartTime", "teamId"], &["teamId"]),
	("OBJECTIVE_BOUNTY_FINISH", &["type", "timestamp", "teamId"], &["teamId"]),
	("FEAT_UPDATE", &["type", "timestamp", "featType", "featValue", "teamId"], &["teamId"]),
	("CHAMPION_TRANSFORM", &["type", "timestamp", "participantId", "transformType"], &["participantId"]),
	("UNKNOWN", &["type", "timestamp"], &[]),
];

enum Resolved<'a> {
	Nodes(Vec<(String, &'a Value)>),
	Issue(DriftIssue),
}

fn resolve_path<'a>(raw: &'a Value, spec: &SchemaSpec) -> Resolved<'a> {
	let mut nodes: Vec<(String, &Value)> = vec![("$".to_string(), raw)];

	for token in spec.path {
		let mut next = Vec::new();
		for (node_path, node) in nodes {
			if *token == "*" {
				let Some(items) = node.as_array() else {
					return Resolved::Issue(DriftIssue {
						schema_key: spec.key,
						model: spec.model,
						path: node_path.clone(),
						error_type: "expected_list_for_wildcard",
						message: format!("expected list at '{}' for wildcard '*'", node_path),
					});
				};
				for (idx, item) in items.iter().enumerate() {
					next.push((format!("{}[{}]", node_path, idx), item));
				}
				continue;
			}

			let Some(object) = node.as_object() else {
				return Resolved::Issue(DriftIssue {
					schema_key: spec.key,
					model: spec.model,
					path: node_path.clone(),
					error_type: "expected_object_for_field",
					message: format!("expected object at '{}' before reading field '{}'", node_path, token),
				});
			};
			match object.get(*token) {
				Some(child) => next.push((format!("{}.{}", node_path, token), child)),
				None => {
					return Resolved::Issue(DriftIssue {
						schema_key: spec.key,
						model: spec.model,
						path: node_path,
						error_type: "missing_path_segment",
						message: format!(
							"missing expected field '{}' while resolving '{}'",
							token,
							spec.path.join(".")
						),
					})
				}
			}
		}
		nodes = next;
	}

	Resolved::Nodes(nodes)
}

/// Collect first-seen drift issues for one non-timeline payload.
pub fn collect_non_timeline(raw: &Value) -> Vec<DriftIssue> {
	let mut issues = Vec::new();

	for spec in NON_TIMELINE_SCHEMAS {
		let nodes = match resolve_path(raw, spec) {
			Resolved::Nodes(nodes) => nodes,
			Resolved::Issue(issue) => {
				if !spec.optional_path {
					issues.push(issue);
				}
				continue;
			}
		};

		// only the first example of each unknown/missing key per scan
		let mut first_seen: BTreeMap<String, DriftIssue> = BTreeMap::new();
		for (node_path, node) in nodes {
			let Some(object) = node.as_object() else {
				first_seen.entry("__node_not_object__".to_string()).or_insert_with(|| DriftIssue {
					schema_key: spec.key,
					model: spec.model,
					path: node_path.clone(),
					error_type: "node_not_object",
					message: format!("resolved node at '{}' is not an object", node_path),
				});
				continue;
			};

			for key in object.keys() {
				if !spec.expected.contains(&key.as_str()) {
					first_seen.entry(format!("unexpected:{}", key)).or_insert_with(|| DriftIssue {
						schema_key: spec.key,
						model: spec.model,
						path: format!("{}.{}", node_path, key),
						error_type: "unexpected_key",
						message: format!("unexpected key '{}' at '{}'", key, node_path),
					});
				}
			}
			for key in spec.required {
				if !object.contains_key(*key) {
					first_seen.entry(format!("missing:{}", key)).or_insert_with(|| DriftIssue {
						schema_key: spec.key,
						model: spec.model,
						path: node_path.clone(),
						error_type: "missing_required_key",
						message: format!("missing required key '{}' at '{}'", key, node_path),
					});
				}
			}
		}
		issues.extend(first_seen.into_values());
	}

	issues
}

/// Collect first-seen drift issues for one timeline payload, discriminating
/// event schemas by their `type` tag.
pub fn collect_timeline(raw: &Value) -> Vec<DriftIssue> {
	let mut first_seen: BTreeMap<String, DriftIssue> = BTreeMap::new();

	let frames = raw.get("info").and_then(|info| info.get("frames")).and_then(Value::as_array);
	let Some(frames) = frames else {
		return vec![DriftIssue {
			schema_key: "events",
			model: "Frame",
			path: "$.info.frames".to_string(),
			error_type: "missing_or_invalid_frames",
			message: "expected '$.info.frames' to be a list".to_string(),
		}];
	};

	for (frame_idx, frame) in frames.iter().enumerate() {
		let frame_path = format!("$.info.frames[{}]", frame_idx);
		let Some(frame) = frame.as_object() else {
			first_seen.entry("frame_not_object".to_string()).or_insert_with(|| DriftIssue {
				schema_key: "events",
				model: "Frame",
				path: frame_path.clone(),
				error_type: "frame_not_object",
				message: format!("frame at '{}' is not an object", frame_path),
			});
			continue;
		};

		let Some(events) = frame.get("events").and_then(Value::as_array) else {
			first_seen.entry("events_not_list".to_string()).or_insert_with(|| DriftIssue {
				schema_key: "events",
				model: "Frame.events",
				path: format!("{}.events", frame_path),
				error_type: "events_not_list",
				message: format!("expected list at '{}.events'", frame_path),
			});
			continue;
		};

		for (event_idx, event) in events.iter().enumerate() {
			let event_path = format!("{}.events[{}]", frame_path, event_idx);
			let Some(event) = event.as_object() else {
				first_seen.entry("event_not_object".to_string()).or_insert_with(|| DriftIssue {
					schema_key: "events",
					model: "Event",
					path: event_path.clone(),
					error_type: "event_not_object",
					message: format!("event at '{}' is not an object", event_path),
				});
				continue;
			};

			let Some(event_type) = event.get("type").and_then(Value::as_str) else {
				first_seen.entry("missing_event_type".to_string()).or_insert_with(|| DriftIssue {
					schema_key: "events",
					model: "Event",
					path: event_path.clone(),
					error_type: "missing_event_type",
					message: format!("event at '{}' is missing string key 'type'", event_path),
				});
				continue;
			};

			let Some((_, expected, required)) =
				EVENT_SCHEMAS.iter().find(|(kind, _, _)| *kind == event_type)
			else {
				first_seen.entry(format!("unknown_event_type:{}", event_type)).or_insert_with(|| DriftIssue {
					schema_key: "events",
					model: "Event",
					path: format!("{}.type", event_path),
					error_type: "unknown_event_type",
					message: format!("unknown event type '{}' at '{}'", event_type, event_path),
				});
				continue;
			};

			for key in event.keys() {
				if !expected.contains(&key.as_str()) {
					first_seen
						.entry(format!("{}:unexpected:{}", event_type, key))
						.or_insert_with(|| DriftIssue {
							schema_key: "events",
							model: "Event",
							path: format!("{}.{}", event_path, key),
							error_type: "unexpected_key",
							message: format!(
								"unexpected key '{}' for event type '{}' at '{}'",
								key, event_type, event_path
							),
						});
				}
			}
			for key in *required {
				if !event.contains_key(*key) {
					first_seen
						.entry(format!("{}:missing:{}", event_type, key))
						.or_insert_with(|| DriftIssue {
							schema_key: "events",
							model: "Event",
							path: event_path.clone(),
							error_type: "missing_required_key",
							message: format!(
								"missing required key '{}' for event type '{}' at '{}'",
								key, event_type, event_path
							),
						});
				}
			}
		}
	}

	first_seen.into_values().collect()
}

fn log_issues(variant: &str, issues: &[DriftIssue], match_id: &str, date: &str) {
	if issues.is_empty() {
		return;
	}
	let messages: Vec<String> =
		issues.iter().map(|i| format!("{}:{} - {}", i.schema_key, i.path, i.message)).collect();
	log::warn!(
		target: "schema_drift",
		"schema drift {} match_id={} date={} count={} keys=[{}]",
		variant,
		match_id,
		date,
		issues.len(),
		messages.join("; "),
	);
}

pub fn scan_non_timeline(raw: &Value, match_id: &str, date: &str) {
	log_issues("non_timeline", &collect_non_timeline(raw), match_id, date);
}

pub fn scan_timeline(raw: &Value, match_id: &str, date: &str) {
	log_issues("timeline", &collect_timeline(raw), match_id, date);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_util::{sample_match, sample_timeline};
	use serde_json::json;

	#[test]
	fn clean_payloads_produce_no_issues() {
		assert!(collect_non_timeline(&sample_match()).is_empty());
		// the sample timeline deliberately carries one unknown event type
		let issues = collect_timeline(&sample_timeline());
		assert_eq!(issues.len(), 1);
		assert_eq!(issues[0].error_type, "unknown_event_type");
	}

	#[test]
	fn unexpected_participant_key_is_reported_once() {
		let mut raw = sample_match();
		raw["info"]["participants"][0]["brandNewStat"] = json!(7);
		raw["info"]["participants"][1]["brandNewStat"] = json!(9);

		let issues = collect_non_timeline(&raw);
		let unexpected: Vec<_> = issues.iter().filter(|i| i.error_type == "unexpected_key").collect();
		assert_eq!(unexpected.len(), 1, "only the first example per key is kept");
		assert_eq!(unexpected[0].schema_key, "participants");
		assert!(unexpected[0].path.ends_with("brandNewStat"));
	}

	#[test]
	fn missing_required_key_is_reported() {
		let mut raw = sample_match();
		raw["metadata"].as_object_mut().unwrap().remove("dataVersion");
		let issues = collect_non_timeline(&raw);
		assert!(issues
			.iter()
			.any(|i| i.error_type == "missing_required_key" && i.schema_key == "metadata"));
	}

	#[test]
	fn missing_path_segment_is_reported() {
		let raw = json!({"metadata": {"dataVersion": "2", "matchId": "m", "participants": []}});
		let issues = collect_non_timeline(&raw);
		assert!(issues.iter().any(|i| i.error_type == "missing_path_segment"));
	}

	#[test]
	fn optional_feats_path_stays_silent_when_absent() {
		let mut raw = sample_match();
		for team in raw["info"]["teams"].as_array_mut().unwrap() {
			team.as_object_mut().unwrap().remove("feats");
		}
		let issues = collect_non_timeline(&raw);
		assert!(issues.iter().all(|i| i.schema_key != "feats"));
	}

	#[test]
	fn wildcard_over_non_list_is_reported() {
		let mut raw = sample_match();
		raw["info"]["teams"] = json!({"not": "a list"});
		let issues = collect_non_timeline(&raw);
		assert!(issues.iter().any(|i| i.error_type == "expected_list_for_wildcard"));
	}

	#[test]
	fn unknown_event_type_is_reported_with_its_tag() {
		let mut raw = sample_timeline();
		raw["info"]["frames"][0]["events"][0]["type"] = json!("WARP_GATE_OPENED");
		let issues = collect_timeline(&raw);
		assert!(issues
			.iter()
			.any(|i| i.error_type == "unknown_event_type" && i.message.contains("WARP_GATE_OPENED")));
	}

	#[test]
	fn event_key_drift_is_discriminated_by_type() {
		let mut raw = sample_timeline();
		raw["info"]["frames"][1]["events"][0]["newDamageBreakdown"] = json!([]);
		let issues = collect_timeline(&raw);
		let unexpected: Vec<_> = issues.iter().filter(|i| i.error_type == "unexpected_key").collect();
		assert_eq!(unexpected.len(), 1);
		assert!(unexpected[0].message.contains("CHAMPION_KILL"));
		assert!(unexpected[0].path.ends_with("newDamageBreakdown"));
	}
}
