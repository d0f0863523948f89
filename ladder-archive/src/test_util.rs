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

//! Scripted fakes for the fetch and store seams, shared by the crawler and
//! stage tests.

use std::{
	collections::HashMap,
	sync::atomic::{AtomicBool, AtomicUsize, Ordering},
	sync::Once,
};

use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::{
	database::{models::PlayerRow, queries::PlayerKey},
	error::{ArchiveError, Result},
	http::{Fetch, FetchOutcome, FetchResult},
	parse::{non_timeline::NonTimelineTables, timeline::TimelineTables},
	store::{
		AnalyticStore, COLLECTED_PUUIDS_TABLE, MATCH_IDS_TABLE, NON_TIMELINE_TABLES, PLAYERS_TABLE,
		PROCESSED_MATCH_IDS_TABLE, TIMELINE_TABLES, TIMESTAMPS_TABLE,
	},
	types::Location,
};

static INIT: Once = Once::new();

/// Guard that may be called at the beginning of any test that wants logs.
pub fn initialize() {
	INIT.call_once(|| {
		let _ = pretty_env_logger::try_init();
	});
}

type Responder = Box<dyn Fn(&str, Location) -> FetchResult + Send + Sync>;

/// A [`Fetch`] implementation backed by a closure over the request URL.
pub(crate) struct StubFetch {
	respond: Responder,
	calls: AtomicUsize,
}

impl StubFetch {
	pub fn new<F>(respond: F) -> Self
	where
		F: Fn(&str, Location) -> FetchResult + Send + Sync + 'static,
	{
		Self { respond: Box::new(respond), calls: AtomicUsize::new(0) }
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn ok(data: Value) -> FetchResult {
		FetchResult { data: Some(data), outcome: FetchOutcome::Ok, status: Some(200) }
	}

	pub fn status(status: u16) -> FetchResult {
		FetchResult { data: None, outcome: FetchOutcome::HttpNonRetryable, status: Some(status) }
	}

	pub fn exhausted() -> FetchResult {
		FetchResult { data: None, outcome: FetchOutcome::RetryExhausted, status: Some(503) }
	}
}

#[async_trait::async_trait]
impl Fetch for StubFetch {
	async fn fetch_json(&self, url: &str, location: Location) -> Result<FetchResult> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		Ok((self.respond)(url, location))
	}
}

#[derive(Default)]
pub(crate) struct MemoryState {
	/// (table, run_id) -> row count
	pub rows: HashMap<(String, Uuid), u64>,
	pub timestamps: Vec<(Uuid, i64)>,
	pub players: Vec<PlayerKey>,
	pub collected_puuids: Vec<String>,
	pub collected_at: i64,
	pub pending_match_ids: Vec<String>,
}

/// In-memory [`AnalyticStore`] double. Tracks row counts per (table, run)
/// and can be scripted to fail the N-th persist call.
#[derive(Default)]
pub(crate) struct MemoryStore {
	pub state: Mutex<MemoryState>,
	pub fail_persist_on_call: AtomicUsize,
	pub fail_player_inserts: AtomicBool,
	persist_calls: AtomicUsize,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Total rows per table across every run.
	pub fn table_total(&self, table: &str) -> u64 {
		self.state.lock().rows.iter().filter(|((t, _), _)| t == table).map(|(_, count)| count).sum()
	}

	fn add_rows(&self, table: &str, run_id: Uuid, count: u64) {
		let mut state = self.state.lock();
		*state.rows.entry((table.to_string(), run_id)).or_default() += count;
	}

	fn persist_gate(&self) -> Result<()> {
		let call = self.persist_calls.fetch_add(1, Ordering::SeqCst) + 1;
		let fail_on = self.fail_persist_on_call.load(Ordering::SeqCst);
		if fail_on != 0 && call >= fail_on {
			return Err(ArchiveError::Validation(format!("scripted persist failure on call {}", call)));
		}
		Ok(())
	}
}

#[async_trait::async_trait]
impl AnalyticStore for MemoryStore {
	async fn insert_players(&self, rows: &[PlayerRow], run_id: Uuid) -> Result<u64> {
		if self.fail_player_inserts.load(Ordering::SeqCst) {
			return Err(ArchiveError::Channel);
		}
		self.add_rows(PLAYERS_TABLE, run_id, rows.len() as u64);
		Ok(rows.len() as u64)
	}

	async fn load_players(&self) -> Result<Vec<PlayerKey>> {
		Ok(self.state.lock().players.clone())
	}

	async fn load_collected_puuids(&self) -> Result<Vec<String>> {
		Ok(self.state.lock().collected_puuids.clone())
	}

	async fn load_collected_at(&self) -> Result<i64> {
		Ok(self.state.lock().collected_at)
	}

	async fn insert_collected_puuids(&self, puuids: &[String], run_id: Uuid) -> Result<u64> {
		self.add_rows(COLLECTED_PUUIDS_TABLE, run_id, puuids.len() as u64);
		Ok(puuids.len() as u64)
	}

	async fn insert_match_ids(&self, ids: &[String], run_id: Uuid) -> Result<u64> {
		self.add_rows(MATCH_IDS_TABLE, run_id, ids.len() as u64);
		Ok(ids.len() as u64)
	}

	async fn insert_collected_at(&self, ts: i64, run_id: Uuid) -> Result<()> {
		self.add_rows(TIMESTAMPS_TABLE, run_id, 1);
		self.state.lock().timestamps.push((run_id, ts));
		Ok(())
	}

	async fn delete_stale_collected_at(&self, run_id: Uuid) -> Result<()> {
		let mut state = self.state.lock();
		state.timestamps.retain(|(run, _)| *run == run_id);
		state.rows.retain(|(table, run), _| table != TIMESTAMPS_TABLE || *run == run_id);
		Ok(())
	}

	async fn load_pending_match_ids(&self) -> Result<Vec<String>> {
		Ok(self.state.lock().pending_match_ids.clone())
	}

	async fn insert_processed_match_ids(&self, ids: &[String], run_id: Uuid) -> Result<u64> {
		self.add_rows(PROCESSED_MATCH_IDS_TABLE, run_id, ids.len() as u64);
		Ok(ids.len() as u64)
	}

	async fn persist_non_timeline(&self, tables: &NonTimelineTables, run_id: Uuid) -> Result<()> {
		self.persist_gate()?;
		self.add_rows(NON_TIMELINE_TABLES[0], run_id, tables.metadata.len() as u64);
		self.add_rows(NON_TIMELINE_TABLES[1], run_id, tables.game_info.len() as u64);
		self.add_rows(NON_TIMELINE_TABLES[2], run_id, tables.bans.len() as u64);
		self.add_rows(NON_TIMELINE_TABLES[3], run_id, tables.feats.len() as u64);
		self.add_rows(NON_TIMELINE_TABLES[4], run_id, tables.objectives.len() as u64);
		self.add_rows(NON_TIMELINE_TABLES[5], run_id, tables.participant_stats.len() as u64);
		self.add_rows(NON_TIMELINE_TABLES[6], run_id, tables.participant_challenges.len() as u64);
		self.add_rows(NON_TIMELINE_TABLES[7], run_id, tables.participant_perk_values.len() as u64);
		self.add_rows(NON_TIMELINE_TABLES[8], run_id, tables.participant_perk_ids.len() as u64);
		Ok(())
	}

	async fn persist_timeline(&self, tables: &TimelineTables, run_id: Uuid) -> Result<()> {
		self.persist_gate()?;
		self.add_rows(TIMELINE_TABLES[0], run_id, tables.participant_stats.len() as u64);
		self.add_rows(TIMELINE_TABLES[1], run_id, tables.building_kill.len() as u64);
		self.add_rows(TIMELINE_TABLES[2], run_id, tables.champion_kill.len() as u64);
		self.add_rows(TIMELINE_TABLES[3], run_id, tables.champion_special_kill.len() as u64);
		self.add_rows(TIMELINE_TABLES[4], run_id, tables.dragon_soul_given.len() as u64);
		self.add_rows(TIMELINE_TABLES[5], run_id, tables.elite_monster_kill.len() as u64);
		self.add_rows(TIMELINE_TABLES[6], run_id, tables.turret_plate_destroyed.len() as u64);
		self.add_rows(TIMELINE_TABLES[7], run_id, tables.rare_events.len() as u64);
		self.add_rows(TIMELINE_TABLES[8], run_id, tables.ck_victim_damage_dealt.len() as u64);
		self.add_rows(TIMELINE_TABLES[9], run_id, tables.ck_victim_damage_received.len() as u64);
		Ok(())
	}

	async fn delete_run(&self, table: &str, run_id: Uuid) -> Result<u64> {
		let mut state = self.state.lock();
		let removed = state.rows.remove(&(table.to_string(), run_id)).unwrap_or_default();
		if table == TIMESTAMPS_TABLE {
			state.timestamps.retain(|(run, _)| *run != run_id);
		}
		Ok(removed)
	}
}

fn set_all(map: &mut Map<String, Value>, keys: &[&str], value: Value) {
	for key in keys {
		map.insert((*key).to_string(), value.clone());
	}
}

/// A structurally complete participant object with small default values;
/// tests override the fields they care about.
fn sample_participant(participant_id: u64, puuid: &str, team_id: u64) -> Value {
	let mut p = Map::new();

	set_all(
		&mut p,
		&[
			"PlayerScore0", "PlayerScore1", "PlayerScore2", "PlayerScore3", "PlayerScore4", "PlayerScore5",
			"PlayerScore6", "PlayerScore7", "PlayerScore8", "PlayerScore9", "PlayerScore10", "PlayerScore11",
			"allInPings", "assistMePings", "baronKills", "basicPings", "championTransform", "commandPings",
			"consumablesPurchased", "dangerPings", "doubleKills", "dragonKills", "enemyMissingPings",
			"enemyVisionPings", "getBackPings", "holdPings", "inhibitorKills", "inhibitorTakedowns",
			"inhibitorsLost", "killingSprees", "largestCriticalStrike", "largestKillingSpree", "largestMultiKill",
			"needVisionPings", "nexusKills", "nexusLost", "nexusTakedowns", "objectivesStolen",
			"objectivesStolenAssists", "onMyWayPings", "pentaKills", "placement", "playerAugment1",
			"playerAugment2", "playerAugment3", "playerAugment4", "playerAugment5", "playerAugment6",
			"playerSubteamId", "pushPings", "quadraKills", "retreatPings", "sightWardsBoughtInGame",
			"subteamPlacement", "summoner1Casts", "summoner2Casts", "timeCCingOthers", "tripleKills",
			"unrealKills", "visionClearedPings", "visionWardsBoughtInGame", "wardsKilled",
		],
		json!(0),
	);
	set_all(
		&mut p,
		&[
			"assists", "champExperience", "champLevel", "deaths", "goldEarned", "goldSpent", "itemsPurchased",
			"kills", "largestKillingSpree", "longestTimeSpentLiving", "magicDamageDealt",
			"magicDamageDealtToChampions", "magicDamageTaken", "neutralMinionsKilled", "physicalDamageDealt",
			"physicalDamageDealtToChampions", "physicalDamageTaken", "spell1Casts", "spell2Casts", "spell3Casts",
			"spell4Casts", "timePlayed", "totalAllyJungleMinionsKilled", "totalDamageDealt",
			"totalDamageDealtToChampions", "totalDamageShieldedOnTeammates", "totalDamageTaken",
			"totalEnemyJungleMinionsKilled", "totalHeal", "totalHealsOnTeammates", "totalMinionsKilled",
			"totalTimeCCDealt", "totalTimeSpentDead", "totalUnitsHealed", "trueDamageDealt",
			"trueDamageDealtToChampions", "trueDamageTaken", "turretKills", "turretTakedowns", "turretsLost",
			"damageDealtToBuildings", "damageDealtToObjectives", "damageDealtToTurrets", "damageSelfMitigated",
			"item0", "item1", "item2", "item3", "item4", "item5", "item6", "summoner1Id", "summoner2Id",
		],
		json!(100),
	);
	set_all(
		&mut p,
		&[
			"eligibleForProgression", "firstBloodAssist", "firstBloodKill", "firstTowerAssist", "firstTowerKill",
			"gameEndedInEarlySurrender", "gameEndedInSurrender", "teamEarlySurrendered",
		],
		json!(false),
	);

	p.insert("participantId".into(), json!(participant_id));
	p.insert("puuid".into(), json!(puuid));
	p.insert("teamId".into(), json!(team_id));
	p.insert("win".into(), json!(team_id == 100));
	p.insert("championId".into(), json!(266));
	p.insert("championName".into(), json!("Aatrox"));
	p.insert("champLevel".into(), json!(18));
	p.insert("individualPosition".into(), json!("TOP"));
	p.insert("lane".into(), json!("TOP"));
	p.insert("role".into(), json!("SOLO"));
	p.insert("teamPosition".into(), json!("TOP"));
	p.insert("profileIcon".into(), json!(4568));
	p.insert("riotIdGameName".into(), json!("Player"));
	p.insert("riotIdTagline".into(), json!("NA1"));
	p.insert("summonerId".into(), json!("summoner-id"));
	p.insert("summonerLevel".into(), json!(312));
	p.insert("summonerName".into(), json!(""));
	p.insert("visionScore".into(), json!(31));
	p.insert("wardsPlaced".into(), json!(12));
	p.insert("detectorWardsPlaced".into(), json!(3));

	p.insert(
		"missions".into(),
		json!({
			"playerScore0": 0, "playerScore1": 0, "playerScore2": 0, "playerScore3": 0,
			"playerScore4": 0, "playerScore5": 0, "playerScore6": 0, "playerScore7": 0,
			"playerScore8": 0, "playerScore9": 0, "playerScore10": 0, "playerScore11": 0
		}),
	);
	p.insert(
		"challenges".into(),
		json!({
			"kda": 3.5,
			"damagePerMinute": 812.4,
			"legendaryItemUsed": [3153, 6655],
			"SWARM_DefeatAatrox": 1,
			"teamBaronKills": 1
		}),
	);
	p.insert(
		"perks".into(),
		json!({
			"statPerks": {"defense": 5002, "flex": 5008, "offense": 5005},
			"styles": [
				{
					"description": "primaryStyle",
					"style": 8100,
					"selections": [
						{"perk": 8112, "var1": 1, "var2": 2, "var3": 3},
						{"perk": 8126, "var1": 4, "var2": 5, "var3": 6},
						{"perk": 8138, "var1": 7, "var2": 8, "var3": 9},
						{"perk": 8135, "var1": 10, "var2": 11, "var3": 12}
					]
				},
				{
					"description": "subStyle",
					"style": 8300,
					"selections": [
						{"perk": 8304, "var1": 13, "var2": 14, "var3": 15},
						{"perk": 8347, "var1": 16, "var2": 17, "var3": 18}
					]
				}
			]
		}),
	);

	Value::Object(p)
}

fn sample_team(team_id: u64, win: bool) -> Value {
	json!({
		"teamId": team_id,
		"win": win,
		"bans": [
			{"championId": 39, "pickTurn": 1},
			{"championId": -1, "pickTurn": 2}
		],
		"feats": {
			"EPIC_MONSTER_KILL": {"featState": 3},
			"FIRST_BLOOD": {"featState": 1},
			"FIRST_TURRET": {"featState": 0}
		},
		"objectives": {
			"atakhan": {"first": false, "kills": 0},
			"baron": {"first": win, "kills": 1},
			"champion": {"first": win, "kills": 23},
			"dragon": {"first": false, "kills": 2},
			"horde": {"first": false, "kills": 3},
			"inhibitor": {"first": win, "kills": 1},
			"riftHerald": {"first": false, "kills": 1},
			"tower": {"first": win, "kills": 7}
		}
	})
}

/// A complete, valid non-timeline payload with two participants.
pub(crate) fn sample_match() -> Value {
	json!({
		"metadata": {
			"dataVersion": "2",
			"matchId": "NA1_5201",
			"participants": ["puuid-1", "puuid-2"]
		},
		"info": {
			"endOfGameResult": "GameComplete",
			"gameCreation": 1738368000000u64,
			"gameDuration": 1801,
			"gameEndTimestamp": 1738369801000u64,
			"gameId": 5201,
			"gameMode": "CLASSIC",
			"gameName": "teambuilder-match-5201",
			"gameStartTimestamp": 1738368000000u64,
			"gameType": "MATCHED_GAME",
			"gameVersion": "15.3.654.8741",
			"mapId": 11,
			"platformId": "NA1",
			"queueId": 420,
			"tournamentCode": "",
			"participants": [
				sample_participant(1, "puuid-1", 100),
				sample_participant(2, "puuid-2", 200)
			],
			"teams": [sample_team(100, true), sample_team(200, false)]
		}
	})
}

fn sample_participant_frame(participant_id: u64) -> Value {
	json!({
		"championStats": {
			"abilityHaste": 10, "abilityPower": 0, "armor": 120, "armorPen": 0,
			"armorPenPercent": 0, "attackDamage": 180, "attackSpeed": 142,
			"bonusArmorPenPercent": 0, "bonusMagicPenPercent": 0, "ccReduction": 0,
			"cooldownReduction": 0, "health": 1900, "healthMax": 2200, "healthRegen": 45,
			"lifesteal": 0, "magicPen": 0, "magicPenPercent": 0, "magicResist": 52,
			"movementSpeed": 345, "omnivamp": 0, "physicalVamp": 0, "power": 400,
			"powerMax": 1000, "powerRegen": 30, "spellVamp": 0
		},
		"currentGold": 618,
		"damageStats": {
			"magicDamageDone": 1000, "magicDamageDoneToChampions": 500, "magicDamageTaken": 700,
			"physicalDamageDone": 9000, "physicalDamageDoneToChampions": 2500,
			"physicalDamageTaken": 3100, "totalDamageDone": 10400,
			"totalDamageDoneToChampions": 3100, "totalDamageTaken": 3900,
			"trueDamageDone": 400, "trueDamageDoneToChampions": 100, "trueDamageTaken": 100
		},
		"goldPerSecond": 0,
		"jungleMinionsKilled": 4,
		"level": 9,
		"minionsKilled": 64,
		"participantId": participant_id,
		"position": {"x": 3400, "y": 7200},
		"timeEnemySpentControlled": 12000,
		"totalGold": 4300,
		"xp": 5900
	})
}

/// A complete, valid timeline payload: two frames, two participants, one of
/// each rich event plus two known rare events and one unknown type.
pub(crate) fn sample_timeline() -> Value {
	json!({
		"metadata": {
			"dataVersion": "2",
			"matchId": "NA1_77001",
			"participants": ["puuid-1", "puuid-2"]
		},
		"info": {
			"endOfGameResult": "GameComplete",
			"frameInterval": 60000,
			"gameId": 77001,
			"participants": [
				{"participantId": 1, "puuid": "puuid-1"},
				{"participantId": 2, "puuid": "puuid-2"}
			],
			"frames": [
				{
					"timestamp": 0,
					"participantFrames": {
						"1": sample_participant_frame(1),
						"2": sample_participant_frame(2)
					},
					"events": [
						{
							"type": "WARD_PLACED",
							"timestamp": 4021,
							"creatorId": 2,
							"wardType": "YELLOW_TRINKET"
						},
						{
							"type": "LEVEL_UP",
							"timestamp": 5100,
							"participantId": 1,
							"level": 2
						},
						{
							"type": "FUTURE_EVENT",
							"timestamp": 6000,
							"mystery": 42
						}
					]
				},
				{
					"timestamp": 64231,
					"participantFrames": {
						"1": sample_participant_frame(1),
						"2": sample_participant_frame(2)
					},
					"events": [
						{
							"type": "CHAMPION_KILL",
							"timestamp": 64231,
							"killerId": 3,
							"victimId": 8,
							"bounty": 300,
							"killStreakLength": 2,
							"shutdownBounty": 0,
							"position": {"x": 8200, "y": 1450},
							"victimDamageDealt": [
								{
									"basic": false, "magicDamage": 0, "name": "Jinx",
									"participantId": 8, "physicalDamage": 320, "spellName": "q",
									"spellSlot": 0, "trueDamage": 0, "type": "OTHER"
								},
								{
									"basic": true, "magicDamage": 0, "name": "Jinx",
									"participantId": 8, "physicalDamage": 95, "spellName": "",
									"spellSlot": -1, "trueDamage": 0, "type": "OTHER"
								}
							],
							"victimDamageReceived": [
								{
									"basic": false, "magicDamage": 600, "name": "Ahri",
									"participantId": 3, "physicalDamage": 0, "spellName": "ahriorbofdeception",
									"spellSlot": 0, "trueDamage": 120, "type": "OTHER"
								}
							]
						},
						{
							"type": "BUILDING_KILL",
							"timestamp": 65000,
							"bounty": 50,
							"buildingType": "TOWER_BUILDING",
							"killerId": 3,
							"laneType": "MID_LANE",
							"position": {"x": 5846, "y": 6396},
							"teamId": 200,
							"towerType": "OUTER_TURRET"
						},
						{
							"type": "CHAMPION_SPECIAL_KILL",
							"timestamp": 65500,
							"killType": "KILL_MULTI",
							"killerId": 3,
							"multiKillLength": 2,
							"position": {"x": 8000, "y": 1500}
						},
						{
							"type": "DRAGON_SOUL_GIVEN",
							"timestamp": 66000,
							"name": "Mountain",
							"teamId": 100
						},
						{
							"type": "ELITE_MONSTER_KILL",
							"timestamp": 67000,
							"assistingParticipantIds": [1, 2],
							"bounty": 500,
							"killerId": 5,
							"killerTeamId": 100,
							"monsterSubType": "MOUNTAIN_DRAGON",
							"monsterType": "DRAGON",
							"position": {"x": 9866, "y": 4414}
						},
						{
							"type": "TURRET_PLATE_DESTROYED",
							"timestamp": 68000,
							"killerId": 4,
							"laneType": "TOP_LANE",
							"position": {"x": 981, "y": 10441},
							"teamId": 200
						}
					]
				}
			]
		}
	})
}
