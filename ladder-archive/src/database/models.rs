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

//! Row-to-table wiring: every persisted row type declares its table and
//! column list and binds itself in column order. Column names mirror the
//! upstream field spelling.

use std::str::FromStr;

use sqlx::types::{BigDecimal, Json};

use crate::{
	database::{batch::Batch, TableRow},
	error::{ArchiveError, Result},
	parse::{
		non_timeline::{
			BanRow, ChallengesRow, FeatRow, InfoRow, MetadataRow, ObjectiveRow, ParticipantStatsRow,
			PerkIdsRow, PerkValuesRow,
		},
		timeline::{
			BuildingKillRow, ChampionKillRow, ChampionSpecialKillRow, DamageInstanceRow, DragonSoulGivenRow,
			EliteMonsterKillRow, FrameStatsRow, RareEventRow, TurretPlateDestroyedRow,
		},
	},
};

/// One ladder entry as persisted by the players stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRow {
	pub puuid: String,
	pub queue_type: String,
	pub tier: String,
	pub division: String,
	pub wins: i64,
	pub losses: i64,
	pub region: String,
	pub updated_at: i64,
}

impl TableRow for PlayerRow {
	const TABLE: &'static str = "game_data.players";
	const COLUMNS: &'static [&'static str] =
		&["puuid", "queue_type", "tier", "division", "wins", "losses", "region", "updated_at"];

	fn bind(&self, batch: &mut Batch) -> Result<()> {
		batch.push(self.puuid.as_str())?;
		batch.push(self.queue_type.as_str())?;
		batch.push(self.tier.as_str())?;
		batch.push(self.division.as_str())?;
		batch.push(self.wins)?;
		batch.push(self.losses)?;
		batch.push(self.region.as_str())?;
		batch.push(self.updated_at)?;
		Ok(())
	}
}

impl TableRow for MetadataRow {
	const TABLE: &'static str = "game_data.metadata";
	const COLUMNS: &'static [&'static str] = &["matchId", "dataVersion", "participants"];

	fn bind(&self, batch: &mut Batch) -> Result<()> {
		batch.push(self.match_id.as_str())?;
		batch.push(self.data_version.as_str())?;
		batch.push(self.participants.clone())?;
		Ok(())
	}
}

impl TableRow for InfoRow {
	const TABLE: &'static str = "game_data.info";
	const COLUMNS: &'static [&'static str] = &[
		"endOfGameResult",
		"gameCreation",
		"gameDuration",
		"gameEndTimestamp",
		"matchId",
		"gameStartTimestamp",
		"gameType",
		"gameVersion",
		"season",
		"patch",
		"subVersion",
		"mapId",
		"platformId",
		"queueId",
	];

	fn bind(&self, batch: &mut Batch) -> Result<()> {
		batch.push(self.end_of_game_result.as_str())?;
		batch.push(self.game_creation)?;
		batch.push(self.game_duration)?;
		batch.push(self.game_end_timestamp)?;
		batch.push(self.match_id)?;
		batch.push(self.game_start_timestamp)?;
		batch.push(self.game_type.as_str())?;
		batch.push(self.game_version.as_str())?;
		batch.push(self.season.as_str())?;
		batch.push(self.patch.as_str())?;
		batch.push(self.sub_version.as_str())?;
		batch.push(self.map_id)?;
		batch.push(self.platform_id.as_str())?;
		batch.push(self.queue_id)?;
		Ok(())
	}
}

impl TableRow for BanRow {
	const TABLE: &'static str = "game_data.bans";
	const COLUMNS: &'static [&'static str] = &["matchId", "teamId", "pickTurn", "championId"];

	fn bind(&self, batch: &mut Batch) -> Result<()> {
		batch.push(self.match_id)?;
		batch.push(self.team_id)?;
		batch.push(self.pick_turn)?;
		batch.push(self.champion_id)?;
		Ok(())
	}
}

impl TableRow for FeatRow {
	const TABLE: &'static str = "game_data.feats";
	const COLUMNS: &'static [&'static str] = &["matchId", "teamId", "featType", "featState"];

	fn bind(&self, batch: &mut Batch) -> Result<()> {
		batch.push(self.match_id)?;
		batch.push(self.team_id)?;
		batch.push(self.feat_type)?;
		batch.push(self.feat_state)?;
		Ok(())
	}
}

impl TableRow for ObjectiveRow {
	const TABLE: &'static str = "game_data.objectives";
	const COLUMNS: &'static [&'static str] = &["matchId", "teamId", "objectiveType", "first", "kills"];

	fn bind(&self, batch: &mut Batch) -> Result<()> {
		batch.push(self.match_id)?;
		batch.push(self.team_id)?;
		batch.push(self.objective_type)?;
		batch.push(self.first)?;
		batch.push(self.kills)?;
		Ok(())
	}
}

impl TableRow for ParticipantStatsRow {
	const TABLE: &'static str = "game_data.participant_stats";
	const COLUMNS: &'static [&'static str] = &[
		"matchId",
		"participantId",
		"puuid",
		"teamId",
		"summonerId",
		"summonerLevel",
		"summonerName",
		"riotIdGameName",
		"riotIdTagline",
		"profileIcon",
		"championId",
		"championTransform",
		"champLevel",
		"champExperience",
		"teamPosition",
		"win",
		"gameEndedInEarlySurrender",
		"gameEndedInSurrender",
		"teamEarlySurrendered",
		"kills",
		"deaths",
		"assists",
		"doubleKills",
		"tripleKills",
		"quadraKills",
		"pentaKills",
		"killingSprees",
		"largestKillingSpree",
		"largestMultiKill",
		"largestCriticalStrike",
		"firstBloodKill",
		"firstBloodAssist",
		"firstTowerKill",
		"firstTowerAssist",
		"goldEarned",
		"goldSpent",
		"consumablesPurchased",
		"itemsPurchased",
		"item0",
		"item1",
		"item2",
		"item3",
		"item4",
		"item5",
		"item6",
		"totalDamageDealt",
		"totalDamageDealtToChampions",
		"physicalDamageDealt",
		"physicalDamageDealtToChampions",
		"magicDamageDealt",
		"magicDamageDealtToChampions",
		"trueDamageDealt",
		"trueDamageDealtToChampions",
		"damageDealtToBuildings",
		"damageDealtToTurrets",
		"damageDealtToObjectives",
		"damageDealtToEpicMonsters",
		"totalDamageTaken",
		"physicalDamageTaken",
		"magicDamageTaken",
		"trueDamageTaken",
		"damageSelfMitigated",
		"totalHeal",
		"totalHealsOnTeammates",
		"totalUnitsHealed",
		"totalDamageShieldedOnTeammates",
		"timeCCingOthers",
		"totalTimeCCDealt",
		"totalMinionsKilled",
		"neutralMinionsKilled",
		"totalAllyJungleMinionsKilled",
		"totalEnemyJungleMinionsKilled",
		"baronKills",
		"dragonKills",
		"inhibitorKills",
		"inhibitorTakedowns",
		"inhibitorsLost",
		"turretKills",
		"turretTakedowns",
		"turretsLost",
		"objectivesStolen",
		"objectivesStolenAssists",
		"visionScore",
		"wardsPlaced",
		"wardsKilled",
		"detectorWardsPlaced",
		"sightWardsBoughtInGame",
		"visionWardsBoughtInGame",
		"visionClearedPings",
		"summoner1Id",
		"summoner2Id",
		"summoner1Casts",
		"summoner2Casts",
		"spell1Casts",
		"spell2Casts",
		"spell3Casts",
		"spell4Casts",
		"roleBoundItem",
		"bountyLevel",
		"timePlayed",
		"totalTimeSpentDead",
		"longestTimeSpentLiving",
		"allInPings",
		"assistMePings",
		"basicPings",
		"commandPings",
		"dangerPings",
		"enemyMissingPings",
		"enemyVisionPings",
		"getBackPings",
		"holdPings",
		"needVisionPings",
		"onMyWayPings",
		"pushPings",
		"retreatPings",
		"unrealKills",
	];

	fn bind(&self, batch: &mut Batch) -> Result<()> {
		batch.push(self.match_id)?;
		batch.push(self.participant_id)?;
		batch.push(self.puuid.as_str())?;
		batch.push(self.team_id)?;
		batch.push(self.summoner_id.as_str())?;
		batch.push(self.summoner_level)?;
		batch.push(self.summoner_name.as_str())?;
		batch.push(self.riot_id_game_name.as_str())?;
		batch.push(self.riot_id_tagline.as_str())?;
		batch.push(self.profile_icon)?;
		batch.push(self.champion_id)?;
		batch.push(self.champion_transform)?;
		batch.push(self.champ_level)?;
		batch.push(self.champ_experience)?;
		batch.push(self.team_position.as_str())?;
		batch.push(self.win)?;
		batch.push(self.game_ended_in_early_surrender)?;
		batch.push(self.game_ended_in_surrender)?;
		batch.push(self.team_early_surrendered)?;
		batch.push(self.kills)?;
		batch.push(self.deaths)?;
		batch.push(self.assists)?;
		batch.push(self.double_kills)?;
		batch.push(self.triple_kills)?;
		batch.push(self.quadra_kills)?;
		batch.push(self.penta_kills)?;
		batch.push(self.killing_sprees)?;
		batch.push(self.largest_killing_spree)?;
		batch.push(self.largest_multi_kill)?;
		batch.push(self.largest_critical_strike)?;
		batch.push(self.first_blood_kill)?;
		batch.push(self.first_blood_assist)?;
		batch.push(self.first_tower_kill)?;
		batch.push(self.first_tower_assist)?;
		batch.push(self.gold_earned)?;
		batch.push(self.gold_spent)?;
		batch.push(self.consumables_purchased)?;
		batch.push(self.items_purchased)?;
		batch.push(self.item0)?;
		batch.push(self.item1)?;
		batch.push(self.item2)?;
		batch.push(self.item3)?;
		batch.push(self.item4)?;
		batch.push(self.item5)?;
		batch.push(self.item6)?;
		batch.push(self.total_damage_dealt)?;
		batch.push(self.total_damage_dealt_to_champions)?;
		batch.push(self.physical_damage_dealt)?;
		batch.push(self.physical_damage_dealt_to_champions)?;
		batch.push(self.magic_damage_dealt)?;
		batch.push(self.magic_damage_dealt_to_champions)?;
		batch.push(self.true_damage_dealt)?;
		batch.push(self.true_damage_dealt_to_champions)?;
		batch.push(self.damage_dealt_to_buildings)?;
		batch.push(self.damage_dealt_to_turrets)?;
		batch.push(self.damage_dealt_to_objectives)?;
		batch.push(self.damage_dealt_to_epic_monsters)?;
		batch.push(self.total_damage_taken)?;
		batch.push(self.physical_damage_taken)?;
		batch.push(self.magic_damage_taken)?;
		batch.push(self.true_damage_taken)?;
		batch.push(self.damage_self_mitigated)?;
		batch.push(self.total_heal)?;
		batch.push(self.total_heals_on_teammates)?;
		batch.push(self.total_units_healed)?;
		batch.push(self.total_damage_shielded_on_teammates)?;
		batch.push(self.time_ccing_others)?;
		batch.push(self.total_time_cc_dealt)?;
		batch.push(self.total_minions_killed)?;
		batch.push(self.neutral_minions_killed)?;
		batch.push(self.total_ally_jungle_minions_killed)?;
		batch.push(self.total_enemy_jungle_minions_killed)?;
		batch.push(self.baron_kills)?;
		batch.push(self.dragon_kills)?;
		batch.push(self.inhibitor_kills)?;
		batch.push(self.inhibitor_takedowns)?;
		batch.push(self.inhibitors_lost)?;
		batch.push(self.turret_kills)?;
		batch.push(self.turret_takedowns)?;
		batch.push(self.turrets_lost)?;
		batch.push(self.objectives_stolen)?;
		batch.push(self.objectives_stolen_assists)?;
		batch.push(self.vision_score)?;
		batch.push(self.wards_placed)?;
		batch.push(self.wards_killed)?;
		batch.push(self.detector_wards_placed)?;
		batch.push(self.sight_wards_bought_in_game)?;
		batch.push(self.vision_wards_bought_in_game)?;
		batch.push(self.vision_cleared_pings)?;
		batch.push(self.summoner1_id)?;
		batch.push(self.summoner2_id)?;
		batch.push(self.summoner1_casts)?;
		batch.push(self.summoner2_casts)?;
		batch.push(self.spell1_casts)?;
		batch.push(self.spell2_casts)?;
		batch.push(self.spell3_casts)?;
		batch.push(self.spell4_casts)?;
		batch.push(self.role_bound_item)?;
		batch.push(self.bounty_level)?;
		batch.push(self.time_played)?;
		batch.push(self.total_time_spent_dead)?;
		batch.push(self.longest_time_spent_living)?;
		batch.push(self.all_in_pings)?;
		batch.push(self.assist_me_pings)?;
		batch.push(self.basic_pings)?;
		batch.push(self.command_pings)?;
		batch.push(self.danger_pings)?;
		batch.push(self.enemy_missing_pings)?;
		batch.push(self.enemy_vision_pings)?;
		batch.push(self.get_back_pings)?;
		batch.push(self.hold_pings)?;
		batch.push(self.need_vision_pings)?;
		batch.push(self.on_my_way_pings)?;
		batch.push(self.push_pings)?;
		batch.push(self.retreat_pings)?;
		batch.push(self.unreal_kills)?;
		Ok(())
	}
}

impl TableRow for ChallengesRow {
	const TABLE: &'static str = "game_data.participant_challenges";
	const COLUMNS: &'static [&'static str] = &["matchId", "teamId", "puuid", "payload"];

	fn bind(&self, batch: &mut Batch) -> Result<()> {
		batch.push(self.match_id)?;
		batch.push(self.team_id)?;
		batch.push(self.puuid.as_str())?;
		batch.push(Json(&self.payload))?;
		Ok(())
	}
}

impl TableRow for PerkValuesRow {
	const TABLE: &'static str = "game_data.participant_perk_values";
	const COLUMNS: &'static [&'static str] = &[
		"matchId",
		"teamId",
		"puuid",
		"primary_var1_1",
		"primary_var2_1",
		"primary_var3_1",
		"primary_var1_2",
		"primary_var2_2",
		"primary_var3_2",
		"primary_var1_3",
		"primary_var2_3",
		"primary_var3_3",
		"primary_var1_4",
		"primary_var2_4",
		"primary_var3_4",
		"sub_var1_1",
		"sub_var2_1",
		"sub_var3_1",
		"sub_var1_2",
		"sub_var2_2",
		"sub_var3_2",
	];

	fn bind(&self, batch: &mut Batch) -> Result<()> {
		batch.push(self.match_id)?;
		batch.push(self.team_id)?;
		batch.push(self.puuid.as_str())?;
		batch.push(self.primary_var1_1)?;
		batch.push(self.primary_var2_1)?;
		batch.push(self.primary_var3_1)?;
		batch.push(self.primary_var1_2)?;
		batch.push(self.primary_var2_2)?;
		batch.push(self.primary_var3_2)?;
		batch.push(self.primary_var1_3)?;
		batch.push(self.primary_var2_3)?;
		batch.push(self.primary_var3_3)?;
		batch.push(self.primary_var1_4)?;
		batch.push(self.primary_var2_4)?;
		batch.push(self.primary_var3_4)?;
		batch.push(self.sub_var1_1)?;
		batch.push(self.sub_var2_1)?;
		batch.push(self.sub_var3_1)?;
		batch.push(self.sub_var1_2)?;
		batch.push(self.sub_var2_2)?;
		batch.push(self.sub_var3_2)?;
		Ok(())
	}
}

impl TableRow for PerkIdsRow {
	const TABLE: &'static str = "game_data.participant_perk_ids";
	const COLUMNS: &'static [&'static str] = &[
		"matchId",
		"teamId",
		"puuid",
		"stat_defense",
		"stat_flex",
		"stat_offense",
		"primary_style",
		"sub_style",
		"primary_perk_1",
		"primary_perk_2",
		"primary_perk_3",
		"primary_perk_4",
		"sub_perk_1",
		"sub_perk_2",
		"perk_combo_key",
	];

	fn bind(&self, batch: &mut Batch) -> Result<()> {
		batch.push(self.match_id)?;
		batch.push(self.team_id)?;
		batch.push(self.puuid.as_str())?;
		batch.push(self.stat_defense)?;
		batch.push(self.stat_flex)?;
		batch.push(self.stat_offense)?;
		batch.push(self.primary_style)?;
		batch.push(self.sub_style)?;
		batch.push(self.primary_perk_1)?;
		batch.push(self.primary_perk_2)?;
		batch.push(self.primary_perk_3)?;
		batch.push(self.primary_perk_4)?;
		batch.push(self.sub_perk_1)?;
		batch.push(self.sub_perk_2)?;
		let combo = BigDecimal::from_str(&self.perk_combo_key.to_string())
			.map_err(|e| ArchiveError::Validation(e.to_string()))?;
		batch.push(combo)?;
		Ok(())
	}
}

impl TableRow for FrameStatsRow {
	const TABLE: &'static str = "game_data.tl_participant_stats";
	const COLUMNS: &'static [&'static str] = &[
		"matchId",
		"frame_timestamp",
		"participantId",
		"abilityHaste",
		"abilityPower",
		"armor",
		"attackDamage",
		"attackSpeed",
		"ccReduction",
		"cooldownReduction",
		"health",
		"healthMax",
		"healthRegen",
		"magicResist",
		"movementSpeed",
		"power",
		"powerMax",
		"powerRegen",
		"payload",
		"currentGold",
		"magicDamageDone",
		"magicDamageDoneToChampions",
		"magicDamageTaken",
		"physicalDamageDone",
		"physicalDamageDoneToChampions",
		"physicalDamageTaken",
		"totalDamageDone",
		"totalDamageDoneToChampions",
		"totalDamageTaken",
		"trueDamageDone",
		"trueDamageDoneToChampions",
		"trueDamageTaken",
		"goldPerSecond",
		"jungleMinionsKilled",
		"level",
		"minionsKilled",
		"position_x",
		"position_y",
		"timeEnemySpentControlled",
		"totalGold",
		"xp",
	];

	fn bind(&self, batch: &mut Batch) -> Result<()> {
		batch.push(self.match_id)?;
		batch.push(self.frame_timestamp)?;
		batch.push(self.participant_id)?;
		batch.push(self.ability_haste)?;
		batch.push(self.ability_power)?;
		batch.push(self.armor)?;
		batch.push(self.attack_damage)?;
		batch.push(self.attack_speed)?;
		batch.push(self.cc_reduction)?;
		batch.push(self.cooldown_reduction)?;
		batch.push(self.health)?;
		batch.push(self.health_max)?;
		batch.push(self.health_regen)?;
		batch.push(self.magic_resist)?;
		batch.push(self.movement_speed)?;
		batch.push(self.power)?;
		batch.push(self.power_max)?;
		batch.push(self.power_regen)?;
		batch.push(Json(&self.payload))?;
		batch.push(self.current_gold)?;
		batch.push(self.magic_damage_done)?;
		batch.push(self.magic_damage_done_to_champions)?;
		batch.push(self.magic_damage_taken)?;
		batch.push(self.physical_damage_done)?;
		batch.push(self.physical_damage_done_to_champions)?;
		batch.push(self.physical_damage_taken)?;
		batch.push(self.total_damage_done)?;
		batch.push(self.total_damage_done_to_champions)?;
		batch.push(self.total_damage_taken)?;
		batch.push(self.true_damage_done)?;
		batch.push(self.true_damage_done_to_champions)?;
		batch.push(self.true_damage_taken)?;
		batch.push(self.gold_per_second)?;
		batch.push(self.jungle_minions_killed)?;
		batch.push(self.level)?;
		batch.push(self.minions_killed)?;
		batch.push(self.position_x)?;
		batch.push(self.position_y)?;
		batch.push(self.time_enemy_spent_controlled)?;
		batch.push(self.total_gold)?;
		batch.push(self.xp)?;
		Ok(())
	}
}

impl TableRow for BuildingKillRow {
	const TABLE: &'static str = "game_data.tl_building_kill";
	const COLUMNS: &'static [&'static str] = &[
		"matchId",
		"frame_timestamp",
		"timestamp",
		"bounty",
		"buildingType",
		"killerId",
		"laneType",
		"position_x",
		"position_y",
		"teamId",
		"towerType",
	];

	fn bind(&self, batch: &mut Batch) -> Result<()> {
		batch.push(self.match_id)?;
		batch.push(self.frame_timestamp)?;
		batch.push(self.timestamp)?;
		batch.push(self.bounty)?;
		batch.push(self.building_type.as_str())?;
		batch.push(self.killer_id)?;
		batch.push(self.lane_type.as_str())?;
		batch.push(self.position_x)?;
		batch.push(self.position_y)?;
		batch.push(self.team_id)?;
		batch.push(self.tower_type.as_deref())?;
		Ok(())
	}
}

impl TableRow for ChampionKillRow {
	const TABLE: &'static str = "game_data.tl_champion_kill";
	const COLUMNS: &'static [&'static str] = &[
		"matchId",
		"frame_timestamp",
		"timestamp",
		"champion_kill_event_id",
		"killerId",
		"victimId",
		"bounty",
		"killStreakLength",
		"shutdownBounty",
		"position_x",
		"position_y",
	];

	fn bind(&self, batch: &mut Batch) -> Result<()> {
		batch.push(self.match_id)?;
		batch.push(self.frame_timestamp)?;
		batch.push(self.timestamp)?;
		batch.push(self.champion_kill_event_id.as_str())?;
		batch.push(self.killer_id)?;
		batch.push(self.victim_id)?;
		batch.push(self.bounty)?;
		batch.push(self.kill_streak_length)?;
		batch.push(self.shutdown_bounty)?;
		batch.push(self.position_x)?;
		batch.push(self.position_y)?;
		Ok(())
	}
}

impl TableRow for ChampionSpecialKillRow {
	const TABLE: &'static str = "game_data.tl_champion_special_kill";
	const COLUMNS: &'static [&'static str] = &[
		"matchId",
		"frame_timestamp",
		"timestamp",
		"killType",
		"killerId",
		"position_x",
		"position_y",
		"multiKillLength",
	];

	fn bind(&self, batch: &mut Batch) -> Result<()> {
		batch.push(self.match_id)?;
		batch.push(self.frame_timestamp)?;
		batch.push(self.timestamp)?;
		batch.push(self.kill_type.as_str())?;
		batch.push(self.killer_id)?;
		batch.push(self.position_x)?;
		batch.push(self.position_y)?;
		batch.push(self.multi_kill_length)?;
		Ok(())
	}
}

impl TableRow for DragonSoulGivenRow {
	const TABLE: &'static str = "game_data.tl_dragon_soul_given";
	const COLUMNS: &'static [&'static str] = &["matchId", "frame_timestamp", "timestamp", "name", "teamId"];

	fn bind(&self, batch: &mut Batch) -> Result<()> {
		batch.push(self.match_id)?;
		batch.push(self.frame_timestamp)?;
		batch.push(self.timestamp)?;
		batch.push(self.name.as_str())?;
		batch.push(self.team_id)?;
		Ok(())
	}
}

impl TableRow for EliteMonsterKillRow {
	const TABLE: &'static str = "game_data.tl_elite_monster_kill";
	const COLUMNS: &'static [&'static str] = &[
		"matchId",
		"frame_timestamp",
		"timestamp",
		"assistingParticipantIds",
		"bounty",
		"killerId",
		"killerTeamId",
		"monsterSubType",
		"monsterType",
		"position_x",
		"position_y",
	];

	fn bind(&self, batch: &mut Batch) -> Result<()> {
		batch.push(self.match_id)?;
		batch.push(self.frame_timestamp)?;
		batch.push(self.timestamp)?;
		batch.push(self.assisting_participant_ids.clone())?;
		batch.push(self.bounty)?;
		batch.push(self.killer_id)?;
		batch.push(self.killer_team_id)?;
		batch.push(self.monster_sub_type.as_deref())?;
		batch.push(self.monster_type.as_str())?;
		batch.push(self.position_x)?;
		batch.push(self.position_y)?;
		Ok(())
	}
}

impl TableRow for TurretPlateDestroyedRow {
	const TABLE: &'static str = "game_data.tl_turret_plate_destroyed";
	const COLUMNS: &'static [&'static str] = &[
		"matchId",
		"frame_timestamp",
		"timestamp",
		"killerId",
		"laneType",
		"position_x",
		"position_y",
		"teamId",
	];

	fn bind(&self, batch: &mut Batch) -> Result<()> {
		batch.push(self.match_id)?;
		batch.push(self.frame_timestamp)?;
		batch.push(self.timestamp)?;
		batch.push(self.killer_id)?;
		batch.push(self.lane_type.as_str())?;
		batch.push(self.position_x)?;
		batch.push(self.position_y)?;
		batch.push(self.team_id)?;
		Ok(())
	}
}

impl TableRow for RareEventRow {
	const TABLE: &'static str = "game_data.tl_rare_events";
	const COLUMNS: &'static [&'static str] = &["matchId", "frame_timestamp", "type", "timestamp", "payload"];

	fn bind(&self, batch: &mut Batch) -> Result<()> {
		batch.push(self.match_id)?;
		batch.push(self.frame_timestamp)?;
		batch.push(self.event_type.as_str())?;
		batch.push(self.timestamp)?;
		batch.push(Json(&self.payload))?;
		Ok(())
	}
}

impl TableRow for DamageInstanceRow {
	// inserted into the dealt/received tables via an explicit table override
	const TABLE: &'static str = "game_data.tl_ck_victim_damage_dealt";
	const COLUMNS: &'static [&'static str] = &[
		"matchId",
		"frame_timestamp",
		"timestamp",
		"champion_kill_event_id",
		"direction",
		"idx",
		"basic",
		"magicDamage",
		"name",
		"participantId",
		"physicalDamage",
		"spellName",
		"spellSlot",
		"trueDamage",
		"type",
	];

	fn bind(&self, batch: &mut Batch) -> Result<()> {
		batch.push(self.match_id)?;
		batch.push(self.frame_timestamp)?;
		batch.push(self.timestamp)?;
		batch.push(self.champion_kill_event_id.as_str())?;
		batch.push(self.direction)?;
		batch.push(self.idx)?;
		batch.push(self.basic)?;
		batch.push(self.magic_damage)?;
		batch.push(self.name.as_str())?;
		batch.push(self.participant_id)?;
		batch.push(self.physical_damage)?;
		batch.push(self.spell_name.as_str())?;
		batch.push(self.spell_slot)?;
		batch.push(self.true_damage)?;
		batch.push(self.damage_type.as_str())?;
		Ok(())
	}
}
