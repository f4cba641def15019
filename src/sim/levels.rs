//! Per-level tuning table
//!
//! Static read-only parameters looked up by level index. Lookups past the end
//! clamp to the last authored level; play continues there indefinitely with a
//! randomly chosen enemy art (see `World::advance_level`).

use serde::{Deserialize, Serialize};

/// Enemy artwork variants, one per authored level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyArt {
    Saucer,
    Gingerbread,
    CandyCane,
    Reindeer,
    Snowman,
}

impl EnemyArt {
    pub const ALL: [EnemyArt; 5] = [
        EnemyArt::Saucer,
        EnemyArt::Gingerbread,
        EnemyArt::CandyCane,
        EnemyArt::Reindeer,
        EnemyArt::Snowman,
    ];

    /// Asset base name the frontend resolves to an image
    pub fn asset_name(&self) -> &'static str {
        match self {
            EnemyArt::Saucer => "santa_saucer",
            EnemyArt::Gingerbread => "evil_gingerbreadman",
            EnemyArt::CandyCane => "evil_candy_cane",
            EnemyArt::Reindeer => "robotic_reindeer",
            EnemyArt::Snowman => "evil_snowman",
        }
    }
}

/// Tuning for a single level. Speeds are logical pixels per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelParams {
    pub art: EnemyArt,
    /// Base horizontal formation speed (before the per-kill bonus)
    pub invader_speed: f32,
    pub invader_points: u64,
    /// Return-fire roll: a present spawns when `0..=101 < shot_chance`
    pub shot_chance: u32,
    pub sleigh_speed: f32,
    pub sleigh_points: u64,
    pub bag_points: u64,
    /// Guided bag fall speed and maximum horizontal pursuit speed
    pub bag_fall_speed: f32,
    pub bag_max_drift: f32,
    pub present_speed: f32,
}

pub const LEVELS: [LevelParams; 5] = [
    LevelParams {
        art: EnemyArt::Saucer,
        invader_speed: 2.0,
        invader_points: 10,
        shot_chance: 1,
        sleigh_speed: 2.0,
        sleigh_points: 300,
        bag_points: 25,
        bag_fall_speed: 8.0,
        bag_max_drift: 15.0,
        present_speed: 6.0,
    },
    LevelParams {
        art: EnemyArt::Gingerbread,
        invader_speed: 3.0,
        invader_points: 15,
        shot_chance: 1,
        sleigh_speed: 3.0,
        sleigh_points: 400,
        bag_points: 25,
        bag_fall_speed: 8.0,
        bag_max_drift: 15.0,
        present_speed: 7.0,
    },
    LevelParams {
        art: EnemyArt::CandyCane,
        invader_speed: 4.0,
        invader_points: 15,
        shot_chance: 2,
        sleigh_speed: 4.0,
        sleigh_points: 400,
        bag_points: 25,
        bag_fall_speed: 9.0,
        bag_max_drift: 16.0,
        present_speed: 7.0,
    },
    LevelParams {
        art: EnemyArt::Reindeer,
        invader_speed: 6.0,
        invader_points: 20,
        shot_chance: 2,
        sleigh_speed: 5.0,
        sleigh_points: 500,
        bag_points: 25,
        bag_fall_speed: 10.0,
        bag_max_drift: 17.0,
        present_speed: 8.0,
    },
    LevelParams {
        art: EnemyArt::Snowman,
        invader_speed: 8.0,
        invader_points: 25,
        shot_chance: 3,
        sleigh_speed: 6.0,
        sleigh_points: 600,
        bag_points: 25,
        bag_fall_speed: 11.0,
        bag_max_drift: 18.0,
        present_speed: 10.0,
    },
];

/// Index of the last authored level
pub fn last_level() -> usize {
    LEVELS.len() - 1
}

/// Parameters for `level`, clamped to the last authored entry
pub fn params(level: usize) -> &'static LevelParams {
    &LEVELS[level.min(last_level())]
}
