//! Santavaders - a fixed-tick Christmas invaders arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, game state)
//! - `frontend`: Draw-command emission and raw-input translation
//! - `audio`: Sound-cue intent with stereo pan by screen position
//! - `highscores`: Plain-text top-10 ledger
//! - `settings`: Player preferences

pub mod audio;
pub mod frontend;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Simulation cadence (ticks per second); one tick is the atomic unit
    pub const TICK_RATE: u32 = 60;

    /// Logical canvas dimensions; presentation scales, the core never does
    pub const SCREEN_W: f32 = 2048.0;
    pub const SCREEN_H: f32 = 1536.0;

    /// Player movement per tick while a direction key is held
    pub const PLAYER_SPEED: f32 = 8.0;
    /// Upward speed of the player's star projectile
    pub const STAR_SPEED: f32 = 15.0;

    /// Enemy formation dimensions
    pub const GRID_ROWS: usize = 5;
    pub const GRID_COLS: usize = 11;
    /// Vertical step the formation takes on each direction reversal
    pub const FORMATION_DESCENT: f32 = 25.0;
    /// Formation spawn height: base plus a per-level offset
    pub const FORMATION_BASE_Y: f32 = 120.0;
    pub const FORMATION_Y_PER_LEVEL: f32 = 20.0;
    /// Added to the formation's base speed for every enemy killed
    pub const SPEED_BONUS_PER_KILL: f32 = 0.1;

    /// Bonus flyer altitude and respawn cooldown (11 seconds)
    pub const SLEIGH_Y: f32 = 20.0;
    pub const SLEIGH_COOLDOWN_TICKS: u32 = 11 * TICK_RATE;

    /// Proportional gain of the guided bag's pursuit controller
    pub const BAG_PURSUIT_GAIN: f32 = 0.1;

    /// Explosion animation: frame count and ticks per frame
    pub const EXPLOSION_FRAMES: usize = 7;
    pub const EXPLOSION_FRAME_TICKS: u32 = 2;

    /// Shields: count, damage threshold, and clearance above the player row
    pub const FIREPLACE_COUNT: usize = 4;
    pub const FIREPLACE_MAX_HITS: u32 = 12;
    pub const FIREPLACE_RAISE: f32 = 50.0;

    /// Cosmetic snowfall particle count
    pub const SNOWFLAKE_COUNT: usize = 200;

    /// Freeze between a cleared grid and the next level (3 seconds)
    pub const LEVEL_CLEAR_DELAY_TICKS: u32 = 3 * TICK_RATE;
    /// Minimum game-over display before restart input is accepted (4 seconds)
    pub const GAME_OVER_LOCK_TICKS: u32 = 4 * TICK_RATE;
}
