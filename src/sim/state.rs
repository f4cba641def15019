//! World state and entity records
//!
//! Everything the simulation mutates lives in the single `World` aggregate;
//! update functions receive it explicitly. Determinism requirements:
//! - Fixed timestep only
//! - Seeded RNG only, owned by the world
//! - Stable iteration order (row-major over the grid, in-order over lists)
//! - No rendering or platform dependencies

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::levels::{self, EnemyArt};
use super::mask::SpriteMask;
use super::sprites::SpriteSet;
use crate::audio::SoundCue;
use crate::consts::*;

/// Current phase of the game state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for fire input
    Title,
    /// Active gameplay
    Running,
    /// Frozen mid-run
    Paused,
    /// Run ended; restart unlocks after a fixed display delay
    GameOver,
}

/// Player sprite variant; selects both the drawn image and the collision mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerSprite {
    /// Star mounted on the tree, ready to fire
    Armed,
    /// Star in flight
    Fired,
}

/// The player's tree at the bottom of the screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub sprite: PlayerSprite,
}

impl Player {
    /// Spawn centered on the bottom edge
    pub fn spawn(sprites: &SpriteSet) -> Self {
        Self {
            pos: Vec2::new(
                SCREEN_W / 2.0 - sprites.player_armed.width() / 2.0,
                SCREEN_H - sprites.player_armed.height(),
            ),
            sprite: PlayerSprite::Armed,
        }
    }

    pub fn rect(&self, sprites: &SpriteSet) -> Rect {
        Rect::at(self.pos, sprites.player_armed.size)
    }

    /// Collision mask for the current sprite variant
    pub fn mask<'a>(&self, sprites: &'a SpriteSet) -> &'a SpriteMask {
        match self.sprite {
            PlayerSprite::Armed => &sprites.player_armed.mask,
            PlayerSprite::Fired => &sprites.player_fired.mask,
        }
    }
}

/// The player's star projectile; at most one exists at a time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
}

impl Star {
    pub fn rect(&self, sprites: &SpriteSet) -> Rect {
        Rect::at(self.pos, sprites.star.size)
    }
}

/// Santa's sleigh crossing the top of the screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sleigh {
    pub pos: Vec2,
}

impl Sleigh {
    pub fn rect(&self, sprites: &SpriteSet) -> Rect {
        Rect::at(self.pos, sprites.sleigh.size)
    }
}

/// The guided bag the sleigh drops; homes on the player horizontally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidedBag {
    pub pos: Vec2,
}

impl GuidedBag {
    pub fn rect(&self, sprites: &SpriteSet) -> Rect {
        Rect::at(self.pos, sprites.bag.size)
    }
}

/// A present dropped by an enemy cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Present {
    pub pos: Vec2,
}

impl Present {
    pub fn rect(&self, sprites: &SpriteSet) -> Rect {
        Rect::at(self.pos, sprites.present.size)
    }
}

/// Lifecycle of one enemy grid cell. Exploding is entered only from Active
/// and ends in Dead; Dead never reactivates within a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Active,
    Exploding { frame: usize, age_ticks: u32 },
    Dead,
}

impl CellState {
    pub fn is_active(&self) -> bool {
        matches!(self, CellState::Active)
    }
}

/// The enemy grid as one rigid body: shared origin, shared direction sign,
/// per-cell lifecycle. Cell rectangles are derived on demand so collision and
/// drawing can never disagree within a tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formation {
    pub origin: Vec2,
    /// -1.0 moving left, +1.0 moving right
    pub dir: f32,
    pub cells: [[CellState; GRID_COLS]; GRID_ROWS],
}

impl Formation {
    /// Fresh full grid for the given level; starts at the left edge with the
    /// per-level spawn height
    pub fn new(level: usize) -> Self {
        Self {
            origin: Vec2::new(
                0.0,
                FORMATION_BASE_Y + FORMATION_Y_PER_LEVEL * level as f32,
            ),
            dir: -1.0,
            cells: [[CellState::Active; GRID_COLS]; GRID_ROWS],
        }
    }

    /// Screen rectangle of a cell, derived from the shared origin. Row/column
    /// stride is 1.5x the sprite dimension (sprite plus a half-sprite gap).
    pub fn cell_rect(&self, row: usize, col: usize, sprites: &SpriteSet) -> Rect {
        let size = sprites.invader.size;
        Rect::new(
            self.origin.x + col as f32 * size.x * 1.5,
            self.origin.y + row as f32 * size.y * 1.5,
            size.x,
            size.y,
        )
    }

    /// Row-major list of active cell coordinates
    pub fn active_cells(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for (row, cols) in self.cells.iter().enumerate() {
            for (col, cell) in cols.iter().enumerate() {
                if cell.is_active() {
                    out.push((row, col));
                }
            }
        }
        out
    }

    pub fn active_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| c.is_active())
            .count()
    }
}

/// A shield protecting the player; erodes under fire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fireplace {
    pub pos: Vec2,
    /// Erodible copy of the fireplace sprite mask
    pub mask: SpriteMask,
    /// Monotonically non-decreasing within a level
    pub hits: u32,
    pub active: bool,
}

impl Fireplace {
    pub fn rect(&self, sprites: &SpriteSet) -> Rect {
        Rect::at(self.pos, sprites.fireplace.size)
    }
}

/// A transient explosion animation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub frame: usize,
    pub age_ticks: u32,
}

impl Explosion {
    /// Explosion centered on an impact point
    pub fn centered_at(center: Vec2, sprites: &SpriteSet) -> Self {
        Self {
            pos: center - sprites.explosion / 2.0,
            frame: 0,
            age_ticks: 0,
        }
    }
}

/// A cosmetic snowfall particle; no gameplay interaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snowflake {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
}

impl Snowflake {
    pub fn random(rng: &mut Pcg32) -> Self {
        Self {
            pos: Vec2::new(
                rng.random_range(0.0..SCREEN_W),
                rng.random_range(0.0..SCREEN_H),
            ),
            size: rng.random_range(2..=5) as f32,
            speed: rng.random_range(1.0..3.0),
        }
    }

    /// Wrap back to the top edge with fresh horizontal position, size, speed
    pub fn respawn_at_top(&mut self, rng: &mut Pcg32) {
        self.pos.y = 0.0;
        self.pos.x = rng.random_range(0.0..SCREEN_W);
        self.size = rng.random_range(2..=5) as f32;
        self.speed = rng.random_range(1.0..3.0);
    }
}

/// Side-effect intents queued by the simulation for the frontend
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Play a cue panned to a screen x-position
    Sound { cue: SoundCue, x: f32 },
    /// Stop a looping cue
    StopSound { cue: SoundCue },
    /// A level began; the frontend may rotate background music here
    LevelStarted { level: usize },
    /// The run ended with this score
    GameOver { score: u64 },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Current level index, capped at the last authored level
    pub level: usize,
    pub score: u64,
    /// Formation speed bonus accrued from kills this level
    pub speed_bonus: f32,
    /// Enemy art drawn this level
    pub enemy_art: EnemyArt,
    pub player: Player,
    pub star: Option<Star>,
    pub sleigh: Option<Sleigh>,
    /// Ticks since the sleigh last deactivated (spawn cooldown clock)
    pub sleigh_idle_ticks: u32,
    pub bag: Option<GuidedBag>,
    pub formation: Formation,
    pub presents: Vec<Present>,
    pub fireplaces: Vec<Fireplace>,
    /// Cleared when the formation reaches the shield line; kills all shields
    pub shields_online: bool,
    pub explosions: Vec<Explosion>,
    pub snow: Vec<Snowflake>,
    /// Remaining freeze after a cleared grid, before the next level starts
    pub level_break_ticks: u32,
    /// Ticks spent on the game-over screen (gates restart input)
    pub game_over_ticks: u32,
    pub show_fps: bool,
    /// Set when the player asks to leave; the outer loop stops on it
    pub quit: bool,
    pub sprites: SpriteSet,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl World {
    /// Create a world on the title screen with the given seed
    pub fn new(seed: u64, sprites: SpriteSet) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let snow = (0..SNOWFLAKE_COUNT)
            .map(|_| Snowflake::random(&mut rng))
            .collect();
        let mut world = Self {
            seed,
            rng,
            phase: GamePhase::Title,
            time_ticks: 0,
            level: 0,
            score: 0,
            speed_bonus: 0.0,
            enemy_art: levels::params(0).art,
            player: Player::spawn(&sprites),
            star: None,
            sleigh: None,
            sleigh_idle_ticks: 0,
            bag: None,
            formation: Formation::new(0),
            presents: Vec::new(),
            fireplaces: Vec::new(),
            shields_online: true,
            explosions: Vec::new(),
            snow,
            level_break_ticks: 0,
            game_over_ticks: 0,
            show_fps: false,
            quit: false,
            sprites,
            events: Vec::new(),
        };
        world.fireplaces = world.make_fireplaces();
        world
    }

    /// Reset everything for a fresh run and enter level 0
    pub fn begin_run(&mut self) {
        self.score = 0;
        self.level = 0;
        self.enemy_art = levels::params(0).art;
        self.start_level();
        self.phase = GamePhase::Running;
    }

    /// Move to the next level: bump the index while authored levels remain,
    /// then repeat the last level's parameters with a random enemy art
    pub fn advance_level(&mut self) {
        if self.level < levels::last_level() {
            self.level += 1;
            self.enemy_art = levels::params(self.level).art;
        } else {
            let pick = self.rng.random_range(0..EnemyArt::ALL.len());
            self.enemy_art = EnemyArt::ALL[pick];
        }
        self.start_level();
    }

    /// Reinitialize all per-level entities; score and level index persist
    pub fn start_level(&mut self) {
        self.speed_bonus = 0.0;
        self.player = Player::spawn(&self.sprites);
        self.star = None;
        self.sleigh = None;
        self.sleigh_idle_ticks = 0;
        self.bag = None;
        self.formation = Formation::new(self.level);
        self.presents.clear();
        self.explosions.clear();
        self.fireplaces = self.make_fireplaces();
        self.shields_online = true;
        self.level_break_ticks = 0;
        self.events.push(GameEvent::LevelStarted { level: self.level });
    }

    /// Four fresh shields, evenly spaced across the screen
    fn make_fireplaces(&self) -> Vec<Fireplace> {
        let fw = self.sprites.fireplace.width();
        let gap = (SCREEN_W - FIREPLACE_COUNT as f32 * fw) / (FIREPLACE_COUNT as f32 + 1.0);
        let y = self.fireplace_line();
        (0..FIREPLACE_COUNT)
            .map(|i| Fireplace {
                pos: Vec2::new(gap * (i as f32 + 1.0) + fw * i as f32, y),
                mask: self.sprites.fireplace.mask.clone(),
                hits: 0,
                active: true,
            })
            .collect()
    }

    /// Top edge of the shield row
    pub fn fireplace_line(&self) -> f32 {
        SCREEN_H - self.sprites.player_armed.height()
            - self.sprites.fireplace.height()
            - FIREPLACE_RAISE
    }

    /// Freeze the simulation and enter the game-over screen
    pub fn set_game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        self.game_over_ticks = 0;
        self.push_stop(SoundCue::SleighFlyby);
        self.push_stop(SoundCue::BagAlarm);
        self.events.push(GameEvent::GameOver { score: self.score });
    }

    pub fn push_sound(&mut self, cue: SoundCue, x: f32) {
        self.events.push(GameEvent::Sound { cue, x });
    }

    pub fn push_stop(&mut self, cue: SoundCue) {
        self.events.push(GameEvent::StopSound { cue });
    }

    /// Drain queued side-effect intents for the frontend
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        World::new(42, SpriteSet::placeholder())
    }

    #[test]
    fn test_new_world_starts_on_title() {
        let w = world();
        assert_eq!(w.phase, GamePhase::Title);
        assert!(w.star.is_none());
        assert!(w.bag.is_none());
        assert!(w.sleigh.is_none());
        assert_eq!(w.snow.len(), SNOWFLAKE_COUNT);
        assert_eq!(w.fireplaces.len(), FIREPLACE_COUNT);
    }

    #[test]
    fn test_begin_run_full_grid() {
        let mut w = world();
        w.begin_run();
        assert_eq!(w.phase, GamePhase::Running);
        assert_eq!(w.formation.active_count(), GRID_ROWS * GRID_COLS);
        assert_eq!(w.score, 0);
        assert_eq!(w.level, 0);
    }

    #[test]
    fn test_fireplaces_evenly_spaced_and_fresh() {
        let w = world();
        let fw = w.sprites.fireplace.width();
        let gap = (SCREEN_W - 4.0 * fw) / 5.0;
        for (i, fp) in w.fireplaces.iter().enumerate() {
            assert_eq!(fp.pos.x, gap * (i as f32 + 1.0) + fw * i as f32);
            assert_eq!(fp.hits, 0);
            assert!(fp.active);
        }
        // Shield row sits between the formation spawn area and the player
        assert!(w.fireplace_line() < w.player.pos.y);
    }

    #[test]
    fn test_cell_rect_strides() {
        let w = world();
        let size = w.sprites.invader.size;
        let a = w.formation.cell_rect(0, 0, &w.sprites);
        let b = w.formation.cell_rect(0, 1, &w.sprites);
        let c = w.formation.cell_rect(1, 0, &w.sprites);
        assert_eq!(b.x - a.x, size.x * 1.5);
        assert_eq!(c.y - a.y, size.y * 1.5);
    }

    #[test]
    fn test_formation_fits_on_canvas() {
        let w = world();
        let right = w
            .formation
            .cell_rect(0, GRID_COLS - 1, &w.sprites)
            .right();
        assert!(right <= SCREEN_W);
    }

    #[test]
    fn test_advance_level_caps_index() {
        let mut w = world();
        w.begin_run();
        for _ in 0..10 {
            w.advance_level();
        }
        assert_eq!(w.level, levels::last_level());
    }

    #[test]
    fn test_start_level_preserves_score() {
        let mut w = world();
        w.begin_run();
        w.score = 1234;
        w.presents.push(Present {
            pos: Vec2::new(10.0, 10.0),
        });
        w.advance_level();
        assert_eq!(w.score, 1234);
        assert_eq!(w.level, 1);
        assert!(w.presents.is_empty());
        assert!(w.explosions.is_empty());
        assert!(w.shields_online);
        assert_eq!(w.fireplaces[0].hits, 0);
    }

    #[test]
    fn test_take_events_drains() {
        let mut w = world();
        w.push_sound(SoundCue::Explosion, 100.0);
        assert_eq!(w.take_events().len(), 1);
        assert!(w.take_events().is_empty());
    }
}
