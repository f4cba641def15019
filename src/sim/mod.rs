//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, owned by the `World`
//! - Stable iteration order (row-major over the grid, in-order over lists)
//! - No rendering or platform dependencies

pub mod collision;
pub mod geom;
pub mod levels;
pub mod mask;
pub mod sprites;
pub mod state;
pub mod tick;

pub use collision::resolve_collisions;
pub use geom::Rect;
pub use levels::{EnemyArt, LevelParams, LEVELS};
pub use mask::SpriteMask;
pub use sprites::{Sprite, SpriteSet};
pub use state::{
    CellState, Explosion, Fireplace, Formation, GameEvent, GamePhase, GuidedBag, Player,
    PlayerSprite, Present, Sleigh, Snowflake, Star, World,
};
pub use tick::{tick, TickInput};
