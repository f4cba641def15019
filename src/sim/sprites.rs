//! Sprite metadata consumed by the simulation
//!
//! Asset decoding lives outside the crate. The core only needs each sprite's
//! pixel dimensions, plus an occupancy mask for the irregular shapes that use
//! pixel-accurate collision (player, star, bag, present, fireplace).
//! `SpriteSet::placeholder` supplies procedurally shaped stand-ins so the
//! simulation runs headless and the tests exercise real mask geometry.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::mask::SpriteMask;

/// One sprite's dimensions and occupancy mask
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub size: Vec2,
    pub mask: SpriteMask,
}

impl Sprite {
    /// Fully opaque sprite (rectangle-shaped art)
    pub fn filled(w: u32, h: u32) -> Self {
        Self {
            size: Vec2::new(w as f32, h as f32),
            mask: SpriteMask::filled(w, h),
        }
    }

    pub fn with_mask(mask: SpriteMask) -> Self {
        Self {
            size: Vec2::new(mask.width() as f32, mask.height() as f32),
            mask,
        }
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }
}

/// Every sprite the simulation measures or collides with.
///
/// Enemy art variants share one dimension/mask slot; which image the frontend
/// blits is chosen by the level's `EnemyArt`, but the formation math only
/// needs one size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteSet {
    pub player_armed: Sprite,
    pub player_fired: Sprite,
    pub star: Sprite,
    pub invader: Sprite,
    pub sleigh: Sprite,
    pub bag: Sprite,
    pub present: Sprite,
    pub fireplace: Sprite,
    /// Explosion frames only contribute a footprint, never a mask
    pub explosion: Vec2,
}

impl SpriteSet {
    /// Procedural stand-in set for headless runs and tests
    pub fn placeholder() -> Self {
        Self {
            player_armed: Sprite::with_mask(triangle_mask(128, 96)),
            player_fired: Sprite::with_mask(triangle_mask(128, 96)),
            star: Sprite::with_mask(diamond_mask(24, 48)),
            invader: Sprite::filled(96, 64),
            sleigh: Sprite::filled(160, 96),
            bag: Sprite::with_mask(ellipse_mask(48, 72)),
            present: Sprite::filled(48, 48),
            fireplace: Sprite::with_mask(house_mask(192, 160)),
            explosion: Vec2::new(96.0, 96.0),
        }
    }
}

/// Upward-pointing triangle, apex at the top center (tree silhouette)
fn triangle_mask(w: u32, h: u32) -> SpriteMask {
    SpriteMask::from_fn(w, h, move |x, y| {
        let half = w as f32 / 2.0;
        let spread = half * (y as f32 + 1.0) / h as f32;
        (x as f32 - half).abs() <= spread
    })
}

/// Four-pointed diamond centered in the box
fn diamond_mask(w: u32, h: u32) -> SpriteMask {
    SpriteMask::from_fn(w, h, move |x, y| {
        let nx = (x as f32 + 0.5) / w as f32 - 0.5;
        let ny = (y as f32 + 0.5) / h as f32 - 0.5;
        nx.abs() + ny.abs() <= 0.5
    })
}

/// Axis-aligned ellipse inscribed in the box
fn ellipse_mask(w: u32, h: u32) -> SpriteMask {
    SpriteMask::from_fn(w, h, move |x, y| {
        let nx = (x as f32 + 0.5) / w as f32 * 2.0 - 1.0;
        let ny = (y as f32 + 0.5) / h as f32 * 2.0 - 1.0;
        nx * nx + ny * ny <= 1.0
    })
}

/// Rectangle with the top corners cut off (gabled fireplace silhouette)
fn house_mask(w: u32, h: u32) -> SpriteMask {
    SpriteMask::from_fn(w, h, move |x, y| {
        let roof = h / 4;
        if y >= roof {
            return true;
        }
        let inset = roof - y;
        x >= inset && x < w - inset
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_dimensions() {
        let s = SpriteSet::placeholder();
        assert_eq!(s.player_armed.size, Vec2::new(128.0, 96.0));
        assert_eq!(s.invader.size, Vec2::new(96.0, 64.0));
        assert_eq!(s.fireplace.mask.width(), 192);
    }

    #[test]
    fn test_triangle_is_narrow_at_top() {
        let m = triangle_mask(100, 100);
        assert!(!m.get(5, 0));
        assert!(m.get(50, 0));
        assert!(m.get(5, 99));
    }

    #[test]
    fn test_shaped_masks_are_proper_subsets() {
        let s = SpriteSet::placeholder();
        let full = (s.bag.mask.width() * s.bag.mask.height()) as usize;
        assert!(s.bag.mask.count() < full);
        assert!(s.star.mask.count() < (24 * 48) as usize);
    }
}
