//! Pixel-occupancy masks for the irregularly shaped sprites
//!
//! A mask is a boolean grid matching a sprite's opaque pixels. Two masks
//! overlap at a given offset when any set bit of one aligns with a set bit of
//! the other. Shield damage is modeled by *erosion*: clearing every bit inside
//! a circle around the impact point, permanently. All coordinate math is
//! clipped to mask bounds; centers outside the mask are a no-op, never a
//! fault.

use serde::{Deserialize, Serialize};

/// A boolean occupancy grid for one sprite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl SpriteMask {
    /// Fully opaque mask
    pub fn filled(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; (width * height) as usize],
        }
    }

    /// Build a mask from a per-pixel predicate
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> bool) -> Self {
        let mut bits = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bit at (x, y); out-of-bounds reads are unset
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }

    fn clear(&mut self, x: i32, y: i32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize] = false;
    }

    /// Number of set bits
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// True if any set bit of `other`, placed at `offset` relative to this
    /// mask's origin, aligns with a set bit of this mask
    pub fn overlap(&self, other: &SpriteMask, offset: (i32, i32)) -> bool {
        let (ox, oy) = offset;
        let x0 = ox.max(0);
        let y0 = oy.max(0);
        let x1 = (ox + other.width as i32).min(self.width as i32);
        let y1 = (oy + other.height as i32).min(self.height as i32);
        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - ox, y - oy) {
                    return true;
                }
            }
        }
        false
    }

    /// Clear every bit whose squared distance from `center` is within
    /// `radius`², clipped to mask bounds. Idempotent.
    pub fn erode_circle(&mut self, center: (i32, i32), radius: i32) {
        let (cx, cy) = center;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.clear(cx + dx, cy + dy);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap_aligned() {
        let a = SpriteMask::filled(8, 8);
        let b = SpriteMask::filled(8, 8);
        assert!(a.overlap(&b, (0, 0)));
        assert!(a.overlap(&b, (7, 7)));
        assert!(!a.overlap(&b, (8, 0)));
        assert!(!a.overlap(&b, (-8, 0)));
    }

    #[test]
    fn test_overlap_respects_holes() {
        // Left half opaque only
        let a = SpriteMask::from_fn(8, 8, |x, _| x < 4);
        let b = SpriteMask::filled(2, 8);
        assert!(a.overlap(&b, (2, 0)));
        assert!(!a.overlap(&b, (5, 0)));
    }

    #[test]
    fn test_erode_clears_circle() {
        let mut m = SpriteMask::filled(20, 20);
        m.erode_circle((10, 10), 3);
        assert!(!m.get(10, 10));
        assert!(!m.get(13, 10));
        assert!(m.get(14, 10));
        // Corner of the bounding square stays set (outside the circle)
        assert!(m.get(13, 13));
    }

    #[test]
    fn test_erode_out_of_bounds_center_is_noop() {
        let mut m = SpriteMask::filled(10, 10);
        m.erode_circle((-50, -50), 4);
        assert_eq!(m.count(), 100);
        // Partially out of bounds clips instead of faulting
        m.erode_circle((0, 0), 4);
        assert!(!m.get(0, 0));
        assert!(m.get(9, 9));
    }

    proptest! {
        #[test]
        fn erode_is_idempotent(cx in -30i32..50, cy in -30i32..50, r in 0i32..40) {
            let mut once = SpriteMask::from_fn(24, 24, |x, y| (x + y) % 3 != 0);
            once.erode_circle((cx, cy), r);
            let mut twice = once.clone();
            twice.erode_circle((cx, cy), r);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn erode_never_adds_bits(cx in -30i32..50, cy in -30i32..50, r in 0i32..40) {
            let before = SpriteMask::from_fn(24, 24, |x, y| x % 2 == 0 || y % 5 == 1);
            let mut after = before.clone();
            after.erode_circle((cx, cy), r);
            prop_assert!(after.count() <= before.count());
        }
    }
}
