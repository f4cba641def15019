//! Collision detection and damage resolution
//!
//! All pairwise interactions for one tick, applied in a fixed priority order
//! so simultaneous events resolve deterministically:
//!
//! 1. guided bag vs star (mutual destruction, scored)
//! 2. guided bag vs player (game over)
//! 3. star vs enemy cells (first active hit in row-major order wins)
//! 4. star vs shields (erode, no score)
//! 5. guided bag vs shields (erode, no score)
//! 6. presents vs player (game over)
//! 7. presents vs shields (erode, present removed)
//! 8. presents vs star (mutual destruction, no score)
//! 9. star vs sleigh (scored)
//!
//! Mask overlap is reserved for the irregular sprites (player, shields);
//! small fast objects use rectangle tests. The no-score rule for neutralizing
//! a present with the star is a deliberate balance choice, as is the mixed
//! precision.

use glam::Vec2;

use super::levels;
use super::state::{CellState, Explosion, PlayerSprite, World};
use crate::audio::SoundCue;
use crate::consts::*;

/// Erosion radius divisors by impact source (fractions of the explosion
/// sprite width); tuning constants, not accidental
const STAR_ERODE_DIV: f32 = 4.0;
const BAG_ERODE_DIV: f32 = 3.0;
const PRESENT_ERODE_DIV: f32 = 4.0;

/// Resolve every interaction for this tick. May transition to GameOver, in
/// which case remaining checks are skipped.
pub fn resolve_collisions(world: &mut World) {
    bag_vs_star(world);
    if bag_vs_player(world) {
        return;
    }
    star_vs_grid(world);
    star_vs_fireplaces(world);
    bag_vs_fireplaces(world);
    if presents_vs_player_and_fireplaces(world) {
        return;
    }
    presents_vs_star(world);
    star_vs_sleigh(world);
}

/// Offset of `b` relative to `a` in whole pixels, for mask tests
fn mask_offset(a: Vec2, b: Vec2) -> (i32, i32) {
    ((b.x - a.x).round() as i32, (b.y - a.y).round() as i32)
}

fn erode_radius(world: &World, divisor: f32) -> i32 {
    (world.sprites.explosion.x / divisor) as i32
}

/// Disarm the star and re-arm the player sprite
fn consume_star(world: &mut World) {
    world.star = None;
    world.player.sprite = PlayerSprite::Armed;
}

fn spawn_explosion(world: &mut World, center: Vec2) {
    let explosion = Explosion::centered_at(center, &world.sprites);
    world.explosions.push(explosion);
    world.push_sound(SoundCue::Explosion, center.x);
}

fn bag_vs_star(world: &mut World) {
    let (Some(bag), Some(star)) = (&world.bag, &world.star) else {
        return;
    };
    let bag_rect = bag.rect(&world.sprites);
    if !bag_rect.intersects(&star.rect(&world.sprites)) {
        return;
    }
    world.score += levels::params(world.level).bag_points;
    world.bag = None;
    consume_star(world);
    world.push_stop(SoundCue::BagAlarm);
    spawn_explosion(world, bag_rect.center());
}

/// Returns true when the bag reached the player (run over)
fn bag_vs_player(world: &mut World) -> bool {
    let Some(bag) = &world.bag else {
        return false;
    };
    let offset = mask_offset(world.player.pos, bag.pos);
    let player_mask = world.player.mask(&world.sprites);
    if !player_mask.overlap(&world.sprites.bag.mask, offset) {
        return false;
    }
    let center = world.player.rect(&world.sprites).center();
    world.bag = None;
    world.star = None;
    spawn_explosion(world, center);
    world.set_game_over();
    true
}

fn star_vs_grid(world: &mut World) {
    let Some(star) = &world.star else {
        return;
    };
    let star_rect = star.rect(&world.sprites);
    for row in 0..GRID_ROWS {
        for col in 0..GRID_COLS {
            if !world.formation.cells[row][col].is_active() {
                continue;
            }
            let cell_rect = world.formation.cell_rect(row, col, &world.sprites);
            if !cell_rect.intersects(&star_rect) {
                continue;
            }
            world.formation.cells[row][col] = CellState::Exploding {
                frame: 0,
                age_ticks: 0,
            };
            world.speed_bonus += SPEED_BONUS_PER_KILL;
            world.score += levels::params(world.level).invader_points;
            consume_star(world);
            // The cell animates its own explosion; only the sound is queued
            world.push_sound(SoundCue::Explosion, cell_rect.center_x());
            return;
        }
    }
}

fn star_vs_fireplaces(world: &mut World) {
    if !world.shields_online {
        return;
    }
    let Some(star) = &world.star else {
        return;
    };
    let star_pos = star.pos;
    let star_center = star.rect(&world.sprites).center();
    let radius = erode_radius(world, STAR_ERODE_DIV);
    for i in 0..world.fireplaces.len() {
        if !world.fireplaces[i].active {
            continue;
        }
        let fp_pos = world.fireplaces[i].pos;
        let offset = mask_offset(fp_pos, star_pos);
        if !world.fireplaces[i]
            .mask
            .overlap(&world.sprites.star.mask, offset)
        {
            continue;
        }
        let local = mask_offset(fp_pos, star_center);
        world.fireplaces[i].mask.erode_circle(local, radius);
        world.fireplaces[i].hits += 1;
        consume_star(world);
        spawn_explosion(world, star_center);
        return;
    }
}

fn bag_vs_fireplaces(world: &mut World) {
    if !world.shields_online {
        return;
    }
    let Some(bag) = &world.bag else {
        return;
    };
    let bag_pos = bag.pos;
    let bag_center = bag.rect(&world.sprites).center();
    let radius = erode_radius(world, BAG_ERODE_DIV);
    for i in 0..world.fireplaces.len() {
        if !world.fireplaces[i].active {
            continue;
        }
        let fp_pos = world.fireplaces[i].pos;
        let offset = mask_offset(fp_pos, bag_pos);
        if !world.fireplaces[i]
            .mask
            .overlap(&world.sprites.bag.mask, offset)
        {
            continue;
        }
        let local = mask_offset(fp_pos, bag_center);
        world.fireplaces[i].mask.erode_circle(local, radius);
        world.fireplaces[i].hits += 1;
        world.bag = None;
        world.push_stop(SoundCue::BagAlarm);
        spawn_explosion(world, bag_center);
        return;
    }
}

/// Returns true when a present reached the player (run over)
fn presents_vs_player_and_fireplaces(world: &mut World) -> bool {
    let radius = erode_radius(world, PRESENT_ERODE_DIV);
    let presents = std::mem::take(&mut world.presents);
    let mut survivors = Vec::with_capacity(presents.len());
    let mut game_over = false;

    for present in presents {
        if game_over {
            survivors.push(present);
            continue;
        }

        let rect = present.rect(&world.sprites);
        let offset = mask_offset(world.player.pos, present.pos);
        let player_mask = world.player.mask(&world.sprites);
        if player_mask.overlap(&world.sprites.present.mask, offset) {
            spawn_explosion(world, rect.center());
            world.set_game_over();
            game_over = true;
            survivors.push(present);
            continue;
        }

        let mut absorbed = false;
        if world.shields_online {
            for i in 0..world.fireplaces.len() {
                if !world.fireplaces[i].active {
                    continue;
                }
                let fp_pos = world.fireplaces[i].pos;
                let offset = mask_offset(fp_pos, present.pos);
                if !world.fireplaces[i]
                    .mask
                    .overlap(&world.sprites.present.mask, offset)
                {
                    continue;
                }
                // Impact point is the present's bottom-center
                let impact = Vec2::new(rect.center_x(), rect.bottom());
                let local = mask_offset(fp_pos, impact);
                world.fireplaces[i].mask.erode_circle(local, radius);
                world.fireplaces[i].hits += 1;
                spawn_explosion(world, rect.center());
                absorbed = true;
                break;
            }
        }
        if !absorbed {
            survivors.push(present);
        }
    }

    world.presents = survivors;
    game_over
}

fn presents_vs_star(world: &mut World) {
    let Some(star) = &world.star else {
        return;
    };
    let star_rect = star.rect(&world.sprites);
    let hit = world
        .presents
        .iter()
        .position(|p| p.rect(&world.sprites).intersects(&star_rect));
    let Some(index) = hit else {
        return;
    };
    let present = world.presents.remove(index);
    let center = present.rect(&world.sprites).center();
    // Intentionally unscored, unlike every other star kill
    consume_star(world);
    spawn_explosion(world, center);
}

fn star_vs_sleigh(world: &mut World) {
    let (Some(sleigh), Some(star)) = (&world.sleigh, &world.star) else {
        return;
    };
    let sleigh_rect = sleigh.rect(&world.sprites);
    if !sleigh_rect.intersects(&star.rect(&world.sprites)) {
        return;
    }
    world.score += levels::params(world.level).sleigh_points;
    world.sleigh = None;
    world.sleigh_idle_ticks = 0;
    consume_star(world);
    world.push_stop(SoundCue::SleighFlyby);
    spawn_explosion(world, sleigh_rect.center());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::sprites::SpriteSet;
    use crate::sim::state::{GameEvent, GamePhase, GuidedBag, Present, Sleigh, Star};

    fn running_world() -> World {
        let mut w = World::new(7, SpriteSet::placeholder());
        w.begin_run();
        w.take_events();
        w
    }

    /// Place the star dead-center on a grid cell
    fn aim_star_at_cell(w: &mut World, row: usize, col: usize) {
        let cell = w.formation.cell_rect(row, col, &w.sprites);
        let center = cell.center();
        w.star = Some(Star {
            pos: center - w.sprites.star.size / 2.0,
        });
        w.player.sprite = PlayerSprite::Fired;
    }

    #[test]
    fn test_star_kills_first_cell_in_row_major_order() {
        let mut w = running_world();
        aim_star_at_cell(&mut w, 0, 0);
        let points = levels::params(0).invader_points;

        resolve_collisions(&mut w);

        assert_eq!(
            w.formation.cells[0][0],
            CellState::Exploding {
                frame: 0,
                age_ticks: 0
            }
        );
        assert_eq!(w.score, points);
        assert!(w.star.is_none());
        assert_eq!(w.player.sprite, PlayerSprite::Armed);
        assert!((w.speed_bonus - SPEED_BONUS_PER_KILL).abs() < 1e-6);
        // One kill per shot, even in a dense grid
        assert_eq!(w.formation.active_count(), GRID_ROWS * GRID_COLS - 1);
    }

    #[test]
    fn test_bag_vs_star_mutual_destruction_scores() {
        let mut w = running_world();
        let pos = Vec2::new(800.0, 600.0);
        w.bag = Some(GuidedBag { pos });
        w.star = Some(Star { pos });
        w.player.sprite = PlayerSprite::Fired;

        resolve_collisions(&mut w);

        assert!(w.bag.is_none());
        assert!(w.star.is_none());
        assert_eq!(w.score, levels::params(0).bag_points);
        assert_eq!(w.explosions.len(), 1);
        assert_eq!(w.player.sprite, PlayerSprite::Armed);
        assert_eq!(w.phase, GamePhase::Running);
    }

    #[test]
    fn test_bag_vs_star_outranks_bag_vs_player() {
        let mut w = running_world();
        // Bag sits on the player, but the star intercepts at the same spot
        w.bag = Some(GuidedBag { pos: w.player.pos });
        w.star = Some(Star { pos: w.player.pos });

        resolve_collisions(&mut w);

        assert_eq!(w.phase, GamePhase::Running);
        assert_eq!(w.score, levels::params(0).bag_points);
    }

    #[test]
    fn test_bag_reaching_player_ends_run() {
        let mut w = running_world();
        w.bag = Some(GuidedBag {
            pos: w.player.rect(&w.sprites).center() - w.sprites.bag.size / 2.0,
        });

        resolve_collisions(&mut w);

        assert_eq!(w.phase, GamePhase::GameOver);
        assert!(w.bag.is_none());
        assert!(
            w.take_events()
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { .. }))
        );
    }

    #[test]
    fn test_star_erodes_fireplace_without_scoring() {
        let mut w = running_world();
        let fp_rect = w.fireplaces[0].rect(&w.sprites);
        let before = w.fireplaces[0].mask.count();
        w.star = Some(Star {
            pos: fp_rect.center() - w.sprites.star.size / 2.0,
        });
        w.player.sprite = PlayerSprite::Fired;

        resolve_collisions(&mut w);

        assert!(w.star.is_none());
        assert_eq!(w.score, 0);
        assert_eq!(w.fireplaces[0].hits, 1);
        assert!(w.fireplaces[0].mask.count() < before);
        assert_eq!(w.explosions.len(), 1);
    }

    #[test]
    fn test_bag_erodes_wider_than_star() {
        let mut a = running_world();
        let target = a.fireplaces[1].rect(&a.sprites).center();
        a.star = Some(Star {
            pos: target - a.sprites.star.size / 2.0,
        });
        resolve_collisions(&mut a);
        let star_cleared = a.sprites.fireplace.mask.count() - a.fireplaces[1].mask.count();

        let mut b = running_world();
        b.bag = Some(GuidedBag {
            pos: target - b.sprites.bag.size / 2.0,
        });
        resolve_collisions(&mut b);
        let bag_cleared = b.sprites.fireplace.mask.count() - b.fireplaces[1].mask.count();

        assert!(bag_cleared > star_cleared);
    }

    #[test]
    fn test_present_hitting_player_ends_run() {
        let mut w = running_world();
        w.presents.push(Present {
            pos: w.player.rect(&w.sprites).center() - w.sprites.present.size / 2.0,
        });

        resolve_collisions(&mut w);

        assert_eq!(w.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_present_absorbed_by_fireplace() {
        let mut w = running_world();
        let fp_rect = w.fireplaces[2].rect(&w.sprites);
        let before = w.fireplaces[2].mask.count();
        w.presents.push(Present {
            pos: fp_rect.center() - w.sprites.present.size / 2.0,
        });

        resolve_collisions(&mut w);

        assert!(w.presents.is_empty());
        assert_eq!(w.fireplaces[2].hits, 1);
        assert!(w.fireplaces[2].mask.count() < before);
        assert_eq!(w.phase, GamePhase::Running);
    }

    #[test]
    fn test_star_neutralizes_present_without_score() {
        let mut w = running_world();
        let pos = Vec2::new(900.0, 700.0);
        w.presents.push(Present { pos });
        w.star = Some(Star { pos });
        w.player.sprite = PlayerSprite::Fired;

        resolve_collisions(&mut w);

        assert!(w.presents.is_empty());
        assert!(w.star.is_none());
        assert_eq!(w.score, 0);
        assert_eq!(w.explosions.len(), 1);
    }

    #[test]
    fn test_star_downs_sleigh_and_resets_cooldown() {
        let mut w = running_world();
        let pos = Vec2::new(500.0, SLEIGH_Y);
        w.sleigh = Some(Sleigh { pos });
        w.sleigh_idle_ticks = 123;
        w.star = Some(Star { pos });
        w.player.sprite = PlayerSprite::Fired;

        resolve_collisions(&mut w);

        assert!(w.sleigh.is_none());
        assert_eq!(w.sleigh_idle_ticks, 0);
        assert!(w.star.is_none());
        assert_eq!(w.score, levels::params(0).sleigh_points);
        let events = w.take_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::StopSound {
                cue: SoundCue::SleighFlyby
            }
        )));
    }

    #[test]
    fn test_offline_shields_ignore_impacts() {
        let mut w = running_world();
        w.shields_online = false;
        let fp_rect = w.fireplaces[0].rect(&w.sprites);
        w.star = Some(Star {
            pos: fp_rect.center() - w.sprites.star.size / 2.0,
        });

        resolve_collisions(&mut w);

        // Star sails through the dead shield row
        assert!(w.star.is_some());
        assert_eq!(w.fireplaces[0].hits, 0);
    }
}
