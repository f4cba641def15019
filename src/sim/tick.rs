//! Fixed timestep simulation tick
//!
//! One call advances the world by one 60 Hz step. The phase machine is driven
//! here: Title, Running, Paused and GameOver all share this single entry
//! point instead of spinning their own input loops. Within Running the order
//! is load-bearing: input commands, then entity movement (with direction
//! reversal before the horizontal advance), then collision resolution, then
//! the level-clear check.

use glam::Vec2;
use rand::Rng;

use super::collision::resolve_collisions;
use super::levels;
use super::state::{
    CellState, GamePhase, GuidedBag, PlayerSprite, Present, Sleigh, Star, World,
};
use crate::audio::SoundCue;
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move-left key held
    pub left: bool,
    /// Move-right key held
    pub right: bool,
    /// Fire key held; also starts/restarts the game on menu screens
    pub fire: bool,
    /// Pause toggle (edge-triggered)
    pub pause: bool,
    /// Quit/escape (edge-triggered)
    pub quit: bool,
    /// FPS overlay toggle (edge-triggered)
    pub toggle_fps: bool,
    /// Debug cheat: clear every enemy cell
    pub clear_enemies: bool,
    /// Demo mode - the autopilot plays the game
    pub demo: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput) {
    if input.toggle_fps {
        world.show_fps = !world.show_fps;
    }

    match world.phase {
        GamePhase::Title => title_tick(world, input),
        GamePhase::Paused => paused_tick(world, input),
        GamePhase::GameOver => game_over_tick(world, input),
        GamePhase::Running => running_tick(world, input),
    }
}

fn title_tick(world: &mut World, input: &TickInput) {
    if input.quit {
        world.quit = true;
        return;
    }
    if input.fire || input.demo {
        log::info!("Starting run (seed {})", world.seed);
        world.begin_run();
    }
}

fn paused_tick(world: &mut World, input: &TickInput) {
    if input.quit {
        world.quit = true;
        return;
    }
    if input.pause {
        world.phase = GamePhase::Running;
    }
}

fn game_over_tick(world: &mut World, input: &TickInput) {
    world.game_over_ticks = world.game_over_ticks.saturating_add(1);
    // Snow keeps falling behind the results screen
    advance_snow(world);
    if input.quit {
        world.quit = true;
        return;
    }
    if input.fire && world.game_over_ticks >= GAME_OVER_LOCK_TICKS {
        world.phase = GamePhase::Title;
    }
}

fn running_tick(world: &mut World, input: &TickInput) {
    if input.quit {
        world.quit = true;
        return;
    }
    if input.pause {
        world.phase = GamePhase::Paused;
        return;
    }

    world.time_ticks += 1;

    // Synchronous level hand-off: freeze briefly, then rebuild for the next
    // level while the score carries over
    if world.level_break_ticks > 0 {
        world.level_break_ticks -= 1;
        if world.level_break_ticks == 0 {
            world.advance_level();
            log::info!("Level {} begins", world.level + 1);
        }
        return;
    }

    let input = if input.demo {
        demo_input(world)
    } else {
        input.clone()
    };
    apply_input(world, &input);
    update(world);
    if world.phase == GamePhase::Running {
        resolve_collisions(world);
    }
    if world.phase == GamePhase::Running && world.formation.active_count() == 0 {
        world.level_break_ticks = LEVEL_CLEAR_DELAY_TICKS;
        world.push_stop(SoundCue::SleighFlyby);
        world.push_stop(SoundCue::BagAlarm);
    }
}

/// Apply movement, the fire command and the debug cheat
fn apply_input(world: &mut World, input: &TickInput) {
    let player_w = world.sprites.player_armed.width();
    if input.left {
        world.player.pos.x = (world.player.pos.x - PLAYER_SPEED).max(0.0);
    }
    if input.right {
        world.player.pos.x = (world.player.pos.x + PLAYER_SPEED).min(SCREEN_W - player_w);
    }

    if input.clear_enemies {
        // Cheat kills silently: no score, no explosion animation
        for row in world.formation.cells.iter_mut() {
            for cell in row.iter_mut() {
                if cell.is_active() {
                    *cell = CellState::Dead;
                }
            }
        }
    }

    // Firing while a star is in flight is a no-op; a second is never spawned
    if input.fire && world.star.is_none() {
        let rect = world.player.rect(&world.sprites);
        let pos = Vec2::new(
            rect.center_x() - world.sprites.star.width() / 2.0,
            rect.y,
        );
        world.star = Some(Star { pos });
        world.player.sprite = PlayerSprite::Fired;
        world.push_sound(SoundCue::PlayerShoot, rect.center_x());
    }
}

/// Movement, spawning and bookkeeping for one tick, in fixed order
fn update(world: &mut World) {
    let params = *levels::params(world.level);

    // 1. Bonus flyer lifecycle
    if let Some(sleigh) = &mut world.sleigh {
        sleigh.pos.x += params.sleigh_speed;
    }
    if matches!(&world.sleigh, Some(s) if s.pos.x > SCREEN_W) {
        world.sleigh = None;
        world.sleigh_idle_ticks = 0;
        world.push_stop(SoundCue::SleighFlyby);
    } else if world.sleigh.is_none() {
        world.sleigh_idle_ticks = world.sleigh_idle_ticks.saturating_add(1);
        if world.sleigh_idle_ticks >= SLEIGH_COOLDOWN_TICKS
            && world.rng.random_range(0..=100) < 2
        {
            let pos = Vec2::new(-world.sprites.sleigh.width(), SLEIGH_Y);
            world.sleigh = Some(Sleigh { pos });
            world.push_sound(SoundCue::SleighFlyby, pos.x);
        }
    }

    // 2. Guided bag: pursuit controller, then off-screen check, then spawn
    if let Some(bag) = &mut world.bag {
        let player_cx = world.player.pos.x + world.sprites.player_armed.width() / 2.0;
        let bag_cx = bag.pos.x + world.sprites.bag.width() / 2.0;
        let drift = (BAG_PURSUIT_GAIN * (player_cx - bag_cx))
            .clamp(-params.bag_max_drift, params.bag_max_drift);
        bag.pos.y += params.bag_fall_speed;
        bag.pos.x += drift;
    }
    if matches!(&world.bag, Some(b) if b.pos.y > SCREEN_H) {
        world.bag = None;
        world.push_stop(SoundCue::BagAlarm);
    }
    if world.bag.is_none() {
        if let Some(sleigh_pos) = world.sleigh.as_ref().map(|s| s.pos) {
            if world.rng.random_range(0..=500) < 1 {
                world.bag = Some(GuidedBag { pos: sleigh_pos });
                world.push_sound(SoundCue::BagAlarm, sleigh_pos.x);
            }
        }
    }

    // 3. Player star
    if let Some(star) = &mut world.star {
        star.pos.y -= STAR_SPEED;
    }
    if matches!(&world.star, Some(s) if s.pos.y <= 0.0) {
        world.star = None;
        world.player.sprite = PlayerSprite::Armed;
    }

    // 4. Presents: drop off-screen ones, advance the rest
    world.presents.retain(|p| p.pos.y <= SCREEN_H);
    for present in &mut world.presents {
        present.pos.y += params.present_speed;
    }

    // 5. Explosion animation, free-standing and in-grid
    for explosion in &mut world.explosions {
        explosion.age_ticks += 1;
        if explosion.age_ticks >= EXPLOSION_FRAME_TICKS {
            explosion.frame += 1;
            explosion.age_ticks = 0;
        }
    }
    world.explosions.retain(|e| e.frame < EXPLOSION_FRAMES);

    for row in world.formation.cells.iter_mut() {
        for cell in row.iter_mut() {
            if let CellState::Exploding { frame, age_ticks } = cell {
                *age_ticks += 1;
                if *age_ticks >= EXPLOSION_FRAME_TICKS {
                    *frame += 1;
                    *age_ticks = 0;
                    if *frame >= EXPLOSION_FRAMES {
                        *cell = CellState::Dead;
                    }
                }
            }
        }
    }

    // 6. Shields that took too much damage go dark (idempotent)
    for fireplace in &mut world.fireplaces {
        if fireplace.hits > FIREPLACE_MAX_HITS {
            fireplace.active = false;
        }
    }

    // 7. Enemy return fire from a uniformly chosen active cell
    let active = world.formation.active_cells();
    if !active.is_empty() && world.rng.random_range(0..=101) < params.shot_chance {
        let (row, col) = active[world.rng.random_range(0..active.len())];
        let cell = world.formation.cell_rect(row, col, &world.sprites);
        let pos = cell.center();
        world.presents.push(Present { pos });
        world.push_sound(SoundCue::EnemyShoot, pos.x);
    }

    // 8. Formation bounds, reversal (at most once per tick), then advance
    let mut reverse = false;
    'scan: for row in 0..GRID_ROWS {
        for col in 0..GRID_COLS {
            if !world.formation.cells[row][col].is_active() {
                continue;
            }
            let rect = world.formation.cell_rect(row, col, &world.sprites);
            if rect.x <= 0.0 || rect.right() >= SCREEN_W {
                reverse = true;
                break 'scan;
            }
        }
    }
    if reverse {
        world.formation.dir = -world.formation.dir;
        world.formation.origin.y += FORMATION_DESCENT;
    }
    world.formation.origin.x +=
        (params.invader_speed + world.speed_bonus) * world.formation.dir;

    // 9. Speed bonus accrues at kill time in the collision engine

    // 10. Cosmetic snowfall
    advance_snow(world);

    // 11. Terminal scan: lowest active row decides, processing halts on the
    // first trigger
    let player_y = world.player.pos.y;
    let shield_line = world.fireplace_line();
    for row in (0..GRID_ROWS).rev() {
        for col in 0..GRID_COLS {
            if !world.formation.cells[row][col].is_active() {
                continue;
            }
            let bottom = world.formation.cell_rect(row, col, &world.sprites).bottom();
            if bottom >= player_y {
                world.set_game_over();
                return;
            }
            if world.shields_online && bottom >= shield_line {
                world.shields_online = false;
                return;
            }
        }
    }
}

fn advance_snow(world: &mut World) {
    let World { snow, rng, .. } = world;
    for flake in snow.iter_mut() {
        flake.pos.y += flake.speed;
        if flake.pos.y > SCREEN_H {
            flake.respawn_at_top(rng);
        }
    }
}

/// Demo autopilot: dodge the bag when it bears down, otherwise line up under
/// the lowest remaining enemy and keep firing
fn demo_input(world: &World) -> TickInput {
    let mut input = TickInput {
        demo: true,
        ..Default::default()
    };
    let player_cx = world.player.rect(&world.sprites).center_x();

    let mut target = lowest_active_cx(world).unwrap_or(SCREEN_W / 2.0);
    if let Some(bag) = &world.bag {
        let bag_cx = bag.rect(&world.sprites).center_x();
        if (bag_cx - player_cx).abs() < 300.0 {
            target = if bag_cx > player_cx {
                player_cx - 300.0
            } else {
                player_cx + 300.0
            };
        }
    }

    if target < player_cx - PLAYER_SPEED {
        input.left = true;
    } else if target > player_cx + PLAYER_SPEED {
        input.right = true;
    }
    input.fire = world.star.is_none();
    input
}

/// Center x of the first active cell scanning from the bottom row up
fn lowest_active_cx(world: &World) -> Option<f32> {
    for row in (0..GRID_ROWS).rev() {
        for col in 0..GRID_COLS {
            if world.formation.cells[row][col].is_active() {
                return Some(world.formation.cell_rect(row, col, &world.sprites).center_x());
            }
        }
    }
    None
}
