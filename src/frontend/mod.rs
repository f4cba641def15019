//! Presentation & input adapter
//!
//! The simulation never draws. This module translates world state into a list
//! of pure-data draw commands (painted back to front) and queued game
//! events into sound-cue playback intents. Whatever owns the actual surface
//! and audio device implements `Frontend`; a `NullFrontend` ships for
//! headless runs.

pub mod input;

use glam::Vec2;

use crate::audio::Mixer;
use crate::consts::*;
use crate::highscores::HighScores;
use crate::sim::levels::EnemyArt;
use crate::sim::state::{CellState, GameEvent, GamePhase, PlayerSprite, World};

/// Background fill color (midnight blue)
pub const BACKGROUND_RGB: (u8, u8, u8) = (25, 25, 64);

/// Identifies an image the consumer resolves to loaded art
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteId {
    TitleScreen,
    PlayerArmed,
    PlayerFired,
    Star,
    Invader(EnemyArt),
    Sleigh,
    Bag,
    Present,
    ExplosionFrame(usize),
}

/// Where a text line attaches on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    TopRight,
    Center,
    BottomLeft,
    BottomCenter,
}

/// One render instruction; the consumer owns surfaces, fonts and vsync
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        rgb: (u8, u8, u8),
    },
    Snowflake {
        pos: Vec2,
        size: f32,
    },
    Blit {
        sprite: SpriteId,
        pos: Vec2,
    },
    /// Blit the fireplace image filtered through shield `index`'s eroded mask
    FireplaceBlit {
        index: usize,
        pos: Vec2,
    },
    Text {
        text: String,
        anchor: Anchor,
        emphasis: bool,
    },
}

/// Emit the draw list for the current phase. `player` is the name to
/// highlight in the game-over leaderboard.
pub fn draw_frame(world: &World, scores: &HighScores, player: Option<&str>) -> Vec<DrawCommand> {
    match world.phase {
        GamePhase::Title => vec![
            DrawCommand::Clear { rgb: BACKGROUND_RGB },
            DrawCommand::Blit {
                sprite: SpriteId::TitleScreen,
                pos: Vec2::ZERO,
            },
        ],
        GamePhase::Running => scene(world),
        GamePhase::Paused => {
            let mut frame = scene(world);
            frame.push(DrawCommand::Text {
                text: "PAUSED".to_string(),
                anchor: Anchor::Center,
                emphasis: true,
            });
            frame.push(DrawCommand::Text {
                text: "Press P to Resume or Q to Quit".to_string(),
                anchor: Anchor::BottomCenter,
                emphasis: false,
            });
            frame
        }
        GamePhase::GameOver => game_over_frame(world, scores, player),
    }
}

/// The in-game scene, painted back to front
fn scene(world: &World) -> Vec<DrawCommand> {
    let mut frame = vec![DrawCommand::Clear { rgb: BACKGROUND_RGB }];

    for flake in &world.snow {
        frame.push(DrawCommand::Snowflake {
            pos: flake.pos,
            size: flake.size,
        });
    }

    let player_sprite = match world.player.sprite {
        PlayerSprite::Armed => SpriteId::PlayerArmed,
        PlayerSprite::Fired => SpriteId::PlayerFired,
    };
    frame.push(DrawCommand::Blit {
        sprite: player_sprite,
        pos: world.player.pos,
    });

    if let Some(star) = &world.star {
        frame.push(DrawCommand::Blit {
            sprite: SpriteId::Star,
            pos: star.pos,
        });
    }
    if let Some(sleigh) = &world.sleigh {
        frame.push(DrawCommand::Blit {
            sprite: SpriteId::Sleigh,
            pos: sleigh.pos,
        });
    }
    if let Some(bag) = &world.bag {
        frame.push(DrawCommand::Blit {
            sprite: SpriteId::Bag,
            pos: bag.pos,
        });
    }

    for row in 0..GRID_ROWS {
        for col in 0..GRID_COLS {
            let rect = world.formation.cell_rect(row, col, &world.sprites);
            let pos = Vec2::new(rect.x, rect.y);
            match world.formation.cells[row][col] {
                CellState::Active => frame.push(DrawCommand::Blit {
                    sprite: SpriteId::Invader(world.enemy_art),
                    pos,
                }),
                CellState::Exploding { frame: n, .. } => frame.push(DrawCommand::Blit {
                    sprite: SpriteId::ExplosionFrame(n),
                    pos,
                }),
                CellState::Dead => {}
            }
        }
    }

    for present in &world.presents {
        frame.push(DrawCommand::Blit {
            sprite: SpriteId::Present,
            pos: present.pos,
        });
    }

    if world.shields_online {
        for (index, fireplace) in world.fireplaces.iter().enumerate() {
            if fireplace.active {
                frame.push(DrawCommand::FireplaceBlit {
                    index,
                    pos: fireplace.pos,
                });
            }
        }
    }

    for explosion in &world.explosions {
        frame.push(DrawCommand::Blit {
            sprite: SpriteId::ExplosionFrame(explosion.frame),
            pos: explosion.pos,
        });
    }

    frame.push(DrawCommand::Text {
        text: format!("Score: {}", world.score),
        anchor: Anchor::TopRight,
        emphasis: false,
    });
    frame.push(DrawCommand::Text {
        text: format!("Level: {}", world.level + 1),
        anchor: Anchor::TopLeft,
        emphasis: false,
    });
    if world.show_fps {
        frame.push(DrawCommand::Text {
            text: format!("{} fps", TICK_RATE),
            anchor: Anchor::BottomLeft,
            emphasis: false,
        });
    }

    frame
}

fn game_over_frame(
    world: &World,
    scores: &HighScores,
    player: Option<&str>,
) -> Vec<DrawCommand> {
    let mut frame = vec![DrawCommand::Clear { rgb: BACKGROUND_RGB }];
    for flake in &world.snow {
        frame.push(DrawCommand::Snowflake {
            pos: flake.pos,
            size: flake.size,
        });
    }
    frame.push(DrawCommand::Text {
        text: "GAME OVER".to_string(),
        anchor: Anchor::Center,
        emphasis: true,
    });
    for (rank, entry) in scores.entries.iter().enumerate() {
        let mine = player == Some(entry.name.as_str()) && entry.score == world.score;
        frame.push(DrawCommand::Text {
            text: format!("{}. {}: {}", rank + 1, entry.name, entry.score),
            anchor: Anchor::Center,
            emphasis: mine,
        });
    }
    frame.push(DrawCommand::Text {
        text: "Press Q to Quit or SPACE to Restart".to_string(),
        anchor: Anchor::BottomCenter,
        emphasis: false,
    });
    frame
}

/// Whatever owns the real window and audio device
pub trait Frontend {
    fn present(&mut self, frame: &[DrawCommand]);
    fn handle_event(&mut self, event: &GameEvent, mixer: &Mixer);
}

/// Frontend that discards frames; used headless and in tests
#[derive(Debug, Default)]
pub struct NullFrontend {
    pub frames_presented: u64,
    pub cues_played: u64,
}

impl Frontend for NullFrontend {
    fn present(&mut self, _frame: &[DrawCommand]) {
        self.frames_presented += 1;
    }

    fn handle_event(&mut self, event: &GameEvent, mixer: &Mixer) {
        match event {
            GameEvent::Sound { cue, x } => {
                let (left, right) = mixer.stereo_gains(*x);
                log::debug!("cue {cue:?} gains L{left:.2}/R{right:.2}");
                self.cues_played += 1;
            }
            GameEvent::StopSound { cue } => {
                log::debug!("stop {cue:?}");
            }
            GameEvent::LevelStarted { level } => {
                log::info!("Level {} started", level + 1);
            }
            GameEvent::GameOver { score } => {
                log::info!("Game over with score {score}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::sprites::SpriteSet;

    fn running_world() -> World {
        let mut w = World::new(5, SpriteSet::placeholder());
        w.begin_run();
        w
    }

    fn count_blits(frame: &[DrawCommand], want: impl Fn(&SpriteId) -> bool) -> usize {
        frame
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Blit { sprite, .. } if want(sprite)))
            .count()
    }

    #[test]
    fn test_title_frame() {
        let w = World::new(5, SpriteSet::placeholder());
        let frame = draw_frame(&w, &HighScores::placeholder(), None);
        assert!(frame.contains(&DrawCommand::Blit {
            sprite: SpriteId::TitleScreen,
            pos: Vec2::ZERO,
        }));
    }

    #[test]
    fn test_running_scene_contents() {
        let w = running_world();
        let frame = draw_frame(&w, &HighScores::placeholder(), None);

        assert_eq!(frame[0], DrawCommand::Clear { rgb: BACKGROUND_RGB });
        let invaders = count_blits(&frame, |s| matches!(s, SpriteId::Invader(_)));
        assert_eq!(invaders, GRID_ROWS * GRID_COLS);
        let fireplaces = frame
            .iter()
            .filter(|c| matches!(c, DrawCommand::FireplaceBlit { .. }))
            .count();
        assert_eq!(fireplaces, FIREPLACE_COUNT);
        let snow = frame
            .iter()
            .filter(|c| matches!(c, DrawCommand::Snowflake { .. }))
            .count();
        assert_eq!(snow, SNOWFLAKE_COUNT);
        assert_eq!(count_blits(&frame, |s| *s == SpriteId::PlayerArmed), 1);
        assert_eq!(count_blits(&frame, |s| *s == SpriteId::Star), 0);
    }

    #[test]
    fn test_dead_cells_are_not_drawn() {
        let mut w = running_world();
        w.formation.cells[0][0] = CellState::Dead;
        w.formation.cells[0][1] = CellState::Exploding {
            frame: 3,
            age_ticks: 0,
        };
        let frame = draw_frame(&w, &HighScores::placeholder(), None);
        let invaders = count_blits(&frame, |s| matches!(s, SpriteId::Invader(_)));
        assert_eq!(invaders, GRID_ROWS * GRID_COLS - 2);
        assert_eq!(
            count_blits(&frame, |s| *s == SpriteId::ExplosionFrame(3)),
            1
        );
    }

    #[test]
    fn test_offline_shields_are_not_drawn() {
        let mut w = running_world();
        w.shields_online = false;
        let frame = draw_frame(&w, &HighScores::placeholder(), None);
        assert!(
            !frame
                .iter()
                .any(|c| matches!(c, DrawCommand::FireplaceBlit { .. }))
        );
    }

    #[test]
    fn test_fps_overlay_toggle() {
        let mut w = running_world();
        let without: Vec<_> = draw_frame(&w, &HighScores::placeholder(), None);
        w.show_fps = true;
        let with: Vec<_> = draw_frame(&w, &HighScores::placeholder(), None);
        assert_eq!(with.len(), without.len() + 1);
    }

    #[test]
    fn test_game_over_highlights_player_entry() {
        let mut w = running_world();
        w.score = 800;
        w.set_game_over();
        let mut scores = HighScores::placeholder();
        scores.record("zoe", 800);

        let frame = draw_frame(&w, &scores, Some("zoe"));
        let highlighted: Vec<_> = frame
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text {
                    text,
                    emphasis: true,
                    ..
                } => Some(text.clone()),
                _ => None,
            })
            .collect();
        assert!(highlighted.contains(&"GAME OVER".to_string()));
        assert!(highlighted.contains(&"1. zoe: 800".to_string()));
    }

    #[test]
    fn test_paused_overlay() {
        let mut w = running_world();
        w.phase = GamePhase::Paused;
        let frame = draw_frame(&w, &HighScores::placeholder(), None);
        assert!(frame.iter().any(
            |c| matches!(c, DrawCommand::Text { text, .. } if text == "PAUSED")
        ));
    }
}
