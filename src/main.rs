//! Santavaders entry point
//!
//! Headless native runner: the demo autopilot plays the simulation at the
//! fixed tick cadence (or flat out with `--fast`) while draw commands and
//! sound cues flow through a null frontend. A windowed build implements
//! `Frontend` over a real surface and feeds `KeyState` instead of the
//! autopilot; everything else stays the same.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;

use santavaders::audio::Mixer;
use santavaders::consts::TICK_RATE;
use santavaders::frontend::{Frontend, NullFrontend, draw_frame};
use santavaders::highscores::{self, HighScores};
use santavaders::settings::Settings;
use santavaders::sim::{GamePhase, SpriteSet, TickInput, World, tick};

#[derive(Debug, Parser)]
#[command(name = "santavaders", about = "Fixed-tick Christmas invaders, headless demo run")]
struct Args {
    /// RNG seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many ticks if the run has not ended (5 minutes)
    #[arg(long, default_value_t = 18_000)]
    max_ticks: u64,

    /// Skip the frame limiter and run flat out
    #[arg(long)]
    fast: bool,

    /// High-score ledger location
    #[arg(long, default_value = "highscores.txt")]
    scores: PathBuf,

    /// Settings location
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,
}

/// Paces the loop at the fixed tick rate
struct FrameLimiter {
    frame: Duration,
    next: Instant,
}

impl FrameLimiter {
    fn new(rate: u32) -> Self {
        let frame = Duration::from_secs(1) / rate;
        Self {
            frame,
            next: Instant::now() + frame,
        }
    }

    fn wait(&mut self) {
        let now = Instant::now();
        if self.next > now {
            std::thread::sleep(self.next - now);
        }
        self.next += self.frame;
        // A long stall resets the schedule rather than accruing catch-up debt
        if self.next < Instant::now() {
            self.next = Instant::now() + self.frame;
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = Settings::load(&args.settings);
    let mixer = Mixer::from_settings(&settings);
    let mut scores = HighScores::load(&args.scores);
    let player = highscores::player_name();

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut world = World::new(seed, SpriteSet::placeholder());
    world.show_fps = settings.show_fps;
    let mut frontend = NullFrontend::default();
    let mut limiter = (!args.fast).then(|| FrameLimiter::new(TICK_RATE));

    log::info!("Santavaders starting (seed {seed})");

    let demo = TickInput {
        demo: true,
        ..Default::default()
    };
    for _ in 0..args.max_ticks {
        tick(&mut world, &demo);
        for event in world.take_events() {
            frontend.handle_event(&event, &mixer);
        }
        let frame = draw_frame(&world, &scores, Some(player.as_str()));
        frontend.present(&frame);

        if world.phase == GamePhase::GameOver {
            scores.record(&player, world.score);
            scores
                .save(&args.scores)
                .with_context(|| format!("writing high scores to {:?}", args.scores))?;
            break;
        }
        if world.quit {
            break;
        }
        if let Some(limiter) = &mut limiter {
            limiter.wait();
        }
    }

    println!("Seed:  {seed}");
    println!("Score: {} (level {})", world.score, world.level + 1);
    println!("Ticks: {}", world.time_ticks);
    println!("-- High scores --");
    for (rank, entry) in scores.entries.iter().enumerate() {
        println!("{:2}. {}  {}", rank + 1, entry.name, entry.score);
    }
    Ok(())
}
