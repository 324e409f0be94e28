use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use ledge::engine::input::{Action, InputState};
use ledge::engine::time::{FixedStep, FrameTimer};
use ledge::recording::Recorder;
use ledge::scene::demo::DEMO_LEVEL;
use ledge::scene::level::load_level;
use ledge::{PhysicsConfig, World, WorldEvent};
use log::info;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Hold {
    Left,
    Right,
}

#[derive(Parser)]
#[command(name = "ledge", about = "Headless tile-platformer physics runner")]
struct Args {
    /// Level code to load. Defaults to the built-in demo level.
    #[arg(long, conflicts_with = "level_file")]
    level: Option<String>,

    /// Read the level code from a file
    #[arg(long)]
    level_file: Option<PathBuf>,

    /// TOML file overriding physics tunables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Hold a direction for the whole run
    #[arg(long, value_enum)]
    hold: Option<Hold>,

    /// Ticks at which to press jump
    #[arg(long, value_delimiter = ',')]
    jump_at: Vec<u64>,

    /// Ticks at which to press dash
    #[arg(long, value_delimiter = ',')]
    dash_at: Vec<u64>,

    /// Ticks at which to invert gravity
    #[arg(long, value_delimiter = ',')]
    flip_gravity_at: Vec<u64>,

    /// Pace ticks against the wall clock instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Write every body position per tick to this CSV file
    #[arg(long)]
    record: Option<PathBuf>,
}

#[derive(Default)]
struct Summary {
    landings: u64,
    breaks: u64,
    particles: u64,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => PhysicsConfig::from_file(path)?,
        None => PhysicsConfig::default(),
    };
    let level = match (&args.level, &args.level_file) {
        (Some(code), _) => code.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => DEMO_LEVEL.to_string(),
    };

    let mut clock = FixedStep::from_millis(config.tick_interval_ms);
    let mut world = World::new(config);
    let loaded = load_level(&mut world, level.trim())?;
    info!(
        "loaded {} bodies, player {}",
        loaded.bodies.len(),
        if loaded.player.is_some() { "present" } else { "absent" }
    );
    world.drain_events();

    let mut recorder = match &args.record {
        Some(path) => Some(Recorder::create(path)?),
        None => None,
    };

    let mut input = InputState::new();
    match args.hold {
        Some(Hold::Left) => input.press(Action::Left),
        Some(Hold::Right) => input.press(Action::Right),
        None => {}
    }

    let mut timer = FrameTimer::new();
    let mut summary = Summary::default();
    let mut tick = 0;
    while tick < args.ticks {
        let due = if args.realtime {
            std::thread::sleep(Duration::from_millis(1));
            timer.tick();
            u64::from(clock.advance(timer.dt))
        } else {
            1
        };

        for _ in 0..due.min(args.ticks - tick) {
            if args.flip_gravity_at.contains(&tick) {
                world.set_gravity(-world.gravity());
            }
            if args.jump_at.contains(&tick) {
                input.press(Action::Jump);
            }
            if args.dash_at.contains(&tick) {
                input.press(Action::Dash);
            }

            world.tick(&input);
            input.end_tick();
            let events = world.drain_events();
            for event in &events {
                match event {
                    WorldEvent::Landed { .. } => summary.landings += 1,
                    WorldEvent::Broken(effect) => {
                        summary.breaks += 1;
                        summary.particles += effect.particles.len() as u64;
                    }
                    _ => {}
                }
            }
            if let Some(recorder) = recorder.as_mut() {
                recorder.capture(tick, &events)?;
            }
            tick += 1;
        }
    }

    if let Some(recorder) = recorder {
        let rows = recorder.rows();
        recorder.finish()?;
        info!("recorded {rows} rows");
    }

    println!("ticks:     {}", world.ticks());
    println!("landings:  {}", summary.landings);
    println!("breaks:    {} ({} particles)", summary.breaks, summary.particles);
    match world.player() {
        Ok(player) => println!(
            "player:    pos ({:.1}, {:.1}) vel ({:.2}, {:.2}) grounded {} dash {}",
            player.body.aabb.pos.x,
            player.body.aabb.pos.y,
            player.body.velocity.x,
            player.body.velocity.y,
            player.body.grounded,
            if player.can_dash { "ready" } else { "spent" },
        ),
        Err(err) => println!("player:    {err}"),
    }
    for id in world.moveables() {
        if let Some(body) = world.body(id) {
            println!(
                "box {id}:    pos ({:.1}, {:.1}) grounded {}",
                body.aabb.pos.x, body.aabb.pos.y, body.grounded
            );
        }
    }
    Ok(())
}
