#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a Path Defence session headlessly.

mod autoplay;

use std::{collections::BTreeMap, fs, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use path_defence_core::{
    Catalog, Difficulty, Event, Outcome, SessionConfig, TowerKind, TICK_DURATION,
};
use path_defence_simulation::Simulation;
use path_defence_world::query;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use autoplay::{Action, Autoplayer};

/// Ticks between two autoplayer decisions.
const DECISION_INTERVAL_TICKS: u64 = 30;

#[derive(Parser, Debug)]
#[command(name = "path-defence")]
#[command(about = "Runs a headless Path Defence session with a scripted player")]
struct Args {
    /// Map identifier from the catalog
    #[arg(long, default_value = "grasslands")]
    map: String,

    /// Difficulty profile
    #[arg(long, value_enum, default_value_t = DifficultyArg::Normal)]
    difficulty: DifficultyArg,

    /// Seed for every random decision in the session
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Game speed multiplier
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=3))]
    speed: u8,

    /// TOML file replacing the built-in catalog
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Give up after this many simulated ticks
    #[arg(long, default_value_t = 200_000)]
    max_ticks: u64,

    /// Include the hero in the session
    #[arg(long)]
    hero: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// List the catalog maps and exit
    #[arg(long)]
    list_maps: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DifficultyArg {
    Easy,
    Normal,
    Hard,
    Endless,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Easy => Self::Easy,
            DifficultyArg::Normal => Self::Normal,
            DifficultyArg::Hard => Self::Hard,
            DifficultyArg::Endless => Self::Endless,
        }
    }
}

/// Figures printed once the run ends.
#[derive(Clone, Debug, PartialEq, Serialize)]
struct Report {
    map: String,
    difficulty: Difficulty,
    seed: u64,
    outcome: Option<Outcome>,
    score: u32,
    lives: i32,
    wave: u32,
    stars: u8,
    ticks: u64,
    towers_placed: BTreeMap<TowerKind, u32>,
    upgrades: u32,
    highest_level: usize,
    enemies_killed: u32,
    enemies_escaped: u32,
}

/// Entry point for the Path Defence command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let catalog = load_catalog(args.catalog.as_ref())?;

    if args.list_maps {
        for map in &catalog.maps {
            println!("{:<12} {} ({} waves)", map.id, map.name, map.waves);
        }
        return Ok(());
    }

    let report = run(&args, catalog)?;
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serializing the run summary")?
        );
    } else {
        print_report(&report);
    }
    Ok(())
}

fn load_catalog(path: Option<&PathBuf>) -> Result<Catalog> {
    let Some(path) = path else {
        return Ok(Catalog::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;
    Catalog::from_toml_str(&contents)
        .with_context(|| format!("parsing catalog {}", path.display()))
}

fn run(args: &Args, catalog: Catalog) -> Result<Report> {
    let map = catalog
        .map(&args.map)
        .ok_or_else(|| anyhow!("unknown map `{}`", args.map))?
        .clone();
    let difficulty = Difficulty::from(args.difficulty);
    let config =
        SessionConfig::for_map(&catalog, &map, difficulty, args.seed).with_hero(args.hero);
    let playfield = catalog.playfield.clone();

    let mut simulation = Simulation::new(catalog, config);
    let mut autoplayer = Autoplayer::new(&map.path, &playfield);
    let mut report = Report {
        map: map.id.clone(),
        difficulty,
        seed: args.seed,
        outcome: None,
        score: 0,
        lives: 0,
        wave: 0,
        stars: 0,
        ticks: 0,
        towers_placed: BTreeMap::new(),
        upgrades: 0,
        highest_level: 0,
        enemies_killed: 0,
        enemies_escaped: 0,
    };

    info!(map = %map.name, ?difficulty, seed = args.seed, "starting headless session");
    while let Some(action) = autoplayer.act(&mut simulation) {
        record_action(&mut report, action);
    }
    simulation.toggle_pause();
    for _ in 1..args.speed {
        simulation.cycle_speed();
    }

    let mut next_decision = DECISION_INTERVAL_TICKS;
    loop {
        let _ = simulation.advance(TICK_DURATION);
        for event in simulation.take_events() {
            match event {
                Event::EnemyKilled { .. } => report.enemies_killed += 1,
                Event::EnemyEscaped { .. } => report.enemies_escaped += 1,
                _ => {}
            }
        }

        let tick = query::tick_index(simulation.world());
        if simulation.summary().is_some() {
            break;
        }
        if tick >= args.max_ticks {
            warn!(tick, "tick budget exhausted before the session ended");
            break;
        }
        if tick >= next_decision {
            next_decision = tick + DECISION_INTERVAL_TICKS;
            if let Some(action) = autoplayer.act(&mut simulation) {
                record_action(&mut report, action);
            }
        }
    }

    let world = simulation.world();
    let ledger = query::ledger(world);
    report.outcome = query::outcome(world);
    report.score = ledger.score;
    report.lives = ledger.lives;
    report.wave = ledger.wave;
    report.stars = simulation.summary().map_or(0, |summary| summary.stars);
    report.ticks = query::tick_index(world);
    Ok(report)
}

fn record_action(report: &mut Report, action: Action) {
    match action {
        Action::Placed { kind } => *report.towers_placed.entry(kind).or_insert(0) += 1,
        Action::Upgraded { level } => {
            report.upgrades += 1;
            report.highest_level = report.highest_level.max(level);
        }
    }
}

fn print_report(report: &Report) {
    let outcome = match report.outcome {
        Some(Outcome::Victory) => "victory",
        Some(Outcome::Defeat) => "defeat",
        None => "unfinished",
    };
    println!("{} on {} ({:?}, seed {})", outcome, report.map, report.difficulty, report.seed);
    println!("  score  {}", report.score);
    println!("  lives  {} ({} stars)", report.lives, report.stars);
    println!("  wave   {}", report.wave);
    println!("  ticks  {}", report.ticks);
    let placed: u32 = report.towers_placed.values().sum();
    println!(
        "  towers {} placed, {} upgrades, highest level {}",
        placed, report.upgrades, report.highest_level
    );
    println!(
        "  enemies {} killed, {} escaped",
        report.enemies_killed, report.enemies_escaped
    );
}
