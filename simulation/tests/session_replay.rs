use std::{
    collections::{hash_map::DefaultHasher, BTreeSet},
    hash::{Hash, Hasher},
};

use path_defence_core::{
    Catalog, Difficulty, EnemyId, Event, SessionConfig, TowerKind, Vec2, TICK_DURATION,
};
use path_defence_simulation::Simulation;
use path_defence_world::query;

const TOWER_SPOTS: [(TowerKind, (f32, f32)); 3] = [
    (TowerKind::Basic, (225.0, 250.0)),
    (TowerKind::Cannon, (375.0, 300.0)),
    (TowerKind::Ice, (525.0, 250.0)),
];

#[test]
fn scripted_session_replays_identically() {
    let first = replay(7);
    let second = replay(7);

    assert_eq!(first.fingerprint, second.fingerprint, "replay diverged between runs");
    assert_eq!(first.events.len(), second.events.len());
    assert!(first.ticks > 0);
}

#[test]
fn scripted_session_keeps_its_books() {
    let outcome = replay(7);

    let mut killed = BTreeSet::new();
    let mut escaped = BTreeSet::new();
    let mut score = 0;
    let mut last_lives = 20;
    for event in &outcome.events {
        match event {
            Event::EnemyKilled { enemy, score: awarded, .. } => {
                assert!(killed.insert(*enemy), "enemy {enemy:?} killed twice");
                score += awarded;
            }
            Event::EnemyEscaped { enemy, lives } => {
                assert!(escaped.insert(*enemy), "enemy {enemy:?} escaped twice");
                assert!(*lives < last_lives, "lives only ever decrease");
                last_lives = *lives;
            }
            _ => {}
        }
    }
    assert!(killed.is_disjoint(&escaped));
    assert!(!killed.is_empty(), "towers should defeat some enemies");

    let spawned: BTreeSet<EnemyId> = outcome
        .events
        .iter()
        .filter_map(|event| match event {
            Event::EnemySpawned { enemy, .. } => Some(*enemy),
            _ => None,
        })
        .collect();
    assert!(killed.is_subset(&spawned));
    assert!(escaped.is_subset(&spawned));
    assert_eq!(outcome.score, score);
}

struct Replay {
    events: Vec<Event>,
    fingerprint: u64,
    score: u32,
    ticks: u64,
}

fn replay(seed: u64) -> Replay {
    let catalog = Catalog::default();
    let map = catalog.map("grasslands").expect("built-in map").clone();
    let config = SessionConfig::for_map(&catalog, &map, Difficulty::Normal, seed);
    let mut simulation = Simulation::new(catalog, config);

    let mut events = simulation.take_events();
    for (kind, (x, y)) in TOWER_SPOTS {
        if query::is_valid_placement(simulation.world(), Vec2::new(x, y)) {
            let _ = simulation.place_tower(kind, Vec2::new(x, y));
        }
    }
    simulation.toggle_pause();

    for _ in 0..20_000 {
        let _ = simulation.advance(TICK_DURATION);
        events.extend(simulation.take_events());
        if simulation.summary().is_some() {
            break;
        }
    }

    let mut hasher = DefaultHasher::new();
    for event in &events {
        format!("{event:?}").hash(&mut hasher);
    }

    Replay {
        fingerprint: hasher.finish(),
        score: query::ledger(simulation.world()).score,
        ticks: query::tick_index(simulation.world()),
        events,
    }
}
