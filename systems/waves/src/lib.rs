#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave controller that decides when enemies spawn, what they are, and when
//! a wave or the whole session is complete.

use path_defence_core::{Command, EnemyKind, Event, WaveProgress};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const TANK_MIN_WAVE: u32 = 5;
const TANK_CHANCE: f64 = 0.3;
const FAST_MIN_WAVE: u32 = 3;
const FAST_CHANCE: f64 = 0.4;
const BOSS_MIN_WAVE: u32 = 10;

/// Configuration parameters required to construct the wave controller.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_delay_ticks: u32,
}

impl Config {
    /// Creates a configuration that spawns after more than `spawn_delay_ticks` ticks.
    #[must_use]
    pub const fn new(spawn_delay_ticks: u32) -> Self {
        Self { spawn_delay_ticks }
    }
}

/// Pure system that emits spawn, wave and victory commands.
#[derive(Debug)]
pub struct WaveControl {
    spawn_delay_ticks: u32,
    ticks_since_spawn: u32,
    rng: ChaCha8Rng,
}

impl WaveControl {
    /// Creates a new wave controller using the supplied configuration.
    ///
    /// The random stream is reseeded from every session start.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_delay_ticks: config.spawn_delay_ticks,
            ticks_since_spawn: 0,
            rng: ChaCha8Rng::seed_from_u64(0),
        }
    }

    /// Consumes events and the current wave state to emit wave commands.
    ///
    /// Every `TimeAdvanced` event counts as one tick. While the wave still has
    /// enemies to spawn the controller counts ticks and emits a spawn once the
    /// count exceeds the spawn delay. Once the quota is spawned and no enemy
    /// remains it either starts the next wave or declares victory.
    pub fn handle(
        &mut self,
        events: &[Event],
        progress: WaveProgress,
        active_enemies: usize,
        out: &mut Vec<Command>,
    ) {
        let mut ticks: u32 = 0;
        for event in events {
            match event {
                Event::SessionStarted { seed, .. } => {
                    self.rng = ChaCha8Rng::seed_from_u64(*seed);
                    self.ticks_since_spawn = 0;
                    ticks = 0;
                }
                Event::WaveStarted { .. } => self.ticks_since_spawn = 0,
                Event::TimeAdvanced { .. } => ticks = ticks.saturating_add(1),
                _ => {}
            }
        }

        if ticks == 0 {
            return;
        }

        if progress.is_spawning() {
            self.ticks_since_spawn = self.ticks_since_spawn.saturating_add(ticks);
            if self.ticks_since_spawn > self.spawn_delay_ticks {
                self.ticks_since_spawn = 0;
                out.push(Command::SpawnEnemy {
                    kind: select_kind(&progress, &mut self.rng),
                });
            }
            return;
        }

        if active_enemies > 0 {
            return;
        }

        if progress.is_final_wave() {
            out.push(Command::DeclareVictory);
        } else {
            out.push(Command::BeginNextWave);
        }
    }
}

/// Chooses the archetype of the next enemy in the wave.
///
/// From wave ten the last enemy of a wave is always a boss. Otherwise later
/// waves roll for tanks first and then for fast enemies, falling back to the
/// basic archetype.
pub fn select_kind<R: Rng + ?Sized>(progress: &WaveProgress, rng: &mut R) -> EnemyKind {
    if progress.wave >= BOSS_MIN_WAVE && progress.next_is_last() {
        return EnemyKind::Boss;
    }
    if progress.wave >= TANK_MIN_WAVE && rng.gen_bool(TANK_CHANCE) {
        return EnemyKind::Tank;
    }
    if progress.wave >= FAST_MIN_WAVE && rng.gen_bool(FAST_CHANCE) {
        return EnemyKind::Fast;
    }
    EnemyKind::Basic
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use std::time::Duration;

    fn progress(wave: u32, spawned: u32, quota: u32) -> WaveProgress {
        WaveProgress {
            wave,
            spawned,
            quota,
            max_wave: Some(15),
        }
    }

    fn ticks(count: usize) -> Vec<Event> {
        (0..count)
            .map(|tick| Event::TimeAdvanced {
                dt: Duration::from_millis(16),
                tick: tick as u64 + 1,
            })
            .collect()
    }

    #[test]
    fn early_waves_only_spawn_basic_enemies() {
        let mut always = StepRng::new(0, 0);
        assert_eq!(select_kind(&progress(2, 0, 12), &mut always), EnemyKind::Basic);
    }

    #[test]
    fn rolls_prefer_tank_then_fast() {
        let mut always = StepRng::new(0, 0);
        let mut never = StepRng::new(u64::MAX, 0);

        assert_eq!(select_kind(&progress(5, 0, 18), &mut always), EnemyKind::Tank);
        assert_eq!(select_kind(&progress(4, 0, 16), &mut always), EnemyKind::Fast);
        assert_eq!(select_kind(&progress(7, 0, 20), &mut never), EnemyKind::Basic);
    }

    #[test]
    fn boss_closes_late_waves_regardless_of_rolls() {
        let mut always = StepRng::new(0, 0);
        assert_eq!(select_kind(&progress(10, 19, 20), &mut always), EnemyKind::Boss);
        assert_eq!(select_kind(&progress(9, 19, 20), &mut always), EnemyKind::Tank);
        assert_eq!(select_kind(&progress(10, 18, 20), &mut always), EnemyKind::Tank);
    }

    #[test]
    fn spawns_once_the_delay_is_exceeded() {
        let mut control = WaveControl::new(Config::new(3));
        let mut out = Vec::new();

        control.handle(&ticks(3), progress(1, 0, 8), 0, &mut out);
        assert!(out.is_empty());

        control.handle(&ticks(1), progress(1, 0, 8), 0, &mut out);
        assert_eq!(
            out,
            vec![Command::SpawnEnemy {
                kind: EnemyKind::Basic
            }]
        );
    }

    #[test]
    fn cleared_waves_advance_or_win() {
        let mut control = WaveControl::new(Config::new(60));
        let mut out = Vec::new();

        control.handle(&ticks(1), progress(3, 8, 8), 1, &mut out);
        assert!(out.is_empty(), "enemies still active");

        control.handle(&ticks(1), progress(3, 8, 8), 0, &mut out);
        assert_eq!(out, vec![Command::BeginNextWave]);

        out.clear();
        control.handle(&ticks(1), progress(15, 20, 20), 0, &mut out);
        assert_eq!(out, vec![Command::DeclareVictory]);
    }

    #[test]
    fn idle_frames_emit_nothing() {
        let mut control = WaveControl::new(Config::new(0));
        let mut out = Vec::new();
        control.handle(&[], progress(1, 8, 8), 0, &mut out);
        assert!(out.is_empty());
    }
}
