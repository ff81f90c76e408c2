#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Path Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.
//!
//! Static tables live in [`catalog`] and are handed to the world once per
//! session.

pub mod catalog;

use std::time::Duration;

pub use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use catalog::{
    Catalog, CatalogError, Color, Difficulty, DifficultyProfile, EnemyArchetype, EnemyKind,
    EnemyPath, HeroArchetype, LevelTier, MapDefinition, PathError, PlacementRules, Playfield,
    TowerArchetype, TowerEffect, TowerKind, WaveRules,
};

/// Virtual time consumed by a single simulation step.
pub const TICK_DURATION: Duration = Duration::from_nanos(16_666_667);

/// Distance within which an enemy counts as having reached a waypoint.
pub const ARRIVAL_EPSILON: f32 = 5.0;

/// Extra reach added to an enemy's radius when testing projectile hits.
pub const PROJECTILE_HIT_MARGIN: f32 = 5.0;

/// Factor applied to enemy speed while a slow effect is active.
pub const SLOW_FACTOR: f32 = 0.3;

/// Percentage of the invested gold returned when a tower is sold, rounded down.
pub const SELL_REFUND_PERCENT: u32 = 70;

/// Describes which half of a session is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Pre-combat planning; the clock is frozen until the player starts combat.
    Build,
    /// Waves are running.
    Combat,
}

/// Multiplier applied to wall-clock time while combat runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameSpeed {
    /// Real time.
    #[default]
    Normal,
    /// Twice real time.
    Fast,
    /// Three times real time.
    Faster,
}

impl GameSpeed {
    /// Number of virtual seconds simulated per wall-clock second.
    #[must_use]
    pub const fn multiplier(self) -> u32 {
        match self {
            Self::Normal => 1,
            Self::Fast => 2,
            Self::Faster => 3,
        }
    }

    /// Speed selected by the next press of the speed control.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Normal => Self::Fast,
            Self::Fast => Self::Faster,
            Self::Faster => Self::Normal,
        }
    }
}

/// Terminal result of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The final wave was cleared.
    Victory,
    /// Lives ran out.
    Defeat,
}

/// Everything the world needs to begin a fresh session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Scaling and economy parameters.
    pub profile: DifficultyProfile,
    /// Route enemies follow.
    pub path: EnemyPath,
    /// Final wave; `None` for endless play.
    pub max_wave: Option<u32>,
    /// Gold available at the start.
    pub start_gold: u32,
    /// Lives available at the start.
    pub start_lives: i32,
    /// Whether the player-controlled hero takes part.
    pub hero: bool,
    /// Seed for every random decision made during the session.
    pub seed: u64,
}

impl SessionConfig {
    /// Builds a configuration from a difficulty profile and an explicit path.
    #[must_use]
    pub fn new(catalog: &Catalog, difficulty: Difficulty, path: EnemyPath, seed: u64) -> Self {
        let profile = catalog.difficulties.get(difficulty).clone();
        Self {
            max_wave: profile.max_wave,
            start_gold: profile.start_gold,
            start_lives: profile.start_lives,
            profile,
            path,
            hero: false,
            seed,
        }
    }

    /// Builds a configuration for a catalog map.
    ///
    /// The map's starting gold, lives and wave count replace the profile's;
    /// an unbounded profile keeps its unbounded wave cap.
    #[must_use]
    pub fn for_map(
        catalog: &Catalog,
        map: &MapDefinition,
        difficulty: Difficulty,
        seed: u64,
    ) -> Self {
        let mut config = Self::new(catalog, difficulty, map.path.clone(), seed);
        config.start_gold = map.starting_gold;
        config.start_lives = map.starting_lives;
        if config.max_wave.is_some() {
            config.max_wave = Some(map.waves);
        }
        config
    }

    /// Enables or disables the hero.
    #[must_use]
    pub fn with_hero(mut self, hero: bool) -> Self {
        self.hero = hero;
        self
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Discards all session state and begins again from the provided configuration.
    StartSession {
        /// Configuration for the new session.
        config: SessionConfig,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Leaves the build phase on first use, then pauses or resumes combat.
    TogglePause,
    /// Cycles the game speed through 1×, 2× and 3×.
    CycleSpeed,
    /// Requests construction of a tower centred on the provided point.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Centre of the tower in world coordinates.
        position: Vec2,
    },
    /// Requests that a tower advance to its next level tier.
    UpgradeTower {
        /// Identifier of the tower to upgrade.
        tower: TowerId,
    },
    /// Requests that a tower be sold for a partial refund.
    SellTower {
        /// Identifier of the tower to sell.
        tower: TowerId,
    },
    /// Updates the tower highlighted by the player.
    SelectTower {
        /// Tower to select, or `None` to clear the selection.
        tower: Option<TowerId>,
    },
    /// Sets the point the hero walks toward.
    MoveHero {
        /// Destination in world coordinates.
        destination: Vec2,
    },
    /// Requests that a new enemy enter at the first waypoint.
    SpawnEnemy {
        /// Archetype of the enemy to create.
        kind: EnemyKind,
    },
    /// Requests that the next wave begin.
    BeginNextWave,
    /// Ends the session with a victory.
    DeclareVictory,
    /// Moves every enemy one tick along the path and resolves escapes.
    AdvanceEnemies,
    /// Moves the hero and resolves its strike.
    AdvanceHero,
    /// Replaces every tower's current target.
    AimTowers {
        /// Target assignments for this tick; towers not listed have none.
        targets: Vec<TowerTarget>,
    },
    /// Requests that a tower launch a projectile at an enemy.
    FireProjectile {
        /// Tower performing the shot.
        tower: TowerId,
        /// Enemy the shot is aimed at.
        target: EnemyId,
    },
    /// Moves every projectile one tick and resolves collisions.
    AdvanceProjectiles,
    /// Moves every particle one tick and removes expired ones.
    DecayParticles,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that all session state was reset.
    SessionStarted {
        /// Seed systems should use for their random decisions.
        seed: u64,
        /// Number of enemies in the first wave.
        quota: u32,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
        /// Number of ticks processed since the session started.
        tick: u64,
    },
    /// Announces that the session moved between build and combat.
    PhaseChanged {
        /// Phase that became active.
        phase: SessionPhase,
    },
    /// Announces that combat was paused or resumed.
    PauseChanged {
        /// Whether combat is now paused.
        paused: bool,
    },
    /// Announces a new game speed.
    SpeedChanged {
        /// Speed that became active.
        speed: GameSpeed,
    },
    /// Announces a change to the player's tower selection.
    TowerSelected {
        /// Newly selected tower, if any.
        tower: Option<TowerId>,
    },
    /// Confirms a new hero destination.
    HeroDestinationChanged {
        /// Point the hero now walks toward.
        destination: Vec2,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Archetype of the enemy.
        kind: EnemyKind,
        /// Starting hit points after scaling.
        hit_points: f32,
    },
    /// Reports damage dealt to an enemy.
    EnemyDamaged {
        /// Enemy that took the damage.
        enemy: EnemyId,
        /// Hit points removed by the strike.
        amount: f32,
        /// Hit points left afterwards.
        remaining: f32,
    },
    /// Reports that an enemy's slow effect was refreshed.
    EnemySlowed {
        /// Enemy that was slowed.
        enemy: EnemyId,
        /// Clock reading at which the slow expires.
        until: Duration,
    },
    /// Reports that an enemy died and its rewards were paid.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Archetype of the enemy.
        kind: EnemyKind,
        /// Gold credited to the ledger.
        gold: u32,
        /// Score credited to the ledger.
        score: u32,
    },
    /// Reports that an enemy reached the end of the path and cost a life.
    EnemyEscaped {
        /// Enemy that escaped.
        enemy: EnemyId,
        /// Lives left afterwards.
        lives: i32,
    },
    /// Confirms that a tower was constructed.
    TowerPlaced {
        /// Identifier allocated to the tower.
        tower: TowerId,
        /// Type of the tower.
        kind: TowerKind,
        /// Centre of the tower.
        position: Vec2,
        /// Gold charged.
        cost: u32,
    },
    /// Reports that a placement request was refused.
    TowerPlacementRejected {
        /// Requested tower type.
        kind: TowerKind,
        /// Requested centre.
        position: Vec2,
        /// Reason for the refusal.
        reason: PlacementError,
    },
    /// Confirms that a tower advanced a level tier.
    TowerUpgraded {
        /// Upgraded tower.
        tower: TowerId,
        /// Level index reached.
        level: usize,
        /// Gold charged.
        cost: u32,
    },
    /// Reports that an upgrade request was refused.
    TowerUpgradeRejected {
        /// Tower named by the request.
        tower: TowerId,
        /// Reason for the refusal.
        reason: UpgradeError,
    },
    /// Confirms that a tower was sold.
    TowerSold {
        /// Tower that was removed.
        tower: TowerId,
        /// Gold credited to the ledger.
        refund: u32,
    },
    /// Reports that a sale request was refused.
    TowerSaleRejected {
        /// Tower named by the request.
        tower: TowerId,
        /// Reason for the refusal.
        reason: SaleError,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Tower that fired.
        tower: TowerId,
        /// Enemy the projectile was aimed at.
        target: EnemyId,
    },
    /// Announces the start of a new wave.
    WaveStarted {
        /// Number of the wave that began.
        wave: u32,
        /// Enemies the wave will spawn.
        quota: u32,
    },
    /// Announces that the final wave was cleared.
    Victory {
        /// Final score.
        score: u32,
        /// Lives remaining.
        lives: i32,
    },
    /// Announces that the player ran out of lives.
    GameOver {
        /// Final score.
        score: u32,
        /// Wave during which the session ended.
        wave: u32,
    },
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Archetype of the enemy.
    pub kind: EnemyKind,
    /// Current centre in world coordinates.
    pub position: Vec2,
    /// Collision radius.
    pub radius: f32,
    /// Remaining hit points.
    pub hit_points: f32,
    /// Hit points at spawn.
    pub max_hit_points: f32,
    /// Index of the path segment being walked; the enemy heads for waypoint `segment + 1`.
    pub segment: usize,
    /// Whether a slow effect is active.
    pub slowed: bool,
}

/// Read-only snapshot describing all live enemies.
///
/// Snapshots keep spawn order, which is the order targeting scans them in.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from snapshots already in spawn order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<EnemySnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemies were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Centre of the tower.
    pub position: Vec2,
    /// Current level index.
    pub level: usize,
    /// Targeting radius of the current tier.
    pub range: f32,
    /// Minimum time between shots at the current tier.
    pub fire_interval: Duration,
    /// Clock reading of the previous shot; `None` until the first one.
    pub last_fired: Option<Duration>,
    /// Enemy currently targeted.
    pub target: Option<EnemyId>,
    /// Facing angle in radians, for presentation.
    pub facing: f32,
    /// Gold spent on purchase and upgrades.
    pub invested: u32,
}

/// Read-only snapshot describing all towers placed on the field.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the tower with the provided identifier.
    #[must_use]
    pub fn get(&self, tower: TowerId) -> Option<&TowerSnapshot> {
        self.snapshots
            .binary_search_by_key(&tower, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Pairing of a tower with the enemy it should track this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower doing the tracking.
    pub tower: TowerId,
    /// Enemy being tracked.
    pub enemy: EnemyId,
    /// Centre of the tower.
    pub tower_position: Vec2,
    /// Centre of the enemy when the target was chosen.
    pub enemy_position: Vec2,
}

impl TowerTarget {
    /// Angle in radians from the tower toward the enemy.
    #[must_use]
    pub fn facing(&self) -> f32 {
        let delta = self.enemy_position - self.tower_position;
        delta.y.atan2(delta.x)
    }
}

/// Immutable view of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Current position.
    pub position: Vec2,
    /// Displacement applied every tick.
    pub velocity: Vec2,
    /// Kind of the tower that fired it.
    pub tower_kind: TowerKind,
    /// Level of the tower when it fired.
    pub level: usize,
    /// Damage dealt on impact.
    pub damage: f32,
}

/// Immutable view of a cosmetic particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSnapshot {
    /// Current position.
    pub position: Vec2,
    /// Ticks left before the particle disappears.
    pub remaining_ticks: u32,
    /// Particle color.
    pub color: Color,
}

/// Immutable view of the hero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeroSnapshot {
    /// Current position.
    pub position: Vec2,
    /// Point the hero walks toward.
    pub destination: Vec2,
    /// Remaining hit points.
    pub hit_points: f32,
    /// Ticks until the next strike is available.
    pub cooldown_ticks: u32,
}

/// Economy and progression counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Spendable gold.
    pub gold: u32,
    /// Lives remaining; the session is lost at zero or below.
    pub lives: i32,
    /// Accumulated score.
    pub score: u32,
    /// Current wave number, starting at one.
    pub wave: u32,
}

/// Spawn progress of the current wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WaveProgress {
    /// Current wave number.
    pub wave: u32,
    /// Enemies spawned so far in this wave.
    pub spawned: u32,
    /// Enemies this wave will spawn in total.
    pub quota: u32,
    /// Final wave; `None` for endless play.
    pub max_wave: Option<u32>,
}

impl WaveProgress {
    /// Reports whether the wave still has enemies to spawn.
    #[must_use]
    pub const fn is_spawning(&self) -> bool {
        self.spawned < self.quota
    }

    /// Reports whether the next spawn is the last of the wave.
    #[must_use]
    pub const fn next_is_last(&self) -> bool {
        self.spawned + 1 == self.quota
    }

    /// Reports whether clearing this wave wins the session.
    #[must_use]
    pub const fn is_final_wave(&self) -> bool {
        match self.max_wave {
            Some(max_wave) => self.wave >= max_wave,
            None => false,
        }
    }
}

/// Final figures reported once a session ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionSummary {
    /// How the session ended.
    pub outcome: Outcome,
    /// Final score.
    pub score: u32,
    /// Lives remaining.
    pub lives: i32,
    /// Wave reached.
    pub wave: u32,
    /// Star rating earned from the remaining lives.
    pub stars: u8,
}

/// Converts remaining lives into a zero to three star rating.
#[must_use]
pub const fn stars_for_lives(lives: i32) -> u8 {
    if lives >= 18 {
        3
    } else if lives >= 10 {
        2
    } else if lives >= 1 {
        1
    } else {
        0
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The session already ended.
    #[error("the session is over")]
    SessionOver,
    /// The point lies too close to a waypoint of the enemy path.
    #[error("too close to the enemy path")]
    TooCloseToPath,
    /// The point lies too close to another tower.
    #[error("too close to another tower")]
    TooCloseToTower,
    /// The ledger cannot cover the tower's cost.
    #[error("tower costs {cost} gold but only {available} is available")]
    InsufficientGold {
        /// Price of the tower.
        cost: u32,
        /// Gold in the ledger.
        available: u32,
    },
}

/// Reasons a tower upgrade request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum UpgradeError {
    /// The session already ended.
    #[error("the session is over")]
    SessionOver,
    /// No tower with the provided identifier exists.
    #[error("no such tower")]
    MissingTower,
    /// The tower already sits on its final tier.
    #[error("tower is already at its final level")]
    MaxLevel,
    /// The ledger cannot cover the upgrade cost.
    #[error("upgrade costs {cost} gold but only {available} is available")]
    InsufficientGold {
        /// Price of the upgrade.
        cost: u32,
        /// Gold in the ledger.
        available: u32,
    },
}

/// Reasons a tower sale request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum SaleError {
    /// The session already ended.
    #[error("the session is over")]
    SessionOver,
    /// No tower with the provided identifier exists.
    #[error("no such tower")]
    MissingTower,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_speed_cycles_back_to_normal() {
        let mut speed = GameSpeed::default();
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(speed.multiplier());
            speed = speed.next();
        }
        assert_eq!(seen, vec![1, 2, 3, 1]);
    }

    #[test]
    fn stars_follow_life_thresholds() {
        assert_eq!(stars_for_lives(20), 3);
        assert_eq!(stars_for_lives(18), 3);
        assert_eq!(stars_for_lives(17), 2);
        assert_eq!(stars_for_lives(10), 2);
        assert_eq!(stars_for_lives(9), 1);
        assert_eq!(stars_for_lives(1), 1);
        assert_eq!(stars_for_lives(0), 0);
        assert_eq!(stars_for_lives(-3), 0);
    }

    #[test]
    fn map_config_overrides_profile_economy() {
        let catalog = Catalog::default();
        let desert = catalog.map("desert").expect("desert map");
        let config = SessionConfig::for_map(&catalog, desert, Difficulty::Hard, 7);

        assert_eq!(config.start_gold, 75);
        assert_eq!(config.start_lives, 15);
        assert_eq!(config.max_wave, Some(15));
        assert!((config.profile.enemy_health_multiplier - 1.3).abs() < f32::EPSILON);
        assert!(!config.hero);
    }

    #[test]
    fn endless_map_config_keeps_unbounded_waves() {
        let catalog = Catalog::default();
        let castle = catalog.map("castle").expect("castle map");
        let config = SessionConfig::for_map(&catalog, castle, Difficulty::Endless, 7);
        assert_eq!(config.max_wave, None);
    }

    #[test]
    fn tower_view_sorts_and_finds_by_id() {
        let snapshot = |id: u32| TowerSnapshot {
            id: TowerId::new(id),
            kind: TowerKind::Basic,
            position: Vec2::ZERO,
            level: 0,
            range: 80.0,
            fire_interval: Duration::from_millis(1000),
            last_fired: None,
            target: None,
            facing: 0.0,
            invested: 25,
        };
        let view = TowerView::from_snapshots(vec![snapshot(4), snapshot(1), snapshot(2)]);

        let ids: Vec<u32> = view.iter().map(|tower| tower.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 4]);
        assert!(view.get(TowerId::new(2)).is_some());
        assert!(view.get(TowerId::new(3)).is_none());
    }

    #[test]
    fn wave_progress_tracks_final_wave() {
        let progress = WaveProgress {
            wave: 10,
            spawned: 7,
            quota: 8,
            max_wave: Some(10),
        };
        assert!(progress.is_spawning());
        assert!(progress.next_is_last());
        assert!(progress.is_final_wave());

        let endless = WaveProgress {
            max_wave: None,
            ..progress
        };
        assert!(!endless.is_final_wave());
    }

    #[test]
    fn target_facing_points_toward_enemy() {
        let target = TowerTarget {
            tower: TowerId::new(0),
            enemy: EnemyId::new(0),
            tower_position: Vec2::new(10.0, 10.0),
            enemy_position: Vec2::new(10.0, 20.0),
        };
        assert!((target.facing() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
