//! Static configuration tables consumed by every simulation component.
//!
//! The catalog is loaded once before a session starts and treated as
//! immutable for the session's duration. [`Catalog::default`] yields the
//! built-in tables; [`Catalog::from_toml_str`] overlays a TOML document on top
//! of them, replacing whole sections that the document names.

use std::{collections::BTreeSet, fmt, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Archetype keys for hostile units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Baseline walker.
    Basic,
    /// Fragile runner that moves at double speed.
    Fast,
    /// Slow, heavily armoured unit.
    Tank,
    /// Wave finale unit that appears from wave ten onwards.
    Boss,
}

impl EnemyKind {
    /// Every enemy kind in declaration order.
    pub const ALL: [Self; 4] = [Self::Basic, Self::Fast, Self::Tank, Self::Boss];
}

/// Archetype keys for placeable towers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    /// Cheap all-rounder.
    Basic,
    /// Long range, slow firing.
    Sniper,
    /// Splash damage around the impact point.
    Cannon,
    /// Slows whatever it hits.
    Ice,
}

impl TowerKind {
    /// Every tower kind in declaration order.
    pub const ALL: [Self; 4] = [Self::Basic, Self::Sniper, Self::Cannon, Self::Ice];
}

/// Keys of the difficulty table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Generous economy, fewer waves.
    Easy,
    /// Reference balance.
    Normal,
    /// Tougher and faster enemies with reduced rewards.
    Hard,
    /// Unbounded waves with compounding enemy health.
    Endless,
}

/// Opaque RGB color carried for presentation layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

impl Color {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let digits = value
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError(value.clone()))?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ColorParseError(value));
        }
        let channel = |range: std::ops::Range<usize>| {
            digits
                .get(range)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
        };
        match (channel(0..2), channel(2..4), channel(4..6)) {
            (Some(red), Some(green), Some(blue)) => Ok(Self::from_rgb(red, green, blue)),
            _ => Err(ColorParseError(value)),
        }
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Raised when a color is not written as `#rrggbb`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("expected a `#rrggbb` color, found `{0}`")]
pub struct ColorParseError(String);

/// Immutable template for a class of enemy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyArchetype {
    /// Hit points before difficulty scaling.
    pub hit_points: f32,
    /// Movement in world units per tick before difficulty scaling.
    pub speed: f32,
    /// Gold awarded on kill before difficulty scaling.
    pub gold: u32,
    /// Score awarded on kill.
    pub score: u32,
    /// Body radius, also used for projectile collision.
    pub size: f32,
    /// Body color.
    pub color: Color,
}

/// One archetype per [`EnemyKind`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyTable {
    /// Archetype for [`EnemyKind::Basic`].
    pub basic: EnemyArchetype,
    /// Archetype for [`EnemyKind::Fast`].
    pub fast: EnemyArchetype,
    /// Archetype for [`EnemyKind::Tank`].
    pub tank: EnemyArchetype,
    /// Archetype for [`EnemyKind::Boss`].
    pub boss: EnemyArchetype,
}

impl EnemyTable {
    /// Looks up the archetype for the provided kind.
    #[must_use]
    pub const fn get(&self, kind: EnemyKind) -> &EnemyArchetype {
        match kind {
            EnemyKind::Basic => &self.basic,
            EnemyKind::Fast => &self.fast,
            EnemyKind::Tank => &self.tank,
            EnemyKind::Boss => &self.boss,
        }
    }
}

/// Special behaviour attached to a tower level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TowerEffect {
    /// Plain single-target damage.
    #[default]
    None,
    /// Secondary damage to every other enemy near the impact point.
    Splash {
        /// Radius around the impact point, in world units.
        radius: f32,
    },
    /// Movement debuff applied to the struck enemy.
    Slow {
        /// Length of the debuff in milliseconds.
        duration_ms: u64,
    },
}

impl TowerEffect {
    /// Length of the slow debuff when the effect is [`TowerEffect::Slow`].
    #[must_use]
    pub const fn slow_duration(&self) -> Option<Duration> {
        match self {
            Self::Slow { duration_ms } => Some(Duration::from_millis(*duration_ms)),
            Self::None | Self::Splash { .. } => None,
        }
    }

    /// Splash radius when the effect is [`TowerEffect::Splash`].
    #[must_use]
    pub const fn splash_radius(&self) -> Option<f32> {
        match self {
            Self::Splash { radius } => Some(*radius),
            Self::None | Self::Slow { .. } => None,
        }
    }
}

/// One upgrade rank of a tower.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelTier {
    /// Damage dealt by each projectile.
    pub damage: f32,
    /// Targeting radius in world units.
    pub range: f32,
    /// Minimum time between shots in milliseconds.
    pub fire_interval_ms: u64,
    /// Gold needed to reach the next tier; absent on the final tier.
    #[serde(default)]
    pub upgrade_cost: Option<u32>,
    /// Effect resolved for projectiles fired at this tier.
    #[serde(default)]
    pub effect: TowerEffect,
}

impl LevelTier {
    /// Minimum time between shots.
    #[must_use]
    pub const fn fire_interval(&self) -> Duration {
        Duration::from_millis(self.fire_interval_ms)
    }
}

/// Ordered, non-empty sequence of level tiers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LevelTier>", into = "Vec<LevelTier>")]
pub struct LevelLadder {
    tiers: Vec<LevelTier>,
}

impl LevelLadder {
    /// Builds a ladder, rejecting an empty tier list.
    pub fn new(tiers: Vec<LevelTier>) -> Result<Self, EmptyLadderError> {
        if tiers.is_empty() {
            return Err(EmptyLadderError);
        }
        Ok(Self { tiers })
    }

    /// Returns the tier at `level`, clamped to the final tier.
    #[must_use]
    pub fn tier(&self, level: usize) -> &LevelTier {
        let index = level.min(self.tiers.len() - 1);
        &self.tiers[index]
    }

    /// Index of the final tier.
    #[must_use]
    pub fn max_level(&self) -> usize {
        self.tiers.len() - 1
    }

    /// Iterator over the tiers in upgrade order.
    pub fn iter(&self) -> impl Iterator<Item = &LevelTier> {
        self.tiers.iter()
    }
}

impl TryFrom<Vec<LevelTier>> for LevelLadder {
    type Error = EmptyLadderError;

    fn try_from(tiers: Vec<LevelTier>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

impl From<LevelLadder> for Vec<LevelTier> {
    fn from(ladder: LevelLadder) -> Self {
        ladder.tiers
    }
}

/// Raised when a tower declares no level tiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("a tower must declare at least one level tier")]
pub struct EmptyLadderError;

/// Immutable template for a class of tower.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerArchetype {
    /// Display name.
    pub name: String,
    /// Purchase price.
    pub cost: u32,
    /// Upgrade ranks, starting at level zero.
    pub levels: LevelLadder,
    /// Projectile travel in world units per tick.
    pub projectile_speed: f32,
    /// Tower body color.
    pub color: Color,
    /// Projectile color.
    pub projectile_color: Color,
}

impl TowerArchetype {
    /// Tier active at the provided level.
    #[must_use]
    pub fn tier(&self, level: usize) -> &LevelTier {
        self.levels.tier(level)
    }

    /// Gold required to leave `level`, or `None` when it is the final tier.
    #[must_use]
    pub fn upgrade_cost(&self, level: usize) -> Option<u32> {
        if level >= self.levels.max_level() {
            return None;
        }
        self.levels.tier(level).upgrade_cost
    }
}

/// One archetype per [`TowerKind`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerTable {
    /// Archetype for [`TowerKind::Basic`].
    pub basic: TowerArchetype,
    /// Archetype for [`TowerKind::Sniper`].
    pub sniper: TowerArchetype,
    /// Archetype for [`TowerKind::Cannon`].
    pub cannon: TowerArchetype,
    /// Archetype for [`TowerKind::Ice`].
    pub ice: TowerArchetype,
}

impl TowerTable {
    /// Looks up the archetype for the provided kind.
    #[must_use]
    pub const fn get(&self, kind: TowerKind) -> &TowerArchetype {
        match kind {
            TowerKind::Basic => &self.basic,
            TowerKind::Sniper => &self.sniper,
            TowerKind::Cannon => &self.cannon,
            TowerKind::Ice => &self.ice,
        }
    }
}

/// Economy and scaling parameters selected when a session starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Gold in the ledger at session start.
    pub start_gold: u32,
    /// Lives in the ledger at session start.
    pub start_lives: i32,
    /// Final wave; `None` for endless play.
    #[serde(default)]
    pub max_wave: Option<u32>,
    /// Multiplier applied to archetype hit points.
    pub enemy_health_multiplier: f32,
    /// Multiplier applied to archetype speed.
    pub enemy_speed_multiplier: f32,
    /// Multiplier applied to archetype gold rewards.
    pub gold_multiplier: f32,
    /// Per-wave compounding health factor.
    #[serde(default)]
    pub wave_scaling: Option<f32>,
}

impl DifficultyProfile {
    /// Total health multiplier for enemies spawned during `wave`.
    #[must_use]
    pub fn health_factor(&self, wave: u32) -> f32 {
        match self.wave_scaling {
            Some(scaling) if wave > 1 => {
                let exponent = i32::try_from(wave - 1).unwrap_or(i32::MAX);
                self.enemy_health_multiplier * scaling.powi(exponent)
            }
            _ => self.enemy_health_multiplier,
        }
    }
}

/// One profile per [`Difficulty`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTable {
    /// Profile for [`Difficulty::Easy`].
    pub easy: DifficultyProfile,
    /// Profile for [`Difficulty::Normal`].
    pub normal: DifficultyProfile,
    /// Profile for [`Difficulty::Hard`].
    pub hard: DifficultyProfile,
    /// Profile for [`Difficulty::Endless`].
    pub endless: DifficultyProfile,
}

impl DifficultyTable {
    /// Looks up the profile for the provided difficulty.
    #[must_use]
    pub const fn get(&self, difficulty: Difficulty) -> &DifficultyProfile {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Normal => &self.normal,
            Difficulty::Hard => &self.hard,
            Difficulty::Endless => &self.endless,
        }
    }
}

/// Wave sizing and spawn cadence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveRules {
    /// Enemies in the first wave.
    pub enemies_base: u32,
    /// Additional enemies per wave number.
    pub enemies_per_wave: u32,
    /// Upper bound on the enemies in any wave.
    pub max_enemies: u32,
    /// Ticks that must elapse (exclusive) between spawns.
    pub spawn_delay_ticks: u32,
}

impl WaveRules {
    /// Number of enemies spawned during `wave`.
    ///
    /// The first wave always uses the base size; later waves grow linearly
    /// with the wave number until capped by `max_enemies`.
    #[must_use]
    pub fn quota_for(&self, wave: u32) -> u32 {
        if wave <= 1 {
            return self.enemies_base;
        }
        let grown = self
            .enemies_base
            .saturating_add(wave.saturating_mul(self.enemies_per_wave));
        grown.min(self.max_enemies)
    }
}

/// Minimum clearances enforced when placing towers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementRules {
    /// Clearance from every waypoint of the session path.
    pub min_path_distance: f32,
    /// Clearance from every placed tower.
    pub min_tower_distance: f32,
}

/// Rectangle bounding projectiles and the enemy exit line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    /// Width in world units.
    pub width: f32,
    /// Height in world units.
    pub height: f32,
    /// Distance past the right edge at which enemies count as escaped.
    pub exit_margin: f32,
}

impl Playfield {
    /// Reports whether the point lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }

    /// Horizontal coordinate past which an enemy has left the field.
    #[must_use]
    pub fn exit_x(&self) -> f32 {
        self.width + self.exit_margin
    }
}

/// Template for the optional player-controlled hero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeroArchetype {
    /// Hit points.
    pub hit_points: f32,
    /// Damage per strike.
    pub damage: f32,
    /// Reach of a strike.
    pub attack_range: f32,
    /// Movement in world units per tick.
    pub move_speed: f32,
    /// Body radius.
    pub size: f32,
    /// Ticks between strikes.
    pub attack_cooldown_ticks: u32,
    /// Position the hero occupies when a session starts.
    pub spawn: Vec2,
}

/// Ordered waypoints that enemies follow. Always holds at least two points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec2>", into = "Vec<Vec2>")]
pub struct EnemyPath {
    waypoints: Vec<Vec2>,
}

impl EnemyPath {
    /// Creates a path from the provided waypoints.
    pub fn new(waypoints: Vec<Vec2>) -> Result<Self, PathError> {
        if waypoints.len() < 2 {
            return Err(PathError::TooFewWaypoints {
                found: waypoints.len(),
            });
        }
        Ok(Self { waypoints })
    }

    /// Waypoint where enemies spawn.
    #[must_use]
    pub fn start(&self) -> Vec2 {
        self.waypoints[0]
    }

    /// Waypoint enemies try to reach.
    #[must_use]
    pub fn end(&self) -> Vec2 {
        self.waypoints[self.waypoints.len() - 1]
    }

    /// Waypoint at `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Vec2> {
        self.waypoints.get(index).copied()
    }

    /// Index of the final waypoint.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.waypoints.len() - 1
    }

    /// All waypoints in travel order.
    #[must_use]
    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }
}

impl TryFrom<Vec<Vec2>> for EnemyPath {
    type Error = PathError;

    fn try_from(waypoints: Vec<Vec2>) -> Result<Self, Self::Error> {
        Self::new(waypoints)
    }
}

impl From<EnemyPath> for Vec<Vec2> {
    fn from(path: EnemyPath) -> Self {
        path.waypoints
    }
}

/// Reasons a waypoint list cannot form an [`EnemyPath`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    /// Movement needs a start and an end waypoint.
    #[error("an enemy path needs at least two waypoints, found {found}")]
    TooFewWaypoints {
        /// Number of waypoints supplied.
        found: usize,
    },
}

/// Playable level: geometry plus the economy overrides applied at start.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapDefinition {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Number of waves to clear.
    pub waves: u32,
    /// Gold granted at start.
    pub starting_gold: u32,
    /// Lives granted at start.
    pub starting_lives: i32,
    /// Route enemies follow.
    pub path: EnemyPath,
}

/// Complete set of static tables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    /// Enemy archetypes.
    pub enemies: EnemyTable,
    /// Tower archetypes.
    pub towers: TowerTable,
    /// Difficulty profiles.
    pub difficulties: DifficultyTable,
    /// Wave sizing.
    pub waves: WaveRules,
    /// Tower placement clearances.
    pub placement: PlacementRules,
    /// Playfield bounds.
    pub playfield: Playfield,
    /// Hero template.
    pub hero: HeroArchetype,
    /// Playable maps.
    pub maps: Vec<MapDefinition>,
}

impl Catalog {
    /// Parses a TOML document, filling omitted sections from the defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, CatalogError> {
        let catalog: Self = toml::from_str(contents)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Checks cross-field invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for kind in TowerKind::ALL {
            let archetype = self.towers.get(kind);
            let max_level = archetype.levels.max_level();
            for (level, tier) in archetype.levels.iter().enumerate() {
                if level < max_level && tier.upgrade_cost.is_none() {
                    return Err(CatalogError::MissingUpgradeCost { kind, level });
                }
            }
            if archetype.projectile_speed <= 0.0 {
                return Err(CatalogError::StationaryProjectile { kind });
            }
        }

        for kind in EnemyKind::ALL {
            let archetype = self.enemies.get(kind);
            if archetype.hit_points <= 0.0 {
                return Err(CatalogError::NonPositiveHitPoints { kind });
            }
        }

        if self.waves.enemies_base == 0 {
            return Err(CatalogError::EmptyFirstWave);
        }
        if self.waves.spawn_delay_ticks == 0 {
            return Err(CatalogError::ZeroSpawnDelay);
        }

        let mut seen = BTreeSet::new();
        for map in &self.maps {
            if !seen.insert(map.id.as_str()) {
                return Err(CatalogError::DuplicateMap { id: map.id.clone() });
            }
            if map.waves == 0 {
                return Err(CatalogError::ZeroWaves { id: map.id.clone() });
            }
        }

        Ok(())
    }

    /// Finds a map by identifier.
    #[must_use]
    pub fn map(&self, id: &str) -> Option<&MapDefinition> {
        self.maps.iter().find(|map| map.id == id)
    }
}

/// Failures raised while loading or validating a [`Catalog`].
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The document is not valid TOML or does not match the schema.
    #[error("failed to parse catalog toml")]
    Parse(#[from] toml::de::Error),
    /// A non-final tier omits the cost of the next upgrade.
    #[error("tower {kind:?} level {level} is not final but has no upgrade cost")]
    MissingUpgradeCost {
        /// Offending tower kind.
        kind: TowerKind,
        /// Offending tier index.
        level: usize,
    },
    /// Projectiles would never leave the tower.
    #[error("tower {kind:?} projectile speed must be positive")]
    StationaryProjectile {
        /// Offending tower kind.
        kind: TowerKind,
    },
    /// Enemies would spawn dead.
    #[error("enemy {kind:?} hit points must be positive")]
    NonPositiveHitPoints {
        /// Offending enemy kind.
        kind: EnemyKind,
    },
    /// The first wave would contain no enemies.
    #[error("the first wave must contain at least one enemy")]
    EmptyFirstWave,
    /// Every tick would spawn an enemy.
    #[error("the spawn delay must be at least one tick")]
    ZeroSpawnDelay,
    /// Two maps share an identifier.
    #[error("duplicate map id `{id}`")]
    DuplicateMap {
        /// Repeated identifier.
        id: String,
    },
    /// A map has nothing to clear.
    #[error("map `{id}` must have at least one wave")]
    ZeroWaves {
        /// Offending map identifier.
        id: String,
    },
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            enemies: EnemyTable {
                basic: enemy(50.0, 1.0, 5, 10, 8.0, Color::from_rgb(0xef, 0x44, 0x44)),
                fast: enemy(30.0, 2.0, 8, 15, 6.0, Color::from_rgb(0x22, 0xc5, 0x5e)),
                tank: enemy(120.0, 0.5, 15, 25, 12.0, Color::from_rgb(0x63, 0x66, 0xf1)),
                boss: enemy(300.0, 0.8, 50, 100, 16.0, Color::from_rgb(0xdc, 0x26, 0x26)),
            },
            towers: TowerTable {
                basic: tower(
                    "Basic Tower",
                    25,
                    5.0,
                    (
                        Color::from_rgb(0x0e, 0xa5, 0xe9),
                        Color::from_rgb(0x38, 0xbd, 0xf8),
                    ),
                    &[
                        (20.0, 80.0, 1000, Some(25), TowerEffect::None),
                        (35.0, 90.0, 800, Some(40), TowerEffect::None),
                        (55.0, 100.0, 600, Some(60), TowerEffect::None),
                        (80.0, 110.0, 400, None, TowerEffect::None),
                    ],
                ),
                sniper: tower(
                    "Sniper Tower",
                    50,
                    8.0,
                    (
                        Color::from_rgb(0x8b, 0x5c, 0xf6),
                        Color::from_rgb(0xa7, 0x8b, 0xfa),
                    ),
                    &[
                        (60.0, 150.0, 2000, Some(50), TowerEffect::None),
                        (90.0, 180.0, 1600, Some(75), TowerEffect::None),
                        (140.0, 220.0, 1200, Some(100), TowerEffect::None),
                        (200.0, 260.0, 800, None, TowerEffect::None),
                    ],
                ),
                cannon: tower(
                    "Cannon Tower",
                    75,
                    4.0,
                    (
                        Color::from_rgb(0xf5, 0x9e, 0x0b),
                        Color::from_rgb(0xfb, 0xbf, 0x24),
                    ),
                    &[
                        (40.0, 90.0, 1500, Some(60), TowerEffect::Splash { radius: 50.0 }),
                        (65.0, 100.0, 1200, Some(90), TowerEffect::Splash { radius: 60.0 }),
                        (100.0, 110.0, 900, Some(120), TowerEffect::Splash { radius: 70.0 }),
                        (150.0, 120.0, 600, None, TowerEffect::Splash { radius: 80.0 }),
                    ],
                ),
                ice: tower(
                    "Ice Tower",
                    60,
                    6.0,
                    (
                        Color::from_rgb(0x06, 0xb6, 0xd4),
                        Color::from_rgb(0x67, 0xe8, 0xf9),
                    ),
                    &[
                        (15.0, 70.0, 800, Some(50), TowerEffect::Slow { duration_ms: 2000 }),
                        (25.0, 85.0, 650, Some(70), TowerEffect::Slow { duration_ms: 2500 }),
                        (40.0, 100.0, 500, Some(90), TowerEffect::Slow { duration_ms: 3000 }),
                        (60.0, 115.0, 350, None, TowerEffect::Slow { duration_ms: 3500 }),
                    ],
                ),
            },
            difficulties: DifficultyTable {
                easy: DifficultyProfile {
                    start_gold: 150,
                    start_lives: 25,
                    max_wave: Some(10),
                    enemy_health_multiplier: 0.8,
                    enemy_speed_multiplier: 0.9,
                    gold_multiplier: 1.2,
                    wave_scaling: None,
                },
                normal: DifficultyProfile {
                    start_gold: 100,
                    start_lives: 20,
                    max_wave: Some(15),
                    enemy_health_multiplier: 1.0,
                    enemy_speed_multiplier: 1.0,
                    gold_multiplier: 1.0,
                    wave_scaling: None,
                },
                hard: DifficultyProfile {
                    start_gold: 75,
                    start_lives: 15,
                    max_wave: Some(20),
                    enemy_health_multiplier: 1.3,
                    enemy_speed_multiplier: 1.15,
                    gold_multiplier: 0.9,
                    wave_scaling: None,
                },
                endless: DifficultyProfile {
                    start_gold: 100,
                    start_lives: 20,
                    max_wave: None,
                    enemy_health_multiplier: 1.0,
                    enemy_speed_multiplier: 1.0,
                    gold_multiplier: 1.0,
                    wave_scaling: Some(1.1),
                },
            },
            waves: WaveRules {
                enemies_base: 8,
                enemies_per_wave: 2,
                max_enemies: 20,
                spawn_delay_ticks: 60,
            },
            placement: PlacementRules {
                min_path_distance: 40.0,
                min_tower_distance: 35.0,
            },
            playfield: Playfield {
                width: 900.0,
                height: 600.0,
                exit_margin: 30.0,
            },
            hero: HeroArchetype {
                hit_points: 200.0,
                damage: 25.0,
                attack_range: 40.0,
                move_speed: 2.0,
                size: 12.0,
                attack_cooldown_ticks: 60,
                spawn: Vec2::new(100.0, 300.0),
            },
            maps: builtin_maps(),
        }
    }
}

fn enemy(
    hit_points: f32,
    speed: f32,
    gold: u32,
    score: u32,
    size: f32,
    color: Color,
) -> EnemyArchetype {
    EnemyArchetype {
        hit_points,
        speed,
        gold,
        score,
        size,
        color,
    }
}

type TierRow = (f32, f32, u64, Option<u32>, TowerEffect);

fn tower(
    name: &str,
    cost: u32,
    projectile_speed: f32,
    (color, projectile_color): (Color, Color),
    rows: &[TierRow],
) -> TowerArchetype {
    let tiers: Vec<LevelTier> = rows
        .iter()
        .map(
            |&(damage, range, fire_interval_ms, upgrade_cost, effect)| LevelTier {
                damage,
                range,
                fire_interval_ms,
                upgrade_cost,
                effect,
            },
        )
        .collect();
    TowerArchetype {
        name: name.to_owned(),
        cost,
        levels: LevelLadder { tiers },
        projectile_speed,
        color,
        projectile_color,
    }
}

fn map(
    id: &str,
    name: &str,
    waves: u32,
    gold: u32,
    lives: i32,
    points: &[(f32, f32)],
) -> MapDefinition {
    let waypoints = points.iter().map(|&(x, y)| Vec2::new(x, y)).collect();
    MapDefinition {
        id: id.to_owned(),
        name: name.to_owned(),
        waves,
        starting_gold: gold,
        starting_lives: lives,
        path: EnemyPath { waypoints },
    }
}

fn builtin_maps() -> Vec<MapDefinition> {
    vec![
        map(
            "grasslands",
            "Grasslands",
            10,
            100,
            20,
            &[
                (-30.0, 300.0),
                (150.0, 300.0),
                (150.0, 200.0),
                (300.0, 200.0),
                (300.0, 400.0),
                (450.0, 400.0),
                (450.0, 100.0),
                (600.0, 100.0),
                (600.0, 300.0),
                (750.0, 300.0),
                (930.0, 300.0),
            ],
        ),
        map(
            "desert",
            "Desert Fortress",
            15,
            75,
            15,
            &[
                (-30.0, 150.0),
                (150.0, 150.0),
                (150.0, 300.0),
                (300.0, 300.0),
                (300.0, 100.0),
                (450.0, 100.0),
                (450.0, 400.0),
                (600.0, 400.0),
                (600.0, 200.0),
                (750.0, 200.0),
                (750.0, 350.0),
                (930.0, 350.0),
            ],
        ),
        map(
            "forest",
            "Dark Forest",
            12,
            90,
            18,
            &[
                (-30.0, 200.0),
                (100.0, 200.0),
                (100.0, 400.0),
                (250.0, 400.0),
                (250.0, 150.0),
                (400.0, 150.0),
                (400.0, 350.0),
                (550.0, 350.0),
                (550.0, 250.0),
                (700.0, 250.0),
                (700.0, 450.0),
                (850.0, 450.0),
                (850.0, 300.0),
                (930.0, 300.0),
            ],
        ),
        map(
            "mountains",
            "Mountain Pass",
            18,
            80,
            15,
            &[
                (-30.0, 100.0),
                (200.0, 100.0),
                (200.0, 300.0),
                (100.0, 300.0),
                (100.0, 500.0),
                (300.0, 500.0),
                (300.0, 200.0),
                (500.0, 200.0),
                (500.0, 400.0),
                (700.0, 400.0),
                (700.0, 150.0),
                (930.0, 150.0),
            ],
        ),
        map(
            "swamp",
            "Mystic Swamp",
            14,
            85,
            17,
            &[
                (-30.0, 300.0),
                (150.0, 300.0),
                (150.0, 450.0),
                (300.0, 450.0),
                (300.0, 200.0),
                (450.0, 200.0),
                (450.0, 350.0),
                (600.0, 350.0),
                (600.0, 100.0),
                (750.0, 100.0),
                (750.0, 300.0),
                (930.0, 300.0),
            ],
        ),
        map(
            "volcano",
            "Volcanic Lair",
            20,
            70,
            12,
            &[
                (-30.0, 300.0),
                (100.0, 300.0),
                (100.0, 100.0),
                (300.0, 100.0),
                (300.0, 500.0),
                (500.0, 500.0),
                (500.0, 200.0),
                (700.0, 200.0),
                (700.0, 400.0),
                (850.0, 400.0),
                (850.0, 300.0),
                (930.0, 300.0),
            ],
        ),
        map(
            "castle",
            "Royal Castle",
            16,
            95,
            18,
            &[
                (-30.0, 200.0),
                (150.0, 200.0),
                (150.0, 400.0),
                (350.0, 400.0),
                (350.0, 100.0),
                (550.0, 100.0),
                (550.0, 300.0),
                (750.0, 300.0),
                (750.0, 200.0),
                (930.0, 200.0),
            ],
        ),
    ]
}
