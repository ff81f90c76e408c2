#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session orchestrator that drives the world and the pure systems in a
//! fixed order once per tick.
//!
//! Hosts own a [`Simulation`], feed it wall-clock time through
//! [`Simulation::advance`] and forward player actions through the host
//! methods between ticks.

mod clock;

use std::time::Duration;

use path_defence_core::{
    Catalog, Command, Event, PlacementError, SaleError, SessionConfig, SessionPhase,
    SessionSummary, TowerId, TowerKind, TowerTarget, UpgradeError, Vec2, TICK_DURATION,
};
use path_defence_system_tower_combat::TowerCombat;
use path_defence_system_tower_targeting::TowerTargeting;
use path_defence_system_waves::{self as waves, WaveControl};
use path_defence_world::{self as world, query, World};
use tracing::{debug, trace};

pub use clock::FrameClock;

/// Owns the world together with every system that reacts to it.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    waves: WaveControl,
    targeting: TowerTargeting,
    combat: TowerCombat,
    clock: FrameClock,
    pending_events: Vec<Event>,
    /// Every event since the last `take_events`; hosts drain it once per frame.
    log: Vec<Event>,
    targets: Vec<TowerTarget>,
    commands: Vec<Command>,
}

impl Simulation {
    /// Creates a simulation and starts a session with `config`.
    #[must_use]
    pub fn new(catalog: Catalog, config: SessionConfig) -> Self {
        let waves = WaveControl::new(waves::Config::new(catalog.waves.spawn_delay_ticks));
        let mut simulation = Self {
            world: World::new(catalog, config.clone()),
            waves,
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            clock: FrameClock::new(TICK_DURATION),
            pending_events: Vec::new(),
            log: Vec::new(),
            targets: Vec::new(),
            commands: Vec::new(),
        };
        simulation.start(config);
        simulation
    }

    /// Discards the current session and begins a fresh one.
    pub fn start(&mut self, config: SessionConfig) {
        self.pending_events.clear();
        self.targets.clear();
        self.clock.reset();
        debug!(seed = config.seed, hero = config.hero, "resetting simulation");
        self.dispatch(Command::StartSession { config });
    }

    /// Read-only access to the world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Final figures once the session has ended.
    #[must_use]
    pub fn summary(&self) -> Option<SessionSummary> {
        query::summary(&self.world)
    }

    /// Drains every event emitted since the previous call.
    ///
    /// Events accumulate until drained, so hosts should call this after every
    /// `advance` or host action.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.log)
    }

    /// Feeds wall-clock time to the fixed-timestep scheduler.
    ///
    /// Time only accumulates while combat runs unpaused; otherwise the tower
    /// aim is refreshed without advancing the session. Returns the number of
    /// ticks simulated.
    pub fn advance(&mut self, real_dt: Duration) -> u32 {
        if query::phase(&self.world) != SessionPhase::Combat || query::is_paused(&self.world) {
            self.refresh_targeting_preview();
            return 0;
        }

        let due = self.clock.accumulate(real_dt, query::speed(&self.world));
        let mut simulated = 0;
        for _ in 0..due {
            if query::outcome(&self.world).is_some() {
                self.clock.reset();
                break;
            }
            self.step();
            simulated += 1;
        }
        simulated
    }

    /// Runs exactly one tick of the session.
    ///
    /// Does nothing once the session has been won or lost.
    pub fn step(&mut self) {
        if query::outcome(&self.world).is_some() {
            return;
        }

        self.dispatch(Command::Tick { dt: TICK_DURATION });

        self.commands.clear();
        self.waves.handle(
            &self.pending_events,
            query::wave_progress(&self.world),
            query::enemy_view(&self.world).len(),
            &mut self.commands,
        );
        self.pending_events.clear();
        self.flush_commands();

        self.dispatch(Command::AdvanceEnemies);
        if query::outcome(&self.world).is_some() {
            return;
        }

        self.dispatch(Command::AdvanceHero);

        self.retarget();
        let towers = query::tower_view(&self.world);
        self.commands.clear();
        self.combat.handle(
            query::elapsed(&self.world),
            &towers,
            &self.targets,
            &mut self.commands,
        );
        self.flush_commands();

        self.dispatch(Command::AdvanceProjectiles);
        self.dispatch(Command::DecayParticles);
    }

    /// Recomputes tower targets and facing without firing.
    pub fn refresh_targeting_preview(&mut self) {
        self.retarget();
    }

    /// Toggles between build, combat and pause.
    pub fn toggle_pause(&mut self) {
        self.dispatch(Command::TogglePause);
    }

    /// Steps the game speed 1×, 2×, 3× and back.
    pub fn cycle_speed(&mut self) {
        self.dispatch(Command::CycleSpeed);
    }

    /// Places a tower, paying its cost.
    pub fn place_tower(
        &mut self,
        kind: TowerKind,
        position: Vec2,
    ) -> Result<TowerId, PlacementError> {
        let start = self.log.len();
        self.dispatch(Command::PlaceTower { kind, position });
        self.log[start..]
            .iter()
            .find_map(|event| match event {
                Event::TowerPlaced { tower, .. } => Some(Ok(*tower)),
                Event::TowerPlacementRejected { reason, .. } => Some(Err(*reason)),
                _ => None,
            })
            .unwrap_or(Err(PlacementError::SessionOver))
    }

    /// Upgrades a tower and returns its new level.
    pub fn upgrade_tower(&mut self, tower: TowerId) -> Result<usize, UpgradeError> {
        let start = self.log.len();
        self.dispatch(Command::UpgradeTower { tower });
        self.log[start..]
            .iter()
            .find_map(|event| match event {
                Event::TowerUpgraded { level, .. } => Some(Ok(*level)),
                Event::TowerUpgradeRejected { reason, .. } => Some(Err(*reason)),
                _ => None,
            })
            .unwrap_or(Err(UpgradeError::MissingTower))
    }

    /// Sells a tower and returns the refunded gold.
    pub fn sell_tower(&mut self, tower: TowerId) -> Result<u32, SaleError> {
        let start = self.log.len();
        self.dispatch(Command::SellTower { tower });
        self.log[start..]
            .iter()
            .find_map(|event| match event {
                Event::TowerSold { refund, .. } => Some(Ok(*refund)),
                Event::TowerSaleRejected { reason, .. } => Some(Err(*reason)),
                _ => None,
            })
            .unwrap_or(Err(SaleError::MissingTower))
    }

    /// Highlights a tower, or clears the highlight with `None`.
    pub fn select_tower(&mut self, tower: Option<TowerId>) {
        self.dispatch(Command::SelectTower { tower });
    }

    /// Sends the hero toward `destination`.
    pub fn move_hero(&mut self, destination: Vec2) {
        self.dispatch(Command::MoveHero { destination });
    }

    fn retarget(&mut self) {
        let towers = query::tower_view(&self.world);
        let enemies = query::enemy_view(&self.world);
        self.targeting.handle(&towers, &enemies, &mut self.targets);
        self.dispatch(Command::AimTowers {
            targets: self.targets.clone(),
        });
    }

    fn flush_commands(&mut self) {
        let mut commands = std::mem::take(&mut self.commands);
        for command in commands.drain(..) {
            self.dispatch(command);
        }
        self.commands = commands;
    }

    /// Applies a command and records what it produced.
    fn dispatch(&mut self, command: Command) {
        let start = self.pending_events.len();
        world::apply(&mut self.world, command, &mut self.pending_events);
        let produced = &self.pending_events[start..];
        if !produced.is_empty() {
            trace!(count = produced.len(), "events produced");
        }
        self.log.extend_from_slice(produced);
    }
}
