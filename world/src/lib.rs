#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Path Defence.
//!
//! The world owns the ledger, every entity collection and the session flags.
//! It changes only through [`apply`]; everything else reads it through
//! [`query`].

mod enemies;
mod hero;
mod ledger;
mod particles;
mod placement;
mod projectiles;
mod towers;

use std::time::Duration;

use path_defence_core::{
    Catalog, Command, EnemyId, EnemyKind, Event, GameSpeed, Outcome, PlacementError, SaleError,
    SessionConfig, SessionPhase, TowerId, TowerKind, TowerTarget, UpgradeError, Vec2,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

use enemies::Enemy;
use hero::Hero;
use ledger::Ledger;
use particles::Particle;
use projectiles::{Launch, Projectile};
use towers::TowerRegistry;

/// Represents the authoritative Path Defence world state.
#[derive(Debug)]
pub struct World {
    catalog: Catalog,
    config: SessionConfig,
    ledger: Ledger,
    spawned: u32,
    quota: u32,
    enemies: Vec<Enemy>,
    next_enemy_id: u32,
    towers: TowerRegistry,
    projectiles: Vec<Projectile>,
    particles: Vec<Particle>,
    hero: Option<Hero>,
    selected_tower: Option<TowerId>,
    phase: SessionPhase,
    paused: bool,
    speed: GameSpeed,
    outcome: Option<Outcome>,
    elapsed: Duration,
    tick_index: u64,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a world holding a fresh session in the build phase.
    #[must_use]
    pub fn new(catalog: Catalog, config: SessionConfig) -> Self {
        let ledger = Ledger::new(config.start_gold, config.start_lives);
        let quota = catalog.waves.quota_for(ledger.wave());
        let hero = config.hero.then(|| Hero::new(&catalog.hero));
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            catalog,
            config,
            ledger,
            spawned: 0,
            quota,
            enemies: Vec::new(),
            next_enemy_id: 0,
            towers: TowerRegistry::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            hero,
            selected_tower: None,
            phase: SessionPhase::Build,
            paused: true,
            speed: GameSpeed::Normal,
            outcome: None,
            elapsed: Duration::ZERO,
            tick_index: 0,
            rng,
        }
    }

    fn restart(&mut self, config: SessionConfig) {
        let catalog = std::mem::take(&mut self.catalog);
        *self = Self::new(catalog, config);
    }

    fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    fn wave_cleared(&self) -> bool {
        self.spawned >= self.quota && self.enemies.is_empty()
    }

    fn is_final_wave(&self) -> bool {
        self.config
            .max_wave
            .map_or(false, |max_wave| self.ledger.wave() >= max_wave)
    }

    fn enemy_index(&self, enemy: EnemyId) -> Option<usize> {
        self.enemies.iter().position(|candidate| candidate.id == enemy)
    }

    fn finish(&mut self, outcome: Outcome, out_events: &mut Vec<Event>) {
        self.outcome = Some(outcome);
        let score = self.ledger.score();
        match outcome {
            Outcome::Victory => {
                let lives = self.ledger.lives();
                info!(score, lives, "victory");
                out_events.push(Event::Victory { score, lives });
            }
            Outcome::Defeat => {
                let wave = self.ledger.wave();
                info!(score, wave, "game over");
                out_events.push(Event::GameOver { score, wave });
            }
        }
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.elapsed = self.elapsed.saturating_add(dt);
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            dt,
            tick: self.tick_index,
        });
    }

    fn toggle_pause(&mut self, out_events: &mut Vec<Event>) {
        match self.phase {
            SessionPhase::Build => {
                self.phase = SessionPhase::Combat;
                self.paused = false;
                info!("combat started");
                out_events.push(Event::PhaseChanged {
                    phase: SessionPhase::Combat,
                });
            }
            SessionPhase::Combat => {
                self.paused = !self.paused;
                debug!(paused = self.paused, "pause toggled");
            }
        }
        out_events.push(Event::PauseChanged {
            paused: self.paused,
        });
    }

    fn cycle_speed(&mut self, out_events: &mut Vec<Event>) {
        if self.phase != SessionPhase::Combat || self.paused {
            return;
        }
        self.speed = self.speed.next();
        debug!(multiplier = self.speed.multiplier(), "game speed changed");
        out_events.push(Event::SpeedChanged { speed: self.speed });
    }

    fn spawn_enemy(&mut self, kind: EnemyKind, out_events: &mut Vec<Event>) {
        if self.spawned >= self.quota {
            trace!(?kind, "spawn ignored, wave quota reached");
            return;
        }

        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.saturating_add(1);
        let enemy = Enemy::spawn(
            id,
            kind,
            self.catalog.enemies.get(kind),
            &self.config.profile,
            self.ledger.wave(),
            &self.config.path,
        );
        self.spawned += 1;
        trace!(enemy = id.get(), ?kind, hit_points = enemy.hit_points(), "enemy spawned");
        out_events.push(Event::EnemySpawned {
            enemy: id,
            kind,
            hit_points: enemy.hit_points(),
        });
        self.enemies.push(enemy);
    }

    fn begin_next_wave(&mut self, out_events: &mut Vec<Event>) {
        if !self.wave_cleared() || self.is_final_wave() {
            return;
        }
        let wave = self.ledger.advance_wave();
        self.quota = self.catalog.waves.quota_for(wave);
        self.spawned = 0;
        info!(wave, quota = self.quota, "wave started");
        out_events.push(Event::WaveStarted {
            wave,
            quota: self.quota,
        });
    }

    fn declare_victory(&mut self, out_events: &mut Vec<Event>) {
        if self.wave_cleared() && self.is_final_wave() {
            self.finish(Outcome::Victory, out_events);
        }
    }

    fn advance_enemies(&mut self, out_events: &mut Vec<Event>) {
        let now = self.elapsed;
        let exit_x = self.catalog.playfield.exit_x();
        for index in (0..self.enemies.len()).rev() {
            if !self.enemies[index].advance(now, &self.config.path, exit_x) {
                continue;
            }
            let enemy = self.enemies.remove(index);
            let exhausted = self.ledger.lose_life();
            trace!(enemy = enemy.id.get(), lives = self.ledger.lives(), "enemy escaped");
            out_events.push(Event::EnemyEscaped {
                enemy: enemy.id,
                lives: self.ledger.lives(),
            });
            if exhausted {
                self.finish(Outcome::Defeat, out_events);
                return;
            }
        }
    }

    fn advance_hero(&mut self, out_events: &mut Vec<Event>) {
        let Some(hero) = self.hero.as_mut() else {
            return;
        };
        if !hero.step() {
            return;
        }
        let Some(index) = self
            .enemies
            .iter()
            .position(|enemy| hero.reaches(enemy.position))
        else {
            return;
        };
        hero.strike();
        let damage = hero.damage;
        if self.damage_enemy(index, damage, out_events) {
            self.kill(index, out_events);
        }
    }

    fn aim_towers(&mut self, targets: Vec<TowerTarget>) {
        for tower in self.towers.iter_mut() {
            tower.target = None;
        }
        for target in targets {
            if let Some(tower) = self.towers.get_mut(target.tower) {
                tower.target = Some(target.enemy);
                tower.facing = target.facing();
            }
        }
    }

    fn fire_projectile(&mut self, tower: TowerId, target: EnemyId, out_events: &mut Vec<Event>) {
        let Some(aim) = self
            .enemies
            .iter()
            .find(|enemy| enemy.id == target)
            .map(|enemy| enemy.position)
        else {
            return;
        };
        let now = self.elapsed;
        let Some(state) = self.towers.get_mut(tower) else {
            return;
        };
        let archetype = self.catalog.towers.get(state.kind);
        let tier = archetype.tier(state.level);
        let launch = Launch {
            tower_kind: state.kind,
            level: state.level,
            damage: tier.damage,
            effect: tier.effect,
            speed: archetype.projectile_speed,
            color: archetype.projectile_color,
        };
        state.last_fired = Some(now);
        self.projectiles
            .push(Projectile::launch(state.position, aim, launch));
        out_events.push(Event::ProjectileFired { tower, target });
    }

    fn advance_projectiles(&mut self, out_events: &mut Vec<Event>) {
        for index in (0..self.projectiles.len()).rev() {
            self.projectiles[index].step();
            if let Some(hit) = self.projectiles[index].first_hit(&self.enemies) {
                let projectile = self.projectiles.remove(index);
                self.resolve_hit(&projectile, hit, out_events);
                continue;
            }
            if !self
                .catalog
                .playfield
                .contains(self.projectiles[index].position)
            {
                let _ = self.projectiles.remove(index);
            }
        }
    }

    fn resolve_hit(&mut self, projectile: &Projectile, hit: usize, out_events: &mut Vec<Event>) {
        let primary = self.enemies[hit].id;
        let killed = self.damage_enemy(hit, projectile.damage, out_events);

        if let Some(duration) = projectile.effect.slow_duration() {
            let until = self.enemies[hit].apply_slow(duration, self.elapsed);
            out_events.push(Event::EnemySlowed {
                enemy: primary,
                until,
            });
        }
        if let Some(radius) = projectile.effect.splash_radius() {
            self.splash(projectile, primary, radius, out_events);
            particles::burst(
                &mut self.rng,
                projectile.position,
                projectile.level,
                projectile.color,
                &mut self.particles,
            );
        }

        if killed {
            if let Some(index) = self.enemy_index(primary) {
                self.kill(index, out_events);
            }
        }
    }

    fn splash(
        &mut self,
        projectile: &Projectile,
        primary: EnemyId,
        radius: f32,
        out_events: &mut Vec<Event>,
    ) {
        let damage = projectile.splash_damage();
        let mut index = 0;
        while index < self.enemies.len() {
            let enemy = &self.enemies[index];
            if enemy.id == primary || enemy.position.distance(projectile.position) > radius {
                index += 1;
                continue;
            }
            if self.damage_enemy(index, damage, out_events) {
                self.kill(index, out_events);
            } else {
                index += 1;
            }
        }
    }

    fn damage_enemy(&mut self, index: usize, amount: f32, out_events: &mut Vec<Event>) -> bool {
        let enemy = &mut self.enemies[index];
        let killed = enemy.take_damage(amount);
        out_events.push(Event::EnemyDamaged {
            enemy: enemy.id,
            amount,
            remaining: enemy.hit_points(),
        });
        killed
    }

    fn kill(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let enemy = self.enemies.remove(index);
        self.ledger.reward(enemy.gold, enemy.score);
        trace!(enemy = enemy.id.get(), gold = enemy.gold, score = enemy.score, "enemy killed");
        out_events.push(Event::EnemyKilled {
            enemy: enemy.id,
            kind: enemy.kind,
            gold: enemy.gold,
            score: enemy.score,
        });
    }

    fn decay_particles(&mut self) {
        self.particles.retain_mut(Particle::step);
    }

    fn place_tower(
        &mut self,
        kind: TowerKind,
        position: Vec2,
    ) -> Result<(TowerId, u32), PlacementError> {
        if self.is_over() {
            return Err(PlacementError::SessionOver);
        }
        query::placement_validity(self, position)?;
        let cost = self.catalog.towers.get(kind).cost;
        self.ledger
            .spend(cost)
            .map_err(|available| PlacementError::InsufficientGold { cost, available })?;
        Ok((self.towers.insert(kind, position, cost), cost))
    }

    fn upgrade_tower(&mut self, tower: TowerId) -> Result<(usize, u32), UpgradeError> {
        if self.is_over() {
            return Err(UpgradeError::SessionOver);
        }
        let state = self
            .towers
            .get_mut(tower)
            .ok_or(UpgradeError::MissingTower)?;
        let cost = state.upgrade_cost(self.catalog.towers.get(state.kind))?;
        self.ledger
            .spend(cost)
            .map_err(|available| UpgradeError::InsufficientGold { cost, available })?;
        state.level += 1;
        state.invested = state.invested.saturating_add(cost);
        Ok((state.level, cost))
    }

    fn sell_tower(
        &mut self,
        tower: TowerId,
        out_events: &mut Vec<Event>,
    ) -> Result<u32, SaleError> {
        if self.is_over() {
            return Err(SaleError::SessionOver);
        }
        let state = self.towers.remove(tower).ok_or(SaleError::MissingTower)?;
        let refund = state.refund();
        self.ledger.credit(refund);
        if self.selected_tower == Some(tower) {
            self.selected_tower = None;
            out_events.push(Event::TowerSelected { tower: None });
        }
        Ok(refund)
    }

    fn select_tower(&mut self, tower: Option<TowerId>, out_events: &mut Vec<Event>) {
        let selection = tower.filter(|id| self.towers.get(*id).is_some());
        self.selected_tower = selection;
        out_events.push(Event::TowerSelected { tower: selection });
    }

    fn move_hero(&mut self, destination: Vec2, out_events: &mut Vec<Event>) {
        if let Some(hero) = self.hero.as_mut() {
            hero.set_destination(destination);
            out_events.push(Event::HeroDestinationChanged { destination });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the session has ended only session restarts, selection changes and
/// tower management requests are processed; the latter are rejected.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let always_handled = matches!(
        command,
        Command::StartSession { .. }
            | Command::PlaceTower { .. }
            | Command::UpgradeTower { .. }
            | Command::SellTower { .. }
            | Command::SelectTower { .. }
    );
    if world.is_over() && !always_handled {
        return;
    }

    match command {
        Command::StartSession { config } => {
            world.restart(config);
            info!(
                seed = world.config.seed,
                gold = world.ledger.gold(),
                lives = world.ledger.lives(),
                max_wave = ?world.config.max_wave,
                "session started"
            );
            out_events.push(Event::SessionStarted {
                seed: world.config.seed,
                quota: world.quota,
            });
        }
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::TogglePause => world.toggle_pause(out_events),
        Command::CycleSpeed => world.cycle_speed(out_events),
        Command::PlaceTower { kind, position } => match world.place_tower(kind, position) {
            Ok((tower, cost)) => {
                debug!(tower = tower.get(), ?kind, cost, "tower placed");
                out_events.push(Event::TowerPlaced {
                    tower,
                    kind,
                    position,
                    cost,
                });
            }
            Err(reason) => {
                debug!(?kind, %reason, "tower placement rejected");
                out_events.push(Event::TowerPlacementRejected {
                    kind,
                    position,
                    reason,
                });
            }
        },
        Command::UpgradeTower { tower } => match world.upgrade_tower(tower) {
            Ok((level, cost)) => {
                debug!(tower = tower.get(), level, cost, "tower upgraded");
                out_events.push(Event::TowerUpgraded { tower, level, cost });
            }
            Err(reason) => {
                debug!(tower = tower.get(), %reason, "tower upgrade rejected");
                out_events.push(Event::TowerUpgradeRejected { tower, reason });
            }
        },
        Command::SellTower { tower } => match world.sell_tower(tower, out_events) {
            Ok(refund) => {
                debug!(tower = tower.get(), refund, "tower sold");
                out_events.push(Event::TowerSold { tower, refund });
            }
            Err(reason) => {
                debug!(tower = tower.get(), %reason, "tower sale rejected");
                out_events.push(Event::TowerSaleRejected { tower, reason });
            }
        },
        Command::SelectTower { tower } => world.select_tower(tower, out_events),
        Command::MoveHero { destination } => world.move_hero(destination, out_events),
        Command::SpawnEnemy { kind } => world.spawn_enemy(kind, out_events),
        Command::BeginNextWave => world.begin_next_wave(out_events),
        Command::DeclareVictory => world.declare_victory(out_events),
        Command::AdvanceEnemies => world.advance_enemies(out_events),
        Command::AdvanceHero => world.advance_hero(out_events),
        Command::AimTowers { targets } => world.aim_towers(targets),
        Command::FireProjectile { tower, target } => {
            world.fire_projectile(tower, target, out_events);
        }
        Command::AdvanceProjectiles => world.advance_projectiles(out_events),
        Command::DecayParticles => world.decay_particles(),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use path_defence_core::{
        stars_for_lives, Catalog, EnemyPath, EnemyView, GameSpeed, HeroSnapshot, LedgerSnapshot,
        Outcome, ParticleSnapshot, PlacementError, ProjectileSnapshot, SessionPhase,
        SessionSummary, TowerId, TowerView, Vec2, WaveProgress,
    };

    use super::{placement, World};

    /// Static tables the session runs with.
    #[must_use]
    pub fn catalog(world: &World) -> &Catalog {
        &world.catalog
    }

    /// Route enemies follow in the current session.
    #[must_use]
    pub fn path(world: &World) -> &EnemyPath {
        &world.config.path
    }

    /// Gold, lives, score and wave.
    #[must_use]
    pub fn ledger(world: &World) -> LedgerSnapshot {
        world.ledger.snapshot()
    }

    /// Spawn progress of the current wave.
    #[must_use]
    pub fn wave_progress(world: &World) -> WaveProgress {
        WaveProgress {
            wave: world.ledger.wave(),
            spawned: world.spawned,
            quota: world.quota,
            max_wave: world.config.max_wave,
        }
    }

    /// Captures the live enemies in spawn order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let now = world.elapsed;
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|enemy| enemy.snapshot(now))
                .collect(),
        )
    }

    /// Captures every placed tower in placement order.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| tower.snapshot(world.catalog.towers.get(tower.kind)))
                .collect(),
        )
    }

    /// Captures the projectiles in flight.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .map(|projectile| projectile.snapshot())
            .collect()
    }

    /// Captures the live particles.
    #[must_use]
    pub fn particles(world: &World) -> Vec<ParticleSnapshot> {
        world
            .particles
            .iter()
            .map(|particle| particle.snapshot())
            .collect()
    }

    /// Hero state when the session includes one.
    #[must_use]
    pub fn hero(world: &World) -> Option<HeroSnapshot> {
        world.hero.as_ref().map(|hero| hero.snapshot())
    }

    /// Tower highlighted by the player.
    #[must_use]
    pub fn selected_tower(world: &World) -> Option<TowerId> {
        world.selected_tower
    }

    /// Reports whether the session is in build or combat.
    #[must_use]
    pub fn phase(world: &World) -> SessionPhase {
        world.phase
    }

    /// Reports whether time is frozen.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }

    /// Active game speed.
    #[must_use]
    pub fn speed(world: &World) -> GameSpeed {
        world.speed
    }

    /// Virtual time simulated since the session started.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Number of ticks simulated since the session started.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// How the session ended, if it has.
    #[must_use]
    pub fn outcome(world: &World) -> Option<Outcome> {
        world.outcome
    }

    /// Final figures once the session has ended.
    #[must_use]
    pub fn summary(world: &World) -> Option<SessionSummary> {
        let outcome = world.outcome?;
        let ledger = world.ledger.snapshot();
        Some(SessionSummary {
            outcome,
            score: ledger.score,
            lives: ledger.lives,
            wave: ledger.wave,
            stars: stars_for_lives(ledger.lives),
        })
    }

    /// Checks whether a tower could stand at `point`, ignoring its price.
    pub fn placement_validity(world: &World, point: Vec2) -> Result<(), PlacementError> {
        placement::check_clearance(
            point,
            &world.config.path,
            world.towers.iter().map(|tower| tower.position),
            &world.catalog.placement,
        )
    }

    /// Boolean form of [`placement_validity`].
    #[must_use]
    pub fn is_valid_placement(world: &World, point: Vec2) -> bool {
        placement_validity(world, point).is_ok()
    }

    /// Gold needed for the tower's next upgrade, if it has one.
    #[must_use]
    pub fn upgrade_cost(world: &World, tower: TowerId) -> Option<u32> {
        let state = world.towers.get(tower)?;
        state
            .upgrade_cost(world.catalog.towers.get(state.kind))
            .ok()
    }

    /// Gold the tower would return if sold now.
    #[must_use]
    pub fn sell_value(world: &World, tower: TowerId) -> Option<u32> {
        world.towers.get(tower).map(|state| state.refund())
    }
}
