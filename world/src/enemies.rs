//! Hostile units walking the session path.

use std::time::Duration;

use path_defence_core::{
    DifficultyProfile, EnemyArchetype, EnemyId, EnemyKind, EnemyPath, EnemySnapshot, Vec2,
    ARRIVAL_EPSILON, SLOW_FACTOR,
};

/// Live enemy state stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) position: Vec2,
    pub(crate) radius: f32,
    pub(crate) gold: u32,
    pub(crate) score: u32,
    segment: usize,
    hit_points: f32,
    max_hit_points: f32,
    speed: f32,
    slowed_until: Duration,
}

impl Enemy {
    /// Creates an enemy at the path start with stats scaled for the session.
    pub(crate) fn spawn(
        id: EnemyId,
        kind: EnemyKind,
        archetype: &EnemyArchetype,
        profile: &DifficultyProfile,
        wave: u32,
        path: &EnemyPath,
    ) -> Self {
        let max_hit_points = (archetype.hit_points * profile.health_factor(wave)).floor();
        let gold = (archetype.gold as f32 * profile.gold_multiplier).floor() as u32;
        Self {
            id,
            kind,
            position: path.start(),
            radius: archetype.size,
            gold,
            score: archetype.score,
            segment: 0,
            hit_points: max_hit_points,
            max_hit_points,
            speed: archetype.speed * profile.enemy_speed_multiplier,
            slowed_until: Duration::ZERO,
        }
    }

    pub(crate) fn hit_points(&self) -> f32 {
        self.hit_points
    }

    pub(crate) fn is_slowed(&self, now: Duration) -> bool {
        now < self.slowed_until
    }

    /// Moves the enemy one tick and reports whether it reached the end of the path.
    ///
    /// Arrival at the final waypoint ends the walk; crossing `exit_x` while on
    /// the final segment does too. A step never carries the enemy past the
    /// waypoint it is heading for.
    pub(crate) fn advance(&mut self, now: Duration, path: &EnemyPath, exit_x: f32) -> bool {
        let speed = if self.is_slowed(now) {
            self.speed * SLOW_FACTOR
        } else {
            self.speed
        };
        let Some(next) = path.get(self.segment + 1) else {
            return true;
        };
        let final_leg = self.segment + 1 >= path.last_index();

        let delta = next - self.position;
        let distance = delta.length();
        if distance < ARRIVAL_EPSILON {
            if final_leg {
                self.position = path.end();
                return true;
            }
            self.segment += 1;
            return false;
        }
        if final_leg && self.position.x > exit_x {
            return true;
        }

        self.position += delta / distance * speed.min(distance);
        false
    }

    /// Removes hit points and reports whether this strike killed the enemy.
    ///
    /// Only the first strike that brings hit points to zero reports a kill.
    pub(crate) fn take_damage(&mut self, amount: f32) -> bool {
        if amount.is_nan() || amount <= 0.0 || self.hit_points <= 0.0 {
            return false;
        }
        self.hit_points = (self.hit_points - amount).max(0.0);
        self.hit_points <= 0.0
    }

    /// Extends the slow effect so it lasts at least `duration` past `now`.
    pub(crate) fn apply_slow(&mut self, duration: Duration, now: Duration) -> Duration {
        self.slowed_until = self.slowed_until.max(now.saturating_add(duration));
        self.slowed_until
    }

    pub(crate) fn snapshot(&self, now: Duration) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            radius: self.radius,
            hit_points: self.hit_points,
            max_hit_points: self.max_hit_points,
            segment: self.segment,
            slowed: self.is_slowed(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use path_defence_core::{Catalog, Difficulty};

    fn straight_path() -> EnemyPath {
        EnemyPath::new(vec![Vec2::new(0.0, 100.0), Vec2::new(20.0, 100.0)]).expect("path")
    }

    fn basic_enemy(path: &EnemyPath) -> Enemy {
        let catalog = Catalog::default();
        Enemy::spawn(
            EnemyId::new(0),
            EnemyKind::Basic,
            catalog.enemies.get(EnemyKind::Basic),
            catalog.difficulties.get(Difficulty::Normal),
            1,
            path,
        )
    }

    #[test]
    fn health_only_decreases_and_kill_reports_once() {
        let mut enemy = basic_enemy(&straight_path());
        assert!(!enemy.take_damage(-10.0));
        assert_eq!(enemy.hit_points(), 50.0);
        assert!(!enemy.take_damage(20.0));
        assert!(!enemy.take_damage(20.0));
        assert_eq!(enemy.hit_points(), 10.0);
        assert!(enemy.take_damage(20.0));
        assert_eq!(enemy.hit_points(), 0.0);
        assert!(!enemy.take_damage(20.0), "a dead enemy must not be killed twice");
    }

    #[test]
    fn slow_refreshes_instead_of_stacking() {
        let mut enemy = basic_enemy(&straight_path());
        let start = Duration::from_secs(10);
        let until = enemy.apply_slow(Duration::from_secs(5), start);
        assert_eq!(until, Duration::from_secs(15));

        let shorter = enemy.apply_slow(Duration::from_secs(2), start);
        assert_eq!(shorter, Duration::from_secs(15));

        let longer = enemy.apply_slow(Duration::from_secs(10), start);
        assert_eq!(longer, Duration::from_secs(20));
    }

    #[test]
    fn slowed_enemies_move_at_reduced_speed() {
        let path = straight_path();
        let mut enemy = basic_enemy(&path);
        let now = Duration::ZERO;
        let _ = enemy.apply_slow(Duration::from_secs(1), now);
        assert!(!enemy.advance(now, &path, 930.0));
        assert!((enemy.position.x - SLOW_FACTOR).abs() < 1e-6);
    }

    #[test]
    fn reaching_the_final_waypoint_snaps_and_reports() {
        let path = straight_path();
        let mut enemy = basic_enemy(&path);
        let mut reached = false;
        for _ in 0..30 {
            if enemy.advance(Duration::ZERO, &path, 930.0) {
                reached = true;
                break;
            }
        }
        assert!(reached);
        assert_eq!(enemy.position, path.end());
    }

    #[test]
    fn fast_enemies_finish_without_overshooting() {
        let path =
            EnemyPath::new(vec![Vec2::new(-30.0, 300.0), Vec2::new(930.0, 300.0)]).expect("path");
        let mut archetype = Catalog::default().enemies.get(EnemyKind::Basic).clone();
        archetype.speed = 14.0;
        let mut enemy = Enemy::spawn(
            EnemyId::new(0),
            EnemyKind::Basic,
            &archetype,
            Catalog::default().difficulties.get(Difficulty::Normal),
            1,
            &path,
        );

        let mut steps = 0;
        let mut furthest = enemy.position.x;
        while !enemy.advance(Duration::ZERO, &path, 930.0) {
            assert!(enemy.position.x >= furthest, "enemy walked backwards");
            assert!(enemy.position.x <= 930.0, "enemy overshot the final waypoint");
            furthest = enemy.position.x;
            steps += 1;
            assert!(steps < 1_000, "enemy never reached the end");
        }
        assert_eq!(enemy.position, path.end());
    }

    #[test]
    fn crossing_the_exit_line_on_the_final_leg_escapes() {
        let path = EnemyPath::new(vec![
            Vec2::new(0.0, 100.0),
            Vec2::new(50.0, 100.0),
            Vec2::new(50.0, 400.0),
        ])
        .expect("path");
        let mut enemy = basic_enemy(&path);
        enemy.segment = 1;
        enemy.position = Vec2::new(60.0, 200.0);
        assert!(enemy.advance(Duration::ZERO, &path, 55.0));

        let mut early = basic_enemy(&path);
        early.position = Vec2::new(20.0, 100.0);
        assert!(
            !early.advance(Duration::ZERO, &path, 10.0),
            "only the final segment honours the exit line"
        );
    }

    #[test]
    fn hard_difficulty_scales_spawned_stats() {
        let catalog = Catalog::default();
        let enemy = Enemy::spawn(
            EnemyId::new(3),
            EnemyKind::Tank,
            catalog.enemies.get(EnemyKind::Tank),
            catalog.difficulties.get(Difficulty::Hard),
            4,
            &straight_path(),
        );
        let snapshot = enemy.snapshot(Duration::ZERO);
        assert_eq!(snapshot.max_hit_points, 156.0);
        assert_eq!(enemy.gold, 13);
        assert!((enemy.speed - 0.575).abs() < 1e-6);
    }
}
