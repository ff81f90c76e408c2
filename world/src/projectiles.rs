//! Straight-line projectiles launched by towers.

use path_defence_core::{
    Color, ProjectileSnapshot, TowerEffect, TowerKind, Vec2, PROJECTILE_HIT_MARGIN,
};

use crate::enemies::Enemy;

/// Projectile in flight.
///
/// Velocity is fixed at launch; projectiles never home in on their target.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) position: Vec2,
    velocity: Vec2,
    pub(crate) damage: f32,
    pub(crate) level: usize,
    pub(crate) effect: TowerEffect,
    pub(crate) tower_kind: TowerKind,
    pub(crate) color: Color,
}

/// Tower tier data captured at the moment of firing.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Launch {
    pub(crate) tower_kind: TowerKind,
    pub(crate) level: usize,
    pub(crate) damage: f32,
    pub(crate) effect: TowerEffect,
    pub(crate) speed: f32,
    pub(crate) color: Color,
}

impl Projectile {
    /// Launches a projectile from `origin` toward `aim`.
    pub(crate) fn launch(origin: Vec2, aim: Vec2, launch: Launch) -> Self {
        Self {
            position: origin,
            velocity: (aim - origin).normalize_or_zero() * launch.speed,
            damage: launch.damage,
            level: launch.level,
            effect: launch.effect,
            tower_kind: launch.tower_kind,
            color: launch.color,
        }
    }

    pub(crate) fn step(&mut self) {
        self.position += self.velocity;
    }

    /// Index of the first enemy, in iteration order, close enough to be struck.
    pub(crate) fn first_hit(&self, enemies: &[Enemy]) -> Option<usize> {
        enemies.iter().position(|enemy| {
            enemy.position.distance(self.position) < enemy.radius + PROJECTILE_HIT_MARGIN
        })
    }

    /// Damage dealt to bystanders of a splash impact.
    pub(crate) fn splash_damage(&self) -> f32 {
        self.damage * (0.5 + self.level as f32 * 0.1)
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            position: self.position,
            velocity: self.velocity,
            tower_kind: self.tower_kind,
            level: self.level,
            damage: self.damage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launch(level: usize) -> Launch {
        Launch {
            tower_kind: TowerKind::Cannon,
            level,
            damage: 40.0,
            effect: TowerEffect::Splash { radius: 50.0 },
            speed: 4.0,
            color: Color::from_rgb(0xfb, 0xbf, 0x24),
        }
    }

    #[test]
    fn velocity_is_fixed_toward_the_aim_point() {
        let mut projectile = Projectile::launch(Vec2::ZERO, Vec2::new(0.0, 100.0), launch(0));
        projectile.step();
        projectile.step();
        assert_eq!(projectile.position, Vec2::new(0.0, 8.0));
    }

    #[test]
    fn degenerate_aim_produces_a_stationary_projectile() {
        let projectile = Projectile::launch(Vec2::ONE, Vec2::ONE, launch(0));
        assert_eq!(projectile.snapshot().velocity, Vec2::ZERO);
    }

    #[test]
    fn splash_damage_scales_with_level() {
        let base = Projectile::launch(Vec2::ZERO, Vec2::X, launch(0));
        let veteran = Projectile::launch(Vec2::ZERO, Vec2::X, launch(3));
        assert!((base.splash_damage() - 20.0).abs() < 1e-4);
        assert!((veteran.splash_damage() - 32.0).abs() < 1e-4);
    }
}
