//! Player-controlled melee unit.

use path_defence_core::{HeroArchetype, HeroSnapshot, Vec2, ARRIVAL_EPSILON};

#[derive(Clone, Debug)]
pub(crate) struct Hero {
    position: Vec2,
    destination: Vec2,
    hit_points: f32,
    pub(crate) damage: f32,
    reach: f32,
    move_speed: f32,
    cooldown_ticks: u32,
    cooldown_reset: u32,
}

impl Hero {
    pub(crate) fn new(archetype: &HeroArchetype) -> Self {
        Self {
            position: archetype.spawn,
            destination: archetype.spawn,
            hit_points: archetype.hit_points,
            damage: archetype.damage,
            reach: archetype.attack_range,
            move_speed: archetype.move_speed,
            cooldown_ticks: 0,
            cooldown_reset: archetype.attack_cooldown_ticks,
        }
    }

    pub(crate) fn set_destination(&mut self, destination: Vec2) {
        self.destination = destination;
    }

    /// Walks toward the destination and counts down the strike cooldown.
    ///
    /// Returns `true` when a strike is available this tick.
    pub(crate) fn step(&mut self) -> bool {
        let delta = self.destination - self.position;
        let distance = delta.length();
        if distance > ARRIVAL_EPSILON {
            self.position += delta / distance * self.move_speed;
        }
        self.cooldown_ticks = self.cooldown_ticks.saturating_sub(1);
        self.cooldown_ticks == 0
    }

    pub(crate) fn reaches(&self, point: Vec2) -> bool {
        self.position.distance(point) <= self.reach
    }

    pub(crate) fn strike(&mut self) {
        self.cooldown_ticks = self.cooldown_reset;
    }

    pub(crate) fn snapshot(&self) -> HeroSnapshot {
        HeroSnapshot {
            position: self.position,
            destination: self.destination,
            hit_points: self.hit_points,
            cooldown_ticks: self.cooldown_ticks,
        }
    }
}
