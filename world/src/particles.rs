//! Cosmetic explosion particles.

use path_defence_core::{Color, ParticleSnapshot, Vec2};
use rand::Rng;

/// Fixed-shape particle record.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Particle {
    position: Vec2,
    velocity: Vec2,
    remaining_ticks: u32,
    color: Color,
}

impl Particle {
    /// Integrates one tick and reports whether the particle is still alive.
    pub(crate) fn step(&mut self) -> bool {
        self.position += self.velocity;
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
        self.remaining_ticks > 0
    }

    pub(crate) fn snapshot(&self) -> ParticleSnapshot {
        ParticleSnapshot {
            position: self.position,
            remaining_ticks: self.remaining_ticks,
            color: self.color,
        }
    }
}

/// Emits the explosion for a splash impact of a tower at `level`.
///
/// Higher levels emit more, faster and longer-lived particles.
pub(crate) fn burst<R: Rng + ?Sized>(
    rng: &mut R,
    origin: Vec2,
    level: usize,
    color: Color,
    out: &mut Vec<Particle>,
) {
    let level = u32::try_from(level).unwrap_or(u32::MAX);
    let count = 8_u32.saturating_add(level.saturating_mul(4));
    let spread = 3.0 + level as f32;
    let remaining_ticks = 30_u32.saturating_add(level.saturating_mul(10));

    out.reserve(count as usize);
    for _ in 0..count {
        let velocity = Vec2::new(
            rng.gen_range(-spread..spread),
            rng.gen_range(-spread..spread),
        );
        out.push(Particle {
            position: origin,
            velocity,
            remaining_ticks,
            color,
        });
    }
}
