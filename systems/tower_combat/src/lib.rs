#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits projectile firing commands from targeting data.

use std::time::Duration;

use path_defence_core::{Command, TowerSnapshot, TowerTarget, TowerView};

/// Tower combat system that queues firing commands for ready towers.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::FireProjectile` entries for targeted towers whose
    /// fire interval has elapsed at `now`.
    pub fn handle(
        &mut self,
        now: Duration,
        towers: &TowerView,
        tower_targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        if tower_targets.is_empty() {
            return;
        }

        self.scratch.clear();

        for target in tower_targets {
            if let Some(snapshot) = towers.get(target.tower) {
                if is_ready(snapshot, now) {
                    self.scratch.push(Command::FireProjectile {
                        tower: target.tower,
                        target: target.enemy,
                    });
                }
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

fn is_ready(tower: &TowerSnapshot, now: Duration) -> bool {
    match tower.last_fired {
        None => true,
        Some(last) => now.saturating_sub(last) >= tower.fire_interval,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use path_defence_core::{EnemyId, TowerId, TowerKind, Vec2};

    #[test]
    fn untouched_towers_fire_immediately() {
        let mut system = TowerCombat::new();
        let towers = TowerView::from_snapshots(vec![snapshot(2, None), snapshot(5, None)]);
        let targets = vec![target(2, 4), target(5, 1)];
        let mut out = Vec::new();

        system.handle(Duration::ZERO, &towers, &targets, &mut out);

        assert_eq!(
            out,
            vec![
                Command::FireProjectile {
                    tower: TowerId::new(2),
                    target: EnemyId::new(4),
                },
                Command::FireProjectile {
                    tower: TowerId::new(5),
                    target: EnemyId::new(1),
                },
            ],
        );
    }

    #[test]
    fn fire_interval_gates_the_next_shot() {
        let mut system = TowerCombat::new();
        let towers = TowerView::from_snapshots(vec![snapshot(1, Some(Duration::ZERO))]);
        let targets = vec![target(1, 3)];
        let mut out = Vec::new();

        system.handle(Duration::from_millis(999), &towers, &targets, &mut out);
        assert!(out.is_empty());

        system.handle(Duration::from_millis(1000), &towers, &targets, &mut out);
        assert_eq!(
            out,
            vec![Command::FireProjectile {
                tower: TowerId::new(1),
                target: EnemyId::new(3),
            }],
        );
    }

    #[test]
    fn missing_towers_and_empty_targets_are_skipped() {
        let mut system = TowerCombat::new();
        let towers = TowerView::from_snapshots(vec![snapshot(8, None)]);
        let mut out = Vec::new();

        system.handle(Duration::ZERO, &towers, &[], &mut out);
        assert!(out.is_empty());

        system.handle(Duration::ZERO, &towers, &[target(42, 3)], &mut out);
        assert!(out.is_empty());
    }

    fn snapshot(tower: u32, last_fired: Option<Duration>) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(tower),
            kind: TowerKind::Basic,
            position: Vec2::ZERO,
            level: 0,
            range: 80.0,
            fire_interval: Duration::from_millis(1000),
            last_fired,
            target: None,
            facing: 0.0,
            invested: 25,
        }
    }

    fn target(tower: u32, enemy: u32) -> TowerTarget {
        TowerTarget {
            tower: TowerId::new(tower),
            enemy: EnemyId::new(enemy),
            tower_position: Vec2::ZERO,
            enemy_position: Vec2::ZERO,
        }
    }
}
