#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.

use path_defence_core::{EnemyId, EnemyView, TowerId, TowerTarget, TowerView, Vec2};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// The output buffer is cleared before populating it with the latest
    /// assignments. An enemy counts as in range only when it is strictly closer
    /// than the tower's range. A tower with no such enemy receives no entry.
    pub fn handle(&mut self, towers: &TowerView, enemies: &EnemyView, out: &mut Vec<TowerTarget>) {
        out.clear();

        if towers.iter().next().is_none() || enemies.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies);

        for tower in towers.iter() {
            let mut best: Option<BestCandidate> = None;

            for candidate in &self.enemy_workspace {
                let distance = candidate.position.distance(tower.position);
                if distance >= tower.range {
                    continue;
                }

                let current = BestCandidate {
                    distance,
                    enemy: candidate.id,
                    position: candidate.position,
                };

                match &mut best {
                    Some(existing) => {
                        if current.precedes(existing) {
                            *existing = current;
                        }
                    }
                    None => best = Some(current),
                }
            }

            if let Some(best) = best {
                out.push(target(tower.id, tower.position, best));
            }
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        self.enemy_workspace.reserve(enemies.len());
        self.enemy_workspace
            .extend(enemies.iter().map(|snapshot| EnemyCandidate {
                id: snapshot.id,
                position: snapshot.position,
            }));
    }
}

fn target(tower: TowerId, tower_position: Vec2, best: BestCandidate) -> TowerTarget {
    TowerTarget {
        tower,
        enemy: best.enemy,
        tower_position,
        enemy_position: best.position,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    distance: f32,
    enemy: EnemyId,
    position: Vec2,
}

impl BestCandidate {
    /// Equal distances keep the incumbent, so spawn order breaks ties.
    fn precedes(&self, other: &Self) -> bool {
        self.distance < other.distance
    }
}

#[cfg(test)]
mod tests {
    use super::{TowerTarget, TowerTargeting};
    use path_defence_core::{
        EnemyId, EnemyKind, EnemySnapshot, EnemyView, TowerId, TowerKind, TowerSnapshot,
        TowerView, Vec2,
    };
    use std::time::Duration;

    fn tower_view(snapshots: Vec<TowerSnapshot>) -> TowerView {
        TowerView::from_snapshots(snapshots)
    }

    fn enemy_view(snapshots: Vec<EnemySnapshot>) -> EnemyView {
        EnemyView::from_snapshots(snapshots)
    }

    fn tower_snapshot(id: u32, position: (f32, f32), range: f32) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(id),
            kind: TowerKind::Basic,
            position: Vec2::new(position.0, position.1),
            level: 0,
            range,
            fire_interval: Duration::from_millis(1000),
            last_fired: None,
            target: None,
            facing: 0.0,
            invested: 25,
        }
    }

    fn enemy_snapshot(id: u32, position: (f32, f32)) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Basic,
            position: Vec2::new(position.0, position.1),
            radius: 8.0,
            hit_points: 50.0,
            max_hit_points: 50.0,
            segment: 0,
            slowed: false,
        }
    }

    #[test]
    fn nearest_enemy_in_range_is_chosen() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![tower_snapshot(1, (0.0, 0.0), 80.0)]);
        let enemies = enemy_view(vec![
            enemy_snapshot(3, (41.0, 0.0)),
            enemy_snapshot(4, (0.0, 40.0)),
        ]);

        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);

        assert_eq!(
            out,
            vec![TowerTarget {
                tower: TowerId::new(1),
                enemy: EnemyId::new(4),
                tower_position: Vec2::ZERO,
                enemy_position: Vec2::new(0.0, 40.0),
            }]
        );
    }

    #[test]
    fn nearest_enemy_wins_in_either_order() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![tower_snapshot(1, (0.0, 0.0), 80.0)]);
        let enemies = enemy_view(vec![
            enemy_snapshot(4, (0.0, 40.0)),
            enemy_snapshot(3, (41.0, 0.0)),
        ]);

        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].enemy, EnemyId::new(4));
    }

    #[test]
    fn equal_distances_keep_the_earliest_spawn() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![tower_snapshot(1, (100.0, 100.0), 80.0)]);
        let enemies = enemy_view(vec![
            enemy_snapshot(20, (130.0, 100.0)),
            enemy_snapshot(10, (70.0, 100.0)),
        ]);

        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].enemy, EnemyId::new(20));
    }

    #[test]
    fn range_boundary_is_exclusive() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![tower_snapshot(1, (0.0, 0.0), 80.0)]);

        let mut out = Vec::new();
        system.handle(&towers, &enemy_view(vec![enemy_snapshot(1, (79.5, 0.0))]), &mut out);
        assert_eq!(out.len(), 1);

        system.handle(&towers, &enemy_view(vec![enemy_snapshot(1, (80.0, 0.0))]), &mut out);
        assert!(out.is_empty(), "enemy exactly at range must be ignored");
    }

    #[test]
    fn every_tower_chooses_independently() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![
            tower_snapshot(2, (300.0, 0.0), 80.0),
            tower_snapshot(1, (0.0, 0.0), 80.0),
        ]);
        let enemies = enemy_view(vec![
            enemy_snapshot(7, (290.0, 0.0)),
            enemy_snapshot(8, (10.0, 0.0)),
        ]);

        let mut out = Vec::new();
        system.handle(&towers, &enemies, &mut out);

        let pairs: Vec<(TowerId, EnemyId)> =
            out.iter().map(|target| (target.tower, target.enemy)).collect();
        assert_eq!(
            pairs,
            vec![
                (TowerId::new(1), EnemyId::new(8)),
                (TowerId::new(2), EnemyId::new(7)),
            ]
        );
    }

    #[test]
    fn stale_targets_are_cleared() {
        let mut system = TowerTargeting::new();
        let towers = tower_view(vec![tower_snapshot(1, (0.0, 0.0), 80.0)]);
        let mut out = vec![TowerTarget {
            tower: TowerId::new(99),
            enemy: EnemyId::new(99),
            tower_position: Vec2::ZERO,
            enemy_position: Vec2::ZERO,
        }];

        system.handle(&towers, &enemy_view(Vec::new()), &mut out);
        assert!(out.is_empty());

        let enemies = enemy_view(vec![enemy_snapshot(1, (10.0, 10.0))]);
        system.handle(&tower_view(Vec::new()), &enemies, &mut out);
        assert!(out.is_empty());
    }
}
