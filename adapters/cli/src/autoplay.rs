//! Scripted player that spends gold between ticks.

use path_defence_core::{EnemyPath, Playfield, TowerKind, Vec2};
use path_defence_simulation::Simulation;
use path_defence_world::query;
use tracing::debug;

/// Order in which new towers are bought.
const ROTATION: [TowerKind; 4] = [
    TowerKind::Basic,
    TowerKind::Cannon,
    TowerKind::Ice,
    TowerKind::Sniper,
];

/// Towers bought before gold goes to upgrades.
const MAX_TOWERS: usize = 6;

/// Perpendicular distance between a path segment and a candidate spot.
const SPOT_OFFSET: f32 = 55.0;

/// Something the autoplayer did with its gold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Action {
    Placed { kind: TowerKind },
    Upgraded { level: usize },
}

/// Greedy player that lines the route with towers and then upgrades them.
#[derive(Clone, Debug)]
pub(crate) struct Autoplayer {
    spots: Vec<Vec2>,
    rotation: usize,
}

impl Autoplayer {
    /// Derives candidate spots beside every segment of `path`.
    pub(crate) fn new(path: &EnemyPath, playfield: &Playfield) -> Self {
        let mut spots = Vec::new();
        for segment in path.waypoints().windows(2) {
            let (from, to) = (segment[0], segment[1]);
            let normal = (to - from).perp().normalize_or_zero();
            for fraction in [0.25, 0.5, 0.75] {
                let anchor = from.lerp(to, fraction);
                for side in [1.0, -1.0] {
                    let spot = anchor + normal * SPOT_OFFSET * side;
                    if playfield.contains(spot) {
                        spots.push(spot);
                    }
                }
            }
        }
        Self { spots, rotation: 0 }
    }

    /// Spends gold on at most one placement or upgrade.
    pub(crate) fn act(&mut self, simulation: &mut Simulation) -> Option<Action> {
        let tower_count = query::tower_view(simulation.world()).iter().count();
        if tower_count < MAX_TOWERS && !self.spots.is_empty() {
            return self.place(simulation);
        }
        upgrade_cheapest(simulation)
    }

    fn place(&mut self, simulation: &mut Simulation) -> Option<Action> {
        let kind = ROTATION[self.rotation % ROTATION.len()];
        let world = simulation.world();
        if query::ledger(world).gold < query::catalog(world).towers.get(kind).cost {
            return None;
        }

        let valid = self
            .spots
            .iter()
            .position(|spot| query::is_valid_placement(world, *spot))?;
        let _ = self.spots.drain(..valid);
        let spot = self.spots.remove(0);

        match simulation.place_tower(kind, spot) {
            Ok(tower) => {
                self.rotation += 1;
                debug!(
                    tower = tower.get(),
                    ?kind,
                    x = spot.x,
                    y = spot.y,
                    "autoplayer placed tower"
                );
                Some(Action::Placed { kind })
            }
            Err(reason) => {
                debug!(?kind, %reason, "autoplayer placement failed");
                None
            }
        }
    }
}

fn upgrade_cheapest(simulation: &mut Simulation) -> Option<Action> {
    let world = simulation.world();
    let gold = query::ledger(world).gold;
    let (tower, _) = query::tower_view(world)
        .iter()
        .filter_map(|tower| query::upgrade_cost(world, tower.id).map(|cost| (tower.id, cost)))
        .filter(|(_, cost)| *cost <= gold)
        .min_by_key(|(_, cost)| *cost)?;

    let level = simulation.upgrade_tower(tower).ok()?;
    debug!(tower = tower.get(), level, "autoplayer upgraded tower");
    Some(Action::Upgraded { level })
}

#[cfg(test)]
mod tests {
    use super::*;
    use path_defence_core::{Catalog, Difficulty, SessionConfig};

    fn grasslands() -> Simulation {
        let catalog = Catalog::default();
        let map = catalog.map("grasslands").expect("built-in map").clone();
        let config = SessionConfig::for_map(&catalog, &map, Difficulty::Normal, 1);
        Simulation::new(catalog, config)
    }

    #[test]
    fn spots_stay_on_the_playfield() {
        let catalog = Catalog::default();
        let map = catalog.map("grasslands").expect("built-in map");
        let autoplayer = Autoplayer::new(&map.path, &catalog.playfield);
        assert!(!autoplayer.spots.is_empty());
        assert!(autoplayer
            .spots
            .iter()
            .all(|spot| catalog.playfield.contains(*spot)));
    }

    #[test]
    fn buys_towers_in_rotation_until_gold_runs_out() {
        let mut simulation = grasslands();
        let mut autoplayer = Autoplayer::new(
            query::path(simulation.world()),
            &query::catalog(simulation.world()).playfield,
        );

        assert_eq!(
            autoplayer.act(&mut simulation),
            Some(Action::Placed {
                kind: TowerKind::Basic
            })
        );
        assert_eq!(
            autoplayer.act(&mut simulation),
            Some(Action::Placed {
                kind: TowerKind::Cannon
            })
        );
        assert_eq!(query::ledger(simulation.world()).gold, 0);
        assert_eq!(autoplayer.act(&mut simulation), None);

        let towers = query::tower_view(simulation.world()).into_vec();
        assert_eq!(towers.len(), 2);
    }
}
