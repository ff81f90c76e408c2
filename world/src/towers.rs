//! Authoritative tower state management utilities.

use std::{collections::BTreeMap, time::Duration};

use path_defence_core::{
    EnemyId, TowerArchetype, TowerId, TowerKind, TowerSnapshot, UpgradeError, Vec2,
    SELL_REFUND_PERCENT,
};

/// Tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Centre of the tower.
    pub(crate) position: Vec2,
    /// Current level index.
    pub(crate) level: usize,
    /// Clock reading of the previous shot.
    pub(crate) last_fired: Option<Duration>,
    /// Enemy tracked this tick.
    pub(crate) target: Option<EnemyId>,
    /// Facing angle kept from the last target.
    pub(crate) facing: f32,
    /// Purchase price plus every upgrade paid.
    pub(crate) invested: u32,
}

impl TowerState {
    /// Gold returned when the tower is sold.
    pub(crate) fn refund(&self) -> u32 {
        let refund = u64::from(self.invested) * u64::from(SELL_REFUND_PERCENT) / 100;
        u32::try_from(refund).unwrap_or(u32::MAX)
    }

    /// Cost of the next upgrade, or why there is none.
    pub(crate) fn upgrade_cost(&self, archetype: &TowerArchetype) -> Result<u32, UpgradeError> {
        archetype
            .upgrade_cost(self.level)
            .ok_or(UpgradeError::MaxLevel)
    }

    pub(crate) fn snapshot(&self, archetype: &TowerArchetype) -> TowerSnapshot {
        let tier = archetype.tier(self.level);
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            level: self.level,
            range: tier.range,
            fire_interval: tier.fire_interval(),
            last_fired: self.last_fired,
            target: self.target,
            facing: self.facing,
            invested: self.invested,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Stores a freshly purchased tower and returns its identifier.
    pub(crate) fn insert(&mut self, kind: TowerKind, position: Vec2, cost: u32) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        let previous = self.entries.insert(
            id,
            TowerState {
                id,
                kind,
                position,
                level: 0,
                last_fired: None,
                target: None,
                facing: 0.0,
                invested: cost,
            },
        );
        debug_assert!(previous.is_none(), "tower identifiers are never reused");
        id
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: TowerId) -> Option<TowerState> {
        self.entries.remove(&id)
    }

    /// Towers in placement order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TowerState> {
        self.entries.values_mut()
    }
}
